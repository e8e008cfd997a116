//! Audio I/O: decode uploads and recordings to a mono signal, write WAV.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::DecodeError;
use crate::types::AudioSignal;

/// Decode an audio file to a mono [`AudioSignal`].
///
/// `.wav` files are read directly with hound; anything else (MP3, AAC/MP4)
/// is probed with symphonia. WAVs hound rejects get a second chance through
/// symphonia.
pub fn decode_file(path: &Path) -> Result<AudioSignal, DecodeError> {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);

    if is_wav {
        match read_wav(path) {
            Ok(signal) => return Ok(signal),
            Err(e @ (DecodeError::Open { .. } | DecodeError::Empty(_))) => return Err(e),
            Err(e) => log::debug!("hound rejected {}: {}; trying symphonia", path.display(), e),
        }
    }

    let file = std::fs::File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let ext = path.extension().and_then(|e| e.to_str());
    let signal = decode_source(Box::new(file), ext, &path.display().to_string())?;
    log::info!(
        "Decoded {}: {} samples at {} Hz ({:.2}s)",
        path.display(),
        signal.len(),
        signal.sample_rate(),
        signal.duration_s()
    );
    Ok(signal)
}

/// Decode an in-memory upload. `extension_hint` (e.g. `"mp3"`) helps probing.
pub fn decode_bytes(bytes: Vec<u8>, extension_hint: Option<&str>) -> Result<AudioSignal, DecodeError> {
    decode_source(Box::new(std::io::Cursor::new(bytes)), extension_hint, "<memory>")
}

/// Read a WAV file as a mono signal, averaging channels.
///
/// Normalizes integer formats to [-1, 1] and passes float WAVs through.
/// A WAV with no sample frames is [`DecodeError::Empty`].
pub fn read_wav(path: &Path) -> Result<AudioSignal, DecodeError> {
    let file = std::fs::File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = WavReader::new(std::io::BufReader::new(file))?;

    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| v as f64))
            .collect::<Result<Vec<_>, _>>()?,
    };

    if interleaved.is_empty() {
        return Err(DecodeError::Empty(path.display().to_string()));
    }

    Ok(AudioSignal::new(mix_to_mono(&interleaved, channels), spec.sample_rate))
}

/// Write samples to a 16-bit PCM mono WAV file.
///
/// Clips values to [-1, 1]. Creates parent directories if needed.
pub fn write_wav(path: &Path, samples: &[f64], sample_rate: u32) -> anyhow::Result<()> {
    use anyhow::Context;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;

    for &sample in samples {
        let clipped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clipped * 32767.0) as i16)?;
    }

    writer.finalize().context("Failed to finalize WAV file")?;
    Ok(())
}

/// Average interleaved frames down to one channel.
fn mix_to_mono(interleaved: &[f64], channels: usize) -> Vec<f64> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect()
}

fn decode_source(
    source: Box<dyn symphonia::core::io::MediaSource>,
    extension_hint: Option<&str>,
    label: &str,
) -> Result<AudioSignal, DecodeError> {
    use symphonia::core::audio::SampleBuffer;
    use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
    use symphonia::core::errors::Error as SymphError;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;

    let mss = MediaSourceStream::new(source, Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension_hint {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| DecodeError::Unsupported(format!("{}: {}", label, e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoTrack)?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<f64> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(SymphError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let channels = spec.channels.count().max(1);
                let mut sample_buf = SampleBuffer::<f64>::new(decoded.frames() as u64, spec);
                sample_buf.copy_interleaved_ref(decoded);
                samples.extend(mix_to_mono(sample_buf.samples(), channels));
            }
            // Corrupt packets are skipped, not fatal
            Err(SymphError::DecodeError(e)) => {
                log::debug!("Skipping undecodable packet in {}: {}", label, e);
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    if samples.is_empty() {
        return Err(DecodeError::Empty(label.to_string()));
    }

    Ok(AudioSignal::new(samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_stereo_fixture(path: &Path, frames: usize, sample_rate: u32) {
        let spec = WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for _ in 0..frames {
            writer.write_sample(16384i16).unwrap(); // left = 0.5
            writer.write_sample(0i16).unwrap(); // right = 0.0
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_write_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.wav");
        let samples: Vec<f64> = (0..1000)
            .map(|i| (i as f64 / 1000.0 * std::f64::consts::TAU).sin() * 0.5)
            .collect();
        write_wav(&path, &samples, 16000).unwrap();

        let signal = read_wav(&path).unwrap();
        assert_eq!(signal.sample_rate(), 16000);
        assert_eq!(signal.len(), samples.len());
        for (a, b) in samples.iter().zip(signal.samples()) {
            assert!((a - b).abs() < 0.001, "sample mismatch: {} vs {}", a, b);
        }
    }

    #[test]
    fn test_write_clips_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipping.wav");
        write_wav(&path, &[-2.0, 0.0, 2.0], 16000).unwrap();

        let signal = read_wav(&path).unwrap();
        let s = signal.samples();
        assert!(s[0] >= -1.0 && s[0] <= -0.99);
        assert!(s[2] >= 0.99 && s[2] <= 1.0);
    }

    #[test]
    fn test_read_wav_mixes_stereo_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_stereo_fixture(&path, 100, 22050);

        let signal = read_wav(&path).unwrap();
        assert_eq!(signal.len(), 100);
        assert_eq!(signal.sample_rate(), 22050);
        assert!((signal.samples()[0] - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_decode_file_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples = vec![0.25; 4410];
        write_wav(&path, &samples, 44100).unwrap();

        let signal = decode_file(&path).unwrap();
        assert_eq!(signal.len(), 4410);
        assert_eq!(signal.sample_rate(), 44100);
    }

    #[test]
    fn test_decode_bytes_wav_through_symphonia() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bytes.wav");
        write_stereo_fixture(&path, 2000, 44100);
        let bytes = std::fs::read(&path).unwrap();

        let signal = decode_bytes(bytes, Some("wav")).unwrap();
        assert_eq!(signal.sample_rate(), 44100);
        assert_eq!(signal.len(), 2000);
        assert!((signal.samples()[10] - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_decode_missing_file_is_open_error() {
        let err = decode_file(Path::new("/definitely/not/here.mp3")).unwrap_err();
        assert!(matches!(err, DecodeError::Open { .. }));
    }

    #[test]
    fn test_decode_garbage_is_unsupported() {
        let err = decode_bytes(b"this is not audio at all".to_vec(), None).unwrap_err();
        assert!(matches!(err, DecodeError::Unsupported(_)), "got {:?}", err);
    }

    #[test]
    fn test_decode_garbage_wav_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wav");
        std::fs::write(&path, b"RIFF but not really").unwrap();
        assert!(decode_file(&path).is_err());
    }

    #[test]
    fn test_mix_to_mono_drops_partial_frame() {
        let mono = mix_to_mono(&[1.0, 0.0, 0.5, 0.5, 1.0], 2);
        assert_eq!(mono, vec![0.5, 0.5]);
    }

    #[test]
    fn test_empty_wav_is_empty_error_on_both_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_wav(&path, &[], 44100).unwrap();

        assert!(matches!(read_wav(&path), Err(DecodeError::Empty(_))));
        assert!(matches!(decode_file(&path), Err(DecodeError::Empty(_))));

        let bytes = std::fs::read(&path).unwrap();
        assert!(matches!(decode_bytes(bytes, Some("wav")), Err(DecodeError::Empty(_))));
    }
}
