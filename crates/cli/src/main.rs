//! MemoWindow CLI: render printable waveform memory images from recordings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use memowindow_core::audio::{decode_file, write_wav};
use memowindow_core::config;
use memowindow_core::names::{slugify, unique_output_path};
use memowindow_core::render::{compute_layout, qr_service_url, HttpQrFetcher, RenderProfile};
use memowindow_core::types::{Memory, OutputImage, RenderManifest};
use memowindow_core::waveform::compute_peaks;
use memowindow_core::Synthesizer;

// ─── Top-level CLI ───────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "memowindow",
    about = "Turn voice recordings into printable waveform images with a QR code",
    version,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Show verbose output
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Render preview and/or print images for audio files
    Render(RenderArgs),
    /// Print the peak series of an audio file as JSON
    Peaks(PeaksArgs),
    /// Print the canvas layout for a resolution as JSON
    Layout(LayoutArgs),
    /// Write a test tone (or silence) WAV file
    Tone(ToneArgs),
}

// ─── Render ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input audio files (wav, mp3, m4a, ...)
    #[arg(required = true)]
    input_files: Vec<PathBuf>,

    /// Memory title (default: input file name)
    #[arg(long)]
    title: Option<String>,

    /// Play page URL to encode in the QR code (default: generated from the memory id)
    #[arg(long)]
    play_url: Option<String>,

    /// Skip the QR service and draw the placeholder
    #[arg(long, default_value_t = false)]
    no_qr: bool,

    /// Output resolution
    #[arg(long, default_value = "both", value_parser = ["preview", "print", "both"])]
    resolution: String,

    /// Custom render profile (JSON); replaces --resolution
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Output directory
    #[arg(long, default_value = "./memowindow-output")]
    output_dir: PathBuf,

    /// Seconds to wait for the QR service before using the placeholder
    #[arg(long, default_value_t = config::DEFAULT_QR_TIMEOUT.as_secs_f64())]
    qr_timeout: f64,
}

// ─── Peaks / Layout / Tone ───────────────────────────────────────

#[derive(Parser, Debug)]
struct PeaksArgs {
    /// Input audio file
    input: PathBuf,

    /// Number of columns
    #[arg(long, default_value_t = 800)]
    width: usize,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Canvas width in pixels
    #[arg(long, default_value_t = 3600)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 2400)]
    height: u32,
}

#[derive(Parser, Debug)]
struct ToneArgs {
    /// Output WAV path
    output: PathBuf,

    /// Duration in seconds
    #[arg(long, default_value_t = 1.0)]
    seconds: f64,

    /// Tone frequency in Hz (0 for silence)
    #[arg(long, default_value_t = 440.0)]
    frequency: f64,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 44100)]
    sample_rate: u32,
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Render(args) => run_render(args),
        Command::Peaks(args) => run_peaks(args),
        Command::Layout(args) => run_layout(args),
        Command::Tone(args) => run_tone(args),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

/// Validate input files exist.
fn validate_inputs(paths: &[PathBuf]) -> Result<()> {
    if paths.is_empty() {
        bail!("At least one input file is required");
    }
    for p in paths {
        if !p.exists() {
            bail!("File not found: {}", p.display());
        }
    }
    Ok(())
}

/// Profiles selected by --profile or --resolution.
fn select_profiles(args: &RenderArgs) -> Result<Vec<RenderProfile>> {
    if let Some(path) = &args.profile {
        return Ok(vec![RenderProfile::from_json_file(path)?]);
    }
    let profiles = match args.resolution.as_str() {
        "preview" => vec![RenderProfile::preview()],
        "print" => vec![RenderProfile::print()],
        _ => vec![RenderProfile::preview(), RenderProfile::print()],
    };
    Ok(profiles)
}

/// Parse --qr-timeout seconds into a positive, representable duration.
fn qr_timeout(secs: f64) -> Result<Duration> {
    match Duration::try_from_secs_f64(secs) {
        Ok(d) if !d.is_zero() => Ok(d),
        _ => bail!("--qr-timeout must be a positive number of seconds, got {}", secs),
    }
}

/// Title for an input: --title, else the file stem.
fn title_for(input: &Path, title: Option<&str>) -> String {
    match title {
        Some(t) => t.to_string(),
        None => input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default(),
    }
}

// ─── Render runner ───────────────────────────────────────────────

fn run_render(args: RenderArgs) -> Result<()> {
    validate_inputs(&args.input_files)?;
    let timeout = qr_timeout(args.qr_timeout)?;

    let profiles = select_profiles(&args)?;
    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create output directory: {}", args.output_dir.display()))?;

    let fetcher = HttpQrFetcher::new(timeout)
        .context("Failed to build HTTP client")?;
    let synth = Synthesizer::new(Box::new(fetcher));
    let qr_endpoint = config::qr_endpoint();
    let play_base = config::play_base_url();

    for input in &args.input_files {
        let title = title_for(input, args.title.as_deref());
        let mut memory = Memory::new(&title, &play_base);
        if let Some(url) = &args.play_url {
            memory.play_url = url.clone();
        }

        let signal = decode_file(input)
            .with_context(|| format!("Failed to decode {}", input.display()))?;

        let stem = unique_stem(&args.output_dir, &slugify(&title));
        let mut images = Vec::new();

        for profile in &profiles {
            let qr_url = if args.no_qr {
                None
            } else {
                let layout = compute_layout(profile.width, profile.height, &profile.fractions);
                Some(qr_service_url(&qr_endpoint, &memory.play_url, layout.qr.width)?)
            };

            let blob = synth.synthesize(&signal, &title, qr_url.as_deref(), profile)?;
            let path = args.output_dir.join(format!("{}-{}.png", stem, profile.name));
            std::fs::write(&path, &blob.png)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!(
                "Wrote {} ({}x{}, QR {:?})",
                path.display(),
                blob.width,
                blob.height,
                blob.qr
            );

            images.push(OutputImage {
                profile: profile.name.clone(),
                path,
                width: blob.width,
                height: blob.height,
                sha256: blob.sha256,
                qr: blob.qr,
            });
        }

        let manifest = RenderManifest {
            memory,
            source: input.clone(),
            sample_rate: signal.sample_rate(),
            duration_s: signal.duration_s(),
            images,
        };
        let manifest_path = args.output_dir.join(format!("{}-manifest.json", stem));
        std::fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
            .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

        println!("{}: {}", title, manifest_path.display());
    }

    println!("Rendered {} memory image set(s)", args.input_files.len());
    Ok(())
}

/// Stem not yet used by any manifest in `dir`, so every image of a run
/// shares one numbered stem.
fn unique_stem(dir: &Path, slug: &str) -> String {
    const SUFFIX: &str = "-manifest.json";
    let path = unique_output_path(dir, slug, SUFFIX);
    path.file_name()
        .map(|n| n.to_string_lossy().trim_end_matches(SUFFIX).to_string())
        .unwrap_or_else(|| slug.to_string())
}

fn run_peaks(args: PeaksArgs) -> Result<()> {
    validate_inputs(std::slice::from_ref(&args.input))?;
    let signal = decode_file(&args.input)
        .with_context(|| format!("Failed to decode {}", args.input.display()))?;
    let peaks = compute_peaks(signal.samples(), args.width);
    println!("{}", serde_json::to_string(&peaks)?);
    Ok(())
}

fn run_layout(args: LayoutArgs) -> Result<()> {
    let layout = compute_layout(args.width, args.height, &Default::default());
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

fn run_tone(args: ToneArgs) -> Result<()> {
    if args.sample_rate == 0 {
        bail!("--sample-rate must be positive");
    }
    let n = (args.seconds.max(0.0) * args.sample_rate as f64).round() as usize;
    let samples: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64 / args.sample_rate as f64;
            0.5 * (std::f64::consts::TAU * args.frequency * t).sin()
        })
        .collect();
    write_wav(&args.output, &samples, args.sample_rate)?;
    println!("Output: {}", args.output.display());
    Ok(())
}
