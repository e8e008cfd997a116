//! Audio decoding and WAV output.

pub mod io;

pub use io::{decode_bytes, decode_file, read_wav, write_wav};
