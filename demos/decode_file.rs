//! Decode an MP3 file to raw 16-bit little-endian PCM on stdout.
//!
//!   cargo run --features mp3 --example decode_file -- track.mp3 > track.pcm

use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter};

use mp3_stream::{Decoder, NanoMp3};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let path = std::env::args().nth(1).ok_or("usage: decode_file <input.mp3>")?;
    let mut decoder = Decoder::new(File::open(&path)?, NanoMp3::new());

    let mut out = BufWriter::new(io::stdout().lock());
    let bytes = io::copy(&mut decoder, &mut out)?;

    let info = decoder.info();
    tracing::info!(
        path = %path,
        bytes,
        sample_rate = info.sample_rate,
        channels = info.channels,
        bitrate_kbps = info.bitrate_kbps,
        layer = info.layer,
        "decoded"
    );
    Ok(())
}
