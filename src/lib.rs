//! Streaming decoder adapter for MPEG audio (Layer I/II/III) elementary
//! streams.
//!
//! [`Decoder`] pulls compressed bytes from any `Read` source, runs them
//! through a single-frame [`FrameDecoder`], and serves the result as a plain
//! `Read` stream of interleaved 16-bit little-endian PCM. Sources that
//! implement symphonia's `MediaSource` also get an approximate `Seek` in PCM
//! byte space.
//!
//! The frame decode itself is pluggable. With the `mp3` feature,
//! `NanoMp3` provides one backed by the `nanomp3` crate.
//!
//! # Example
//!
//! ```ignore
//! use std::io::Read;
//! use mp3_stream::{Decoder, NanoMp3};
//!
//! let file = std::fs::File::open("track.mp3").unwrap();
//! let mut decoder = Decoder::new(file, NanoMp3::new());
//!
//! let mut pcm = Vec::new();
//! decoder.read_to_end(&mut pcm).unwrap();
//! let info = decoder.info();
//! println!("{}ch, {}Hz, {}kbps", info.channels, info.sample_rate, info.bitrate_kbps);
//! ```

mod buffer;
mod decode;
pub mod error;
mod frame;
pub mod header;
#[cfg(feature = "mp3")]
mod mp3;
mod options;
mod seek;
mod shared;

use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

pub use decode::Decoder;
pub use error::DecoderError;
pub use frame::{FrameDecoder, FrameInfo, FrameOutcome, MAX_SAMPLES_PER_FRAME};
#[cfg(feature = "mp3")]
pub use mp3::NanoMp3;
pub use options::{DEFAULT_INPUT_CAPACITY, DecoderOptions};
pub use shared::SharedDecoder;

impl<S: Read, F: FrameDecoder> Decoder<S, F> {
    /// Returns an iterator that yields decoded PCM samples.
    ///
    /// Samples are interleaved for stereo streams: `[L0, R0, L1, R1, ...]`.
    /// Iteration stops at end of stream or after the first error.
    pub fn samples(&mut self) -> Samples<'_, S, F> {
        Samples {
            decoder: self,
            done: false,
        }
    }
}

/// Iterator over decoded PCM samples.
pub struct Samples<'a, S, F> {
    decoder: &'a mut Decoder<S, F>,
    done: bool,
}

impl<S: Read, F: FrameDecoder> Iterator for Samples<'_, S, F> {
    type Item = io::Result<i16>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.decoder.read_i16::<LittleEndian>() {
            Ok(s) => Some(Ok(s)),
            Err(e) => {
                self.done = true;
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    None
                } else {
                    Some(Err(e))
                }
            }
        }
    }
}
