//! [`FrameDecoder`] backed by the pure-Rust `nanomp3` crate.

use crate::frame::{FrameDecoder, FrameInfo, FrameOutcome};
use crate::header::{FrameHeader, find_frame};

/// MPEG audio frame decoder using `nanomp3`.
///
/// `nanomp3` reports sample rate, channels, bitrate and the per-channel
/// sample count. Layer and frame length are read back from the frame header.
pub struct NanoMp3 {
    inner: nanomp3::Decoder,
    scratch: Box<[f32]>,
}

impl NanoMp3 {
    pub fn new() -> Self {
        NanoMp3 {
            inner: nanomp3::Decoder::new(),
            scratch: vec![0.0f32; nanomp3::MAX_SAMPLES_PER_FRAME].into_boxed_slice(),
        }
    }
}

impl Default for NanoMp3 {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder for NanoMp3 {
    fn decode_frame(&mut self, input: &[u8], pcm: &mut [i16]) -> FrameOutcome {
        let (consumed, info) = self.inner.decode(input, &mut self.scratch);
        let Some(info) = info else {
            return match consumed {
                0 => FrameOutcome::NeedMore,
                n => FrameOutcome::Skipped(n),
            };
        };

        let channels = info.channels.num() as usize;
        let total = (info.samples_produced * channels)
            .min(pcm.len())
            .min(self.scratch.len());
        for (dst, &src) in pcm[..total].iter_mut().zip(self.scratch[..total].iter()) {
            *dst = (src.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        }

        let (header, frame_bytes) = match locate_header(&input[..consumed]) {
            Some((header, len)) => (Some(header), len),
            None => (None, consumed),
        };

        FrameOutcome::Decoded {
            consumed,
            info: FrameInfo {
                sample_rate: info.sample_rate,
                channels: channels as u16,
                bitrate_kbps: info.bitrate,
                layer: header.map_or(0, |h| h.layer),
                frame_bytes,
                samples: total / channels.max(1),
            },
        }
    }
}

/// Find the header of the frame that ends exactly at the end of `window`.
///
/// Falls back to the first parseable header when no candidate lines up,
/// which happens for free-format frames.
fn locate_header(window: &[u8]) -> Option<(FrameHeader, usize)> {
    let mut first = None;
    let mut pos = 0;
    while let Some((at, header)) = find_frame(&window[pos..]) {
        let start = pos + at;
        if header.frame_len() == Some(window.len() - start) {
            return Some((header, window.len() - start));
        }
        first.get_or_insert((header, window.len() - start));
        pos = start + 1;
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    use crate::decode::Decoder;

    fn frame(len: usize) -> Vec<u8> {
        let mut f = vec![0u8; len];
        f[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        f
    }

    #[test]
    fn header_located_after_junk() {
        let mut window = vec![0xFF, 0xFB, 0x12];
        window.extend(frame(417));
        let (header, len) = locate_header(&window).unwrap();
        assert_eq!(len, 417);
        assert_eq!(header.bitrate_kbps, 128);
        assert_eq!(header.layer, 3);
    }

    #[test]
    fn stereo_frames_decode_in_full() {
        let stream: Vec<u8> = (0..12).flat_map(|_| frame(417)).collect();
        let mut decoder = Decoder::new(Cursor::new(stream), NanoMp3::new());

        let mut first = vec![0u8; 4608];
        decoder.read_exact(&mut first).unwrap();
        let info = decoder.info();
        assert_eq!(info.samples, 1152);
        assert_eq!(info.channels, 2);
        assert_eq!(info.sample_rate, 44100);
        assert_eq!(info.bitrate_kbps, 128);
        assert_eq!(info.layer, 3);
        assert_eq!(info.frame_bytes, 417);
        assert_eq!(info.pcm_bytes(), 4608);

        let mut rest = Vec::new();
        decoder.read_to_end(&mut rest).unwrap();
        assert_eq!(first.len() + rest.len(), 12 * 4608);
    }

    #[test]
    fn garbage_needs_more() {
        let mut dec = NanoMp3::new();
        let mut pcm = vec![0i16; crate::frame::MAX_SAMPLES_PER_FRAME];
        let outcome = dec.decode_frame(&[], &mut pcm);
        assert_eq!(outcome, FrameOutcome::NeedMore);
    }
}
