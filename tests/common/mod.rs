//! Synthetic MPEG-shaped streams and a frame decoder for them.
//!
//! Frames carry a real MPEG-1 layer III header so the sync scan and length
//! math are exercised, but the payload is just a sequence number. Decoding
//! a frame produces `samples_per_frame * channels` samples derived from
//! that number, so every frame's PCM is distinct and predictable.
#![allow(dead_code)]

use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mp3_stream::header::find_frame;
use mp3_stream::{FrameDecoder, FrameInfo, FrameOutcome};

/// 128 kbps, 44.1 kHz, stereo: 417-byte frames.
pub const HEADER_128K: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
/// 160 kbps, 44.1 kHz, stereo: 522-byte frames.
pub const HEADER_160K: [u8; 4] = [0xFF, 0xFB, 0xA0, 0x00];
pub const FRAME_128K: usize = 417;
pub const FRAME_160K: usize = 522;
/// PCM bytes of one stereo layer III frame.
pub const FRAME_PCM: usize = 1152 * 2 * 2;

/// Payload marker for a frame that decodes to no samples.
const SILENT_MARKER: u8 = 0xEE;

pub fn frame(header: [u8; 4], len: usize, seq: u32) -> Vec<u8> {
    let mut f = vec![0u8; len];
    f[..4].copy_from_slice(&header);
    f[4..8].copy_from_slice(&seq.to_le_bytes());
    f
}

pub fn silent_frame() -> Vec<u8> {
    let mut f = frame(HEADER_128K, FRAME_128K, 0);
    f[8] = SILENT_MARKER;
    f
}

/// `count` constant-bitrate frames numbered from 0.
pub fn cbr_stream(count: u32) -> Vec<u8> {
    (0..count)
        .flat_map(|seq| frame(HEADER_128K, FRAME_128K, seq))
        .collect()
}

fn sample(seq: u32, k: usize) -> i16 {
    (seq as i32 * 1000 + k as i32) as i16
}

/// PCM bytes the synthetic decoder produces for frame `seq`.
pub fn frame_pcm(seq: u32) -> Vec<u8> {
    (0..1152 * 2)
        .flat_map(|k| sample(seq, k).to_le_bytes())
        .collect()
}

pub fn expected_pcm(seqs: impl IntoIterator<Item = u32>) -> Vec<u8> {
    seqs.into_iter().flat_map(frame_pcm).collect()
}

/// Frame decoder for the synthetic streams above.
///
/// Decodes a frame only when it is fully buffered; junk before a sync word
/// is folded into `consumed`. Input with no sync word at all is reported
/// as `NeedMore`.
#[derive(Clone, Default)]
pub struct SyntheticFrames {
    calls: Arc<AtomicUsize>,
}

impl SyntheticFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared counter of `decode_frame` invocations.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FrameDecoder for SyntheticFrames {
    fn decode_frame(&mut self, input: &[u8], pcm: &mut [i16]) -> FrameOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let Some((start, header)) = find_frame(input) else {
            return FrameOutcome::NeedMore;
        };
        let len = header.frame_len().unwrap_or(0);
        let frame = match input.get(start..start + len) {
            Some(frame) => frame,
            None if start > 0 => return FrameOutcome::Skipped(start),
            None => return FrameOutcome::NeedMore,
        };

        let channels = header.channels() as usize;
        let samples = if frame[8] == SILENT_MARKER {
            0
        } else {
            header.samples_per_frame()
        };
        let seq = u32::from_le_bytes([frame[4], frame[5], frame[6], frame[7]]);
        for (k, s) in pcm[..samples * channels].iter_mut().enumerate() {
            *s = sample(seq, k);
        }

        FrameOutcome::Decoded {
            consumed: start + len,
            info: FrameInfo {
                sample_rate: header.sample_rate,
                channels: channels as u16,
                bitrate_kbps: header.bitrate_kbps,
                layer: header.layer,
                frame_bytes: len,
                samples,
            },
        }
    }
}

/// Hands out at most `chunk` bytes per read, then optionally fails.
pub struct ChunkedSource {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
    fail_at_end: Option<(io::ErrorKind, &'static str)>,
    pub reads: usize,
}

impl ChunkedSource {
    pub fn new(data: Vec<u8>, chunk: usize) -> Self {
        ChunkedSource {
            data,
            pos: 0,
            chunk,
            fail_at_end: None,
            reads: 0,
        }
    }

    pub fn failing(data: Vec<u8>, chunk: usize, kind: io::ErrorKind, msg: &'static str) -> Self {
        ChunkedSource {
            fail_at_end: Some((kind, msg)),
            ..Self::new(data, chunk)
        }
    }
}

impl Read for ChunkedSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        if self.pos == self.data.len() {
            if let Some((kind, msg)) = self.fail_at_end {
                return Err(io::Error::new(kind, msg));
            }
        }
        let n = self.chunk.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Read `reader` to end of stream, issuing reads of the given sizes in turn.
pub fn read_in_chunks<R: Read>(reader: &mut R, sizes: &[usize]) -> Vec<u8> {
    let mut out = Vec::new();
    for &size in sizes.iter().cycle() {
        let mut buf = vec![0u8; size];
        let n = reader.read(&mut buf).expect("read");
        if n == 0 && size > 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    out
}
