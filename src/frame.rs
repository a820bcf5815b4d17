//! The single-frame decode primitive the stream pump drives.

/// Most samples a single frame can produce: 1152 per channel, stereo.
pub const MAX_SAMPLES_PER_FRAME: usize = 1152 * 2;

/// Metadata of the most recently decoded frame.
///
/// Every field is zero until a frame has been decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInfo {
    /// Sample rate in Hz (e.g. 44100).
    pub sample_rate: u32,
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Bitrate of the frame in kbps.
    pub bitrate_kbps: u32,
    /// MPEG layer (1, 2 or 3).
    pub layer: u8,
    /// Compressed length of the frame in bytes.
    pub frame_bytes: usize,
    /// Samples per channel produced by the frame.
    pub samples: usize,
}

impl FrameInfo {
    /// Bytes of 16-bit interleaved PCM the frame decodes to.
    pub fn pcm_bytes(&self) -> usize {
        self.samples * self.channels as usize * 2
    }
}

/// Result of one [`FrameDecoder::decode_frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No complete frame in the input. More bytes are needed, or the
    /// stream has ended.
    NeedMore,
    /// Bytes were discarded while searching for sync, but no frame was
    /// decoded.
    Skipped(usize),
    /// A frame was decoded. `consumed` covers any skipped prefix plus the
    /// frame itself; `info.samples * info.channels` samples were written.
    Decoded { consumed: usize, info: FrameInfo },
}

impl FrameOutcome {
    /// Input bytes to discard after this call.
    pub fn consumed(&self) -> usize {
        match *self {
            FrameOutcome::NeedMore => 0,
            FrameOutcome::Skipped(n) => n,
            FrameOutcome::Decoded { consumed, .. } => consumed,
        }
    }
}

/// Decodes one compressed frame at a time.
///
/// Implementations may keep synthesis-filter history between calls, but
/// never buffer input: every call sees the full window of undecoded bytes
/// starting at the current read position.
pub trait FrameDecoder {
    /// Locate and decode one frame starting at or after `input[0]`.
    ///
    /// `pcm` holds at least [`MAX_SAMPLES_PER_FRAME`] samples; decoded
    /// audio is written interleaved from index 0.
    fn decode_frame(&mut self, input: &[u8], pcm: &mut [i16]) -> FrameOutcome;
}

impl<F: FrameDecoder + ?Sized> FrameDecoder for Box<F> {
    fn decode_frame(&mut self, input: &[u8], pcm: &mut [i16]) -> FrameOutcome {
        (**self).decode_frame(input, pcm)
    }
}
