//! Stream pump: turns a compressed byte source into a PCM byte stream.
//!
//! Each `read` call runs the same loop:
//! 1. Drain pending PCM from the output stager
//! 2. Refill the input stager from upstream (unless upstream has ended)
//! 3. Ask the frame decoder for one frame over the buffered input
//! 4. Compact the input past the consumed bytes, stage the new PCM
//!
//! The loop stops when the caller's buffer is full, or when no further frame
//! can be produced.

use std::io::{self, Read};

use tracing::{debug, trace, warn};

use crate::buffer::{InputStager, OutputStager};
use crate::error::DecoderError;
use crate::frame::{FrameDecoder, FrameInfo, FrameOutcome, MAX_SAMPLES_PER_FRAME};
use crate::options::DecoderOptions;

/// Why upstream stopped delivering bytes.
///
/// Once recorded, upstream is not read again until the next reset.
#[derive(Debug)]
enum UpstreamEnd {
    Eof,
    Failed {
        kind: io::ErrorKind,
        message: String,
        /// The upstream error itself, handed out the first time it surfaces.
        original: Option<io::Error>,
    },
}

impl UpstreamEnd {
    fn from_error(e: io::Error) -> Self {
        UpstreamEnd::Failed {
            kind: e.kind(),
            message: e.to_string(),
            original: Some(e),
        }
    }

    /// The result a read returns once all decoded output is delivered.
    ///
    /// A failure is returned as the upstream error on first use and rebuilt
    /// from its kind and message afterwards.
    fn surface(&mut self) -> io::Result<usize> {
        match self {
            UpstreamEnd::Eof => Ok(0),
            UpstreamEnd::Failed {
                kind,
                message,
                original,
            } => Err(original
                .take()
                .unwrap_or_else(|| io::Error::new(*kind, message.clone()))),
        }
    }
}

/// Streaming decoder over an upstream compressed byte source `S`, driving the
/// frame decoder `F`.
///
/// Reading yields interleaved 16-bit little-endian PCM. When `S` implements
/// `symphonia_core::io::MediaSource` the decoder is also `Seek`.
///
/// Not synchronized; see [`SharedDecoder`](crate::SharedDecoder) for a
/// locking wrapper.
pub struct Decoder<S, F> {
    pub(crate) source: S,
    frames: F,
    pub(crate) input: InputStager,
    output: OutputStager,
    /// Scratch space the frame decoder writes samples into.
    pcm: Box<[i16]>,
    pub(crate) info: FrameInfo,
    upstream_end: Option<UpstreamEnd>,
    /// Upstream has ended and the buffered input holds no further frame.
    exhausted: bool,
}

impl<S, F: FrameDecoder> Decoder<S, F> {
    /// Create a decoder with the default 16 KiB input buffer.
    pub fn new(source: S, frames: F) -> Self {
        Self::with_options(source, frames, DecoderOptions::default())
    }

    pub fn with_options(source: S, frames: F, options: DecoderOptions) -> Self {
        Decoder {
            source,
            frames,
            input: InputStager::new(options.effective_input_capacity()),
            output: OutputStager::new(),
            pcm: vec![0i16; MAX_SAMPLES_PER_FRAME].into_boxed_slice(),
            info: FrameInfo::default(),
            upstream_end: None,
            exhausted: false,
        }
    }

    /// Metadata of the most recently decoded frame, all zero before the
    /// first one.
    pub fn info(&self) -> FrameInfo {
        self.info
    }

    /// Drop all buffered input and output and forget any upstream end.
    ///
    /// Frame metadata is kept. Nothing is reallocated.
    pub fn reset(&mut self) {
        self.input.clear();
        self.output.clear();
        self.upstream_end = None;
        self.exhausted = false;
    }

    /// Reset and hand back the upstream source.
    pub fn into_inner(mut self) -> S {
        self.reset();
        self.source
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Reading from or seeking the source directly desynchronizes the
    /// decoder until the next [`reset`](Self::reset).
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn frame_decoder(&self) -> &F {
        &self.frames
    }

    /// Compressed bytes read from upstream but not yet decoded.
    pub fn buffered_input(&self) -> usize {
        self.input.len()
    }

    /// Decoded PCM bytes not yet returned by `read`.
    pub fn pending_output(&self) -> usize {
        self.output.pending()
    }

    /// Whether the stream has ended at the current position.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn decode_once(&mut self) -> FrameOutcome {
        if self.input.is_empty() {
            return FrameOutcome::NeedMore;
        }
        match self.frames.decode_frame(self.input.as_slice(), &mut self.pcm) {
            outcome if outcome.consumed() == 0 => FrameOutcome::NeedMore,
            outcome => outcome,
        }
    }
}

impl<S: Read, F: FrameDecoder> Decoder<S, F> {
    /// Pull more compressed bytes unless upstream has already ended.
    ///
    /// With `top_up` set, keeps reading until the input buffer is full.
    fn refill(&mut self, top_up: bool) {
        if self.upstream_end.is_some() {
            return;
        }
        let result = if top_up {
            self.input.top_up(&mut self.source)
        } else {
            let was_full = self.input.is_full();
            self.input.fill_from(&mut self.source).map(|n| n == 0 && !was_full)
        };
        match result {
            Ok(false) => {}
            Ok(true) => {
                debug!(buffered = self.input.len(), "upstream reached end of input");
                self.upstream_end = Some(UpstreamEnd::Eof);
            }
            Err(e) => {
                debug!(error = %e, "upstream read failed");
                self.upstream_end = Some(UpstreamEnd::from_error(e));
            }
        }
    }

    /// Decode the next frame into the output stager.
    ///
    /// Returns `Ok(false)` once no further frame can be produced. The output
    /// stager may still be empty after `Ok(true)` when the frame carried no
    /// samples or only junk was skipped.
    fn next_frame(&mut self) -> Result<bool, DecoderError> {
        if self.exhausted {
            return Ok(false);
        }

        self.refill(false);
        let mut outcome = self.decode_once();
        if outcome == FrameOutcome::NeedMore
            && self.upstream_end.is_none()
            && !self.input.is_full()
        {
            // Give the frame search as much lookahead as the buffer allows.
            self.refill(true);
            outcome = self.decode_once();
        }

        match outcome {
            FrameOutcome::NeedMore => {
                if self.upstream_end.is_some() {
                    debug!(trailing = self.input.len(), "stream exhausted");
                    self.exhausted = true;
                    return Ok(false);
                }
                warn!(
                    capacity = self.input.capacity(),
                    "no frame found in full input buffer"
                );
                Err(DecoderError::Undecodable {
                    buffered: self.input.len(),
                })
            }
            FrameOutcome::Skipped(n) => {
                trace!(skipped = n, "discarded bytes before sync");
                self.input.compact(n);
                self.output.clear();
                Ok(true)
            }
            FrameOutcome::Decoded { consumed, info } => {
                let samples = info.samples * info.channels as usize;
                assert!(
                    samples <= self.pcm.len(),
                    "frame decoder reported {samples} samples"
                );
                self.input.compact(consumed);
                self.output.populate(&self.pcm[..samples]);
                self.info = info;
                trace!(
                    consumed,
                    samples = info.samples,
                    bitrate = info.bitrate_kbps,
                    "decoded frame"
                );
                Ok(true)
            }
        }
    }
}

impl<S: Read, F: FrameDecoder> Read for Decoder<S, F> {
    /// Fill `buf` with decoded PCM.
    ///
    /// Follows the usual partial-read contract: a short count does not mean
    /// end of stream. End of stream is `Ok(0)` and stays that way until a
    /// seek or reset. An upstream error is returned once all PCM decoded
    /// before it has been delivered, and again on every later call.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut written = 0;
        loop {
            written += self.output.deliver(&mut buf[written..]);
            if written == buf.len() {
                return Ok(written);
            }
            match self.next_frame() {
                Ok(true) => {}
                Ok(false) => break,
                // Deliver what we have; the condition persists for the next call.
                Err(_) if written > 0 => return Ok(written),
                Err(e) => return Err(e.into()),
            }
        }

        if written > 0 {
            return Ok(written);
        }
        match &mut self.upstream_end {
            Some(end) => end.surface(),
            None => Ok(0),
        }
    }
}
