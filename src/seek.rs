//! Seeking in PCM space by estimating the matching compressed offset.

use std::io::{self, Seek, SeekFrom};

use symphonia_core::io::MediaSource;
use tracing::debug;

use crate::decode::Decoder;
use crate::error::DecoderError;
use crate::frame::FrameDecoder;

impl<S: MediaSource, F: FrameDecoder> Decoder<S, F> {
    /// Translate a PCM-space seek into a compressed-space seek on the source.
    ///
    /// The ratio between PCM bytes and compressed bytes comes from the most
    /// recently decoded frame alone. For constant-bitrate streams the result
    /// lands on a frame boundary; for variable-bitrate streams it is an
    /// estimate whose error grows with the distance travelled and with how
    /// far the last frame's size is from the stream average.
    ///
    /// Fails without touching any state when the source is not seekable or
    /// no frame has been decoded yet. Otherwise buffered input and output
    /// are discarded whether or not the source seek succeeds.
    pub fn seek_pcm(&mut self, pos: SeekFrom) -> Result<u64, DecoderError> {
        if !self.source.is_seekable() {
            return Err(DecoderError::NotSeekable);
        }

        let pcm_per_frame = self.info.pcm_bytes() as i64;
        let frame_bytes = self.info.frame_bytes as i64;
        if pcm_per_frame == 0 || frame_bytes == 0 {
            return Err(DecoderError::NoFrameAvailable);
        }

        let scale = |offset: i64| -> Result<i64, DecoderError> {
            (offset / pcm_per_frame)
                .checked_mul(frame_bytes)
                .ok_or(DecoderError::SeekOverflow(offset))
        };
        let target = match pos {
            SeekFrom::Start(offset) => {
                let offset = i64::try_from(offset)
                    .map_err(|_| DecoderError::SeekOverflow(i64::MAX))?;
                SeekFrom::Start(scale(offset)? as u64)
            }
            // The source sits past everything buffered; seek relative to
            // what has actually been decoded.
            SeekFrom::Current(offset) => SeekFrom::Current(
                scale(offset)?
                    .checked_sub(self.input.len() as i64)
                    .ok_or(DecoderError::SeekOverflow(offset))?,
            ),
            SeekFrom::End(offset) => SeekFrom::End(scale(offset)?),
        };

        let result = self.source.seek(target);
        self.reset();
        let achieved = result?;

        let pcm_pos = achieved / frame_bytes as u64 * pcm_per_frame as u64;
        debug!(?pos, ?target, achieved, pcm_pos, "seek");
        Ok(pcm_pos)
    }
}

impl<S: MediaSource, F: FrameDecoder> Seek for Decoder<S, F> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.seek_pcm(pos).map_err(io::Error::from)
    }
}
