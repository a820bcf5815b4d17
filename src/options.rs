use crate::header::MAX_FRAME_BYTES;

/// Default compressed lookahead: room for several worst-case frames.
pub const DEFAULT_INPUT_CAPACITY: usize = 16 * 1024;

/// Construction options for [`Decoder`](crate::Decoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Capacity of the compressed input buffer in bytes.
    ///
    /// The buffer never grows. A stream whose frames cannot be found within
    /// this many bytes fails with
    /// [`DecoderError::Undecodable`](crate::DecoderError::Undecodable).
    pub input_capacity: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            input_capacity: DEFAULT_INPUT_CAPACITY,
        }
    }
}

impl DecoderOptions {
    pub fn with_input_capacity(mut self, bytes: usize) -> Self {
        self.input_capacity = bytes;
        self
    }

    /// Capacity actually allocated: at least one maximal frame.
    pub(crate) fn effective_input_capacity(&self) -> usize {
        self.input_capacity.max(MAX_FRAME_BYTES)
    }
}
