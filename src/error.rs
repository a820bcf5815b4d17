use std::io;

/// Errors raised by the stream decoder.
///
/// `Read` and `Seek` can only return `io::Error`, so every variant converts
/// into one. The typed error stays reachable through `io::Error::get_ref`
/// for callers that want to tell the conditions apart.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    /// The input buffer is full, upstream is still open, and the frame
    /// decoder cannot find a frame in it.
    #[error("no decodable frame in {buffered} buffered bytes")]
    Undecodable { buffered: usize },
    /// `seek` was called on a source without random access.
    #[error("upstream source does not support seeking")]
    NotSeekable,
    /// `seek` was called before any frame was decoded, so there is no
    /// frame size to estimate the compressed offset from.
    #[error("no frame available to estimate seek position")]
    NoFrameAvailable,
    /// The translated compressed offset does not fit in the seek range.
    #[error("seek offset {0} is out of range")]
    SeekOverflow(i64),
    /// A wrapped I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DecoderError {
    fn kind(&self) -> io::ErrorKind {
        match self {
            DecoderError::Undecodable { .. } => io::ErrorKind::InvalidData,
            DecoderError::NotSeekable => io::ErrorKind::Unsupported,
            DecoderError::NoFrameAvailable => io::ErrorKind::Other,
            DecoderError::SeekOverflow(_) => io::ErrorKind::InvalidInput,
            DecoderError::Io(e) => e.kind(),
        }
    }
}

impl From<DecoderError> for io::Error {
    fn from(e: DecoderError) -> Self {
        match e {
            DecoderError::Io(inner) => inner,
            other => io::Error::new(other.kind(), other),
        }
    }
}
