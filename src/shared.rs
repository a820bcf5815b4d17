//! Locking wrapper for sharing one decoder between threads.

use std::io::{self, Read, Seek, SeekFrom};

use parking_lot::Mutex;
use symphonia_core::io::MediaSource;

use crate::decode::Decoder;
use crate::frame::{FrameDecoder, FrameInfo};

/// A [`Decoder`] behind a mutex.
///
/// The lock is held for the whole of each call, so a `read` runs its
/// refill/decode/deliver loop without interleaving with other callers.
/// Access is serialized; decoding does not run in parallel.
///
/// `Read` and `Seek` are implemented for `&SharedDecoder`, so an
/// `Arc<SharedDecoder>` can be read from several threads.
pub struct SharedDecoder<S, F> {
    inner: Mutex<Decoder<S, F>>,
}

impl<S, F: FrameDecoder> SharedDecoder<S, F> {
    pub fn new(decoder: Decoder<S, F>) -> Self {
        SharedDecoder {
            inner: Mutex::new(decoder),
        }
    }

    pub fn info(&self) -> FrameInfo {
        self.inner.lock().info()
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    /// Run `f` with exclusive access to the decoder.
    pub fn with<T>(&self, f: impl FnOnce(&mut Decoder<S, F>) -> T) -> T {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }

    pub fn into_inner(self) -> Decoder<S, F> {
        self.inner.into_inner()
    }
}

impl<S: Read, F: FrameDecoder> Read for &SharedDecoder<S, F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.lock().read(buf)
    }
}

impl<S: MediaSource, F: FrameDecoder> Seek for &SharedDecoder<S, F> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.lock().seek(pos)
    }
}

impl<S: Read, F: FrameDecoder> Read for SharedDecoder<S, F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.get_mut().read(buf)
    }
}

impl<S: MediaSource, F: FrameDecoder> Seek for SharedDecoder<S, F> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.get_mut().seek(pos)
    }
}
