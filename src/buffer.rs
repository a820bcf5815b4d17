//! Fixed-capacity staging buffers on either side of the frame decoder.
//!
//! Both buffers keep their valid bytes at offset 0 and compact by shifting
//! the remainder left, so a window is always a plain prefix slice.

use std::io::{self, Read};

use byteorder::{ByteOrder, LittleEndian};

use crate::frame::MAX_SAMPLES_PER_FRAME;

/// Compressed bytes read from upstream but not yet decoded.
pub struct InputStager {
    data: Box<[u8]>,
    len: usize,
}

impl InputStager {
    pub fn new(capacity: usize) -> Self {
        InputStager {
            data: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Valid undecoded bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn is_full(&self) -> bool {
        self.len == self.data.len()
    }

    /// One upstream read into the free tail.
    ///
    /// `Interrupted` is retried. Returns `Ok(0)` without calling upstream
    /// when the buffer is already full, so a zero from a non-full buffer
    /// means end of input.
    pub fn fill_from<R: Read + ?Sized>(&mut self, source: &mut R) -> io::Result<usize> {
        if self.is_full() {
            return Ok(0);
        }
        loop {
            match source.read(&mut self.data[self.len..]) {
                Ok(n) => {
                    self.len += n;
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Read until the buffer is full, upstream returns 0, or upstream fails.
    ///
    /// Returns `Ok(true)` if upstream reported end of input.
    pub fn top_up<R: Read + ?Sized>(&mut self, source: &mut R) -> io::Result<bool> {
        while !self.is_full() {
            if self.fill_from(source)? == 0 {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Discard the first `consumed` bytes.
    ///
    /// # Panics
    ///
    /// If `consumed` exceeds the valid length.
    pub fn compact(&mut self, consumed: usize) {
        assert!(
            consumed <= self.len,
            "compact past valid input: {consumed} > {}",
            self.len
        );
        self.data.copy_within(consumed..self.len, 0);
        self.len -= consumed;
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

/// Decoded PCM bytes of the latest frame not yet handed to the caller.
pub struct OutputStager {
    data: Box<[u8]>,
    pending: usize,
}

impl OutputStager {
    pub fn new() -> Self {
        OutputStager {
            data: vec![0u8; MAX_SAMPLES_PER_FRAME * 2].into_boxed_slice(),
            pending: 0,
        }
    }

    /// Overwrite the buffer with little-endian PCM of `samples`.
    ///
    /// # Panics
    ///
    /// If `samples` holds more than [`MAX_SAMPLES_PER_FRAME`] samples.
    pub fn populate(&mut self, samples: &[i16]) {
        let bytes = samples.len() * 2;
        assert!(
            bytes <= self.data.len(),
            "frame of {} samples exceeds output capacity",
            samples.len()
        );
        LittleEndian::write_i16_into(samples, &mut self.data[..bytes]);
        self.pending = bytes;
    }

    /// Copy as much pending output as fits into `dst`, keeping the rest.
    pub fn deliver(&mut self, dst: &mut [u8]) -> usize {
        let n = self.pending.min(dst.len());
        dst[..n].copy_from_slice(&self.data[..n]);
        self.data.copy_within(n..self.pending, 0);
        self.pending -= n;
        n
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn clear(&mut self) {
        self.pending = 0;
    }
}
