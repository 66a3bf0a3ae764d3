// MIT License
//
// Copyright (c) 2025 Takatoshi Kondo
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

/// Errors that can occur when reading from a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// Attempted to read beyond the end of the data
    UnexpectedEof,
}

/// A cursor which wraps an in-memory buffer and provides positioned reading
///
/// `Cursor` allows reading sequentially from `&[u8]` with a tracked
/// position. Unlike `std::io::Cursor` it is available in `no_std`
/// environments and only implements the read operations the codec needs.
///
/// # Examples
///
/// ```ignore
/// use mqtt_codec_core::mqtt::common::Cursor;
///
/// let mut cursor = Cursor::new(&b"hello world"[..]);
/// assert_eq!(cursor.read_u8(), Some(b'h'));
/// assert_eq!(cursor.read_bytes(5), Some(&b"ello "[..]));
/// assert_eq!(cursor.position(), 6);
/// ```
pub struct Cursor<T> {
    inner: T,
    pos: u64,
}

impl<T> Cursor<T> {
    /// Creates a new cursor at position 0.
    #[inline]
    pub fn new(inner: T) -> Self {
        Cursor { inner, pos: 0 }
    }

    /// Returns the current position of the cursor.
    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Sets the position of the cursor.
    #[inline]
    pub fn set_position(&mut self, pos: u64) {
        self.pos = pos;
    }

    /// Gets a reference to the underlying value.
    #[inline]
    pub fn get_ref(&self) -> &T {
        &self.inner
    }
}

impl Cursor<&[u8]> {
    /// Returns a slice of the remaining unread data.
    #[inline]
    pub fn remaining_slice(&self) -> &[u8] {
        let pos = self.pos as usize;
        if pos <= self.inner.len() {
            &self.inner[pos..]
        } else {
            &[]
        }
    }

    /// Number of unread bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining_slice().len()
    }

    /// Reads a single byte, advancing the cursor, or `None` at the end.
    #[inline]
    pub fn read_u8(&mut self) -> Option<u8> {
        let b = *self.remaining_slice().first()?;
        self.pos += 1;
        Some(b)
    }

    /// Reads exactly `count` bytes and returns them, or `None` if fewer
    /// remain. The cursor does not move on failure.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Option<&[u8]> {
        let pos = self.pos as usize;
        if self.remaining() < count {
            return None;
        }
        self.pos += count as u64;
        Some(&self.inner[pos..pos + count])
    }

    /// Fills `buf` exactly, advancing the cursor, or fails without moving.
    #[inline]
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), CursorError> {
        match self.read_bytes(buf.len()) {
            Some(src) => {
                buf.copy_from_slice(src);
                Ok(())
            }
            None => Err(CursorError::UnexpectedEof),
        }
    }

    /// Copies up to `buf.len()` bytes into `buf`, returning the number
    /// copied. Zero means the cursor is exhausted.
    #[inline]
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.remaining());
        let pos = self.pos as usize;
        buf[..n].copy_from_slice(&self.inner[pos..pos + n]);
        self.pos += n as u64;
        n
    }
}
