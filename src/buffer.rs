//! The byte-level writer shared by every section.
//!
//! [`PsdBuffer`] wraps an in-memory, seekable sink and gives sections two
//! things they all need: big-endian scalar writes, and [`PsdBuffer::write_sized`]
//! for the length-prefixed blocks that make up most of the file format —
//! the length is back-patched once the block's content has been written,
//! rather than computed ahead of time.
//!
//! Every write here is infallible: [`crate::document::Document::save`] always
//! builds the file in memory (`PsdBuffer<Cursor<Vec<u8>>>`) before touching
//! the filesystem, so there is no I/O to fail until the final `fs::write`.

use std::io::{Seek, SeekFrom, Write};

/// A seekable byte sink with PSD-specific write helpers.
pub struct PsdBuffer<T>
where
    T: Write + Seek,
{
    inner: T,
}

impl<T> PsdBuffer<T>
where
    T: Write + Seek,
{
    /// Wrap a writer.
    pub fn new(inner: T) -> Self {
        PsdBuffer { inner }
    }

    /// Unwrap the buffer, returning the underlying writer.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Write raw bytes verbatim.
    pub fn write(&mut self, bytes: impl AsRef<[u8]>) {
        self.inner
            .write_all(bytes.as_ref())
            .expect("write to an in-memory buffer never fails");
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.write([value]);
    }

    /// Write a big-endian `u16`.
    pub fn write_u16(&mut self, value: u16) {
        self.write(value.to_be_bytes());
    }

    /// Write a big-endian `i16`.
    pub fn write_i16(&mut self, value: i16) {
        self.write(value.to_be_bytes());
    }

    /// Write a big-endian `u32`.
    pub fn write_u32(&mut self, value: u32) {
        self.write(value.to_be_bytes());
    }

    /// Write a big-endian `i32`.
    pub fn write_i32(&mut self, value: i32) {
        self.write(value.to_be_bytes());
    }

    /// Write a big-endian `f64`.
    pub fn write_f64(&mut self, value: f64) {
        self.write(value.to_be_bytes());
    }

    /// The current write position, in bytes from the start of the buffer.
    pub fn position(&mut self) -> u64 {
        self.inner
            .stream_position()
            .expect("stream_position on an in-memory buffer never fails")
    }

    /// Write a placeholder `u32` length, run `body`, then back-patch the
    /// placeholder with the number of bytes `body` wrote.
    ///
    /// This is the back-patch half of the measure-then-emit/back-patch
    /// choice: every length-prefixed block in the file (sections, layer
    /// records, most additional layer info blocks) is written this way.
    pub fn write_sized<F>(&mut self, body: F)
    where
        F: FnOnce(&mut Self),
    {
        let len_pos = self.position();
        self.write_u32(0);
        let content_start = self.position();
        body(self);
        let content_end = self.position();
        let len = (content_end - content_start) as u32;

        self.inner
            .seek(SeekFrom::Start(len_pos))
            .expect("seek within an in-memory buffer never fails");
        self.write_u32(len);
        self.inner
            .seek(SeekFrom::Start(content_end))
            .expect("seek within an in-memory buffer never fails");
    }

    /// Write a Pascal string: a one-byte length prefix followed by the bytes,
    /// padded with zero bytes so `1 + len + padding` is a multiple of 4.
    pub fn write_pascal_string(&mut self, s: &str) {
        let bytes = s.as_bytes();
        assert!(bytes.len() <= u8::MAX as usize, "pascal string too long");
        self.write_u8(bytes.len() as u8);
        self.write(bytes);

        let written = 1 + bytes.len();
        let padding = (4 - written % 4) % 4;
        for _ in 0..padding {
            self.write_u8(0);
        }
    }

    /// Write a Unicode string record: a `u32` UTF-16 code unit count followed
    /// by the name encoded as big-endian UTF-16, with correct surrogate-pair
    /// handling for code points outside the Basic Multilingual Plane. An odd
    /// code unit count is padded with one trailing zero `u16`.
    pub fn write_unicode_string(&mut self, s: &str) {
        let units: Vec<u16> = s.encode_utf16().collect();
        self.write_u32(units.len() as u32);
        for unit in &units {
            self.write_u16(*unit);
        }
        if units.len() % 2 != 0 {
            self.write_u16(0);
        }
    }
}

/// A type that knows how to serialize itself into a [`PsdBuffer`].
///
/// Mirrors the write side of the section types: every section, layer record,
/// and additional layer info block implements this the same way it would
/// implement a hypothetical `from_bytes` reader — one responsibility, one
/// impl block.
pub trait PsdSerialize {
    /// Write `self` into `buffer`.
    fn write<T>(&self, buffer: &mut PsdBuffer<T>)
    where
        T: Write + Seek;
}
