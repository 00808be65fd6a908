use std::io::{self, Cursor};

use byteorder::{BigEndian, ReadBytesExt};

use crate::{error::UnexpectedEnd, ClassFileError};

type Endian = BigEndian;

/// Bounds-checked big-endian cursor over an immutable class file buffer.
///
/// Every read either succeeds completely or fails with [`UnexpectedEnd`]
/// carrying the offset of the read that did not fit.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    r: Cursor<&'a [u8]>,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            r: Cursor::new(buf),
        }
    }

    pub fn position(&self) -> usize {
        self.r.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.r.get_ref().len().saturating_sub(self.position())
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u8(&mut self) -> Result<u8, UnexpectedEnd> {
        self.read(1, |r| r.read_u8())
    }

    pub fn read_u16(&mut self) -> Result<u16, UnexpectedEnd> {
        self.read(2, |r| r.read_u16::<Endian>())
    }

    pub fn read_u32(&mut self) -> Result<u32, UnexpectedEnd> {
        self.read(4, |r| r.read_u32::<Endian>())
    }

    pub fn read_i32(&mut self) -> Result<i32, UnexpectedEnd> {
        self.read(4, |r| r.read_i32::<Endian>())
    }

    pub fn read_i64(&mut self) -> Result<i64, UnexpectedEnd> {
        self.read(8, |r| r.read_i64::<Endian>())
    }

    pub fn read_f32(&mut self) -> Result<f32, UnexpectedEnd> {
        self.read(4, |r| r.read_f32::<Endian>())
    }

    pub fn read_f64(&mut self) -> Result<f64, UnexpectedEnd> {
        self.read(8, |r| r.read_f64::<Endian>())
    }

    /// Borrows the next `len` bytes without copying them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], UnexpectedEnd> {
        let offset = self.position();
        if self.remaining() < len {
            return Err(UnexpectedEnd {
                offset,
                wanted: len,
            });
        }

        let buf: &'a [u8] = *self.r.get_ref();
        self.r.set_position((offset + len) as u64);
        Ok(&buf[offset..offset + len])
    }

    pub fn skip(&mut self, len: usize) -> Result<(), UnexpectedEnd> {
        self.read_bytes(len).map(|_| ())
    }

    /// Reads a `u2` byte length followed by that many bytes of modified UTF-8.
    pub fn read_short_text(&mut self) -> Result<String, ClassFileError> {
        let length = self.read_u16()?;
        let offset = self.position();
        let bytes = self.read_bytes(length as usize)?;

        match cesu8::from_java_cesu8(bytes) {
            Ok(text) => Ok(text.into_owned()),
            Err(_) => decode_with_lone_surrogates(bytes)
                .ok_or(ClassFileError::InvalidUtf8 { offset }),
        }
    }

    fn read<T>(
        &mut self,
        wanted: usize,
        f: impl FnOnce(&mut Cursor<&'a [u8]>) -> io::Result<T>,
    ) -> Result<T, UnexpectedEnd> {
        let offset = self.position();
        if self.remaining() < wanted {
            return Err(UnexpectedEnd { offset, wanted });
        }

        f(&mut self.r).map_err(|_| UnexpectedEnd { offset, wanted })
    }
}

/// Decodes modified UTF-8 that may hold unpaired surrogates, which the JVM
/// accepts in `CONSTANT_Utf8` entries. Each lone surrogate becomes U+FFFD.
/// Returns `None` on any other malformed sequence.
fn decode_with_lone_surrogates(bytes: &[u8]) -> Option<String> {
    let continuation = |at: usize| {
        bytes
            .get(at)
            .filter(|&&c| c & 0xc0 == 0x80)
            .map(|&c| u16::from(c & 0x3f))
    };

    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            0x01..=0x7f => {
                units.push(u16::from(b));
                i += 1;
            }
            0xc0..=0xdf => {
                units.push(u16::from(b & 0x1f) << 6 | continuation(i + 1)?);
                i += 2;
            }
            0xe0..=0xef => {
                units.push(
                    u16::from(b & 0x0f) << 12 | continuation(i + 1)? << 6 | continuation(i + 2)?,
                );
                i += 3;
            }
            _ => return None,
        }
    }

    Some(
        char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect(),
    )
}
