// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Byte cursor over one CDR-encoded ROS2 message.

use crate::core::{ExportError, Result};

/// Size of the CDR encapsulation header (4 bytes).
pub const CDR_HEADER_SIZE: usize = 4;

/// Read position over a CDR payload.
///
/// The payload starts with a 4-byte encapsulation header whose second byte
/// selects the byte order (`1` little endian, `0` big endian). Alignment is
/// computed relative to the first byte after the header, so a field at
/// payload offset `n` is aligned when `(n - 4) % size == 0`.
///
/// ```
/// use rosbag2csv::encoding::cdr::CdrCursor;
///
/// let data = [0x00, 0x01, 0x00, 0x00, 0x2A, 0x00, 0x00, 0x00];
/// let mut cursor = CdrCursor::new(&data).unwrap();
/// assert_eq!(cursor.read_u32().unwrap(), 42);
/// ```
pub struct CdrCursor<'a> {
    data: &'a [u8],
    offset: usize,
    little_endian: bool,
}

impl<'a> CdrCursor<'a> {
    /// Create a cursor positioned right after the encapsulation header.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if data.len() < CDR_HEADER_SIZE {
            return Err(ExportError::buffer_too_short(CDR_HEADER_SIZE, data.len(), 0));
        }

        Ok(Self {
            data,
            offset: CDR_HEADER_SIZE,
            little_endian: data[1] == 1,
        })
    }

    /// Current offset from the start of the payload (header included).
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Total payload length, header included.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload holds nothing past the header.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.len() <= CDR_HEADER_SIZE
    }

    /// Whether every byte has been consumed.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Whether the payload is little endian.
    #[inline]
    pub fn is_little_endian(&self) -> bool {
        self.little_endian
    }

    /// Skip padding up to the next multiple of `size` past the header.
    pub fn align(&mut self, size: usize) -> Result<()> {
        let misalignment = (self.offset - CDR_HEADER_SIZE) % size;
        if misalignment > 0 {
            self.skip(size - misalignment)?;
        }
        Ok(())
    }

    /// Take `N` bytes after aligning to `N`.
    fn read_aligned<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.align(N)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.read_bytes(N)?);
        Ok(bytes)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let [byte] = self.read_aligned::<1>()?;
        Ok(byte)
    }

    /// Read a signed byte.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a u16 value.
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_aligned::<2>()?;
        Ok(if self.little_endian {
            u16::from_le_bytes(bytes)
        } else {
            u16::from_be_bytes(bytes)
        })
    }

    /// Read an i16 value.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// Read a u32 value.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_aligned::<4>()?;
        Ok(if self.little_endian {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        })
    }

    /// Read an i32 value.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Read a u64 value.
    pub fn read_u64(&mut self) -> Result<u64> {
        let bytes = self.read_aligned::<8>()?;
        Ok(if self.little_endian {
            u64::from_le_bytes(bytes)
        } else {
            u64::from_be_bytes(bytes)
        })
    }

    /// Read an i64 value.
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    /// Read an f32 value.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Read an f64 value.
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Read a byte slice without alignment.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(ExportError::buffer_too_short(
                count,
                self.remaining(),
                self.offset as u64,
            ));
        }
        let start = self.offset;
        self.offset += count;
        Ok(&self.data[start..self.offset])
    }

    /// Skip bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }
}
