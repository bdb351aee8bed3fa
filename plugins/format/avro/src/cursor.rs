use recast_api::{ByteCursor, DecodeError};

/// Longest valid zig-zag varint for a 64-bit value.
const MAX_VARINT_LEN: usize = 10;

/// Upper bound on a block of items that take no bytes on the wire (nulls,
/// empty records), which the input length cannot bound.
const MAX_ZERO_WIDTH_ITEMS: usize = 1 << 24;

// ═══════════════════════════════════════════════════════════════
//  BinaryCursor
// ═══════════════════════════════════════════════════════════════

/// Avro binary encoding over an in-memory buffer.
///
/// Several datums may be concatenated in `data`; each `read_*` call advances
/// the position, so [`BinaryCursor::remaining`] tells when the buffer is spent.
pub struct BinaryCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn available(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Short read: the rest of the buffer belongs to the truncated value, so
    /// the cursor is left at the end and later reads fail the same way.
    fn exhaust(&mut self, needed: usize) -> DecodeError {
        let offset = self.pos;
        self.pos = self.data.len();
        DecodeError::EndOfStream { needed, offset }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let available = self.available();
        if n > available {
            return Err(self.exhaust(n - available));
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let start = self.pos;
        let mut value: u64 = 0;
        for i in 0..MAX_VARINT_LEN {
            let byte = self.take(1)?[0];
            value |= u64::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::Malformed {
            offset: start,
            detail: format!("varint longer than {MAX_VARINT_LEN} bytes"),
        })
    }

    /// Non-negative length prefix.
    fn read_len(&mut self) -> Result<usize, DecodeError> {
        let offset = self.pos;
        let len = self.read_long()?;
        usize::try_from(len).map_err(|_| DecodeError::Malformed {
            offset,
            detail: format!("negative length {len}"),
        })
    }

    fn read_index(&mut self, what: &str) -> Result<usize, DecodeError> {
        let offset = self.pos;
        let idx = self.read_long()?;
        usize::try_from(idx).map_err(|_| DecodeError::Malformed {
            offset,
            detail: format!("negative {what} index {idx}"),
        })
    }
}

impl ByteCursor for BinaryCursor<'_> {
    fn read_boolean(&mut self) -> Result<bool, DecodeError> {
        let offset = self.pos;
        match self.take(1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::Malformed {
                offset,
                detail: format!("invalid boolean byte {other:#04x}"),
            }),
        }
    }

    fn read_int(&mut self) -> Result<i32, DecodeError> {
        let offset = self.pos;
        let v = self.read_long()?;
        i32::try_from(v).map_err(|_| DecodeError::Malformed {
            offset,
            detail: format!("int out of range: {v}"),
        })
    }

    fn read_long(&mut self) -> Result<i64, DecodeError> {
        let n = self.read_varint()?;
        Ok((n >> 1) as i64 ^ -((n & 1) as i64))
    }

    fn read_float(&mut self) -> Result<f32, DecodeError> {
        let b = self.take(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_double(&mut self) -> Result<f64, DecodeError> {
        let b = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(b);
        Ok(f64::from_le_bytes(buf))
    }

    fn read_bytes(&mut self) -> Result<Vec<u8>, DecodeError> {
        let len = self.read_len()?;
        Ok(self.take(len)?.to_vec())
    }

    fn read_string(&mut self) -> Result<String, DecodeError> {
        let len = self.read_len()?;
        let offset = self.pos;
        let raw = self.take(len)?;
        std::str::from_utf8(raw)
            .map(str::to_string)
            .map_err(|_| DecodeError::InvalidUtf8 { offset })
    }

    fn read_fixed(&mut self, size: usize) -> Result<Vec<u8>, DecodeError> {
        Ok(self.take(size)?.to_vec())
    }

    fn read_enum(&mut self) -> Result<usize, DecodeError> {
        self.read_index("enum")
    }

    fn read_union_index(&mut self) -> Result<usize, DecodeError> {
        self.read_index("union")
    }

    fn read_block_len(&mut self, min_item_len: usize) -> Result<usize, DecodeError> {
        let offset = self.pos;
        let count = self.read_long()?;
        if count < 0 {
            // Negative count: the block's byte size follows.
            let _size = self.read_long()?;
        }
        let count = usize::try_from(count.unsigned_abs()).map_err(|_| DecodeError::Malformed {
            offset,
            detail: format!("block count {count} out of range"),
        })?;

        if min_item_len == 0 {
            if count > MAX_ZERO_WIDTH_ITEMS {
                return Err(DecodeError::Malformed {
                    offset,
                    detail: format!("block of {count} zero-width items"),
                });
            }
            return Ok(count);
        }
        let available = self.available();
        match count.checked_mul(min_item_len) {
            Some(needed) if needed <= available => Ok(count),
            Some(needed) => Err(self.exhaust(needed - available)),
            None => Err(self.exhaust(usize::MAX)),
        }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.available())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_longs() {
        // 0, -1, 1, -64, 64
        let data = [0x00, 0x01, 0x02, 0x7F, 0x80, 0x01];
        let mut c = BinaryCursor::new(&data);
        assert_eq!(c.read_long().unwrap(), 0);
        assert_eq!(c.read_long().unwrap(), -1);
        assert_eq!(c.read_long().unwrap(), 1);
        assert_eq!(c.read_long().unwrap(), -64);
        assert_eq!(c.read_long().unwrap(), 64);
        assert!(c.is_empty());
    }

    #[test]
    fn strings_are_length_prefixed() {
        let data = [0x06, b'f', b'o', b'o'];
        let mut c = BinaryCursor::new(&data);
        assert_eq!(c.read_string().unwrap(), "foo");
        assert_eq!(c.remaining(), Some(0));
    }

    #[test]
    fn exhaustion_is_end_of_stream() {
        let data = [0x06, b'f'];
        let mut c = BinaryCursor::new(&data);
        let err = c.read_string().unwrap_err();
        assert!(err.is_end_of_stream());

        let mut empty = BinaryCursor::new(&[]);
        assert!(empty.read_int().unwrap_err().is_end_of_stream());
        assert!(empty.read_double().unwrap_err().is_end_of_stream());
    }

    #[test]
    fn malformed_content_is_not_end_of_stream() {
        let mut c = BinaryCursor::new(&[0x02]);
        assert!(matches!(c.read_boolean(), Err(DecodeError::Malformed { .. })));

        let overlong = [0xFF; 11];
        let mut c = BinaryCursor::new(&overlong);
        assert!(matches!(c.read_long(), Err(DecodeError::Malformed { .. })));

        // length -1
        let mut c = BinaryCursor::new(&[0x01]);
        assert!(matches!(c.read_bytes(), Err(DecodeError::Malformed { .. })));

        let mut c = BinaryCursor::new(&[0x02, 0xC3]);
        assert!(matches!(c.read_string(), Err(DecodeError::InvalidUtf8 { .. })));
    }

    #[test]
    fn negative_block_count_skips_size() {
        // count -2, size 4, then terminator
        let data = [0x03, 0x08, 0x00];
        let mut c = BinaryCursor::new(&data);
        assert_eq!(c.read_block_len(0).unwrap(), 2);
        assert_eq!(c.read_block_len(0).unwrap(), 0);
    }

    #[test]
    fn short_read_consumes_the_rest() {
        // length 10, three bytes of payload
        let data = [0x14, 0x02, 0x04, 0x06];
        let mut c = BinaryCursor::new(&data);
        let err = c.read_string().unwrap_err();
        assert!(matches!(err, DecodeError::EndOfStream { needed: 7, offset: 1 }));
        assert!(c.is_empty());
        assert!(c.read_int().unwrap_err().is_end_of_stream());
    }

    #[test]
    fn block_count_bounded_by_input() {
        // 3 items of at least 4 bytes, only 8 follow
        let mut data = vec![0x06];
        data.extend_from_slice(&[0u8; 8]);
        let mut c = BinaryCursor::new(&data);
        assert!(c.read_block_len(4).unwrap_err().is_end_of_stream());
        assert!(c.is_empty());

        let mut c = BinaryCursor::new(&data);
        assert_eq!(c.read_block_len(1).unwrap(), 3);
    }

    #[test]
    fn huge_zero_width_block_is_malformed() {
        // zig-zag 2^40
        let data = [0x80, 0x80, 0x80, 0x80, 0x80, 0x40];
        let mut c = BinaryCursor::new(&data);
        assert!(matches!(c.read_block_len(0), Err(DecodeError::Malformed { offset: 0, .. })));
    }

    #[test]
    fn floats_are_little_endian() {
        let mut data = 1.5f32.to_le_bytes().to_vec();
        data.extend_from_slice(&(-2.25f64).to_le_bytes());
        let mut c = BinaryCursor::new(&data);
        assert_eq!(c.read_float().unwrap(), 1.5);
        assert_eq!(c.read_double().unwrap(), -2.25);
    }
}
