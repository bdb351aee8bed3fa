use crate::error::DecodeError;

/// Byte-level decode primitives.
///
/// The physical encoding (varints, length prefixes, float layout) lives
/// behind this trait; the resolving decoder only drives it type by type.
/// Implementations must report running out of input as
/// [`DecodeError::EndOfStream`] so it can be told apart from malformed
/// content. Any blocking for more input is the implementation's business.
pub trait ByteCursor {
    fn read_boolean(&mut self) -> Result<bool, DecodeError>;
    fn read_int(&mut self) -> Result<i32, DecodeError>;
    fn read_long(&mut self) -> Result<i64, DecodeError>;
    fn read_float(&mut self) -> Result<f32, DecodeError>;
    fn read_double(&mut self) -> Result<f64, DecodeError>;
    fn read_bytes(&mut self) -> Result<Vec<u8>, DecodeError>;
    fn read_string(&mut self) -> Result<String, DecodeError>;
    fn read_fixed(&mut self, size: usize) -> Result<Vec<u8>, DecodeError>;

    /// Writer-side enum symbol index.
    fn read_enum(&mut self) -> Result<usize, DecodeError>;

    /// Writer-side union branch index.
    fn read_union_index(&mut self) -> Result<usize, DecodeError>;

    /// Item count of the next array/map block; `0` ends the container.
    ///
    /// `min_item_len` is the fewest bytes one item can occupy. A count whose
    /// items cannot fit in the remaining input must not be returned.
    fn read_block_len(&mut self, min_item_len: usize) -> Result<usize, DecodeError>;

    /// Offset of the next byte, for diagnostics.
    fn position(&self) -> usize;

    /// Bytes left to read, if the cursor knows.
    fn remaining(&self) -> Option<usize>;
}

impl<C: ByteCursor + ?Sized> ByteCursor for &mut C {
    fn read_boolean(&mut self) -> Result<bool, DecodeError> {
        (**self).read_boolean()
    }

    fn read_int(&mut self) -> Result<i32, DecodeError> {
        (**self).read_int()
    }

    fn read_long(&mut self) -> Result<i64, DecodeError> {
        (**self).read_long()
    }

    fn read_float(&mut self) -> Result<f32, DecodeError> {
        (**self).read_float()
    }

    fn read_double(&mut self) -> Result<f64, DecodeError> {
        (**self).read_double()
    }

    fn read_bytes(&mut self) -> Result<Vec<u8>, DecodeError> {
        (**self).read_bytes()
    }

    fn read_string(&mut self) -> Result<String, DecodeError> {
        (**self).read_string()
    }

    fn read_fixed(&mut self, size: usize) -> Result<Vec<u8>, DecodeError> {
        (**self).read_fixed(size)
    }

    fn read_enum(&mut self) -> Result<usize, DecodeError> {
        (**self).read_enum()
    }

    fn read_union_index(&mut self) -> Result<usize, DecodeError> {
        (**self).read_union_index()
    }

    fn read_block_len(&mut self, min_item_len: usize) -> Result<usize, DecodeError> {
        (**self).read_block_len(min_item_len)
    }

    fn position(&self) -> usize {
        (**self).position()
    }

    fn remaining(&self) -> Option<usize> {
        (**self).remaining()
    }
}
