//! Implementations of the tape

use crate::{BfNum, TapeAddr, TapeAddrError};

/// A trait implementing a tape for the program memory
///
/// All accesses are checked, an address outside of the tape is an error.
pub trait Tape {
    /// Number of cells in the tape
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn try_get(&self, offset: TapeAddr) -> Result<BfNum, TapeAddrError>;
    fn try_set(&mut self, offset: TapeAddr, value: BfNum) -> Result<(), TapeAddrError>;
    fn try_modify(&mut self, offset: TapeAddr, diff: BfNum) -> Result<(), TapeAddrError>;
}

/// A tape of a fixed length, allocated once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedTape {
    data: Box<[BfNum]>,
}

impl FixedTape {
    /// Create an all zero tape with `len` cells.
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![BfNum::default(); len].into_boxed_slice(),
        }
    }

    /// The raw cells of the tape
    pub fn cells(&self) -> &[BfNum] {
        &self.data
    }

    fn index(&self, offset: TapeAddr) -> Result<usize, TapeAddrError> {
        let idx: usize = offset.try_into()?;
        if idx >= self.data.len() {
            return Err(TapeAddrError::TapeAddrTooLarge);
        }
        Ok(idx)
    }
}

impl Tape for FixedTape {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn try_get(&self, offset: TapeAddr) -> Result<BfNum, TapeAddrError> {
        let idx = self.index(offset)?;
        Ok(self.data[idx])
    }

    fn try_set(&mut self, offset: TapeAddr, value: BfNum) -> Result<(), TapeAddrError> {
        let idx = self.index(offset)?;
        self.data[idx] = value;
        Ok(())
    }

    fn try_modify(&mut self, offset: TapeAddr, diff: BfNum) -> Result<(), TapeAddrError> {
        let idx = self.index(offset)?;
        self.data[idx] += diff;
        Ok(())
    }
}
