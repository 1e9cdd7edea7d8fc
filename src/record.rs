//! The fixed-width value payload stored alongside each key.
//!
//! The tree itself only ever copies this struct byte-for-byte; it does
//! not interpret `name`/`protein`/`calories`/`cost` in any way. A
//! different payload shape would only require changing this file and
//! the constant in [`crate::types::RECORD_NAME_LEN`].

use crate::types::RECORD_NAME_LEN;

/// A single food-item record: the value half of a key/value pair.
#[derive(Debug, Clone, Copy)]
pub struct Record {
    name: [u8; RECORD_NAME_LEN],
    pub protein: i32,
    pub calories: i32,
    pub cost: f64,
}

impl Record {
    /// Build a record, truncating `name` to fit the fixed-width field.
    ///
    /// The last byte of the field is always left `0`, reserved as a NUL
    /// terminator, so at most `RECORD_NAME_LEN - 1` bytes of `name` are
    /// ever copied in.
    pub fn new(name: &str, protein: i32, calories: i32, cost: f64) -> Self {
        let mut buf = [0u8; RECORD_NAME_LEN];
        let bytes = name.as_bytes();
        let n = bytes.len().min(RECORD_NAME_LEN - 1);
        buf[..n].copy_from_slice(&bytes[..n]);
        Self {
            name: buf,
            protein,
            calories,
            cost,
        }
    }

    /// An all-zero record, used to fill unused slots in a node page.
    pub const fn empty() -> Self {
        Self {
            name: [0u8; RECORD_NAME_LEN],
            protein: 0,
            calories: 0,
            cost: 0.0,
        }
    }

    /// The name, decoded up to the first NUL byte.
    pub fn name(&self) -> &str {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.name.len());
        std::str::from_utf8(&self.name[..end]).unwrap_or("")
    }

    pub(crate) fn name_bytes(&self) -> &[u8; RECORD_NAME_LEN] {
        &self.name
    }

    pub(crate) fn from_parts(
        name: [u8; RECORD_NAME_LEN],
        protein: i32,
        calories: i32,
        cost: f64,
    ) -> Self {
        Self {
            name,
            protein,
            calories,
            cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trips() {
        let r = Record::new("Banana", 1, 105, 0.30);
        assert_eq!(r.name(), "Banana");
        assert_eq!(r.protein, 1);
        assert_eq!(r.calories, 105);
    }

    #[test]
    fn test_name_truncates_reserving_nul_terminator() {
        let long = "x".repeat(RECORD_NAME_LEN + 20);
        let r = Record::new(&long, 0, 0, 0.0);
        assert_eq!(r.name().len(), RECORD_NAME_LEN - 1);
        assert_eq!(r.name_bytes()[RECORD_NAME_LEN - 1], 0);
    }

    #[test]
    fn test_empty_is_well_formed() {
        let r = Record::empty();
        assert_eq!(r.name(), "");
        assert_eq!(r.protein, 0);
    }
}
