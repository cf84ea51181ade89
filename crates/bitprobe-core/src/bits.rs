//! The flat bit sequence handed between pipeline stages.

use std::fmt;

/// An ordered, immutable run of bit values.
///
/// Values produced by matrix traversal are the truncated matrix entries and
/// are not checked for binarity, so `-1` or `256` survive as-is. Values
/// produced by the loader are always exactly 0 or 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitSequence {
    bits: Vec<i64>,
}

impl BitSequence {
    pub fn new(bits: Vec<i64>) -> Self {
        Self { bits }
    }

    /// Parse a string of `'0'`/`'1'` characters, dropping everything else.
    pub fn from_text(text: &str) -> Self {
        let bits = text
            .bytes()
            .filter_map(|c| match c {
                b'0' => Some(0),
                b'1' => Some(1),
                _ => None,
            })
            .collect();
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.bits.iter().copied()
    }

    /// A new sequence holding `self[start..end]`.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            bits: self.bits[start..end].to_vec(),
        }
    }

    pub fn zeros(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 0).count()
    }

    pub fn ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    /// Entries that are neither 0 nor 1.
    pub fn non_binary(&self) -> usize {
        self.bits.iter().filter(|&&b| b != 0 && b != 1).count()
    }

    /// The sequence as the 0/1 bytes test callables take. Entries other
    /// than 1 become 0.
    pub fn to_bits(&self) -> Vec<u8> {
        self.bits.iter().map(|&b| u8::from(b == 1)).collect()
    }

    /// Fraction of entries equal to 1 (0.0 for an empty sequence).
    pub fn proportion_of_ones(&self) -> f64 {
        if self.bits.is_empty() {
            return 0.0;
        }
        self.ones() as f64 / self.bits.len() as f64
    }

    pub fn into_inner(self) -> Vec<i64> {
        self.bits
    }
}

impl From<Vec<i64>> for BitSequence {
    fn from(bits: Vec<i64>) -> Self {
        Self::new(bits)
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.bits {
            write!(f, "{b}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_keeps_only_bit_characters() {
        let bits = BitSequence::from_text("10 2x\n01\r\n1");
        assert_eq!(bits.as_slice(), &[1, 0, 0, 1, 1]);
    }

    #[test]
    fn counts_and_proportion() {
        let bits = BitSequence::new(vec![1, 1, 0, 1]);
        assert_eq!(bits.ones(), 3);
        assert_eq!(bits.zeros(), 1);
        assert!((bits.proportion_of_ones() - 0.75).abs() < 1e-12);
        assert_eq!(BitSequence::default().proportion_of_ones(), 0.0);
    }

    #[test]
    fn display_concatenates_digits() {
        assert_eq!(BitSequence::new(vec![1, 0, 0, 1]).to_string(), "1001");
    }

    #[test]
    fn out_of_range_values_are_kept_and_counted() {
        let bits = BitSequence::new(vec![-1, 2, 256, 1, 0]);
        assert_eq!(bits.to_string(), "-1225610");
        assert_eq!(bits.non_binary(), 3);
        assert_eq!(bits.to_bits(), vec![0, 0, 0, 1, 0]);
    }
}
