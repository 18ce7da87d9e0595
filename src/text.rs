//! Text buffer preparation.
//!
//! The K input strings are concatenated into one buffer, each followed by a
//! terminator symbol that occurs nowhere else. Alongside the buffer we keep a
//! table from "suffix length" to the index of the string the suffix starts in,
//! which the selector uses to tag leaves.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// A single symbol of the text buffer.
pub type Symbol = u64;

/// Membership masks index strings with `u32`, which bounds every pool.
const MASK_CAPACITY: u64 = u32::MAX as u64;

/// How terminator symbols are handed out to the input strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminatorPolicy {
    /// String `i` is terminated by `top - i`.
    Descending { top: Symbol },
    /// String `i` is terminated by `base + i`, for at most `capacity` strings.
    Ascending { base: Symbol, capacity: usize },
}

impl Default for TerminatorPolicy {
    fn default() -> Self {
        Self::Descending { top: Symbol::MAX }
    }
}

impl TerminatorPolicy {
    /// The digits `'0'..='9'`, one per string, for at most ten strings.
    pub const ASCII_DIGITS: Self = Self::Ascending {
        base: b'0' as Symbol,
        capacity: 10,
    };

    /// Maximum number of strings this policy can terminate.
    pub fn capacity(&self) -> usize {
        match *self {
            Self::Descending { top } => clamp(top.saturating_add(1)),
            Self::Ascending { base, capacity } => {
                capacity.min(clamp((Symbol::MAX - base).saturating_add(1)))
            }
        }
    }

    /// Terminator assigned to string `index`.
    pub fn terminator(&self, index: usize) -> Symbol {
        match *self {
            Self::Descending { top } => top - index as Symbol,
            Self::Ascending { base, .. } => base + index as Symbol,
        }
    }

    /// The symbols reserved when `count` strings are terminated.
    fn reserved(&self, count: usize) -> Option<RangeInclusive<Symbol>> {
        if count == 0 {
            return None;
        }
        let (first, last) = (self.terminator(0), self.terminator(count - 1));
        Some(first.min(last)..=first.max(last))
    }
}

fn clamp(room: u64) -> usize {
    usize::try_from(room.min(MASK_CAPACITY)).unwrap_or(usize::MAX)
}

/// The concatenated, terminated text together with its suffix owner table.
#[derive(Debug, Clone)]
pub struct GeneralizedText {
    symbols: Vec<Symbol>,
    /// Cumulative length from the end of the buffer -> string index.
    owners: BTreeMap<usize, usize>,
    reserved: Option<RangeInclusive<Symbol>>,
    string_count: usize,
}

impl GeneralizedText {
    /// Concatenate `strings`, terminating each with a symbol from `policy`.
    ///
    /// Fails if there are more strings than terminators, or if any string
    /// contains one of the terminators assigned to this set of strings.
    pub fn new<S: AsRef<[Symbol]>>(strings: &[S], policy: TerminatorPolicy) -> Result<Self> {
        let count = strings.len();
        let capacity = policy.capacity();
        if count > capacity {
            return Err(Error::TooManyStrings { count, capacity });
        }

        let reserved = policy.reserved(count);
        if let Some(range) = &reserved {
            validate_strings(strings, range)?;
        }

        let total: usize = strings.iter().map(|s| s.as_ref().len() + 1).sum();
        let mut symbols = Vec::with_capacity(total);
        for (index, s) in strings.iter().enumerate() {
            symbols.extend_from_slice(s.as_ref());
            symbols.push(policy.terminator(index));
        }

        let mut owners = BTreeMap::new();
        let mut cumulative = 0;
        for (index, s) in strings.iter().enumerate().rev() {
            cumulative += s.as_ref().len() + 1;
            owners.insert(cumulative, index);
        }

        Ok(Self {
            symbols,
            owners,
            reserved,
            string_count: count,
        })
    }

    /// Same as [`GeneralizedText::new`], encoding each `char` as its scalar value.
    pub fn from_strs<S: AsRef<str>>(strings: &[S], policy: TerminatorPolicy) -> Result<Self> {
        let encoded: Vec<Vec<Symbol>> = strings
            .iter()
            .map(|s| s.as_ref().chars().map(|ch| ch as Symbol).collect())
            .collect();
        Self::new(&encoded, policy)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of input strings (K).
    pub fn string_count(&self) -> usize {
        self.string_count
    }

    pub fn is_terminator(&self, symbol: Symbol) -> bool {
        self.reserved
            .as_ref()
            .is_some_and(|range| range.contains(&symbol))
    }

    /// Index of the string a suffix of length `suffix_len` starts in.
    ///
    /// This is the smallest table key that is `>= suffix_len`.
    pub fn owner_of_suffix(&self, suffix_len: usize) -> Option<usize> {
        if suffix_len == 0 {
            return None;
        }
        self.owners
            .range(suffix_len..)
            .next()
            .map(|(_, &index)| index)
    }

    /// Index of the string that buffer position `pos` belongs to.
    pub fn owner_of_position(&self, pos: usize) -> Option<usize> {
        if pos >= self.symbols.len() {
            return None;
        }
        self.owner_of_suffix(self.symbols.len() - pos)
    }
}

fn validate_strings<S: AsRef<[Symbol]>>(
    strings: &[S],
    reserved: &RangeInclusive<Symbol>,
) -> Result<()> {
    for (string, s) in strings.iter().enumerate() {
        if let Some(position) = s.as_ref().iter().position(|ch| reserved.contains(ch)) {
            return Err(Error::ReservedSymbol {
                string,
                position,
                symbol: s.as_ref()[position],
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concatenation_and_terminators() {
        let text = GeneralizedText::new(&[vec![1u64, 2], vec![3]], TerminatorPolicy::default()).unwrap();
        assert_eq!(text.symbols(), &[1, 2, u64::MAX, 3, u64::MAX - 1]);
        assert_eq!(text.len(), 5);
        assert_eq!(text.string_count(), 2);
        assert!(text.is_terminator(u64::MAX - 1));
        assert!(!text.is_terminator(u64::MAX - 2));
    }

    #[test]
    fn test_owner_table() {
        let text = GeneralizedText::from_strs(&["ab", "c", "def"], TerminatorPolicy::default()).unwrap();
        // a b $0 c $1 d e f $2
        let expected = [0, 0, 0, 1, 1, 2, 2, 2, 2];
        for (pos, &owner) in expected.iter().enumerate() {
            assert_eq!(text.owner_of_position(pos), Some(owner), "position {pos}");
        }
        assert_eq!(text.owner_of_position(9), None);
        assert_eq!(text.owner_of_suffix(0), None);
        assert_eq!(text.owner_of_suffix(10), None);
    }

    #[test]
    fn test_empty_strings_keep_their_terminator() {
        let text = GeneralizedText::from_strs(&["", "a", ""], TerminatorPolicy::default()).unwrap();
        assert_eq!(text.len(), 4);
        assert_eq!(text.owner_of_position(0), Some(0));
        assert_eq!(text.owner_of_position(1), Some(1));
        assert_eq!(text.owner_of_position(2), Some(1));
        assert_eq!(text.owner_of_position(3), Some(2));
    }

    #[test]
    fn test_no_strings() {
        let text = GeneralizedText::from_strs::<&str>(&[], TerminatorPolicy::default()).unwrap();
        assert!(text.is_empty());
        assert_eq!(text.string_count(), 0);
        assert!(!text.is_terminator(u64::MAX));
    }

    #[test]
    fn test_ascii_digits() {
        let policy = TerminatorPolicy::ASCII_DIGITS;
        assert_eq!(policy.capacity(), 10);
        let text = GeneralizedText::from_strs(&["ab", "ba"], policy).unwrap();
        assert_eq!(text.symbols(), &[97, 98, 48, 98, 97, 49]);

        // Only the digits actually handed out are reserved.
        assert!(GeneralizedText::from_strs(&["a2", "b"], policy).is_ok());
        match GeneralizedText::from_strs(&["ab", "b1a"], policy) {
            Err(Error::ReservedSymbol { string, position, symbol }) => {
                assert_eq!((string, position, symbol), (1, 1, b'1' as u64));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_too_many_strings() {
        let strings = vec!["a"; 11];
        match GeneralizedText::from_strs(&strings, TerminatorPolicy::ASCII_DIGITS) {
            Err(Error::TooManyStrings { count, capacity }) => {
                assert_eq!((count, capacity), (11, 10));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_descending_rejects_reserved_symbol() {
        let policy = TerminatorPolicy::Descending { top: 100 };
        assert_eq!(policy.capacity(), 101);
        assert!(GeneralizedText::new(&[vec![98u64], vec![1]], policy).is_ok());
        assert!(matches!(
            GeneralizedText::new(&[vec![1u64], vec![99]], policy),
            Err(Error::ReservedSymbol { string: 1, position: 0, symbol: 99 })
        ));
    }
}
