//! Longest substring common to a set of strings, using a generalized suffix tree.
//!
//! The K input strings are concatenated into a single text, each followed by
//! its own terminator symbol. A suffix tree over that text is built in linear
//! time by inserting suffixes in order and following suffix links. One
//! post-order pass then marks, for every node, which strings have a suffix
//! below it; the deepest node reached by all K strings spells the answer.
//!
//! # Examples
//!
//! ```
//! use common_substring::{longest_common_substring, Config};
//! let found = longest_common_substring(&["abab", "baba"], &Config::default()).unwrap();
//! assert_eq!(found, "aba");
//! ```
//!
//! Zero strings have nothing in common: the result is the empty string.

pub mod error;
pub mod input;
pub mod selector;
pub mod text;
pub mod tree;

pub use error::{Error, Result};
pub use selector::{select, CommonSubstring, Membership};
pub use text::{GeneralizedText, Symbol, TerminatorPolicy};
pub use tree::{NodeId, SuffixTree, ROOT};

/// Settings for a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// How terminators are assigned to the input strings.
    pub terminators: TerminatorPolicy,
}

/// Longest symbol sequence occurring in every one of `strings`.
pub fn longest_common_symbols<S: AsRef<[Symbol]>>(strings: &[S], config: &Config) -> Result<Vec<Symbol>> {
    let text = GeneralizedText::new(strings, config.terminators)?;
    let tree = SuffixTree::build(&text);
    Ok(select(&tree).symbols)
}

/// Longest substring occurring in every one of `strings`.
pub fn longest_common_substring<S: AsRef<str>>(strings: &[S], config: &Config) -> Result<String> {
    let text = GeneralizedText::from_strs(strings, config.terminators)?;
    let tree = SuffixTree::build(&text);
    Ok(decode(&select(&tree).symbols))
}

/// Turn symbols that came from `char`s back into a `String`.
pub fn decode(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .filter_map(|&ch| u32::try_from(ch).ok().and_then(char::from_u32))
        .collect()
}
