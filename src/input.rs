//! Reading a query: a string count followed by that many
//! whitespace-separated strings.

use std::io::Read;

use crate::error::{Error, Result};

/// Parse `input` as `K s_1 ... s_K`. Tokens after the K-th string are ignored.
pub fn parse_strings(input: &str) -> Result<Vec<String>> {
    let mut tokens = input.split_whitespace();
    let count_token = tokens.next().ok_or(Error::MissingCount)?;
    let count: usize = count_token
        .parse()
        .map_err(|_| Error::InvalidCount(count_token.to_string()))?;

    let strings: Vec<String> = tokens.take(count).map(str::to_string).collect();
    if strings.len() < count {
        return Err(Error::MissingString {
            expected: count,
            found: strings.len(),
        });
    }
    Ok(strings)
}

/// Read all of `reader` and parse it with [`parse_strings`].
pub fn read_strings<R: Read>(mut reader: R) -> Result<Vec<String>> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse_strings(&input)
}
