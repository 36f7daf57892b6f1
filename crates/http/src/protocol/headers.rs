//! The header table shared by requests, responses and trailers.
//!
//! Header names are case-insensitive on the wire, so the table folds every
//! name to lowercase when it is inserted and when it is looked up. Entries
//! keep their insertion order, and setting a name that is already present
//! merges the new value onto the existing one with `", "` instead of
//! storing a second entry.

use crate::ensure;
use crate::utils::{CRLF, find_crlf};

use super::error::ParseError;

/// An ordered collection of header name/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, merging with `", "` when the name is already present.
    ///
    /// The name is folded to lowercase; the value is stored untouched.
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref().to_ascii_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, merged)) => {
                merged.push_str(", ");
                merged.push_str(&value);
            }
            None => self.entries.push((name, value)),
        }
    }

    /// Replaces the value stored under `name`, inserting when absent.
    pub fn replace(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref().to_ascii_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Looks up a header value; the name is folded before the comparison.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn remove(&mut self, name: &str) {
        let name = name.to_ascii_lowercase();
        self.entries.retain(|(existing, _)| *existing != name);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order, names in their folded form.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Consumes at most one header field line from the front of `data`.
    ///
    /// Returns `(consumed, done)`: `(0, false)` when no complete line is
    /// buffered yet, `(2, true)` when the line is the blank terminator, and
    /// otherwise the byte length of the parsed line. A malformed line is a
    /// hard error; the caller gets no chance to resynchronize.
    pub fn parse_line(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        let Some(idx) = find_crlf(data) else {
            return Ok((0, false));
        };
        if idx == 0 {
            return Ok((CRLF.len(), true));
        }

        let line = &data[..idx];
        let colon = line.iter().position(|&b| b == b':').ok_or_else(|| {
            ParseError::invalid_header_format(format!(
                "missing colon in {:?}",
                String::from_utf8_lossy(line)
            ))
        })?;
        let (raw_name, rest) = line.split_at(colon);

        // Whitespace between the field name and the colon is forbidden.
        ensure!(
            !raw_name.ends_with(b" "),
            ParseError::invalid_header_format("header name has trailing space")
        );

        let name = str::from_utf8(raw_name)
            .map_err(|_| ParseError::invalid_header_format("header name is not valid utf-8"))?;
        let name = name.trim().to_ascii_lowercase();
        ensure!(
            !name.is_empty() && name.bytes().all(is_token_char),
            ParseError::invalid_header_format(format!("invalid header name: {name:?}"))
        );

        let value = str::from_utf8(&rest[1..])
            .map_err(|_| ParseError::invalid_header_format("header value is not valid utf-8"))?;
        self.set(name, value.trim());

        Ok((idx + CRLF.len(), false))
    }
}

fn is_token_char(c: u8) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}
