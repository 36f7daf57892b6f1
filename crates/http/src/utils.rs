//! Small helpers shared across the parsing and writing code paths.

/// The line terminator the wire grammar is built around.
///
/// Requests and responses both delimit their units with `\r\n`; a bare
/// `\n` never terminates anything.
pub(crate) const CRLF: &[u8] = b"\r\n";

/// Returns the index of the first CRLF in `data`, or `None` when the
/// buffer does not yet hold a complete unit.
pub(crate) fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(CRLF.len()).position(|window| window == CRLF)
}

/// Early-returns with an error when a condition does not hold.
///
/// Like `assert!`, but produces an `Err` instead of panicking, which keeps
/// validation checks in the parser and writer down to one line.
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;

#[cfg(test)]
mod tests {
    use super::find_crlf;

    #[test]
    fn find_crlf_locates_the_first_terminator() {
        assert_eq!(find_crlf(b"GET / HTTP/1.1\r\n"), Some(14));
        assert_eq!(find_crlf(b"\r\nrest"), Some(0));
        assert_eq!(find_crlf(b"a\r\nb\r\n"), Some(1));
    }

    #[test]
    fn find_crlf_ignores_partial_and_bare_terminators() {
        assert_eq!(find_crlf(b""), None);
        assert_eq!(find_crlf(b"\r"), None);
        assert_eq!(find_crlf(b"line with bare \n feed"), None);
    }
}
