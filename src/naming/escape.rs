// src/naming/escape.rs

//! Unit-name escaping for template instances.
//!
//! Same scheme the service manager uses for instance names: ASCII
//! alphanumerics, `:` and `_` pass through, `.` passes through unless it is
//! the first byte, `/` becomes `-`, and every other byte is written as
//! `\xNN` in lowercase hex. The mapping is deterministic and reversible.

use crate::errors::{BackupGenError, Result};

/// Escape `raw` into a string safe for use as a unit-name component.
pub fn escape_instance(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, byte) in raw.bytes().enumerate() {
        match byte {
            b'/' => out.push('-'),
            b'.' if i > 0 => out.push('.'),
            b if b.is_ascii_alphanumeric() || b == b':' || b == b'_' => out.push(b as char),
            b => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out
}

/// Reverse of [`escape_instance`].
pub fn unescape_instance(escaped: &str) -> Result<String> {
    let bad = |msg: &str| BackupGenError::validation(escaped, msg.to_string());

    let bytes = escaped.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'-' => {
                out.push(b'/');
                i += 1;
            }
            b'\\' => {
                if bytes.get(i + 1) != Some(&b'x') {
                    return Err(bad("stray backslash in escaped name"));
                }
                let hex = bytes
                    .get(i + 2..i + 4)
                    .ok_or_else(|| bad("truncated \\x escape"))?;
                let byte = match (hex_digit(hex[0]), hex_digit(hex[1])) {
                    (Some(hi), Some(lo)) => hi << 4 | lo,
                    _ => return Err(bad("invalid \\x escape")),
                };
                out.push(byte);
                i += 4;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|_| bad("escaped name does not decode to UTF-8"))
}

fn hex_digit(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_unchanged() {
        assert_eq!(escape_instance("web_01:a.b"), "web_01:a.b");
    }

    #[test]
    fn dashes_and_symbols_are_hex_escaped() {
        assert_eq!(escape_instance("my-app"), "my\\x2dapp");
        assert_eq!(escape_instance("db@main"), "db\\x40main");
        assert_eq!(escape_instance(".hidden"), "\\x2ehidden");
    }

    #[test]
    fn non_ascii_is_escaped_per_byte() {
        assert_eq!(escape_instance("é"), "\\xc3\\xa9");
        assert_eq!(unescape_instance("\\xc3\\xa9").unwrap(), "é");
    }

    #[test]
    fn slash_maps_to_dash_and_back() {
        assert_eq!(escape_instance("a/b"), "a-b");
        assert_eq!(unescape_instance("a-b").unwrap(), "a/b");
    }

    #[test]
    fn malformed_escapes_are_rejected() {
        assert!(unescape_instance("abc\\").is_err());
        assert!(unescape_instance("abc\\x4").is_err());
        assert!(unescape_instance("abc\\xzz").is_err());
        assert!(unescape_instance("abc\\y41").is_err());
    }

    #[test]
    fn escapes_need_exactly_two_hex_digits() {
        assert!(unescape_instance("a\\x+fb").is_err());
        assert!(unescape_instance("a\\x-1b").is_err());
        assert!(unescape_instance("a\\x 1b").is_err());
        assert_eq!(unescape_instance("a\\x2Db").unwrap(), "a-b");
    }
}
