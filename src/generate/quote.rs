// src/generate/quote.rs

//! Quoting for the two consumers of generated text: POSIX shells (fragments
//! and printed commands) and the service manager's unit-file parser.

/// Single-quote `s` for a POSIX shell. Always quotes.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Quote `s` for a shell only if it contains anything beyond a safe set.
pub fn shell_word(s: &str) -> String {
    let safe = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c));
    if safe { s.to_string() } else { shell_quote(s) }
}

/// Escape specifier expansion (`%` -> `%%`) in a unit-file value.
pub fn unit_value(s: &str) -> String {
    s.replace('%', "%%")
}

/// One argument of an `ExecStart=` line.
///
/// Specifiers (`%`) and variable expansion (`$`) are escaped; words with
/// whitespace, quotes, backslashes or `;` are double-quoted with C-style
/// escapes.
pub fn exec_arg(s: &str) -> String {
    let s = unit_value(s).replace('$', "$$");
    let needs_quotes = s.is_empty()
        || s.chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | ';'));
    if !needs_quotes {
        return s;
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
