//! Line tokenizer and command sub-grammars.
//!
//! A trimmed line is split once, on the first run of whitespace, into a
//! command name and the raw remainder. Simple commands split the remainder
//! on whitespace; `grep`, `sed` and `awk` parse it with the dedicated
//! grammars in [`text`]; `chmod` decodes octal triplets with
//! [`decode_octal`].
//!
//! Every grammar fails closed: a malformed remainder yields `None` and the
//! caller prints a usage line.

mod text;

pub use text::{AwkArgs, GrepArgs, SedArgs, parse_awk, parse_grep, parse_sed};

/// Split a line into `(name, remainder)`.
///
/// Returns `None` for a line that is empty after trimming. The remainder has
/// no leading whitespace and may be empty.
pub fn split_command(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match line.find(char::is_whitespace) {
        Some(pos) => Some((&line[..pos], line[pos..].trim_start())),
        None => Some((line, "")),
    }
}

/// Positional arguments of a simple command.
pub fn split_args(remainder: &str) -> Vec<String> {
    remainder.split_whitespace().map(str::to_string).collect()
}

/// Convert a 3-digit octal mode (e.g. `754`) into its `rwx` form.
///
/// Returns `None` unless the input is exactly three digits in `0..=7`.
pub fn decode_octal(mode: &str) -> Option<String> {
    if mode.len() != 3 {
        return None;
    }

    let mut symbolic = String::with_capacity(9);
    for c in mode.chars() {
        let bits = c.to_digit(8)?;
        symbolic.push(if bits & 4 != 0 { 'r' } else { '-' });
        symbolic.push(if bits & 2 != 0 { 'w' } else { '-' });
        symbolic.push(if bits & 1 != 0 { 'x' } else { '-' });
    }
    Some(symbolic)
}

/// Permission string sent to the backend for a `chmod` argument.
///
/// Octal modes are decoded; anything else passes through unchanged.
pub fn permission_string(mode: &str) -> String {
    decode_octal(mode).unwrap_or_else(|| mode.to_string())
}

/// Strip one leading and one trailing double quote, then the same for
/// single quotes.
pub fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    let text = text.strip_suffix('"').unwrap_or(text);
    let text = text.strip_prefix('\'').unwrap_or(text);
    text.strip_suffix('\'').unwrap_or(text)
}
