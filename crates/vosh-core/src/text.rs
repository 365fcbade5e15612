//! Text-processing semantics for `grep`, `sed` and `awk`.
//!
//! Every function here is pure: it takes file content (or its lines) plus
//! parsed parameters and returns the newline-joined output. Patterns are
//! literal substrings; only the case-insensitive `sed` substitution compiles
//! a regex, and it escapes the pattern first.

use regex::{NoExpand, RegexBuilder};

/// Split content into lines on `\n`.
///
/// Content without a trailing newline still yields its final line, and a
/// trailing newline yields a final empty line.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split('\n').collect()
}

// =============================================================================
// grep
// =============================================================================

/// Options collected from `grep` flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrepOptions {
    /// `-i`
    pub case_insensitive: bool,
    /// `-v`
    pub invert: bool,
    /// `-n`
    pub line_numbers: bool,
    /// `-c`
    pub count_only: bool,
}

impl GrepOptions {
    /// Build options from concatenated flag letters (e.g. `"in"` for `-i -n`).
    ///
    /// Unknown letters are ignored.
    pub fn from_flags(flags: &str) -> Self {
        Self {
            case_insensitive: flags.contains('i'),
            invert: flags.contains('v'),
            line_numbers: flags.contains('n'),
            count_only: flags.contains('c'),
        }
    }
}

/// Print lines containing `pattern`.
///
/// A line matches iff it contains the pattern XOR `invert`. With `count_only`
/// the result is the decimal match count; with `line_numbers` each match is
/// prefixed by its 1-based line number and a colon.
pub fn grep(lines: &[&str], pattern: &str, opts: GrepOptions) -> String {
    let needle = if opts.case_insensitive {
        pattern.to_lowercase()
    } else {
        pattern.to_string()
    };

    let matches: Vec<(usize, &str)> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| {
            let found = if opts.case_insensitive {
                line.to_lowercase().contains(&needle)
            } else {
                line.contains(&needle)
            };
            found != opts.invert
        })
        .map(|(idx, line)| (idx, *line))
        .collect();

    if opts.count_only {
        return matches.len().to_string();
    }

    matches
        .into_iter()
        .map(|(idx, line)| {
            if opts.line_numbers {
                format!("{}:{}", idx + 1, line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// sed
// =============================================================================

/// Flags of the substitute form `s/old/new/[flags]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubstituteFlags {
    /// `g`: replace every occurrence instead of the first
    pub global: bool,
    /// `i`: match `old` case-insensitively
    pub case_insensitive: bool,
}

impl SubstituteFlags {
    pub fn from_flags(flags: &str) -> Self {
        let flags = flags.to_lowercase();
        Self {
            global: flags.contains('g'),
            case_insensitive: flags.contains('i'),
        }
    }
}

/// Drop every line containing `pattern`, keeping the rest in order.
pub fn sed_delete(lines: &[&str], pattern: &str) -> String {
    lines
        .iter()
        .filter(|line| !line.contains(pattern))
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace `old` with `new` across the whole content.
///
/// Without `g` only the first occurrence in the entire content is replaced,
/// not the first per line. `new` is always inserted literally.
pub fn sed_substitute(
    content: &str,
    old: &str,
    new: &str,
    flags: SubstituteFlags,
) -> Result<String, regex::Error> {
    if !flags.case_insensitive {
        return Ok(if flags.global {
            content.replace(old, new)
        } else {
            content.replacen(old, new, 1)
        });
    }

    let re = RegexBuilder::new(&regex::escape(old))
        .case_insensitive(true)
        .build()?;
    let replaced = if flags.global {
        re.replace_all(content, NoExpand(new))
    } else {
        re.replace(content, NoExpand(new))
    };
    Ok(replaced.into_owned())
}

// =============================================================================
// awk
// =============================================================================

/// Print field `column` of each line, optionally filtered by `pattern`.
///
/// Column 0 is the whole line. Fields are whitespace-separated after trimming
/// and 1-indexed; a missing field prints as an empty line.
pub fn awk_print(lines: &[&str], column: usize, pattern: Option<&str>) -> String {
    lines
        .iter()
        .filter(|line| pattern.is_none_or(|p| line.contains(p)))
        .map(|line| field(line, column))
        .collect::<Vec<_>>()
        .join("\n")
}

fn field(line: &str, column: usize) -> &str {
    if column == 0 {
        return line;
    }
    line.split_whitespace().nth(column - 1).unwrap_or("")
}
