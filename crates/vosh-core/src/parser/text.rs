//! Sub-grammars of the text-processing commands.

use std::sync::LazyLock;

use regex::Regex;

use crate::text::{GrepOptions, SubstituteFlags};

static GREP_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"([^"]+)"\s+(.+)$"#).expect("valid grep pattern"));
static GREP_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+(.+)$").expect("valid grep pattern"));
static SED_DELETE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"/(.*)/d"\s+(.+)$"#).expect("valid sed pattern"));
static SED_SUBSTITUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^"s/(.*?)/(.*?)/(gi|ig|g|i)?"\s+(.+)$"#).expect("valid sed pattern")
});
static AWK_PRINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^'\{print\s+\$(\d+)\}'\s+(.+)$").expect("valid awk pattern")
});
static AWK_FILTER_PRINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^'/(.+)/\s+\{print\s+\$(\d+)\}'\s+(.+)$").expect("valid awk pattern")
});

/// `grep [-flags...] pattern file`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrepArgs {
    pub options: GrepOptions,
    pub pattern: String,
    pub file: String,
}

/// `sed "/pattern/d" file` or `sed "s/old/new/[flags]" file`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SedArgs {
    Delete {
        pattern: String,
        file: String,
    },
    Substitute {
        old: String,
        new: String,
        flags: SubstituteFlags,
        file: String,
    },
}

impl SedArgs {
    pub fn file(&self) -> &str {
        match self {
            Self::Delete { file, .. } | Self::Substitute { file, .. } => file,
        }
    }
}

/// `awk '{print $N}' file` or `awk '/pattern/ {print $N}' file`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AwkArgs {
    /// 0 prints the whole line
    pub column: usize,
    pub pattern: Option<String>,
    pub file: String,
}

/// Parse the remainder of a `grep` line.
///
/// Leading `-` tokens are concatenated into the flag set. The pattern is a
/// double-quoted literal or a single bare token; the rest is the file name.
/// Whitespace runs between tokens collapse to single spaces.
pub fn parse_grep(remainder: &str) -> Option<GrepArgs> {
    let tokens: Vec<&str> = remainder.split_whitespace().collect();
    let flag_count = tokens.iter().take_while(|t| t.starts_with('-')).count();
    let flags: String = tokens[..flag_count]
        .iter()
        .map(|t| &t[1..])
        .collect();
    let rest = tokens[flag_count..].join(" ");

    let caps = GREP_QUOTED
        .captures(&rest)
        .or_else(|| GREP_BARE.captures(&rest))?;

    Some(GrepArgs {
        options: GrepOptions::from_flags(&flags),
        pattern: caps[1].to_string(),
        file: caps[2].trim().to_string(),
    })
}

/// Parse the remainder of a `sed` line. The delete form is tried first.
pub fn parse_sed(remainder: &str) -> Option<SedArgs> {
    if let Some(caps) = SED_DELETE.captures(remainder) {
        return Some(SedArgs::Delete {
            pattern: caps[1].to_string(),
            file: caps[2].trim().to_string(),
        });
    }

    let caps = SED_SUBSTITUTE.captures(remainder)?;
    Some(SedArgs::Substitute {
        old: caps[1].to_string(),
        new: caps[2].to_string(),
        flags: caps
            .get(3)
            .map(|m| SubstituteFlags::from_flags(m.as_str()))
            .unwrap_or_default(),
        file: caps[4].trim().to_string(),
    })
}

/// Parse the remainder of an `awk` line.
pub fn parse_awk(remainder: &str) -> Option<AwkArgs> {
    if let Some(caps) = AWK_PRINT.captures(remainder) {
        return Some(AwkArgs {
            column: caps[1].parse().ok()?,
            pattern: None,
            file: caps[2].trim().to_string(),
        });
    }

    let caps = AWK_FILTER_PRINT.captures(remainder)?;
    Some(AwkArgs {
        column: caps[2].parse().ok()?,
        pattern: Some(caps[1].to_string()),
        file: caps[3].trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grep_bare_pattern() {
        let args = parse_grep("error log.txt").unwrap();
        assert_eq!(args.pattern, "error");
        assert_eq!(args.file, "log.txt");
        assert_eq!(args.options, GrepOptions::default());
    }

    #[test]
    fn test_grep_flags_and_quoted_pattern() {
        let args = parse_grep("-i -n \"disk full\" my log.txt").unwrap();
        assert_eq!(args.pattern, "disk full");
        assert_eq!(args.file, "my log.txt");
        assert!(args.options.case_insensitive);
        assert!(args.options.line_numbers);
        assert!(!args.options.invert);
    }

    #[test]
    fn test_grep_combined_flags() {
        let args = parse_grep("-vc x f").unwrap();
        assert!(args.options.invert && args.options.count_only);
    }

    #[test]
    fn test_grep_missing_file() {
        assert_eq!(parse_grep("pattern"), None);
        assert_eq!(parse_grep("-i"), None);
        assert_eq!(parse_grep(""), None);
    }

    #[test]
    fn test_sed_delete() {
        assert_eq!(
            parse_sed("\"/tmp/d\" notes.txt"),
            Some(SedArgs::Delete {
                pattern: "tmp".to_string(),
                file: "notes.txt".to_string(),
            })
        );
    }

    #[test]
    fn test_sed_substitute() {
        let args = parse_sed("\"s/old/new/g\" a.txt").unwrap();
        assert_eq!(
            args,
            SedArgs::Substitute {
                old: "old".to_string(),
                new: "new".to_string(),
                flags: SubstituteFlags {
                    global: true,
                    case_insensitive: false,
                },
                file: "a.txt".to_string(),
            }
        );
        assert_eq!(args.file(), "a.txt");
    }

    #[test]
    fn test_sed_substitute_flag_variants() {
        for (flag, global, insensitive) in [
            ("", false, false),
            ("i", false, true),
            ("gi", true, true),
            ("ig", true, true),
        ] {
            let line = format!("\"s/a/b/{}\" f", flag);
            match parse_sed(&line) {
                Some(SedArgs::Substitute { flags, .. }) => {
                    assert_eq!(flags.global, global, "flag {flag}");
                    assert_eq!(flags.case_insensitive, insensitive, "flag {flag}");
                }
                other => panic!("unexpected parse for {flag}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_sed_rejects_malformed() {
        assert_eq!(parse_sed("s/a/b/ f"), None);
        assert_eq!(parse_sed("\"s/a/b/x\" f"), None);
        assert_eq!(parse_sed("\"s/a/b/g\""), None);
        assert_eq!(parse_sed(""), None);
    }

    #[test]
    fn test_awk_print_column() {
        assert_eq!(
            parse_awk("'{print $2}' data.txt"),
            Some(AwkArgs {
                column: 2,
                pattern: None,
                file: "data.txt".to_string(),
            })
        );
        assert_eq!(parse_awk("'{print $0}' data.txt").map(|a| a.column), Some(0));
    }

    #[test]
    fn test_awk_filter_print() {
        assert_eq!(
            parse_awk("'/err/ {print $3}' app.log"),
            Some(AwkArgs {
                column: 3,
                pattern: Some("err".to_string()),
                file: "app.log".to_string(),
            })
        );
    }

    #[test]
    fn test_awk_rejects_malformed() {
        assert_eq!(parse_awk("{print $1} f"), None);
        assert_eq!(parse_awk("'{print $x}' f"), None);
        assert_eq!(parse_awk("'{print $1}'"), None);
    }
}
