//! Formatting for listings, the process table, dates and the calendar.

use chrono::{DateTime, Datelike, Month, NaiveDate, TimeZone};

use crate::models::{DirectoryEntry, ProcessInfo};

/// Listing flags of `ls`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// `-al`: one detailed line per entry
    pub long: bool,
    /// `-lt`: newest first
    pub by_time: bool,
}

/// One `ls -al` line: `permissions owner id<TAB>date<TAB>name[/]`.
pub fn long_entry(entry: &DirectoryEntry) -> String {
    format!(
        "{} {} {}\t{}\t{}",
        entry.permissions,
        entry.owner,
        entry.id,
        entry.created_at.format("%Y-%m-%d"),
        entry.display_name()
    )
}

/// Format a directory listing.
///
/// The short form is a single tab-joined line of names in index order. An
/// empty listing prints as one line holding a single space.
pub fn listing(entries: &[DirectoryEntry], opts: ListOptions) -> Vec<String> {
    let mut sorted: Vec<&DirectoryEntry> = entries.iter().collect();
    if opts.by_time {
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    let lines: Vec<String> = if opts.long {
        sorted.into_iter().map(long_entry).collect()
    } else {
        let names = sorted
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join("\t");
        vec![names]
    };

    if lines.iter().all(|l| l.is_empty()) {
        vec![" ".to_string()]
    } else {
        lines
    }
}

/// `ps` output: a tab-separated header plus one row per process.
pub fn process_table(rows: &[ProcessInfo]) -> Vec<String> {
    if rows.is_empty() {
        return vec!["No processes.".to_string()];
    }

    std::iter::once("PID\tSTATUS\tFILE".to_string())
        .chain(rows.iter().map(|p| {
            format!(
                "{}\t{}\t{}",
                p.id,
                p.status,
                p.file_name.as_deref().unwrap_or("")
            )
        }))
        .collect()
}

/// Timestamp in the browser's default `Date` string style,
/// e.g. `Sun Oct 18 2026 09:30:00 GMT+0200`.
pub fn format_timestamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format("%a %b %d %Y %H:%M:%S GMT%z").to_string()
}

/// Month calendar with weeks starting on Sunday.
///
/// Returns the title line, the weekday header and one line per week. Day
/// numbers are right-aligned in 2-character cells separated by one space.
/// Returns an empty vector for an invalid year/month.
pub fn calendar(year: i32, month: u32) -> Vec<String> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let Some(days) = days_in_month(first) else {
        return Vec::new();
    };
    let name = u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or_default();

    let mut lines = vec![
        format!("{} {}", name, year),
        "Su Mo Tu We Th Fr Sa".to_string(),
    ];

    let offset = first.weekday().num_days_from_sunday();
    let mut week = vec!["  "; offset as usize].join(" ");
    for day in 1..=days {
        if !week.is_empty() {
            week.push(' ');
        }
        week.push_str(&format!("{:>2}", day));
        if (offset + day) % 7 == 0 || day == days {
            lines.push(std::mem::take(&mut week));
        }
    }
    lines
}

fn days_in_month(first: NaiveDate) -> Option<u32> {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)?
    };
    Some(next.pred_opt()?.day())
}
