//! Localized `strftime` over `chrono` date values.
//!
//! Day, month and meridian names come from the catalog (`date.day_names`,
//! `date.abbr_day_names`, `date.month_names`, `date.abbr_month_names`,
//! `time.am`, `time.pm`). Calendar arithmetic is left to `chrono`.

use chrono::{Datelike, Timelike, Weekday};

const DAY_KEYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

const MONTH_KEYS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

fn day_key(weekday: Weekday) -> &'static str {
    DAY_KEYS[weekday.num_days_from_sunday() as usize]
}

fn month_key(month: u32) -> &'static str {
    MONTH_KEYS[(month.clamp(1, 12) - 1) as usize]
}

/// Format `date` with `format`, resolving names through `name`.
///
/// Supported directives: `%a %A %b %B %d %e %H %I %m %M %p %P %S %y %Y %j %%`.
/// A `-` flag (e.g. `%-d`) drops zero padding. Unknown directives are kept
/// verbatim.
pub fn strftime<D, F>(date: &D, format: &str, mut name: F) -> String
where
    D: Datelike + Timelike,
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let unpadded = chars.next_if_eq(&'-').is_some();
        let Some(directive) = chars.next() else {
            out.push('%');
            if unpadded {
                out.push('-');
            }
            break;
        };

        let number = |value: u32, width: usize| {
            if unpadded {
                value.to_string()
            } else {
                format!("{:0width$}", value, width = width)
            }
        };

        let hour12 = match date.hour() % 12 {
            0 => 12,
            h => h,
        };

        match directive {
            'a' => out.push_str(&name(&format!("date.abbr_day_names.{}", day_key(date.weekday())))),
            'A' => out.push_str(&name(&format!("date.day_names.{}", day_key(date.weekday())))),
            'b' => out.push_str(&name(&format!("date.abbr_month_names.{}", month_key(date.month())))),
            'B' => out.push_str(&name(&format!("date.month_names.{}", month_key(date.month())))),
            'd' => out.push_str(&number(date.day(), 2)),
            'e' => out.push_str(&format!("{:>2}", date.day())),
            'H' => out.push_str(&number(date.hour(), 2)),
            'I' => out.push_str(&number(hour12, 2)),
            'j' => out.push_str(&number(date.ordinal(), 3)),
            'm' => out.push_str(&number(date.month(), 2)),
            'M' => out.push_str(&number(date.minute(), 2)),
            'S' => out.push_str(&number(date.second(), 2)),
            'p' => {
                let meridian = if date.hour() < 12 { "time.am" } else { "time.pm" };
                out.push_str(&name(meridian).to_uppercase());
            }
            'P' => {
                let meridian = if date.hour() < 12 { "time.am" } else { "time.pm" };
                out.push_str(&name(meridian).to_lowercase());
            }
            'y' => out.push_str(&number(date.year().rem_euclid(100) as u32, 2)),
            'Y' => out.push_str(&date.year().to_string()),
            '%' => out.push('%'),
            other => {
                out.push('%');
                if unpadded {
                    out.push('-');
                }
                out.push(other);
            }
        }
    }

    out
}
