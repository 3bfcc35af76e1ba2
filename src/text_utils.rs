use std::ops::Index;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Parses `2017-09-10T10:42:32`. A space instead of the `T` is accepted as well,
/// as most editors and the old export tool wrote both.
pub fn parse_date_time(buf: &str) -> Result<NaiveDateTime, String> {
    lazy_static! {
        static ref DATE_TIME_REGEX: Regex = Regex::new(
            r"^(\d{4})-(\d{1,2})-(\d{1,2})[T ](\d{1,2}):(\d{1,2}):(\d{1,2})$"
        ).unwrap();
    }

    let buf = buf.trim();
    let Some(caps) = DATE_TIME_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date time {}, expected YYYY-MM-DDTHH:MM:SS", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);

    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;
    let h: u32 = to_u32(caps.index(4))?;
    let mn: u32 = to_u32(caps.index(5))?;
    let s: u32 = to_u32(caps.index(6))?;

    let date = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| format!("Date out of range in {}", buf))?;
    let time = NaiveTime::from_hms_opt(h, mn, s)
        .ok_or_else(|| format!("Time out of range in {}", buf))?;

    Ok(NaiveDateTime::new(date, time))
}

pub fn format_date_time(date_time: &NaiveDateTime) -> (String, String) {
    let date = date_time.format("%Y-%m-%d").to_string();
    let time = date_time.format("%H:%M:%S").to_string();
    (date, time)
}

pub fn year_start(date_time: &NaiveDateTime) -> NaiveDate {
    // January 1st exists for every year chrono can represent
    NaiveDate::from_ymd_opt(date_time.year(), 1, 1).unwrap_or(date_time.date())
}

pub fn month_start(date_time: &NaiveDateTime) -> NaiveDate {
    date_time.date().with_day(1).unwrap_or(date_time.date())
}

/// Turns a title into something usable in an address: ascii, lowercase, words
/// joined by `-`.
pub fn slugify(title: &str) -> String {
    let ascii = unidecode::unidecode(title);
    let mut slug = String::with_capacity(ascii.len());
    let mut prev_dash = true;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_time() {
        let date_time = parse_date_time("2017-09-10T10:42:32").unwrap();
        let (date, time) = format_date_time(&date_time);
        assert_eq!(date, "2017-09-10");
        assert_eq!(time, "10:42:32");

        let date_time = parse_date_time("2017-09-10 10:42:32").unwrap();
        let (date, time) = format_date_time(&date_time);
        assert_eq!(date, "2017-09-10");
        assert_eq!(time, "10:42:32");
    }

    #[test]
    fn test_parse_invalid_date_time() {
        assert!(parse_date_time("2017-09-10").is_err());
        assert!(parse_date_time("yesterday").is_err());
        assert!(parse_date_time("2017-13-10T10:42:32").is_err());
        assert!(parse_date_time("2017-02-10T25:42:32").is_err());
    }

    #[test]
    fn test_period_starts() {
        let date_time = parse_date_time("2020-06-15T08:30:00").unwrap();
        assert_eq!(year_start(&date_time), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(month_start(&date_time), NaiveDate::from_ymd_opt(2020, 6, 1).unwrap());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Post title of mine ábaco - dir2"), "post-title-of-mine-abaco-dir2");
        assert_eq!(slugify("  Hello, World!  "), "hello-world");
        assert_eq!(slugify("???"), "");
    }
}
