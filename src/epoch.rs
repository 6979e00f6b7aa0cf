//! Timestamp parsing for the overflight, satellite and wind files.
//!
//! All three files carry naive UTC clocks (no leap second information).
//! Timestamps are built from their calendar fields so that identical
//! overflights compare equal across files.
use hifitime::{Duration, Epoch, TimeScale};
use thiserror::Error;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Largest offset accepted from J2000, about 3000 years
const MAX_J2000_SECONDS: f64 = 1.0E11;

/// Length of the "year" used on the trend axis, in seconds.
pub const YEAR_SECONDS: f64 = 3600.0 * 24.0 * 365.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("expecting \"yyyy-mm-dd hh:mm:ss.ffffff\", got \"{0}\"")]
    IsoFormat(String),
    #[error("expecting \"dd-Mon-yyyy hh:mm:ss.ffffff\", got \"{0}\"")]
    DayMonthFormat(String),
    #[error("unknown month \"{0}\"")]
    MonthName(String),
    #[error("failed to parse {field} from \"{content}\"")]
    Field {
        field: &'static str,
        content: String,
    },
    #[error("invalid calendar date {0:04}-{1:02}-{2:02} {3:02}:{4:02}:{5:02}")]
    Calendar(i32, u8, u8, u8, u8, u8),
    #[error("seconds since J2000 are not finite: \"{0}\"")]
    NonFiniteSeconds(String),
    #[error("seconds since J2000 out of range: \"{0}\"")]
    J2000Range(String),
}

fn field<T: std::str::FromStr>(field: &'static str, content: &str) -> Result<T, ParsingError> {
    content.trim().parse::<T>().map_err(|_| ParsingError::Field {
        field,
        content: content.to_string(),
    })
}

/// Builds a UTC [Epoch] from calendar fields, without panicking
/// on invalid content.
pub fn calendar(
    y: i32,
    m: u8,
    d: u8,
    hh: u8,
    mm: u8,
    ss: u8,
    ns: u32,
) -> Result<Epoch, ParsingError> {
    if !(1..=12).contains(&m) || d == 0 || d > 31 || hh > 23 || mm > 59 || ss > 60 {
        return Err(ParsingError::Calendar(y, m, d, hh, mm, ss));
    }
    Epoch::maybe_from_gregorian(y, m, d, hh, mm, ss, ns, TimeScale::UTC)
        .map_err(|_| ParsingError::Calendar(y, m, d, hh, mm, ss))
}

/*
 * Parses "hh:mm:ss[.ffffff]" into (hh, mm, ss, nanos)
 */
fn parse_clock(content: &str) -> Option<(u8, u8, u8, u32)> {
    let mut items = content.trim().split(':');
    let hh = items.next()?.parse::<u8>().ok()?;
    let mm = items.next()?.parse::<u8>().ok()?;
    let secs = items.next()?;
    if items.next().is_some() {
        return None;
    }
    let (ss, ns) = match secs.split_once('.') {
        Some((ss, frac)) => (ss.parse::<u8>().ok()?, parse_fraction(frac)?),
        None => (secs.parse::<u8>().ok()?, 0),
    };
    Some((hh, mm, ss, ns))
}

/*
 * Fraction of second, up to nanosecond resolution ("%f" style)
 */
fn parse_fraction(frac: &str) -> Option<u32> {
    if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = frac.parse::<u32>().ok()?;
    Some(digits * 10_u32.pow(9 - frac.len() as u32))
}

/// Parses "yyyy-mm-dd hh:mm:ss[.ffffff]", as found in the overflight CSV.
/// A 'T' separator is tolerated.
pub fn parse_iso(content: &str) -> Result<Epoch, ParsingError> {
    let content = content.trim();
    let err = || ParsingError::IsoFormat(content.to_string());

    let (date, clock) = content
        .split_once(|c: char| c == ' ' || c == 'T')
        .ok_or_else(err)?;

    let mut items = date.split('-');
    let y = items.next().ok_or_else(err)?;
    let m = items.next().ok_or_else(err)?;
    let d = items.next().ok_or_else(err)?;
    if items.next().is_some() {
        return Err(err());
    }

    let y = field::<i32>("year", y)?;
    let m = field::<u8>("month", m)?;
    let d = field::<u8>("day", d)?;
    let (hh, mm, ss, ns) = parse_clock(clock).ok_or_else(err)?;
    calendar(y, m, d, hh, mm, ss, ns)
}

/// Parses "dd-Mon-yyyy" + "hh:mm:ss[.ffffff]" tokens,
/// as found in the Harvest satellite pass files.
pub fn parse_day_month(date: &str, clock: &str) -> Result<Epoch, ParsingError> {
    let err = || ParsingError::DayMonthFormat(format!("{} {}", date, clock));

    let mut items = date.trim().split('-');
    let d = items.next().ok_or_else(err)?;
    let month = items.next().ok_or_else(err)?;
    let y = items.next().ok_or_else(err)?;
    if items.next().is_some() {
        return Err(err());
    }

    let m = MONTHS
        .iter()
        .position(|name| month.to_ascii_lowercase().starts_with(name))
        .ok_or_else(|| ParsingError::MonthName(month.to_string()))?;

    let d = field::<u8>("day", d)?;
    let y = field::<i32>("year", y)?;
    let (hh, mm, ss, ns) = parse_clock(clock).ok_or_else(err)?;
    calendar(y, m as u8 + 1, d, hh, mm, ss, ns)
}

/// Interprets given content as seconds elapsed since 2000-01-01T12:00:00.
/// The offset is applied on the naive calendar and rounded to the microsecond,
/// which is the overflight CSV resolution.
pub fn parse_j2000_seconds(content: &str) -> Result<Epoch, ParsingError> {
    let secs = field::<f64>("seconds since J2000", content)?;
    if !secs.is_finite() {
        return Err(ParsingError::NonFiniteSeconds(content.to_string()));
    }
    if secs.abs() > MAX_J2000_SECONDS {
        return Err(ParsingError::J2000Range(content.to_string()));
    }
    let offset = Duration::from_seconds(secs).round(Duration::from_microseconds(1.0));
    Ok(j2000_reference() + offset)
}

/// Satellite pass time: numeric form is tried first, then the
/// textual (date + clock) form.
/// Returns the [Epoch] and the number of whitespace tokens consumed.
pub fn parse_pass_time(tokens: &[&str]) -> Result<(Epoch, usize), ParsingError> {
    let first = tokens.first().copied().unwrap_or_default();
    if let Ok(epoch) = parse_j2000_seconds(first) {
        return Ok((epoch, 1));
    }
    let second = tokens.get(1).copied().unwrap_or_default();
    if first.contains('-') && first.len() >= 10 && first.as_bytes()[4] == b'-' {
        let epoch = parse_iso(&format!("{} {}", first, second))?;
        return Ok((epoch, 2));
    }
    let epoch = parse_day_month(first, second)?;
    Ok((epoch, 2))
}

/// 2000-01-01T12:00:00 UTC
fn j2000_reference() -> Epoch {
    Epoch::from_gregorian_utc(2000, 1, 1, 12, 0, 0, 0)
}

/// Reference instant of the trend axis: 2016-01-01T00:00:00
pub fn trend_reference() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2016, 1, 1)
}

/// Elapsed time between `reference` and `t`, expressed in
/// 365 day years.
pub fn decimal_years(t: Epoch, reference: Epoch) -> f64 {
    (t - reference).to_seconds() / YEAR_SECONDS
}

/// Elapsed seconds between `pivot` and `t`
pub fn seconds_from(t: Epoch, pivot: Epoch) -> f64 {
    (t - pivot).to_seconds()
}

/// Formats given [Epoch] the way the overflight CSV does
pub fn format(t: Epoch) -> String {
    let (y, m, d, hh, mm, ss, ns) = t.to_gregorian_utc();
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}",
        y,
        m,
        d,
        hh,
        mm,
        ss,
        ns / 1000
    )
}

/// Two hours, the half width of the wind smoothing window
pub fn two_hours() -> Duration {
    Duration::from_seconds(2.0 * 3600.0)
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn iso_overflight_timestamps() {
        let e = parse_iso("2017-03-04 05:06:07.250000").unwrap();
        assert_eq!(e.to_gregorian_utc(), (2017, 3, 4, 5, 6, 7, 250_000_000));

        let e = parse_iso("2017-03-04 05:06:07").unwrap();
        assert_eq!(e.to_gregorian_utc(), (2017, 3, 4, 5, 6, 7, 0));

        let e = parse_iso("2017-03-04T05:06:07.5").unwrap();
        assert_eq!(e.to_gregorian_utc(), (2017, 3, 4, 5, 6, 7, 500_000_000));

        assert!(parse_iso("2017-03-04").is_err());
        assert!(parse_iso("2017/03/04 05:06:07").is_err());
        assert!(parse_iso("2017-13-04 05:06:07").is_err());
        assert!(parse_iso("not a date").is_err());
    }
    #[test]
    fn day_month_timestamps() {
        let e = parse_day_month("17-Feb-2018", "11:22:33.000001").unwrap();
        assert_eq!(e.to_gregorian_utc(), (2018, 2, 17, 11, 22, 33, 1000));

        let e = parse_day_month("01-DEC-2016", "00:00:00").unwrap();
        assert_eq!(e.to_gregorian_utc(), (2016, 12, 1, 0, 0, 0, 0));

        assert_eq!(
            parse_day_month("01-Foo-2016", "00:00:00"),
            Err(ParsingError::MonthName("Foo".to_string()))
        );
    }
    #[test]
    fn j2000_seconds() {
        let e = parse_j2000_seconds("0").unwrap();
        assert_eq!(e.to_gregorian_utc(), (2000, 1, 1, 12, 0, 0, 0));

        let e = parse_j2000_seconds("-43200.0").unwrap();
        assert_eq!(e.to_gregorian_utc(), (2000, 1, 1, 0, 0, 0, 0));

        // 2016-01-01T00:00:00 is 5843.5 days after J2000
        let e = parse_j2000_seconds("504878400.000001").unwrap();
        assert_eq!(e.to_gregorian_utc(), (2016, 1, 1, 0, 0, 0, 1000));

        // leap years & leap seconds have no impact on the naive calendar
        let e = parse_j2000_seconds("536500800.5").unwrap();
        assert_eq!(e.to_gregorian_utc(), (2017, 1, 1, 0, 0, 0, 500_000_000));

        assert_eq!(
            parse_j2000_seconds("1e13"),
            Err(ParsingError::J2000Range("1e13".to_string()))
        );
        assert_eq!(
            parse_j2000_seconds("-1e300"),
            Err(ParsingError::J2000Range("-1e300".to_string()))
        );
        assert!(parse_j2000_seconds("NaN").is_err());
        assert!(parse_j2000_seconds("17-Feb-2018").is_err());
    }
    #[test]
    fn pass_time_fallback() {
        let (e, consumed) = parse_pass_time(&["536500800", "1.0", "2.0"]).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(e.to_gregorian_utc(), (2017, 1, 1, 0, 0, 0, 0));

        let (e, consumed) = parse_pass_time(&["01-Jan-2017", "00:00:00.000000", "1.0"]).unwrap();
        assert_eq!(consumed, 2);
        assert_eq!(e.to_gregorian_utc(), (2017, 1, 1, 0, 0, 0, 0));

        let (e, consumed) = parse_pass_time(&["2017-01-01", "00:00:00.000000", "1.0"]).unwrap();
        assert_eq!(consumed, 2);
        assert_eq!(e.to_gregorian_utc(), (2017, 1, 1, 0, 0, 0, 0));

        assert!(parse_pass_time(&["garbage", "1.0"]).is_err());
        assert!(parse_pass_time(&[]).is_err());
    }
    #[test]
    fn trend_axis() {
        let reference = trend_reference();
        let t = parse_iso("2017-01-01 00:00:00").unwrap();
        // 2016 is a leap year
        assert_eq!(seconds_from(t, reference), 31_622_400.0);
        assert_eq!(decimal_years(t, reference), 366.0 / 365.0);
        assert_eq!(format(t), "2017-01-01 00:00:00.000000");
    }
}
