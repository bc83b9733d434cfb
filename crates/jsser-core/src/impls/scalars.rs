//! Descriptors for primitive and text-like types.

use crate::descriptor::{
    Def, Describe, PrimitiveDef, PrimitiveKind, TextDef, TextKind, TypeDescriptor,
};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use std::any::Any;
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

/// `Display` as the text form.
fn format_display<T: Display + Any>(value: &dyn Any) -> Option<String> {
    value.downcast_ref::<T>().map(ToString::to_string)
}

/// `FromStr` as the parse capability.
fn parse_from_str<T>(text: &str) -> Result<Box<dyn Any>, String>
where
    T: FromStr + Any,
    T::Err: Display,
{
    text.parse::<T>()
        .map(|v| Box::new(v) as Box<dyn Any>)
        .map_err(|e| e.to_string())
}

macro_rules! describe_integers {
    ($($ty:ty),* $(,)?) => {$(
        impl Describe for $ty {
            const DESCRIPTOR: &'static TypeDescriptor =
                &TypeDescriptor::new::<$ty>(Def::Primitive(PrimitiveDef {
                    kind: PrimitiveKind::Integer,
                    format: format_display::<$ty>,
                    parse: parse_from_str::<$ty>,
                }));
        }
    )*};
}

describe_integers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Describe for bool {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<bool>(Def::Primitive(PrimitiveDef {
            kind: PrimitiveKind::Bool,
            format: format_display::<bool>,
            parse: parse_from_str::<bool>,
        }));
}

impl Describe for f64 {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<f64>(Def::Primitive(PrimitiveDef {
            kind: PrimitiveKind::Floating,
            format: format_f64,
            parse: parse_from_str::<f64>,
        }));
}

impl Describe for f32 {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<f32>(Def::Primitive(PrimitiveDef {
            kind: PrimitiveKind::Floating,
            format: format_f32,
            parse: parse_from_str::<f32>,
        }));
}

/// Exact decimal; written with its full scale, no rounding.
impl Describe for Decimal {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<Decimal>(Def::Primitive(PrimitiveDef {
            kind: PrimitiveKind::Floating,
            format: format_display::<Decimal>,
            parse: parse_from_str::<Decimal>,
        }));
}

impl Describe for char {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<char>(Def::Primitive(PrimitiveDef {
            kind: PrimitiveKind::Char,
            format: format_display::<char>,
            parse: parse_from_str::<char>,
        }));
}

impl Describe for String {
    const DESCRIPTOR: &'static TypeDescriptor = &TypeDescriptor::new::<String>(Def::TextLike(TextDef {
        kind: TextKind::String,
        format: format_display::<String>,
        parse: parse_from_str::<String>,
    }));
}

impl Describe for Uuid {
    const DESCRIPTOR: &'static TypeDescriptor = &TypeDescriptor::new::<Uuid>(Def::TextLike(TextDef {
        kind: TextKind::Uuid,
        format: format_display::<Uuid>,
        parse: parse_from_str::<Uuid>,
    }));
}

impl Describe for TimeDelta {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<TimeDelta>(Def::TextLike(TextDef {
            kind: TextKind::Duration,
            format: |value| value.downcast_ref::<TimeDelta>().map(format_duration),
            parse: |text| parse_duration(text).map(|d| Box::new(d) as Box<dyn Any>),
        }));
}

impl Describe for DateTime<Utc> {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<DateTime<Utc>>(Def::TextLike(TextDef {
            kind: TextKind::Instant,
            format: |value| value.downcast_ref::<DateTime<Utc>>().map(format_instant),
            parse: |text| parse_instant(text).map(|d| Box::new(d) as Box<dyn Any>),
        }));
}

impl Describe for DateTime<FixedOffset> {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<DateTime<FixedOffset>>(Def::TextLike(TextDef {
            kind: TextKind::Instant,
            format: |value| {
                value
                    .downcast_ref::<DateTime<FixedOffset>>()
                    .map(|d| format_instant(&d.with_timezone(&Utc)))
            },
            parse: |text| parse_instant(text).map(|d| Box::new(d.fixed_offset()) as Box<dyn Any>),
        }));
}

/// Offset-less timestamps are taken to be UTC.
impl Describe for NaiveDateTime {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<NaiveDateTime>(Def::TextLike(TextDef {
            kind: TextKind::Instant,
            format: |value| {
                value
                    .downcast_ref::<NaiveDateTime>()
                    .map(|d| format_instant(&d.and_utc()))
            },
            parse: |text| parse_instant(text).map(|d| Box::new(d.naive_utc()) as Box<dyn Any>),
        }));
}

/// General numeric format with 15 significant digits.
fn format_f64(value: &dyn Any) -> Option<String> {
    value.downcast_ref::<f64>().map(|v| format_general(*v, 15))
}

/// General numeric format with 7 significant digits.
fn format_f32(value: &dyn Any) -> Option<String> {
    value
        .downcast_ref::<f32>()
        .map(|v| format_general(f64::from(*v), 7))
}

/// Round to `precision` significant digits and print the shortest decimal
/// form. Scientific notation (`1.5E+20`) is used only when the decimal
/// exponent is below -5 or at least `precision`.
pub(crate) fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // `{:.Ne}` rounds to N+1 significant digits and carries into the exponent.
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((&sci, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let negative = mantissa.starts_with('-');
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };

    let mut out = String::new();
    if negative {
        out.push('-');
    }

    if exponent < -5 || exponent >= precision as i32 {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        out.push_str(&format!("E{sign}{:02}", exponent.abs()));
    } else if exponent >= 0 {
        let int_len = exponent as usize + 1;
        if digits.len() <= int_len {
            out.push_str(digits);
            out.push_str(&"0".repeat(int_len - digits.len()));
        } else {
            out.push_str(&digits[..int_len]);
            out.push('.');
            out.push_str(&digits[int_len..]);
        }
    } else {
        out.push_str("0.");
        out.push_str(&"0".repeat((-exponent - 1) as usize));
        out.push_str(digits);
    }
    out
}

const MILLIS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// `yyyy-MM-ddTHH:mm:ss.fffZ`, always UTC.
pub(crate) fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.format(MILLIS_FORMAT).to_string()
}

/// RFC 3339, or an offset-less timestamp / bare date read as UTC.
pub(crate) fn parse_instant(text: &str) -> Result<DateTime<Utc>, String> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("expected an ISO 8601 timestamp, got {text:?}"))
}

const SECONDS_PER_DAY: i64 = 86_400;

/// `[-][d.]hh:mm:ss[.fffffff]`. Seven fraction digits (100 ns ticks)
/// unless the value has finer precision, then nine.
pub(crate) fn format_duration(duration: &TimeDelta) -> String {
    let negative = *duration < TimeDelta::zero();
    let magnitude = if negative { -*duration } else { *duration };
    let total = magnitude.num_seconds();
    let nanos = magnitude.subsec_nanos();

    let days = total / SECONDS_PER_DAY;
    let hours = (total / 3600) % 24;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0 {
        out.push_str(&format!("{days}."));
    }
    out.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));
    if nanos > 0 {
        if nanos % 100 == 0 {
            out.push_str(&format!(".{:07}", nanos / 100));
        } else {
            out.push_str(&format!(".{nanos:09}"));
        }
    }
    out
}

/// Accepts `d`, `hh:mm`, `hh:mm:ss`, `d.hh:mm:ss` with an optional sign
/// and 1-9 fraction digits on the seconds.
pub(crate) fn parse_duration(text: &str) -> Result<TimeDelta, String> {
    let invalid = || format!("expected [-][d.]hh:mm[:ss[.fffffff]], got {text:?}");
    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let number = |s: &str| -> Result<i64, String> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        s.parse::<i64>().map_err(|_| invalid())
    };

    let (days, clock) = match body.split_once(':') {
        None => (number(body)?, None),
        Some((head, _)) => match head.split_once('.') {
            Some((days, _)) => (number(days)?, Some(&body[days.len() + 1..])),
            None => (0, Some(body)),
        },
    };

    let mut seconds_total = days
        .checked_mul(SECONDS_PER_DAY)
        .ok_or_else(invalid)?;
    let mut nanos: i64 = 0;

    if let Some(clock) = clock {
        let parts: Vec<&str> = clock.split(':').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(invalid());
        }
        let hours = number(parts[0])?;
        let minutes = number(parts[1])?;
        let seconds = match parts.get(2) {
            None => 0,
            Some(secs) => {
                let (whole, fraction) = match secs.split_once('.') {
                    Some((whole, fraction)) => (whole, Some(fraction)),
                    None => (*secs, None),
                };
                if let Some(fraction) = fraction {
                    if fraction.len() > 9 {
                        return Err(invalid());
                    }
                    let padded = format!("{fraction:0<9}");
                    nanos = number(&padded)?;
                }
                number(whole)?
            }
        };
        if hours > 23 || minutes > 59 || seconds > 59 {
            return Err(invalid());
        }
        seconds_total = seconds_total
            .checked_add(hours * 3600 + minutes * 60 + seconds)
            .ok_or_else(invalid)?;
    }

    let duration = TimeDelta::try_seconds(seconds_total)
        .and_then(|d| d.checked_add(&TimeDelta::nanoseconds(nanos)))
        .ok_or_else(invalid)?;
    Ok(if negative { -duration } else { duration })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_format_matches_reference_digits() {
        assert_eq!(format_general(std::f64::consts::PI, 15), "3.14159265358979");
        assert_eq!(format_general(128.25, 15), "128.25");
        assert_eq!(format_general(1278.72364, 15), "1278.72364");
        assert_eq!(format_general(100.0, 15), "100");
        assert_eq!(format_general(-0.5, 15), "-0.5");
        assert_eq!(format_general(0.0001, 15), "0.0001");
        assert_eq!(format_general(-0.0, 15), "0");
    }

    #[test]
    fn general_format_switches_to_exponent_at_extremes() {
        assert_eq!(format_general(1.5e20, 15), "1.5E+20");
        assert_eq!(format_general(1e-7, 15), "1E-07");
        assert_eq!(format_general(1e15, 15), "1E+15");
        assert_eq!(format_general(1e14, 15), "100000000000000");
    }

    #[test]
    fn general_format_f32_uses_seven_digits() {
        assert_eq!(format_general(f64::from(128.25f32), 7), "128.25");
        assert_eq!(format_general(f64::from(0.1f32), 7), "0.1");
    }

    #[test]
    fn general_format_non_finite() {
        assert_eq!(format_general(f64::NAN, 15), "NaN");
        assert_eq!(format_general(f64::INFINITY, 15), "Infinity");
        assert_eq!(format_general(f64::NEG_INFINITY, 15), "-Infinity");
    }

    #[test]
    fn duration_format() {
        assert_eq!(format_duration(&TimeDelta::minutes(144)), "02:24:00");
        assert_eq!(format_duration(&TimeDelta::hours(50)), "2.02:00:00");
        assert_eq!(format_duration(&TimeDelta::milliseconds(-1500)), "-00:00:01.5000000");
        assert_eq!(format_duration(&TimeDelta::nanoseconds(5)), "00:00:00.000000005");
    }

    #[test]
    fn duration_parse() {
        let expected = TimeDelta::hours(8) + TimeDelta::minutes(12) + TimeDelta::seconds(45);
        assert_eq!(parse_duration("08:12:45").unwrap(), expected);
        assert_eq!(parse_duration("3").unwrap(), TimeDelta::days(3));
        assert_eq!(parse_duration("01:30").unwrap(), TimeDelta::minutes(90));
        assert_eq!(
            parse_duration("1.00:00:00.25").unwrap(),
            TimeDelta::days(1) + TimeDelta::milliseconds(250)
        );
        assert_eq!(parse_duration("-00:00:01.5000000").unwrap(), TimeDelta::milliseconds(-1500));
        assert!(parse_duration("25:00:00").is_err());
        assert!(parse_duration("ab:cd").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn duration_parse_rejects_overflow() {
        assert!(parse_duration("106751991167300.23:59:59").is_err());
        assert!(parse_duration("-106751991167300.23:59:59").is_err());
        assert!(parse_duration("99999999999999999999").is_err());
    }

    #[test]
    fn instant_parse_accepts_offsets_and_naive_text() {
        let utc = parse_instant("2015-03-28T00:00:00.000Z").unwrap();
        assert_eq!(format_instant(&utc), "2015-03-28T00:00:00.000Z");
        let shifted = parse_instant("2015-03-28T02:00:00+02:00").unwrap();
        assert_eq!(shifted, utc);
        assert_eq!(parse_instant("2015-03-28T00:00:00").unwrap(), utc);
        assert_eq!(parse_instant("2015-03-28").unwrap(), utc);
        assert!(parse_instant("yesterday").is_err());
    }

    #[test]
    fn fixed_offset_instant_accepts_naive_text() {
        let Def::TextLike(def) = DateTime::<FixedOffset>::DESCRIPTOR.def() else {
            panic!("instant should be text-like");
        };
        for text in ["2015-03-28T00:00:00", "2015-03-28", "2015-03-28T02:00:00+02:00"] {
            let parsed = (def.parse)(text).unwrap();
            let instant = parsed.downcast_ref::<DateTime<FixedOffset>>().unwrap();
            assert_eq!(format_instant(&instant.with_timezone(&Utc)), "2015-03-28T00:00:00.000Z");
        }
    }

    #[test]
    fn decimal_keeps_exact_digits() {
        let Def::Primitive(def) = Decimal::DESCRIPTOR.def() else {
            panic!("decimal should be primitive");
        };
        assert_eq!(def.kind, PrimitiveKind::Floating);
        let value = Decimal::new(12825, 2);
        assert_eq!((def.format)(&value).unwrap(), "128.25");
        let parsed = (def.parse)("1278.72364").unwrap();
        assert_eq!(parsed.downcast_ref::<Decimal>(), Some(&Decimal::new(127872364, 5)));
    }
}
