//! Date, date-time and time pattern formatting and parsing

use super::token::Token;
use super::TextCursor;
use crate::context::ConverterContext;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const NANOS_DIGITS: usize = 9;

pub(crate) fn format(tokens: &[Token], value: NaiveDateTime, ctx: &ConverterContext<'_>) -> String {
    let symbols = &ctx.date_time_symbols;
    let twelve_hour = tokens.iter().any(|t| matches!(t, Token::AmPm { .. }));
    let mut out = String::new();

    for token in tokens {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Year(n) if *n <= 2 => out.push_str(&format!("{:02}", value.year().rem_euclid(100))),
            Token::Year(_) => out.push_str(&format!("{:04}", value.year())),
            Token::Month(n) => match n {
                1 | 2 => push_number(&mut out, value.month(), *n),
                3 => out.push_str(symbols.month_name(value.month(), true).unwrap_or_default()),
                4 => out.push_str(symbols.month_name(value.month(), false).unwrap_or_default()),
                _ => out.extend(
                    symbols
                        .month_name(value.month(), false)
                        .and_then(|name| name.chars().next()),
                ),
            },
            Token::Day(n) if *n <= 2 => push_number(&mut out, value.day(), *n),
            Token::Day(n) => {
                let weekday = value.weekday().num_days_from_sunday();
                out.push_str(symbols.weekday_name(weekday, *n == 3).unwrap_or_default());
            }
            Token::Hour(n) => {
                let hour = if twelve_hour {
                    match value.hour() % 12 {
                        0 => 12,
                        h => h,
                    }
                } else {
                    value.hour()
                };
                push_number(&mut out, hour, *n);
            }
            Token::Minute(n) => push_number(&mut out, value.minute(), *n),
            Token::Second(n) => push_number(&mut out, value.second(), *n),
            Token::SecondFraction(n) => {
                out.push(ctx.decimal_number_symbols.decimal_separator);
                let nanos = format!("{:09}", value.nanosecond().min(999_999_999));
                out.extend(nanos.chars().take(*n));
                out.extend(std::iter::repeat('0').take(n.saturating_sub(NANOS_DIGITS)));
            }
            Token::AmPm { short, lower } => {
                let marker = symbols.am_pm(value.hour() >= 12);
                let marker: String = if *short {
                    marker.chars().take(1).collect()
                } else {
                    marker.to_string()
                };
                if *lower {
                    out.push_str(&marker.to_lowercase());
                } else {
                    out.push_str(&marker);
                }
            }
            _ => {}
        }
    }
    out
}

fn push_number(out: &mut String, value: u32, width: usize) {
    if width >= 2 {
        out.push_str(&format!("{value:02}"));
    } else {
        out.push_str(&value.to_string());
    }
}

/// Fields read from text; missing ones take the Unix epoch's value
#[derive(Debug, Default)]
struct Fields {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    nanos: Option<u32>,
    pm: Option<bool>,
}

impl Fields {
    fn build(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(
            self.year.unwrap_or(1970),
            self.month.unwrap_or(1),
            self.day.unwrap_or(1),
        )?;
        let mut hour = self.hour.unwrap_or(0);
        match self.pm {
            Some(true) if hour < 12 => hour += 12,
            Some(false) if hour == 12 => hour = 0,
            Some(_) if hour > 12 => return None,
            _ => {}
        }
        let time = NaiveTime::from_hms_nano_opt(
            hour,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.nanos.unwrap_or(0),
        )?;
        Some(date.and_time(time))
    }
}

/// Parse with the first alternative that reads all of `text` into a valid date-time
///
/// On failure returns the furthest position any alternative reached.
pub(crate) fn parse(
    alternatives: &[Vec<Token>],
    text: &str,
    ctx: &ConverterContext<'_>,
) -> Result<NaiveDateTime, usize> {
    let mut furthest = 0;
    for tokens in alternatives {
        match parse_section(tokens, text, ctx) {
            Ok(value) => return Ok(value),
            Err(position) => furthest = furthest.max(position),
        }
    }
    Err(furthest)
}

fn parse_section(tokens: &[Token], text: &str, ctx: &ConverterContext<'_>) -> Result<NaiveDateTime, usize> {
    let symbols = &ctx.date_time_symbols;
    let mut cursor = TextCursor::new(text);
    let mut fields = Fields::default();

    for token in tokens {
        let start = cursor.position();
        match token {
            Token::Literal(literal) => cursor.expect(literal)?,
            Token::Year(n) if *n <= 2 => {
                let year = number(&mut cursor, 2)? as i32;
                let pivot = i32::from(ctx.two_digit_year);
                fields.year = Some(if year < pivot { 2000 + year } else { 1900 + year });
            }
            Token::Year(_) => fields.year = Some(number(&mut cursor, 4)? as i32),
            Token::Month(n) if *n <= 2 => fields.month = Some(number(&mut cursor, 2)?),
            Token::Month(_) => {
                let names = (1..=12).flat_map(|m| {
                    [
                        symbols.month_name(m, false).map(|name| (m, name)),
                        symbols.month_name(m, true).map(|name| (m, name)),
                    ]
                });
                let month = cursor.eat_word(names.flatten()).ok_or(start)?;
                fields.month = Some(month);
            }
            Token::Day(n) if *n <= 2 => fields.day = Some(number(&mut cursor, 2)?),
            Token::Day(_) => {
                let names = (0..7).flat_map(|d| {
                    [
                        symbols.weekday_name(d, false).map(|name| (d, name)),
                        symbols.weekday_name(d, true).map(|name| (d, name)),
                    ]
                });
                cursor.eat_word(names.flatten()).ok_or(start)?;
            }
            Token::Hour(_) => fields.hour = Some(number(&mut cursor, 2)?),
            Token::Minute(_) => fields.minute = Some(number(&mut cursor, 2)?),
            Token::Second(_) => fields.second = Some(number(&mut cursor, 2)?),
            Token::SecondFraction(n) => {
                if !cursor.eat(ctx.decimal_number_symbols.decimal_separator) {
                    return Err(start);
                }
                let digits = cursor.digits_max((*n).min(NANOS_DIGITS));
                if digits.is_empty() {
                    return Err(cursor.position());
                }
                let padded = format!("{digits:0<9}");
                fields.nanos = Some(padded.parse().map_err(|_| start)?);
            }
            Token::AmPm { short, .. } => {
                let markers = [false, true].into_iter().map(|pm| {
                    let marker = symbols.am_pm(pm);
                    let marker = if *short {
                        marker.char_indices().nth(1).map_or(marker, |(end, _)| &marker[..end])
                    } else {
                        marker
                    };
                    (pm, marker)
                });
                fields.pm = Some(cursor.eat_word(markers).ok_or(start)?);
            }
            _ => return Err(start),
        }
    }

    if !cursor.is_done() {
        return Err(cursor.position());
    }
    fields.build().ok_or(cursor.position())
}

/// One to `max` digits
fn number(cursor: &mut TextCursor, max: usize) -> Result<u32, usize> {
    let start = cursor.position();
    let digits = cursor.digits_max(max);
    digits.parse().map_err(|_| start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::token::tokenize;
    use crate::pattern::SpreadsheetPatternKind;
    use pretty_assertions::assert_eq;

    fn date_time(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn fmt(pattern: &str, value: NaiveDateTime) -> String {
        let sections = tokenize(SpreadsheetPatternKind::DateTime, pattern).unwrap();
        format(&sections[0], value, &ConverterContext::simple())
    }

    fn parse_with(pattern: &str, text: &str) -> Result<NaiveDateTime, usize> {
        let sections = tokenize(SpreadsheetPatternKind::DateTime, pattern).unwrap();
        parse(&sections, text, &ConverterContext::simple())
    }

    #[test]
    fn test_format() {
        let value = date_time(2000, 12, 31, 15, 4, 5);
        assert_eq!(fmt("\\D yyyy-mm-dd", value), "D 2000-12-31");
        assert_eq!(fmt("d/m/yy", value), "31/12/00");
        assert_eq!(fmt("dddd, mmmm d", value), "Sunday, December 31");
        assert_eq!(fmt("ddd mmm", value), "Sun Dec");
        assert_eq!(fmt("mmmmm", value), "D");
        assert_eq!(fmt("h:mm AM/PM", value), "3:04 PM");
        assert_eq!(fmt("hh:mm:ss a/p", value), "03:04:05 p");
        assert_eq!(fmt("hh:mm:ss", value), "15:04:05");
    }

    #[test]
    fn test_format_fraction() {
        let value = NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_milli_opt(0, 0, 1, 250)
            .unwrap();
        assert_eq!(fmt("ss.00", value), "01.25");
        assert_eq!(fmt("h AM/PM", value), "12 AM");
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            parse_with("\\D yyyy-mm-dd", "D 2000-12-31"),
            Ok(date_time(2000, 12, 31, 0, 0, 0))
        );
        assert_eq!(
            parse_with("d mmm yyyy h:mm AM/PM", "5 jan 2001 3:30 pm"),
            Ok(date_time(2001, 1, 5, 15, 30, 0))
        );
        assert_eq!(
            parse_with("dd/mm/yy", "01/02/29"),
            Ok(date_time(2029, 2, 1, 0, 0, 0))
        );
        assert_eq!(
            parse_with("dd/mm/yy", "01/02/30"),
            Ok(date_time(1930, 2, 1, 0, 0, 0))
        );
        assert_eq!(
            parse_with("dddd mmmm d", "Monday March 6"),
            Ok(date_time(1970, 3, 6, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_alternatives() {
        assert_eq!(
            parse_with("yyyy-mm-dd;dd/mm/yyyy", "31/12/1999"),
            Ok(date_time(1999, 12, 31, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_with("yyyy-mm-dd", "2000/12/31"), Err(4));
        assert_eq!(parse_with("yyyy-mm-dd", "2000-12-31x"), Err(10));
        assert_eq!(parse_with("yyyy-mm-dd", "2000-02-30"), Err(10));
        assert_eq!(parse_with("hh:mm", "25:00"), Err(5));
    }
}
