//! Number pattern formatting and parsing

use super::token::{Placeholder, Token};
use super::TextCursor;
use crate::context::ConverterContext;
use crate::error::ConvertError;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

const THOUSAND: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);
const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Most digits a `Decimal` keeps after the point
const MAX_SCALE: i64 = 28;

/// Format with the section matching the sign of `value`
///
/// One section covers every value. With two, the second is for negative values and
/// shows no sign of its own; a third is for zero.
pub(crate) fn format(
    sections: &[Vec<Token>],
    value: Decimal,
    ctx: &ConverterContext<'_>,
) -> Result<String, ConvertError> {
    let negative = value.is_sign_negative() && !value.is_zero();
    let (section, value, signed) = match sections {
        [first] => (first, value, true),
        [_, _, zero, ..] if value.is_zero() => (zero, value, false),
        [_, negative_section, ..] if negative => (negative_section, value.abs(), false),
        [first, ..] => (first, value, true),
        [] => return Ok(general(value, ctx)),
    };
    format_section(section, value, signed, ctx)
}

/// Plain decimal rendering used by `General`
pub(crate) fn general(value: Decimal, ctx: &ConverterContext<'_>) -> String {
    localize(&value.normalize().to_string(), ctx)
}

pub(crate) fn localize(text: &str, ctx: &ConverterContext<'_>) -> String {
    let symbols = &ctx.decimal_number_symbols;
    text.chars()
        .map(|c| match c {
            '.' => symbols.decimal_separator,
            '-' => symbols.negative_sign,
            other => other,
        })
        .collect()
}

/// Where each digit placeholder of a section belongs
#[derive(Default)]
struct Layout {
    integer: usize,
    fraction: usize,
    exponent: usize,
    grouping: bool,
    scale: usize,
    percent: usize,
}

impl Layout {
    fn of(tokens: &[Token]) -> Self {
        let mut layout = Layout::default();
        let mut part = 0;
        let mut pending_groups = 0;
        for token in tokens {
            match token {
                Token::DecimalPoint => part = part.max(1),
                Token::Exponent { .. } => part = 2,
                Token::Percent => layout.percent += 1,
                Token::Group if part == 0 => pending_groups += 1,
                Token::Digit(_) => match part {
                    0 => {
                        if pending_groups > 0 && layout.integer > 0 {
                            layout.grouping = true;
                        }
                        pending_groups = 0;
                        layout.integer += 1;
                    }
                    1 => layout.fraction += 1,
                    _ => layout.exponent += 1,
                },
                _ => {}
            }
            if part > 0 && pending_groups > 0 {
                layout.scale += pending_groups;
                pending_groups = 0;
            }
        }
        layout.scale += pending_groups;
        layout
    }
}

fn format_section(
    tokens: &[Token],
    value: Decimal,
    signed: bool,
    ctx: &ConverterContext<'_>,
) -> Result<String, ConvertError> {
    let symbols = &ctx.decimal_number_symbols;
    let layout = Layout::of(tokens);
    let out_of_range = || ConvertError::failed(format!("Number {value} is out of range for formatting"));

    let mut magnitude = value.abs();
    for _ in 0..layout.percent {
        magnitude = magnitude.checked_mul(HUNDRED).ok_or_else(out_of_range)?;
    }
    for _ in 0..layout.scale {
        magnitude /= THOUSAND;
    }

    let has_exponent = tokens.iter().any(|t| matches!(t, Token::Exponent { .. }));
    let (mantissa, exponent) = if has_exponent {
        scientific(magnitude, layout.integer.max(1), layout.fraction as u32, ctx.rounding)
            .ok_or_else(out_of_range)?
    } else {
        (
            magnitude.round_dp_with_strategy(layout.fraction as u32, ctx.rounding),
            0,
        )
    };

    let integer_digits: Vec<char> = match mantissa.trunc().to_string() {
        zero if zero == "0" => Vec::new(),
        digits => digits.chars().collect(),
    };
    let fraction_digits: Vec<char> = fraction_digits(mantissa, layout.fraction);
    let exponent_digits: Vec<char> = exponent.unsigned_abs().to_string().chars().collect();

    let mut out = String::new();
    let shown = if tokens.contains(&Token::General) { value } else { mantissa };
    let negative = signed && value.is_sign_negative() && !shown.is_zero();
    if negative {
        out.push(symbols.negative_sign);
    }

    let mut part = 0;
    let (mut integer_index, mut fraction_index, mut exponent_index) = (0, 0, 0);
    for token in tokens {
        match token {
            Token::General => out.push_str(&general(value.abs(), ctx)),
            Token::Literal(text) => out.push_str(text),
            Token::DecimalPoint => {
                part = part.max(1);
                out.push(symbols.decimal_separator);
            }
            Token::Percent => out.push(symbols.percent_symbol),
            Token::Exponent { plus } => {
                part = 2;
                out.push('E');
                if exponent < 0 {
                    out.push(symbols.negative_sign);
                } else if *plus {
                    out.push(symbols.positive_sign);
                }
            }
            Token::Digit(placeholder) => match part {
                0 => {
                    if layout.grouping {
                        if integer_index == 0 {
                            out.push_str(&grouped(&integer_digits, tokens, ctx));
                        }
                    } else {
                        push_integer_digit(
                            &mut out,
                            &integer_digits,
                            integer_index,
                            layout.integer,
                            *placeholder,
                        );
                    }
                    integer_index += 1;
                }
                1 => {
                    let rest = &fraction_digits[fraction_index..];
                    if *placeholder == Placeholder::Zero || rest.iter().any(|d| *d != '0') {
                        out.push(rest[0]);
                    } else if let Some(blank) = placeholder.blank() {
                        out.push(blank);
                    }
                    fraction_index += 1;
                }
                _ => {
                    push_integer_digit(
                        &mut out,
                        &exponent_digits,
                        exponent_index,
                        layout.exponent,
                        *placeholder,
                    );
                    exponent_index += 1;
                }
            },
            _ => {}
        }
    }
    Ok(out)
}

/// Right-align `digits` over `count` placeholders; the first placeholder also takes overflow
fn push_integer_digit(
    out: &mut String,
    digits: &[char],
    index: usize,
    count: usize,
    placeholder: Placeholder,
) {
    let offset = index as isize + digits.len() as isize - count as isize;
    if index == 0 && offset > 0 {
        out.extend(&digits[..offset as usize]);
    }
    if offset >= 0 {
        out.push(digits[offset as usize]);
    } else if let Some(blank) = placeholder.blank() {
        out.push(blank);
    }
}

/// Integer part padded by the `0` placeholders, with group separators
fn grouped(digits: &[char], tokens: &[Token], ctx: &ConverterContext<'_>) -> String {
    let integer_tokens = tokens
        .iter()
        .take_while(|t| !matches!(t, Token::DecimalPoint | Token::Exponent { .. }));
    let zeros = integer_tokens
        .filter(|t| matches!(t, Token::Digit(Placeholder::Zero)))
        .count();
    let mut padded: Vec<char> = vec!['0'; zeros.saturating_sub(digits.len())];
    padded.extend_from_slice(digits);

    let mut out = String::new();
    for (i, digit) in padded.iter().enumerate() {
        if i > 0 && (padded.len() - i) % 3 == 0 {
            out.push(ctx.decimal_number_symbols.group_separator);
        }
        out.push(*digit);
    }
    out
}

/// The first `count` fraction digits, zero padded
fn fraction_digits(value: Decimal, count: usize) -> Vec<char> {
    let text = value.fract().abs().to_string();
    let mut digits: Vec<char> = text
        .split_once('.')
        .map(|(_, f)| f.chars().collect())
        .unwrap_or_default();
    digits.resize(count, '0');
    digits
}

/// Split into a mantissa with `integer_digits` digits before the point and a power of ten
fn scientific(
    value: Decimal,
    integer_digits: usize,
    fraction_digits: u32,
    rounding: RoundingStrategy,
) -> Option<(Decimal, i32)> {
    if value.is_zero() {
        return Some((Decimal::ZERO, 0));
    }
    let normalized = value.normalize();
    let digits = normalized.mantissa().unsigned_abs().to_string().len() as i32;
    let leading = digits - 1 - normalized.scale() as i32;
    let mut exponent = leading - (integer_digits as i32 - 1);

    let mut mantissa = shift(value, exponent.into())?.round_dp_with_strategy(fraction_digits, rounding);
    if mantissa >= shift(Decimal::ONE, -(integer_digits as i64))? {
        exponent += 1;
        mantissa = shift(value, exponent.into())?.round_dp_with_strategy(fraction_digits, rounding);
    }
    Some((mantissa, exponent))
}

/// `value / 10^exponent` exactly; `None` when the result needs more digits than a `Decimal` holds
fn shift(value: Decimal, exponent: i64) -> Option<Decimal> {
    if value.is_zero() {
        return Some(Decimal::ZERO);
    }
    let value = value.normalize();
    let scale = i64::from(value.scale()) + exponent;
    if scale > MAX_SCALE {
        return None;
    }
    if scale >= 0 {
        return Some(Decimal::from_i128_with_scale(value.mantissa(), scale as u32));
    }
    // 10^29 overflows, so this loop is short
    let mut shifted = Decimal::from_i128_with_scale(value.mantissa(), 0);
    for _ in 0..scale.unsigned_abs() {
        shifted = shifted.checked_mul(Decimal::TEN)?;
    }
    Some(shifted)
}

/// Parse text with the first alternative that matches all of it
///
/// On failure returns the furthest position any alternative reached.
pub(crate) fn parse(
    alternatives: &[Vec<Token>],
    text: &str,
    ctx: &ConverterContext<'_>,
) -> Result<Decimal, usize> {
    let mut furthest = 0;
    for tokens in alternatives {
        match parse_section(tokens, text, ctx) {
            Ok(value) => return Ok(value),
            Err(position) => furthest = furthest.max(position),
        }
    }
    Err(furthest)
}

fn parse_section(tokens: &[Token], text: &str, ctx: &ConverterContext<'_>) -> Result<Decimal, usize> {
    let symbols = &ctx.decimal_number_symbols;
    let mut cursor = TextCursor::new(text);
    let mut negative = false;
    let mut integer = String::new();
    let mut fraction = String::new();
    let mut exponent: i32 = 0;
    let mut scaled_at = 0;
    let mut percent = 0;
    let mut part = 0;
    let mut previous_digit = false;
    let group_separator = tokens
        .contains(&Token::Group)
        .then_some(symbols.group_separator);

    for token in tokens {
        let is_digit = matches!(token, Token::Digit(_) | Token::Group);
        match token {
            Token::Literal(literal) => cursor.expect(literal)?,
            Token::General => {
                negative = cursor.sign(symbols.negative_sign, symbols.positive_sign);
                integer = cursor.digits(None);
                if cursor.eat(symbols.decimal_separator) {
                    fraction = cursor.digits(None);
                }
                if integer.is_empty() && fraction.is_empty() {
                    return Err(cursor.position());
                }
                if cursor.eat_ignore_case('E') {
                    scaled_at = cursor.position() - 1;
                    exponent = parse_exponent(&mut cursor, symbols.negative_sign, symbols.positive_sign)?;
                }
            }
            Token::Digit(_) | Token::Group if previous_digit => {}
            Token::Digit(_) | Token::Group => match part {
                0 => {
                    negative = cursor.sign(symbols.negative_sign, symbols.positive_sign);
                    integer = cursor.digits(group_separator);
                }
                1 => fraction = cursor.digits(None),
                _ => {}
            },
            Token::DecimalPoint => {
                part = 1;
                if !cursor.eat(symbols.decimal_separator) {
                    part = 3;
                }
            }
            Token::Exponent { .. } => {
                part = 2;
                scaled_at = cursor.position();
                if !cursor.eat_ignore_case('E') {
                    return Err(cursor.position());
                }
                exponent = parse_exponent(&mut cursor, symbols.negative_sign, symbols.positive_sign)?;
            }
            Token::Percent => {
                scaled_at = cursor.position();
                cursor.expect(&symbols.percent_symbol.to_string())?;
                percent += 1;
            }
            _ => return Err(cursor.position()),
        }
        previous_digit = is_digit;
    }

    if !cursor.is_done() || (integer.is_empty() && fraction.is_empty()) {
        return Err(cursor.position());
    }

    let digits = format!(
        "{}.{}",
        if integer.is_empty() { "0" } else { &integer },
        if fraction.is_empty() { "0" } else { &fraction }
    );
    let value = Decimal::from_str(&digits).map_err(|_| 0usize)?;
    let mut value = shift(value, 2 * percent - i64::from(exponent)).ok_or(scaled_at)?;
    if negative {
        value.set_sign_negative(true);
    }
    Ok(value)
}

fn parse_exponent(cursor: &mut TextCursor, negative_sign: char, positive_sign: char) -> Result<i32, usize> {
    let negative = cursor.sign(negative_sign, positive_sign);
    let digits = cursor.digits(None);
    let value: i32 = digits.parse().map_err(|_| cursor.position())?;
    Ok(if negative { -value } else { value })
}
