//! Pattern tokenizer

use super::SpreadsheetPatternKind;
use crate::error::{PatternError, PatternResult};

/// Digit placeholder, differing in what is shown when there is no digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placeholder {
    /// `0` shows a zero
    Zero,
    /// `#` shows nothing
    Hash,
    /// `?` shows a space
    Question,
}

impl Placeholder {
    /// What to show instead of a missing digit
    pub(crate) fn blank(self) -> Option<char> {
        match self {
            Placeholder::Zero => Some('0'),
            Placeholder::Hash => None,
            Placeholder::Question => Some(' '),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    General,
    Literal(String),
    Digit(Placeholder),
    DecimalPoint,
    Group,
    Percent,
    Exponent { plus: bool },
    Year(usize),
    Month(usize),
    Day(usize),
    Hour(usize),
    Minute(usize),
    Second(usize),
    /// Decimal separator followed by this many fraction-of-second digits
    SecondFraction(usize),
    AmPm { short: bool, lower: bool },
    Text,
}

/// Characters shown as-is without quoting
const PLAIN_LITERALS: &str = "$-+/():!^&'~{}<>= ";

/// Split a pattern into `;` separated sections of tokens
pub(crate) fn tokenize(kind: SpreadsheetPatternKind, pattern: &str) -> PatternResult<Vec<Vec<Token>>> {
    if pattern.is_empty() {
        return Err(PatternError::Empty);
    }

    let chars: Vec<char> = pattern.chars().collect();
    let invalid = |position: usize| PatternError::InvalidCharacter {
        character: chars[position],
        position,
        pattern: pattern.to_string(),
    };
    let unterminated = || PatternError::Unterminated(pattern.to_string());

    let mut sections = Vec::new();
    let mut tokens: Vec<Token> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let run = chars[i..].iter().take_while(|r| r.eq_ignore_ascii_case(&c)).count();

        match c {
            ';' => {
                sections.push(merge_minutes(std::mem::take(&mut tokens)));
                i += 1;
            }
            '"' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|q| *q == '"')
                    .ok_or_else(unterminated)?;
                push_literal(&mut tokens, chars[i + 1..i + 1 + end].iter().collect::<String>().as_str());
                i += end + 2;
            }
            '\\' => {
                let escaped = chars.get(i + 1).ok_or_else(unterminated)?;
                push_literal(&mut tokens, &escaped.to_string());
                i += 2;
            }
            '[' => {
                // colors, conditions and locales are not rendered
                let end = chars[i..].iter().position(|q| *q == ']').ok_or_else(unterminated)?;
                i += end + 1;
            }
            '_' => {
                chars.get(i + 1).ok_or_else(unterminated)?;
                push_literal(&mut tokens, " ");
                i += 2;
            }
            '*' => {
                chars.get(i + 1).ok_or_else(unterminated)?;
                i += 2;
            }
            _ if !kind.is_temporal() && starts_with_ignore_case(&chars[i..], "General") => {
                tokens.push(Token::General);
                i += "General".len();
            }
            _ => {
                let token = match (kind, c) {
                    (SpreadsheetPatternKind::Number, '0') => Token::Digit(Placeholder::Zero),
                    (SpreadsheetPatternKind::Number, '#') => Token::Digit(Placeholder::Hash),
                    (SpreadsheetPatternKind::Number, '?') => Token::Digit(Placeholder::Question),
                    (SpreadsheetPatternKind::Number, '.') => Token::DecimalPoint,
                    (SpreadsheetPatternKind::Number, ',') => Token::Group,
                    (SpreadsheetPatternKind::Number, '%') => Token::Percent,
                    (SpreadsheetPatternKind::Number, 'E' | 'e') => match chars.get(i + 1) {
                        Some('+') | Some('-') => {
                            let plus = chars[i + 1] == '+';
                            i += 1;
                            Token::Exponent { plus }
                        }
                        _ => return Err(invalid(i)),
                    },
                    (SpreadsheetPatternKind::Text, '@') => Token::Text,
                    (k, 'y' | 'Y') if k.has_date() => {
                        i += run - 1;
                        Token::Year(run)
                    }
                    (k, 'm' | 'M') if k.has_date() => {
                        i += run - 1;
                        Token::Month(run)
                    }
                    (SpreadsheetPatternKind::Time, 'm' | 'M') => {
                        i += run - 1;
                        Token::Minute(run)
                    }
                    (k, 'd' | 'D') if k.has_date() => {
                        i += run - 1;
                        Token::Day(run)
                    }
                    (k, 'h' | 'H') if k.has_time() => {
                        i += run - 1;
                        Token::Hour(run)
                    }
                    (k, 's' | 'S') if k.has_time() => {
                        i += run - 1;
                        Token::Second(run)
                    }
                    (k, 'a' | 'A') if k.has_time() => {
                        if starts_with_ignore_case(&chars[i..], "AM/PM") {
                            i += 4;
                            Token::AmPm {
                                short: false,
                                lower: false,
                            }
                        } else if starts_with_ignore_case(&chars[i..], "A/P") {
                            i += 2;
                            Token::AmPm {
                                short: true,
                                lower: c == 'a',
                            }
                        } else {
                            return Err(invalid(i));
                        }
                    }
                    (k, '.') if k.has_time() && chars.get(i + 1) == Some(&'0') => {
                        let digits = chars[i + 1..].iter().take_while(|z| **z == '0').count();
                        i += digits;
                        Token::SecondFraction(digits)
                    }
                    (k, '.' | ',') if k.is_temporal() => Token::Literal(c.to_string()),
                    (_, c) if PLAIN_LITERALS.contains(c) => Token::Literal(c.to_string()),
                    _ => return Err(invalid(i)),
                };
                match token {
                    Token::Literal(text) => push_literal(&mut tokens, &text),
                    token => tokens.push(token),
                }
                i += 1;
            }
        }
    }

    sections.push(merge_minutes(tokens));
    Ok(sections)
}

fn starts_with_ignore_case(chars: &[char], word: &str) -> bool {
    chars.len() >= word.len()
        && chars
            .iter()
            .zip(word.chars())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b))
}

fn push_literal(tokens: &mut Vec<Token>, text: &str) {
    if let Some(Token::Literal(previous)) = tokens.last_mut() {
        previous.push_str(text);
    } else {
        tokens.push(Token::Literal(text.to_string()));
    }
}

/// `m` is a minute when it follows an hour or precedes a second
fn merge_minutes(mut tokens: Vec<Token>) -> Vec<Token> {
    let is_field = |t: &Token| !matches!(t, Token::Literal(_));
    for i in 0..tokens.len() {
        let Token::Month(n) = tokens[i] else { continue };
        if n > 2 {
            continue;
        }
        let previous = tokens[..i].iter().rev().find(|t| is_field(t));
        let next = tokens[i + 1..].iter().find(|t| is_field(t));
        if matches!(previous, Some(Token::Hour(_))) || matches!(next, Some(Token::Second(_))) {
            tokens[i] = Token::Minute(n);
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn literal(s: &str) -> Token {
        Token::Literal(s.to_string())
    }

    #[test]
    fn test_number_sections() {
        let sections = tokenize(SpreadsheetPatternKind::Number, "\"N\" #;\"N\" #.#").unwrap();
        assert_eq!(
            sections,
            vec![
                vec![literal("N "), Token::Digit(Placeholder::Hash)],
                vec![
                    literal("N "),
                    Token::Digit(Placeholder::Hash),
                    Token::DecimalPoint,
                    Token::Digit(Placeholder::Hash)
                ],
            ]
        );
    }

    #[test]
    fn test_date_escape() {
        let sections = tokenize(SpreadsheetPatternKind::Date, "\\D yyyy-mm-dd").unwrap();
        assert_eq!(
            sections,
            vec![vec![
                literal("D "),
                Token::Year(4),
                literal("-"),
                Token::Month(2),
                literal("-"),
                Token::Day(2)
            ]]
        );
    }

    #[test]
    fn test_minutes() {
        let sections = tokenize(SpreadsheetPatternKind::DateTime, "d/m/yy h:mm:ss.00 AM/PM").unwrap();
        let tokens = &sections[0];
        assert_eq!(tokens[2], Token::Month(1));
        assert_eq!(tokens[8], Token::Minute(2));
        assert_eq!(tokens[11], Token::SecondFraction(2));
        assert_eq!(
            tokens[13],
            Token::AmPm {
                short: false,
                lower: false
            }
        );
    }

    #[test]
    fn test_colors_skipped() {
        let sections = tokenize(SpreadsheetPatternKind::Number, "[Red]0.00").unwrap();
        assert_eq!(sections[0][0], Token::Digit(Placeholder::Zero));
    }

    #[test]
    fn test_errors() {
        assert_eq!(tokenize(SpreadsheetPatternKind::Number, ""), Err(PatternError::Empty));
        assert_eq!(
            tokenize(SpreadsheetPatternKind::Number, "#x"),
            Err(PatternError::InvalidCharacter {
                character: 'x',
                position: 1,
                pattern: "#x".into()
            })
        );
        assert_eq!(
            tokenize(SpreadsheetPatternKind::Date, "yyyy hh"),
            Err(PatternError::InvalidCharacter {
                character: 'h',
                position: 5,
                pattern: "yyyy hh".into()
            })
        );
        assert_eq!(
            tokenize(SpreadsheetPatternKind::Text, "\"abc"),
            Err(PatternError::Unterminated("\"abc".into()))
        );
    }
}
