//! Tokenizer for arithmetic input.
//!
//! Besides numbers and arithmetic operators the lexer also recognizes
//! names, string literals, and stray punctuation. Those tokens never make
//! it into a tree; they exist so the parser can say precisely what it
//! rejected.

use super::number::Number;
use crate::error::EvalError;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Two-character punctuation that is reported as a unit.
const COMPOUND_PUNCT: &[&str] = &["==", "!=", "<=", ">=", "<<", ">>", ":=", "->"];

/// Token categories.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Numeric literal.
    Number(Number),
    /// `+`
    Plus,
    /// `-` or `−`
    Minus,
    /// `*` or `×`
    Star,
    /// `/` or `÷`
    Slash,
    /// `//`
    DoubleSlash,
    /// `%`
    Percent,
    /// `**` or `^`
    DoubleStar,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// Identifier or keyword.
    Ident(String),
    /// Quoted string literal.
    Str,
    /// Any other punctuation.
    Punct(String),
    /// End of input.
    Eof,
}

/// A token with its byte span in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token category.
    pub kind: TokenKind,
    /// Byte range in the source text.
    pub span: Range<usize>,
}

#[allow(clippy::expect_used)]
fn number_regex() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| {
        Regex::new(
            r"^(?:[0-9](?:_?[0-9])*(?:\.(?:[0-9](?:_?[0-9])*)?)?|\.[0-9](?:_?[0-9])*)(?:[eE][+-]?[0-9](?:_?[0-9])*)?",
        )
        .expect("valid regex")
    })
}

/// Splits `source` into tokens, ending with [`TokenKind::Eof`].
///
/// # Errors
///
/// Returns [`EvalError::Syntax`] for unterminated strings, numbers run
/// into letters or stray `_` separators, and numeric literals that do not
/// fit in a finite float.
pub fn tokenize(source: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(ch) = source[pos..].chars().next() {
        let start = pos;

        if ch.is_whitespace() {
            pos += ch.len_utf8();
            continue;
        }

        if let Some(m) = number_regex().find(&source[pos..]) {
            pos += m.end();
            if source[pos..].starts_with(|c: char| c == '_' || c.is_alphanumeric()) {
                return Err(EvalError::syntax(start, "invalid numeric literal"));
            }
            let number = parse_number(m.as_str(), start)?;
            tokens.push(Token {
                kind: TokenKind::Number(number),
                span: start..pos,
            });
            continue;
        }

        let rest = &source[pos..];
        let (kind, len) = match ch {
            '*' if rest.starts_with("**") => (TokenKind::DoubleStar, 2),
            '/' if rest.starts_with("//") => (TokenKind::DoubleSlash, 2),
            '^' => (TokenKind::DoubleStar, 1),
            '+' => (TokenKind::Plus, 1),
            '-' | '\u{2212}' => (TokenKind::Minus, ch.len_utf8()),
            '*' | '\u{00d7}' => (TokenKind::Star, ch.len_utf8()),
            '/' | '\u{00f7}' => (TokenKind::Slash, ch.len_utf8()),
            '%' => (TokenKind::Percent, 1),
            '(' => (TokenKind::LParen, 1),
            ')' => (TokenKind::RParen, 1),
            '\'' | '"' => (TokenKind::Str, scan_string(rest, ch, start)?),
            c if c.is_alphabetic() || c == '_' => {
                let len = rest
                    .char_indices()
                    .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
                    .map_or(rest.len(), |(i, _)| i);
                (TokenKind::Ident(rest[..len].to_string()), len)
            }
            _ => {
                let len = COMPOUND_PUNCT
                    .iter()
                    .find(|p| rest.starts_with(**p))
                    .map_or(ch.len_utf8(), |p| p.len());
                (TokenKind::Punct(rest[..len].to_string()), len)
            }
        };

        pos += len;
        tokens.push(Token {
            kind,
            span: start..pos,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: source.len()..source.len(),
    });
    Ok(tokens)
}

/// Parses a matched numeric literal.
///
/// Integer literals too large for i64 fall back to floats.
fn parse_number(literal: &str, position: usize) -> Result<Number, EvalError> {
    let text = literal.replace('_', "");
    let text = text.as_str();
    let is_float = text.contains(['.', 'e', 'E']);
    if !is_float && let Ok(i) = text.parse::<i64>() {
        return Ok(Number::Int(i));
    }

    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(Number::Float(f)),
        _ => Err(EvalError::syntax(
            position,
            format!("numeric literal out of range: {literal}"),
        )),
    }
}

/// Returns the byte length of a quoted string starting at `rest`.
fn scan_string(rest: &str, quote: char, position: usize) -> Result<usize, EvalError> {
    let body = &rest[quote.len_utf8()..];
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            c if c == quote => return Ok(quote.len_utf8() + i + c.len_utf8()),
            _ => {}
        }
    }
    Err(EvalError::syntax(position, "unterminated string literal"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_arithmetic() {
        assert_eq!(
            kinds("3 + 4*2"),
            vec![
                TokenKind::Number(Number::Int(3)),
                TokenKind::Plus,
                TokenKind::Number(Number::Int(4)),
                TokenKind::Star,
                TokenKind::Number(Number::Int(2)),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_compound_operators() {
        assert_eq!(
            kinds("2**3//4"),
            vec![
                TokenKind::Number(Number::Int(2)),
                TokenKind::DoubleStar,
                TokenKind::Number(Number::Int(3)),
                TokenKind::DoubleSlash,
                TokenKind::Number(Number::Int(4)),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_number_forms() {
        assert_eq!(kinds("1.5")[0], TokenKind::Number(Number::Float(1.5)));
        assert_eq!(kinds(".5")[0], TokenKind::Number(Number::Float(0.5)));
        assert_eq!(kinds("5.")[0], TokenKind::Number(Number::Float(5.0)));
        assert_eq!(kinds("2.0")[0], TokenKind::Number(Number::Float(2.0)));
        assert_eq!(kinds("1e3")[0], TokenKind::Number(Number::Float(1000.0)));
        assert_eq!(kinds("2.5E-3")[0], TokenKind::Number(Number::Float(0.0025)));
    }

    #[test]
    fn test_tokenize_digit_separators() {
        assert_eq!(kinds("1_000")[0], TokenKind::Number(Number::Int(1000)));
        assert_eq!(kinds("1_000.000_5")[0], TokenKind::Number(Number::Float(1000.0005)));
        assert_eq!(kinds("1e1_0")[0], TokenKind::Number(Number::Float(1e10)));
    }

    #[test]
    fn test_tokenize_malformed_numbers_rejected() {
        for source in ["1__000", "1_", "2 + 10_", "3abc", "1e"] {
            let err = tokenize(source).unwrap_err();
            assert!(
                matches!(err, EvalError::Syntax { ref message, .. } if message == "invalid numeric literal"),
                "{source:?} gave {err:?}"
            );
        }
        assert_eq!(
            tokenize("2 + 10_").unwrap_err().position(),
            Some(4)
        );
    }

    #[test]
    fn test_tokenize_huge_integer_becomes_float() {
        assert_eq!(
            kinds("99999999999999999999")[0],
            TokenKind::Number(Number::Float(1e20))
        );
    }

    #[test]
    fn test_tokenize_infinite_literal_rejected() {
        let err = tokenize("1 + 1e999").unwrap_err();
        assert!(matches!(err, EvalError::Syntax { position: 4, .. }));
    }

    #[test]
    fn test_tokenize_aliases() {
        assert_eq!(
            kinds("2^3 × 4 ÷ 2 − 1"),
            vec![
                TokenKind::Number(Number::Int(2)),
                TokenKind::DoubleStar,
                TokenKind::Number(Number::Int(3)),
                TokenKind::Star,
                TokenKind::Number(Number::Int(4)),
                TokenKind::Slash,
                TokenKind::Number(Number::Int(2)),
                TokenKind::Minus,
                TokenKind::Number(Number::Int(1)),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_names_and_strings() {
        assert_eq!(
            kinds("__import__('os')"),
            vec![
                TokenKind::Ident("__import__".to_string()),
                TokenKind::LParen,
                TokenKind::Str,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_punctuation() {
        assert_eq!(
            kinds("1 <= 2; 3"),
            vec![
                TokenKind::Number(Number::Int(1)),
                TokenKind::Punct("<=".to_string()),
                TokenKind::Number(Number::Int(2)),
                TokenKind::Punct(";".to_string()),
                TokenKind::Number(Number::Int(3)),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_unterminated_string() {
        let err = tokenize("1 + 'abc").unwrap_err();
        assert_eq!(err.position(), Some(4));
    }

    #[test]
    fn test_token_spans() {
        let tokens = tokenize("12 ** 3").unwrap();
        assert_eq!(tokens[0].span, 0..2);
        assert_eq!(tokens[1].span, 3..5);
        assert_eq!(tokens[2].span, 6..7);
        assert_eq!(tokens[3].span, 7..7);
    }
}
