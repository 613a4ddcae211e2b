//! Tokenizer.

use crate::error::ExprError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    LParen,
    RParen,
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Number(n) => format!("number {n}"),
            Self::Ident(name) => format!("name '{name}'"),
            Self::Plus => "'+'".into(),
            Self::Minus => "'-'".into(),
            Self::Star => "'*'".into(),
            Self::Slash => "'/'".into(),
            Self::Power => "'**'".into(),
            Self::LParen => "'('".into(),
            Self::RParen => "')'".into(),
        }
    }
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub position: usize,
}

/// Token bound for one expression. Operator chains build one tree level per
/// operand, so this also bounds evaluation recursion.
pub(crate) const MAX_TOKENS: usize = 1024;

const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "class", "def", "del", "elif", "else", "except",
    "for", "from", "global", "if", "import", "in", "is", "lambda", "not", "or", "pass", "raise",
    "return", "try", "while", "with", "yield",
];

fn forbidden(construct: impl Into<String>, position: usize) -> ExprError {
    ExprError::Forbidden {
        construct: construct.into(),
        position,
    }
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, ExprError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;
        let token = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                pos += 1;
                continue;
            }
            b'0'..=b'9' => {
                pos = scan_number(bytes, pos)?;
                let text = &source[start..pos];
                let value = text.parse::<f64>().map_err(|_| ExprError::Syntax {
                    position: start,
                    message: format!("invalid number '{text}'"),
                })?;
                Token::Number(value)
            }
            b'.' if bytes.get(pos + 1).is_some_and(u8::is_ascii_digit) => {
                pos = scan_number(bytes, pos)?;
                let text = &source[start..pos];
                let value = text.parse::<f64>().map_err(|_| ExprError::Syntax {
                    position: start,
                    message: format!("invalid number '{text}'"),
                })?;
                Token::Number(value)
            }
            b'.' => return Err(forbidden("attribute access", start)),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                while pos < bytes.len()
                    && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                let name = &source[start..pos];
                if KEYWORDS.contains(&name) {
                    return Err(forbidden(format!("keyword '{name}'"), start));
                }
                Token::Ident(name.to_string())
            }
            b'+' => {
                pos += 1;
                Token::Plus
            }
            b'-' => {
                pos += 1;
                Token::Minus
            }
            b'*' if bytes.get(pos + 1) == Some(&b'*') => {
                pos += 2;
                Token::Power
            }
            b'*' => {
                pos += 1;
                Token::Star
            }
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                return Err(forbidden("operator '//'", start));
            }
            b'/' => {
                pos += 1;
                Token::Slash
            }
            b'(' => {
                pos += 1;
                Token::LParen
            }
            b')' => {
                pos += 1;
                Token::RParen
            }
            b'\'' | b'"' => return Err(forbidden("string literal", start)),
            b'<' | b'>' | b'!' => return Err(forbidden("comparison", start)),
            b'=' if bytes.get(pos + 1) == Some(&b'=') => {
                return Err(forbidden("comparison", start));
            }
            b'=' => return Err(forbidden("assignment", start)),
            b'[' | b']' => return Err(forbidden("subscript", start)),
            b'%' | b'&' | b'|' | b'^' | b'~' | b'@' => {
                return Err(forbidden(format!("operator '{}'", char::from(c)), start));
            }
            _ => {
                let ch = source[start..].chars().next().unwrap_or('?');
                return Err(ExprError::Syntax {
                    position: start,
                    message: format!("unexpected character '{ch}'"),
                });
            }
        };
        if tokens.len() == MAX_TOKENS {
            return Err(ExprError::TooLong(MAX_TOKENS));
        }
        tokens.push(Spanned {
            token,
            position: start,
        });
    }

    Ok(tokens)
}

/// Scan digits, an optional fraction, and an optional exponent. Returns the end offset.
fn scan_number(bytes: &[u8], mut pos: usize) -> Result<usize, ExprError> {
    let start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut end = pos + 1;
        if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end == digits_start {
            return Err(ExprError::Syntax {
                position: start,
                message: "malformed exponent in number".into(),
            });
        }
        pos = end;
    }
    if pos < bytes.len() && (bytes[pos].is_ascii_alphabetic() || bytes[pos] == b'_') {
        return Err(ExprError::Syntax {
            position: pos,
            message: "name directly follows a number".into(),
        });
    }
    Ok(pos)
}
