use crate::error::ParseError;
use data::Timespan;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Int(i64),
    Real(f64),
    Str(String),
    Timespan(Timespan),
    Pipe,
    Comma,
    LParen,
    RParen,
    EqEq,
    BangEq,
    Lt,
    Le,
    Gt,
    Ge,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

/// Turns QL source text into a token stream. Whitespace and line breaks
/// are separators only; a `|` is rejected here the moment it
/// appears while paren depth is nonzero, since the pipe/paren rule is
/// purely lexical.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = source.chars().collect();
    let mut pos = 0;
    let mut line = 1;
    let mut col = 1;
    let mut paren_depth: i32 = 0;
    let mut tokens = Vec::new();

    macro_rules! advance {
        () => {{
            if chars[pos] == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
            pos += 1;
        }};
    }

    while pos < chars.len() {
        let c = chars[pos];

        if c.is_whitespace() {
            advance!();
            continue;
        }

        let start_line = line;
        let start_col = col;

        if c == '|' {
            advance!();
            if paren_depth > 0 {
                return Err(ParseError::new(
                    "pipe '|' is not allowed inside parentheses",
                    start_line,
                    start_col,
                ));
            }
            tokens.push(Token {
                kind: TokenKind::Pipe,
                line: start_line,
                col: start_col,
            });
            continue;
        }

        if c == '(' {
            advance!();
            paren_depth += 1;
            tokens.push(Token {
                kind: TokenKind::LParen,
                line: start_line,
                col: start_col,
            });
            continue;
        }

        if c == ')' {
            advance!();
            paren_depth -= 1;
            tokens.push(Token {
                kind: TokenKind::RParen,
                line: start_line,
                col: start_col,
            });
            continue;
        }

        if c == ',' {
            advance!();
            tokens.push(Token {
                kind: TokenKind::Comma,
                line: start_line,
                col: start_col,
            });
            continue;
        }

        if c == '=' {
            advance!();
            if pos < chars.len() && chars[pos] == '=' {
                advance!();
                tokens.push(Token {
                    kind: TokenKind::EqEq,
                    line: start_line,
                    col: start_col,
                });
            } else {
                tokens.push(Token {
                    kind: TokenKind::Assign,
                    line: start_line,
                    col: start_col,
                });
            }
            continue;
        }

        if c == '!' {
            advance!();
            if pos < chars.len() && chars[pos] == '=' {
                advance!();
                tokens.push(Token {
                    kind: TokenKind::BangEq,
                    line: start_line,
                    col: start_col,
                });
                continue;
            }
            return Err(ParseError::new(
                "unexpected character '!'",
                start_line,
                start_col,
            ));
        }

        if c == '<' {
            advance!();
            if pos < chars.len() && chars[pos] == '=' {
                advance!();
                tokens.push(Token {
                    kind: TokenKind::Le,
                    line: start_line,
                    col: start_col,
                });
            } else {
                tokens.push(Token {
                    kind: TokenKind::Lt,
                    line: start_line,
                    col: start_col,
                });
            }
            continue;
        }

        if c == '>' {
            advance!();
            if pos < chars.len() && chars[pos] == '=' {
                advance!();
                tokens.push(Token {
                    kind: TokenKind::Ge,
                    line: start_line,
                    col: start_col,
                });
            } else {
                tokens.push(Token {
                    kind: TokenKind::Gt,
                    line: start_line,
                    col: start_col,
                });
            }
            continue;
        }

        if c == '+' {
            advance!();
            tokens.push(Token {
                kind: TokenKind::Plus,
                line: start_line,
                col: start_col,
            });
            continue;
        }

        if c == '-' {
            advance!();
            tokens.push(Token {
                kind: TokenKind::Minus,
                line: start_line,
                col: start_col,
            });
            continue;
        }

        if c == '*' {
            advance!();
            tokens.push(Token {
                kind: TokenKind::Star,
                line: start_line,
                col: start_col,
            });
            continue;
        }

        if c == '/' {
            advance!();
            tokens.push(Token {
                kind: TokenKind::Slash,
                line: start_line,
                col: start_col,
            });
            continue;
        }

        if c == '\'' || c == '"' {
            let quote = c;
            advance!();
            let mut value = String::new();
            loop {
                if pos >= chars.len() {
                    return Err(ParseError::new(
                        "unterminated string literal",
                        start_line,
                        start_col,
                    ));
                }
                let ch = chars[pos];
                if ch == '\\' {
                    advance!();
                    if pos >= chars.len() {
                        return Err(ParseError::new(
                            "unterminated string literal",
                            start_line,
                            start_col,
                        ));
                    }
                    let escaped = chars[pos];
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        '\\' => '\\',
                        '\'' => '\'',
                        '"' => '"',
                        other => other,
                    });
                    advance!();
                } else if ch == quote {
                    advance!();
                    break;
                } else {
                    value.push(ch);
                    advance!();
                }
            }
            tokens.push(Token {
                kind: TokenKind::Str(value),
                line: start_line,
                col: start_col,
            });
            continue;
        }

        if c.is_ascii_digit() {
            let mut text = String::new();
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                text.push(chars[pos]);
                advance!();
            }
            let mut is_real = false;
            if pos < chars.len()
                && chars[pos] == '.'
                && pos + 1 < chars.len()
                && chars[pos + 1].is_ascii_digit()
            {
                is_real = true;
                text.push('.');
                advance!();
                while pos < chars.len() && chars[pos].is_ascii_digit() {
                    text.push(chars[pos]);
                    advance!();
                }
            }

            if pos < chars.len() && matches!(chars[pos], 'd' | 'h' | 'm' | 's') {
                let next_after_unit = chars.get(pos + 1);
                let unit_is_terminal = !matches!(
                    next_after_unit,
                    Some(ch) if ch.is_alphanumeric() || *ch == '_'
                );
                if unit_is_terminal {
                    let unit = chars[pos];
                    advance!();
                    let literal = format!("{}{}", text, unit);
                    let timespan = Timespan::parse(&literal).ok_or_else(|| {
                        ParseError::new(
                            format!("invalid timespan literal '{}'", literal),
                            start_line,
                            start_col,
                        )
                    })?;
                    tokens.push(Token {
                        kind: TokenKind::Timespan(timespan),
                        line: start_line,
                        col: start_col,
                    });
                    continue;
                }
            }

            let kind = if is_real {
                TokenKind::Real(text.parse().map_err(|_| {
                    ParseError::new(format!("invalid number '{}'", text), start_line, start_col)
                })?)
            } else {
                TokenKind::Int(text.parse().map_err(|_| {
                    ParseError::new(format!("invalid number '{}'", text), start_line, start_col)
                })?)
            };
            tokens.push(Token {
                kind,
                line: start_line,
                col: start_col,
            });
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let mut text = String::new();
            while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                text.push(chars[pos]);
                advance!();
            }
            tokens.push(Token {
                kind: TokenKind::Ident(text),
                line: start_line,
                col: start_col,
            });
            continue;
        }

        return Err(ParseError::new(
            format!("unexpected character '{}'", c),
            start_line,
            start_col,
        ));
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        line,
        col,
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple_pipeline() {
        let tokens = tokenize("Events | where x == 1").unwrap();
        let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident("Events".to_string()),
                TokenKind::Pipe,
                TokenKind::Ident("where".to_string()),
                TokenKind::Ident("x".to_string()),
                TokenKind::EqEq,
                TokenKind::Int(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_pipe_inside_parens_is_an_error() {
        let result = tokenize("f(a | b)");
        assert!(result.is_err());
    }

    #[test]
    fn test_timespan_literal() {
        let tokens = tokenize("1.5h").unwrap();
        assert_eq!(
            tokens[0].kind,
            TokenKind::Timespan(Timespan::from_seconds(5400.0))
        );
    }

    #[test]
    fn test_string_literal_with_escapes() {
        let tokens = tokenize(r#""he said \"hi\"""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str("he said \"hi\"".to_string()));
    }

    #[test]
    fn test_unterminated_string_is_parse_error() {
        assert!(tokenize("\"unterminated").is_err());
    }

    #[test]
    fn test_real_number() {
        let tokens = tokenize("3.14").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Real(3.14));
    }
}
