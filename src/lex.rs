use std::fmt::Display;

use miette::SourceSpan;

use crate::{error::EvalError, op::Operator, symbol, value::Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'de> {
    pub kind: TokenKind,
    pub literal: &'de str,
    /// Byte offset of `literal` in the lexed input.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Ident,
    Op(Operator),
    /// A function name directly followed by `(`; the name is the literal.
    Call,
    OpenParen,
    CloseParen,
    /// A whole `[...]` literal, read later by the evaluator.
    Matrix,
    /// A value bound in place of an identifier, see [`Token::bind`].
    Bound(Value),
}

impl Token<'_> {
    pub fn span(&self) -> SourceSpan {
        SourceSpan::from((self.offset, self.literal.len()))
    }

    /// Replaces an identifier named `name` (in any case) by `value`.
    pub fn bind(self, name: &str, value: &Value) -> Self {
        match self.kind {
            TokenKind::Ident if self.literal.eq_ignore_ascii_case(name) => Token {
                kind: TokenKind::Bound(value.clone()),
                ..self
            },
            _ => self,
        }
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.literal;
        match &self.kind {
            TokenKind::Number(n) => write!(f, "NUMBER {lit} {}", Value::Number(*n)),
            TokenKind::Ident => write!(f, "IDENTIFIER {lit}"),
            TokenKind::Op(Operator::Pos) => write!(f, "UNARY_PLUS {lit}"),
            TokenKind::Op(Operator::Neg) => write!(f, "UNARY_MINUS {lit}"),
            TokenKind::Op(Operator::Add) => write!(f, "PLUS {lit}"),
            TokenKind::Op(Operator::Sub) => write!(f, "MINUS {lit}"),
            TokenKind::Op(Operator::Mul) => write!(f, "STAR {lit}"),
            TokenKind::Op(Operator::Div) => write!(f, "SLASH {lit}"),
            TokenKind::Op(Operator::Rem) => write!(f, "PERCENT {lit}"),
            TokenKind::Op(Operator::Pow) => write!(f, "CARET {lit}"),
            TokenKind::Call => write!(f, "CALL {lit}"),
            TokenKind::OpenParen => write!(f, "LEFT_PAREN {lit}"),
            TokenKind::CloseParen => write!(f, "RIGHT_PAREN {lit}"),
            TokenKind::Matrix => write!(f, "MATRIX {lit}"),
            TokenKind::Bound(value) => write!(f, "VALUE {lit} {value}"),
        }
    }
}

/// Characters that end an operand run.
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '[') || Operator::binary(c).is_some()
}

fn is_number(literal: &str) -> bool {
    literal.chars().all(|c| c.is_ascii_digit() || c == '.')
        && literal.chars().filter(|&c| c == '.').count() <= 1
        && literal.chars().any(|c| c.is_ascii_digit())
}

pub fn is_identifier(literal: &str) -> bool {
    !literal.is_empty() && literal.chars().all(|c| c.is_ascii_alphabetic())
}

/// Byte offset of `part` inside `whole`; `part` must be a slice of `whole`.
pub fn offset_in(whole: &str, part: &str) -> usize {
    part.as_ptr() as usize - whole.as_ptr() as usize
}

pub struct Lexer<'de> {
    whole: &'de str,
    rest: &'de str,
    byte: usize,
    /// True at the start and after an operator or `(`: a `+`/`-` seen here
    /// is a sign, not an addition.
    expect_operand: bool,
}

impl<'de> Lexer<'de> {
    pub fn new(input: &'de str) -> Self {
        Lexer {
            whole: input,
            rest: input,
            byte: 0,
            expect_operand: true,
        }
    }

    fn emit(&mut self, kind: TokenKind, literal: &'de str, offset: usize) -> Token<'de> {
        self.expect_operand = matches!(
            kind,
            TokenKind::Op(_) | TokenKind::Call | TokenKind::OpenParen
        );
        Token {
            kind,
            literal,
            offset,
        }
    }

    fn advance(&mut self, extra_bytes: usize) {
        self.byte += extra_bytes;
        self.rest = &self.rest[extra_bytes..];
    }

    fn operand(
        &mut self,
        start: usize,
        cur: &'de str,
        first: char,
    ) -> Result<Token<'de>, EvalError> {
        let end = cur.find(is_delimiter).unwrap_or(cur.len());
        let literal = &cur[..end];
        self.advance(literal.len() - first.len_utf8());

        let invalid = || EvalError::InvalidToken {
            token: literal.to_string(),
            span: Some(SourceSpan::from((start, literal.len()))),
        };

        if is_number(literal) {
            let n = literal.parse().map_err(|_| invalid())?;
            return Ok(self.emit(TokenKind::Number(n), literal, start));
        }

        if is_identifier(literal) {
            if symbol::is_reserved(literal) {
                return Err(invalid());
            }
            let kind = if self.rest.trim_start().starts_with('(') {
                TokenKind::Call
            } else {
                TokenKind::Ident
            };
            return Ok(self.emit(kind, literal, start));
        }

        Err(invalid())
    }

    fn matrix(&mut self, start: usize, cur: &'de str) -> Result<Token<'de>, EvalError> {
        let mut depth = 0usize;
        let mut end = None;
        for (i, c) in cur.char_indices() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(i + 1);
                        break;
                    }
                }
                _ => {}
            }
        }

        let Some(end) = end else {
            let err = EvalError::MalformedMatrix {
                reason: "missing closing `]`".to_string(),
                span: Some(SourceSpan::from(start..self.whole.len())),
            };
            self.advance(self.rest.len());
            return Err(err);
        };

        let literal = &cur[..end];
        self.advance(end - 1);
        Ok(self.emit(TokenKind::Matrix, literal, start))
    }
}

impl<'de> Iterator for Lexer<'de> {
    type Item = Result<Token<'de>, EvalError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut chars = self.rest.chars();
            let c = chars.next()?;
            let literal = &self.rest[..c.len_utf8()];
            let cur = self.rest;
            let start = self.byte;
            self.rest = chars.as_str();
            self.byte += c.len_utf8();

            let kind = match c {
                c if c.is_whitespace() => continue,
                '(' => TokenKind::OpenParen,
                ')' => TokenKind::CloseParen,
                '[' => return Some(self.matrix(start, cur)),
                c => match Operator::binary(c) {
                    Some(op) if self.expect_operand => TokenKind::Op(op.unary().unwrap_or(op)),
                    Some(op) => TokenKind::Op(op),
                    None => return Some(self.operand(start, cur, c)),
                },
            };

            return Some(Ok(self.emit(kind, literal, start)));
        }
    }
}
