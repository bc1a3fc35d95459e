//! Splitting LaTeX-flavoured source text into [`Token`]s.

use smol_str::SmolStr;
use std::{
    fmt::{self, Display, Formatter},
    ops::Range,
};

/// The backslash commands which name a function (e.g. `\sqrt{x}`).
pub const FUNCTIONS: &[&str] =
    &["sqrt", "sin", "cos", "tan", "ln", "log", "exp", "abs"];

/// Would `text` be read as a single variable name?
pub fn is_identifier(text: &str) -> bool {
    let mut lexer = Lexer::new(text);

    match (lexer.next_token(), lexer.next_token()) {
        (Ok(first), Ok(second)) => {
            first.kind == TokenKind::Identifier && second.kind == TokenKind::End
        },
        _ => false,
    }
}

/// A lazy tokenizer which hands out one [`Token`] at a time.
///
/// Once the input is exhausted every call to [`Lexer::next_token()`] returns
/// a [`TokenKind::End`] token.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexer<'a> {
    src: &'a str,
    cursor: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self { Lexer { src, cursor: 0 } }

    pub fn source(&self) -> &'a str { self.src }

    /// Consume the rest of the input, returning every token up to and
    /// including the final [`TokenKind::End`].
    pub fn tokenize(mut self) -> Result<Vec<Token<'a>>, LexError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_end = token.kind == TokenKind::End;
            tokens.push(token);

            if is_end {
                return Ok(tokens);
            }
        }
    }

    /// Read the next token, starting from the earliest unconsumed character.
    pub fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        self.take_while(char::is_whitespace);
        let start = self.cursor;

        match self.peek() {
            None => Ok(self.token(TokenKind::End, start..start)),
            Some(c) if c.is_ascii_digit() || c == '.' => self.chomp_number(),
            Some('\\') => self.chomp_command(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                Ok(self.chomp_identifier())
            },
            Some(c) => match TokenKind::from_punctuation(c) {
                Some(kind) => {
                    self.advance();
                    Ok(self.token(kind, start..self.cursor))
                },
                None => {
                    self.advance();
                    Err(LexError {
                        kind: LexErrorKind::UnexpectedCharacter(c),
                        span: start..self.cursor,
                    })
                },
            },
        }
    }

    fn rest(&self) -> &'a str { &self.src[self.cursor..] }

    fn peek(&self) -> Option<char> { self.rest().chars().next() }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    fn token(&self, kind: TokenKind, span: Range<usize>) -> Token<'a> {
        Token {
            kind,
            text: &self.src[span.clone()],
            span,
            value: 0.0,
        }
    }

    fn take_while<P>(&mut self, mut predicate: P) -> (&'a str, Range<usize>)
    where
        P: FnMut(char) -> bool,
    {
        let start = self.cursor;

        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }

            self.advance();
        }

        let end = self.cursor;
        (&self.src[start..end], start..end)
    }

    fn chomp_number(&mut self) -> Result<Token<'a>, LexError> {
        let mut seen_decimal_point = false;
        let (text, span) = self.take_while(|c| match c {
            '0'..='9' => true,
            '.' if !seen_decimal_point => {
                seen_decimal_point = true;
                true
            },
            _ => false,
        });

        match text.parse::<f64>() {
            Ok(value) => Ok(Token {
                value,
                ..self.token(TokenKind::Number, span)
            }),
            Err(_) => Err(LexError {
                kind: LexErrorKind::InvalidNumber(text.into()),
                span,
            }),
        }
    }

    fn chomp_command(&mut self) -> Result<Token<'a>, LexError> {
        let start = self.cursor;
        // skip past the backslash
        self.advance();

        let (name, _) =
            self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let span = start..self.cursor;

        let kind = match name {
            "times" => TokenKind::Times,
            "div" => TokenKind::Divide,
            _ if FUNCTIONS.contains(&name) => TokenKind::Function,
            _ => {
                return Err(LexError {
                    kind: LexErrorKind::UnknownCommand(name.into()),
                    span,
                })
            },
        };

        Ok(Token {
            kind,
            text: name,
            span,
            value: 0.0,
        })
    }

    fn chomp_identifier(&mut self) -> Token<'a> {
        let (_, span) =
            self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');

        self.token(TokenKind::Identifier, span)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Token {
                kind: TokenKind::End,
                ..
            }) => None,
            other => Some(other),
        }
    }
}

/// A single lexical unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// The token's text. For a [`TokenKind::Function`] or `\times`/`\div`
    /// this is the command name without its leading backslash.
    pub text: &'a str,
    /// Where the token lives in the source, as byte offsets.
    pub span: Range<usize>,
    /// The parsed value of a [`TokenKind::Number`], `0.0` for anything else.
    pub value: f64,
}

/// The kinds of token that can appear in an expression's text form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    End,
    Number,
    Identifier,
    Function,
    Plus,
    Minus,
    Times,
    Divide,
    Caret,
    Equals,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
}

impl TokenKind {
    fn from_punctuation(c: char) -> Option<TokenKind> {
        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Times,
            '/' => TokenKind::Divide,
            '^' => TokenKind::Caret,
            '=' => TokenKind::Equals,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            _ => return None,
        };

        Some(kind)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let description = match self {
            TokenKind::End => "end of input",
            TokenKind::Number => "a number",
            TokenKind::Identifier => "an identifier",
            TokenKind::Function => "a function",
            TokenKind::Plus => "\"+\"",
            TokenKind::Minus => "\"-\"",
            TokenKind::Times => "\"*\"",
            TokenKind::Divide => "\"/\"",
            TokenKind::Caret => "\"^\"",
            TokenKind::Equals => "\"=\"",
            TokenKind::OpenParen => "\"(\"",
            TokenKind::CloseParen => "\")\"",
            TokenKind::OpenBrace => "\"{\"",
            TokenKind::CloseBrace => "\"}\"",
        };

        f.write_str(description)
    }
}

/// Something went wrong while tokenizing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} at position {}", .span.start)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("invalid number \"{0}\"")]
    InvalidNumber(SmolStr),
    #[error("unknown command \"\\{0}\"")]
    UnknownCommand(SmolStr),
}
