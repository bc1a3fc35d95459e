use crate::{
    lex::{LexError, Lexer, Token, TokenKind},
    BinaryOperation, Equation, Expression,
};
use smol_str::SmolStr;
use std::ops::Range;

/// Parse an [`Expression`] tree from some text.
pub fn parse(src: &str) -> Result<Expression, ParseError> {
    Parser::new(src)?.parse()
}

/// Parse an [`Equation`] of the form `expression = expression`.
pub fn parse_equation(src: &str) -> Result<Equation, ParseError> {
    Parser::new(src)?.parse_equation()
}

/// The default for [`ParserOptions::max_depth`].
///
/// Each level of nesting costs the parser around nine stack frames, so this
/// leaves plenty of headroom on a 2 MiB thread even in a debug build.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// The default for [`ParserOptions::max_height`].
pub const DEFAULT_MAX_HEIGHT: usize = 256;

/// Knobs for tweaking how a [`Parser`] behaves.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParserOptions {
    /// How deeply groups, function arguments and unary operators may nest
    /// before the input is rejected with [`ParseError::TooDeeplyNested`].
    ///
    /// This bounds the parser's own recursion.
    pub max_depth: usize,
    /// The tallest tree the parser will produce before failing with
    /// [`ParseError::TooTall`].
    ///
    /// Everything downstream of the parser walks trees recursively, so this
    /// bounds their stack usage.
    pub max_height: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

/// A precedence-climbing recursive descent parser.
///
/// The grammar, from lowest to highest precedence:
///
/// ```text
/// expression     := additive
/// additive       := multiplicative ( ("+" | "-") multiplicative )*
/// multiplicative := power ( ("*" | "/") power )*
/// power          := unary ( "^" unary )*
/// unary          := ("-" | "+") unary
///                 | primary
/// primary        := NUMBER
///                 | IDENTIFIER
///                 | FUNCTION "{" expression "}"
///                 | "(" expression ")"
///                 | "{" expression "}"
/// ```
///
/// All binary operators (including `^`) are left-associative. A unary minus
/// becomes `0 - operand` and a unary plus is dropped.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token<'a>,
    options: ParserOptions,
    depth: usize,
}

/// A parsed subtree and its height, so we can reject trees which are too deep
/// without walking them again.
struct Subtree {
    expr: Expression,
    height: usize,
}

impl Subtree {
    fn leaf(expr: Expression) -> Self { Subtree { expr, height: 1 } }
}

const PRIMARY: &[TokenKind] = &[
    TokenKind::Number,
    TokenKind::Identifier,
    TokenKind::Function,
    TokenKind::OpenParen,
    TokenKind::OpenBrace,
    TokenKind::Minus,
    TokenKind::Plus,
];

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> Result<Self, ParseError> {
        Parser::with_options(src, ParserOptions::default())
    }

    pub fn with_options(
        src: &'a str,
        options: ParserOptions,
    ) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(src);
        let current = lexer.next_token()?;

        Ok(Parser {
            lexer,
            current,
            options,
            depth: 0,
        })
    }

    /// Parse a single expression, which must take up the entire input.
    pub fn parse(mut self) -> Result<Expression, ParseError> {
        let expr = self.expression()?;
        self.expect(&[TokenKind::End])?;

        log::trace!("parsed \"{}\" as {}", self.lexer.source(), expr.expr);
        Ok(expr.expr)
    }

    /// Parse an equation, which must take up the entire input.
    pub fn parse_equation(mut self) -> Result<Equation, ParseError> {
        let left = self.expression()?;
        self.expect(&[TokenKind::Equals])?;
        let right = self.expression()?;
        self.expect(&[TokenKind::End])?;

        let equation = Equation::new(left.expr, right.expr);
        log::trace!("parsed \"{}\" as {}", self.lexer.source(), equation);
        Ok(equation)
    }

    fn advance(&mut self) -> Result<Token<'a>, ParseError> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn expect(
        &mut self,
        expected: &'static [TokenKind],
    ) -> Result<Token<'a>, ParseError> {
        if expected.contains(&self.current.kind) {
            self.advance()
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static [TokenKind]) -> ParseError {
        ParseError::UnexpectedToken {
            found: self.current.kind,
            text: self.current.text.into(),
            span: self.current.span.clone(),
            expected,
        }
    }

    /// Run a parse function one level deeper, bailing out if we've gone too
    /// far.
    fn nested<F>(&mut self, parse: F) -> Result<Subtree, ParseError>
    where
        F: FnOnce(&mut Parser<'a>) -> Result<Subtree, ParseError>,
    {
        if self.depth >= self.options.max_depth {
            return Err(self.too_deep(self.current.span.clone()));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;

        result
    }

    fn too_deep(&self, span: Range<usize>) -> ParseError {
        ParseError::TooDeeplyNested {
            max_depth: self.options.max_depth,
            span,
        }
    }

    fn too_tall(&self, span: Range<usize>) -> ParseError {
        ParseError::TooTall {
            max_height: self.options.max_height,
            span,
        }
    }

    fn combine(
        &self,
        left: Subtree,
        right: Subtree,
        op: BinaryOperation,
        operator_span: Range<usize>,
    ) -> Result<Subtree, ParseError> {
        let height = left.height.max(right.height) + 1;

        if height > self.options.max_height {
            return Err(self.too_tall(operator_span));
        }

        Ok(Subtree {
            expr: Expression::binary(left.expr, right.expr, op),
            height,
        })
    }

    fn expression(&mut self) -> Result<Subtree, ParseError> {
        self.additive()
    }

    fn additive(&mut self) -> Result<Subtree, ParseError> {
        let mut left = self.multiplicative()?;

        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOperation::Plus,
                TokenKind::Minus => BinaryOperation::Minus,
                _ => return Ok(left),
            };
            let operator = self.advance()?;
            let right = self.multiplicative()?;
            left = self.combine(left, right, op, operator.span)?;
        }
    }

    fn multiplicative(&mut self) -> Result<Subtree, ParseError> {
        let mut left = self.power()?;

        loop {
            let op = match self.current.kind {
                TokenKind::Times => BinaryOperation::Times,
                TokenKind::Divide => BinaryOperation::Divide,
                _ => return Ok(left),
            };
            let operator = self.advance()?;
            let right = self.power()?;
            left = self.combine(left, right, op, operator.span)?;
        }
    }

    fn power(&mut self) -> Result<Subtree, ParseError> {
        let mut left = self.unary()?;

        while self.current.kind == TokenKind::Caret {
            let operator = self.advance()?;
            let right = self.unary()?;
            left =
                self.combine(left, right, BinaryOperation::Power, operator.span)?;
        }

        Ok(left)
    }

    fn unary(&mut self) -> Result<Subtree, ParseError> {
        match self.current.kind {
            TokenKind::Minus => {
                let minus = self.advance()?;
                let operand = self.nested(|p| p.unary())?;
                let zero = Subtree::leaf(Expression::Number(0.0));
                self.combine(zero, operand, BinaryOperation::Minus, minus.span)
            },
            TokenKind::Plus => {
                let _ = self.advance()?;
                self.nested(|p| p.unary())
            },
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Subtree, ParseError> {
        match self.current.kind {
            TokenKind::Number => {
                let token = self.advance()?;
                Ok(Subtree::leaf(Expression::Number(token.value)))
            },
            TokenKind::Identifier => {
                let token = self.advance()?;
                Ok(Subtree::leaf(Expression::symbol(token.text)))
            },
            TokenKind::Function => {
                let function = self.advance()?;
                self.expect(&[TokenKind::OpenBrace])?;
                let argument = self.nested(|p| p.expression())?;
                let close = self.expect(&[TokenKind::CloseBrace])?;

                let height = argument.height + 1;
                if height > self.options.max_height {
                    return Err(self.too_tall(close.span));
                }

                Ok(Subtree {
                    expr: Expression::function(function.text, argument.expr),
                    height,
                })
            },
            TokenKind::OpenParen => {
                self.grouped(&[TokenKind::CloseParen])
            },
            TokenKind::OpenBrace => {
                self.grouped(&[TokenKind::CloseBrace])
            },
            _ => Err(self.unexpected(PRIMARY)),
        }
    }

    fn grouped(
        &mut self,
        close: &'static [TokenKind],
    ) -> Result<Subtree, ParseError> {
        // skip past the opening bracket
        let _ = self.advance()?;
        let inner = self.nested(|p| p.expression())?;
        self.expect(close)?;

        Ok(inner)
    }
}

/// Possible errors that may occur while parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(
        "expected {}, but found {} at position {}",
        describe_expected(.expected),
        describe_found(.found, .text),
        .span.start
    )]
    UnexpectedToken {
        found: TokenKind,
        /// The offending token's text.
        text: SmolStr,
        span: Range<usize>,
        expected: &'static [TokenKind],
    },
    #[error(
        "the input is nested more than {max_depth} levels deep (position {})",
        .span.start
    )]
    TooDeeplyNested { max_depth: usize, span: Range<usize> },
    #[error(
        "the expression is more than {max_height} operations tall (position {})",
        .span.start
    )]
    TooTall { max_height: usize, span: Range<usize> },
}

impl ParseError {
    /// Where in the source this error occurred.
    pub fn span(&self) -> Range<usize> {
        match self {
            ParseError::Lex(e) => e.span.clone(),
            ParseError::UnexpectedToken { span, .. }
            | ParseError::TooDeeplyNested { span, .. }
            | ParseError::TooTall { span, .. } => span.clone(),
        }
    }
}

fn describe_expected(expected: &[TokenKind]) -> String {
    match expected {
        [] => String::from("nothing"),
        [single] => single.to_string(),
        [init @ .., last] => {
            let init: Vec<_> = init.iter().map(ToString::to_string).collect();
            format!("{} or {}", init.join(", "), last)
        },
    }
}

fn describe_found(kind: &TokenKind, text: &str) -> String {
    match kind {
        TokenKind::Number | TokenKind::Identifier | TokenKind::Function => {
            format!("{} \"{}\"", kind, text)
        },
        _ => kind.to_string(),
    }
}
