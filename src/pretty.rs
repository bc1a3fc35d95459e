//! Pointing at the part of the input an error came from.

use crate::{lex::LexError, ParseError};
use std::{fmt::Display, ops::Range};

/// An error which knows where in the source text it happened.
pub trait Spanned {
    /// The byte range of the offending text.
    fn span(&self) -> Range<usize>;
}

impl Spanned for LexError {
    fn span(&self) -> Range<usize> { self.span.clone() }
}

impl Spanned for ParseError {
    fn span(&self) -> Range<usize> { ParseError::span(self) }
}

/// Convert a byte offset into a 1-based `(line, column)` pair, where the
/// column counts characters rather than bytes.
///
/// Offsets past the end of the text are clamped to the end.
pub fn line_col_at(source: &str, byte_pos: usize) -> (usize, usize) {
    let byte_pos = clamp_to_char_boundary(source, byte_pos);
    let before = &source[..byte_pos];

    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|ix| ix + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;

    (line, column)
}

/// Render an error with the line it happened on and a row of carets
/// underneath the offending text.
///
/// ```text
/// error: expected a number, an identifier, ... but found "*" at position 4
///  --> 1:5
///   |
/// 1 | 2 + * 3
///   |     ^
/// ```
pub fn render_error<E>(source: &str, error: &E) -> String
where
    E: Spanned + Display + ?Sized,
{
    let span = error.span();
    let start = clamp_to_char_boundary(source, span.start);
    let end = clamp_to_char_boundary(source, span.end.max(start));
    let (line, column) = line_col_at(source, start);

    let line_start = source[..start].rfind('\n').map(|ix| ix + 1).unwrap_or(0);
    let line_end = source[start..]
        .find('\n')
        .map(|ix| start + ix)
        .unwrap_or_else(|| source.len());
    let text = &source[line_start..line_end];

    // only underline the part of the span on the first line
    let underlined = source[start..end.min(line_end)].chars().count().max(1);

    let gutter = line.to_string();
    let padding = " ".repeat(gutter.len());

    format!(
        "error: {msg}\n{pad}--> {line}:{column}\n{pad} |\n{gutter} | {text}\n{pad} | {space}{carets}\n",
        msg = error,
        pad = padding,
        line = line,
        column = column,
        gutter = gutter,
        text = text,
        space = " ".repeat(column - 1),
        carets = "^".repeat(underlined),
    )
}

fn clamp_to_char_boundary(source: &str, mut byte_pos: usize) -> usize {
    byte_pos = byte_pos.min(source.len());

    while !source.is_char_boundary(byte_pos) {
        byte_pos -= 1;
    }

    byte_pos
}
