// Scanning cursor over a raw header value.
//
// The cursor knows nothing about SIP grammar. Productions that try an
// alternative take a `mark()` and `reset()` to it; only genuinely malformed
// input turns into a `GrammarError`.

use std::str;

use crate::error::{GrammarError, GrammarResult};
use crate::parser::ParseResult;

/// Saved cursor position, used to rewind or to delimit extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

impl Mark {
    pub fn offset(self) -> usize {
        self.0
    }
}

/// A cursor over a borrowed byte span.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
    component: &'static str,
}

fn is_wsp(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n')
}

impl<'a> Cursor<'a> {
    /// Creates a cursor over `input`; errors are attributed to `component`.
    pub fn new(input: &'a [u8], component: &'static str) -> Self {
        Self { input, pos: 0, component }
    }

    /// The component name errors are attributed to.
    pub fn component(&self) -> &'static str {
        self.component
    }

    /// Attribute subsequent errors to another component, returning the old one.
    pub fn set_component(&mut self, component: &'static str) -> &'static str {
        std::mem::replace(&mut self.component, component)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// The byte under the cursor.
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// True if the byte under the cursor is `c`.
    pub fn at(&self, c: u8) -> bool {
        self.peek() == Some(c)
    }

    /// Unconsumed input.
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos.min(self.input.len())..]
    }

    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    /// Rewind (or fast-forward) to a saved mark.
    pub fn reset(&mut self, mark: Mark) {
        debug_assert!(mark.0 <= self.input.len());
        self.pos = mark.0;
    }

    /// Advance past any whitespace and return the new position.
    pub fn skip_whitespace(&mut self) -> usize {
        while let Some(c) = self.peek() {
            if !is_wsp(c) {
                break;
            }
            self.pos += 1;
        }
        self.pos
    }

    /// Advance to the next whitespace byte or the end.
    pub fn skip_non_whitespace(&mut self) -> usize {
        while let Some(c) = self.peek() {
            if is_wsp(c) {
                break;
            }
            self.pos += 1;
        }
        self.pos
    }

    /// Move backwards over whitespace immediately before the cursor.
    pub fn skip_back_whitespace(&mut self) -> usize {
        while self.pos > 0 && is_wsp(self.input[self.pos - 1]) {
            self.pos -= 1;
        }
        self.pos
    }

    /// Advance one byte; a no-op at end of input.
    pub fn advance(&mut self) -> usize {
        if !self.eof() {
            self.pos += 1;
        }
        self.pos
    }

    /// Consume exactly `expected`.
    #[track_caller]
    pub fn skip_char(&mut self, expected: u8) -> GrammarResult<usize> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(self.pos)
            }
            Some(c) => Err(self.fail(format!(
                "Expected '{}', found '{}'",
                expected as char,
                c.escape_ascii()
            ))),
            None => Err(self.fail(format!("Expected '{}', found end of input", expected as char))),
        }
    }

    /// Advance to the first occurrence of `c`, or to the end if there is none.
    pub fn skip_to_char(&mut self, c: u8) -> usize {
        match self.remaining().iter().position(|&b| b == c) {
            Some(i) => self.pos += i,
            None => self.pos = self.input.len(),
        }
        self.pos
    }

    /// Advance to the first byte contained in `set`, or to the end.
    pub fn skip_to_one_of(&mut self, set: &[u8]) -> usize {
        match self.remaining().iter().position(|b| set.contains(b)) {
            Some(i) => self.pos += i,
            None => self.pos = self.input.len(),
        }
        self.pos
    }

    /// Advance while `pred` holds.
    pub fn skip_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += 1;
        }
        self.pos
    }

    /// With the cursor just past an opening quote, advance to the matching
    /// closing `quote`, stepping over backslash escapes. Leaves the cursor on
    /// the closing quote.
    #[track_caller]
    pub fn skip_to_end_quote(&mut self, quote: u8) -> GrammarResult<usize> {
        while let Some(c) = self.peek() {
            if c == b'\\' {
                self.pos = (self.pos + 2).min(self.input.len());
            } else if c == quote {
                return Ok(self.pos);
            } else {
                self.pos += 1;
            }
        }
        Err(self.fail("Unterminated quoted string"))
    }

    /// Bytes between `from` and the cursor, without copying.
    pub fn slice(&self, from: Mark) -> &'a [u8] {
        let (start, end) = if from.0 <= self.pos { (from.0, self.pos) } else { (self.pos, from.0) };
        &self.input[start..end.min(self.input.len())]
    }

    /// Text between `from` and the cursor, copied into an owned string.
    #[track_caller]
    pub fn extract(&self, from: Mark) -> GrammarResult<String> {
        let bytes = self.slice(from);
        str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| self.fail_at(from.0, "Invalid UTF-8"))
    }

    /// Text between `from` and the cursor, borrowed.
    #[track_caller]
    pub fn as_str(&self, from: Mark) -> GrammarResult<&'a str> {
        str::from_utf8(self.slice(from)).map_err(|_| self.fail_at(from.0, "Invalid UTF-8"))
    }

    /// Run a nom parser on the remaining input and advance past whatever it
    /// consumed.
    #[track_caller]
    pub fn parse_with<O>(
        &mut self,
        mut parser: impl FnMut(&'a [u8]) -> ParseResult<'a, O>,
        what: &str,
    ) -> GrammarResult<O> {
        let input = self.remaining();
        match parser(input) {
            Ok((rest, out)) => {
                self.pos += input.len() - rest.len();
                Ok(out)
            }
            Err(nom::Err::Incomplete(_)) => Err(self.fail(format!("Incomplete {}", what))),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                let offset = self.pos + (input.len() - e.input.len());
                Err(self.fail_at(offset, format!("Invalid {}", what)))
            }
        }
    }

    /// Grammar error at the current position.
    #[track_caller]
    pub fn fail(&self, message: impl Into<String>) -> GrammarError {
        GrammarError::at(self.component, self.pos, message)
    }

    /// Grammar error at an explicit offset.
    #[track_caller]
    pub fn fail_at(&self, offset: usize, message: impl Into<String>) -> GrammarError {
        GrammarError::at(self.component, offset, message)
    }
}
