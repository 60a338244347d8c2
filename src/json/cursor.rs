//! Top-down consumer over a scanned token vector.
//!
//! The whole payload is tokenized before parsing starts, so the cursor can
//! look ahead freely and render a precise context window when something
//! does not match.

use std::fmt::Write as _;

use crate::error::{Error, Result};
use crate::json::writer;
use crate::json::{Token, MAX_DEPTH};

/// How many tokens of context to render on each side of an error.
const ERR_WINDOW: usize = 8;

pub struct TokenCursor<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    depth: usize,
}

impl<'a> TokenCursor<'a> {
    /// The token vector must end with [`Token::End`]; [`scan`](super::scan)
    /// guarantees that.
    pub fn new(tokens: &'a [Token<'a>]) -> TokenCursor<'a> {
        debug_assert!(matches!(tokens.last(), Some(Token::End)));
        TokenCursor { tokens, pos: 0, depth: 0 }
    }

    fn peek(&self) -> Token<'a> {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn pop(&mut self) -> Token<'a> {
        let tok = self.peek();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// Consumes the next token if it is the punctuation `c`.
    pub fn try_punct(&mut self, c: u8) -> bool {
        if self.peek() == Token::Punct(c) {
            self.pop();
            return true;
        }
        false
    }

    /// Consumes the next token if it is `null`.
    pub fn try_null(&mut self) -> bool {
        if self.peek() == Token::Null {
            self.pop();
            return true;
        }
        false
    }

    pub fn expect_punct(&mut self, c: u8) -> Result<()> {
        if self.try_punct(c) {
            return Ok(());
        }
        Err(self.mismatch(&format!("'{}'", c as char)))
    }

    pub fn expect_str(&mut self) -> Result<&'a str> {
        if let Token::Str(s) = self.peek() {
            self.pop();
            return Ok(s);
        }
        Err(self.mismatch("string"))
    }

    pub fn expect_bool(&mut self) -> Result<bool> {
        if let Token::Bool(flag) = self.peek() {
            self.pop();
            return Ok(flag);
        }
        Err(self.mismatch("bool"))
    }

    /// Returns the number both ways: `(double, wrapping integer)`.
    pub fn expect_number(&mut self) -> Result<(f64, i64)> {
        if let Token::Num { value, int } = self.peek() {
            self.pop();
            return Ok((value, int));
        }
        Err(self.mismatch("number"))
    }

    /// Fails unless the whole token stream has been consumed.
    pub fn expect_end(&mut self) -> Result<()> {
        if self.peek() == Token::End {
            return Ok(());
        }
        Err(self.mismatch("eof"))
    }

    /// Iterates the members of an object: `f` is called with each key and
    /// must consume exactly the value.
    pub fn object<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut TokenCursor<'a>, &'a str) -> Result<()>,
    {
        self.descend()?;
        self.expect_punct(b'{')?;
        if !self.try_punct(b'}') {
            loop {
                let key = self.expect_str()?;
                self.expect_punct(b':')?;
                f(self, key)?;
                if self.try_punct(b'}') {
                    break;
                }
                self.expect_punct(b',')?;
            }
        }
        self.depth -= 1;
        Ok(())
    }

    /// Iterates the elements of an array: `f` must consume exactly one
    /// value per call.
    pub fn array<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut TokenCursor<'a>) -> Result<()>,
    {
        self.descend()?;
        self.expect_punct(b'[')?;
        if !self.try_punct(b']') {
            loop {
                f(self)?;
                if self.try_punct(b']') {
                    break;
                }
                self.expect_punct(b',')?;
            }
        }
        self.depth -= 1;
        Ok(())
    }

    /// Recursively consumes one value of any shape. Unknown object keys
    /// are skipped through here.
    pub fn skip_value(&mut self) -> Result<()> {
        match self.peek() {
            Token::Str(_) | Token::Num { .. } | Token::Bool(_) | Token::Null => {
                self.pop();
                Ok(())
            }
            Token::Punct(b'{') => self.object(|cur, _key| cur.skip_value()),
            Token::Punct(b'[') => self.array(TokenCursor::skip_value),
            _ => Err(self.mismatch("value")),
        }
    }

    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::Malformed(format!(
                "json nesting deeper than {MAX_DEPTH} levels"
            )));
        }
        Ok(())
    }

    /// Builds a malformed-data error describing the current token,
    /// followed by a rendering of the surrounding tokens with a caret
    /// under the offender.
    pub fn mismatch(&self, expected: &str) -> Error {
        let mut msg = format!("expected {expected}, got ");
        render_token(&mut msg, self.peek());
        msg.push_str("\nwhile parsing\n    ");

        let first = self.pos.saturating_sub(ERR_WINDOW);
        let last = (self.pos + ERR_WINDOW).min(self.tokens.len());
        let mut caret_pos = 0;
        let mut caret_len = 1;
        for (i, &tok) in self.tokens[first..last].iter().enumerate() {
            let before = msg.len();
            render_token(&mut msg, tok);
            let written = msg.len() - before;
            if first + i < self.pos {
                caret_pos += written;
            } else if first + i == self.pos {
                caret_len = written.max(1);
            }
        }
        msg.push('\n');
        let _ = write!(msg, "{:width$}^", "", width = 4 + caret_pos);
        for _ in 1..caret_len {
            msg.push('~');
        }
        Error::Malformed(msg)
    }
}

fn render_token(out: &mut String, tok: Token<'_>) {
    match tok {
        Token::Punct(c) => out.push(c as char),
        Token::Bool(flag) => out.push_str(if flag { "true" } else { "false" }),
        Token::Null => out.push_str("null"),
        Token::Str(s) => writer::write_string_human(out, s),
        Token::Num { value, int } => {
            if value == int as f64 {
                let _ = write!(out, "{int}");
            } else {
                let _ = write!(out, "{value:.10e}");
            }
        }
        Token::End => out.push_str("eof"),
    }
}
