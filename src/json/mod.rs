//! A small JSON layer tuned to the output of one specific peer.
//!
//! i3 emits JSON with a minimal encoder: no exponents in numbers, no
//! surrogate-pair recombination, predictable key order. The scanner here
//! exploits that: it tokenizes a whole payload in one forward pass,
//! decoding string escapes in place (the decoded form never outgrows the
//! source), and hands the parser a complete token vector so lookahead and
//! precise diagnostics are cheap.
//!
//! This module intentionally does not accept arbitrary JSON; numbers with
//! exponents are rejected as malformed.

mod cursor;
mod scanner;
pub mod writer;


pub use cursor::TokenCursor;
pub use scanner::scan;

/// Maximum nesting depth accepted while parsing or skipping values.
/// The container tree recurses, so runaway input must not blow the stack.
pub const MAX_DEPTH: usize = 200;

/// One scanned token. String tokens borrow the (already unescaped)
/// payload buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    /// One of `[ ] { } : ,`, encoded as itself.
    Punct(u8),
    /// A string literal, escapes decoded.
    Str(&'a str),
    /// A number, carried both as a double and as a wrapping 64-bit integer.
    Num {
        /// Floating-point reading of the literal.
        value: f64,
        /// Two's-complement integer reading; overflow wraps silently.
        int: i64,
    },
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
    /// End of input. Always the final token of a scan.
    End,
}
