//! JSON emission primitives, the mirror image of the scanner.
//!
//! Canonical output matches what the parser accepts: minimal escaping
//! (backslash, quote, newline, other control bytes as `\u00XX`), no
//! whitespace, floats with six fraction digits.

use std::fmt::Write as _;

/// Escapes `s` into `out` as a quoted JSON string.
pub fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Human-readable string rendering for diagnostics: long values are cut
/// off with an ellipsis so an error window stays one line.
pub fn write_string_human(out: &mut String, s: &str) {
    if s.len() <= 200 {
        write_string(out, s);
        return;
    }
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= 31)
        .last()
        .unwrap_or(0);
    write_string(out, &s[..cut]);
    out.push_str("...");
}

/// Accumulates canonical JSON. Containers are written through the scope
/// types, which handle comma placement.
pub struct JsonWriter {
    out: String,
}

impl JsonWriter {
    pub fn new() -> JsonWriter {
        JsonWriter { out: String::new() }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    pub fn value_str(&mut self, s: &str) {
        write_string(&mut self.out, s);
    }

    pub fn value_bool(&mut self, flag: bool) {
        self.out.push_str(if flag { "true" } else { "false" });
    }

    pub fn value_i64(&mut self, v: i64) {
        let _ = write!(self.out, "{v}");
    }

    pub fn value_u64(&mut self, v: u64) {
        let _ = write!(self.out, "{v}");
    }

    /// Floats render with a fixed six fraction digits, the way the peer's
    /// own encoder does.
    pub fn value_f32(&mut self, v: f32) {
        let _ = write!(self.out, "{v:.6}");
    }

    pub fn value_null(&mut self) {
        self.out.push_str("null");
    }

    pub fn object(&mut self) -> ObjectScope<'_> {
        self.out.push('{');
        ObjectScope { w: self, count: 0 }
    }

    pub fn array(&mut self) -> ArrayScope<'_> {
        self.out.push('[');
        ArrayScope { w: self, count: 0 }
    }
}

pub struct ObjectScope<'w> {
    w: &'w mut JsonWriter,
    count: usize,
}

impl<'w> ObjectScope<'w> {
    /// Writes the key (with separators) and hands back the writer for the
    /// value.
    pub fn key(&mut self, key: &str) -> &mut JsonWriter {
        if self.count > 0 {
            self.w.out.push(',');
        }
        self.count += 1;
        write_string(&mut self.w.out, key);
        self.w.out.push(':');
        self.w
    }

    pub fn finish(self) {
        self.w.out.push('}');
    }
}

pub struct ArrayScope<'w> {
    w: &'w mut JsonWriter,
    count: usize,
}

impl<'w> ArrayScope<'w> {
    pub fn element(&mut self) -> &mut JsonWriter {
        if self.count > 0 {
            self.w.out.push(',');
        }
        self.count += 1;
        self.w
    }

    pub fn finish(self) {
        self.w.out.push(']');
    }
}
