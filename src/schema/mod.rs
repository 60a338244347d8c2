//! Record schemas for every reply and event the peer can send.
//!
//! Each message is modeled as a plain struct; the field list of a record
//! drives both directions, so the parser and the emitter cannot drift
//! apart. The conventions replacing the C library's sidecar fields:
//!
//! - arrays carry their length in the `Vec`,
//! - optional scalars and strings are `Option`s,
//! - strings with a fixed value set keep the raw string and gain a
//!   `<name>_kind: Option<Enum>` sibling holding the table lookup
//!   (an unrecognized value is `None`).
//!
//! Records parse from the token cursor and re-emit canonical JSON; for
//! every valid peer message, parsing the emitted form reproduces the
//! record. Unknown JSON keys are skipped and do not round-trip.

pub mod bar;
pub mod event;
pub mod node;
pub mod reply;

#[cfg(test)]
mod tests;

use crate::error::Result;
use crate::json::writer::{JsonWriter, ObjectScope};
use crate::json::{scan, TokenCursor};

/// Materializes a value from a token stream.
pub trait FromJson: Sized {
    /// Consumes exactly one JSON value from the cursor.
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<Self>;
}

/// Renders a value as canonical JSON.
pub trait EmitJson {
    /// Writes exactly one JSON value.
    fn emit_json(&self, w: &mut JsonWriter);
}

/// Parses a complete payload into `T`. The payload buffer is scanned
/// destructively (strings are unescaped in place); every token must be
/// consumed.
pub fn from_payload<T: FromJson>(payload: &mut [u8]) -> Result<T> {
    let tokens = scan(payload)?;
    let mut cur = TokenCursor::new(&tokens);
    let value = T::from_json(&mut cur)?;
    cur.expect_end()?;
    Ok(value)
}

/// Renders `value` back to canonical JSON.
pub fn to_json<T: EmitJson + ?Sized>(value: &T) -> String {
    let mut w = JsonWriter::new();
    value.emit_json(&mut w);
    w.into_string()
}

impl FromJson for bool {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<bool> {
        cur.expect_bool()
    }
}

impl FromJson for i32 {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<i32> {
        Ok(cur.expect_number()?.1 as i32)
    }
}

impl FromJson for i64 {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<i64> {
        Ok(cur.expect_number()?.1)
    }
}

impl FromJson for u64 {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<u64> {
        Ok(cur.expect_number()?.1 as u64)
    }
}

impl FromJson for f32 {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<f32> {
        Ok(cur.expect_number()?.0 as f32)
    }
}

impl FromJson for String {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<String> {
        Ok(cur.expect_str()?.to_owned())
    }
}

impl<T: FromJson> FromJson for Option<T> {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<Option<T>> {
        if cur.try_null() {
            return Ok(None);
        }
        Ok(Some(T::from_json(cur)?))
    }
}

impl<T: FromJson> FromJson for Vec<T> {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<Vec<T>> {
        let mut out = Vec::new();
        cur.array(|cur| {
            out.push(T::from_json(cur)?);
            Ok(())
        })?;
        Ok(out)
    }
}

impl<T: FromJson> FromJson for Box<T> {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<Box<T>> {
        Ok(Box::new(T::from_json(cur)?))
    }
}

impl EmitJson for bool {
    fn emit_json(&self, w: &mut JsonWriter) {
        w.value_bool(*self);
    }
}

impl EmitJson for i32 {
    fn emit_json(&self, w: &mut JsonWriter) {
        w.value_i64(i64::from(*self));
    }
}

impl EmitJson for i64 {
    fn emit_json(&self, w: &mut JsonWriter) {
        w.value_i64(*self);
    }
}

impl EmitJson for u64 {
    fn emit_json(&self, w: &mut JsonWriter) {
        w.value_u64(*self);
    }
}

impl EmitJson for f32 {
    fn emit_json(&self, w: &mut JsonWriter) {
        w.value_f32(*self);
    }
}

impl EmitJson for str {
    fn emit_json(&self, w: &mut JsonWriter) {
        w.value_str(self);
    }
}

impl EmitJson for String {
    fn emit_json(&self, w: &mut JsonWriter) {
        w.value_str(self);
    }
}

/// `Some` emits the inner value, `None` emits `null`.
impl<T: EmitJson> EmitJson for Option<T> {
    fn emit_json(&self, w: &mut JsonWriter) {
        match self {
            Some(value) => value.emit_json(w),
            None => w.value_null(),
        }
    }
}

impl<T: EmitJson> EmitJson for Vec<T> {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut arr = w.array();
        for value in self {
            value.emit_json(arr.element());
        }
        arr.finish();
    }
}

impl<T: EmitJson> EmitJson for Box<T> {
    fn emit_json(&self, w: &mut JsonWriter) {
        (**self).emit_json(w);
    }
}

/// Emits an optional field that renders as an explicit `null` when unset.
pub(crate) fn field_opt<T: EmitJson>(obj: &mut ObjectScope<'_>, key: &str, value: &Option<T>) {
    value.emit_json(obj.key(key));
}

/// Emits an optional field that is left out entirely when unset.
pub(crate) fn field_omit<T: EmitJson>(obj: &mut ObjectScope<'_>, key: &str, value: &Option<T>) {
    if let Some(value) = value {
        value.emit_json(obj.key(key));
    }
}

/// Declares an enum backed by a wire-string table, with lookups in both
/// directions. Unrecognized wire strings deliberately map to `None`, never
/// to an error: the set of values grows with the peer.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// The wire string for this value.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }

            /// Looks up a wire string; unknown strings yield `None`.
            pub fn from_name(name: &str) -> Option<$name> {
                match name {
                    $( $text => Some($name::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

pub(crate) use string_enum;
