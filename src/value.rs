//! Boundary validation: turns caller values into [`serde_json::Value`].
//!
//! `serde_json::to_value` quietly maps NaN and infinities to `null`, which
//! would break the "what you set is what you load" guarantee. So before
//! converting, the input is walked once by [`Probe`], a serializer that
//! produces nothing and only fails on values JSON can't hold:
//!
//! - a top-level `None` (the "no value" sentinel; pass `Value::Null` or `()`
//!   to store a literal `null`)
//! - any non-finite `f32`/`f64`, at any depth

use crate::error::{Error, Result};
use crate::store::LAST_UPDATE_KEY;
use serde::ser::{self, Serialize};
use serde_json::Value;
use std::fmt;

/// Validate `value` and convert it into a JSON value.
pub fn to_json<T>(value: &T) -> Result<Value>
where
    T: Serialize + ?Sized,
{
    value
        .serialize(Probe { top: true })
        .map_err(|e| Error::Validation(e.0))?;
    serde_json::to_value(value).map_err(|e| Error::Validation(e.to_string()))
}

/// Reject empty keys and the reserved timestamp key.
pub fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::Validation("key must be a non-empty string".into()));
    }
    if key == LAST_UPDATE_KEY {
        return Err(Error::Validation(format!("{LAST_UPDATE_KEY} is reserved")));
    }
    Ok(())
}

#[derive(Debug)]
struct Invalid(String);

impl fmt::Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Invalid {}

impl ser::Error for Invalid {
    fn custom<M: fmt::Display>(msg: M) -> Self {
        Invalid(msg.to_string())
    }
}

#[derive(Clone, Copy)]
struct Probe {
    top: bool,
}

impl Probe {
    const NESTED: Probe = Probe { top: false };

    fn float(v: f64) -> std::result::Result<(), Invalid> {
        if v.is_finite() {
            Ok(())
        } else {
            Err(Invalid(format!("{v} is not a valid JSON number")))
        }
    }
}

impl ser::Serializer for Probe {
    type Ok = ();
    type Error = Invalid;
    type SerializeSeq = Probe;
    type SerializeTuple = Probe;
    type SerializeTupleStruct = Probe;
    type SerializeTupleVariant = Probe;
    type SerializeMap = Probe;
    type SerializeStruct = Probe;
    type SerializeStructVariant = Probe;

    fn serialize_bool(self, _: bool) -> std::result::Result<(), Invalid> {
        Ok(())
    }
    fn serialize_i8(self, _: i8) -> std::result::Result<(), Invalid> {
        Ok(())
    }
    fn serialize_i16(self, _: i16) -> std::result::Result<(), Invalid> {
        Ok(())
    }
    fn serialize_i32(self, _: i32) -> std::result::Result<(), Invalid> {
        Ok(())
    }
    fn serialize_i64(self, _: i64) -> std::result::Result<(), Invalid> {
        Ok(())
    }
    fn serialize_i128(self, _: i128) -> std::result::Result<(), Invalid> {
        Ok(())
    }
    fn serialize_u8(self, _: u8) -> std::result::Result<(), Invalid> {
        Ok(())
    }
    fn serialize_u16(self, _: u16) -> std::result::Result<(), Invalid> {
        Ok(())
    }
    fn serialize_u32(self, _: u32) -> std::result::Result<(), Invalid> {
        Ok(())
    }
    fn serialize_u64(self, _: u64) -> std::result::Result<(), Invalid> {
        Ok(())
    }
    fn serialize_u128(self, _: u128) -> std::result::Result<(), Invalid> {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> std::result::Result<(), Invalid> {
        Probe::float(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> std::result::Result<(), Invalid> {
        Probe::float(v)
    }

    fn serialize_char(self, _: char) -> std::result::Result<(), Invalid> {
        Ok(())
    }
    fn serialize_str(self, _: &str) -> std::result::Result<(), Invalid> {
        Ok(())
    }
    fn serialize_bytes(self, _: &[u8]) -> std::result::Result<(), Invalid> {
        Ok(())
    }

    fn serialize_none(self) -> std::result::Result<(), Invalid> {
        if self.top {
            Err(Invalid("value must be given (got None)".into()))
        } else {
            Ok(())
        }
    }

    fn serialize_some<T>(self, value: &T) -> std::result::Result<(), Invalid>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> std::result::Result<(), Invalid> {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> std::result::Result<(), Invalid> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> std::result::Result<(), Invalid> {
        Ok(())
    }

    fn serialize_newtype_struct<T>(
        self,
        _: &'static str,
        value: &T,
    ) -> std::result::Result<(), Invalid>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> std::result::Result<(), Invalid>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(Probe::NESTED)
    }

    fn serialize_seq(self, _: Option<usize>) -> std::result::Result<Probe, Invalid> {
        Ok(Probe::NESTED)
    }

    fn serialize_tuple(self, _: usize) -> std::result::Result<Probe, Invalid> {
        Ok(Probe::NESTED)
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Probe, Invalid> {
        Ok(Probe::NESTED)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Probe, Invalid> {
        Ok(Probe::NESTED)
    }

    fn serialize_map(self, _: Option<usize>) -> std::result::Result<Probe, Invalid> {
        Ok(Probe::NESTED)
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> std::result::Result<Probe, Invalid> {
        Ok(Probe::NESTED)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Probe, Invalid> {
        Ok(Probe::NESTED)
    }
}

// ---- compound forms: every element goes through a nested probe -------------

impl ser::SerializeSeq for Probe {
    type Ok = ();
    type Error = Invalid;

    fn serialize_element<T>(&mut self, value: &T) -> std::result::Result<(), Invalid>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(Probe::NESTED)
    }

    fn end(self) -> std::result::Result<(), Invalid> {
        Ok(())
    }
}

impl ser::SerializeTuple for Probe {
    type Ok = ();
    type Error = Invalid;

    fn serialize_element<T>(&mut self, value: &T) -> std::result::Result<(), Invalid>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(Probe::NESTED)
    }

    fn end(self) -> std::result::Result<(), Invalid> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for Probe {
    type Ok = ();
    type Error = Invalid;

    fn serialize_field<T>(&mut self, value: &T) -> std::result::Result<(), Invalid>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(Probe::NESTED)
    }

    fn end(self) -> std::result::Result<(), Invalid> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for Probe {
    type Ok = ();
    type Error = Invalid;

    fn serialize_field<T>(&mut self, value: &T) -> std::result::Result<(), Invalid>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(Probe::NESTED)
    }

    fn end(self) -> std::result::Result<(), Invalid> {
        Ok(())
    }
}

impl ser::SerializeMap for Probe {
    type Ok = ();
    type Error = Invalid;

    // Key types are checked by serde_json itself during conversion.
    fn serialize_key<T>(&mut self, _: &T) -> std::result::Result<(), Invalid>
    where
        T: Serialize + ?Sized,
    {
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> std::result::Result<(), Invalid>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(Probe::NESTED)
    }

    fn end(self) -> std::result::Result<(), Invalid> {
        Ok(())
    }
}

impl ser::SerializeStruct for Probe {
    type Ok = ();
    type Error = Invalid;

    fn serialize_field<T>(&mut self, _: &'static str, value: &T) -> std::result::Result<(), Invalid>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(Probe::NESTED)
    }

    fn end(self) -> std::result::Result<(), Invalid> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for Probe {
    type Ok = ();
    type Error = Invalid;

    fn serialize_field<T>(&mut self, _: &'static str, value: &T) -> std::result::Result<(), Invalid>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(Probe::NESTED)
    }

    fn end(self) -> std::result::Result<(), Invalid> {
        Ok(())
    }
}
