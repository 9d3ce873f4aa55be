//! Field capture through the serde data model.
//!
//! [`RecordSerializer`] accepts a struct-shaped value and walks its fields in
//! declaration order. Each field value goes through [`ValueFormatter`], which
//! applies the fixed formatting table:
//!
//! | serde type | output |
//! |---|---|
//! | `str`, `char` (and `collect_str`, used by chrono) | verbatim |
//! | `i8`..`i128`, `u8`..`u128` | base-10 |
//! | `f32`, `f64` | fixed point, two fraction digits; `+Inf`, `-Inf`, `NaN` |
//! | `bool` | `true` / `false` |
//! | everything else | empty string |
//!
//! `Some`, newtype structs and smart pointers are transparent at both levels.

use serde::ser::{self, Impossible, Serialize};

use super::record::CapturedRecord;
use crate::error::EncodeError;

/// Top-level serializer: turns a record into a [`CapturedRecord`].
pub(crate) struct RecordSerializer;

fn not_a_struct<T>(kind: &'static str) -> Result<T, EncodeError> {
    Err(EncodeError::StructExpected { kind })
}

impl ser::Serializer for RecordSerializer {
    type Ok = CapturedRecord;
    type Error = EncodeError;

    type SerializeSeq = Impossible<CapturedRecord, EncodeError>;
    type SerializeTuple = Impossible<CapturedRecord, EncodeError>;
    type SerializeTupleStruct = FieldCollector;
    type SerializeTupleVariant = Impossible<CapturedRecord, EncodeError>;
    type SerializeMap = Impossible<CapturedRecord, EncodeError>;
    type SerializeStruct = FieldCollector;
    type SerializeStructVariant = FieldCollector;

    fn serialize_bool(self, _v: bool) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("bool")
    }

    fn serialize_i8(self, _v: i8) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("i8")
    }

    fn serialize_i16(self, _v: i16) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("i16")
    }

    fn serialize_i32(self, _v: i32) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("i32")
    }

    fn serialize_i64(self, _v: i64) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("i64")
    }

    fn serialize_i128(self, _v: i128) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("i128")
    }

    fn serialize_u8(self, _v: u8) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("u8")
    }

    fn serialize_u16(self, _v: u16) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("u16")
    }

    fn serialize_u32(self, _v: u32) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("u32")
    }

    fn serialize_u64(self, _v: u64) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("u64")
    }

    fn serialize_u128(self, _v: u128) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("u128")
    }

    fn serialize_f32(self, _v: f32) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("f32")
    }

    fn serialize_f64(self, _v: f64) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("f64")
    }

    fn serialize_char(self, _v: char) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("char")
    }

    fn serialize_str(self, _v: &str) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("str")
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("bytes")
    }

    fn serialize_none(self) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("none")
    }

    fn serialize_some<T: ?Sized + Serialize>(
        self,
        value: &T,
    ) -> Result<CapturedRecord, EncodeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("unit")
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<CapturedRecord, EncodeError> {
        Ok(CapturedRecord::default())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("unit variant")
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<CapturedRecord, EncodeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<CapturedRecord, EncodeError> {
        not_a_struct("newtype variant")
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, EncodeError> {
        not_a_struct("seq")
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, EncodeError> {
        not_a_struct("tuple")
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodeError> {
        Ok(FieldCollector::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodeError> {
        not_a_struct("tuple variant")
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, EncodeError> {
        not_a_struct("map")
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, EncodeError> {
        Ok(FieldCollector::new(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, EncodeError> {
        Ok(FieldCollector::new(len))
    }
}

/// Accumulates the fields of one struct-shaped record.
pub(crate) struct FieldCollector {
    record: CapturedRecord,
}

impl FieldCollector {
    fn new(len: usize) -> Self {
        Self {
            record: CapturedRecord::with_capacity(len),
        }
    }

    fn capture<T: ?Sized + Serialize>(
        &mut self,
        name: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        let text = value.serialize(ValueFormatter)?;
        self.record.push(name, text);
        Ok(())
    }
}

impl ser::SerializeStruct for FieldCollector {
    type Ok = CapturedRecord;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.capture(key, value)
    }

    // Keep the column when `skip_serializing_if` drops a value so rows stay
    // aligned with the heading.
    fn skip_field(&mut self, key: &'static str) -> Result<(), EncodeError> {
        self.record.push(key, Some(String::new()));
        Ok(())
    }

    fn end(self) -> Result<CapturedRecord, EncodeError> {
        Ok(self.record)
    }
}

impl ser::SerializeStructVariant for FieldCollector {
    type Ok = CapturedRecord;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.capture(key, value)
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), EncodeError> {
        self.record.push(key, Some(String::new()));
        Ok(())
    }

    fn end(self) -> Result<CapturedRecord, EncodeError> {
        Ok(self.record)
    }
}

impl ser::SerializeTupleStruct for FieldCollector {
    type Ok = CapturedRecord;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.capture("", value)
    }

    fn end(self) -> Result<CapturedRecord, EncodeError> {
        Ok(self.record)
    }
}

/// Formats a single field value. `Ok(None)` marks a type with no rule.
pub(crate) struct ValueFormatter;

fn text(s: String) -> Result<Option<String>, EncodeError> {
    Ok(Some(s))
}

/// Two fraction digits; non-finite values are spelled `+Inf`, `-Inf`, `NaN`.
fn fixed_point(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf" } else { "-Inf" }.to_string()
    } else {
        format!("{:.2}", v)
    }
}

impl ser::Serializer for ValueFormatter {
    type Ok = Option<String>;
    type Error = EncodeError;

    type SerializeSeq = Discard;
    type SerializeTuple = Discard;
    type SerializeTupleStruct = Discard;
    type SerializeTupleVariant = Discard;
    type SerializeMap = Discard;
    type SerializeStruct = Discard;
    type SerializeStructVariant = Discard;

    fn serialize_bool(self, v: bool) -> Result<Option<String>, EncodeError> {
        text(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<Option<String>, EncodeError> {
        text(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<Option<String>, EncodeError> {
        text(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<Option<String>, EncodeError> {
        text(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<Option<String>, EncodeError> {
        text(v.to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<Option<String>, EncodeError> {
        text(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<Option<String>, EncodeError> {
        text(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<Option<String>, EncodeError> {
        text(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<Option<String>, EncodeError> {
        text(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<Option<String>, EncodeError> {
        text(v.to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<Option<String>, EncodeError> {
        text(v.to_string())
    }

    fn serialize_f32(self, v: f32) -> Result<Option<String>, EncodeError> {
        text(fixed_point(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Option<String>, EncodeError> {
        text(fixed_point(v))
    }

    fn serialize_char(self, v: char) -> Result<Option<String>, EncodeError> {
        text(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<Option<String>, EncodeError> {
        text(v.to_owned())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Option<String>, EncodeError> {
        Ok(None)
    }

    fn serialize_none(self) -> Result<Option<String>, EncodeError> {
        Ok(None)
    }

    fn serialize_some<T: ?Sized + Serialize>(
        self,
        value: &T,
    ) -> Result<Option<String>, EncodeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Option<String>, EncodeError> {
        Ok(None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Option<String>, EncodeError> {
        Ok(None)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Option<String>, EncodeError> {
        Ok(None)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Option<String>, EncodeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Option<String>, EncodeError> {
        Ok(None)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Discard, EncodeError> {
        Ok(Discard)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Discard, EncodeError> {
        Ok(Discard)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Discard, EncodeError> {
        Ok(Discard)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Discard, EncodeError> {
        Ok(Discard)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Discard, EncodeError> {
        Ok(Discard)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Discard, EncodeError> {
        Ok(Discard)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Discard, EncodeError> {
        Ok(Discard)
    }
}

/// Swallows the contents of a compound field value without visiting it.
pub(crate) struct Discard;

impl ser::SerializeSeq for Discard {
    type Ok = Option<String>;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), EncodeError> {
        Ok(())
    }

    fn end(self) -> Result<Option<String>, EncodeError> {
        Ok(None)
    }
}

impl ser::SerializeTuple for Discard {
    type Ok = Option<String>;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), EncodeError> {
        Ok(())
    }

    fn end(self) -> Result<Option<String>, EncodeError> {
        Ok(None)
    }
}

impl ser::SerializeTupleStruct for Discard {
    type Ok = Option<String>;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), EncodeError> {
        Ok(())
    }

    fn end(self) -> Result<Option<String>, EncodeError> {
        Ok(None)
    }
}

impl ser::SerializeTupleVariant for Discard {
    type Ok = Option<String>;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), EncodeError> {
        Ok(())
    }

    fn end(self) -> Result<Option<String>, EncodeError> {
        Ok(None)
    }
}

impl ser::SerializeMap for Discard {
    type Ok = Option<String>;
    type Error = EncodeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, _key: &T) -> Result<(), EncodeError> {
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), EncodeError> {
        Ok(())
    }

    fn end(self) -> Result<Option<String>, EncodeError> {
        Ok(None)
    }
}

impl ser::SerializeStruct for Discard {
    type Ok = Option<String>;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        _value: &T,
    ) -> Result<(), EncodeError> {
        Ok(())
    }

    fn end(self) -> Result<Option<String>, EncodeError> {
        Ok(None)
    }
}

impl ser::SerializeStructVariant for Discard {
    type Ok = Option<String>;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        _value: &T,
    ) -> Result<(), EncodeError> {
        Ok(())
    }

    fn end(self) -> Result<Option<String>, EncodeError> {
        Ok(None)
    }
}

/// Captures `value` as a record.
pub(crate) fn capture<T: ?Sized + Serialize>(value: &T) -> Result<CapturedRecord, EncodeError> {
    value.serialize(RecordSerializer)
}
