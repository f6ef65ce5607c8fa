/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::borrow::Cow;
use std::fmt::Display;

use indexmap::IndexMap;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::Error;

/// A dynamically typed value of the XML encoding.
///
/// Every variant except [Null](Value::Null) and [String](Value::String)
/// maps to one `type` token of the wire format, see
/// [type_token()](Value::type_token).
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Result of a numeric field whose text could not be converted.
    Null,
    Bool(bool),
    Int(i64),
    Long(i128),
    Float(f64),
    DateTime(OffsetDateTime),
    String(String),
    Binary(Vec<u8>),
    List(Vec<Value>),
    /// Only produced by callers. Tuples are decoded as lists.
    Tuple(Vec<Value>),
    Object(Object),
    File(FileValue),
}

impl Value {
    /// The `type` attribute written for this value, `None` for strings.
    pub fn type_token(&self) -> Option<&'static str> {
        match self {
            Value::Null | Value::String(_) => None,
            Value::Bool(_) => Some("bool"),
            Value::Int(_) => Some("int"),
            Value::Long(_) => Some("long"),
            Value::Float(_) => Some("float"),
            Value::DateTime(_) => Some("DateTime"),
            Value::Binary(_) => Some("base64"),
            Value::List(_) => Some("list"),
            Value::Tuple(_) => Some("tuple"),
            Value::Object(_) => Some("object"),
            Value::File(_) => Some("file"),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Long(l) => i64::try_from(*l).ok(),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of a list or a tuple.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileValue> {
        match self {
            Value::File(file) => Some(file),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Long(l) => write!(f, "{}L", l),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::DateTime(dt) => match dt.format(&Rfc3339) {
                Ok(text) => f.write_str(&text),
                Err(_) => write!(f, "{}", dt),
            },
            Value::String(s) => write!(f, "{:?}", s),
            Value::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Value::List(items) => write_items(f, "[", items, "]"),
            Value::Tuple(items) => write_items(f, "(", items, ")"),
            Value::Object(object) => write!(f, "{}", object),
            Value::File(file) => write!(f, "{}", file),
        }
    }
}

fn write_items(
    f: &mut std::fmt::Formatter<'_>,
    open: &str,
    items: &[Value],
    close: &str,
) -> std::fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str(close)
}

macro_rules! value_from {
    ($t:ty, $v:ident, $conv:expr) => {
        impl From<$t> for Value {
            fn from($v: $t) -> Value {
                $conv
            }
        }
    };
}

value_from!(bool, b, Value::Bool(b));
value_from!(i32, i, Value::Int(i64::from(i)));
value_from!(i64, i, Value::Int(i));
value_from!(i128, l, Value::Long(l));
value_from!(f64, x, Value::Float(x));
value_from!(&str, s, Value::String(s.to_string()));
value_from!(String, s, Value::String(s));
value_from!(Vec<u8>, bytes, Value::Binary(bytes));
value_from!(Vec<Value>, items, Value::List(items));
value_from!(OffsetDateTime, dt, Value::DateTime(dt));
value_from!(Object, object, Value::Object(object));
value_from!(FileValue, file, Value::File(file));

// Conversions used by Object::take_as(), handing the value back on mismatch.
macro_rules! value_into {
    ($t:ty, $($pattern:pat => $result:expr),+) => {
        impl TryFrom<Value> for $t {
            type Error = Value;

            fn try_from(value: Value) -> Result<$t, Value> {
                match value {
                    $($pattern => Ok($result),)+
                    other => Err(other),
                }
            }
        }
    };
}

value_into!(bool, Value::Bool(b) => b);
value_into!(i64, Value::Int(i) => i);
value_into!(i128, Value::Int(i) => i128::from(i), Value::Long(l) => l);
value_into!(f64, Value::Float(x) => x, Value::Int(i) => i as f64);
value_into!(String, Value::String(s) => s);
value_into!(Vec<u8>, Value::Binary(bytes) => bytes);
value_into!(Vec<Value>, Value::List(items) => items, Value::Tuple(items) => items);
value_into!(OffsetDateTime, Value::DateTime(dt) => dt);
value_into!(Object, Value::Object(object) => object);
value_into!(FileValue, Value::File(file) => file);

/// A generic attribute bag, the decoded form of `type="object"` tags.
///
/// Fields keep their insertion order and are looked up by name in
/// constant time. Equality ignores the field order. The optional class
/// name records the target class an unmarshalled root object was coerced to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object {
    class: Option<String>,
    fields: IndexMap<String, Value>,
}

impl Object {
    pub fn new() -> Object {
        Object::default()
    }

    pub fn with_class(class: &str) -> Object {
        Object {
            class: Some(class.to_string()),
            fields: IndexMap::new(),
        }
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn set_class(&mut self, class: &str) {
        self.class = Some(class.to_string());
    }

    /// Sets a field, replacing the value of an existing one in place.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.fields.get_mut(name) {
            Some(old) => *old = value,
            None => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Removes a field, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    /// Like [get()](Object::get), but a missing field is an error.
    pub fn require(&self, name: &str) -> Result<&Value, Error> {
        self.get(name)
            .ok_or_else(|| Error::MissingField(name.to_string()))
    }

    /// Removes a field and converts it to `T`.
    ///
    /// ```
    /// use typedxml::Object;
    ///
    /// let mut point = Object::new();
    /// point.set("x", 5);
    /// assert_eq!(point.take_as::<i64>("x")?, 5);
    /// assert!(point.take_as::<i64>("x").is_err());
    /// # Ok::<(), typedxml::Error>(())
    /// ```
    pub fn take_as<T: TryFrom<Value, Error = Value>>(&mut self, name: &str) -> Result<T, Error> {
        let value = self
            .remove(name)
            .ok_or_else(|| Error::MissingField(name.to_string()))?;
        T::try_from(value).map_err(|_| Error::FieldType {
            field: name.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.class.as_deref().unwrap_or("object"))?;
        if self.fields.is_empty() {
            return f.write_str(" {}");
        }
        f.write_str(" { ")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        f.write_str(" }")
    }
}

/// Converts an unmarshalled [Object] into a statically typed value.
///
/// This is how a root object is adapted to a target type: the fields are
/// moved out of the attribute bag, no constructor of the target type is
/// involved.
pub trait FromObject: Sized {
    fn from_object(object: Object) -> Result<Self, Error>;
}

impl FromObject for Object {
    fn from_object(object: Object) -> Result<Object, Error> {
        Ok(object)
    }
}

/// Binary content with an optional file name and MIME type.
///
/// The content is held as a chain of chunks. Each chunk is marshalled as
/// one numbered `<part>`, and unmarshalling keeps one chunk per part.
/// Two files are equal when their names, MIME types and concatenated
/// contents are, regardless of how the contents are chunked.
#[derive(Clone, Debug, Default)]
pub struct FileValue {
    name: Option<String>,
    mime_type: Option<String>,
    chunks: Vec<Vec<u8>>,
}

impl FileValue {
    pub fn new() -> FileValue {
        FileValue::default()
    }

    pub fn from_bytes(bytes: Vec<u8>) -> FileValue {
        FileValue {
            name: None,
            mime_type: None,
            chunks: vec![bytes],
        }
    }

    pub fn from_chunks(chunks: Vec<Vec<u8>>) -> FileValue {
        FileValue {
            name: None,
            mime_type: None,
            chunks,
        }
    }

    pub fn with_name(mut self, name: &str) -> FileValue {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_mime_type(mut self, mime_type: &str) -> FileValue {
        self.mime_type = Some(mime_type.to_string());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn set_mime_type(&mut self, mime_type: &str) {
        self.mime_type = Some(mime_type.to_string());
    }

    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        self.chunks.push(chunk);
    }

    pub fn chunks(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    /// The whole content, borrowed when it is a single chunk.
    pub fn content(&self) -> Cow<'_, [u8]> {
        match self.chunks.as_slice() {
            [] => Cow::Borrowed(&[]),
            [chunk] => Cow::Borrowed(chunk),
            chunks => Cow::Owned(chunks.concat()),
        }
    }

    /// Content size in bytes.
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PartialEq for FileValue {
    fn eq(&self, other: &FileValue) -> bool {
        self.name == other.name
            && self.mime_type == other.mime_type
            && self.content() == other.content()
    }
}

impl Display for FileValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "file({:?}, {}, {} bytes)",
            self.name.as_deref().unwrap_or_default(),
            self.mime_type.as_deref().unwrap_or("?"),
            self.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tokens() {
        assert_eq!(Value::from(true).type_token(), Some("bool"));
        assert_eq!(Value::from(3).type_token(), Some("int"));
        assert_eq!(Value::from(3i128).type_token(), Some("long"));
        assert_eq!(Value::from(0.5).type_token(), Some("float"));
        assert_eq!(Value::from("x").type_token(), None);
        assert_eq!(Value::Null.type_token(), None);
        assert_eq!(Value::from(vec![1u8]).type_token(), Some("base64"));
        assert_eq!(Value::Tuple(vec![]).type_token(), Some("tuple"));
        assert_eq!(Value::from(Object::new()).type_token(), Some("object"));
        assert_eq!(Value::from(FileValue::new()).type_token(), Some("file"));
    }

    #[test]
    fn object_fields_keep_order() {
        let mut object = Object::new();
        object.set("b", 1);
        object.set("a", "text");
        object.set("b", 2);
        let names: Vec<&str> = object.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(object.get("b"), Some(&Value::Int(2)));
        assert_eq!(object.len(), 2);
        assert_eq!(object.remove("b"), Some(Value::Int(2)));
        assert!(!object.contains("b"));
        assert!(matches!(object.require("b"), Err(Error::MissingField(name)) if name == "b"));
    }

    #[test]
    fn large_objects() {
        let mut object = Object::new();
        for i in 0..10_000 {
            object.set(&format!("f{}", i), i);
        }
        for i in (0..10_000).step_by(2) {
            object.set(&format!("f{}", i), -i);
        }
        assert_eq!(object.len(), 10_000);
        assert_eq!(object.get("f9998"), Some(&Value::Int(-9998)));
        assert_eq!(object.remove("f1"), Some(Value::Int(1)));
        let names: Vec<&str> = object.iter().take(3).map(|(n, _)| n).collect();
        assert_eq!(names, ["f0", "f2", "f3"]);

        let mut ab = Object::new();
        ab.set("a", 1);
        ab.set("b", 2);
        let mut ba = Object::new();
        ba.set("b", 2);
        ba.set("a", 1);
        assert_eq!(ab, ba);
    }

    #[test]
    fn take_as_checks_types() {
        let mut object = Object::new();
        object.set("n", 7);
        object.set("s", "seven");
        object.set("l", 7i128);
        assert_eq!(object.take_as::<i128>("n").unwrap(), 7);
        assert_eq!(object.take_as::<i128>("l").unwrap(), 7);
        assert!(matches!(
            object.take_as::<i64>("s"),
            Err(Error::FieldType { field, .. }) if field == "s"
        ));
    }

    #[test]
    fn file_equality_ignores_chunking() {
        let one = FileValue::from_bytes(b"hello world".to_vec()).with_name("a.txt");
        let two = FileValue::from_chunks(vec![b"hello".to_vec(), b" world".to_vec()])
            .with_name("a.txt");
        assert_eq!(one, two);
        assert_eq!(two.len(), 11);
        assert_eq!(&*two.content(), b"hello world");
        assert_ne!(one, two.clone().with_mime_type("text/plain"));
        assert_eq!(FileValue::new(), FileValue::from_bytes(Vec::new()));
    }

    #[test]
    fn display() {
        let mut object = Object::with_class("Point");
        object.set("x", 5);
        object.set("tags", vec![Value::from("a"), Value::from(true)]);
        object.set("big", 5i128);
        assert_eq!(
            object.to_string(),
            "Point { x: 5, tags: [\"a\", True], big: 5L }"
        );
        assert_eq!(Object::new().to_string(), "object {}");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        let file = FileValue::from_bytes(vec![0; 3]).with_name("f.bin");
        assert_eq!(Value::from(file).to_string(), "file(\"f.bin\", ?, 3 bytes)");
    }
}
