/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::fmt::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use time::format_description::well_known::Rfc3339;

use crate::Error;
use crate::FileValue;
use crate::Value;
use crate::entities::escape;
use crate::entities::escaped_size;
use crate::entities::invalid_char;
use crate::entities::is_name;

/// How the value of a field is dumped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldContent<'a> {
    /// A value dumped recursively with its own type.
    Plain(&'a Value),
    /// Binary content dumped as base64 parts.
    File(&'a FileValue),
    /// Other objects, dumped as their URLs only.
    Reference(&'a [String]),
}

/// Output buffer of a [Marshaller](crate::Marshaller).
///
/// The writer is handed to
/// [marshall_specific_elements()](crate::Marshallable::marshall_specific_elements)
/// so that custom fields can be appended inside the root element.
#[derive(Debug, Default)]
pub struct XmlWriter {
    buf: String,
}

impl XmlWriter {
    pub(crate) fn new() -> XmlWriter {
        XmlWriter::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    /// Appends text that is already valid markup.
    pub fn write_raw(&mut self, markup: &str) {
        self.buf.push_str(markup);
    }

    /// Appends text with the XML special characters escaped.
    ///
    /// Fails with [Error::BadChar] if the text has a character which
    /// cannot appear in XML at all, such as most control characters.
    pub fn dump_string(&mut self, s: &str) -> Result<(), Error> {
        if let Some(c) = invalid_char(s) {
            return Err(Error::BadChar(c));
        }
        self.buf.reserve(escaped_size(s));
        escape(s, &mut self.buf);
        Ok(())
    }

    fn start_tag(&mut self, name: &str) -> Result<(), Error> {
        check_name(name)?;
        self.buf.push('<');
        self.buf.push_str(name);
        Ok(())
    }

    fn attribute(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.buf.push(' ');
        self.buf.push_str(name);
        self.buf.push_str("=\"");
        self.dump_string(value)?;
        self.buf.push('"');
        Ok(())
    }

    fn end_tag(&mut self, name: &str) {
        self.buf.push_str("</");
        self.buf.push_str(name);
        self.buf.push('>');
    }

    /// Writes `<name type="...">value</name>`.
    ///
    /// Sequences get a `count` attribute and files their `mimeType` and
    /// `name`. Null values are not written at all. A `name` which is not
    /// a valid XML name is an [Error::BadName].
    pub fn dump_field(&mut self, name: &str, content: &FieldContent<'_>) -> Result<(), Error> {
        let file = match content {
            FieldContent::Plain(Value::Null) => return Ok(()),
            FieldContent::Plain(Value::File(file)) => Some(file),
            FieldContent::File(file) => Some(*file),
            _ => None,
        };
        self.start_tag(name)?;
        match content {
            FieldContent::Plain(value) => {
                if let Some(token) = value.type_token() {
                    self.attribute("type", token)?;
                }
                if let Some(items) = value.as_slice() {
                    self.attribute("count", &items.len().to_string())?;
                }
            }
            FieldContent::File(_) => self.attribute("type", "file")?,
            FieldContent::Reference(urls) => {
                self.attribute("type", "list")?;
                self.attribute("count", &urls.len().to_string())?;
            }
        }
        if let Some(file) = file {
            if let Some(mime_type) = file.mime_type() {
                self.attribute("mimeType", mime_type)?;
            }
            if let Some(file_name) = file.name() {
                self.attribute("name", file_name)?;
            }
        }
        self.buf.push('>');
        self.dump_value(content)?;
        self.end_tag(name);
        Ok(())
    }

    /// Writes the content of a field, without its enclosing tag.
    pub fn dump_value(&mut self, content: &FieldContent<'_>) -> Result<(), Error> {
        let value = match content {
            FieldContent::File(file) => {
                self.dump_file(file);
                return Ok(());
            }
            FieldContent::Reference(urls) => {
                for url in urls.iter() {
                    self.buf.push_str("<url>");
                    self.dump_string(url)?;
                    self.buf.push_str("</url>");
                }
                return Ok(());
            }
            FieldContent::Plain(value) => value,
        };
        match value {
            Value::Null => (),
            Value::Bool(true) => self.buf.push_str("True"),
            Value::Bool(false) => self.buf.push_str("False"),
            Value::Int(i) => write_display(&mut self.buf, i),
            Value::Long(l) => write_display(&mut self.buf, l),
            Value::Float(x) => write_display(&mut self.buf, format_args!("{:?}", x)),
            Value::DateTime(dt) => {
                let text = dt.format(&Rfc3339)?;
                self.buf.push_str(&text);
            }
            Value::String(s) => self.dump_string(s)?,
            Value::Binary(bytes) => BASE64_STANDARD.encode_string(bytes, &mut self.buf),
            Value::List(items) | Value::Tuple(items) => {
                for item in items {
                    match item {
                        // Keeps the position of the item, read back as "".
                        Value::Null => self.buf.push_str("<e></e>"),
                        item => self.dump_field("e", &FieldContent::Plain(item))?,
                    }
                }
            }
            Value::Object(object) => {
                for (name, value) in object.iter() {
                    self.dump_field(name, &FieldContent::Plain(value))?;
                }
            }
            Value::File(file) => self.dump_file(file),
        }
        Ok(())
    }

    /// Writes binary content as numbered base64 parts, one per chunk.
    ///
    /// Empty content is still written as one empty part.
    pub fn dump_file(&mut self, file: &FileValue) {
        let chunks = file.chunks();
        if chunks.is_empty() {
            self.buf.push_str(r#"<part type="base64" number="1"></part>"#);
            return;
        }
        for (i, chunk) in chunks.iter().enumerate() {
            write_display(&mut self.buf, format_args!(r#"<part type="base64" number="{}">"#, i + 1));
            BASE64_STANDARD.encode_string(chunk, &mut self.buf);
            self.buf.push_str("</part>");
        }
    }
}

/// Fails with [Error::BadName] unless `name` can be used as an element name.
pub(super) fn check_name(name: &str) -> Result<(), Error> {
    if is_name(name) {
        Ok(())
    } else {
        Err(Error::BadName(name.to_string()))
    }
}

fn write_display(buf: &mut String, value: impl std::fmt::Display) {
    // Writing into a String cannot fail.
    let _ = write!(buf, "{}", value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Object;
    use time::macros::datetime;

    fn field(name: &str, value: &Value) -> String {
        let mut writer = XmlWriter::new();
        writer.dump_field(name, &FieldContent::Plain(value)).unwrap();
        writer.into_string()
    }

    #[test]
    fn scalars() {
        assert_eq!(field("b", &Value::Bool(true)), r#"<b type="bool">True</b>"#);
        assert_eq!(field("b", &Value::Bool(false)), r#"<b type="bool">False</b>"#);
        assert_eq!(field("i", &Value::Int(-4)), r#"<i type="int">-4</i>"#);
        assert_eq!(field("l", &Value::Long(1 << 70)), r#"<l type="long">1180591620717411303424</l>"#);
        assert_eq!(field("f", &Value::Float(2.0)), r#"<f type="float">2.0</f>"#);
        assert_eq!(field("s", &Value::from("a<b & 'c'")), "<s>a&lt;b &amp; &apos;c&apos;</s>");
        assert_eq!(field("n", &Value::Null), "");
        assert_eq!(field("z", &Value::from(vec![0u8, 1, 2])), r#"<z type="base64">AAEC</z>"#);
        assert_eq!(
            field("d", &Value::from(datetime!(2024-03-05 12:30:15 UTC))),
            r#"<d type="DateTime">2024-03-05T12:30:15Z</d>"#
        );
    }

    #[test]
    fn sequences() {
        let list = Value::List(vec![Value::Int(1), Value::Null, Value::from("x")]);
        assert_eq!(
            field("l", &list),
            r#"<l type="list" count="3"><e type="int">1</e><e></e><e>x</e></l>"#
        );
        assert_eq!(
            field("t", &Value::Tuple(vec![])),
            r#"<t type="tuple" count="0"></t>"#
        );
    }

    #[test]
    fn nested_objects() {
        let mut inner = Object::new();
        inner.set("k", "v");
        inner.set("gone", Value::Null);
        assert_eq!(
            field("o", &Value::from(inner)),
            r#"<o type="object"><k>v</k></o>"#
        );
    }

    #[test]
    fn files() {
        let file = FileValue::from_chunks(vec![b"hello".to_vec(), b" world".to_vec()])
            .with_name("a \"b\".txt")
            .with_mime_type("text/plain");
        let mut writer = XmlWriter::new();
        writer.dump_field("doc", &FieldContent::File(&file)).unwrap();
        assert_eq!(
            writer.as_str(),
            concat!(
                r#"<doc type="file" mimeType="text/plain" name="a &quot;b&quot;.txt">"#,
                r#"<part type="base64" number="1">aGVsbG8=</part>"#,
                r#"<part type="base64" number="2">IHdvcmxk</part>"#,
                r#"</doc>"#
            )
        );

        let mut writer = XmlWriter::new();
        writer.dump_file(&FileValue::new());
        assert_eq!(writer.as_str(), r#"<part type="base64" number="1"></part>"#);
    }

    #[test]
    fn references() {
        let urls = ["http://site/a".to_string(), "http://site/b?x=1&y=2".to_string()];
        let mut writer = XmlWriter::new();
        writer.dump_field("related", &FieldContent::Reference(&urls)).unwrap();
        assert_eq!(
            writer.into_string(),
            concat!(
                r#"<related type="list" count="2">"#,
                r#"<url>http://site/a</url><url>http://site/b?x=1&amp;y=2</url>"#,
                r#"</related>"#
            )
        );
    }
}
