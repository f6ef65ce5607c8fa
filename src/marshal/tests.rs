/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use super::*;

fn body(xml: &str, root: &str) -> String {
    let head = format!(r#"{}<{} type="object">"#, XML_PROLOGUE, root);
    let tail = format!("</{}>", root);
    assert!(xml.starts_with(&head), "{}", xml);
    assert!(xml.ends_with(&tail), "{}", xml);
    xml[head.len()..xml.len() - tail.len()].to_string()
}

fn sample() -> Object {
    let mut object = Object::new();
    object.set("title", "Q&A");
    object.set("pages", 3);
    object.set("draft", true);
    object.set("missing", Value::Null);
    object
}

#[test]
fn plain_objects() {
    let xml = Marshaller::new().marshall(&sample()).unwrap();
    assert_eq!(
        body(&xml, DEFAULT_ROOT_ELEMENT),
        r#"<title>Q&amp;A</title><pages type="int">3</pages><draft type="bool">True</draft>"#
    );
}

#[test]
fn empty_object() {
    let xml = Marshaller::new().marshall(&Object::new()).unwrap();
    assert_eq!(
        xml,
        r#"<?xml version="1.0" encoding="utf-8"?><xmlPythonData type="object"></xmlPythonData>"#
    );
}

#[test]
fn field_selection() {
    let only = Marshaller::with_options(
        MarshalOptions::new()
            .with_root_element("doc")
            .with_selection(FieldSelection::Only(vec!["pages".to_string(), "draft".to_string()])),
    );
    let xml = only.marshall(&sample()).unwrap();
    assert_eq!(
        body(&xml, "doc"),
        r#"<pages type="int">3</pages><draft type="bool">True</draft>"#
    );

    // Exclusion wins over an explicit inclusion.
    let excluded = Marshaller::with_options(
        MarshalOptions::new()
            .with_selection(FieldSelection::Only(vec!["pages".to_string(), "draft".to_string()]))
            .with_exclude(&["draft", "title"]),
    );
    let xml = excluded.marshall(&sample()).unwrap();
    assert_eq!(body(&xml, DEFAULT_ROOT_ELEMENT), r#"<pages type="int">3</pages>"#);
}

struct Document {
    title: Value,
    attachment: FileValue,
    related: Vec<String>,
    creator: Value,
}

impl Marshallable for Document {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::plain("title", &self.title),
            Field::file("attachment", &self.attachment),
            Field::reference("related", &self.related),
            Field::plain("creator", &self.creator).metadata(),
        ]
    }

    fn marshall_specific_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.dump_field("kind", &FieldContent::Plain(&Value::from("document")))
    }
}

fn document() -> Document {
    Document {
        title: Value::from("Minutes"),
        attachment: FileValue::from_bytes(b"abc".to_vec())
            .with_name("m.txt")
            .with_mime_type("text/plain"),
        related: vec!["http://site/a".to_string()],
        creator: Value::from("ann"),
    }
}

#[test]
fn schema_fields() {
    let xml = Marshaller::new().marshall(&document()).unwrap();
    assert_eq!(
        body(&xml, DEFAULT_ROOT_ELEMENT),
        concat!(
            r#"<title>Minutes</title>"#,
            r#"<attachment type="file" mimeType="text/plain" name="m.txt">"#,
            r#"<part type="base64" number="1">YWJj</part>"#,
            r#"</attachment>"#,
            r#"<related type="list" count="1"><url>http://site/a</url></related>"#,
            r#"<kind>document</kind>"#
        )
    );
}

#[test]
fn metadata_fields() {
    let marshaller = Marshaller::with_options(
        MarshalOptions::new().with_selection(FieldSelection::AllWithMetadata),
    );
    let xml = marshaller.marshall(&document()).unwrap();
    assert!(xml.contains("<creator>ann</creator><kind>document</kind>"));

    let marshaller = Marshaller::with_options(
        MarshalOptions::new()
            .with_selection(FieldSelection::AllWithMetadata)
            .with_exclude(&["creator", "attachment"]),
    );
    let xml = marshaller.marshall(&document()).unwrap();
    assert!(!xml.contains("creator"));
    assert!(!xml.contains("attachment"));
    assert!(xml.contains("<title>Minutes</title>"));
}

#[test]
fn names_must_be_xml_names() {
    for name in ["my field", "x><injected type=\"int\">7</injected><y", "", "2nd"] {
        let mut object = Object::new();
        object.set(name, 5);
        assert!(
            matches!(Marshaller::new().marshall(&object), Err(Error::BadName(bad)) if bad == name),
            "{}",
            name
        );
    }

    let mut nested = Object::new();
    nested.set("a b", "x");
    let mut object = Object::new();
    object.set("inner", nested);
    assert!(matches!(Marshaller::new().marshall(&object), Err(Error::BadName(_))));

    let marshaller = Marshaller::with_options(MarshalOptions::new().with_root_element("my root"));
    assert!(matches!(marshaller.marshall(&sample()), Err(Error::BadName(bad)) if bad == "my root"));

    let marshaller = Marshaller::with_options(MarshalOptions::new().with_root_element("ns:root"));
    assert!(marshaller.marshall(&sample()).is_ok());
}

#[test]
fn text_must_be_xml_chars() {
    let mut object = Object::new();
    object.set("s", "a\u{1}b");
    assert!(matches!(Marshaller::new().marshall(&object), Err(Error::BadChar('\u{1}'))));

    let mut object = Object::new();
    object.set("items", vec![Value::from("ok"), Value::from("\u{b}")]);
    assert!(matches!(Marshaller::new().marshall(&object), Err(Error::BadChar('\u{b}'))));

    let file = FileValue::from_bytes(b"\x01 is fine in base64".to_vec()).with_name("bell\u{7}.txt");
    let mut object = Object::new();
    object.set("f", file);
    assert!(matches!(Marshaller::new().marshall(&object), Err(Error::BadChar('\u{7}'))));

    // Other whitespace and non-ASCII text round-trip.
    let mut object = Object::new();
    object.set("s", "tab\there\nnew line ünïcode 🦀");
    let xml = Marshaller::new().marshall(&object).unwrap();
    let value = crate::Unmarshaller::new().unmarshall(&xml).unwrap();
    assert_eq!(value, Value::Object(object));
}
