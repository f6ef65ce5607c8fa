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
use time::macros::datetime;

fn unmarshall(doc: &str) -> Value {
    Unmarshaller::new().unmarshall(doc).unwrap()
}

fn object(doc: &str) -> Object {
    match unmarshall(doc) {
        Value::Object(object) => object,
        other => panic!("not an object: {:?}", other),
    }
}

#[test]
fn scalar_fields() {
    let obj = object(concat!(
        r#"<?xml version="1.0" encoding="utf-8"?>"#,
        r#"<xmlPythonData type="object">"#,
        r#"<title>Annual &amp; final report</title>"#,
        r#"<draft type="bool">False</draft>"#,
        r#"<pages type="int">12</pages>"#,
        r#"<ratio type="float">0.75</ratio>"#,
        r#"<serial type="long">123456789012345678901234567890L</serial>"#,
        r#"<created type="DateTime">2008/01/25 10:33:00</created>"#,
        r#"<logo type="base64">iVBORw==</logo>"#,
        r#"<note type="unicode">  spaced  </note>"#,
        r#"</xmlPythonData>"#
    ));
    assert_eq!(obj.class(), None);
    assert_eq!(obj.len(), 8);
    assert_eq!(obj.get("title").and_then(Value::as_str), Some("Annual & final report"));
    assert_eq!(obj.get("draft"), Some(&Value::Bool(false)));
    assert_eq!(obj.get("pages"), Some(&Value::Int(12)));
    assert_eq!(obj.get("ratio"), Some(&Value::Float(0.75)));
    assert_eq!(
        obj.get("serial"),
        Some(&Value::Long(123456789012345678901234567890))
    );
    assert_eq!(
        obj.get("created"),
        Some(&Value::DateTime(datetime!(2008-01-25 10:33:00 UTC)))
    );
    assert_eq!(obj.get("logo"), Some(&Value::Binary(vec![0x89, b'P', b'N', b'G'])));
    assert_eq!(obj.get("note").and_then(Value::as_str), Some("spaced"));
}

#[test]
fn empty_containers() {
    assert_eq!(
        unmarshall(r#"<root type="object"></root>"#),
        Value::Object(Object::new())
    );
    assert_eq!(
        unmarshall(r#"<root type="list" count="0"></root>"#),
        Value::List(Vec::new())
    );
    assert_eq!(
        unmarshall(r#"<root type="tuple" count="0"/>"#),
        Value::List(Vec::new())
    );
}

#[test]
fn nested_containers() {
    let obj = object(
        r#"<r type="object">
             <rows type="list" count="2">
               <e type="object"><id type="int">1</id><tags type="tuple" count="2"><e>a</e><e>b</e></tags></e>
               <e type="object"><id type="int">2</id><tags type="list" count="0"></tags></e>
             </rows>
             <owner type="object"><name>ann</name></owner>
           </r>"#,
    );
    let names: Vec<&str> = obj.iter().map(|(n, _)| n).collect();
    assert_eq!(names, ["rows", "owner"]);

    let rows = obj.get("rows").and_then(Value::as_slice).unwrap();
    assert_eq!(rows.len(), 2);
    let first = rows[0].as_object().unwrap();
    assert_eq!(first.get("id"), Some(&Value::Int(1)));
    assert_eq!(
        first.get("tags"),
        Some(&Value::List(vec![Value::from("a"), Value::from("b")]))
    );
    assert_eq!(
        rows[1].as_object().and_then(|o| o.get("tags")),
        Some(&Value::List(Vec::new()))
    );
    let owner = obj.get("owner").and_then(Value::as_object).unwrap();
    assert_eq!(owner.get("name").and_then(Value::as_str), Some("ann"));
    assert_eq!(owner.class(), None);
}

#[test]
fn root_list() {
    assert_eq!(
        unmarshall(r#"<values type="list" count="3"><e type="int">1</e><e type="bool">True</e><e/></values>"#),
        Value::List(vec![Value::Int(1), Value::Bool(true), Value::from("")])
    );
}

#[test]
fn malformed_numbers_are_null() {
    let obj = object(
        r#"<r type="object"><a type="int">1</a><n type="int">abc</n><f type="float">1,5</f><b>text</b></r>"#,
    );
    assert_eq!(obj.get("a"), Some(&Value::Int(1)));
    assert_eq!(obj.get("n"), Some(&Value::Null));
    assert_eq!(obj.get("f"), Some(&Value::Null));
    assert_eq!(obj.get("b").and_then(Value::as_str), Some("text"));
}

#[test]
fn unknown_types_are_strings() {
    let obj = object(r#"<r type="object"><c type="complex"> 1+2j </c><d type="str">x</d></r>"#);
    assert_eq!(obj.get("c").and_then(Value::as_str), Some("1+2j"));
    assert_eq!(obj.get("d").and_then(Value::as_str), Some("x"));
}

#[test]
fn repeated_fields_replace() {
    let obj = object(r#"<r type="object"><a>1</a><b>2</b><a type="int">3</a></r>"#);
    let fields: Vec<(&str, &Value)> = obj.iter().collect();
    assert_eq!(fields, [("a", &Value::Int(3)), ("b", &Value::from("2"))]);
}

#[test]
fn count_is_not_enforced() {
    assert_eq!(
        unmarshall(r#"<l type="list" count="5"><e>x</e></l>"#),
        Value::List(vec![Value::from("x")])
    );
    assert_eq!(
        unmarshall(r#"<l type="list" count="many"><e>x</e></l>"#),
        Value::List(vec![Value::from("x")])
    );
}

#[test]
fn namespaced_field_names() {
    let obj = object(r#"<r type="object" xmlns:dc="urn:dc"><dc:title>T</dc:title></r>"#);
    assert_eq!(obj.get("dc:title").and_then(Value::as_str), Some("T"));
}

#[test]
fn files() {
    let obj = object(concat!(
        r#"<r type="object">"#,
        r#"<doc type="file" name="a.txt" mimeType="text/plain">"#,
        r#"<part type="base64" number="2">IHdvcmxk</part>"#,
        r#"<part type="base64" number="1">aGVsbG8=</part>"#,
        r#"<part type="base64">IQ==</part>"#,
        r#"</doc>"#,
        r#"<empty type="file"><part type="base64" number="1"></part></empty>"#,
        r#"</r>"#
    ));
    let doc = obj.get("doc").and_then(Value::as_file).unwrap();
    assert_eq!(doc.name(), Some("a.txt"));
    assert_eq!(doc.mime_type(), Some("text/plain"));
    assert_eq!(doc.chunks().len(), 3);
    assert_eq!(&*doc.content(), b"hello world!");

    let empty = obj.get("empty").and_then(Value::as_file).unwrap();
    assert_eq!(empty.name(), None);
    assert!(empty.is_empty());
}

#[test]
fn bad_structures() {
    let unmarshaller = Unmarshaller::new();
    assert!(matches!(
        unmarshaller.unmarshall(r#"<f type="file"><part type="list"></part></f>"#),
        Err(Error::Structure(_))
    ));
    assert!(matches!(
        unmarshaller.unmarshall(r#"<f type="file"><part type="int">3</part></f>"#),
        Err(Error::Structure(_))
    ));
    assert!(matches!(
        unmarshaller.unmarshall(r#"<r type="object"><s>text<b>x</b></s></r>"#),
        Err(Error::Structure(_))
    ));
    assert!(matches!(
        unmarshaller.unmarshall(r#"<r type="object"><d type="DateTime">soon</d></r>"#),
        Err(Error::BadDateTime { tag, text }) if tag == "d" && text == "soon"
    ));
    assert!(matches!(
        unmarshaller.unmarshall(r#"<r type="object"><b type="base64">@@</b></r>"#),
        Err(Error::BadBase64 { tag, .. }) if tag == "b"
    ));
    assert!(matches!(
        unmarshaller.unmarshall(r#"<r type="object"><a></r>"#),
        Err(Error::Parse { .. })
    ));
}

#[derive(Debug)]
struct Point {
    x: i64,
    y: Option<i64>,
    initialized: bool,
}

impl Point {
    #[allow(dead_code)]
    fn new(x: i64, y: i64) -> Point {
        Point {
            x,
            y: Some(y),
            initialized: true,
        }
    }
}

impl FromObject for Point {
    fn from_object(mut object: Object) -> Result<Point, Error> {
        assert_eq!(object.class(), Some("Point"));
        Ok(Point {
            x: object.take_as("x")?,
            y: object.take_as("y").ok(),
            initialized: false,
        })
    }
}

#[test]
fn class_coercion() {
    let doc = r#"<root type="object"><x type="int">5</x></root>"#;
    let unmarshaller = Unmarshaller::with_target_class("Point");

    let value = unmarshaller.unmarshall(doc).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.class(), Some("Point"));
    assert_eq!(obj.get("x"), Some(&Value::Int(5)));

    let point: Point = unmarshaller.unmarshall_into(doc).unwrap();
    assert_eq!(point.x, 5);
    assert_eq!(point.y, None);
    assert!(!point.initialized);

    // Only the root object takes the class.
    let value = unmarshaller
        .unmarshall(r#"<l type="list"><e type="object"/></l>"#)
        .unwrap();
    assert_eq!(value, Value::List(vec![Value::Object(Object::new())]));
    assert!(matches!(
        unmarshaller.unmarshall_into::<Point>(r#"<l type="list"/>"#),
        Err(Error::Structure(_))
    ));
}

#[test]
fn stream_input() {
    let doc = r#"<r type="object"><blob type="base64">AAECAwQFBgcICQ==</blob></r>"#;
    let mut reader = doc.as_bytes();
    let unmarshaller = Unmarshaller::with_options(UnmarshalOptions::new().with_buffer_size(4));
    let value = unmarshaller.unmarshall(&mut reader).unwrap();
    assert_eq!(
        value.as_object().and_then(|o| o.get("blob")),
        Some(&Value::Binary((0..10).collect()))
    );
}

#[test]
fn state_after_parse() {
    let mut parser = XmlParser::new(Unmarshaller::new());
    let env = parser.parse(r#"<r type="object"><a type="int">1</a></r>"#).unwrap();
    assert_eq!(env.state().depth(), 0);
    assert!(env.state().result().is_some());
    assert_eq!(env.current_element().map(|t| t.name()), Some("r"));
}
