/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod writer;

use crate::Error;
use crate::FileValue;
use crate::Object;
use crate::Value;

pub use writer::FieldContent;
pub use writer::XmlWriter;

const XML_PROLOGUE: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Name of the root element unless configured otherwise.
pub const DEFAULT_ROOT_ELEMENT: &str = "xmlPythonData";

/// Which fields of an instance are marshalled.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum FieldSelection {
    /// Every field except the metadata ones.
    #[default]
    All,
    AllWithMetadata,
    /// Only the named fields.
    Only(Vec<String>),
}

/// Per-call configuration of a [Marshaller].
#[derive(Clone, Debug)]
pub struct MarshalOptions {
    root_element: String,
    selection: FieldSelection,
    exclude: Vec<String>,
}

impl Default for MarshalOptions {
    fn default() -> Self {
        MarshalOptions {
            root_element: DEFAULT_ROOT_ELEMENT.to_string(),
            selection: FieldSelection::All,
            exclude: Vec::new(),
        }
    }
}

impl MarshalOptions {
    pub fn new() -> MarshalOptions {
        MarshalOptions::default()
    }

    pub fn with_root_element(mut self, name: &str) -> MarshalOptions {
        self.root_element = name.to_string();
        self
    }

    pub fn with_selection(mut self, selection: FieldSelection) -> MarshalOptions {
        self.selection = selection;
        self
    }

    /// Fields never marshalled, whatever the selection says.
    pub fn with_exclude<S: AsRef<str>>(mut self, names: &[S]) -> MarshalOptions {
        self.exclude = names.iter().map(|n| n.as_ref().to_string()).collect();
        self
    }

    pub fn root_element(&self) -> &str {
        &self.root_element
    }

    fn must_dump(&self, field: &Field<'_>) -> bool {
        if self.exclude.iter().any(|n| n == field.name) {
            return false;
        }
        match &self.selection {
            FieldSelection::All => !field.metadata,
            FieldSelection::AllWithMetadata => true,
            FieldSelection::Only(names) => names.iter().any(|n| n == field.name),
        }
    }
}

/// One field of a [Marshallable] instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field<'a> {
    pub name: &'a str,
    pub content: FieldContent<'a>,
    pub metadata: bool,
}

impl<'a> Field<'a> {
    pub fn plain(name: &'a str, value: &'a Value) -> Field<'a> {
        Field {
            name,
            content: FieldContent::Plain(value),
            metadata: false,
        }
    }

    pub fn file(name: &'a str, file: &'a FileValue) -> Field<'a> {
        Field {
            name,
            content: FieldContent::File(file),
            metadata: false,
        }
    }

    /// A field referring to other objects by their URLs.
    pub fn reference(name: &'a str, urls: &'a [String]) -> Field<'a> {
        Field {
            name,
            content: FieldContent::Reference(urls),
            metadata: false,
        }
    }

    /// Marks the field as metadata, skipped by [FieldSelection::All].
    pub fn metadata(mut self) -> Field<'a> {
        self.metadata = true;
        self
    }
}

/// Something a [Marshaller] can write.
///
/// A plain attribute bag lists all of its fields as plain values. Richer
/// types describe each field with its kind, so that files are written as
/// base64 parts and references as URLs only.
pub trait Marshallable {
    fn fields(&self) -> Vec<Field<'_>>;

    /// Called after the selected fields are written and before the root
    /// element is closed.
    fn marshall_specific_elements(&self, _writer: &mut XmlWriter) -> Result<(), Error> {
        Ok(())
    }
}

impl Marshallable for Object {
    fn fields(&self) -> Vec<Field<'_>> {
        self.iter()
            .map(|(name, value)| Field::plain(name, value))
            .collect()
    }
}

/// Writes instances in the typed XML encoding read by
/// [Unmarshaller](crate::Unmarshaller).
///
/// ```
/// use typedxml::{Marshaller, Object};
///
/// let mut point = Object::new();
/// point.set("x", 5);
/// point.set("label", "origin");
/// assert_eq!(
///     Marshaller::new().marshall(&point)?,
///     concat!(
///         r#"<?xml version="1.0" encoding="utf-8"?>"#,
///         r#"<xmlPythonData type="object"><x type="int">5</x><label>origin</label></xmlPythonData>"#,
///     )
/// );
/// # Ok::<(), typedxml::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Marshaller {
    options: MarshalOptions,
}

impl Marshaller {
    pub fn new() -> Marshaller {
        Marshaller::default()
    }

    pub fn with_options(options: MarshalOptions) -> Marshaller {
        Marshaller { options }
    }

    pub fn options(&self) -> &MarshalOptions {
        &self.options
    }

    pub fn marshall<M: Marshallable + ?Sized>(&self, instance: &M) -> Result<String, Error> {
        let root = self.options.root_element.as_str();
        writer::check_name(root)?;
        let mut writer = XmlWriter::new();
        writer.write_raw(XML_PROLOGUE);
        writer.write_raw("<");
        writer.write_raw(root);
        writer.write_raw(r#" type="object">"#);

        let mut dumped = 0;
        for field in instance.fields() {
            if self.options.must_dump(&field) {
                log::trace!("marshall field {}", field.name);
                writer.dump_field(field.name, &field.content)?;
                dumped += 1;
            }
        }
        instance.marshall_specific_elements(&mut writer)?;

        writer.write_raw("</");
        writer.write_raw(root);
        writer.write_raw(">");
        log::debug!("marshalled {} fields into <{}>", dumped, root);
        Ok(writer.into_string())
    }
}

#[cfg(test)]
mod tests;
