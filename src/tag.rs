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

use crate::LookupError;
use crate::Namespaces;

/// An XML tag, either parsed from a document or defined by the caller.
///
/// A parsed tag may carry a namespace prefix in its name (`ns:local`).
/// A defined tag is built with [Tag::definition()] and carries the
/// namespace URI instead, which is mapped to the prefix used by a
/// document through its [Namespaces].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tag {
    name: String,
    colon: Option<usize>,
    ns_uri: Option<String>,
    attributes: Vec<(String, String)>,
}

impl Tag {
    /// Creates a tag from a qualified name, splitting it on the first `:`.
    pub fn new(name: &str, attributes: Vec<(String, String)>) -> Tag {
        Tag {
            name: name.to_string(),
            colon: name.find(':'),
            ns_uri: None,
            attributes,
        }
    }

    /// Creates the definition of an element living in the given namespace.
    pub fn definition(local_name: &str, ns_uri: &str) -> Tag {
        Tag {
            name: local_name.to_string(),
            colon: None,
            ns_uri: Some(ns_uri.to_string()),
            attributes: Vec::new(),
        }
    }

    /// Overwrites this tag in place for a new start tag.
    ///
    /// The attributes are swapped in, leaving the old ones cleared in the
    /// given vector so that both allocations stay in use.
    pub(crate) fn reset(&mut self, name: &str, attributes: &mut Vec<(String, String)>) {
        self.rename(name);
        std::mem::swap(&mut self.attributes, attributes);
    }

    /// Points this tag to another name, dropping its attributes.
    pub(crate) fn rename(&mut self, name: &str) {
        self.name.clear();
        self.name.push_str(name);
        self.colon = name.find(':');
        self.ns_uri = None;
        self.attributes.clear();
    }

    /// Qualified name, including the prefix if there is one.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_name(&self) -> &str {
        match self.colon {
            Some(i) => &self.name[i + 1..],
            None => &self.name,
        }
    }

    /// Namespace prefix, or the empty string.
    pub fn prefix(&self) -> &str {
        match self.colon {
            Some(i) => &self.name[..i],
            None => "",
        }
    }

    pub fn ns_uri(&self) -> Option<&str> {
        self.ns_uri.as_deref()
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Compares the qualified names of two tags.
    ///
    /// With `namespaces`, the namespace URI of `other` is first mapped to
    /// the prefix declared for it, so a parsed tag can be compared to a
    /// [definition](Tag::definition).
    pub fn equals_to(
        &self,
        other: &Tag,
        namespaces: Option<&Namespaces>,
    ) -> Result<bool, LookupError> {
        match namespaces {
            None => Ok(self.name == other.name),
            Some(namespaces) => Ok(self.name == other.full_name(Some(namespaces))?),
        }
    }

    /// Renders the name as `prefix:local`, resolving the prefix from the
    /// namespace URI when `namespaces` is given.
    pub fn full_name(&self, namespaces: Option<&Namespaces>) -> Result<Cow<'_, str>, LookupError> {
        match namespaces {
            None => Ok(Cow::Borrowed(&self.name)),
            Some(namespaces) => {
                let prefix = namespaces.resolve(self.ns_uri.as_deref().unwrap_or_default())?;
                Ok(Cow::Owned(format!("{}:{}", prefix, self.local_name())))
            }
        }
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)?;
        if !self.attributes.is_empty() {
            f.write_str("(")?;
            for (i, (name, value)) in self.attributes.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}=\"{}\"", name, value)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}
