/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::collections::HashMap;

use thiserror::Error;

use crate::Tag;

const XMLNS_PREFIX: &str = "xmlns:";

/// Error returned when the prefix of an undeclared namespace URI is requested.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("namespace uri '{uri}' is not declared")]
pub struct LookupError {
    pub uri: String,
}

/// Namespace declarations seen during a parse, mapping URIs to prefixes.
///
/// Declarations only accumulate, a later declaration of the same URI
/// replaces the earlier prefix.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Namespaces {
    prefixes: HashMap<String, String>,
}

impl Namespaces {
    pub fn new() -> Namespaces {
        Namespaces::default()
    }

    /// Records every `xmlns:prefix="uri"` declaration in the attributes.
    pub fn register(&mut self, attributes: &[(String, String)]) {
        for (name, value) in attributes {
            if let Some(prefix) = name.strip_prefix(XMLNS_PREFIX) {
                self.declare(value, prefix);
            }
        }
    }

    pub fn declare(&mut self, uri: &str, prefix: &str) {
        log::trace!("namespace {} declared as '{}'", uri, prefix);
        self.prefixes.insert(uri.to_string(), prefix.to_string());
    }

    /// Returns the prefix declared for the URI.
    pub fn resolve(&self, uri: &str) -> Result<&str, LookupError> {
        self.prefixes
            .get(uri)
            .map(String::as_str)
            .ok_or_else(|| LookupError {
                uri: uri.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Iterates over `(uri, prefix)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(uri, prefix)| (uri.as_str(), prefix.as_str()))
    }
}

/// Mutable context threaded through every event of a single parse.
///
/// An environment is created when [XmlParser::parse()](crate::XmlParser::parse)
/// starts and handed back to the caller when it finishes. It carries the
/// namespace declarations, the element being dispatched, and the extension
/// state `S` of the [ContentHandler](crate::ContentHandler).
#[derive(Debug, Default)]
pub struct ParseEnvironment<S> {
    namespaces: Namespaces,
    current_element: Option<Tag>,
    state: S,
}

impl<S: Default> ParseEnvironment<S> {
    pub fn new() -> ParseEnvironment<S> {
        ParseEnvironment {
            namespaces: Namespaces::new(),
            current_element: None,
            state: S::default(),
        }
    }
}

impl<S> ParseEnvironment<S> {
    pub fn register_namespaces(&mut self, attributes: &[(String, String)]) {
        self.namespaces.register(attributes);
    }

    pub fn resolve_namespace(&self, uri: &str) -> Result<&str, LookupError> {
        self.namespaces.resolve(uri)
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// The element of the event being dispatched.
    ///
    /// During `end_element` this is the closing tag, which has no attributes.
    pub fn current_element(&self) -> Option<&Tag> {
        self.current_element.as_ref()
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    // Takes the attributes out of the vector so that its allocation can
    // be handed back for the next start tag.
    pub(crate) fn enter_element(&mut self, name: &str, attributes: &mut Vec<(String, String)>) {
        match self.current_element.as_mut() {
            Some(tag) => tag.reset(name, attributes),
            None => {
                self.current_element = Some(Tag::new(name, std::mem::take(attributes)));
            }
        }
    }

    pub(crate) fn leave_element(&mut self, name: &str) {
        match self.current_element.as_mut() {
            Some(tag) => tag.rename(name),
            None => self.current_element = Some(Tag::new(name, Vec::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn registers_prefixed_declarations_only() {
        let mut env = ParseEnvironment::<()>::new();
        env.register_namespaces(&attrs(&[
            ("xmlns", "urn:default"),
            ("type", "object"),
            ("xmlns:a", "urn:a"),
        ]));
        assert_eq!(env.namespaces().len(), 1);
        assert_eq!(env.resolve_namespace("urn:a"), Ok("a"));
        assert_eq!(
            env.resolve_namespace("urn:default"),
            Err(LookupError {
                uri: "urn:default".to_string()
            })
        );
    }

    #[test]
    fn last_declaration_wins() {
        let mut ns = Namespaces::new();
        ns.register(&attrs(&[("xmlns:a", "urn:x")]));
        ns.register(&attrs(&[("xmlns:b", "urn:x"), ("xmlns:c", "urn:y")]));
        assert_eq!(ns.resolve("urn:x"), Ok("b"));
        assert_eq!(ns.resolve("urn:y"), Ok("c"));
        assert_eq!(ns.len(), 2);
        ns.register(&[]);
        assert_eq!(ns.len(), 2);
    }

    #[test]
    fn current_element_is_reused() {
        let mut env = ParseEnvironment::<()>::new();
        assert!(env.current_element().is_none());

        let mut pending = attrs(&[("type", "int")]);
        env.enter_element("ns:count", &mut pending);
        assert!(pending.is_empty());
        let tag = env.current_element().unwrap();
        assert_eq!(tag.name(), "ns:count");
        assert_eq!(tag.prefix(), "ns");
        assert_eq!(tag.attribute("type"), Some("int"));

        env.leave_element("ns:count");
        let tag = env.current_element().unwrap();
        assert_eq!(tag.local_name(), "count");
        assert!(tag.attributes().is_empty());

        let mut pending = attrs(&[("type", "list")]);
        env.enter_element("items", &mut pending);
        let tag = env.current_element().unwrap();
        assert_eq!(tag.prefix(), "");
        assert_eq!(tag.attribute("type"), Some("list"));
    }
}
