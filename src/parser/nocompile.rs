/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

/// # Must not compile tests
///
/// Element contents cannot be kept after the handler returns:
/// ```compile_fail
/// use typedxml::{SaxElement, SaxError, SaxHandler};
///
/// struct Keeper<'a> {
///     last: Option<&'a str>,
/// }
///
/// impl<'a> SaxHandler for Keeper<'a> {
///     fn handle_element(&mut self, element: &SaxElement) -> Result<(), SaxError> {
///         if let SaxElement::StartTag(name) = element {
///             self.last = Some(name);
///         }
///         Ok(())
///     }
/// }
/// ```
///
/// The environment returned from a parse cannot outlive its tags:
/// ```compile_fail
/// use typedxml::{XmlParser, Tag};
///
/// let tag: &Tag;
/// {
///     let mut parser = XmlParser::new(());
///     let env = parser.parse("<a/>").unwrap();
///     tag = env.current_element().unwrap();
/// }
/// println!("{}", tag);
/// ```
#[cfg(doctest)]
struct MustNotCompileTests;
