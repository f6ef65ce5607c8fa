/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod scalar;

use crate::ContentHandler;
use crate::Error;
use crate::FileValue;
use crate::FromObject;
use crate::InputSource;
use crate::Object;
use crate::ParseEnvironment;
use crate::Value;
use crate::XmlParser;

use scalar::ScalarKind;

/// Per-call configuration of an [Unmarshaller].
#[derive(Clone, Debug, Default)]
pub struct UnmarshalOptions {
    target_class: Option<String>,
    buffer_size: Option<usize>,
}

impl UnmarshalOptions {
    pub fn new() -> UnmarshalOptions {
        UnmarshalOptions::default()
    }

    /// Class name given to the result when the root is an object.
    pub fn with_target_class(mut self, class: &str) -> UnmarshalOptions {
        self.target_class = Some(class.to_string());
        self
    }

    /// Size of the blocks read from stream inputs.
    pub fn with_buffer_size(mut self, size: usize) -> UnmarshalOptions {
        self.buffer_size = Some(size);
        self
    }

    pub fn target_class(&self) -> Option<&str> {
        self.target_class.as_deref()
    }
}

enum Container {
    Object(Object),
    List(Vec<Value>),
    File {
        file: FileValue,
        parts: Vec<(Option<u64>, Vec<u8>)>,
    },
}

// An open container tag. Its value is stored into the parent when it closes.
struct Frame {
    tag: String,
    count: Option<usize>,
    container: Container,
}

impl Frame {
    fn finish(self) -> Value {
        match self.container {
            Container::Object(object) => Value::Object(object),
            Container::List(items) => {
                if let Some(count) = self.count {
                    if count != items.len() {
                        log::warn!(
                            "<{}> declares {} items but has {}",
                            self.tag,
                            count,
                            items.len()
                        );
                    }
                }
                Value::List(items)
            }
            Container::File {
                mut file,
                mut parts,
            } => {
                // Stable, so unnumbered parts stay in document order.
                parts.sort_by_key(|(number, _)| number.unwrap_or(u64::MAX));
                for (_, bytes) in parts {
                    file.push_chunk(bytes);
                }
                Value::File(file)
            }
        }
    }
}

struct PendingScalar {
    kind: ScalarKind,
    number: Option<u64>,
    text: String,
}

/// Unmarshalling state kept in the [ParseEnvironment] during a parse.
#[derive(Default)]
pub struct UnmarshalState {
    target_class: Option<String>,
    stack: Vec<Frame>,
    pending: Option<PendingScalar>,
    result: Option<Value>,
}

impl UnmarshalState {
    /// Number of open containers.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Takes the decoded root value of a finished parse.
    pub fn into_result(self) -> Result<Value, Error> {
        if !self.stack.is_empty() {
            return Err(Error::Structure("containers are still open"));
        }
        self.result
            .ok_or(Error::Structure("document did not produce a value"))
    }

    fn store(&mut self, name: &str, mut value: Value, number: Option<u64>) -> Result<(), Error> {
        log::trace!("store <{}> {}", name, value.type_token().unwrap_or("string"));
        let Some(frame) = self.stack.last_mut() else {
            if let (Value::Object(object), Some(class)) = (&mut value, &self.target_class) {
                object.set_class(class);
            }
            self.result = Some(value);
            return Ok(());
        };
        match &mut frame.container {
            Container::List(items) => items.push(value),
            Container::Object(object) => object.set(name, value),
            Container::File { parts, .. } => {
                let bytes = match value {
                    Value::Binary(bytes) => bytes,
                    Value::String(text) => text.into_bytes(),
                    _ => return Err(Error::Structure("file parts must hold binary data")),
                };
                parts.push((number, bytes));
            }
        }
        Ok(())
    }
}

/// Rebuilds [Value]s from their typed XML encoding.
///
/// Every element may carry a `type` attribute, `object`, `list`, `tuple`
/// and `file` elements contain child elements, the other types are read
/// from the element text. Elements without a type are strings.
///
/// ```
/// use typedxml::{Unmarshaller, Value};
///
/// let value = Unmarshaller::new().unmarshall(
///     r#"<xmlPythonData type="object"><x type="int">5</x></xmlPythonData>"#,
/// )?;
/// assert_eq!(value.as_object().and_then(|o| o.get("x")), Some(&Value::Int(5)));
/// # Ok::<(), typedxml::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Unmarshaller {
    options: UnmarshalOptions,
}

impl Unmarshaller {
    pub fn new() -> Unmarshaller {
        Unmarshaller::default()
    }

    pub fn with_options(options: UnmarshalOptions) -> Unmarshaller {
        Unmarshaller { options }
    }

    pub fn with_target_class(class: &str) -> Unmarshaller {
        Unmarshaller::with_options(UnmarshalOptions::new().with_target_class(class))
    }

    pub fn options(&self) -> &UnmarshalOptions {
        &self.options
    }

    /// Decodes a whole document into its root value.
    pub fn unmarshall<'a>(&self, source: impl Into<InputSource<'a>>) -> Result<Value, Error> {
        let mut parser = XmlParser::new(self.clone());
        if let Some(size) = self.options.buffer_size {
            parser = parser.with_buffer_size(size);
        }
        parser.parse(source)?.into_state().into_result()
    }

    /// Decodes a document whose root is an object into a typed value.
    pub fn unmarshall_into<'a, T: FromObject>(
        &self,
        source: impl Into<InputSource<'a>>,
    ) -> Result<T, Error> {
        match self.unmarshall(source)? {
            Value::Object(object) => T::from_object(object),
            _ => Err(Error::Structure("root value is not an object")),
        }
    }
}

impl ContentHandler for Unmarshaller {
    type State = UnmarshalState;

    fn start_document(&mut self, env: &mut ParseEnvironment<UnmarshalState>) -> Result<(), Error> {
        env.state_mut().target_class = self.options.target_class.clone();
        Ok(())
    }

    fn start_element(&mut self, env: &mut ParseEnvironment<UnmarshalState>) -> Result<(), Error> {
        let tag = env
            .current_element()
            .ok_or(Error::Structure("element event without a tag"))?;
        let token = tag.attribute("type");
        let container = match token {
            Some("object") => Some(Container::Object(Object::new())),
            Some("list") | Some("tuple") => Some(Container::List(Vec::new())),
            Some("file") => {
                let mut file = FileValue::new();
                if let Some(name) = tag.attribute("name") {
                    file.set_name(name);
                }
                if let Some(mime_type) = tag.attribute("mimeType") {
                    file.set_mime_type(mime_type);
                }
                Some(Container::File {
                    file,
                    parts: Vec::new(),
                })
            }
            _ => None,
        };
        let name = tag.name().to_string();
        let count = tag.attribute("count").and_then(|c| c.trim().parse().ok());
        let number = tag.attribute("number").and_then(|n| n.trim().parse().ok());
        let kind = match token {
            None => ScalarKind::String,
            Some(token) => ScalarKind::from_token(token).unwrap_or_else(|| {
                if container.is_none() {
                    log::debug!("unknown type '{}' of <{}> read as string", token, name);
                }
                ScalarKind::String
            }),
        };

        let state = env.state_mut();
        if state.pending.is_some() {
            return Err(Error::Structure("element nested in a scalar value"));
        }
        match container {
            Some(container) => {
                if let Some(Frame {
                    container: Container::File { .. },
                    ..
                }) = state.stack.last()
                {
                    return Err(Error::Structure("container nested in a file"));
                }
                state.stack.push(Frame {
                    tag: name,
                    count,
                    container,
                });
            }
            None => {
                state.pending = Some(PendingScalar {
                    kind,
                    number,
                    text: String::new(),
                });
            }
        }
        Ok(())
    }

    fn characters(
        &mut self,
        env: &mut ParseEnvironment<UnmarshalState>,
        text: &str,
    ) -> Result<(), Error> {
        if let Some(scalar) = env.state_mut().pending.as_mut() {
            scalar.text.push_str(text);
        }
        Ok(())
    }

    fn end_element(&mut self, env: &mut ParseEnvironment<UnmarshalState>) -> Result<(), Error> {
        match env.state_mut().pending.take() {
            Some(scalar) => {
                let name = env
                    .current_element()
                    .map(|tag| tag.name().to_string())
                    .unwrap_or_default();
                let value = scalar.kind.convert(&name, &scalar.text)?;
                env.state_mut().store(&name, value, scalar.number)
            }
            None => {
                let state = env.state_mut();
                let frame = state
                    .stack
                    .pop()
                    .ok_or(Error::Structure("container closed without being open"))?;
                let name = frame.tag.clone();
                let value = frame.finish();
                state.store(&name, value, None)
            }
        }
    }
}

#[cfg(test)]
mod tests;
