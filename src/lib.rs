/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! Typed XML encoding of dynamic object graphs.
//!
//! [Marshaller] writes objects, lists, scalars and binary files as XML
//! elements whose `type` attribute tells how to read them back, and
//! [Unmarshaller] rebuilds the [Value] graph from such a document.
//!
//! ```
//! use typedxml::{Marshaller, Object, Unmarshaller, Value};
//!
//! let mut order = Object::new();
//! order.set("id", 42);
//! order.set("paid", true);
//! order.set("items", vec![Value::from("pen"), Value::from("ink")]);
//!
//! let xml = Marshaller::new().marshall(&order)?;
//! let value = Unmarshaller::new().unmarshall(&xml)?;
//! assert_eq!(value, Value::Object(order));
//! # Ok::<(), typedxml::Error>(())
//! ```
//!
//! Underneath, [XmlParser] drives a push-style [SaxParser] and reports
//! elements to a [ContentHandler] together with a [ParseEnvironment]
//! which tracks namespace declarations and the current element.

mod entities;
mod environment;
mod error;
mod events;
pub mod file;
mod marshal;
mod parser;
mod tag;
mod unmarshal;
mod value;

pub use parser::Location;
pub use parser::SaxElement;
pub use parser::SaxError;
pub use parser::SaxHandler;
pub use parser::SaxParser;

pub use tag::Tag;

pub use environment::LookupError;
pub use environment::Namespaces;
pub use environment::ParseEnvironment;

pub use events::ContentHandler;
pub use events::InputSource;
pub use events::XmlParser;

pub use error::Error;

pub use value::FileValue;
pub use value::FromObject;
pub use value::Object;
pub use value::Value;

pub use file::FileSource;

pub use unmarshal::UnmarshalOptions;
pub use unmarshal::UnmarshalState;
pub use unmarshal::Unmarshaller;

pub use marshal::DEFAULT_ROOT_ELEMENT;
pub use marshal::Field;
pub use marshal::FieldContent;
pub use marshal::FieldSelection;
pub use marshal::MarshalOptions;
pub use marshal::Marshallable;
pub use marshal::Marshaller;
pub use marshal::XmlWriter;
