/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use thiserror::Error;

use crate::LookupError;
use crate::parser::Location;

/// Errors of the parsing, unmarshalling, and marshalling operations.
///
/// Parsing is all-or-nothing: when any of these is returned, no partial
/// result is available. Malformed numeric field text is not an error,
/// it decodes to [Value::Null](crate::Value::Null).
#[derive(Debug, Error)]
pub enum Error {
    /// Memory for parser buffers could not be allocated.
    #[error("not enough memory")]
    NoMemory,

    /// The input is not well-formed XML.
    #[error("invalid xml syntax at {location}: {description}")]
    Parse {
        description: &'static str,
        location: Location,
    },

    /// A namespace URI was never declared in the document.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Reading the input stream failed.
    #[error("cannot read xml input: {0}")]
    Io(#[from] std::io::Error),

    /// The document decoded to a shape that the codec cannot represent.
    #[error("unsupported document structure: {0}")]
    Structure(&'static str),

    /// Content of a `base64` typed tag is not valid base64.
    #[error("invalid base64 content in <{tag}>: {source}")]
    BadBase64 {
        tag: String,
        source: base64::DecodeError,
    },

    /// Content of a `DateTime` typed tag is not a recognized date.
    #[error("invalid date in <{tag}>: '{text}'")]
    BadDateTime { tag: String, text: String },

    /// A date could not be formatted while marshalling.
    #[error("cannot format date: {0}")]
    Format(#[from] time::error::Format),

    /// A file was given in a shape that cannot be stored.
    #[error("{0}")]
    BadFileSource(&'static str),

    /// A field or root element name is not a valid XML name.
    #[error("'{0}' cannot be used as an xml element name")]
    BadName(String),

    /// Text to be marshalled has a character not allowed in XML.
    #[error("character {0:?} cannot be written in xml")]
    BadChar(char),

    /// A field needed by [FromObject](crate::FromObject) is missing.
    #[error("field '{0}' is missing")]
    MissingField(String),

    /// A field needed by [FromObject](crate::FromObject) has another type.
    #[error("field '{field}' should be of type {expected}")]
    FieldType {
        field: String,
        expected: &'static str,
    },
}
