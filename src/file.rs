/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! Building [FileValue]s from the shapes files are handed over in.

use std::io::Read;

use crate::Error;
use crate::FileValue;
use crate::Value;

/// MIME type of files given without one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Size of the chunks read from upload streams.
pub const CHUNK_SIZE: usize = 5000;

const WRONG_FILE_TUPLE: &str = "This is not the way to set a file. You can specify a 2-tuple \
    (fileName, fileContent) or a 3-tuple (fileName, fileContent, mimeType).";

const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("application/msword", "doc"),
    ("application/pdf", "pdf"),
    ("application/rtf", "rtf"),
    ("application/vnd.ms-excel", "xls"),
    ("application/vnd.oasis.opendocument.spreadsheet", "ods"),
    ("application/vnd.oasis.opendocument.text", "odt"),
    ("application/xml", "xml"),
    ("application/zip", "zip"),
    ("image/gif", "gif"),
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("text/csv", "csv"),
    ("text/html", "html"),
    ("text/plain", "txt"),
    ("text/xml", "xml"),
];

/// A file as supplied by a caller.
pub enum FileSource<'a> {
    /// Content uploaded over a stream, such as an HTTP form post.
    UploadStream {
        reader: &'a mut dyn Read,
        filename: Option<String>,
        content_type: Option<String>,
    },
    /// Content already held in memory as a chain of chunks.
    LegacyFile {
        filename: Option<String>,
        content_type: Option<String>,
        chunks: Vec<Vec<u8>>,
    },
    /// `(name, content)` or `(name, content, mimeType)`.
    InlineTuple(Vec<Value>),
}

/// Strips any directory or drive part from a file name.
///
/// ```
/// use typedxml::file::normalize_file_name;
///
/// assert_eq!(normalize_file_name(r"C:\Users\me\cv.odt"), "cv.odt");
/// assert_eq!(normalize_file_name("cv.odt"), "cv.odt");
/// ```
pub fn normalize_file_name(name: &str) -> &str {
    match name.rfind(['/', '\\', ':']) {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

/// Usual file extension for a MIME type, `bin` when unknown.
pub fn extension_for(mime_type: &str) -> &'static str {
    MIME_EXTENSIONS
        .iter()
        .find(|(mime, _)| *mime == mime_type)
        .map(|(_, ext)| *ext)
        .unwrap_or("bin")
}

/// Guesses the MIME type of a file from the extension of its name.
pub fn guess_mime_type(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    MIME_EXTENSIONS
        .iter()
        .find(|(_, e)| e.eq_ignore_ascii_case(ext))
        .map(|(mime, _)| *mime)
}

fn read_chunks(reader: &mut dyn Read) -> Result<Vec<Vec<u8>>, Error> {
    let mut chunks = Vec::new();
    loop {
        let mut chunk = Vec::with_capacity(CHUNK_SIZE);
        (&mut *reader)
            .take(CHUNK_SIZE as u64)
            .read_to_end(&mut chunk)?;
        if chunk.is_empty() {
            return Ok(chunks);
        }
        chunks.push(chunk);
    }
}

type FileParts = (Option<String>, Option<String>, Vec<Vec<u8>>);

fn inline_tuple(items: Vec<Value>) -> Result<FileParts, Error> {
    let mut items = items.into_iter();
    let (name, content, mime_type) = match (items.next(), items.next(), items.next(), items.next()) {
        (Some(name), Some(content), mime_type, None) => (name, content, mime_type),
        _ => return Err(Error::BadFileSource(WRONG_FILE_TUPLE)),
    };
    let name = match name {
        Value::String(name) if !name.is_empty() => name,
        _ => return Err(Error::BadFileSource(WRONG_FILE_TUPLE)),
    };
    let content = match content {
        Value::String(text) => text.into_bytes(),
        Value::Binary(bytes) => bytes,
        _ => return Err(Error::BadFileSource(WRONG_FILE_TUPLE)),
    };
    let mime_type = match mime_type {
        Some(Value::String(mime)) if !mime.is_empty() => Some(mime),
        None | Some(Value::Null) | Some(Value::String(_)) => {
            guess_mime_type(&name).map(str::to_string)
        }
        Some(_) => return Err(Error::BadFileSource(WRONG_FILE_TUPLE)),
    };
    Ok((Some(name), mime_type, vec![content]))
}

impl FileValue {
    /// Builds the file value stored in field `field_name`.
    ///
    /// A file without a MIME type gets [DEFAULT_MIME_TYPE], and a file
    /// without a name is named after the field, with an extension
    /// matching its MIME type.
    pub fn from_source(field_name: &str, source: FileSource<'_>) -> Result<FileValue, Error> {
        let (filename, mime_type, chunks) = match source {
            FileSource::UploadStream {
                reader,
                filename,
                content_type,
            } => (filename, content_type, read_chunks(reader)?),
            FileSource::LegacyFile {
                filename,
                content_type,
                chunks,
            } => (filename, content_type, chunks),
            FileSource::InlineTuple(items) => inline_tuple(items)?,
        };
        let mime_type = mime_type
            .filter(|mime| !mime.is_empty())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
        let name = match filename.as_deref() {
            Some(name) if !name.is_empty() => normalize_file_name(name).to_string(),
            _ => format!("{}.{}", field_name, extension_for(&mime_type)),
        };
        log::debug!(
            "file '{}' ({}) for field {} in {} chunks",
            name,
            mime_type,
            field_name,
            chunks.len()
        );
        Ok(FileValue::from_chunks(chunks)
            .with_name(&name)
            .with_mime_type(&mime_type))
    }
}
