/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::io::Read;

/// Where an [XmlParser](crate::XmlParser) reads its document from.
pub enum InputSource<'a> {
    /// Complete document text.
    Text(&'a str),
    /// Complete document bytes, which must be UTF-8.
    Bytes(&'a [u8]),
    /// A byte stream, read in blocks until its end.
    Stream(&'a mut dyn Read),
}

impl<'a> From<&'a str> for InputSource<'a> {
    fn from(text: &'a str) -> Self {
        InputSource::Text(text)
    }
}

impl<'a> From<&'a String> for InputSource<'a> {
    fn from(text: &'a String) -> Self {
        InputSource::Text(text)
    }
}

impl<'a> From<&'a [u8]> for InputSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        InputSource::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for InputSource<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        InputSource::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for InputSource<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        InputSource::Bytes(bytes)
    }
}

impl<'a, R: Read> From<&'a mut R> for InputSource<'a> {
    fn from(reader: &'a mut R) -> Self {
        InputSource::Stream(reader)
    }
}
