/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::fmt::Display;

/// A position in the parser input byte stream.
///
/// Returned from [SaxParser::location()](crate::SaxParser::location)
/// and carried by [Error::Parse](crate::Error::Parse). It points at the
/// last consumed byte, so after a syntax error it is the offset of the
/// offending byte.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Location {
    /// Byte position in the input stream.
    pub bytes: usize,
    /// How many lines have been parsed. Lines are separated by the newline character.
    pub lines: usize,
    /// How many bytes after the last newline character.
    pub column: usize,
}

impl Location {
    /// The start of the input.
    pub fn new() -> Self {
        Location::default()
    }

    pub(super) fn advance(&mut self, c: u8) {
        self.bytes += 1;
        match c {
            b'\n' => {
                self.lines += 1;
                self.column = 0;
            }
            _ => self.column += 1,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} column {} (byte {})", self.lines, self.column, self.bytes)
    }
}
