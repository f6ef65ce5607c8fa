/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod error;
mod location;

pub(crate) use error::description;
pub use error::SaxError;
pub use location::Location;

/// An XML element returned from the parser.
#[derive(Debug, Eq, PartialEq)]
pub enum SaxElement<'a> {
    /// A start tag or empty element tag.
    ///
    /// The argument is the full name of the tag. This element is sent to the handler as soon as
    /// the name is parsed, before any of its attributes.
    StartTag(&'a str),

    /// A tag attribute for the last StartTag.
    ///
    /// First argument is the attribute name and the second argument is the attribute value.
    /// All references in the attribute value are replaced with the actual characters.
    Attribute(&'a str, &'a str),

    /// Indicates that the last StartTag was an empty element tag and will have no content.
    EmptyElementTag,

    /// An end tag element.
    ///
    /// The argument is the full name of the end tag.
    EndTag(&'a str),

    /// A character data element.
    ///
    /// A continuous block of text can arrive in several pieces, for example when the
    /// input is given in multiple parse calls or when a reference is substituted.
    /// Every piece is valid UTF-8 on its own.
    CData(&'a str),
}

/// Receiver of the elements produced by a [SaxParser].
pub trait SaxHandler {
    fn handle_element(&mut self, element: &SaxElement) -> Result<(), SaxError>;
}

/// SAX (Simple API for XML) based XML parser.
///
/// This struct implements a push parser which processes the incoming
/// bytes and invokes a handler function for each encountered
/// XML element. It does not allocate anything per element, names and
/// attribute values are collected into a reused internal buffer.
///
/// # Examples
///
/// ```
/// use typedxml::{SaxElement, SaxError, SaxHandler, SaxParser};
///
/// struct TagCounter {
///     tags: usize,
/// }
///
/// impl SaxHandler for TagCounter {
///     fn handle_element(&mut self, element: &SaxElement) -> Result<(), SaxError> {
///         if let SaxElement::StartTag(_) = element {
///             self.tags += 1;
///         }
///         Ok(())
///     }
/// }
///
/// let mut counter = TagCounter { tags: 0 };
/// let mut parser = SaxParser::new();
/// match parser.parse_bytes_finish(&mut counter, b"<doc><a/><b>text</b></doc>") {
///     Ok(()) => assert_eq!(counter.tags, 3),
///     Err(SaxError::BadXml(description)) => {
///         println!("syntax error at {}: {}", parser.location(), description);
///     }
///     Err(err) => println!("{}", err),
/// }
/// ```
///
/// Input can also be passed in multiple blocks of any size:
/// ```
/// # use typedxml::{SaxElement, SaxError, SaxHandler, SaxParser};
/// # struct Handler {}
/// # impl SaxHandler for Handler {
/// #     fn handle_element(&mut self, _element: &SaxElement) -> Result<(), SaxError> {
/// #         Ok(())
/// #     }
/// # }
/// # fn main() -> Result<(), SaxError> {
/// # let mut handler = Handler {};
/// let mut parser = SaxParser::new();
/// for block in [&b"<a><b"[..], &b"/>tex"[..], &b"t</a>"[..]] {
///     parser.parse_bytes(&mut handler, block)?;
/// }
/// // This is to check if there is any incomplete XML construct at the end
/// parser.parse_finish()?;
/// # Ok(())
/// # }
/// ```
pub struct SaxParser {
    state: State,
    uni_len: u32,
    uni_left: u32,
    uni_char: u32,
    depth: usize,
    is_end_tag: bool,
    quote: u8,
    brackets: u8,
    seen_content: bool,
    failed: bool,
    value_pos: usize,
    keyword_pos: usize,
    buffer: Vec<u8>,
    carry: Vec<u8>,
    ref_buffer: Vec<u8>,
    char_ref_value: u32,
    is_value_ref: bool,
    location: Location,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Keyword {
    CDataSection,
    Doctype,
}

impl Keyword {
    fn rest(self) -> &'static [u8] {
        match self {
            Keyword::CDataSection => b"CDATA[",
            Keyword::Doctype => b"OCTYPE",
        }
    }

    fn error(self) -> &'static str {
        match self {
            Keyword::CDataSection => description::MARKUP_CDATA_SECTION_BAD_START,
            Keyword::Doctype => description::MARKUP_DOCTYPE_BAD_START,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Prolog,
    TagStart,
    PI,
    PIEnd,
    Markup,
    Keyword(Keyword),
    CDataSectionBody,
    CDataSectionMaybeEnd,
    CDataSectionMaybeEnd2,
    CommentStart,
    CommentBody,
    CommentMaybeEnd,
    CommentEnd,
    DoctypeWhitespace,
    DoctypeSkip,
    DoctypeMarkupDecl,
    TagName,
    EndTagWhitespace,
    EmptyTagEnd,
    AttributeWhitespace,
    AttributeName,
    AttributeEq,
    AttributeValueStart,
    AttributeValue,
    AttributeValueEnd,
    CData,
    Reference,
    Entity,
    CharReference,
    CharReferenceBody,
    HexCharReference,
    Epilog,
}

const INITIAL_BUFFER_CAPACITY: usize = 128;

const REF_BUFFER_SIZE: usize = 8;

macro_rules! whitespace {
    () => {
        b' ' | b'\t' | b'\r' | b'\n'
    };
}

macro_rules! xml_error {
    ($a:ident) => {
        return Err(SaxError::BadXml(description::$a))
    };
}

pub(crate) fn is_valid_xml_char(c: u32) -> bool {
    matches!(
        c,
        0x09 | 0x0a | 0x0d | 0x20..=0xd7ff | 0xe000..=0xfffd | 0x10000..=0x10ffff
    )
}

fn extend(buffer: &mut Vec<u8>, bytes: &[u8]) -> Result<(), SaxError> {
    if buffer.try_reserve(bytes.len()).is_err() {
        return Err(SaxError::NoMemory);
    }
    buffer.extend_from_slice(bytes);
    Ok(())
}

// Input is validated byte by byte before it reaches here, so this only
// fails if a slice boundary splits a character.
fn as_str(bytes: &[u8]) -> Result<&str, SaxError> {
    std::str::from_utf8(bytes).map_err(|_| SaxError::BadXml(description::UTF8_INVALID_CONT_BYTE))
}

impl SaxParser {
    /// Creates a new SAX parser instance.
    ///
    /// The instance can be reused for multiple documents with the [reset()](SaxParser::reset) method.
    pub fn new() -> SaxParser {
        SaxParser {
            state: State::Prolog,
            uni_len: 0,
            uni_left: 0,
            uni_char: 0,
            depth: 0,
            is_end_tag: false,
            quote: b'"',
            brackets: 0,
            seen_content: false,
            failed: false,
            value_pos: 0,
            keyword_pos: 0,
            buffer: Vec::with_capacity(INITIAL_BUFFER_CAPACITY),
            carry: Vec::new(),
            ref_buffer: Vec::with_capacity(REF_BUFFER_SIZE),
            char_ref_value: 0,
            is_value_ref: false,
            location: Location::new(),
        }
    }

    /// Resets the parser into a clean state.
    pub fn reset(&mut self) {
        self.state = State::Prolog;
        self.uni_len = 0;
        self.uni_left = 0;
        self.uni_char = 0;
        self.depth = 0;
        self.is_end_tag = false;
        self.quote = b'"';
        self.brackets = 0;
        self.seen_content = false;
        self.failed = false;
        self.value_pos = 0;
        self.keyword_pos = 0;
        self.buffer.clear();
        self.carry.clear();
        self.ref_buffer.clear();
        self.char_ref_value = 0;
        self.is_value_ref = false;
        self.location = Location::new();
    }

    /// Returns the position of the last consumed byte.
    ///
    /// After a [SaxError::BadXml] this is the position of the offending byte.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Checks if the document is complete.
    ///
    /// A completed document should have a root tag and should not have any
    /// unfinished XML constructs, such as open comments and markup.
    pub fn parse_finish(&mut self) -> Result<(), SaxError> {
        if self.failed {
            xml_error!(PARSER_REUSE_WITHOUT_RESET);
        }
        if !self.seen_content {
            xml_error!(DOC_NO_CONTENT);
        }
        if self.depth > 0 {
            xml_error!(DOC_OPEN_TAGS);
        }
        if self.state != State::Epilog {
            xml_error!(DOC_OPEN_MARKUP);
        }
        Ok(())
    }

    /// Parses given XML bytes and checks if the document is complete.
    ///
    /// This is a convenience function which calls [parse_bytes()](SaxParser::parse_bytes)
    /// and [parse_finish()](SaxParser::parse_finish) methods for you.
    pub fn parse_bytes_finish(
        &mut self,
        handler: &mut impl SaxHandler,
        bytes: &[u8],
    ) -> Result<(), SaxError> {
        self.parse_bytes(handler, bytes)?;
        self.parse_finish()
    }

    /// Parses given XML bytes.
    ///
    /// After an error the parser refuses further input until it is
    /// [reset](SaxParser::reset).
    pub fn parse_bytes(
        &mut self,
        handler: &mut impl SaxHandler,
        bytes: &[u8],
    ) -> Result<(), SaxError> {
        if self.failed {
            xml_error!(PARSER_REUSE_WITHOUT_RESET);
        }
        let result = self.parse_block(handler, bytes);
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    fn send_text(&mut self, handler: &mut impl SaxHandler, text: &[u8]) -> Result<(), SaxError> {
        if self.carry.is_empty() {
            if !text.is_empty() {
                handler.handle_element(&SaxElement::CData(as_str(text)?))?;
            }
            return Ok(());
        }
        extend(&mut self.carry, text)?;
        let result = handler.handle_element(&SaxElement::CData(as_str(&self.carry)?));
        self.carry.clear();
        result
    }

    fn send_char_ref(&mut self, handler: &mut impl SaxHandler) -> Result<(), SaxError> {
        let value = self.char_ref_value;
        if !is_valid_xml_char(value) {
            xml_error!(CHAR_INVALID);
        }
        let Some(c) = char::from_u32(value) else {
            xml_error!(CHAR_INVALID);
        };
        let mut buf = [0u8; 4];
        let s = c.encode_utf8(&mut buf);
        if self.is_value_ref {
            extend(&mut self.buffer, s.as_bytes())
        } else {
            handler.handle_element(&SaxElement::CData(s))
        }
    }

    fn check_char(&mut self, c: u8) -> Result<(), SaxError> {
        if self.uni_left > 0 {
            if c & 0xc0 != 0x80 {
                xml_error!(UTF8_INVALID_CONT_BYTE);
            }
            self.uni_char <<= 6;
            self.uni_char += c as u32 & 0x3f;
            self.uni_left -= 1;
            if self.uni_left == 0 {
                // Sequences longer than the actual character codepoint
                // size are security hazards.
                if (self.uni_len == 2 && self.uni_char <= 0x7f)
                    || (self.uni_len == 3 && self.uni_char <= 0x7ff)
                    || (self.uni_len == 4 && self.uni_char <= 0xffff)
                {
                    xml_error!(UTF8_OVERLONG_SEQUENCE);
                }
                if !is_valid_xml_char(self.uni_char) {
                    xml_error!(CHAR_INVALID);
                }
            }
        } else if c & 0x80 == 0x80 {
            if c & 0xe0 == 0xc0 {
                self.uni_len = 2;
                self.uni_left = 1;
                self.uni_char = c as u32 & 0x1f;
            } else if c & 0xf0 == 0xe0 {
                self.uni_len = 3;
                self.uni_left = 2;
                self.uni_char = c as u32 & 0x0f;
            } else if c & 0xf8 == 0xf0 {
                self.uni_len = 4;
                self.uni_left = 3;
                self.uni_char = c as u32 & 0x07;
            } else {
                xml_error!(UTF8_INVALID_PREFIX_BYTE);
            }
        } else if c < 0x20 && !matches!(c, 0x09 | 0x0a | 0x0d) {
            xml_error!(CHAR_INVALID);
        }
        Ok(())
    }

    // State to return to after a comment or a processing instruction.
    fn after_markup(&self) -> State {
        if self.depth > 0 {
            State::CData
        } else if self.seen_content {
            State::Epilog
        } else {
            State::Prolog
        }
    }

    fn close_tag(&mut self) -> Result<State, SaxError> {
        if self.depth == 0 {
            xml_error!(TAG_CLOSE_WITHOUT_OPEN);
        }
        self.depth -= 1;
        if self.depth == 0 {
            Ok(State::Epilog)
        } else {
            Ok(State::CData)
        }
    }

    fn parse_block(
        &mut self,
        handler: &mut impl SaxHandler,
        bytes: &[u8],
    ) -> Result<(), SaxError> {
        let mut pos: usize = 0;
        let mut back: usize = 0;

        while pos < bytes.len() {
            let mut redo = false;
            let c = bytes[pos];

            self.check_char(c)?;

            match self.state {
                State::Prolog | State::Epilog => match c {
                    b'<' => self.state = State::TagStart,
                    whitespace!() => (),
                    _ => xml_error!(DOC_CDATA_WITHOUT_PARENT),
                },

                State::TagStart => match c {
                    b'!' => self.state = State::Markup,
                    b'?' => self.state = State::PI,
                    b'/' => {
                        if self.depth == 0 {
                            xml_error!(TAG_CLOSE_WITHOUT_OPEN);
                        }
                        back = pos + 1;
                        self.is_end_tag = true;
                        self.state = State::TagName;
                    }
                    whitespace!() => xml_error!(TAG_WHITESPACE_START),
                    b'>' => xml_error!(TAG_EMPTY_NAME),
                    _ => {
                        if self.depth == 0 && self.seen_content {
                            xml_error!(TAG_OUTSIDE_ROOT);
                        }
                        self.depth += 1;
                        back = pos;
                        self.is_end_tag = false;
                        self.seen_content = true;
                        self.state = State::TagName;
                    }
                },

                State::Markup => match c {
                    b'-' => self.state = State::CommentStart,
                    b'[' => {
                        if self.depth == 0 {
                            xml_error!(MARKUP_CDATA_SECTION_OUTSIDE_ROOT);
                        }
                        self.keyword_pos = 0;
                        self.state = State::Keyword(Keyword::CDataSection);
                    }
                    b'D' => {
                        self.keyword_pos = 0;
                        self.state = State::Keyword(Keyword::Doctype);
                    }
                    _ => xml_error!(MARKUP_UNRECOGNIZED),
                },

                State::Keyword(keyword) => {
                    let rest = keyword.rest();
                    if c != rest[self.keyword_pos] {
                        return Err(SaxError::BadXml(keyword.error()));
                    }
                    self.keyword_pos += 1;
                    if self.keyword_pos == rest.len() {
                        match keyword {
                            Keyword::CDataSection => {
                                back = pos + 1;
                                self.state = State::CDataSectionBody;
                            }
                            Keyword::Doctype => self.state = State::DoctypeWhitespace,
                        }
                    }
                }

                State::DoctypeWhitespace => match c {
                    whitespace!() => self.state = State::DoctypeSkip,
                    _ => xml_error!(MARKUP_DOCTYPE_BAD_START),
                },

                State::DoctypeSkip => match c {
                    b'<' => self.state = State::DoctypeMarkupDecl,
                    b'>' => self.state = State::Prolog,
                    _ => (),
                },

                State::DoctypeMarkupDecl => {
                    if c == b'>' {
                        self.state = State::DoctypeSkip;
                    }
                }

                State::CDataSectionBody => {
                    if c == b']' {
                        self.send_text(handler, &bytes[back..pos])?;
                        self.state = State::CDataSectionMaybeEnd;
                    }
                }

                State::CDataSectionMaybeEnd => match c {
                    b']' => self.state = State::CDataSectionMaybeEnd2,
                    _ => {
                        handler.handle_element(&SaxElement::CData("]"))?;
                        back = pos;
                        self.state = State::CDataSectionBody;
                    }
                },

                State::CDataSectionMaybeEnd2 => match c {
                    b'>' => {
                        back = pos + 1;
                        self.state = State::CData;
                    }
                    b']' => handler.handle_element(&SaxElement::CData("]"))?,
                    _ => {
                        handler.handle_element(&SaxElement::CData("]]"))?;
                        back = pos;
                        self.state = State::CDataSectionBody;
                    }
                },

                State::CommentStart => {
                    if c != b'-' {
                        xml_error!(COMMENT_MISSING_DASH);
                    }
                    self.state = State::CommentBody;
                }

                State::CommentBody => {
                    if c == b'-' {
                        self.state = State::CommentMaybeEnd;
                    }
                }

                State::CommentMaybeEnd => match c {
                    b'-' => self.state = State::CommentEnd,
                    _ => self.state = State::CommentBody,
                },

                State::CommentEnd => {
                    if c != b'>' {
                        xml_error!(COMMENT_MISSING_END);
                    }
                    back = pos + 1;
                    self.state = self.after_markup();
                }

                State::PI => {
                    if c == b'?' {
                        self.state = State::PIEnd;
                    }
                }

                State::PIEnd => match c {
                    b'>' => {
                        back = pos + 1;
                        self.state = self.after_markup();
                    }
                    b'?' => (),
                    _ => self.state = State::PI,
                },

                State::TagName => match c {
                    b'/' | b'>' | whitespace!() => {
                        extend(&mut self.buffer, &bytes[back..pos])?;
                        if self.buffer.is_empty() {
                            xml_error!(TAG_EMPTY_NAME);
                        }
                        let name = as_str(&self.buffer)?;
                        if self.is_end_tag {
                            if c == b'/' {
                                xml_error!(TAG_DOUBLE_END);
                            }
                            handler.handle_element(&SaxElement::EndTag(name))?;
                        } else {
                            handler.handle_element(&SaxElement::StartTag(name))?;
                        }
                        self.buffer.clear();
                        match c {
                            b'/' => {
                                handler.handle_element(&SaxElement::EmptyElementTag)?;
                                self.state = State::EmptyTagEnd;
                            }
                            b'>' => {
                                back = pos + 1;
                                self.state = if self.is_end_tag {
                                    self.close_tag()?
                                } else {
                                    State::CData
                                };
                            }
                            _ => {
                                self.state = if self.is_end_tag {
                                    State::EndTagWhitespace
                                } else {
                                    State::AttributeWhitespace
                                };
                            }
                        }
                    }
                    _ => (),
                },

                State::EmptyTagEnd => match c {
                    b'>' => {
                        back = pos + 1;
                        self.state = self.close_tag()?;
                    }
                    _ => xml_error!(TAG_EMPTY_TAG_MISSING_END),
                },

                State::EndTagWhitespace => match c {
                    b'>' => {
                        back = pos + 1;
                        self.state = self.close_tag()?;
                    }
                    whitespace!() => (),
                    _ => xml_error!(TAG_END_TAG_ATTRIBUTES),
                },

                State::AttributeWhitespace => match c {
                    whitespace!() => (),
                    b'/' => {
                        handler.handle_element(&SaxElement::EmptyElementTag)?;
                        self.state = State::EmptyTagEnd;
                    }
                    b'>' => {
                        back = pos + 1;
                        self.state = State::CData;
                    }
                    _ => {
                        back = pos;
                        self.state = State::AttributeName;
                        redo = true;
                    }
                },

                State::AttributeName => match c {
                    b'=' | whitespace!() => {
                        extend(&mut self.buffer, &bytes[back..pos])?;
                        self.state = if c == b'=' {
                            State::AttributeValueStart
                        } else {
                            State::AttributeEq
                        };
                    }
                    b'/' | b'>' | b'<' => xml_error!(TAG_ATTRIBUTE_BAD_NAME),
                    _ => (),
                },

                State::AttributeEq => match c {
                    b'=' => self.state = State::AttributeValueStart,
                    whitespace!() => (),
                    _ => xml_error!(TAG_ATTRIBUTE_WITHOUT_EQUAL),
                },

                State::AttributeValueStart => match c {
                    b'"' | b'\'' => {
                        self.quote = c;
                        self.value_pos = self.buffer.len();
                        back = pos + 1;
                        self.state = State::AttributeValue;
                    }
                    whitespace!() => (),
                    _ => xml_error!(TAG_ATTRIBUTE_WITHOUT_QUOTE),
                },

                State::AttributeValue => {
                    if c == self.quote {
                        extend(&mut self.buffer, &bytes[back..pos])?;
                        let (name, value) = self.buffer.split_at(self.value_pos);
                        handler.handle_element(&SaxElement::Attribute(
                            as_str(name)?,
                            as_str(value)?,
                        ))?;
                        self.buffer.clear();
                        self.state = State::AttributeValueEnd;
                    } else if c == b'&' {
                        extend(&mut self.buffer, &bytes[back..pos])?;
                        self.ref_buffer.clear();
                        self.is_value_ref = true;
                        self.state = State::Reference;
                    } else if c == b'<' {
                        xml_error!(TAG_ATTRIBUTE_BAD_VALUE);
                    }
                }

                State::AttributeValueEnd => match c {
                    whitespace!() => self.state = State::AttributeWhitespace,
                    b'/' => {
                        handler.handle_element(&SaxElement::EmptyElementTag)?;
                        self.state = State::EmptyTagEnd;
                    }
                    b'>' => {
                        back = pos + 1;
                        self.state = State::CData;
                    }
                    _ => xml_error!(TAG_ATTRIBUTE_WITHOUT_WHITESPACE),
                },

                State::CData => match c {
                    b'<' => {
                        self.brackets = 0;
                        self.send_text(handler, &bytes[back..pos])?;
                        self.state = State::TagStart;
                    }
                    b'&' => {
                        self.brackets = 0;
                        self.send_text(handler, &bytes[back..pos])?;
                        self.ref_buffer.clear();
                        self.is_value_ref = false;
                        self.state = State::Reference;
                    }
                    b']' => self.brackets = (self.brackets + 1).min(2),
                    b'>' if self.brackets == 2 => xml_error!(TEXT_CDATA_SECTION_END),
                    _ => self.brackets = 0,
                },

                State::Reference => match c {
                    b'#' => {
                        self.char_ref_value = 0;
                        self.state = State::CharReference;
                    }
                    b';' => xml_error!(REFERENCE_CUSTOM_ENTITY),
                    _ => {
                        self.ref_buffer.push(c);
                        self.state = State::Entity;
                    }
                },

                State::Entity => match c {
                    b';' => {
                        let ent = match self.ref_buffer.as_slice() {
                            b"amp" => "&",
                            b"lt" => "<",
                            b"gt" => ">",
                            b"quot" => "\"",
                            b"apos" => "'",
                            _ => xml_error!(REFERENCE_CUSTOM_ENTITY),
                        };
                        back = pos + 1;
                        if self.is_value_ref {
                            extend(&mut self.buffer, ent.as_bytes())?;
                            self.state = State::AttributeValue;
                        } else {
                            handler.handle_element(&SaxElement::CData(ent))?;
                            self.state = State::CData;
                        }
                    }
                    _ => {
                        if self.ref_buffer.len() >= REF_BUFFER_SIZE {
                            xml_error!(REFERENCE_CUSTOM_ENTITY);
                        }
                        self.ref_buffer.push(c);
                    }
                },

                State::CharReference => match c {
                    b'x' => self.state = State::HexCharReference,
                    b'0'..=b'9' => {
                        self.char_ref_value = (c - b'0') as u32;
                        self.state = State::CharReferenceBody;
                    }
                    _ => xml_error!(REFERENCE_INVALID_DECIMAL),
                },

                State::CharReferenceBody | State::HexCharReference => {
                    let radix = if self.state == State::HexCharReference {
                        16
                    } else {
                        10
                    };
                    if c == b';' {
                        self.send_char_ref(handler)?;
                        back = pos + 1;
                        self.state = if self.is_value_ref {
                            State::AttributeValue
                        } else {
                            State::CData
                        };
                    } else {
                        let Some(digit) = (c as char).to_digit(radix) else {
                            if radix == 16 {
                                xml_error!(REFERENCE_INVALID_HEX);
                            }
                            xml_error!(REFERENCE_INVALID_DECIMAL);
                        };
                        self.char_ref_value = self
                            .char_ref_value
                            .saturating_mul(radix)
                            .saturating_add(digit);
                    }
                }
            }

            if !redo {
                pos += 1;
                self.location.advance(c);
            }
        }

        match self.state {
            State::TagName | State::AttributeName | State::AttributeValue => {
                extend(&mut self.buffer, &bytes[back.min(pos)..pos])?;
            }
            State::CData | State::CDataSectionBody => {
                let back = back.min(pos);
                // Keep an incomplete multibyte character for the next block.
                let partial = (self.uni_len - self.uni_left) as usize;
                let split = if self.uni_left > 0 {
                    pos.saturating_sub(partial).max(back)
                } else {
                    pos
                };
                if split > back {
                    self.send_text(handler, &bytes[back..split])?;
                }
                extend(&mut self.carry, &bytes[split..pos])?;
            }
            _ => (),
        }

        Ok(())
    }
}

impl Default for SaxParser {
    fn default() -> Self {
        Self::new()
    }
}


mod nocompile;
