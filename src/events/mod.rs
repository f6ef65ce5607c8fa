/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod source;

use crate::Error;
use crate::ParseEnvironment;
use crate::parser::Location;
use crate::parser::SaxElement;
use crate::parser::SaxError;
use crate::parser::SaxHandler;
use crate::parser::SaxParser;
use crate::parser::description;

pub use source::InputSource;

const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Callbacks of an [XmlParser], each receiving the parse environment.
///
/// All hooks default to doing nothing, so a handler only overrides the
/// events it is interested in. Returning an error from any hook aborts
/// the parse and the error is handed to the caller of
/// [parse()](XmlParser::parse) unchanged.
///
/// The element of `start_element` and `end_element` is available as
/// [current_element()](ParseEnvironment::current_element); namespace
/// declarations of a start tag are already registered when its hook runs.
pub trait ContentHandler {
    /// Per-parse extension state stored in the environment.
    type State: Default;

    fn set_document_locator(
        &mut self,
        _env: &mut ParseEnvironment<Self::State>,
        _location: Location,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn start_document(&mut self, _env: &mut ParseEnvironment<Self::State>) -> Result<(), Error> {
        Ok(())
    }

    fn start_element(&mut self, _env: &mut ParseEnvironment<Self::State>) -> Result<(), Error> {
        Ok(())
    }

    fn end_element(&mut self, _env: &mut ParseEnvironment<Self::State>) -> Result<(), Error> {
        Ok(())
    }

    fn characters(
        &mut self,
        _env: &mut ParseEnvironment<Self::State>,
        _text: &str,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn end_document(&mut self, _env: &mut ParseEnvironment<Self::State>) -> Result<(), Error> {
        Ok(())
    }
}

/// The base handler, which only tracks namespaces and the current element.
impl ContentHandler for () {
    type State = ();
}

// The location is filled in by XmlParser::parse when the error surfaces.
fn syntax_error(description: &'static str) -> Error {
    Error::Parse {
        description,
        location: Location::new(),
    }
}

enum Failure {
    Sax(SaxError),
    Io(std::io::Error),
}

// Turns the flat element stream of the SAX parser into handler events.
//
// Attributes arrive after their StartTag, so the start event is held
// back until the next element shows that the attribute list is complete.
struct Dispatcher<'h, H: ContentHandler> {
    handler: &'h mut H,
    env: ParseEnvironment<H::State>,
    open_tags: Vec<String>,
    attributes: Vec<(String, String)>,
    start_pending: bool,
    error: Option<Error>,
}

impl<'h, H: ContentHandler> Dispatcher<'h, H> {
    fn new(handler: &'h mut H) -> Self {
        Dispatcher {
            handler,
            env: ParseEnvironment::new(),
            open_tags: Vec::new(),
            attributes: Vec::new(),
            start_pending: false,
            error: None,
        }
    }

    fn flush_start(&mut self) -> Result<(), Error> {
        if !self.start_pending {
            return Ok(());
        }
        self.start_pending = false;
        let name = self.open_tags.last().map(String::as_str).unwrap_or_default();
        log::trace!("start element <{}>", name);
        self.env.register_namespaces(&self.attributes);
        self.env.enter_element(name, &mut self.attributes);
        self.handler.start_element(&mut self.env)
    }

    fn end(&mut self, name: Option<&str>) -> Result<(), Error> {
        let Some(open) = self.open_tags.pop() else {
            return Err(syntax_error(description::TAG_CLOSE_WITHOUT_OPEN));
        };
        if let Some(name) = name {
            if name != open {
                return Err(syntax_error(description::TAG_MISMATCH));
            }
        }
        log::trace!("end element </{}>", open);
        self.env.leave_element(&open);
        self.handler.end_element(&mut self.env)
    }

    fn dispatch(&mut self, element: &SaxElement) -> Result<(), Error> {
        match element {
            SaxElement::StartTag(name) => {
                self.flush_start()?;
                self.attributes.clear();
                self.open_tags.push(name.to_string());
                self.start_pending = true;
                Ok(())
            }
            SaxElement::Attribute(name, value) => {
                if self.attributes.iter().any(|(seen, _)| seen == name) {
                    return Err(syntax_error(description::TAG_ATTRIBUTE_DUPLICATE));
                }
                self.attributes.push((name.to_string(), value.to_string()));
                Ok(())
            }
            SaxElement::EmptyElementTag => {
                self.flush_start()?;
                self.end(None)
            }
            SaxElement::EndTag(name) => {
                self.flush_start()?;
                self.end(Some(*name))
            }
            SaxElement::CData(text) => {
                self.flush_start()?;
                self.handler.characters(&mut self.env, text)
            }
        }
    }
}

impl<H: ContentHandler> SaxHandler for Dispatcher<'_, H> {
    fn handle_element(&mut self, element: &SaxElement) -> Result<(), SaxError> {
        match self.dispatch(element) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.error = Some(err);
                Err(SaxError::HandlerAbort)
            }
        }
    }
}

/// Event-driven XML parser dispatching to a [ContentHandler].
///
/// Each call to [parse()](XmlParser::parse) runs a complete, single pass
/// over one document with a fresh [ParseEnvironment], which is returned
/// to the caller. A parser is not meant to be shared between threads
/// while parsing; use one instance per concurrent parse.
///
/// ```
/// use typedxml::XmlParser;
///
/// let mut parser = XmlParser::new(());
/// let env = parser.parse(r#"<a xmlns:ns="urn:x"><ns:b/></a>"#)?;
/// assert_eq!(env.resolve_namespace("urn:x")?, "ns");
/// # Ok::<(), typedxml::Error>(())
/// ```
pub struct XmlParser<H: ContentHandler> {
    handler: H,
    parser: SaxParser,
    buffer_size: usize,
}

impl<H: ContentHandler> XmlParser<H> {
    pub fn new(handler: H) -> XmlParser<H> {
        XmlParser {
            handler,
            parser: SaxParser::new(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Sets the size of the blocks read from [InputSource::Stream] inputs.
    pub fn with_buffer_size(mut self, size: usize) -> XmlParser<H> {
        self.buffer_size = size.max(1);
        self
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Location of the last consumed byte of the last parse.
    pub fn location(&self) -> Location {
        self.parser.location()
    }

    /// Parses a whole document.
    ///
    /// On malformed input an [Error::Parse] with the location of the
    /// offending byte is returned, and any error returned by a handler
    /// hook is passed through.
    pub fn parse<'a>(
        &mut self,
        source: impl Into<InputSource<'a>>,
    ) -> Result<ParseEnvironment<H::State>, Error> {
        self.parser.reset();
        let mut dispatcher = Dispatcher::new(&mut self.handler);
        dispatcher
            .handler
            .set_document_locator(&mut dispatcher.env, Location::new())?;
        dispatcher.handler.start_document(&mut dispatcher.env)?;

        let result = match source.into() {
            InputSource::Text(text) => self
                .parser
                .parse_bytes_finish(&mut dispatcher, text.as_bytes())
                .map_err(Failure::Sax),
            InputSource::Bytes(bytes) => self
                .parser
                .parse_bytes_finish(&mut dispatcher, bytes)
                .map_err(Failure::Sax),
            InputSource::Stream(reader) => {
                read_stream(&mut self.parser, &mut dispatcher, reader, self.buffer_size)
            }
        };
        match result {
            Ok(()) => (),
            Err(Failure::Io(err)) => return Err(Error::Io(err)),
            Err(Failure::Sax(err)) => {
                let location = self.parser.location();
                return Err(match err {
                    SaxError::NoMemory => Error::NoMemory,
                    SaxError::BadXml(description) => Error::Parse {
                        description,
                        location,
                    },
                    SaxError::HandlerAbort => match dispatcher.error.take() {
                        Some(Error::Parse { description, .. }) => Error::Parse {
                            description,
                            location,
                        },
                        Some(err) => err,
                        None => Error::Structure("handler aborted the parse"),
                    },
                });
            }
        }

        dispatcher.handler.end_document(&mut dispatcher.env)?;
        Ok(dispatcher.env)
    }
}

fn read_stream<H: ContentHandler>(
    parser: &mut SaxParser,
    dispatcher: &mut Dispatcher<'_, H>,
    reader: &mut dyn std::io::Read,
    buffer_size: usize,
) -> Result<(), Failure> {
    let mut buffer = vec![0u8; buffer_size];
    loop {
        let len = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(len) => len,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(Failure::Io(err)),
        };
        parser
            .parse_bytes(dispatcher, &buffer[..len])
            .map_err(Failure::Sax)?;
    }
    parser.parse_finish().map_err(Failure::Sax)
}
