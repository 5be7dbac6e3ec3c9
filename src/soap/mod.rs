//! SOAP plumbing shared by the lookup clients: envelope writing and
//! namespace-tolerant name handling.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

pub(crate) type SoapResult<T> = Result<T, std::io::Error>;

/// Event-based writer for the fixed envelopes the providers accept.
///
/// Element names are written verbatim, prefixes included; text content is
/// escaped by the underlying writer, so credentials and user input cannot
/// break the document.
pub(crate) struct EnvelopeWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl EnvelopeWriter {
    pub fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        }
    }

    pub fn into_string(self) -> SoapResult<String> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(std::io::Error::other)
    }

    pub fn start_element(&mut self, name: &str) -> SoapResult<&mut Self> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> SoapResult<&mut Self> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer.write_event(Event::Start(elem))?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> SoapResult<&mut Self> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(self)
    }

    pub fn empty_element(&mut self, name: &str) -> SoapResult<&mut Self> {
        self.writer.write_event(Event::Empty(BytesStart::new(name)))?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> SoapResult<&mut Self> {
        self.start_element(name)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.end_element(name)
    }
}

/// Local part of a possibly prefixed XML name (`ns:basic_rec` → `basic_rec`).
pub(crate) fn local_name(raw: &[u8]) -> String {
    let name = String::from_utf8_lossy(raw);
    name.rsplit(':').next().unwrap_or_default().to_string()
}
