//! Element event stream over a mixer XML document.
//!
//! [`TagEvents`] turns a buffered byte source into a lazy sequence of
//! element start and end events. Attributes are delivered as an ordered list
//! of name/value pairs. Text, comments and declarations are skipped.
//!
//! Beyond what the XML reader checks itself, the stream rejects documents
//! without a root element, elements left open at end of input, input cut off
//! inside a tag, undefined entities in text, names that are empty or not
//! UTF-8, and anything other than whitespace after the root element.

use std::io::{self, BufRead, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ConfigurationFault;

/// One element event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent {
    /// An opening or self-closing tag
    Start {
        /// Element name
        name: String,
        /// Attributes in document order
        attributes: Vec<(String, String)>,
    },
    /// A closing tag; self-closing tags produce one right after their `Start`
    End {
        /// Element name
        name: String,
    },
}

/// Records the last non-whitespace byte the XML reader consumed.
///
/// Every well-formed document ends in `>`: only whitespace, comments and
/// processing instructions may follow the root element.
struct LastByte<R> {
    inner: R,
    last: Option<u8>,
}

impl<R: BufRead> Read for LastByte<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<R: BufRead> BufRead for LastByte<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        // The bytes being consumed are still buffered, so this never reads.
        if amt > 0 {
            if let Ok(buf) = self.inner.fill_buf() {
                let consumed = &buf[..amt.min(buf.len())];
                if let Some(&b) = consumed.iter().rev().find(|b| !b.is_ascii_whitespace()) {
                    self.last = Some(b);
                }
            }
        }
        self.inner.consume(amt);
    }
}

/// Lazy iterator of [`TagEvent`]s.
///
/// The first error ends the stream.
pub struct TagEvents<R> {
    reader: Reader<LastByte<R>>,
    buf: Vec<u8>,
    depth: usize,
    seen_root: bool,
    pending_end: Option<String>,
    finished: bool,
}

impl<R: BufRead> TagEvents<R> {
    /// Create an event stream reading from `source`.
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(LastByte {
            inner: source,
            last: None,
        });
        reader.trim_text(true);

        Self {
            reader,
            buf: Vec::new(),
            depth: 0,
            seen_root: false,
            pending_end: None,
            finished: false,
        }
    }

    /// Byte offset of the reader in the input.
    pub fn position(&self) -> usize {
        self.reader.buffer_position()
    }

    /// The underlying byte source.
    pub fn get_ref(&self) -> &R {
        &self.reader.get_ref().inner
    }

    fn syntax(&self, message: impl Into<String>) -> ConfigurationFault {
        ConfigurationFault::Syntax {
            position: self.position(),
            message: message.into(),
        }
    }
}

impl<R: BufRead> Iterator for TagEvents<R> {
    type Item = Result<TagEvent, ConfigurationFault>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(name) = self.pending_end.take() {
            return Some(Ok(TagEvent::End { name }));
        }
        if self.finished {
            return None;
        }

        loop {
            self.buf.clear();
            let outcome = match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) => open_element(&e, self.depth, self.seen_root).map(|event| {
                    self.depth += 1;
                    Some(event)
                }),
                Ok(Event::Empty(e)) => open_element(&e, self.depth, self.seen_root).map(|event| {
                    if let TagEvent::Start { name, .. } = &event {
                        self.pending_end = Some(name.clone());
                    }
                    Some(event)
                }),
                Ok(Event::End(e)) => element_name(e.name().as_ref()).and_then(|name| {
                    match self.depth.checked_sub(1) {
                        Some(depth) => {
                            self.depth = depth;
                            Ok(Some(TagEvent::End { name }))
                        }
                        None => Err(format!("unexpected closing tag </{name}>")),
                    }
                }),
                Ok(Event::Text(text)) if self.depth == 0 && !text.is_empty() => {
                    Err("text outside the document element".to_string())
                }
                Ok(Event::Text(text)) => text
                    .unescape()
                    .map(|_| None)
                    .map_err(|e| format!("bad text content: {e}")),
                Ok(Event::CData(_)) if self.depth == 0 => {
                    Err("CDATA outside the document element".to_string())
                }
                Ok(Event::Eof) => {
                    self.finished = true;
                    if self.depth > 0 {
                        Err(format!("{} element(s) left open at end of input", self.depth))
                    } else if !self.seen_root {
                        Err("no element found".to_string())
                    } else if self.reader.get_ref().last != Some(b'>') {
                        Err("unclosed token at end of input".to_string())
                    } else {
                        return None;
                    }
                }
                Ok(_) => Ok(None),
                Err(quick_xml::Error::Io(e)) => {
                    self.finished = true;
                    return Some(Err(ConfigurationFault::Io(e)));
                }
                Err(e) => Err(e.to_string()),
            };

            match outcome {
                Ok(Some(event)) => {
                    self.seen_root = true;
                    return Some(Ok(event));
                }
                Ok(None) => continue,
                Err(message) => {
                    self.finished = true;
                    self.pending_end = None;
                    return Some(Err(self.syntax(message)));
                }
            }
        }
    }
}

fn element_name(raw: &[u8]) -> Result<String, String> {
    match std::str::from_utf8(raw) {
        Ok("") => Err("empty element name".to_string()),
        Ok(name) => Ok(name.to_string()),
        Err(_) => Err("invalid element name: not UTF-8".to_string()),
    }
}

fn open_element(start: &BytesStart<'_>, depth: usize, seen_root: bool) -> Result<TagEvent, String> {
    let name = element_name(start.name().as_ref())?;
    if depth == 0 && seen_root {
        return Err(format!("junk after document element: <{name}>"));
    }

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| format!("bad attribute in <{name}>: {e}"))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|_| format!("invalid attribute name in <{name}>: not UTF-8"))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| format!("bad value for {key} in <{name}>: {e}"))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(TagEvent::Start { name, attributes })
}
