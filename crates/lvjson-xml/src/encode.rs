//! XML → Tree Model encoding.
//!
//! The encoder walks quick-xml events and keeps one [`Frame`] per open
//! element. A frame is turned into an object when its end tag (or the
//! self-closing tag) is read and attached to its parent, collapsing repeated
//! sibling names into arrays in document order.

use std::fmt;

use lvjson_tree::{ATTRIBUTE_PREFIX, Map, TEXT_KEY, Tree};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::XmlError;

/// Handling of whitespace-only text content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Whitespace {
    /// Keep every text run exactly as read.
    #[default]
    Preserve,
    /// Drop text content that consists only of whitespace.
    Omit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    pub whitespace: Whitespace,
}

/// Encoding state for one open element.
struct Frame {
    name: String,
    attributes: Vec<(String, Tree)>,
    text: String,
    children: Map,
}

impl Frame {
    fn into_node(self, whitespace: Whitespace) -> Tree {
        let mut obj = Map::with_capacity(self.attributes.len() + self.children.len() + 1);
        for (key, value) in self.attributes {
            obj.insert(key, value);
        }

        let keep_text = match whitespace {
            Whitespace::Preserve => !self.text.is_empty(),
            Whitespace::Omit => !self.text.trim().is_empty(),
        };
        if keep_text {
            obj.insert(TEXT_KEY.to_string(), Tree::String(self.text));
        }

        for (key, value) in self.children {
            obj.insert(key, value);
        }
        Tree::Object(obj)
    }

    fn add_child(&mut self, name: String, node: Tree) {
        match self.children.get_mut(&name) {
            None => {
                self.children.insert(name, node);
            }
            Some(Tree::Array(items)) => items.push(node),
            Some(existing) => {
                // First repeat: promote the single sibling into an array.
                let first = existing.take();
                *existing = Tree::Array(vec![first, node]);
            }
        }
    }
}

/// Encode an XML document into a Tree Model.
///
/// The result is an object with a single key, the root element's tag name.
///
/// # Errors
///
/// - [`XmlError::Parse`] when the document is malformed or has no (or more
///   than one) root element
/// - [`XmlError::SchemaMismatch`] when `expected_root` is given and differs
///   from the root tag name
pub fn encode(
    xml: &str,
    expected_root: Option<&str>,
    opts: EncodeOptions,
) -> Result<Tree, XmlError> {
    Encoder {
        reader: Reader::from_str(xml),
        src: xml,
        expected_root,
        opts,
        stack: Vec::new(),
        root: None,
    }
    .run()
}

struct Encoder<'a> {
    reader: Reader<&'a [u8]>,
    src: &'a str,
    expected_root: Option<&'a str>,
    opts: EncodeOptions,
    stack: Vec<Frame>,
    root: Option<(String, Tree)>,
}

impl<'a> Encoder<'a> {
    fn run(mut self) -> Result<Tree, XmlError> {
        loop {
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(e) => return Err(self.reader_error(e)),
            };

            match event {
                Event::Start(e) => {
                    let frame = self.open(&e)?;
                    self.stack.push(frame);
                }
                Event::Empty(e) => {
                    let frame = self.open(&e)?;
                    self.close(frame);
                }
                Event::End(_) => {
                    // quick-xml checks that end names match their start tags.
                    let frame = self
                        .stack
                        .pop()
                        .ok_or_else(|| self.fail("unexpected end tag"))?;
                    self.close(frame);
                }
                Event::Text(t) => {
                    if self.stack.is_empty() {
                        continue;
                    }
                    let decoded = t.decode().map_err(|e| self.fail(e))?;
                    let unescaped =
                        quick_xml::escape::unescape(&decoded).map_err(|e| self.fail(e))?;
                    self.push_text(&unescaped);
                }
                Event::CData(c) => {
                    let raw: &[u8] = &c;
                    let text = std::str::from_utf8(raw).map_err(|e| self.fail(e))?;
                    let text = text.to_string();
                    self.push_text(&text);
                }
                Event::GeneralRef(r) => {
                    if self.stack.is_empty() {
                        continue;
                    }
                    let resolved = if r.is_char_ref() {
                        match r.resolve_char_ref().map_err(|e| self.fail(e))? {
                            Some(ch) => ch.to_string(),
                            None => return Err(self.fail("invalid character reference")),
                        }
                    } else {
                        let name = r.decode().map_err(|e| self.fail(e))?;
                        match quick_xml::escape::resolve_predefined_entity(&name) {
                            Some(s) => s.to_string(),
                            None => {
                                return Err(self.fail(format!("unknown entity '&{name};'")));
                            }
                        }
                    };
                    self.push_text(&resolved);
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions, DOCTYPE.
                _ => {}
            }
        }

        if let Some(open) = self.stack.last() {
            return Err(self.fail(format!(
                "unexpected end of document inside <{}>",
                open.name
            )));
        }

        let (name, node) = self
            .root
            .take()
            .ok_or_else(|| self.fail("document has no root element"))?;

        tracing::debug!(root = %name, "encoded XML document");

        let mut top = Map::with_capacity(1);
        top.insert(name, node);
        Ok(Tree::Object(top))
    }

    /// Build a frame from a start (or self-closing) tag.
    fn open(&self, e: &BytesStart<'_>) -> Result<Frame, XmlError> {
        let name = std::str::from_utf8(e.name().as_ref())
            .map_err(|err| self.fail(err))?
            .to_string();

        if self.stack.is_empty() {
            if self.root.is_some() {
                return Err(self.fail(format!(
                    "second root element <{name}> after the document element"
                )));
            }
            if let Some(expected) = self.expected_root {
                if name != expected {
                    return Err(XmlError::SchemaMismatch {
                        expected: expected.to_string(),
                        found: name,
                    });
                }
            }
        }

        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| self.fail(err))?;
            let key = std::str::from_utf8(attr.key.as_ref()).map_err(|err| self.fail(err))?;
            let raw = std::str::from_utf8(&attr.value).map_err(|err| self.fail(err))?;
            let value = quick_xml::escape::unescape(raw).map_err(|err| self.fail(err))?;
            attributes.push((
                format!("{ATTRIBUTE_PREFIX}{key}"),
                Tree::String(value.into_owned()),
            ));
        }

        Ok(Frame {
            name,
            attributes,
            text: String::new(),
            children: Map::new(),
        })
    }

    fn close(&mut self, frame: Frame) {
        let name = frame.name.clone();
        let node = frame.into_node(self.opts.whitespace);
        match self.stack.last_mut() {
            Some(parent) => parent.add_child(name, node),
            None => self.root = Some((name, node)),
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(frame) = self.stack.last_mut() {
            frame.text.push_str(text);
        }
    }

    /// Error at the reader's current position.
    fn fail(&self, message: impl fmt::Display) -> XmlError {
        self.fail_at(self.reader.buffer_position(), message)
    }

    /// Error raised by the reader itself, positioned where it says the
    /// problem starts.
    fn reader_error(&self, e: quick_xml::Error) -> XmlError {
        self.fail_at(self.reader.error_position(), e)
    }

    fn fail_at(&self, position: u64, message: impl fmt::Display) -> XmlError {
        let offset = usize::try_from(position)
            .unwrap_or(usize::MAX)
            .min(self.src.len());
        let line = self.src.as_bytes()[..offset]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1;
        XmlError::Parse {
            position: offset as u64,
            line,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn enc(xml: &str) -> Tree {
        encode(xml, None, EncodeOptions::default()).unwrap()
    }

    #[test]
    fn attributes_come_before_text() {
        assert_eq!(
            enc(r#"<e a="1" b="2">txt</e>"#),
            json!({"e": {"@a": "1", "@b": "2", "__text": "txt"}})
        );
    }

    #[test]
    fn repeated_siblings_collapse_into_array() {
        assert_eq!(
            enc("<r><i>1</i><i>2</i></r>"),
            json!({"r": {"i": [{"__text": "1"}, {"__text": "2"}]}})
        );
        assert_eq!(
            enc("<r><i>1</i><j/><i>2</i><i>3</i></r>"),
            json!({"r": {"i": [{"__text": "1"}, {"__text": "2"}, {"__text": "3"}], "j": {}}})
        );
    }

    #[test]
    fn empty_elements_encode_to_empty_objects() {
        assert_eq!(enc("<r><a/><b></b></r>"), json!({"r": {"a": {}, "b": {}}}));
    }

    #[test]
    fn entities_and_cdata_are_resolved() {
        assert_eq!(
            enc(r#"<r n="a &amp; &quot;b&quot;">x &lt; y &#65;<![CDATA[<raw>]]></r>"#),
            json!({"r": {"@n": "a & \"b\"", "__text": "x < y A<raw>"}})
        );
    }

    #[test]
    fn whitespace_is_preserved_unless_omitted() {
        let xml = "<r>\n  <a> x </a>\n</r>";
        assert_eq!(
            enc(xml),
            json!({"r": {"__text": "\n  \n", "a": {"__text": " x "}}})
        );

        let opts = EncodeOptions { whitespace: Whitespace::Omit };
        assert_eq!(
            encode(xml, None, opts).unwrap(),
            json!({"r": {"a": {"__text": " x "}}})
        );
    }

    #[test]
    fn prolog_and_comments_are_skipped() {
        let xml = "<?xml version='1.0' encoding='UTF-8'?>\n<!-- c -->\n<Project Type=\"Project\"><!-- inner --></Project>\n";
        assert_eq!(
            encode(xml, Some("Project"), EncodeOptions { whitespace: Whitespace::Omit }).unwrap(),
            json!({"Project": {"@Type": "Project"}})
        );
    }

    #[test]
    fn root_mismatch_is_reported() {
        let err = encode("<Foo/>", Some("Package"), EncodeOptions::default()).unwrap_err();
        match err {
            XmlError::SchemaMismatch { expected, found } => {
                assert_eq!(expected, "Package");
                assert_eq!(found, "Foo");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_documents_fail_with_position() {
        let err = encode("<r>\n<a></b>\n</r>", None, EncodeOptions::default()).unwrap_err();
        match err {
            XmlError::Parse { position, line, .. } => {
                assert_eq!(line, 2);
                // Points into the offending `</b>`, not past it.
                assert!((7..11).contains(&position), "position {position}");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(
            encode("<r><a></a>", None, EncodeOptions::default()),
            Err(XmlError::Parse { .. })
        ));
        assert!(matches!(
            encode("", None, EncodeOptions::default()),
            Err(XmlError::Parse { .. })
        ));
        assert!(matches!(
            encode("<a/><b/>", None, EncodeOptions::default()),
            Err(XmlError::Parse { .. })
        ));
        assert!(matches!(
            encode("<a>&bogus;</a>", None, EncodeOptions::default()),
            Err(XmlError::Parse { .. })
        ));
    }
}
