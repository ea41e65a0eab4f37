//! Tree Model → XML decoding.
//!
//! Layout rules (existing tooling diffs these files byte for byte):
//! - no XML declaration, UTF-8 without BOM
//! - an element without child elements is written on a single line
//! - each child element goes on its own line, indented two spaces deeper
//! - CRLF line endings, including newlines inside text content
//! - self-closing elements are written as `<name/>`
//! - an element with both text and child elements is written on one line,
//!   with everything below it; whitespace-only text next to child elements
//!   is dropped in favour of the layout

use lvjson_tree::{TEXT_KEY, Tree, attribute_name, kind_of, root_element, scalar_text};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::XmlError;

const INDENT: &[u8] = b"  ";
const NEWLINE: &[u8] = b"\r\n";

/// Decode a Tree Model into an XML document string.
///
/// The tree must be an object with exactly one key, the root element name.
///
/// # Errors
///
/// - [`XmlError::Structure`] when the top level does not hold exactly one
///   root element
/// - [`XmlError::SchemaMismatch`] when `expected_root` is given and differs
/// - [`XmlError::UnsupportedNode`] for values that have no XML rendering
/// - [`XmlError::InvalidName`] for keys that are not valid XML names
pub fn decode(tree: &Tree, expected_root: Option<&str>) -> Result<String, XmlError> {
    let (name, node) = root_element(tree).map_err(|e| XmlError::Structure(e.to_string()))?;
    check_name(name, name)?;

    if let Some(expected) = expected_root {
        if name != expected {
            return Err(XmlError::SchemaMismatch {
                expected: expected.to_string(),
                found: name.to_string(),
            });
        }
    }
    if let Tree::Array(items) = node {
        return Err(XmlError::Structure(format!(
            "root element '{name}' holds an array of {} elements; a document has a single root",
            items.len()
        )));
    }

    let mut buf = Vec::with_capacity(1024);
    let mut writer = Writer::new(&mut buf);
    write_element(&mut writer, name, node, 0, name, false)?;

    let xml = String::from_utf8(buf)
        .map_err(|e| XmlError::Structure(format!("decoded XML is not UTF-8: {e}")))?;

    tracing::debug!(root = %name, bytes = xml.len(), "decoded tree to XML");

    // Writers that put a space before `/>` are normalized to `<name/>`.
    Ok(xml.replace(" />", "/>"))
}

/// Parts of an element gathered from its object encoding.
struct Element<'t> {
    attributes: Vec<(&'t str, String)>,
    text: Option<String>,
    children: Vec<(&'t str, &'t Tree, String)>,
}

fn collect<'t>(node: &'t Tree, path: &str) -> Result<Element<'t>, XmlError> {
    let mut element = Element {
        attributes: Vec::new(),
        text: None,
        children: Vec::new(),
    };

    let obj = match node {
        Tree::Object(obj) => obj,
        Tree::Array(_) => {
            return Err(XmlError::UnsupportedNode {
                path: path.to_string(),
                kind: kind_of(node),
            });
        }
        // A scalar stands for an element holding only text.
        scalar => {
            element.text = scalar_text(scalar).filter(|s| !s.is_empty());
            return Ok(element);
        }
    };

    for (key, value) in obj {
        let child_path = format!("{path}.{key}");
        if let Some(attr) = attribute_name(key) {
            check_name(attr, &child_path)?;
            let text = scalar_text(value).ok_or_else(|| XmlError::UnsupportedNode {
                path: child_path.clone(),
                kind: kind_of(value),
            })?;
            element.attributes.push((attr, text));
        } else if key == TEXT_KEY {
            let text = scalar_text(value).ok_or_else(|| XmlError::UnsupportedNode {
                path: child_path.clone(),
                kind: kind_of(value),
            })?;
            if !text.is_empty() {
                element.text = Some(text);
            }
        } else if let Tree::Array(items) = value {
            check_name(key, &child_path)?;
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{child_path}[{i}]");
                if let Tree::Array(_) = item {
                    return Err(XmlError::UnsupportedNode {
                        path: item_path,
                        kind: kind_of(item),
                    });
                }
                element.children.push((key.as_str(), item, item_path));
            }
        } else {
            check_name(key, &child_path)?;
            element.children.push((key.as_str(), value, child_path));
        }
    }

    Ok(element)
}

/// Element and attribute names must be XML `Name`s: no whitespace or markup
/// characters, and not starting with a digit, `-` or `.`.
fn check_name(name: &str, path: &str) -> Result<(), XmlError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_alphabetic() || first == '_' || first == ':')
                && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(XmlError::InvalidName {
            path: path.to_string(),
            name: name.to_string(),
        })
    }
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    node: &Tree,
    depth: usize,
    path: &str,
    inline: bool,
) -> Result<(), XmlError> {
    let element = collect(node, path)?;

    let mut start = BytesStart::new(name);
    for (attr, value) in &element.attributes {
        start.push_attribute((*attr, value.as_str()));
    }

    if element.children.is_empty() {
        match element.text {
            Some(text) => {
                writer.write_event(Event::Start(start))?;
                writer.write_event(Event::Text(BytesText::new(&crlf(&text))))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            None => writer.write_event(Event::Empty(start))?,
        }
        return Ok(());
    }

    // Whitespace-only text beside child elements is the layout itself.
    let text = element.text.filter(|t| !t.trim().is_empty());
    // Mixed content is written without layout below this element.
    let inline = inline || text.is_some();

    writer.write_event(Event::Start(start))?;
    if let Some(text) = text {
        writer.write_event(Event::Text(BytesText::new(&crlf(&text))))?;
    }
    for (child_name, child, child_path) in &element.children {
        if !inline {
            line_break(writer, depth + 1)?;
        }
        write_element(writer, child_name, child, depth + 1, child_path, inline)?;
    }
    if !inline {
        line_break(writer, depth)?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn line_break<W: std::io::Write>(writer: &mut Writer<W>, depth: usize) -> std::io::Result<()> {
    let out = writer.get_mut();
    out.write_all(NEWLINE)?;
    for _ in 0..depth {
        out.write_all(INDENT)?;
    }
    Ok(())
}

/// Normalize embedded line endings in text content to CRLF.
fn crlf(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\r\n")
}
