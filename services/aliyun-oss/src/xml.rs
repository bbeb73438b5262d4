//! Response payload parsing.
//!
//! OSS answers with XML documents. They are turned into a [`serde_json::Value`]
//! tree with the following shape:
//!
//! - the document is an object with a single key, the root element's name
//! - every child element is collected into an array under its name, even if it
//!   appears only once
//! - an element without children or attributes becomes its text, `""` when empty
//! - attributes live under `"$"`, text next to children or attributes under `"_"`

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

const ATTR_KEY: &str = "$";
const TEXT_KEY: &str = "_";

/// Parse an XML payload.
///
/// Returns `None` for empty or malformed input.
pub fn parse(input: &[u8]) -> Option<Value> {
    if input.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    match parse_document(input) {
        Ok(v) => v,
        Err(err) => {
            debug!("response payload is not valid xml: {err}");
            None
        }
    }
}

#[derive(Default)]
struct Node {
    name: String,
    attrs: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Node {
    fn start(e: &BytesStart) -> quick_xml::Result<Self> {
        let mut node = Node {
            name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            ..Default::default()
        };
        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            node.attrs.insert(key, Value::String(value));
        }
        Ok(node)
    }

    fn push_child(&mut self, name: String, value: Value) {
        let slot = self
            .children
            .entry(name)
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = slot {
            items.push(value);
        }
    }

    fn finish(self) -> (String, Value) {
        let text = (!self.text.trim().is_empty()).then_some(self.text);
        if self.attrs.is_empty() && self.children.is_empty() {
            return (self.name, Value::String(text.unwrap_or_default()));
        }

        let mut obj = Map::new();
        if !self.attrs.is_empty() {
            obj.insert(ATTR_KEY.to_string(), Value::Object(self.attrs));
        }
        if let Some(text) = text {
            obj.insert(TEXT_KEY.to_string(), Value::String(text));
        }
        obj.extend(self.children);
        (self.name, Value::Object(obj))
    }
}

fn parse_document(input: &[u8]) -> quick_xml::Result<Option<Value>> {
    let mut reader = Reader::from_reader(input);
    let mut stack: Vec<Node> = Vec::new();

    loop {
        let finished = match reader.read_event()? {
            Event::Start(e) => {
                stack.push(Node::start(&e)?);
                None
            }
            Event::Empty(e) => Some(Node::start(&e)?.finish()),
            Event::End(_) => stack.pop().map(Node::finish),
            Event::Text(e) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&e.unescape()?);
                }
                None
            }
            Event::CData(e) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&e));
                }
                None
            }
            Event::Eof => return Ok(None),
            _ => None,
        };

        if let Some((name, value)) = finished {
            match stack.last_mut() {
                Some(parent) => parent.push_child(name, value),
                None => {
                    let mut root = Map::new();
                    root.insert(name, value);
                    return Ok(Some(Value::Object(root)));
                }
            }
        }
    }
}
