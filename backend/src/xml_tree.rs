//! Element tree on top of quick-xml
//!
//! Only keeps what the extractor reads: element names, attributes, leading
//! text and child elements. Comments, processing instructions and the
//! doctype are not kept, but inside an element they end its leading text.
//! Names are matched as written, prefixes included; namespaces are not resolved.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlTreeError {
    #[error("XML syntax error at position {position}: {source}")]
    Syntax {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Closing tag </{found}> at position {position} does not match <{expected}>")]
    MismatchedEnd {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("Closing tag </{found}> at position {position} has no opening tag")]
    UnexpectedEnd { found: String, position: usize },

    #[error("Element <{name}> is not closed")]
    UnclosedElement { name: String },

    #[error("Document has no root element")]
    NoRootElement,

    #[error("Second root element <{name}> at position {position}")]
    MultipleRootElements { name: String, position: usize },

    #[error("Text outside of the root element at position {position}")]
    TextOutsideRoot { position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    text_closed: bool,
    children: Vec<XmlElement>,
}

impl XmlElement {
    fn new(name: String, attributes: Vec<(String, String)>) -> Self {
        Self {
            name,
            attributes,
            text: None,
            text_closed: false,
            children: Vec::new(),
        }
    }

    /// Qualified tag name as written in the document, e.g. `Label` or `xs:element`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by qualified name, e.g. `id` or `xml:lang`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Character data before the first child element, comment or processing
    /// instruction. `None` if there is none.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// First direct child with the given name.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All direct children with the given name, in document order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// This element and all its descendants with the given name, in
    /// document order. Equivalent to `descendant-or-self::name`.
    pub fn select_descendants(&self, name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        collect_named(self, name, &mut found);
        found
    }

    fn push_text(&mut self, text: &str) {
        // Text after the first child belongs to that child's tail, which nothing reads.
        if !self.text_closed {
            self.text.get_or_insert_with(String::new).push_str(text);
        }
    }

    fn close_text(&mut self) {
        self.text_closed = true;
    }
}

fn collect_named<'a>(element: &'a XmlElement, name: &str, found: &mut Vec<&'a XmlElement>) {
    if element.name == name {
        found.push(element);
    }
    for child in &element.children {
        collect_named(child, name, found);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// Parse a whole document held in memory.
    pub fn parse_str(content: &str) -> Result<Self, XmlTreeError> {
        let mut reader = Reader::from_str(content);
        reader.check_end_names(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let position = reader.buffer_position();
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(source) => {
                    return Err(XmlTreeError::Syntax {
                        position: reader.buffer_position(),
                        source,
                    });
                }
            };

            match event {
                Event::Start(ref e) => {
                    let element = element_from_start(&reader, e, position)?;
                    if stack.is_empty() && root.is_some() {
                        return Err(XmlTreeError::MultipleRootElements {
                            name: element.name,
                            position,
                        });
                    }
                    stack.push(element);
                }
                Event::Empty(ref e) => {
                    let element = element_from_start(&reader, e, position)?;
                    attach(&mut stack, &mut root, element, position)?;
                }
                Event::End(ref e) => {
                    let found = decode(&reader, e.name().as_ref(), position)?;
                    let element = stack
                        .pop()
                        .ok_or_else(|| XmlTreeError::UnexpectedEnd {
                            found: found.clone(),
                            position,
                        })?;
                    if element.name != found {
                        return Err(XmlTreeError::MismatchedEnd {
                            expected: element.name,
                            found,
                            position,
                        });
                    }
                    attach(&mut stack, &mut root, element, position)?;
                }
                Event::Text(ref e) => {
                    let text = e.unescape().map_err(|source| XmlTreeError::Syntax { position, source })?;
                    add_text(&mut stack, &text, position)?;
                }
                Event::CData(ref e) => {
                    let text = decode(&reader, e, position)?;
                    add_text(&mut stack, &text, position)?;
                }
                Event::Comment(_) | Event::PI(_) => {
                    if let Some(current) = stack.last_mut() {
                        current.close_text();
                    }
                }
                Event::Eof => break,
                // Declaration, doctype
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlTreeError::UnclosedElement { name: open.name });
        }

        root.map(|root| XmlDocument { root })
            .ok_or(XmlTreeError::NoRootElement)
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// All elements with the given name anywhere in the document (`//name`).
    pub fn select_all(&self, name: &str) -> Vec<&XmlElement> {
        self.root.select_descendants(name)
    }
}

fn decode(reader: &Reader<&[u8]>, bytes: &[u8], position: usize) -> Result<String, XmlTreeError> {
    reader
        .decoder()
        .decode(bytes)
        .map(|s| s.into_owned())
        .map_err(|source| XmlTreeError::Syntax { position, source })
}

fn element_from_start(
    reader: &Reader<&[u8]>,
    start: &BytesStart,
    position: usize,
) -> Result<XmlElement, XmlTreeError> {
    let name = decode(reader, start.name().as_ref(), position)?;

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| XmlTreeError::Syntax {
            position,
            source: quick_xml::Error::from(err),
        })?;
        let key = decode(reader, attr.key.as_ref(), position)?;
        let value = attr
            .unescape_value()
            .map_err(|source| XmlTreeError::Syntax { position, source })?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement::new(name, attributes))
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
    position: usize,
) -> Result<(), XmlTreeError> {
    if let Some(parent) = stack.last_mut() {
        parent.close_text();
        parent.children.push(element);
    } else if root.is_some() {
        return Err(XmlTreeError::MultipleRootElements {
            name: element.name,
            position,
        });
    } else {
        *root = Some(element);
    }
    Ok(())
}

fn add_text(stack: &mut [XmlElement], text: &str, position: usize) -> Result<(), XmlTreeError> {
    match stack.last_mut() {
        Some(current) => current.push_text(text),
        None if !text.trim().is_empty() => {
            return Err(XmlTreeError::TextOutsideRoot { position });
        }
        None => {}
    }
    Ok(())
}
