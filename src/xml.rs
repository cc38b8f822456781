//! The XML codec: a hand-written parser and emitter for well-formed XML.
//!
//! Elements map to nodes and element text maps to the node value.
//! Attributes use the `<xmlattr>` pseudo-node convention: they decode into
//! a first child keyed `<xmlattr>` whose children are `name`→`value`
//! leaves, and such a child encodes back into attributes. The pseudo-key
//! contains `<`, so it can never collide with a real element name.
//!
//! ```text
//! <server enabled="yes">          server
//!   <host>localhost</host>   ≡    ├── <xmlattr> ── enabled "yes"
//! </server>                       └── host "localhost"
//! ```
//!
//! Text handling: surrounding whitespace in element text is not
//! significant. A leaf's text is trimmed and becomes its value; `<a/>`
//! decodes to a valueless node while `<a></a>` decodes to an empty-string
//! value, and both shapes encode back the same way. In mixed content the
//! text segments are concatenated and trimmed as a whole.
//!
//! The parser handles declarations, processing instructions, comments,
//! `DOCTYPE`, CDATA sections, and the predefined and numeric character
//! entities. Namespaces are not interpreted; prefixed names pass through
//! as plain strings.

use crate::{Error, Format, Node, Result, Tree};

/// Key of the pseudo-node holding an element's attributes.
pub const ATTR_KEY: &str = "<xmlattr>";

const INDENT: usize = 2;

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.input[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.input[self.pos..].starts_with(prefix)
    }

    fn consume(&mut self, literal: &str) {
        for _ in literal.chars() {
            self.next_char();
        }
    }

    fn err(&self, msg: impl Into<String>) -> Error {
        Error::parse(Format::Xml, self.line, self.col, msg)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek_char(), Some(ch) if ch.is_whitespace()) {
            self.next_char();
        }
    }

    /// Skips to just past `marker`, failing if the input ends first.
    fn skip_until(&mut self, marker: &str, what: &str) -> Result<()> {
        while !self.starts_with(marker) {
            if self.next_char().is_none() {
                return Err(self.err(format!("unterminated {what}")));
            }
        }
        self.consume(marker);
        Ok(())
    }

    /// Reads to just before `marker`, returning the raw text in between.
    fn take_until(&mut self, marker: &str, what: &str) -> Result<String> {
        let start = self.pos;
        while !self.starts_with(marker) {
            if self.next_char().is_none() {
                return Err(self.err(format!("unterminated {what}")));
            }
        }
        let text = self.input[start..self.pos].to_string();
        self.consume(marker);
        Ok(text)
    }

    /// Skips whitespace, comments, processing instructions, and `DOCTYPE`
    /// between markup that matters.
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.skip_ws();
            if self.starts_with("<!--") {
                self.consume("<!--");
                self.skip_until("-->", "comment")?;
            } else if self.starts_with("<?") {
                self.consume("<?");
                self.skip_until("?>", "processing instruction")?;
            } else if self.starts_with("<!DOCTYPE") {
                self.consume("<!DOCTYPE");
                self.skip_until(">", "DOCTYPE declaration")?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.pos;
        match self.peek_char() {
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                self.next_char();
            }
            _ => return Err(self.err("expected a name")),
        }
        while matches!(
            self.peek_char(),
            Some(ch) if ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':')
        ) {
            self.next_char();
        }
        Ok(self.input[start..self.pos].to_string())
    }

    /// Decodes one `&...;` entity reference at the current position.
    fn parse_entity(&mut self) -> Result<char> {
        self.next_char(); // `&`
        let start = self.pos;
        loop {
            match self.peek_char() {
                Some(';') => break,
                Some(_) if self.pos - start < 10 => {
                    self.next_char();
                }
                _ => return Err(self.err("unterminated entity reference")),
            }
        }
        let name = &self.input[start..self.pos];
        let ch = match name {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = name.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = name.strip_prefix('#') {
                    dec.parse::<u32>().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32)
                    .ok_or_else(|| self.err(format!("unknown entity `&{name};`")))?
            }
        };
        self.next_char(); // `;`
        Ok(ch)
    }

    /// Reads character data up to the next `<`, decoding entities.
    fn parse_text(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.peek_char() {
                None | Some('<') => return Ok(text),
                Some('&') => text.push(self.parse_entity()?),
                Some(ch) => {
                    text.push(ch);
                    self.next_char();
                }
            }
        }
    }

    fn parse_attr_value(&mut self) -> Result<String> {
        let quote = match self.peek_char() {
            Some(q @ ('"' | '\'')) => {
                self.next_char();
                q
            }
            _ => return Err(self.err("expected quoted attribute value")),
        };
        let mut value = String::new();
        loop {
            match self.peek_char() {
                Some(ch) if ch == quote => {
                    self.next_char();
                    return Ok(value);
                }
                Some('&') => value.push(self.parse_entity()?),
                Some(ch) => {
                    value.push(ch);
                    self.next_char();
                }
                None => return Err(self.err("unterminated attribute value")),
            }
        }
    }

    fn parse_element(&mut self) -> Result<Node> {
        if self.peek_char() != Some('<') {
            return Err(self.err("expected `<`"));
        }
        self.next_char();
        let name = self.parse_name()?;
        let mut node = Node::new(&name);
        let mut attrs = Node::new(ATTR_KEY);

        // start tag: attributes until `>` or `/>`
        let self_closing = loop {
            self.skip_ws();
            match self.peek_char() {
                Some('/') => {
                    self.next_char();
                    if self.peek_char() != Some('>') {
                        return Err(self.err("expected `>` after `/`"));
                    }
                    self.next_char();
                    break true;
                }
                Some('>') => {
                    self.next_char();
                    break false;
                }
                Some(_) => {
                    let attr_name = self.parse_name()?;
                    if attrs.get(&attr_name).is_some() {
                        return Err(self.err(format!("duplicate attribute `{attr_name}`")));
                    }
                    self.skip_ws();
                    if self.peek_char() != Some('=') {
                        return Err(self.err(format!("expected `=` after attribute `{attr_name}`")));
                    }
                    self.next_char();
                    self.skip_ws();
                    let value = self.parse_attr_value()?;
                    attrs.push(Node::new(attr_name).with_value(value));
                }
                None => return Err(self.err(format!("unexpected end of input in `<{name}>`"))),
            }
        };
        if !attrs.is_leaf() {
            node.push(attrs);
        }
        if self_closing {
            return Ok(node);
        }

        // content until the matching close tag
        let mut text = String::new();
        let mut had_markup_text = false; // CDATA forces an empty-string value over None
        loop {
            if self.at_end() {
                return Err(self.err(format!("unexpected end of input, expected `</{name}>`")));
            }
            if self.starts_with("</") {
                self.consume("</");
                let close = self.parse_name()?;
                self.skip_ws();
                if self.peek_char() != Some('>') {
                    return Err(self.err("expected `>` in closing tag"));
                }
                self.next_char();
                if close != name {
                    return Err(self.err(format!(
                        "mismatched closing tag: expected `</{name}>`, found `</{close}>`"
                    )));
                }
                break;
            } else if self.starts_with("<!--") {
                self.consume("<!--");
                self.skip_until("-->", "comment")?;
            } else if self.starts_with("<![CDATA[") {
                self.consume("<![CDATA[");
                text.push_str(&self.take_until("]]>", "CDATA section")?);
                had_markup_text = true;
            } else if self.starts_with("<?") {
                self.consume("<?");
                self.skip_until("?>", "processing instruction")?;
            } else if self.starts_with("<") {
                node.push(self.parse_element()?);
            } else {
                text.push_str(&self.parse_text()?);
            }
        }

        let trimmed = text.trim();
        let has_elements = node.children().iter().any(|c| c.key() != ATTR_KEY);
        if !trimmed.is_empty() {
            node.set_value(Some(trimmed.to_string()));
        } else if !has_elements {
            // `<a></a>` keeps an empty value; `<a/>` stays valueless.
            node.set_value(Some(String::new()));
        } else if had_markup_text {
            node.set_value(Some(String::new()));
        }
        Ok(node)
    }
}

pub(crate) fn decode(input: &str) -> Result<Tree> {
    let mut parser = Parser::new(input);
    parser.skip_misc()?;
    if parser.at_end() {
        return Err(parser.err("missing document element"));
    }
    let root = parser.parse_element()?;
    parser.skip_misc()?;
    if !parser.at_end() {
        return Err(parser.err("content after document element"));
    }
    Ok(Tree::from(vec![root]))
}

pub(crate) fn encode(tree: &Tree) -> Result<String> {
    let root = match tree.children() {
        [] => {
            return Err(Error::structural(
                Format::Xml,
                "empty tree has no document element",
            ))
        }
        [root] => root,
        _ => {
            return Err(Error::structural(
                Format::Xml,
                "an XML document must have exactly one root element",
            ))
        }
    };
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    write_element(&mut out, root, 0)?;
    out.push('\n');
    Ok(out)
}

fn write_element(out: &mut String, node: &Node, depth: usize) -> Result<()> {
    check_name(node.key(), "element")?;
    let pad = " ".repeat(depth * INDENT);
    out.push_str(&pad);
    out.push('<');
    out.push_str(node.key());

    let mut elements: Vec<&Node> = Vec::new();
    let mut seen_attrs: Vec<&str> = Vec::new();
    for child in node.children() {
        if child.key() == ATTR_KEY {
            for attr in child.children() {
                check_name(attr.key(), "attribute")?;
                if !attr.is_leaf() {
                    return Err(Error::structural(
                        Format::Xml,
                        format!("attribute `{}` has children", attr.key()),
                    ));
                }
                if seen_attrs.contains(&attr.key()) {
                    return Err(Error::structural(
                        Format::Xml,
                        format!("duplicate attribute `{}`", attr.key()),
                    ));
                }
                seen_attrs.push(attr.key());
                out.push(' ');
                out.push_str(attr.key());
                out.push_str("=\"");
                escape_into(out, attr.value().unwrap_or(""), true);
                out.push('"');
            }
        } else {
            elements.push(child);
        }
    }

    if elements.is_empty() {
        match node.value() {
            None => out.push_str("/>"),
            Some(value) => {
                out.push('>');
                escape_into(out, value, false);
                out.push_str("</");
                out.push_str(node.key());
                out.push('>');
            }
        }
        return Ok(());
    }

    out.push('>');
    out.push('\n');
    if let Some(value) = node.value() {
        if !value.is_empty() {
            out.push_str(&" ".repeat((depth + 1) * INDENT));
            escape_into(out, value, false);
            out.push('\n');
        }
    }
    for element in elements {
        write_element(out, element, depth + 1)?;
        out.push('\n');
    }
    out.push_str(&pad);
    out.push_str("</");
    out.push_str(node.key());
    out.push('>');
    Ok(())
}

fn check_name(name: &str, what: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|ch| ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':'))
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::structural(
            Format::Xml,
            format!("`{name}` is not a valid XML {what} name"),
        ))
    }
}

fn escape_into(out: &mut String, text: &str, in_attribute: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
