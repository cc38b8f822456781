//! The INFO codec: nested `key "value" { children }` blocks.
//!
//! INFO is the native grammar of the tree model and the lossless baseline
//! format: any tree can be encoded and decoded back unchanged. A document
//! is a sequence of nodes; each node is a key, an optional value on the
//! same line, and an optional brace-delimited block of child nodes:
//!
//! ```text
//! server
//! {
//!     host "localhost"
//!     port "8080"
//!     alias "a" { }
//!     alias "b" { }
//! }
//! ```
//!
//! Keys and values are quoted strings (with `\\ \" \n \r \t \0` escapes)
//! or bare words terminated by whitespace, `{`, `}`, `;`, or `"`. A `;`
//! starts a comment running to the end of the line. The opening `{` may
//! sit on the same line as the key or on the following line.

use crate::{Error, Format, Node, Result, Tree};

const INDENT: usize = 4;

#[derive(Debug)]
enum TokenKind {
    Open,
    Close,
    Word(String),
}

#[derive(Debug)]
struct Token {
    kind: TokenKind,
    line: usize,
    col: usize,
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    peeked: Option<Option<Token>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            line: 1,
            col: 1,
            peeked: None,
        }
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

    fn err(&self, msg: impl Into<String>) -> Error {
        Error::parse(Format::Info, self.line, self.col, msg)
    }

    /// Skips whitespace and `;` comments.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.next_char();
            } else if ch == ';' {
                while let Some(ch) = self.next_char() {
                    if ch == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn lex(&mut self) -> Result<Option<Token>> {
        self.skip_trivia();
        let (line, col) = (self.line, self.col);
        let Some(ch) = self.peek_char() else {
            return Ok(None);
        };
        let kind = match ch {
            '{' => {
                self.next_char();
                TokenKind::Open
            }
            '}' => {
                self.next_char();
                TokenKind::Close
            }
            '"' => TokenKind::Word(self.lex_quoted()?),
            _ => TokenKind::Word(self.lex_bare()),
        };
        Ok(Some(Token { kind, line, col }))
    }

    fn lex_quoted(&mut self) -> Result<String> {
        self.next_char(); // opening quote
        let mut text = String::new();
        loop {
            match self.next_char() {
                Some('"') => return Ok(text),
                Some('\\') => match self.next_char() {
                    Some('\\') => text.push('\\'),
                    Some('"') => text.push('"'),
                    Some('n') => text.push('\n'),
                    Some('r') => text.push('\r'),
                    Some('t') => text.push('\t'),
                    Some('0') => text.push('\0'),
                    Some(other) => {
                        return Err(self.err(format!("invalid escape sequence `\\{other}`")))
                    }
                    None => return Err(self.err("unterminated string")),
                },
                Some(other) => text.push(other),
                None => return Err(self.err("unterminated string")),
            }
        }
    }

    fn lex_bare(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() || matches!(ch, '{' | '}' | ';' | '"') {
                break;
            }
            self.next_char();
        }
        self.input[start..self.pos].to_string()
    }

    fn peek(&mut self) -> Result<Option<&Token>> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lex()?);
        }
        Ok(self.peeked.as_ref().unwrap().as_ref())
    }

    fn next(&mut self) -> Result<Option<Token>> {
        match self.peeked.take() {
            Some(tok) => Ok(tok),
            None => self.lex(),
        }
    }
}

pub(crate) fn decode(input: &str) -> Result<Tree> {
    let mut lexer = Lexer::new(input);
    let children = parse_nodes(&mut lexer)?;
    if let Some(tok) = lexer.peek()? {
        // parse_nodes only stops early on `}`
        return Err(Error::parse(Format::Info, tok.line, tok.col, "unmatched `}`"));
    }
    Ok(Tree::from(children))
}

/// Parses a sequence of nodes until end of input or a closing `}` (which is
/// left for the caller to consume).
fn parse_nodes(lexer: &mut Lexer) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    loop {
        let (key, key_line) = match lexer.peek()? {
            None => break,
            Some(tok) => match &tok.kind {
                TokenKind::Close => break,
                TokenKind::Open => {
                    return Err(Error::parse(
                        Format::Info,
                        tok.line,
                        tok.col,
                        "expected key before `{`",
                    ))
                }
                TokenKind::Word(_) => {
                    let tok = lexer.next()?.expect("peeked token");
                    let TokenKind::Word(text) = tok.kind else {
                        unreachable!()
                    };
                    (text, tok.line)
                }
            },
        };

        let mut node = Node::new(key);

        // A value must sit on the same line as its key.
        let has_value = matches!(
            lexer.peek()?,
            Some(Token { kind: TokenKind::Word(_), line, .. }) if *line == key_line
        );
        if has_value {
            let tok = lexer.next()?.expect("peeked token");
            let TokenKind::Word(text) = tok.kind else {
                unreachable!()
            };
            node.set_value(Some(text));
        }

        if matches!(
            lexer.peek()?,
            Some(Token {
                kind: TokenKind::Open,
                ..
            })
        ) {
            let open = lexer.next()?.expect("peeked token");
            *node.children_mut() = parse_nodes(lexer)?;
            match lexer.next()? {
                Some(Token {
                    kind: TokenKind::Close,
                    ..
                }) => {}
                _ => {
                    return Err(Error::parse(
                        Format::Info,
                        open.line,
                        open.col,
                        "unmatched `{`",
                    ))
                }
            }
        }

        nodes.push(node);
    }
    Ok(nodes)
}

pub(crate) fn encode(tree: &Tree) -> Result<String> {
    let mut out = String::new();
    for node in tree {
        write_node(&mut out, node, 0);
    }
    Ok(out)
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let pad = " ".repeat(depth * INDENT);
    out.push_str(&pad);
    if needs_quotes(node.key()) {
        write_quoted(out, node.key());
    } else {
        out.push_str(node.key());
    }
    if let Some(value) = node.value() {
        out.push(' ');
        // Values are always quoted so `key value` never reparses as two keys.
        write_quoted(out, value);
    }
    out.push('\n');
    if !node.is_leaf() {
        out.push_str(&pad);
        out.push_str("{\n");
        for child in node.children() {
            write_node(out, child, depth + 1);
        }
        out.push_str(&pad);
        out.push_str("}\n");
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '{' | '}' | ';' | '"'))
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree;

    #[test]
    fn test_decode_flat_pairs() {
        let tree = decode("host localhost\nport \"8080\"\n").unwrap();
        assert_eq!(
            tree,
            tree! { "host" => "localhost", "port" => "8080" }
        );
    }

    #[test]
    fn test_decode_nested_blocks() {
        let input = "server\n{\n    host \"localhost\"\n    limits\n    {\n        depth \"3\"\n    }\n}\n";
        let tree = decode(input).unwrap();
        let expected = tree! {
            "server" => {
                "host" => "localhost",
                "limits" => { "depth" => "3" },
            },
        };
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_decode_single_line_blocks() {
        let tree = decode(r#"name "root" { child "a" { } child "b" { } }"#).unwrap();
        let root = tree.get("name").unwrap();
        assert_eq!(root.value(), Some("root"));
        let keys: Vec<_> = root.children().iter().map(|c| c.key()).collect();
        assert_eq!(keys, vec!["child", "child"]);
        let values: Vec<_> = root.children().iter().filter_map(|c| c.value()).collect();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn test_value_must_share_line_with_key() {
        // On one line: key + value. On two lines: two bare keys.
        let paired = decode("a b\n").unwrap();
        assert_eq!(paired, tree! { "a" => "b" });

        let split = decode("a\nb\n").unwrap();
        assert_eq!(split.len(), 2);
        assert_eq!(split.children()[0].value(), None);
        assert_eq!(split.children()[1].key(), "b");
    }

    #[test]
    fn test_brace_on_next_line() {
        let tree = decode("outer \"v\"\n{\n inner\n}\n").unwrap();
        let outer = tree.get("outer").unwrap();
        assert_eq!(outer.value(), Some("v"));
        assert_eq!(outer.children().len(), 1);
    }

    #[test]
    fn test_comments_ignored() {
        let tree = decode("; leading comment\nkey \"v\" ; trailing\n").unwrap();
        assert_eq!(tree, tree! { "key" => "v" });
    }

    #[test]
    fn test_quoted_escapes() {
        let tree = decode(r#"key "line1\nline2\t\"quoted\" \\ end""#).unwrap();
        assert_eq!(
            tree.get("key").unwrap().value(),
            Some("line1\nline2\t\"quoted\" \\ end")
        );
    }

    #[test]
    fn test_empty_quoted_key() {
        let tree = decode("\"\" \"anonymous\"\n").unwrap();
        assert_eq!(tree.children()[0].key(), "");
        assert_eq!(tree.children()[0].value(), Some("anonymous"));
    }

    #[test]
    fn test_unterminated_string() {
        match decode("key \"no end").unwrap_err() {
            Error::Parse { format, msg, .. } => {
                assert_eq!(format, Format::Info);
                assert!(msg.contains("unterminated"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_escape() {
        match decode(r#"key "bad \q escape""#).unwrap_err() {
            Error::Parse { msg, .. } => assert!(msg.contains("\\q")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_unmatched_open_brace() {
        match decode("key {\n child\n").unwrap_err() {
            Error::Parse { line, msg, .. } => {
                assert_eq!(line, 1);
                assert!(msg.contains("unmatched `{`"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_unmatched_close_brace() {
        match decode("key\n}\n").unwrap_err() {
            Error::Parse { line, msg, .. } => {
                assert_eq!(line, 2);
                assert!(msg.contains("unmatched `}`"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_block_without_key() {
        assert!(matches!(
            decode("{ a }").unwrap_err(),
            Error::Parse { msg, .. } if msg.contains("expected key")
        ));
    }

    #[test]
    fn test_roundtrip_preserves_order_and_duplicates() {
        let original = tree! {
            "name" => ("root", {
                "child" => "a",
                "child" => "b",
                "" => "anon",
            }),
            "trailer" => "x y { } ; \" z",
        };
        let encoded = encode(&original).unwrap();
        assert_eq!(decode(&encoded).unwrap(), original);
    }

    #[test]
    fn test_roundtrip_valueless_and_empty_strings() {
        let original = tree! {
            "bare" => (),
            "empty" => "",
            "spaced" => "  padded  ",
        };
        let encoded = encode(&original).unwrap();
        assert_eq!(decode(&encoded).unwrap(), original);
    }
}
