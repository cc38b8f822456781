use ptconv::{convert, convert_str, decode_str, encode_string, tree, Error, Format, Node, Tree};

#[test]
fn test_every_pair_of_formats_handles_a_flat_tree() {
    // A two-level tree with plain names is representable everywhere.
    let ini = "[server]\nhost=localhost\nport=8080\n";
    let original = decode_str(Format::Ini, ini).unwrap();

    for from in Format::ALL {
        let encoded = match encode_string(from, &original) {
            Ok(s) => s,
            // XML needs a single root; the section node provides one, so
            // every format accepts this tree.
            Err(e) => panic!("{from} rejected flat tree: {e}"),
        };
        for to in Format::ALL {
            let converted = convert_str(from, to, &encoded)
                .unwrap_or_else(|e| panic!("{from} -> {to} failed: {e}"));
            let back = decode_str(to, &converted).unwrap();
            assert_eq!(back, original, "{from} -> {to} changed the tree");
        }
    }
}

#[test]
fn test_same_format_roundtrip_each_codec() {
    let cases = [
        (Format::Info, "a \"1\"\nb\n{\n    c \"2\"\n    c \"3\"\n}\n"),
        (Format::Json, r#"{"a": "1", "b": {"c": ["2", "3"]}}"#),
        (Format::Ini, "top=1\n[b]\nc=2\n"),
        (Format::Xml, "<b><c>2</c><c>3</c></b>"),
    ];
    for (format, input) in cases {
        let tree = decode_str(format, input).unwrap();
        let encoded = encode_string(format, &tree).unwrap();
        assert_eq!(
            decode_str(format, &encoded).unwrap(),
            tree,
            "{format} round trip changed the tree"
        );
    }
}

#[test]
fn test_info_to_ini_rejects_deep_trees() {
    // Depth three: root -> section -> key -> value node.
    let deep = r#"outer { middle { inner "v" } }"#;
    let err = convert_str(Format::Info, Format::Ini, deep).unwrap_err();
    match err {
        Error::Structural { format, .. } => assert_eq!(format, Format::Ini),
        other => panic!("expected structural mismatch, got {other:?}"),
    }
}

#[test]
fn test_unknown_format_rejected_before_io() {
    for name in ["yaml", "toml", ""] {
        match Format::resolve(name) {
            Err(Error::UnknownFormat { name: n }) => assert_eq!(n, name),
            other => panic!("expected UnknownFormat, got {other:?}"),
        }
    }
}

#[test]
fn test_no_partial_output_on_malformed_xml() {
    let mut out = Vec::new();
    let err = convert(
        Format::Xml,
        Format::Json,
        "<a><b></a>".as_bytes(),
        &mut out,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Parse { format: Format::Xml, .. }));
    assert!(out.is_empty(), "decode failure must not write output");
}

#[test]
fn test_json_array_object_duality() {
    let original = tree! {
        "root" => {
            "item" => "1",
            "item" => "2",
            "item" => "3",
        },
    };

    let json = encode_string(Format::Json, &original).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"root": {"item": ["1", "2", "3"]}})
    );

    let back = decode_str(Format::Json, &json).unwrap();
    assert_eq!(back, original);
}

#[test]
fn test_info_json_info_preserves_sibling_order() {
    let input = r#"name "root" { child "a" { } child "b" { } }"#;

    let json = convert_str(Format::Info, Format::Json, input).unwrap();
    let info = convert_str(Format::Json, Format::Info, &json).unwrap();

    let tree = decode_str(Format::Info, &info).unwrap();
    let name = tree.get("name").unwrap();
    assert_eq!(name.value(), Some("root"));
    let children: Vec<_> = name
        .children_with_key("child")
        .map(|n| n.value().unwrap())
        .collect();
    assert_eq!(children, vec!["a", "b"]);
}

#[test]
fn test_xml_attributes_survive_conversion_through_info() {
    let xml = r#"<server enabled="yes"><host>h</host></server>"#;
    let info = convert_str(Format::Xml, Format::Info, xml).unwrap();
    let back = convert_str(Format::Info, Format::Xml, &info).unwrap();

    let tree = decode_str(Format::Xml, &back).unwrap();
    let server = tree.get("server").unwrap();
    let attrs = server.get(ptconv::ATTR_KEY).unwrap();
    assert_eq!(attrs.get("enabled").and_then(|n| n.value()), Some("yes"));
}

#[test]
fn test_json_to_xml_requires_single_root() {
    let err = convert_str(Format::Json, Format::Xml, r#"{"a": "1", "b": "2"}"#).unwrap_err();
    assert!(matches!(err, Error::Structural { format: Format::Xml, .. }));

    let ok = convert_str(Format::Json, Format::Xml, r#"{"root": {"a": "1"}}"#).unwrap();
    assert!(ok.contains("<root>"));
}

#[test]
fn test_empty_documents() {
    // An empty INFO document is an empty tree; JSON and INI can encode it,
    // XML cannot.
    let empty = decode_str(Format::Info, "").unwrap();
    assert_eq!(empty, Tree::new());
    assert_eq!(encode_string(Format::Json, &empty).unwrap(), "{}");
    assert_eq!(encode_string(Format::Ini, &empty).unwrap(), "");
    assert!(encode_string(Format::Xml, &empty).is_err());
}

#[test]
fn test_values_survive_reserved_characters() {
    let mut original = Tree::new();
    original.push(Node::new("root").with_child(Node::new("text").with_value("a < b & \"c\"")));

    for format in [Format::Info, Format::Json, Format::Xml] {
        let encoded = encode_string(format, &original).unwrap();
        assert_eq!(
            decode_str(format, &encoded).unwrap(),
            original,
            "{format} mangled reserved characters"
        );
    }
}
