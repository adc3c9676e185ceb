//! Parsing whole format strings into trees.

use expando::{
    parse, Conditional, FieldDef, FieldKey, FormatSpec, Justify, Node, ParseErrorKind, Period,
    ValueType,
};

const DOMAIN: u16 = 7;

const DEFS: &[FieldDef] = &[
    FieldDef::new("a", "a", DOMAIN, 0, ValueType::Number),
    FieldDef::new("b", "b", DOMAIN, 1, ValueType::Number),
    FieldDef::new("c", "c", DOMAIN, 2, ValueType::String),
    FieldDef::new("d", "d", DOMAIN, 3, ValueType::String),
    FieldDef::new("e", "e", DOMAIN, 4, ValueType::Number),
    FieldDef::new("f", "f", DOMAIN, 5, ValueType::String),
    FieldDef::new("g", "g", DOMAIN, 6, ValueType::String),
    FieldDef::new("l", "links", DOMAIN, 7, ValueType::Number),
    FieldDef::new("X", "x", DOMAIN, 8, ValueType::String),
    FieldDef::date("[", "date", DOMAIN, 9, ']'),
];

fn key_of(name: &str) -> FieldKey {
    DEFS.iter()
        .find(|d| d.short_name == name)
        .map(|d| d.key())
        .unwrap()
}

fn expando_key(node: &Node) -> FieldKey {
    node.as_expando().expect("expando node").key
}

fn cond(node: &Node) -> &Conditional {
    node.as_conditional().expect("conditional node")
}

fn branch(nodes: &Option<Vec<Node>>) -> &[Node] {
    nodes.as_deref().expect("branch present")
}

fn assert_field(node: &Node, name: &str) {
    assert_eq!(expando_key(node), key_of(name), "expected field {name}");
}

// ============================================================================
// Format specifiers
// ============================================================================

#[test]
fn formatted_expandos() {
    let nodes = parse("%X %8X %-8X %08X %.8X %8.8X %-8.8X %=8X", DEFS).unwrap();
    assert_eq!(nodes.len(), 15);

    let expected = [
        FormatSpec::new(0, None, Justify::Right, ' '),
        FormatSpec::new(8, None, Justify::Right, ' '),
        FormatSpec::new(8, None, Justify::Left, ' '),
        FormatSpec::new(8, None, Justify::Right, '0'),
        FormatSpec::new(0, Some(8), Justify::Right, ' '),
        FormatSpec::new(8, Some(8), Justify::Right, ' '),
        FormatSpec::new(8, Some(8), Justify::Left, ' '),
        FormatSpec::new(8, None, Justify::Center, ' '),
    ];

    for (i, node) in nodes.iter().enumerate() {
        if i % 2 == 1 {
            assert_eq!(node.as_text(), Some(" "));
            continue;
        }
        let field = node.as_expando().unwrap();
        assert_eq!(field.key, key_of("X"));
        assert_eq!(field.format, expected[i / 2], "specifier {}", i / 2);
        assert_eq!(field.arg, None);
    }
}

// ============================================================================
// Conditionals
// ============================================================================

#[test]
fn nested_if_else_full() {
    let nodes = parse("%<a?%<b?%c&%d>&%<e?%f&%g>>", DEFS).unwrap();
    assert_eq!(nodes.len(), 1);

    let outer = cond(&nodes[0]);
    assert_field(&outer.condition, "a");

    let t = cond(&branch(&outer.if_true)[0]);
    assert_field(&t.condition, "b");
    assert_field(&branch(&t.if_true)[0], "c");
    assert_field(&branch(&t.if_false)[0], "d");

    let f = cond(&branch(&outer.if_false)[0]);
    assert_field(&f.condition, "e");
    assert_field(&branch(&f.if_true)[0], "f");
    assert_field(&branch(&f.if_false)[0], "g");
}

#[test]
fn nested_if_else_inner_false_absent() {
    let nodes = parse("%<a?%<b?%c&%d>&%<e?%f>>", DEFS).unwrap();
    let outer = cond(&nodes[0]);

    let f = cond(&branch(&outer.if_false)[0]);
    assert_field(&f.condition, "e");
    assert_field(&branch(&f.if_true)[0], "f");
    assert!(f.if_false.is_none());
}

#[test]
fn nested_if_else_inner_true_empty() {
    let nodes = parse("%<a?%<b?%c&%d>&%<e?&%f>>", DEFS).unwrap();
    let outer = cond(&nodes[0]);

    let f = cond(&branch(&outer.if_false)[0]);
    assert_eq!(f.if_true, Some(vec![]));
    assert_field(&branch(&f.if_false)[0], "f");
}

#[test]
fn nested_if_else_first_inner_false_absent() {
    let nodes = parse("%<a?%<b?%c>&%<e?%f&%g>>", DEFS).unwrap();
    let outer = cond(&nodes[0]);

    let t = cond(&branch(&outer.if_true)[0]);
    assert_field(&branch(&t.if_true)[0], "c");
    assert!(t.if_false.is_none());

    let f = cond(&branch(&outer.if_false)[0]);
    assert_field(&branch(&f.if_false)[0], "g");
}

#[test]
fn nested_if_else_first_inner_true_empty() {
    let nodes = parse("%<a?%<b?&%c>&%<e?%f&%g>>", DEFS).unwrap();
    let outer = cond(&nodes[0]);

    let t = cond(&branch(&outer.if_true)[0]);
    assert_eq!(t.if_true, Some(vec![]));
    assert_field(&branch(&t.if_false)[0], "c");
}

#[test]
fn new_if_else() {
    let nodes = parse("if: %<l?%4l>  if-else: %<l?%4l&%4c>", DEFS).unwrap();
    assert_eq!(nodes.len(), 4);

    assert_eq!(nodes[0].as_text(), Some("if: "));

    let first = cond(&nodes[1]);
    assert_field(&first.condition, "l");
    let t = branch(&first.if_true);
    assert_eq!(t.len(), 1);
    assert_eq!(t[0].as_expando().unwrap().format.min_cols, 4);
    assert!(first.if_false.is_none());

    assert_eq!(nodes[2].as_text(), Some("  if-else: "));

    let second = cond(&nodes[3]);
    assert_field(&second.condition, "l");
    assert_field(&branch(&second.if_true)[0], "l");
    let f = branch(&second.if_false);
    assert_field(&f[0], "c");
    assert_eq!(f[0].as_expando().unwrap().format.min_cols, 4);
}

#[test]
fn date_conditional_and_argument() {
    let nodes = parse("%<[2w?%[%d/%m]&old>", DEFS).unwrap();
    let c = cond(&nodes[0]);

    let cd = c.condition.as_cond_date().unwrap();
    assert_eq!(cd.key, key_of("["));
    assert_eq!((cd.count, cd.period), (2, Period::Week));

    let field = branch(&c.if_true)[0].as_expando().unwrap();
    assert_eq!(field.arg.as_deref(), Some("%d/%m"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn unknown_identifier() {
    let err = parse("ok %a %Q", DEFS).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownIdentifier);
    assert_eq!(err.position, 7);
    assert!(err.message.contains('Q'), "{}", err.message);
}

#[test]
fn unknown_identifier_in_branch() {
    let err = parse("%<a?%Z>", DEFS).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownIdentifier);
    assert_eq!(err.position, 5);
}

#[test]
fn invalid_period() {
    let err = parse("%<[3x?a&b>", DEFS).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidPeriodChar);
    assert_eq!(err.position, 4);
    assert!(err.message.contains("'x'"), "{}", err.message);
}

#[test]
fn count_overflow() {
    let err = parse("%<[65535d?a>", DEFS).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NumberOverflow);
    assert_eq!(err.position, 3);
}

#[test]
fn every_error_points_inside_source() {
    let bad = [
        "%<a?x",
        "%<a?x&y&z>",
        "%-=a",
        "%.a",
        "%<|-?x>",
        "%<a!x>",
        "%[open",
        "%",
        "%<[3q?x>",
    ];
    for input in bad {
        let err = parse(input, DEFS).unwrap_err();
        assert!(err.position < input.len(), "{input}: {err}");
    }
}
