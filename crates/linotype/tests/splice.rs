use insta::assert_snapshot;
use linotype::{
    Block, Definition, ExportOptions, Formatter, HelpTree, MarkupMode, Position, Span, Splice,
    Text, TreeError,
};

fn tool_help() -> HelpTree {
    let mut tree = HelpTree::new(Formatter::new().max_width(50))
        .with_root_id("tool")
        .unwrap();
    let mut root = tree.root_mut();
    root.add_text(Text::new("Usage: tool [OPTIONS] FILE").id("usage"))
        .unwrap();
    let mut options = root.add_text(Text::new("Options:").id("options")).unwrap();
    options
        .add_definition(Definition::new("-o", "OUT", "Write to OUT.").id("output"))
        .unwrap();
    options
        .add_definition(Definition::new("-v, --verbose", "", "Talk more.").id("verbose"))
        .unwrap();
    tree
}

/// Splices as a documentation generator would read them from directives.
fn directives() -> Vec<(&'static str, Splice)> {
    [
        ("usage", "@before @raw", ".. program:: tool"),
        ("output", "@after", "Defaults to standard output."),
        ("verbose", "@replace", "Print progress while working."),
        ("tool", "@raw, @after", "See also: tool-config(5)"),
    ]
    .into_iter()
    .map(|(item, classifiers, text)| {
        (item, Splice::parse_classifiers(classifiers, text).unwrap())
    })
    .collect()
}

#[test]
fn test_spliced_render() {
    let mut tree = tool_help();
    tree.splice(directives()).unwrap();

    assert_snapshot!(tree.render(), @r"
    .. program:: tool
    Usage: tool [OPTIONS] FILE
    Options:
        -o OUT         Write to OUT. Defaults to
                       standard output.
        -v, --verbose  Print progress while working.
    See also: tool-config(5)
    ");
}

#[test]
fn test_spliced_export() {
    let mut tree = tool_help();
    tree.splice(directives()).unwrap();

    let fragments = tree
        .export(&ExportOptions::new().item_id("options").children(true))
        .unwrap();
    let ids: Vec<_> = fragments.iter().map(|f| f.id.as_deref()).collect();
    assert_eq!(ids, vec![Some("output"), Some("verbose")]);
    assert_eq!(
        fragments[0].blocks,
        vec![Block::Definition {
            term: vec![Span::strong("-o"), Span::plain(" "), Span::emphasis("OUT")],
            description: vec![
                Span::plain("Write to "),
                Span::emphasis("OUT"),
                Span::plain(". Defaults to standard output."),
            ],
        }]
    );
}

#[test]
fn test_whole_tree_export_keeps_identified_root() {
    let mut tree = tool_help();
    tree.splice(directives()).unwrap();

    let fragments = tree.export(&ExportOptions::new()).unwrap();
    assert_eq!(fragments.len(), 1);
    let root = &fragments[0];
    assert_eq!(root.id.as_deref(), Some("tool"));
    assert_eq!(
        root.blocks,
        vec![Block::Raw("See also: tool-config(5)".to_string())]
    );
    assert_eq!(
        root.children[0].blocks,
        vec![
            Block::Raw(".. program:: tool".to_string()),
            Block::Paragraph(vec![Span::plain("Usage: tool [OPTIONS] FILE")]),
        ]
    );
}

#[test]
fn test_export_json_shape() {
    let fragments = tool_help()
        .export(&ExportOptions::new().item_id("verbose").auto_markup(false))
        .unwrap();
    insta::assert_json_snapshot!(fragments, @r#"
    [
      {
        "id": "verbose",
        "blocks": [
          {
            "definition": {
              "term": [
                {
                  "kind": "plain",
                  "text": "-v, --verbose"
                }
              ],
              "description": [
                {
                  "kind": "plain",
                  "text": "Talk more."
                }
              ]
            }
          }
        ],
        "children": []
      }
    ]
    "#);
}

#[test]
fn test_selected_tree_is_independent() {
    let tree = tool_help();
    let mut selected = tree.select("options", true).unwrap();
    selected
        .splice([("output", Splice::replace("Changed."))])
        .unwrap();

    assert!(selected.render().contains("Changed."));
    assert!(!tree.render().contains("Changed."));
    assert!(!selected.contains_id("usage"));
}

#[test]
fn test_partial_failure_reports_every_error() {
    let mut tree = tool_help();
    let err = tree
        .splice([
            ("missing", Splice::after("x")),
            ("usage", Splice::new(Position::After, MarkupMode::Auto, "[ARGS]")),
            ("tool", Splice::before("x")),
        ])
        .unwrap_err();

    assert_eq!(err.errors.len(), 2);
    assert_eq!(
        err.errors[0],
        TreeError::UnknownIdentifier("missing".to_string())
    );
    assert_eq!(err.errors[1], TreeError::NoContent("tool".to_string()));
    assert_eq!(
        err.to_string(),
        "2 splice(s) failed: an item with the ID 'missing' does not exist; \
         the item 'tool' has no text content to extend"
    );
    assert!(tree.render().starts_with("Usage: tool [OPTIONS] FILE [ARGS]"));
}
