//! Selecting subtrees and splicing content into items.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpliceError, TreeError};
use crate::tree::{HelpTree, ItemId, ItemKind, Node};

/// Where spliced text goes relative to an item's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Before,
    After,
    Replace,
}

/// How spliced text is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupMode {
    /// Joined to the item's own text and marked up with it.
    Auto,
    /// Kept verbatim as a separate block.
    Raw,
}

/// Text to insert into, or substitute for, an item's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Splice {
    pub position: Position,
    pub mode: MarkupMode,
    pub text: String,
}

impl Splice {
    pub fn new(position: Position, mode: MarkupMode, text: impl Into<String>) -> Self {
        Self {
            position,
            mode,
            text: text.into(),
        }
    }

    pub fn before(text: impl Into<String>) -> Self {
        Self::new(Position::Before, MarkupMode::Auto, text)
    }

    pub fn after(text: impl Into<String>) -> Self {
        Self::new(Position::After, MarkupMode::Auto, text)
    }

    pub fn replace(text: impl Into<String>) -> Self {
        Self::new(Position::Replace, MarkupMode::Auto, text)
    }

    /// Switches this splice to raw mode.
    pub fn raw(mut self) -> Self {
        self.mode = MarkupMode::Raw;
        self
    }

    /// Builds a splice from classifier keywords such as `"@raw : @before"`.
    ///
    /// Keywords are separated by whitespace, `:` or `,`. Recognized
    /// keywords are `@before`, `@after`, `@replace`, `@auto`, `@raw` and
    /// `@rst`, a synonym for `@raw`. Without a position keyword the text
    /// follows the content; without a mode keyword it is marked up.
    ///
    /// ```rust
    /// use linotype::{MarkupMode, Position, Splice};
    ///
    /// let splice = Splice::parse_classifiers("@raw : @before", "Note:").unwrap();
    /// assert_eq!(splice.position, Position::Before);
    /// assert_eq!(splice.mode, MarkupMode::Raw);
    /// ```
    pub fn parse_classifiers(classifiers: &str, text: impl Into<String>) -> Result<Self> {
        let mut position = Position::After;
        let mut mode = MarkupMode::Auto;
        for keyword in classifiers
            .split(|c: char| c.is_whitespace() || c == ':' || c == ',')
            .filter(|keyword| !keyword.is_empty())
        {
            match keyword {
                "@before" => position = Position::Before,
                "@after" => position = Position::After,
                "@replace" => position = Position::Replace,
                "@auto" => mode = MarkupMode::Auto,
                "@raw" | "@rst" => mode = MarkupMode::Raw,
                other => return Err(TreeError::UnknownClassifier(other.to_string())),
            }
        }
        Ok(Self::new(position, mode, text))
    }
}

impl HelpTree {
    /// Copies an item and its descendants into a new tree.
    ///
    /// The new tree is rendered with the item's effective formatter. With
    /// `include_self` the item is the only child of the new root,
    /// otherwise the root holds copies of the item's children.
    pub fn select(&self, item_id: &str, include_self: bool) -> Result<HelpTree> {
        let id = self.require(item_id)?;
        let mut selected = HelpTree::new(self.effective_formatter(id).clone());

        if include_self {
            copy_subtree(self, id, &mut selected, ItemId::ROOT)?;
        } else {
            for &child in &self.node(id).children {
                copy_subtree(self, child, &mut selected, ItemId::ROOT)?;
            }
        }

        tracing::debug!(item_id, include_self, "selected subtree");
        Ok(selected)
    }

    /// Applies splices in order.
    ///
    /// Every entry that can be applied is applied. Entries naming unknown
    /// items, or adding marked-up text to items without text, are reported
    /// together in the returned error.
    ///
    /// ```rust
    /// use linotype::{HelpTree, Splice, Text};
    ///
    /// let mut tree = HelpTree::default();
    /// tree.root_mut().add_text(Text::new("Old text.").id("intro")).unwrap();
    ///
    /// let err = tree
    ///     .splice([("intro", Splice::replace("New text.")), ("missing", Splice::after("x"))])
    ///     .unwrap_err();
    /// assert_eq!(err.errors.len(), 1);
    /// assert_eq!(tree.render(), "New text.");
    /// ```
    pub fn splice<I, S>(&mut self, entries: I) -> std::result::Result<(), SpliceError>
    where
        I: IntoIterator<Item = (S, Splice)>,
        S: AsRef<str>,
    {
        let mut errors = Vec::new();
        for (item_id, splice) in entries {
            let item_id = item_id.as_ref();
            let applied = self
                .require(item_id)
                .and_then(|id| self.apply_splice(id, item_id, splice));
            match applied {
                Ok(()) => tracing::trace!(item_id, "applied splice"),
                Err(err) => {
                    tracing::debug!(item_id, error = %err, "splice failed");
                    errors.push(err);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SpliceError { errors })
        }
    }

    fn apply_splice(&mut self, id: ItemId, item_id: &str, splice: Splice) -> Result<()> {
        let node = self.node_mut(id);
        match splice.mode {
            MarkupMode::Raw => match splice.position {
                Position::Before => node.raw.before.push(splice.text),
                Position::After => node.raw.after.push(splice.text),
                Position::Replace => node.raw.replace = Some(splice.text),
            },
            MarkupMode::Auto => {
                let content = match &mut node.kind {
                    ItemKind::Root => return Err(TreeError::NoContent(item_id.to_string())),
                    ItemKind::Text(text) => text,
                    ItemKind::Definition(def) => &mut def.description,
                };
                *content = join_content(content, splice.position, splice.text);
            }
        }
        Ok(())
    }
}

/// Joins spliced text to existing content with a single space.
fn join_content(existing: &str, position: Position, text: String) -> String {
    match position {
        Position::Replace => text,
        _ if existing.is_empty() => text,
        _ if text.is_empty() => existing.to_string(),
        Position::Before => format!("{} {}", text, existing),
        Position::After => format!("{} {}", existing, text),
    }
}

fn copy_subtree(
    source: &HelpTree,
    id: ItemId,
    target: &mut HelpTree,
    parent: ItemId,
) -> Result<()> {
    let node = source.node(id);
    let copy = Node {
        parent: None,
        children: Vec::new(),
        ..node.clone()
    };
    let copied = target.append(parent, copy)?;
    for &child in &node.children {
        copy_subtree(source, child, target, copied)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Definition, Text};
    use crate::Formatter;

    fn sample() -> HelpTree {
        let mut tree = HelpTree::default();
        let mut root = tree.root_mut();
        root.add_text(Text::new("Usage: grep").id("usage")).unwrap();
        let mut options = root
            .add_text(
                Text::new("Options:")
                    .id("options")
                    .formatter(Formatter::new().max_width(60)),
            )
            .unwrap();
        options
            .add_definition(Definition::new("-q", "", "Quiet.").id("quiet"))
            .unwrap();
        options
            .add_definition(Definition::new("-v", "", "Verbose.").id("verbose"))
            .unwrap();
        tree
    }

    #[test]
    fn test_parse_classifiers() {
        let splice = Splice::parse_classifiers("@after", "x").unwrap();
        assert_eq!(splice, Splice::after("x"));

        let splice = Splice::parse_classifiers("@rst,@replace", "x").unwrap();
        assert_eq!(splice, Splice::replace("x").raw());

        let splice = Splice::parse_classifiers("", "x").unwrap();
        assert_eq!(splice, Splice::after("x"));

        let splice = Splice::parse_classifiers("@rst", "x").unwrap();
        assert_eq!(splice, Splice::after("x").raw());

        assert_eq!(
            Splice::parse_classifiers("@before @sideways", "x").unwrap_err(),
            TreeError::UnknownClassifier("@sideways".to_string())
        );
    }

    #[test]
    fn test_select_with_self() {
        let selected = sample().select("options", true).unwrap();
        let items: Vec<_> = selected.iter().filter_map(|i| i.identifier()).collect();
        assert_eq!(items, vec!["options", "quiet", "verbose"]);
        assert_eq!(selected.formatter().max_width, 60);
        assert_eq!(selected.root().children().count(), 1);
    }

    #[test]
    fn test_select_children_only() {
        let selected = sample().select("options", false).unwrap();
        assert_eq!(selected.identifiers(), vec!["quiet", "verbose"]);
        assert_eq!(selected.render(), "-q  Quiet.\n-v  Verbose.");
    }

    #[test]
    fn test_select_unknown() {
        assert_eq!(
            sample().select("nope", true).unwrap_err(),
            TreeError::UnknownIdentifier("nope".to_string())
        );
    }

    #[test]
    fn test_select_inherits_formatter_from_ancestors() {
        let selected = sample().select("quiet", true).unwrap();
        assert_eq!(selected.formatter().max_width, 60);
    }

    #[test]
    fn test_auto_splices_join_with_space() {
        let mut tree = sample();
        tree.splice([
            ("usage", Splice::after("PATTERN")),
            ("usage", Splice::before("$")),
            ("quiet", Splice::after("Really.")),
        ])
        .unwrap();
        assert_eq!(
            tree.item("usage").unwrap().kind(),
            &ItemKind::Text("$ Usage: grep PATTERN".to_string())
        );
        match tree.item("quiet").unwrap().kind() {
            ItemKind::Definition(def) => assert_eq!(def.description, "Quiet. Really."),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_raw_splices_are_stored() {
        let mut tree = sample();
        tree.splice(vec![
            ("usage".to_string(), Splice::before("one").raw()),
            ("usage".to_string(), Splice::before("two").raw()),
            ("usage".to_string(), Splice::replace("three").raw()),
        ])
        .unwrap();
        let raw = tree.item("usage").unwrap().raw();
        assert_eq!(raw.before, vec!["one", "two"]);
        assert_eq!(raw.replace.as_deref(), Some("three"));
        assert!(raw.after.is_empty());
    }

    #[test]
    fn test_unclassified_splice_extends_content() {
        let mut tree = sample();
        tree.splice([
            ("usage", Splice::parse_classifiers("", "PATTERN").unwrap()),
            ("quiet", Splice::parse_classifiers("", "No output.").unwrap()),
        ])
        .unwrap();
        assert_eq!(
            tree.item("usage").unwrap().kind(),
            &ItemKind::Text("Usage: grep PATTERN".to_string())
        );
        match tree.item("quiet").unwrap().kind() {
            ItemKind::Definition(def) => assert_eq!(def.description, "Quiet. No output."),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_failures_do_not_abort() {
        let mut tree = sample().with_root_id("help").unwrap();
        let err = tree
            .splice([
                ("missing", Splice::after("x")),
                ("help", Splice::after("x")),
                ("quiet", Splice::replace("Silent.")),
            ])
            .unwrap_err();
        assert_eq!(
            err.errors,
            vec![
                TreeError::UnknownIdentifier("missing".to_string()),
                TreeError::NoContent("help".to_string()),
            ]
        );
        match tree.item("quiet").unwrap().kind() {
            ItemKind::Definition(def) => assert_eq!(def.description, "Silent."),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_raw_splice_on_root() {
        let mut tree = sample().with_root_id("help").unwrap();
        tree.splice([("help", Splice::after("Footer.").raw())])
            .unwrap();
        assert!(tree.render().ends_with("\nFooter."));
    }

    #[test]
    fn test_join_content() {
        assert_eq!(join_content("", Position::After, "x".into()), "x");
        assert_eq!(join_content("a", Position::After, "".into()), "a");
        assert_eq!(join_content("a", Position::Before, "b".into()), "b a");
        assert_eq!(join_content("a", Position::Replace, "".into()), "");
    }
}
