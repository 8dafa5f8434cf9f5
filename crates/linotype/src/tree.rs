//! The item tree.
//!
//! A [`HelpTree`] owns every item in an arena. Items refer to their parent
//! and children by [`ItemId`]. The tree root is always a synthetic
//! [`ItemKind::Root`] container that renders nothing and adds no
//! indentation level.
//!
//! Items are appended through [`ItemMut`] handles, which return a handle to
//! the new child so that sections can be built fluently:
//!
//! ```rust
//! use linotype::{Definition, HelpTree, Text};
//!
//! let mut tree = HelpTree::default();
//! let mut root = tree.root_mut();
//! root.add_text("Usage: grep [OPTIONS] PATTERN").unwrap();
//! let mut options = root.add_text(Text::new("Options:").id("options")).unwrap();
//! options
//!     .add_definition(Definition::new("-q, --quiet", "", "Suppress all output."))
//!     .unwrap();
//!
//! assert!(tree.contains_id("options"));
//! assert_eq!(tree.depth(), 2);
//! ```

use std::collections::HashMap;

use once_cell::unsync::OnceCell;

use crate::error::{Result, TreeError};
use crate::formatter::{DefinitionStyle, Formatter};

/// Position of an item in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(usize);

impl ItemId {
    pub(crate) const ROOT: ItemId = ItemId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// The content of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// A container without content of its own.
    Root,
    /// A paragraph of text. `"\n"` starts a new paragraph.
    Text(String),
    Definition(DefinitionContent),
}

/// A term, its argument string and its description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionContent {
    pub term: String,
    pub args: String,
    pub description: String,
    /// Layout override. Falls back to the formatter's definition style.
    pub style: Option<DefinitionStyle>,
}

/// Verbatim text spliced around or in place of an item's content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawContent {
    pub before: Vec<String>,
    pub after: Vec<String>,
    pub replace: Option<String>,
}

impl RawContent {
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty() && self.replace.is_none()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) identifier: Option<String>,
    pub(crate) kind: ItemKind,
    pub(crate) parent: Option<ItemId>,
    pub(crate) children: Vec<ItemId>,
    pub(crate) formatter: Option<Formatter>,
    pub(crate) raw: RawContent,
}

impl Node {
    fn new(kind: ItemKind, identifier: Option<String>, formatter: Option<Formatter>) -> Self {
        Self {
            identifier,
            kind,
            parent: None,
            children: Vec::new(),
            formatter,
            raw: RawContent::default(),
        }
    }
}

/// A text item to append.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    text: String,
    id: Option<String>,
    formatter: Option<Formatter>,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// A text consisting only of a line break. Renders as one blank line.
    pub fn blank() -> Self {
        Self::new("\n")
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Text::new(text)
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Text::new(text)
    }
}

/// A definition item to append.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definition {
    term: String,
    args: String,
    description: String,
    style: Option<DefinitionStyle>,
    id: Option<String>,
    formatter: Option<Formatter>,
}

impl Definition {
    pub fn new(
        term: impl Into<String>,
        args: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            term: term.into(),
            args: args.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn style(mut self, style: DefinitionStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }
}

impl<T, A, D> From<(T, A, D)> for Definition
where
    T: Into<String>,
    A: Into<String>,
    D: Into<String>,
{
    fn from((term, args, description): (T, A, D)) -> Self {
        Definition::new(term, args, description)
    }
}

/// A tree of help message items.
#[derive(Debug, Clone)]
pub struct HelpTree {
    nodes: Vec<Node>,
    formatter: Formatter,
    index: OnceCell<HashMap<String, ItemId>>,
}

impl Default for HelpTree {
    fn default() -> Self {
        Self::new(Formatter::default())
    }
}

impl HelpTree {
    /// Creates an empty tree rendered with `formatter`.
    pub fn new(formatter: Formatter) -> Self {
        Self {
            nodes: vec![Node::new(ItemKind::Root, None, None)],
            formatter,
            index: OnceCell::new(),
        }
    }

    /// Gives the root an identifier so it can be selected and spliced.
    ///
    /// Fails if an item in the tree already uses the identifier.
    pub fn with_root_id(mut self, id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if self.root().identifier() != Some(id.as_str()) && self.contains_id(&id) {
            return Err(TreeError::DuplicateIdentifier(id));
        }
        self.nodes[0].identifier = Some(id);
        self.index = OnceCell::new();
        Ok(self)
    }

    /// The formatter every item inherits unless it overrides it.
    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub fn root(&self) -> ItemRef<'_> {
        ItemRef {
            tree: self,
            id: ItemId::ROOT,
        }
    }

    pub fn root_mut(&mut self) -> ItemMut<'_> {
        ItemMut {
            tree: self,
            id: ItemId::ROOT,
        }
    }

    pub fn get(&self, id: ItemId) -> Option<ItemRef<'_>> {
        (id.0 < self.nodes.len()).then_some(ItemRef { tree: self, id })
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<ItemMut<'_>> {
        (id.0 < self.nodes.len()).then_some(ItemMut { tree: self, id })
    }

    /// Finds an item by identifier.
    pub fn item(&self, identifier: &str) -> Result<ItemRef<'_>> {
        let id = self.require(identifier)?;
        Ok(ItemRef { tree: self, id })
    }

    /// Finds an item by identifier for appending.
    pub fn item_mut(&mut self, identifier: &str) -> Result<ItemMut<'_>> {
        let id = self.require(identifier)?;
        Ok(ItemMut { tree: self, id })
    }

    pub fn lookup(&self, identifier: &str) -> Option<ItemId> {
        self.index().get(identifier).copied()
    }

    pub fn contains_id(&self, identifier: &str) -> bool {
        self.index().contains_key(identifier)
    }

    /// Every identifier in the tree, in pre-order.
    pub fn identifiers(&self) -> Vec<&str> {
        self.iter().filter_map(|item| item.identifier()).collect()
    }

    /// Iterates over every item, root first, in depth-first pre-order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            stack: vec![ItemId::ROOT],
        }
    }

    /// The number of content levels in the tree. Root containers do not
    /// count.
    pub fn depth(&self) -> usize {
        self.iter()
            .filter(|item| !matches!(item.kind(), ItemKind::Root))
            .map(|item| item.level() + 1)
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn require(&self, identifier: &str) -> Result<ItemId> {
        self.lookup(identifier)
            .ok_or_else(|| TreeError::UnknownIdentifier(identifier.to_string()))
    }

    pub(crate) fn node(&self, id: ItemId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: ItemId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Appends a node under `parent`. Fails without touching the tree when
    /// the node's identifier is taken.
    pub(crate) fn append(&mut self, parent: ItemId, mut node: Node) -> Result<ItemId> {
        if let Some(identifier) = &node.identifier {
            if self.contains_id(identifier) {
                return Err(TreeError::DuplicateIdentifier(identifier.clone()));
            }
        }

        let id = ItemId(self.nodes.len());
        node.parent = Some(parent);
        if let (Some(identifier), Some(index)) = (&node.identifier, self.index.get_mut()) {
            index.insert(identifier.clone(), id);
        }
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// The formatter in effect for an item: its own override, or that of
    /// its nearest ancestor, or the tree's.
    pub(crate) fn effective_formatter(&self, id: ItemId) -> &Formatter {
        let mut current = Some(id);
        while let Some(item) = current {
            let node = self.node(item);
            if let Some(formatter) = &node.formatter {
                return formatter;
            }
            current = node.parent;
        }
        &self.formatter
    }

    fn index(&self) -> &HashMap<String, ItemId> {
        self.index.get_or_init(|| {
            let index: HashMap<String, ItemId> = self
                .iter()
                .filter_map(|item| item.identifier().map(|ident| (ident.to_string(), item.id())))
                .collect();
            tracing::debug!(identifiers = index.len(), "built identifier index");
            index
        })
    }
}

/// Pre-order iterator over a tree's items.
pub struct Iter<'a> {
    tree: &'a HelpTree,
    stack: Vec<ItemId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = ItemRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.node(id).children.iter().rev().copied());
        Some(ItemRef {
            tree: self.tree,
            id,
        })
    }
}

/// A read-only view of one item.
#[derive(Debug, Clone, Copy)]
pub struct ItemRef<'a> {
    tree: &'a HelpTree,
    id: ItemId,
}

impl<'a> ItemRef<'a> {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn identifier(&self) -> Option<&'a str> {
        self.node().identifier.as_deref()
    }

    pub fn kind(&self) -> &'a ItemKind {
        &self.node().kind
    }

    pub fn parent(&self) -> Option<ItemRef<'a>> {
        self.node().parent.map(|id| ItemRef {
            tree: self.tree,
            id,
        })
    }

    pub fn children(&self) -> impl Iterator<Item = ItemRef<'a>> + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |&id| ItemRef { tree, id })
    }

    /// The item's own formatter override.
    pub fn formatter(&self) -> Option<&'a Formatter> {
        self.node().formatter.as_ref()
    }

    /// The formatter the item is rendered with.
    pub fn effective_formatter(&self) -> &'a Formatter {
        self.tree.effective_formatter(self.id)
    }

    pub fn raw(&self) -> &'a RawContent {
        &self.node().raw
    }

    /// The item's nesting level. Root containers add no level.
    pub fn level(&self) -> usize {
        let mut level = 0;
        let mut current = self.parent();
        while let Some(item) = current {
            if !matches!(item.kind(), ItemKind::Root) {
                level += 1;
            }
            current = item.parent();
        }
        level
    }

    fn node(&self) -> &'a Node {
        self.tree.node(self.id)
    }
}

/// A handle for appending children to an item.
#[derive(Debug)]
pub struct ItemMut<'a> {
    tree: &'a mut HelpTree,
    id: ItemId,
}

impl ItemMut<'_> {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn identifier(&self) -> Option<&str> {
        self.tree.node(self.id).identifier.as_deref()
    }

    /// Appends a text item and returns a handle to it.
    pub fn add_text(&mut self, text: impl Into<Text>) -> Result<ItemMut<'_>> {
        let Text {
            text,
            id,
            formatter,
        } = text.into();
        let child = self
            .tree
            .append(self.id, Node::new(ItemKind::Text(text), id, formatter))?;
        Ok(ItemMut {
            tree: &mut *self.tree,
            id: child,
        })
    }

    /// Appends a definition item and returns a handle to it.
    pub fn add_definition(&mut self, definition: impl Into<Definition>) -> Result<ItemMut<'_>> {
        let Definition {
            term,
            args,
            description,
            style,
            id,
            formatter,
        } = definition.into();
        let kind = ItemKind::Definition(DefinitionContent {
            term,
            args,
            description,
            style,
        });
        let child = self.tree.append(self.id, Node::new(kind, id, formatter))?;
        Ok(ItemMut {
            tree: &mut *self.tree,
            id: child,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HelpTree {
        let mut tree = HelpTree::default();
        let mut root = tree.root_mut();
        root.add_text(Text::new("Usage: grep").id("usage")).unwrap();
        let mut options = root.add_text(Text::new("Options:").id("options")).unwrap();
        options
            .add_definition(Definition::new("-q", "", "Quiet.").id("quiet"))
            .unwrap();
        options.add_definition(("-v", "", "Verbose.")).unwrap();
        tree
    }

    #[test]
    fn test_lookup() {
        let tree = sample();
        let options = tree.item("options").unwrap();
        assert_eq!(options.kind(), &ItemKind::Text("Options:".to_string()));
        assert_eq!(options.children().count(), 2);
        assert!(tree.lookup("missing").is_none());
        assert_eq!(
            tree.item("missing").unwrap_err(),
            TreeError::UnknownIdentifier("missing".to_string())
        );
    }

    #[test]
    fn test_identifiers_in_pre_order() {
        assert_eq!(sample().identifiers(), vec!["usage", "options", "quiet"]);
    }

    #[test]
    fn test_duplicate_identifier_leaves_tree_unchanged() {
        let mut tree = sample();
        let count = tree.iter().count();
        let err = tree
            .root_mut()
            .add_text(Text::new("again").id("quiet"))
            .unwrap_err();
        assert_eq!(err, TreeError::DuplicateIdentifier("quiet".to_string()));
        assert_eq!(tree.iter().count(), count);
    }

    #[test]
    fn test_index_follows_appends() {
        let mut tree = sample();
        assert!(tree.contains_id("usage"));
        tree.item_mut("usage")
            .unwrap()
            .add_text(Text::new("late").id("late"))
            .unwrap();
        assert!(tree.contains_id("late"));
        assert_eq!(tree.item("late").unwrap().parent().unwrap().identifier(), Some("usage"));
    }

    #[test]
    fn test_iter_pre_order() {
        let tree = sample();
        let kinds: Vec<_> = tree
            .iter()
            .map(|item| match item.kind() {
                ItemKind::Root => "root".to_string(),
                ItemKind::Text(text) => text.clone(),
                ItemKind::Definition(def) => def.term.clone(),
            })
            .collect();
        assert_eq!(kinds, vec!["root", "Usage: grep", "Options:", "-q", "-v"]);
    }

    #[test]
    fn test_levels_and_depth() {
        let tree = sample();
        assert_eq!(tree.root().level(), 0);
        assert_eq!(tree.item("options").unwrap().level(), 0);
        assert_eq!(tree.item("quiet").unwrap().level(), 1);
        assert_eq!(tree.depth(), 2);
        assert_eq!(HelpTree::default().depth(), 0);
    }

    #[test]
    fn test_effective_formatter_inheritance() {
        let mut tree = sample();
        let narrow = Formatter::new().max_width(40);
        tree.item_mut("options")
            .unwrap()
            .add_text(Text::new("nested").id("nested").formatter(narrow.clone()))
            .unwrap()
            .add_text(Text::new("deeper").id("deeper"))
            .unwrap();

        assert_eq!(tree.item("deeper").unwrap().effective_formatter(), &narrow);
        assert_eq!(
            tree.item("quiet").unwrap().effective_formatter(),
            &Formatter::default()
        );
        assert!(tree.item("deeper").unwrap().formatter().is_none());
    }

    #[test]
    fn test_root_identifier() {
        let tree = HelpTree::default().with_root_id("help").unwrap();
        assert_eq!(tree.lookup("help"), Some(tree.root().id()));
    }

    #[test]
    fn test_root_identifier_must_be_unique() {
        let mut tree = HelpTree::default();
        tree.root_mut()
            .add_text(Text::new("child").id("help"))
            .unwrap();
        let err = tree.with_root_id("help").unwrap_err();
        assert_eq!(err, TreeError::DuplicateIdentifier("help".to_string()));

        let tree = sample().with_root_id("grep").unwrap();
        assert_eq!(tree.identifiers(), vec!["grep", "usage", "options", "quiet"]);
        let tree = tree.with_root_id("grep").unwrap();
        assert_eq!(tree.lookup("grep"), Some(ItemId::ROOT));
    }
}
