//! Structured export for documentation generators.
//!
//! Export turns a tree into [`Fragment`]s whose inline content is a list
//! of `(kind, text)` [`Span`]s. Styling is left to the consumer, which maps
//! span kinds onto its own markup. Every fragment type serializes with
//! `serde`.

use linotype_markup::Span;
use serde::Serialize;

use crate::error::Result;
use crate::formatter::Formatter;
use crate::markup::{definition_spans, text_spans};
use crate::tree::{HelpTree, ItemId, ItemKind};

/// Options for [`HelpTree::export`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Export only this item and its descendants.
    pub item_id: Option<String>,
    /// Export the selected item's children without the item itself.
    pub children: bool,
    /// Override every formatter's `auto_markup` flag.
    pub auto_markup: Option<bool>,
    /// Override every formatter's `manual_markup` flag.
    pub manual_markup: Option<bool>,
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_id(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    pub fn children(mut self, children: bool) -> Self {
        self.children = children;
        self
    }

    pub fn auto_markup(mut self, auto_markup: bool) -> Self {
        self.auto_markup = Some(auto_markup);
        self
    }

    pub fn manual_markup(mut self, manual_markup: bool) -> Self {
        self.manual_markup = Some(manual_markup);
        self
    }

    fn apply(&self, formatter: &Formatter) -> Formatter {
        let mut formatter = formatter.clone();
        if let Some(auto_markup) = self.auto_markup {
            formatter.auto_markup = auto_markup;
        }
        if let Some(manual_markup) = self.manual_markup {
            formatter.manual_markup = manual_markup;
        }
        formatter
    }
}

/// One exported item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub id: Option<String>,
    pub blocks: Vec<Block>,
    pub children: Vec<Fragment>,
}

/// A block of exported content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    Paragraph(Vec<Span>),
    Definition {
        /// The term and argument string.
        term: Vec<Span>,
        description: Vec<Span>,
    },
    /// Spliced text, passed through untouched.
    Raw(String),
}

impl HelpTree {
    /// Exports the tree, or a selection of it, as fragments.
    ///
    /// Items hidden from terminal output are exported too. A root
    /// container becomes a fragment of its own only when it carries an
    /// identifier or raw content; otherwise its children are returned.
    ///
    /// ```rust
    /// use linotype::{Block, ExportOptions, HelpTree, Span};
    ///
    /// let mut tree = HelpTree::default();
    /// tree.root_mut().add_text("Read *FILE*.").unwrap();
    ///
    /// let fragments = tree.export(&ExportOptions::new()).unwrap();
    /// assert_eq!(
    ///     fragments[0].blocks,
    ///     vec![Block::Paragraph(vec![
    ///         Span::plain("Read "),
    ///         Span::emphasis("FILE"),
    ///         Span::plain("."),
    ///     ])]
    /// );
    /// ```
    pub fn export(&self, options: &ExportOptions) -> Result<Vec<Fragment>> {
        let selected;
        let tree = match &options.item_id {
            Some(item_id) => {
                selected = self.select(item_id, !options.children)?;
                &selected
            }
            None => self,
        };

        let exporter = Exporter { tree, options };
        let formatter = options.apply(tree.formatter());
        let root = tree.node(ItemId::ROOT);
        if root.identifier.is_none() && root.raw.is_empty() {
            let formatter = root
                .formatter
                .as_ref()
                .map(|f| options.apply(f))
                .unwrap_or(formatter);
            Ok(root
                .children
                .iter()
                .map(|&child| exporter.fragment(child, &formatter))
                .collect())
        } else {
            Ok(vec![exporter.fragment(ItemId::ROOT, &formatter)])
        }
    }
}

struct Exporter<'a> {
    tree: &'a HelpTree,
    options: &'a ExportOptions,
}

impl Exporter<'_> {
    fn fragment(&self, id: ItemId, inherited: &Formatter) -> Fragment {
        let node = self.tree.node(id);
        let formatter = match &node.formatter {
            Some(own) => self.options.apply(own),
            None => inherited.clone(),
        };

        let mut blocks: Vec<Block> = node.raw.before.iter().cloned().map(Block::Raw).collect();
        match &node.raw.replace {
            Some(raw) => blocks.push(Block::Raw(raw.clone())),
            None => match &node.kind {
                ItemKind::Root => {}
                ItemKind::Text(text) => {
                    for paragraph in text.split('\n').map(str::trim) {
                        if !paragraph.is_empty() {
                            blocks.push(Block::Paragraph(text_spans(paragraph, &formatter)));
                        }
                    }
                }
                ItemKind::Definition(def) => {
                    let spans =
                        definition_spans(&def.term, &def.args, &def.description, &formatter);
                    blocks.push(Block::Definition {
                        term: spans.signature,
                        description: spans.description,
                    });
                }
            },
        }
        blocks.extend(node.raw.after.iter().cloned().map(Block::Raw));

        Fragment {
            id: node.identifier.clone(),
            blocks,
            children: node
                .children
                .iter()
                .map(|&child| self.fragment(child, &formatter))
                .collect(),
        }
    }
}
