//! Plain-text rendering.
//!
//! Items render depth first. Each level is indented by the effective
//! formatter's `indent_width`; root containers add no level. Definitions
//! that share a parent and the [`DefinitionStyle::Aligned`] layout pad
//! their signatures to a common column.

use std::fmt;

use crate::error::Result;
use crate::formatter::{DefinitionStyle, Formatter};
use crate::markup::{
    definition_spans, paint_words, signature_width, styled_words, text_spans, word_width,
    wrap_spans, Word,
};
use crate::tree::{DefinitionContent, HelpTree, ItemId, ItemKind};
use crate::wrap::{break_lines, pad_right, spaces};

/// Options for [`HelpTree::render_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Render only this item and its descendants.
    pub item_id: Option<String>,
    /// Render at most this many levels below the starting point.
    pub levels: Option<usize>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_id(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    pub fn levels(mut self, levels: usize) -> Self {
        self.levels = Some(levels);
        self
    }
}

impl HelpTree {
    /// Renders the whole tree.
    pub fn render(&self) -> String {
        let mut renderer = Renderer::new(self, None);
        renderer.render_item(ItemId::ROOT, self.formatter(), 0, 0, None);
        renderer.finish()
    }

    /// Renders the tree or one of its items.
    ///
    /// An item selected with `item_id` renders in place: it keeps the
    /// formatter it inherits from its ancestors and the aligned column of
    /// its siblings, but starts at indentation zero.
    pub fn render_with(&self, options: &RenderOptions) -> Result<String> {
        let mut renderer = Renderer::new(self, options.levels);
        match &options.item_id {
            Some(identifier) => {
                let id = self.require(identifier)?;
                let (inherited, column) = match self.node(id).parent {
                    Some(parent) => {
                        let inherited = self.effective_formatter(parent);
                        (inherited, renderer.aligned_column(parent, inherited))
                    }
                    None => (self.formatter(), None),
                };
                renderer.render_item(id, inherited, 0, 0, column);
            }
            None => renderer.render_item(ItemId::ROOT, self.formatter(), 0, 0, None),
        }
        tracing::debug!(
            item_id = ?options.item_id,
            levels = ?options.levels,
            lines = renderer.lines.len(),
            "rendered help tree"
        );
        Ok(renderer.finish())
    }
}

impl fmt::Display for HelpTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

struct Renderer<'a> {
    tree: &'a HelpTree,
    levels: Option<usize>,
    lines: Vec<String>,
}

impl<'a> Renderer<'a> {
    fn new(tree: &'a HelpTree, levels: Option<usize>) -> Self {
        Self {
            tree,
            levels,
            lines: Vec::new(),
        }
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }

    fn render_item(
        &mut self,
        id: ItemId,
        inherited: &'a Formatter,
        depth: usize,
        indent: usize,
        column: Option<usize>,
    ) {
        let tree = self.tree;
        let node = tree.node(id);
        let formatter = node.formatter.as_ref().unwrap_or(inherited);
        if self.levels.is_some_and(|levels| depth >= levels) {
            return;
        }

        // Raw text spliced after a root container follows its children
        if matches!(node.kind, ItemKind::Root) {
            if formatter.visible {
                for block in node.raw.before.iter().chain(&node.raw.replace) {
                    self.push_raw(block, indent);
                }
            }
            self.render_children(id, formatter, depth, indent);
            if formatter.visible {
                for block in &node.raw.after {
                    self.push_raw(block, indent);
                }
            }
            return;
        }

        if formatter.visible {
            self.render_content(id, formatter, indent, column);
        }
        self.render_children(id, formatter, depth + 1, indent + formatter.indent_width);
    }

    fn render_children(
        &mut self,
        parent: ItemId,
        formatter: &'a Formatter,
        depth: usize,
        indent: usize,
    ) {
        let tree = self.tree;
        let column = self.aligned_column(parent, formatter);
        for &child in &tree.node(parent).children {
            self.render_item(child, formatter, depth, indent, column);
        }
    }

    /// The widest signature among the children of `parent` that use the
    /// aligned layout.
    fn aligned_column(&self, parent: ItemId, formatter: &Formatter) -> Option<usize> {
        self.tree
            .node(parent)
            .children
            .iter()
            .filter_map(|&child| {
                let node = self.tree.node(child);
                let ItemKind::Definition(def) = &node.kind else {
                    return None;
                };
                let formatter = node.formatter.as_ref().unwrap_or(formatter);
                let style = def.style.unwrap_or(formatter.definition_style);
                (style == DefinitionStyle::Aligned)
                    .then(|| signature_width(&def.term, &def.args, formatter))
            })
            .max()
    }

    fn render_content(
        &mut self,
        id: ItemId,
        formatter: &Formatter,
        indent: usize,
        column: Option<usize>,
    ) {
        let tree = self.tree;
        let node = tree.node(id);
        for block in &node.raw.before {
            self.push_raw(block, indent);
        }
        match &node.raw.replace {
            Some(block) => self.push_raw(block, indent),
            None => match &node.kind {
                ItemKind::Root => {}
                ItemKind::Text(text) => self.render_text(text, formatter, indent),
                ItemKind::Definition(def) => {
                    self.render_definition(def, formatter, indent, column)
                }
            },
        }
        for block in &node.raw.after {
            self.push_raw(block, indent);
        }
    }

    fn push_raw(&mut self, block: &str, indent: usize) {
        for line in block.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.lines.push(String::new());
            } else {
                self.lines.push(format!("{}{}", spaces(indent), line));
            }
        }
    }

    fn render_text(&mut self, text: &str, formatter: &Formatter, indent: usize) {
        if text == "\n" {
            self.lines.push(String::new());
            return;
        }
        if text.is_empty() {
            return;
        }

        let styles = formatter.markup_styles();
        let width = formatter.effective_width();
        for paragraph in text.split('\n') {
            let spans = text_spans(paragraph, formatter);
            let lines = wrap_spans(&spans, &styles, width, indent, indent);
            if lines.is_empty() {
                self.lines.push(String::new());
            } else {
                self.lines.extend(lines);
            }
        }
    }

    fn render_definition(
        &mut self,
        def: &DefinitionContent,
        formatter: &Formatter,
        indent: usize,
        column: Option<usize>,
    ) {
        let spans = definition_spans(&def.term, &def.args, &def.description, formatter);
        let styles = formatter.markup_styles();
        let width = formatter.effective_width();
        let step = formatter.indent_width;
        let gap = formatter.definition_gap;

        let signature = wrap_spans(&spans.signature, &styles, width, indent, indent + step);
        let description = styled_words(&spans.description);
        if description.is_empty() {
            self.lines.extend(signature);
            return;
        }

        let style = def.style.unwrap_or(formatter.definition_style);
        let (first, hanging) = match style {
            DefinitionStyle::Aligned | DefinitionStyle::Inline => {
                let own = signature_width(&def.term, &def.args, formatter);
                let column = match style {
                    DefinitionStyle::Aligned => column.unwrap_or(own),
                    _ => own,
                };
                let start = indent + column + gap;
                let hanging = match style {
                    DefinitionStyle::Aligned => start,
                    _ => indent + step,
                };
                // A blank term and argument string still holds the column
                let lead = match signature.as_slice() {
                    [] => Some(""),
                    [line] => Some(line.as_str()),
                    _ => None,
                };
                let fits = start + word_width(&description[0]) <= width;
                if let Some(lead) = lead.filter(|_| fits) {
                    let widths: Vec<usize> = description.iter().map(|w| word_width(w)).collect();
                    for (i, range) in break_lines(&widths, width, start, hanging)
                        .into_iter()
                        .enumerate()
                    {
                        let text = paint_words(&description[range], &styles);
                        if i == 0 {
                            let padded = pad_right(lead, indent + column);
                            self.lines.push(format!("{}{}{}", padded, spaces(gap), text));
                        } else {
                            self.lines.push(format!("{}{}", spaces(hanging), text));
                        }
                    }
                    return;
                }
                tracing::trace!(term = %def.term, "description does not fit beside the signature");
                (indent + step, indent + step)
            }
            DefinitionStyle::Heading => (indent + step, indent + step),
            DefinitionStyle::Overflow => {
                let start = indent + column.map_or(step, |column| column + gap);
                (start, start + step)
            }
        };

        self.lines.extend(signature);
        self.push_words(&description, &styles, width, first, hanging);
    }

    fn push_words(
        &mut self,
        words: &[Word],
        styles: &linotype_markup::MarkupStyles,
        width: usize,
        first: usize,
        hanging: usize,
    ) {
        let widths: Vec<usize> = words.iter().map(|w| word_width(w)).collect();
        for (i, range) in break_lines(&widths, width, first, hanging).into_iter().enumerate() {
            let indent = if i == 0 { first } else { hanging };
            self.lines
                .push(format!("{}{}", spaces(indent), paint_words(&words[range], styles)));
        }
    }
}
