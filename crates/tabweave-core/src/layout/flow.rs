//! Deterministic flow layout.
//!
//! Blocks stack their children, text wraps at word boundaries on a fixed
//! character grid, and flex rows share free width by grow factor after every
//! child has its minimum. Like most host engines it does not measure surfaces
//! that are out of the layout tree: a hidden surface collapses to zero.

use tracing::trace;

use crate::document::{DocumentTree, NodeId, NodeKind};
use crate::errors::LayoutError;

use super::{Geometry, LayoutBox, LayoutEngine, LayoutSurface, Size};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowLayout {
    char_width: f64,
    line_height: f64,
}

impl FlowLayout {
    pub fn new(char_width: f64, line_height: f64) -> Self {
        Self {
            char_width,
            line_height,
        }
    }

    fn scale(kind: &NodeKind) -> f64 {
        match kind {
            NodeKind::Heading { level: 1, .. } => 1.5,
            NodeKind::Heading { level: 2, .. } => 1.25,
            NodeKind::Heading { .. } => 1.1,
            _ => 1.0,
        }
    }

    /// Narrowest width a node can take without overflowing a word.
    fn min_content(&self, doc: &DocumentTree, id: NodeId) -> f64 {
        let Some(node) = doc.node(id) else {
            return 0.0;
        };
        let cw = self.char_width * Self::scale(&node.kind);
        let content = match &node.kind {
            NodeKind::Block => node
                .children
                .iter()
                .map(|&c| self.min_content(doc, c))
                .fold(0.0, f64::max),
            NodeKind::FlexRow => node.children.iter().map(|&c| self.min_content(doc, c)).sum(),
            NodeKind::Preformatted(text) => {
                if text.is_empty() {
                    0.0
                } else {
                    cw
                }
            }
            kind => {
                let longest = kind
                    .inline_text()
                    .unwrap_or_default()
                    .split_whitespace()
                    .map(|w| w.chars().count())
                    .max()
                    .unwrap_or(0);
                longest as f64 * cw
            }
        };
        content.max(node.min_width)
    }

    /// Lays out `id` at (`x`, `y`) within `width` and returns its height.
    fn place(
        &self,
        doc: &DocumentTree,
        id: NodeId,
        x: f64,
        y: f64,
        width: f64,
        boxes: &mut [LayoutBox],
    ) -> f64 {
        let Some(node) = doc.node(id) else {
            return 0.0;
        };
        let mut box_width = width;
        let height = match &node.kind {
            NodeKind::Block => {
                let mut cursor = y;
                for &child in &node.children {
                    cursor += self.place(doc, child, x, cursor, width, boxes);
                }
                cursor - y
            }
            NodeKind::FlexRow => {
                let mins: Vec<f64> = node
                    .children
                    .iter()
                    .map(|&c| self.min_content(doc, c))
                    .collect();
                let total_min: f64 = mins.iter().sum();
                let free = (width - total_min).max(0.0);
                let total_grow: f64 = node
                    .children
                    .iter()
                    .filter_map(|&c| doc.node(c))
                    .map(|n| n.grow)
                    .sum();

                let mut cursor = x;
                let mut tallest: f64 = 0.0;
                for (&child, min) in node.children.iter().zip(&mins) {
                    let grow = doc.node(child).map_or(0.0, |n| n.grow);
                    let share = if total_grow > 0.0 {
                        free * grow / total_grow
                    } else {
                        0.0
                    };
                    let child_width = min + share;
                    tallest = tallest.max(self.place(doc, child, cursor, y, child_width, boxes));
                    cursor += child_width;
                }
                box_width = width.max(total_min);
                tallest
            }
            NodeKind::Preformatted(text) => {
                let per_line = self.per_line(width, 1.0);
                let lines: usize = text
                    .lines()
                    .map(|l| l.chars().count().div_ceil(per_line).max(1))
                    .sum();
                lines as f64 * self.line_height
            }
            kind => {
                let scale = Self::scale(kind);
                let per_line = self.per_line(width, scale);
                let lines = wrap_lines(kind.inline_text().unwrap_or_default(), per_line);
                lines as f64 * self.line_height * scale
            }
        };
        if let Some(slot) = boxes.get_mut(id.0) {
            *slot = LayoutBox {
                x,
                y,
                width: box_width,
                height,
            };
        }
        height
    }

    fn per_line(&self, width: f64, scale: f64) -> usize {
        ((width / (self.char_width * scale)).floor() as usize).max(1)
    }
}

/// Greedy word wrap; words longer than a line spill over several lines.
fn wrap_lines(text: &str, per_line: usize) -> usize {
    let mut lines = 0;
    let mut used = 0;
    for word in text.split_whitespace() {
        let len = word.chars().count();
        if used > 0 && used + 1 + len <= per_line {
            used += 1 + len;
            continue;
        }
        lines += len.div_ceil(per_line).max(1);
        used = match len % per_line {
            0 => per_line,
            rest => rest,
        };
    }
    lines
}

impl LayoutEngine for FlowLayout {
    fn recompute(&mut self, surface: &mut LayoutSurface) -> Result<(), LayoutError> {
        let doc = surface.document_snapshot();
        if !surface.visual_state().participates_in_layout() {
            trace!(nodes = doc.len(), "surface out of layout tree, collapsing");
            surface.store_geometry(Geometry::collapsed(doc.len()));
            return Ok(());
        }

        let viewport = surface.viewport();
        if !(viewport.width.is_finite() && viewport.width > 0.0) {
            return Err(LayoutError::Engine(format!(
                "viewport width must be positive, got {}",
                viewport.width
            )));
        }
        if !(self.char_width > 0.0 && self.line_height > 0.0) {
            return Err(LayoutError::Engine("character grid must be positive".into()));
        }

        let mut boxes = vec![LayoutBox::default(); doc.len()];
        self.place(&doc, doc.root(), 0.0, 0.0, viewport.width, &mut boxes);
        surface.store_geometry(Geometry::measured(boxes));
        Ok(())
    }

    fn measure(&self, surface: &LayoutSurface, node: NodeId) -> Option<Size> {
        surface.geometry().size_of(node)
    }
}
