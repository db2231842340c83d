//! Layout surfaces and the layout engine seam.
//!
//! Each tab owns a [`LayoutSurface`]: its current document, its
//! [`VisualState`], and the geometry the engine last computed for it. The
//! engine itself is a collaborator behind [`LayoutEngine`]; [`FlowLayout`] is
//! the reference implementation.

mod flow;

pub use flow::FlowLayout;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::document::{DocumentTree, NodeId};
use crate::errors::LayoutError;

/// How a tab's container takes part in presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualState {
    Visible,
    /// In the layout tree with zero opacity and no interaction. Only ever
    /// held while a hidden tab is being measured.
    SuppressedForLayout,
    Hidden,
}

impl VisualState {
    pub fn opacity(self) -> f32 {
        match self {
            VisualState::Visible => 1.0,
            VisualState::SuppressedForLayout | VisualState::Hidden => 0.0,
        }
    }

    pub fn participates_in_layout(self) -> bool {
        !matches!(self, VisualState::Hidden)
    }

    pub fn is_interactive(self) -> bool {
        matches!(self, VisualState::Visible)
    }

    /// Whether the user can see the tab. Suppressed and hidden are
    /// indistinguishable here.
    pub fn is_perceptible(self) -> bool {
        self.opacity() > 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutBox {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryState {
    /// Nothing computed since the document was last replaced.
    Unmeasured,
    /// The engine ran while the surface was out of the layout tree and
    /// produced zero-sized boxes.
    Collapsed,
    Measured,
}

/// Per-node boxes, indexed by [`NodeId`].
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    state: GeometryState,
    boxes: Vec<LayoutBox>,
}

impl Geometry {
    pub fn unmeasured() -> Self {
        Self {
            state: GeometryState::Unmeasured,
            boxes: Vec::new(),
        }
    }

    pub fn collapsed(node_count: usize) -> Self {
        Self {
            state: GeometryState::Collapsed,
            boxes: vec![LayoutBox::default(); node_count],
        }
    }

    pub fn measured(boxes: Vec<LayoutBox>) -> Self {
        Self {
            state: GeometryState::Measured,
            boxes,
        }
    }

    pub fn state(&self) -> GeometryState {
        self.state
    }

    pub fn is_measured(&self) -> bool {
        self.state == GeometryState::Measured
    }

    pub fn get(&self, node: NodeId) -> Option<LayoutBox> {
        match self.state {
            GeometryState::Unmeasured => None,
            _ => self.boxes.get(node.0).copied(),
        }
    }

    pub fn size_of(&self, node: NodeId) -> Option<Size> {
        self.get(node).map(|b| b.size())
    }

    /// Deepest node whose box contains the point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<NodeId> {
        if !self.is_measured() {
            return None;
        }
        self.boxes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, b)| b.contains(x, y))
            .map(|(i, _)| NodeId(i))
    }
}

/// A tab's document as the layout engine sees it.
#[derive(Debug, Clone)]
pub struct LayoutSurface {
    document: Arc<DocumentTree>,
    visual_state: VisualState,
    viewport: Size,
    geometry: Geometry,
    passes: u64,
}

impl LayoutSurface {
    pub fn new(viewport: Size) -> Self {
        Self {
            document: Arc::new(DocumentTree::new()),
            visual_state: VisualState::Hidden,
            viewport,
            geometry: Geometry::unmeasured(),
            passes: 0,
        }
    }

    pub fn document(&self) -> &DocumentTree {
        &self.document
    }

    /// A shared handle to the current document. Holders keep seeing this
    /// tree even after the surface swaps in a new one.
    pub fn document_snapshot(&self) -> Arc<DocumentTree> {
        Arc::clone(&self.document)
    }

    pub fn visual_state(&self) -> VisualState {
        self.visual_state
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Number of layout passes stored since the surface was created.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Called by engines at the end of a pass.
    pub fn store_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
        self.passes += 1;
    }

    pub(crate) fn set_visual_state(&mut self, state: VisualState) {
        self.visual_state = state;
    }

    pub(crate) fn replace_document(&mut self, document: Arc<DocumentTree>) {
        self.document = document;
        self.geometry = Geometry::unmeasured();
    }

    /// Drop cached geometry so the next read must come from a fresh pass.
    pub(crate) fn invalidate(&mut self) {
        self.geometry = Geometry::unmeasured();
    }
}

/// The box-layout collaborator. Invoked synchronously on the UI thread.
pub trait LayoutEngine {
    /// Recompute every box of the surface's document from scratch.
    fn recompute(&mut self, surface: &mut LayoutSurface) -> Result<(), LayoutError>;

    /// Size of a node from the last pass.
    fn measure(&self, surface: &LayoutSurface, node: NodeId) -> Option<Size>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppressed_is_not_perceptible_but_laid_out() {
        let s = VisualState::SuppressedForLayout;
        assert_eq!(s.opacity(), 0.0);
        assert!(!s.is_perceptible());
        assert!(!s.is_interactive());
        assert!(s.participates_in_layout());

        let h = VisualState::Hidden;
        assert_eq!(h.is_perceptible(), s.is_perceptible());
        assert!(!h.participates_in_layout());
        assert!(VisualState::Visible.is_interactive());
    }

    #[test]
    fn unmeasured_geometry_has_no_sizes() {
        let g = Geometry::unmeasured();
        assert_eq!(g.size_of(NodeId::ROOT), None);
        assert_eq!(g.hit_test(0.0, 0.0), None);
    }

    #[test]
    fn collapsed_geometry_reports_zero() {
        let g = Geometry::collapsed(3);
        assert_eq!(g.size_of(NodeId(2)), Some(Size::ZERO));
        assert_eq!(g.size_of(NodeId(3)), None);
    }

    #[test]
    fn hit_test_prefers_deepest_box() {
        let g = Geometry::measured(vec![
            LayoutBox {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 100.0,
            },
            LayoutBox {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 20.0,
            },
        ]);
        assert_eq!(g.hit_test(5.0, 5.0), Some(NodeId(1)));
        assert_eq!(g.hit_test(5.0, 50.0), Some(NodeId(0)));
        assert_eq!(g.hit_test(500.0, 5.0), None);
    }

    #[test]
    fn replacing_document_drops_geometry() {
        let mut surface = LayoutSurface::new(Size::new(100.0, 100.0));
        surface.store_geometry(Geometry::measured(vec![LayoutBox::default()]));
        assert_eq!(surface.passes(), 1);
        let old = surface.document_snapshot();
        surface.replace_document(Arc::new(DocumentTree::new()));
        assert!(!surface.geometry().is_measured());
        assert!(!Arc::ptr_eq(&old, &surface.document_snapshot()));
    }
}
