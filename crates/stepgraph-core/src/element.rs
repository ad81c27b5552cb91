//! Observable vertices and edges.
//!
//! Every color, highlight and read operation on an [`Element`] is appended
//! to the owning graph's [`Recorder`] before it takes effect. Elements use
//! interior mutability so an algorithm can hold several of them at once
//! while the graph itself stays immutably borrowed.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use stepgraph_topology::Vector2;

use crate::error::{Error, Result};
use crate::event::{ElementId, GraphEvent, Recorder};

/// Visual state shared by live elements and replay shadows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    /// Palette index; 0 is the default
    pub color: u32,
    /// Highlight tags currently applied
    pub highlights: BTreeSet<u32>,
}

impl ElementState {
    /// Replace the color.
    pub fn set_color(&mut self, color: u32) {
        self.color = color;
    }

    /// Insert a highlight tag (no-op if present).
    pub fn add_highlight(&mut self, tag: u32) {
        self.highlights.insert(tag);
    }

    /// Remove a highlight tag (no-op if absent).
    pub fn remove_highlight(&mut self, tag: u32) {
        self.highlights.remove(&tag);
    }

    /// Remove every highlight tag.
    pub fn clear_highlights(&mut self) {
        self.highlights.clear();
    }
}

/// Recorded color/highlight state plus private auxiliary slots.
#[derive(Debug)]
pub struct Element<A> {
    id: ElementId,
    state: RefCell<ElementState>,
    auxiliary: RefCell<Option<Vec<A>>>,
    recorder: Recorder,
}

impl<A: Clone> Element<A> {
    /// Create an element. The auxiliary template is cloned so every element
    /// gets independent scratch storage.
    pub(crate) fn new(id: ElementId, auxiliary: Option<&[A]>, recorder: Recorder) -> Self {
        Self {
            id,
            state: RefCell::new(ElementState::default()),
            auxiliary: RefCell::new(auxiliary.map(<[A]>::to_vec)),
            recorder,
        }
    }

    /// Copy of the whole auxiliary array.
    pub fn auxiliary(&self) -> Result<Vec<A>> {
        self.auxiliary
            .borrow()
            .clone()
            .ok_or_else(|| self.uninitialized())
    }

    /// Read one auxiliary slot.
    pub fn auxiliary_value(&self, index: usize) -> Result<A> {
        let slots = self.auxiliary.borrow();
        let slots = slots.as_ref().ok_or_else(|| self.uninitialized())?;
        slots.get(index).cloned().ok_or_else(|| Error::AuxiliaryIndex {
            element: self.id.to_string(),
            index,
            len: slots.len(),
        })
    }
}

impl<A> Element<A> {
    /// Identity used in the event log.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Current color.
    pub fn color(&self) -> u32 {
        self.state.borrow().color
    }

    /// Whether a highlight tag is applied.
    pub fn has_highlight(&self, tag: u32) -> bool {
        self.state.borrow().highlights.contains(&tag)
    }

    /// Copy of the current visual state.
    pub fn state(&self) -> ElementState {
        self.state.borrow().clone()
    }

    /// Replace the color.
    pub fn set_color(&self, color: u32) -> &Self {
        self.recorder.record(GraphEvent::Color { target: self.id, color });
        self.state.borrow_mut().set_color(color);
        self
    }

    /// Add a highlight tag. Emits an event even when the tag is present.
    pub fn add_highlight(&self, tag: u32) -> &Self {
        self.recorder.record(GraphEvent::HighlightAdd { target: self.id, tag });
        self.state.borrow_mut().add_highlight(tag);
        self
    }

    /// Remove a highlight tag. Emits an event even when the tag is absent.
    pub fn remove_highlight(&self, tag: u32) -> &Self {
        self.recorder.record(GraphEvent::HighlightRemove { target: self.id, tag });
        self.state.borrow_mut().remove_highlight(tag);
        self
    }

    /// Clear all highlight tags with a single event.
    pub fn clear_highlight(&self) -> &Self {
        self.recorder.record(GraphEvent::HighlightClear { target: self.id });
        self.state.borrow_mut().clear_highlights();
        self
    }

    /// Mark this element as looked at.
    pub fn read(&self) -> &Self {
        self.recorder.record(GraphEvent::Read { target: self.id });
        self
    }

    /// Write one auxiliary slot.
    pub fn set_auxiliary_value(&self, index: usize, value: A) -> Result<&Self> {
        let mut slots = self.auxiliary.borrow_mut();
        let slots = slots.as_mut().ok_or_else(|| self.uninitialized())?;
        let len = slots.len();
        let slot = slots.get_mut(index).ok_or_else(|| Error::AuxiliaryIndex {
            element: self.id.to_string(),
            index,
            len,
        })?;
        *slot = value;
        Ok(self)
    }

    fn uninitialized(&self) -> Error {
        Error::AuxiliaryUninitialized {
            element: self.id.to_string(),
        }
    }
}

/// A vertex: an observable element with a drawing position.
#[derive(Debug)]
pub struct Vertex<A> {
    element: Element<A>,
    index: usize,
    position: Vector2,
}

impl<A: Clone> Vertex<A> {
    pub(crate) fn new(index: usize, position: Vector2, auxiliary: Option<&[A]>, recorder: Recorder) -> Self {
        Self {
            element: Element::new(ElementId::Vertex(index), auxiliary, recorder),
            index,
            position,
        }
    }
}

impl<A> Vertex<A> {
    /// Vertex label.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Drawing position (not recorded).
    pub fn position(&self) -> Vector2 {
        self.position
    }
}

impl<A> Deref for Vertex<A> {
    type Target = Element<A>;

    fn deref(&self) -> &Element<A> {
        &self.element
    }
}

/// A directed half-edge: an observable element with endpoints and weight.
#[derive(Debug)]
pub struct Edge<A> {
    element: Element<A>,
    from: usize,
    to: usize,
    weight: i64,
    directed: bool,
}

impl<A: Clone> Edge<A> {
    pub(crate) fn new(
        from: usize,
        to: usize,
        weight: i64,
        directed: bool,
        auxiliary: Option<&[A]>,
        recorder: Recorder,
    ) -> Self {
        Self {
            element: Element::new(ElementId::Edge(from, to), auxiliary, recorder),
            from,
            to,
            weight,
            directed,
        }
    }
}

impl<A> Edge<A> {
    /// Source endpoint.
    pub fn from(&self) -> usize {
        self.from
    }

    /// Target endpoint.
    pub fn to(&self) -> usize {
        self.to
    }

    /// Edge weight.
    pub fn weight(&self) -> i64 {
        self.weight
    }

    /// Whether the owning graph is directed.
    pub fn directed(&self) -> bool {
        self.directed
    }
}

impl<A> Deref for Edge<A> {
    type Target = Element<A>;

    fn deref(&self) -> &Element<A> {
        &self.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(aux: Option<&[bool]>) -> (Vertex<bool>, Recorder) {
        let recorder = Recorder::new();
        (Vertex::new(2, Vector2::ZERO, aux, recorder.clone()), recorder)
    }

    #[test]
    fn color_emits_and_applies() {
        let (v, rec) = vertex(None);
        v.set_color(3);
        assert_eq!(v.color(), 3);
        assert_eq!(
            rec.events(),
            vec![GraphEvent::Color { target: ElementId::Vertex(2), color: 3 }]
        );
    }

    #[test]
    fn highlights_are_idempotent_but_still_recorded() {
        let (v, rec) = vertex(None);
        v.add_highlight(1).add_highlight(1);
        v.remove_highlight(5);
        assert!(v.has_highlight(1));
        assert_eq!(v.state().highlights.len(), 1);
        assert_eq!(rec.len(), 3);
    }

    #[test]
    fn clear_emits_single_event() {
        let (v, rec) = vertex(None);
        v.add_highlight(1).add_highlight(2).add_highlight(3);
        v.clear_highlight();
        assert!(v.state().highlights.is_empty());
        assert_eq!(rec.len(), 4);
        assert_eq!(
            rec.events().last(),
            Some(&GraphEvent::HighlightClear { target: ElementId::Vertex(2) })
        );
    }

    #[test]
    fn read_is_fluent() {
        let (v, rec) = vertex(None);
        assert_eq!(v.read().id(), ElementId::Vertex(2));
        assert_eq!(rec.events(), vec![GraphEvent::Read { target: ElementId::Vertex(2) }]);
    }

    #[test]
    fn auxiliary_requires_template() {
        let (v, _) = vertex(None);
        assert!(matches!(v.auxiliary_value(0), Err(Error::AuxiliaryUninitialized { .. })));
        assert!(matches!(v.set_auxiliary_value(0, true), Err(Error::AuxiliaryUninitialized { .. })));
        assert!(v.auxiliary().is_err());
    }

    #[test]
    fn auxiliary_slots_are_independent_copies() {
        let template = [false, false];
        let recorder = Recorder::new();
        let a = Vertex::new(0, Vector2::ZERO, Some(&template[..]), recorder.clone());
        let b = Vertex::new(1, Vector2::ZERO, Some(&template[..]), recorder.clone());

        a.set_auxiliary_value(1, true).unwrap();
        assert_eq!(a.auxiliary_value(1), Ok(true));
        assert_eq!(b.auxiliary_value(1), Ok(false));
        assert_eq!(template, [false, false]);
        // Auxiliary access is not recorded
        assert!(recorder.is_empty());
    }

    #[test]
    fn auxiliary_index_checked() {
        let (v, _) = vertex(Some(&[false]));
        assert_eq!(
            v.auxiliary_value(3),
            Err(Error::AuxiliaryIndex { element: "vertex 2".into(), index: 3, len: 1 })
        );
    }

    // Compiles only if recording methods need no bound on the auxiliary type.
    fn touch<A>(edge: &Edge<A>) -> ElementId {
        edge.read().set_color(2).add_highlight(1).remove_highlight(1).clear_highlight().id()
    }

    #[test]
    fn recording_methods_are_unbounded() {
        let recorder = Recorder::new();
        let e: Edge<u8> = Edge::new(0, 1, 5, false, None, recorder.clone());
        assert_eq!(touch(&e), ElementId::Edge(0, 1));
        assert_eq!(e.color(), 2);
        assert_eq!(recorder.len(), 5);
    }

    #[test]
    fn edge_accessors() {
        let e: Edge<()> = Edge::new(1, 4, -7, true, None, Recorder::new());
        assert_eq!((e.from(), e.to(), e.weight(), e.directed()), (1, 4, -7, true));
        assert_eq!(e.id(), ElementId::Edge(1, 4));
    }
}
