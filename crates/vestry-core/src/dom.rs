#![forbid(unsafe_code)]

//! Headless document model.
//!
//! A [`Document`] is an arena of elements rooted at a single body element.
//! It mirrors the slice of the host page the behavior layer reads and
//! mutates: structure, attributes, classes, text, form state, and keyboard
//! focus.
//!
//! # Invariants
//!
//! 1. Removing an element only detaches it (and its subtree) from the root;
//!    the handle keeps working but [`Document::is_attached`] reports `false`.
//!    [`Document::discard`] frees a subtree instead. Its slots are recycled
//!    under a new generation, so old handles to them become inert.
//! 2. The active element is either `None` or an attached, enabled element.
//!    Detaching the focused element clears focus.
//! 3. The tree is acyclic: [`Document::append_child`] refuses to move an
//!    element under its own descendant.
//! 4. Focusable sets are derived on every query; nothing is cached.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Foreign handle | `ElementId` from another document | Queries return empty/`None`, mutations no-op |
//! | Stale handle | Element was discarded | Same as a foreign handle |
//! | Cycle | Appending an ancestor under its descendant | `append_child` returns `false` |
//! | Focus refused | Detached, disabled, or non-focusable target | `focus` returns `false`, focus unchanged |

use ahash::AHashMap;

/// Handle to an element in a [`Document`].
///
/// Carries the generation of its arena slot; a handle outlived by a
/// [`Document::discard`] never aliases the slot's next occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    index: u32,
    generation: u32,
}

impl ElementId {
    /// Raw arena index.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Slot generation; bumped each time the slot is freed.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

/// Element kinds the behavior layer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// The document body.
    Root,
    Container,
    Heading,
    Paragraph,
    List,
    ListItem,
    Button,
    Link,
    Input,
    TextArea,
    Checkbox,
    Image,
    Code,
    Form,
    Span,
    Strong,
    Emphasis,
}

impl ElementKind {
    /// Kinds that take part in sequential focus navigation by default.
    #[inline]
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        matches!(
            self,
            Self::Button | Self::Link | Self::Input | Self::TextArea | Self::Checkbox
        )
    }
}

#[derive(Debug, Clone)]
struct Node {
    kind: ElementKind,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attrs: AHashMap<String, String>,
    classes: Vec<String>,
    text: String,
    value: String,
    checked: bool,
    disabled: bool,
    tab_index: Option<i32>,
}

impl Node {
    fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attrs: AHashMap::new(),
            classes: Vec::new(),
            text: String::new(),
            value: String::new(),
            checked: false,
            disabled: false,
            tab_index: None,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// In-memory document with focus tracking.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: ElementId,
    focused: Option<ElementId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only the root element.
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node::new(ElementKind::Root)),
            }],
            free: Vec::new(),
            root: ElementId {
                index: 0,
                generation: 0,
            },
            focused: None,
        }
    }

    /// The root (body) element.
    #[inline]
    pub const fn root(&self) -> ElementId {
        self.root
    }

    /// Number of live elements, attached or not. Discarded elements do not
    /// count.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether the document holds only its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Arena slots allocated so far, live or free.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    // --- Structure ---

    /// Create a detached element, reusing a discarded slot when one is free.
    pub fn create(&mut self, kind: ElementKind) -> ElementId {
        if let Some(index) = self.free.pop()
            && let Some(slot) = self.slots.get_mut(index as usize)
        {
            slot.node = Some(Node::new(kind));
            return ElementId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(Node::new(kind)),
        });
        ElementId {
            index,
            generation: 0,
        }
    }

    /// Create an element and append it to `parent` in one step.
    pub fn append_new(&mut self, parent: ElementId, kind: ElementKind) -> ElementId {
        let id = self.create(kind);
        self.append_child(parent, id);
        id
    }

    /// Move `child` to the end of `parent`'s children.
    ///
    /// Returns `false` (and changes nothing) if either handle is foreign, if
    /// `child` is the root, or if `parent` lies inside `child`'s subtree.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if self.node(parent).is_none() || self.node(child).is_none() || child == self.root {
            return false;
        }
        if self.contains(child, parent) {
            return false;
        }
        self.unlink(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        true
    }

    /// Detach `id` (and its subtree) from its parent.
    pub fn remove(&mut self, id: ElementId) {
        if id == self.root {
            return;
        }
        self.unlink(id);
        self.drop_stale_focus();
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: ElementId) {
        let children = match self.node_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            if let Some(node) = self.node_mut(child) {
                node.parent = None;
            }
        }
        self.drop_stale_focus();
    }

    /// Detach `id` and free it together with its subtree.
    ///
    /// Handles into the freed subtree become inert and their slots are
    /// reused by later [`create`](Self::create) calls. The root cannot be
    /// discarded.
    pub fn discard(&mut self, id: ElementId) {
        if id == self.root || self.node(id).is_none() {
            return;
        }
        self.unlink(id);
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for dead in doomed {
            if let Some(slot) = self.slots.get_mut(dead.index())
                && slot.generation == dead.generation
                && slot.node.take().is_some()
            {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(dead.index);
            }
        }
        self.drop_stale_focus();
    }

    /// Free every child subtree of `id`.
    pub fn discard_children(&mut self, id: ElementId) {
        for child in self.children(id).to_vec() {
            self.discard(child);
        }
    }

    fn unlink(&mut self, id: ElementId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    fn drop_stale_focus(&mut self) {
        if let Some(focused) = self.focused
            && !self.is_attached(focused)
        {
            self.focused = None;
        }
    }

    /// Parent of `id`, if linked.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of `id` in order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Kind of `id`.
    pub fn kind(&self, id: ElementId) -> Option<ElementKind> {
        self.node(id).map(|n| n.kind)
    }

    /// Whether `id` is `ancestor` or lies inside its subtree.
    pub fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.node(id).is_some() && self.contains(self.root, id)
    }

    /// Descendants of `scope` in document (pre-)order, excluding `scope`.
    pub fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// First descendant of `scope` matching `pred`.
    pub fn find(&self, scope: ElementId, pred: impl Fn(&Self, ElementId) -> bool) -> Option<ElementId> {
        self.descendants(scope).into_iter().find(|&id| pred(self, id))
    }

    /// Attached element whose `id` attribute equals `dom_id`.
    pub fn element_by_id(&self, dom_id: &str) -> Option<ElementId> {
        self.find(self.root, |doc, id| doc.attribute(id, "id") == Some(dom_id))
    }

    /// Descendants of `scope` carrying attribute `name`.
    pub fn query_attribute(&self, scope: ElementId, name: &str) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| self.has_attribute(id, name))
            .collect()
    }

    /// Descendants of `scope` carrying class `class`.
    pub fn query_class(&self, scope: ElementId, class: &str) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    // --- Attributes and classes ---

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.attrs.get(name)).map(String::as_str)
    }

    pub fn has_attribute(&self, id: ElementId, name: &str) -> bool {
        self.node(id).is_some_and(|n| n.attrs.contains_key(name))
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.attrs.insert(name.to_owned(), value.into());
        }
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        if let Some(node) = self.node_mut(id) {
            node.attrs.remove(name);
        }
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.node(id).is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(node) = self.node_mut(id)
            && !node.classes.iter().any(|c| c == class)
        {
            node.classes.push(class.to_owned());
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(node) = self.node_mut(id) {
            node.classes.retain(|c| c != class);
        }
    }

    /// Add `class` when `on`, remove it otherwise.
    pub fn toggle_class(&mut self, id: ElementId, class: &str, on: bool) {
        if on {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    // --- Text and form state ---

    /// Own text of `id` (not including descendants).
    pub fn text(&self, id: ElementId) -> &str {
        self.node(id).map_or("", |n| n.text.as_str())
    }

    /// Replace the content of `id` with plain text, detaching its children.
    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        self.clear_children(id);
        if let Some(node) = self.node_mut(id) {
            node.text = text.into();
        }
    }

    /// Concatenated text of `id` and all its descendants, in document order.
    pub fn text_content(&self, id: ElementId) -> String {
        let mut out = self.text(id).to_owned();
        for child in self.descendants(id) {
            out.push_str(self.text(child));
        }
        out
    }

    pub fn value(&self, id: ElementId) -> &str {
        self.node(id).map_or("", |n| n.value.as_str())
    }

    pub fn set_value(&mut self, id: ElementId, value: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.value = value.into();
        }
    }

    pub fn is_checked(&self, id: ElementId) -> bool {
        self.node(id).is_some_and(|n| n.checked)
    }

    pub fn set_checked(&mut self, id: ElementId, checked: bool) {
        if let Some(node) = self.node_mut(id) {
            node.checked = checked;
        }
    }

    pub fn is_disabled(&self, id: ElementId) -> bool {
        self.node(id).is_some_and(|n| n.disabled)
    }

    /// Disable or enable `id`. Disabling the focused element blurs it.
    pub fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        if let Some(node) = self.node_mut(id) {
            node.disabled = disabled;
        }
        if disabled && self.focused == Some(id) {
            self.focused = None;
        }
    }

    pub fn tab_index(&self, id: ElementId) -> Option<i32> {
        self.node(id).and_then(|n| n.tab_index)
    }

    pub fn set_tab_index(&mut self, id: ElementId, tab_index: Option<i32>) {
        if let Some(node) = self.node_mut(id) {
            node.tab_index = tab_index;
        }
    }

    // --- Focus ---

    /// Whether `id` belongs in the sequential (Tab) focus order.
    ///
    /// An explicit tab index decides: `>= 0` joins the order, negative leaves
    /// it, even for interactive kinds. Without one, interactive kinds qualify.
    /// Disabled or detached elements never do.
    pub fn is_tabbable(&self, id: ElementId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if node.disabled || !self.is_attached(id) {
            return false;
        }
        node.tab_index.map_or(node.kind.is_interactive(), |t| t >= 0)
    }

    /// Tabbable descendants of `scope`, in document order.
    ///
    /// Recomputed on every call so content swapped in since the last query
    /// is always reflected.
    pub fn focusables(&self, scope: ElementId) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| self.is_tabbable(id))
            .collect()
    }

    /// Currently focused element.
    #[inline]
    pub fn active_element(&self) -> Option<ElementId> {
        self.focused
    }

    /// Move focus to `id`.
    ///
    /// Accepts attached, enabled elements that are interactive or carry any
    /// tab index (including `-1`, which is focusable programmatically).
    pub fn focus(&mut self, id: ElementId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        let focusable = node.kind.is_interactive() || node.tab_index.is_some();
        if !focusable || node.disabled || !self.is_attached(id) {
            return false;
        }
        self.focused = Some(id);
        true
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Default sequential navigation over the whole document.
    ///
    /// Moves to the next (or previous, when `reverse`) tabbable element after
    /// the active one, wrapping at the ends. Returns the newly focused element.
    pub fn advance_focus(&mut self, reverse: bool) -> Option<ElementId> {
        let order = self.focusables(self.root);
        if order.is_empty() {
            return None;
        }
        let position = self
            .focused
            .and_then(|current| order.iter().position(|&id| id == current));
        let next = match (position, reverse) {
            (None, false) => 0,
            (None, true) => order.len() - 1,
            (Some(i), false) => (i + 1) % order.len(),
            (Some(i), true) => (i + order.len() - 1) % order.len(),
        };
        let target = order[next];
        self.focused = Some(target);
        Some(target)
    }
}
