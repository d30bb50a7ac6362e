//! Retained element scene
//!
//! The scene is the motion layer's view of the page: a tree of elements with
//! computed geometry, inline style overrides, text, and `data-*` attributes.
//! Animations read geometry and write style/text. They never reparent
//! elements.

use crate::geometry::Bounds;
use crate::layout::{LayoutNodeId, LayoutTree};
use crate::style::{ElementStyle, Property};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use taffy::prelude::{AvailableSpace, Dimension, Size, Style};

new_key_type! {
    /// Unique identifier for an element in a scene
    pub struct ElementId;
}

/// Overflow behaviour along the vertical axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    /// Content scrolls inside the element
    Scroll,
}

/// The window the scene is presented in
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Window scroll offset in pixels
    pub scroll_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
        }
    }

    /// Visible area in client coordinates
    pub fn bounds(&self) -> Bounds {
        Bounds::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Description of an element to create
#[derive(Clone, Debug, Default)]
pub struct ElementSpec {
    tag: String,
    classes: SmallVec<[String; 2]>,
    data: Vec<(String, String)>,
    text: String,
    overflow: Overflow,
    layout: Option<Style>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder: add a class name
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Builder: add a `data-*` attribute
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.push((key.into(), value.into()));
        self
    }

    /// Builder: set text content
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder: set vertical overflow
    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// Builder: participate in layout with the given flexbox style
    pub fn layout(mut self, style: Style) -> Self {
        self.layout = Some(style);
        self
    }
}

/// A single element in the scene
#[derive(Clone, Debug)]
pub struct Element {
    pub tag: String,
    pub classes: SmallVec<[String; 2]>,
    pub data: FxHashMap<String, String>,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    /// Bounds in document coordinates (before any scrolling)
    pub bounds: Bounds,
    pub overflow: Overflow,
    /// Scroll offset when `overflow` is `Scroll`
    pub scroll_top: f32,
    pub style: ElementStyle,
    pub text: String,
    layout_node: Option<LayoutNodeId>,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Saved style and text of an element, used to undo animation side effects
#[derive(Clone, Debug, PartialEq)]
pub struct ElementSnapshot {
    pub style: ElementStyle,
    pub text: String,
}

/// Element matcher for scene queries
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    Tag(String),
    Class(String),
    /// Has a `data-*` attribute, any value
    Data(String),
    /// Has a `data-*` attribute with an exact value
    DataEq(String, String),
}

impl Selector {
    pub fn tag(tag: impl Into<String>) -> Self {
        Selector::Tag(tag.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Selector::Class(class.into())
    }

    pub fn data(key: impl Into<String>) -> Self {
        Selector::Data(key.into())
    }

    pub fn data_eq(key: impl Into<String>, value: impl Into<String>) -> Self {
        Selector::DataEq(key.into(), value.into())
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Selector::Tag(tag) => element.tag == *tag,
            Selector::Class(class) => element.has_class(class),
            Selector::Data(key) => element.data.contains_key(key),
            Selector::DataEq(key, value) => element.data.get(key) == Some(value),
        }
    }
}

/// The element tree plus the window it is shown in
pub struct Scene {
    elements: SlotMap<ElementId, Element>,
    root: ElementId,
    viewport: Viewport,
    layout: LayoutTree,
    mutations: u64,
}

impl Scene {
    /// Create a scene with an empty document root sized to the viewport width
    pub fn new(viewport: Viewport) -> Self {
        let mut layout = LayoutTree::new();
        let root_style = Style {
            size: Size {
                width: Dimension::Length(viewport.width),
                height: Dimension::Auto,
            },
            flex_direction: taffy::prelude::FlexDirection::Column,
            ..Default::default()
        };
        let layout_node = layout.create_node(root_style);

        let mut elements = SlotMap::with_key();
        let root = elements.insert(Element {
            tag: "body".to_string(),
            classes: SmallVec::new(),
            data: FxHashMap::default(),
            parent: None,
            children: Vec::new(),
            bounds: Bounds::new(0.0, 0.0, viewport.width, 0.0),
            overflow: Overflow::Visible,
            scroll_top: 0.0,
            style: ElementStyle::new(),
            text: String::new(),
            layout_node,
        });

        Self {
            elements,
            root,
            viewport,
            layout,
            mutations: 0,
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    // =========================================================================
    // Tree structure
    // =========================================================================

    /// Create an element as the last child of `parent`
    pub fn create(&mut self, parent: ElementId, spec: ElementSpec) -> Option<ElementId> {
        if !self.elements.contains_key(parent) {
            tracing::warn!("create: parent {:?} is not in the scene", parent);
            return None;
        }

        let layout_node = spec.layout.and_then(|style| self.layout.create_node(style));
        let parent_bounds = self.elements[parent].bounds;

        let id = self.elements.insert(Element {
            tag: spec.tag,
            classes: spec.classes,
            data: spec.data.into_iter().collect(),
            parent: Some(parent),
            children: Vec::new(),
            bounds: Bounds::new(parent_bounds.x, parent_bounds.y, 0.0, 0.0),
            overflow: spec.overflow,
            scroll_top: 0.0,
            style: ElementStyle::new(),
            text: spec.text,
            layout_node,
        });

        if let (Some(child_node), Some(parent_node)) =
            (layout_node, self.nearest_layout_node(parent))
        {
            self.layout.add_child(parent_node, child_node);
        }

        self.elements[parent].children.push(id);
        Some(id)
    }

    fn nearest_layout_node(&self, mut id: ElementId) -> Option<LayoutNodeId> {
        loop {
            let element = self.elements.get(id)?;
            if let Some(node) = element.layout_node {
                return Some(node);
            }
            id = element.parent?;
        }
    }

    /// Remove an element and its whole subtree. The root cannot be removed.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if id == self.root || !self.elements.contains_key(id) {
            return false;
        }

        if let Some(parent) = self.elements[id].parent {
            if let Some(p) = self.elements.get_mut(parent) {
                p.children.retain(|&c| c != id);
            }
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(element) = self.elements.remove(current) {
                if let Some(node) = element.layout_node {
                    self.layout.remove_node(node);
                }
                stack.extend(element.children);
            }
        }
        true
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All descendants of `root` matching `selector`, in document order
    pub fn query_all(&self, root: ElementId, selector: &Selector) -> Vec<ElementId> {
        let mut found = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            if let Some(element) = self.elements.get(id) {
                if selector.matches(element) {
                    found.push(id);
                }
                stack.extend(element.children.iter().rev().copied());
            }
        }
        found
    }

    /// First descendant of `root` matching `selector`
    pub fn query(&self, root: ElementId, selector: &Selector) -> Option<ElementId> {
        self.query_all(root, selector).into_iter().next()
    }

    /// Read a `data-*` attribute
    pub fn data(&self, id: ElementId, key: &str) -> Option<&str> {
        self.elements.get(id)?.data.get(key).map(String::as_str)
    }

    // =========================================================================
    // Style and text
    // =========================================================================

    /// Inline override for a property, if set
    pub fn style_value(&self, id: ElementId, property: Property) -> Option<f32> {
        self.elements.get(id)?.style.get(property)
    }

    /// Effective value of a property (override or identity)
    pub fn resolved(&self, id: ElementId, property: Property) -> Option<f32> {
        self.elements
            .get(id)
            .map(|e| e.style.resolved(property))
    }

    /// Write an inline override. Returns false if the element is gone.
    pub fn set_style(&mut self, id: ElementId, property: Property, value: f32) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        if element.style.set(property, value) {
            self.mutations += 1;
        }
        true
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.elements.get(id).map(|e| e.text.as_str())
    }

    /// Replace text content. Returns false if the element is gone.
    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        let text = text.into();
        if element.text != text {
            element.text = text;
            self.mutations += 1;
        }
        true
    }

    /// Capture the current style and text of an element
    pub fn snapshot(&self, id: ElementId) -> Option<ElementSnapshot> {
        self.elements.get(id).map(|e| ElementSnapshot {
            style: e.style.clone(),
            text: e.text.clone(),
        })
    }

    /// Restore a previously captured snapshot
    pub fn restore(&mut self, id: ElementId, snapshot: &ElementSnapshot) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        if element.style != snapshot.style || element.text != snapshot.text {
            element.style = snapshot.style.clone();
            element.text = snapshot.text.clone();
            self.mutations += 1;
        }
        true
    }

    /// Number of style/text writes that changed something
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    // =========================================================================
    // Geometry and scrolling
    // =========================================================================

    /// Bounds in document coordinates
    pub fn bounds(&self, id: ElementId) -> Option<Bounds> {
        self.elements.get(id).map(|e| e.bounds)
    }

    /// Place an element explicitly (elements outside the layout pass)
    pub fn set_bounds(&mut self, id: ElementId, bounds: Bounds) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                element.bounds = bounds;
                true
            }
            None => false,
        }
    }

    /// Bounds relative to the window, after window and container scrolling
    pub fn client_bounds(&self, id: ElementId) -> Option<Bounds> {
        let element = self.elements.get(id)?;
        let mut offset = self.viewport.scroll_y;

        let mut ancestor = element.parent;
        while let Some(a) = ancestor {
            let parent = self.elements.get(a)?;
            if parent.overflow == Overflow::Scroll {
                offset += parent.scroll_top;
            }
            ancestor = parent.parent;
        }

        Some(element.bounds.translate(0.0, -offset))
    }

    /// Height of an element's content, measured from its top edge
    pub fn scroll_height(&self, id: ElementId) -> f32 {
        let Some(element) = self.elements.get(id) else {
            return 0.0;
        };
        element
            .children
            .iter()
            .filter_map(|&c| self.elements.get(c))
            .map(|c| c.bounds.bottom() - element.bounds.top())
            .fold(element.bounds.height, f32::max)
    }

    /// Nearest ancestor that actually scrolls, or `None` for the window
    pub fn scroll_parent(&self, id: ElementId) -> Option<ElementId> {
        let mut current = self.elements.get(id)?.parent;
        while let Some(candidate) = current {
            if candidate == self.root {
                return None;
            }
            let element = self.elements.get(candidate)?;
            if element.overflow == Overflow::Scroll
                && self.scroll_height(candidate) > element.bounds.height
            {
                return Some(candidate);
            }
            current = element.parent;
        }
        None
    }

    /// Visible rectangle of an observer root in client coordinates
    pub fn root_bounds(&self, root: Option<ElementId>) -> Bounds {
        root.and_then(|r| self.client_bounds(r))
            .unwrap_or_else(|| self.viewport.bounds())
    }

    /// Total document height
    pub fn document_height(&self) -> f32 {
        self.scroll_height(self.root)
    }

    /// Scroll the window, clamped to the scrollable range
    pub fn scroll_window_to(&mut self, y: f32) {
        let max = (self.document_height() - self.viewport.height).max(0.0);
        self.viewport.scroll_y = y.clamp(0.0, max);
    }

    /// Scroll a container element, clamped to its content
    pub fn scroll_element_to(&mut self, id: ElementId, top: f32) -> bool {
        let max = (self.scroll_height(id) - self.bounds(id).map_or(0.0, |b| b.height)).max(0.0);
        match self.elements.get_mut(id) {
            Some(element) if element.overflow == Overflow::Scroll => {
                element.scroll_top = top.clamp(0.0, max);
                true
            }
            _ => false,
        }
    }

    /// Resize the window. Call `compute_layout` afterwards to reflow.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
        if let Some(node) = self.elements[self.root].layout_node {
            self.layout.set_style(
                node,
                Style {
                    size: Size {
                        width: Dimension::Length(width),
                        height: Dimension::Auto,
                    },
                    flex_direction: taffy::prelude::FlexDirection::Column,
                    ..Default::default()
                },
            );
        }
    }

    /// Run the flexbox pass and write absolute bounds into every laid-out element
    pub fn compute_layout(&mut self) {
        let Some(root_node) = self.elements[self.root].layout_node else {
            return;
        };
        self.layout.compute_layout(
            root_node,
            Size {
                width: AvailableSpace::Definite(self.viewport.width),
                height: AvailableSpace::MaxContent,
            },
        );

        // Taffy locations are parent-relative; walk down accumulating origins.
        let mut stack = vec![(self.root, 0.0_f32, 0.0_f32)];
        while let Some((id, origin_x, origin_y)) = stack.pop() {
            let Some(element) = self.elements.get(id) else {
                continue;
            };
            let (mut x, mut y) = (origin_x, origin_y);
            let mut computed = None;
            if let Some(layout) = element.layout_node.and_then(|n| self.layout.get_layout(n)) {
                x += layout.location.x;
                y += layout.location.y;
                computed = Some(Bounds::new(x, y, layout.size.width, layout.size.height));
            }
            let children = element.children.clone();
            if let Some(bounds) = computed {
                self.elements[id].bounds = bounds;
            }
            for child in children {
                stack.push((child, x, y));
            }
        }

        let clamped = self.viewport.scroll_y;
        self.scroll_window_to(clamped);
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
