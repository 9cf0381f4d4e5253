//! In-memory document tree.
//!
//! A small arena-backed element tree that the renderers mutate and the page
//! builder serializes. Nodes are addressed by [`NodeId`]; removing a node from
//! its parent detaches it (the slot stays in the arena but is unreachable
//! from the body), so ids held elsewhere never dangle.
//!
//! Slots are never reclaimed: every re-render of a carousel or modal leaves
//! the previous subtree in the arena, which grows by one subtree per render.
//! A session renders at start and again only on a modal reload or restart.
//! Long-lived callers that re-render repeatedly should build a fresh
//! [`Document`] instead.
//!
//! Behavior is attached as data: a node may carry a click [`Handler`] and an
//! error handler, which [`Gallery::dispatch`](crate::gallery::Gallery::dispatch)
//! interprets and serialization writes out as `data-action` / `data-on-error`
//! for the page script. Video elements carry a [`Playback`] state.

use crate::event::Handler;
use maud::html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Playback state of a `<video>` element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    pub paused: bool,
    /// Current position in seconds.
    pub position: f64,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            paused: true,
            position: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element(String),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    playback: Option<Playback>,
    on_click: Option<Handler>,
    on_error: Option<Handler>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            styles: Vec::new(),
            children: Vec::new(),
            parent: None,
            playback: None,
            on_click: None,
            on_error: None,
        }
    }
}

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["img", "br", "hr", "input", "meta", "link", "source"];

/// Arena of nodes rooted at `<body>`. Detached nodes keep their slot; see the
/// module docs.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    body: NodeId,
    focused: Option<NodeId>,
    layout_generation: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only `<body>`.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Element("body".to_string()))],
            body: NodeId(0),
            focused: None,
            layout_generation: 0,
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node::new(NodeKind::Element(tag.to_string())));
        NodeId(self.nodes.len() - 1)
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.nodes.push(Node::new(NodeKind::Text(text.to_string())));
        NodeId(self.nodes.len() - 1)
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Create an element with the given classes and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        let el = self.create_element(tag);
        for class in classes {
            self.add_class(el, class);
        }
        self.append_child(parent, el);
        el
    }

    /// Append a text node to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let t = self.create_text(text);
        self.append_child(parent, t);
        t
    }

    /// Remove `node` from its parent. The node keeps its own subtree.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.node_mut(node).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != node);
        }
        if self.focused.is_some_and(|f| f == node || self.is_ancestor(node, f)) {
            self.focused = None;
        }
    }

    /// Detach every child of `node`.
    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.node_mut(node).children);
        for child in children {
            self.node_mut(child).parent = None;
            if self.focused.is_some_and(|f| f == child || self.is_ancestor(child, f)) {
                self.focused = None;
            }
        }
    }

    /// Replace the children of `node` with a single text node.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        self.append_text(node, text);
    }

    // ------------------------------------------------------------------
    // Attributes, classes, styles
    // ------------------------------------------------------------------

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).kind {
            NodeKind::Element(tag) => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        self.node_mut(node).id = Some(id.to_string());
    }

    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.node(node).id.as_deref()
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.node_mut(node).classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.node_mut(node).classes.retain(|c| c != class);
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).classes.iter().any(|c| c == class)
    }

    /// Set an attribute. An empty value serializes as a boolean attribute.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let attrs = &mut self.node_mut(node).attrs;
        match attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let styles = &mut self.node_mut(node).styles;
        match styles.iter_mut().find(|(p, _)| p == property) {
            Some((_, v)) => *v = value.to_string(),
            None => styles.push((property.to_string(), value.to_string())),
        }
    }

    pub fn remove_style(&mut self, node: NodeId, property: &str) {
        self.node_mut(node).styles.retain(|(p, _)| p != property);
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node)
            .styles
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    // ------------------------------------------------------------------
    // Behavior
    // ------------------------------------------------------------------

    pub fn set_on_click(&mut self, node: NodeId, handler: Handler) {
        self.node_mut(node).on_click = Some(handler);
    }

    pub fn on_click(&self, node: NodeId) -> Option<&Handler> {
        self.node(node).on_click.as_ref()
    }

    pub fn set_on_error(&mut self, node: NodeId, handler: Handler) {
        self.node_mut(node).on_error = Some(handler);
    }

    pub fn on_error(&self, node: NodeId) -> Option<&Handler> {
        self.node(node).on_error.as_ref()
    }

    /// Mark `node` as a media element with playback state (paused at 0).
    pub fn enable_playback(&mut self, node: NodeId) {
        self.node_mut(node).playback = Some(Playback::default());
    }

    pub fn playback(&self, node: NodeId) -> Option<Playback> {
        self.node(node).playback
    }

    /// Whether `node` is a media element that is currently playing.
    pub fn is_playing(&self, node: NodeId) -> bool {
        self.playback(node).is_some_and(|p| !p.paused)
    }

    /// Pause and rewind to the start. No-op for non-media nodes.
    pub fn pause_and_rewind(&mut self, node: NodeId) {
        if let Some(p) = self.node_mut(node).playback.as_mut() {
            p.paused = true;
            p.position = 0.0;
        }
    }

    /// Rewind to the start and play. No-op for non-media nodes.
    pub fn rewind_and_play(&mut self, node: NodeId) {
        if let Some(p) = self.node_mut(node).playback.as_mut() {
            p.position = 0.0;
            p.paused = false;
        }
    }

    /// Set playing/paused without moving the position (user controls).
    pub fn set_paused(&mut self, node: NodeId, paused: bool) {
        if let Some(p) = self.node_mut(node).playback.as_mut() {
            p.paused = paused;
        }
    }

    /// Advance the playback position of a playing media node.
    pub fn seek(&mut self, node: NodeId, position: f64) {
        if let Some(p) = self.node_mut(node).playback.as_mut() {
            p.position = position;
        }
    }

    pub fn set_focus(&mut self, node: Option<NodeId>) {
        self.focused = node;
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Hide and re-show `node`, forcing layout to be recomputed.
    pub fn force_reflow(&mut self, node: NodeId) {
        let previous = self.style(node, "display").map(str::to_string);
        self.set_style(node, "display", "none");
        self.layout_generation += 1;
        match previous {
            Some(display) => self.set_style(node, "display", &display),
            None => self.remove_style(node, "display"),
        }
    }

    /// Number of forced layouts so far.
    pub fn layout_generation(&self) -> u64 {
        self.layout_generation
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// Whether `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// `node` or its closest ancestor satisfying `pred`.
    pub fn closest(&self, node: NodeId, pred: impl Fn(NodeId) -> bool) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if pred(n) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    /// Whether `node` is reachable from the body.
    pub fn is_connected(&self, node: NodeId) -> bool {
        node == self.body || self.is_ancestor(self.body, node)
    }

    /// All descendants of `node` in document order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Descendant elements of `node` carrying `class`.
    pub fn find_all_by_class(&self, node: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(node)
            .into_iter()
            .filter(|n| self.has_class(*n, class))
            .collect()
    }

    pub fn find_by_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(node)
            .into_iter()
            .find(|n| self.has_class(*n, class))
    }

    /// Connected element with the given id.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|n| self.id(*n) == Some(id))
    }

    /// Connected element whose attribute `name` equals `value`.
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|n| self.attr(*n, name) == Some(value))
    }

    /// Concatenated text of `node` and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let NodeKind::Text(t) = &self.node(node).kind {
            out.push_str(t);
        }
        for n in self.descendants(node) {
            if let NodeKind::Text(t) = &self.node(n).kind {
                out.push_str(t);
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// Serialize `node` and its subtree as HTML.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    /// Serialize the children of `node` as HTML.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.write_node(*child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        let tag = match &node.kind {
            NodeKind::Text(text) => {
                out.push_str(&escape(text));
                return;
            }
            NodeKind::Element(tag) => tag,
        };

        out.push('<');
        out.push_str(tag);
        if let Some(id) = &node.id {
            write_attr(out, "id", id);
        }
        if !node.classes.is_empty() {
            write_attr(out, "class", &node.classes.join(" "));
        }
        for (name, value) in &node.attrs {
            if value.is_empty() {
                out.push(' ');
                out.push_str(name);
            } else {
                write_attr(out, name, value);
            }
        }
        if let Some(action) = node.on_click.as_ref().and_then(Handler::data_action) {
            write_attr(out, "data-action", &action);
        }
        if let Some(treatment) = node.on_error.as_ref().and_then(Handler::data_on_error) {
            write_attr(out, "data-on-error", treatment);
        }
        if !node.styles.is_empty() {
            let style = node
                .styles
                .iter()
                .map(|(p, v)| format!("{p}: {v};"))
                .collect::<Vec<_>>()
                .join(" ");
            write_attr(out, "style", &style);
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&tag.as_str()) {
            return;
        }
        for child in &node.children {
            self.write_node(*child, out);
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

fn escape(text: &str) -> String {
    html! { (text) }.into_string()
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}
