//! In-memory host that records every mutation.
//!
//! Runs the reconciler without a browser: tests assert on the mutation log
//! and on the resulting tree, benchmarks use it as a cheap host.

use std::fmt::{self, Write as _};

use indexmap::IndexMap;

use crate::host::Host;
use crate::vnode::{Event, Handler};

/// Index of a node in a [`RecordingHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeId(pub usize);

/// One host call, in the order the host received it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum Mutation {
    CreateText { node: NodeId, value: String },
    CreateElement { node: NodeId, tag: String },
    SetAttribute { node: NodeId, name: String, value: String },
    SetStyle { node: NodeId, name: String, value: String },
    AddListener { node: NodeId, event: String },
    RemoveListener { node: NodeId, event: String },
    AppendChild { parent: NodeId, child: NodeId },
    RemoveChild { parent: NodeId, child: NodeId },
    ReplaceChild { parent: NodeId, new: NodeId, old: NodeId },
}

impl Mutation {
    /// Append, remove or replace.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Mutation::AppendChild { .. } | Mutation::RemoveChild { .. } | Mutation::ReplaceChild { .. }
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordingError {
    /// `child` is not currently a child of `parent`.
    NotAChild { parent: NodeId, child: NodeId },
    /// Children, attributes, styles and listeners need an element.
    NotAnElement(NodeId),
}

impl fmt::Display for RecordingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingError::NotAChild { parent, child } => {
                write!(f, "node {} is not a child of node {}", child.0, parent.0)
            }
            RecordingError::NotAnElement(node) => write!(f, "node {} is not an element", node.0),
        }
    }
}

impl std::error::Error for RecordingError {}

#[derive(Debug)]
enum NodeData {
    Text(String),
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
        styles: IndexMap<String, String>,
        listeners: Vec<(String, Handler)>,
        children: Vec<NodeId>,
    },
}

#[derive(Debug)]
struct HostNode {
    data: NodeData,
    parent: Option<NodeId>,
}

/// Arena-backed host tree. Nodes are never freed; detached nodes simply lose
/// their parent.
#[derive(Debug, Default)]
pub struct RecordingHost {
    nodes: Vec<HostNode>,
    mutations: Vec<Mutation>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detached container element for rendering into. Not logged.
    pub fn create_root(&mut self) -> NodeId {
        self.alloc(NodeData::element("#root"))
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Drain the log, e.g. after setting up the initial tree.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        match &self.nodes[node.0].data {
            NodeData::Element { children, .. } => children,
            NodeData::Text(_) => &[],
        }
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Text(value) => Some(value),
            NodeData::Element { .. } => None,
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeData::Text(_) => None,
        }
    }

    pub fn style(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Element { styles, .. } => styles.get(name).map(String::as_str),
            NodeData::Text(_) => None,
        }
    }

    pub fn listener_count(&self, node: NodeId, event: &str) -> usize {
        match &self.nodes[node.0].data {
            NodeData::Element { listeners, .. } => {
                listeners.iter().filter(|(name, _)| name == event).count()
            }
            NodeData::Text(_) => 0,
        }
    }

    /// Fire `event` on `node`, invoking its handlers in subscription order.
    /// Returns how many ran.
    pub fn dispatch(&self, node: NodeId, event: &Event) -> usize {
        let NodeData::Element { listeners, .. } = &self.nodes[node.0].data else {
            return 0;
        };
        let mut called = 0;
        for (name, handler) in listeners {
            if name.as_str() == event.name.as_ref() {
                handler.call(event);
                called += 1;
            }
        }
        called
    }

    /// HTML-like dump of `node` and its subtree. Cleared styles are omitted,
    /// listeners are not shown. Inline styles and a literal `style`
    /// attribute never coexist, so at most one `style=` is written.
    pub fn to_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(node, &mut out);
        out
    }

    /// Like [`to_markup`](Self::to_markup) but for the children only.
    pub fn inner_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            self.write_markup(child, &mut out);
        }
        out
    }

    fn write_markup(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].data {
            NodeData::Text(value) => out.push_str(value),
            NodeData::Element { tag, attributes, styles, children, .. } => {
                let _ = write!(out, "<{tag}");
                for (name, value) in attributes {
                    let _ = write!(out, " {name}=\"{value}\"");
                }
                if !styles.is_empty() {
                    let style: Vec<String> = styles
                        .iter()
                        .map(|(name, value)| format!("{name}: {value};"))
                        .collect();
                    let _ = write!(out, " style=\"{}\"", style.join(" "));
                }
                out.push('>');
                for &child in children {
                    self.write_markup(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(HostNode { data, parent: None });
        id
    }

    fn element_mut(&mut self, node: NodeId) -> Result<ElementMut<'_>, RecordingError> {
        match &mut self.nodes[node.0].data {
            NodeData::Element { attributes, styles, listeners, children, .. } => Ok(ElementMut {
                attributes,
                styles,
                listeners,
                children,
            }),
            NodeData::Text(_) => Err(RecordingError::NotAnElement(node)),
        }
    }

    fn position(&self, parent: NodeId, child: NodeId) -> Result<usize, RecordingError> {
        self.children(parent)
            .iter()
            .position(|&id| id == child)
            .ok_or(RecordingError::NotAChild { parent, child })
    }

    /// Unlink `child` from its current parent, if any.
    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child.0].parent.take() {
            if let NodeData::Element { children, .. } = &mut self.nodes[parent.0].data {
                children.retain(|&id| id != child);
            }
        }
    }
}

struct ElementMut<'a> {
    attributes: &'a mut IndexMap<String, String>,
    styles: &'a mut IndexMap<String, String>,
    listeners: &'a mut Vec<(String, Handler)>,
    children: &'a mut Vec<NodeId>,
}

/// `"color: red; margin: 0"` -> `[("color", "red"), ("margin", "0")]`.
fn parse_declarations(block: &str) -> impl Iterator<Item = (String, String)> + '_ {
    block.split(';').filter_map(|declaration| {
        let (name, value) = declaration.split_once(':')?;
        let (name, value) = (name.trim(), value.trim());
        (!name.is_empty() && !value.is_empty()).then(|| (name.to_owned(), value.to_owned()))
    })
}

impl NodeData {
    fn element(tag: &str) -> Self {
        NodeData::Element {
            tag: tag.to_owned(),
            attributes: IndexMap::new(),
            styles: IndexMap::new(),
            listeners: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl Host for RecordingHost {
    type Node = NodeId;
    type Error = RecordingError;

    fn create_text(&mut self, value: &str) -> Result<NodeId, RecordingError> {
        let node = self.alloc(NodeData::Text(value.to_owned()));
        self.mutations.push(Mutation::CreateText { node, value: value.to_owned() });
        Ok(node)
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, RecordingError> {
        let node = self.alloc(NodeData::element(tag));
        self.mutations.push(Mutation::CreateElement { node, tag: tag.to_owned() });
        Ok(node)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), RecordingError> {
        let node = *node;
        let element = self.element_mut(node)?;
        // A literal `style` attribute replaces every inline style, as in a DOM
        if name == "style" {
            element.styles.clear();
        }
        element.attributes.insert(name.to_owned(), value.to_owned());
        self.mutations.push(Mutation::SetAttribute {
            node,
            name: name.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }

    fn set_style(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), RecordingError> {
        let node = *node;
        let element = self.element_mut(node)?;
        let styles = element.styles;
        // Inline styles and the `style` attribute are one declaration block
        if let Some(literal) = element.attributes.shift_remove("style") {
            styles.extend(parse_declarations(&literal));
        }
        if value.is_empty() {
            styles.shift_remove(name);
        } else {
            styles.insert(name.to_owned(), value.to_owned());
        }
        self.mutations.push(Mutation::SetStyle {
            node,
            name: name.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }

    fn add_listener(&mut self, node: &NodeId, event: &str, handler: &Handler) -> Result<(), RecordingError> {
        let node = *node;
        self.element_mut(node)?
            .listeners
            .push((event.to_owned(), handler.clone()));
        self.mutations.push(Mutation::AddListener { node, event: event.to_owned() });
        Ok(())
    }

    fn remove_listener(&mut self, node: &NodeId, event: &str, handler: &Handler) -> Result<(), RecordingError> {
        let node = *node;
        let listeners = self.element_mut(node)?.listeners;
        if let Some(position) = listeners
            .iter()
            .position(|(name, existing)| name == event && existing == handler)
        {
            listeners.remove(position);
        }
        self.mutations.push(Mutation::RemoveListener { node, event: event.to_owned() });
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), RecordingError> {
        let (parent, child) = (*parent, *child);
        self.element_mut(parent)?;
        self.detach(child);
        self.element_mut(parent)?.children.push(child);
        self.nodes[child.0].parent = Some(parent);
        self.mutations.push(Mutation::AppendChild { parent, child });
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), RecordingError> {
        let (parent, child) = (*parent, *child);
        let position = self.position(parent, child)?;
        self.element_mut(parent)?.children.remove(position);
        self.nodes[child.0].parent = None;
        self.mutations.push(Mutation::RemoveChild { parent, child });
        Ok(())
    }

    fn replace_child(&mut self, parent: &NodeId, new: &NodeId, old: &NodeId) -> Result<(), RecordingError> {
        let (parent, new, old) = (*parent, *new, *old);
        self.position(parent, old)?;
        self.detach(new);
        let position = self.position(parent, old)?;
        self.element_mut(parent)?.children[position] = new;
        self.nodes[old.0].parent = None;
        self.nodes[new.0].parent = Some(parent);
        self.mutations.push(Mutation::ReplaceChild { parent, new, old });
        Ok(())
    }

    fn child_at(&self, parent: &NodeId, index: usize) -> Option<NodeId> {
        self.children(*parent).get(index).copied()
    }
}
