//! Tree construction.
//!
//! `construct` (alias `h`) builds one element from a tag, props and a list of
//! children groups. Groups are flattened exactly one level, so a child list
//! may mix single nodes with `Vec`s of nodes produced by iterators:
//!
//! ```
//! use vdom::{h, text, Child, Props, VNode};
//!
//! let items: Vec<VNode> = ["a", "b"].into_iter().map(text).collect();
//! let list = h("ul", Props::new().attr("id", "list"), [
//!     Child::from(h("li", Props::new(), ["header"])),
//!     Child::from(items),
//! ]);
//!
//! assert_eq!(list.children().len(), 3);
//! ```

use std::sync::Arc;

use crate::vnode::{Element, Props, VNode};

/// Kind marker that makes [`construct`] produce a text leaf.
pub const TEXT_KIND: &str = "#text";

/// One entry of a children list: a single node or a group spliced in place.
#[derive(Clone, Debug, PartialEq)]
pub enum Child {
    Node(VNode),
    Group(Vec<VNode>),
}

impl From<VNode> for Child {
    fn from(node: VNode) -> Self {
        Child::Node(node)
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Child::Node(VNode::from(value))
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Child::Node(VNode::from(value))
    }
}

impl From<Vec<VNode>> for Child {
    fn from(nodes: Vec<VNode>) -> Self {
        Child::Group(nodes)
    }
}

impl From<Option<VNode>> for Child {
    fn from(node: Option<VNode>) -> Self {
        Child::Group(node.into_iter().collect())
    }
}

/// Build a node. With [`TEXT_KIND`] the result is a text leaf holding the
/// concatenated text children; props are ignored there. Neither the kind nor
/// the props are validated.
pub fn construct<I>(kind: impl Into<Arc<str>>, props: Props, children: I) -> VNode
where
    I: IntoIterator,
    I::Item: Into<Child>,
{
    let kind = kind.into();
    let children = flatten(children);

    if kind.as_ref() == TEXT_KIND {
        let value: String = children.iter().filter_map(VNode::as_text).collect();
        return VNode::Text(value.into());
    }

    VNode::Element(Element {
        kind,
        props,
        children,
    })
}

/// Short alias of [`construct`].
pub fn h<I>(kind: impl Into<Arc<str>>, props: Props, children: I) -> VNode
where
    I: IntoIterator,
    I::Item: Into<Child>,
{
    construct(kind, props, children)
}

/// Element without children.
pub fn leaf(kind: impl Into<Arc<str>>, props: Props) -> VNode {
    construct(kind, props, std::iter::empty::<Child>())
}

pub fn text(value: impl Into<Arc<str>>) -> VNode {
    VNode::Text(value.into())
}

fn flatten<I>(children: I) -> Vec<VNode>
where
    I: IntoIterator,
    I::Item: Into<Child>,
{
    let mut flat = Vec::new();
    for child in children {
        match child.into() {
            Child::Node(node) => flat.push(node),
            Child::Group(group) => flat.extend(group),
        }
    }
    flat
}
