//! Materialization: first-time construction of a host subtree from a VNode.

use crate::error::Error;
use crate::host::Host;
use crate::vnode::{bind, Binding, PropValue, VNode};

/// Create a detached host node for `vnode`, with props applied, listeners
/// subscribed and children appended in order. Nothing is reused.
pub fn materialize<H: Host>(host: &mut H, vnode: &VNode) -> Result<H::Node, Error<H::Error>> {
    match vnode {
        VNode::Text(value) => host.create_text(value).map_err(Error::Host),
        VNode::Element(element) => {
            let node = host.create_element(&element.kind).map_err(Error::Host)?;
            for (key, value) in element.props.iter() {
                apply_prop(host, &node, key, value)?;
            }
            for child in &element.children {
                let child_node = materialize(host, child)?;
                host.append_child(&node, &child_node).map_err(Error::Host)?;
            }
            Ok(node)
        }
    }
}

fn apply_prop<H: Host>(
    host: &mut H,
    node: &H::Node,
    key: &str,
    value: &PropValue,
) -> Result<(), Error<H::Error>> {
    let binding = bind(key, value).map_err(|reason| Error::InvalidProp {
        key: key.into(),
        reason,
    })?;
    let applied = match binding {
        Binding::Listener { event, handler } => host.add_listener(node, &event, handler),
        Binding::Style(style) => style
            .iter()
            .try_for_each(|(name, value)| host.set_style(node, name, value)),
        Binding::Attr(value) => host.set_attribute(node, key, value),
    };
    applied.map_err(Error::Host)
}
