//! Host adapter.
//!
//! The reconciler never touches a concrete presentation tree. Every mutation
//! goes through a [`Host`], which owns node creation, props, listeners and
//! structural edits. Implementations are expected to apply each call
//! synchronously so the next positional lookup sees its effect.

use crate::vnode::Handler;

pub trait Host {
    /// Handle to a host node. Cloning must yield a handle to the same node.
    type Node: Clone;
    type Error;

    fn create_text(&mut self, value: &str) -> Result<Self::Node, Self::Error>;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node, Self::Error>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<(), Self::Error>;

    /// Set one inline style property. An empty `value` clears it.
    fn set_style(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<(), Self::Error>;

    fn add_listener(&mut self, node: &Self::Node, event: &str, handler: &Handler) -> Result<(), Self::Error>;

    /// Unsubscribe `handler` from `event`. Removing a handler that was never
    /// added is not an error.
    fn remove_listener(&mut self, node: &Self::Node, event: &str, handler: &Handler) -> Result<(), Self::Error>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

    fn replace_child(&mut self, parent: &Self::Node, new: &Self::Node, old: &Self::Node) -> Result<(), Self::Error>;

    /// The child currently at `index` under `parent`.
    fn child_at(&self, parent: &Self::Node, index: usize) -> Option<Self::Node>;
}
