//! Render root: keeps the previously rendered tree so callers only hand over
//! the next one.

use log::debug;

use crate::error::Error;
use crate::host::Host;
use crate::reconcile::reconcile;
use crate::vnode::VNode;

/// A host container plus the tree last rendered into it at child index 0.
///
/// The rendered tree must be the container's only child, so the first
/// `render` removes whatever the container already holds (including
/// whitespace text from surrounding markup).
pub struct Root<H: Host> {
    host: H,
    container: H::Node,
    current: Option<VNode>,
}

impl<H: Host> Root<H> {
    /// `container` is emptied on the first `render`, not here.
    pub fn new(host: H, container: H::Node) -> Self {
        Self {
            host,
            container,
            current: None,
        }
    }

    /// Reconcile `next` against the previous render and retain it.
    ///
    /// On failure the previous tree is kept, although the host may already be
    /// partially patched.
    pub fn render(&mut self, next: VNode) -> Result<(), Error<H::Error>> {
        debug!(
            "render <{}> ({} nodes) over {}",
            next.label(),
            next.node_count(),
            self.current.as_ref().map_or("nothing", VNode::label),
        );
        if self.current.is_none() {
            self.clear_container()?;
        }
        reconcile(&mut self.host, &self.container, self.current.as_ref(), Some(&next), 0)?;
        self.current = Some(next);
        Ok(())
    }

    /// Remove the rendered tree from the container.
    pub fn unmount(&mut self) -> Result<(), Error<H::Error>> {
        let Some(current) = self.current.as_ref() else {
            return Ok(());
        };
        debug!("unmount <{}>", current.label());
        reconcile(&mut self.host, &self.container, Some(current), None, 0)?;
        self.current = None;
        Ok(())
    }

    /// Remove children this root did not render. Without this the tree
    /// would be appended after them while later passes patch index 0.
    fn clear_container(&mut self) -> Result<(), Error<H::Error>> {
        let mut removed = 0;
        while let Some(child) = self.host.child_at(&self.container, 0) {
            self.host
                .remove_child(&self.container, &child)
                .map_err(Error::Host)?;
            removed += 1;
        }
        if removed > 0 {
            debug!("cleared {removed} pre-existing container children");
        }
        Ok(())
    }

    /// The tree rendered by the last successful `render`.
    pub fn current(&self) -> Option<&VNode> {
        self.current.as_ref()
    }

    pub fn container(&self) -> &H::Node {
        &self.container
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}
