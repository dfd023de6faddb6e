//! Positional reconciler.
//!
//! Compares an old and a new VNode that describe the host node at `index`
//! under `parent` and applies the mutations that turn one into the other.
//!
//! ```text
//! (old, new)            action
//! ─────────────────────────────────────────────────────────────
//! (None, Some)          materialize new, append to parent
//! (Some, None)          remove child at index
//! kind/text mismatch    materialize new, replace child at index
//! same element kind     diff props, then diff children by position
//! equal text            nothing
//! ```
//!
//! Children have no keys. A child that moved is compared against whatever
//! now occupies its slot, so reordering costs patches and replacements
//! proportional to the shift.

use log::trace;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::error::Error;
use crate::host::Host;
use crate::mount::materialize;
use crate::vnode::{bind, event_name, Binding, Element, PropValue, Props, VNode};

/// Bring the host node at `index` under `parent` from `old` to `new`.
///
/// Insertion always appends, whatever `index` says. Neither tree is mutated.
pub fn reconcile<H: Host>(
    host: &mut H,
    parent: &H::Node,
    old: Option<&VNode>,
    new: Option<&VNode>,
    index: usize,
) -> Result<(), Error<H::Error>> {
    match (old, new) {
        (None, None) => Ok(()),
        (None, Some(new)) => {
            trace!("[{index}] create <{}>", new.label());
            let node = materialize(host, new)?;
            host.append_child(parent, &node).map_err(Error::Host)
        }
        (Some(old), None) => {
            trace!("[{index}] remove <{}>", old.label());
            let node = child_at(host, parent, index)?;
            host.remove_child(parent, &node).map_err(Error::Host)
        }
        (Some(old), Some(new)) => match (old, new) {
            (VNode::Element(old), VNode::Element(new)) if old.kind == new.kind => {
                let node = child_at(host, parent, index)?;
                patch_element(host, &node, old, new)
            }
            (VNode::Text(old), VNode::Text(new)) if old == new => Ok(()),
            _ => {
                trace!("[{index}] replace <{}> with <{}>", old.label(), new.label());
                let current = child_at(host, parent, index)?;
                let node = materialize(host, new)?;
                host.replace_child(parent, &node, &current).map_err(Error::Host)
            }
        },
    }
}

fn child_at<H: Host>(host: &H, parent: &H::Node, index: usize) -> Result<H::Node, Error<H::Error>> {
    host.child_at(parent, index)
        .ok_or(Error::MissingChild { index })
}

fn patch_element<H: Host>(
    host: &mut H,
    node: &H::Node,
    old: &Element,
    new: &Element,
) -> Result<(), Error<H::Error>> {
    diff_props(host, node, &old.props, &new.props)?;
    diff_children(host, node, &old.children, &new.children)
}

// ---------------------------------------------------------------------------
// Props
// ---------------------------------------------------------------------------

/// Visit the union of keys (old keys first, then new-only keys, each once)
/// and patch every key whose value changed. Handlers and styles compare by
/// identity, so a freshly built style always counts as changed.
fn diff_props<H: Host>(
    host: &mut H,
    node: &H::Node,
    old: &Props,
    new: &Props,
) -> Result<(), Error<H::Error>> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut keys: SmallVec<[&str; 8]> = SmallVec::new();
    for key in old.keys().chain(new.keys()) {
        if seen.insert(key) {
            keys.push(key);
        }
    }

    for key in keys {
        let old_value = old.get(key);
        let new_value = new.get(key);
        if old_value != new_value {
            patch_prop(host, node, key, old_value, new_value)?;
        }
    }
    Ok(())
}

fn patch_prop<H: Host>(
    host: &mut H,
    node: &H::Node,
    key: &str,
    old: Option<&PropValue>,
    new: Option<&PropValue>,
) -> Result<(), Error<H::Error>> {
    let old = resolve::<H::Error>(key, old)?;
    let new = resolve::<H::Error>(key, new)?;

    if let Some(event) = event_name(key) {
        trace!("prop `{key}`: swap `{event}` listener");
        if let Some(Binding::Listener { handler, .. }) = old {
            host.remove_listener(node, &event, handler).map_err(Error::Host)?;
        }
        if let Some(Binding::Listener { handler, .. }) = new {
            host.add_listener(node, &event, handler).map_err(Error::Host)?;
        }
        return Ok(());
    }

    match new {
        Some(Binding::Style(new_style)) => {
            trace!("prop `{key}`: restyle");
            if let Some(Binding::Style(old_style)) = old {
                for (name, _) in old_style.iter() {
                    if !new_style.contains(name) {
                        host.set_style(node, name, "").map_err(Error::Host)?;
                    }
                }
            }
            for (name, value) in new_style.iter() {
                host.set_style(node, name, value).map_err(Error::Host)?;
            }
            Ok(())
        }
        Some(Binding::Attr(value)) => {
            trace!("prop `{key}`: set attribute");
            host.set_attribute(node, key, value).map_err(Error::Host)
        }
        // Dropped attributes stay on the host node; only styles and
        // listeners are cleaned up.
        None | Some(Binding::Listener { .. }) => Ok(()),
    }
}

fn resolve<'a, E>(key: &str, value: Option<&'a PropValue>) -> Result<Option<Binding<'a>>, Error<E>> {
    value
        .map(|value| bind(key, value))
        .transpose()
        .map_err(|reason| Error::InvalidProp {
            key: key.into(),
            reason,
        })
}

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

/// Slot `i` is reconciled as `(old[i], new[i], i)`. Surplus old children are
/// removed from the last slot down so every removal still addresses the host
/// node that belongs to that slot.
fn diff_children<H: Host>(
    host: &mut H,
    node: &H::Node,
    old: &[VNode],
    new: &[VNode],
) -> Result<(), Error<H::Error>> {
    let shared = old.len().min(new.len());

    for (index, (old_child, new_child)) in old.iter().zip(new).enumerate() {
        reconcile(host, node, Some(old_child), Some(new_child), index)?;
    }
    for (index, new_child) in new.iter().enumerate().skip(shared) {
        reconcile(host, node, None, Some(new_child), index)?;
    }
    for (index, old_child) in old.iter().enumerate().skip(shared).rev() {
        reconcile(host, node, Some(old_child), None, index)?;
    }
    Ok(())
}
