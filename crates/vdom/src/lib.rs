//! Positional virtual tree reconciler.
//!
//! Build a [`VNode`] tree on every render pass, then let [`reconcile`] compare
//! it with the tree from the previous pass and apply the smallest set of
//! mutations to a live host tree. The host tree is reached only through the
//! [`Host`] trait, so the same algorithm drives a browser DOM (`vdom-web`) or
//! the in-memory [`testing::RecordingHost`].
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`vnode`] | `VNode`, props, styles, handlers |
//! | [`construct`] | `h` / `construct` with one-level child flattening |
//! | [`host`] | Host adapter trait |
//! | [`mount`] | Materialization of a VNode into fresh host nodes |
//! | [`reconcile`] | Positional diff/patch |
//! | [`root`] | Retains the previous tree between renders |
//! | [`testing`] | Recording in-memory host |
//!
//! # Quick Start
//!
//! ```
//! use vdom::testing::RecordingHost;
//! use vdom::{h, Props, Root};
//!
//! let mut host = RecordingHost::new();
//! let container = host.create_root();
//! let mut root = Root::new(host, container);
//!
//! root.render(h("p", Props::new().attr("class", "greeting"), ["Hello"])).unwrap();
//! root.host_mut().take_mutations();
//!
//! // Only the text node changes
//! root.render(h("p", Props::new().attr("class", "greeting"), ["Bye"])).unwrap();
//! assert_eq!(root.host().mutations().len(), 2);
//! assert_eq!(root.host().inner_markup(container), "<p class=\"greeting\">Bye</p>");
//! ```

pub mod construct;
pub mod error;
pub mod host;
pub mod mount;
pub mod reconcile;
pub mod root;
pub mod testing;
pub mod vnode;

pub use construct::{construct, h, leaf, text, Child, TEXT_KIND};
pub use error::Error;
pub use host::Host;
pub use mount::materialize;
pub use reconcile::reconcile;
pub use root::Root;
pub use vnode::{event_key, event_name, Element, Event, Handler, PropValue, Props, Style, VNode};
