//! Browser DOM host for `vdom`.
//!
//! `DomHost` applies reconciler mutations to real `web_sys` nodes. Listener
//! closures are kept alive here until their handler is unsubscribed or their
//! node leaves the document through `remove_child` / `replace_child`.
//!
//! ```rust,ignore
//! let mut root = DomHost::mount("#app")?;
//! root.render(h("p", Props::new(), ["Hello"]))?;
//! ```

use std::fmt;

use log::{debug, trace};
use vdom::{Event, Handler, Host, Root};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum DomError {
    /// A DOM call threw.
    Js(JsValue),
    /// No `window.document` (not running in a browser main thread).
    NoDocument,
    /// Attributes and listeners need an element node.
    NotAnElement,
    /// Inline styles need an `HTMLElement`.
    NotStylable,
    /// `mount` found nothing for the selector.
    SelectorNotFound(String),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        DomError::Js(value)
    }
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::Js(value) => {
                let message = value
                    .dyn_ref::<js_sys::Error>()
                    .map(|error| String::from(error.message()))
                    .or_else(|| value.as_string())
                    .unwrap_or_else(|| format!("{value:?}"));
                write!(f, "DOM call failed: {message}")
            }
            DomError::NoDocument => write!(f, "no document available"),
            DomError::NotAnElement => write!(f, "node is not an element"),
            DomError::NotStylable => write!(f, "element has no inline style"),
            DomError::SelectorNotFound(selector) => write!(f, "no element matches `{selector}`"),
        }
    }
}

impl std::error::Error for DomError {}

// ---------------------------------------------------------------------------
// DomHost
// ---------------------------------------------------------------------------

/// A subscribed handler and the JS closure registered for it.
struct Listener {
    node: web_sys::Node,
    event: String,
    handler: Handler,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

pub struct DomHost {
    document: web_sys::Document,
    listeners: Vec<Listener>,
}

impl DomHost {
    pub fn new() -> Result<Self, DomError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or(DomError::NoDocument)?;
        Ok(Self::with_document(document))
    }

    pub fn with_document(document: web_sys::Document) -> Self {
        Self {
            document,
            listeners: Vec::new(),
        }
    }

    /// Render root over the first element matching `selector`. The element
    /// is emptied first, since the rendered tree must be its only child.
    pub fn mount(selector: &str) -> Result<Root<DomHost>, DomError> {
        let host = Self::new()?;
        let container = host
            .document
            .query_selector(selector)?
            .ok_or_else(|| DomError::SelectorNotFound(selector.to_owned()))?;
        debug!("mounting into `{selector}`");
        container.set_text_content(None);
        Ok(Root::new(host, container.into()))
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }

    /// Number of live listener closures held by this host.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Unregister and drop closures registered on `removed` or anywhere
    /// below it. A detached node can still receive events, so each closure
    /// is detached from its node before it is freed.
    fn forget_listeners_within(&mut self, removed: &web_sys::Node) -> Result<(), DomError> {
        let (detached, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.listeners)
            .into_iter()
            .partition(|listener| removed.contains(Some(&listener.node)));
        self.listeners = kept;
        if !detached.is_empty() {
            trace!("dropping {} listener closures of a detached subtree", detached.len());
        }
        for listener in detached {
            listener
                .node
                .remove_event_listener_with_callback(&listener.event, listener.closure.as_ref().unchecked_ref())?;
        }
        Ok(())
    }
}

const VENDOR_PREFIXES: [&str; 4] = ["webkit", "moz", "ms", "o"];

fn element(node: &web_sys::Node) -> Result<&web_sys::Element, DomError> {
    node.dyn_ref::<web_sys::Element>().ok_or(DomError::NotAnElement)
}

/// Convert a native event into the payload handlers receive.
fn to_event(event: &web_sys::Event) -> Event {
    let value = event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value());
    let converted = Event::new(event.type_());
    match value {
        Some(value) => converted.with_value(value),
        None => converted,
    }
}

/// `fontSize` -> `font-size`. Names that already contain a dash
/// (including custom properties) pass through. Vendor prefixes get their
/// leading dash whether capitalized or not (`WebkitTransform`,
/// `webkitTransform` -> `-webkit-transform`), and `cssFloat` is `float`.
pub fn css_property_name(name: &str) -> String {
    if name.contains('-') {
        return name.to_owned();
    }
    if name == "cssFloat" {
        return "float".to_owned();
    }
    let mut css = String::with_capacity(name.len() + 4);
    let lowercase_vendor = VENDOR_PREFIXES.iter().any(|prefix| {
        name.strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(|ch: char| ch.is_ascii_uppercase()))
    });
    if lowercase_vendor {
        css.push('-');
    }
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            css.push('-');
            css.push(ch.to_ascii_lowercase());
        } else {
            css.push(ch);
        }
    }
    css
}

impl Host for DomHost {
    type Node = web_sys::Node;
    type Error = DomError;

    fn create_text(&mut self, value: &str) -> Result<web_sys::Node, DomError> {
        Ok(self.document.create_text_node(value).into())
    }

    fn create_element(&mut self, tag: &str) -> Result<web_sys::Node, DomError> {
        Ok(self.document.create_element(tag)?.into())
    }

    fn set_attribute(&mut self, node: &web_sys::Node, name: &str, value: &str) -> Result<(), DomError> {
        element(node)?.set_attribute(name, value)?;
        Ok(())
    }

    fn set_style(&mut self, node: &web_sys::Node, name: &str, value: &str) -> Result<(), DomError> {
        let html = node
            .dyn_ref::<web_sys::HtmlElement>()
            .ok_or(DomError::NotStylable)?;
        html.style().set_property(&css_property_name(name), value)?;
        Ok(())
    }

    fn add_listener(&mut self, node: &web_sys::Node, event: &str, handler: &Handler) -> Result<(), DomError> {
        element(node)?;
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new({
            let handler = handler.clone();
            move |event: web_sys::Event| handler.call(&to_event(&event))
        });
        node.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.listeners.push(Listener {
            node: node.clone(),
            event: event.to_owned(),
            handler: handler.clone(),
            closure,
        });
        Ok(())
    }

    fn remove_listener(&mut self, node: &web_sys::Node, event: &str, handler: &Handler) -> Result<(), DomError> {
        let position = self.listeners.iter().position(|listener| {
            listener.event == event
                && listener.handler == *handler
                && listener.node.is_same_node(Some(node))
        });
        let Some(position) = position else {
            trace!("no `{event}` listener to remove");
            return Ok(());
        };
        let listener = self.listeners.swap_remove(position);
        node.remove_event_listener_with_callback(event, listener.closure.as_ref().unchecked_ref())?;
        Ok(())
    }

    fn append_child(&mut self, parent: &web_sys::Node, child: &web_sys::Node) -> Result<(), DomError> {
        parent.append_child(child)?;
        Ok(())
    }

    fn remove_child(&mut self, parent: &web_sys::Node, child: &web_sys::Node) -> Result<(), DomError> {
        parent.remove_child(child)?;
        self.forget_listeners_within(child)
    }

    fn replace_child(&mut self, parent: &web_sys::Node, new: &web_sys::Node, old: &web_sys::Node) -> Result<(), DomError> {
        parent.replace_child(new, old)?;
        self.forget_listeners_within(old)
    }

    fn child_at(&self, parent: &web_sys::Node, index: usize) -> Option<web_sys::Node> {
        let index = u32::try_from(index).ok()?;
        parent.child_nodes().item(index)
    }
}
