//! VNode model.
//!
//! A `VNode` is an immutable description of one host node and its subtree.
//! Children are identified by their position only; there is no key field.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;

/// Prefix marking an event-handler prop key (`onClick`, `onInput`).
pub const EVENT_PREFIX: &str = "on";

/// Reserved prop key holding a [`Style`] mapping.
pub const STYLE_KEY: &str = "style";

// ---------------------------------------------------------------------------
// VNode
// ---------------------------------------------------------------------------

/// A virtual node: either a text leaf or an element with props and children.
#[derive(Clone, Debug, PartialEq)]
pub enum VNode {
    Text(Arc<str>),
    Element(Element),
}

impl VNode {
    pub fn text(value: impl Into<Arc<str>>) -> Self {
        VNode::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            VNode::Text(value) => Some(value),
            VNode::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            VNode::Element(element) => Some(element),
            VNode::Text(_) => None,
        }
    }

    /// Children in positional order. Text leaves have none.
    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element(element) => &element.children,
            VNode::Text(_) => &[],
        }
    }

    /// Short label for log output: the tag name, or `#text`.
    pub fn label(&self) -> &str {
        match self {
            VNode::Element(element) => &element.kind,
            VNode::Text(_) => "#text",
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(VNode::node_count).sum::<usize>()
    }
}

impl From<&str> for VNode {
    fn from(value: &str) -> Self {
        VNode::Text(value.into())
    }
}

impl From<String> for VNode {
    fn from(value: String) -> Self {
        VNode::Text(value.into())
    }
}

impl From<Arc<str>> for VNode {
    fn from(value: Arc<str>) -> Self {
        VNode::Text(value)
    }
}

impl From<Element> for VNode {
    fn from(element: Element) -> Self {
        VNode::Element(element)
    }
}

/// Element payload of a [`VNode`].
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Host tag name (`div`, `li`, ...)
    pub kind: Arc<str>,
    pub props: Props,
    /// Children in positional order
    pub children: Vec<VNode>,
}

// ---------------------------------------------------------------------------
// Props
// ---------------------------------------------------------------------------

/// Ordered prop mapping. Inserting an existing key replaces its value but
/// keeps the key's original position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props(IndexMap<Arc<str>, PropValue>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain attribute (`id`, `class`, `href`, ...).
    pub fn attr(mut self, key: impl Into<Arc<str>>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Event handler, stored under `on` + the capitalized event name,
    /// so `on("click", f)` lands on `onClick`.
    pub fn on(mut self, event: &str, handler: Handler) -> Self {
        self.insert(event_key(event), handler);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.insert(STYLE_KEY, style);
        self
    }

    /// Raw insert; last write wins.
    pub fn insert(
        &mut self,
        key: impl Into<Arc<str>>,
        value: impl Into<PropValue>,
    ) -> Option<PropValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|key| key.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(key, value)| (key.as_ref(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<Arc<str>>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (key, value) in iter {
            props.insert(key, value);
        }
        props
    }
}

/// Value stored under a prop key.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    /// Plain scalar, already stringified
    Attr(Arc<str>),
    /// Event handler; belongs under an `on*` key
    Handler(Handler),
    /// Style mapping; belongs under the `style` key
    Style(Style),
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Attr(value.into())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Attr(value.into())
    }
}

impl From<Arc<str>> for PropValue {
    fn from(value: Arc<str>) -> Self {
        PropValue::Attr(value)
    }
}

macro_rules! attr_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PropValue {
                fn from(value: $ty) -> Self {
                    PropValue::Attr(value.to_string().into())
                }
            }
        )*
    };
}

attr_from_display!(bool, i32, i64, u32, u64, usize, f64);

impl From<Handler> for PropValue {
    fn from(handler: Handler) -> Self {
        PropValue::Handler(handler)
    }
}

impl From<Style> for PropValue {
    fn from(style: Style) -> Self {
        PropValue::Style(style)
    }
}

/// `"click"` -> `"onClick"`
pub fn event_key(event: &str) -> String {
    let mut chars = event.chars();
    let mut key = String::with_capacity(EVENT_PREFIX.len() + event.len());
    key.push_str(EVENT_PREFIX);
    if let Some(first) = chars.next() {
        key.extend(first.to_uppercase());
        key.push_str(chars.as_str());
    }
    key
}

/// Event name for an event-handler key: the `on` prefix stripped and the
/// remainder lowercased (`onClick` -> `click`). `None` for other keys.
pub fn event_name(key: &str) -> Option<String> {
    key.strip_prefix(EVENT_PREFIX).map(str::to_lowercase)
}

/// How a prop is applied to a host node, resolved from its key and value.
pub(crate) enum Binding<'a> {
    Listener { event: String, handler: &'a Handler },
    Style(&'a Style),
    Attr(&'a str),
}

/// Resolve a prop. A `style` key holding a scalar is a plain attribute;
/// every other key/value mismatch is rejected with a reason.
pub(crate) fn bind<'a>(key: &str, value: &'a PropValue) -> Result<Binding<'a>, &'static str> {
    if let Some(event) = event_name(key) {
        return match value {
            PropValue::Handler(handler) => Ok(Binding::Listener { event, handler }),
            _ => Err("event prop needs a handler"),
        };
    }
    match value {
        PropValue::Style(style) if key == STYLE_KEY => Ok(Binding::Style(style)),
        PropValue::Style(_) => Err("style mapping outside the `style` key"),
        PropValue::Handler(_) => Err("handler outside an `on` key"),
        PropValue::Attr(value) => Ok(Binding::Attr(value)),
    }
}

// ---------------------------------------------------------------------------
// Handler / Event
// ---------------------------------------------------------------------------

/// Payload passed to a [`Handler`] when its event fires.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Event name (`click`, `input`, ...)
    pub name: Arc<str>,
    /// Current value of the event target, when the host has one (text inputs)
    pub value: Option<Arc<str>>,
}

impl Event {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<Arc<str>>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Event callback with identity semantics: two handlers are equal only when
/// they share one allocation. Clones keep the identity; wrapping the same
/// closure twice does not.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Event)>);

impl Handler {
    pub fn new(callback: impl Fn(&Event) + 'static) -> Self {
        Handler(Rc::new(callback))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Ordered style mapping (`color` -> `red`). Compared by identity like
/// [`Handler`]: a freshly built style never equals another one, even with
/// identical entries.
#[derive(Clone, Default)]
pub struct Style(Rc<IndexMap<Arc<str>, Arc<str>>>);

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
        Rc::make_mut(&mut self.0).insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|value| value.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_ref(), value.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<Arc<str>>, V: Into<Arc<str>>> FromIterator<(K, V)> for Style {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Style(Rc::new(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        ))
    }
}

impl PartialEq for Style {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
