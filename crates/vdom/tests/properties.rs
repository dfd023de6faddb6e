//! Reconciler properties checked against the recording host.

use std::cell::RefCell;
use std::rc::Rc;

use vdom::testing::{Mutation, NodeId, RecordingHost};
use vdom::{h, leaf, reconcile, text, Event, Handler, Host, Props, Style, VNode};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Render `tree` into a fresh container and clear the log.
fn mounted(tree: &VNode) -> (RecordingHost, NodeId) {
    init_logging();
    let mut host = RecordingHost::new();
    let root = host.create_root();
    reconcile(&mut host, &root, None, Some(tree), 0).unwrap();
    host.take_mutations();
    (host, root)
}

fn item(label: &str) -> VNode {
    h("li", Props::new().attr("class", "item"), [label])
}

fn sample_tree(on_click: Handler) -> VNode {
    h("div", Props::new().attr("id", "app").style(Style::new().set("color", "red")), [
        h("button", Props::new().on("click", on_click), ["+"]),
        h("ul", Props::new(), [item("a"), item("b")]),
        text("footer"),
    ])
}

#[test]
fn identical_tree_produces_no_mutations() {
    let tree = sample_tree(Handler::new(|_| {}));
    let (mut host, root) = mounted(&tree);

    reconcile(&mut host, &root, Some(&tree), Some(&tree), 0).unwrap();

    assert!(host.mutations().is_empty(), "unexpected: {:?}", host.mutations());
}

#[test]
fn cloned_tree_produces_no_mutations() {
    let tree = sample_tree(Handler::new(|_| {}));
    let (mut host, root) = mounted(&tree);

    // Clones share handler and style identity
    let again = tree.clone();
    reconcile(&mut host, &root, Some(&tree), Some(&again), 0).unwrap();

    assert!(host.mutations().is_empty());
}

#[test]
fn absent_old_appends_exactly_one_node() {
    init_logging();
    let mut host = RecordingHost::new();
    let root = host.create_root();
    let existing = host.create_text("existing").unwrap();
    host.append_child(&root, &existing).unwrap();
    host.take_mutations();

    let tree = h("p", Props::new(), ["hi"]);
    // Index is ignored for insertion: the node always lands last.
    reconcile(&mut host, &root, None, Some(&tree), 0).unwrap();

    let appends: Vec<_> = host
        .mutations()
        .iter()
        .filter(|m| matches!(m, Mutation::AppendChild { parent, .. } if *parent == root))
        .collect();
    assert_eq!(appends.len(), 1);
    assert_eq!(host.inner_markup(root), "existing<p>hi</p>");
}

#[test]
fn absent_new_removes_exactly_the_indexed_node() {
    init_logging();
    let mut host = RecordingHost::new();
    let root = host.create_root();
    for label in ["a", "b", "c"] {
        reconcile(&mut host, &root, None, Some(&text(label)), 0).unwrap();
    }
    let b = host.children(root)[1];
    host.take_mutations();

    reconcile(&mut host, &root, Some(&text("b")), None, 1).unwrap();

    assert_eq!(host.take_mutations(), vec![Mutation::RemoveChild { parent: root, child: b }]);
    assert_eq!(host.inner_markup(root), "ac");
}

#[test]
fn kind_change_replaces_once_and_drops_listeners() {
    let clicks = Rc::new(RefCell::new(0));
    let on_click = Handler::new({
        let clicks = clicks.clone();
        move |_| *clicks.borrow_mut() += 1
    });
    let old = h("div", Props::new().on("click", on_click), ["x"]);
    let new = h("span", Props::new(), ["x"]);
    let (mut host, root) = mounted(&old);
    let old_div = host.children(root)[0];

    reconcile(&mut host, &root, Some(&old), Some(&new), 0).unwrap();

    let replaces: Vec<_> = host.mutations().iter().filter(|m| m.is_structural() && matches!(m, Mutation::ReplaceChild { .. })).collect();
    assert_eq!(replaces.len(), 1);
    assert!(!host.mutations().iter().any(|m| matches!(m, Mutation::RemoveListener { .. })));
    assert_eq!(host.inner_markup(root), "<span>x</span>");
    assert_eq!(host.parent(old_div), None);

    let span = host.children(root)[0];
    assert_eq!(host.dispatch(span, &Event::new("click")), 0);
    assert_eq!(*clicks.borrow(), 0);
}

#[test]
fn style_diff_clears_dropped_and_sets_new() {
    let old = leaf("p", Props::new().style(Style::new().set("color", "red").set("fontSize", "12px")));
    let new = leaf("p", Props::new().style(Style::new().set("color", "blue")));
    let (mut host, root) = mounted(&old);
    let p = host.children(root)[0];

    reconcile(&mut host, &root, Some(&old), Some(&new), 0).unwrap();

    assert_eq!(
        host.take_mutations(),
        vec![
            Mutation::SetStyle { node: p, name: "fontSize".into(), value: "".into() },
            Mutation::SetStyle { node: p, name: "color".into(), value: "blue".into() },
        ]
    );
    assert_eq!(host.style(p, "color"), Some("blue"));
    assert_eq!(host.style(p, "fontSize"), None);
}

#[test]
fn fresh_style_with_same_entries_is_reapplied() {
    let old = leaf("p", Props::new().style(Style::new().set("color", "red")));
    let new = leaf("p", Props::new().style(Style::new().set("color", "red")));
    let (mut host, root) = mounted(&old);

    reconcile(&mut host, &root, Some(&old), Some(&new), 0).unwrap();

    assert_eq!(host.mutations().len(), 1);
    assert!(matches!(&host.mutations()[0], Mutation::SetStyle { name, .. } if name == "color"));
}

#[test]
fn handler_swap_unsubscribes_and_subscribes_once() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let handler = |tag: &'static str| {
        let calls = calls.clone();
        Handler::new(move |_| calls.borrow_mut().push(tag))
    };
    let f = handler("f");
    let g = handler("g");
    let old = leaf("button", Props::new().on("click", f));
    let new = leaf("button", Props::new().on("click", g));
    let (mut host, root) = mounted(&old);
    let button = host.children(root)[0];

    reconcile(&mut host, &root, Some(&old), Some(&new), 0).unwrap();

    assert_eq!(
        host.take_mutations(),
        vec![
            Mutation::RemoveListener { node: button, event: "click".into() },
            Mutation::AddListener { node: button, event: "click".into() },
        ]
    );
    assert_eq!(host.listener_count(button, "click"), 1);
    host.dispatch(button, &Event::new("click"));
    assert_eq!(*calls.borrow(), ["g"]);
}

#[test]
fn growing_children_only_creates_the_tail() {
    let old = h("ul", Props::new(), [item("A"), item("B")]);
    let new = h("ul", Props::new(), [item("A"), item("B"), item("C")]);
    let (mut host, root) = mounted(&old);
    let ul = host.children(root)[0];
    let before: Vec<_> = host.children(ul).to_vec();

    reconcile(&mut host, &root, Some(&old), Some(&new), 0).unwrap();

    let mutations = host.take_mutations();
    let structural: Vec<_> = mutations.iter().filter(|m| m.is_structural()).collect();
    let c = host.children(ul)[2];
    // <li> gets its text appended, then lands under <ul>
    assert_eq!(structural.last(), Some(&&Mutation::AppendChild { parent: ul, child: c }));
    assert!(mutations.iter().all(|m| !matches!(m, Mutation::RemoveChild { .. } | Mutation::ReplaceChild { .. })));
    assert!(mutations.iter().all(|m| !matches!(m, Mutation::SetAttribute { node, .. } if before.contains(node))));
    assert_eq!(&host.children(ul)[..2], &before[..]);
    assert_eq!(
        host.to_markup(ul),
        "<ul><li class=\"item\">A</li><li class=\"item\">B</li><li class=\"item\">C</li></ul>"
    );
}

#[test]
fn shrinking_children_removes_the_tail_only() {
    let old = h("ul", Props::new(), [item("A"), item("B"), item("C")]);
    let new = h("ul", Props::new(), [item("A")]);
    let (mut host, root) = mounted(&old);
    let ul = host.children(root)[0];
    let [a, b, c] = [host.children(ul)[0], host.children(ul)[1], host.children(ul)[2]];

    reconcile(&mut host, &root, Some(&old), Some(&new), 0).unwrap();

    assert_eq!(
        host.take_mutations(),
        vec![
            Mutation::RemoveChild { parent: ul, child: c },
            Mutation::RemoveChild { parent: ul, child: b },
        ]
    );
    assert_eq!(host.children(ul), [a]);
}

#[test]
fn reordering_patches_by_position() {
    let old = h("ul", Props::new(), [item("A"), item("B")]);
    let new = h("ul", Props::new(), [item("B"), item("A")]);
    let (mut host, root) = mounted(&old);
    let ul = host.children(root)[0];
    let before: Vec<_> = host.children(ul).to_vec();

    reconcile(&mut host, &root, Some(&old), Some(&new), 0).unwrap();

    // Both <li> stay in place; only their text nodes are replaced
    let replaces = host
        .mutations()
        .iter()
        .filter(|m| matches!(m, Mutation::ReplaceChild { .. }))
        .count();
    assert_eq!(replaces, 2);
    assert_eq!(host.children(ul), &before[..]);
    assert_eq!(host.inner_markup(ul), "<li class=\"item\">B</li><li class=\"item\">A</li>");
}

#[test]
fn dropped_attribute_stays_on_host_node() {
    let old = leaf("input", Props::new().attr("disabled", "true").attr("id", "name"));
    let new = leaf("input", Props::new().attr("id", "name"));
    let (mut host, root) = mounted(&old);
    let input = host.children(root)[0];

    reconcile(&mut host, &root, Some(&old), Some(&new), 0).unwrap();

    assert!(host.mutations().is_empty());
    assert_eq!(host.attribute(input, "disabled"), Some("true"));
}

#[test]
fn trees_are_not_mutated() {
    let old = sample_tree(Handler::new(|_| {}));
    let new = h("div", Props::new().attr("id", "other"), [text("only")]);
    let (old_copy, new_copy) = (old.clone(), new.clone());
    let (mut host, root) = mounted(&old);

    reconcile(&mut host, &root, Some(&old), Some(&new), 0).unwrap();

    assert_eq!(old, old_copy);
    assert_eq!(new, new_copy);
}
