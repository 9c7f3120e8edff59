//! Scene tests: the node tree on its own, then driven by a runtime.

use shapes_lang::surface::ROOT;
use shapes_lang::{Input, NodeKind, RenderSurface, Runtime, ShapeKind};
use shapes_renderer::{shared, DrawItem, RenderMode, Rgba, Scene, SharedScene};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn runtime() -> (Runtime, SharedScene) {
    let scene = shared();
    let rt = Runtime::new(scene.clone(), Vec::<String>::new());
    (rt, scene)
}

fn exec(rt: &mut Runtime, lines: &[&str]) {
    for line in lines {
        rt.exec_line(line).unwrap_or_else(|e| panic!("`{line}` failed: {e}"));
    }
}

fn item<'a>(items: &'a [DrawItem], id: &str) -> &'a DrawItem {
    items.iter().find(|i| i.id == id).unwrap_or_else(|| panic!("`{id}` not drawn"))
}

fn ids(items: &[DrawItem]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

// ─── Tree ────────────────────────────────────────────────────────────────────

#[test]
fn new_scene_has_only_the_root() {
    let scene = Scene::new();
    assert!(scene.is_empty());
    assert_eq!(scene.get_node(ROOT), Some(NodeKind::Group));
    assert!(scene.draw_list().is_empty());
}

#[test]
fn append_moves_nodes() {
    let mut scene = Scene::new();
    scene.create_node(ShapeKind::Circle, "a");
    scene.create_group("g");
    scene.append_child(ROOT, "g");
    scene.append_child(ROOT, "a");
    scene.append_child("g", "a");

    assert_eq!(scene.container("a"), Some("g"));
    assert_eq!(scene.children(ROOT), ["g"]);
    assert_eq!(scene.children("g"), ["a"]);
}

#[test]
fn append_ignores_bad_targets() {
    let mut scene = Scene::new();
    scene.create_group("g");
    scene.create_group("h");
    scene.create_node(ShapeKind::Rect, "a");
    scene.append_child(ROOT, "g");
    scene.append_child("g", "h");

    scene.append_child("h", "g");
    scene.append_child("missing", "a");
    scene.append_child("a", "h");
    scene.append_child("g", ROOT);

    assert_eq!(scene.container("g"), Some(ROOT));
    assert_eq!(scene.container("h"), Some("g"));
    assert_eq!(scene.container("a"), None);
}

#[test]
fn deleting_a_group_rehomes_its_children() {
    let mut scene = Scene::new();
    scene.create_group("g");
    scene.create_node(ShapeKind::Circle, "a");
    scene.append_child(ROOT, "g");
    scene.append_child("g", "a");

    scene.delete_node("g");
    assert!(!scene.contains("g"));
    assert_eq!(scene.container("a"), Some(ROOT));
    assert_eq!(scene.children(ROOT), ["a"]);

    scene.delete_node(ROOT);
    assert!(scene.contains(ROOT));
}

#[test]
fn remove_child_detaches() {
    let mut scene = Scene::new();
    scene.create_node(ShapeKind::Circle, "a");
    scene.append_child(ROOT, "a");
    scene.remove_child("elsewhere", "a");
    assert_eq!(scene.container("a"), Some(ROOT));
    scene.remove_child(ROOT, "a");
    assert_eq!(scene.container("a"), None);
}

// ─── Driven by a runtime ─────────────────────────────────────────────────────

#[test]
fn shapes_are_drawn_with_their_style() {
    let (mut rt, scene) = runtime();
    exec(&mut rt, &["add circle sun 50 50 10 #ff8000", "add rect box 0 0 20 10 blue"]);

    let items = scene.borrow().draw_list();
    assert_eq!(ids(&items), ["sun", "box"]);

    let sun = item(&items, "sun");
    assert_eq!(sun.mode, RenderMode::Outline(2.0));
    assert_eq!(sun.color, Rgba::rgb(255, 128, 0));
    assert_eq!(sun.points.len(), 64);

    let bx = item(&items, "box");
    assert_eq!(bx.mode, RenderMode::Fill);
    assert_eq!(bx.points, vec![(0.0, 0.0), (20.0, 0.0), (20.0, 10.0), (0.0, 10.0)]);
}

#[test]
fn unknown_fill_falls_back_to_black() {
    let (mut rt, scene) = runtime();
    exec(&mut rt, &["add rect a 0 0 1 1 plaid"]);
    assert_eq!(item(&scene.borrow().draw_list(), "a").color, Rgba::BLACK);
}

#[test]
fn bound_children_are_drawn_inside_their_group() {
    let (mut rt, scene) = runtime();
    exec(&mut rt, &["add rect p 100 100 20 20", "add rect c 0 0 2 2", "bind p c 5 5"]);

    let s = scene.borrow();
    assert_eq!(s.container("c"), Some("p+c"));
    assert_eq!(s.container("p+c"), Some(ROOT));
    let items = s.draw_list();
    assert_eq!(items.len(), 2);
    assert_eq!(item(&items, "c").points[0], (105.0, 105.0));
}

#[test]
fn removing_a_parent_cleans_up_groups() {
    let (mut rt, scene) = runtime();
    exec(&mut rt, &["add rect p 100 100 20 20", "add rect c 0 0 2 2", "bind p c 5 5", "remove p"]);

    let s = scene.borrow();
    assert!(!s.contains("p"));
    assert!(!s.contains("p+c"));
    assert_eq!(s.children(ROOT), ["c"]);
    assert_eq!(ids(&s.draw_list()), ["c"]);
}

#[test]
fn animation_updates_the_drawn_geometry() {
    let (mut rt, scene) = runtime();
    exec(&mut rt, &["add rect a 0 0 2 2", "rotate a 90 1"]);
    rt.tick(&Input { dt: 1.0 });

    let items = scene.borrow().draw_list();
    let (x, y) = item(&items, "a").points[0];
    // Top-left corner after a quarter turn about (1, 1).
    assert!((x - 2.0).abs() < 1e-9 && y.abs() < 1e-9);
}
