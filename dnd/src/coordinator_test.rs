use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;
use crate::geometry::Rect;

// =============================================================
// Helpers
// =============================================================

/// Counts host transitions through shared cells so they survive the
/// coordinator being dropped.
#[derive(Clone, Default)]
struct CountingHost {
    acquired: Rc<Cell<u32>>,
    released: Rc<Cell<u32>>,
}

impl DragHost for CountingHost {
    fn attach_listeners(&mut self) {}

    fn detach_listeners(&mut self) {}

    fn suspend_selection(&mut self) {}

    fn restore_selection(&mut self) {}

    fn acquire(&mut self) {
        self.acquired.set(self.acquired.get() + 1);
    }

    fn release(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

type Results = Rc<RefCell<Vec<DropResult<String>>>>;

fn coordinator() -> (Coordinator<String, CountingHost>, CountingHost, Results) {
    let host = CountingHost::default();
    let results: Results = Rc::default();
    let sink = Rc::clone(&results);
    let mut coord = Coordinator::new(
        host.clone(),
        DndConfig::default(),
        Box::new(move |r| sink.borrow_mut().push(r)),
    );

    coord.register_container("todo", ContainerRole::Ordinary, || Rect::new(0.0, 0.0, 200.0, 400.0));
    coord.register_container("done", ContainerRole::Ordinary, || Rect::new(220.0, 0.0, 200.0, 400.0));
    coord.register_item("t1".to_owned(), "todo", 0, || Rect::new(0.0, 0.0, 200.0, 50.0));
    coord.register_item("t2".to_owned(), "todo", 1, || Rect::new(0.0, 60.0, 200.0, 50.0));
    (coord, host, results)
}

/// Grab t1 at its top-left corner; its center is pointer + (100, 25).
fn grab_t1(coord: &mut Coordinator<String, CountingHost>) {
    assert!(coord.start_drag("t1".to_owned(), DraggableLocation::new("todo", 0), Point::new(0.0, 0.0)));
}

// =============================================================
// Drag-end sink
// =============================================================

#[test]
fn pointer_up_delivers_drop_result() {
    let (mut coord, _host, results) = coordinator();
    grab_t1(&mut coord);
    coord.pointer_move(Point::new(240.0, 100.0));
    coord.pointer_up();

    let results = results.borrow();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].reason, DropReason::Drop);
    assert_eq!(results[0].source, DraggableLocation::new("todo", 0));
    assert_eq!(results[0].destination, Some(DraggableLocation::new("done", 0)));
}

#[test]
fn pointer_cancel_delivers_result_without_destination() {
    let (mut coord, _host, results) = coordinator();
    grab_t1(&mut coord);
    coord.pointer_move(Point::new(240.0, 100.0));
    coord.pointer_cancel();

    let results = results.borrow();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].reason, DropReason::Cancel);
    assert!(results[0].destination.is_none());
    assert!(results[0].is_noop());
}

#[test]
fn pointer_up_without_gesture_emits_nothing() {
    let (mut coord, host, results) = coordinator();
    coord.pointer_up();
    coord.pointer_cancel();
    assert!(results.borrow().is_empty());
    assert_eq!(host.released.get(), 0);
}

#[test]
fn drop_in_place_is_noop() {
    let (mut coord, _host, results) = coordinator();
    grab_t1(&mut coord);
    coord.pointer_up();
    assert!(results.borrow()[0].is_noop());
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn second_start_is_rejected() {
    let (mut coord, host, _results) = coordinator();
    grab_t1(&mut coord);
    assert!(!coord.start_drag("t2".to_owned(), DraggableLocation::new("todo", 1), Point::new(0.0, 60.0)));
    assert_eq!(coord.session().map(|s| s.item.as_str()), Some("t1"));
    assert_eq!(host.acquired.get(), 1);
}

#[test]
fn teardown_mid_gesture_cancels_and_releases() {
    let (mut coord, host, results) = coordinator();
    grab_t1(&mut coord);
    coord.pointer_move(Point::new(240.0, 100.0));
    drop(coord);

    assert_eq!(host.acquired.get(), 1);
    assert_eq!(host.released.get(), 1);
    let results = results.borrow();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].reason, DropReason::Cancel);
    assert!(results[0].destination.is_none());
}

#[test]
fn teardown_when_idle_is_silent() {
    let (coord, host, results) = coordinator();
    drop(coord);
    assert!(results.borrow().is_empty());
    assert_eq!(host.released.get(), 0);
}

#[test]
fn teardown_after_drop_releases_once() {
    let (mut coord, host, results) = coordinator();
    grab_t1(&mut coord);
    coord.pointer_up();
    drop(coord);
    assert_eq!(host.released.get(), 1);
    assert_eq!(results.borrow().len(), 1);
}

// =============================================================
// Reads
// =============================================================

#[test]
fn is_dragging_tracks_active_item() {
    let (mut coord, _host, _results) = coordinator();
    assert!(!coord.is_dragging(&"t1".to_owned()));
    grab_t1(&mut coord);
    assert!(coord.is_dragging(&"t1".to_owned()));
    assert!(!coord.is_dragging(&"t2".to_owned()));
    coord.pointer_up();
    assert!(!coord.is_dragging(&"t1".to_owned()));
}

#[test]
fn is_drag_over_follows_destination() {
    let (mut coord, _host, _results) = coordinator();
    grab_t1(&mut coord);
    assert!(coord.is_drag_over("todo"));
    coord.pointer_move(Point::new(240.0, 100.0));
    assert!(coord.is_drag_over("done"));
    assert!(!coord.is_drag_over("todo"));
    coord.pointer_cancel();
    assert!(!coord.is_drag_over("done"));
}

// =============================================================
// Registration during a gesture
// =============================================================

#[test]
fn containers_registered_mid_gesture_become_targets() {
    let (mut coord, _host, _results) = coordinator();
    grab_t1(&mut coord);
    coord.register_container("later", ContainerRole::Ordinary, || Rect::new(500.0, 0.0, 200.0, 400.0));
    assert_eq!(coord.pointer_move(Point::new(520.0, 10.0)), Some(&DraggableLocation::new("later", 0)));
}

#[test]
fn unregistered_container_stops_being_a_target() {
    let (mut coord, _host, _results) = coordinator();
    let token = coord.register_container("gone", ContainerRole::Ordinary, || Rect::new(500.0, 0.0, 200.0, 400.0));
    assert!(coord.unregister_container("gone", token));
    grab_t1(&mut coord);
    let dest = coord.pointer_move(Point::new(520.0, 10.0)).cloned();
    assert_eq!(dest.map(|d| d.container_id), Some("done".to_owned()));
}

#[test]
fn layout_shift_is_seen_on_next_move() {
    let (mut coord, _host, _results) = coordinator();
    let left = Rc::new(Cell::new(1000.0));
    let shared_left = Rc::clone(&left);
    coord.register_container("drawer", ContainerRole::Ordinary, move || Rect::new(shared_left.get(), 0.0, 100.0, 100.0));
    grab_t1(&mut coord);

    // Center (560, 35) misses the drawer while it sits at x=1000.
    let before = coord.pointer_move(Point::new(460.0, 10.0)).cloned();
    assert_ne!(before.map(|d| d.container_id), Some("drawer".to_owned()));

    left.set(500.0);
    let after = coord.pointer_move(Point::new(460.0, 10.0)).cloned();
    assert_eq!(after, Some(DraggableLocation::new("drawer", 0)));
}

#[test]
fn update_item_reorders_siblings() {
    let (mut coord, _host, _results) = coordinator();
    coord.register_item("t3".to_owned(), "todo", 2, || Rect::new(0.0, 120.0, 200.0, 50.0));
    // Drag t3 to just above t2's center (85).
    assert!(coord.start_drag("t3".to_owned(), DraggableLocation::new("todo", 2), Point::new(0.0, 120.0)));
    assert_eq!(coord.pointer_move(Point::new(0.0, 50.0)), Some(&DraggableLocation::new("todo", 1)));

    coord.pointer_cancel();
    assert!(coord.update_item(&"t1".to_owned(), 5, "todo"));
    assert!(coord.registry().item(&"t1".to_owned()).is_some_and(|i| i.index == 5));
}

#[test]
fn default_config_uses_vertical_axis() {
    assert_eq!(DndConfig::default().default_axis, Axis::Vertical);
}

#[test]
fn target_unregistered_before_release_drops_without_destination() {
    let (mut coord, _host, results) = coordinator();
    let token = coord.register_container("gone", ContainerRole::Ordinary, || Rect::new(500.0, 0.0, 200.0, 400.0));
    grab_t1(&mut coord);
    assert_eq!(coord.pointer_move(Point::new(520.0, 10.0)), Some(&DraggableLocation::new("gone", 0)));
    assert!(coord.is_drag_over("gone"));

    assert!(coord.unregister_container("gone", token));
    assert!(!coord.is_drag_over("gone"));
    coord.pointer_up();

    let results = results.borrow();
    assert_eq!(results[0].reason, DropReason::Drop);
    assert_eq!(results[0].destination, None);
    assert!(results[0].is_noop());
}

// =============================================================
// Window pointer dispatch
// =============================================================

#[test]
fn window_signals_drive_the_gesture() {
    let (mut coord, host, results) = coordinator();
    grab_t1(&mut coord);
    coord.handle_window_pointer(WindowPointer::Move(Point::new(240.0, 100.0)));
    assert!(coord.is_drag_over("done"));
    coord.handle_window_pointer(WindowPointer::Up);

    assert_eq!(results.borrow()[0].destination, Some(DraggableLocation::new("done", 0)));
    assert_eq!(host.released.get(), 1);
}

#[test]
fn window_cancel_signal_cancels() {
    let (mut coord, _host, results) = coordinator();
    grab_t1(&mut coord);
    coord.handle_window_pointer(WindowPointer::Cancel);
    assert_eq!(results.borrow()[0].reason, DropReason::Cancel);
    assert!(coord.session().is_none());
}
