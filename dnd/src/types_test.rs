use super::*;

fn loc(container: &str, index: usize) -> DraggableLocation {
    DraggableLocation::new(container, index)
}

#[test]
fn cancel_clears_destination() {
    let result = DropResult::new("card-1", loc("a", 0), Some(loc("b", 2)), DropReason::Cancel);
    assert_eq!(result.destination, None);
    assert_eq!(result.reason, DropReason::Cancel);
}

#[test]
fn drop_keeps_destination() {
    let result = DropResult::new("card-1", loc("a", 0), Some(loc("b", 2)), DropReason::Drop);
    assert_eq!(result.destination, Some(loc("b", 2)));
}

#[test]
fn noop_when_destination_missing() {
    let result = DropResult::new("card-1", loc("a", 0), None, DropReason::Drop);
    assert!(result.is_noop());
}

#[test]
fn noop_when_destination_equals_source() {
    let result = DropResult::new("card-1", loc("a", 3), Some(loc("a", 3)), DropReason::Drop);
    assert!(result.is_noop());
}

#[test]
fn not_noop_for_index_change() {
    let result = DropResult::new("card-1", loc("a", 0), Some(loc("a", 1)), DropReason::Drop);
    assert!(!result.is_noop());
}

#[test]
fn not_noop_for_container_change() {
    let result = DropResult::new("card-1", loc("a", 0), Some(loc("b", 0)), DropReason::Drop);
    assert!(!result.is_noop());
}

#[test]
fn cancelled_result_is_always_noop() {
    let result = DropResult::new("card-1", loc("a", 0), Some(loc("b", 5)), DropReason::Cancel);
    assert!(result.is_noop());
}

#[test]
fn container_role_defaults_to_ordinary() {
    assert_eq!(ContainerRole::default(), ContainerRole::Ordinary);
}

#[test]
fn drop_reason_wire_names() {
    assert_eq!(serde_json::to_string(&DropReason::Drop).unwrap(), "\"DROP\"");
    assert_eq!(serde_json::to_string(&DropReason::Cancel).unwrap(), "\"CANCEL\"");
}
