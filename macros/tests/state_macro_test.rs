//! Tests for #[derive(State)] macro

use todos_macros::State;

#[derive(State, Clone, Debug, Default)]
struct ListState {
    pub items: Vec<String>,
    #[revision]
    pub revision: u64,
}

#[derive(State, Clone, Debug, Default)]
struct SimpleState {
    pub count: i32,
}

#[test]
fn test_revision_starts_at_zero() {
    let state = ListState::default();
    assert_eq!(state.revision(), 0);
}

#[test]
fn test_bump_revision() {
    let mut state = ListState {
        items: vec!["a".to_string()],
        revision: 4,
    };

    state.bump_revision();
    state.bump_revision();
    assert_eq!(state.revision(), 6);
    assert_eq!(state.items.len(), 1);
}

#[test]
fn test_bump_revision_wraps() {
    let mut state = ListState {
        items: Vec::new(),
        revision: u64::MAX,
    };

    state.bump_revision();
    assert_eq!(state.revision(), 0);
}

#[test]
fn test_state_without_revision() {
    // SimpleState has no #[revision] field, so the derive adds nothing
    let state = SimpleState::default();
    assert_eq!(state.count, 0);
}
