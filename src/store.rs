//! List Collection State
//!
//! The in-memory collection owned by `ShoppingLists`, plus the helpers that
//! mutate it.

use crate::domain::{remove_by_id, replace_by_id, ShoppingList};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListsState {
    /// Lists visible to the current user, in store order
    pub lists: Vec<ShoppingList>,
    /// True until the first fetch has finished
    pub loading: bool,
    /// Text of the last failed fetch
    pub error: Option<String>,
}

impl ListsState {
    pub fn new(lists: Vec<ShoppingList>) -> Self {
        Self {
            lists,
            loading: true,
            error: None,
        }
    }

    pub fn active(&self) -> Vec<ShoppingList> {
        self.lists.iter().filter(|l| !l.archived).cloned().collect()
    }

    pub fn archived(&self) -> Vec<ShoppingList> {
        self.lists.iter().filter(|l| l.archived).cloned().collect()
    }
}

// ========================
// Store Helper Functions
// ========================

/// Append a list to the store
pub fn store_add_list(state: &mut ListsState, list: ShoppingList) {
    state.lists.push(list);
}

/// Replace a list in place, or append it when unknown
pub fn store_upsert_list(state: &mut ListsState, list: ShoppingList) {
    if !replace_by_id(&mut state.lists, list.clone()) {
        state.lists.push(list);
    }
}

/// Update a list in the store by ID
pub fn store_update_list(state: &mut ListsState, list: ShoppingList) -> bool {
    replace_by_id(&mut state.lists, list)
}

/// Remove a list from the store by ID
pub fn store_remove_list(state: &mut ListsState, list_id: &str) -> bool {
    remove_by_id(&mut state.lists, list_id)
}
