//! State Managers
//!
//! `ShoppingLists` owns the list collection and its mirror; `ListItems` is a
//! per-list view that writes back through `ShoppingLists::update_list`.

mod items;
mod lists;


pub use items::ListItems;
pub use lists::ShoppingLists;
