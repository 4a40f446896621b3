//! Item Collection Manager
//!
//! A transient view of one list's items. Every mutation replaces the whole
//! sequence and persists it through `ShoppingLists::update_list`; the view is
//! applied first and rolled back if the persist fails.

use crate::domain::{find_by_id, new_id, remove_by_id, DomainResult, Item, ItemDraft, ListPatch, ShoppingList};

use super::lists::ShoppingLists;

pub struct ListItems {
    lists: ShoppingLists,
    list_id: String,
    items: Vec<Item>,
}

impl ListItems {
    /// View of a list in the collection, None if it is unknown
    pub async fn open(lists: ShoppingLists, list_id: &str) -> Option<Self> {
        let list = lists.get(list_id).await?;
        Some(Self {
            lists,
            list_id: list.id,
            items: list.items,
        })
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, item_id: &str) -> Option<&Item> {
        find_by_id(&self.items, item_id)
    }

    /// Follow the selected list: the local sequence is replaced, not merged
    pub fn sync(&mut self, list: &ShoppingList) {
        self.list_id = list.id.clone();
        self.items = list.items.clone();
    }

    /// Re-read the bound list; false if it left the collection
    pub async fn refresh(&mut self) -> bool {
        match self.lists.get(&self.list_id).await {
            Some(list) => {
                self.sync(&list);
                true
            }
            None => false,
        }
    }

    /// Items to display, completed ones only when asked for
    pub fn visible(&self, show_completed: bool) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| show_completed || !item.is_done)
            .collect()
    }

    pub fn done_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_done).count()
    }

    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    // ========================
    // Mutations
    // ========================

    /// Prepend a new item; a blank name adds nothing
    pub async fn add_item(&mut self, draft: ItemDraft) -> DomainResult<Option<Item>> {
        let Some(item) = draft.into_item(new_id()) else {
            return Ok(None);
        };

        let mut next = Vec::with_capacity(self.items.len() + 1);
        next.push(item.clone());
        next.extend(self.items.iter().cloned());
        self.persist(next).await?;
        Ok(Some(item))
    }

    pub async fn delete_item(&mut self, item_id: &str) -> DomainResult<()> {
        let mut next = self.items.clone();
        remove_by_id(&mut next, item_id);
        self.persist(next).await
    }

    pub async fn toggle_done(&mut self, item_id: &str) -> DomainResult<()> {
        let next = self
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                if item.id == item_id {
                    item.is_done = !item.is_done;
                }
                item
            })
            .collect();
        self.persist(next).await
    }

    /// Drop every completed item
    pub async fn clear_completed(&mut self) -> DomainResult<()> {
        let next = self.items.iter().filter(|item| !item.is_done).cloned().collect();
        self.persist(next).await
    }

    pub async fn check_all(&mut self) -> DomainResult<()> {
        self.set_all_done(true).await
    }

    pub async fn uncheck_all(&mut self) -> DomainResult<()> {
        self.set_all_done(false).await
    }

    async fn set_all_done(&mut self, done: bool) -> DomainResult<()> {
        let next = self
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                item.is_done = done;
                item
            })
            .collect();
        self.persist(next).await
    }

    /// Write the whole sequence back, unchanged sequences are not sent
    async fn persist(&mut self, next: Vec<Item>) -> DomainResult<()> {
        if next == self.items {
            return Ok(());
        }

        let previous = std::mem::replace(&mut self.items, next);
        let patch = ListPatch::items(self.items.clone());
        match self.lists.update_list(&self.list_id, patch).await {
            Ok(Some(list)) => {
                self.items = list.items;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                self.items = previous;
                Err(e)
            }
        }
    }
}
