//! List Collection Manager
//!
//! Reconciles the in-memory collection with the remote store and keeps the
//! local mirror in step. State only changes after the remote call succeeded;
//! the lock is never held across a remote call, so overlapping writes resolve
//! last-write-wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;

use crate::domain::{find_by_id, new_id, DomainError, DomainResult, ListPatch, ShoppingList};
use crate::prompt::Notifier;
use crate::repository::{LocalMirror, RemoteListStore, MIRROR_KEY};
use crate::store::{
    store_add_list, store_remove_list, store_update_list, store_upsert_list, ListsState,
};

#[derive(Clone)]
pub struct ShoppingLists {
    remote: Arc<dyn RemoteListStore>,
    mirror: Arc<dyn LocalMirror>,
    notifier: Arc<dyn Notifier>,
    current_user: String,
    state: Arc<RwLock<ListsState>>,
    /// Revision of the latest snapshot taken
    revision: Arc<AtomicU64>,
    /// Revision currently in the mirror
    mirrored: Arc<Mutex<u64>>,
}

/// Serialized collection, taken while the state lock is held
struct MirrorSnapshot {
    revision: u64,
    json: String,
}

/// Best-effort hydration, any failure means "no cache"
fn load_from_mirror(mirror: &dyn LocalMirror) -> Vec<ShoppingList> {
    let stored = match mirror.read(MIRROR_KEY) {
        Ok(Some(stored)) => stored,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::warn!("Ignoring unreadable mirror: {}", e);
            return Vec::new();
        }
    };
    match serde_json::from_str::<serde_json::Value>(&stored) {
        Ok(raw) => ShoppingList::normalize_all(&raw),
        Err(e) => {
            log::warn!("Discarding corrupt mirror: {}", e);
            if let Err(e) = mirror.remove(MIRROR_KEY) {
                log::warn!("Failed to discard mirror: {}", e);
            }
            Vec::new()
        }
    }
}

impl ShoppingLists {
    /// Hydrates from the mirror; call `load` to fetch from the store
    pub fn new(
        remote: Arc<dyn RemoteListStore>,
        mirror: Arc<dyn LocalMirror>,
        notifier: Arc<dyn Notifier>,
        current_user: impl Into<String>,
    ) -> Self {
        let current_user = current_user.into();
        // The mirror is shared by every user of this data directory
        let cached: Vec<ShoppingList> = load_from_mirror(mirror.as_ref())
            .into_iter()
            .filter(|list| list.is_visible_to(&current_user))
            .collect();
        log::debug!("Hydrated {} lists from mirror", cached.len());
        Self {
            remote,
            mirror,
            notifier,
            current_user,
            state: Arc::new(RwLock::new(ListsState::new(cached))),
            revision: Arc::new(AtomicU64::new(0)),
            mirrored: Arc::new(Mutex::new(0)),
        }
    }

    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    pub fn notify(&self, message: &str) {
        self.notifier.notify(message);
    }

    // ========================
    // Reads
    // ========================

    pub async fn state(&self) -> ListsState {
        self.state.read().await.clone()
    }

    pub async fn lists(&self) -> Vec<ShoppingList> {
        self.state.read().await.lists.clone()
    }

    pub async fn get(&self, id: &str) -> Option<ShoppingList> {
        find_by_id(&self.state.read().await.lists, id).cloned()
    }

    pub async fn active(&self) -> Vec<ShoppingList> {
        self.state.read().await.active()
    }

    pub async fn archived(&self) -> Vec<ShoppingList> {
        self.state.read().await.archived()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    // ========================
    // Sync
    // ========================

    /// Replace the collection with the lists the store holds for this user
    ///
    /// On failure the mirrored collection stays and the error is recorded.
    pub async fn load(&self) -> DomainResult<()> {
        match self.fetch_visible().await {
            Ok(lists) => {
                let mut state = self.state.write().await;
                log::info!("Loaded {} lists for {}", lists.len(), self.current_user);
                state.lists = lists;
                state.loading = false;
                state.error = None;
                let snapshot = self.snapshot(&state);
                drop(state);
                self.save(snapshot);
                Ok(())
            }
            Err(e) => {
                log::error!("Error loading lists: {}", e);
                let mut state = self.state.write().await;
                state.loading = false;
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn fetch_visible(&self) -> DomainResult<Vec<ShoppingList>> {
        let records = self.remote.fetch_all().await?;
        Ok(records
            .iter()
            .map(ShoppingList::normalize)
            .filter(|list| list.is_visible_to(&self.current_user))
            .collect())
    }

    /// Refetch one list; returns None when it is no longer visible
    pub async fn reload_list(&self, id: &str) -> DomainResult<Option<ShoppingList>> {
        let raw = self
            .remote
            .fetch_one(id)
            .await
            .map_err(|e| self.fail("Reload failed", "Failed to load list.", e))?;
        let list = ShoppingList::normalize(&raw);

        let mut state = self.state.write().await;
        let visible = list.is_visible_to(&self.current_user);
        if visible {
            store_upsert_list(&mut state, list.clone());
        } else {
            store_remove_list(&mut state, id);
        }
        let snapshot = self.snapshot(&state);
        drop(state);
        self.save(snapshot);
        Ok(visible.then_some(list))
    }

    // ========================
    // Writes
    // ========================

    /// Create a new empty list
    pub async fn add_list(&self, title: &str, owner: &str) -> DomainResult<ShoppingList> {
        let draft = ShoppingList::new(new_id(), title, owner);
        let echoed = self
            .remote
            .create(&draft)
            .await
            .map_err(|e| self.fail("Add failed", "Failed to create list.", e))?;
        let created = draft.merged(&ListPatch::default(), &echoed)?;

        let mut state = self.state.write().await;
        store_add_list(&mut state, created.clone());
        let snapshot = self.snapshot(&state);
        drop(state);
        self.save(snapshot);
        log::info!("Created list {} ({})", created.id, created.title);
        Ok(created)
    }

    pub async fn remove_list(&self, id: &str) -> DomainResult<()> {
        self.remote
            .delete(id)
            .await
            .map_err(|e| self.fail("Delete failed", "Failed to delete list.", e))?;

        let mut state = self.state.write().await;
        store_remove_list(&mut state, id);
        let snapshot = self.snapshot(&state);
        drop(state);
        self.save(snapshot);
        log::info!("Deleted list {}", id);
        Ok(())
    }

    /// Partially update a list
    ///
    /// Returns the merged list, or None when the update left it invisible to
    /// the current user (it is then dropped from the collection).
    pub async fn update_list(
        &self,
        id: &str,
        patch: ListPatch,
    ) -> DomainResult<Option<ShoppingList>> {
        self.apply_update(id, &patch)
            .await
            .map_err(|e| self.fail("Update failed", "Failed to update list.", e))
    }

    /// `update_list` without the failure notice
    async fn apply_update(
        &self,
        id: &str,
        patch: &ListPatch,
    ) -> DomainResult<Option<ShoppingList>> {
        if self.get(id).await.is_none() {
            return Err(DomainError::NotFound(format!("list {}", id)));
        }

        let response = self.remote.update(id, patch).await?;

        let mut state = self.state.write().await;
        let Some(existing) = find_by_id(&state.lists, id).cloned() else {
            // Removed while the request was in flight
            log::debug!("List {} vanished before its update resolved", id);
            return Ok(None);
        };
        let updated = existing.merged(patch, &response)?;

        let result = if updated.is_visible_to(&self.current_user) {
            store_update_list(&mut state, updated.clone());
            Some(updated)
        } else {
            store_remove_list(&mut state, id);
            None
        };
        let snapshot = self.snapshot(&state);
        drop(state);
        self.save(snapshot);
        Ok(result)
    }

    // ========================
    // Membership
    // ========================

    /// Returns true when the member was added; blank and duplicate names are
    /// not attempted
    pub async fn invite_member(&self, list_id: &str, name: &str) -> DomainResult<bool> {
        let Some(list) = self.get(list_id).await else {
            let e = DomainError::NotFound(format!("list {}", list_id));
            return Err(self.fail("Invite failed", &format!("Failed to add member: {}", e), e));
        };

        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }
        if list.has_member(trimmed) {
            self.notify(&format!("User \"{}\" is already a member of this list.", trimmed));
            return Ok(false);
        }

        let mut members = list.members.clone();
        members.push(trimmed.to_string());
        match self.apply_update(list_id, &ListPatch::members(members)).await {
            Ok(_) => {
                self.notify(&format!("User \"{}\" was invited successfully.", trimmed));
                Ok(true)
            }
            Err(e) => Err(self.fail("Invite failed", &format!("Failed to add member: {}", e), e)),
        }
    }

    /// Returns true when the member was removed; absent members are not attempted
    pub async fn remove_member(&self, list_id: &str, name: &str) -> DomainResult<bool> {
        let Some(list) = self.get(list_id).await else {
            let e = DomainError::NotFound(format!("list {}", list_id));
            return Err(self.fail(
                "Remove member failed",
                &format!("Failed to remove member: {}", e),
                e,
            ));
        };

        if !list.has_member(name) {
            self.notify(&format!("User \"{}\" is not a member of this list.", name));
            return Ok(false);
        }

        let members = list.members.iter().filter(|m| *m != name).cloned().collect();
        match self.apply_update(list_id, &ListPatch::members(members)).await {
            Ok(_) => {
                self.notify(&format!("User \"{}\" was removed successfully.", name));
                Ok(true)
            }
            Err(e) => Err(self.fail(
                "Remove member failed",
                &format!("Failed to remove member: {}", e),
                e,
            )),
        }
    }

    // ========================
    // Helpers
    // ========================

    /// Log a failed write and tell the user once
    fn fail(&self, context: &str, notice: &str, e: DomainError) -> DomainError {
        log::error!("{}: {}", context, e);
        self.notifier.notify(notice);
        e
    }

    /// Serialize the collection; call with the state lock held
    fn snapshot(&self, state: &ListsState) -> Option<MirrorSnapshot> {
        match serde_json::to_string(&state.lists) {
            Ok(json) => Some(MirrorSnapshot {
                revision: self.revision.fetch_add(1, Ordering::SeqCst) + 1,
                json,
            }),
            Err(e) => {
                log::warn!("Failed to serialize mirror: {}", e);
                None
            }
        }
    }

    /// Mirror a snapshot unless a newer one is already written; write
    /// failures are logged and ignored
    fn save(&self, snapshot: Option<MirrorSnapshot>) {
        let Some(snapshot) = snapshot else {
            return;
        };
        let mut mirrored = match self.mirrored.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if snapshot.revision <= *mirrored {
            log::debug!("Skipping stale mirror revision {}", snapshot.revision);
            return;
        }
        match self.mirror.write(MIRROR_KEY, &snapshot.json) {
            Ok(()) => *mirrored = snapshot.revision,
            Err(e) => log::warn!("Failed to write mirror: {}", e),
        }
    }
}
