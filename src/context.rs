//! Application Context
//!
//! Wires the store, mirror and notifier chosen by the configuration into the
//! managers shared by the presentation layer.

use std::sync::Arc;

use crate::actions::ListActions;
use crate::config::AppConfig;
use crate::domain::DomainResult;
use crate::manager::{ListItems, ShoppingLists};
use crate::prompt::{NotificationLog, Prompter};
use crate::repository::{FileMirror, HttpListStore, LocalMirror, MemoryListStore, RemoteListStore};

/// Lists served in mock mode until the mock database exists
pub const MOCK_DATA: &str = include_str!("../fixtures/mock_data.json");
/// Mock database inside the data directory
pub const MOCK_DB_FILE: &str = "db.json";

#[derive(Clone)]
pub struct AppContext {
    pub lists: ShoppingLists,
    pub actions: ListActions,
    /// Notices waiting to be shown
    pub notifications: Arc<NotificationLog>,
}

impl AppContext {
    pub fn new(config: &AppConfig, prompter: Arc<dyn Prompter>) -> DomainResult<Self> {
        let remote: Arc<dyn RemoteListStore> = if config.use_mock {
            let db_path = config.data_dir().join(MOCK_DB_FILE);
            log::info!("Using mock store at {}", db_path.display());
            Arc::new(MemoryListStore::persistent(db_path, MOCK_DATA)?)
        } else {
            log::info!("Using list store at {}", config.api_url);
            Arc::new(HttpListStore::new(config.api_url.as_str()))
        };
        let mirror = Arc::new(FileMirror::new(config.data_dir()));
        Ok(Self::with_parts(remote, mirror, prompter, &config.current_user))
    }

    pub fn with_parts(
        remote: Arc<dyn RemoteListStore>,
        mirror: Arc<dyn LocalMirror>,
        prompter: Arc<dyn Prompter>,
        current_user: &str,
    ) -> Self {
        let notifications = Arc::new(NotificationLog::new());
        let lists = ShoppingLists::new(remote, mirror, notifications.clone(), current_user);
        let actions = ListActions::new(lists.clone(), prompter);
        Self {
            lists,
            actions,
            notifications,
        }
    }

    /// Item view of one list
    pub async fn items(&self, list_id: &str) -> Option<ListItems> {
        ListItems::open(self.lists.clone(), list_id).await
    }
}
