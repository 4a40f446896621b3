//! Action Dispatcher
//!
//! Turns user intents into `ShoppingLists` calls, asking the `Prompter` first
//! for names and for confirmation of destructive actions.

use std::sync::Arc;

use crate::domain::{DomainResult, ListPatch, ShoppingList};
use crate::manager::ShoppingLists;
use crate::prompt::Prompter;

/// What became of an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    /// Declined, blank input or unknown list; nothing changed
    Abandoned,
}

/// Entries of a list's action menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Rename,
    Archive,
    Unarchive,
    Invite,
    Delete,
    Leave,
}

#[derive(Clone)]
pub struct ListActions {
    lists: ShoppingLists,
    prompter: Arc<dyn Prompter>,
}

impl ListActions {
    pub fn new(lists: ShoppingLists, prompter: Arc<dyn Prompter>) -> Self {
        Self { lists, prompter }
    }

    pub fn lists(&self) -> &ShoppingLists {
        &self.lists
    }

    /// Actions offered for a list to the current user
    pub fn menu_for(&self, list: &ShoppingList) -> Vec<ListAction> {
        if list.archived {
            vec![ListAction::Unarchive, ListAction::Delete]
        } else if list.is_owned_by(self.lists.current_user()) {
            vec![
                ListAction::Rename,
                ListAction::Archive,
                ListAction::Invite,
                ListAction::Delete,
            ]
        } else {
            vec![ListAction::Leave]
        }
    }

    /// Create a list owned by the current user, titles are unique ignoring case
    pub async fn create(&self, title: &str) -> DomainResult<ActionOutcome> {
        let title = title.trim();
        if title.is_empty() {
            self.lists.notify("List name is required");
            return Ok(ActionOutcome::Abandoned);
        }

        let lowered = title.to_lowercase();
        let taken = self
            .lists
            .lists()
            .await
            .iter()
            .any(|list| list.title.to_lowercase() == lowered);
        if taken {
            self.lists.notify("A list with this name already exists");
            return Ok(ActionOutcome::Abandoned);
        }

        let owner = self.lists.current_user().to_string();
        self.lists.add_list(title, &owner).await?;
        Ok(ActionOutcome::Applied)
    }

    pub async fn rename(&self, id: &str) -> DomainResult<ActionOutcome> {
        let Some(list) = self.lists.get(id).await else {
            return Ok(ActionOutcome::Abandoned);
        };

        let answer = self.prompter.ask_text("Enter new name:", Some(&list.title));
        let Some(title) = answer.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(ActionOutcome::Abandoned);
        };

        self.lists.update_list(id, ListPatch::title(title)).await?;
        Ok(ActionOutcome::Applied)
    }

    pub async fn archive(&self, id: &str) -> DomainResult<ActionOutcome> {
        self.lists.update_list(id, ListPatch::archived(true)).await?;
        Ok(ActionOutcome::Applied)
    }

    pub async fn unarchive(&self, id: &str) -> DomainResult<ActionOutcome> {
        self.lists.update_list(id, ListPatch::archived(false)).await?;
        Ok(ActionOutcome::Applied)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<ActionOutcome> {
        if !self.prompter.confirm("Do you really want to delete this list?") {
            return Ok(ActionOutcome::Abandoned);
        }
        self.lists.remove_list(id).await?;
        Ok(ActionOutcome::Applied)
    }

    /// Drop the current user from the members of a shared list
    pub async fn leave(&self, id: &str) -> DomainResult<ActionOutcome> {
        let Some(list) = self.lists.get(id).await else {
            return Ok(ActionOutcome::Abandoned);
        };
        if !self.prompter.confirm("Do you want to leave this list?") {
            return Ok(ActionOutcome::Abandoned);
        }

        let user = self.lists.current_user();
        let members = list.members.into_iter().filter(|m| m != user).collect();
        self.lists.update_list(id, ListPatch::members(members)).await?;
        Ok(ActionOutcome::Applied)
    }

    pub async fn invite(&self, id: &str) -> DomainResult<ActionOutcome> {
        let Some(name) = self
            .prompter
            .ask_text("Enter new member:", None)
            .filter(|name| !name.trim().is_empty())
        else {
            return Ok(ActionOutcome::Abandoned);
        };

        if self.lists.invite_member(id, &name).await? {
            Ok(ActionOutcome::Applied)
        } else {
            Ok(ActionOutcome::Abandoned)
        }
    }

    pub async fn remove_member_click(&self, id: &str, member: &str) -> DomainResult<ActionOutcome> {
        let question = format!("Remove user \"{}\" from this list?", member);
        if !self.prompter.confirm(&question) {
            return Ok(ActionOutcome::Abandoned);
        }

        if self.lists.remove_member(id, member).await? {
            Ok(ActionOutcome::Applied)
        } else {
            Ok(ActionOutcome::Abandoned)
        }
    }
}
