//! User Interaction Capabilities
//!
//! The presentation layer supplies a `Prompter` for blocking questions and a
//! `Notifier` for one-way notices.

use std::collections::VecDeque;
use std::sync::Mutex;

/// Solicits input from the user, `None`/`false` mean declined
pub trait Prompter: Send + Sync {
    fn ask_text(&self, message: &str, default: Option<&str>) -> Option<String>;

    fn confirm(&self, message: &str) -> bool;
}

/// Shows a notice to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Queues notices until the presentation layer drains them
#[derive(Debug, Default)]
pub struct NotificationLog {
    messages: Mutex<Vec<String>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all queued notices
    pub fn drain(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|mut messages| std::mem::take(&mut *messages))
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, message: &str) {
        log::info!("Notice: {}", message);
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

/// One scripted reply
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(Option<String>),
    Confirm(bool),
}

/// Prompter answering from a fixed script, for headless runs
///
/// A question whose next reply has the wrong kind, or that comes after the
/// script ran out, is declined.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    replies: Mutex<VecDeque<Reply>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Messages of every question asked so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }

    fn next(&self, message: &str) -> Option<Reply> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(message.to_string());
        }
        self.replies.lock().ok().and_then(|mut r| r.pop_front())
    }
}

impl Prompter for ScriptedPrompter {
    fn ask_text(&self, message: &str, _default: Option<&str>) -> Option<String> {
        match self.next(message) {
            Some(Reply::Text(text)) => text,
            _ => None,
        }
    }

    fn confirm(&self, message: &str) -> bool {
        matches!(self.next(message), Some(Reply::Confirm(true)))
    }
}
