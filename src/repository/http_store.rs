//! HTTP List Store
//!
//! REST client for the `/shoppingLists` collection resource.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

use super::traits::RemoteListStore;
use crate::domain::{DomainError, DomainResult, ListPatch, ShoppingList};

/// Characters escaped in the `{id}` path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub struct HttpListStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpListStore {
    /// `base_url` is the collection URL, e.g. `http://localhost:3000/shoppingLists`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn list_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, utf8_percent_encode(id, PATH_SEGMENT))
    }
}

fn transport(context: &str, e: reqwest::Error) -> DomainError {
    DomainError::Transport(format!("{}: {}", context, e))
}

/// Fail on non-success status, decode the body otherwise (empty body is null)
async fn read_body(response: reqwest::Response, context: &str) -> DomainResult<Value> {
    let status = response.status();
    let text = response.text().await.map_err(|e| transport(context, e))?;

    if !status.is_success() {
        let detail = if text.is_empty() {
            status.as_u16().to_string()
        } else {
            text
        };
        return Err(DomainError::Http {
            context: context.to_string(),
            status: status.as_u16(),
            detail,
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| DomainError::Decode(format!("{}: {}", context, e)))
}

#[async_trait]
impl RemoteListStore for HttpListStore {
    async fn fetch_all(&self) -> DomainResult<Vec<Value>> {
        const CONTEXT: &str = "Failed to fetch shopping lists";
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| transport(CONTEXT, e))?;

        match read_body(response, CONTEXT).await? {
            Value::Array(lists) => Ok(lists),
            other => Err(DomainError::Decode(format!(
                "{}: expected an array, got {}",
                CONTEXT, other
            ))),
        }
    }

    async fn fetch_one(&self, id: &str) -> DomainResult<Value> {
        const CONTEXT: &str = "Failed to fetch shopping list";
        let response = self
            .client
            .get(self.list_url(id))
            .send()
            .await
            .map_err(|e| transport(CONTEXT, e))?;
        read_body(response, CONTEXT).await
    }

    async fn create(&self, list: &ShoppingList) -> DomainResult<Value> {
        const CONTEXT: &str = "Failed to add list";
        let response = self
            .client
            .post(&self.base_url)
            .json(list)
            .send()
            .await
            .map_err(|e| transport(CONTEXT, e))?;
        read_body(response, CONTEXT).await
    }

    async fn update(&self, id: &str, patch: &ListPatch) -> DomainResult<Value> {
        const CONTEXT: &str = "Failed to update list";
        let response = self
            .client
            .patch(self.list_url(id))
            .json(patch)
            .send()
            .await
            .map_err(|e| transport(CONTEXT, e))?;
        read_body(response, CONTEXT).await
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        const CONTEXT: &str = "Failed to delete list";
        let response = self
            .client
            .delete(self.list_url(id))
            .send()
            .await
            .map_err(|e| transport(CONTEXT, e))?;
        // Acknowledgment body is not interpreted
        read_body(response, CONTEXT).await.map(|_| ()).or_else(|e| match e {
            DomainError::Decode(_) => Ok(()),
            other => Err(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let store = HttpListStore::new("http://localhost:3000/shoppingLists/");
        assert_eq!(store.base_url(), "http://localhost:3000/shoppingLists");
        assert_eq!(store.list_url("42"), "http://localhost:3000/shoppingLists/42");
    }

    #[test]
    fn test_list_url_escapes_path_segment() {
        let store = HttpListStore::new("http://localhost:3000/shoppingLists");
        assert_eq!(
            store.list_url("a/b c"),
            "http://localhost:3000/shoppingLists/a%2Fb%20c"
        );
    }
}
