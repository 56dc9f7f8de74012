//! The Proactive Connect API.
//!
//! Manages contact lists and their items for bulk campaigns. Listings are
//! HAL-paged, so both lists and items come back through the lazy
//! [`Pager`](crate::client::Pager).

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::{ApiError, ApiResource, Pager, ResponseError};

/// A contact list.
#[derive(Clone, Debug, Deserialize)]
pub struct ContactList {
    /// List ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Caller-assigned tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Number of items the list holds.
    #[serde(default)]
    pub items_count: Option<u64>,
    /// Creation instant.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update instant.
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// One item of a contact list; `data` is caller-defined.
#[derive(Clone, Debug, Deserialize)]
pub struct ListItem {
    /// Item ID.
    pub id: String,
    /// The list the item belongs to.
    #[serde(default)]
    pub list_id: Option<String>,
    /// Arbitrary item payload.
    #[serde(default)]
    pub data: Value,
}

/// Sub-client for the Proactive Connect API.
#[derive(Clone, Debug)]
pub struct ProactiveConnectClient {
    lists: ApiResource,
}

impl ProactiveConnectClient {
    /// Wraps a configured resource rooted at `/v0.1/bulk/lists`.
    /// Exposed for the registry factory.
    #[must_use]
    pub const fn new(lists: ApiResource) -> Self {
        Self { lists }
    }

    /// Returns a lazy pager over every contact list.
    #[must_use]
    pub fn lists(&self) -> Pager<ContactList> {
        self.lists.pager(&json!({}))
    }

    /// Creates a contact list.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn create_list(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<ContactList, ApiError> {
        let payload = json!({
            "name": name,
            "description": description,
            "datasource": { "type": "manual" },
        });
        let response = self.lists.create(payload, "").await?;
        decode(response.body)
    }

    /// Fetches one contact list.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn get_list(&self, list_id: &str) -> Result<ContactList, ApiError> {
        let response = self.lists.get(&format!("/{list_id}")).await?;
        decode(response.body)
    }

    /// Renames or re-describes a contact list.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn update_list(
        &self,
        list_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<ContactList, ApiError> {
        let payload = json!({ "name": name, "description": description });
        let response = self.lists.update(&format!("/{list_id}"), payload).await?;
        decode(response.body)
    }

    /// Deletes a contact list and its items.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn delete_list(&self, list_id: &str) -> Result<(), ApiError> {
        self.lists.delete(&format!("/{list_id}")).await?;
        Ok(())
    }

    /// Returns a lazy pager over one list's items.
    #[must_use]
    pub fn items(&self, list_id: &str) -> Pager<ListItem> {
        let scoped = self.lists.scoped(
            format!("{}/{list_id}/items", self.lists.base_url()),
            Some("items"),
        );
        scoped.pager(&json!({}))
    }

    /// Adds an item to a list.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn create_item(&self, list_id: &str, data: Value) -> Result<ListItem, ApiError> {
        let response = self
            .lists
            .create(json!({ "data": data }), &format!("/{list_id}/items"))
            .await?;
        decode(response.body)
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| {
        ResponseError::Malformed {
            reason: e.to_string(),
        }
        .into()
    })
}
