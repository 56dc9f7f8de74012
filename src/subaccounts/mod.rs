//! The Subaccounts API.
//!
//! Manages child accounts under a primary account and moves balance or
//! credit between them. All endpoints live under
//! `/accounts/{api_key}` on the JSON host.

use serde::Deserialize;
use serde_json::json;

use crate::client::{ApiError, ApiResource, ResponseError};

/// One account record (primary or subaccount).
#[derive(Clone, Debug, Deserialize)]
pub struct Subaccount {
    /// The account's API key.
    pub api_key: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// The owning primary account's API key.
    #[serde(default)]
    pub primary_account_api_key: Option<String>,
    /// Whether the subaccount spends the primary balance.
    #[serde(default)]
    pub use_primary_account_balance: Option<bool>,
    /// Whether the subaccount is suspended.
    #[serde(default)]
    pub suspended: Option<bool>,
    /// Creation instant.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Own balance, when not using the primary balance.
    #[serde(default)]
    pub balance: Option<f64>,
    /// Credit limit, when configured.
    #[serde(default)]
    pub credit_limit: Option<f64>,
}

/// The subaccount listing: the primary account plus its children.
#[derive(Clone, Debug)]
pub struct SubaccountList {
    /// The primary account.
    pub primary_account: Option<Subaccount>,
    /// All child accounts.
    pub subaccounts: Vec<Subaccount>,
}

/// A completed balance or credit transfer.
#[derive(Clone, Debug, Deserialize)]
pub struct Transfer {
    /// Transfer ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Amount moved.
    pub amount: f64,
    /// Source account API key.
    pub from: String,
    /// Destination account API key.
    pub to: String,
    /// Caller-supplied reference.
    #[serde(default)]
    pub reference: Option<String>,
    /// When the transfer executed.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Sub-client for the Subaccounts API.
#[derive(Clone, Debug)]
pub struct SubaccountsClient {
    resource: ApiResource,
}

impl SubaccountsClient {
    /// Wraps a configured resource. Exposed for the registry factory.
    #[must_use]
    pub const fn new(resource: ApiResource) -> Self {
        Self { resource }
    }

    /// Lists the primary account and every subaccount.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures or a body without the
    /// embedded account collections.
    pub async fn list(&self) -> Result<SubaccountList, ApiError> {
        let response = self.resource.get("/subaccounts").await?;

        let primary_account = response
            .body
            .get("_embedded")
            .and_then(|embedded| embedded.get("primary_account"))
            .map(|value| decode::<Subaccount>(value.clone()))
            .transpose()?;

        let subaccounts = response
            .embedded("subaccounts")
            .ok_or_else(|| ResponseError::MissingKeys {
                missing: vec!["_embedded.subaccounts".to_string()],
            })?
            .iter()
            .map(|value| decode(value.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SubaccountList {
            primary_account,
            subaccounts,
        })
    }

    /// Creates a subaccount.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn create(
        &self,
        name: &str,
        use_primary_account_balance: bool,
    ) -> Result<Subaccount, ApiError> {
        let payload = json!({
            "name": name,
            "use_primary_account_balance": use_primary_account_balance,
        });
        let response = self.resource.create(payload, "/subaccounts").await?;
        decode(response.body)
    }

    /// Suspends or reactivates a subaccount.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn set_suspended(
        &self,
        subaccount_key: &str,
        suspended: bool,
    ) -> Result<Subaccount, ApiError> {
        let payload = json!({ "suspended": suspended });
        let response = self
            .resource
            .patch(&format!("/subaccounts/{subaccount_key}"), payload)
            .await?;
        decode(response.body)
    }

    /// Moves balance between two accounts in the hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn transfer_balance(
        &self,
        from: &str,
        to: &str,
        amount: f64,
        reference: Option<&str>,
    ) -> Result<Transfer, ApiError> {
        self.transfer("/balance-transfers", from, to, amount, reference)
            .await
    }

    /// Moves credit between two accounts in the hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures.
    pub async fn transfer_credit(
        &self,
        from: &str,
        to: &str,
        amount: f64,
        reference: Option<&str>,
    ) -> Result<Transfer, ApiError> {
        self.transfer("/credit-transfers", from, to, amount, reference)
            .await
    }

    async fn transfer(
        &self,
        suffix: &str,
        from: &str,
        to: &str,
        amount: f64,
        reference: Option<&str>,
    ) -> Result<Transfer, ApiError> {
        let payload = json!({
            "from": from,
            "to": to,
            "amount": amount,
            "reference": reference,
        });
        let response = self.resource.create(payload, suffix).await?;
        decode(response.body)
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| {
        ResponseError::Malformed {
            reason: e.to_string(),
        }
        .into()
    })
}
