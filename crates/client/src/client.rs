//! Typed HTTP client for the FinTools API.

use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ClientError;
use fintools_shared::ApiEnvelope;
use fintools_shared::auth::{LoginRequest, RegisterRequest, TokenResponse};
use fintools_shared::requests::{
    CreateAssetRequest, CreateExpenseRequest, CreateProductRequest, CreateRevenueRequest,
    CreateTransactionRequest, MarkSoldRequest, ProductFromExpenseRequest, UpdateAssetRequest,
    UpdateAssetValueRequest, UpdateContributionRequest, UpdateExpenseRequest,
    UpdateProductRequest, UpdateRevenueRequest, UpdateTransactionRequest,
};
use fintools_shared::resources::{
    AssetResource, CashFlowPoint, ExpenseResource, FinancialSummary, FounderContribution,
    ProductResource, RevenueResource, SaleOutcome, TransactionResource, TransactionWithAsset,
    UserResource,
};

/// An expense write together with the product it may have spawned.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseWritten {
    /// The stored expense.
    pub expense: ExpenseResource,
    /// Product derived from the expense.
    pub product: Option<ProductResource>,
    /// Best-effort follow-up failures reported by the server.
    pub warnings: Vec<String>,
}

/// HTTP client bound to one server and, once logged in, one token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client for `base_url`, e.g. `http://localhost:8080/api/v1`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Uses an existing bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The current bearer token.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{path}", self.base_url));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn envelope<T: DeserializeOwned>(
        response: Response,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        let status = response.status();
        let envelope: ApiEnvelope<T> = response.json().await?;
        if status.is_success() && envelope.success {
            if !envelope.warnings.is_empty() {
                warn!(warnings = ?envelope.warnings, "Server reported warnings");
            }
            Ok(envelope)
        } else {
            Err(ClientError::from_status(status.as_u16(), envelope.error))
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        let response = builder.send().await?;
        debug!(status = %response.status(), url = %response.url(), "API response");
        Self::envelope(response).await
    }

    async fn data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        self.send(builder).await?.data.ok_or(ClientError::MissingData)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.data(self.request(Method::GET, path)).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.data(self.request(Method::POST, path).json(body)).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.data(self.request(Method::PUT, path).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Vec<String>, ClientError> {
        let envelope: ApiEnvelope<serde_json::Value> =
            self.send(self.request(Method::DELETE, path)).await?;
        Ok(envelope.warnings)
    }

    async fn expense_write(&self, builder: RequestBuilder) -> Result<ExpenseWritten, ClientError> {
        let envelope: ApiEnvelope<ExpenseResource> = self.send(builder).await?;
        Ok(ExpenseWritten {
            expense: envelope.data.ok_or(ClientError::MissingData)?,
            product: envelope.product,
            warnings: envelope.warnings,
        })
    }

    async fn token_exchange<B: Serialize>(
        &mut self,
        path: &str,
        body: &B,
    ) -> Result<(), ClientError> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        if response.status().is_success() {
            let TokenResponse { token } = response.json().await?;
            self.token = Some(token);
            Ok(())
        } else {
            Self::envelope::<serde_json::Value>(response).await.map(|_| ())
        }
    }

    // ========================================================================
    // Auth
    // ========================================================================

    /// Registers a founder account and keeps its token.
    pub async fn register(&mut self, request: &RegisterRequest) -> Result<(), ClientError> {
        self.token_exchange("/auth/register", request).await
    }

    /// Logs in and keeps the token.
    pub async fn login(&mut self, request: &LoginRequest) -> Result<(), ClientError> {
        self.token_exchange("/auth/login", request).await
    }

    /// The logged-in user.
    pub async fn me(&self) -> Result<UserResource, ClientError> {
        self.get("/auth/me").await
    }

    /// Sets a user's fund contribution.
    pub async fn update_contribution(
        &self,
        user_id: Uuid,
        request: &UpdateContributionRequest,
    ) -> Result<UserResource, ClientError> {
        self.put(&format!("/auth/update-contribution/{user_id}"), request)
            .await
    }

    // ========================================================================
    // Expenses
    // ========================================================================

    /// Lists expenses, newest first.
    pub async fn expenses(&self) -> Result<Vec<ExpenseResource>, ClientError> {
        self.get("/expenses").await
    }

    /// Fetches one expense.
    pub async fn expense(&self, id: Uuid) -> Result<ExpenseResource, ClientError> {
        self.get(&format!("/expenses/{id}")).await
    }

    /// Records an expense.
    pub async fn create_expense(
        &self,
        request: &CreateExpenseRequest,
    ) -> Result<ExpenseWritten, ClientError> {
        self.expense_write(self.request(Method::POST, "/expenses").json(request))
            .await
    }

    /// Edits an expense.
    pub async fn update_expense(
        &self,
        id: Uuid,
        request: &UpdateExpenseRequest,
    ) -> Result<ExpenseWritten, ClientError> {
        self.expense_write(self.request(Method::PUT, &format!("/expenses/{id}")).json(request))
            .await
    }

    /// Deletes an expense and its unsold products.
    pub async fn delete_expense(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("/expenses/{id}")).await.map(|_| ())
    }

    /// Approves an expense.
    pub async fn approve_expense(&self, id: Uuid) -> Result<ExpenseResource, ClientError> {
        self.put(&format!("/expenses/{id}/approve"), &serde_json::json!({}))
            .await
    }

    /// The product derived from an expense.
    pub async fn expense_product(&self, id: Uuid) -> Result<ProductResource, ClientError> {
        self.get(&format!("/expenses/{id}/product")).await
    }

    // ========================================================================
    // Revenues
    // ========================================================================

    /// Lists revenues, newest first.
    pub async fn revenues(&self) -> Result<Vec<RevenueResource>, ClientError> {
        self.get("/revenues").await
    }

    /// Records a revenue.
    pub async fn create_revenue(
        &self,
        request: &CreateRevenueRequest,
    ) -> Result<RevenueResource, ClientError> {
        self.post("/revenues", request).await
    }

    /// Edits a revenue.
    pub async fn update_revenue(
        &self,
        id: Uuid,
        request: &UpdateRevenueRequest,
    ) -> Result<RevenueResource, ClientError> {
        self.put(&format!("/revenues/{id}"), request).await
    }

    /// Deletes a revenue.
    pub async fn delete_revenue(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("/revenues/{id}")).await.map(|_| ())
    }

    /// Marks a revenue as verified.
    pub async fn verify_revenue(&self, id: Uuid) -> Result<RevenueResource, ClientError> {
        self.put(&format!("/revenues/{id}/verify"), &serde_json::json!({}))
            .await
    }

    // ========================================================================
    // Assets
    // ========================================================================

    /// Lists assets by name.
    pub async fn assets(&self) -> Result<Vec<AssetResource>, ClientError> {
        self.get("/assets").await
    }

    /// Lists the assets of one category, e.g. `Real Estate`.
    pub async fn assets_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<AssetResource>, ClientError> {
        // Category labels are words separated by spaces.
        self.get(&format!("/assets/category/{}", category.replace(' ', "%20")))
            .await
    }

    /// Registers an asset.
    pub async fn create_asset(
        &self,
        request: &CreateAssetRequest,
    ) -> Result<AssetResource, ClientError> {
        self.post("/assets", request).await
    }

    /// Edits an asset.
    pub async fn update_asset(
        &self,
        id: Uuid,
        request: &UpdateAssetRequest,
    ) -> Result<AssetResource, ClientError> {
        self.put(&format!("/assets/{id}"), request).await
    }

    /// Records a revaluation.
    pub async fn update_asset_value(
        &self,
        id: Uuid,
        request: &UpdateAssetValueRequest,
    ) -> Result<AssetResource, ClientError> {
        self.put(&format!("/assets/{id}/update-value"), request).await
    }

    /// Deletes an asset.
    pub async fn delete_asset(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("/assets/{id}")).await.map(|_| ())
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// Lists products, most recent first.
    pub async fn products(&self) -> Result<Vec<ProductResource>, ClientError> {
        self.get("/products").await
    }

    /// Adds a product.
    pub async fn create_product(
        &self,
        request: &CreateProductRequest,
    ) -> Result<ProductResource, ClientError> {
        self.post("/products", request).await
    }

    /// Edits a product.
    pub async fn update_product(
        &self,
        id: Uuid,
        request: &UpdateProductRequest,
    ) -> Result<ProductResource, ClientError> {
        self.put(&format!("/products/{id}"), request).await
    }

    /// Deletes an unsold product. Returns the server's warnings.
    pub async fn delete_product(&self, id: Uuid) -> Result<Vec<String>, ClientError> {
        self.delete(&format!("/products/{id}")).await
    }

    /// Sells all or part of a product.
    pub async fn mark_sold(
        &self,
        id: Uuid,
        request: &MarkSoldRequest,
    ) -> Result<SaleOutcome, ClientError> {
        self.put(&format!("/products/{id}/mark-sold"), request).await
    }

    /// Turns an expense into a product.
    pub async fn product_from_expense(
        &self,
        expense_id: Uuid,
        request: &ProductFromExpenseRequest,
    ) -> Result<ProductResource, ClientError> {
        self.post(&format!("/products/from-expense/{expense_id}"), request)
            .await
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Lists transactions, newest first.
    pub async fn transactions(&self) -> Result<Vec<TransactionResource>, ClientError> {
        self.get("/transactions").await
    }

    /// Fetches a transaction with its linked asset.
    pub async fn transaction(&self, id: Uuid) -> Result<TransactionWithAsset, ClientError> {
        self.get(&format!("/transactions/{id}")).await
    }

    /// Records a transaction.
    pub async fn create_transaction(
        &self,
        request: &CreateTransactionRequest,
    ) -> Result<TransactionWithAsset, ClientError> {
        self.post("/transactions", request).await
    }

    /// Edits a transaction the caller created.
    pub async fn update_transaction(
        &self,
        id: Uuid,
        request: &UpdateTransactionRequest,
    ) -> Result<TransactionWithAsset, ClientError> {
        self.put(&format!("/transactions/{id}"), request).await
    }

    /// Deletes a transaction the caller created.
    pub async fn delete_transaction(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("/transactions/{id}")).await.map(|_| ())
    }

    // ========================================================================
    // Dashboard
    // ========================================================================

    /// Headline totals.
    pub async fn summary(&self) -> Result<FinancialSummary, ClientError> {
        self.get("/dashboard/summary").await
    }

    /// Cash flow bucketed by `interval` (`day`, `week`, `month`, `year`).
    pub async fn cash_flow(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        interval: Option<&str>,
    ) -> Result<Vec<CashFlowPoint>, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(start) = start {
            query.push(("startDate", start.to_string()));
        }
        if let Some(end) = end {
            query.push(("endDate", end.to_string()));
        }
        if let Some(interval) = interval {
            query.push(("interval", interval.to_string()));
        }
        self.data(self.request(Method::GET, "/dashboard/cash-flow").query(&query))
            .await
    }

    /// Every founder and their contribution.
    pub async fn founder_contributions(&self) -> Result<Vec<FounderContribution>, ClientError> {
        self.get("/dashboard/founder-contributions").await
    }
}
