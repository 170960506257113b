//! Subscription and billing API client

use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::gateway::Gateway;
use crate::api::types::{
    BillingCycle, CheckoutOrder, CheckoutRequest, MessageResponse, Payment, Plan, PortalSession,
    Subscription, UsageSnapshot,
};

#[derive(Debug, Clone)]
pub struct SubscriptionApi {
    gateway: Arc<Gateway>,
}

impl SubscriptionApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn plans(&self) -> Result<Vec<Plan>, ApiError> {
        self.gateway.get("/api/v1/subscriptions/plans").await
    }

    pub async fn current(&self) -> Result<Subscription, ApiError> {
        self.gateway.get("/api/v1/subscriptions/current").await
    }

    pub async fn usage(&self) -> Result<UsageSnapshot, ApiError> {
        self.gateway.get("/api/v1/subscriptions/usage").await
    }

    /// Open a pending order with the payment gateway.
    pub async fn create_checkout(
        &self,
        plan_id: &str,
        billing_cycle: BillingCycle,
    ) -> Result<CheckoutOrder, ApiError> {
        let request = CheckoutRequest {
            plan_id: plan_id.to_string(),
            billing_cycle,
        };
        self.gateway
            .post("/api/v1/subscriptions/checkout", &request)
            .await
    }

    /// Flag the subscription to end at the period boundary.
    pub async fn cancel(&self) -> Result<MessageResponse, ApiError> {
        self.gateway
            .post_empty("/api/v1/subscriptions/cancel")
            .await
    }

    /// Clear the cancel-at-period-end flag.
    pub async fn resume(&self) -> Result<MessageResponse, ApiError> {
        self.gateway
            .post_empty("/api/v1/subscriptions/resume")
            .await
    }

    pub async fn payments(&self) -> Result<Vec<Payment>, ApiError> {
        self.gateway.get("/api/v1/subscriptions/payments").await
    }

    /// Customer portal session for managing payment methods and invoices.
    pub async fn portal(&self) -> Result<PortalSession, ApiError> {
        self.gateway
            .post_empty("/api/v1/subscriptions/portal")
            .await
    }
}
