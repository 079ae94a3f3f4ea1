use async_trait::async_trait;
use common_utils::CustomResult;
use domain_types::{
    errors::ConnectorError,
    types::{
        AuthorizationResult, CustomerProfileId, GatewayVariant, HostedPageToken,
        PaymentSessionPayload, ProcessorTransaction, WebhookRegistration, WebhookSubscription,
    },
};

/// Seam between orchestration and the processor transport. `sync-service`
/// consumes this trait; tests substitute stateful mocks for it.
#[async_trait]
pub trait ProcessorApi: Send + Sync {
    /// Create a processor transaction for a wallet-token or
    /// third-party-redirect session.
    async fn create_transaction(
        &self,
        payload: &PaymentSessionPayload,
        variant: &GatewayVariant,
    ) -> CustomResult<AuthorizationResult, ConnectorError>;

    /// Fetch the processor's record of a transaction by its processor id.
    async fn get_transaction_details(
        &self,
        transaction_id: &str,
    ) -> CustomResult<ProcessorTransaction, ConnectorError>;

    /// Request a hosted-payment-page token for a hosted-redirect session.
    async fn get_hosted_payment_page_token(
        &self,
        payload: &PaymentSessionPayload,
        variant: &GatewayVariant,
        profile: Option<&CustomerProfileId>,
    ) -> CustomResult<HostedPageToken, ConnectorError>;

    /// Look up a customer profile by email.
    ///
    /// Policy: lookup failures of any kind (transport, shape, processor
    /// error) are logged and treated as "not found"; callers fall back to
    /// profile creation. This conflates outages with misses; preserved as
    /// the documented behavior of the integration.
    async fn find_customer_profile(&self, email: &str) -> Option<CustomerProfileId>;

    async fn create_customer_profile(
        &self,
        email: &str,
    ) -> CustomResult<CustomerProfileId, ConnectorError>;

    async fn list_webhooks(&self) -> CustomResult<Vec<WebhookSubscription>, ConnectorError>;

    async fn create_webhook(
        &self,
        registration: &WebhookRegistration,
    ) -> CustomResult<WebhookSubscription, ConnectorError>;
}
