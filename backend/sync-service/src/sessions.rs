//! Outbound payment-session flow: resolve the gateway variant and produce
//! either a hosted-payment-page token or an immediate transaction result.

use std::sync::Arc;

use common_utils::CustomResult;
use connector_integration::types::ProcessorApi;
use domain_types::{
    errors::ConnectorError,
    types::{
        AuthorizedotnetConfig, CustomerProfileId, GatewayVariant, PaymentSessionPayload,
        PaymentSessionResponse,
    },
};

pub struct PaymentSessionService {
    processor: Arc<dyn ProcessorApi>,
    config: Arc<AuthorizedotnetConfig>,
}

impl PaymentSessionService {
    pub fn new(processor: Arc<dyn ProcessorApi>, config: Arc<AuthorizedotnetConfig>) -> Self {
        Self { processor, config }
    }

    pub async fn initialize(
        &self,
        payload: &PaymentSessionPayload,
    ) -> CustomResult<PaymentSessionResponse, ConnectorError> {
        let variant = GatewayVariant::resolve(&payload.payment_method)?;

        match &variant {
            GatewayVariant::HostedRedirect(data) => {
                let profile = match payload.customer_email.as_deref() {
                    Some(email) if data.create_profile => self.resolve_profile(email).await,
                    _ => None,
                };

                let token = self
                    .processor
                    .get_hosted_payment_page_token(payload, &variant, profile.as_ref())
                    .await?;
                Ok(PaymentSessionResponse::HostedPage {
                    form_token: token.into_inner(),
                    communicator_url: self.config.iframe_communicator_url()?.to_string(),
                    public_client_key: self.config.public_client_key.clone(),
                })
            }
            GatewayVariant::WalletToken(_) | GatewayVariant::ThirdPartyRedirect => {
                let result = self.processor.create_transaction(payload, &variant).await?;
                Ok(PaymentSessionResponse::TransactionCreated {
                    psp_reference: result.psp_reference,
                    status: result.status,
                })
            }
        }
    }

    /// Resolve an existing customer profile or create one. The session can
    /// proceed without a profile, so creation failures degrade to `None`
    /// rather than failing the flow.
    async fn resolve_profile(&self, email: &str) -> Option<CustomerProfileId> {
        if let Some(profile) = self.processor.find_customer_profile(email).await {
            return Some(profile);
        }
        match self.processor.create_customer_profile(email).await {
            Ok(profile) => Some(profile),
            Err(error) => {
                tracing::warn!(
                    ?error,
                    "customer profile creation failed; continuing without a profile"
                );
                None
            }
        }
    }
}
