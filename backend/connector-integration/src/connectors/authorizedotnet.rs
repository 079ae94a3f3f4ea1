//! Typed HTTP client for the Authorize.Net transaction and
//! webhook-management APIs.

pub mod transformers;
pub mod webhooks;

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use common_utils::{consts::BASE64_ENGINE, ext_traits::ByteSliceExt, CustomResult, FloatMajorUnit};
use domain_types::{
    errors::ConnectorError,
    types::{
        AuthorizationResult, AuthorizedotnetConfig, CustomerProfileId, GatewayVariant,
        HostedPageToken, PaymentSessionPayload, ProcessorTransaction, WebhookRegistration,
        WebhookSubscription,
    },
};
use error_stack::{report, ResultExt};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};

use crate::types::ProcessorApi;
use self::transformers as authorizedotnet;

/// Authorize.Net client. Cheap to clone; the underlying connection pool is
/// shared.
#[derive(Clone)]
pub struct Authorizedotnet {
    config: Arc<AuthorizedotnetConfig>,
    http: reqwest::Client,
}

impl Authorizedotnet {
    pub fn new(config: Arc<AuthorizedotnetConfig>, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &AuthorizedotnetConfig {
        &self.config
    }

    fn merchant_authentication(&self) -> authorizedotnet::MerchantAuthentication {
        authorizedotnet::MerchantAuthentication::from(self.config.as_ref())
    }

    /// POST a request to the transaction API and parse the response.
    ///
    /// The processor prepends a UTF-8 BOM to JSON responses; it is stripped
    /// before parsing. Shape validation happens here, before any result-code
    /// inspection: a response we cannot parse is a
    /// [`ConnectorError::ResponseValidation`], not a processor rejection.
    async fn execute<Req, Resp>(
        &self,
        request: &Req,
        context: &'static str,
    ) -> CustomResult<Resp, ConnectorError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.config.environment.transaction_endpoint())
            .json(request)
            .send()
            .await
            .change_context(ConnectorError::RequestFailed {
                service: "transaction api",
            })?;

        let body = response
            .bytes()
            .await
            .change_context(ConnectorError::RequestFailed {
                service: "transaction api",
            })?;

        let body = strip_utf8_bom(&body);
        body.parse_struct::<Resp>(context)
            .change_context(ConnectorError::ResponseValidation { context })
    }

    /// Fail on processor-level rejection after the shape has validated.
    fn check_result(
        messages: &authorizedotnet::ResponseMessages,
    ) -> CustomResult<(), ConnectorError> {
        if messages.is_error() {
            return Err(report!(ConnectorError::ProcessorResult {
                messages: messages.error_text(),
            }));
        }
        Ok(())
    }

    fn basic_auth_header(&self) -> String {
        let credentials = format!(
            "{}:{}",
            self.config.api_login_id.expose_secret(),
            self.config.transaction_key.expose_secret()
        );
        format!("Basic {}", BASE64_ENGINE.encode(credentials))
    }
}

/// Remove a leading UTF-8 byte order mark, if present.
fn strip_utf8_bom(body: &[u8]) -> Vec<u8> {
    let (decoded, _) = encoding_rs::UTF_8.decode_with_bom_removal(body);
    decoded.into_owned().into_bytes()
}

#[async_trait]
impl ProcessorApi for Authorizedotnet {
    async fn create_transaction(
        &self,
        payload: &PaymentSessionPayload,
        variant: &GatewayVariant,
    ) -> CustomResult<AuthorizationResult, ConnectorError> {
        let transaction_request =
            authorizedotnet::TransactionRequest::try_from(authorizedotnet::AuthorizedotnetRouterData {
                payload,
                variant,
                profile: None,
            })?;
        let request = authorizedotnet::CreateTransactionRequest {
            create_transaction_request: authorizedotnet::TransactionRequestBody {
                merchant_authentication: self.merchant_authentication(),
                transaction_request,
            },
        };

        let response: authorizedotnet::CreateTransactionResponse =
            self.execute(&request, "createTransactionResponse").await?;
        Self::check_result(&response.messages)?;

        let transaction = response.transaction_response.ok_or_else(|| {
            report!(ConnectorError::ResponseValidation {
                context: "transactionResponse",
            })
        })?;
        Ok(AuthorizationResult {
            psp_reference: transaction.transaction_id,
            status: transaction.response_code.into(),
        })
    }

    async fn get_transaction_details(
        &self,
        transaction_id: &str,
    ) -> CustomResult<ProcessorTransaction, ConnectorError> {
        let request = authorizedotnet::GetTransactionDetailsRequest {
            get_transaction_details_request: authorizedotnet::TransactionDetailsBody {
                merchant_authentication: self.merchant_authentication(),
                transaction_id: transaction_id.to_string(),
            },
        };

        let response: authorizedotnet::GetTransactionDetailsResponse = self
            .execute(&request, "getTransactionDetailsResponse")
            .await?;
        Self::check_result(&response.messages)?;

        let transaction = response.transaction.ok_or_else(|| {
            report!(ConnectorError::ResponseValidation {
                context: "transaction",
            })
        })?;
        Ok(ProcessorTransaction {
            id: transaction.transaction_id,
            status: transaction.transaction_status,
            amount: FloatMajorUnit::new(
                transaction.settle_amount.unwrap_or(transaction.auth_amount),
            ),
            currency: None,
            description: transaction.order.and_then(|order| order.description),
        })
    }

    async fn get_hosted_payment_page_token(
        &self,
        payload: &PaymentSessionPayload,
        variant: &GatewayVariant,
        profile: Option<&CustomerProfileId>,
    ) -> CustomResult<HostedPageToken, ConnectorError> {
        let transaction_request =
            authorizedotnet::TransactionRequest::try_from(authorizedotnet::AuthorizedotnetRouterData {
                payload,
                variant,
                profile,
            })?;
        let request = authorizedotnet::GetHostedPaymentPageRequest {
            get_hosted_payment_page_request: authorizedotnet::HostedPaymentPageBody {
                merchant_authentication: self.merchant_authentication(),
                transaction_request,
                hosted_payment_settings: authorizedotnet::hosted_payment_settings(&self.config)?,
            },
        };

        let response: authorizedotnet::GetHostedPaymentPageResponse = self
            .execute(&request, "getHostedPaymentPageResponse")
            .await?;
        Self::check_result(&response.messages)?;

        let token = response.token.ok_or_else(|| {
            report!(ConnectorError::ResponseValidation { context: "token" })
        })?;
        Ok(HostedPageToken::new(token))
    }

    async fn find_customer_profile(&self, email: &str) -> Option<CustomerProfileId> {
        let request = authorizedotnet::GetCustomerProfileRequest {
            get_customer_profile_request: authorizedotnet::GetCustomerProfileBody {
                merchant_authentication: self.merchant_authentication(),
                email: email.to_string(),
            },
        };

        let response: authorizedotnet::GetCustomerProfileResponse = match self
            .execute(&request, "getCustomerProfileResponse")
            .await
        {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(?error, "customer profile lookup failed; treating as not found");
                return None;
            }
        };
        if response.messages.is_error() {
            // Includes genuine not-found (E00040) alongside other failures.
            tracing::debug!(
                messages = %response.messages.error_text(),
                "no customer profile resolved"
            );
            return None;
        }
        response
            .profile
            .map(|profile| CustomerProfileId::new(profile.customer_profile_id))
    }

    async fn create_customer_profile(
        &self,
        email: &str,
    ) -> CustomResult<CustomerProfileId, ConnectorError> {
        let request = authorizedotnet::CreateCustomerProfileRequest {
            create_customer_profile_request: authorizedotnet::CreateCustomerProfileBody {
                merchant_authentication: self.merchant_authentication(),
                profile: authorizedotnet::CustomerProfile {
                    email: email.to_string(),
                },
            },
        };

        let response: authorizedotnet::CreateCustomerProfileResponse = self
            .execute(&request, "createCustomerProfileResponse")
            .await?;
        Self::check_result(&response.messages)?;

        let profile_id = response.customer_profile_id.ok_or_else(|| {
            report!(ConnectorError::ResponseValidation {
                context: "customerProfileId",
            })
        })?;
        Ok(CustomerProfileId::new(profile_id))
    }

    async fn list_webhooks(&self) -> CustomResult<Vec<WebhookSubscription>, ConnectorError> {
        let response = self
            .http
            .get(self.config.environment.webhooks_endpoint())
            .header(reqwest::header::AUTHORIZATION, self.basic_auth_header())
            .send()
            .await
            .change_context(ConnectorError::RequestFailed {
                service: "webhook management api",
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .change_context(ConnectorError::RequestFailed {
                service: "webhook management api",
            })?;
        if !status.is_success() {
            return Err(report!(ConnectorError::ProcessorResult {
                messages: format!("webhook listing returned {status}"),
            }))
            .attach_printable_lazy(|| String::from_utf8_lossy(&body).into_owned());
        }

        body.parse_struct("webhook subscriptions")
            .change_context(ConnectorError::ResponseValidation {
                context: "webhook subscriptions",
            })
    }

    async fn create_webhook(
        &self,
        registration: &WebhookRegistration,
    ) -> CustomResult<WebhookSubscription, ConnectorError> {
        let response = self
            .http
            .post(self.config.environment.webhooks_endpoint())
            .header(reqwest::header::AUTHORIZATION, self.basic_auth_header())
            .json(registration)
            .send()
            .await
            .change_context(ConnectorError::RequestFailed {
                service: "webhook management api",
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .change_context(ConnectorError::RequestFailed {
                service: "webhook management api",
            })?;
        if !status.is_success() {
            return Err(report!(ConnectorError::ProcessorResult {
                messages: format!("webhook registration returned {status}"),
            }))
            .attach_printable_lazy(|| String::from_utf8_lossy(&body).into_owned());
        }

        body.parse_struct("webhook subscription")
            .change_context(ConnectorError::ResponseValidation {
                context: "webhook subscription",
            })
    }
}
