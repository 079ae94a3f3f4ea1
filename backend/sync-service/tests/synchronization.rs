//! Cross-component scenarios over mocked processor and platform seams.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common_utils::{CustomResult, FloatMajorUnit};
use connector_integration::{
    connectors::authorizedotnet::webhooks::WebhookSignatureVerifier, types::ProcessorApi,
};
use domain_types::{
    errors::ConnectorError,
    events::TransactionEventType,
    types::{
        AuthorizationResult, AuthorizationStatus, AuthorizedotnetConfig, CustomerProfileId,
        Environment, GatewayVariant, HostedPageToken, PaymentSessionPayload,
        PaymentSessionResponse, ProcessorTransaction, ProcessorTransactionStatus, SyncResult,
        WebhookRegistration, WebhookStatus, WebhookSubscription,
    },
};
use error_stack::report;
use secrecy::SecretString;
use sync_service::{
    platform::TransactionEventReporter,
    subscriptions::{RegistrationOutcome, REGISTERED_EVENT_TYPES},
    PaymentSessionService, SynchronizationReporter, WebhookSubscriptionManager,
};
use url::Url;

const SIGNATURE_KEY: &str = "0123456789ABCDEF0123456789ABCDEF";

#[derive(Default)]
struct MockProcessor {
    transaction: Option<ProcessorTransaction>,
    existing_profile: Option<CustomerProfileId>,
    subscriptions: Mutex<Vec<WebhookSubscription>>,
    detail_calls: Mutex<Vec<String>>,
    created_profiles: Mutex<Vec<String>>,
    created_webhooks: Mutex<Vec<WebhookRegistration>>,
    hosted_page_profiles: Mutex<Vec<Option<CustomerProfileId>>>,
}

#[async_trait]
impl ProcessorApi for MockProcessor {
    async fn create_transaction(
        &self,
        _payload: &PaymentSessionPayload,
        _variant: &GatewayVariant,
    ) -> CustomResult<AuthorizationResult, ConnectorError> {
        Ok(AuthorizationResult {
            psp_reference: "120099".to_string(),
            status: AuthorizationStatus::Approved,
        })
    }

    async fn get_transaction_details(
        &self,
        transaction_id: &str,
    ) -> CustomResult<ProcessorTransaction, ConnectorError> {
        self.detail_calls
            .lock()
            .expect("lock")
            .push(transaction_id.to_string());
        self.transaction.clone().ok_or_else(|| {
            report!(ConnectorError::ProcessorResult {
                messages: "E00040: The record cannot be found.".to_string(),
            })
        })
    }

    async fn get_hosted_payment_page_token(
        &self,
        _payload: &PaymentSessionPayload,
        _variant: &GatewayVariant,
        profile: Option<&CustomerProfileId>,
    ) -> CustomResult<HostedPageToken, ConnectorError> {
        self.hosted_page_profiles
            .lock()
            .expect("lock")
            .push(profile.cloned());
        Ok(HostedPageToken::new("form-token-1"))
    }

    async fn find_customer_profile(&self, _email: &str) -> Option<CustomerProfileId> {
        self.existing_profile.clone()
    }

    async fn create_customer_profile(
        &self,
        email: &str,
    ) -> CustomResult<CustomerProfileId, ConnectorError> {
        self.created_profiles
            .lock()
            .expect("lock")
            .push(email.to_string());
        Ok(CustomerProfileId::new("905372"))
    }

    async fn list_webhooks(&self) -> CustomResult<Vec<WebhookSubscription>, ConnectorError> {
        Ok(self.subscriptions.lock().expect("lock").clone())
    }

    async fn create_webhook(
        &self,
        registration: &WebhookRegistration,
    ) -> CustomResult<WebhookSubscription, ConnectorError> {
        self.created_webhooks
            .lock()
            .expect("lock")
            .push(registration.clone());
        let subscription = WebhookSubscription {
            webhook_id: Some("7be120d3".to_string()),
            url: registration.url.clone(),
            event_types: registration
                .event_types
                .iter()
                .map(ToString::to_string)
                .collect(),
            status: registration.status,
        };
        self.subscriptions
            .lock()
            .expect("lock")
            .push(subscription.clone());
        Ok(subscription)
    }
}

#[derive(Default)]
struct MockPlatform {
    reports: Mutex<Vec<SyncResult>>,
    reject: bool,
}

#[async_trait]
impl TransactionEventReporter for MockPlatform {
    async fn report_event(&self, result: &SyncResult) -> CustomResult<(), ConnectorError> {
        if self.reject {
            return Err(report!(ConnectorError::SyncReport {
                reason: "id/NOT_FOUND: Transaction not found.".to_string(),
            }));
        }
        self.reports.lock().expect("lock").push(result.clone());
        Ok(())
    }
}

fn config() -> Arc<AuthorizedotnetConfig> {
    Arc::new(AuthorizedotnetConfig {
        api_login_id: SecretString::new("login".into()),
        transaction_key: SecretString::new("key".into()),
        signature_key: SecretString::new(SIGNATURE_KEY.into()),
        public_client_key: "public-client-key".to_string(),
        environment: Environment::Sandbox,
        app_base_url: Url::parse("https://sync.example.com").expect("url"),
    })
}

fn verifier() -> WebhookSignatureVerifier {
    WebhookSignatureVerifier::new(SecretString::new(SIGNATURE_KEY.into()))
}

fn voided_transaction() -> ProcessorTransaction {
    ProcessorTransaction {
        id: "6000".to_string(),
        status: ProcessorTransactionStatus::Voided,
        amount: FloatMajorUnit::new(42.5),
        currency: None,
        // encode("Transaction:99")
        description: Some("VHJhbnNhY3Rpb246OTk".to_string()),
    }
}

fn void_webhook_body() -> Vec<u8> {
    serde_json::json!({
        "notificationId": "d0e4a1e3-2b8f-4e0b-93f0-6f8a53933db6",
        "eventType": "net.authorize.payment.void.created",
        "eventDate": "2019-10-12T12:14:02.885Z",
        "webhookId": "7be120d3-2247-4706-b9b1-98931fdfdcce",
        "payload": {
            "entityName": "transaction",
            "id": "6000"
        }
    })
    .to_string()
    .into_bytes()
}

fn reporter(
    processor: Arc<MockProcessor>,
    platform: Arc<MockPlatform>,
) -> SynchronizationReporter {
    SynchronizationReporter::new(verifier(), processor, platform)
}

#[tokio::test]
async fn void_delivery_reports_charge_failure() {
    let processor = Arc::new(MockProcessor {
        transaction: Some(voided_transaction()),
        ..Default::default()
    });
    let platform = Arc::new(MockPlatform::default());
    let reporter = reporter(Arc::clone(&processor), Arc::clone(&platform));

    let body = void_webhook_body();
    let header = verifier().expected_header(&body).expect("sign");
    let result = reporter
        .handle_webhook(&body, Some(&header))
        .await
        .expect("synchronization failed");

    assert_eq!(result.transaction_id.as_str(), "Transaction:99");
    assert_eq!(result.event_type, TransactionEventType::ChargeFailure);
    assert_eq!(result.psp_reference, "6000");

    let reports = platform.reports.lock().expect("lock");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].event_type, TransactionEventType::ChargeFailure);
    assert_eq!(reports[0].transaction_id.as_str(), "Transaction:99");
}

#[tokio::test]
async fn tampered_delivery_is_rejected_before_any_side_effect() {
    let processor = Arc::new(MockProcessor {
        transaction: Some(voided_transaction()),
        ..Default::default()
    });
    let platform = Arc::new(MockPlatform::default());
    let reporter = reporter(Arc::clone(&processor), Arc::clone(&platform));

    let body = void_webhook_body();
    let header = verifier().expected_header(&body).expect("sign");
    let mut tampered = body.clone();
    tampered[0] ^= 0x01;

    let err = reporter
        .handle_webhook(&tampered, Some(&header))
        .await
        .unwrap_err();
    assert!(matches!(
        err.current_context(),
        ConnectorError::InvalidSignature
    ));
    assert!(processor.detail_calls.lock().expect("lock").is_empty());
    assert!(platform.reports.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn unsupported_event_is_rejected_before_the_processor_round_trip() {
    let processor = Arc::new(MockProcessor {
        transaction: Some(voided_transaction()),
        ..Default::default()
    });
    let platform = Arc::new(MockPlatform::default());
    let reporter = reporter(Arc::clone(&processor), Arc::clone(&platform));

    let body = serde_json::json!({
        "notificationId": "n-2",
        "eventType": "net.authorize.payment.refund.created",
        "eventDate": "2019-10-12T12:14:02.885Z",
        "webhookId": "w-2",
        "payload": {"entityName": "transaction", "id": "6000"}
    })
    .to_string()
    .into_bytes();
    let header = verifier().expected_header(&body).expect("sign");

    let err = reporter.handle_webhook(&body, Some(&header)).await.unwrap_err();
    assert!(matches!(
        err.current_context(),
        ConnectorError::UnsupportedEventType { .. }
    ));
    assert!(processor.detail_calls.lock().expect("lock").is_empty());
    assert!(platform.reports.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn transaction_without_description_is_unsynchronizable() {
    let mut transaction = voided_transaction();
    transaction.description = None;
    let processor = Arc::new(MockProcessor {
        transaction: Some(transaction),
        ..Default::default()
    });
    let platform = Arc::new(MockPlatform::default());
    let reporter = reporter(Arc::clone(&processor), Arc::clone(&platform));

    let body = void_webhook_body();
    let header = verifier().expected_header(&body).expect("sign");
    let err = reporter.handle_webhook(&body, Some(&header)).await.unwrap_err();
    assert!(matches!(
        err.current_context(),
        ConnectorError::MissingCorrelationId { transaction_id } if transaction_id == "6000"
    ));
    assert!(platform.reports.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn platform_rejection_surfaces_as_sync_report_error() {
    let processor = Arc::new(MockProcessor {
        transaction: Some(voided_transaction()),
        ..Default::default()
    });
    let platform = Arc::new(MockPlatform {
        reject: true,
        ..Default::default()
    });
    let reporter = reporter(Arc::clone(&processor), Arc::clone(&platform));

    let body = void_webhook_body();
    let header = verifier().expected_header(&body).expect("sign");
    let err = reporter.handle_webhook(&body, Some(&header)).await.unwrap_err();
    assert!(matches!(
        err.current_context(),
        ConnectorError::SyncReport { .. }
    ));
}

#[tokio::test]
async fn registration_is_skipped_when_the_callback_url_is_already_subscribed() {
    let processor = Arc::new(MockProcessor {
        subscriptions: Mutex::new(vec![WebhookSubscription {
            webhook_id: Some("existing".to_string()),
            url: "https://sync.example.com/api/webhooks/authorizedotnet".to_string(),
            // Drifted event types still count as registered.
            event_types: vec!["net.authorize.payment.void.created".to_string()],
            status: WebhookStatus::Active,
        }]),
        ..Default::default()
    });
    let manager = WebhookSubscriptionManager::new(Arc::clone(&processor) as _, config());

    let outcome = manager.register().await.expect("registration failed");
    assert_eq!(outcome, RegistrationOutcome::AlreadyRegistered);
    assert!(processor.created_webhooks.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn registration_creates_a_subscription_when_none_matches() {
    let processor = Arc::new(MockProcessor {
        subscriptions: Mutex::new(vec![WebhookSubscription {
            webhook_id: Some("other".to_string()),
            url: "https://other.example.com/hooks".to_string(),
            event_types: vec![],
            status: WebhookStatus::Inactive,
        }]),
        ..Default::default()
    });
    let manager = WebhookSubscriptionManager::new(Arc::clone(&processor) as _, config());

    let outcome = manager.register().await.expect("registration failed");
    assert_eq!(outcome, RegistrationOutcome::Created);

    let created = processor.created_webhooks.lock().expect("lock");
    assert_eq!(created.len(), 1);
    assert_eq!(
        created[0].url,
        "https://sync.example.com/api/webhooks/authorizedotnet"
    );
    assert_eq!(created[0].event_types, REGISTERED_EVENT_TYPES.to_vec());
    assert_eq!(created[0].status, WebhookStatus::Active);
}

#[tokio::test]
async fn repeated_registration_leaves_exactly_one_subscription() {
    let processor = Arc::new(MockProcessor::default());
    let manager = WebhookSubscriptionManager::new(Arc::clone(&processor) as _, config());

    let first = manager.register().await.expect("first registration failed");
    assert_eq!(first, RegistrationOutcome::Created);

    let second = manager.register().await.expect("second registration failed");
    assert_eq!(second, RegistrationOutcome::AlreadyRegistered);

    assert_eq!(processor.created_webhooks.lock().expect("lock").len(), 1);
    assert_eq!(processor.subscriptions.lock().expect("lock").len(), 1);
}

fn session_payload(method: serde_json::Value) -> PaymentSessionPayload {
    serde_json::from_value(serde_json::json!({
        "transactionId": "Transaction:99",
        "amount": 42.5,
        "currency": "USD",
        "lines": [],
        "billingAddress": {
            "firstName": "Ada", "lastName": "Lovelace",
            "streetAddress": "1 Analytical Way", "city": "London",
            "state": "LDN", "postalCode": "N1 9GU", "country": "GB"
        },
        "shippingAddress": {
            "firstName": "Ada", "lastName": "Lovelace",
            "streetAddress": "1 Analytical Way", "city": "London",
            "state": "LDN", "postalCode": "N1 9GU", "country": "GB"
        },
        "customerEmail": "ada@example.com",
        "paymentMethod": method
    }))
    .expect("payload parse failed")
}

#[tokio::test]
async fn hosted_redirect_session_returns_form_token_and_communicator_url() {
    let processor = Arc::new(MockProcessor::default());
    let service = PaymentSessionService::new(Arc::clone(&processor) as _, config());

    let payload = session_payload(serde_json::json!({"type": "hostedRedirect"}));
    let response = service.initialize(&payload).await.expect("session failed");
    match response {
        PaymentSessionResponse::HostedPage {
            form_token,
            communicator_url,
            public_client_key,
        } => {
            assert_eq!(form_token, "form-token-1");
            assert_eq!(
                communicator_url,
                "https://sync.example.com/accept-hosted/communicator"
            );
            assert_eq!(public_client_key, "public-client-key");
        }
        other => panic!("unexpected response: {other:?}"),
    }
    // No createProfile flag, so no profile was attached.
    assert_eq!(
        processor.hosted_page_profiles.lock().expect("lock").as_slice(),
        &[None]
    );
}

#[tokio::test]
async fn hosted_redirect_with_profile_flag_creates_a_profile_on_lookup_miss() {
    let processor = Arc::new(MockProcessor::default());
    let service = PaymentSessionService::new(Arc::clone(&processor) as _, config());

    let payload = session_payload(
        serde_json::json!({"type": "hostedRedirect", "data": {"createProfile": true}}),
    );
    service.initialize(&payload).await.expect("session failed");

    assert_eq!(
        processor.created_profiles.lock().expect("lock").as_slice(),
        &["ada@example.com".to_string()]
    );
    assert_eq!(
        processor.hosted_page_profiles.lock().expect("lock").as_slice(),
        &[Some(CustomerProfileId::new("905372"))]
    );
}

#[tokio::test]
async fn hosted_redirect_reuses_an_existing_profile() {
    let processor = Arc::new(MockProcessor {
        existing_profile: Some(CustomerProfileId::new("112233")),
        ..Default::default()
    });
    let service = PaymentSessionService::new(Arc::clone(&processor) as _, config());

    let payload = session_payload(
        serde_json::json!({"type": "hostedRedirect", "data": {"createProfile": true}}),
    );
    service.initialize(&payload).await.expect("session failed");

    assert!(processor.created_profiles.lock().expect("lock").is_empty());
    assert_eq!(
        processor.hosted_page_profiles.lock().expect("lock").as_slice(),
        &[Some(CustomerProfileId::new("112233"))]
    );
}

#[tokio::test]
async fn wallet_token_session_creates_a_transaction() {
    let processor = Arc::new(MockProcessor::default());
    let service = PaymentSessionService::new(Arc::clone(&processor) as _, config());

    let payload = session_payload(serde_json::json!({
        "type": "walletToken",
        "data": {
            "dataDescriptor": "COMMON.APPLE.INAPP.PAYMENT",
            "dataValue": "opaque-blob"
        }
    }));
    let response = service.initialize(&payload).await.expect("session failed");
    match response {
        PaymentSessionResponse::TransactionCreated {
            psp_reference,
            status,
        } => {
            assert_eq!(psp_reference, "120099");
            assert_eq!(status, AuthorizationStatus::Approved);
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn unknown_payment_method_fails_before_any_processor_call() {
    let processor = Arc::new(MockProcessor::default());
    let service = PaymentSessionService::new(Arc::clone(&processor) as _, config());

    let payload = session_payload(serde_json::json!({"type": "bankTransfer"}));
    let err = service.initialize(&payload).await.unwrap_err();
    assert!(matches!(
        err.current_context(),
        ConnectorError::UnsupportedPaymentMethod { method } if method == "bankTransfer"
    ));
    assert!(processor.hosted_page_profiles.lock().expect("lock").is_empty());
}
