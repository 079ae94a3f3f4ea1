//! Wire types and request builders for the Authorize.Net transaction and
//! customer-profile APIs.

use common_utils::CustomResult;
use domain_types::{
    correlation,
    errors::ConnectorError,
    types::{
        Address, AuthorizationStatus, AuthorizedotnetConfig, Currency, CustomerProfileId,
        GatewayVariant, OrderLine, PaymentSessionPayload, ProcessorTransactionStatus,
    },
};
use error_stack::report;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Hard processor limit on line-item ids and names. Longer values are
/// truncated silently, never rejected.
pub(crate) const ITEM_FIELD_MAX_LENGTH: usize = 31;
/// Hard processor limit on invoice numbers.
pub(crate) const INVOICE_NUMBER_MAX_LENGTH: usize = 20;

fn truncate(value: &str, max_length: usize) -> String {
    value.chars().take(max_length).collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantAuthentication {
    name: String,
    transaction_key: String,
}

impl From<&AuthorizedotnetConfig> for MerchantAuthentication {
    fn from(config: &AuthorizedotnetConfig) -> Self {
        Self {
            name: config.api_login_id.expose_secret().to_string(),
            transaction_key: config.transaction_key.expose_secret().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum TransactionType {
    #[serde(rename = "authOnlyTransaction")]
    AuthOnlyTransaction,
    #[serde(rename = "authCaptureTransaction")]
    AuthCaptureTransaction,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub invoice_number: String,
    /// Carries the encoded correlation id; the native `refId` field is too
    /// short for platform identifiers.
    pub description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemWire {
    item_id: String,
    name: String,
    quantity: String,
    unit_price: String,
}

impl From<&OrderLine> for LineItemWire {
    fn from(line: &OrderLine) -> Self {
        Self {
            item_id: truncate(&line.id, ITEM_FIELD_MAX_LENGTH),
            name: truncate(&line.name, ITEM_FIELD_MAX_LENGTH),
            quantity: line.quantity.to_string(),
            unit_price: line.unit_price.to_amount_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItems {
    line_item: Vec<LineItemWire>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillTo {
    first_name: String,
    last_name: String,
    address: String,
    city: String,
    state: String,
    zip: String,
    country: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipTo {
    first_name: String,
    last_name: String,
    address: String,
    city: String,
    state: String,
    zip: String,
    country: String,
}

impl From<&Address> for BillTo {
    fn from(address: &Address) -> Self {
        Self {
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            address: address.street_address.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip: address.postal_code.clone(),
            country: address.country.clone(),
        }
    }
}

impl From<&Address> for ShipTo {
    fn from(address: &Address) -> Self {
        Self {
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            address: address.street_address.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip: address.postal_code.clone(),
            country: address.country.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpaqueDataDetails {
    data_descriptor: String,
    data_value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentDetails {
    OpaqueData(OpaqueDataDetails),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetails {
    customer_profile_id: String,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    email: Option<String>,
}

/// Shared transaction request all gateway variants converge on.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    transaction_type: TransactionType,
    amount: Option<String>,
    currency_code: Option<Currency>,
    payment: Option<PaymentDetails>,
    profile: Option<ProfileDetails>,
    order: Option<Order>,
    line_items: Option<LineItems>,
    customer: Option<CustomerDetails>,
    bill_to: Option<BillTo>,
    ship_to: Option<ShipTo>,
    #[serde(rename = "refTransId")]
    ref_trans_id: Option<String>,
    #[serde(rename = "poNumber")]
    po_number: Option<String>,
}

/// Bundles everything request construction needs; the builder itself stays
/// a pure function over this data.
pub struct AuthorizedotnetRouterData<'a> {
    pub payload: &'a PaymentSessionPayload,
    pub variant: &'a GatewayVariant,
    pub profile: Option<&'a CustomerProfileId>,
}

impl TryFrom<AuthorizedotnetRouterData<'_>> for TransactionRequest {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(item: AuthorizedotnetRouterData<'_>) -> Result<Self, Self::Error> {
        let payload = item.payload;

        let billing = payload.billing_address.as_ref().ok_or_else(|| {
            report!(ConnectorError::MissingAddress {
                field_name: "billingAddress",
            })
        })?;
        let shipping = payload.shipping_address.as_ref().ok_or_else(|| {
            report!(ConnectorError::MissingAddress {
                field_name: "shippingAddress",
            })
        })?;

        let order = Order {
            invoice_number: truncate(
                payload.order_number.as_deref().unwrap_or_default(),
                INVOICE_NUMBER_MAX_LENGTH,
            ),
            description: correlation::encode(&payload.transaction_id).into_inner(),
        };

        let line_items = (!payload.lines.is_empty()).then(|| LineItems {
            line_item: payload.lines.iter().map(LineItemWire::from).collect(),
        });

        let (payment, profile) = match item.variant {
            GatewayVariant::WalletToken(wallet) => (
                Some(PaymentDetails::OpaqueData(OpaqueDataDetails {
                    data_descriptor: wallet.data_descriptor.clone(),
                    data_value: wallet.data_value.expose_secret().to_string(),
                })),
                None,
            ),
            GatewayVariant::HostedRedirect(_) => (
                None,
                item.profile.map(|id| ProfileDetails {
                    customer_profile_id: id.as_str().to_string(),
                }),
            ),
            GatewayVariant::ThirdPartyRedirect => (None, None),
        };

        Ok(Self {
            transaction_type: TransactionType::AuthCaptureTransaction,
            amount: Some(payload.amount.to_amount_string()),
            currency_code: Some(payload.currency),
            payment,
            profile,
            order: Some(order),
            line_items,
            customer: payload.customer_email.as_ref().map(|email| CustomerDetails {
                email: Some(email.clone()),
            }),
            bill_to: Some(BillTo::from(billing)),
            ship_to: Some(ShipTo::from(shipping)),
            ref_trans_id: payload.previous_transaction_id.clone(),
            // Empty until the order is placed; the platform supplies the
            // human-readable number afterwards.
            po_number: Some(payload.order_number.clone().unwrap_or_default()),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequestBody {
    pub merchant_authentication: MerchantAuthentication,
    pub transaction_request: TransactionRequest,
}

/// Top-level wrapper for `createTransactionRequest`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub create_transaction_request: TransactionRequestBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetailsBody {
    pub merchant_authentication: MerchantAuthentication,
    #[serde(rename = "transId")]
    pub transaction_id: String,
}

/// Top-level wrapper for `getTransactionDetailsRequest`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionDetailsRequest {
    pub get_transaction_details_request: TransactionDetailsBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedPaymentSetting {
    pub setting_name: String,
    pub setting_value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedPaymentSettings {
    pub setting: Vec<HostedPaymentSetting>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedPaymentPageBody {
    pub merchant_authentication: MerchantAuthentication,
    pub transaction_request: TransactionRequest,
    pub hosted_payment_settings: HostedPaymentSettings,
}

/// Top-level wrapper for `getHostedPaymentPageRequest`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetHostedPaymentPageRequest {
    pub get_hosted_payment_page_request: HostedPaymentPageBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerProfileBody {
    pub merchant_authentication: MerchantAuthentication,
    pub profile: CustomerProfile,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerProfileRequest {
    pub create_customer_profile_request: CreateCustomerProfileBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCustomerProfileBody {
    pub merchant_authentication: MerchantAuthentication,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCustomerProfileRequest {
    pub get_customer_profile_request: GetCustomerProfileBody,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum ResultCode {
    #[default]
    Ok,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessage {
    pub code: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessages {
    pub result_code: ResultCode,
    pub message: Vec<ResponseMessage>,
}

impl ResponseMessages {
    pub fn is_error(&self) -> bool {
        self.result_code == ResultCode::Error
    }

    /// Concatenated processor message codes and texts for diagnostics.
    pub fn error_text(&self) -> String {
        self.message
            .iter()
            .map(|message| format!("{}: {}", message.code, message.text))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum AuthorizedotnetPaymentStatus {
    #[serde(rename = "1")]
    Approved,
    #[serde(rename = "2")]
    Declined,
    #[serde(rename = "3")]
    Error,
    #[serde(rename = "4")]
    HeldForReview,
    #[serde(rename = "5")]
    RequiresAction,
}

impl From<AuthorizedotnetPaymentStatus> for AuthorizationStatus {
    fn from(status: AuthorizedotnetPaymentStatus) -> Self {
        match status {
            AuthorizedotnetPaymentStatus::Approved => Self::Approved,
            AuthorizedotnetPaymentStatus::Declined => Self::Declined,
            AuthorizedotnetPaymentStatus::Error => Self::Error,
            AuthorizedotnetPaymentStatus::HeldForReview => Self::HeldForReview,
            AuthorizedotnetPaymentStatus::RequiresAction => Self::RequiresAction,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponseWire {
    pub response_code: AuthorizedotnetPaymentStatus,
    #[serde(rename = "transId")]
    pub transaction_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionResponse {
    pub transaction_response: Option<TransactionResponseWire>,
    pub messages: ResponseMessages,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWire {
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetailsWire {
    #[serde(rename = "transId")]
    pub transaction_id: String,
    pub transaction_status: ProcessorTransactionStatus,
    pub auth_amount: f64,
    #[serde(default)]
    pub settle_amount: Option<f64>,
    #[serde(default)]
    pub order: Option<OrderWire>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionDetailsResponse {
    pub transaction: Option<TransactionDetailsWire>,
    pub messages: ResponseMessages,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetHostedPaymentPageResponse {
    pub token: Option<String>,
    pub messages: ResponseMessages,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerProfileResponse {
    pub customer_profile_id: Option<String>,
    pub messages: ResponseMessages,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfileWire {
    pub customer_profile_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCustomerProfileResponse {
    pub profile: Option<CustomerProfileWire>,
    pub messages: ResponseMessages,
}

/// Hosted payment page settings carried as JSON-encoded strings, as the
/// processor requires.
pub fn hosted_payment_settings(
    config: &AuthorizedotnetConfig,
) -> CustomResult<HostedPaymentSettings, ConnectorError> {
    let communicator_url = config.iframe_communicator_url()?;
    let iframe_setting = serde_json::json!({ "url": communicator_url.as_str() });
    let return_options = serde_json::json!({ "showReceipt": false });

    Ok(HostedPaymentSettings {
        setting: vec![
            HostedPaymentSetting {
                setting_name: "hostedPaymentReturnOptions".to_string(),
                setting_value: return_options.to_string(),
            },
            HostedPaymentSetting {
                setting_name: "hostedPaymentIFrameCommunicatorUrl".to_string(),
                setting_value: iframe_setting.to_string(),
            },
        ],
    })
}
