use serde::{Deserialize, Serialize};

/// Payload pushed to the merchant callback whenever a transaction changes status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    #[serde(flatten)]
    pub credit_card: CreditCardNotification,

    #[serde(flatten)]
    pub virtual_account: VirtualAccountNotification,

    #[serde(default)]
    pub transaction_time: String,
    #[serde(default)]
    pub transaction_status: String,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub status_code: String,
    #[serde(default)]
    pub signature_key: String,
    #[serde(default)]
    pub payment_type: String,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub merchant_id: String,
    #[serde(default)]
    pub gross_amount: String,
    #[serde(default)]
    pub fraud_status: String,
    #[serde(default)]
    pub currency: String,
}

impl NotificationRequest {
    /// The event a history row is filed under.
    pub fn event_type(&self) -> &str {
        &self.transaction_status
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditCardNotification {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub masked_card: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub eci: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel_response_message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel_response_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub card_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bank: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub approval_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualAccountNotification {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub va_numbers: Vec<VirtualAccountNumber>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub settlement_time: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payment_amounts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualAccountNumber {
    pub va_number: String,
    pub bank: String,
}
