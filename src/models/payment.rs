use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[allow(dead_code)]
#[derive(Debug, sqlx::FromRow)]
pub struct Payment {
    pub payment_id: i32,
    pub booking_id: i32,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub payer_phone: Option<String>,
    pub paid_at: NaiveDateTime,
    pub receipt_no: String,
    pub txn_ref: String,
    pub status: PaymentStatus,
}

/// Payment lifecycle. RefundPending is terminal here; actual settlement of
/// the refund happens outside this subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema, Display, sqlx::Type)]
#[sqlx(type_name = "ENUM")]
pub enum PaymentStatus {
    #[sqlx(rename = "COMPLETED")]
    #[strum(serialize = "COMPLETED")]
    Completed,
    #[sqlx(rename = "REFUND_PENDING")]
    #[strum(serialize = "REFUND_PENDING")]
    RefundPending,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema, Display, EnumString, sqlx::Type,
)]
#[sqlx(type_name = "ENUM")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PaymentMethod {
    #[sqlx(rename = "MOBILE_MONEY")]
    MobileMoney,
    #[sqlx(rename = "CARD")]
    Card,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PaymentRequest {
    pub booking_id: i32,
    pub amount: Decimal,
    /// "mobile_money" or "card". Parsed in the service so an unknown value
    /// surfaces as UnsupportedMethod rather than a deserialization failure.
    pub method: String,
    /// Mobile money only.
    pub phone_number: Option<String>,
    /// Card only. Validated, never persisted.
    pub card_number: Option<String>,
    pub card_expiry: Option<String>,
    pub card_cvv: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct PaymentResponse {
    pub payment_id: i32,
    pub booking_id: i32,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub receipt_no: String,
    pub txn_ref: String,
    pub message: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ExpectedAmountResponse {
    pub booking_id: i32,
    pub seat_count: u32,
    pub price_per_seat: Decimal,
    pub amount_due: Decimal,
}
