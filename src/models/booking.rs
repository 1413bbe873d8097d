use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[allow(dead_code)]
#[derive(Debug, sqlx::FromRow)]
pub struct Booking {
    pub booking_id: i32,
    pub customer_id: i32,
    pub schedule_id: i32,
    pub booking_date: NaiveDate,
    pub travel_date: NaiveDate,
    pub status: BookingStatus,
}

/// Booking lifecycle. Canceled is terminal; rows are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema, Display, sqlx::Type)]
#[sqlx(type_name = "ENUM")]
pub enum BookingStatus {
    #[sqlx(rename = "CONFIRMED")]
    #[strum(serialize = "CONFIRMED")]
    Confirmed,
    #[sqlx(rename = "CANCELED")]
    #[strum(serialize = "CANCELED")]
    Canceled,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BookingRequest {
    pub customer_id: i32,
    pub schedule_id: i32,
    /// Comma-separated seat labels, e.g. "A1,A2,B3".
    pub seats: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingResponse {
    pub booking_id: i32,
    pub schedule_id: i32,
    pub travel_date: NaiveDate,
    /// Seats actually claimed for this booking, in request order.
    pub booked_seats: Vec<String>,
    /// Requested seats that were already taken. Non-empty means partial
    /// success; the caller decides how to surface that to the customer.
    pub rejected_seats: Vec<String>,
    pub booking_status: BookingStatus,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct CancellationResponse {
    pub booking_id: i32,
    pub booking_status: BookingStatus,
    /// Present when a completed payment was moved to refund-pending.
    pub refund_amount: Option<Decimal>,
    pub message: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingHistoryResponse {
    pub bookings: Vec<BookingHistoryDetail>,
}

// Single booking entry in BookingHistoryResponse
#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingHistoryDetail {
    pub booking_id: i32,
    pub schedule_id: i32,
    pub route_id: i32,
    pub bus_id: i32,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub price: Decimal,
    pub booking_date: NaiveDate,
    pub travel_date: NaiveDate,
    pub seats: Vec<String>,
    pub booking_status: BookingStatus,
}
