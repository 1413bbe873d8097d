use crate::models::booking::BookingStatus;
use crate::models::payment::{
    ExpectedAmountResponse, PaymentMethod, PaymentRequest, PaymentResponse,
};
use crate::utils::config::PaymentPolicy;
use crate::utils::error::{AppError, AppResult};
use chrono::Utc;
use log::info;
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::{MySqlPool, Row};
use std::str::FromStr;
use uuid::Uuid;

// Attempts at generating a receipt/transaction reference that does not
// collide with an existing one.
const MAX_REFERENCE_ATTEMPTS: u32 = 3;

/// Validates and records payments against bookings.
#[derive(Clone)]
pub struct PaymentService {
    pool: MySqlPool,
    policy: PaymentPolicy,
}

struct BookingCharge {
    status: BookingStatus,
    price: Decimal,
    seat_count: i64,
}

impl PaymentService {
    pub fn new(pool: MySqlPool) -> Self {
        Self::with_policy(pool, PaymentPolicy::default())
    }

    pub fn with_policy(pool: MySqlPool, policy: PaymentPolicy) -> Self {
        PaymentService { pool, policy }
    }

    async fn booking_charge(&self, booking_id: i32) -> AppResult<BookingCharge> {
        let row = sqlx::query(
            r#"
            SELECT b.status, s.price, COUNT(bs.seat_label) AS seat_count
            FROM booking b
            INNER JOIN schedule s ON s.schedule_id = b.schedule_id
            INNER JOIN booking_seat bs ON bs.booking_id = b.booking_id
            WHERE b.booking_id = ?
            GROUP BY b.status, s.price
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::BookingNotFound(format!("booking {} does not exist", booking_id))
        })?;

        Ok(BookingCharge {
            status: row.try_get("status")?,
            price: row.try_get("price")?,
            seat_count: row.try_get("seat_count")?,
        })
    }

    /// Expected charge for a booking: per-seat price times seat count.
    pub async fn expected_amount(&self, booking_id: i32) -> AppResult<ExpectedAmountResponse> {
        let charge = self.booking_charge(booking_id).await?;
        let amount_due = (charge.price * Decimal::from(charge.seat_count)).round_dp(2);

        Ok(ExpectedAmountResponse {
            booking_id,
            seat_count: charge.seat_count as u32,
            price_per_seat: charge.price,
            amount_due,
        })
    }

    pub async fn submit_payment(&self, request: PaymentRequest) -> AppResult<PaymentResponse> {
        let charge = self.booking_charge(request.booking_id).await?;

        if charge.status != BookingStatus::Confirmed {
            return Err(AppError::Conflict(format!(
                "booking {} is canceled and cannot be paid",
                request.booking_id
            )));
        }

        let expected = (charge.price * Decimal::from(charge.seat_count)).round_dp(2);
        if request.amount.round_dp(2) != expected {
            return Err(AppError::InvalidAmount {
                submitted: request.amount,
                expected,
            });
        }

        let method = PaymentMethod::from_str(request.method.trim()).map_err(|_| {
            AppError::UnsupportedMethod(format!(
                "payment method '{}' is not supported",
                request.method
            ))
        })?;

        let payer_phone = match method {
            PaymentMethod::MobileMoney => {
                Some(self.validate_mobile_money(request.phone_number.as_deref())?)
            }
            PaymentMethod::Card => {
                validate_card_fields(&request)?;
                None
            }
        };

        let existing = sqlx::query("SELECT payment_id FROM payment WHERE booking_id = ?")
            .bind(request.booking_id)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "a payment is already recorded for booking {}",
                request.booking_id
            )));
        }

        let paid_at = Utc::now().naive_utc();
        let mut attempt = 0;
        loop {
            attempt += 1;
            let receipt_no = new_receipt_no();
            let txn_ref = new_txn_ref();

            let inserted = sqlx::query(
                r#"
                INSERT INTO payment
                (booking_id, amount, method, payer_phone, paid_at, receipt_no, txn_ref, status)
                VALUES (?, ?, ?, ?, ?, ?, ?, 'COMPLETED')
                "#,
            )
            .bind(request.booking_id)
            .bind(expected)
            .bind(method.to_string())
            .bind(payer_phone.clone())
            .bind(paid_at)
            .bind(&receipt_no)
            .bind(&txn_ref)
            .execute(&self.pool)
            .await;

            match inserted {
                Ok(result) => {
                    let payment_id = result.last_insert_id() as i32;
                    info!(
                        "payment {} recorded for booking {}: {} via {}",
                        payment_id, request.booking_id, expected, method
                    );

                    let message = match &payer_phone {
                        Some(phone) => format!(
                            "Payment of {} received from {} for booking {}. Receipt {}.",
                            expected, phone, request.booking_id, receipt_no
                        ),
                        None => format!(
                            "Payment of {} received for booking {}. Receipt {}.",
                            expected, request.booking_id, receipt_no
                        ),
                    };

                    return Ok(PaymentResponse {
                        payment_id,
                        booking_id: request.booking_id,
                        amount: expected,
                        method,
                        receipt_no,
                        txn_ref,
                        message,
                    });
                }
                Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                    // A concurrent payment for the same booking is terminal;
                    // a colliding reference just gets regenerated.
                    if db.message().contains("uq_payment_booking") {
                        return Err(AppError::Conflict(format!(
                            "a payment is already recorded for booking {}",
                            request.booking_id
                        )));
                    }
                    if attempt >= MAX_REFERENCE_ATTEMPTS {
                        return Err(AppError::DatabaseError(
                            "could not allocate a unique payment reference".to_string(),
                        ));
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn validate_mobile_money(&self, phone_number: Option<&str>) -> AppResult<String> {
        let phone = phone_number
            .map(str::trim)
            .filter(|phone| !phone.is_empty())
            .ok_or_else(|| {
                AppError::InvalidPaymentDetails(
                    "phone_number is required for mobile money payments".to_string(),
                )
            })?;

        if phone.len() != 10 || !phone.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::InvalidPaymentDetails(
                "phone number must be exactly 10 digits".to_string(),
            ));
        }
        if !phone.starts_with(&self.policy.mobile_money_prefix) {
            return Err(AppError::InvalidPaymentDetails(format!(
                "phone number must start with {}",
                self.policy.mobile_money_prefix
            )));
        }

        Ok(phone.to_string())
    }
}

fn required<'a>(field: &'a Option<String>, name: &str) -> AppResult<&'a str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            AppError::InvalidPaymentDetails(format!("{} is required for card payments", name))
        })
}

fn validate_card_fields(request: &PaymentRequest) -> AppResult<()> {
    let number = required(&request.card_number, "card_number")?;
    if !is_valid_card_number(number) {
        return Err(AppError::InvalidPaymentDetails(
            "card_number must match the format 1234-5678-9012-3456".to_string(),
        ));
    }

    let expiry = required(&request.card_expiry, "card_expiry")?;
    let (month, year) = expiry.split_once('/').ok_or_else(|| {
        AppError::InvalidPaymentDetails("card_expiry must be in MM/YY format".to_string())
    })?;
    let month: u32 = month.parse().map_err(|_| {
        AppError::InvalidPaymentDetails("card_expiry month must be numeric".to_string())
    })?;
    if !(1..=12).contains(&month) {
        return Err(AppError::InvalidPaymentDetails(
            "card_expiry month must be between 1 and 12".to_string(),
        ));
    }
    if year.is_empty() || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidPaymentDetails(
            "card_expiry year must be numeric".to_string(),
        ));
    }

    let cvv = required(&request.card_cvv, "card_cvv")?;
    if cvv.len() != 3 || !cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidPaymentDetails(
            "card_cvv must be exactly 3 digits".to_string(),
        ));
    }

    Ok(())
}

// 16 digits in groups of four, hyphens at fixed positions.
fn is_valid_card_number(number: &str) -> bool {
    number.len() == 19
        && number.char_indices().all(|(i, c)| match i {
            4 | 9 | 14 => c == '-',
            _ => c.is_ascii_digit(),
        })
}

fn new_receipt_no() -> String {
    let digits: u64 = rand::thread_rng().gen_range(0..10_000_000_000);
    format!("RB{:010}", digits)
}

fn new_txn_ref() -> String {
    format!("TXN-{}", Uuid::new_v4().simple())
}
