use crate::models::booking::{BookingStatus, CancellationResponse};
use crate::utils::error::{AppError, AppResult};
use log::info;
use rust_decimal::Decimal;
use sqlx::{MySqlPool, Row};

/// Two-step cancellation as one atomic operation: Confirmed -> Canceled on
/// the booking, then Completed -> RefundPending on its payment, if any.
/// Both transitions are terminal.
#[derive(Clone)]
pub struct CancellationService {
    pool: MySqlPool,
}

impl CancellationService {
    pub fn new(pool: MySqlPool) -> Self {
        CancellationService { pool }
    }

    pub async fn cancel_booking(&self, booking_id: i32) -> AppResult<CancellationResponse> {
        let mut tx = self.pool.begin().await?;

        // Conditional flip: only a CONFIRMED booking can be canceled.
        let flipped = sqlx::query(
            r#"
            UPDATE booking
            SET status = 'CANCELED'
            WHERE booking_id = ? AND status = 'CONFIRMED'
            "#,
        )
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::BookingNotCancelable(format!(
                "booking {} is already canceled or does not exist",
                booking_id
            )));
        }

        // Release the seats from the unique index. Occupancy queries join on
        // booking status, so the seats are free the instant this commits.
        sqlx::query("UPDATE booking_seat SET active = NULL WHERE booking_id = ?")
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

        let refunded = sqlx::query(
            r#"
            UPDATE payment
            SET status = 'REFUND_PENDING'
            WHERE booking_id = ? AND status = 'COMPLETED'
            "#,
        )
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

        let refund_amount = if refunded.rows_affected() > 0 {
            let row = sqlx::query("SELECT amount FROM payment WHERE booking_id = ?")
                .bind(booking_id)
                .fetch_one(&mut *tx)
                .await?;
            Some(row.try_get::<Decimal, _>("amount")?)
        } else {
            None
        };

        tx.commit().await?;

        let message = match refund_amount {
            Some(amount) => {
                info!(
                    "booking {} canceled, refund of {} pending settlement",
                    booking_id, amount
                );
                format!(
                    "Booking {} canceled. Refund of {} is pending settlement.",
                    booking_id, amount
                )
            }
            None => {
                info!("booking {} canceled, no payment on record", booking_id);
                format!("Booking {} canceled. No payment on record.", booking_id)
            }
        };

        Ok(CancellationResponse {
            booking_id,
            booking_status: BookingStatus::Canceled,
            refund_amount,
            message,
        })
    }
}
