use bus_booking_system::{
    models::booking::BookingRequest,
    models::payment::PaymentRequest,
    services::booking_service::BookingService,
    services::cancellation_service::CancellationService,
    services::payment_service::PaymentService,
    services::seat_ledger::SeatLedger,
    utils::error::AppError,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use ctor::dtor;
use rust_decimal::Decimal;
use sqlx::mysql::MySqlPool as Pool;
use sqlx::Row;
use std::str::FromStr;
use test_context::{test_context, AsyncTestContext};

mod common {
    pub mod test_utils;
}
use common::test_utils::TestDb;

struct CancellationContext {
    pool: Pool,
    booking_service: BookingService,
    payment_service: PaymentService,
    cancellation_service: CancellationService,
    ledger: SeatLedger,
}

#[dtor]
fn cleanup() {
    if let Err(e) = TestDb::cleanup_database_sync() {
        eprintln!("Failed to cleanup test database: {}", e);
    }
}

#[async_trait]
impl AsyncTestContext for CancellationContext {
    async fn setup() -> Self {
        let pool = TestDb::get_instance(file!())
            .await
            .expect("Failed to get test database instance");

        let booking_service = BookingService::new(pool.clone());
        let payment_service = PaymentService::new(pool.clone());
        let cancellation_service = CancellationService::new(pool.clone());
        let ledger = SeatLedger::new(pool.clone());

        CancellationContext {
            pool,
            booking_service,
            payment_service,
            cancellation_service,
            ledger,
        }
    }

    async fn teardown(self) {
        let _ = sqlx::query("SELECT 1").execute(&self.pool).await;
    }
}

impl CancellationContext {
    async fn seed_schedule(&self, price: &str) -> Result<i32, AppError> {
        let departure = NaiveDate::from_ymd_opt(2026, 11, 20)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let arrival = NaiveDate::from_ymd_opt(2026, 11, 20)
            .unwrap()
            .and_hms_opt(11, 30, 0)
            .unwrap();

        let result = sqlx::query(
            r#"
            INSERT INTO schedule (route_id, bus_id, departure_time, arrival_time, price, capacity)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(5)
        .bind(5)
        .bind(departure)
        .bind(arrival)
        .bind(Decimal::from_str(price).unwrap())
        .bind(40)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id() as i32)
    }

    async fn book(&self, customer_id: i32, schedule_id: i32, seats: &str) -> Result<i32, AppError> {
        let booking = self
            .booking_service
            .create_booking(BookingRequest {
                customer_id,
                schedule_id,
                seats: seats.to_string(),
            })
            .await?;
        Ok(booking.booking_id)
    }

    async fn pay(&self, booking_id: i32, amount: &str) -> Result<(), AppError> {
        self.payment_service
            .submit_payment(PaymentRequest {
                booking_id,
                amount: Decimal::from_str(amount).unwrap(),
                method: "mobile_money".to_string(),
                phone_number: Some("0788123456".to_string()),
                card_number: None,
                card_expiry: None,
                card_cvv: None,
            })
            .await?;
        Ok(())
    }

    async fn booking_status(&self, booking_id: i32) -> Result<String, AppError> {
        let row = sqlx::query("SELECT status FROM booking WHERE booking_id = ?")
            .bind(booking_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("status")?)
    }

    async fn payment_status(&self, booking_id: i32) -> Result<String, AppError> {
        let row = sqlx::query("SELECT status FROM payment WHERE booking_id = ?")
            .bind(booking_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("status")?)
    }
}

#[test_context(CancellationContext)]
#[tokio::test]
async fn test_cancel_marks_payment_refund_pending(
    ctx: &CancellationContext,
) -> Result<(), AppError> {
    let schedule_id = ctx.seed_schedule("1000.00").await?;
    let booking_id = ctx.book(1, schedule_id, "A1,A2,A3").await?;
    ctx.pay(booking_id, "3000.00").await?;

    let response = ctx.cancellation_service.cancel_booking(booking_id).await?;

    assert_eq!(
        response.refund_amount,
        Some(Decimal::from_str("3000.00").unwrap())
    );
    assert_eq!(ctx.booking_status(booking_id).await?, "CANCELED");
    assert_eq!(ctx.payment_status(booking_id).await?, "REFUND_PENDING");

    Ok(())
}

#[test_context(CancellationContext)]
#[tokio::test]
async fn test_cancel_without_payment(ctx: &CancellationContext) -> Result<(), AppError> {
    let schedule_id = ctx.seed_schedule("1000.00").await?;
    let booking_id = ctx.book(1, schedule_id, "B1").await?;

    let response = ctx.cancellation_service.cancel_booking(booking_id).await?;

    assert_eq!(response.refund_amount, None);
    assert!(response.message.contains("No payment on record"));
    assert_eq!(ctx.booking_status(booking_id).await?, "CANCELED");

    Ok(())
}

#[test_context(CancellationContext)]
#[tokio::test]
async fn test_second_cancel_is_rejected(ctx: &CancellationContext) -> Result<(), AppError> {
    let schedule_id = ctx.seed_schedule("1000.00").await?;
    let booking_id = ctx.book(1, schedule_id, "C1").await?;
    ctx.pay(booking_id, "1000.00").await?;

    ctx.cancellation_service.cancel_booking(booking_id).await?;

    let result = ctx.cancellation_service.cancel_booking(booking_id).await;
    assert!(matches!(result, Err(AppError::BookingNotCancelable(_))));

    // The payment transitioned exactly once and stays refund-pending
    let row = sqlx::query(
        "SELECT COUNT(*) AS count FROM payment WHERE booking_id = ? AND status = 'REFUND_PENDING'",
    )
    .bind(booking_id)
    .fetch_one(&ctx.pool)
    .await?;
    assert_eq!(row.try_get::<i64, _>("count")?, 1);

    Ok(())
}

#[test_context(CancellationContext)]
#[tokio::test]
async fn test_cancel_unknown_booking_is_rejected(
    ctx: &CancellationContext,
) -> Result<(), AppError> {
    let result = ctx.cancellation_service.cancel_booking(999_999).await;
    assert!(matches!(result, Err(AppError::BookingNotCancelable(_))));

    Ok(())
}

#[test_context(CancellationContext)]
#[tokio::test]
async fn test_canceled_seats_can_be_rebooked(ctx: &CancellationContext) -> Result<(), AppError> {
    let schedule_id = ctx.seed_schedule("1000.00").await?;
    let first_booking = ctx.book(1, schedule_id, "D1").await?;

    ctx.cancellation_service.cancel_booking(first_booking).await?;

    let second_booking = ctx.book(2, schedule_id, "D1").await?;
    assert_ne!(second_booking, first_booking);

    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS count
        FROM booking_seat bs
        INNER JOIN booking b ON b.booking_id = bs.booking_id
        WHERE bs.schedule_id = ? AND bs.seat_label = 'D1' AND b.status = 'CONFIRMED'
        "#,
    )
    .bind(schedule_id)
    .fetch_one(&ctx.pool)
    .await?;
    assert_eq!(row.try_get::<i64, _>("count")?, 1);

    Ok(())
}

#[test_context(CancellationContext)]
#[tokio::test]
async fn test_occupancy_snapshot_excludes_canceled_bookings(
    ctx: &CancellationContext,
) -> Result<(), AppError> {
    let schedule_id = ctx.seed_schedule("1000.00").await?;
    let booking_id = ctx.book(1, schedule_id, "E1,E2").await?;

    let occupied = ctx.ledger.snapshot_occupied(schedule_id).await?;
    assert_eq!(occupied, vec!["E1", "E2"]);

    ctx.cancellation_service.cancel_booking(booking_id).await?;

    let occupied = ctx.ledger.snapshot_occupied(schedule_id).await?;
    assert!(occupied.is_empty());

    Ok(())
}
