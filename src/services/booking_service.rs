use crate::models::booking::{
    BookingHistoryDetail, BookingHistoryResponse, BookingRequest, BookingResponse, BookingStatus,
};
use crate::models::seat::SeatSet;
use crate::services::schedule_service::ScheduleService;
use crate::services::seat_ledger::{ClaimError, SeatLedger};
use crate::utils::config::BookingPolicy;
use crate::utils::error::{AppError, AppResult};
use chrono::Utc;
use log::{info, warn};
use sqlx::{MySqlPool, Row};

/// Orchestrates seat claiming and durable booking creation.
#[derive(Clone)]
pub struct BookingService {
    pool: MySqlPool,
    ledger: SeatLedger,
    schedule_service: ScheduleService,
    policy: BookingPolicy,
}

impl BookingService {
    pub fn new(pool: MySqlPool) -> Self {
        Self::with_policy(pool, BookingPolicy::default())
    }

    pub fn with_policy(pool: MySqlPool, policy: BookingPolicy) -> Self {
        BookingService {
            ledger: SeatLedger::new(pool.clone()),
            schedule_service: ScheduleService::new(pool.clone()),
            pool,
            policy,
        }
    }

    /// Create a booking for as many of the requested seats as can be
    /// claimed. Claiming is per seat, not per request: occupied seats are
    /// reported back as rejected and the booking is persisted for the rest.
    /// Nothing is persisted when no seat can be claimed.
    pub async fn create_booking(&self, request: BookingRequest) -> AppResult<BookingResponse> {
        let requested = SeatSet::parse(&request.seats);
        if requested.is_empty() {
            return Err(AppError::BadRequest("no seats requested".to_string()));
        }
        // Cap applies before any storage access.
        if requested.len() > self.policy.max_seats_per_booking {
            return Err(AppError::TooManySeats {
                requested: requested.len(),
                max: self.policy.max_seats_per_booking,
            });
        }

        let schedule = self
            .schedule_service
            .get_schedule(request.schedule_id)
            .await?;
        let travel_date = schedule.travel_date();

        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut tx = self.pool.begin().await?;

            let occupied = self
                .ledger
                .occupied_in_tx(&mut tx, schedule.schedule_id)
                .await?;
            let (claimable, rejected) = requested.partition(&occupied);

            if claimable.is_empty() {
                tx.rollback().await?;
                return Err(AppError::NoSeatsAvailable { rejected });
            }

            let result = sqlx::query(
                r#"
                INSERT INTO booking (customer_id, schedule_id, booking_date, travel_date, status)
                VALUES (?, ?, ?, ?, 'CONFIRMED')
                "#,
            )
            .bind(request.customer_id)
            .bind(schedule.schedule_id)
            .bind(Utc::now().date_naive())
            .bind(travel_date)
            .execute(&mut *tx)
            .await?;

            let booking_id = result.last_insert_id() as i32;

            match self
                .ledger
                .claim(&mut tx, booking_id, schedule.schedule_id, &claimable)
                .await
            {
                Ok(()) => {
                    tx.commit().await?;
                    info!(
                        "booking {} confirmed: {} seat(s) on schedule {} for customer {}",
                        booking_id,
                        claimable.len(),
                        schedule.schedule_id,
                        request.customer_id
                    );
                    return Ok(BookingResponse {
                        booking_id,
                        schedule_id: schedule.schedule_id,
                        travel_date,
                        booked_seats: claimable,
                        rejected_seats: rejected,
                        booking_status: BookingStatus::Confirmed,
                    });
                }
                Err(ClaimError::SeatTaken) => {
                    // Lost a race after the occupancy read. Re-read and retry.
                    tx.rollback().await?;
                    if attempt >= self.policy.claim_max_retries {
                        warn!(
                            "seat claim on schedule {} abandoned after {} attempts",
                            schedule.schedule_id, attempt
                        );
                        return Err(AppError::SeatConflict(format!(
                            "could not claim seats on schedule {} after {} attempts",
                            schedule.schedule_id, attempt
                        )));
                    }
                }
                Err(ClaimError::Db(e)) => return Err(e.into()),
            }
        }
    }

    pub async fn booking_history(&self, customer_id: i32) -> AppResult<BookingHistoryResponse> {
        let rows = sqlx::query(
            r#"
            SELECT
                b.booking_id,
                b.schedule_id,
                b.booking_date,
                b.travel_date,
                b.status,
                s.route_id,
                s.bus_id,
                s.departure_time,
                s.arrival_time,
                s.price
            FROM booking b
            INNER JOIN schedule s ON s.schedule_id = b.schedule_id
            WHERE b.customer_id = ?
            ORDER BY b.travel_date DESC, b.booking_id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        let mut bookings = Vec::with_capacity(rows.len());
        for row in rows {
            let booking_id: i32 = row.try_get("booking_id")?;

            let seat_rows = sqlx::query(
                r#"
                SELECT seat_label FROM booking_seat
                WHERE booking_id = ?
                ORDER BY seat_pos
                "#,
            )
            .bind(booking_id)
            .fetch_all(&self.pool)
            .await?;

            let mut seats = Vec::with_capacity(seat_rows.len());
            for seat_row in seat_rows {
                seats.push(seat_row.try_get("seat_label")?);
            }

            bookings.push(BookingHistoryDetail {
                booking_id,
                schedule_id: row.try_get("schedule_id")?,
                route_id: row.try_get("route_id")?,
                bus_id: row.try_get("bus_id")?,
                departure_time: row.try_get("departure_time")?,
                arrival_time: row.try_get("arrival_time")?,
                price: row.try_get("price")?,
                booking_date: row.try_get("booking_date")?,
                travel_date: row.try_get("travel_date")?,
                seats,
                booking_status: row.try_get("status")?,
            });
        }

        Ok(BookingHistoryResponse { bookings })
    }
}
