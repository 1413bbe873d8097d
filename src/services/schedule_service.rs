use crate::models::schedule::{Schedule, SeatAvailabilityResponse};
use crate::services::seat_ledger::SeatLedger;
use crate::utils::error::AppError;
use crate::utils::error::AppResult;
use sqlx::MySqlPool;

/// Read-only access to trip metadata. Schedules are created and modified by
/// external scheduling tooling; every other component goes through here.
#[derive(Clone)]
pub struct ScheduleService {
    pool: MySqlPool,
    ledger: SeatLedger,
}

impl ScheduleService {
    pub fn new(pool: MySqlPool) -> Self {
        ScheduleService {
            ledger: SeatLedger::new(pool.clone()),
            pool,
        }
    }

    pub async fn get_schedule(&self, schedule_id: i32) -> AppResult<Schedule> {
        let schedule = sqlx::query_as::<_, Schedule>(
            r#"
            SELECT schedule_id, route_id, bus_id, departure_time, arrival_time, price, capacity
            FROM schedule
            WHERE schedule_id = ?
            "#,
        )
        .bind(schedule_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::ScheduleNotFound(format!("schedule {} does not exist", schedule_id))
        })?;

        Ok(schedule)
    }

    pub async fn seat_availability(&self, schedule_id: i32) -> AppResult<SeatAvailabilityResponse> {
        let schedule = self.get_schedule(schedule_id).await?;
        let occupied_seats = self.ledger.snapshot_occupied(schedule_id).await?;
        let seats_remaining = (schedule.capacity - occupied_seats.len() as i32).max(0);

        Ok(SeatAvailabilityResponse {
            schedule_id,
            capacity: schedule.capacity,
            occupied_seats,
            seats_remaining,
        })
    }
}
