use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Serialize;

/// One scheduled trip instance. Rows are created and maintained by external
/// scheduling tooling; this subsystem only reads them.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Schedule {
    pub schedule_id: i32,
    pub route_id: i32,
    pub bus_id: i32,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub price: Decimal,
    pub capacity: i32,
}

impl Schedule {
    pub fn travel_date(&self) -> NaiveDate {
        self.departure_time.date()
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ScheduleDetail {
    pub schedule_id: i32,
    pub route_id: i32,
    pub bus_id: i32,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub price: Decimal,
    pub capacity: i32,
}

impl From<Schedule> for ScheduleDetail {
    fn from(schedule: Schedule) -> Self {
        ScheduleDetail {
            schedule_id: schedule.schedule_id,
            route_id: schedule.route_id,
            bus_id: schedule.bus_id,
            departure_time: schedule.departure_time,
            arrival_time: schedule.arrival_time,
            price: schedule.price,
            capacity: schedule.capacity,
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SeatAvailabilityResponse {
    pub schedule_id: i32,
    pub capacity: i32,
    pub occupied_seats: Vec<String>,
    pub seats_remaining: i32,
}
