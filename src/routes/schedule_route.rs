use crate::models::schedule::{ScheduleDetail, SeatAvailabilityResponse};
use crate::services::schedule_service::ScheduleService;
use crate::utils::error::AppError;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Trip metadata for one schedule.
#[openapi(tag = "Schedules")]
#[get("/schedules/<schedule_id>")]
pub async fn get_schedule(
    schedule_id: i32,
    schedule_service: &State<ScheduleService>,
) -> Result<Json<ScheduleDetail>, AppError> {
    let schedule = schedule_service.get_schedule(schedule_id).await?;
    Ok(Json(schedule.into()))
}

/// Occupied seats and remaining capacity for one schedule.
#[openapi(tag = "Schedules")]
#[get("/schedules/<schedule_id>/seats")]
pub async fn get_seat_availability(
    schedule_id: i32,
    schedule_service: &State<ScheduleService>,
) -> Result<Json<SeatAvailabilityResponse>, AppError> {
    let response = schedule_service.seat_availability(schedule_id).await?;
    Ok(Json(response))
}
