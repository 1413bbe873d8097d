use crate::models::booking::{
    BookingHistoryResponse, BookingRequest, BookingResponse, CancellationResponse,
};
use crate::services::booking_service::BookingService;
use crate::services::cancellation_service::CancellationService;
use crate::utils::error::AppError;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Book seats on a schedule. Partial success is reported via
/// `rejected_seats`; the customer id is supplied by the (external)
/// authenticating layer.
#[openapi(tag = "Bookings")]
#[post("/bookings", format = "json", data = "<request>")]
pub async fn create_booking(
    request: Json<BookingRequest>,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingResponse>, AppError> {
    let response = booking_service.create_booking(request.into_inner()).await?;
    Ok(Json(response))
}

/// Cancel a booking and mark any completed payment refund-pending.
#[openapi(tag = "Bookings")]
#[post("/bookings/<booking_id>/cancel")]
pub async fn cancel_booking(
    booking_id: i32,
    cancellation_service: &State<CancellationService>,
) -> Result<Json<CancellationResponse>, AppError> {
    let response = cancellation_service.cancel_booking(booking_id).await?;
    Ok(Json(response))
}

/// Booking history for a customer, newest travel date first.
#[openapi(tag = "Bookings")]
#[get("/customers/<customer_id>/bookings")]
pub async fn booking_history(
    customer_id: i32,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingHistoryResponse>, AppError> {
    let response = booking_service.booking_history(customer_id).await?;
    Ok(Json(response))
}
