use crate::models::payment::{ExpectedAmountResponse, PaymentRequest, PaymentResponse};
use crate::services::payment_service::PaymentService;
use crate::utils::error::AppError;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Record a payment against a booking after validating the amount and the
/// method-specific fields.
#[openapi(tag = "Payments")]
#[post("/payments", format = "json", data = "<request>")]
pub async fn submit_payment(
    request: Json<PaymentRequest>,
    payment_service: &State<PaymentService>,
) -> Result<Json<PaymentResponse>, AppError> {
    let response = payment_service.submit_payment(request.into_inner()).await?;
    Ok(Json(response))
}

/// Amount a payment for this booking must match, for client-side display.
#[openapi(tag = "Payments")]
#[get("/payments/expected/<booking_id>")]
pub async fn expected_amount(
    booking_id: i32,
    payment_service: &State<PaymentService>,
) -> Result<Json<ExpectedAmountResponse>, AppError> {
    let response = payment_service.expected_amount(booking_id).await?;
    Ok(Json(response))
}
