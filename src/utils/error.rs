use rocket::http::ContentType;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::Request;
use rocket::Response;
use rocket_okapi::JsonSchema;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug, Serialize, JsonSchema)]
pub enum AppError {
    #[error("Database error")]
    DatabaseError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Schedule not found: {0}")]
    ScheduleNotFound(String),

    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    #[error("Seat selection exceeds the per-booking limit: {requested} requested, {max} allowed")]
    TooManySeats { requested: usize, max: usize },

    #[error("None of the requested seats are available: {}", .rejected.join(", "))]
    NoSeatsAvailable { rejected: Vec<String> },

    #[error("Seat conflict: {0}")]
    SeatConflict(String),

    #[error("Invalid amount: submitted {submitted}, expected {expected}")]
    InvalidAmount { submitted: Decimal, expected: Decimal },

    #[error("Invalid payment details: {0}")]
    InvalidPaymentDetails(String),

    #[error("Unsupported payment method: {0}")]
    UnsupportedMethod(String),

    #[error("Booking not cancelable: {0}")]
    BookingNotCancelable(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    /// Machine-readable error kind, stable across message wording changes.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "DatabaseError",
            AppError::BadRequest(_) => "BadRequest",
            AppError::ScheduleNotFound(_) => "ScheduleNotFound",
            AppError::BookingNotFound(_) => "BookingNotFound",
            AppError::TooManySeats { .. } => "TooManySeats",
            AppError::NoSeatsAvailable { .. } => "NoSeatsAvailable",
            AppError::SeatConflict(_) => "SeatConflict",
            AppError::InvalidAmount { .. } => "InvalidAmount",
            AppError::InvalidPaymentDetails(_) => "InvalidPaymentDetails",
            AppError::UnsupportedMethod(_) => "UnsupportedMethod",
            AppError::BookingNotCancelable(_) => "BookingNotCancelable",
            AppError::Conflict(_) => "Conflict",
        }
    }
}

// Convert sqlx::Error (database error) to AppError::DatabaseError
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

// Define a type alias for the result type
pub type AppResult<T> = Result<T, AppError>;

// Implement the Responder trait for AppError
// Format all errors to an HTTP response at route level
#[rocket::async_trait]
impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, _: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = match self {
            AppError::DatabaseError(_) => Status::InternalServerError,
            AppError::BadRequest(_) => Status::BadRequest,
            AppError::ScheduleNotFound(_) => Status::NotFound,
            AppError::BookingNotFound(_) => Status::NotFound,
            AppError::TooManySeats { .. } => Status::BadRequest,
            AppError::NoSeatsAvailable { .. } => Status::Conflict,
            AppError::SeatConflict(_) => Status::Conflict,
            AppError::InvalidAmount { .. } => Status::UnprocessableEntity,
            AppError::InvalidPaymentDetails(_) => Status::UnprocessableEntity,
            AppError::UnsupportedMethod(_) => Status::BadRequest,
            AppError::BookingNotCancelable(_) => Status::Conflict,
            AppError::Conflict(_) => Status::Conflict,
        };

        let json = json!({
            "error": self.kind(),
            "message": self.to_string()
        });

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(None, Cursor::new(json.to_string()))
            .ok()
    }
}
