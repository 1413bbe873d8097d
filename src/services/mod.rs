pub mod booking_service;
pub mod cancellation_service;
pub mod payment_service;
pub mod schedule_service;
pub mod seat_ledger;
