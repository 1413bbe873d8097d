pub mod booking_route;
pub mod payment_route;
pub mod schedule_route;
