pub mod booking;
pub mod payment;
pub mod schedule;
pub mod seat;
