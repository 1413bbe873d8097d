#[macro_use]
extern crate rocket;
extern crate rocket_okapi;

pub mod db;
pub mod models;
pub mod routes;
pub mod services;
pub mod swagger;
pub mod utils;

use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::make_swagger_ui;
use sqlx::MySqlPool;

use crate::services::booking_service::BookingService;
use crate::services::cancellation_service::CancellationService;
use crate::services::payment_service::PaymentService;
use crate::services::schedule_service::ScheduleService;
use crate::utils::config::{BookingPolicy, PaymentPolicy};

pub fn build_rocket(pool: MySqlPool) -> Rocket<Build> {
    let schedule_service = ScheduleService::new(pool.clone());
    let booking_service = BookingService::with_policy(pool.clone(), BookingPolicy::from_env());
    let payment_service = PaymentService::with_policy(pool.clone(), PaymentPolicy::from_env());
    let cancellation_service = CancellationService::new(pool);

    rocket::build()
        .manage(schedule_service)
        .manage(booking_service)
        .manage(payment_service)
        .manage(cancellation_service)
        .mount(
            "/api",
            openapi_get_routes![
                routes::schedule_route::get_schedule,
                routes::schedule_route::get_seat_availability,
                routes::booking_route::create_booking,
                routes::booking_route::cancel_booking,
                routes::booking_route::booking_history,
                routes::payment_route::submit_payment,
                routes::payment_route::expected_amount,
            ],
        )
        .mount("/swagger", make_swagger_ui(&swagger::swagger_ui()))
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
            })
        }))
}
