use bus_booking_system::build_rocket;
use bus_booking_system::db::Database;
use dotenv::dotenv;

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    dotenv().ok();

    // Connect to the database
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let database = Database::new(&database_url)
        .await
        .expect("Failed to connect to database");

    let _ = build_rocket(database.pool).launch().await?;
    Ok(())
}
