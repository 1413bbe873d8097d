use dotenv::dotenv;
use once_cell::sync::OnceCell;
use sqlx::mysql::MySqlPool as Pool;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::Error;
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

static TEST_DB: OnceCell<Mutex<Option<TestDb>>> = OnceCell::new();
static DB_NAME: OnceCell<String> = OnceCell::new();

macro_rules! test_println {
    ($name:expr, $($arg:tt)*) => {
        println!("[{}] {}", $name, format!($($arg)*))
    };
}
#[allow(unused_imports)]
pub(crate) use test_println;

#[derive(Debug)]
pub struct TestDb {
    pub pool: Pool,
    pub db_name: String,
}

// Create a connection pool without a database, used to create a new database
async fn create_connection_pool_without_db() -> Result<Pool, Error> {
    dotenv().ok();
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in .env file");

    let base_url = db_url.split("/").collect::<Vec<&str>>()[..3].join("/");

    MySqlPoolOptions::new()
        .max_connections(10)
        .connect(&base_url)
        .await
}

// Create a connection pool with a test database
async fn create_connection_pool_with_db(db_name: &str) -> Result<Pool, Error> {
    dotenv().ok();
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in .env file");

    let base_url = db_url.split("/").collect::<Vec<&str>>()[..3].join("/");

    MySqlPoolOptions::new()
        .max_connections(10)
        .connect(&format!("{}/{}", base_url, db_name))
        .await
}

impl TestDb {
    // One throwaway database per test run, shared by all tests in the run.
    pub async fn get_instance(test_file: &str) -> Result<Pool, Error> {
        let test_db = TEST_DB.get_or_init(|| Mutex::new(None));
        let mut guard = test_db.lock().await;

        if let Some(db) = guard.as_ref() {
            return Ok(db.pool.clone());
        }

        test_println!(test_file, "Creating new test database instance");
        let db = Self::setup_database().await?;
        let pool = db.pool.clone();
        *guard = Some(db);
        Ok(pool)
    }

    async fn setup_database() -> Result<Self, Error> {
        // Unique database name per run so parallel runs never collide
        let db_name = DB_NAME
            .get_or_init(|| {
                let timestamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap()
                    .as_secs();
                format!("bus_test_{}", timestamp)
            })
            .clone();

        let admin_pool = create_connection_pool_without_db().await?;

        sqlx::query(&format!("CREATE DATABASE IF NOT EXISTS {}", db_name))
            .execute(&admin_pool)
            .await?;

        let pool = create_connection_pool_with_db(&db_name).await?;
        Self::create_tables(&pool).await?;

        Ok(Self { pool, db_name })
    }

    async fn create_tables(pool: &Pool) -> Result<(), Error> {
        let tables = vec![
            "CREATE TABLE IF NOT EXISTS schedule (
                schedule_id INT AUTO_INCREMENT PRIMARY KEY,
                route_id INT NOT NULL,
                bus_id INT NOT NULL,
                departure_time DATETIME NOT NULL,
                arrival_time DATETIME NOT NULL,
                price DECIMAL(10, 2) NOT NULL,
                capacity INT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS booking (
                booking_id INT AUTO_INCREMENT PRIMARY KEY,
                customer_id INT NOT NULL,
                schedule_id INT NOT NULL,
                booking_date DATE NOT NULL,
                travel_date DATE NOT NULL,
                status ENUM('CONFIRMED', 'CANCELED') DEFAULT 'CONFIRMED' NOT NULL,
                CONSTRAINT booking_schedule_schedule_id_fk
                    FOREIGN KEY (schedule_id) REFERENCES schedule(schedule_id)
            )",
            "CREATE TABLE IF NOT EXISTS booking_seat (
                booking_id INT NOT NULL,
                schedule_id INT NOT NULL,
                seat_label VARCHAR(8) NOT NULL,
                seat_pos INT NOT NULL,
                active CHAR(1) NULL DEFAULT 'Y',
                PRIMARY KEY (booking_id, seat_label),
                CONSTRAINT uq_schedule_seat_active
                    UNIQUE (schedule_id, seat_label, active),
                CONSTRAINT booking_seat_booking_booking_id_fk
                    FOREIGN KEY (booking_id) REFERENCES booking(booking_id)
            )",
            "CREATE TABLE IF NOT EXISTS payment (
                payment_id INT AUTO_INCREMENT PRIMARY KEY,
                booking_id INT NOT NULL,
                amount DECIMAL(10, 2) NOT NULL,
                method ENUM('MOBILE_MONEY', 'CARD') NOT NULL,
                payer_phone CHAR(10) NULL,
                paid_at DATETIME NOT NULL,
                receipt_no CHAR(12) NOT NULL,
                txn_ref CHAR(36) NOT NULL,
                status ENUM('COMPLETED', 'REFUND_PENDING') DEFAULT 'COMPLETED' NOT NULL,
                CONSTRAINT uq_payment_booking UNIQUE (booking_id),
                CONSTRAINT uq_payment_receipt UNIQUE (receipt_no),
                CONSTRAINT uq_payment_txn UNIQUE (txn_ref),
                CONSTRAINT payment_booking_booking_id_fk
                    FOREIGN KEY (booking_id) REFERENCES booking(booking_id)
            )",
        ];

        for create_sql in tables {
            sqlx::query(create_sql).execute(pool).await?;
        }

        Ok(())
    }

    // Teardown function to drop the database after the test run
    pub async fn cleanup_database() -> Result<(), Error> {
        if let Some(test_db) = TEST_DB.get() {
            if let Some(db) = test_db.lock().await.take() {
                let admin_pool = create_connection_pool_without_db().await?;
                sqlx::query(&format!("DROP DATABASE IF EXISTS {}", db.db_name))
                    .execute(&admin_pool)
                    .await?;
            }
        }
        Ok(())
    }

    // Synchronous wrapper for #[dtor] cleanup, which runs after the tokio
    // runtime is gone.
    pub fn cleanup_database_sync() -> Result<(), Box<dyn std::error::Error>> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(Self::cleanup_database())?;
        Ok(())
    }
}
