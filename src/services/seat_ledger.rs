use crate::utils::error::AppResult;
use indexmap::IndexSet;
use sqlx::{MySql, MySqlPool, Row, Transaction};

/// Single source of truth for seat occupancy per schedule.
///
/// Occupancy is always derived live from booking status: a seat is occupied
/// iff a CONFIRMED booking holds it. Nothing is cached in-process, so the
/// answer stays correct across processes and after cancellations.
///
/// The claim path relies on the uq_schedule_seat_active unique index. An
/// insert that loses a race against a concurrent claim fails with a
/// duplicate-key error, which callers turn into a bounded re-read retry.
#[derive(Clone)]
pub struct SeatLedger {
    pool: MySqlPool,
}

/// Outcome of a single claim attempt.
pub(crate) enum ClaimError {
    /// A requested seat was taken by a concurrent booking after the
    /// occupancy snapshot was read. Re-read and retry.
    SeatTaken,
    Db(sqlx::Error),
}

impl SeatLedger {
    pub fn new(pool: MySqlPool) -> Self {
        SeatLedger { pool }
    }

    /// Seat labels currently held by CONFIRMED bookings for the schedule.
    pub async fn snapshot_occupied(&self, schedule_id: i32) -> AppResult<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT bs.seat_label
            FROM booking_seat bs
            INNER JOIN booking b ON b.booking_id = bs.booking_id
            WHERE bs.schedule_id = ? AND b.status = 'CONFIRMED'
            ORDER BY bs.seat_label
            "#,
        )
        .bind(schedule_id)
        .fetch_all(&self.pool)
        .await?;

        let mut occupied = Vec::with_capacity(rows.len());
        for row in rows {
            occupied.push(row.try_get("seat_label")?);
        }
        Ok(occupied)
    }

    /// Occupancy read inside a claim transaction.
    pub(crate) async fn occupied_in_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        schedule_id: i32,
    ) -> AppResult<IndexSet<String>> {
        let rows = sqlx::query(
            r#"
            SELECT bs.seat_label
            FROM booking_seat bs
            INNER JOIN booking b ON b.booking_id = bs.booking_id
            WHERE bs.schedule_id = ? AND b.status = 'CONFIRMED'
            "#,
        )
        .bind(schedule_id)
        .fetch_all(&mut **tx)
        .await?;

        let mut occupied = IndexSet::with_capacity(rows.len());
        for row in rows {
            occupied.insert(row.try_get("seat_label")?);
        }
        Ok(occupied)
    }

    /// One claim attempt: insert a seat row per label, in request order.
    /// The unique index rejects any seat that a concurrent CONFIRMED
    /// booking already holds.
    pub(crate) async fn claim(
        &self,
        tx: &mut Transaction<'_, MySql>,
        booking_id: i32,
        schedule_id: i32,
        seats: &[String],
    ) -> Result<(), ClaimError> {
        for (pos, label) in seats.iter().enumerate() {
            let inserted = sqlx::query(
                r#"
                INSERT INTO booking_seat (booking_id, schedule_id, seat_label, seat_pos, active)
                VALUES (?, ?, ?, ?, 'Y')
                "#,
            )
            .bind(booking_id)
            .bind(schedule_id)
            .bind(label)
            .bind(pos as i32)
            .execute(&mut **tx)
            .await;

            match inserted {
                Ok(_) => {}
                Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                    return Err(ClaimError::SeatTaken);
                }
                Err(e) => return Err(ClaimError::Db(e)),
            }
        }

        Ok(())
    }
}
