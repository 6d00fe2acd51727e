use chrono::{Datelike, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, PaginatorTrait, QueryFilter, Statement};
use tokio::sync::Mutex;
use tracing::debug;

use crate::entities::reservation;
use crate::error::AppResult;

/// Serializes code allocation within this process. The unique index on
/// `reservation.code` is the backstop across processes.
static SEQUENCE_LOCK: Mutex<()> = Mutex::const_new(());

/// Format: RV-{year}-{sequence}, zero-padded to six digits.
pub fn format_code(year: i32, seq: u32) -> String {
    format!("RV-{}-{:06}", year, seq)
}

fn next_sequence(last: Option<i32>) -> u32 {
    (last.unwrap_or(0) + 1) as u32
}

/// Allocate the next reservation code for the current year. Sequences
/// restart at 1 each January.
pub async fn next_reservation_code<C: ConnectionTrait>(conn: &C) -> AppResult<String> {
    let _guard = SEQUENCE_LOCK.lock().await;

    let year = Utc::now().year();
    let prefix = format!("RV-{}-%", year);

    // The sequence starts at character 9: RV-YYYY-NNNNNN.
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT MAX(CAST(SUBSTRING(code FROM 9) AS INTEGER)) AS last_seq \
         FROM reservation WHERE code LIKE $1",
        [prefix.into()],
    );

    let last: Option<i32> = match conn.query_one(stmt).await? {
        Some(row) => row.try_get("", "last_seq").unwrap_or(None),
        None => None,
    };

    let mut seq = next_sequence(last);
    let mut code = format_code(year, seq);

    // Probe for collisions left by concurrent writers in other processes.
    while reservation::Entity::find()
        .filter(reservation::Column::Code.eq(code.clone()))
        .count(conn)
        .await?
        > 0
    {
        seq += 1;
        code = format_code(year, seq);
    }

    debug!(code = %code, "allocated reservation code");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_zero_padded_to_six_digits() {
        assert_eq!(format_code(2025, 1), "RV-2025-000001");
        assert_eq!(format_code(2025, 123), "RV-2025-000123");
        assert_eq!(format_code(2026, 1000000), "RV-2026-1000000");
    }

    #[test]
    fn sequence_starts_at_one_and_increments() {
        assert_eq!(next_sequence(None), 1);
        assert_eq!(next_sequence(Some(41)), 42);
    }
}
