use sqlx::{PgExecutor, Postgres, Transaction};

use crate::db::models::{NewWeeklyAvailability, WeeklyAvailability};
use crate::scheduling::Weekday;

pub struct AvailabilityRepository;

impl AvailabilityRepository {
    pub async fn list_by_professional<'e, E: PgExecutor<'e>>(
        executor: E,
        professional_id: i64,
    ) -> Result<Vec<WeeklyAvailability>, sqlx::Error> {
        sqlx::query_as::<_, WeeklyAvailability>(
            r#"
            SELECT id, professional_id, weekday, start_time, end_time, break_start, break_end
            FROM weekly_availabilities
            WHERE professional_id = $1
            ORDER BY weekday
            "#,
        )
        .bind(professional_id)
        .fetch_all(executor)
        .await
    }

    pub async fn find_for_weekday<'e, E: PgExecutor<'e>>(
        executor: E,
        professional_id: i64,
        weekday: Weekday,
    ) -> Result<Option<WeeklyAvailability>, sqlx::Error> {
        sqlx::query_as::<_, WeeklyAvailability>(
            r#"
            SELECT id, professional_id, weekday, start_time, end_time, break_start, break_end
            FROM weekly_availabilities
            WHERE professional_id = $1 AND weekday = $2
            "#,
        )
        .bind(professional_id)
        .bind(weekday)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
    ) -> Result<Option<WeeklyAvailability>, sqlx::Error> {
        sqlx::query_as::<_, WeeklyAvailability>(
            r#"
            SELECT id, professional_id, weekday, start_time, end_time, break_start, break_end
            FROM weekly_availabilities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        professional_id: i64,
        row: &NewWeeklyAvailability,
    ) -> Result<WeeklyAvailability, sqlx::Error> {
        sqlx::query_as::<_, WeeklyAvailability>(
            r#"
            INSERT INTO weekly_availabilities (professional_id, weekday, start_time, end_time, break_start, break_end)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, professional_id, weekday, start_time, end_time, break_start, break_end
            "#,
        )
        .bind(professional_id)
        .bind(row.weekday)
        .bind(row.start_time)
        .bind(row.end_time)
        .bind(row.break_start)
        .bind(row.break_end)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn update<'e, E: PgExecutor<'e>>(
        executor: E,
        row: &WeeklyAvailability,
    ) -> Result<WeeklyAvailability, sqlx::Error> {
        sqlx::query_as::<_, WeeklyAvailability>(
            r#"
            UPDATE weekly_availabilities
            SET weekday = $1, start_time = $2, end_time = $3, break_start = $4, break_end = $5
            WHERE id = $6
            RETURNING id, professional_id, weekday, start_time, end_time, break_start, break_end
            "#,
        )
        .bind(row.weekday)
        .bind(row.start_time)
        .bind(row.end_time)
        .bind(row.break_start)
        .bind(row.break_end)
        .bind(row.id)
        .fetch_one(executor)
        .await
    }

    /// Returns the number of deleted rows.
    pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM weekly_availabilities WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_professional(
        tx: &mut Transaction<'_, Postgres>,
        professional_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM weekly_availabilities WHERE professional_id = $1")
            .bind(professional_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
