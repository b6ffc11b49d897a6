use sqlx::{PgExecutor, Postgres, Transaction};
use time::OffsetDateTime;

use crate::db::models::{Reservation, ReservationDraft};

pub struct ReservationRepository;

impl ReservationRepository {
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(
            r#"
            SELECT id, professional_id, service_id, customer_id, start_time, end_time, status, created_at
            FROM reservations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn between<'e, E: PgExecutor<'e>>(
        executor: E,
        professional_id: i64,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(
            r#"
            SELECT id, professional_id, service_id, customer_id, start_time, end_time, status, created_at
            FROM reservations
            WHERE professional_id = $1 AND start_time < $3 AND end_time > $2
            ORDER BY start_time, id
            "#,
        )
        .bind(professional_id)
        .bind(from)
        .bind(to)
        .fetch_all(executor)
        .await
    }

    pub async fn for_customer<'e, E: PgExecutor<'e>>(
        executor: E,
        customer_id: i64,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(
            r#"
            SELECT id, professional_id, service_id, customer_id, start_time, end_time, status, created_at
            FROM reservations
            WHERE customer_id = $1
            ORDER BY start_time, id
            "#,
        )
        .bind(customer_id)
        .fetch_all(executor)
        .await
    }

    /// Whether the customer holds a confirmed reservation overlapping `[start, end)`.
    pub async fn customer_overlaps<'e, E: PgExecutor<'e>>(
        executor: E,
        customer_id: i64,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM reservations
                WHERE customer_id = $1 AND status = 'confirmed' AND start_time < $3 AND end_time > $2
            )
            "#,
        )
        .bind(customer_id)
        .bind(start)
        .bind(end)
        .fetch_one(executor)
        .await
    }

    /// Takes the per-professional lock held until the transaction ends.
    pub async fn lock_professional(
        tx: &mut Transaction<'_, Postgres>,
        professional_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(professional_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        draft: &ReservationDraft,
    ) -> Result<Reservation, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (professional_id, service_id, customer_id, start_time, end_time, status)
            VALUES ($1, $2, $3, $4, $5, 'confirmed')
            RETURNING id, professional_id, service_id, customer_id, start_time, end_time, status, created_at
            "#,
        )
        .bind(draft.professional_id)
        .bind(draft.service_id)
        .bind(draft.customer_id)
        .bind(draft.start_time)
        .bind(draft.end_time)
        .fetch_one(&mut **tx)
        .await
    }

    /// `None` when the reservation is missing or not confirmed.
    pub async fn cancel<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET status = 'cancelled'
            WHERE id = $1 AND status = 'confirmed'
            RETURNING id, professional_id, service_id, customer_id, start_time, end_time, status, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }
}
