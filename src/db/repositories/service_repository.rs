use sqlx::PgExecutor;

use crate::db::models::{NewService, Service};

pub struct ServiceRepository;

impl ServiceRepository {
    pub async fn create<'e, E: PgExecutor<'e>>(executor: E, service: &NewService) -> Result<Service, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (professional_id, name, description, price_cents, duration_minutes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, professional_id, name, description, price_cents, duration_minutes
            "#,
        )
        .bind(service.hairdresser)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(service.duration)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            r#"
            SELECT id, professional_id, name, description, price_cents, duration_minutes
            FROM services
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn list<'e, E: PgExecutor<'e>>(
        executor: E,
        professional_id: Option<i64>,
    ) -> Result<Vec<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            r#"
            SELECT id, professional_id, name, description, price_cents, duration_minutes
            FROM services
            WHERE $1::BIGINT IS NULL OR professional_id = $1
            ORDER BY id
            "#,
        )
        .bind(professional_id)
        .fetch_all(executor)
        .await
    }

    pub async fn update<'e, E: PgExecutor<'e>>(executor: E, service: &Service) -> Result<Service, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            r#"
            UPDATE services
            SET name = $1, description = $2, price_cents = $3, duration_minutes = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, professional_id, name, description, price_cents, duration_minutes
            "#,
        )
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(service.duration_minutes)
        .bind(service.id)
        .fetch_one(executor)
        .await
    }

    pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
