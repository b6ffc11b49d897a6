use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::debug;

use super::models::{NewService, NewWeeklyAvailability, Reservation, ReservationDraft, Service, WeeklyAvailability};
use super::repositories::{AvailabilityRepository, ReservationRepository, ServiceRepository};
use super::store::{BookingStore, SlotCheck};
use super::DatabaseError;
use crate::scheduling::{SchedulingError, Weekday};

/// [`BookingStore`] backed by PostgreSQL.
///
/// Commits take `pg_advisory_xact_lock(professional_id)` before re-checking
/// the day; the `reservations_no_overlap` exclusion constraint rejects any
/// overlapping confirmed row that slips past it. A second constraint keeps
/// one customer from holding two overlapping confirmed reservations.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_availability(&self, professional_id: i64) -> Result<Vec<WeeklyAvailability>, DatabaseError> {
        Ok(AvailabilityRepository::list_by_professional(&self.pool, professional_id).await?)
    }

    async fn availability_for_weekday(
        &self,
        professional_id: i64,
        weekday: Weekday,
    ) -> Result<Option<WeeklyAvailability>, DatabaseError> {
        Ok(AvailabilityRepository::find_for_weekday(&self.pool, professional_id, weekday).await?)
    }

    async fn get_availability(&self, id: i64) -> Result<Option<WeeklyAvailability>, DatabaseError> {
        Ok(AvailabilityRepository::find_by_id(&self.pool, id).await?)
    }

    async fn create_availability(
        &self,
        professional_id: i64,
        rows: &[NewWeeklyAvailability],
    ) -> Result<Vec<WeeklyAvailability>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(rows.len());
        for row in rows {
            created.push(AvailabilityRepository::insert(&mut tx, professional_id, row).await?);
        }
        tx.commit().await?;
        Ok(created)
    }

    async fn replace_availability(
        &self,
        professional_id: i64,
        rows: &[NewWeeklyAvailability],
    ) -> Result<Vec<WeeklyAvailability>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        AvailabilityRepository::delete_by_professional(&mut tx, professional_id).await?;
        for row in rows {
            AvailabilityRepository::insert(&mut tx, professional_id, row).await?;
        }
        let stored = AvailabilityRepository::list_by_professional(&mut *tx, professional_id).await?;
        tx.commit().await?;
        Ok(stored)
    }

    async fn update_availability(&self, row: &WeeklyAvailability) -> Result<WeeklyAvailability, DatabaseError> {
        Ok(AvailabilityRepository::update(&self.pool, row).await?)
    }

    async fn delete_availability(&self, id: i64) -> Result<(), DatabaseError> {
        match AvailabilityRepository::delete(&self.pool, id).await? {
            0 => Err(DatabaseError::NotFound),
            _ => Ok(()),
        }
    }

    async fn create_service(&self, service: &NewService) -> Result<Service, DatabaseError> {
        Ok(ServiceRepository::create(&self.pool, service).await?)
    }

    async fn get_service(&self, id: i64) -> Result<Option<Service>, DatabaseError> {
        Ok(ServiceRepository::find_by_id(&self.pool, id).await?)
    }

    async fn list_services(&self, professional_id: Option<i64>) -> Result<Vec<Service>, DatabaseError> {
        Ok(ServiceRepository::list(&self.pool, professional_id).await?)
    }

    async fn update_service(&self, service: &Service) -> Result<Service, DatabaseError> {
        Ok(ServiceRepository::update(&self.pool, service).await?)
    }

    async fn delete_service(&self, id: i64) -> Result<(), DatabaseError> {
        match ServiceRepository::delete(&self.pool, id).await? {
            0 => Err(DatabaseError::NotFound),
            _ => Ok(()),
        }
    }

    async fn get_reservation(&self, id: i64) -> Result<Option<Reservation>, DatabaseError> {
        Ok(ReservationRepository::find_by_id(&self.pool, id).await?)
    }

    async fn reservations_between(
        &self,
        professional_id: i64,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Reservation>, DatabaseError> {
        Ok(ReservationRepository::between(&self.pool, professional_id, from, to).await?)
    }

    async fn reservations_for_customer(&self, customer_id: i64) -> Result<Vec<Reservation>, DatabaseError> {
        Ok(ReservationRepository::for_customer(&self.pool, customer_id).await?)
    }

    async fn commit_reservation(
        &self,
        draft: &ReservationDraft,
        check: &SlotCheck<'_>,
    ) -> Result<Reservation, SchedulingError> {
        let mut tx = self.pool.begin().await?;
        ReservationRepository::lock_professional(&mut tx, draft.professional_id).await?;

        let availability =
            AvailabilityRepository::find_for_weekday(&mut *tx, draft.professional_id, draft.weekday).await?;
        let existing =
            ReservationRepository::between(&mut *tx, draft.professional_id, draft.day_start, draft.day_end).await?;

        if !check(availability.as_ref(), existing.as_slice())? {
            debug!(professional_id = draft.professional_id, "Slot failed re-check, rolling back");
            return Err(DatabaseError::Conflict.into());
        }

        // Commits for different professionals do not share the lock; the
        // customer exclusion constraint catches what slips past this read
        if ReservationRepository::customer_overlaps(&mut *tx, draft.customer_id, draft.start_time, draft.end_time)
            .await?
        {
            debug!(customer_id = draft.customer_id, "Customer already booked at that time, rolling back");
            return Err(DatabaseError::Conflict.into());
        }

        let reservation = ReservationRepository::insert(&mut tx, draft).await?;
        tx.commit().await?;
        Ok(reservation)
    }

    async fn cancel_reservation(&self, id: i64) -> Result<Reservation, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let cancelled = match ReservationRepository::cancel(&mut *tx, id).await? {
            Some(reservation) => reservation,
            None => {
                return match ReservationRepository::find_by_id(&mut *tx, id).await? {
                    Some(_) => Err(DatabaseError::Conflict),
                    None => Err(DatabaseError::NotFound),
                }
            }
        };
        tx.commit().await?;
        Ok(cancelled)
    }
}
