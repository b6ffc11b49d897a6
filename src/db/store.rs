use async_trait::async_trait;
use time::OffsetDateTime;

use super::models::{
    NewService, NewWeeklyAvailability, Reservation, ReservationDraft, Service, WeeklyAvailability,
};
use super::DatabaseError;
use crate::scheduling::{SchedulingError, Weekday};

/// Re-check run by [`BookingStore::commit_reservation`] while the
/// professional's day is locked. Receives the availability row for the
/// draft's weekday and the reservations of that day; returns whether the
/// draft is still bookable. An error aborts the commit as is.
pub type SlotCheck<'a> =
    dyn Fn(Option<&WeeklyAvailability>, &[Reservation]) -> Result<bool, SchedulingError> + Send + Sync + 'a;

/// Persistence for weekly availability, services and reservations.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn list_availability(&self, professional_id: i64) -> Result<Vec<WeeklyAvailability>, DatabaseError>;

    async fn availability_for_weekday(
        &self,
        professional_id: i64,
        weekday: Weekday,
    ) -> Result<Option<WeeklyAvailability>, DatabaseError>;

    async fn get_availability(&self, id: i64) -> Result<Option<WeeklyAvailability>, DatabaseError>;

    /// Inserts all rows or none. A weekday that already has a row is `Duplicate`.
    async fn create_availability(
        &self,
        professional_id: i64,
        rows: &[NewWeeklyAvailability],
    ) -> Result<Vec<WeeklyAvailability>, DatabaseError>;

    /// Replaces the professional's whole weekly table in one step.
    async fn replace_availability(
        &self,
        professional_id: i64,
        rows: &[NewWeeklyAvailability],
    ) -> Result<Vec<WeeklyAvailability>, DatabaseError>;

    async fn update_availability(&self, row: &WeeklyAvailability) -> Result<WeeklyAvailability, DatabaseError>;

    async fn delete_availability(&self, id: i64) -> Result<(), DatabaseError>;

    async fn create_service(&self, service: &NewService) -> Result<Service, DatabaseError>;

    async fn get_service(&self, id: i64) -> Result<Option<Service>, DatabaseError>;

    async fn list_services(&self, professional_id: Option<i64>) -> Result<Vec<Service>, DatabaseError>;

    async fn update_service(&self, service: &Service) -> Result<Service, DatabaseError>;

    /// Fails with `Conflict` while reservations still reference the service.
    async fn delete_service(&self, id: i64) -> Result<(), DatabaseError>;

    async fn get_reservation(&self, id: i64) -> Result<Option<Reservation>, DatabaseError>;

    /// Reservations of any status intersecting `[from, to)`, ordered by start.
    async fn reservations_between(
        &self,
        professional_id: i64,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Reservation>, DatabaseError>;

    async fn reservations_for_customer(&self, customer_id: i64) -> Result<Vec<Reservation>, DatabaseError>;

    /// Serialises with every other commit for the same professional, runs
    /// `check` against fresh rows and inserts the draft only when it passes.
    /// A failed check, an overlap with the professional's day or with another
    /// confirmed reservation of the same customer is `Conflict`.
    async fn commit_reservation(
        &self,
        draft: &ReservationDraft,
        check: &SlotCheck<'_>,
    ) -> Result<Reservation, SchedulingError>;

    /// Moves a confirmed reservation to cancelled. `Conflict` if it is not
    /// confirmed anymore.
    async fn cancel_reservation(&self, id: i64) -> Result<Reservation, DatabaseError>;
}
