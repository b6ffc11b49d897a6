//! In-process [`BookingStore`] used by tests and by `STORE_BACKEND=memory`.
//!
//! A single async mutex guards all tables, so a commit's re-check and insert
//! happen without any other writer in between.

use async_trait::async_trait;
use std::collections::BTreeMap;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use super::models::{
    NewService, NewWeeklyAvailability, Reservation, ReservationDraft, ReservationStatus, Service,
    WeeklyAvailability,
};
use super::store::{BookingStore, SlotCheck};
use super::DatabaseError;
use crate::scheduling::{SchedulingError, Weekday};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    availabilities: BTreeMap<i64, WeeklyAvailability>,
    services: BTreeMap<i64, Service>,
    reservations: BTreeMap<i64, Reservation>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn has_weekday(&self, professional_id: i64, weekday: Weekday, except: Option<i64>) -> bool {
        self.availabilities.values().any(|row| {
            row.professional_id == professional_id && row.weekday == weekday && Some(row.id) != except
        })
    }

    fn day_of(&self, professional_id: i64, from: OffsetDateTime, to: OffsetDateTime) -> Vec<Reservation> {
        let mut rows: Vec<Reservation> = self
            .reservations
            .values()
            .filter(|r| r.professional_id == professional_id && r.start_time < to && r.end_time > from)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.start_time, r.id));
        rows
    }

    fn sorted_availability(&self, professional_id: i64) -> Vec<WeeklyAvailability> {
        let mut rows: Vec<WeeklyAvailability> = self
            .availabilities
            .values()
            .filter(|row| row.professional_id == professional_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.weekday);
        rows
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        let _tables = self.tables.lock().await;
        Ok(())
    }

    async fn list_availability(&self, professional_id: i64) -> Result<Vec<WeeklyAvailability>, DatabaseError> {
        Ok(self.tables.lock().await.sorted_availability(professional_id))
    }

    async fn availability_for_weekday(
        &self,
        professional_id: i64,
        weekday: Weekday,
    ) -> Result<Option<WeeklyAvailability>, DatabaseError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .availabilities
            .values()
            .find(|row| row.professional_id == professional_id && row.weekday == weekday)
            .cloned())
    }

    async fn get_availability(&self, id: i64) -> Result<Option<WeeklyAvailability>, DatabaseError> {
        Ok(self.tables.lock().await.availabilities.get(&id).cloned())
    }

    async fn create_availability(
        &self,
        professional_id: i64,
        rows: &[NewWeeklyAvailability],
    ) -> Result<Vec<WeeklyAvailability>, DatabaseError> {
        let mut tables = self.tables.lock().await;
        for (i, row) in rows.iter().enumerate() {
            let repeated = rows[..i].iter().any(|earlier| earlier.weekday == row.weekday);
            if repeated || tables.has_weekday(professional_id, row.weekday, None) {
                return Err(DatabaseError::Duplicate);
            }
        }

        let mut created = Vec::with_capacity(rows.len());
        for row in rows {
            let id = tables.next_id();
            let stored = row.clone().into_row(id, professional_id);
            tables.availabilities.insert(id, stored.clone());
            created.push(stored);
        }
        Ok(created)
    }

    async fn replace_availability(
        &self,
        professional_id: i64,
        rows: &[NewWeeklyAvailability],
    ) -> Result<Vec<WeeklyAvailability>, DatabaseError> {
        for (i, row) in rows.iter().enumerate() {
            if rows[..i].iter().any(|earlier| earlier.weekday == row.weekday) {
                return Err(DatabaseError::Duplicate);
            }
        }

        let mut tables = self.tables.lock().await;
        tables
            .availabilities
            .retain(|_, row| row.professional_id != professional_id);
        for row in rows {
            let id = tables.next_id();
            tables
                .availabilities
                .insert(id, row.clone().into_row(id, professional_id));
        }
        Ok(tables.sorted_availability(professional_id))
    }

    async fn update_availability(&self, row: &WeeklyAvailability) -> Result<WeeklyAvailability, DatabaseError> {
        let mut tables = self.tables.lock().await;
        if !tables.availabilities.contains_key(&row.id) {
            return Err(DatabaseError::NotFound);
        }
        if tables.has_weekday(row.professional_id, row.weekday, Some(row.id)) {
            return Err(DatabaseError::Duplicate);
        }
        tables.availabilities.insert(row.id, row.clone());
        Ok(row.clone())
    }

    async fn delete_availability(&self, id: i64) -> Result<(), DatabaseError> {
        self.tables
            .lock()
            .await
            .availabilities
            .remove(&id)
            .map(|_| ())
            .ok_or(DatabaseError::NotFound)
    }

    async fn create_service(&self, service: &NewService) -> Result<Service, DatabaseError> {
        let mut tables = self.tables.lock().await;
        let id = tables.next_id();
        let created = Service {
            id,
            professional_id: service.hairdresser,
            name: service.name.clone(),
            description: service.description.clone(),
            price: service.price,
            duration_minutes: service.duration,
        };
        tables.services.insert(id, created.clone());
        Ok(created)
    }

    async fn get_service(&self, id: i64) -> Result<Option<Service>, DatabaseError> {
        Ok(self.tables.lock().await.services.get(&id).cloned())
    }

    async fn list_services(&self, professional_id: Option<i64>) -> Result<Vec<Service>, DatabaseError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .services
            .values()
            .filter(|service| professional_id.map_or(true, |id| service.professional_id == id))
            .cloned()
            .collect())
    }

    async fn update_service(&self, service: &Service) -> Result<Service, DatabaseError> {
        let mut tables = self.tables.lock().await;
        match tables.services.get_mut(&service.id) {
            Some(stored) => {
                *stored = service.clone();
                Ok(service.clone())
            }
            None => Err(DatabaseError::NotFound),
        }
    }

    async fn delete_service(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.lock().await;
        if !tables.services.contains_key(&id) {
            return Err(DatabaseError::NotFound);
        }
        if tables.reservations.values().any(|r| r.service_id == id) {
            return Err(DatabaseError::Conflict);
        }
        tables.services.remove(&id);
        Ok(())
    }

    async fn get_reservation(&self, id: i64) -> Result<Option<Reservation>, DatabaseError> {
        Ok(self.tables.lock().await.reservations.get(&id).cloned())
    }

    async fn reservations_between(
        &self,
        professional_id: i64,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Reservation>, DatabaseError> {
        Ok(self.tables.lock().await.day_of(professional_id, from, to))
    }

    async fn reservations_for_customer(&self, customer_id: i64) -> Result<Vec<Reservation>, DatabaseError> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Reservation> = tables
            .reservations
            .values()
            .filter(|r| r.customer_id == customer_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.start_time, r.id));
        Ok(rows)
    }

    async fn commit_reservation(
        &self,
        draft: &ReservationDraft,
        check: &SlotCheck<'_>,
    ) -> Result<Reservation, SchedulingError> {
        let mut tables = self.tables.lock().await;

        let availability = tables
            .availabilities
            .values()
            .find(|row| row.professional_id == draft.professional_id && row.weekday == draft.weekday)
            .cloned();
        let existing = tables.day_of(draft.professional_id, draft.day_start, draft.day_end);
        if !check(availability.as_ref(), existing.as_slice())? {
            return Err(DatabaseError::Conflict.into());
        }

        let overlapping = tables.reservations.values().any(|r| {
            r.blocks_slots()
                && (r.professional_id == draft.professional_id || r.customer_id == draft.customer_id)
                && r.start_time < draft.end_time
                && r.end_time > draft.start_time
        });
        if overlapping {
            return Err(DatabaseError::Conflict.into());
        }

        let id = tables.next_id();
        let reservation = Reservation {
            id,
            professional_id: draft.professional_id,
            service_id: draft.service_id,
            customer_id: draft.customer_id,
            start_time: draft.start_time,
            end_time: draft.end_time,
            status: ReservationStatus::Confirmed,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn cancel_reservation(&self, id: i64) -> Result<Reservation, DatabaseError> {
        let mut tables = self.tables.lock().await;
        let reservation = tables.reservations.get_mut(&id).ok_or(DatabaseError::NotFound)?;
        if reservation.status != ReservationStatus::Confirmed {
            return Err(DatabaseError::Conflict);
        }
        reservation.status = ReservationStatus::Cancelled;
        Ok(reservation.clone())
    }
}
