use std::sync::Arc;
use time::{Date, Duration, OffsetDateTime, Time, UtcOffset};
use tracing::{debug, info, warn};

use super::slots::{filter_conflicts, generate_slots, seconds_of_day, DaySpan, SECONDS_PER_DAY};
use super::{SchedulingError, Weekday};
use crate::db::{BookingStore, DatabaseError, Reservation, ReservationDraft, Service, WeeklyAvailability};

/// Salon-wide booking rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPolicy {
    /// Offset of the salon's wall clock; availability times are read in it.
    pub utc_offset: UtcOffset,
    /// Slots starting sooner than this from now are not offered.
    pub min_notice: Duration,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            utc_offset: UtcOffset::UTC,
            min_notice: Duration::ZERO,
        }
    }
}

impl BookingPolicy {
    /// `[midnight, next midnight)` of `date` in the salon offset.
    pub fn day_bounds(&self, date: Date) -> Result<(OffsetDateTime, OffsetDateTime), SchedulingError> {
        let start = date.midnight().assume_offset(self.utc_offset);
        let end = start
            .checked_add(Duration::days(1))
            .ok_or_else(|| SchedulingError::InvalidTime(format!("{date} is out of range")))?;
        Ok((start, end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotQuery {
    pub professional_id: i64,
    pub service_id: i64,
    pub date: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRequest {
    pub professional_id: i64,
    pub service_id: i64,
    pub customer_id: i64,
    pub start_time: OffsetDateTime,
}

/// Slots of `duration_minutes` still open on `date`: generated from the
/// weekday's availability, minus confirmed reservations, minus anything
/// starting before `not_before`. No availability row yields no slots.
pub fn bookable_slots(
    date: Date,
    availability: Option<&WeeklyAvailability>,
    duration_minutes: u32,
    reservations: &[Reservation],
    policy: &BookingPolicy,
    not_before: OffsetDateTime,
) -> Result<Vec<Time>, SchedulingError> {
    let Some(availability) = availability else {
        return Ok(Vec::new());
    };
    let hours = availability.open_hours()?;

    let busy: Vec<DaySpan> = reservations
        .iter()
        .filter(|r| r.blocks_slots())
        .filter_map(|r| busy_span(date, r, policy.utc_offset))
        .collect();

    let candidates = generate_slots(&hours, duration_minutes);
    let free = filter_conflicts(candidates, duration_minutes, &busy);

    Ok(free
        .into_iter()
        .filter(|slot| date.with_time(*slot).assume_offset(policy.utc_offset) >= not_before)
        .collect())
}

/// Part of `reservation` that falls on `date`, clamped to the day.
fn busy_span(date: Date, reservation: &Reservation, offset: UtcOffset) -> Option<DaySpan> {
    let start = reservation.start_time.checked_to_offset(offset)?;
    let end = reservation.end_time.checked_to_offset(offset)?;
    if start.date() > date || end.date() < date {
        return None;
    }

    let from = if start.date() < date { 0 } else { seconds_of_day(start.time()) };
    let to = if end.date() > date { SECONDS_PER_DAY } else { seconds_of_day(end.time()) };
    (from < to).then_some(DaySpan::new(from, to))
}

/// Lists bookable slots and commits reservations against a [`BookingStore`].
#[derive(Clone)]
pub struct ReservationCommitter {
    store: Arc<dyn BookingStore>,
    policy: BookingPolicy,
}

impl ReservationCommitter {
    pub fn new(store: Arc<dyn BookingStore>, policy: BookingPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    async fn service_for(&self, professional_id: i64, service_id: i64) -> Result<Service, SchedulingError> {
        match self.store.get_service(service_id).await? {
            Some(service) if service.professional_id == professional_id => Ok(service),
            _ => Err(SchedulingError::UnknownService {
                service_id,
                professional_id,
            }),
        }
    }

    pub async fn available_slots(&self, query: SlotQuery, now: OffsetDateTime) -> Result<Vec<Time>, SchedulingError> {
        let service = self.service_for(query.professional_id, query.service_id).await?;
        let (day_start, day_end) = self.policy.day_bounds(query.date)?;
        let weekday = Weekday::from(query.date.weekday());

        let Some(availability) = self
            .store
            .availability_for_weekday(query.professional_id, weekday)
            .await?
        else {
            debug!(
                professional_id = query.professional_id,
                %weekday,
                "No availability on this weekday"
            );
            return Ok(Vec::new());
        };

        let reservations = self
            .store
            .reservations_between(query.professional_id, day_start, day_end)
            .await?;

        let slots = bookable_slots(
            query.date,
            Some(&availability),
            service.duration(),
            &reservations,
            &self.policy,
            now + self.policy.min_notice,
        )?;
        debug!(
            professional_id = query.professional_id,
            service_id = query.service_id,
            date = %query.date,
            slots = slots.len(),
            "Computed available slots"
        );
        Ok(slots)
    }

    /// Books `request.start_time` if it is still one of the bookable slots
    /// when the store holds the professional's lock and the customer has no
    /// other confirmed reservation overlapping it. Otherwise nothing is
    /// written and the caller gets `SlotUnavailable`.
    pub async fn commit(&self, request: BookingRequest, now: OffsetDateTime) -> Result<Reservation, SchedulingError> {
        let service = self.service_for(request.professional_id, request.service_id).await?;
        let duration = service.duration();

        let out_of_range = || SchedulingError::InvalidTime(format!("{} is out of range", request.start_time));
        let start = request
            .start_time
            .checked_to_offset(self.policy.utc_offset)
            .ok_or_else(out_of_range)?;
        let end = start
            .checked_add(Duration::minutes(i64::from(duration)))
            .ok_or_else(out_of_range)?;
        let date = start.date();
        let slot = start.time();
        let (day_start, day_end) = self.policy.day_bounds(date)?;

        let draft = ReservationDraft {
            professional_id: request.professional_id,
            service_id: request.service_id,
            customer_id: request.customer_id,
            start_time: start,
            end_time: end,
            weekday: Weekday::from(date.weekday()),
            day_start,
            day_end,
        };

        let policy = self.policy;
        let not_before = now + policy.min_notice;
        let check = move |availability: Option<&WeeklyAvailability>, existing: &[Reservation]| {
            bookable_slots(date, availability, duration, existing, &policy, not_before)
                .map(|slots| slots.contains(&slot))
        };

        match self.store.commit_reservation(&draft, &check).await {
            Ok(reservation) => {
                info!(
                    reservation_id = reservation.id,
                    professional_id = reservation.professional_id,
                    customer_id = reservation.customer_id,
                    start_time = %reservation.start_time,
                    "Reservation confirmed"
                );
                Ok(reservation)
            }
            Err(SchedulingError::Store(DatabaseError::Conflict)) => {
                warn!(
                    professional_id = request.professional_id,
                    customer_id = request.customer_id,
                    start_time = %start,
                    "Slot no longer available"
                );
                Err(SchedulingError::SlotUnavailable)
            }
            Err(err) => Err(err),
        }
    }

    /// Cancels a reservation that has not been completed yet.
    pub async fn cancel(&self, reservation_id: i64, now: OffsetDateTime) -> Result<Reservation, SchedulingError> {
        let reservation = self
            .store
            .get_reservation(reservation_id)
            .await?
            .ok_or(DatabaseError::NotFound)?;

        if reservation.state_at(now) != crate::db::ReservationState::Confirmed {
            return Err(SchedulingError::NotCancellable(reservation_id));
        }

        match self.store.cancel_reservation(reservation_id).await {
            Ok(cancelled) => {
                info!(reservation_id, "Reservation cancelled");
                Ok(cancelled)
            }
            Err(DatabaseError::Conflict) => Err(SchedulingError::NotCancellable(reservation_id)),
            Err(err) => Err(err.into()),
        }
    }
}
