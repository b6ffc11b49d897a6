//! Availability, slot and booking rules.

pub mod clock;
pub mod committer;
mod error;
pub mod slots;
mod weekday;
mod window;

pub use committer::{bookable_slots, BookingPolicy, BookingRequest, ReservationCommitter, SlotQuery};
pub use error::SchedulingError;
pub use slots::{filter_conflicts, generate_slots, non_working_days, DaySpan};
pub use weekday::Weekday;
pub use window::OpenHours;
