mod reservation;
mod service;
mod weekly_availability;

pub use reservation::*;
pub use service::*;
pub use weekly_availability::*;
