mod availability_repository;
mod reservation_repository;
mod service_repository;

pub use availability_repository::AvailabilityRepository;
pub use reservation_repository::ReservationRepository;
pub use service_repository::ServiceRepository;
