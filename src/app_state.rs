use std::sync::Arc;

use crate::config;
use crate::db::BookingStore;
use crate::scheduling::ReservationCommitter;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookingStore>,
    pub committer: ReservationCommitter,
    pub env: config::Config,
}

impl AppState {
    pub fn new(store: Arc<dyn BookingStore>, env: config::Config) -> Self {
        let committer = ReservationCommitter::new(store.clone(), env.booking.policy());
        Self { store, committer, env }
    }
}
