use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::GuestRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub guest_repo: Arc<dyn GuestRepository>,
}
