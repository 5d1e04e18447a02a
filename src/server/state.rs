use crate::repository::WeatherRepository;
use axum::extract::FromRef;
use std::fmt;

#[derive(Clone)]
pub struct AppState {
    pub repository: WeatherRepository,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish()
    }
}

impl FromRef<AppState> for WeatherRepository {
    fn from_ref(app: &AppState) -> Self {
        app.repository.clone()
    }
}
