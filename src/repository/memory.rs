use super::errors::RepositoryError;
use super::ObservationRepository;
use crate::model::WeatherData;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Map-backed store honoring the same contract as the Postgres repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    last_id: i64,
    rows: BTreeMap<i64, WeatherData>,
}

#[async_trait]
impl ObservationRepository for InMemoryRepository {
    async fn save(&self, observation: &WeatherData) -> Result<WeatherData, RepositoryError> {
        let mut state = self.state.write().await;
        let id = match observation.id {
            None => {
                state.last_id += 1;
                state.last_id
            },
            Some(id) => {
                if !state.rows.contains_key(&id) {
                    return Err(RepositoryError::NotFound(id));
                }
                id
            },
        };

        let saved = WeatherData { id: Some(id), ..observation.clone() };
        state.rows.insert(id, saved.clone());
        Ok(saved)
    }

    async fn find_by_location(
        &self, location: &str,
    ) -> Result<Option<WeatherData>, RepositoryError> {
        let state = self.state.read().await;
        let newest = state
            .rows
            .values()
            .filter(|data| data.location == location)
            .max_by_key(|data| (data.timestamp, data.id));
        Ok(newest.cloned())
    }

    async fn find_all(&self) -> Result<Vec<WeatherData>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.rows.values().cloned().collect())
    }

    async fn delete(&self, observation: &WeatherData) -> Result<(), RepositoryError> {
        let id = observation.id.ok_or(RepositoryError::MissingId("delete"))?;
        let mut state = self.state.write().await;
        state.rows.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn observation(location: &str, temperature: f64, humidity: i32) -> WeatherData {
        WeatherData {
            id: None,
            location: location.to_string(),
            temperature,
            humidity,
            timestamp: None,
        }
    }

    fn at(day: u32, hour: u32) -> Option<chrono::NaiveDateTime> {
        NaiveDate::from_ymd_opt(2023, 2, day).unwrap().and_hms_opt(hour, 0, 0)
    }

    #[tokio::test]
    async fn save_assigns_identity_and_find_returns_the_row() {
        let repository = InMemoryRepository::default();

        let saved = repository.save(&observation("Berlin", 15.0, 80)).await.unwrap();
        assert_eq!(saved.id, Some(1));

        let found = repository.find_by_location("Berlin").await.unwrap().unwrap();
        assert_eq!(found, saved);
    }

    #[tokio::test]
    async fn find_all_returns_every_row_in_id_order() {
        let repository = InMemoryRepository::default();
        repository.save(&observation("Berlin", 15.0, 80)).await.unwrap();
        repository.save(&observation("Hamburg", 12.5, 75)).await.unwrap();

        let all = repository.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].location, "Berlin");
        assert_eq!(all[1].location, "Hamburg");
    }

    #[tokio::test]
    async fn save_with_id_replaces_the_row_in_place() {
        let repository = InMemoryRepository::default();
        let saved = repository.save(&observation("Berlin", 15.0, 80)).await.unwrap();

        let updated = WeatherData { temperature: 12.0, humidity: 70, ..saved.clone() };
        let replaced = repository.save(&updated).await.unwrap();
        assert_eq!(replaced.id, saved.id);

        let all = repository.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].temperature, 12.0);
        assert_eq!(all[0].humidity, 70);
    }

    #[tokio::test]
    async fn save_with_unknown_id_reports_not_found() {
        let repository = InMemoryRepository::default();
        let stray = WeatherData { id: Some(99), ..observation("Berlin", 15.0, 80) };

        let error = repository.save(&stray).await.unwrap_err();
        assert!(matches!(error, RepositoryError::NotFound(99)), "got: {error}");
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let repository = InMemoryRepository::default();
        let saved = repository.save(&observation("Munich", 18.5, 30)).await.unwrap();

        repository.delete(&saved).await.unwrap();
        assert_eq!(repository.find_by_location("Munich").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_with_unknown_id_reports_not_found() {
        let repository = InMemoryRepository::default();
        let stray = WeatherData { id: Some(7), ..observation("Munich", 18.5, 30) };

        let error = repository.delete(&stray).await.unwrap_err();
        assert!(matches!(error, RepositoryError::NotFound(7)), "got: {error}");
    }

    #[tokio::test]
    async fn delete_without_id_is_rejected() {
        let repository = InMemoryRepository::default();

        let error = repository.delete(&observation("Munich", 18.5, 30)).await.unwrap_err();
        assert!(matches!(error, RepositoryError::MissingId(_)), "got: {error}");
        assert!(error.to_string().contains("no id"));
    }

    #[tokio::test]
    async fn find_by_location_prefers_the_latest_reading() {
        let repository = InMemoryRepository::default();
        let base = observation("Berlin", 10.0, 80);

        repository
            .save(&WeatherData { timestamp: at(14, 9), temperature: 9.0, ..base.clone() })
            .await
            .unwrap();
        repository
            .save(&WeatherData { timestamp: at(16, 8), temperature: 11.0, ..base.clone() })
            .await
            .unwrap();
        repository
            .save(&WeatherData { timestamp: None, temperature: 13.0, ..base.clone() })
            .await
            .unwrap();

        let found = repository.find_by_location("Berlin").await.unwrap().unwrap();
        assert_eq!(found.temperature, 11.0);
        assert_eq!(found.timestamp, at(16, 8));
    }

    #[tokio::test]
    async fn find_by_location_breaks_timestamp_ties_by_newest_id() {
        let repository = InMemoryRepository::default();
        let base = WeatherData { timestamp: at(16, 8), ..observation("Berlin", 10.0, 80) };

        repository.save(&base).await.unwrap();
        let newest = repository.save(&WeatherData { temperature: 11.5, ..base }).await.unwrap();

        let found = repository.find_by_location("Berlin").await.unwrap().unwrap();
        assert_eq!(found.id, newest.id);
        assert_eq!(found.temperature, 11.5);
    }

    #[tokio::test]
    async fn find_by_location_misses_unknown_locations() {
        let repository = InMemoryRepository::default();
        repository.save(&observation("Berlin", 15.0, 80)).await.unwrap();

        assert_eq!(repository.find_by_location("Atlantis").await.unwrap(), None);
    }
}
