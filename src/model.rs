use chrono::NaiveDateTime;
use utoipa::ToSchema;

/// A single weather observation reported for a named location.
#[derive(Debug, Clone, PartialEq, Default, sqlx::FromRow, ToSchema)]
pub struct WeatherData {
    // storage-assigned; absent until first saved
    #[schema(example = 1)]
    pub id: Option<i64>,

    #[schema(example = "Hamburg")]
    pub location: String,

    // degrees Celsius
    #[schema(example = 16.0)]
    pub temperature: f64,

    // relative humidity, percent
    #[schema(example = 70)]
    pub humidity: i32,

    #[schema(value_type = Option<String>, example = json!("2023-02-16T10:30:00"))]
    pub timestamp: Option<NaiveDateTime>,
}
