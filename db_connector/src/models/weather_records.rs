use diesel::prelude::*;

use super::devices::Device;

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(Device))]
#[diesel(table_name = crate::schema::weather_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WeatherRecord {
    pub id: uuid::Uuid,
    pub device_id: Option<uuid::Uuid>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub wind_direction: Option<String>,
    pub wind_speed: Option<String>,
    pub rainfall: Option<String>,
    pub sunshine: Option<String>,
    pub temperature: Option<String>,
    pub humidity: Option<String>,
    pub recording_time: chrono::NaiveDateTime,
}
