pub mod by_device;
pub mod by_location;
pub mod create;
pub mod ingest;
pub mod mine;
pub mod update;

use actix_web::web;
use db_connector::models::weather_records::WeatherRecord;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::middleware::jwt::JwtMiddleware;

pub fn configure(cfg: &mut web::ServiceConfig) {
    let scope = web::scope("/wstation")
        .wrap(JwtMiddleware)
        .service(create::create)
        .service(update::update)
        .service(mine::mine_admin)
        .service(mine::mine)
        .service(by_device::by_device)
        .service(by_location::by_location_admin)
        .service(by_location::by_location);
    cfg.service(scope);

    // The edge path authenticates with an api key instead of a session.
    let edge = web::scope("/wstation-edge").service(ingest::ingest);
    cfg.service(edge);
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WeatherSchema {
    pub id: String,
    pub device_id: Option<String>,
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

impl From<WeatherRecord> for WeatherSchema {
    fn from(record: WeatherRecord) -> Self {
        WeatherSchema {
            id: record.id.to_string(),
            device_id: record.device_id.map(|id| id.to_string()),
            latitude: record.latitude,
            longitude: record.longitude,
            wind_direction: record.wind_direction,
            wind_speed: record.wind_speed,
            rainfall: record.rainfall,
            sunshine: record.sunshine,
            temperature: record.temperature,
            humidity: record.humidity,
            recording_time: record.recording_time,
        }
    }
}

/// Telemetry payload shared by the session path and the api-key path.
#[derive(Debug, Serialize, Deserialize, Clone, Validate, ToSchema)]
pub struct WeatherPayload {
    pub device_id: String,
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

impl WeatherPayload {
    pub(crate) fn into_record(self, device_id: uuid::Uuid) -> WeatherRecord {
        WeatherRecord {
            id: uuid::Uuid::new_v4(),
            device_id: Some(device_id),
            latitude: self.latitude,
            longitude: self.longitude,
            wind_direction: self.wind_direction,
            wind_speed: self.wind_speed,
            rainfall: self.rainfall,
            sunshine: self.sunshine,
            temperature: self.temperature,
            humidity: self.humidity,
            recording_time: self.recording_time,
        }
    }
}
