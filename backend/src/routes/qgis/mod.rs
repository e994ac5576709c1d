pub mod by_device;
pub mod by_location;
pub mod create;
pub mod mine;
pub mod update;

use actix_web::web;
use db_connector::models::qgis_records::QgisRecord;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::middleware::jwt::JwtMiddleware;

pub fn configure(cfg: &mut web::ServiceConfig) {
    let scope = web::scope("/qgis")
        .wrap(JwtMiddleware)
        .service(create::create)
        .service(update::update)
        .service(mine::mine_admin)
        .service(mine::mine)
        .service(by_device::by_device)
        .service(by_location::by_location_admin)
        .service(by_location::by_location);
    cfg.service(scope);
}

/// Survey reading with the usual vegetation indices.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QgisSchema {
    pub id: String,
    pub device_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ndvi: Option<f64>,
    pub gndvi: Option<f64>,
    pub lai: Option<f64>,
    pub msavi: Option<f64>,
    pub recording_time: chrono::NaiveDateTime,
}

impl From<QgisRecord> for QgisSchema {
    fn from(record: QgisRecord) -> Self {
        QgisSchema {
            id: record.id.to_string(),
            device_id: record.device_id.map(|id| id.to_string()),
            latitude: record.latitude,
            longitude: record.longitude,
            ndvi: record.ndvi,
            gndvi: record.gndvi,
            lai: record.lai,
            msavi: record.msavi,
            recording_time: record.recording_time,
        }
    }
}
