pub mod by_device;
pub mod by_location;
pub mod create;
pub mod mine;
pub mod update;

use actix_web::web;
use db_connector::models::mobile_records::MobileRecord;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::middleware::jwt::JwtMiddleware;

pub fn configure(cfg: &mut web::ServiceConfig) {
    let scope = web::scope("/mobile")
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

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MobileSchema {
    pub id: String,
    pub device_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub qr_code: String,
    pub recording_time: Option<chrono::NaiveDateTime>,
}

impl From<MobileRecord> for MobileSchema {
    fn from(record: MobileRecord) -> Self {
        MobileSchema {
            id: record.id.to_string(),
            device_id: record.device_id.map(|id| id.to_string()),
            latitude: record.latitude,
            longitude: record.longitude,
            qr_code: record.qr_code,
            recording_time: record.recording_time,
        }
    }
}
