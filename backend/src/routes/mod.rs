pub mod api_key;
pub mod auth;
pub mod device;
pub mod mobile;
pub mod qgis;
pub mod user;
pub mod wstation;

use actix_web::web;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

/// Query shapes shared by every reading vertical.
#[derive(Debug, Serialize, Deserialize, Validate, IntoParams)]
pub struct DeviceIdQuery {
    pub device_id: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, IntoParams)]
pub struct LocationQuery {
    pub lat: f64,
    pub long: f64,
}

#[derive(Debug, Serialize, Deserialize, Validate, IntoParams)]
pub struct TargetUserQuery {
    pub user_id: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(auth::configure);
    cfg.configure(user::configure);
    cfg.configure(device::configure);
    cfg.configure(mobile::configure);
    cfg.configure(qgis::configure);
    cfg.configure(wstation::configure);
    cfg.configure(api_key::configure);
}
