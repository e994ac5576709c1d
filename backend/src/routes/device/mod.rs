pub mod add;
pub mod get_all;
pub mod get_devices;
pub mod images;
pub mod info;
pub mod map_user;
pub mod remove;
pub mod unmap_user;

use actix_web::web;
use db_connector::models::devices::Device;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::access::DeviceType;
use crate::error::Error;
use crate::middleware::jwt::JwtMiddleware;

pub fn configure(cfg: &mut web::ServiceConfig) {
    let scope = web::scope("/device")
        .wrap(JwtMiddleware)
        .service(add::add)
        .service(get_devices::get_devices)
        .service(get_all::get_all)
        .service(info::info)
        .service(remove::remove)
        .service(map_user::map_user_admin)
        .service(map_user::map_user)
        .service(unmap_user::unmap_user_admin)
        .service(unmap_user::unmap_user)
        // Literal /images prefix first so it is not captured as a device id.
        .service(images::download::download)
        .service(images::remove::remove)
        .service(images::upload::upload)
        .service(images::list::list);
    cfg.service(scope);
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeviceSchema {
    pub id: String,
    pub name: String,
    pub location: String,
    pub mac_address: String,
    pub device_type: DeviceType,
}

impl TryFrom<Device> for DeviceSchema {
    type Error = Error;

    fn try_from(device: Device) -> Result<Self, Error> {
        let device_type = match DeviceType::from_i32(device.device_type) {
            Some(ty) => ty,
            None => {
                log::error!(
                    "Device {} has unknown type {} in the store",
                    device.id,
                    device.device_type
                );
                return Err(Error::InternalError);
            }
        };

        Ok(DeviceSchema {
            id: device.id.to_string(),
            name: device.name,
            location: device.location,
            mac_address: device.mac_address,
            device_type,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MapStatusResponse {
    pub status: String,
}
