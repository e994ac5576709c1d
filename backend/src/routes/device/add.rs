/* agridata-backend
 * Copyright (C) 2026 The agridata-backend authors
 *
 * This library is free software; you can redistribute it and/or
 * modify it under the terms of the GNU Lesser General Public
 * License as published by the Free Software Foundation; either
 * version 2 of the License, or (at your option) any later version.
 *
 * This library is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
 * Lesser General Public License for more details.
 *
 * You should have received a copy of the GNU Lesser General Public
 * License along with this library; if not, write to the
 * Free Software Foundation, Inc., 59 Temple Place - Suite 330,
 * Boston, MA 02111-1307, USA.
 */

use actix_web::{post, web, HttpResponse, Responder};
use actix_web_validator::Json;
use db_connector::models::device_users::DeviceUser;
use db_connector::models::devices::Device;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    access::DeviceType,
    error::Error,
    routes::device::DeviceSchema,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddDeviceSchema {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
    #[validate(length(min = 1, max = 100))]
    pub mac_address: String,
    pub device_type: DeviceType,
}

/// Register a new device. The creator becomes its first member.
#[utoipa::path(
    context_path = "/device",
    request_body = AddDeviceSchema,
    responses(
        (status = 201, description = "Device created", body = DeviceSchema),
        (status = 400, description = "Invalid payload")
    ),
    security(
        ("jwt" = [])
    )
)]
#[post("/add")]
pub async fn add(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    data: Json<AddDeviceSchema>,
) -> Result<impl Responder, actix_web::Error> {
    let data = data.into_inner();
    let uid: uuid::Uuid = user_id.into();

    let mut conn = get_connection(&state)?;
    let device = web_block_unpacked(move || {
        use db_connector::schema::device_users::dsl as device_users;
        use db_connector::schema::devices::dsl as devices;

        let device = Device {
            id: uuid::Uuid::new_v4(),
            name: data.name,
            location: data.location,
            mac_address: data.mac_address,
            device_type: data.device_type.as_i32(),
        };
        let creator_edge = DeviceUser {
            id: uuid::Uuid::new_v4(),
            user_id: uid,
            device_id: device.id,
        };

        // Device and creator mapping appear together or not at all.
        let inserted = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::insert_into(devices::devices)
                .values(&device)
                .execute(conn)?;
            diesel::insert_into(device_users::device_users)
                .values(&creator_edge)
                .execute(conn)?;
            Ok(device)
        });

        match inserted {
            Ok(device) => Ok(device),
            Err(err) => {
                log::error!("Failed to create device: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    let device = DeviceSchema::try_from(device)?;

    Ok(HttpResponse::Created().json(device))
}
