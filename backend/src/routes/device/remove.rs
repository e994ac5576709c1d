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

use actix_web::{delete, web, HttpResponse, Responder};
use actix_web_validator::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    access::authorize_device,
    error::Error,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct DeleteDeviceSchema {
    pub device_id: String,
}

/// Delete a device. Its readings stay behind with a nulled device
/// reference, its images are removed from the blob store.
#[utoipa::path(
    context_path = "/device",
    request_body = DeleteDeviceSchema,
    responses(
        (status = 200, description = "Device deleted"),
        (status = 403, description = "Device is not associated with the authenticated user"),
        (status = 404, description = "Device not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[delete("/remove")]
pub async fn remove(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    data: Json<DeleteDeviceSchema>,
) -> Result<impl Responder, actix_web::Error> {
    let device_id = parse_uuid(&data.device_id)?;
    let device = authorize_device(&state, user_id.into(), device_id, None).await?;

    let images = state.images.clone();
    let mut conn = get_connection(&state)?;
    web_block_unpacked(move || {
        use db_connector::schema::device_images::dsl as device_images;
        use db_connector::schema::devices::dsl as devices;

        let blobs: Vec<String> = match device_images::device_images
            .filter(device_images::device_id.eq(device.id))
            .select(device_images::file_name)
            .load(&mut conn)
        {
            Ok(names) => names,
            Err(err) => {
                log::error!("Failed to list device images: {err}");
                return Err(Error::InternalError);
            }
        };

        // Image rows cascade with the device row.
        match diesel::delete(devices::devices.find(device.id)).execute(&mut conn) {
            Ok(_) => (),
            Err(err) => {
                log::error!("Failed to delete device: {err}");
                return Err(Error::InternalError);
            }
        }

        for blob in blobs {
            if let Err(err) = images.remove(&blob) {
                log::warn!("Failed to remove stored image {blob}: {err}");
            }
        }

        Ok(())
    })
    .await?;

    Ok(HttpResponse::Ok().finish())
}
