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
use db_connector::models::qgis_records::QgisRecord;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    access::{authorize_device, DeviceType},
    error::Error,
    routes::qgis::QgisSchema,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateQgisSchema {
    pub device_id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ndvi: Option<f64>,
    pub gndvi: Option<f64>,
    pub lai: Option<f64>,
    pub msavi: Option<f64>,
    pub recording_time: chrono::NaiveDateTime,
}

/// Store a QGIS survey reading. The device must be of type QGIS and
/// mapped to the caller (admins skip the mapping, not the type check).
#[utoipa::path(
    context_path = "/qgis",
    request_body = CreateQgisSchema,
    responses(
        (status = 201, description = "Reading stored", body = QgisSchema),
        (status = 400, description = "Device is not of the expected type"),
        (status = 403, description = "Device is not associated with the authenticated user"),
        (status = 404, description = "Device not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[post("/create")]
pub async fn create(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    data: Json<CreateQgisSchema>,
) -> Result<impl Responder, actix_web::Error> {
    let data = data.into_inner();
    let device_id = parse_uuid(&data.device_id)?;
    let device =
        authorize_device(&state, user_id.into(), device_id, Some(DeviceType::Qgis)).await?;

    let mut conn = get_connection(&state)?;
    let record = web_block_unpacked(move || {
        use db_connector::schema::qgis_records::dsl as qgis_records;

        let record = QgisRecord {
            id: uuid::Uuid::new_v4(),
            device_id: Some(device.id),
            latitude: data.latitude,
            longitude: data.longitude,
            ndvi: data.ndvi,
            gndvi: data.gndvi,
            lai: data.lai,
            msavi: data.msavi,
            recording_time: data.recording_time,
        };

        match diesel::insert_into(qgis_records::qgis_records)
            .values(&record)
            .execute(&mut conn)
        {
            Ok(_) => Ok(record),
            Err(err) => {
                log::error!("Failed to insert qgis reading: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    Ok(HttpResponse::Created().json(QgisSchema::from(record)))
}
