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

use actix_web::{put, web, HttpResponse, Responder};
use actix_web_validator::Json;
use db_connector::models::qgis_records::QgisRecord;
use diesel::{prelude::*, result::Error::NotFound};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    access::{authorize_device, require_admin, DeviceType},
    error::Error,
    routes::qgis::QgisSchema,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateQgisSchema {
    pub id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ndvi: Option<f64>,
    pub gndvi: Option<f64>,
    pub lai: Option<f64>,
    pub msavi: Option<f64>,
    pub recording_time: Option<chrono::NaiveDateTime>,
}

/// Partial update of a QGIS reading. Authorization follows the
/// reading's current device; a detached reading is admin territory.
#[utoipa::path(
    context_path = "/qgis",
    request_body = UpdateQgisSchema,
    responses(
        (status = 200, description = "Updated reading", body = QgisSchema),
        (status = 400, description = "Device is not of the expected type"),
        (status = 403, description = "Device is not associated with the authenticated user"),
        (status = 404, description = "Record not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[put("/update")]
pub async fn update(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    data: Json<UpdateQgisSchema>,
) -> Result<impl Responder, actix_web::Error> {
    use db_connector::schema::qgis_records::dsl as qgis_records;

    let data = data.into_inner();
    let record_id = parse_uuid(&data.id)?;

    let mut conn = get_connection(&state)?;
    let record: QgisRecord = web_block_unpacked(move || {
        match qgis_records::qgis_records
            .find(record_id)
            .select(QgisRecord::as_select())
            .get_result(&mut conn)
        {
            Ok(record) => Ok(record),
            Err(NotFound) => Err(Error::RecordNotFound),
            Err(err) => {
                log::error!("Failed to load qgis reading: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    match record.device_id {
        Some(device_id) => {
            authorize_device(&state, user_id.into(), device_id, Some(DeviceType::Qgis)).await?;
        }
        None => {
            require_admin(&state, user_id.into()).await?;
        }
    }

    let mut conn = get_connection(&state)?;
    let record = web_block_unpacked(move || {
        let mut record = record;
        if data.latitude.is_some() {
            record.latitude = data.latitude;
        }
        if data.longitude.is_some() {
            record.longitude = data.longitude;
        }
        if data.ndvi.is_some() {
            record.ndvi = data.ndvi;
        }
        if data.gndvi.is_some() {
            record.gndvi = data.gndvi;
        }
        if data.lai.is_some() {
            record.lai = data.lai;
        }
        if data.msavi.is_some() {
            record.msavi = data.msavi;
        }
        if let Some(recording_time) = data.recording_time {
            record.recording_time = recording_time;
        }

        match diesel::update(qgis_records::qgis_records.find(record.id))
            .set((
                qgis_records::latitude.eq(record.latitude),
                qgis_records::longitude.eq(record.longitude),
                qgis_records::ndvi.eq(record.ndvi),
                qgis_records::gndvi.eq(record.gndvi),
                qgis_records::lai.eq(record.lai),
                qgis_records::msavi.eq(record.msavi),
                qgis_records::recording_time.eq(record.recording_time),
            ))
            .execute(&mut conn)
        {
            Ok(_) => Ok(record),
            Err(err) => {
                log::error!("Failed to update qgis reading: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    Ok(HttpResponse::Ok().json(QgisSchema::from(record)))
}
