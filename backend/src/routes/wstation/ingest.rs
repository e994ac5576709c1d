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

use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use actix_web_validator::Json;
use diesel::prelude::*;

use crate::{
    access::{authorize_ingest, DeviceType},
    error::Error,
    routes::wstation::{WeatherPayload, WeatherSchema},
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Trusted telemetry ingestion for edge stations.
///
/// A valid api key authorizes writes to any WEATHER_STATION device; the
/// user-device mapping is deliberately not consulted on this path. This
/// is the documented trust boundary of the key credential, a leaked key
/// can feed every station until it is deleted.
#[utoipa::path(
    context_path = "/wstation-edge",
    request_body = WeatherPayload,
    responses(
        (status = 201, description = "Reading stored", body = WeatherSchema),
        (status = 400, description = "Device is not of the expected type"),
        (status = 401, description = "Missing or unknown api key"),
        (status = 404, description = "Device not found")
    )
)]
#[post("/ingest")]
pub async fn ingest(
    req: HttpRequest,
    state: web::Data<AppState>,
    data: Json<WeatherPayload>,
) -> Result<impl Responder, actix_web::Error> {
    let api_key = match req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|header| header.to_str().ok())
    {
        Some(key) => key.to_string(),
        None => return Err(Error::Unauthorized.into()),
    };

    let data = data.into_inner();
    let device_id = parse_uuid(&data.device_id)?;
    let device =
        authorize_ingest(&state, api_key, device_id, DeviceType::WeatherStation).await?;

    let mut conn = get_connection(&state)?;
    let record = web_block_unpacked(move || {
        use db_connector::schema::weather_records::dsl as weather_records;

        let record = data.into_record(device.id);
        match diesel::insert_into(weather_records::weather_records)
            .values(&record)
            .execute(&mut conn)
        {
            Ok(_) => Ok(record),
            Err(err) => {
                log::error!("Failed to insert weather reading: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    Ok(HttpResponse::Created().json(WeatherSchema::from(record)))
}
