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
use db_connector::models::weather_records::WeatherRecord;
use diesel::{prelude::*, result::Error::NotFound};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    access::{authorize_device, require_admin, DeviceType},
    error::Error,
    routes::wstation::WeatherSchema,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateWeatherSchema {
    pub id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub wind_direction: Option<String>,
    pub wind_speed: Option<String>,
    pub rainfall: Option<String>,
    pub sunshine: Option<String>,
    pub temperature: Option<String>,
    pub humidity: Option<String>,
    pub recording_time: Option<chrono::NaiveDateTime>,
}

/// Partial update of a weather reading. Authorization follows the
/// reading's current device; a detached reading is admin territory.
#[utoipa::path(
    context_path = "/wstation",
    request_body = UpdateWeatherSchema,
    responses(
        (status = 200, description = "Updated reading", body = WeatherSchema),
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
    data: Json<UpdateWeatherSchema>,
) -> Result<impl Responder, actix_web::Error> {
    use db_connector::schema::weather_records::dsl as weather_records;

    let data = data.into_inner();
    let record_id = parse_uuid(&data.id)?;

    let mut conn = get_connection(&state)?;
    let record: WeatherRecord = web_block_unpacked(move || {
        match weather_records::weather_records
            .find(record_id)
            .select(WeatherRecord::as_select())
            .get_result(&mut conn)
        {
            Ok(record) => Ok(record),
            Err(NotFound) => Err(Error::RecordNotFound),
            Err(err) => {
                log::error!("Failed to load weather reading: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    match record.device_id {
        Some(device_id) => {
            authorize_device(
                &state,
                user_id.into(),
                device_id,
                Some(DeviceType::WeatherStation),
            )
            .await?;
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
        if data.wind_direction.is_some() {
            record.wind_direction = data.wind_direction;
        }
        if data.wind_speed.is_some() {
            record.wind_speed = data.wind_speed;
        }
        if data.rainfall.is_some() {
            record.rainfall = data.rainfall;
        }
        if data.sunshine.is_some() {
            record.sunshine = data.sunshine;
        }
        if data.temperature.is_some() {
            record.temperature = data.temperature;
        }
        if data.humidity.is_some() {
            record.humidity = data.humidity;
        }
        if let Some(recording_time) = data.recording_time {
            record.recording_time = recording_time;
        }

        match diesel::update(weather_records::weather_records.find(record.id))
            .set((
                weather_records::latitude.eq(record.latitude),
                weather_records::longitude.eq(record.longitude),
                weather_records::wind_direction.eq(record.wind_direction.clone()),
                weather_records::wind_speed.eq(record.wind_speed.clone()),
                weather_records::rainfall.eq(record.rainfall.clone()),
                weather_records::sunshine.eq(record.sunshine.clone()),
                weather_records::temperature.eq(record.temperature.clone()),
                weather_records::humidity.eq(record.humidity.clone()),
                weather_records::recording_time.eq(record.recording_time),
            ))
            .execute(&mut conn)
        {
            Ok(_) => Ok(record),
            Err(err) => {
                log::error!("Failed to update weather reading: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    Ok(HttpResponse::Ok().json(WeatherSchema::from(record)))
}
