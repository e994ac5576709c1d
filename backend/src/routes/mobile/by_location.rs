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

use actix_web::{get, web, HttpResponse, Responder};
use db_connector::models::device_users::DeviceUser;
use db_connector::models::mobile_records::MobileRecord;
use diesel::prelude::*;

use crate::{
    access::require_admin,
    error::Error,
    routes::mobile::MobileSchema,
    routes::user::get_user,
    routes::LocationQuery,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

/// Mobile readings at an exact coordinate, restricted to the caller's
/// devices. The match is exact float equality, there is no radius.
#[utoipa::path(
    context_path = "/mobile",
    params(LocationQuery),
    responses(
        (status = 200, description = "Success", body = [MobileSchema])
    ),
    security(
        ("jwt" = [])
    )
)]
#[get("/by_location")]
pub async fn by_location(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    query: actix_web_validator::Query<LocationQuery>,
) -> Result<impl Responder, actix_web::Error> {
    use db_connector::schema::device_users::dsl as device_users;
    use db_connector::schema::mobile_records::dsl as mobile_records;

    let user = get_user(&state, user_id.into()).await?;
    let (lat, long) = (query.lat, query.long);

    let mut conn = get_connection(&state)?;
    let records: Vec<MobileRecord> = web_block_unpacked(move || {
        let device_ids: Vec<uuid::Uuid> = match DeviceUser::belonging_to(&user)
            .select(device_users::device_id)
            .load(&mut conn)
        {
            Ok(ids) => ids,
            Err(err) => {
                log::error!("Failed to load device memberships: {err}");
                return Err(Error::InternalError);
            }
        };
        let device_ids: Vec<Option<uuid::Uuid>> = device_ids.into_iter().map(Some).collect();

        match mobile_records::mobile_records
            .filter(mobile_records::latitude.eq(lat))
            .filter(mobile_records::longitude.eq(long))
            .filter(mobile_records::device_id.eq_any(device_ids))
            .select(MobileRecord::as_select())
            .load(&mut conn)
        {
            Ok(records) => Ok(records),
            Err(err) => {
                log::error!("Failed to load mobile readings: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;
    let records: Vec<MobileSchema> = records.into_iter().map(MobileSchema::from).collect();

    Ok(HttpResponse::Ok().json(records))
}

/// Unrestricted variant of the location filter. Admin only.
#[utoipa::path(
    context_path = "/mobile",
    params(LocationQuery),
    responses(
        (status = 200, description = "Success", body = [MobileSchema]),
        (status = 403, description = "Caller is not an admin")
    ),
    security(
        ("jwt" = [])
    )
)]
#[get("/by_location/admin")]
pub async fn by_location_admin(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    query: actix_web_validator::Query<LocationQuery>,
) -> Result<impl Responder, actix_web::Error> {
    use db_connector::schema::mobile_records::dsl as mobile_records;

    require_admin(&state, user_id.into()).await?;
    let (lat, long) = (query.lat, query.long);

    let mut conn = get_connection(&state)?;
    let records: Vec<MobileRecord> = web_block_unpacked(move || {
        match mobile_records::mobile_records
            .filter(mobile_records::latitude.eq(lat))
            .filter(mobile_records::longitude.eq(long))
            .select(MobileRecord::as_select())
            .load(&mut conn)
        {
            Ok(records) => Ok(records),
            Err(err) => {
                log::error!("Failed to load mobile readings: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;
    let records: Vec<MobileSchema> = records.into_iter().map(MobileSchema::from).collect();

    Ok(HttpResponse::Ok().json(records))
}
