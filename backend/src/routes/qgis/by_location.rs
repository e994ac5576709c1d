use actix_web::{get, web, HttpResponse, Responder};
use db_connector::models::device_users::DeviceUser;
use db_connector::models::qgis_records::QgisRecord;
use diesel::prelude::*;

use crate::{
    access::require_admin,
    error::Error,
    routes::qgis::QgisSchema,
    routes::user::get_user,
    routes::LocationQuery,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

/// QGIS readings at an exact coordinate, restricted to the caller's
/// devices. The match is exact float equality, there is no radius.
#[utoipa::path(
    context_path = "/qgis",
    params(LocationQuery),
    responses(
        (status = 200, description = "Success", body = [QgisSchema])
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
    use db_connector::schema::qgis_records::dsl as qgis_records;

    let user = get_user(&state, user_id.into()).await?;
    let (lat, long) = (query.lat, query.long);

    let mut conn = get_connection(&state)?;
    let records: Vec<QgisRecord> = web_block_unpacked(move || {
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

        match qgis_records::qgis_records
            .filter(qgis_records::latitude.eq(lat))
            .filter(qgis_records::longitude.eq(long))
            .filter(qgis_records::device_id.eq_any(device_ids))
            .select(QgisRecord::as_select())
            .load(&mut conn)
        {
            Ok(records) => Ok(records),
            Err(err) => {
                log::error!("Failed to load qgis readings: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;
    let records: Vec<QgisSchema> = records.into_iter().map(QgisSchema::from).collect();

    Ok(HttpResponse::Ok().json(records))
}

/// Unrestricted variant of the location filter. Admin only.
#[utoipa::path(
    context_path = "/qgis",
    params(LocationQuery),
    responses(
        (status = 200, description = "Success", body = [QgisSchema]),
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
    use db_connector::schema::qgis_records::dsl as qgis_records;

    require_admin(&state, user_id.into()).await?;
    let (lat, long) = (query.lat, query.long);

    let mut conn = get_connection(&state)?;
    let records: Vec<QgisRecord> = web_block_unpacked(move || {
        match qgis_records::qgis_records
            .filter(qgis_records::latitude.eq(lat))
            .filter(qgis_records::longitude.eq(long))
            .select(QgisRecord::as_select())
            .load(&mut conn)
        {
            Ok(records) => Ok(records),
            Err(err) => {
                log::error!("Failed to load qgis readings: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;
    let records: Vec<QgisSchema> = records.into_iter().map(QgisSchema::from).collect();

    Ok(HttpResponse::Ok().json(records))
}
