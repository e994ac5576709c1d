use actix_web::{get, web, HttpResponse, Responder};
use db_connector::models::device_users::DeviceUser;
use db_connector::models::weather_records::WeatherRecord;
use diesel::prelude::*;

use crate::{
    access::require_admin,
    error::Error,
    routes::user::get_user,
    routes::wstation::WeatherSchema,
    routes::LocationQuery,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

/// Weather readings at an exact coordinate, restricted to the caller's
/// stations. The match is exact float equality, there is no radius.
#[utoipa::path(
    context_path = "/wstation",
    params(LocationQuery),
    responses(
        (status = 200, description = "Success", body = [WeatherSchema])
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
    use db_connector::schema::weather_records::dsl as weather_records;

    let user = get_user(&state, user_id.into()).await?;
    let (lat, long) = (query.lat, query.long);

    let mut conn = get_connection(&state)?;
    let records: Vec<WeatherRecord> = web_block_unpacked(move || {
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

        match weather_records::weather_records
            .filter(weather_records::latitude.eq(lat))
            .filter(weather_records::longitude.eq(long))
            .filter(weather_records::device_id.eq_any(device_ids))
            .select(WeatherRecord::as_select())
            .load(&mut conn)
        {
            Ok(records) => Ok(records),
            Err(err) => {
                log::error!("Failed to load weather readings: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;
    let records: Vec<WeatherSchema> = records.into_iter().map(WeatherSchema::from).collect();

    Ok(HttpResponse::Ok().json(records))
}

/// Unrestricted variant of the location filter. Admin only.
#[utoipa::path(
    context_path = "/wstation",
    params(LocationQuery),
    responses(
        (status = 200, description = "Success", body = [WeatherSchema]),
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
    use db_connector::schema::weather_records::dsl as weather_records;

    require_admin(&state, user_id.into()).await?;
    let (lat, long) = (query.lat, query.long);

    let mut conn = get_connection(&state)?;
    let records: Vec<WeatherRecord> = web_block_unpacked(move || {
        match weather_records::weather_records
            .filter(weather_records::latitude.eq(lat))
            .filter(weather_records::longitude.eq(long))
            .select(WeatherRecord::as_select())
            .load(&mut conn)
        {
            Ok(records) => Ok(records),
            Err(err) => {
                log::error!("Failed to load weather readings: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;
    let records: Vec<WeatherSchema> = records.into_iter().map(WeatherSchema::from).collect();

    Ok(HttpResponse::Ok().json(records))
}
