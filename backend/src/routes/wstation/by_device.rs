use actix_web::{get, web, HttpResponse, Responder};
use db_connector::models::weather_records::WeatherRecord;
use diesel::prelude::*;

use crate::{
    access::authorize_device,
    error::Error,
    routes::wstation::WeatherSchema,
    routes::DeviceIdQuery,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

/// All weather readings of one station. Membership or admin required.
#[utoipa::path(
    context_path = "/wstation",
    params(DeviceIdQuery),
    responses(
        (status = 200, description = "Success", body = [WeatherSchema]),
        (status = 403, description = "Device is not associated with the authenticated user"),
        (status = 404, description = "Device not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[get("/by_device")]
pub async fn by_device(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    query: actix_web_validator::Query<DeviceIdQuery>,
) -> Result<impl Responder, actix_web::Error> {
    let device_id = parse_uuid(&query.device_id)?;
    let device = authorize_device(&state, user_id.into(), device_id, None).await?;

    let mut conn = get_connection(&state)?;
    let records: Vec<WeatherRecord> = web_block_unpacked(move || {
        use db_connector::schema::weather_records::dsl as weather_records;

        match weather_records::weather_records
            .filter(weather_records::device_id.eq(device.id))
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
