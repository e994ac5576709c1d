use actix_web::{get, web, HttpResponse, Responder};
use db_connector::models::mobile_records::MobileRecord;
use diesel::prelude::*;

use crate::{
    access::authorize_device,
    error::Error,
    routes::mobile::MobileSchema,
    routes::DeviceIdQuery,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

/// All mobile readings of one device. Membership or admin required.
#[utoipa::path(
    context_path = "/mobile",
    params(DeviceIdQuery),
    responses(
        (status = 200, description = "Success", body = [MobileSchema]),
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
    let records: Vec<MobileRecord> = web_block_unpacked(move || {
        use db_connector::schema::mobile_records::dsl as mobile_records;

        match mobile_records::mobile_records
            .filter(mobile_records::device_id.eq(device.id))
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
