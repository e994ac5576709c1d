use actix_web::{get, web, HttpResponse, Responder};
use db_connector::models::devices::Device;
use diesel::prelude::*;

use crate::{
    access::require_admin,
    error::Error,
    routes::device::DeviceSchema,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

/// List every registered device. Admin only.
#[utoipa::path(
    context_path = "/device",
    responses(
        (status = 200, description = "Success", body = [DeviceSchema]),
        (status = 403, description = "Caller is not an admin")
    ),
    security(
        ("jwt" = [])
    )
)]
#[get("/all")]
pub async fn get_all(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
) -> Result<impl Responder, actix_web::Error> {
    use db_connector::schema::devices::dsl::*;

    require_admin(&state, user_id.into()).await?;

    let mut conn = get_connection(&state)?;
    let all_devices: Vec<Device> = web_block_unpacked(move || {
        match devices.select(Device::as_select()).load(&mut conn) {
            Ok(list) => Ok(list),
            Err(err) => {
                log::error!("Failed to load devices: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    let all_devices = all_devices
        .into_iter()
        .map(DeviceSchema::try_from)
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(HttpResponse::Ok().json(all_devices))
}
