use actix_web::{get, web, HttpResponse, Responder};
use db_connector::models::qgis_records::QgisRecord;
use diesel::prelude::*;

use crate::{
    access::authorize_device,
    error::Error,
    routes::qgis::QgisSchema,
    routes::DeviceIdQuery,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

/// All QGIS readings of one device. Membership or admin required.
#[utoipa::path(
    context_path = "/qgis",
    params(DeviceIdQuery),
    responses(
        (status = 200, description = "Success", body = [QgisSchema]),
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
    let records: Vec<QgisRecord> = web_block_unpacked(move || {
        use db_connector::schema::qgis_records::dsl as qgis_records;

        match qgis_records::qgis_records
            .filter(qgis_records::device_id.eq(device.id))
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

#[cfg(test)]
mod tests {
    use actix_web::{cookie::Cookie, test, App};

    use super::*;
    use crate::access::DeviceType;
    use crate::middleware::jwt::JwtMiddleware;
    use crate::tests::{configure, delete_device, delete_user, TestUser};
    use crate::defer;

    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_by_device_admin_override() {
        let mail1 = "qgis_by_device_owner@test.invalid";
        let mail2 = "qgis_by_device_admin@test.invalid";
        let owner = TestUser::create(mail1, false);
        let admin = TestUser::create(mail2, true);
        defer!(delete_user(mail1));
        defer!(delete_user(mail2));

        let device = owner.add_device(DeviceType::Qgis);
        defer!(delete_device(device.id));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(by_device);
        let app = test::init_service(app).await;

        // Admin reads without a membership edge.
        let req = test::TestRequest::get()
            .uri(&format!("/by_device?device_id={}", device.id))
            .cookie(Cookie::new("access_token", admin.access_token()))
            .to_request();
        let resp: Vec<QgisSchema> = test::call_and_read_body_json(&app, req).await;
        assert!(resp.is_empty());
    }
}
