use actix_web::{get, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    access::authorize_device,
    routes::device::DeviceSchema,
    utils::parse_uuid,
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
pub struct DeviceQuery {
    pub device_id: String,
}

/// Get one device. Caller must be mapped to it or be an admin.
#[utoipa::path(
    context_path = "/device",
    params(DeviceQuery),
    responses(
        (status = 200, description = "Success", body = DeviceSchema),
        (status = 403, description = "Device is not associated with the authenticated user"),
        (status = 404, description = "Device not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[get("/info")]
pub async fn info(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    query: actix_web_validator::Query<DeviceQuery>,
) -> Result<impl Responder, actix_web::Error> {
    let device_id = parse_uuid(&query.device_id)?;
    let device = authorize_device(&state, user_id.into(), device_id, None).await?;

    Ok(HttpResponse::Ok().json(DeviceSchema::try_from(device)?))
}

#[cfg(test)]
mod tests {
    use actix_web::{cookie::Cookie, test, App};

    use super::*;
    use crate::access::DeviceType;
    use crate::middleware::jwt::JwtMiddleware;
    use crate::tests::{access_token_for, configure, delete_device, delete_user, TestUser};
    use crate::defer;

    #[actix_web::test]
    async fn test_invalid_device_id() {
        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(info);
        let app = test::init_service(app).await;

        let req = test::TestRequest::get()
            .uri("/info?device_id=not-a-uuid")
            .cookie(Cookie::new("access_token", access_token_for(uuid::Uuid::new_v4())))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }

    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_info_membership_rules() {
        let mail1 = "device_info_member@test.invalid";
        let mail2 = "device_info_stranger@test.invalid";
        let mail3 = "device_info_admin@test.invalid";
        let member = TestUser::create(mail1, false);
        let stranger = TestUser::create(mail2, false);
        let admin = TestUser::create(mail3, true);
        defer!(delete_user(mail1));
        defer!(delete_user(mail2));
        defer!(delete_user(mail3));

        let device = member.add_device(DeviceType::Qgis);
        defer!(delete_device(device.id));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(info);
        let app = test::init_service(app).await;

        let uri = format!("/info?device_id={}", device.id);

        let req = test::TestRequest::get()
            .uri(&uri)
            .cookie(Cookie::new("access_token", member.access_token()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::get()
            .uri(&uri)
            .cookie(Cookie::new("access_token", stranger.access_token()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 403);

        let req = test::TestRequest::get()
            .uri(&uri)
            .cookie(Cookie::new("access_token", admin.access_token()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::get()
            .uri(&format!("/info?device_id={}", uuid::Uuid::new_v4()))
            .cookie(Cookie::new("access_token", member.access_token()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 404);
    }
}
