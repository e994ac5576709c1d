use actix_web::{delete, web, HttpResponse, Responder};
use diesel::prelude::*;

use crate::{
    access::authorize_device,
    error::Error,
    routes::device::images::download::load_image,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

/// Delete an image row and its stored file.
#[utoipa::path(
    context_path = "/device",
    responses(
        (status = 200, description = "Image deleted"),
        (status = 403, description = "Device is not associated with the authenticated user"),
        (status = 404, description = "Image not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[delete("/images/{image_id}")]
pub async fn remove(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    path: web::Path<String>,
) -> Result<impl Responder, actix_web::Error> {
    let image_id = parse_uuid(&path.into_inner())?;
    let image = load_image(&state, image_id).await?;
    authorize_device(&state, user_id.into(), image.device_id, None).await?;

    let store = state.images.clone();
    let mut conn = get_connection(&state)?;
    web_block_unpacked(move || {
        use db_connector::schema::device_images::dsl as device_images;

        match diesel::delete(device_images::device_images.find(image.id)).execute(&mut conn) {
            Ok(_) => (),
            Err(err) => {
                log::error!("Failed to delete image row: {err}");
                return Err(Error::InternalError);
            }
        }

        if let Err(err) = store.remove(&image.file_name) {
            log::warn!("Failed to remove stored image {}: {err}", image.file_name);
        }

        Ok(())
    })
    .await?;

    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::{cookie::Cookie, test, App};

    use super::*;
    use crate::access::DeviceType;
    use crate::middleware::jwt::JwtMiddleware;
    use crate::routes::device::images::upload::{self, tests::multipart_body, UploadResponse};
    use crate::tests::{configure, delete_device, delete_user, TestUser};
    use crate::defer;

    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_remove_image() {
        let mail = "image_remove@test.invalid";
        let owner = TestUser::create(mail, false);
        defer!(delete_user(mail));

        let device = owner.add_device(DeviceType::Qgis);
        defer!(delete_device(device.id));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(upload::upload)
            .service(remove);
        let app = test::init_service(app).await;

        let (content_type, body) = multipart_body("remove-me.jpg", b"bytes");
        let req = test::TestRequest::post()
            .uri(&format!("/{}/images", device.id))
            .cookie(Cookie::new("access_token", owner.access_token()))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let uploaded: UploadResponse = test::call_and_read_body_json(&app, req).await;
        let image_id = &uploaded.saved[0].id;

        let req = test::TestRequest::delete()
            .uri(&format!("/images/{image_id}"))
            .cookie(Cookie::new("access_token", owner.access_token()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        // Gone now.
        let req = test::TestRequest::delete()
            .uri(&format!("/images/{image_id}"))
            .cookie(Cookie::new("access_token", owner.access_token()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 404);
    }
}
