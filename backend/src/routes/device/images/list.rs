use actix_web::{get, web, HttpResponse, Responder};
use db_connector::models::device_images::DeviceImage;
use diesel::prelude::*;

use crate::{
    access::authorize_device,
    error::Error,
    routes::device::images::ImageSchema,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

/// List the image metadata of a device.
#[utoipa::path(
    context_path = "/device",
    responses(
        (status = 200, description = "Success", body = [ImageSchema]),
        (status = 403, description = "Device is not associated with the authenticated user"),
        (status = 404, description = "Device not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[get("/{device_id}/images")]
pub async fn list(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    path: web::Path<String>,
) -> Result<impl Responder, actix_web::Error> {
    let device_id = parse_uuid(&path.into_inner())?;
    let device = authorize_device(&state, user_id.into(), device_id, None).await?;

    let mut conn = get_connection(&state)?;
    let images: Vec<DeviceImage> = web_block_unpacked(move || {
        use db_connector::schema::device_images::dsl as device_images;

        match device_images::device_images
            .filter(device_images::device_id.eq(device.id))
            .select(DeviceImage::as_select())
            .load(&mut conn)
        {
            Ok(list) => Ok(list),
            Err(err) => {
                log::error!("Failed to list device images: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    let images: Vec<ImageSchema> = images.into_iter().map(ImageSchema::from).collect();

    Ok(HttpResponse::Ok().json(images))
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
    async fn test_list_images() {
        let mail = "image_list@test.invalid";
        let owner = TestUser::create(mail, false);
        defer!(delete_user(mail));

        let device = owner.add_device(DeviceType::Mobile);
        defer!(delete_device(device.id));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(upload::upload)
            .service(list);
        let app = test::init_service(app).await;

        let (content_type, body) = multipart_body("field.jpg", b"pixels");
        let req = test::TestRequest::post()
            .uri(&format!("/{}/images", device.id))
            .cookie(Cookie::new("access_token", owner.access_token()))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let uploaded: UploadResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(uploaded.saved.len(), 1);

        let req = test::TestRequest::get()
            .uri(&format!("/{}/images", device.id))
            .cookie(Cookie::new("access_token", owner.access_token()))
            .to_request();
        let listed: Vec<ImageSchema> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, uploaded.saved[0].id);
    }
}
