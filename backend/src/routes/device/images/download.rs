use actix_files::NamedFile;
use actix_web::{get, web, HttpRequest, HttpResponse};
use db_connector::models::device_images::DeviceImage;
use diesel::{prelude::*, result::Error::NotFound};

use crate::{
    access::authorize_device,
    error::Error,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

pub(crate) async fn load_image(
    state: &web::Data<AppState>,
    image_id: uuid::Uuid,
) -> Result<DeviceImage, actix_web::Error> {
    let mut conn = get_connection(state)?;
    let image = web_block_unpacked(move || {
        use db_connector::schema::device_images::dsl as device_images;

        match device_images::device_images
            .find(image_id)
            .select(DeviceImage::as_select())
            .get_result(&mut conn)
        {
            Ok(image) => Ok(image),
            Err(NotFound) => Err(Error::RecordNotFound),
            Err(err) => {
                log::error!("Failed to load image row: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    Ok(image)
}

/// Download the image content from the blob store.
#[utoipa::path(
    context_path = "/device",
    responses(
        (status = 200, description = "Image bytes"),
        (status = 403, description = "Device is not associated with the authenticated user"),
        (status = 404, description = "Image not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[get("/images/{image_id}")]
pub async fn download(
    req: HttpRequest,
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    path: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let image_id = parse_uuid(&path.into_inner())?;
    let image = load_image(&state, image_id).await?;
    authorize_device(&state, user_id.into(), image.device_id, None).await?;

    let blob_path = match state.images.resolve(&image.file_name) {
        Some(path) => path,
        None => {
            log::error!("Image row {} holds an unresolvable name", image.id);
            return Err(Error::InternalError.into());
        }
    };
    let file = match NamedFile::open(blob_path) {
        Ok(file) => file,
        // Row without blob, the store and db drifted apart.
        Err(err) => {
            log::error!("Failed to open stored image {}: {err}", image.file_name);
            return Err(Error::RecordNotFound.into());
        }
    };

    Ok(file.into_response(&req))
}
