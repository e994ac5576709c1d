/* agridata-backend
 * Copyright (C) 2026 The agridata-backend authors
 *
 * This library is free software; you can redistribute it and/or
 * modify it under the terms of the GNU Lesser General Public
 * License as published by the Free Software Foundation; either
 * version 2 of the License, or (at your option) any later version.
 *
 * This library is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
 * Lesser General Public License for more details.
 *
 * You should have received a copy of the GNU Lesser General Public
 * License along with this library; if not, write to the
 * Free Software Foundation, Inc., 59 Temple Place - Suite 330,
 * Boston, MA 02111-1307, USA.
 */

use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use actix_web::{post, web, HttpResponse, Responder};
use chrono::Utc;
use db_connector::models::device_images::DeviceImage;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    access::authorize_device,
    routes::device::images::ImageSchema,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

#[derive(Debug, MultipartForm)]
pub struct ImageUploadForm {
    #[multipart(rename = "images", limit = "10MiB")]
    pub images: Vec<TempFile>,
}

/// Batch uploads are best-effort: every file is stored on its own and
/// the response names the ones that did not make it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub saved: Vec<ImageSchema>,
    pub failed: Vec<String>,
}

/// Attach one or more images to a device.
#[utoipa::path(
    context_path = "/device",
    responses(
        (status = 200, description = "Per-file outcome", body = UploadResponse),
        (status = 403, description = "Device is not associated with the authenticated user"),
        (status = 404, description = "Device not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[post("/{device_id}/images")]
pub async fn upload(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    path: web::Path<String>,
    form: MultipartForm<ImageUploadForm>,
) -> Result<impl Responder, actix_web::Error> {
    let device_id = parse_uuid(&path.into_inner())?;
    let device = authorize_device(&state, user_id.into(), device_id, None).await?;

    let store = state.images.clone();
    let files = form.into_inner().images;
    let mut conn = get_connection(&state)?;
    let response = web_block_unpacked(move || {
        use db_connector::schema::device_images::dsl as device_images;

        let mut saved = Vec::new();
        let mut failed = Vec::new();

        for file in files {
            let original_name = file.file_name.clone().unwrap_or_default();

            let stored_name = match store.save(device.id, file.file.path(), &original_name) {
                Ok(name) => name,
                Err(err) => {
                    log::warn!("Failed to store uploaded image {original_name}: {err}");
                    failed.push(original_name);
                    continue;
                }
            };

            let image = DeviceImage {
                id: uuid::Uuid::new_v4(),
                device_id: device.id,
                file_name: stored_name,
                uploaded_at: Utc::now().naive_utc(),
            };
            match diesel::insert_into(device_images::device_images)
                .values(&image)
                .execute(&mut conn)
            {
                Ok(_) => saved.push(ImageSchema::from(image)),
                Err(err) => {
                    log::warn!("Failed to persist image row for {original_name}: {err}");
                    store.remove(&image.file_name).ok();
                    failed.push(original_name);
                }
            }
        }

        Ok(UploadResponse { saved, failed })
    })
    .await?;

    Ok(HttpResponse::Ok().json(response))
}
