pub mod download;
pub mod list;
pub mod remove;
pub mod upload;

use db_connector::models::device_images::DeviceImage;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageSchema {
    pub id: String,
    pub device_id: String,
    pub file_name: String,
    pub uploaded_at: chrono::NaiveDateTime,
}

impl From<DeviceImage> for ImageSchema {
    fn from(image: DeviceImage) -> Self {
        ImageSchema {
            id: image.id.to_string(),
            device_id: image.device_id.to_string(),
            file_name: image.file_name,
            uploaded_at: image.uploaded_at,
        }
    }
}
