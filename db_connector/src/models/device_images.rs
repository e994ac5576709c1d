use diesel::prelude::*;

use super::devices::Device;

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable, Associations)]
#[diesel(belongs_to(Device))]
#[diesel(table_name = crate::schema::device_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeviceImage {
    pub id: uuid::Uuid,
    pub device_id: uuid::Uuid,
    pub file_name: String,
    pub uploaded_at: chrono::NaiveDateTime,
}
