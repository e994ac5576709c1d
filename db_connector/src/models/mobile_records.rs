use diesel::prelude::*;

use super::devices::Device;

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(Device))]
#[diesel(table_name = crate::schema::mobile_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MobileRecord {
    pub id: uuid::Uuid,
    pub device_id: Option<uuid::Uuid>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub qr_code: String,
    pub recording_time: Option<chrono::NaiveDateTime>,
}
