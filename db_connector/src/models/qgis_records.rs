use diesel::prelude::*;

use super::devices::Device;

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(Device))]
#[diesel(table_name = crate::schema::qgis_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QgisRecord {
    pub id: uuid::Uuid,
    pub device_id: Option<uuid::Uuid>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ndvi: Option<f64>,
    pub gndvi: Option<f64>,
    pub lai: Option<f64>,
    pub msavi: Option<f64>,
    pub recording_time: chrono::NaiveDateTime,
}
