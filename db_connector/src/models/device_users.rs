use diesel::prelude::*;

use super::{devices::Device, users::User};

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(User))]
#[diesel(belongs_to(Device))]
#[diesel(table_name = crate::schema::device_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeviceUser {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub device_id: uuid::Uuid,
}
