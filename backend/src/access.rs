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

//! Ownership based access control.
//!
//! Every data vertical (mobile, QGIS, weather) and the device/image
//! endpoints run the same decision rule, in the same order:
//!
//! 1. the device must exist
//! 2. if the call site requires a device type, the device must match it
//!    (this applies to admins as well)
//! 3. admins pass
//! 4. users mapped to the device pass
//! 5. everyone else is rejected
//!
//! The rule itself is a pure function over already-loaded state
//! ([`evaluate`]); [`authorize_device`] is the database-backed wrapper
//! used by the handlers.

use actix_web::web;
use db_connector::models::device_users::DeviceUser;
use db_connector::models::devices::Device;
use db_connector::models::users::User;
use diesel::prelude::*;
use diesel::result::Error::NotFound;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::Error;
use crate::utils::{get_connection, web_block_unpacked};
use crate::AppState;

/// Closed set of data verticals a device can report into.
///
/// The discriminants are the values stored in `devices.device_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Mobile = 1,
    Qgis = 2,
    WeatherStation = 3,
}

impl DeviceType {
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Mobile),
            2 => Some(Self::Qgis),
            3 => Some(Self::WeatherStation),
            _ => None,
        }
    }
}

impl TryFrom<i32> for DeviceType {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Error> {
        Self::from_i32(value).ok_or(Error::UnknownDeviceType)
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mobile => write!(f, "MOBILE"),
            Self::Qgis => write!(f, "QGIS"),
            Self::WeatherStation => write!(f, "WEATHER_STATION"),
        }
    }
}

/// The acting identity, as far as authorization is concerned.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub id: uuid::Uuid,
    pub is_admin: bool,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Principal {
            id: user.id,
            is_admin: user.is_admin,
        }
    }
}

/// The decision rule. Pure, no store access.
///
/// `is_member` is the precomputed membership edge for
/// (`principal`, `device`); it is ignored when the device is missing.
pub fn evaluate(
    principal: &Principal,
    device: Option<&Device>,
    required_type: Option<DeviceType>,
    is_member: bool,
) -> Result<(), Error> {
    let device = match device {
        Some(d) => d,
        None => return Err(Error::DeviceNotFound),
    };

    // Type validation happens before the admin short-circuit: writing a
    // weather reading through a mobile device is invalid for everyone.
    if let Some(required) = required_type {
        if device.device_type != required.as_i32() {
            return Err(Error::DeviceTypeMismatch);
        }
    }

    if principal.is_admin || is_member {
        Ok(())
    } else {
        Err(Error::Forbidden)
    }
}

pub(crate) fn load_user(conn: &mut PgConnection, user_id: uuid::Uuid) -> Result<User, Error> {
    use db_connector::schema::users::dsl as users;

    match users::users
        .find(user_id)
        .select(User::as_select())
        .get_result(conn)
    {
        Ok(user) => Ok(user),
        // A valid token for a user that no longer exists.
        Err(NotFound) => Err(Error::Unauthorized),
        Err(err) => {
            log::error!("Failed to load user: {err}");
            Err(Error::InternalError)
        }
    }
}

pub(crate) fn load_device(
    conn: &mut PgConnection,
    device_id: uuid::Uuid,
) -> Result<Option<Device>, Error> {
    use db_connector::schema::devices::dsl as devices;

    match devices::devices
        .find(device_id)
        .select(Device::as_select())
        .first(conn)
        .optional()
    {
        Ok(device) => Ok(device),
        Err(err) => {
            log::error!("Failed to load device: {err}");
            Err(Error::InternalError)
        }
    }
}

pub(crate) fn membership_exists(
    conn: &mut PgConnection,
    user_id: uuid::Uuid,
    device_id: uuid::Uuid,
) -> Result<bool, Error> {
    use db_connector::schema::device_users::dsl as device_users;

    match diesel::select(diesel::dsl::exists(
        device_users::device_users
            .filter(device_users::user_id.eq(user_id))
            .filter(device_users::device_id.eq(device_id)),
    ))
    .get_result(conn)
    {
        Ok(found) => Ok(found),
        Err(err) => {
            log::error!("Failed to check device membership: {err}");
            Err(Error::InternalError)
        }
    }
}

/// Resolve principal, device and membership edge, then apply [`evaluate`].
///
/// Returns the device so handlers do not have to load it twice.
pub async fn authorize_device(
    state: &web::Data<AppState>,
    user_id: uuid::Uuid,
    device_id: uuid::Uuid,
    required_type: Option<DeviceType>,
) -> Result<Device, actix_web::Error> {
    let mut conn = get_connection(state)?;
    let device = web_block_unpacked(move || {
        let user = load_user(&mut conn, user_id)?;
        let device = load_device(&mut conn, device_id)?;
        let is_member = match &device {
            Some(device) => membership_exists(&mut conn, user_id, device.id)?,
            None => false,
        };

        evaluate(&Principal::from(&user), device.as_ref(), required_type, is_member)?;
        device.ok_or(Error::DeviceNotFound)
    })
    .await?;

    Ok(device)
}

/// Admin gate for the `/admin` route variants. Runs before any mutation.
pub async fn require_admin(
    state: &web::Data<AppState>,
    user_id: uuid::Uuid,
) -> Result<User, actix_web::Error> {
    let mut conn = get_connection(state)?;
    let user = web_block_unpacked(move || {
        let user = load_user(&mut conn, user_id)?;
        if !user.is_admin {
            return Err(Error::NotAdmin);
        }
        Ok(user)
    })
    .await?;

    Ok(user)
}

/// Trusted-ingestion check for the API-key telemetry path.
///
/// A valid key authorizes writes to ANY device of the required type; the
/// membership relation is deliberately not consulted here. Device trust
/// is assumed once the key checks out.
pub async fn authorize_ingest(
    state: &web::Data<AppState>,
    api_key: String,
    device_id: uuid::Uuid,
    required_type: DeviceType,
) -> Result<Device, actix_web::Error> {
    let mut conn = get_connection(state)?;
    let device = web_block_unpacked(move || {
        use db_connector::schema::api_keys::dsl as api_keys;

        let key_known: bool = match diesel::select(diesel::dsl::exists(
            api_keys::api_keys.filter(api_keys::key.eq(&api_key)),
        ))
        .get_result(&mut conn)
        {
            Ok(found) => found,
            Err(err) => {
                log::error!("Failed to look up api key: {err}");
                return Err(Error::InternalError);
            }
        };
        if !key_known {
            return Err(Error::Unauthorized);
        }

        let device = load_device(&mut conn, device_id)?.ok_or(Error::DeviceNotFound)?;
        if device.device_type != required_type.as_i32() {
            return Err(Error::DeviceTypeMismatch);
        }

        Ok(device)
    })
    .await?;

    Ok(device)
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MapOutcome {
    Added,
    AlreadyPresent,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnmapOutcome {
    Removed,
    NotPresent,
}

/// Add a membership edge. Idempotent: the unique index on
/// (user_id, device_id) turns a duplicate map into a no-op instead of a
/// check-then-act race.
pub fn insert_membership(
    conn: &mut PgConnection,
    user_id: uuid::Uuid,
    device_id: uuid::Uuid,
) -> Result<MapOutcome, Error> {
    use db_connector::schema::device_users::dsl as device_users;

    let edge = DeviceUser {
        id: uuid::Uuid::new_v4(),
        user_id,
        device_id,
    };

    match diesel::insert_into(device_users::device_users)
        .values(&edge)
        .on_conflict((device_users::user_id, device_users::device_id))
        .do_nothing()
        .execute(conn)
    {
        Ok(0) => Ok(MapOutcome::AlreadyPresent),
        Ok(_) => Ok(MapOutcome::Added),
        Err(err) => {
            log::error!("Failed to map user to device: {err}");
            Err(Error::InternalError)
        }
    }
}

/// Remove a membership edge. Idempotent like [`insert_membership`].
pub fn delete_membership(
    conn: &mut PgConnection,
    user_id: uuid::Uuid,
    device_id: uuid::Uuid,
) -> Result<UnmapOutcome, Error> {
    use db_connector::schema::device_users::dsl as device_users;

    match diesel::delete(
        device_users::device_users
            .filter(device_users::user_id.eq(user_id))
            .filter(device_users::device_id.eq(device_id)),
    )
    .execute(conn)
    {
        Ok(0) => Ok(UnmapOutcome::NotPresent),
        Ok(_) => Ok(UnmapOutcome::Removed),
        Err(err) => {
            log::error!("Failed to unmap user from device: {err}");
            Err(Error::InternalError)
        }
    }
}
