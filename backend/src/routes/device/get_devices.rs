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

use actix_web::{get, web, HttpResponse, Responder};
use db_connector::models::device_users::DeviceUser;
use db_connector::models::devices::Device;
use diesel::prelude::*;

use crate::{
    error::Error,
    routes::device::DeviceSchema,
    routes::user::get_user,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

/// Get all devices the current user is mapped to.
#[utoipa::path(
    context_path = "/device",
    responses(
        (status = 200, description = "Success", body = [DeviceSchema])
    ),
    security(
        ("jwt" = [])
    )
)]
#[get("/get_devices")]
pub async fn get_devices(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
) -> Result<impl Responder, actix_web::Error> {
    use db_connector::schema::device_users::dsl as device_users;
    use db_connector::schema::devices::dsl as devices;

    let user = get_user(&state, user_id.into()).await?;

    let mut conn = get_connection(&state)?;
    let owned: Vec<Device> = web_block_unpacked(move || {
        let device_ids = DeviceUser::belonging_to(&user).select(device_users::device_id);
        match devices::devices
            .filter(devices::id.eq_any(device_ids))
            .select(Device::as_select())
            .load(&mut conn)
        {
            Ok(list) => Ok(list),
            Err(err) => {
                log::error!("Failed to load devices: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    let owned = owned
        .into_iter()
        .map(DeviceSchema::try_from)
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(HttpResponse::Ok().json(owned))
}

#[cfg(test)]
mod tests {
    use actix_web::{cookie::Cookie, test, App};

    use super::*;
    use crate::access::DeviceType;
    use crate::middleware::jwt::JwtMiddleware;
    use crate::tests::{configure, delete_device, delete_user, TestUser};
    use crate::defer;

    /// Only devices mapped to the caller come back.
    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_get_devices() {
        let mail1 = "get_devices1@test.invalid";
        let mail2 = "get_devices2@test.invalid";
        let user1 = TestUser::create(mail1, false);
        let user2 = TestUser::create(mail2, false);
        defer!(delete_user(mail1));
        defer!(delete_user(mail2));

        let mine = user1.add_device(DeviceType::Mobile);
        let other = user2.add_device(DeviceType::Mobile);
        defer!(delete_device(mine.id));
        defer!(delete_device(other.id));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(get_devices);
        let app = test::init_service(app).await;

        let req = test::TestRequest::get()
            .uri("/get_devices")
            .cookie(Cookie::new("access_token", user1.access_token()))
            .to_request();
        let resp: Vec<DeviceSchema> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.len(), 1);
        assert_eq!(resp[0].id, mine.id.to_string());
    }

    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_get_devices_empty() {
        let mail = "get_devices_empty@test.invalid";
        let user = TestUser::create(mail, false);
        defer!(delete_user(mail));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(get_devices);
        let app = test::init_service(app).await;

        let req = test::TestRequest::get()
            .uri("/get_devices")
            .cookie(Cookie::new("access_token", user.access_token()))
            .to_request();
        let resp: Vec<DeviceSchema> = test::call_and_read_body_json(&app, req).await;
        assert!(resp.is_empty());
    }
}
