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

use actix_web::{put, web, HttpResponse, Responder};
use actix_web_validator::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    access::{insert_membership, load_device, load_user, require_admin, MapOutcome},
    error::Error,
    routes::device::MapStatusResponse,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct MapUserSchema {
    pub device_id: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct AdminMapUserSchema {
    pub device_id: String,
    pub user_id: String,
}

fn map_status(outcome: MapOutcome) -> MapStatusResponse {
    let status = match outcome {
        MapOutcome::Added => "user added to device",
        MapOutcome::AlreadyPresent => "user already mapped to device",
    };

    MapStatusResponse {
        status: status.to_string(),
    }
}

/// Map the calling user to a device. Idempotent.
#[utoipa::path(
    context_path = "/device",
    request_body = MapUserSchema,
    responses(
        (status = 200, description = "Mapping present", body = MapStatusResponse),
        (status = 404, description = "Device not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[put("/map_user")]
pub async fn map_user(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    data: Json<MapUserSchema>,
) -> Result<impl Responder, actix_web::Error> {
    let device_id = parse_uuid(&data.device_id)?;
    let uid: uuid::Uuid = user_id.into();

    let mut conn = get_connection(&state)?;
    let outcome = web_block_unpacked(move || {
        let device = load_device(&mut conn, device_id)?.ok_or(Error::DeviceNotFound)?;
        insert_membership(&mut conn, uid, device.id)
    })
    .await?;

    Ok(HttpResponse::Ok().json(map_status(outcome)))
}

/// Map an arbitrary user to a device. Admin only; the admin check runs
/// before anything is written.
#[utoipa::path(
    context_path = "/device",
    request_body = AdminMapUserSchema,
    responses(
        (status = 200, description = "Mapping present", body = MapStatusResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Device or user not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[put("/map_user/admin")]
pub async fn map_user_admin(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    data: Json<AdminMapUserSchema>,
) -> Result<impl Responder, actix_web::Error> {
    require_admin(&state, user_id.into()).await?;

    let device_id = parse_uuid(&data.device_id)?;
    let target_id = parse_uuid(&data.user_id)?;

    let mut conn = get_connection(&state)?;
    let outcome = web_block_unpacked(move || {
        let device = load_device(&mut conn, device_id)?.ok_or(Error::DeviceNotFound)?;
        match load_user(&mut conn, target_id) {
            Ok(target) => insert_membership(&mut conn, target.id, device.id),
            // The target is payload, not the credential.
            Err(Error::Unauthorized) => Err(Error::UserNotFound),
            Err(err) => Err(err),
        }
    })
    .await?;

    Ok(HttpResponse::Ok().json(map_status(outcome)))
}

#[cfg(test)]
pub(crate) mod tests {
    use actix_web::{cookie::Cookie, http::header::ContentType, test, App};
    use diesel::prelude::*;

    use super::*;
    use crate::access::DeviceType;
    use crate::middleware::jwt::JwtMiddleware;
    use crate::tests::{configure, delete_device, delete_user, TestUser};
    use crate::defer;

    pub fn membership_count(user_id: uuid::Uuid, device_id: uuid::Uuid) -> i64 {
        use db_connector::schema::device_users::dsl as device_users;

        let pool = db_connector::test_connection_pool();
        let mut conn = pool.get().unwrap();
        device_users::device_users
            .filter(device_users::user_id.eq(user_id))
            .filter(device_users::device_id.eq(device_id))
            .count()
            .get_result(&mut conn)
            .unwrap_or(0)
    }

    /// Mapping twice leaves exactly one edge and reports it.
    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_map_user_idempotent() {
        let mail1 = "map_user_owner@test.invalid";
        let mail2 = "map_user_joiner@test.invalid";
        let owner = TestUser::create(mail1, false);
        let joiner = TestUser::create(mail2, false);
        defer!(delete_user(mail1));
        defer!(delete_user(mail2));

        let device = owner.add_device(DeviceType::Mobile);
        defer!(delete_device(device.id));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(map_user);
        let app = test::init_service(app).await;

        let payload = MapUserSchema {
            device_id: device.id.to_string(),
        };

        let req = test::TestRequest::put()
            .uri("/map_user")
            .cookie(Cookie::new("access_token", joiner.access_token()))
            .insert_header(ContentType::json())
            .set_json(&payload)
            .to_request();
        let resp: MapStatusResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.status, "user added to device");

        let req = test::TestRequest::put()
            .uri("/map_user")
            .cookie(Cookie::new("access_token", joiner.access_token()))
            .insert_header(ContentType::json())
            .set_json(&payload)
            .to_request();
        let resp: MapStatusResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.status, "user already mapped to device");

        assert_eq!(membership_count(joiner.id, device.id), 1);
    }

    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_map_user_missing_device() {
        let mail = "map_user_missing@test.invalid";
        let user = TestUser::create(mail, false);
        defer!(delete_user(mail));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(map_user);
        let app = test::init_service(app).await;

        let req = test::TestRequest::put()
            .uri("/map_user")
            .cookie(Cookie::new("access_token", user.access_token()))
            .insert_header(ContentType::json())
            .set_json(MapUserSchema {
                device_id: uuid::Uuid::new_v4().to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 404);
    }

    /// A non-admin caller is rejected before any edge is written.
    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_map_user_admin_requires_admin() {
        let mail1 = "map_admin_caller@test.invalid";
        let mail2 = "map_admin_target@test.invalid";
        let caller = TestUser::create(mail1, false);
        let target = TestUser::create(mail2, false);
        defer!(delete_user(mail1));
        defer!(delete_user(mail2));

        let device = caller.add_device(DeviceType::Mobile);
        defer!(delete_device(device.id));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(map_user_admin);
        let app = test::init_service(app).await;

        let req = test::TestRequest::put()
            .uri("/map_user/admin")
            .cookie(Cookie::new("access_token", caller.access_token()))
            .insert_header(ContentType::json())
            .set_json(AdminMapUserSchema {
                device_id: device.id.to_string(),
                user_id: target.id.to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 403);
        assert_eq!(membership_count(target.id, device.id), 0);
    }

    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_map_user_admin() {
        let mail1 = "map_admin@test.invalid";
        let mail2 = "map_admin_joined@test.invalid";
        let admin = TestUser::create(mail1, true);
        let target = TestUser::create(mail2, false);
        defer!(delete_user(mail1));
        defer!(delete_user(mail2));

        let device = admin.add_device(DeviceType::Qgis);
        defer!(delete_device(device.id));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(map_user_admin);
        let app = test::init_service(app).await;

        let req = test::TestRequest::put()
            .uri("/map_user/admin")
            .cookie(Cookie::new("access_token", admin.access_token()))
            .insert_header(ContentType::json())
            .set_json(AdminMapUserSchema {
                device_id: device.id.to_string(),
                user_id: target.id.to_string(),
            })
            .to_request();
        let resp: MapStatusResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.status, "user added to device");
        assert_eq!(membership_count(target.id, device.id), 1);
    }
}
