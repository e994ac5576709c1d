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

use crate::{
    access::{delete_membership, load_device, load_user, require_admin, UnmapOutcome},
    error::Error,
    routes::device::map_user::{AdminMapUserSchema, MapUserSchema},
    routes::device::MapStatusResponse,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

fn unmap_status(outcome: UnmapOutcome) -> MapStatusResponse {
    let status = match outcome {
        UnmapOutcome::Removed => "device unmapped from user",
        UnmapOutcome::NotPresent => "user not mapped to device",
    };

    MapStatusResponse {
        status: status.to_string(),
    }
}

/// Remove the calling user's mapping to a device. Idempotent.
#[utoipa::path(
    context_path = "/device",
    request_body = MapUserSchema,
    responses(
        (status = 200, description = "Mapping absent", body = MapStatusResponse),
        (status = 404, description = "Device not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[put("/unmap_user")]
pub async fn unmap_user(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    data: Json<MapUserSchema>,
) -> Result<impl Responder, actix_web::Error> {
    let device_id = parse_uuid(&data.device_id)?;
    let uid: uuid::Uuid = user_id.into();

    let mut conn = get_connection(&state)?;
    let outcome = web_block_unpacked(move || {
        let device = load_device(&mut conn, device_id)?.ok_or(Error::DeviceNotFound)?;
        delete_membership(&mut conn, uid, device.id)
    })
    .await?;

    Ok(HttpResponse::Ok().json(unmap_status(outcome)))
}

/// Remove an arbitrary user's mapping to a device. Admin only.
#[utoipa::path(
    context_path = "/device",
    request_body = AdminMapUserSchema,
    responses(
        (status = 200, description = "Mapping absent", body = MapStatusResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Device or user not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[put("/unmap_user/admin")]
pub async fn unmap_user_admin(
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
            Ok(target) => delete_membership(&mut conn, target.id, device.id),
            Err(Error::Unauthorized) => Err(Error::UserNotFound),
            Err(err) => Err(err),
        }
    })
    .await?;

    Ok(HttpResponse::Ok().json(unmap_status(outcome)))
}

#[cfg(test)]
mod tests {
    use actix_web::{cookie::Cookie, http::header::ContentType, test, App};

    use super::*;
    use crate::access::DeviceType;
    use crate::middleware::jwt::JwtMiddleware;
    use crate::routes::device::map_user::tests::membership_count;
    use crate::tests::{configure, delete_device, delete_user, TestUser};
    use crate::defer;

    /// Unmapping without an edge reports NotPresent and writes nothing.
    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_unmap_user_idempotent() {
        let mail1 = "unmap_owner@test.invalid";
        let mail2 = "unmap_other@test.invalid";
        let owner = TestUser::create(mail1, false);
        let other = TestUser::create(mail2, false);
        defer!(delete_user(mail1));
        defer!(delete_user(mail2));

        let device = owner.add_device(DeviceType::Mobile);
        defer!(delete_device(device.id));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(unmap_user);
        let app = test::init_service(app).await;

        let payload = MapUserSchema {
            device_id: device.id.to_string(),
        };

        // `other` never had an edge.
        let req = test::TestRequest::put()
            .uri("/unmap_user")
            .cookie(Cookie::new("access_token", other.access_token()))
            .insert_header(ContentType::json())
            .set_json(&payload)
            .to_request();
        let resp: MapStatusResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.status, "user not mapped to device");

        // The owner's edge goes away, then the repeat is a no-op.
        let req = test::TestRequest::put()
            .uri("/unmap_user")
            .cookie(Cookie::new("access_token", owner.access_token()))
            .insert_header(ContentType::json())
            .set_json(&payload)
            .to_request();
        let resp: MapStatusResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.status, "device unmapped from user");
        assert_eq!(membership_count(owner.id, device.id), 0);

        let req = test::TestRequest::put()
            .uri("/unmap_user")
            .cookie(Cookie::new("access_token", owner.access_token()))
            .insert_header(ContentType::json())
            .set_json(&payload)
            .to_request();
        let resp: MapStatusResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.status, "user not mapped to device");
    }

    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_unmap_user_admin_requires_admin() {
        let mail1 = "unmap_admin_caller@test.invalid";
        let mail2 = "unmap_admin_target@test.invalid";
        let caller = TestUser::create(mail1, false);
        let target = TestUser::create(mail2, false);
        defer!(delete_user(mail1));
        defer!(delete_user(mail2));

        let device = target.add_device(DeviceType::Mobile);
        defer!(delete_device(device.id));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(unmap_user_admin);
        let app = test::init_service(app).await;

        let req = test::TestRequest::put()
            .uri("/unmap_user/admin")
            .cookie(Cookie::new("access_token", caller.access_token()))
            .insert_header(ContentType::json())
            .set_json(AdminMapUserSchema {
                device_id: device.id.to_string(),
                user_id: target.id.to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 403);
        // The target's edge is untouched.
        assert_eq!(membership_count(target.id, device.id), 1);
    }
}
