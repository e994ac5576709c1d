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
use db_connector::models::mobile_records::MobileRecord;
use diesel::{prelude::*, result::Error::NotFound};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    access::{authorize_device, require_admin, DeviceType},
    error::Error,
    routes::mobile::MobileSchema,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateMobileSchema {
    pub id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[validate(length(min = 1))]
    pub qr_code: Option<String>,
    pub recording_time: Option<chrono::NaiveDateTime>,
}

/// Partial update of a mobile reading. Authorization follows the
/// reading's current device; a detached reading is admin territory.
#[utoipa::path(
    context_path = "/mobile",
    request_body = UpdateMobileSchema,
    responses(
        (status = 200, description = "Updated reading", body = MobileSchema),
        (status = 400, description = "Device is not of the expected type"),
        (status = 403, description = "Device is not associated with the authenticated user"),
        (status = 404, description = "Record not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[put("/update")]
pub async fn update(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    data: Json<UpdateMobileSchema>,
) -> Result<impl Responder, actix_web::Error> {
    use db_connector::schema::mobile_records::dsl as mobile_records;

    let data = data.into_inner();
    let record_id = parse_uuid(&data.id)?;

    let mut conn = get_connection(&state)?;
    let record: MobileRecord = web_block_unpacked(move || {
        match mobile_records::mobile_records
            .find(record_id)
            .select(MobileRecord::as_select())
            .get_result(&mut conn)
        {
            Ok(record) => Ok(record),
            Err(NotFound) => Err(Error::RecordNotFound),
            Err(err) => {
                log::error!("Failed to load mobile reading: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    match record.device_id {
        Some(device_id) => {
            authorize_device(&state, user_id.into(), device_id, Some(DeviceType::Mobile)).await?;
        }
        None => {
            require_admin(&state, user_id.into()).await?;
        }
    }

    let mut conn = get_connection(&state)?;
    let record = web_block_unpacked(move || {
        let mut record = record;
        if data.latitude.is_some() {
            record.latitude = data.latitude;
        }
        if data.longitude.is_some() {
            record.longitude = data.longitude;
        }
        if let Some(qr_code) = data.qr_code {
            record.qr_code = qr_code;
        }
        if data.recording_time.is_some() {
            record.recording_time = data.recording_time;
        }

        match diesel::update(mobile_records::mobile_records.find(record.id))
            .set((
                mobile_records::latitude.eq(record.latitude),
                mobile_records::longitude.eq(record.longitude),
                mobile_records::qr_code.eq(&record.qr_code),
                mobile_records::recording_time.eq(record.recording_time),
            ))
            .execute(&mut conn)
        {
            Ok(_) => Ok(record),
            Err(err) => {
                log::error!("Failed to update mobile reading: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    Ok(HttpResponse::Ok().json(MobileSchema::from(record)))
}

#[cfg(test)]
mod tests {
    use actix_web::{cookie::Cookie, http::header::ContentType, test, App};
    use diesel::prelude::*;

    use super::*;
    use crate::middleware::jwt::JwtMiddleware;
    use crate::tests::{configure, delete_device, delete_user, TestUser};
    use crate::defer;

    fn insert_record(device_id: Option<uuid::Uuid>) -> MobileRecord {
        use db_connector::schema::mobile_records::dsl as mobile_records;

        let record = MobileRecord {
            id: uuid::Uuid::new_v4(),
            device_id,
            latitude: Some(1.0),
            longitude: Some(2.0),
            qr_code: "QR-original".to_string(),
            recording_time: None,
        };

        let pool = db_connector::test_connection_pool();
        let mut conn = pool.get().unwrap();
        diesel::insert_into(mobile_records::mobile_records)
            .values(&record)
            .execute(&mut conn)
            .unwrap();

        record
    }

    fn remove_record(record_id: uuid::Uuid) {
        use db_connector::schema::mobile_records::dsl as mobile_records;

        let pool = db_connector::test_connection_pool();
        let mut conn = pool.get().unwrap();
        diesel::delete(mobile_records::mobile_records.find(record_id))
            .execute(&mut conn)
            .ok();
    }

    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_update_partial() {
        let mail = "mobile_update@test.invalid";
        let user = TestUser::create(mail, false);
        defer!(delete_user(mail));

        let device = user.add_device(DeviceType::Mobile);
        defer!(delete_device(device.id));

        let record = insert_record(Some(device.id));
        defer!(remove_record(record.id));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(update);
        let app = test::init_service(app).await;

        let req = test::TestRequest::put()
            .uri("/update")
            .cookie(Cookie::new("access_token", user.access_token()))
            .insert_header(ContentType::json())
            .set_json(UpdateMobileSchema {
                id: record.id.to_string(),
                latitude: Some(10.5),
                longitude: None,
                qr_code: None,
                recording_time: None,
            })
            .to_request();
        let resp: MobileSchema = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.latitude, Some(10.5));
        // Untouched fields survive.
        assert_eq!(resp.longitude, Some(2.0));
        assert_eq!(resp.qr_code, "QR-original");
    }

    /// A reading whose device is gone can only be touched by admins.
    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_update_detached_record() {
        let mail1 = "mobile_update_regular@test.invalid";
        let mail2 = "mobile_update_admin@test.invalid";
        let user = TestUser::create(mail1, false);
        let admin = TestUser::create(mail2, true);
        defer!(delete_user(mail1));
        defer!(delete_user(mail2));

        let record = insert_record(None);
        defer!(remove_record(record.id));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(update);
        let app = test::init_service(app).await;

        let payload = UpdateMobileSchema {
            id: record.id.to_string(),
            latitude: None,
            longitude: None,
            qr_code: Some("QR-touched".to_string()),
            recording_time: None,
        };

        let req = test::TestRequest::put()
            .uri("/update")
            .cookie(Cookie::new("access_token", user.access_token()))
            .insert_header(ContentType::json())
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 403);

        let req = test::TestRequest::put()
            .uri("/update")
            .cookie(Cookie::new("access_token", admin.access_token()))
            .insert_header(ContentType::json())
            .set_json(&payload)
            .to_request();
        let resp: MobileSchema = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.qr_code, "QR-touched");
    }

    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_update_missing_record() {
        let mail = "mobile_update_missing@test.invalid";
        let user = TestUser::create(mail, false);
        defer!(delete_user(mail));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(update);
        let app = test::init_service(app).await;

        let req = test::TestRequest::put()
            .uri("/update")
            .cookie(Cookie::new("access_token", user.access_token()))
            .insert_header(ContentType::json())
            .set_json(UpdateMobileSchema {
                id: uuid::Uuid::new_v4().to_string(),
                latitude: None,
                longitude: None,
                qr_code: None,
                recording_time: None,
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 404);
    }
}
