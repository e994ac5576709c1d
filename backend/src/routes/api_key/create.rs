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

use actix_web::{post, web, HttpResponse, Responder};
use actix_web_validator::Json;
use base64::{prelude::BASE64_URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use db_connector::models::api_keys::ApiKey;
use diesel::prelude::*;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::Error,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateApiKeySchema {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedApiKeySchema {
    pub id: String,
    pub name: String,
    /// The full token. Only ever returned here.
    pub key: String,
    pub created_at: chrono::NaiveDateTime,
}

pub fn generate_key() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);

    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Create an api key for trusted telemetry ingestion. The token is
/// returned exactly once.
#[utoipa::path(
    context_path = "/api_key",
    request_body = CreateApiKeySchema,
    responses(
        (status = 201, description = "Key created", body = CreatedApiKeySchema)
    ),
    security(
        ("jwt" = [])
    )
)]
#[post("/create")]
pub async fn create(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    data: Json<CreateApiKeySchema>,
) -> Result<impl Responder, actix_web::Error> {
    let uid: uuid::Uuid = user_id.into();
    let name = data.into_inner().name;

    let mut conn = get_connection(&state)?;
    let key = web_block_unpacked(move || {
        use db_connector::schema::api_keys::dsl as api_keys;

        let key = ApiKey {
            id: uuid::Uuid::new_v4(),
            user_id: uid,
            key: generate_key(),
            name,
            created_at: Utc::now().naive_utc(),
        };

        match diesel::insert_into(api_keys::api_keys)
            .values(&key)
            .execute(&mut conn)
        {
            Ok(_) => Ok(key),
            Err(err) => {
                log::error!("Failed to insert api key: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    Ok(HttpResponse::Created().json(CreatedApiKeySchema {
        id: key.id.to_string(),
        name: key.name,
        key: key.key,
        created_at: key.created_at,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{cookie::Cookie, http::header::ContentType, test, App};

    use super::*;
    use crate::middleware::jwt::JwtMiddleware;
    use crate::tests::{access_token_for, configure, delete_user, TestUser};
    use crate::defer;

    #[::core::prelude::v1::test]
    fn test_generated_keys_are_unique_and_opaque() {
        let a = generate_key();
        let b = generate_key();
        assert_ne!(a, b);
        // 32 random bytes, base64url without padding.
        assert_eq!(a.len(), 43);
        assert!(!a.contains('='));
    }

    #[actix_web::test]
    async fn test_empty_name_is_rejected() {
        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(create);
        let app = test::init_service(app).await;

        let req = test::TestRequest::post()
            .uri("/create")
            .cookie(Cookie::new("access_token", access_token_for(uuid::Uuid::new_v4())))
            .insert_header(ContentType::json())
            .set_json(CreateApiKeySchema {
                name: "".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }

    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_create_api_key() {
        let mail = "api_key_create@test.invalid";
        let user = TestUser::create(mail, false);
        defer!(delete_user(mail));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(create);
        let app = test::init_service(app).await;

        let req = test::TestRequest::post()
            .uri("/create")
            .cookie(Cookie::new("access_token", user.access_token()))
            .insert_header(ContentType::json())
            .set_json(CreateApiKeySchema {
                name: "field gateway".to_string(),
            })
            .to_request();
        let resp: CreatedApiKeySchema = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.name, "field gateway");
        assert!(!resp.key.is_empty());
    }
}
