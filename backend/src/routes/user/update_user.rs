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
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    access::load_user,
    error::Error,
    models::filtered_user::FilteredUser,
    routes::auth::register::hash_password,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserSchema {
    #[validate(length(min = 3))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub contact: Option<String>,
    #[validate(length(min = 12))]
    pub password: Option<String>,
}

/// Partial self-update. Only the provided fields change.
#[utoipa::path(
    context_path = "/user",
    request_body = UpdateUserSchema,
    responses(
        (status = 200, description = "Updated user", body = FilteredUser),
        (status = 409, description = "The new email is already taken")
    ),
    security(
        ("jwt" = [])
    )
)]
#[put("/update_user")]
pub async fn update_user(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    data: Json<UpdateUserSchema>,
) -> Result<impl Responder, actix_web::Error> {
    use db_connector::schema::users::dsl::*;

    let data = data.into_inner();
    let password_hash = match &data.password {
        Some(new_password) => Some(hash_password(new_password)?),
        None => None,
    };

    let uid: uuid::Uuid = user_id.into();
    let mut conn = get_connection(&state)?;
    let user = web_block_unpacked(move || {
        let mut user = load_user(&mut conn, uid)?;

        if let Some(new_name) = data.name {
            user.name = new_name;
        }
        if let Some(new_email) = data.email {
            user.email = new_email.to_lowercase();
        }
        if data.contact.is_some() {
            user.contact = data.contact;
        }
        if let Some(hash) = password_hash {
            user.password = hash;
        }

        match diesel::update(users.find(uid))
            .set((
                name.eq(&user.name),
                email.eq(&user.email),
                contact.eq(user.contact.clone()),
                password.eq(&user.password),
            ))
            .execute(&mut conn)
        {
            Ok(_) => Ok(user),
            Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(Error::UserAlreadyExists)
            }
            Err(err) => {
                log::error!("Failed to update user: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    Ok(HttpResponse::Ok().json(FilteredUser::from(user)))
}

#[cfg(test)]
mod tests {
    use actix_web::{cookie::Cookie, http::header::ContentType, test, App};

    use super::*;
    use crate::middleware::jwt::JwtMiddleware;
    use crate::tests::{access_token_for, configure, delete_user, TestUser};
    use crate::defer;

    #[actix_web::test]
    async fn test_invalid_payload() {
        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(update_user);
        let app = test::init_service(app).await;

        let schema = UpdateUserSchema {
            name: Some("ab".to_string()),
            email: None,
            contact: None,
            password: None,
        };
        let req = test::TestRequest::put()
            .uri("/update_user")
            .cookie(Cookie::new("access_token", access_token_for(uuid::Uuid::new_v4())))
            .insert_header(ContentType::json())
            .set_json(schema)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }

    #[actix_web::test]
    #[ignore = "needs a database"]
    async fn test_partial_update() {
        let mail = "update_user@test.invalid";
        let user = TestUser::create(mail, false);
        defer!(delete_user(mail));

        let app = App::new()
            .configure(configure)
            .wrap(JwtMiddleware)
            .service(update_user);
        let app = test::init_service(app).await;

        let schema = UpdateUserSchema {
            name: Some("Updated Name".to_string()),
            email: None,
            contact: Some("+39 555 0199".to_string()),
            password: None,
        };
        let req = test::TestRequest::put()
            .uri("/update_user")
            .cookie(Cookie::new("access_token", user.access_token()))
            .insert_header(ContentType::json())
            .set_json(schema)
            .to_request();
        let resp: FilteredUser = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.name, "Updated Name");
        assert_eq!(resp.contact.as_deref(), Some("+39 555 0199"));
        // Untouched field survives.
        assert_eq!(resp.email, mail);
    }
}
