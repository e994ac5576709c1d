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
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use db_connector::models::users::User;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::Error,
    models::filtered_user::FilteredUser,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterSchema {
    #[validate(length(min = 3))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 12))]
    pub password: String,
    #[validate(length(max = 100))]
    pub contact: Option<String>,
}

pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    match Argon2::default().hash_password(password.as_bytes(), &salt) {
        Ok(hash) => Ok(hash.to_string()),
        Err(err) => {
            log::error!("Failed to hash password: {err}");
            Err(Error::InternalError)
        }
    }
}

/// Register a new user account.
#[utoipa::path(
    context_path = "/auth",
    request_body = RegisterSchema,
    responses(
        (status = 201, description = "Account created", body = FilteredUser),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "An account with this email already exists")
    )
)]
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    data: Json<RegisterSchema>,
) -> Result<impl Responder, actix_web::Error> {
    use db_connector::schema::users::dsl::*;

    let data = data.into_inner();
    let password_hash = hash_password(&data.password)?;

    let mut conn = get_connection(&state)?;
    let user = web_block_unpacked(move || {
        let user = User {
            id: uuid::Uuid::new_v4(),
            name: data.name,
            email: data.email.to_lowercase(),
            password: password_hash,
            contact: data.contact,
            is_admin: false,
        };

        match diesel::insert_into(users).values(&user).execute(&mut conn) {
            Ok(_) => Ok(user),
            // The unique index on email decides, not a pre-read.
            Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(Error::UserAlreadyExists)
            }
            Err(err) => {
                log::error!("Failed to insert user: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    Ok(HttpResponse::Created().json(FilteredUser::from(user)))
}
