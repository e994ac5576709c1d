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

use actix_web::{cookie::Cookie, post, web, HttpResponse, Responder};
use actix_web_validator::Json;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use chrono::{Duration, Utc};
use db_connector::models::refresh_tokens::RefreshToken;
use db_connector::models::users::User;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::Error,
    models::token_claims::TokenClaims,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

pub const ACCESS_TOKEN_MINUTES: i64 = 60;
pub const REFRESH_TOKEN_DAYS: i64 = 30;

#[derive(Debug, Serialize, Deserialize, Clone, Validate, ToSchema)]
pub struct LoginSchema {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

pub fn create_jwt(
    sub: uuid::Uuid,
    lifetime: Duration,
    jwt_secret: &str,
) -> Result<String, Error> {
    let now = Utc::now();
    let claims = TokenClaims {
        iat: now.timestamp() as usize,
        exp: (now + lifetime).timestamp() as usize,
        sub: sub.to_string(),
    };

    match jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(jwt_secret.as_ref()),
    ) {
        Ok(token) => Ok(token),
        Err(err) => {
            log::error!("Failed to encode jwt: {err}");
            Err(Error::InternalError)
        }
    }
}

/// Persist a refresh token row and wrap its id into a jwt.
pub async fn create_refresh_token(
    state: &web::Data<AppState>,
    uid: uuid::Uuid,
) -> Result<String, actix_web::Error> {
    let mut conn = get_connection(state)?;
    let token = web_block_unpacked(move || {
        use db_connector::schema::refresh_tokens::dsl::*;

        let token = RefreshToken {
            id: uuid::Uuid::new_v4(),
            user_id: uid,
            expiration: (Utc::now() + Duration::days(REFRESH_TOKEN_DAYS)).timestamp(),
        };

        match diesel::insert_into(refresh_tokens)
            .values(&token)
            .execute(&mut conn)
        {
            Ok(_) => Ok(token),
            Err(err) => {
                log::error!("Failed to insert refresh token: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    Ok(create_jwt(
        token.id,
        Duration::days(REFRESH_TOKEN_DAYS),
        &state.jwt_secret,
    )?)
}

/// Verify the credentials and start a session.
#[utoipa::path(
    context_path = "/auth",
    request_body = LoginSchema,
    responses(
        (status = 200, description = "Logged in, cookies set"),
        (status = 400, description = "Wrong email or password")
    )
)]
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    data: Json<LoginSchema>,
) -> Result<impl Responder, actix_web::Error> {
    use db_connector::schema::users::dsl::*;

    let user_mail = data.email.to_lowercase();
    let mut conn = get_connection(&state)?;
    let user: User = web_block_unpacked(move || {
        match users
            .filter(email.eq(user_mail))
            .select(User::as_select())
            .get_result(&mut conn)
        {
            Ok(user) => Ok(user),
            // Same response as a wrong password, no account probing.
            Err(diesel::result::Error::NotFound) => Err(Error::Unauthorized),
            Err(err) => {
                log::error!("Failed to load user: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    let password_hash = match PasswordHash::new(&user.password) {
        Ok(hash) => hash,
        Err(err) => {
            log::error!("Stored password hash is invalid: {err}");
            return Err(Error::InternalError.into());
        }
    };
    if Argon2::default()
        .verify_password(data.password.as_bytes(), &password_hash)
        .is_err()
    {
        return Err(Error::Unauthorized.into());
    }

    let access_token = create_jwt(
        user.id,
        Duration::minutes(ACCESS_TOKEN_MINUTES),
        &state.jwt_secret,
    )?;
    let refresh_token = create_refresh_token(&state, user.id).await?;

    let access_cookie = Cookie::build("access_token", access_token)
        .path("/")
        .max_age(actix_web::cookie::time::Duration::minutes(
            ACCESS_TOKEN_MINUTES,
        ))
        .http_only(false)
        .finish();
    let refresh_cookie = Cookie::build("refresh_token", refresh_token)
        .path("/api/auth")
        .max_age(actix_web::cookie::time::Duration::days(REFRESH_TOKEN_DAYS))
        .http_only(true)
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .body("Logged in"))
}
