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

use actix_web::{
    cookie::Cookie, error::ErrorUnauthorized, get, web, HttpRequest, HttpResponse, Responder,
};
use chrono::{Duration, Utc};
use db_connector::models::refresh_tokens::RefreshToken;
use diesel::{prelude::*, result::Error::NotFound};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::{
    error::Error,
    middleware::get_token,
    models::token_claims::TokenClaims,
    routes::auth::login::{create_jwt, create_refresh_token, ACCESS_TOKEN_MINUTES},
    utils::{get_connection, web_block_unpacked},
    AppState,
};

fn extract_token_id(token: &str, jwt_secret: &str) -> actix_web::Result<uuid::Uuid> {
    let claims = match decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(claims) => claims.claims,
        Err(_err) => return Err(ErrorUnauthorized("Invalid refresh token")),
    };

    match uuid::Uuid::parse_str(&claims.sub) {
        Ok(id) => Ok(id),
        Err(_err) => Err(ErrorUnauthorized("Invalid refresh token")),
    }
}

async fn consume_refresh_token(
    req: &HttpRequest,
    state: &web::Data<AppState>,
) -> actix_web::Result<uuid::Uuid> {
    let token = match get_token(req, "refresh_token") {
        Some(token) => token,
        None => return Err(ErrorUnauthorized("Refresh token is missing")),
    };

    let token_id = extract_token_id(&token, &state.jwt_secret)?;

    // Rotation: the stored token is deleted whether or not it is still
    // valid, a replayed token only ever works once.
    let mut conn = get_connection(state)?;
    let stored = web_block_unpacked(move || {
        use db_connector::schema::refresh_tokens::dsl::*;

        let stored: RefreshToken = match refresh_tokens.find(token_id).get_result(&mut conn) {
            Ok(token) => token,
            Err(NotFound) => return Err(Error::Unauthorized),
            Err(err) => {
                log::error!("Failed to load refresh token: {err}");
                return Err(Error::InternalError);
            }
        };

        match diesel::delete(refresh_tokens.find(token_id)).execute(&mut conn) {
            Ok(_) => Ok(stored),
            Err(err) => {
                log::error!("Failed to delete refresh token: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    if stored.expiration < Utc::now().timestamp() {
        return Err(ErrorUnauthorized("Session expired"));
    }

    Ok(stored.user_id)
}

/// Exchange a valid refresh token for a fresh access token.
#[utoipa::path(
    context_path = "/auth",
    responses(
        (status = 200, description = "New access token set"),
        (status = 401, description = "The refresh token was missing or invalid")
    )
)]
#[get("/jwt_refresh")]
pub async fn jwt_refresh(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<impl Responder, actix_web::Error> {
    let user_id = consume_refresh_token(&req, &state).await?;

    let access_token = create_jwt(
        user_id,
        Duration::minutes(ACCESS_TOKEN_MINUTES),
        &state.jwt_secret,
    )?;
    let refresh_token = create_refresh_token(&state, user_id).await?;

    let access_cookie = Cookie::build("access_token", access_token)
        .path("/")
        .max_age(actix_web::cookie::time::Duration::minutes(
            ACCESS_TOKEN_MINUTES,
        ))
        .http_only(false)
        .finish();
    let refresh_cookie = Cookie::build("refresh_token", refresh_token)
        .path("/api/auth")
        .max_age(actix_web::cookie::time::Duration::days(
            super::login::REFRESH_TOKEN_DAYS,
        ))
        .http_only(true)
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .finish())
}
