use actix_web::{get, web, HttpResponse, Responder};
use db_connector::models::api_keys::ApiKey;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::Error,
    routes::user::get_user,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

/// Listing never echoes the full token, only a recognizable prefix.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiKeySchema {
    pub id: String,
    pub name: String,
    pub key_prefix: String,
    pub created_at: chrono::NaiveDateTime,
}

impl From<ApiKey> for ApiKeySchema {
    fn from(key: ApiKey) -> Self {
        let prefix_len = key.key.len().min(8);
        ApiKeySchema {
            id: key.id.to_string(),
            name: key.name,
            key_prefix: key.key[..prefix_len].to_string(),
            created_at: key.created_at,
        }
    }
}

/// List the caller's api keys.
#[utoipa::path(
    context_path = "/api_key",
    responses(
        (status = 200, description = "Success", body = [ApiKeySchema])
    ),
    security(
        ("jwt" = [])
    )
)]
#[get("/get_api_keys")]
pub async fn get_api_keys(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
) -> Result<impl Responder, actix_web::Error> {
    let user = get_user(&state, user_id.into()).await?;

    let mut conn = get_connection(&state)?;
    let keys: Vec<ApiKey> = web_block_unpacked(move || {
        match ApiKey::belonging_to(&user)
            .select(ApiKey::as_select())
            .load(&mut conn)
        {
            Ok(keys) => Ok(keys),
            Err(err) => {
                log::error!("Failed to load api keys: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    let keys: Vec<ApiKeySchema> = keys.into_iter().map(ApiKeySchema::from).collect();

    Ok(HttpResponse::Ok().json(keys))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_listing_redacts_the_token() {
        let key = ApiKey {
            id: uuid::Uuid::new_v4(),
            user_id: uuid::Uuid::new_v4(),
            key: "abcdefghijklmnopqrstuvwxyz012345".to_string(),
            name: "gateway".to_string(),
            created_at: Utc::now().naive_utc(),
        };

        let schema = ApiKeySchema::from(key);
        assert_eq!(schema.key_prefix, "abcdefgh");
    }

    #[test]
    fn test_short_keys_do_not_panic() {
        let key = ApiKey {
            id: uuid::Uuid::new_v4(),
            user_id: uuid::Uuid::new_v4(),
            key: "abc".to_string(),
            name: "gateway".to_string(),
            created_at: Utc::now().naive_utc(),
        };

        let schema = ApiKeySchema::from(key);
        assert_eq!(schema.key_prefix, "abc");
    }
}
