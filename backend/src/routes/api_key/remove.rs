use actix_web::{delete, web, HttpResponse, Responder};
use diesel::prelude::*;

use crate::{
    error::Error,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

/// Delete one of the caller's api keys. Readings already ingested with
/// it stay.
#[utoipa::path(
    context_path = "/api_key",
    responses(
        (status = 200, description = "Key deleted"),
        (status = 404, description = "Api key not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[delete("/remove/{key_id}")]
pub async fn remove(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    path: web::Path<String>,
) -> Result<impl Responder, actix_web::Error> {
    use db_connector::schema::api_keys::dsl as api_keys;

    let key_id = parse_uuid(&path.into_inner())?;
    let uid: uuid::Uuid = user_id.into();

    let mut conn = get_connection(&state)?;
    web_block_unpacked(move || {
        // Scoped to the caller, other users' keys stay out of reach.
        match diesel::delete(
            api_keys::api_keys
                .filter(api_keys::id.eq(key_id))
                .filter(api_keys::user_id.eq(uid)),
        )
        .execute(&mut conn)
        {
            Ok(0) => Err(Error::ApiKeyNotFound),
            Ok(_) => Ok(()),
            Err(err) => {
                log::error!("Failed to delete api key: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    Ok(HttpResponse::Ok().finish())
}
