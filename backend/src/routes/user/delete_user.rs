use actix_web::{delete, web, HttpResponse, Responder};
use diesel::prelude::*;

use crate::{
    access::require_admin,
    error::Error,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

/// Delete a user account. Admin only; membership edges and api keys go
/// with it, devices and readings stay.
#[utoipa::path(
    context_path = "/user",
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[delete("/{user_id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    path: web::Path<String>,
) -> Result<impl Responder, actix_web::Error> {
    use db_connector::schema::users::dsl::*;

    require_admin(&state, user_id.into()).await?;

    let target = parse_uuid(&path.into_inner())?;
    let mut conn = get_connection(&state)?;
    web_block_unpacked(move || {
        match diesel::delete(users.find(target)).execute(&mut conn) {
            Ok(0) => Err(Error::UserNotFound),
            Ok(_) => Ok(()),
            Err(err) => {
                log::error!("Failed to delete user: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}
