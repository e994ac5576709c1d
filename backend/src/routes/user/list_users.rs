use actix_web::{get, web, HttpResponse, Responder};
use db_connector::models::users::User;
use diesel::prelude::*;

use crate::{
    access::require_admin,
    error::Error,
    models::filtered_user::FilteredUser,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

/// List every registered user. Admin only.
#[utoipa::path(
    context_path = "/user",
    responses(
        (status = 200, description = "Success", body = [FilteredUser]),
        (status = 403, description = "Caller is not an admin")
    ),
    security(
        ("jwt" = [])
    )
)]
#[get("/list")]
pub async fn list_users(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
) -> Result<impl Responder, actix_web::Error> {
    use db_connector::schema::users::dsl::*;

    require_admin(&state, user_id.into()).await?;

    let mut conn = get_connection(&state)?;
    let all_users: Vec<User> = web_block_unpacked(move || {
        match users.select(User::as_select()).load(&mut conn) {
            Ok(list) => Ok(list),
            Err(err) => {
                log::error!("Failed to list users: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    let all_users: Vec<FilteredUser> = all_users.into_iter().map(FilteredUser::from).collect();

    Ok(HttpResponse::Ok().json(all_users))
}
