use actix_web::{get, web, HttpResponse, Responder};

use crate::{models::filtered_user::FilteredUser, routes::user::get_user, AppState};

/// Get the authenticated user.
#[utoipa::path(
    context_path = "/user",
    responses(
        (status = 200, description = "Success", body = FilteredUser),
        (status = 401, description = "The token holder no longer exists")
    ),
    security(
        ("jwt" = [])
    )
)]
#[get("/me")]
pub async fn me(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
) -> Result<impl Responder, actix_web::Error> {
    let user = get_user(&state, user_id.into()).await?;

    Ok(HttpResponse::Ok().json(FilteredUser::from(user)))
}
