pub mod delete_user;
pub mod list_users;
pub mod me;
pub mod update_user;

use actix_web::web;
use db_connector::models::users::User;

use crate::{
    access::load_user,
    middleware::jwt::JwtMiddleware,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    let scope = web::scope("/user")
        .wrap(JwtMiddleware)
        .service(me::me)
        .service(update_user::update_user)
        .service(list_users::list_users)
        .service(delete_user::delete_user);
    cfg.service(scope);
}

pub async fn get_user(
    state: &web::Data<AppState>,
    user_id: uuid::Uuid,
) -> Result<User, actix_web::Error> {
    let mut conn = get_connection(state)?;
    let user = web_block_unpacked(move || load_user(&mut conn, user_id)).await?;

    Ok(user)
}
