pub mod create;
pub mod get_api_keys;
pub mod remove;

use actix_web::web;

use crate::middleware::jwt::JwtMiddleware;

pub fn configure(cfg: &mut web::ServiceConfig) {
    let scope = web::scope("/api_key")
        .wrap(JwtMiddleware)
        .service(create::create)
        .service(get_api_keys::get_api_keys)
        .service(remove::remove);
    cfg.service(scope);
}
