pub mod jwt_refresh;
pub mod login;
pub mod register;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    let scope = web::scope("/auth")
        .service(register::register)
        .service(login::login)
        .service(jwt_refresh::jwt_refresh);
    cfg.service(scope);
}
