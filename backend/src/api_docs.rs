use std::net::Ipv4Addr;

use actix_web::{App, HttpServer};
pub use backend::*;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

struct JwtToken;

impl Modify for JwtToken {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        )
    }
}

/**
 * Start a server that hosts the api documentation.
 */
#[actix_web::main]
async fn main() {
    #[derive(OpenApi)]
    #[openapi(
        paths(
            routes::auth::register::register,
            routes::auth::login::login,
            routes::auth::jwt_refresh::jwt_refresh,
            routes::user::me::me,
            routes::user::update_user::update_user,
            routes::user::list_users::list_users,
            routes::user::delete_user::delete_user,
            routes::device::add::add,
            routes::device::get_devices::get_devices,
            routes::device::get_all::get_all,
            routes::device::info::info,
            routes::device::remove::remove,
            routes::device::map_user::map_user,
            routes::device::map_user::map_user_admin,
            routes::device::unmap_user::unmap_user,
            routes::device::unmap_user::unmap_user_admin,
            routes::device::images::upload::upload,
            routes::device::images::list::list,
            routes::device::images::download::download,
            routes::device::images::remove::remove,
            routes::mobile::create::create,
            routes::mobile::update::update,
            routes::mobile::mine::mine,
            routes::mobile::mine::mine_admin,
            routes::mobile::by_device::by_device,
            routes::mobile::by_location::by_location,
            routes::mobile::by_location::by_location_admin,
            routes::qgis::create::create,
            routes::qgis::update::update,
            routes::qgis::mine::mine,
            routes::qgis::mine::mine_admin,
            routes::qgis::by_device::by_device,
            routes::qgis::by_location::by_location,
            routes::qgis::by_location::by_location_admin,
            routes::wstation::create::create,
            routes::wstation::update::update,
            routes::wstation::mine::mine,
            routes::wstation::mine::mine_admin,
            routes::wstation::by_device::by_device,
            routes::wstation::by_location::by_location,
            routes::wstation::by_location::by_location_admin,
            routes::wstation::ingest::ingest,
            routes::api_key::create::create,
            routes::api_key::get_api_keys::get_api_keys,
            routes::api_key::remove::remove,
        ),
        components(schemas(
            models::filtered_user::FilteredUser,
            access::DeviceType,
            routes::auth::register::RegisterSchema,
            routes::auth::login::LoginSchema,
            routes::user::update_user::UpdateUserSchema,
            routes::device::DeviceSchema,
            routes::device::MapStatusResponse,
            routes::device::add::AddDeviceSchema,
            routes::device::remove::DeleteDeviceSchema,
            routes::device::map_user::MapUserSchema,
            routes::device::map_user::AdminMapUserSchema,
            routes::device::images::ImageSchema,
            routes::device::images::upload::UploadResponse,
            routes::mobile::MobileSchema,
            routes::mobile::create::CreateMobileSchema,
            routes::mobile::update::UpdateMobileSchema,
            routes::qgis::QgisSchema,
            routes::qgis::create::CreateQgisSchema,
            routes::qgis::update::UpdateQgisSchema,
            routes::wstation::WeatherSchema,
            routes::wstation::WeatherPayload,
            routes::wstation::update::UpdateWeatherSchema,
            routes::api_key::create::CreateApiKeySchema,
            routes::api_key::create::CreatedApiKeySchema,
            routes::api_key::get_api_keys::ApiKeySchema,
        )),
        modifiers(&JwtToken)
    )]
    struct ApiDoc;

    let openapi = ApiDoc::openapi();

    HttpServer::new(move || {
        App::new().service(SwaggerUi::new("/{_:.*}").url("/api-docs/openapi.json", openapi.clone()))
    })
    .bind((Ipv4Addr::UNSPECIFIED, 12345))
    .unwrap()
    .run()
    .await
    .unwrap()
}
