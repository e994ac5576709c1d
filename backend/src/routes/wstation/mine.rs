use actix_web::{get, web, HttpResponse, Responder};
use db_connector::models::device_users::DeviceUser;
use db_connector::models::users::User;
use db_connector::models::weather_records::WeatherRecord;
use diesel::prelude::*;

use crate::{
    access::require_admin,
    error::Error,
    routes::user::get_user,
    routes::wstation::WeatherSchema,
    routes::TargetUserQuery,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

pub(crate) fn records_of_user(
    conn: &mut PgConnection,
    user: &User,
) -> Result<Vec<WeatherRecord>, Error> {
    use db_connector::schema::device_users::dsl as device_users;
    use db_connector::schema::weather_records::dsl as weather_records;

    let device_ids: Vec<uuid::Uuid> = match DeviceUser::belonging_to(user)
        .select(device_users::device_id)
        .load(conn)
    {
        Ok(ids) => ids,
        Err(err) => {
            log::error!("Failed to load device memberships: {err}");
            return Err(Error::InternalError);
        }
    };
    let device_ids: Vec<Option<uuid::Uuid>> = device_ids.into_iter().map(Some).collect();

    match weather_records::weather_records
        .filter(weather_records::device_id.eq_any(device_ids))
        .select(WeatherRecord::as_select())
        .load(conn)
    {
        Ok(records) => Ok(records),
        Err(err) => {
            log::error!("Failed to load weather readings: {err}");
            Err(Error::InternalError)
        }
    }
}

/// All weather readings reported by the caller's stations.
#[utoipa::path(
    context_path = "/wstation",
    responses(
        (status = 200, description = "Success", body = [WeatherSchema])
    ),
    security(
        ("jwt" = [])
    )
)]
#[get("/mine")]
pub async fn mine(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
) -> Result<impl Responder, actix_web::Error> {
    let user = get_user(&state, user_id.into()).await?;

    let mut conn = get_connection(&state)?;
    let records = web_block_unpacked(move || records_of_user(&mut conn, &user)).await?;
    let records: Vec<WeatherSchema> = records.into_iter().map(WeatherSchema::from).collect();

    Ok(HttpResponse::Ok().json(records))
}

/// Same read for an arbitrary user. Admin only.
#[utoipa::path(
    context_path = "/wstation",
    params(TargetUserQuery),
    responses(
        (status = 200, description = "Success", body = [WeatherSchema]),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[get("/mine/admin")]
pub async fn mine_admin(
    state: web::Data<AppState>,
    user_id: crate::models::uuid::Uuid,
    query: actix_web_validator::Query<TargetUserQuery>,
) -> Result<impl Responder, actix_web::Error> {
    require_admin(&state, user_id.into()).await?;

    let target_id = parse_uuid(&query.user_id)?;
    let mut conn = get_connection(&state)?;
    let records = web_block_unpacked(move || {
        use db_connector::schema::users::dsl as users;

        let target: User = match users::users
            .find(target_id)
            .select(User::as_select())
            .get_result(&mut conn)
        {
            Ok(user) => user,
            Err(diesel::result::Error::NotFound) => return Err(Error::UserNotFound),
            Err(err) => {
                log::error!("Failed to load user: {err}");
                return Err(Error::InternalError);
            }
        };

        records_of_user(&mut conn, &target)
    })
    .await?;
    let records: Vec<WeatherSchema> = records.into_iter().map(WeatherSchema::from).collect();

    Ok(HttpResponse::Ok().json(records))
}
