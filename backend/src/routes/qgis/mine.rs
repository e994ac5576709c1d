use actix_web::{get, web, HttpResponse, Responder};
use db_connector::models::device_users::DeviceUser;
use db_connector::models::qgis_records::QgisRecord;
use db_connector::models::users::User;
use diesel::prelude::*;

use crate::{
    access::require_admin,
    error::Error,
    routes::qgis::QgisSchema,
    routes::user::get_user,
    routes::TargetUserQuery,
    utils::{get_connection, parse_uuid, web_block_unpacked},
    AppState,
};

pub(crate) fn records_of_user(
    conn: &mut PgConnection,
    user: &User,
) -> Result<Vec<QgisRecord>, Error> {
    use db_connector::schema::device_users::dsl as device_users;
    use db_connector::schema::qgis_records::dsl as qgis_records;

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

    match qgis_records::qgis_records
        .filter(qgis_records::device_id.eq_any(device_ids))
        .select(QgisRecord::as_select())
        .load(conn)
    {
        Ok(records) => Ok(records),
        Err(err) => {
            log::error!("Failed to load qgis readings: {err}");
            Err(Error::InternalError)
        }
    }
}

/// All QGIS readings reported by the caller's devices.
#[utoipa::path(
    context_path = "/qgis",
    responses(
        (status = 200, description = "Success", body = [QgisSchema])
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
    let records: Vec<QgisSchema> = records.into_iter().map(QgisSchema::from).collect();

    Ok(HttpResponse::Ok().json(records))
}

/// Same read for an arbitrary user. Admin only.
#[utoipa::path(
    context_path = "/qgis",
    params(TargetUserQuery),
    responses(
        (status = 200, description = "Success", body = [QgisSchema]),
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
    let records: Vec<QgisSchema> = records.into_iter().map(QgisSchema::from).collect();

    Ok(HttpResponse::Ok().json(records))
}
