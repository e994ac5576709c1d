/* agridata-backend
 * Copyright (C) 2026 The agridata-backend authors
 *
 * This library is free software; you can redistribute it and/or
 * modify it under the terms of the GNU Lesser General Public
 * License as published by the Free Software Foundation; either
 * version 2 of the License, or (at your option) any later version.
 *
 * This library is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
 * Lesser General Public License for more details.
 *
 * You should have received a copy of the GNU Lesser General Public
 * License along with this library; if not, write to the
 * Free Software Foundation, Inc., 59 Temple Place - Suite 330,
 * Boston, MA 02111-1307, USA.
 */

use db_connector::Pool;

use crate::storage::ImageStore;

pub mod access;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod storage;
pub mod utils;

pub struct AppState {
    pub pool: Pool,
    pub jwt_secret: String,
    pub images: ImageStore,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use actix_web::web::{self, ServiceConfig};
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };
    use chrono::{Duration, Utc};
    use db_connector::models::devices::Device;
    use db_connector::models::users::User;
    use diesel::prelude::*;

    use crate::access::{insert_membership, DeviceType};
    use crate::models::token_claims::TokenClaims;

    pub struct ScopeCall<F: FnMut()> {
        pub c: F,
    }
    impl<F: FnMut()> Drop for ScopeCall<F> {
        fn drop(&mut self) {
            (self.c)();
        }
    }

    #[macro_export]
    macro_rules! defer {
        ($e:expr) => {
            let _scope_call = crate::tests::ScopeCall {
                c: || -> () {
                    $e;
                },
            };
        };
    }

    pub const TEST_PASSWORD: &str = "TestTestTest";

    pub fn test_jwt_secret() -> String {
        std::env::var("JWT_SECRET").unwrap_or_else(|_| "test-secret".to_string())
    }

    /// App state with a lazy pool: token and validation tests run without
    /// a database, only tests that actually query need one.
    pub fn test_state() -> web::Data<AppState> {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/agridata_test".to_string());
        let manager = diesel::r2d2::ConnectionManager::new(url);
        let pool = Pool::builder().max_size(1).build_unchecked(manager);

        let storage_root = std::env::temp_dir().join("agridata-test-images");
        let images = ImageStore::new(storage_root).expect("test image store");

        web::Data::new(AppState {
            pool,
            jwt_secret: test_jwt_secret(),
            images,
        })
    }

    pub fn configure(cfg: &mut ServiceConfig) {
        cfg.app_data(test_state());
    }

    pub fn access_token_for(user_id: uuid::Uuid) -> String {
        let now = Utc::now();
        let claims = TokenClaims {
            iat: now.timestamp() as usize,
            exp: (now + Duration::minutes(60)).timestamp() as usize,
            sub: user_id.to_string(),
        };

        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(test_jwt_secret().as_ref()),
        )
        .unwrap()
    }

    pub struct TestUser {
        pub id: uuid::Uuid,
        pub mail: String,
    }

    impl TestUser {
        pub fn create(mail: &str, admin: bool) -> Self {
            use db_connector::schema::users::dsl::*;

            let salt = SaltString::generate(&mut OsRng);
            let hash = Argon2::default()
                .hash_password(TEST_PASSWORD.as_bytes(), &salt)
                .unwrap()
                .to_string();

            let user = User {
                id: uuid::Uuid::new_v4(),
                name: mail.split('@').next().unwrap().to_string(),
                email: mail.to_lowercase(),
                password: hash,
                contact: None,
                is_admin: admin,
            };

            let pool = db_connector::test_connection_pool();
            let mut conn = pool.get().unwrap();
            diesel::insert_into(users)
                .values(&user)
                .execute(&mut conn)
                .unwrap();

            TestUser {
                id: user.id,
                mail: user.email,
            }
        }

        pub fn access_token(&self) -> String {
            access_token_for(self.id)
        }

        /// Insert a device and map this user to it, like `/device/add`.
        pub fn add_device(&self, device_type: DeviceType) -> Device {
            use db_connector::schema::devices::dsl as devices;

            let device = Device {
                id: uuid::Uuid::new_v4(),
                name: format!("test-device-{}", device_type),
                location: "test-plot".to_string(),
                mac_address: "00:11:22:33:44:55".to_string(),
                device_type: device_type.as_i32(),
            };

            let pool = db_connector::test_connection_pool();
            let mut conn = pool.get().unwrap();
            diesel::insert_into(devices::devices)
                .values(&device)
                .execute(&mut conn)
                .unwrap();
            insert_membership(&mut conn, self.id, device.id).unwrap();

            device
        }
    }

    pub fn delete_user(mail: &str) {
        use db_connector::schema::users::dsl::*;

        let pool = db_connector::test_connection_pool();
        let mut conn = pool.get().unwrap();
        diesel::delete(users.filter(email.eq(mail.to_lowercase())))
            .execute(&mut conn)
            .ok();
    }

    pub fn delete_device(device_id: uuid::Uuid) {
        use db_connector::schema::devices::dsl::*;

        let pool = db_connector::test_connection_pool();
        let mut conn = pool.get().unwrap();
        diesel::delete(devices.filter(id.eq(device_id)))
            .execute(&mut conn)
            .ok();
    }
}
