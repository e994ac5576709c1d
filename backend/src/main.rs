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

use std::io::BufReader;

use actix_web::{
    middleware::{Compress, Logger},
    web, App, HttpServer,
};
pub use backend::*;

use db_connector::{get_connection_pool, run_migrations};
use rustls::ServerConfig;
use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

#[cfg(not(debug_assertions))]
use simplelog::WriteLogger;

fn load_rustls_config() -> Option<ServerConfig> {
    let cert_path = std::env::var("TLS_CERT_PATH").ok()?;
    let key_path = std::env::var("TLS_KEY_PATH").ok()?;

    let cert_file = &mut BufReader::new(std::fs::File::open(&cert_path).ok()?);
    let key_file = &mut BufReader::new(std::fs::File::open(&key_path).ok()?);

    let cert_chain: Vec<_> = rustls_pemfile::certs(cert_file)
        .filter_map(|c| c.ok())
        .collect();
    let key = rustls_pemfile::private_key(key_file).ok()??;

    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert_chain, key)
        .ok()?;

    Some(config)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    #[cfg(debug_assertions)]
    CombinedLogger::init(vec![TermLogger::new(
        LevelFilter::Debug,
        log_config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])
    .unwrap();

    #[cfg(not(debug_assertions))]
    {
        let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
        std::fs::create_dir_all(&log_dir)?;
        let log_file = std::fs::File::create(format!(
            "{}/backend-{}.log",
            log_dir,
            chrono::Local::now().format("%Y-%m-%d-%H")
        ))?;
        CombinedLogger::init(vec![
            TermLogger::new(
                LevelFilter::Info,
                log_config.clone(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            ),
            WriteLogger::new(LevelFilter::Info, log_config, log_file),
        ])
        .unwrap();
    }

    dotenvy::dotenv().ok();

    let pool = get_connection_pool();
    let mut conn = pool.get().expect("Failed to get connection from pool");
    run_migrations(&mut conn).expect("Failed to run migrations");

    let storage_dir = std::env::var("STORAGE_DIR").unwrap_or_else(|_| "storage".to_string());
    let images = storage::ImageStore::new(storage_dir).expect("Failed to set up image storage");

    let state = web::Data::new(AppState {
        pool,
        jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET must be set!"),
        images,
    });

    let server = HttpServer::new(move || {
        let cors = actix_cors::Cors::permissive();
        App::new()
            .wrap(cors)
            .wrap(Compress::default())
            .wrap(Logger::default())
            .app_data(state.clone())
            .service(web::scope("/api").configure(routes::configure))
    });

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8081".to_string());

    match load_rustls_config() {
        Some(tls_config) => {
            log::info!("Listening on https://{addr}");
            server.bind_rustls_0_23(&addr, tls_config)?.run().await?;
        }
        None => {
            log::info!("Listening on http://{addr}");
            server.bind(&addr)?.run().await?;
        }
    }

    Ok(())
}
