use actix_web::cookie::Key;
use actix_web::http::header;
use actix_web::middleware::{DefaultHeaders, Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use env_logger::Env;
use lunch_voting::day::{SharedClock, SystemClock};
use lunch_voting::db::{create_schema, init_db};
use rand::{distributions::Alphanumeric, Rng};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_lib_mods();
    lunch_voting::app_config::init();

    let config = lunch_voting::app_config::get_config();
    let db = init_db(&config.database_url(), &config.database)
        .await
        .expect("Failed to connect to the database.");
    create_schema(&db)
        .await
        .expect("Failed to create the database schema.");

    let secret_key = match std::env::var("SECRET_KEY") {
        Ok(key) if key.len() >= 64 => Key::from(key.as_bytes()),
        other => {
            let random_string: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(128)
                .map(char::from)
                .collect();
            log::warn!("SECRET_KEY was invalid. Reason: {:?}\r\nThis means the key used for signing session cookies will invalidate every time the application is restarted. A secret key must be at least 64 bytes to be accepted.", other.map(|k| format!("{} bytes", k.len())));
            Key::from(random_string.as_bytes())
        }
    };

    let clock: SharedClock = Arc::new(SystemClock);
    let session_config = config.session.clone();

    HttpServer::new(move || {
        // Order of middleware IS IMPORTANT and is in REVERSE EXECUTION ORDER.
        App::new()
            .app_data(Data::new(db.clone()))
            .app_data(Data::new(clock.clone()))
            .configure(lunch_voting::web::configure_extractors)
            .wrap(
                DefaultHeaders::new()
                    .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
                    .add((header::X_FRAME_OPTIONS, "DENY")),
            )
            .wrap(lunch_voting::session::session_middleware(
                secret_key.clone(),
                session_config.cookie_secure,
                session_config.ttl_hours,
            ))
            .wrap(NormalizePath::trim())
            .wrap(Logger::new("%a \"%r\" %s %Dms"))
            .configure(lunch_voting::web::configure)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}

/// Initialize third party crates we rely on but don't have control over.
pub fn init_lib_mods() {
    // A missing .env file is fine; the environment may be set by other means.
    if let Err(e) = dotenv::dotenv() {
        eprintln!("No .env file loaded: {}", e);
    }
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}
