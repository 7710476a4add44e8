use actix_cors::Cors;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{web, App, HttpServer};
use tasktrack::{auth::TokenIssuer, config::Config, db, routes};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;

    let pool = db::connect(&config.database).await?;
    db::run_migrations(&pool).await?;
    log::info!("database migrations applied");

    let pool_data = web::Data::new(pool.clone());
    let issuer = web::Data::new(TokenIssuer::from_config(&config.auth));

    log::info!("Starting tasktrack server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(pool_data.clone())
            .app_data(issuer.clone())
            .wrap(NormalizePath::trim())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await?;

    pool.close().await;
    log::info!("server stopped, database pool closed");
    Ok(())
}
