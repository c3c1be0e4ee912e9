use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hospital_server::{config::Config, database};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let pool = database::create_pool(&config.database_url, config.pool_size)?;
    {
        let mut conn = pool.get().context("failed to get a connection for migrations")?;
        let applied = database::run_migrations(&mut conn)?;
        info!(applied, "database migrations complete");
    }

    let bind = config.bind_address.clone();
    let pool = web::Data::new(pool);
    let config = web::Data::new(config);

    info!("listening on {}", bind);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(pool.clone())
            .app_data(config.clone())
            .configure(hospital_server::configure)
    })
    .bind(&bind)
    .with_context(|| format!("failed to bind {}", bind))?
    .run()
    .await
    .context("server error")
}
