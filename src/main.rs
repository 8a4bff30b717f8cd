use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Result;
use cbr_mock::{Config, RateService, RequestLog, routes};
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let log = RequestLog::connect(&config).await?;
    let bind_addr = config.bind_addr;

    info!(
        "Starting mock on {} (error rate {})",
        bind_addr, config.error_rate
    );

    let service = web::Data::new(RateService::new(config, log));

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(service.clone())
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
