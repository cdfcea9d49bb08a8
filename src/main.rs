use std::io;

use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use log::info;

use sensor_server::{api, config::Config, RandomCaptor, SensorService, SqliteDatabase};

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::parse();

    let database = SqliteDatabase::open(&config.database, config.pool_size)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    let service = web::Data::new(SensorService::new(RandomCaptor, database));

    info!("Listening on {}", config.bind);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(service.clone())
            .configure(api::configure::<RandomCaptor, SqliteDatabase>)
            .default_service(web::route().to(api::not_found))
    })
    .bind(&config.bind)?
    .shutdown_timeout(60)
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
