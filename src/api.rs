use actix_web::{http::header::ContentType, web, HttpResponse};
use log::error;

use crate::{
    captor::TemperatureSource,
    database::{DatabaseError, SensorDatabase},
    sensor::Thresholds,
    service::{SensorService, ServiceError},
};

type ServiceData<C, D> = web::Data<SensorService<C, D>>;

fn map_database_error_to_http(err: DatabaseError) -> HttpResponse {
    match err {
        DatabaseError::Busy => HttpResponse::ServiceUnavailable().body("Database connection failed"),
        DatabaseError::NotFound => HttpResponse::InternalServerError().body("Missing sensor data"),
        DatabaseError::Other(msg) => HttpResponse::InternalServerError().body(msg),
        DatabaseError::Conflict => HttpResponse::InternalServerError().body("Unknown error"),
    }
}

fn map_service_error_to_http(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::InvalidThreshold(msg) => HttpResponse::BadRequest().body(msg),
        ServiceError::Database(err) => {
            error!("Database call failed: {}", err);
            map_database_error_to_http(err)
        }
    }
}

/// Store access is blocking, so every service call goes through the
/// blocking thread pool.
async fn call_service<C, D, R, F>(service: ServiceData<C, D>, call: F) -> Result<R, HttpResponse>
where
    C: TemperatureSource + 'static,
    D: SensorDatabase,
    R: Send + 'static,
    F: FnOnce(&SensorService<C, D>) -> Result<R, ServiceError> + Send + 'static,
{
    match web::block(move || call(service.get_ref())).await {
        Ok(result) => result.map_err(map_service_error_to_http),
        Err(err) => {
            error!("Blocking pool call failed: {}", err);
            Err(HttpResponse::InternalServerError().body("Unknown error"))
        }
    }
}

pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::plaintext()).body("pong")
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().body("<html><head><title>Not found</title><body><h1>404</h1></html>")
}

//#[get("/")]
pub async fn sensor_status<C, D>(service: ServiceData<C, D>) -> HttpResponse
where
    C: TemperatureSource + 'static,
    D: SensorDatabase,
{
    match call_service(service, |service| service.get_status()).await {
        Ok(status) => HttpResponse::Ok()
            .content_type(ContentType::plaintext())
            .body(status.to_string()),
        Err(response) => response,
    }
}

//#[get("/history")]
pub async fn sensor_history<C, D>(service: ServiceData<C, D>) -> HttpResponse
where
    C: TemperatureSource + 'static,
    D: SensorDatabase,
{
    call_service(service, |service| service.get_history())
        .await
        .map_or_else(|response| response, |history| HttpResponse::Ok().json(history))
}

//#[get("/thresholds")]
pub async fn get_thresholds<C, D>(service: ServiceData<C, D>) -> HttpResponse
where
    C: TemperatureSource + 'static,
    D: SensorDatabase,
{
    call_service(service, |service| service.get_thresholds())
        .await
        .map_or_else(|response| response, |thresholds| HttpResponse::Ok().json(thresholds))
}

//#[put("/thresholds")]
pub async fn set_thresholds<C, D>(body: web::Json<Thresholds>, service: ServiceData<C, D>) -> HttpResponse
where
    C: TemperatureSource + 'static,
    D: SensorDatabase,
{
    let thresholds = body.into_inner();
    call_service(service, move |service| service.set_thresholds(thresholds))
        .await
        .map_or_else(|response| response, |_| HttpResponse::Ok().finish())
}

/// Sensor routes, mounted both at the root and under `/sensor`.
pub fn configure<C, D>(cfg: &mut web::ServiceConfig)
where
    C: TemperatureSource + 'static,
    D: SensorDatabase,
{
    cfg.service(web::resource("/ping").route(web::get().to(ping)))
        .service(web::resource("/").route(web::get().to(sensor_status::<C, D>)))
        .service(web::resource("/history").route(web::get().to(sensor_history::<C, D>)))
        .service(
            web::resource("/thresholds")
                .route(web::get().to(get_thresholds::<C, D>))
                .route(web::put().to(set_thresholds::<C, D>)),
        )
        .service(
            web::scope("/sensor")
                .service(web::resource("/ping").route(web::get().to(ping)))
                .service(web::resource("").route(web::get().to(sensor_status::<C, D>)))
                .service(web::resource("/history").route(web::get().to(sensor_history::<C, D>)))
                .service(
                    web::resource("/thresholds")
                        .route(web::get().to(get_thresholds::<C, D>))
                        .route(web::put().to(set_thresholds::<C, D>)),
                ),
        );
}
