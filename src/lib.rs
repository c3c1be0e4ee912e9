pub mod admin;
pub mod auth;
pub mod booking;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod patient;
pub mod professional;
pub mod protocol;
pub mod schema;
pub mod telemedicine;
pub mod utils;

use actix_web::{get, web, HttpResponse};

pub use database::DbPool;

use crate::{error::ServiceError, protocol::SimpleResponse};

#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(SimpleResponse::ok("ok"))
}

/// Routes and extractor settings shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| ServiceError::invalid(format!("bad body: {}", err)).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _| ServiceError::invalid(format!("bad path: {}", err)).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| ServiceError::invalid(format!("bad query: {}", err)).into()),
    )
    .service(health)
    .service(web::scope("/auth").configure(auth::config))
    .service(web::scope("/pacientes").configure(patient::config))
    .service(web::scope("/profissionais").configure(professional::config))
    .service(web::scope("/administracao").configure(admin::config))
    .service(web::scope("/telemedicina").configure(telemedicine::config));
}
