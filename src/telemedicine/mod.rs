use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::{Identity, Role},
    config::Config,
    error::ServiceError,
    protocol::LinkResponse,
};

#[derive(Deserialize)]
pub struct SessionRequest {
    pub video_link: Option<String>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(create_session);
}

/// Hands back the caller's own video link, or a demo room under the
/// configured base URL. No video provider is contacted.
#[post("/sessao")]
async fn create_session(
    config: web::Data<Config>,
    who: Identity,
    info: Option<web::Json<SessionRequest>>,
) -> Result<HttpResponse, ServiceError> {
    who.require(&[Role::Professional, Role::Admin])?;

    let video_link = info
        .and_then(|info| info.into_inner().video_link)
        .filter(|link| !link.trim().is_empty())
        .unwrap_or_else(|| format!("{}/demo", config.telemedicine_base_url));

    info!(caller = who.id, role = %who.role, "telemedicine session created");
    Ok(HttpResponse::Created().json(LinkResponse::new("telemedicine session created", video_link)))
}
