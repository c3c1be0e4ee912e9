use std::{
    fmt,
    future::{ready, Ready},
    str::FromStr,
};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use super::token;
use crate::{config::Config, error::ServiceError, models::professionals::KIND_DOCTOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Professional,
    Patient,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Professional => "professional",
            Role::Patient => "patient",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "professional" => Ok(Role::Professional),
            "patient" => Ok(Role::Patient),
            other => Err(ServiceError::invalid(format!("unknown role '{}'", other))),
        }
    }
}

/// The authenticated caller. `id` points into the table that matches `role`
/// (users for admins, patients, professionals).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i32,
    pub role: Role,
    pub kind: Option<String>,
}

impl Identity {
    pub fn new(id: i32, role: Role) -> Self {
        Self {
            id,
            role,
            kind: None,
        }
    }

    pub fn professional(id: i32, kind: &str) -> Self {
        Self {
            id,
            role: Role::Professional,
            kind: Some(kind.to_string()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require(&self, roles: &[Role]) -> Result<(), ServiceError> {
        if roles.contains(&self.role) {
            return Ok(());
        }
        let allowed = roles
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        Err(ServiceError::Forbidden(format!(
            "access denied: requires one of [{}], caller is {}",
            allowed, self.role
        )))
    }

    /// Patients may only act on their own records; everyone else passes.
    pub fn require_patient_self(&self, patient_id: i32) -> Result<(), ServiceError> {
        if self.role == Role::Patient && self.id != patient_id {
            return Err(ServiceError::Forbidden(
                "patients may only access their own records".to_string(),
            ));
        }
        Ok(())
    }

    /// Doctors managing their own calendar, or an admin.
    pub fn require_schedule_owner(&self, professional_id: i32) -> Result<(), ServiceError> {
        if self.is_admin() {
            return Ok(());
        }
        self.require(&[Role::Professional])?;
        if self.kind.as_deref() != Some(KIND_DOCTOR) {
            return Err(ServiceError::Forbidden(
                "only doctors may manage schedules".to_string(),
            ));
        }
        if self.id != professional_id {
            return Err(ServiceError::Forbidden(
                "schedule belongs to another professional".to_string(),
            ));
        }
        Ok(())
    }
}

fn identity_from_request(req: &HttpRequest) -> Result<Identity, ServiceError> {
    let config = req
        .app_data::<web::Data<Config>>()
        .ok_or_else(|| ServiceError::Internal("configuration is not registered".to_string()))?;

    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ServiceError::Unauthorized("missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| ServiceError::Unauthorized("invalid authorization header".to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ServiceError::Unauthorized("expected a bearer token".to_string()))?;

    let claims = token::verify(config, token.trim())?;
    let id = claims
        .sub
        .parse::<i32>()
        .map_err(|_| ServiceError::Unauthorized("invalid token subject".to_string()))?;

    Ok(Identity {
        id,
        role: claims.role,
        kind: claims.kind,
    })
}

impl FromRequest for Identity {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(identity_from_request(req))
    }
}
