mod identity;
mod requests;
mod responses;
pub mod token;

pub use identity::{Identity, Role};

use actix_web::{post, web, HttpResponse};
use diesel::prelude::*;
use tracing::info;

use crate::{
    config::Config,
    database::with_conn,
    error::ServiceError,
    models::{
        patients::NewPatient,
        users::{NewUser, UserData},
    },
    protocol::CreatedResponse,
    utils::{hash_password, parse_date_str, require_field, verify_password},
    DbPool,
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login);
}

#[post("/register")]
async fn register(
    pool: web::Data<DbPool>,
    who: Option<Identity>,
    info: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::{patients, users};

    let info = info.into_inner();
    require_field("name", &info.name)?;
    require_field("email", &info.email)?;
    require_field("password", &info.password)?;
    let role = info.role.parse::<Role>()?;
    match role {
        Role::Admin if !who.as_ref().is_some_and(Identity::is_admin) => {
            return Err(ServiceError::Forbidden(
                "only administrators may create admin accounts".to_string(),
            ));
        }
        Role::Professional => {
            return Err(ServiceError::invalid(
                "professionals are registered by an administrator",
            ));
        }
        _ => {}
    }
    if role != Role::Patient && info.national_id.is_some() {
        return Err(ServiceError::invalid(
            "only patient accounts carry a national id",
        ));
    }
    let birth_date = info.birth_date.as_deref().map(parse_date_str).transpose()?;

    let (id, patient_id) = with_conn(&pool, move |conn| {
        conn.immediate_transaction(|conn| {
            let res = users::table
                .filter(users::email.eq(&info.email))
                .count()
                .get_result::<i64>(conn)?;
            if res > 0 {
                return Err(ServiceError::Conflict("email already registered".to_string()));
            }

            let password = hash_password(&info.password);
            let data = NewUser {
                name: info.name.clone(),
                email: info.email.clone(),
                password: password.clone(),
                role: role.as_str().to_string(),
            };
            let id = diesel::insert_into(users::table)
                .values(&data)
                .returning(users::id)
                .get_result::<i32>(conn)?;

            let Some(national_id) = info.national_id else {
                return Ok((id, None));
            };
            require_field("national_id", &national_id)?;
            let res = patients::table
                .filter(patients::national_id.eq(&national_id))
                .count()
                .get_result::<i64>(conn)?;
            if res > 0 {
                return Err(ServiceError::Conflict(
                    "a patient with this national id already exists".to_string(),
                ));
            }
            let patient = NewPatient {
                user_id: Some(id),
                name: info.name,
                national_id,
                birth_date,
                phone: info.phone,
                email: Some(info.email),
                password,
            };
            let patient_id = diesel::insert_into(patients::table)
                .values(&patient)
                .returning(patients::id)
                .get_result::<i32>(conn)?;

            Ok((id, Some(patient_id)))
        })
    })
    .await?;

    info!(user_id = id, ?patient_id, role = %role, "user registered");
    Ok(HttpResponse::Created().json(CreatedResponse::new("user created", id)))
}

/// Token subject for a user account. Patients act through their linked
/// patient record.
fn subject_of(
    conn: &mut SqliteConnection,
    user: &UserData,
    role: Role,
) -> Result<i32, ServiceError> {
    use crate::schema::patients;

    match role {
        Role::Admin => Ok(user.id),
        Role::Patient => patients::table
            .filter(patients::user_id.eq(user.id))
            .select(patients::id)
            .first::<i32>(conn)
            .optional()?
            .ok_or_else(|| {
                ServiceError::Forbidden("account is not linked to a patient record".to_string())
            }),
        Role::Professional => Err(ServiceError::Forbidden(
            "professionals sign in with their license".to_string(),
        )),
    }
}

#[post("/login")]
async fn login(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    info: web::Json<LoginRequest>,
) -> Result<HttpResponse, ServiceError> {
    use crate::schema::users;

    let info = info.into_inner();
    require_field("email", &info.email)?;
    require_field("password", &info.password)?;

    let (user, role, subject) = with_conn(&pool, move |conn| {
        let user = users::table
            .filter(users::email.eq(&info.email))
            .first::<UserData>(conn)
            .optional()?
            .filter(|user| verify_password(&user.password, &info.password))
            .ok_or_else(|| ServiceError::Unauthorized("invalid credentials".to_string()))?;
        let role = user.role.parse::<Role>()?;
        let subject = subject_of(conn, &user, role)?;
        Ok((user, role, subject))
    })
    .await?;

    let access_token = token::issue(&config, subject, role, None)?;
    let patient_id = (role == Role::Patient).then_some(subject);

    info!(user_id = user.id, subject, "user logged in");
    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        access_token,
        user: UserItem {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        },
        patient_id,
    }))
}
