#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App,
};
use diesel::prelude::*;
use tempfile::TempDir;

use hospital_server::{
    auth::{token, Role},
    config::Config,
    database::{self, DbPool},
    models::professionals::KIND_DOCTOR,
    schema::{patients, professionals, users},
    utils::hash_password,
};

pub const PASSWORD: &str = "s3cret-pass";

/// A migrated SQLite file in a temp dir. The dir lives as long as this value.
pub struct TestDb {
    _dir: TempDir,
    pub pool: DbPool,
    pub config: Config,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hospital-test.db");

        let mut config = Config::from_lookup(|_| None);
        config.database_url = path.to_string_lossy().into_owned();
        config.jwt_secret = "integration-secret".to_string();
        config.telemedicine_base_url = "https://vc.test/sessions".to_string();

        let pool = database::create_pool(&config.database_url, 4).unwrap();
        database::run_migrations(&mut *pool.get().unwrap()).unwrap();

        Self {
            _dir: dir,
            pool,
            config,
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.pool.clone()))
            .app_data(web::Data::new(self.config.clone()))
            .configure(hospital_server::configure)
    }

    pub fn conn(&self) -> database::DbConn {
        self.pool.get().unwrap()
    }

    pub fn token(&self, id: i32, role: Role) -> String {
        let kind = (role == Role::Professional).then(|| KIND_DOCTOR.to_string());
        self.token_with_kind(id, role, kind)
    }

    pub fn token_with_kind(&self, id: i32, role: Role, kind: Option<String>) -> String {
        token::issue(&self.config, id, role, kind).unwrap()
    }

    pub fn add_admin(&self, email: &str) -> i32 {
        diesel::insert_into(users::table)
            .values((
                users::name.eq("Admin"),
                users::email.eq(email),
                users::password.eq(hash_password(PASSWORD)),
                users::role.eq(Role::Admin.as_str()),
            ))
            .returning(users::id)
            .get_result(&mut *self.conn())
            .unwrap()
    }

    pub fn add_patient(&self, name: &str, national_id: &str, email: &str) -> i32 {
        diesel::insert_into(patients::table)
            .values((
                patients::name.eq(name),
                patients::national_id.eq(national_id),
                patients::email.eq(email),
                patients::password.eq(hash_password(PASSWORD)),
            ))
            .returning(patients::id)
            .get_result(&mut *self.conn())
            .unwrap()
    }

    pub fn add_professional(&self, name: &str, license: &str, kind: &str) -> i32 {
        diesel::insert_into(professionals::table)
            .values((
                professionals::name.eq(name),
                professionals::license.eq(license),
                professionals::email.eq(format!("{}@hospital.test", license.to_lowercase())),
                professionals::password.eq(hash_password(PASSWORD)),
                professionals::kind.eq(kind),
            ))
            .returning(professionals::id)
            .get_result(&mut *self.conn())
            .unwrap()
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
