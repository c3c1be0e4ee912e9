pub mod assert;

use actix_web::web;
use anyhow::Context;
use diesel::{connection::SimpleConnection, r2d2::ConnectionManager, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use r2d2::PooledConnection;

use crate::error::ServiceError;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Per-connection pragmas. SQLite leaves foreign keys off unless asked.
pub fn configure_connection(conn: &mut SqliteConnection) -> diesel::QueryResult<()> {
    conn.batch_execute(
        "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;",
    )
}

#[derive(Debug)]
struct SqlitePragmas;

impl r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        configure_connection(conn).map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn create_pool(database_url: &str, size: u32) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    r2d2::Pool::builder()
        .max_size(size.max(1))
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
        .with_context(|| format!("failed to create pool for {}", database_url))
}

/// Applies pending migrations and returns how many ran.
pub fn run_migrations(conn: &mut SqliteConnection) -> anyhow::Result<usize> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| anyhow::anyhow!(err))
        .context("failed to run migrations")?;
    Ok(applied.len())
}

pub fn get_db_conn(pool: &web::Data<DbPool>) -> Result<DbConn, ServiceError> {
    Ok(pool.get()?)
}

/// Runs `f` on the blocking pool with a pooled connection.
pub async fn with_conn<F, T>(pool: &web::Data<DbPool>, f: F) -> Result<T, ServiceError>
where
    F: FnOnce(&mut SqliteConnection) -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    web::block(move || {
        let mut conn = get_db_conn(&pool)?;
        f(&mut *conn)
    })
    .await?
}

#[cfg(test)]
pub(crate) mod testing {
    use diesel::{prelude::*, SqliteConnection};

    use super::{configure_connection, run_migrations};
    use crate::schema::{patients, professionals};

    /// Fresh migrated in-memory database.
    pub fn conn() -> SqliteConnection {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();
        configure_connection(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();
        conn
    }

    pub fn seed_patient(conn: &mut SqliteConnection, id: i32, name: &str) {
        diesel::insert_into(patients::table)
            .values((
                patients::id.eq(id),
                patients::name.eq(name),
                patients::national_id.eq(format!("{:011}", id)),
                patients::password.eq("-"),
            ))
            .execute(conn)
            .unwrap();
    }

    pub fn seed_professional(conn: &mut SqliteConnection, id: i32, name: &str, kind: &str) {
        diesel::insert_into(professionals::table)
            .values((
                professionals::id.eq(id),
                professionals::name.eq(name),
                professionals::license.eq(format!("CRM-{}", id)),
                professionals::email.eq(format!("pro{}@hospital.test", id)),
                professionals::password.eq("-"),
                professionals::kind.eq(kind),
            ))
            .execute(conn)
            .unwrap();
    }
}
