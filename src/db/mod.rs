// db/mod.rs
// Database collaborators: connection, catalog listing, row cursors.

pub mod accessors;
pub mod models;
pub mod type_map;

use crate::config::{DbKind, DumpConfig};
use crate::error::Result;
use accessors::*;
use sqlx::{mysql::MySqlConnectOptions, postgres::PgConnectOptions, sqlite::SqliteConnectOptions};
use tracing::info;

/// Opens the accessor for the configured engine. `db.url` wins over the
/// individual `db.*` settings.
pub async fn connect(config: &DumpConfig) -> Result<Box<dyn DatabaseAccessor>> {
    let kind = config.validate()?;
    let url = config.db.url.as_deref().map(str::trim).filter(|u| !u.is_empty());
    let (host, port) = config.host_port()?;
    let name = config.db.name.as_deref().unwrap_or_default();
    let user = config.db.user.as_deref();
    let password = config.db.password.as_deref();

    let accessor: Box<dyn DatabaseAccessor> = match kind {
        DbKind::Postgres => {
            info!("Initializing PostgreSQL accessor...");
            match url {
                Some(url) => Box::new(PostgresAccessor::new(url).await?),
                None => {
                    let mut options = PgConnectOptions::new().database(name);
                    if let Some(host) = &host {
                        options = options.host(host);
                    }
                    if let Some(port) = port {
                        options = options.port(port);
                    }
                    if let Some(user) = user {
                        options = options.username(user);
                    }
                    if let Some(password) = password {
                        options = options.password(password);
                    }
                    Box::new(PostgresAccessor::with_options(options).await?)
                }
            }
        }
        DbKind::MySql => {
            info!("Initializing MySQL accessor...");
            match url {
                Some(url) => Box::new(MySqlAccessor::new(url).await?),
                None => {
                    let mut options = MySqlConnectOptions::new().database(name);
                    if let Some(host) = &host {
                        options = options.host(host);
                    }
                    if let Some(port) = port {
                        options = options.port(port);
                    }
                    if let Some(user) = user {
                        options = options.username(user);
                    }
                    if let Some(password) = password {
                        options = options.password(password);
                    }
                    Box::new(MySqlAccessor::with_options(options).await?)
                }
            }
        }
        DbKind::Sqlite => {
            info!("Initializing SQLite accessor...");
            match url {
                Some(url) => Box::new(SqliteAccessor::new(url).await?),
                None => {
                    let options = SqliteConnectOptions::new().filename(name).read_only(true);
                    Box::new(SqliteAccessor::with_options(options).await?)
                }
            }
        }
    };
    Ok(accessor)
}
