// db/accessors.rs
// Database accessor implementations for different database systems.

use super::models::*;
use super::type_map::{mysql_type, postgres_type, sqlite_type};
use crate::error::{DumpError, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use futures::stream::{BoxStream, StreamExt};
use sqlx::{
    self,
    mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlRow},
    postgres::{PgConnectOptions, PgPoolOptions, PgRow},
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Column as _, Row as _, TypeInfo as _,
};

#[async_trait]
pub trait DatabaseAccessor: Send + Sync {
    /// Catalog listing, ordered by schema then table name.
    async fn list_tables(&self, catalog: Option<&str>, schema_pattern: Option<&str>) -> Result<Vec<TableEntry>>;

    /// Columns of one table, in ordinal order.
    async fn columns_of(&self, table: &TableEntry) -> Result<Vec<ColumnDescriptor>>;

    /// SELECT statement reading `columns` of `table`, in that order.
    fn select_statement(&self, table: &TableEntry, columns: &[ColumnDescriptor]) -> String;

    /// Single pass over the rows of `table`; nothing runs until polled.
    fn rows_of<'a>(&'a self, table: &'a TableSpec) -> BoxStream<'a, Result<Row>>;
}

fn connection_error(engine: &str, e: sqlx::Error) -> DumpError {
    DumpError::Connection(format!("Failed to connect to {}: {}", engine, e))
}

fn listing_error(e: sqlx::Error) -> DumpError {
    DumpError::Catalog(format!("Failed to list tables: {}", e))
}

fn row_fetch_error(table: &TableSpec, e: sqlx::Error) -> DumpError {
    DumpError::RowFetch {
        table: table.name.clone(),
        message: e.to_string(),
    }
}

fn quote_ident(name: &str, quote: char) -> String {
    let doubled = format!("{}{}", quote, quote);
    format!("{}{}{}", quote, name.replace(quote, &doubled), quote)
}

fn select_with(table: &TableEntry, columns: &[ColumnDescriptor], quote: char) -> String {
    let cols = columns
        .iter()
        .map(|c| quote_ident(&c.name, quote))
        .collect::<Vec<_>>()
        .join(", ");
    let from = match &table.schema {
        Some(schema) => format!("{}.{}", quote_ident(schema, quote), quote_ident(&table.name, quote)),
        None => quote_ident(&table.name, quote),
    };
    format!("SELECT {} FROM {}", cols, from)
}

fn table_kind(table_type: &str) -> String {
    if table_type.eq_ignore_ascii_case("BASE TABLE") || table_type.eq_ignore_ascii_case("TABLE") {
        "TABLE".to_string()
    } else {
        table_type.to_uppercase()
    }
}

// The three drivers share the decoding rules; only the row type differs.
// MySQL also passes a check for UNSIGNED integer columns, read as u64.
macro_rules! decode_row_fn {
    ($name:ident, $row:ty $(, $unsigned:ident)?) => {
        fn $name(row: &$row, columns: &[ColumnDescriptor]) -> std::result::Result<Row, sqlx::Error> {
            columns
                .iter()
                .enumerate()
                .map(|(idx, col)| -> std::result::Result<SqlValue, sqlx::Error> {
                    let value = match &col.sql_type {
                        $(
                            SqlType::Integer | SqlType::BigInt | SqlType::SmallInt | SqlType::TinyInt
                                if $unsigned(row, idx) =>
                            {
                                row.try_get::<Option<u64>, _>(idx)?.map(SqlValue::Unsigned)
                            }
                        )?
                        SqlType::Integer => row.try_get::<Option<i32>, _>(idx)?.map(SqlValue::Int),
                        SqlType::BigInt => row.try_get::<Option<i64>, _>(idx)?.map(SqlValue::BigInt),
                        SqlType::SmallInt => row.try_get::<Option<i16>, _>(idx)?.map(SqlValue::SmallInt),
                        SqlType::TinyInt => row.try_get::<Option<i8>, _>(idx)?.map(SqlValue::TinyInt),
                        SqlType::Bit | SqlType::Boolean => row.try_get::<Option<bool>, _>(idx)?.map(SqlValue::Bool),
                        SqlType::Binary => row.try_get::<Option<Vec<u8>>, _>(idx)?.map(SqlValue::Bytes),
                        SqlType::Char | SqlType::Varchar => row.try_get::<Option<String>, _>(idx)?.map(SqlValue::Text),
                        // non-temporal cells in a timestamp column end up as NULL
                        SqlType::Timestamp => row
                            .try_get::<Option<NaiveDateTime>, _>(idx)
                            .or_else(|_| {
                                row.try_get::<Option<DateTime<Utc>>, _>(idx)
                                    .map(|ts| ts.map(|ts| ts.naive_utc()))
                            })
                            .ok()
                            .flatten()
                            .map(SqlValue::Timestamp),
                        SqlType::Date | SqlType::Time | SqlType::Blob | SqlType::Clob => None,
                        // read only to tell NULL from a value the renderer refuses
                        SqlType::Other(_) => match row.try_get::<Option<String>, _>(idx) {
                            Ok(text) => text.map(SqlValue::Text),
                            Err(_) => row.try_get_unchecked::<Option<Vec<u8>>, _>(idx)?.map(SqlValue::Bytes),
                        },
                    };
                    Ok(value.unwrap_or(SqlValue::Null))
                })
                .collect()
        }
    };
}

fn unsigned_column(row: &MySqlRow, idx: usize) -> bool {
    row.columns()
        .get(idx)
        .is_some_and(|c| c.type_info().name().ends_with("UNSIGNED"))
}

decode_row_fn!(decode_pg_row, PgRow);
decode_row_fn!(decode_mysql_row, MySqlRow, unsigned_column);
decode_row_fn!(decode_sqlite_row, SqliteRow);

// ------------------- PostgreSQL -------------------
pub struct PostgresAccessor {
    pool: sqlx::Pool<sqlx::Postgres>,
}

impl PostgresAccessor {
    pub async fn new(connection_string: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .connect(connection_string)
            .await
            .map_err(|e| connection_error("PostgreSQL", e))?;
        Ok(Self { pool })
    }

    pub async fn with_options(options: PgConnectOptions) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| connection_error("PostgreSQL", e))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabaseAccessor for PostgresAccessor {
    async fn list_tables(&self, catalog: Option<&str>, schema_pattern: Option<&str>) -> Result<Vec<TableEntry>> {
        let rows = sqlx::query(
            "SELECT table_schema::text AS table_schema, table_name::text AS table_name,
                    table_type::text AS table_type
             FROM information_schema.tables
             WHERE table_schema::text LIKE $1::text AND ($2::text = '' OR table_catalog::text = $2::text)
             ORDER BY table_schema, table_name",
        )
        .bind(schema_pattern.unwrap_or("public"))
        .bind(catalog.unwrap_or(""))
        .fetch_all(&self.pool)
        .await
        .map_err(listing_error)?;
        Ok(rows
            .into_iter()
            .map(|r| TableEntry {
                schema: Some(r.get::<String, _>("table_schema")),
                name: r.get::<String, _>("table_name"),
                kind: table_kind(&r.get::<String, _>("table_type")),
            })
            .collect())
    }

    async fn columns_of(&self, table: &TableEntry) -> Result<Vec<ColumnDescriptor>> {
        let rows = sqlx::query(
            "SELECT column_name::text AS column_name, data_type::text AS data_type
             FROM information_schema.columns
             WHERE table_schema::text = $1::text AND table_name::text = $2::text
             ORDER BY ordinal_position",
        )
        .bind(table.schema.as_deref().unwrap_or("public"))
        .bind(&table.name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DumpError::RowFetch {
            table: table.name.clone(),
            message: format!("column metadata: {}", e),
        })?;
        Ok(rows
            .into_iter()
            .map(|row| ColumnDescriptor {
                name: row.get("column_name"),
                sql_type: postgres_type(&row.get::<String, _>("data_type")),
            })
            .collect())
    }

    fn select_statement(&self, table: &TableEntry, columns: &[ColumnDescriptor]) -> String {
        select_with(table, columns, '"')
    }

    fn rows_of<'a>(&'a self, table: &'a TableSpec) -> BoxStream<'a, Result<Row>> {
        sqlx::query(&table.select)
            .fetch(&self.pool)
            .map(move |row| {
                let row = row.map_err(|e| row_fetch_error(table, e))?;
                decode_pg_row(&row, &table.columns).map_err(|e| row_fetch_error(table, e))
            })
            .boxed()
    }
}

// ------------------- MySQL -------------------
pub struct MySqlAccessor {
    pool: sqlx::Pool<sqlx::MySql>,
}

impl MySqlAccessor {
    pub async fn new(connection_string: &str) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .connect(connection_string)
            .await
            .map_err(|e| connection_error("MySQL", e))?;
        Ok(Self { pool })
    }

    pub async fn with_options(options: MySqlConnectOptions) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| connection_error("MySQL", e))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabaseAccessor for MySqlAccessor {
    async fn list_tables(&self, catalog: Option<&str>, schema_pattern: Option<&str>) -> Result<Vec<TableEntry>> {
        // MySQL 8 upper-cases information_schema labels unless aliased
        let rows = sqlx::query(
            "SELECT table_schema AS table_schema, table_name AS table_name, table_type AS table_type
             FROM information_schema.tables
             WHERE table_schema LIKE COALESCE(?, DATABASE()) AND (? = '' OR table_catalog = ?)
             ORDER BY table_schema, table_name",
        )
        .bind(schema_pattern)
        .bind(catalog.unwrap_or(""))
        .bind(catalog.unwrap_or(""))
        .fetch_all(&self.pool)
        .await
        .map_err(listing_error)?;
        Ok(rows
            .into_iter()
            .map(|r| TableEntry {
                schema: Some(r.get::<String, _>("table_schema")),
                name: r.get::<String, _>("table_name"),
                kind: table_kind(&r.get::<String, _>("table_type")),
            })
            .collect())
    }

    async fn columns_of(&self, table: &TableEntry) -> Result<Vec<ColumnDescriptor>> {
        let rows = sqlx::query(
            "SELECT column_name AS column_name, data_type AS data_type, column_type AS column_type
             FROM information_schema.columns
             WHERE table_schema = COALESCE(?, DATABASE()) AND table_name = ? ORDER BY ordinal_position",
        )
        .bind(table.schema.as_deref())
        .bind(&table.name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DumpError::RowFetch {
            table: table.name.clone(),
            message: format!("column metadata: {}", e),
        })?;
        Ok(rows
            .into_iter()
            .map(|row| ColumnDescriptor {
                name: row.get("column_name"),
                sql_type: mysql_type(&row.get::<String, _>("data_type"), &row.get::<String, _>("column_type")),
            })
            .collect())
    }

    fn select_statement(&self, table: &TableEntry, columns: &[ColumnDescriptor]) -> String {
        select_with(table, columns, '`')
    }

    fn rows_of<'a>(&'a self, table: &'a TableSpec) -> BoxStream<'a, Result<Row>> {
        sqlx::query(&table.select)
            .fetch(&self.pool)
            .map(move |row| {
                let row = row.map_err(|e| row_fetch_error(table, e))?;
                decode_mysql_row(&row, &table.columns).map_err(|e| row_fetch_error(table, e))
            })
            .boxed()
    }
}

// ------------------- SQLite -------------------
pub struct SqliteAccessor {
    pool: sqlx::Pool<sqlx::Sqlite>,
}

impl SqliteAccessor {
    pub async fn new(connection_string: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .connect(connection_string)
            .await
            .map_err(|e| connection_error("SQLite", e))?;
        Ok(Self { pool })
    }

    pub async fn with_options(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| connection_error("SQLite", e))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabaseAccessor for SqliteAccessor {
    // SQLite has neither catalogs nor schemas to filter on.
    async fn list_tables(&self, _catalog: Option<&str>, _schema_pattern: Option<&str>) -> Result<Vec<TableEntry>> {
        let rows = sqlx::query(
            "SELECT name, type FROM sqlite_master
             WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(listing_error)?;
        Ok(rows
            .into_iter()
            .map(|r| TableEntry {
                schema: None,
                name: r.get::<String, _>("name"),
                kind: table_kind(&r.get::<String, _>("type")),
            })
            .collect())
    }

    async fn columns_of(&self, table: &TableEntry) -> Result<Vec<ColumnDescriptor>> {
        let rows = sqlx::query(&format!("PRAGMA table_info('{}')", table.name.replace('\'', "''")))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DumpError::RowFetch {
                table: table.name.clone(),
                message: format!("column metadata: {}", e),
            })?;
        Ok(rows
            .into_iter()
            .map(|row| ColumnDescriptor {
                name: row.get("name"),
                sql_type: sqlite_type(&row.get::<String, _>("type")),
            })
            .collect())
    }

    fn select_statement(&self, table: &TableEntry, columns: &[ColumnDescriptor]) -> String {
        select_with(table, columns, '"')
    }

    fn rows_of<'a>(&'a self, table: &'a TableSpec) -> BoxStream<'a, Result<Row>> {
        sqlx::query(&table.select)
            .fetch(&self.pool)
            .map(move |row| {
                let row = row.map_err(|e| row_fetch_error(table, e))?;
                decode_sqlite_row(&row, &table.columns).map_err(|e| row_fetch_error(table, e))
            })
            .boxed()
    }
}
