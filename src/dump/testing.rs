// dump/testing.rs
// In-memory database for the dump tests.

use crate::db::accessors::DatabaseAccessor;
use crate::db::models::*;
use crate::error::{DumpError, Result};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

pub struct FakeTable {
    pub entry: TableEntry,
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<Row>,
    pub fail_after: Option<usize>,
}

impl FakeTable {
    pub fn new(name: &str, columns: Vec<ColumnDescriptor>, rows: Vec<Row>) -> Self {
        Self {
            entry: TableEntry {
                schema: Some("public".to_string()),
                name: name.to_string(),
                kind: "TABLE".to_string(),
            },
            columns,
            rows,
            fail_after: None,
        }
    }

    pub fn users() -> Self {
        Self::new(
            "users",
            vec![
                ColumnDescriptor::new("id", SqlType::Integer),
                ColumnDescriptor::new("name", SqlType::Varchar),
            ],
            vec![
                vec![SqlValue::Int(1), SqlValue::Text("Alice".into())],
                vec![SqlValue::Int(2), SqlValue::Null],
            ],
        )
    }

    pub fn view(name: &str) -> Self {
        let mut table = Self::new(name, vec![ColumnDescriptor::new("id", SqlType::Integer)], vec![]);
        table.entry.kind = "VIEW".to_string();
        table
    }

    /// The cursor breaks after yielding `n` rows.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }
}

pub struct FakeAccessor {
    pub tables: Vec<FakeTable>,
    pub listing_error: Option<String>,
}

impl FakeAccessor {
    pub fn new(tables: Vec<FakeTable>) -> Self {
        Self {
            tables,
            listing_error: None,
        }
    }

    /// The catalog listing itself fails.
    pub fn unlistable(message: &str) -> Self {
        Self {
            tables: Vec::new(),
            listing_error: Some(message.to_string()),
        }
    }

    fn table(&self, name: &str) -> Option<&FakeTable> {
        self.tables.iter().find(|t| t.entry.name == name)
    }

    pub fn spec(&self, name: &str) -> TableSpec {
        let table = self.table(name).expect("fake table");
        TableSpec {
            name: name.to_string(),
            source: table.entry.clone(),
            columns: table.columns.clone(),
            select: self.select_statement(&table.entry, &table.columns),
        }
    }
}

#[async_trait]
impl DatabaseAccessor for FakeAccessor {
    async fn list_tables(&self, _catalog: Option<&str>, _schema_pattern: Option<&str>) -> Result<Vec<TableEntry>> {
        if let Some(message) = &self.listing_error {
            return Err(DumpError::Catalog(message.clone()));
        }
        Ok(self.tables.iter().map(|t| t.entry.clone()).collect())
    }

    async fn columns_of(&self, table: &TableEntry) -> Result<Vec<ColumnDescriptor>> {
        self.table(&table.name)
            .map(|t| t.columns.clone())
            .ok_or_else(|| DumpError::RowFetch {
                table: table.name.clone(),
                message: "no such table".to_string(),
            })
    }

    fn select_statement(&self, table: &TableEntry, _columns: &[ColumnDescriptor]) -> String {
        format!("SELECT * FROM {}", table.name)
    }

    fn rows_of<'a>(&'a self, table: &'a TableSpec) -> BoxStream<'a, Result<Row>> {
        let Some(fake) = self.table(&table.source.name) else {
            return stream::empty().boxed();
        };
        let limit = fake.fail_after.unwrap_or(fake.rows.len());
        let mut items: Vec<Result<Row>> = fake.rows.iter().take(limit).cloned().map(Ok).collect();
        if fake.fail_after.is_some() {
            items.push(Err(DumpError::RowFetch {
                table: table.name.clone(),
                message: "connection reset".to_string(),
            }));
        }
        stream::iter(items).boxed()
    }
}
