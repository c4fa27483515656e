// dump/table.rs
// Dumps one table: preamble, one INSERT per row, postamble.

use super::row::{column_list, serialize_row};
use super::writer::DumpWriter;
use crate::db::accessors::DatabaseAccessor;
use crate::db::models::TableSpec;
use crate::error::{DumpError, Result};
use futures::StreamExt;
use std::io::Write;
use tracing::debug;

/// Backtick-quoted identifier with embedded backticks doubled.
fn quoted(table: &str) -> String {
    format!("`{}`", table.replace('`', "``"))
}

pub fn preamble(table: &str) -> String {
    format!(
        "\n\n-- Data for {t}\n\
         /*!40014 SET FOREIGN_KEY_CHECKS=0 */;\n\
         LOCK TABLES {q} WRITE;\n\
         /*!40000 ALTER TABLE {q} DISABLE KEYS */;\n\
         TRUNCATE TABLE {q};\n",
        t = table,
        q = quoted(table)
    )
}

pub fn postamble(table: &str) -> String {
    format!(
        "/*!40000 ALTER TABLE {q} ENABLE KEYS */;\n\
         UNLOCK TABLES;\n\
         /*!40014 SET FOREIGN_KEY_CHECKS=1 */;\n",
        q = quoted(table)
    )
}

fn one_line(e: &DumpError) -> String {
    e.to_string().replace(['\n', '\r'], " ")
}

/// Writes the whole block for `table` and returns the number of rows.
///
/// The first row that fails to fetch or render (an unsupported type with a
/// non-NULL value, say) stops the table, leaves an `-- ERROR` comment and
/// still closes the block with the postamble. Write errors are returned
/// as they happen.
pub async fn dump_table<W: Write>(
    accessor: &dyn DatabaseAccessor,
    table: &TableSpec,
    out: &mut DumpWriter<W>,
) -> Result<u64> {
    out.write_str(&preamble(&table.name))?;

    let columns = column_list(&table.columns);
    let mut rows = accessor.rows_of(table);
    let mut count = 0u64;
    let failure = loop {
        let row = match rows.next().await {
            None => break None,
            Some(Ok(row)) => row,
            Some(Err(e)) => break Some(e),
        };
        match serialize_row(&table.name, &columns, &table.columns, &row) {
            Ok(statement) => {
                out.write_str(&statement)?;
                count += 1;
            }
            Err(e) => break Some(e),
        }
    };
    drop(rows);

    if let Some(e) = &failure {
        out.write_str(&format!("-- ERROR while dumping {}: {}\n", table.name, one_line(e)))?;
    }
    out.write_str(&postamble(&table.name))?;
    debug!(table = %table.name, source = %table.source.name, rows = count, "table block closed");

    match failure {
        Some(e) => Err(e),
        None => Ok(count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{ColumnDescriptor, Row, SqlType, SqlValue};
    use crate::dump::testing::{FakeAccessor, FakeTable};

    #[test]
    fn preamble_and_postamble_bytes() {
        assert_eq!(
            preamble("users"),
            "\n\n-- Data for users\n\
             /*!40014 SET FOREIGN_KEY_CHECKS=0 */;\n\
             LOCK TABLES `users` WRITE;\n\
             /*!40000 ALTER TABLE `users` DISABLE KEYS */;\n\
             TRUNCATE TABLE `users`;\n"
        );
        assert_eq!(
            postamble("users"),
            "/*!40000 ALTER TABLE `users` ENABLE KEYS */;\nUNLOCK TABLES;\n/*!40014 SET FOREIGN_KEY_CHECKS=1 */;\n"
        );
    }

    #[tokio::test]
    async fn rows_between_preamble_and_postamble() {
        let fake = FakeAccessor::new(vec![FakeTable::users()]);
        let spec = fake.spec("users");
        let mut out = DumpWriter::new(Vec::new());
        let rows = dump_table(&fake, &spec, &mut out).await.unwrap();
        assert_eq!(rows, 2);
        let text = String::from_utf8(out.finish().unwrap()).unwrap();
        let expected = format!(
            "{}INSERT INTO users (id, name) VALUES (1, \"Alice\");\n\
             INSERT INTO users (id, name) VALUES (2, NULL);\n{}",
            preamble("users"),
            postamble("users")
        );
        assert_eq!(text, expected);
    }

    #[tokio::test]
    async fn empty_table_still_gets_its_block() {
        let fake = FakeAccessor::new(vec![FakeTable::new(
            "empty",
            vec![ColumnDescriptor::new("id", SqlType::Integer)],
            vec![],
        )]);
        let spec = fake.spec("empty");
        let mut out = DumpWriter::new(Vec::new());
        assert_eq!(dump_table(&fake, &spec, &mut out).await.unwrap(), 0);
        let text = String::from_utf8(out.finish().unwrap()).unwrap();
        assert_eq!(text, format!("{}{}", preamble("empty"), postamble("empty")));
    }

    fn prices(rows: Vec<Row>) -> FakeTable {
        FakeTable::new(
            "prices",
            vec![
                ColumnDescriptor::new("id", SqlType::Integer),
                ColumnDescriptor::new("amount", SqlType::Other("numeric".into())),
            ],
            rows,
        )
    }

    #[tokio::test]
    async fn unsupported_column_without_rows_is_truncated() {
        let fake = FakeAccessor::new(vec![prices(vec![])]);
        let spec = fake.spec("prices");
        let mut out = DumpWriter::new(Vec::new());
        assert_eq!(dump_table(&fake, &spec, &mut out).await.unwrap(), 0);
        let text = String::from_utf8(out.finish().unwrap()).unwrap();
        assert_eq!(text, format!("{}{}", preamble("prices"), postamble("prices")));
    }

    #[tokio::test]
    async fn unsupported_column_holding_only_nulls_is_dumped() {
        let fake = FakeAccessor::new(vec![prices(vec![vec![SqlValue::Int(1), SqlValue::Null]])]);
        let spec = fake.spec("prices");
        let mut out = DumpWriter::new(Vec::new());
        assert_eq!(dump_table(&fake, &spec, &mut out).await.unwrap(), 1);
        let text = String::from_utf8(out.finish().unwrap()).unwrap();
        assert_eq!(
            text,
            format!(
                "{}INSERT INTO prices (id, amount) VALUES (1, NULL);\n{}",
                preamble("prices"),
                postamble("prices")
            )
        );
    }

    #[tokio::test]
    async fn unsupported_value_stops_the_table_at_that_row() {
        let fake = FakeAccessor::new(vec![prices(vec![
            vec![SqlValue::Int(1), SqlValue::Null],
            vec![SqlValue::Int(2), SqlValue::Text("1.00".into())],
            vec![SqlValue::Int(3), SqlValue::Null],
        ])]);
        let spec = fake.spec("prices");
        let mut out = DumpWriter::new(Vec::new());
        let err = dump_table(&fake, &spec, &mut out).await.unwrap_err();
        assert!(matches!(err, DumpError::UnsupportedType { ref column, .. } if column == "amount"));
        let text = String::from_utf8(out.finish().unwrap()).unwrap();
        assert_eq!(
            text,
            format!(
                "{}INSERT INTO prices (id, amount) VALUES (1, NULL);\n\
                 -- ERROR while dumping prices: unsupported type: amount, numeric, 1111\n{}",
                preamble("prices"),
                postamble("prices")
            )
        );
    }

    #[test]
    fn backticks_in_table_names_are_doubled() {
        let pre = preamble("odd`name");
        assert!(pre.starts_with("\n\n-- Data for odd`name\n"));
        assert!(pre.contains("LOCK TABLES `odd``name` WRITE;\n"));
        assert!(pre.ends_with("TRUNCATE TABLE `odd``name`;\n"));
        assert!(postamble("odd`name").starts_with("/*!40000 ALTER TABLE `odd``name` ENABLE KEYS */;\n"));
    }

    #[tokio::test]
    async fn fetch_failure_is_recorded_and_block_closed() {
        let fake = FakeAccessor::new(vec![FakeTable::users().failing_after(1)]);
        let spec = fake.spec("users");
        let mut out = DumpWriter::new(Vec::new());
        let err = dump_table(&fake, &spec, &mut out).await.unwrap_err();
        assert!(matches!(err, DumpError::RowFetch { .. }));
        let text = String::from_utf8(out.finish().unwrap()).unwrap();
        assert!(text.contains("VALUES (1, \"Alice\");\n-- ERROR while dumping users: "));
        assert!(!text.contains("VALUES (2,"));
        assert!(text.ends_with(&postamble("users")));
    }
}
