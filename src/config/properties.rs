// config/properties.rs
// Reader for Java-style property files.

use serde_json::{Map, Value};

const DB_PREFIXES: [&str; 2] = ["com.cloudera.cmf.db.", "db."];

/// Parses `key=value`, `key: value` and `key value` lines. `#` and `!`
/// start comments, a trailing backslash continues the value on the next line.
pub fn parse(text: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut pending = String::new();
    for raw in text.lines() {
        let line = raw.trim_start();
        if pending.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }
        if ends_with_continuation(line) {
            pending.push_str(&line[..line.len() - 1]);
            continue;
        }
        pending.push_str(line);
        if let Some(entry) = split_entry(&pending) {
            entries.push(entry);
        }
        pending.clear();
    }
    if !pending.is_empty() {
        if let Some(entry) = split_entry(&pending) {
            entries.push(entry);
        }
    }
    entries
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// The key ends at the first `=`, `:` or whitespace. A whitespace
/// separator may still be followed by one `=` or `:`.
fn split_entry(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let separator = line
        .char_indices()
        .find(|(_, c)| *c == '=' || *c == ':' || c.is_whitespace());
    let Some((i, c)) = separator else {
        return Some((line.to_string(), String::new()));
    };
    let mut value = line[i + c.len_utf8()..].trim_start();
    if c.is_whitespace() {
        if let Some(rest) = value.strip_prefix(['=', ':']) {
            value = rest.trim_start();
        }
    }
    Some((line[..i].to_string(), value.trim_end().to_string()))
}

/// Turns property entries into the document shape the config deserializes
/// from: `db.*` keys (or the legacy `com.cloudera.cmf.db.*`) go under `db`.
pub fn to_document(entries: Vec<(String, String)>) -> Value {
    let mut root = Map::new();
    let mut db = Map::new();
    for (key, value) in entries {
        match DB_PREFIXES.iter().find_map(|p| key.strip_prefix(p)) {
            Some(field) => {
                db.insert(field.to_string(), Value::String(value));
            }
            None => {
                root.insert(key, Value::String(value));
            }
        }
    }
    if !db.is_empty() {
        root.insert("db".to_string(), Value::Object(db));
    }
    Value::Object(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_separators_and_comments() {
        let entries = parse("# comment\n! also comment\n\noutputFile = dump.sql\nschema:public\ncatalog mydb\n");
        assert_eq!(
            entries,
            vec![
                ("outputFile".to_string(), "dump.sql".to_string()),
                ("schema".to_string(), "public".to_string()),
                ("catalog".to_string(), "mydb".to_string()),
            ]
        );
    }

    #[test]
    fn joins_continuation_lines() {
        let entries = parse("tablesToSkip = a,\\\n    b,c\n");
        assert_eq!(entries, vec![("tablesToSkip".to_string(), "a,b,c".to_string())]);
    }

    #[test]
    fn key_ends_at_the_first_separator() {
        assert_eq!(
            parse("db.url postgres://h:5432/x\n"),
            vec![("db.url".to_string(), "postgres://h:5432/x".to_string())]
        );
        assert_eq!(
            parse("db.url=jdbc:postgresql://h/x\nschema = a=b\n"),
            vec![
                ("db.url".to_string(), "jdbc:postgresql://h/x".to_string()),
                ("schema".to_string(), "a=b".to_string()),
            ]
        );
    }

    #[test]
    fn multibyte_whitespace_separates() {
        assert_eq!(
            parse("catalog\u{00A0}mydb\noutputFile\u{3000}=\u{3000}dump.sql\n"),
            vec![
                ("catalog".to_string(), "mydb".to_string()),
                ("outputFile".to_string(), "dump.sql".to_string()),
            ]
        );
    }

    #[test]
    fn key_without_value() {
        assert_eq!(parse("toUpper\n"), vec![("toUpper".to_string(), String::new())]);
    }

    #[test]
    fn nests_db_keys() {
        let doc = to_document(vec![
            ("db.host".to_string(), "localhost:5432".to_string()),
            ("com.cloudera.cmf.db.name".to_string(), "scm".to_string()),
            ("outputFile".to_string(), "out.sql".to_string()),
        ]);
        assert_eq!(doc["db"]["host"], "localhost:5432");
        assert_eq!(doc["db"]["name"], "scm");
        assert_eq!(doc["outputFile"], "out.sql");
    }
}
