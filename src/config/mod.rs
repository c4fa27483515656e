// config/mod.rs
// Run configuration: loaded from a property, YAML or JSON file.

pub mod properties;

use crate::error::{DumpError, Result};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DumpConfig {
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
    #[serde(default, deserialize_with = "name_list")]
    pub tables_to_skip: Vec<String>,
    #[serde(default)]
    pub schema: Option<String>,
    /// Older spelling of `schema`; `schema` wins when both are set.
    #[serde(default)]
    pub schema_pattern: Option<String>,
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub tables_to_upper: Option<bool>,
    /// Older spelling of `tablesToUpper`, which wins when both are set.
    #[serde(default, deserialize_with = "flexible_bool")]
    pub to_upper: Option<bool>,
    #[serde(default)]
    pub db: DbConfig,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct DbConfig {
    #[serde(rename = "type")]
    pub db_type: Option<String>,
    pub host: Option<String>,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    MySql,
    Sqlite,
}

impl DbKind {
    pub fn parse(db_type: &str) -> Result<Self> {
        match db_type.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DbKind::Postgres),
            "mysql" | "mariadb" => Ok(DbKind::MySql),
            "sqlite" => Ok(DbKind::Sqlite),
            _ => Err(DumpError::Config(format!(
                "Unsupported database type: '{}'. Supported types: postgresql, mysql, sqlite",
                db_type
            ))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DbKind::Postgres => "postgresql",
            DbKind::MySql => "mysql",
            DbKind::Sqlite => "sqlite",
        }
    }
}

fn default_output_file() -> PathBuf {
    PathBuf::from("out.sql")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NameList {
    Csv(String),
    List(Vec<String>),
}

fn name_list<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    let names: Vec<String> = match NameList::deserialize(deserializer)? {
        NameList::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        NameList::List(list) => list,
    };
    Ok(names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlexibleBool {
    Bool(bool),
    Text(String),
}

/// An empty string counts as unset.
fn flexible_bool<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<bool>, D::Error> {
    Ok(match FlexibleBool::deserialize(deserializer)? {
        FlexibleBool::Bool(b) => Some(b),
        FlexibleBool::Text(s) if s.trim().is_empty() => None,
        FlexibleBool::Text(s) => Some(s.trim().eq_ignore_ascii_case("true")),
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl DumpConfig {
    /// Reads the config file; the format follows the extension.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| DumpError::Config(format!("Unable to open config file {}: {}", path.display(), e)))?;
        let ext = path.extension().and_then(|e| e.to_str()).map(str::to_lowercase);
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            Some("json") => serde_json::from_str(&text).map_err(|e| DumpError::Config(e.to_string())),
            _ => Self::from_properties(&text),
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| DumpError::Config(e.to_string()))
    }

    pub fn from_properties(text: &str) -> Result<Self> {
        let doc = properties::to_document(properties::parse(text));
        serde_json::from_value(doc).map_err(|e| DumpError::Config(e.to_string()))
    }

    pub fn catalog(&self) -> Option<&str> {
        non_empty(&self.catalog)
    }

    pub fn schema(&self) -> Option<&str> {
        non_empty(&self.schema).or_else(|| non_empty(&self.schema_pattern))
    }

    pub fn tables_to_upper(&self) -> bool {
        self.tables_to_upper.or(self.to_upper).unwrap_or(false)
    }

    pub fn db_kind(&self) -> Result<DbKind> {
        let db_type = non_empty(&self.db.db_type).ok_or_else(|| DumpError::Config("missing db.type".into()))?;
        DbKind::parse(db_type)
    }

    /// Checks what is needed to connect, before anything touches the output file.
    pub fn validate(&self) -> Result<DbKind> {
        let kind = self.db_kind()?;
        if non_empty(&self.db.url).is_none() && non_empty(&self.db.name).is_none() {
            return Err(DumpError::Config("either db.url or db.name must be set".into()));
        }
        if self.output_file.as_os_str().is_empty() {
            return Err(DumpError::Config("outputFile is empty".into()));
        }
        Ok(kind)
    }

    /// Connection target with credentials removed, for logs and the banner.
    pub fn redacted_target(&self) -> String {
        match (non_empty(&self.db.url), non_empty(&self.db.host), non_empty(&self.db.name)) {
            (Some(_), _, _) => "[REDACTED]".to_string(),
            (None, Some(host), Some(name)) => format!("{}/{}", host, name),
            (None, None, Some(name)) => name.to_string(),
            _ => "[unset]".to_string(),
        }
    }

    /// Host and optional port from `db.host`, which may be `host:port`.
    pub fn host_port(&self) -> Result<(Option<String>, Option<u16>)> {
        let Some(host) = non_empty(&self.db.host) else {
            return Ok((None, None));
        };
        match host.rsplit_once(':') {
            Some((h, p)) => {
                let port = p
                    .parse::<u16>()
                    .map_err(|_| DumpError::Config(format!("invalid port in db.host: {}", host)))?;
                Ok((Some(h.to_string()), Some(port)))
            }
            None => Ok((Some(host.to_string()), None)),
        }
    }
}
