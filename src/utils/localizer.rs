//! Per-locale string tables loaded from `<dir>/<locale>.json`.
//!
//! Locale files are nested JSON objects; nesting is flattened into dotted
//! keys, so `{"queue": {"pageindicator": "..."}}` is looked up as
//! `queue.pageindicator`. Text may embed keys as `{queue.pageindicator}`
//! tokens, which [`Localizer::localize`] replaces.

use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};
use thiserror::Error;
use tracing::{debug, info, warn};

static KEY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)+)\}").unwrap());

type StringTable = HashMap<String, String>;

#[derive(Error, Debug)]
pub enum LocalizerError {
    #[error("Failed to read locale directory {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid locale file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Default locale '{0}' has no locale file")]
    MissingDefault(String),
}

pub struct Localizer {
    dir: Option<PathBuf>,
    default_locale: String,
    tables: RwLock<HashMap<String, StringTable>>,
}

impl Localizer {
    /// Load every `*.json` file in `dir`. The default locale must be present.
    pub fn load(dir: impl Into<PathBuf>, default_locale: &str) -> Result<Self, LocalizerError> {
        let localizer = Self {
            dir: Some(dir.into()),
            default_locale: default_locale.to_string(),
            tables: RwLock::new(HashMap::new()),
        };
        localizer.reload()?;
        Ok(localizer)
    }

    /// Build an in-memory localizer from `(locale, key, value)` entries.
    pub fn from_entries<'a>(
        default_locale: &str,
        entries: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    ) -> Self {
        let mut tables: HashMap<String, StringTable> = HashMap::new();
        for (locale, key, value) in entries {
            tables
                .entry(locale.to_string())
                .or_default()
                .insert(key.to_string(), value.to_string());
        }
        Self {
            dir: None,
            default_locale: default_locale.to_string(),
            tables: RwLock::new(tables),
        }
    }

    /// Re-read the locale directory, replacing all tables.
    /// Returns the number of locales loaded. In-memory localizers are left untouched.
    pub fn reload(&self) -> Result<usize, LocalizerError> {
        let Some(dir) = &self.dir else {
            return Ok(self.locales().len());
        };

        let tables = read_locale_dir(dir)?;
        if !tables.contains_key(&self.default_locale) {
            return Err(LocalizerError::MissingDefault(self.default_locale.clone()));
        }

        let count = tables.len();
        *self.tables.write().unwrap_or_else(|e| e.into_inner()) = tables;
        info!("Loaded {} locales from {}", count, dir.display());
        Ok(count)
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Known locale codes, sorted.
    pub fn locales(&self) -> Vec<String> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        let mut locales: Vec<_> = tables.keys().cloned().collect();
        locales.sort();
        locales
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.tables
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(locale)
    }

    /// Look up `key` in `locale`, falling back to the default locale.
    pub fn get(&self, locale: &str, key: &str) -> Option<String> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables
            .get(locale)
            .and_then(|table| table.get(key))
            .or_else(|| {
                tables
                    .get(&self.default_locale)
                    .and_then(|table| table.get(key))
            })
            .cloned()
    }

    /// Replace every `{section.key}` token that resolves in `locale`.
    /// Unknown tokens are left as they are.
    pub fn localize(&self, locale: &str, text: &str) -> String {
        KEY_TOKEN
            .replace_all(text, |caps: &regex::Captures| {
                self.get(locale, &caps[1]).unwrap_or_else(|| {
                    debug!("No localization for key '{}' in '{}'", &caps[1], locale);
                    caps[0].to_string()
                })
            })
            .into_owned()
    }
}

fn read_locale_dir(dir: &Path) -> Result<HashMap<String, StringTable>, LocalizerError> {
    let io_err = |source| LocalizerError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut tables = HashMap::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
            warn!("Skipping locale file with unreadable name: {}", path.display());
            continue;
        };

        let content = fs::read_to_string(&path).map_err(|source| LocalizerError::Io {
            path: path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|source| {
            LocalizerError::Parse {
                path: path.clone(),
                source,
            }
        })?;

        let mut table = StringTable::new();
        flatten(&value, String::new(), &mut table);
        debug!("Locale '{}' has {} strings", locale, table.len());
        tables.insert(locale.to_string(), table);
    }
    Ok(tables)
}

fn flatten(value: &Value, prefix: String, out: &mut StringTable) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(child, path, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix, s.clone());
        }
        Value::Null => {}
        other => {
            out.insert(prefix, other.to_string());
        }
    }
}
