//! Per-guild settings persisted in SQLite.

use poise::serenity_prelude::GuildId;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Guild settings backed by a single SQLite connection.
pub struct SettingsStore {
    conn: Mutex<Connection>,
}

impl SettingsStore {
    /// Open (or create) the database file and make sure the tables exist.
    pub fn open(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        debug!("Opened settings database at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> SettingsResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> SettingsResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS guild_settings (
                guild_id INTEGER PRIMARY KEY,
                locale TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The guild's configured locale, if one was set.
    pub fn guild_locale(&self, guild_id: GuildId) -> SettingsResult<Option<String>> {
        let locale = self
            .conn()
            .query_row(
                "SELECT locale FROM guild_settings WHERE guild_id = ?1",
                params![guild_id.get()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(locale)
    }

    pub fn set_guild_locale(&self, guild_id: GuildId, locale: &str) -> SettingsResult<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO guild_settings (guild_id, locale) VALUES (?1, ?2)",
            params![guild_id.get(), locale],
        )?;
        debug!("Guild {} locale set to '{}'", guild_id, locale);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_guild_has_no_locale() {
        let store = SettingsStore::open_in_memory().unwrap();
        assert_eq!(store.guild_locale(GuildId::new(444555666)).unwrap(), None);
    }

    #[test]
    fn set_locale_replaces_previous_value() {
        let store = SettingsStore::open_in_memory().unwrap();
        let guild_id = GuildId::new(111222333);

        store.set_guild_locale(guild_id, "en").unwrap();
        assert_eq!(store.guild_locale(guild_id).unwrap().as_deref(), Some("en"));

        store.set_guild_locale(guild_id, "no").unwrap();
        assert_eq!(store.guild_locale(guild_id).unwrap().as_deref(), Some("no"));
    }

    #[test]
    fn locales_are_kept_per_guild() {
        let store = SettingsStore::open_in_memory().unwrap();
        store.set_guild_locale(GuildId::new(1), "en").unwrap();
        store.set_guild_locale(GuildId::new(2), "de").unwrap();

        assert_eq!(store.guild_locale(GuildId::new(1)).unwrap().as_deref(), Some("en"));
        assert_eq!(store.guild_locale(GuildId::new(2)).unwrap().as_deref(), Some("de"));
    }
}
