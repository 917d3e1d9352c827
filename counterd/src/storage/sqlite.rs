use crate::storage::{schema::counters, Storage};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use diesel::{prelude::*, sqlite::SqliteConnection};
use std::{
    convert::TryFrom,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::Mutex;

embed_migrations!("./migrations");

/// Persistent counter storage backed by an Sqlite database file.
#[derive(Clone)]
pub struct Sqlite {
    connection: Arc<Mutex<SqliteConnection>>,
    file: PathBuf,
}

#[derive(Insertable, Debug)]
#[table_name = "counters"]
struct Counter {
    name: String,
    value: i64,
}

impl Sqlite {
    /// Reads or creates an Sqlite database file at `file`. When this returns
    /// the database exists, a connection to it has been made and the
    /// migrations have been run.
    pub fn new(file: &Path) -> anyhow::Result<Self> {
        ensure_folder_tree_exists(file)?;

        let database_url = file
            .to_str()
            .ok_or_else(|| anyhow!("database path is not valid unicode: {}", file.display()))?;
        let connection = SqliteConnection::establish(database_url)
            .with_context(|| format!("failed to open database {}", file.display()))?;
        embedded_migrations::run(&connection).context("failed to run database migrations")?;

        tracing::info!("SQLite database file: {}", file.display());

        Ok(Sqlite {
            connection: Arc::new(Mutex::new(connection)),
            file: file.to_path_buf(),
        })
    }

    pub async fn do_in_transaction<F, T>(&self, f: F) -> anyhow::Result<T>
    where
        F: FnOnce(&SqliteConnection) -> anyhow::Result<T>,
    {
        let guard = self.connection.lock().await;
        let connection = &*guard;

        let result = connection.transaction(|| f(connection))?;

        Ok(result)
    }
}

impl fmt::Debug for Sqlite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sqlite").field("file", &self.file).finish()
    }
}

#[async_trait]
impl Storage for Sqlite {
    async fn load(&self, key: &str) -> anyhow::Result<Option<u32>> {
        let value = self
            .do_in_transaction(|connection| {
                let value = counters::table
                    .filter(counters::name.eq(key))
                    .select(counters::value)
                    .first::<i64>(connection)
                    .optional()?;

                Ok(value)
            })
            .await?;

        value
            .map(|value| {
                u32::try_from(value)
                    .with_context(|| format!("stored counter {} is out of range", value))
            })
            .transpose()
    }

    async fn save(&self, key: String, value: u32) -> anyhow::Result<()> {
        let row = Counter {
            name: key,
            value: i64::from(value),
        };

        self.do_in_transaction(|connection| {
            diesel::replace_into(counters::table)
                .values(&row)
                .execute(connection)?;

            Ok(())
        })
        .await
    }
}

fn ensure_folder_tree_exists(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    Ok(())
}
