//! SQLite-backed school storage

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::task;
use tracing::debug;

use super::{NewSchool, School, SchoolStore};
use crate::geo::GeoPoint;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS schools (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        address TEXT NOT NULL,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL
    );
"#;

/// One connection shared by every request. Queries run on the blocking pool.
#[derive(Clone)]
pub struct SqliteSchoolStore {
    conn: Arc<Mutex<Connection>>,
    location: PathBuf,
}

impl SqliteSchoolStore {
    /// Open (or create) the database file and make sure the table exists.
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();
        let path_clone = path.clone();

        let conn = task::spawn_blocking(move || {
            let conn = Connection::open(&path_clone)
                .with_context(|| format!("failed to open database at {}", path_clone.display()))?;
            conn.execute_batch(SCHEMA)?;
            Ok::<_, anyhow::Error>(conn)
        })
        .await??;

        debug!("SQLite school store ready at {}", path.display());
        Ok(Self { conn: Arc::new(Mutex::new(conn)), location: path })
    }

    /// Private database that disappears with the store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location: PathBuf::from(":memory:"),
        })
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| anyhow!("sqlite connection lock poisoned"))?;
            f(&*guard)
        })
        .await?
    }
}

#[async_trait]
impl SchoolStore for SqliteSchoolStore {
    async fn list_coordinates(&self) -> Result<Vec<GeoPoint>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT latitude, longitude FROM schools ORDER BY id")?;
            let points = stmt
                .query_map([], |row| Ok(GeoPoint::new(row.get(0)?, row.get(1)?)))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(points)
        })
        .await
    }

    async fn list_all(&self) -> Result<Vec<School>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, address, latitude, longitude FROM schools ORDER BY id",
            )?;
            let schools = stmt
                .query_map([], |row| {
                    Ok(School {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        address: row.get(2)?,
                        latitude: row.get(3)?,
                        longitude: row.get(4)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(schools)
        })
        .await
    }

    async fn insert(&self, school: &NewSchool) -> Result<i64> {
        let school = school.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO schools (name, address, latitude, longitude) VALUES (?1, ?2, ?3, ?4)",
                params![
                    &school.name,
                    &school.address,
                    school.location.latitude,
                    school.location.longitude
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn new_school(name: &str, lat: f64, lon: f64) -> NewSchool {
        NewSchool {
            name: name.to_string(),
            address: format!("{} Street", name),
            location: GeoPoint::new(lat, lon),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list() -> Result<()> {
        let store = SqliteSchoolStore::open_in_memory()?;

        let first = store.insert(&new_school("A", 0.0, 0.0)).await?;
        let second = store.insert(&new_school("B", 1.5, -2.25)).await?;
        assert!(second > first);

        let all = store.list_all().await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first);
        assert_eq!(all[1].name, "B");
        assert_eq!(all[1].address, "B Street");
        assert_eq!(all[1].latitude, 1.5);
        assert_eq!(all[1].longitude, -2.25);

        let coords = store.list_coordinates().await?;
        assert_eq!(coords, vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.5, -2.25)]);

        Ok(())
    }

    #[tokio::test]
    async fn test_records_survive_reopen() -> Result<()> {
        let temp_file = NamedTempFile::new()?;

        let id = {
            let store = SqliteSchoolStore::open(temp_file.path()).await?;
            store.insert(&new_school("Persisted", 10.0, 20.0)).await?
        };

        let reopened = SqliteSchoolStore::open(temp_file.path()).await?;
        assert_eq!(reopened.location(), temp_file.path());
        let all = reopened.list_all().await?;
        assert_eq!(all, vec![new_school("Persisted", 10.0, 20.0).into_school(id)]);

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_store() -> Result<()> {
        let store = SqliteSchoolStore::open_in_memory()?;
        assert!(store.list_all().await?.is_empty());
        assert!(store.list_coordinates().await?.is_empty());
        Ok(())
    }
}
