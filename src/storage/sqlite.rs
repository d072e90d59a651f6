//! SQLite schema management and bulk loading

use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use serde_json::Value;

use super::schema;
use crate::Result;
use crate::config::ensure_parent_dir;
use crate::record::{Employer, Vacancy};

/// Open a connection with foreign key enforcement switched on.
pub fn open_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Creates, recreates and fills the vacancy database.
pub struct SchemaManager {
    database: PathBuf,
}

impl SchemaManager {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self { database: database.into() }
    }

    pub fn database(&self) -> &Path {
        &self.database
    }

    pub fn database_exists(&self) -> bool {
        self.database.exists()
    }

    /// Drop the database if it exists and create a fresh, empty one.
    ///
    /// Destroys all previously loaded data. Nothing calls this implicitly.
    pub fn create_database(&self) -> Result<()> {
        tracing::info!("Creating database {}", self.database.display());

        for path in self.database_files() {
            if path.exists() {
                tracing::debug!("Removing {}", path.display());
                std::fs::remove_file(&path)?;
            }
        }

        ensure_parent_dir(&self.database)?;
        let conn = Connection::open(&self.database)?;
        conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }

    /// Create the employers and vacancies tables.
    ///
    /// Fails if they already exist; call [`create_database`](Self::create_database) first.
    pub fn create_tables(&self) -> Result<()> {
        tracing::info!("Creating tables");

        let mut conn = open_connection(&self.database)?;
        let tx = conn.transaction()?;
        for stmt in schema::all_schema_statements() {
            tx.execute(stmt, [])?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Insert raw upstream records: every employer, then every vacancy.
    ///
    /// Runs in one transaction committed after the last insert. A malformed
    /// record, a duplicate id or a vacancy pointing at an unknown employer
    /// aborts the load and nothing is committed.
    pub fn fill_in_tables(&self, employers: &[Value], vacancies: &[Value]) -> Result<LoadStats> {
        tracing::info!("Filling tables");

        let mut conn = open_connection(&self.database)?;
        let tx = conn.transaction()?;

        {
            let mut stmt = tx.prepare(schema::INSERT_EMPLOYER)?;
            for record in employers {
                let employer = Employer::from_record(record)?;
                stmt.execute(params![
                    employer.employer_id,
                    employer.employer_name,
                    employer.url,
                    employer.open_vacancies,
                ])?;
            }
        }

        {
            let mut stmt = tx.prepare(schema::INSERT_VACANCY)?;
            for record in vacancies {
                let vacancy = Vacancy::from_record(record)?;
                tracing::trace!("vacancy {} salary {}", vacancy.vacancy_id, vacancy.salary);
                stmt.execute(params![
                    vacancy.vacancy_id,
                    vacancy.vacancy_name,
                    vacancy.vacancy_area,
                    vacancy.salary,
                    vacancy.employer_id,
                    vacancy.vacancy_url,
                ])?;
            }
        }

        tx.commit()?;

        let stats = LoadStats {
            employers: employers.len(),
            vacancies: vacancies.len(),
        };
        tracing::info!("Loaded {} employers and {} vacancies", stats.employers, stats.vacancies);
        Ok(stats)
    }

    /// Count rows currently in both tables.
    pub fn stats(&self) -> Result<LoadStats> {
        let conn = open_connection(&self.database)?;
        let employers: i64 = conn.query_row("SELECT COUNT(*) FROM employers", [], |row| row.get(0))?;
        let vacancies: i64 = conn.query_row("SELECT COUNT(*) FROM vacancies", [], |row| row.get(0))?;
        Ok(LoadStats {
            employers: employers as usize,
            vacancies: vacancies as usize,
        })
    }

    fn database_files(&self) -> Vec<PathBuf> {
        let mut files = vec![self.database.clone()];
        for suffix in ["-journal", "-wal", "-shm"] {
            let mut name = self.database.as_os_str().to_os_string();
            name.push(suffix);
            files.push(PathBuf::from(name));
        }
        files
    }
}

/// Row counts after a load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub employers: usize,
    pub vacancies: usize,
}
