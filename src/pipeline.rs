//! Fetch → checkpoint → recreate → load
//!
//! `fetch` writes both JSON checkpoints from a [`JobSource`]; `load` rebuilds
//! the database from those checkpoints. `reload` does both. Loading always
//! recreates the database, so it only runs when a caller asks for it.

use serde_json::Value;

use crate::Result;
use crate::client::JobSource;
use crate::storage::{JsonSaver, LoadStats, SchemaManager};

/// Record counts written by a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSummary {
    pub vacancies: usize,
    pub employers: usize,
}

/// The pair of JSON files sitting between fetch and load
#[derive(Debug, Clone)]
pub struct Checkpoints {
    vacancies: JsonSaver,
    employers: JsonSaver,
}

impl Checkpoints {
    pub fn new(vacancies: JsonSaver, employers: JsonSaver) -> Self {
        Self { vacancies, employers }
    }

    /// Overwrite both files.
    pub fn save(&self, vacancies: &[Value], employers: &[Value]) -> Result<FetchSummary> {
        self.vacancies.save_data(vacancies)?;
        self.employers.save_data(employers)?;

        Ok(FetchSummary {
            vacancies: vacancies.len(),
            employers: employers.len(),
        })
    }

    /// Recreate the database and fill it from both files.
    ///
    /// Both files are read before anything is dropped.
    pub fn load_into(&self, schema: &SchemaManager) -> Result<LoadStats> {
        let vacancies: Vec<Value> = self.vacancies.get_data()?;
        let employers: Vec<Value> = self.employers.get_data()?;

        schema.create_database()?;
        schema.create_tables()?;
        schema.fill_in_tables(&employers, &vacancies)
    }
}

pub struct Pipeline<'a, S: JobSource> {
    source: &'a S,
    schema: &'a SchemaManager,
    checkpoints: Checkpoints,
}

impl<'a, S: JobSource> Pipeline<'a, S> {
    pub fn new(source: &'a S, schema: &'a SchemaManager, checkpoints: Checkpoints) -> Self {
        Self { source, schema, checkpoints }
    }

    /// Download both collections and overwrite the checkpoints.
    pub fn fetch(&self) -> Result<FetchSummary> {
        tracing::debug!("Fetching vacancies and employers");
        let vacancies = self.source.fetch_vacancies()?;
        let employers = self.source.fetch_employers()?;

        self.checkpoints.save(&vacancies, &employers)
    }

    /// Recreate the database from the checkpoints.
    pub fn load(&self) -> Result<LoadStats> {
        self.checkpoints.load_into(self.schema)
    }

    /// `fetch` followed by `load`.
    pub fn reload(&self) -> Result<LoadStats> {
        let fetched = self.fetch()?;
        tracing::debug!("Fetched {} vacancies, {} employers", fetched.vacancies, fetched.employers);
        self.load()
    }
}
