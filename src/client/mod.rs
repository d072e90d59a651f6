//! Upstream data sources
//!
//! The loader only needs two collections of raw JSON objects. `JobSource`
//! is the seam: the HeadHunter client implements it for real runs, tests
//! substitute an in-memory source.

pub mod headhunter;

pub use headhunter::HeadHunterClient;

use crate::Result;
use serde_json::Value;

/// A source of raw vacancy and employer records.
pub trait JobSource {
    /// All vacancy records for the configured employers, concatenated.
    fn fetch_vacancies(&self) -> Result<Vec<Value>>;

    /// One employer record per configured employer id.
    fn fetch_employers(&self) -> Result<Vec<Value>>;
}

/// In-memory source for tests.
#[cfg(test)]
pub(crate) struct StaticSource {
    pub employers: Vec<Value>,
    pub vacancies: Vec<Value>,
}

#[cfg(test)]
impl JobSource for StaticSource {
    fn fetch_vacancies(&self) -> Result<Vec<Value>> {
        Ok(self.vacancies.clone())
    }

    fn fetch_employers(&self) -> Result<Vec<Value>> {
        Ok(self.employers.clone())
    }
}
