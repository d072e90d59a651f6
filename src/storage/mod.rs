//! Storage Layer - JSON checkpoints and SQLite tables
//!
//! System of record is SQLite with tables:
//! - employers(employer_id, employer_name, url, open_vacancies)
//! - vacancies(vacancy_id, vacancy_name, vacancy_area, salary, employer_id, vacancy_url)
//!
//! `vacancies.employer_id` references `employers.employer_id`.

pub mod json;
pub mod schema;
pub mod sqlite;

pub use json::JsonSaver;
pub use sqlite::{LoadStats, SchemaManager, open_connection};
