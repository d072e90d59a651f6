//! Query service over the loaded tables
//!
//! Five fixed read operations:
//! - Vacancy count per employer
//! - All vacancies with employer names, by salary
//! - Average salary (zero-normalized rows included)
//! - Vacancies paid above that average
//! - Case-insensitive keyword search on vacancy titles
//!
//! One connection is opened at construction and reused by every query until
//! [`QueryService::close`].

use std::path::Path;

use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;
use serde::Serialize;
use tabled::Tabled;

use crate::Result;
use crate::record::Vacancy;
use crate::storage::open_connection;

/// Employer name with its number of loaded vacancies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct CompanyVacancies {
    #[tabled(rename = "Employer")]
    pub employer_name: String,
    #[tabled(rename = "Vacancies")]
    pub vacancy_count: i64,
}

/// Vacancy joined with its employer's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct VacancyListing {
    #[tabled(rename = "Employer")]
    pub employer_name: String,
    #[tabled(rename = "Vacancy")]
    pub vacancy_name: String,
    #[tabled(rename = "Salary")]
    pub salary: i64,
    #[tabled(rename = "URL")]
    pub vacancy_url: String,
}

/// Read-only queries against a loaded database
pub struct QueryService {
    conn: Connection,
}

impl QueryService {
    /// Open the database and keep the connection for the session
    pub fn open(path: &Path) -> Result<Self> {
        let conn = open_connection(path)?;
        Self::from_connection(conn)
    }

    /// Wrap an already opened connection
    pub fn from_connection(conn: Connection) -> Result<Self> {
        // SQLite's lower() only folds ASCII; titles are mostly Cyrillic
        conn.create_scalar_function(
            "lower_utf8",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let text: Option<String> = ctx.get(0)?;
                Ok(text.map(|s| s.to_lowercase()))
            },
        )?;
        Ok(Self { conn })
    }

    /// Employers with their vacancy counts, most vacancies first.
    ///
    /// Employers with no loaded vacancies are not listed.
    pub fn companies_and_vacancies_count(&self) -> Result<Vec<CompanyVacancies>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT employers.employer_name, COUNT(vacancies.vacancy_id) AS vacancy_count
            FROM employers
            JOIN vacancies USING (employer_id)
            GROUP BY employers.employer_id, employers.employer_name
            ORDER BY vacancy_count DESC, employers.employer_name
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(CompanyVacancies {
                    employer_name: row.get(0)?,
                    vacancy_count: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    /// Every vacancy with its employer name, highest salary first
    pub fn all_vacancies(&self) -> Result<Vec<VacancyListing>> {
        self.listings(
            r#"
            SELECT employers.employer_name, vacancies.vacancy_name, vacancies.salary, vacancies.vacancy_url
            FROM vacancies
            JOIN employers USING (employer_id)
            ORDER BY vacancies.salary DESC, vacancies.vacancy_id
            "#,
        )
    }

    /// Mean salary over all vacancies, `None` when there are none.
    ///
    /// Vacancies without a published salary count as 0.
    pub fn avg_salary(&self) -> Result<Option<f64>> {
        let avg: Option<f64> = self
            .conn
            .query_row("SELECT AVG(salary) FROM vacancies", [], |row| row.get(0))?;
        Ok(avg)
    }

    /// Vacancies paid strictly above the average, highest first
    pub fn vacancies_with_higher_salary(&self) -> Result<Vec<VacancyListing>> {
        self.listings(
            r#"
            SELECT employers.employer_name, vacancies.vacancy_name, vacancies.salary, vacancies.vacancy_url
            FROM vacancies
            JOIN employers USING (employer_id)
            WHERE vacancies.salary > (SELECT AVG(salary) FROM vacancies)
            ORDER BY vacancies.salary DESC, vacancies.vacancy_id
            "#,
        )
    }

    /// Vacancies whose title contains `keyword`, ignoring case
    pub fn vacancies_with_keyword(&self, keyword: &str) -> Result<Vec<Vacancy>> {
        let needle = keyword.to_lowercase();
        let mut stmt = self.conn.prepare(
            r#"
            SELECT vacancy_id, vacancy_name, vacancy_area, salary, employer_id, vacancy_url
            FROM vacancies
            WHERE instr(lower_utf8(vacancy_name), ?1) > 0
            ORDER BY vacancy_id
            "#,
        )?;

        let rows = stmt
            .query_map([needle], |row| {
                Ok(Vacancy {
                    vacancy_id: row.get(0)?,
                    vacancy_name: row.get(1)?,
                    vacancy_area: row.get(2)?,
                    salary: row.get(3)?,
                    employer_id: row.get(4)?,
                    vacancy_url: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    /// Release the session's connection
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        tracing::debug!("Query connection closed");
        Ok(())
    }

    fn listings(&self, sql: &str) -> Result<Vec<VacancyListing>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(VacancyListing {
                    employer_name: row.get(0)?,
                    vacancy_name: row.get(1)?,
                    salary: row.get(2)?,
                    vacancy_url: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}
