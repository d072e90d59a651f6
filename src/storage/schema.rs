//! Database schema definitions

/// SQL to create the employers table
pub const CREATE_EMPLOYERS_TABLE: &str = r#"
CREATE TABLE employers (
    employer_id INTEGER PRIMARY KEY,
    employer_name TEXT NOT NULL,
    url TEXT NOT NULL,
    open_vacancies INTEGER NOT NULL
)
"#;

/// SQL to create the vacancies table
/// Every row must point at an existing employer
pub const CREATE_VACANCIES_TABLE: &str = r#"
CREATE TABLE vacancies (
    vacancy_id INTEGER PRIMARY KEY,
    vacancy_name TEXT NOT NULL,
    vacancy_area TEXT NOT NULL,
    salary INTEGER NOT NULL DEFAULT 0,
    employer_id INTEGER NOT NULL REFERENCES employers(employer_id),
    vacancy_url TEXT NOT NULL
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX idx_vacancies_employer ON vacancies(employer_id)",
    "CREATE INDEX idx_vacancies_salary ON vacancies(salary)",
];

pub const INSERT_EMPLOYER: &str = r#"
INSERT INTO employers (employer_id, employer_name, url, open_vacancies)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const INSERT_VACANCY: &str = r#"
INSERT INTO vacancies (vacancy_id, vacancy_name, vacancy_area, salary, employer_id, vacancy_url)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

/// All schema creation statements, employers first
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_EMPLOYERS_TABLE, CREATE_VACANCIES_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
