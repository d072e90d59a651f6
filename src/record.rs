//! Record types - table rows built from upstream API objects
//!
//! Upstream records are kept as raw `serde_json::Value`s until load time so
//! the JSON checkpoints stay byte-for-byte what the API returned. Mapping to
//! rows happens here:
//! - `Employer`: one row of the `employers` table
//! - `Vacancy`: one row of the `vacancies` table, salary normalized

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tabled::Tabled;

/// An employer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct Employer {
    #[tabled(rename = "ID")]
    pub employer_id: i64,
    #[tabled(rename = "Employer")]
    pub employer_name: String,
    #[tabled(rename = "URL")]
    pub url: String,
    #[tabled(rename = "Open vacancies")]
    pub open_vacancies: i64,
}

impl Employer {
    /// Map an upstream employer object to a row.
    ///
    /// Reads `id`, `name`, `alternate_url` and `open_vacancies`; any of them
    /// missing is an error.
    pub fn from_record(record: &Value) -> Result<Self> {
        let raw = ApiEmployer::deserialize(record)
            .map_err(|source| Error::Record { kind: "employer", source })?;

        Ok(Self {
            employer_id: raw.id,
            employer_name: raw.name,
            url: raw.alternate_url,
            open_vacancies: raw.open_vacancies,
        })
    }
}

/// A vacancy row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct Vacancy {
    #[tabled(rename = "ID")]
    pub vacancy_id: i64,
    #[tabled(rename = "Vacancy")]
    pub vacancy_name: String,
    #[tabled(rename = "Area")]
    pub vacancy_area: String,
    #[tabled(rename = "Salary")]
    pub salary: i64,
    #[tabled(rename = "Employer ID")]
    pub employer_id: i64,
    #[tabled(rename = "URL")]
    pub vacancy_url: String,
}

impl Vacancy {
    /// Map an upstream vacancy object to a row.
    ///
    /// Reads `id`, `name`, `area.name`, `salary.from`, `employer.id` and
    /// `alternate_url`. Only the salary may be absent.
    pub fn from_record(record: &Value) -> Result<Self> {
        let raw = ApiVacancy::deserialize(record)
            .map_err(|source| Error::Record { kind: "vacancy", source })?;

        Ok(Self {
            vacancy_id: raw.id,
            vacancy_name: raw.name,
            vacancy_area: raw.area.name,
            salary: normalize_salary(raw.salary.and_then(|s| s.from)),
            employer_id: raw.employer.id,
            vacancy_url: raw.alternate_url,
        })
    }
}

/// Collapse an optional `salary.from` into the stored integer.
///
/// A missing salary object and a missing or null `from` both become 0.
/// Currency, upper bound and gross/net flag are not retained.
pub fn normalize_salary(from: Option<i64>) -> i64 {
    from.unwrap_or(0)
}

#[derive(Deserialize)]
struct ApiEmployer {
    #[serde(deserialize_with = "de_id")]
    id: i64,
    name: String,
    alternate_url: String,
    open_vacancies: i64,
}

#[derive(Deserialize)]
struct ApiVacancy {
    #[serde(deserialize_with = "de_id")]
    id: i64,
    name: String,
    area: ApiArea,
    salary: Option<ApiSalary>,
    employer: ApiEmployerRef,
    alternate_url: String,
}

#[derive(Deserialize)]
struct ApiArea {
    name: String,
}

#[derive(Deserialize)]
struct ApiSalary {
    from: Option<i64>,
}

#[derive(Deserialize)]
struct ApiEmployerRef {
    #[serde(deserialize_with = "de_id")]
    id: i64,
}

/// HeadHunter sends ids as strings; numbers are accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i64, D::Error> {
    match RawId::deserialize(deserializer)? {
        RawId::Int(id) => Ok(id),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid id: {:?}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vacancy_json(salary: Value) -> Value {
        json!({
            "id": "93350139",
            "name": "Rust Developer",
            "area": {"id": "1", "name": "Москва"},
            "salary": salary,
            "employer": {"id": "3776", "name": "МТС"},
            "alternate_url": "https://hh.ru/vacancy/93350139"
        })
    }

    #[test]
    fn test_employer_from_record() {
        let record = json!({
            "id": "3776",
            "name": "МТС",
            "alternate_url": "https://hh.ru/employer/3776",
            "open_vacancies": 2500,
            "description": "<p>ignored</p>"
        });

        let employer = Employer::from_record(&record).unwrap();
        assert_eq!(employer.employer_id, 3776);
        assert_eq!(employer.employer_name, "МТС");
        assert_eq!(employer.url, "https://hh.ru/employer/3776");
        assert_eq!(employer.open_vacancies, 2500);
    }

    #[test]
    fn test_vacancy_salary_present() {
        let vacancy = Vacancy::from_record(&vacancy_json(json!({
            "from": 150000, "to": 250000, "currency": "RUR", "gross": false
        })))
        .unwrap();

        assert_eq!(vacancy.vacancy_id, 93350139);
        assert_eq!(vacancy.vacancy_area, "Москва");
        assert_eq!(vacancy.salary, 150000);
        assert_eq!(vacancy.employer_id, 3776);
    }

    #[test]
    fn test_vacancy_salary_normalized_to_zero() {
        let null_salary = Vacancy::from_record(&vacancy_json(Value::Null)).unwrap();
        assert_eq!(null_salary.salary, 0);

        let null_from = Vacancy::from_record(&vacancy_json(json!({"from": null, "to": 90000}))).unwrap();
        assert_eq!(null_from.salary, 0);

        let missing_from = Vacancy::from_record(&vacancy_json(json!({"to": 90000}))).unwrap();
        assert_eq!(missing_from.salary, 0);

        let mut no_salary_key = vacancy_json(Value::Null);
        no_salary_key.as_object_mut().unwrap().remove("salary");
        assert_eq!(Vacancy::from_record(&no_salary_key).unwrap().salary, 0);
    }

    #[test]
    fn test_numeric_ids_accepted() {
        let record = json!({
            "id": 10,
            "name": "Dev",
            "area": {"name": "Remote"},
            "salary": {"from": 1000},
            "employer": {"id": 1},
            "alternate_url": "u"
        });

        let vacancy = Vacancy::from_record(&record).unwrap();
        assert_eq!(vacancy.vacancy_id, 10);
        assert_eq!(vacancy.employer_id, 1);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let mut record = vacancy_json(Value::Null);
        record.as_object_mut().unwrap().remove("area");

        let err = Vacancy::from_record(&record).unwrap_err();
        assert!(matches!(err, Error::Record { kind: "vacancy", .. }));
    }

    #[test]
    fn test_bad_id_is_an_error() {
        let record = json!({
            "id": "not-a-number",
            "name": "Acme",
            "alternate_url": "u",
            "open_vacancies": 1
        });

        assert!(Employer::from_record(&record).is_err());
    }
}
