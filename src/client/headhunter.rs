//! HeadHunter API client
//!
//! Blocking HTTP against two endpoints:
//! - `GET /vacancies?employer_id={id}&page=0&per_page={n}` (first page only)
//! - `GET /employers/{id}`
//!
//! No retry, no rate limiting, no pagination past the first page. The first
//! failing request aborts the whole fetch.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::Value;

use super::JobSource;
use crate::config::VacancyConfig;
use crate::{Error, Result};

/// Client for the HeadHunter public API.
pub struct HeadHunterClient {
    client: Client,
    base_url: Url,
    employer_ids: Vec<u64>,
    per_page: u32,
}

impl HeadHunterClient {
    /// Default page size; also the API's maximum.
    pub const DEFAULT_PER_PAGE: u32 = 100;

    /// Create a client for `base_url` that will query `employer_ids`.
    pub fn new(
        base_url: &str,
        employer_ids: Vec<u64>,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            employer_ids,
            per_page: Self::DEFAULT_PER_PAGE,
        })
    }

    /// Build a client from the loaded configuration.
    pub fn from_config(config: &VacancyConfig) -> Result<Self> {
        let client = Self::new(
            &config.api_base_url,
            config.employer_ids.clone(),
            &config.user_agent,
            config.timeout_secs.map(Duration::from_secs),
        )?;
        Ok(client.with_per_page(config.per_page))
    }

    /// Override the page size (clamped to 1..=100).
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, Self::DEFAULT_PER_PAGE);
        self
    }

    pub fn employer_ids(&self) -> &[u64] {
        &self.employer_ids
    }

    /// Fetch the first page of vacancies for every employer.
    pub fn get_vacancies(&self) -> Result<Vec<Value>> {
        let mut vacancies = Vec::new();

        for &employer_id in &self.employer_ids {
            let page = self.first_page(employer_id)?;

            if page.is_truncated() {
                tracing::warn!(
                    "Employer {} has {} vacancies, only the first {} were fetched",
                    employer_id,
                    page.found,
                    page.items.len()
                );
            }

            tracing::debug!("Employer {}: {} vacancies", employer_id, page.items.len());
            vacancies.extend(page.items);
        }

        tracing::debug!("Fetched {} vacancies for {} employers", vacancies.len(), self.employer_ids.len());
        Ok(vacancies)
    }

    /// First page of the vacancy search for one employer.
    pub fn first_page(&self, employer_id: u64) -> Result<SearchPage> {
        let url = self.vacancies_url(employer_id)?;
        tracing::debug!("GET {}", url);

        let body = self.get_json(url.clone())?;
        SearchPage::from_body(body, &url)
    }

    /// Fetch one profile per employer id.
    pub fn get_employees(&self) -> Result<Vec<Value>> {
        let mut employers = Vec::with_capacity(self.employer_ids.len());

        for &employer_id in &self.employer_ids {
            let url = self.employer_url(employer_id)?;
            tracing::debug!("GET {}", url);
            employers.push(self.get_json(url)?);
        }

        tracing::debug!("Fetched {} employer profiles", employers.len());
        Ok(employers)
    }

    fn vacancies_url(&self, employer_id: u64) -> Result<Url> {
        let mut url = join(&self.base_url, "vacancies")?;
        url.query_pairs_mut()
            .append_pair("employer_id", &employer_id.to_string())
            .append_pair("page", "0")
            .append_pair("per_page", &self.per_page.to_string());
        Ok(url)
    }

    fn employer_url(&self, employer_id: u64) -> Result<Url> {
        join(&self.base_url, &format!("employers/{}", employer_id))
    }

    fn get_json(&self, url: Url) -> Result<Value> {
        let value = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .json::<Value>()?;
        Ok(value)
    }
}

impl JobSource for HeadHunterClient {
    fn fetch_vacancies(&self) -> Result<Vec<Value>> {
        self.get_vacancies()
    }

    fn fetch_employers(&self) -> Result<Vec<Value>> {
        self.get_employees()
    }
}

/// Parse the base URL, forcing a trailing slash so `join` appends.
fn parse_base_url(base_url: &str) -> Result<Url> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };

    Url::parse(&normalized).map_err(|e| Error::Api {
        url: base_url.to_string(),
        reason: format!("invalid base URL: {}", e),
    })
}

fn join(base: &Url, path: &str) -> Result<Url> {
    base.join(path).map_err(|e| Error::Api {
        url: base.to_string(),
        reason: e.to_string(),
    })
}

/// One page of a vacancy search response
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub items: Vec<Value>,
    /// Total matches reported upstream, `items.len()` when absent
    pub found: u64,
}

impl SearchPage {
    /// Pull `items` (and `found`, when present) out of a search response.
    fn from_body(body: Value, url: &Url) -> Result<Self> {
        let Value::Object(mut body) = body else {
            return Err(Error::Api {
                url: url.to_string(),
                reason: "expected a JSON object".to_string(),
            });
        };

        let items = match body.remove("items") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(Error::Api {
                    url: url.to_string(),
                    reason: "missing `items` array".to_string(),
                });
            }
        };

        let found = body
            .get("found")
            .and_then(Value::as_u64)
            .unwrap_or(items.len() as u64);

        Ok(Self { items, found })
    }

    /// More vacancies exist than this page holds
    pub fn is_truncated(&self) -> bool {
        self.found > self.items.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client() -> HeadHunterClient {
        HeadHunterClient::new("https://api.hh.ru", vec![3776, 1122462], "vacancydb-test", None).unwrap()
    }

    #[test]
    fn test_vacancies_url() {
        let url = client().vacancies_url(3776).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.hh.ru/vacancies?employer_id=3776&page=0&per_page=100"
        );
    }

    #[test]
    fn test_employer_url() {
        let url = client().employer_url(1122462).unwrap();
        assert_eq!(url.as_str(), "https://api.hh.ru/employers/1122462");
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let client = HeadHunterClient::new("http://localhost:8080/hh/", vec![1], "ua", None).unwrap();
        let url = client.employer_url(1).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/hh/employers/1");
    }

    #[test]
    fn test_per_page_clamped() {
        let client = client().with_per_page(500);
        let url = client.vacancies_url(1).unwrap();
        assert!(url.as_str().ends_with("per_page=100"));

        let client = client.with_per_page(0);
        let url = client.vacancies_url(1).unwrap();
        assert!(url.as_str().ends_with("per_page=1"));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HeadHunterClient::new("not a url", vec![], "ua", None).err().unwrap();
        assert!(matches!(err, Error::Api { .. }));
    }

    #[test]
    fn test_search_page_from_body() {
        let url = Url::parse("https://api.hh.ru/vacancies").unwrap();
        let body = json!({
            "items": [{"id": "1"}, {"id": "2"}],
            "found": 250,
            "pages": 3,
            "page": 0
        });

        let page = SearchPage::from_body(body, &url).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0]["id"], "1");
        assert_eq!(page.found, 250);
        assert!(page.is_truncated());
    }

    #[test]
    fn test_search_page_without_items() {
        let url = Url::parse("https://api.hh.ru/vacancies").unwrap();
        let err = SearchPage::from_body(json!({"errors": []}), &url).unwrap_err();
        assert!(matches!(err, Error::Api { .. }));

        assert!(SearchPage::from_body(json!([]), &url).is_err());
    }

    // ===== Requests against a mock server =====

    fn vacancy(id: &str, employer_id: &str) -> Value {
        json!({
            "id": id,
            "name": format!("Vacancy {}", id),
            "area": {"name": "Москва"},
            "salary": null,
            "employer": {"id": employer_id},
            "alternate_url": format!("https://hh.ru/vacancy/{}", id)
        })
    }

    fn search_query(employer_id: &str, per_page: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("employer_id".into(), employer_id.into()),
            Matcher::UrlEncoded("page".into(), "0".into()),
            Matcher::UrlEncoded("per_page".into(), per_page.into()),
        ])
    }

    fn mock_search(server: &mut mockito::Server, employer_id: &str, body: Value) -> mockito::Mock {
        server
            .mock("GET", "/vacancies")
            .match_query(search_query(employer_id, "100"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(1)
            .create()
    }

    fn mock_client(server: &mockito::Server, employer_ids: Vec<u64>) -> HeadHunterClient {
        HeadHunterClient::new(&server.url(), employer_ids, "vacancydb-test", None).unwrap()
    }

    #[test]
    fn test_get_vacancies_concatenates_employers() {
        let mut server = mockito::Server::new();
        let first = mock_search(&mut server, "1", json!({
            "items": [vacancy("10", "1"), vacancy("11", "1")], "found": 2
        }));
        let second = mock_search(&mut server, "2", json!({
            "items": [vacancy("20", "2")], "found": 1
        }));

        let vacancies = mock_client(&server, vec![1, 2]).get_vacancies().unwrap();

        let ids: Vec<&str> = vacancies.iter().map(|v| v["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["10", "11", "20"]);
        assert_eq!(vacancies[0], vacancy("10", "1"));
        first.assert();
        second.assert();
    }

    #[test]
    fn test_get_vacancies_uses_configured_page_size() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/vacancies")
            .match_query(search_query("7", "20"))
            .with_status(200)
            .with_body(json!({"items": [], "found": 0}).to_string())
            .expect(1)
            .create();

        let client = mock_client(&server, vec![7]).with_per_page(20);
        assert!(client.get_vacancies().unwrap().is_empty());
        mock.assert();
    }

    #[test]
    fn test_first_page_reports_truncation() {
        let mut server = mockito::Server::new();
        let _mock = mock_search(&mut server, "1", json!({
            "items": [vacancy("10", "1")], "found": 340, "pages": 4
        }));

        let page = mock_client(&server, vec![1]).first_page(1).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.found, 340);
        assert!(page.is_truncated());
    }

    #[test]
    fn test_get_vacancies_missing_items_aborts() {
        let mut server = mockito::Server::new();
        let _first = mock_search(&mut server, "1", json!({"items": [vacancy("10", "1")]}));
        let _second = mock_search(&mut server, "2", json!({"errors": [{"type": "not_found"}]}));

        let err = mock_client(&server, vec![1, 2]).get_vacancies().unwrap_err();
        assert!(matches!(err, Error::Api { .. }));
    }

    #[test]
    fn test_get_employees_one_request_per_id() {
        let mut server = mockito::Server::new();
        let mocks: Vec<mockito::Mock> = [3776, 1122462]
            .iter()
            .map(|id| {
                server
                    .mock("GET", format!("/employers/{}", id).as_str())
                    .with_status(200)
                    .with_header("content-type", "application/json")
                    .with_body(json!({
                        "id": id.to_string(),
                        "name": format!("Employer {}", id),
                        "alternate_url": format!("https://hh.ru/employer/{}", id),
                        "open_vacancies": 5
                    }).to_string())
                    .expect(1)
                    .create()
            })
            .collect();

        let employers = mock_client(&server, vec![3776, 1122462]).get_employees().unwrap();
        assert_eq!(employers.len(), 2);
        assert_eq!(employers[0]["id"], "3776");
        assert_eq!(employers[1]["name"], "Employer 1122462");
        for mock in &mocks {
            mock.assert();
        }
    }

    #[test]
    fn test_server_error_is_http_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/employers/1")
            .with_status(500)
            .with_body("internal error")
            .create();

        let err = mock_client(&server, vec![1]).get_employees().unwrap_err();
        match err {
            Error::Http(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(500)),
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[test]
    fn test_source_trait_delegates() {
        let mut server = mockito::Server::new();
        let _search = mock_search(&mut server, "1", json!({"items": [vacancy("10", "1")]}));
        let _profile = server
            .mock("GET", "/employers/1")
            .with_status(200)
            .with_body(json!({"id": "1", "name": "Acme", "alternate_url": "u", "open_vacancies": 1}).to_string())
            .create();

        let source: &dyn JobSource = &mock_client(&server, vec![1]);
        assert_eq!(source.fetch_vacancies().unwrap().len(), 1);
        assert_eq!(source.fetch_employers().unwrap()[0]["name"], "Acme");
    }
}
