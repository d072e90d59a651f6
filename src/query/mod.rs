pub mod service;

pub use service::{CompanyVacancies, QueryService, VacancyListing};
