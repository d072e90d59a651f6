//! Interactive query menu
//!
//! Single-character commands read line by line:
//! `1`-`5` run the five queries, `0` closes the connection and exits.
//! End of input behaves like `0`.

use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::Result;
use crate::query::QueryService;
use crate::ui::render_rows;

pub const MENU_TEXT: &str = "\
1 - companies and the number of vacancies at each
2 - all vacancies with company, title, salary and link
3 - average salary across all vacancies
4 - vacancies paying above the average
5 - vacancies whose title contains a keyword
0 - exit";

pub const NO_SUCH_OPTION: &str = "No such option!";
pub const KEYWORD_PROMPT: &str = "Enter a keyword: ";
pub const FAREWELL: &str = "Thank you for using vacancydb!";

/// A parsed menu choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Companies,
    Vacancies,
    AverageSalary,
    AboveAverage,
    Keyword,
    Exit,
}

impl FromStr for MenuCommand {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuCommand::Companies),
            "2" => Ok(MenuCommand::Vacancies),
            "3" => Ok(MenuCommand::AverageSalary),
            "4" => Ok(MenuCommand::AboveAverage),
            "5" => Ok(MenuCommand::Keyword),
            "0" => Ok(MenuCommand::Exit),
            other => Err(format!("unknown menu option: {:?}", other)),
        }
    }
}

/// Format the average-salary answer
pub fn format_average(avg: Option<f64>) -> String {
    match avg {
        Some(avg) => format!("Average salary: {:.2}", avg),
        None => "No vacancies loaded.".to_string(),
    }
}

pub struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Serve commands until `0` or end of input, then close the service.
    pub fn run(mut self, service: QueryService) -> Result<()> {
        writeln!(self.output, "{}", MENU_TEXT)?;

        loop {
            let Some(line) = self.read_line()? else {
                tracing::debug!("Input closed, leaving menu");
                break;
            };

            match line.parse::<MenuCommand>() {
                Ok(MenuCommand::Exit) => break,
                Ok(command) => self.execute(&service, command)?,
                Err(e) => {
                    tracing::debug!("{}", e);
                    writeln!(self.output, "{}", NO_SUCH_OPTION)?;
                }
            }
        }

        service.close()?;
        writeln!(self.output, "{}", FAREWELL)?;
        self.output.flush()?;
        Ok(())
    }

    fn execute(&mut self, service: &QueryService, command: MenuCommand) -> Result<()> {
        let rendered = match command {
            MenuCommand::Companies => render_rows(&service.companies_and_vacancies_count()?),
            MenuCommand::Vacancies => render_rows(&service.all_vacancies()?),
            MenuCommand::AverageSalary => format_average(service.avg_salary()?),
            MenuCommand::AboveAverage => render_rows(&service.vacancies_with_higher_salary()?),
            MenuCommand::Keyword => {
                write!(self.output, "{}", KEYWORD_PROMPT)?;
                self.output.flush()?;
                let keyword = self.read_line()?.unwrap_or_default();
                let keyword = keyword.trim_end_matches(['\r', '\n']);
                render_rows(&service.vacancies_with_keyword(keyword)?)
            }
            MenuCommand::Exit => return Ok(()),
        };

        writeln!(self.output, "{}", rendered)?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SchemaManager;
    use serde_json::json;

    fn service(dir: &tempfile::TempDir) -> QueryService {
        let manager = SchemaManager::new(dir.path().join("headhunter.db"));
        manager.create_database().unwrap();
        manager.create_tables().unwrap();
        manager
            .fill_in_tables(
                &[json!({"id": "1", "name": "Acme", "alternate_url": "u", "open_vacancies": 2})],
                &[
                    json!({"id": "10", "name": "Rust Developer", "area": {"name": "Remote"},
                           "salary": {"from": 1000}, "employer": {"id": "1"}, "alternate_url": "v10"}),
                    json!({"id": "11", "name": "Designer", "area": {"name": "Remote"},
                           "salary": null, "employer": {"id": "1"}, "alternate_url": "v11"}),
                ],
            )
            .unwrap();
        QueryService::open(manager.database()).unwrap()
    }

    fn run(input: &str) -> String {
        let dir = tempfile::tempdir().unwrap();
        let mut output = Vec::new();
        Menu::new(input.as_bytes(), &mut output).run(service(&dir)).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("1".parse::<MenuCommand>().unwrap(), MenuCommand::Companies);
        assert_eq!(" 5\n".parse::<MenuCommand>().unwrap(), MenuCommand::Keyword);
        assert_eq!("0".parse::<MenuCommand>().unwrap(), MenuCommand::Exit);
        assert!("6".parse::<MenuCommand>().is_err());
        assert!("11".parse::<MenuCommand>().is_err());
        assert!("".parse::<MenuCommand>().is_err());
    }

    #[test]
    fn test_average_and_exit() {
        let out = run("3\n0\n");
        assert!(out.starts_with(MENU_TEXT));
        assert!(out.contains("Average salary: 500.00"));
        assert!(out.trim_end().ends_with(FAREWELL));
    }

    #[test]
    fn test_invalid_option_reprompts() {
        let out = run("x\n9\n1\n0\n");
        assert_eq!(out.matches(NO_SUCH_OPTION).count(), 2);
        assert!(out.contains("Acme"));
    }

    #[test]
    fn test_keyword_search() {
        let out = run("5\nDEVELOPER\n0\n");
        assert!(out.contains(KEYWORD_PROMPT));
        assert!(out.contains("Rust Developer"));
        assert!(!out.contains("Designer"));
    }

    #[test]
    fn test_keyword_keeps_inner_spaces() {
        let out = run("5\n d\n0\n");
        assert!(out.contains("Rust Developer"));
        assert!(!out.contains("Designer"));

        let out = run("5\nrust d\r\n0\n");
        assert!(out.contains("Rust Developer"));

        let out = run("5\ndesigner \n0\n");
        assert!(out.contains("No results."));
    }

    #[test]
    fn test_above_average_and_listing() {
        let out = run("4\n0\n");
        assert!(out.contains("v10"));
        assert!(!out.contains("v11"));

        let out = run("2\n0\n");
        assert!(out.contains("v10"));
        assert!(out.contains("v11"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let out = run("1\n");
        assert!(out.contains("Acme"));
        assert!(out.trim_end().ends_with(FAREWELL));
    }

    #[test]
    fn test_format_average_empty() {
        assert_eq!(format_average(None), "No vacancies loaded.");
        assert_eq!(format_average(Some(1234.5)), "Average salary: 1234.50");
    }
}
