use crate::ui::{theme, Icons};
use owo_colors::{OwoColorize, Style};

fn styled(text: &str, style: &Style) -> String {
    text.style(style.clone()).to_string()
}

pub fn header(text: &str) {
    println!("{} {}", Icons::ROCKET, styled(text, &theme().header));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, styled(label, &theme().success));
}

/// Errors and warnings go to stderr so tables on stdout stay pipeable
pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, styled(label, &theme().error));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, styled(label, &theme().warn));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        styled(Icons::INFO, &theme().info),
        styled(label, &theme().dim),
        value
    );
}

pub fn section(title: &str) {
    println!("\n━{}━", styled(title, &theme().header));
}

pub fn phase(name: &str) {
    println!(
        "\n{} {}",
        styled(Icons::GEAR, &theme().info),
        styled(name, &theme().header)
    );
}

pub fn timing(elapsed: &str) {
    println!("{} {}", styled(Icons::CLOCK, &theme().dim), elapsed);
}

/// Indented `label value` line under a status message
pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", styled(label, &theme().dim), value);
}
