use colored::Colorize;
use std::process;

fn main() {
    if let Err(e) = project_actions::cli::run() {
        eprintln!("{} {}", "Error:".red(), e);
        process::exit(1);
    }
}
