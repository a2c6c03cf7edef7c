//! Creates a project, generates its key pair, issues a license and saves it.
//!
//! Usage: `cargo run --example issue_license -- <product name> <file.rlic>`

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use rlic::config::init_config;
use rlic::logging::init_logging;
use rlic::workflow::{FileDialogRequest, PathPrompt, ProjectWorkflow, StatusSink};
use rlic::{CommandOutcome, Project};

/// Answers every save dialog with the path given on the command line.
struct FixedPath(PathBuf);

impl PathPrompt for FixedPath {
    fn choose_open_path(&mut self, _: &FileDialogRequest) -> Option<PathBuf> {
        Some(self.0.clone())
    }

    fn choose_save_path(&mut self, request: &FileDialogRequest) -> Option<PathBuf> {
        println!("Saving as {} ({})", self.0.display(), request.filter());
        Some(self.0.clone())
    }
}

struct PrintStatus;

impl StatusSink for PrintStatus {
    fn update(&mut self, message: &str) {
        println!("{message}");
    }
}

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let (Some(name), Some(path)) = (args.next(), args.next()) else {
        eprintln!("usage: issue_license <product name> <file.rlic>");
        return ExitCode::FAILURE;
    };

    let config = match init_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.logging);

    let mut workflow = ProjectWorkflow::new(
        Box::new(FixedPath(PathBuf::from(path))),
        Box::new(PrintStatus),
    )
    .with_config(config);
    workflow.set_project(Project::new(name));

    if let Err(e) = workflow.generate_key() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    if workflow.add_license() != CommandOutcome::Completed {
        eprintln!("license could not be issued");
        return ExitCode::FAILURE;
    }

    match workflow.save() {
        Ok(CommandOutcome::Completed) => {
            if let Some(key) = workflow.project().and_then(|p| p.product.key_pair()) {
                println!("Public key fingerprint: {}", key.fingerprint());
            }
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            eprintln!("nothing saved: {outcome:?}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
