//! Stateful controller driving a license project.
//!
//! The workflow is driven by an external caller (a UI or a script). It asks
//! that caller for file paths through [`PathPrompt`], reports status through
//! [`StatusSink`] and returns a [`CommandOutcome`] from every command.
//!
//! Commands whose precondition does not hold (`save` without a product name,
//! `add_license` without keys) are unavailable: they change nothing and
//! report [`CommandOutcome::Unavailable`]. Callers should consult
//! [`ProjectWorkflow::can_save`] and [`ProjectWorkflow::can_add_license`]
//! before offering those commands at all.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::{get_config, FilesConfig, IssuanceConfig, RlicConfig};
use crate::errors::ProjectResult;
use crate::key_generation::{Ed25519Generator, KeyPairGenerator};
use crate::project::{License, Project};
use crate::store::{JsonProjectStore, ProjectStore};

/// What the caller should show in a file-selection dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDialogRequest {
    pub filter_name: String,
    /// Extension without the leading dot
    pub extension: String,
    /// Ask before replacing an existing file
    pub overwrite_prompt: bool,
}

impl FileDialogRequest {
    /// Dialog filter in `Label|*.ext` form, e.g. `Rhino License|*.rlic`.
    pub fn filter(&self) -> String {
        format!("{}|*.{}", self.filter_name, self.extension)
    }
}

/// Source of file paths, usually a dialog. `None` means the user declined.
pub trait PathPrompt {
    fn choose_open_path(&mut self, request: &FileDialogRequest) -> Option<PathBuf>;
    fn choose_save_path(&mut self, request: &FileDialogRequest) -> Option<PathBuf>;
}

/// Receiver of informational status messages.
pub trait StatusSink {
    fn update(&mut self, message: &str);
}

/// Result of a workflow command that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command ran and changed state.
    Completed,
    /// The caller declined to supply a path.
    Cancelled,
    /// The command's precondition does not hold; nothing changed.
    Unavailable,
}

/// Status text reported whenever a project becomes current.
pub fn load_status_message(project: &Project) -> String {
    format!("Loaded {} license(s).", project.license_count())
}

pub struct ProjectWorkflow {
    project: Option<Project>,
    bound_path: Option<PathBuf>,
    store: Box<dyn ProjectStore>,
    generator: Box<dyn KeyPairGenerator>,
    prompt: Box<dyn PathPrompt>,
    status: Box<dyn StatusSink>,
    issuance: IssuanceConfig,
    files: FilesConfig,
}

impl ProjectWorkflow {
    /// A workflow with the JSON store, the Ed25519 generator and default settings.
    pub fn new(prompt: Box<dyn PathPrompt>, status: Box<dyn StatusSink>) -> Self {
        Self {
            project: None,
            bound_path: None,
            store: Box::new(JsonProjectStore::new()),
            generator: Box::new(Ed25519Generator::new()),
            prompt,
            status,
            issuance: IssuanceConfig::default(),
            files: FilesConfig::default(),
        }
    }

    /// A workflow using the global configuration.
    pub fn from_config(
        prompt: Box<dyn PathPrompt>,
        status: Box<dyn StatusSink>,
    ) -> ProjectResult<Self> {
        let config = get_config()?;
        Ok(Self::new(prompt, status).with_config(config))
    }

    pub fn with_config(mut self, config: &RlicConfig) -> Self {
        self.issuance = config.issuance.clone();
        self.files = config.files.clone();
        self
    }

    pub fn with_store(mut self, store: Box<dyn ProjectStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_generator(mut self, generator: Box<dyn KeyPairGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    /// Direct access for caller edits such as the product name or license fields.
    pub fn project_mut(&mut self) -> Option<&mut Project> {
        self.project.as_mut()
    }

    pub fn bound_path(&self) -> Option<&Path> {
        self.bound_path.as_deref()
    }

    /// Replace the current project with an empty, unbound one.
    pub fn new_project(&mut self) {
        self.set_project(Project::default());
    }

    /// Make `project` current. It is not associated with any file yet.
    pub fn set_project(&mut self, project: Project) {
        self.bound_path = None;
        self.replace_project(project);
    }

    fn replace_project(&mut self, project: Project) {
        let message = load_status_message(&project);
        self.project = Some(project);
        self.status.update(&message);
    }

    pub fn open_dialog_request(&self) -> FileDialogRequest {
        FileDialogRequest {
            filter_name: self.files.filter_name.clone(),
            extension: self.files.extension.trim_start_matches('.').to_string(),
            overwrite_prompt: false,
        }
    }

    pub fn save_dialog_request(&self) -> FileDialogRequest {
        FileDialogRequest {
            overwrite_prompt: true,
            ..self.open_dialog_request()
        }
    }

    /// Ask the caller for a project file and load it.
    pub fn open(&mut self) -> ProjectResult<CommandOutcome> {
        let request = self.open_dialog_request();
        match self.prompt.choose_open_path(&request) {
            Some(path) => self.open_path(path),
            None => {
                log::debug!("Open cancelled");
                Ok(CommandOutcome::Cancelled)
            }
        }
    }

    /// Load `path`, replacing the current project and binding to the file.
    ///
    /// On failure the current project and binding are left as they were.
    pub fn open_path(&mut self, path: impl Into<PathBuf>) -> ProjectResult<CommandOutcome> {
        let path = path.into();
        let project = self.store.open(&path)?;

        log::info!(
            "Opened project '{}' from {}",
            project.product.name,
            path.display()
        );
        self.bound_path = Some(path);
        self.replace_project(project);
        Ok(CommandOutcome::Completed)
    }

    pub fn can_save(&self) -> bool {
        self.project.as_ref().is_some_and(Project::can_persist)
    }

    /// Save to the bound file, asking the caller for a destination first
    /// when the project is not bound yet.
    pub fn save(&mut self) -> ProjectResult<CommandOutcome> {
        if !self.can_save() {
            log::warn!("Save requested for a project without a product name; ignoring");
            return Ok(CommandOutcome::Unavailable);
        }

        let path = match &self.bound_path {
            Some(path) => path.clone(),
            None => {
                let request = self.save_dialog_request();
                match self.prompt.choose_save_path(&request) {
                    Some(path) => path,
                    None => {
                        log::debug!("Save cancelled");
                        return Ok(CommandOutcome::Cancelled);
                    }
                }
            }
        };

        self.save_as(path)
    }

    /// Save to `path` and bind the project to it.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> ProjectResult<CommandOutcome> {
        let project = match self.project.as_ref() {
            Some(project) if project.can_persist() => project,
            _ => {
                log::warn!("Save requested for a project without a product name; ignoring");
                return Ok(CommandOutcome::Unavailable);
            }
        };

        let path = path.into();
        self.store.save(project, &path)?;

        log::info!(
            "Saved project '{}' with {} license(s) to {}",
            project.product.name,
            project.license_count(),
            path.display()
        );
        self.bound_path = Some(path);
        Ok(CommandOutcome::Completed)
    }

    /// Generate a fresh key pair for the current product.
    ///
    /// Both halves are replaced together. A generation failure leaves the
    /// existing keys untouched.
    pub fn generate_key(&mut self) -> ProjectResult<CommandOutcome> {
        let Some(project) = self.project.as_mut() else {
            log::warn!("Key generation requested with no project loaded; ignoring");
            return Ok(CommandOutcome::Unavailable);
        };

        let pair = self.generator.generate()?;
        let fingerprint = pair.fingerprint();
        let product = &mut project.product;

        if let Some(previous) = product.set_key_pair(pair) {
            let issued = product.issued_licenses().len();
            if issued > 0 {
                log::warn!(
                    "Replaced key {} of '{}'; {} license(s) were issued under the old key",
                    previous.fingerprint(),
                    product.name,
                    issued
                );
            }
        }

        log::info!("Generated key {} for '{}'", fingerprint, product.name);
        Ok(CommandOutcome::Completed)
    }

    pub fn can_add_license(&self) -> bool {
        self.project
            .as_ref()
            .is_some_and(|p| p.product.can_issue_license())
    }

    /// Issue a license with default expiration, type and owner.
    pub fn add_license(&mut self) -> CommandOutcome {
        if !self.can_add_license() {
            log::warn!("License issuance requested before keys exist; ignoring");
            return CommandOutcome::Unavailable;
        }

        let Some(license) = License::issue_default(&self.issuance, Utc::now()) else {
            log::warn!(
                "Expiration {} day(s) from now is out of range; no license issued",
                self.issuance.trial_days
            );
            return CommandOutcome::Unavailable;
        };

        if let Some(project) = self.project.as_mut() {
            log::debug!(
                "Issued {} license for '{}' expiring {}",
                license.license_type,
                project.product.name,
                license.expiration_date
            );
            project.product.add_license(license);
        }

        CommandOutcome::Completed
    }
}
