//! rlic - authoring core for software license projects.
//!
//! An operator defines a product, generates a signing key pair for it and
//! issues licenses (expiration, owner, license type) against it. Projects are
//! saved to and opened from `.rlic` files.
//!
//! # Example
//!
//! ```rust,ignore
//! use rlic::workflow::{CommandOutcome, ProjectWorkflow};
//! use rlic::project::Project;
//!
//! let mut workflow = ProjectWorkflow::new(Box::new(prompt), Box::new(status));
//! workflow.set_project(Project::new("Acme"));
//! workflow.generate_key()?;
//! assert_eq!(workflow.add_license(), CommandOutcome::Completed);
//! workflow.save_as("acme.rlic")?;
//! ```

pub mod config;
pub mod errors;
pub mod key_generation;
pub mod logging;
pub mod project;
pub mod store;
pub mod workflow;

pub use errors::{ProjectError, ProjectResult, StoreError};
pub use key_generation::{Ed25519Generator, KeyPair, KeyPairGenerator};
pub use project::{License, LicenseType, Product, Project};
pub use store::{JsonProjectStore, ProjectStore};
pub use workflow::{CommandOutcome, FileDialogRequest, PathPrompt, ProjectWorkflow, StatusSink};
