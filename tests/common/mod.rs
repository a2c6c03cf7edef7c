//! Scripted collaborators shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;

use rlic::errors::{ProjectError, ProjectResult};
use rlic::key_generation::{KeyPair, KeyPairGenerator};
use rlic::workflow::{FileDialogRequest, PathPrompt, ProjectWorkflow, StatusSink};

/// Answers dialogs from a queue and remembers what was asked.
#[derive(Clone, Default)]
pub struct ScriptedPrompt {
    pub answers: Rc<RefCell<VecDeque<Option<PathBuf>>>>,
    pub requests: Rc<RefCell<Vec<FileDialogRequest>>>,
}

impl ScriptedPrompt {
    pub fn answer(&self, path: Option<PathBuf>) {
        self.answers.borrow_mut().push_back(path);
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn next(&mut self, request: &FileDialogRequest) -> Option<PathBuf> {
        self.requests.borrow_mut().push(request.clone());
        self.answers.borrow_mut().pop_front().flatten()
    }
}

impl PathPrompt for ScriptedPrompt {
    fn choose_open_path(&mut self, request: &FileDialogRequest) -> Option<PathBuf> {
        self.next(request)
    }

    fn choose_save_path(&mut self, request: &FileDialogRequest) -> Option<PathBuf> {
        self.next(request)
    }
}

/// Collects status messages.
#[derive(Clone, Default)]
pub struct RecordingStatus {
    pub messages: Rc<RefCell<Vec<String>>>,
}

impl RecordingStatus {
    pub fn last(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.messages.borrow().len()
    }
}

impl StatusSink for RecordingStatus {
    fn update(&mut self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Generator whose entropy source is permanently unavailable.
pub struct BrokenGenerator;

impl KeyPairGenerator for BrokenGenerator {
    fn generate(&self) -> ProjectResult<KeyPair> {
        Err(ProjectError::KeyGeneration(
            "entropy source unavailable".to_string(),
        ))
    }
}

pub fn workflow() -> (ProjectWorkflow, ScriptedPrompt, RecordingStatus) {
    let prompt = ScriptedPrompt::default();
    let status = RecordingStatus::default();
    let workflow = ProjectWorkflow::new(Box::new(prompt.clone()), Box::new(status.clone()));
    (workflow, prompt, status)
}
