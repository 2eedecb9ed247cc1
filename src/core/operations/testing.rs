//! Test doubles for the bulk operations.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use super::prompt::{ConflictDecision, ConflictPrompt};
use crate::core::filesystem::{DirListing, FsOps, LocalFs};

/// One question the prompt was asked.
#[derive(Clone, Debug)]
pub struct Asked {
    pub title: String,
    pub message: String,
    pub options: Vec<ConflictDecision>,
}

/// Answers from a queue and records every question.
///
/// Panics when asked more often than it has answers, so an unexpected
/// prompt fails the test instead of hanging.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<ConflictDecision>,
    pub asked: Vec<Asked>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = ConflictDecision>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl ConflictPrompt for ScriptedPrompt {
    fn ask(&mut self, title: &str, message: &str, options: &[ConflictDecision]) -> ConflictDecision {
        self.asked.push(Asked {
            title: title.to_string(),
            message: message.to_string(),
            options: options.to_vec(),
        });
        self.answers
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected prompt: {title}: {message}"))
    }
}

/// Local filesystem where named entries fail a set number of times.
///
/// Failures are keyed by file name and apply to copy (as the source) and
/// removal.
#[derive(Debug, Default)]
pub struct FlakyFs {
    failures: RefCell<HashMap<String, (ErrorKind, usize)>>,
    pub attempts: RefCell<Vec<PathBuf>>,
}

impl FlakyFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make operations on `name` fail `times` times with `kind`.
    pub fn fail(self, name: &str, kind: ErrorKind, times: usize) -> Self {
        self.failures.borrow_mut().insert(name.to_string(), (kind, times));
        self
    }

    fn check(&self, path: &Path) -> io::Result<()> {
        self.attempts.borrow_mut().push(path.to_path_buf());
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return Ok(());
        };
        let mut failures = self.failures.borrow_mut();
        match failures.get_mut(&name) {
            Some((kind, times)) if *times > 0 => {
                *times -= 1;
                Err(io::Error::new(*kind, format!("{name} is locked")))
            }
            _ => Ok(()),
        }
    }
}

impl FsOps for FlakyFs {
    fn list_dir(&self, dir: &Path) -> io::Result<DirListing> {
        self.check(dir)?;
        LocalFs.list_dir(dir)
    }

    fn exists(&self, path: &Path) -> bool {
        LocalFs.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        LocalFs.is_dir(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        LocalFs.is_symlink(path)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        LocalFs.create_dir(path)
    }

    fn copy_file(&self, from: &Path, to: &Path, overwrite: bool) -> io::Result<()> {
        self.check(from)?;
        LocalFs.copy_file(from, to, overwrite)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        LocalFs.remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        LocalFs.remove_dir(path)
    }
}

/// Write `content` at `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}
