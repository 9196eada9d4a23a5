// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task file loading from layered sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_task_file(path)   toml or legacy json, by extension
//!   .with_env_prefix()     GITAUTO_BRANCH=dev -> branch = "dev"
//!   .set()                 CLI overrides
//!        |
//!        v
//!    build() --> TaskFile
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{File, FileFormat};

use super::TaskFile;
use crate::error::{ConfigError, Result};

/// Layers a task file, `GITAUTO_*` variables and CLI overrides, later wins.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    files: Vec<PathBuf>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            files: Vec::new(),
        }
    }

    /// Adds a required task file. `.json` files use the legacy JSON format.
    #[must_use]
    pub fn add_task_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let p = path.as_ref();
        let format = if p.extension().is_some_and(|ext| ext == "json") {
            FileFormat::Json
        } else {
            FileFormat::Toml
        };
        self.builder = self
            .builder
            .add_source(File::from(p).format(format).required(true));
        self.files.push(p.to_path_buf());
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self
    }

    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Overrides `key` above every file and environment source.
    ///
    /// # Errors
    ///
    /// Fails when `key` is not a valid config path.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .with_context(|| format!("invalid override key '{key}'"))?;
        Ok(self)
    }

    /// Sets an override only when `value` is present.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::set`].
    pub fn set_opt<T: Into<config::Value>>(self, key: &str, value: Option<T>) -> Result<Self> {
        match value {
            Some(value) => self.set(key, value),
            None => Ok(self),
        }
    }

    /// Builds the task file from all added sources.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` if a file is missing, malformed, or does
    /// not match the task file structure.
    pub fn build(self) -> Result<TaskFile> {
        let origin = self
            .files
            .last()
            .map_or_else(|| "<inline>".to_string(), |p| p.display().to_string());
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .try_parsing(true),
            ),
            None => self.builder,
        };
        let parsed = builder
            .build()
            .and_then(|cfg| cfg.try_deserialize::<TaskFile>())
            .map_err(|e| ConfigError::ParseError {
                path: origin,
                message: e.to_string(),
            })?;
        Ok(parsed)
    }

    #[must_use]
    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
