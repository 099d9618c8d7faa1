//! Story files.
//!
//! A story file is the JSON form of everything the engine needs: the story
//! name, its configuration, its passages, and an optional start passage.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::StoryConfig;
use crate::error::{CoreError, CoreResult};
use crate::passage::{Passage, PassageId};

/// A complete story as handed over by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryData {
    /// Story title.
    pub name: String,
    /// Passage to start from. Falls back to the lowest pid when absent or
    /// unmatched.
    #[serde(default)]
    pub start_pid: Option<PassageId>,
    /// Story configuration.
    #[serde(default)]
    pub config: StoryConfig,
    /// Every authored passage.
    pub passages: Vec<Passage>,
}

impl StoryData {
    /// Decode a story from JSON.
    pub fn from_json(source: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Read and decode a story file.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// Check the configuration and the uniqueness of passage names and ids.
    pub fn validate(&self) -> CoreResult<()> {
        self.config.validate()?;

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for passage in &self.passages {
            if !ids.insert(passage.pid) {
                return Err(CoreError::Duplicate {
                    kind: "passage id",
                    key: passage.pid.0.to_string(),
                });
            }
            if !names.insert(passage.name.as_str()) {
                return Err(CoreError::Duplicate {
                    kind: "passage",
                    key: passage.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// The passage the story starts on: the configured one if it exists,
    /// otherwise the one with the lowest pid.
    pub fn start_passage(&self) -> Option<&Passage> {
        self.start_pid
            .and_then(|pid| self.passages.iter().find(|p| p.pid == pid))
            .or_else(|| self.passages.iter().min_by_key(|p| p.pid))
    }
}
