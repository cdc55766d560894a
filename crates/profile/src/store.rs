//! Profile store: the persisted style profile as a shared service object.
//!
//! The document is loaded lazily on first access: read from disk, or built
//! from defaults (and written back) when the file is missing or unreadable.
//! Afterwards the in-memory copy is authoritative. Every mutation updates it
//! and then overwrites the whole file.
//!
//! Mutations hold the write lock across modify + persist, so read-modify-write
//! cycles within one process are serialised. Two processes sharing the file
//! still race, and the last writer wins.

use crate::assembler;
use crate::classifier;
use crate::merge::MergeRules;
use crate::observation::{self, StyleObservation};
use std::path::{Path, PathBuf};
use stylecast_config::ProfileConfig;
use stylecast_core::error::ProfileError;
use stylecast_core::profile::{Primitive, StyleProfile};
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, error, info, warn};

/// Lifecycle of the in-memory document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Ready,
}

/// The outcome of a mutation: the value produced, and whether the new
/// document reached disk.
#[derive(Debug)]
pub struct Updated<T> {
    pub value: T,
    pub persist_error: Option<ProfileError>,
}

impl<T> Updated<T> {
    pub fn persisted(&self) -> bool {
        self.persist_error.is_none()
    }

    /// Treat a failed write as an error.
    pub fn into_result(self) -> Result<T, ProfileError> {
        match self.persist_error {
            None => Ok(self.value),
            Some(e) => Err(e),
        }
    }
}

pub struct ProfileStore {
    path: PathBuf,
    rules: MergeRules,
    profile: OnceCell<RwLock<StyleProfile>>,
}

impl ProfileStore {
    /// A store backed by `path`, with default merge rules.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rules: MergeRules::default(),
            profile: OnceCell::new(),
        }
    }

    pub fn from_config(config: &ProfileConfig) -> Self {
        Self::new(&config.path).with_rules(MergeRules {
            capacity: config.capacity,
            replace_threshold: config.replace_threshold,
        })
    }

    pub fn with_rules(mut self, rules: MergeRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rules(&self) -> &MergeRules {
        &self.rules
    }

    pub fn state(&self) -> StoreState {
        if self.profile.initialized() {
            StoreState::Ready
        } else {
            StoreState::Uninitialized
        }
    }

    async fn cell(&self) -> &RwLock<StyleProfile> {
        self.profile
            .get_or_init(|| async { RwLock::new(self.load_or_default()) })
            .await
    }

    fn load_or_default(&self) -> StyleProfile {
        match read_profile(&self.path) {
            Ok(profile) => {
                debug!(
                    path = %self.path.display(),
                    training_count = profile.training_count,
                    "Style profile loaded"
                );
                profile
            }
            Err(e) => {
                if self.path.exists() {
                    warn!(error = %e, "Style profile unreadable; starting from defaults");
                } else {
                    info!(path = %self.path.display(), "No style profile yet; creating default");
                }
                let profile = StyleProfile::default();
                if let Err(e) = write_profile(&self.path, &profile) {
                    error!(error = %e, "Could not persist default style profile");
                }
                profile
            }
        }
    }

    /// A copy of the current document.
    pub async fn snapshot(&self) -> StyleProfile {
        self.cell().await.read().await.clone()
    }

    /// Run `f` against the document and persist the result.
    ///
    /// `last_updated` is stamped after `f` runs. A failed write is reported in
    /// the returned value; the in-memory change stands either way.
    pub async fn update<R>(&self, f: impl FnOnce(&mut StyleProfile) -> R) -> Updated<R> {
        let mut profile = self.cell().await.write().await;
        let value = f(&mut profile);
        profile.touch();

        let persist_error = write_profile(&self.path, &profile).err();
        if let Some(e) = &persist_error {
            error!(error = %e, "Style profile changed in memory but not on disk");
        }
        Updated {
            value,
            persist_error,
        }
    }

    /// Fold one training observation into the profile. Returns the updated
    /// document.
    pub async fn apply(&self, observation: &StyleObservation, weight: f64) -> Updated<StyleProfile> {
        let rules = self.rules;
        self.update(|profile| {
            observation::apply(profile, observation, weight, &rules);
            profile.clone()
        })
        .await
    }

    pub async fn set_tone(&self, tone: impl Into<String>) -> Updated<()> {
        let tone = tone.into();
        self.update(|profile| profile.tone = tone).await
    }

    pub async fn set_voice(&self, voice: impl Into<String>) -> Updated<()> {
        let voice = voice.into();
        self.update(|profile| profile.voice = voice).await
    }

    /// Replace the primitive cached for a built-in topic.
    pub async fn set_primitive(
        &self,
        topic: &str,
        primitive: Primitive,
    ) -> Result<Updated<()>, ProfileError> {
        if !classifier::is_known_topic(topic) {
            return Err(ProfileError::InvalidInput(format!("unknown topic '{topic}'")));
        }
        if primitive.core_principle.trim().is_empty() {
            return Err(ProfileError::InvalidInput(
                "core principle must not be empty".into(),
            ));
        }
        let topic = topic.to_string();
        Ok(self
            .update(|profile| {
                profile.primitives.insert(topic, primitive);
            })
            .await)
    }

    /// Render `base_prompt` with the primitive for `topic`, if one is cached.
    pub async fn assemble(&self, base_prompt: &str, topic: Option<&str>) -> String {
        let profile = self.cell().await.read().await;
        assembler::assemble(base_prompt, topic, &profile)
    }
}

/// Read and parse the profile document.
pub fn read_profile(path: &Path) -> Result<StyleProfile, ProfileError> {
    let content = std::fs::read_to_string(path).map_err(|e| ProfileError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| ProfileError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Overwrite the profile document.
pub fn write_profile(path: &Path, profile: &StyleProfile) -> Result<(), ProfileError> {
    let write_err = |reason: String| ProfileError::Write {
        path: path.to_path_buf(),
        reason,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| write_err(format!("Failed to create profile directory: {e}")))?;
    }

    let json = serde_json::to_string_pretty(profile)
        .map_err(|e| write_err(format!("Failed to serialize profile: {e}")))?;

    std::fs::write(path, json).map_err(|e| write_err(e.to_string()))
}
