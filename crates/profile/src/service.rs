//! The style service: training, chat and rewrite on top of the profile store.
//!
//! The remote model is never called while the profile lock is held. Training
//! analyses first and merges afterwards; chat takes a snapshot, releases the
//! lock, then calls out.

use crate::assembler;
use crate::classifier::{self, NO_TOPIC};
use crate::corpus::TrainingCorpus;
use crate::observation::{self, StyleObservation};
use crate::store::ProfileStore;
use crate::training::TrainingInput;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use stylecast_config::AppConfig;
use stylecast_core::error::{ProfileError, ProviderError, Result};
use stylecast_core::profile::TrainingRecord;
use stylecast_core::provider::{Provider, ProviderRequest};
use tracing::{debug, info, warn};

/// Analysis wants stable JSON rather than prose.
const ANALYSIS_TEMPERATURE: f32 = 0.2;

/// Result of one accepted training call.
#[derive(Debug, Clone, Serialize)]
pub struct TrainOutcome {
    pub training_count: u64,
    pub average_weight: f64,
    pub weight: f64,
    /// The analysis was skipped because no credential is configured
    pub demo: bool,
    /// The updated profile reached disk
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_path: Option<PathBuf>,
}

/// A generated answer.
#[derive(Debug, Clone, Serialize)]
pub struct StyleReply {
    pub text: String,
    /// Topic whose primitive shaped the prompt, `"none"` otherwise
    pub topic: String,
    pub demo: bool,
}

pub struct StyleService {
    store: Arc<ProfileStore>,
    corpus: TrainingCorpus,
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl StyleService {
    pub fn new(store: Arc<ProfileStore>, corpus: TrainingCorpus, provider: Arc<dyn Provider>) -> Self {
        Self {
            store,
            corpus,
            provider,
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }

    pub fn from_config(config: &AppConfig, provider: Arc<dyn Provider>) -> Self {
        let store = Arc::new(ProfileStore::from_config(&config.profile));
        let corpus = TrainingCorpus::new(&config.profile.training_dir);
        Self::new(store, corpus, provider)
            .with_model(config.effective_model())
            .with_sampling(config.default_temperature, config.default_max_tokens)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn store(&self) -> &Arc<ProfileStore> {
        &self.store
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn is_demo(&self) -> bool {
        self.provider.is_demo()
    }

    /// Analyse `input`, fold the result into the profile, record the call.
    ///
    /// A failed analysis rejects the call: nothing is merged or counted.
    /// Without a credential the analysis is empty but the call still counts.
    pub async fn train(&self, input: TrainingInput) -> Result<TrainOutcome> {
        input.validate()?;
        let weight = input.effective_weight();
        let demo = self.provider.is_demo();

        let observation = if demo {
            debug!("Demo mode: skipping style analysis");
            StyleObservation::default()
        } else {
            self.analyse(&input.content).await?
        };

        let updated = self.store.apply(&observation, weight).await;
        let persisted = updated.persisted();
        let profile = updated.value;

        let record = input.to_record();
        let record_path = match self.corpus.write(&record) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "Training record not saved");
                None
            }
        };

        info!(
            source = %input.source,
            weight,
            training_count = profile.training_count,
            demo,
            "Training call accepted"
        );

        Ok(TrainOutcome {
            training_count: profile.training_count,
            average_weight: profile.average_weight,
            weight,
            demo,
            persisted,
            record_path,
        })
    }

    async fn analyse(&self, content: &str) -> std::result::Result<StyleObservation, ProviderError> {
        let request =
            ProviderRequest::instructed(&self.model, observation::analysis_instruction(), content)
                .with_temperature(ANALYSIS_TEMPERATURE)
                .with_max_tokens(self.max_tokens);
        let response = self.provider.complete(request).await?;
        observation::parse_observation(&response.message.content)
    }

    /// Answer `message` in the learned style.
    pub async fn respond(&self, message: &str) -> Result<StyleReply> {
        let topic = classifier::classify(message);
        let system = {
            let profile = self.store.snapshot().await;
            assembler::assemble(&assembler::style_instruction(&profile), topic, &profile)
        };
        debug!(topic = topic.unwrap_or(NO_TOPIC), "Responding");

        let text = self.generate(system, message).await?;
        Ok(StyleReply {
            text,
            topic: topic.unwrap_or(NO_TOPIC).to_string(),
            demo: self.provider.is_demo(),
        })
    }

    /// Rewrite `content` in the learned voice, keeping its meaning.
    pub async fn rewrite(&self, content: &str) -> Result<StyleReply> {
        if content.trim().is_empty() {
            return Err(ProfileError::InvalidInput("nothing to rewrite".into()).into());
        }
        let system = assembler::rewrite_instruction(&self.store.snapshot().await);
        let text = self.generate(system, content).await?;
        Ok(StyleReply {
            text,
            topic: NO_TOPIC.to_string(),
            demo: self.provider.is_demo(),
        })
    }

    async fn generate(&self, system: String, user: &str) -> std::result::Result<String, ProviderError> {
        let request = ProviderRequest::instructed(&self.model, system, user)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);
        let response = self.provider.complete(request).await?;
        Ok(response.message.content)
    }

    /// Every saved training record, oldest first.
    pub fn list_corpus(&self) -> Vec<TrainingRecord> {
        self.corpus.list()
    }
}
