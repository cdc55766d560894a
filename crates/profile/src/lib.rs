//! # Stylecast Profile
//!
//! The style-learning core: the persisted profile store, the weighted merge
//! that folds new observations into it, the keyword topic classifier, and
//! prompt assembly from cached per-topic primitives.
//!
//! [`StyleService`] ties these together with a [`Provider`] for training,
//! chat and rewrite.
//!
//! [`Provider`]: stylecast_core::Provider

pub mod assembler;
pub mod classifier;
pub mod corpus;
pub mod merge;
pub mod observation;
pub mod service;
pub mod store;
pub mod training;

pub use classifier::{NO_TOPIC, TopicScore, classify, classify_label};
pub use corpus::TrainingCorpus;
pub use merge::{CaseInsensitiveSubstring, MatchPolicy, MergeRules};
pub use observation::StyleObservation;
pub use service::{StyleReply, StyleService, TrainOutcome};
pub use store::{ProfileStore, StoreState, Updated};
pub use training::TrainingInput;
