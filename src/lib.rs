pub mod config;
pub mod error;
pub mod logger;
pub mod magicstudio;
pub mod models;
pub mod orchestrator;
pub mod server;

pub use config::{Config, UpstreamConfig};
pub use error::{RelayError, Result};
pub use magicstudio::{CredentialPair, MagicStudioClient};
pub use models::{ErrorBody, GenerationResult, UpstreamOutcome};
pub use orchestrator::Orchestrator;
