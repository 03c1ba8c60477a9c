pub mod assistants;
pub mod client;
pub mod config;
pub mod connector_setup;
pub mod connectors;
pub mod documents;
pub mod embedding_models;
pub mod error;
pub mod evaluation;
pub mod google;
pub mod health;
pub mod llms;
pub mod projector;
pub mod teams;
pub mod telemetry;
pub mod types;
pub mod upload;
pub mod users;

pub use client::{ApiClient, QueryParams};
pub use config::{ClientSettings, ConfigError};
pub use connector_setup::{ConnectorDraft, ConnectorSetup, GoogleReadiness, SetupError};
pub use documents::Document;
pub use error::ApiError;
pub use google::{
    GoogleService, LinkError, LinkOutcome, MessageBus, OAuthCoordinator, PopupHandle,
    PopupLauncher,
};
pub use types::{ActionResult, PageRequest, Pagination};
pub use upload::{UploadCoordinator, UploadError, UploadFile, UploadOptions};
