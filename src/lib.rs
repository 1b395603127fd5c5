pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, ScanMode};

pub use adapters::{export::EntryLog, form::VisitorForm};
pub use config::toml_config::TomlConfig;
pub use crate::core::{
    dispatcher::{DispatchOptions, ScanDispatcher},
    identity_parser::parse_identity_barcode,
    patrol::{CheckpointDispatcher, PatrolRoster},
    session::{ScanSession, SessionReport},
};
pub use domain::model::{CheckpointOutcome, IdentityRecord, ScanOutcome};
pub use utils::error::{GuardError, Result};
