pub mod dispatcher;
pub mod identity_parser;
pub mod patrol;
pub mod session;

pub use crate::domain::model::{IdentityRecord, RawScanPayload, ScanOutcome};
pub use crate::domain::ports::{ConfigProvider, FormController, ScanSource};
pub use crate::utils::error::Result;
