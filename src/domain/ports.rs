use crate::domain::model::RawScanPayload;
use crate::utils::error::Result;
use async_trait::async_trait;

/// A scanner or tag reader. Each call waits for the next scan event;
/// `Ok(None)` means the device was closed and no more payloads will arrive.
#[async_trait]
pub trait ScanSource: Send {
    async fn next_payload(&mut self) -> Result<Option<RawScanPayload>>;
}

/// Mutation surface of a screen's form state.
pub trait FormController {
    fn set_name(&mut self, name: &str);
    fn set_id_number(&mut self, id_number: &str);
    fn set_phone(&mut self, phone: &str);
}

pub trait ConfigProvider: Send + Sync {
    fn tag_prefix(&self) -> &str;
    fn raw_id_fallback(&self) -> bool;
}
