//! Routes an identity-document scan into form fields.
//!
//! Resolution order is fixed: the structured identity layout first, then the
//! informal `name|id|phone` layout, then (opt-in) a raw id capture. The
//! structured layout has to go first because its 13-digit leading token would
//! otherwise be read as a name by the legacy split.

use crate::core::identity_parser::{parse_identity_barcode, FIELD_DELIMITER};
use crate::domain::model::{LegacyFields, RawScanPayload, ScanOutcome};
use crate::domain::ports::{ConfigProvider, FormController};

pub const RAW_ID_MAX_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    pub raw_id_fallback: bool,
}

impl DispatchOptions {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            raw_id_fallback: config.raw_id_fallback(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Evaluating(RawScanPayload),
    Resolved(ScanOutcome),
}

/// One scan event. Moves `Idle -> Evaluating -> Resolved` exactly once; a new
/// scan needs a new instance.
#[derive(Debug)]
pub struct IdentityScan {
    options: DispatchOptions,
    state: DispatchState,
}

impl IdentityScan {
    pub fn new(options: DispatchOptions) -> Self {
        Self {
            options,
            state: DispatchState::Idle,
        }
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    /// Accepts the payload. Ignored unless the scan is still idle.
    pub fn receive(&mut self, payload: RawScanPayload) {
        if self.state == DispatchState::Idle {
            self.state = DispatchState::Evaluating(payload);
        }
    }

    /// Classifies the pending payload and writes recognized fields to `form`.
    /// Returns `None` if no payload was received.
    pub fn resolve<F: FormController + ?Sized>(&mut self, form: &mut F) -> Option<&ScanOutcome> {
        if let DispatchState::Evaluating(payload) = &self.state {
            let outcome = classify(payload.as_str(), self.options);
            apply_outcome(&outcome, form);
            self.state = DispatchState::Resolved(outcome);
        }
        match &self.state {
            DispatchState::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanDispatcher {
    options: DispatchOptions,
}

impl ScanDispatcher {
    pub fn new(options: DispatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> DispatchOptions {
        self.options
    }

    pub fn dispatch<F: FormController + ?Sized>(
        &self,
        payload: impl Into<RawScanPayload>,
        form: &mut F,
    ) -> ScanOutcome {
        let mut scan = IdentityScan::new(self.options);
        scan.receive(payload.into());
        scan.resolve(form).cloned().unwrap_or(ScanOutcome::Unrecognized)
    }
}

/// Pure classification step, no form access.
pub fn classify(payload: &str, options: DispatchOptions) -> ScanOutcome {
    if let Some(record) = parse_identity_barcode(payload) {
        tracing::debug!("Scan resolved via identity layout");
        return ScanOutcome::StructuredMatch(record);
    }

    if let Some(fields) = split_legacy(payload) {
        tracing::debug!(partial = fields.is_partial(), "Scan resolved via legacy layout");
        return ScanOutcome::LegacyMatch(fields);
    }

    if options.raw_id_fallback {
        let trimmed = payload.trim();
        if !trimmed.is_empty() {
            let id_number: String = trimmed.chars().take(RAW_ID_MAX_CHARS).collect();
            tracing::debug!("Scan captured as raw id");
            return ScanOutcome::RawIdCapture { id_number };
        }
    }

    tracing::warn!("Scan payload format not recognized ({} chars)", payload.chars().count());
    ScanOutcome::Unrecognized
}

/// `name|id|phone`. Requires at least one delimiter; blank positions are left
/// out. `None` when no position carries text.
pub fn split_legacy(payload: &str) -> Option<LegacyFields> {
    let parts: Vec<&str> = payload.split(FIELD_DELIMITER).collect();
    if parts.len() < 2 {
        return None;
    }

    let token = |i: usize| {
        parts
            .get(i)
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    };
    let fields = LegacyFields {
        name: token(0),
        id_number: token(1),
        phone: token(2),
    };

    if fields.is_empty() {
        None
    } else {
        Some(fields)
    }
}

/// Writes the recognized fields. `Unrecognized` touches nothing.
pub fn apply_outcome<F: FormController + ?Sized>(outcome: &ScanOutcome, form: &mut F) {
    match outcome {
        ScanOutcome::StructuredMatch(record) => {
            // a bare id carries no name; keep whatever the guard typed
            let full_name = record.full_name();
            if !full_name.is_empty() {
                form.set_name(&full_name);
            }
            form.set_id_number(&record.id_number);
        }
        ScanOutcome::LegacyMatch(fields) => {
            if let Some(name) = &fields.name {
                form.set_name(name);
            }
            if let Some(id_number) = &fields.id_number {
                form.set_id_number(id_number);
            }
            if let Some(phone) = &fields.phone {
                form.set_phone(phone);
            }
        }
        ScanOutcome::RawIdCapture { id_number } => form.set_id_number(id_number),
        ScanOutcome::Unrecognized => {}
    }
}
