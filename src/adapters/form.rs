use crate::domain::model::VisitorEntry;
use crate::domain::ports::FormController;
use crate::utils::error::{GuardError, Result};
use chrono::{DateTime, Local};
use uuid::Uuid;

/// Visitor registration form state. Scans fill name, id and phone; the rest
/// is entered by the guard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitorForm {
    pub full_name: String,
    pub id_number: String,
    pub phone: String,
    pub company: String,
    pub purpose: String,
    pub host_name: String,
}

impl VisitorForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Registers the visitor and resets the form. Name and id number are
    /// required; on failure the form keeps its contents.
    pub fn submit(&mut self, at: DateTime<Local>) -> Result<VisitorEntry> {
        for (field, value) in [("full_name", &self.full_name), ("id_number", &self.id_number)] {
            if value.trim().is_empty() {
                return Err(GuardError::MissingField {
                    field: field.to_string(),
                });
            }
        }

        let entry = VisitorEntry {
            badge: badge_code(),
            full_name: self.full_name.trim().to_string(),
            id_number: self.id_number.trim().to_string(),
            phone: self.phone.trim().to_string(),
            company: self.company.trim().to_string(),
            purpose: self.purpose.trim().to_string(),
            host_name: self.host_name.trim().to_string(),
            logged_at: at,
        };
        tracing::info!("Visitor logged, badge {}", entry.badge);

        self.clear();
        Ok(entry)
    }
}

impl FormController for VisitorForm {
    fn set_name(&mut self, name: &str) {
        self.full_name = name.to_string();
    }

    fn set_id_number(&mut self, id_number: &str) {
        self.id_number = id_number.to_string();
    }

    fn set_phone(&mut self, phone: &str) {
        self.phone = phone.to_string();
    }
}

const BADGE_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// `VIS-` followed by four base-36 characters (`0-9A-Z`).
pub fn badge_code() -> String {
    // low bits of a v4 uuid are random; version and variant bits sit higher up
    let mut bits = Uuid::new_v4().as_u128();
    let mut code = String::with_capacity(8);
    code.push_str("VIS-");
    for _ in 0..4 {
        code.push(BADGE_ALPHABET[(bits % 36) as usize] as char);
        bits /= 36;
    }
    code
}
