//! Decoder for the pipe-delimited identity document barcode layout:
//! `<13-digit id>|<last>|<first>|<gender>|<nationality>|<date of birth>`.

use crate::domain::model::{IdentityRecord, DEFAULT_NATIONALITY};

pub const ID_NUMBER_LEN: usize = 13;
pub const FIELD_DELIMITER: char = '|';

/// Exactly 13 ASCII decimal digits, nothing else.
pub fn is_id_number(token: &str) -> bool {
    token.len() == ID_NUMBER_LEN && token.bytes().all(|b| b.is_ascii_digit())
}

/// Returns `None` when the payload is not in the identity layout. Never panics.
pub fn parse_identity_barcode(payload: &str) -> Option<IdentityRecord> {
    if payload.is_empty() {
        return None;
    }

    let parts: Vec<&str> = payload.split(FIELD_DELIMITER).collect();

    if parts.len() >= 3 && is_id_number(parts[0]) {
        let field = |i: usize| parts.get(i).copied().unwrap_or_default().to_string();
        let nationality = match parts.get(4) {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => DEFAULT_NATIONALITY.to_string(),
        };

        tracing::debug!("Identity layout matched with {} fields", parts.len());
        return Some(IdentityRecord {
            id_number: field(0),
            last_name: field(1),
            first_name: field(2),
            gender: field(3),
            nationality,
            date_of_birth: field(5),
        });
    }

    if is_id_number(payload) {
        tracing::debug!("Bare id number payload");
        return Some(IdentityRecord::id_only(payload));
    }

    None
}
