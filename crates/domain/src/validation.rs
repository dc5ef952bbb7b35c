// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;

use crate::error::DomainError;

/// Validates a single ticket code.
///
/// # Errors
///
/// Returns `InvalidTicketCode` if the code is blank.
pub fn validate_ticket_code(code: &str) -> Result<(), DomainError> {
    if code.trim().is_empty() {
        return Err(DomainError::InvalidTicketCode);
    }
    Ok(())
}

/// Validates a batch of ticket codes before issuance.
///
/// Rejects the whole batch if it is empty, if any code is blank, or if any
/// code repeats within the batch. Uniqueness against tickets already stored
/// for the room is checked separately by the store.
///
/// # Errors
///
/// - `EmptyTicketBatch` if `codes` is empty
/// - `InvalidTicketCode` if any code is blank
/// - `TicketDuplicate` naming the first repeated code
pub fn validate_ticket_batch(codes: &[String]) -> Result<(), DomainError> {
    if codes.is_empty() {
        return Err(DomainError::EmptyTicketBatch);
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(codes.len());
    for code in codes {
        validate_ticket_code(code)?;
        if !seen.insert(code.as_str()) {
            return Err(DomainError::TicketDuplicate { code: code.clone() });
        }
    }

    Ok(())
}

/// Validates a candidate or sub-candidate name.
///
/// # Errors
///
/// Returns `InvalidCandidateName` if the name is blank.
pub fn validate_candidate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidCandidateName);
    }
    Ok(())
}

/// Validates the fields of a new admin account.
///
/// # Errors
///
/// - `InvalidUsername` if the username is blank
/// - `InvalidQuota` if either ceiling is negative
pub fn validate_admin_fields(
    username: &str,
    max_room: i64,
    max_voters: i64,
) -> Result<(), DomainError> {
    if username.trim().is_empty() {
        return Err(DomainError::InvalidUsername);
    }
    validate_quota_ceiling("max_room", max_room)?;
    validate_quota_ceiling("max_voters", max_voters)
}

/// Validates one admin ceiling (`max_room` or `max_voters`).
///
/// # Errors
///
/// Returns `InvalidQuota` if the value is negative.
pub const fn validate_quota_ceiling(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value < 0 {
        return Err(DomainError::InvalidQuota { field, value });
    }
    Ok(())
}
