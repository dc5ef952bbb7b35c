// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Text encoding for stored timestamps.
//!
//! Timestamps are stored as fixed-width UTC strings with microsecond
//! precision, so lexical order in SQL matches chronological order.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::PersistenceError;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
);

/// Encodes an instant for storage.
///
/// # Errors
///
/// Returns an error if the instant cannot be formatted (e.g. a year outside
/// four digits).
pub fn encode(instant: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(instant.to_offset(UtcOffset::UTC).format(TIMESTAMP_FORMAT)?)
}

/// Encodes an optional instant for storage.
///
/// # Errors
///
/// Returns an error if the instant cannot be formatted.
pub fn encode_opt(instant: Option<OffsetDateTime>) -> Result<Option<String>, PersistenceError> {
    instant.map(encode).transpose()
}

/// Decodes a stored instant.
///
/// # Errors
///
/// Returns an error if the text is not in the storage format.
pub fn decode(text: &str) -> Result<OffsetDateTime, PersistenceError> {
    Ok(PrimitiveDateTime::parse(text, TIMESTAMP_FORMAT)?.assume_utc())
}

/// Decodes an optional stored instant.
///
/// # Errors
///
/// Returns an error if the text is present but not in the storage format.
pub fn decode_opt(text: Option<&str>) -> Result<Option<OffsetDateTime>, PersistenceError> {
    text.map(decode).transpose()
}
