//! Shared primitive types used across the entire crate.

/// Sequential identifier of one service-desk contact.
pub type InquiryId = u64;

/// Minutes, as recorded in the interaction table (one decimal place).
pub type Minutes = f64;

/// Canonical label of a categorical column value (department, channel, ...).
pub type Label = String;
