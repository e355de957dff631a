//! Size limit violation classification.
//!
//! Pure inspection of a failed decode: which of the two configured limits was
//! exceeded, and by how much. Runs inside the error-handling path, so it can
//! never fail itself; anything unrecognizable is classified as [`ViolationKind::Unknown`].

use crate::upload::decode::{DecodeFailure, SizeLimitCause};

/// Which configured limit a rejected upload exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// A single part exceeded the per-part limit.
    PartLimitExceeded,

    /// The aggregate request size exceeded the total limit.
    RequestLimitExceeded,

    /// A size limit was exceeded but the specific kind could not be
    /// determined. Treated as a part-level rejection for messaging.
    Unknown,
}

/// Outcome of classifying a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeViolation {
    pub kind: ViolationKind,

    /// Offending size in bytes, when the failure carried one.
    pub actual_size_bytes: Option<u64>,
}

/// Classify a size-limit decode failure.
///
/// The typed cause wins when the decoder preserved one. Otherwise the kind is
/// inferred from the failure's message text: the substring `request`,
/// regardless of case, implies the total-request limit, anything else the
/// per-part limit. That check is a heuristic inherited from the upstream
/// decoder's message format, so the offending size is reported as unknown on
/// this path. The case-insensitive match covers the body cap's own wording
/// ("Request payload is too large"), a whole-request limit in kind.
pub fn classify(failure: &DecodeFailure) -> SizeViolation {
    match failure.cause() {
        Some(SizeLimitCause::PartSizeLimit { actual_size_bytes }) => SizeViolation {
            kind: ViolationKind::PartLimitExceeded,
            actual_size_bytes: Some(actual_size_bytes),
        },
        Some(SizeLimitCause::RequestSizeLimit { actual_size_bytes }) => SizeViolation {
            kind: ViolationKind::RequestLimitExceeded,
            actual_size_bytes: Some(actual_size_bytes),
        },
        None => match failure.message() {
            Some(message) if message.to_ascii_lowercase().contains("request") => SizeViolation {
                kind: ViolationKind::RequestLimitExceeded,
                actual_size_bytes: None,
            },
            Some(_) => SizeViolation {
                kind: ViolationKind::PartLimitExceeded,
                actual_size_bytes: None,
            },
            None => SizeViolation {
                kind: ViolationKind::Unknown,
                actual_size_bytes: None,
            },
        },
    }
}
