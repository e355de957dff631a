//! Multipart upload handling.
//!
//! # Data Flow
//! ```text
//! POST /multipartfileuploads
//!     → handler.rs (orchestration, response mapping)
//!     → decode.rs (multipart stream → parts, size limit enforcement)
//!       on violation:
//!     → classifier.rs (failure → violation kind + actual size)
//!     → metrics.rs (size observation into the matching distribution)
//! ```
//!
//! # Design Decisions
//! - A size violation is a terminal outcome for the request; no retries.
//! - Classification and metrics recording never fail: they run inside the
//!   error path and must not mask the original failure.
//! - Any non-size decode failure is surfaced with the decoder's own response
//!   and never touches the classifier or the distributions.

pub mod classifier;
pub mod decode;
pub mod handler;
pub mod metrics;

pub use classifier::{classify, SizeViolation, ViolationKind};
pub use decode::{DecodeError, DecodeFailure, SizeLimitCause, UploadedPart};
pub use metrics::UploadSizeMetrics;
