//! Upload size violation distributions.
//!
//! Two append-only byte-size distributions, one per violation kind. The
//! handles are registered once at server startup against the installed
//! recorder and shared across requests; `metrics::Histogram` is internally
//! thread-safe, so concurrent appends need no locking here.

use metrics::{describe_histogram, histogram, Histogram, Unit};

use crate::upload::classifier::{SizeViolation, ViolationKind};

/// Distribution of part sizes that exceeded the per-part limit.
pub const PART_SIZE_EXCEEDING: &str = "upload_part_size_exceeding_bytes";

/// Distribution of request sizes that exceeded the total limit.
pub const REQUEST_SIZE_EXCEEDING: &str = "upload_request_size_exceeding_bytes";

/// Records rejected upload sizes into the matching distribution.
pub struct UploadSizeMetrics {
    part_size: Histogram,
    request_size: Histogram,
}

impl UploadSizeMetrics {
    /// Register both distributions with the installed recorder.
    pub fn new() -> Self {
        describe_histogram!(
            PART_SIZE_EXCEEDING,
            Unit::Bytes,
            "Actual sizes of upload parts that exceeded the per-part limit"
        );
        describe_histogram!(
            REQUEST_SIZE_EXCEEDING,
            Unit::Bytes,
            "Actual request sizes that exceeded the total upload limit"
        );

        Self {
            part_size: histogram!(PART_SIZE_EXCEEDING),
            request_size: histogram!(REQUEST_SIZE_EXCEEDING),
        }
    }

    /// Record a classified violation.
    ///
    /// A violation of unknown kind, or one without a known size, records
    /// nothing: a missed observation is preferable to a placeholder value
    /// polluting the distribution.
    pub fn record_violation(&self, violation: &SizeViolation) {
        let Some(size_bytes) = violation.actual_size_bytes else {
            return;
        };

        match violation.kind {
            ViolationKind::PartLimitExceeded => self.part_size.record(size_bytes as f64),
            ViolationKind::RequestLimitExceeded => self.request_size.record(size_bytes as f64),
            ViolationKind::Unknown => {}
        }
    }
}

impl Default for UploadSizeMetrics {
    fn default() -> Self {
        Self::new()
    }
}
