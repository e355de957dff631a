//! Upload endpoint orchestration.
//!
//! Decodes the request into named parts, renders the plain-text summary on
//! success, and on a size violation classifies the failure, records the
//! observation, and maps the violation kind to the user-facing message.
//! Classification and recording happen exactly once per rejected request.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::http::server::AppState;
use crate::upload::classifier::{classify, ViolationKind};
use crate::upload::decode::{decode_parts, DecodeError, UploadedPart};

/// `POST /multipartfileuploads`: multipart upload with size limits.
pub async fn upload(State(state): State<AppState>, multipart: Multipart) -> Response {
    match decode_parts(multipart, &state.limits).await {
        Ok(parts) => {
            tracing::debug!(part_count = parts.len(), "Upload decoded");
            summarize(&parts).into_response()
        }
        Err(DecodeError::SizeExceeded(failure)) => {
            let violation = classify(&failure);
            state.upload_metrics.record_violation(&violation);

            tracing::warn!(
                kind = ?violation.kind,
                actual_size_bytes = ?violation.actual_size_bytes,
                "Upload rejected for exceeding a size limit"
            );

            (StatusCode::BAD_REQUEST, rejection_message(violation.kind)).into_response()
        }
        Err(DecodeError::Multipart(err)) => {
            // Not a size violation; out of scope here, surface the decoder's
            // own status and text.
            tracing::error!(error = %err, "Multipart decoding failed");
            (err.status(), err.body_text()).into_response()
        }
    }
}

/// User-facing message for a rejected upload.
fn rejection_message(kind: ViolationKind) -> &'static str {
    match kind {
        ViolationKind::RequestLimitExceeded => "The total size of all uploaded files is too large.",
        ViolationKind::PartLimitExceeded | ViolationKind::Unknown => {
            "An uploaded file is too large."
        }
    }
}

/// Render the plain-text summary of a successful upload.
///
/// Two or more parts are aggregated by name, in decode order; a later part
/// sharing a name with an earlier one silently overwrites its size.
fn summarize(parts: &[UploadedPart]) -> String {
    if parts.is_empty() {
        return "No files uploaded.".to_string();
    }

    if parts.len() == 1 {
        return parts[0].size_bytes.to_string();
    }

    let mut entries: Vec<(&str, u64)> = Vec::with_capacity(parts.len());
    for part in parts {
        match entries.iter_mut().find(|(name, _)| *name == part.name) {
            Some(entry) => entry.1 = part.size_bytes,
            None => entries.push((&part.name, part.size_bytes)),
        }
    }

    entries
        .iter()
        .map(|(name, size_bytes)| format!("{name}: {size_bytes}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(name: &str, size_bytes: u64) -> UploadedPart {
        UploadedPart {
            name: name.to_string(),
            size_bytes,
        }
    }

    #[test]
    fn no_parts_yields_notification() {
        assert_eq!(summarize(&[]), "No files uploaded.");
    }

    #[test]
    fn single_part_yields_bare_size() {
        assert_eq!(summarize(&[part("file1mb", 1_048_576)]), "1048576");
    }

    #[test]
    fn multiple_parts_are_listed_in_decode_order() {
        let parts = [part("file1mb", 1_048_576), part("file512kb", 524_288)];
        assert_eq!(summarize(&parts), "file1mb: 1048576, file512kb: 524288");
    }

    #[test]
    fn duplicate_names_are_last_write_wins() {
        let parts = [part("dup", 10), part("other", 5), part("dup", 20)];
        assert_eq!(summarize(&parts), "dup: 20, other: 5");
    }

    #[test]
    fn rejection_messages_match_violation_kind() {
        assert_eq!(
            rejection_message(ViolationKind::PartLimitExceeded),
            "An uploaded file is too large."
        );
        assert_eq!(
            rejection_message(ViolationKind::Unknown),
            "An uploaded file is too large."
        );
        assert_eq!(
            rejection_message(ViolationKind::RequestLimitExceeded),
            "The total size of all uploaded files is too large."
        );
    }
}
