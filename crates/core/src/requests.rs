//! Content-request domain constants, validation, and notification text.
//!
//! A request asks for an action (`add`, `update`, `fix`) on one catalog
//! item identified by (`media_id`, `media_type`). That triple is the
//! duplicate key: requests sharing it form a group and carry a shared
//! demand counter. No database access, pure domain logic.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Media type constants
// ---------------------------------------------------------------------------

pub const MEDIA_TYPE_MOVIE: &str = "movie";
pub const MEDIA_TYPE_TV: &str = "tv";
pub const VALID_MEDIA_TYPES: &[&str] = &[MEDIA_TYPE_MOVIE, MEDIA_TYPE_TV];

// ---------------------------------------------------------------------------
// Request type constants
// ---------------------------------------------------------------------------

pub const REQUEST_TYPE_ADD: &str = "add";
pub const REQUEST_TYPE_UPDATE: &str = "update";
pub const REQUEST_TYPE_FIX: &str = "fix";
pub const VALID_REQUEST_TYPES: &[&str] =
    &[REQUEST_TYPE_ADD, REQUEST_TYPE_UPDATE, REQUEST_TYPE_FIX];

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_REJECTED: &str = "rejected";
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_IN_PROGRESS,
    STATUS_COMPLETED,
    STATUS_REJECTED,
];

// ---------------------------------------------------------------------------
// Duplicate key
// ---------------------------------------------------------------------------

/// The triple identifying requests for "the same ask".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey {
    pub media_id: i64,
    pub media_type: String,
    pub request_type: String,
}

impl DuplicateKey {
    /// Build a validated duplicate key.
    pub fn new(media_id: i64, media_type: &str, request_type: &str) -> Result<Self, CoreError> {
        validate_media_type(media_type)?;
        validate_request_type(request_type)?;
        if media_id < 1 {
            return Err(CoreError::Validation(format!(
                "Invalid media id {media_id}. Must be a positive catalog id"
            )));
        }
        Ok(Self {
            media_id,
            media_type: media_type.to_string(),
            request_type: request_type.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate that `mt` is one of the allowed media types.
pub fn validate_media_type(mt: &str) -> Result<(), CoreError> {
    if VALID_MEDIA_TYPES.contains(&mt) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid media type '{mt}'. Must be one of: {}",
            VALID_MEDIA_TYPES.join(", ")
        )))
    }
}

/// Validate that `rt` is one of the allowed request types.
pub fn validate_request_type(rt: &str) -> Result<(), CoreError> {
    if VALID_REQUEST_TYPES.contains(&rt) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid request type '{rt}'. Must be one of: {}",
            VALID_REQUEST_TYPES.join(", ")
        )))
    }
}

/// Validate that `status` is one of the allowed statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Notification text (pt-BR, matching the user-facing platform language)
// ---------------------------------------------------------------------------

/// Human-readable status line for a notification.
///
/// For rejections the reason is appended when present; otherwise the user
/// is pointed at support. Unknown statuses fall back to the raw value so a
/// notification is never silently empty.
pub fn status_line(status: &str, rejection_reason: Option<&str>) -> String {
    match status {
        STATUS_PENDING => "Sua solicitação está pendente de análise.".to_string(),
        STATUS_IN_PROGRESS => "Sua solicitação está em análise pela nossa equipe.".to_string(),
        STATUS_COMPLETED => "Sua solicitação foi concluída com sucesso!".to_string(),
        STATUS_REJECTED => match rejection_reason.filter(|r| !r.is_empty()) {
            Some(reason) => format!("Sua solicitação foi rejeitada. Motivo: {reason}"),
            None => {
                "Sua solicitação foi rejeitada. Entre em contato para mais informações."
                    .to_string()
            }
        },
        other => other.to_string(),
    }
}

/// Full WhatsApp message body for a status-change notification.
pub fn status_update_message(
    user_name: &str,
    media_title: &str,
    status: &str,
    rejection_reason: Option<&str>,
) -> String {
    let line = status_line(status, rejection_reason);
    format!(
        "*Atualização de Solicitação*\n\nOlá {user_name},\n\nSua solicitação para \
         \"{media_title}\" teve o status atualizado para: *{line}*\n\nAcesse a plataforma \
         para mais detalhes."
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Validation ----------------------------------------------------------

    #[test]
    fn media_type_accepts_known_values() {
        assert!(validate_media_type("movie").is_ok());
        assert!(validate_media_type("tv").is_ok());
    }

    #[test]
    fn media_type_rejects_unknown_value() {
        let err = validate_media_type("book").unwrap_err();
        assert!(err.to_string().contains("Invalid media type 'book'"));
    }

    #[test]
    fn request_type_rejects_unknown_value() {
        assert!(validate_request_type("add").is_ok());
        assert!(validate_request_type("remove").is_err());
    }

    #[test]
    fn status_rejects_unknown_value() {
        assert!(validate_status("in_progress").is_ok());
        assert!(validate_status("done").is_err());
    }

    #[test]
    fn duplicate_key_rejects_non_positive_media_id() {
        let err = DuplicateKey::new(0, "movie", "add").unwrap_err();
        assert!(err.to_string().contains("Invalid media id"));
    }

    #[test]
    fn duplicate_key_holds_validated_fields() {
        let key = DuplicateKey::new(100, "movie", "add").unwrap();
        assert_eq!(key.media_id, 100);
        assert_eq!(key.media_type, "movie");
        assert_eq!(key.request_type, "add");
    }

    // -- Notification text ---------------------------------------------------

    #[test]
    fn rejected_line_includes_reason() {
        let line = status_line(STATUS_REJECTED, Some("Baixa demanda"));
        assert_eq!(line, "Sua solicitação foi rejeitada. Motivo: Baixa demanda");
    }

    #[test]
    fn rejected_line_without_reason_points_at_support() {
        let line = status_line(STATUS_REJECTED, None);
        assert!(line.contains("Entre em contato"));

        // Empty string behaves the same as absent.
        let line = status_line(STATUS_REJECTED, Some(""));
        assert!(line.contains("Entre em contato"));
    }

    #[test]
    fn unknown_status_falls_back_to_raw_value() {
        assert_eq!(status_line("archived", None), "archived");
    }

    #[test]
    fn message_includes_name_title_and_status_line() {
        let msg = status_update_message("Ana", "Duna", STATUS_COMPLETED, None);
        assert!(msg.contains("Olá Ana"));
        assert!(msg.contains("\"Duna\""));
        assert!(msg.contains("concluída com sucesso"));
    }
}
