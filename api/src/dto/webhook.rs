//! Delivery-report webhook parameters.
//!
//! Providers are loose about both transport and field names: the report
//! arrives as query parameters on a GET or as a JSON body on a POST, and
//! the message id may be spelled `message_id`, `sms_id` or `id`. This DTO
//! absorbs all of that and normalizes into one `DeliveryReport` before any
//! business logic runs.

use serde::Deserialize;

use sika_core::domain::value_objects::delivery_report::{DeliveryReport, ReportedStatus};
use sika_core::errors::SmsError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryReportParams {
    #[serde(default)]
    pub message_id: Option<String>,

    #[serde(default)]
    pub sms_id: Option<String>,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub status: Option<String>,
}

impl DeliveryReportParams {
    /// Normalize into a structurally valid report.
    ///
    /// # Errors
    /// * `SmsError::MissingFields` - no id alias present, or no status
    /// * `SmsError::UnknownStatus` - status outside delivered/failed/expired
    pub fn normalize(self) -> Result<DeliveryReport, SmsError> {
        let provider_message_id = self
            .message_id
            .or(self.sms_id)
            .or(self.id)
            .filter(|s| !s.trim().is_empty());
        let status = self.status.filter(|s| !s.trim().is_empty());

        let (provider_message_id, status) = match (provider_message_id, status) {
            (Some(id), Some(status)) => (id, status),
            (None, Some(_)) => {
                return Err(SmsError::MissingFields {
                    fields: "message_id".to_string(),
                })
            }
            (Some(_), None) => {
                return Err(SmsError::MissingFields {
                    fields: "status".to_string(),
                })
            }
            (None, None) => {
                return Err(SmsError::MissingFields {
                    fields: "message_id, status".to_string(),
                })
            }
        };

        let status = ReportedStatus::parse(&status)
            .ok_or(SmsError::UnknownStatus { status })?;

        Ok(DeliveryReport {
            provider_message_id,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_aliases() {
        for json in [
            r#"{"message_id": "abc", "status": "delivered"}"#,
            r#"{"sms_id": "abc", "status": "delivered"}"#,
            r#"{"id": "abc", "status": "delivered"}"#,
        ] {
            let params: DeliveryReportParams = serde_json::from_str(json).unwrap();
            let report = params.normalize().unwrap();
            assert_eq!(report.provider_message_id, "abc");
            assert_eq!(report.status, ReportedStatus::Delivered);
        }
    }

    #[test]
    fn test_alias_precedence() {
        let params: DeliveryReportParams = serde_json::from_str(
            r#"{"message_id": "primary", "id": "fallback", "status": "failed"}"#,
        )
        .unwrap();
        let report = params.normalize().unwrap();
        assert_eq!(report.provider_message_id, "primary");
    }

    #[test]
    fn test_status_is_case_insensitive() {
        let params: DeliveryReportParams = serde_json::from_str(
            r#"{"message_id": "abc", "status": "DELIVERED"}"#,
        )
        .unwrap();
        assert_eq!(
            params.normalize().unwrap().status,
            ReportedStatus::Delivered
        );
    }

    #[test]
    fn test_missing_fields() {
        let params: DeliveryReportParams =
            serde_json::from_str(r#"{"status": "delivered"}"#).unwrap();
        match params.normalize() {
            Err(SmsError::MissingFields { fields }) => assert_eq!(fields, "message_id"),
            other => panic!("expected MissingFields, got {:?}", other),
        }

        let params: DeliveryReportParams =
            serde_json::from_str(r#"{"message_id": "abc"}"#).unwrap();
        match params.normalize() {
            Err(SmsError::MissingFields { fields }) => assert_eq!(fields, "status"),
            other => panic!("expected MissingFields, got {:?}", other),
        }

        let params: DeliveryReportParams = serde_json::from_str(r#"{}"#).unwrap();
        assert!(matches!(
            params.normalize(),
            Err(SmsError::MissingFields { .. })
        ));
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let params: DeliveryReportParams = serde_json::from_str(
            r#"{"message_id": "  ", "status": "delivered"}"#,
        )
        .unwrap();
        assert!(matches!(
            params.normalize(),
            Err(SmsError::MissingFields { .. })
        ));
    }

    #[test]
    fn test_unknown_status() {
        let params: DeliveryReportParams = serde_json::from_str(
            r#"{"message_id": "abc", "status": "teleported"}"#,
        )
        .unwrap();
        match params.normalize() {
            Err(SmsError::UnknownStatus { status }) => assert_eq!(status, "teleported"),
            other => panic!("expected UnknownStatus, got {:?}", other),
        }
    }
}
