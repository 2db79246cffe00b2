use crate::models::{LeadSubmission, ValidatedLead};
use std::fmt;

/// Service categories offered by the contact form.
pub const KNOWN_SERVICES: [&str; 5] = [
    "Limpieza de Casas / Deptos",
    "Limpieza de Oficinas",
    "Alfombras y Tapices",
    "Reparación Línea Blanca",
    "Otro",
];

/// Required fields absent from a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required fields: {}", self.missing.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// Checks that `name`, `phone`, `email` and `service` are present.
///
/// Blank strings count as missing. Values are trimmed; `details` and `token`
/// collapse to `None` when blank. Pure, no I/O.
pub fn validate_submission(submission: &LeadSubmission) -> Result<ValidatedLead, ValidationError> {
    let name = non_blank(&submission.name);
    let phone = non_blank(&submission.phone);
    let email = non_blank(&submission.email);
    let service = non_blank(&submission.service);

    let mut missing = Vec::new();
    if name.is_none() {
        missing.push("name");
    }
    if phone.is_none() {
        missing.push("phone");
    }
    if email.is_none() {
        missing.push("email");
    }
    if service.is_none() {
        missing.push("service");
    }

    match (name, phone, email, service) {
        (Some(name), Some(phone), Some(email), Some(service)) => {
            if !is_known_service(&service) {
                tracing::debug!("Unlisted service category submitted: {}", service);
            }
            Ok(ValidatedLead {
                name,
                phone,
                email,
                service,
                details: non_blank(&submission.details),
                token: non_blank(&submission.token),
            })
        }
        _ => Err(ValidationError { missing }),
    }
}

pub fn is_known_service(service: &str) -> bool {
    KNOWN_SERVICES.contains(&service)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> LeadSubmission {
        LeadSubmission {
            name: Some("Ana".to_string()),
            phone: Some("+56911112222".to_string()),
            email: Some("ana@x.cl".to_string()),
            service: Some("Limpieza de Oficinas".to_string()),
            details: Some("Providencia, 2 pisos".to_string()),
            token: Some("abc".to_string()),
        }
    }

    #[test]
    fn test_complete_submission_is_valid() {
        let lead = validate_submission(&complete()).unwrap();

        assert_eq!(lead.name, "Ana");
        assert_eq!(lead.service, "Limpieza de Oficinas");
        assert_eq!(lead.details.as_deref(), Some("Providencia, 2 pisos"));
        assert_eq!(lead.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_each_required_field_is_enforced() {
        let cases: [(&str, fn(&mut LeadSubmission)); 4] = [
            ("name", |s| s.name = None),
            ("phone", |s| s.phone = None),
            ("email", |s| s.email = None),
            ("service", |s| s.service = None),
        ];

        for (field, clear) in cases {
            let mut submission = complete();
            clear(&mut submission);
            let err = validate_submission(&submission).unwrap_err();
            assert_eq!(err.missing, vec![field]);
        }
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let mut submission = complete();
        submission.name = Some("   ".to_string());
        submission.phone = Some(String::new());

        let err = validate_submission(&submission).unwrap_err();
        assert_eq!(err.missing, vec!["name", "phone"]);
        assert_eq!(err.to_string(), "missing required fields: name, phone");
    }

    #[test]
    fn test_empty_submission_reports_all_fields() {
        let err = validate_submission(&LeadSubmission::default()).unwrap_err();

        assert_eq!(err.missing, vec!["name", "phone", "email", "service"]);
    }

    #[test]
    fn test_optional_fields_collapse_when_blank() {
        let mut submission = complete();
        submission.details = Some(String::new());
        submission.token = Some("  ".to_string());

        let lead = validate_submission(&submission).unwrap();
        assert!(lead.details.is_none());
        assert!(lead.token.is_none());
    }

    #[test]
    fn test_values_are_trimmed() {
        let mut submission = complete();
        submission.email = Some("  ana@x.cl ".to_string());

        let lead = validate_submission(&submission).unwrap();
        assert_eq!(lead.email, "ana@x.cl");
    }

    #[test]
    fn test_unlisted_service_is_accepted() {
        let mut submission = complete();
        submission.service = Some("Limpieza de Ventanas".to_string());

        assert!(validate_submission(&submission).is_ok());
        assert!(!is_known_service("Limpieza de Ventanas"));
        assert!(is_known_service("Otro"));
    }
}
