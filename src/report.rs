//! Pollution Report Module
//! Field rules for the two-step pollution report. Submissions stay in memory.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Minimum description length, in characters.
pub const MIN_DESCRIPTION_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PollutionType {
    Plastic,
    Oil,
    Chemical,
    Sewage,
    Fishing,
    Trash,
    Other,
}

impl PollutionType {
    pub const ALL: [PollutionType; 7] = [
        PollutionType::Plastic,
        PollutionType::Oil,
        PollutionType::Chemical,
        PollutionType::Sewage,
        PollutionType::Fishing,
        PollutionType::Trash,
        PollutionType::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PollutionType::Plastic => "Plastic Waste",
            PollutionType::Oil => "Oil Spill",
            PollutionType::Chemical => "Chemical Discharge",
            PollutionType::Sewage => "Sewage",
            PollutionType::Fishing => "Fishing Gear/Nets",
            PollutionType::Trash => "General Trash",
            PollutionType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => f.write_str("Low"),
            Severity::Medium => f.write_str("Medium"),
            Severity::High => f.write_str("High"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStep {
    /// What happened and where.
    Incident,
    /// Who is reporting.
    Contact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReportField {
    PollutionType,
    Description,
    Location,
    Images,
    Name,
    Email,
}

/// Field -> message for every rule that failed.
pub type FieldErrors = BTreeMap<ReportField, &'static str>;

/// Editable report state.
#[derive(Debug, Clone, Default)]
pub struct ReportForm {
    pub pollution_type: Option<PollutionType>,
    pub description: String,
    pub location: String,
    pub severity: Severity,
    pub name: String,
    pub email: String,
    pub anonymous: bool,
    pub images: Vec<PathBuf>,
}

/// A report that passed both steps.
#[derive(Debug, Clone, Serialize)]
pub struct SubmittedReport {
    pub pollution_type: PollutionType,
    pub description: String,
    pub location: String,
    pub severity: Severity,
    /// `None` for anonymous reports.
    pub reporter: Option<(String, String)>,
    pub image_count: usize,
}

impl ReportForm {
    pub fn validate(&self, step: ReportStep) -> FieldErrors {
        let mut errors = FieldErrors::new();

        match step {
            ReportStep::Incident => {
                if self.pollution_type.is_none() {
                    errors.insert(ReportField::PollutionType, "Please select a pollution type");
                }
                if self.description.chars().count() < MIN_DESCRIPTION_CHARS {
                    errors.insert(
                        ReportField::Description,
                        "Please provide a more detailed description (at least 10 characters)",
                    );
                }
                if self.location.is_empty() {
                    errors.insert(ReportField::Location, "Please enter or detect a location");
                }
                if self.images.is_empty() {
                    errors.insert(ReportField::Images, "Please upload at least one image");
                }
            }
            ReportStep::Contact => {
                if self.name.is_empty() && !self.anonymous {
                    errors.insert(ReportField::Name, "Please enter your name or report anonymously");
                }
                if self.email.is_empty() && !self.anonymous {
                    errors.insert(
                        ReportField::Email,
                        "Please enter your email or report anonymously",
                    );
                } else if !self.email.is_empty() && !self.anonymous && !is_valid_email(&self.email)
                {
                    errors.insert(ReportField::Email, "Please enter a valid email address");
                }
            }
        }

        errors
    }

    /// Validate both steps and freeze the report.
    pub fn submit(&self) -> Result<SubmittedReport, FieldErrors> {
        let mut errors = self.validate(ReportStep::Incident);
        errors.extend(self.validate(ReportStep::Contact));

        match self.pollution_type {
            Some(pollution_type) if errors.is_empty() => Ok(SubmittedReport {
                pollution_type,
                description: self.description.clone(),
                location: self.location.clone(),
                severity: self.severity,
                reporter: (!self.anonymous).then(|| (self.name.clone(), self.email.clone())),
                image_count: self.images.len(),
            }),
            _ => Err(errors),
        }
    }
}

/// `something@domain.tld` with no whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    email.char_indices().any(|(i, c)| {
        if c != '@' || i == 0 {
            return false;
        }
        let domain = &email[i + 1..];
        domain
            .char_indices()
            .any(|(j, d)| d == '.' && j > 0 && j + 1 < domain.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_incident() -> ReportForm {
        ReportForm {
            pollution_type: Some(PollutionType::Plastic),
            description: "Bottles washed up along the pier".to_string(),
            location: "Haifa Bay".to_string(),
            images: vec![PathBuf::from("beach.jpg")],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_incident_reports_every_field() {
        let errors = ReportForm::default().validate(ReportStep::Incident);
        assert_eq!(errors.len(), 4);
        assert!(errors.contains_key(&ReportField::PollutionType));
        assert!(errors.contains_key(&ReportField::Description));
        assert!(errors.contains_key(&ReportField::Location));
        assert!(errors.contains_key(&ReportField::Images));
    }

    #[test]
    fn test_description_length_boundary() {
        let mut form = complete_incident();
        form.description = "123456789".to_string();
        assert!(form.validate(ReportStep::Incident).contains_key(&ReportField::Description));
        form.description = "1234567890".to_string();
        assert!(form.validate(ReportStep::Incident).is_empty());
    }

    #[test]
    fn test_anonymous_skips_contact_rules() {
        let mut form = complete_incident();
        form.anonymous = true;
        form.email = "not an email".to_string();
        assert!(form.validate(ReportStep::Contact).is_empty());
    }

    #[test]
    fn test_contact_messages() {
        let mut form = complete_incident();
        let errors = form.validate(ReportStep::Contact);
        assert_eq!(
            errors.get(&ReportField::Email),
            Some(&"Please enter your email or report anonymously")
        );
        assert!(errors.contains_key(&ReportField::Name));

        form.name = "Dana".to_string();
        form.email = "dana@example".to_string();
        let errors = form.validate(ReportStep::Contact);
        assert_eq!(
            errors.get(&ReportField::Email),
            Some(&"Please enter a valid email address")
        );
        assert!(!errors.contains_key(&ReportField::Name));
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("@b.c"));
        assert!(!is_valid_email("a@.c"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("plain"));
    }

    #[test]
    fn test_submit() {
        let mut form = complete_incident();
        assert!(form.submit().is_err());

        form.name = "Dana".to_string();
        form.email = "dana@example.org".to_string();
        let report = form.submit().unwrap();
        assert_eq!(report.pollution_type, PollutionType::Plastic);
        assert_eq!(report.severity, Severity::Medium);
        assert_eq!(report.image_count, 1);
        assert_eq!(
            report.reporter,
            Some(("Dana".to_string(), "dana@example.org".to_string()))
        );
    }
}
