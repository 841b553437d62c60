//! Person service implementation
//!
//! This service handles registration and profile management for everyone the
//! ministry tracks: members, students, professors, and administrative staff.
//! CPF validation happens here, before anything is written.

use std::collections::HashMap;

use chrono::Utc;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::database::repositories::PersonRepository;
use crate::models::person::{
    CreatePersonRequest, Person, PersonRole, PersonStatus, UpdatePersonRequest,
};
use crate::utils::cpf;
use crate::utils::errors::{EkklesiaError, Result};

/// Person service for managing people records
#[derive(Debug, Clone)]
pub struct PersonService {
    person_repository: PersonRepository,
}

impl PersonService {
    /// Create a new PersonService instance
    pub fn new(person_repository: PersonRepository) -> Self {
        Self { person_repository }
    }

    /// Register a new person. The CPF, when present, is validated and stored
    /// stripped of punctuation; an invalid CPF means nothing is sent to the
    /// store.
    pub async fn register(&self, mut request: CreatePersonRequest) -> Result<Person> {
        debug!(full_name = %request.full_name, role = %request.role, "Registering person");

        validate_person_fields(&request.full_name, request.email.as_deref(), request.cpf.as_deref())?;
        request.cpf = request.cpf.map(|raw| cpf::strip(&raw));

        let person = self.person_repository.create(request).await?;
        info!(person_id = person.id, "Person registered successfully");

        Ok(person)
    }

    /// Get person by ID
    pub async fn get(&self, person_id: i64) -> Result<Person> {
        self.person_repository
            .find_by_id(person_id)
            .await?
            .ok_or(EkklesiaError::PersonNotFound { person_id })
    }

    /// Update a person's profile
    pub async fn update_profile(
        &self,
        person_id: i64,
        mut request: UpdatePersonRequest,
    ) -> Result<Person> {
        debug!(person_id = person_id, "Updating person profile");

        if let Some(ref cpf_raw) = request.cpf {
            if !cpf::is_valid(cpf_raw) {
                warn!(person_id = person_id, "Rejected profile update with invalid CPF");
                return Err(EkklesiaError::InvalidInput("Invalid CPF".to_string()));
            }
            request.cpf = Some(cpf::strip(cpf_raw));
        }
        if let Some(ref email) = request.email {
            validate_email(email)?;
        }

        // Ensure the person exists so the update cannot silently no-op
        let existing = self.get(person_id).await?;

        let person = self.person_repository.update(existing.id, request).await?;
        info!(person_id = person.id, "Person profile updated");

        Ok(person)
    }

    /// Flag a person active or inactive. People are never hard-deleted.
    pub async fn set_status(&self, person_id: i64, status: PersonStatus) -> Result<Person> {
        let existing = self.get(person_id).await?;
        let person = self
            .person_repository
            .set_status(existing.id, status)
            .await?;

        info!(person_id = person_id, status = %status, "Person status changed");
        Ok(person)
    }

    /// Record activity for a person (the heuristic absence signal)
    pub async fn record_activity(&self, person_id: i64) -> Result<()> {
        self.person_repository
            .touch_last_activity(person_id, Utc::now())
            .await
    }

    /// CPF rendered for display, when one is on file
    pub async fn formatted_cpf(&self, person_id: i64) -> Result<Option<String>> {
        let person = self.get(person_id).await?;
        Ok(person.cpf.as_deref().and_then(cpf::format))
    }

    /// Search people by name pattern
    pub async fn search(&self, pattern: &str) -> Result<Vec<Person>> {
        if pattern.len() < 2 {
            return Err(EkklesiaError::InvalidInput(
                "Search pattern must be at least 2 characters".to_string(),
            ));
        }

        self.person_repository.find_by_name_pattern(pattern).await
    }

    /// List people with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Person>> {
        if limit > 100 {
            return Err(EkklesiaError::InvalidInput(
                "Limit cannot exceed 100".to_string(),
            ));
        }

        self.person_repository.list(limit, offset).await
    }

    /// Get people statistics per role and status
    pub async fn statistics(&self) -> Result<HashMap<String, i64>> {
        debug!("Computing people statistics");

        let mut stats = HashMap::new();
        stats.insert("total".to_string(), self.person_repository.count().await?);
        stats.insert(
            "active".to_string(),
            self.person_repository
                .count_by_status(PersonStatus::Active.as_str())
                .await?,
        );
        stats.insert(
            "inactive".to_string(),
            self.person_repository
                .count_by_status(PersonStatus::Inactive.as_str())
                .await?,
        );
        for role in PersonRole::all() {
            stats.insert(
                role.as_str().to_string(),
                self.person_repository.count_by_role(role.as_str()).await?,
            );
        }

        Ok(stats)
    }
}

/// Validate fields of a new person before any request is sent
fn validate_person_fields(
    full_name: &str,
    email: Option<&str>,
    cpf_raw: Option<&str>,
) -> Result<()> {
    if full_name.trim().is_empty() {
        return Err(EkklesiaError::InvalidInput(
            "Full name is required".to_string(),
        ));
    }

    if let Some(email) = email {
        validate_email(email)?;
    }

    if let Some(cpf_raw) = cpf_raw {
        if !cpf::is_valid(cpf_raw) {
            return Err(EkklesiaError::InvalidInput("Invalid CPF".to_string()));
        }
    }

    Ok(())
}

/// Validate an email address shape
fn validate_email(email: &str) -> Result<()> {
    let pattern = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static pattern");
    if !pattern.is_match(email) {
        return Err(EkklesiaError::InvalidInput(format!(
            "Invalid email address: {email}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn rejects_blank_names() {
        assert_matches!(
            validate_person_fields("   ", None, None),
            Err(EkklesiaError::InvalidInput(_))
        );
    }

    #[test]
    fn rejects_invalid_cpf_before_any_write() {
        assert_matches!(
            validate_person_fields("Ana Souza", None, Some("111.111.111-11")),
            Err(EkklesiaError::InvalidInput(msg)) if msg == "Invalid CPF"
        );
    }

    #[test]
    fn accepts_valid_person_fields() {
        assert!(validate_person_fields(
            "Ana Souza",
            Some("ana@igreja.org.br"),
            Some("529.982.247-25")
        )
        .is_ok());
        assert!(validate_person_fields("João Lima", None, None).is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(validate_email("ana@igreja.org.br").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("two@@signs.com").is_err());
        assert!(validate_email("spaces in@mail.com").is_err());
    }
}
