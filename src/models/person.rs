//! Person model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Person {
    pub id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cpf: Option<String>,
    pub role: String,
    pub status: String,
    pub congregation_id: Option<i64>,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub terms_accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    pub fn role(&self) -> PersonRole {
        self.role.parse().unwrap_or(PersonRole::Member)
    }

    pub fn is_active(&self) -> bool {
        self.status == PersonStatus::Active.as_str()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePersonRequest {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cpf: Option<String>,
    pub role: PersonRole,
    pub congregation_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePersonRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cpf: Option<String>,
    pub role: Option<PersonRole>,
    pub congregation_id: Option<i64>,
}

/// Closed set of ministry roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonRole {
    Administrator,
    Pastor,
    Coordinator,
    Secretary,
    Professor,
    Student,
    Member,
}

impl PersonRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonRole::Administrator => "administrator",
            PersonRole::Pastor => "pastor",
            PersonRole::Coordinator => "coordinator",
            PersonRole::Secretary => "secretary",
            PersonRole::Professor => "professor",
            PersonRole::Student => "student",
            PersonRole::Member => "member",
        }
    }

    pub fn all() -> &'static [PersonRole] {
        &[
            PersonRole::Administrator,
            PersonRole::Pastor,
            PersonRole::Coordinator,
            PersonRole::Secretary,
            PersonRole::Professor,
            PersonRole::Student,
            PersonRole::Member,
        ]
    }
}

impl std::fmt::Display for PersonRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PersonRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrator" => Ok(PersonRole::Administrator),
            "pastor" => Ok(PersonRole::Pastor),
            "coordinator" => Ok(PersonRole::Coordinator),
            "secretary" => Ok(PersonRole::Secretary),
            "professor" => Ok(PersonRole::Professor),
            "student" => Ok(PersonRole::Student),
            "member" => Ok(PersonRole::Member),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Person lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonStatus {
    Active,
    Inactive,
}

impl PersonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonStatus::Active => "active",
            PersonStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for PersonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PersonStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PersonStatus::Active),
            "inactive" => Ok(PersonStatus::Inactive),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_round_trip_through_strings() {
        for role in PersonRole::all() {
            assert_eq!(role.as_str().parse::<PersonRole>().unwrap(), *role);
        }
        assert!("deacon".parse::<PersonRole>().is_err());
    }

    #[test]
    fn unknown_stored_role_degrades_to_member() {
        let person = Person {
            id: 1,
            full_name: "Ana Souza".to_string(),
            email: None,
            phone: None,
            cpf: None,
            role: "something-legacy".to_string(),
            status: "active".to_string(),
            congregation_id: None,
            last_activity_at: None,
            terms_accepted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(person.role(), PersonRole::Member);
        assert!(person.is_active());
    }
}
