// src/types/candidate.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::Salary;
use crate::utils::{
    deserialize_lenient, deserialize_null_string, deserialize_years, non_blank, parse_years,
    require_field, split_skills,
};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Immediate,
    NoticePeriod,
    NotAvailable,
}

impl Availability {
    pub fn label(&self) -> &'static str {
        match self {
            Availability::Immediate => "Available Immediately",
            Availability::NoticePeriod => "Available on Notice Period",
            Availability::NotAvailable => "Not Available",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Immediate => "immediate",
            Availability::NoticePeriod => "notice_period",
            Availability::NotAvailable => "not_available",
        }
    }
}

impl FromStr for Availability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "immediate" => Ok(Availability::Immediate),
            "notice_period" | "notice-period" => Ok(Availability::NoticePeriod),
            "not_available" | "not-available" => Ok(Availability::NotAvailable),
            other => Err(format!(
                "Unknown availability '{}'. Use immediate, notice_period or not_available",
                other
            )),
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Active,
    Shortlisted,
    Rejected,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Active => "active",
            CandidateStatus::Shortlisted => "shortlisted",
            CandidateStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for CandidateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(CandidateStatus::Active),
            "shortlisted" => Ok(CandidateStatus::Shortlisted),
            "rejected" => Ok(CandidateStatus::Rejected),
            other => Err(format!(
                "Unknown status '{}'. Use active, shortlisted or rejected",
                other
            )),
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job-seeking user profile as returned by `GET /candidates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u64,
    #[serde(deserialize_with = "deserialize_null_string")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_null_string")]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_null_string")]
    pub contact: String,
    #[serde(default, deserialize_with = "deserialize_null_string")]
    pub city: String,
    #[serde(default, deserialize_with = "deserialize_null_string")]
    pub skills: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_years")]
    pub experience: Option<u32>,
    #[serde(default)]
    pub current_role: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub expected_salary: Option<Salary>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub availability: Option<Availability>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub status: Option<CandidateStatus>,
}

impl Candidate {
    pub fn skill_list(&self) -> Vec<String> {
        split_skills(&self.skills)
    }

    /// Missing experience counts as zero years.
    pub fn experience_years(&self) -> u32 {
        self.experience.unwrap_or(0)
    }
}

/// Registration payload for `POST /api/auth/candidate/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDraft {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub city: String,
    pub skills: String,
    pub username: String,
    pub password: String,
}

impl CandidateDraft {
    pub fn validate(&self) -> Result<(), String> {
        require_field("Full name", &self.name)?;
        require_field("Email", &self.email)?;
        require_field("Contact", &self.contact)?;
        require_field("City", &self.city)?;
        require_field("Skills", &self.skills)?;
        require_field("Username", &self.username)?;
        require_field("Password", &self.password)?;

        if !self.email.contains('@') {
            return Err(format!("'{}' is not a valid email address", self.email));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
        }
        Ok(())
    }
}

/// Edit payload for `PUT /api/candidates/:id`. Optional fields go out as
/// `null` rather than being omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateUpdate {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub city: String,
    pub skills: String,
    pub experience: u32,
    pub current_role: Option<String>,
    pub education: Option<String>,
    pub expected_salary: Option<String>,
    pub availability: Availability,
    pub status: CandidateStatus,
}

/// Self-service payload for `PUT /api/candidates/profile`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub city: String,
    pub skills: String,
}

impl ProfileUpdate {
    pub fn from_candidate(candidate: &Candidate) -> Self {
        Self {
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            contact: candidate.contact.clone(),
            city: candidate.city.clone(),
            skills: candidate.skills.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        require_field("Full name", &self.name)?;
        require_field("Email", &self.email)?;
        require_field("Contact", &self.contact)?;
        require_field("City", &self.city)?;
        require_field("Skills", &self.skills)
    }
}

/// Text form state behind the add/edit candidate dialog. Registration uses
/// the credential fields, editing uses the profile details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateForm {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub city: String,
    pub skills: String,
    pub username: String,
    pub password: String,
    pub experience: String,
    pub current_role: String,
    pub education: String,
    pub expected_salary: String,
    pub availability: Availability,
    pub status: CandidateStatus,
}

impl Default for CandidateForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            contact: String::new(),
            city: String::new(),
            skills: String::new(),
            username: String::new(),
            password: String::new(),
            experience: String::new(),
            current_role: String::new(),
            education: String::new(),
            expected_salary: String::new(),
            availability: Availability::Immediate,
            status: CandidateStatus::Active,
        }
    }
}

impl CandidateForm {
    /// Prefill for editing. Credentials stay blank, they are not editable.
    pub fn from_candidate(candidate: &Candidate) -> Self {
        Self {
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            contact: candidate.contact.clone(),
            city: candidate.city.clone(),
            skills: candidate.skills.clone(),
            username: String::new(),
            password: String::new(),
            experience: candidate
                .experience
                .map(|e| e.to_string())
                .unwrap_or_default(),
            current_role: candidate.current_role.clone().unwrap_or_default(),
            education: candidate.education.clone().unwrap_or_default(),
            expected_salary: candidate
                .expected_salary
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_default(),
            availability: candidate.availability.unwrap_or(Availability::Immediate),
            status: candidate.status.unwrap_or(CandidateStatus::Active),
        }
    }

    pub fn to_draft(&self) -> Result<CandidateDraft, String> {
        let draft = CandidateDraft {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            contact: self.contact.trim().to_string(),
            city: self.city.trim().to_string(),
            skills: self.skills.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        };
        draft.validate()?;
        Ok(draft)
    }

    pub fn to_update(&self) -> Result<CandidateUpdate, String> {
        require_field("Full name", &self.name)?;
        require_field("Email", &self.email)?;
        require_field("Contact", &self.contact)?;
        require_field("City", &self.city)?;
        require_field("Skills", &self.skills)?;

        let experience = if self.experience.trim().is_empty() {
            0
        } else {
            parse_years(&self.experience)
                .ok_or_else(|| format!("Experience must be a number, got '{}'", self.experience))?
        };

        Ok(CandidateUpdate {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            contact: self.contact.trim().to_string(),
            city: self.city.trim().to_string(),
            skills: self.skills.trim().to_string(),
            experience,
            current_role: non_blank(&self.current_role),
            education: non_blank(&self.education),
            expected_salary: non_blank(&self.expected_salary),
            availability: self.availability,
            status: self.status,
        })
    }
}
