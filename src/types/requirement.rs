// src/types/requirement.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::{deserialize_null_string, deserialize_years, parse_years, require_field};

/// Salary as the API stores it: either a figure or free text ("60k-70k").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Salary {
    Amount(f64),
    Text(String),
}

impl Salary {
    /// Numeric input becomes an amount, anything else is kept as text.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match trimmed.parse::<f64>() {
            Ok(amount) if amount.is_finite() => Salary::Amount(amount),
            _ => Salary::Text(trimmed.to_string()),
        })
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Salary::Amount(amount) if amount.fract() == 0.0 => write!(f, "{}", *amount as i64),
            Salary::Amount(amount) => write!(f, "{}", amount),
            Salary::Text(text) => f.write_str(text),
        }
    }
}

/// A job posting created by a recruiter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: u64,
    #[serde(deserialize_with = "deserialize_null_string")]
    pub position: String,
    #[serde(default, deserialize_with = "deserialize_null_string")]
    pub company: String,
    #[serde(default, deserialize_with = "deserialize_null_string")]
    pub location: String,
    #[serde(default, deserialize_with = "deserialize_null_string")]
    pub description: String,
    #[serde(default)]
    pub salary: Option<Salary>,
    #[serde(default, deserialize_with = "deserialize_null_string")]
    pub skills_required: String,
    #[serde(default, deserialize_with = "deserialize_years")]
    pub experience: Option<u32>,
}

impl Requirement {
    pub fn skill_list(&self) -> Vec<String> {
        crate::utils::split_skills(&self.skills_required)
    }

    pub fn experience_years(&self) -> u32 {
        self.experience.unwrap_or(0)
    }
}

/// Payload for `POST /requirements` and `PUT /requirements/:id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementDraft {
    pub position: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub salary: Salary,
    pub skills_required: String,
    pub experience: u32,
}

/// Text-only form state behind the add/edit requirement dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementForm {
    pub position: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub salary: String,
    pub skills_required: String,
    pub experience: String,
}

impl RequirementForm {
    /// Prefill from an existing requirement, numbers rendered back to text.
    pub fn from_requirement(req: &Requirement) -> Self {
        Self {
            position: req.position.clone(),
            company: req.company.clone(),
            location: req.location.clone(),
            description: req.description.clone(),
            salary: req.salary.as_ref().map(|s| s.to_string()).unwrap_or_default(),
            skills_required: req.skills_required.clone(),
            experience: req.experience.map(|e| e.to_string()).unwrap_or_default(),
        }
    }

    /// Every field is required; experience must be a whole number of years.
    pub fn to_draft(&self) -> Result<RequirementDraft, String> {
        require_field("Position", &self.position)?;
        require_field("Company", &self.company)?;
        require_field("Location", &self.location)?;
        require_field("Salary", &self.salary)?;
        require_field("Experience", &self.experience)?;
        require_field("Skills required", &self.skills_required)?;
        require_field("Description", &self.description)?;

        let experience = parse_years(&self.experience)
            .ok_or_else(|| format!("Experience must be a number, got '{}'", self.experience))?;
        let salary = Salary::parse(&self.salary)
            .ok_or_else(|| "Salary is required".to_string())?;

        Ok(RequirementDraft {
            position: self.position.trim().to_string(),
            company: self.company.trim().to_string(),
            location: self.location.trim().to_string(),
            description: self.description.trim().to_string(),
            salary,
            skills_required: self.skills_required.trim().to_string(),
            experience,
        })
    }
}
