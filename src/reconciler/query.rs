// src/reconciler/query.rs
//! Search, structured filters and sorting for list views. Every read
//! recomputes the visible list from the full source collection.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::types::{Availability, Candidate, CandidateStatus, Requirement};
use crate::utils::{contains_ignore_case, opt_contains_ignore_case};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    Experience,
    /// Creation order, approximated by id.
    #[default]
    Date,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "experience" => Ok(SortKey::Experience),
            "date" => Ok(SortKey::Date),
            other => Err(format!("Unknown sort key '{}'. Use name, experience or date", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(format!("Unknown sort order '{}'. Use asc or desc", other)),
        }
    }
}

/// Defaults to most recent first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }
}

/// Inclusive years-of-experience bucket: `0-2`, `2-5`, `5-10` or open-ended `10+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl ExperienceRange {
    pub fn contains(&self, years: u32) -> bool {
        years >= self.min && self.max.map_or(true, |max| years <= max)
    }
}

impl FromStr for ExperienceRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || format!("Invalid experience range '{}'. Use e.g. 2-5 or 10+", trimmed);

        if let Some(min) = trimmed.strip_suffix('+') {
            let min = min.trim().parse().map_err(|_| invalid())?;
            return Ok(Self { min, max: None });
        }

        let (min, max) = trimmed.split_once('-').ok_or_else(invalid)?;
        let min: u32 = min.trim().parse().map_err(|_| invalid())?;
        let max: u32 = max.trim().parse().map_err(|_| invalid())?;
        if max < min {
            return Err(invalid());
        }
        Ok(Self { min, max: Some(max) })
    }
}

impl fmt::Display for ExperienceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

/// Fields the free-text search looks at.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

/// Values the sort keys compare on.
pub trait Sortable {
    fn sort_name(&self) -> &str;
    fn sort_experience(&self) -> u32;
    fn sort_date(&self) -> u64;
}

/// A set of structured predicates, all of which must hold.
pub trait Filter<T> {
    fn matches(&self, item: &T) -> bool;
}

impl Searchable for Candidate {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.skills.as_str(), self.city.as_str()];
        fields.extend(self.current_role.as_deref());
        fields.extend(self.education.as_deref());
        fields
    }
}

impl Sortable for Candidate {
    fn sort_name(&self) -> &str {
        &self.name
    }

    fn sort_experience(&self) -> u32 {
        self.experience_years()
    }

    fn sort_date(&self) -> u64 {
        self.id
    }
}

impl Searchable for Requirement {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.position.as_str(),
            self.company.as_str(),
            self.location.as_str(),
            self.description.as_str(),
            self.skills_required.as_str(),
        ]
    }
}

impl Sortable for Requirement {
    fn sort_name(&self) -> &str {
        &self.position
    }

    fn sort_experience(&self) -> u32 {
        self.experience_years()
    }

    fn sort_date(&self) -> u64 {
        self.id
    }
}

/// Structured candidate filters. Empty text and `None` mean "any".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateFilters {
    pub skills: String,
    pub experience: Option<ExperienceRange>,
    pub location: String,
    pub education: String,
    pub availability: Option<Availability>,
    pub status: Option<CandidateStatus>,
}

impl Filter<Candidate> for CandidateFilters {
    fn matches(&self, candidate: &Candidate) -> bool {
        contains_ignore_case(&candidate.skills, &self.skills)
            && self
                .experience
                .map_or(true, |range| range.contains(candidate.experience_years()))
            && contains_ignore_case(&candidate.city, &self.location)
            && opt_contains_ignore_case(candidate.education.as_deref(), &self.education)
            && self
                .availability
                .map_or(true, |wanted| candidate.availability == Some(wanted))
            && self
                .status
                .map_or(true, |wanted| candidate.status == Some(wanted))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementFilters {
    pub location: String,
    pub skills: String,
    pub experience: Option<ExperienceRange>,
}

impl Filter<Requirement> for RequirementFilters {
    fn matches(&self, requirement: &Requirement) -> bool {
        contains_ignore_case(&requirement.location, &self.location)
            && contains_ignore_case(&requirement.skills_required, &self.skills)
            && self
                .experience
                .map_or(true, |range| range.contains(requirement.experience_years()))
    }
}

/// Serializable view-state for a filtered, sorted list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery<F> {
    pub search: String,
    pub filters: F,
    pub sort: SortSpec,
}

pub type CandidateQuery = ListQuery<CandidateFilters>;
pub type RequirementQuery = ListQuery<RequirementFilters>;

impl<F> ListQuery<F> {
    /// Derive the visible list: search, then filters, then sort.
    pub fn apply<T>(&self, items: &[T]) -> Vec<T>
    where
        T: Searchable + Sortable + Clone,
        F: Filter<T>,
    {
        let mut visible: Vec<T> = search(items, &self.search)
            .into_iter()
            .filter(|item| self.filters.matches(item))
            .collect();
        sort_items(&mut visible, self.sort);
        visible
    }
}

/// Case-insensitive substring search. An empty query keeps everything.
pub fn search<T>(items: &[T], query: &str) -> Vec<T>
where
    T: Searchable + Clone,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| {
            item.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Stable sort, so ties keep their prior relative order.
pub fn sort_items<T>(items: &mut [T], spec: SortSpec)
where
    T: Sortable,
{
    items.sort_by(|a, b| {
        let ordering = compare(a, b, spec.key);
        match spec.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Case-insensitive, with the raw text as tiebreak so the order stays total.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare<T: Sortable>(a: &T, b: &T, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => compare_names(a.sort_name(), b.sort_name()),
        SortKey::Experience => a.sort_experience().cmp(&b.sort_experience()),
        SortKey::Date => a.sort_date().cmp(&b.sort_date()),
    }
}
