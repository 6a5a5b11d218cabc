// src/utils.rs
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Case-insensitive substring match. An empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Same as [`contains_ignore_case`] but an absent field never matches a
/// non-empty needle.
pub fn opt_contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    match haystack {
        Some(value) => contains_ignore_case(value, needle),
        None => needle.is_empty(),
    }
}

/// Split a comma-separated skills string into trimmed, non-empty entries.
pub fn split_skills(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trimmed text, or `None` when the field was left blank.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Require a non-blank value for a form field.
pub fn require_field(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} is required", field))
    } else {
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accept `5`, `5.0`, `"5"`, `""` or `null` for a years-of-experience field.
pub fn deserialize_years<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    let years = match raw {
        None => None,
        Some(NumberOrText::Int(n)) => u32::try_from(n.max(0)).ok(),
        Some(NumberOrText::Float(f)) if f.is_finite() && f >= 0.0 => Some(f.trunc() as u32),
        Some(NumberOrText::Float(_)) => None,
        Some(NumberOrText::Text(text)) => parse_years(&text),
    };
    Ok(years)
}

/// Read `null` as an empty string. Missing keys are left to `#[serde(default)]`.
pub fn deserialize_null_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a string-coded enum, reading blank, unknown or non-string values
/// as `None` so one odd row never fails a whole list.
pub fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|text| text.parse().ok()))
}

/// Parse form input for a years field. Blank or non-numeric input yields `None`.
pub fn parse_years(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<u32>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f.trunc() as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Years {
        #[serde(default, deserialize_with = "deserialize_years")]
        experience: Option<u32>,
    }

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "deserialize_null_string")]
        city: String,
        #[serde(default, deserialize_with = "deserialize_lenient")]
        availability: Option<crate::types::Availability>,
    }

    fn row(json: &str) -> Row {
        serde_json::from_str::<Row>(json).expect("valid json")
    }

    fn years(json: &str) -> Option<u32> {
        serde_json::from_str::<Years>(json)
            .expect("valid json")
            .experience
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Rust, Go", "rust"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("Python", "rust"));
    }

    #[test]
    fn test_opt_contains_ignore_case() {
        assert!(opt_contains_ignore_case(Some("MSc Computing"), "msc"));
        assert!(!opt_contains_ignore_case(None, "msc"));
        assert!(opt_contains_ignore_case(None, ""));
    }

    #[test]
    fn test_split_skills() {
        assert_eq!(split_skills(" Rust , SQL,,Go "), vec!["Rust", "SQL", "Go"]);
        assert!(split_skills("").is_empty());
    }

    #[test]
    fn test_deserialize_years_variants() {
        assert_eq!(years(r#"{"experience": 4}"#), Some(4));
        assert_eq!(years(r#"{"experience": 4.7}"#), Some(4));
        assert_eq!(years(r#"{"experience": "7"}"#), Some(7));
        assert_eq!(years(r#"{"experience": ""}"#), None);
        assert_eq!(years(r#"{"experience": null}"#), None);
        assert_eq!(years(r#"{}"#), None);
    }

    #[test]
    fn test_null_string_reads_empty() {
        assert_eq!(row(r#"{"city": null}"#).city, "");
        assert_eq!(row(r#"{}"#).city, "");
        assert_eq!(row(r#"{"city": "Leeds"}"#).city, "Leeds");
    }

    #[test]
    fn test_lenient_enum() {
        use crate::types::Availability;

        assert_eq!(
            row(r#"{"availability": "notice_period"}"#).availability,
            Some(Availability::NoticePeriod)
        );
        assert_eq!(row(r#"{"availability": ""}"#).availability, None);
        assert_eq!(row(r#"{"availability": "on_holiday"}"#).availability, None);
        assert_eq!(row(r#"{"availability": 3}"#).availability, None);
        assert_eq!(row(r#"{"availability": null}"#).availability, None);
    }

    #[test]
    fn test_require_field() {
        assert!(require_field("Name", "Ann").is_ok());
        assert_eq!(
            require_field("Name", "   ").unwrap_err(),
            "Name is required"
        );
    }
}
