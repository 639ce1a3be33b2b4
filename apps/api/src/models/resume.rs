//! Résumé record, the canonical input handed to the layout engine.
//!
//! The form layer is trusted for shape, so parsing here only enforces the structure the
//! renderers cannot guess: the record must be an object and `personalInfo` must be present.
//! Missing arrays read as empty, missing or `null` strings read as blank.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::render::RenderError;

// ────────────────────────────────────────────────────────────────────────────
// Record types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default, deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub school: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub graduation_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<String>,
}

/// The full résumé as supplied by the form layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub personal_info: PersonalInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<SkillGroup>,
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing
// ────────────────────────────────────────────────────────────────────────────

impl ResumeRecord {
    /// Parses an untyped JSON value into a record.
    ///
    /// Fails with `RenderError::MalformedInput` when the value is not an object, when
    /// `personalInfo` is absent or not an object, or when a field has the wrong JSON type.
    pub fn from_value(value: Value) -> Result<Self, RenderError> {
        let object = value.as_object().ok_or_else(|| {
            RenderError::MalformedInput("résumé record must be a JSON object".to_string())
        })?;

        match object.get("personalInfo") {
            Some(Value::Object(_)) => {}
            Some(Value::Null) | None => {
                return Err(RenderError::MalformedInput(
                    "personalInfo is required".to_string(),
                ))
            }
            Some(_) => {
                return Err(RenderError::MalformedInput(
                    "personalInfo must be an object".to_string(),
                ))
            }
        }

        serde_json::from_value(value)
            .map_err(|e| RenderError::MalformedInput(format!("invalid résumé record: {e}")))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ────────────────────────────────────────────────────────────────────────────
// Display helpers shared by both renderers
// ────────────────────────────────────────────────────────────────────────────

/// Returns the trimmed value when it carries visible text.
pub fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Same as [`present`] for optional fields.
pub fn present_opt(value: &Option<String>) -> Option<&str> {
    value.as_deref().and_then(present)
}

/// Joins the non-blank parts with `separator`.
pub fn join_present<'a>(parts: impl IntoIterator<Item = &'a str>, separator: &str) -> String {
    parts
        .into_iter()
        .filter_map(present)
        .collect::<Vec<_>>()
        .join(separator)
}

impl PersonalInfo {
    /// Contact fields in display order, blanks omitted.
    pub fn contact_items(&self) -> Vec<&str> {
        [
            present(&self.email),
            present(&self.phone),
            present(&self.location),
            present_opt(&self.website),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl Experience {
    /// End label: "Present" for a current position, whatever `endDate` holds.
    pub fn end_label(&self) -> &str {
        if self.current {
            "Present"
        } else {
            present_opt(&self.end_date).unwrap_or("")
        }
    }

    pub fn date_range(&self, separator: &str) -> String {
        date_range(&self.start_date, self.end_label(), separator)
    }
}

impl Project {
    pub fn date_range(&self, separator: &str) -> String {
        date_range(
            self.start_date.as_deref().unwrap_or(""),
            self.end_date.as_deref().unwrap_or(""),
            separator,
        )
    }
}

fn date_range(start: &str, end: &str, separator: &str) -> String {
    match (present(start), present(end)) {
        (Some(s), Some(e)) => format!("{s}{separator}{e}"),
        (Some(s), None) => s.to_string(),
        (None, Some(e)) => e.to_string(),
        (None, None) => String::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
