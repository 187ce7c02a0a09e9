use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// How two sources are cross-referenced and which output columns they feed.
///
/// The primary source wins whenever its record for a key has the mapped field.
/// A column's `secondary` field is only read when the primary record for that key
/// is missing or lacks the field.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinConfig {
    pub primary: SourceConfig,
    pub secondary: SourceConfig,
    pub columns: Vec<OutputColumn>,
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Label used in logs and errors.
    pub name: String,
    /// Field whose normalized value is the join key.
    pub key_field: String,
}

// ---------------------------------------------------------------------------
// Output columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputColumn {
    pub name: String,
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub secondary: Option<String>,
}

impl OutputColumn {
    fn new(name: &str, primary: Option<&str>, secondary: Option<&str>) -> Self {
        Self {
            name: name.into(),
            primary: primary.map(Into::into),
            secondary: secondary.map(Into::into),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults: TED talks (primary) x YouTube TED crawl (secondary)
// ---------------------------------------------------------------------------

impl Default for JoinConfig {
    fn default() -> Self {
        let col = OutputColumn::new;
        Self {
            primary: SourceConfig {
                name: "ted".into(),
                key_field: "headline".into(),
            },
            secondary: SourceConfig {
                name: "youtube".into(),
                key_field: "Descrip".into(),
            },
            columns: vec![
                col("ted_id", Some("id"), None),
                col("speaker", Some("speaker"), Some("Speaker")),
                col("headline", Some("headline"), Some("Descrip")),
                col("TED_URL", Some("URL"), None),
                col("transcript_URL", Some("transcript_URL"), None),
                col("youtube_url", None, Some("YTLink")),
                col("month_filmed", Some("month_filmed"), None),
                col("year_filmed", Some("year_filmed"), None),
                col("event", Some("event"), None),
                col("time_str", None, Some("TimeStr")),
                col("duration", Some("duration"), None),
                col("date_published", Some("date_published"), None),
                col("youtube_title", None, Some("Descrip|Speaker")),
                col("views_text", None, Some("ViewStr")),
                col("tags", Some("tags"), None),
                col("description", Some("description"), None),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl JoinConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: JoinConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for source in [&self.primary, &self.secondary] {
            if source.key_field.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "source '{}': key_field must not be empty",
                    source.name
                )));
            }
        }

        if self.columns.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one output column is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.name.is_empty() {
                return Err(ReconError::ConfigValidation(
                    "output column name must not be empty".into(),
                ));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(ReconError::ConfigValidation(format!(
                    "duplicate output column '{}'",
                    column.name
                )));
            }
            if column.primary.is_none() && column.secondary.is_none() {
                return Err(ReconError::ConfigValidation(format!(
                    "output column '{}' maps no source field",
                    column.name
                )));
            }
        }

        Ok(())
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TALKS_X_VIDEOS: &str = r#"
[primary]
name = "talks"
key_field = "title"

[secondary]
name = "videos"
key_field = "Title"

[[columns]]
name = "title"
primary = "title"
secondary = "Title"

[[columns]]
name = "url"
secondary = "Link"
"#;

    #[test]
    fn parse_valid() {
        let config = JoinConfig::from_toml(TALKS_X_VIDEOS).unwrap();
        assert_eq!(config.primary.key_field, "title");
        assert_eq!(config.secondary.name, "videos");
        assert_eq!(config.column_names(), vec!["title", "url"]);
        assert_eq!(config.columns[1].primary, None);
        assert_eq!(config.columns[1].secondary.as_deref(), Some("Link"));
    }

    #[test]
    fn default_is_valid() {
        let config = JoinConfig::default();
        config.validate().unwrap();
        assert_eq!(config.columns.len(), 16);
        assert_eq!(config.primary.key_field, "headline");
        assert_eq!(config.secondary.key_field, "Descrip");
        // time_str and duration are separate columns
        let names = config.column_names();
        let t = names.iter().position(|n| n == "time_str").unwrap();
        assert_eq!(names[t + 1], "duration");
    }

    #[test]
    fn reject_duplicate_column() {
        let input = format!(
            r#"{TALKS_X_VIDEOS}
[[columns]]
name = "url"
primary = "URL"
"#
        );
        let err = JoinConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("duplicate output column 'url'"));
    }

    #[test]
    fn reject_unmapped_column() {
        let input = format!(
            r#"{TALKS_X_VIDEOS}
[[columns]]
name = "orphan"
"#
        );
        let err = JoinConfig::from_toml(&input).unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }

    #[test]
    fn reject_empty_key_field() {
        let input = TALKS_X_VIDEOS.replace(r#"key_field = "title""#, r#"key_field = """#);
        let err = JoinConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("key_field must not be empty"));
    }

    #[test]
    fn reject_missing_section() {
        let err = JoinConfig::from_toml("[primary]\nname = \"a\"\nkey_field = \"k\"\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }
}
