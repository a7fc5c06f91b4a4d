use serde::{Deserialize, Serialize};
use uidmatch_io::TextEncoding;

use crate::error::ReconError;
use crate::report::Language;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub language: Language,
    /// Values rendered per column in merge reports; 0 = unlimited.
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,
    /// Encoding fallback chain, tried in order.
    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,
    #[serde(default)]
    pub compare: CompareConfig,
    #[serde(default)]
    pub merge: MergeConfig,
    #[serde(default)]
    pub violations: ViolationConfig,
}

pub const DEFAULT_PREVIEW_LIMIT: usize = 1000;

fn default_preview_limit() -> usize {
    DEFAULT_PREVIEW_LIMIT
}

fn default_encodings() -> Vec<String> {
    TextEncoding::DEFAULT_CHAIN.iter().map(|e| e.label().to_string()).collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            encodings: default_encodings(),
            compare: CompareConfig::default(),
            merge: MergeConfig::default(),
            violations: ViolationConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompareConfig {
    /// Candidate identifier columns for tabular inputs, first hit wins.
    #[serde(default = "default_id_columns")]
    pub id_columns: Vec<String>,
}

fn default_id_columns() -> Vec<String> {
    vec!["doc_num".into(), "TV_SERIALNUMBER".into(), "uid".into()]
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self { id_columns: default_id_columns() }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MergeConfig {
    #[serde(default = "default_merge_columns")]
    pub columns: Vec<String>,
}

fn default_merge_columns() -> Vec<String> {
    vec!["doc_num".into()]
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self { columns: default_merge_columns() }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ViolationConfig {
    #[serde(default = "default_violation_column")]
    pub column: String,
    /// Header fragments tried when `column` does not resolve.
    #[serde(default = "default_violation_aliases")]
    pub aliases: Vec<String>,
}

fn default_violation_column() -> String {
    "qoidabuzarlik nomi".into()
}

fn default_violation_aliases() -> Vec<String> {
    vec!["nomi".into(), "название".into()]
}

impl Default for ViolationConfig {
    fn default() -> Self {
        Self { column: default_violation_column(), aliases: default_violation_aliases() }
    }
}

// ---------------------------------------------------------------------------
// Parse + validate
// ---------------------------------------------------------------------------

impl EngineConfig {
    /// Parse from TOML and validate.
    pub fn from_toml(s: &str) -> Result<Self, ReconError> {
        let config: EngineConfig =
            toml::from_str(s).map_err(|e| ReconError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.encodings.is_empty() {
            return Err(ReconError::Config("encodings must list at least one encoding".into()));
        }
        for name in &self.encodings {
            if TextEncoding::from_label(name).is_none() {
                return Err(ReconError::Config(format!(
                    "unknown encoding '{name}' (expected utf-8, utf-8-sig, windows-1251 or latin-1)"
                )));
            }
        }
        if self.compare.id_columns.iter().all(|c| c.trim().is_empty()) {
            return Err(ReconError::Config("compare.id_columns must name at least one column".into()));
        }
        if self.violations.column.trim().is_empty() {
            return Err(ReconError::Config("violations.column must not be empty".into()));
        }
        Ok(())
    }

    /// The fallback chain as typed encodings. Unknown names are skipped;
    /// `validate` rejects them up front.
    pub fn encoding_chain(&self) -> Vec<TextEncoding> {
        self.encodings.iter().filter_map(|n| TextEncoding::from_label(n)).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = EngineConfig::from_toml("").unwrap();
        assert_eq!(config.language, Language::Ru);
        assert_eq!(config.preview_limit, 1000);
        assert_eq!(config.encoding_chain(), TextEncoding::DEFAULT_CHAIN.to_vec());
        assert_eq!(config.compare.id_columns, vec!["doc_num", "TV_SERIALNUMBER", "uid"]);
        assert_eq!(config.merge.columns, vec!["doc_num"]);
        assert_eq!(config.violations.column, "qoidabuzarlik nomi");
        assert_eq!(config.violations.aliases, vec!["nomi", "название"]);
    }

    #[test]
    fn parse_full_document() {
        let input = r#"
language = "uz"
preview_limit = 0
encodings = ["cp1251", "utf-8"]

[compare]
id_columns = ["serial"]

[merge]
columns = ["doc_num", "uid"]

[violations]
column = "violation"
aliases = []
"#;
        let config = EngineConfig::from_toml(input).unwrap();
        assert_eq!(config.language, Language::Uz);
        assert_eq!(config.preview_limit, 0);
        assert_eq!(
            config.encoding_chain(),
            vec![TextEncoding::Windows1251, TextEncoding::Utf8]
        );
        assert_eq!(config.compare.id_columns, vec!["serial"]);
        assert_eq!(config.merge.columns.len(), 2);
        assert!(config.violations.aliases.is_empty());
    }

    #[test]
    fn rejects_unknown_encoding() {
        let err = EngineConfig::from_toml(r#"encodings = ["koi8-r"]"#).unwrap_err();
        assert!(err.to_string().contains("koi8-r"));
    }

    #[test]
    fn rejects_empty_chain() {
        assert!(EngineConfig::from_toml("encodings = []").is_err());
    }

    #[test]
    fn rejects_unknown_language_and_keys() {
        assert!(EngineConfig::from_toml(r#"language = "en""#).is_err());
        assert!(EngineConfig::from_toml("preview = 5").is_err());
    }
}
