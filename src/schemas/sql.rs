//! SQL generation request/response types
//!
//! These are the caller-facing value objects: the dataset schema the prompt is
//! grounded on, the generation request, and the generated SQL result. All of
//! them live for a single generation call.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

// ============================================================================
// Provider Kind
// ============================================================================

/// LLM provider family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI direct API
    #[serde(rename = "openai")]
    OpenAi,
    /// Anthropic models hosted on AWS Bedrock
    #[serde(rename = "anthropic", alias = "bedrock")]
    Bedrock,
}

impl ProviderKind {
    /// Wire name of the provider
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Bedrock => "anthropic",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "bedrock" => Ok(ProviderKind::Bedrock),
            _ => Err(format!(
                "Invalid provider: {}. Expected: openai or anthropic",
                s
            )),
        }
    }
}

// ============================================================================
// Schema Description
// ============================================================================

/// Ordered description of the tables a question may be answered from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescription {
    #[serde(default)]
    pub tables: Vec<TableSchema>,
}

/// A single table and its ordered columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub name: String,

    #[serde(default)]
    pub columns: Vec<ColumnSchema>,

    /// Number of rows in the uploaded dataset, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
}

/// Column name and declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,

    #[serde(rename = "type")]
    pub data_type: String,
}

impl SchemaDescription {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Read a schema from a JSON file
    ///
    /// Accepts either `{"tables": [...]}` or a bare array of tables.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file {}", path.display()))?;

        let value: serde_json::Value = serde_json::from_str(&raw)
            .with_context(|| format!("Schema file {} is not valid JSON", path.display()))?;

        let schema = if value.is_array() {
            Self::new(serde_json::from_value(value)?)
        } else {
            serde_json::from_value(value)?
        };

        Ok(schema)
    }
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            row_count: None,
        }
    }

    /// Append a column
    pub fn with_column(mut self, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        self.columns.push(ColumnSchema {
            name: name.into(),
            data_type: data_type.into(),
        });
        self
    }

    pub fn with_row_count(mut self, row_count: u64) -> Self {
        self.row_count = Some(row_count);
        self
    }
}

// ============================================================================
// Generation Request / Result
// ============================================================================

/// Natural-language question plus everything needed to answer it with SQL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub question: String,

    #[serde(default)]
    pub schema: SchemaDescription,

    /// Provider the caller would like to use, honored only if configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_preference: Option<ProviderKind>,

    /// Model identifier passed to the provider verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl GenerationRequest {
    pub fn new(question: impl Into<String>, schema: SchemaDescription) -> Self {
        Self {
            question: question.into(),
            schema,
            provider_preference: None,
            model: None,
        }
    }

    pub fn with_preference(mut self, provider: ProviderKind) -> Self {
        self.provider_preference = Some(provider);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Model override, ignoring blank strings
    pub fn model_override(&self) -> Option<&str> {
        self.model.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// Generated SQL and the provider that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub sql: String,
    pub provider: ProviderKind,
}
