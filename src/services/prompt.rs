//! Prompt construction
//!
//! Builds the provider-independent prompt for one question. Output depends
//! only on the schema and the question, so identical inputs always produce
//! identical prompt text.

use crate::schemas::SchemaDescription;

/// Fixed system instruction sent with every request
pub const SYSTEM_INSTRUCTION: &str = "You are a SQL expert. Convert natural language questions \
into a single SQL query. Respond with the SQL statement only: no prose, no explanations, \
no markdown.";

const RULES: &str = "Rules:
- Return ONLY the SQL query, no explanations
- Use proper SQLite syntax
- Handle date/time queries appropriately (e.g., \"last week\" = date('now', '-7 days'))
- Be careful with column names and table names
- If the query is ambiguous, make reasonable assumptions";

/// System instruction plus the user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlPrompt {
    pub system: &'static str,
    pub user: String,
}

/// Render the schema one block per table
pub fn format_schema(schema: &SchemaDescription) -> String {
    let mut lines = Vec::new();

    for table in &schema.tables {
        lines.push(format!("Table: {}", table.name));
        lines.push("Columns:".to_string());

        for column in &table.columns {
            lines.push(format!("  - {} ({})", column.name, column.data_type));
        }

        if let Some(row_count) = table.row_count {
            lines.push(format!("Row count: {}", row_count));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

pub fn build_prompt(schema: &SchemaDescription, question: &str) -> SqlPrompt {
    let user = format!(
        "Given the following database schema:\n\n{}\n\nConvert this natural language query to SQL: \"{}\"\n\n{}\n\nSQL Query:",
        format_schema(schema),
        question,
        RULES
    );

    SqlPrompt {
        system: SYSTEM_INSTRUCTION,
        user,
    }
}
