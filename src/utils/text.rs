//! Text helpers for model output
//!
//! Strips markdown code fences from model replies and truncates long strings
//! at character boundaries for log and error previews.

const FENCE: &str = "```";

/// Info strings recognized after an opening fence
const LANGUAGE_TAGS: &[&str] = &[
    "sql", "sqlite", "sqlite3", "postgresql", "postgres", "psql", "pgsql", "mysql", "tsql",
    "plsql", "duckdb", "ansi-sql",
];

/// Normalize a model reply into bare SQL
///
/// Trims whitespace and, when the reply is wrapped in a fenced code block,
/// removes the fence markers and the optional language tag.
///
/// # Example
/// ```
/// use nl2sql_service::utils::normalize_sql;
///
/// assert_eq!(normalize_sql("```sql\nSELECT 1;\n```"), "SELECT 1;");
/// assert_eq!(normalize_sql("  SELECT 1;  "), "SELECT 1;");
/// ```
pub fn normalize_sql(text: &str) -> String {
    strip_code_fence(text.trim()).trim().to_string()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };
    let body = rest.strip_suffix(FENCE).unwrap_or(rest);

    match body.split_once('\n') {
        Some((tag, inner)) if is_language_tag(tag) => inner,
        Some(_) => body,
        // Single-line fence: "```sql SELECT 1```"
        None => match body.trim_start().split_once(char::is_whitespace) {
            Some((tag, inner)) if tag.eq_ignore_ascii_case("sql") => inner,
            _ => body,
        },
    }
}

/// Empty info string, or a known SQL dialect name in any case
fn is_language_tag(tag: &str) -> bool {
    let tag = tag.trim();
    tag.is_empty() || LANGUAGE_TAGS.iter().any(|known| tag.eq_ignore_ascii_case(known))
}

/// Truncate to at most `max_chars` characters, appending `suffix` when cut
pub fn truncate_with_suffix(s: &str, max_chars: usize, suffix: &str) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}{}", &s[..idx], suffix),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_with_language_tag() {
        assert_eq!(normalize_sql("```sql\nSELECT 1;\n```"), "SELECT 1;");
        assert_eq!(
            normalize_sql("```SQL\nSELECT *\nFROM users\n```"),
            "SELECT *\nFROM users"
        );
    }

    #[test]
    fn test_fenced_without_language_tag() {
        assert_eq!(normalize_sql("```\nSELECT * FROM orders\n```"), "SELECT * FROM orders");
    }

    #[test]
    fn test_unfenced_is_only_trimmed() {
        assert_eq!(normalize_sql("  SELECT 1;  "), "SELECT 1;");
        assert_eq!(
            normalize_sql("\nSELECT * FROM users WHERE age > 25\n"),
            "SELECT * FROM users WHERE age > 25"
        );
    }

    #[test]
    fn test_surrounding_whitespace_around_fence() {
        assert_eq!(normalize_sql("\n  ```sql\nSELECT 1;\n```  \n"), "SELECT 1;");
    }

    #[test]
    fn test_unterminated_fence() {
        assert_eq!(normalize_sql("```sql\nSELECT 1;"), "SELECT 1;");
    }

    #[test]
    fn test_single_line_fence() {
        assert_eq!(normalize_sql("```SELECT 1;```"), "SELECT 1;");
        assert_eq!(normalize_sql("```sql SELECT 1;```"), "SELECT 1;");
    }

    #[test]
    fn test_first_line_with_sql_is_not_a_tag() {
        assert_eq!(
            normalize_sql("```SELECT *\nFROM t```"),
            "SELECT *\nFROM t"
        );
    }

    #[test]
    fn test_bare_keyword_first_line_is_kept() {
        assert_eq!(
            normalize_sql("```SELECT\nname FROM users\n```"),
            "SELECT\nname FROM users"
        );
        assert_eq!(
            normalize_sql("```WITH\nt AS (SELECT 1)\nSELECT * FROM t\n```"),
            "WITH\nt AS (SELECT 1)\nSELECT * FROM t"
        );
    }

    #[test]
    fn test_dialect_tags_are_stripped() {
        assert_eq!(normalize_sql("```sqlite\nSELECT 1;\n```"), "SELECT 1;");
        assert_eq!(normalize_sql("```PostgreSQL\nSELECT 1;\n```"), "SELECT 1;");
    }

    #[test]
    fn test_empty_reply() {
        assert_eq!(normalize_sql("   "), "");
        assert_eq!(normalize_sql("```sql\n```"), "");
    }

    #[test]
    fn test_truncate_with_suffix() {
        assert_eq!(truncate_with_suffix("Hello, World!", 5, "..."), "Hello...");
        assert_eq!(truncate_with_suffix("Hi", 5, "..."), "Hi");
        assert_eq!(truncate_with_suffix("héllo wörld", 7, "…"), "héllo w…");
    }
}
