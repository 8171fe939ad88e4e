use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;

/// Parse a type from markdown content with YAML frontmatter
///
/// Both pack manifests (`index.md`) and compiled mirrors carry their
/// structured header as a `---`-delimited YAML block at the top of the file.
///
/// # Errors
///
/// Returns an error if frontmatter extraction fails or YAML deserialization fails.
pub fn parse_from_markdown<T: DeserializeOwned>(content: &str, type_name: &str) -> Result<T> {
    let frontmatter = extract_yaml_frontmatter(content)?;
    serde_yaml::from_value(frontmatter)
        .with_context(|| format!("Failed to parse {type_name} from frontmatter"))
}

/// Extract a single scalar field from YAML frontmatter
///
/// Used where only one header field is load-bearing, e.g. the `source_hash`
/// of a mirror file.
///
/// Returns `None` if the field is not found, or its value is `null`, `~`, or
/// empty.
///
/// # Errors
///
/// Returns an error if frontmatter extraction fails.
pub fn extract_frontmatter_field(content: &str, field: &str) -> Result<Option<String>> {
    let yaml = extract_yaml_frontmatter(content)?;

    let value = match &yaml[field] {
        serde_yaml::Value::Null => return Ok(None),
        serde_yaml::Value::String(s) if s.is_empty() => return Ok(None),
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        _ => return Ok(None),
    };

    Ok(Some(value))
}

/// Extract YAML frontmatter from markdown content
///
/// Expects frontmatter delimited by `---` at the start and end. Returns the
/// parsed YAML as a `serde_yaml::Value`.
///
/// # Errors
///
/// Returns an error if:
/// - Content is empty or missing opening `---`
/// - Closing `---` is not found
/// - YAML content cannot be parsed
pub fn extract_yaml_frontmatter(content: &str) -> Result<serde_yaml::Value> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.is_empty() || !lines[0].trim().starts_with("---") {
        bail!("No frontmatter delimiter found at start of content");
    }

    // Track indentation of opening delimiter to match closing delimiter at same level.
    // This prevents embedded `---` in YAML block scalars (which are indented) from
    // being mistakenly treated as the closing delimiter.
    let opening_indent = lines[0].len() - lines[0].trim_start().len();

    let mut end_idx = None;
    for (idx, line) in lines.iter().enumerate().skip(1) {
        let trimmed = line.trim_start();
        if trimmed.starts_with("---") {
            let line_indent = line.len() - trimmed.len();
            if line_indent == opening_indent {
                end_idx = Some(idx);
                break;
            }
        }
    }

    let end_idx =
        end_idx.ok_or_else(|| anyhow::anyhow!("Frontmatter not properly closed with ---"))?;

    let yaml_content = lines[1..end_idx].join("\n");

    serde_yaml::from_str(&yaml_content).context("Failed to parse YAML frontmatter")
}

/// Return the markdown body that follows the frontmatter block.
///
/// Returns the whole input unchanged when no frontmatter is present, so plain
/// documents pass through.
pub fn strip_frontmatter(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("---") else {
        return content;
    };
    match rest.split_once("\n---") {
        Some((_, after)) => match after.split_once('\n') {
            Some((_, body)) => body,
            None => "",
        },
        None => content,
    }
}
