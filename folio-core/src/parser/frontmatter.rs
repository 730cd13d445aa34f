//! Frontmatter extraction.
//!
//! A frontmatter block starts with a `---` line at the very top of the document
//! and ends with a `---` or `...` line. Its content is YAML and must be a
//! key/value mapping. Without a closing delimiter the block is ordinary
//! markdown (a thematic break), not an error.

use crate::error::FolioError;
use serde_yaml::Value;
use std::collections::BTreeMap;

pub type Metadata = BTreeMap<String, String>;

/// Split `source` into its frontmatter metadata and the remaining body.
pub fn split_frontmatter(source: &str) -> Result<(Metadata, &str), FolioError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let mut lines = source.split_inclusive('\n');
    match lines.next() {
        Some(first) if first.trim_end() == "---" => {}
        _ => return Ok((Metadata::new(), source)),
    }

    let yaml_start = first_line_len(source);
    let mut offset = yaml_start;
    for line in lines {
        let end = offset + line.len();
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let metadata = parse_block(&source[yaml_start..offset])?;
            return Ok((metadata, &source[end..]));
        }
        offset = end;
    }

    Ok((Metadata::new(), source))
}

fn first_line_len(source: &str) -> usize {
    source.find('\n').map(|i| i + 1).unwrap_or(source.len())
}

fn parse_block(yaml: &str) -> Result<Metadata, FolioError> {
    if yaml.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let value: Value = serde_yaml::from_str(yaml).map_err(|err| FolioError::Parse {
        message: err.to_string(),
        source: Some(err),
    })?;

    match value {
        Value::Null => Ok(Metadata::new()),
        Value::Mapping(mapping) => {
            let mut metadata = Metadata::new();
            for (key, value) in mapping {
                let key = scalar_key(&key).ok_or_else(|| FolioError::Parse {
                    message: "frontmatter keys must be plain scalars".to_string(),
                    source: None,
                })?;
                metadata.insert(key, stringify(&value));
            }
            Ok(metadata)
        }
        _ => Err(FolioError::Parse {
            message: "frontmatter must be a block of key: value pairs".to_string(),
            source: None,
        }),
    }
}

fn scalar_key(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items.iter().map(stringify).collect::<Vec<_>>().join(", "),
        Value::Mapping(_) | Value::Tagged(_) => serde_yaml::to_string(value)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}
