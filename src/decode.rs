//! Decoders turning raw file contents into items.

use std::sync::Arc;

use serde::Deserialize;

use crate::{ConfigStoreError, Item, Result};

/// Turns the bytes of a file into items.
pub type Decoder = Arc<dyn Fn(&[u8]) -> Result<Vec<Item>> + Send + Sync>;

/// The decoder used when a file source does not supply its own.
pub fn default_decoder() -> Decoder {
    Arc::new(yaml_items)
}

/// Decodes a YAML sequence of `{key, value, priority}` maps.
///
/// An empty document decodes to no items.
///
/// # Errors
/// Returns `ConfigStoreError::DecodeError` if the content is not such a sequence.
pub fn yaml_items(bytes: &[u8]) -> Result<Vec<Item>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let items: Option<Vec<Item>> =
        serde_yaml::from_slice(bytes).map_err(|e| ConfigStoreError::decode("yaml", e))?;

    Ok(items.unwrap_or_default())
}

/// Decodes a JSON array of `{key, value, priority}` objects.
///
/// # Errors
/// Returns `ConfigStoreError::DecodeError` if the content is not such an array.
pub fn json_items(bytes: &[u8]) -> Result<Vec<Item>> {
    serde_json::from_slice(bytes).map_err(|e| ConfigStoreError::decode("json", e))
}

#[derive(Deserialize)]
struct TomlItems {
    #[serde(default)]
    item: Vec<Item>,
}

/// Decodes TOML `[[item]]` tables, each with `key`, `value` and `priority`.
///
/// # Errors
/// Returns `ConfigStoreError::DecodeError` if the content is not valid UTF-8
/// or not valid TOML of that shape.
pub fn toml_items(bytes: &[u8]) -> Result<Vec<Item>> {
    let content = std::str::from_utf8(bytes).map_err(|e| ConfigStoreError::decode("toml", e))?;
    let doc: TomlItems = toml::from_str(content).map_err(|e| ConfigStoreError::decode("toml", e))?;

    Ok(doc.item)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn yaml_sequence_decodes_in_order() {
        let items = yaml_items(
            b"- key: db-host\n  value: localhost\n  priority: 10\n- key: db-port\n  value: \"5432\"\n",
        )
        .unwrap();

        assert_eq!(
            items,
            vec![
                Item::new("db-host", "localhost", 10),
                Item::new("db-port", "5432", 0),
            ]
        );
    }

    #[test]
    fn empty_yaml_document_is_empty_list() {
        assert!(yaml_items(b"").unwrap().is_empty());
    }

    #[test]
    fn yaml_accepts_json_arrays() {
        let items = yaml_items(br#"[{"key": "a", "value": "1", "priority": 2}]"#).unwrap();

        assert_eq!(items, vec![Item::new("a", "1", 2)]);
    }

    #[test]
    fn yaml_rejects_non_sequences() {
        let err = yaml_items(b"just: a map\n").unwrap_err();

        assert!(matches!(err, ConfigStoreError::DecodeError { ref format, .. } if format == "yaml"));
    }

    #[test]
    fn json_and_toml_decoders() {
        let json = json_items(br#"[{"key": "a", "value": "1"}]"#).unwrap();
        assert_eq!(json, vec![Item::new("a", "1", 0)]);

        let toml = toml_items(b"[[item]]\nkey = \"a\"\nvalue = \"1\"\npriority = 4\n").unwrap();
        assert_eq!(toml, vec![Item::new("a", "1", 4)]);

        assert!(json_items(b"{").is_err());
        assert!(toml_items(b"[[item]]\nkey = 1\n").is_err());
    }
}
