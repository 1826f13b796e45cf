use std::path::{Path, PathBuf};

use jsonschema::{Retrieve, Uri};
use serde_json::Value;

use crate::strict::Strictness;

/// Resolves external `$ref` URIs to schema files on disk.
///
/// Lookup order for a URI:
/// 1. a `file://` URI whose path exists is read directly;
/// 2. the last path segment under the schema root (`/schemas/user.json#`
///    resolves to `<root>/user.json`);
/// 3. the same segment with `.json` appended (`"id": "user"` resolves to
///    `<root>/user.json`).
///
/// Nothing is ever fetched over the network.
pub struct SchemaDirectoryRetriever {
    root: PathBuf,
    strictness: Strictness,
}

impl SchemaDirectoryRetriever {
    pub fn new(root: impl Into<PathBuf>, strictness: Strictness) -> Self {
        Self {
            root: root.into(),
            strictness,
        }
    }

    fn candidates(&self, uri: &str) -> Vec<PathBuf> {
        let location = uri.split('#').next().unwrap_or(uri);
        let mut candidates = Vec::new();

        if let Some(path) = location.strip_prefix("file://") {
            candidates.push(PathBuf::from(path));
        }

        if let Some(name) = location.rsplit('/').next().filter(|s| !s.is_empty()) {
            candidates.push(self.root.join(name));
            if Path::new(name).extension().is_none() {
                candidates.push(self.root.join(format!("{name}.json")));
            }
        }

        candidates
    }
}

impl Retrieve for SchemaDirectoryRetriever {
    fn retrieve(
        &self,
        uri: &Uri<String>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        let Some(path) = self.candidates(uri_str).into_iter().find(|p| p.is_file()) else {
            tracing::warn!(uri = %uri_str, root = %self.root.display(), "unresolvable schema reference");
            return Err(format!(
                "schema reference `{uri_str}` not found under {}",
                self.root.display()
            )
            .into());
        };

        tracing::debug!(uri = %uri_str, path = %path.display(), "resolved schema reference");

        let text = std::fs::read_to_string(&path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        let mut schema: Value = serde_json::from_str(&text)
            .map_err(|e| format!("{} is not valid JSON: {e}", path.display()))?;
        self.strictness.apply(&mut schema);
        redirect_file_pointers(&mut schema);

        Ok(schema)
    }
}

/// Reads `"$ref": "#/<name>.json"` as a reference to the schema file
/// `<name>.json` when the document has no `<name>.json` member.
pub fn redirect_file_pointers(schema: &mut Value) {
    let document = schema.clone();
    redirect(schema, &document);
}

fn redirect(node: &mut Value, document: &Value) {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get_mut("$ref") {
                if let Some(target) = file_pointer_target(reference, document) {
                    tracing::debug!(reference = %reference, %target, "pointer names a schema file");
                    *reference = target;
                }
            }
            for value in map.values_mut() {
                redirect(value, document);
            }
        }
        Value::Array(items) => {
            for item in items {
                redirect(item, document);
            }
        }
        _ => {}
    }
}

fn file_pointer_target(reference: &str, document: &Value) -> Option<String> {
    let pointer = reference.strip_prefix('#')?;
    let name = pointer.strip_prefix('/')?;
    if name.contains('/') || !name.ends_with(".json") || document.pointer(pointer).is_some() {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn candidates_prefer_file_uri_then_root() {
        let retriever = SchemaDirectoryRetriever::new("/schemas", Strictness::AsWritten);
        let candidates = retriever.candidates("file:///elsewhere/user.json#/definitions/id");

        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/elsewhere/user.json"),
                PathBuf::from("/schemas/user.json"),
            ]
        );
    }

    #[test]
    fn bare_identifier_gets_json_extension() {
        let retriever = SchemaDirectoryRetriever::new("/schemas", Strictness::AsWritten);
        let candidates = retriever.candidates("json-schema:///nested");

        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/schemas/nested"),
                PathBuf::from("/schemas/nested.json"),
            ]
        );
    }

    #[test]
    fn missing_json_member_pointer_becomes_file_reference() {
        let mut schema = json!({
            "properties": {
                "a": {"$ref": "#/nested.json"},
                "b": {"$ref": "#/definitions/id"}
            }
        });
        redirect_file_pointers(&mut schema);

        assert_eq!(schema["properties"]["a"]["$ref"], json!("nested.json"));
        assert_eq!(schema["properties"]["b"]["$ref"], json!("#/definitions/id"));
    }

    #[test]
    fn existing_json_member_pointer_is_kept() {
        let mut schema = json!({
            "nested.json": {"type": "string"},
            "properties": {"a": {"$ref": "#/nested.json"}}
        });
        redirect_file_pointers(&mut schema);

        assert_eq!(schema["properties"]["a"]["$ref"], json!("#/nested.json"));
    }

    #[test]
    fn trailing_slash_yields_no_candidate() {
        let retriever = SchemaDirectoryRetriever::new("/schemas", Strictness::AsWritten);
        assert!(retriever.candidates("https://example.com/").is_empty());
    }
}
