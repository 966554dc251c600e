//! Reference bundling.
//!
//! Produces one self-contained document before structural validation:
//!
//! - internal references (`#/...`) of the root document must resolve and are
//!   kept as they are
//! - external references (`other.yaml#/Pet`, `https://.../pet.json`) are
//!   loaded, bundled relative to their own location and inlined
//! - a reference that leads back into the root document is rewritten as an
//!   internal reference
//! - a recursive reference reached through an external document points at
//!   the spot where its target was first inlined
//!
//! Loading happens up front (async); inlining is a synchronous walk over the
//! loaded documents.

use std::collections::HashMap;

use serde_json::{json, Value};
use tracing::debug;

use super::schema::escape_pointer;
use crate::document::interpret;
use crate::error::{Result, ToolkitError};
use crate::source::{DocumentLoader, Location};

/// Resolves and inlines `$ref`s using a [`DocumentLoader`].
pub struct Bundler<'a> {
    loader: &'a dyn DocumentLoader,
}

impl<'a> Bundler<'a> {
    pub fn new(loader: &'a dyn DocumentLoader) -> Self {
        Self { loader }
    }

    /// Bundle `root`, which was acquired from `location`.
    pub async fn bundle(&self, root: &Value, location: &Location) -> Result<Value> {
        let documents = self.load_external(root, location).await?;
        debug!(
            root = %location,
            external_documents = documents.len(),
            "bundling API document"
        );

        let mut resolver = Resolver {
            root_location: location,
            root,
            documents: &documents,
            chain: Vec::new(),
        };
        let mut bundled = root.clone();
        resolver.inline(&mut bundled, location, "")?;
        Ok(bundled)
    }

    /// Load every document reachable through external references.
    async fn load_external(
        &self,
        root: &Value,
        root_location: &Location,
    ) -> Result<HashMap<Location, Value>> {
        let mut documents = HashMap::new();
        let mut pending = external_targets(root, root_location)?;

        while let Some(target) = pending.pop() {
            if &target == root_location || documents.contains_key(&target) {
                continue;
            }

            let text = self.loader.load(&target).await.map_err(|e| {
                ToolkitError::Bundle(format!("cannot resolve $ref to {target}: {e}"))
            })?;
            let doc = interpret(&text, &target.name_hint()).map_err(|e| {
                ToolkitError::Bundle(format!("cannot resolve $ref to {target}: {e}"))
            })?;

            pending.extend(external_targets(&doc, &target)?);
            documents.insert(target, doc);
        }

        Ok(documents)
    }
}

struct Resolver<'d> {
    root_location: &'d Location,
    root: &'d Value,
    documents: &'d HashMap<Location, Value>,
    /// External targets currently being inlined, outermost first, with the
    /// pointer into the bundled document where each one was placed.
    chain: Vec<(String, String)>,
}

impl Resolver<'_> {
    /// `pointer` is the position of `node` in the bundled document.
    fn inline(&mut self, node: &mut Value, base: &Location, pointer: &str) -> Result<()> {
        match node {
            Value::Object(map) => {
                if let Some(Value::String(reference)) = map.get("$ref") {
                    let reference = reference.clone();
                    if let Some(replacement) = self.resolve(&reference, base, pointer)? {
                        *node = replacement;
                    }
                    return Ok(());
                }
                for (key, value) in map.iter_mut() {
                    let child = format!("{pointer}/{}", escape_pointer(key));
                    self.inline(value, base, &child)?;
                }
            }
            Value::Array(items) => {
                for (index, value) in items.iter_mut().enumerate() {
                    self.inline(value, base, &format!("{pointer}/{index}"))?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// `None` keeps the reference untouched.
    fn resolve(
        &mut self,
        reference: &str,
        base: &Location,
        pointer: &str,
    ) -> Result<Option<Value>> {
        let (path, fragment) = split_reference(reference);
        let target = if path.is_empty() {
            base.clone()
        } else {
            base.join(path)?
        };

        if &target == self.root_location {
            if lookup(self.root, fragment).is_none() {
                return Err(ToolkitError::Bundle(format!(
                    "unresolvable $ref '{reference}' in {base}"
                )));
            }
            if path.is_empty() {
                return Ok(None);
            }
            return Ok(Some(json!({ "$ref": format!("#{fragment}") })));
        }

        let documents = self.documents;
        let document = documents.get(&target).ok_or_else(|| {
            ToolkitError::Bundle(format!("document {target} was not loaded for $ref '{reference}'"))
        })?;
        let resolved = lookup(document, fragment).ok_or_else(|| {
            ToolkitError::Bundle(format!("unresolvable $ref '{reference}' in {base}"))
        })?;

        let key = format!("{target}#{fragment}");
        if let Some((_, placed)) = self.chain.iter().find(|(k, _)| *k == key) {
            debug!(reference, placed = %placed, "recursive $ref rewritten as internal");
            return Ok(Some(json!({ "$ref": format!("#{placed}") })));
        }

        self.chain.push((key, pointer.to_string()));
        let mut inlined = resolved.clone();
        let result = self.inline(&mut inlined, &target, pointer);
        self.chain.pop();
        result?;

        Ok(Some(inlined))
    }
}

/// Split `path#fragment`; either side may be empty.
fn split_reference(reference: &str) -> (&str, &str) {
    reference.split_once('#').unwrap_or((reference, ""))
}

/// JSON-pointer lookup; an empty fragment is the whole document.
fn lookup<'v>(doc: &'v Value, fragment: &str) -> Option<&'v Value> {
    if fragment.is_empty() {
        Some(doc)
    } else {
        doc.pointer(fragment)
    }
}

/// Locations of every external reference in `doc`.
fn external_targets(doc: &Value, base: &Location) -> Result<Vec<Location>> {
    let mut references = Vec::new();
    collect_references(doc, &mut references);

    references
        .into_iter()
        .filter_map(|reference| {
            let (path, _) = split_reference(reference);
            (!path.is_empty()).then(|| base.join(path))
        })
        .collect()
}

fn collect_references<'v>(node: &'v Value, out: &mut Vec<&'v str>) {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                out.push(reference.as_str());
                return;
            }
            for value in map.values() {
                collect_references(value, out);
            }
        }
        Value::Array(items) => {
            for value in items {
                collect_references(value, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::MemoryLoader;
    use std::path::PathBuf;

    fn root_location() -> Location {
        Location::File(PathBuf::from("/specs/openapi.json"))
    }

    #[test]
    fn test_split_reference() {
        assert_eq!(split_reference("#/components/schemas/Pet"), ("", "/components/schemas/Pet"));
        assert_eq!(split_reference("pet.yaml#/Pet"), ("pet.yaml", "/Pet"));
        assert_eq!(split_reference("pet.yaml"), ("pet.yaml", ""));
    }

    #[tokio::test]
    async fn test_internal_references_are_kept() {
        let loader = MemoryLoader::new();
        let root = json!({
            "components": { "schemas": { "Pet": { "type": "object" } } },
            "paths": { "/pets": { "schema": { "$ref": "#/components/schemas/Pet" } } }
        });

        let bundled = Bundler::new(&loader)
            .bundle(&root, &root_location())
            .await
            .unwrap();
        assert_eq!(bundled, root);
    }

    #[tokio::test]
    async fn test_unresolvable_internal_reference_fails() {
        let loader = MemoryLoader::new();
        let root = json!({ "schema": { "$ref": "#/components/schemas/Missing" } });

        let err = Bundler::new(&loader)
            .bundle(&root, &root_location())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolkitError::Bundle(_)));
        assert!(err.to_string().contains("#/components/schemas/Missing"));
    }

    #[tokio::test]
    async fn test_external_reference_is_inlined() {
        let loader = MemoryLoader::new().with_document(
            Location::File(PathBuf::from("/specs/models/pet.yaml")),
            "Pet:\n  type: object\n  properties:\n    name:\n      type: string\n",
        );
        let root = json!({ "schema": { "$ref": "models/pet.yaml#/Pet" } });

        let bundled = Bundler::new(&loader)
            .bundle(&root, &root_location())
            .await
            .unwrap();
        assert_eq!(bundled["schema"]["type"], json!("object"));
        assert_eq!(bundled["schema"]["properties"]["name"]["type"], json!("string"));
    }

    #[tokio::test]
    async fn test_nested_external_references_resolve_relative_to_their_file() {
        let loader = MemoryLoader::new()
            .with_document(
                Location::File(PathBuf::from("/specs/models/pet.json")),
                r#"{ "type": "object", "properties": { "owner": { "$ref": "../shared/owner.json" } } }"#,
            )
            .with_document(
                Location::File(PathBuf::from("/specs/shared/owner.json")),
                r#"{ "type": "string" }"#,
            );
        let root = json!({ "schema": { "$ref": "./models/pet.json" } });

        let bundled = Bundler::new(&loader)
            .bundle(&root, &root_location())
            .await
            .unwrap();
        assert_eq!(
            bundled["schema"]["properties"]["owner"],
            json!({ "type": "string" })
        );
    }

    #[tokio::test]
    async fn test_reference_back_into_root_becomes_internal() {
        let loader = MemoryLoader::new().with_document(
            Location::File(PathBuf::from("/specs/models/pet.json")),
            r#"{ "type": "object", "properties": { "tag": { "$ref": "../openapi.json#/components/schemas/Tag" } } }"#,
        );
        let root = json!({
            "components": { "schemas": { "Tag": { "type": "string" } } },
            "schema": { "$ref": "models/pet.json" }
        });

        let bundled = Bundler::new(&loader)
            .bundle(&root, &root_location())
            .await
            .unwrap();
        assert_eq!(
            bundled["schema"]["properties"]["tag"],
            json!({ "$ref": "#/components/schemas/Tag" })
        );
    }

    #[tokio::test]
    async fn test_self_recursive_external_schema_becomes_internal() {
        let loader = MemoryLoader::new().with_document(
            Location::File(PathBuf::from("/specs/tree.yaml")),
            "Node:\n  type: object\n  properties:\n    children:\n      type: array\n      items:\n        $ref: '#/Node'\n",
        );
        let root = json!({
            "paths": { "/tree": { "schema": { "$ref": "tree.yaml#/Node" } } }
        });

        let bundled = Bundler::new(&loader)
            .bundle(&root, &root_location())
            .await
            .unwrap();
        let node = &bundled["paths"]["/tree"]["schema"];
        assert_eq!(node["type"], json!("object"));
        assert_eq!(
            node["properties"]["children"]["items"],
            json!({ "$ref": "#/paths/~1tree/schema" })
        );
        assert!(bundled.pointer("/paths/~1tree/schema").is_some());
    }

    #[tokio::test]
    async fn test_mutually_recursive_external_documents_bundle() {
        let loader = MemoryLoader::new()
            .with_document(
                Location::File(PathBuf::from("/specs/a.json")),
                r#"{ "type": "object", "properties": { "next": { "$ref": "b.json" } } }"#,
            )
            .with_document(
                Location::File(PathBuf::from("/specs/b.json")),
                r#"{ "type": "object", "properties": { "back": { "$ref": "a.json" } } }"#,
            );
        let root = json!({ "schema": { "$ref": "a.json" } });

        let bundled = Bundler::new(&loader)
            .bundle(&root, &root_location())
            .await
            .unwrap();
        assert_eq!(
            bundled["schema"]["properties"]["next"]["properties"]["back"],
            json!({ "$ref": "#/schema" })
        );
    }

    #[tokio::test]
    async fn test_missing_external_document_fails() {
        let loader = MemoryLoader::new();
        let root = json!({ "schema": { "$ref": "missing.yaml#/Pet" } });

        let err = Bundler::new(&loader)
            .bundle(&root, &root_location())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolkitError::Bundle(_)));
        assert!(err.to_string().contains("/specs/missing.yaml"));
    }

    #[tokio::test]
    async fn test_missing_pointer_in_external_document_fails() {
        let loader = MemoryLoader::new().with_document(
            Location::File(PathBuf::from("/specs/pet.json")),
            r#"{ "Pet": {} }"#,
        );
        let root = json!({ "schema": { "$ref": "pet.json#/Dog" } });

        let err = Bundler::new(&loader)
            .bundle(&root, &root_location())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unresolvable $ref 'pet.json#/Dog'"));
    }
}
