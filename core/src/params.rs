//! Form parameter assembly.
//!
//! # Design
//! `FormParams` keeps insertion order so encoded bodies are deterministic
//! and easy to assert on. Custom fields are serialized in an explicit step
//! controlled by `CustomFieldLayout` rather than being merged implicitly.

use std::collections::BTreeMap;

use serde::Deserialize;
use url::form_urlencoded;

/// Form key the API key is sent under.
pub const API_KEY: &str = "api_key";

/// Custom field values keyed by field name, serialized in name order.
pub type CustomFields = BTreeMap<String, String>;

/// How custom fields are placed into the request form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldLayout {
    /// Each field becomes a top-level form key.
    #[default]
    Flatten,
    /// Each field is sent as `custom_fields[<name>]`.
    Nested,
}

/// Ordered `application/x-www-form-urlencoded` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams {
    pairs: Vec<(String, String)>,
}

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Replaces every existing value of `key` with a single `value`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.pairs.retain(|(k, _)| k != key);
        self.push(key, value)
    }

    /// Pushes the pair only when `value` is present.
    pub fn push_opt<V: Into<String>>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Appends custom fields using `layout`.
    ///
    /// A flattened field replaces a key that is already present. The API key
    /// is attached after this step and cannot be replaced.
    pub fn extend_custom_fields(&mut self, fields: &CustomFields, layout: CustomFieldLayout) -> &mut Self {
        for (name, value) in fields {
            match layout {
                CustomFieldLayout::Flatten => {
                    self.set(name.as_str(), value.as_str());
                }
                CustomFieldLayout::Nested => {
                    self.push(format!("custom_fields[{name}]"), value.as_str());
                }
            }
        }
        self
    }

    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// One list id or an ordered collection of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListIds(Vec<String>);

impl ListIds {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Comma-joined form with surrounding whitespace trimmed from each id.
    ///
    /// An empty collection joins to `""`. It is still sent, and Sendy answers
    /// `List or segment ID(s) not passed`.
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(|id| id.trim())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<&str> for ListIds {
    fn from(id: &str) -> Self {
        Self(vec![id.to_string()])
    }
}

impl From<String> for ListIds {
    fn from(id: String) -> Self {
        Self(vec![id])
    }
}

impl From<Vec<String>> for ListIds {
    fn from(ids: Vec<String>) -> Self {
        Self(ids)
    }
}

impl From<Vec<&str>> for ListIds {
    fn from(ids: Vec<&str>) -> Self {
        Self(ids.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for ListIds {
    fn from(ids: &[&str]) -> Self {
        Self(ids.iter().map(|id| id.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ListIds {
    fn from(ids: [&str; N]) -> Self {
        Self(ids.iter().map(|id| id.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> CustomFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn list_ids_join_with_bare_commas() {
        assert_eq!(ListIds::from(["list-id-1", "list-id-2"]).joined(), "list-id-1,list-id-2");
        assert_eq!(ListIds::from(vec![" a ", "b"]).joined(), "a,b");
        assert_eq!(ListIds::from("single").joined(), "single");
    }

    #[test]
    fn push_opt_skips_none() {
        let mut params = FormParams::new();
        params.push_opt("brand_id", None::<String>).push_opt("query_string", Some("utm=1"));
        assert!(!params.contains_key("brand_id"));
        assert_eq!(params.get("query_string"), Some("utm=1"));
    }

    #[test]
    fn flatten_adds_top_level_keys_and_overrides_existing_ones() {
        let mut params = FormParams::new();
        params.push("list", "abc").push("email", "a@b.c");
        params.extend_custom_fields(
            &fields(&[("Birthday", "01/01"), ("email", "hijack@b.c")]),
            CustomFieldLayout::Flatten,
        );
        assert_eq!(params.get("Birthday"), Some("01/01"));
        assert_eq!(params.get("email"), Some("hijack@b.c"));
        assert_eq!(params.len(), 3);
        assert_eq!(params.encode(), "list=abc&Birthday=01%2F01&email=hijack%40b.c");
    }

    #[test]
    fn empty_list_ids_join_to_empty_string() {
        assert_eq!(ListIds::from(Vec::<String>::new()).joined(), "");
        assert_eq!(ListIds::default().joined(), "");
    }

    #[test]
    fn set_replaces_duplicates() {
        let mut params: FormParams = [("api_key", "a"), ("list", "l"), ("api_key", "b")]
            .into_iter()
            .collect();
        params.set("api_key", "real");
        assert_eq!(params.encode(), "list=l&api_key=real");
    }

    #[test]
    fn nested_layout_uses_bracket_keys() {
        let mut params = FormParams::new();
        params.extend_custom_fields(&fields(&[("city", "Oslo")]), CustomFieldLayout::Nested);
        assert_eq!(params.get("custom_fields[city]"), Some("Oslo"));
        assert_eq!(params.encode(), "custom_fields%5Bcity%5D=Oslo");
    }

    #[test]
    fn encode_escapes_reserved_characters() {
        let params: FormParams = [("email", "a+b@example.com"), ("name", "Jane Doe & Co")]
            .into_iter()
            .collect();
        assert_eq!(params.encode(), "email=a%2Bb%40example.com&name=Jane+Doe+%26+Co");
    }
}
