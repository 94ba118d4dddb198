//! Parsed VPD output
//!
//! Records and keywords keep the order they were found in the image, not
//! lexical order, so both levels are backed by vectors rather than maps.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::record::Issue;

/// Keyword name to decoded value, in record order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordMap {
    entries: Vec<(String, String)>,
}

impl KeywordMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a keyword value
    ///
    /// A repeated keyword replaces the earlier value in place and returns it,
    /// so the keyword keeps the position of its first occurrence.
    pub fn insert(&mut self, keyword: String, value: String) -> Option<String> {
        match self.entries.iter_mut().find(|(name, _)| *name == keyword) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((keyword, value));
                None
            }
        }
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == keyword)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.get(keyword).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Extend<(String, String)> for KeywordMap {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        for (keyword, value) in iter {
            self.insert(keyword, value);
        }
    }
}

impl IntoIterator for KeywordMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for KeywordMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (keyword, value) in &self.entries {
            map.serialize_entry(keyword, value)?;
        }
        map.end()
    }
}

/// Parsed VPD: record name to keywords, plus problems found along the way
#[derive(Debug, Clone, Default, Serialize)]
pub struct Store {
    #[serde(serialize_with = "serialize_records")]
    records: Vec<(String, KeywordMap)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<Issue>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record, returning its keyword map for filling
    ///
    /// Registering a record twice returns the existing map.
    pub fn insert_record(&mut self, name: &str) -> &mut KeywordMap {
        let index = match self.records.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                self.records.push((name.to_string(), KeywordMap::new()));
                self.records.len() - 1
            }
        };
        &mut self.records[index].1
    }

    /// Record a problem that did not stop the parse
    pub fn push_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Value of a keyword in a record
    pub fn get(&self, record: &str, keyword: &str) -> Option<&str> {
        self.record(record)?.get(keyword)
    }

    pub fn record(&self, name: &str) -> Option<&KeywordMap> {
        self.records
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, keywords)| keywords)
    }

    pub fn records(&self) -> impl Iterator<Item = (&str, &KeywordMap)> {
        self.records
            .iter()
            .map(|(name, keywords)| (name.as_str(), keywords))
    }

    pub fn record_names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|(name, _)| name.as_str())
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn serialize_records<S: Serializer>(
    records: &[(String, KeywordMap)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(records.len()))?;
    for (name, keywords) in records {
        map.serialize_entry(name, keywords)?;
    }
    map.end()
}
