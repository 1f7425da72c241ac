//! Generic document types shared by every collection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

/// Key under which a document's identifier is exposed
pub const ID_FIELD: &str = "_id";

/// A schemaless JSON document as stored and returned
pub type Document = Map<String, Value>;

/// Store-assigned document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Logical collections held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Books,
    BorrowedBooks,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Books => "books",
            Collection::BorrowedBooks => "borrowed_books",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conjunction of field equality clauses.
///
/// A `null` value matches documents where the field is null or missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// Matches every document
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(field, value)
    }

    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses.iter().all(|(field, expected)| match doc.get(field) {
            Some(actual) => actual == expected,
            None => expected.is_null(),
        })
    }
}

/// Inclusion projection; the identifier is always kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection(&'static [&'static str]);

impl Projection {
    pub const fn new(fields: &'static [&'static str]) -> Self {
        Self(fields)
    }

    pub fn apply(&self, doc: Document) -> Document {
        doc.into_iter()
            .filter(|(key, _)| key == ID_FIELD || self.0.contains(&key.as_str()))
            .collect()
    }
}

/// Exposes a stored body together with its identifier
pub fn with_id(id: DocumentId, body: Document) -> Document {
    let mut doc = Document::with_capacity(body.len() + 1);
    doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    doc.extend(body.into_iter().filter(|(key, _)| key != ID_FIELD));
    doc
}

/// `$set` semantics: overwrite the given fields, return whether anything changed
pub fn apply_set(target: &mut Document, set: &Document) -> bool {
    let mut changed = false;
    for (key, value) in set {
        if target.get(key) != Some(value) {
            target.insert(key.clone(), value.clone());
            changed = true;
        }
    }
    changed
}

/// Acknowledgement of a single insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: DocumentId,
}

/// Acknowledgement of a single update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<DocumentId>,
}

impl UpdateResult {
    pub fn matched(modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: modified as u64,
            upserted_count: 0,
            upserted_id: None,
        }
    }

    pub fn upserted(id: DocumentId) -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(id),
        }
    }

    pub fn unmatched() -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

/// Acknowledgement of a single delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}
