//! Book model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use super::document::{Document, DocumentId, Projection};

/// Fields returned when a book is fetched with the `read` flag
pub const READER_PROJECTION: Projection =
    Projection::new(&["title", "link", "author", "quantity"]);

/// Book record as usually stored. Documents are not validated against it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub title: Option<String>,
    pub author: Option<String>,
    pub image_link: Option<String>,
    pub quantity: Option<i64>,
    pub rating: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub pages: Option<i64>,
    /// External link (e.g. a reading sample)
    pub link: Option<String>,
}

/// Full book update. All nine fields are written; absent ones are stored as null.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[schema(value_type = Option<String>)]
    pub title: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub author: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub image_link: Option<Value>,
    #[schema(value_type = Option<i64>)]
    pub quantity: Option<Value>,
    #[schema(value_type = Option<f64>)]
    pub rating: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub category: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
    #[schema(value_type = Option<i64>)]
    pub pages: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub link: Option<Value>,
}

impl UpdateBook {
    /// `$set` document covering every enumerated field
    pub fn into_set(self) -> Document {
        [
            ("title", self.title),
            ("author", self.author),
            ("imageLink", self.image_link),
            ("quantity", self.quantity),
            ("rating", self.rating),
            ("category", self.category),
            ("description", self.description),
            ("pages", self.pages),
            ("link", self.link),
        ]
        .into_iter()
        .map(|(field, value)| (field.to_string(), value.unwrap_or(Value::Null)))
        .collect()
    }
}

/// Quantity-only patch
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateQuantity {
    #[schema(value_type = Option<i64>)]
    pub quantity: Option<Value>,
}

impl UpdateQuantity {
    /// Always sets `quantity`, to null when the body leaves it out
    pub fn into_set(self) -> Document {
        let mut set = Document::new();
        set.insert("quantity".to_string(), self.quantity.unwrap_or(Value::Null));
        set
    }
}

/// Query parameters for single-book fetch
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Any non-empty value selects the reduced reader projection
    pub read: Option<String>,
}

impl BookQuery {
    pub fn wants_reader_view(&self) -> bool {
        self.read.as_deref().is_some_and(|flag| !flag.is_empty())
    }
}

/// Query parameters for category listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    pub category: Option<String>,
}
