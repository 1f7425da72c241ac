//! Borrow record model

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::document::DocumentId;

/// Borrow record as usually stored. Documents are not validated against it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    /// Borrower email
    pub email: Option<String>,
    /// Identifier of the borrowed book
    pub book_id: Option<String>,
    pub title: Option<String>,
    pub borrowed_date: Option<String>,
    pub return_date: Option<String>,
}

/// Query parameters for listing a borrower's records
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BorrowerQuery {
    pub email: Option<String>,
}
