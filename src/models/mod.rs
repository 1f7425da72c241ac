//! Data models for Libris

pub mod book;
pub mod borrow;
pub mod document;

pub use document::{Collection, Document, DocumentId, Filter, Projection};
