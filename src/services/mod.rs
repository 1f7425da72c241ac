//! Business logic services

pub mod auth;
pub mod books;
pub mod borrows;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub books: books::BooksService,
    pub borrows: borrows::BorrowsService,
    pub repository: Repository,
}

impl Services {
    /// Create all services around the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            auth: auth::AuthService::new(&config.auth, config.environment),
            books: books::BooksService::new(repository.clone()),
            borrows: borrows::BorrowsService::new(repository.clone()),
            repository,
        }
    }
}
