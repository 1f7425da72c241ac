//! Route table: every endpoint with its path, method and guard
//!
//! Guards are data, not code scattered across handlers, so the permission
//! model can be read in one place, overridden from configuration and audited
//! at startup.

use std::collections::HashMap;
use std::fmt;

use axum::{
    http::Method,
    middleware,
    routing::{delete, get, patch, post, put, MethodRouter},
    Router,
};
use serde::Deserialize;

use super::{auth, books, borrows, health};
use crate::{auth::gate, AppState};

/// Admission policy of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Guard {
    /// No authentication
    Open,
    /// Valid session token required
    Session,
    /// Valid session token whose email matches the `email` query parameter
    Owner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Liveness,
    Health,
    Ready,
    IssueToken,
    Logout,
    ListBooks,
    CategorizedBooks,
    GetBook,
    AddBook,
    UpdateBook,
    UpdateQuantity,
    BorrowBook,
    ListBorrowed,
    ReturnBorrowedBook,
}

impl Endpoint {
    pub const ALL: [Endpoint; 14] = [
        Endpoint::Liveness,
        Endpoint::Health,
        Endpoint::Ready,
        Endpoint::IssueToken,
        Endpoint::Logout,
        Endpoint::ListBooks,
        Endpoint::CategorizedBooks,
        Endpoint::GetBook,
        Endpoint::AddBook,
        Endpoint::UpdateBook,
        Endpoint::UpdateQuantity,
        Endpoint::BorrowBook,
        Endpoint::ListBorrowed,
        Endpoint::ReturnBorrowedBook,
    ];

    pub fn method(self) -> Method {
        match self {
            Endpoint::IssueToken | Endpoint::Logout | Endpoint::AddBook | Endpoint::BorrowBook => {
                Method::POST
            }
            Endpoint::UpdateBook => Method::PUT,
            Endpoint::UpdateQuantity => Method::PATCH,
            Endpoint::ReturnBorrowedBook => Method::DELETE,
            Endpoint::Liveness
            | Endpoint::Health
            | Endpoint::Ready
            | Endpoint::ListBooks
            | Endpoint::CategorizedBooks
            | Endpoint::GetBook
            | Endpoint::ListBorrowed => Method::GET,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Liveness => "/",
            Endpoint::Health => "/api/v1/health",
            Endpoint::Ready => "/api/v1/ready",
            Endpoint::IssueToken => "/api/v1/jwt",
            Endpoint::Logout => "/jwt/logout",
            Endpoint::ListBooks => "/api/v1/allBooks",
            Endpoint::CategorizedBooks => "/api/v1/categorizedBooks",
            Endpoint::GetBook => "/api/v1/allBooks/:id",
            Endpoint::AddBook => "/api/v1/addBook",
            Endpoint::UpdateBook => "/api/v1/updateBook/:id",
            Endpoint::UpdateQuantity => "/api/v1/updateQuantity/:id",
            Endpoint::BorrowBook | Endpoint::ListBorrowed => "/api/v1/borrowBook",
            Endpoint::ReturnBorrowedBook => "/api/v1/deleteBorrowedBook/:id",
        }
    }

    /// Built-in guard. The book and borrow writes other than `add_book` ship
    /// open; [`RouteTable::unguarded_writes`] reports them.
    pub fn default_guard(self) -> Guard {
        match self {
            Endpoint::ListBooks | Endpoint::AddBook => Guard::Owner,
            _ => Guard::Open,
        }
    }

    pub fn is_write(self) -> bool {
        self.method() != Method::GET
    }

    fn handler(self) -> MethodRouter<AppState> {
        match self {
            Endpoint::Liveness => get(health::liveness),
            Endpoint::Health => get(health::health_check),
            Endpoint::Ready => get(health::readiness_check),
            Endpoint::IssueToken => post(auth::issue_token),
            Endpoint::Logout => post(auth::logout),
            Endpoint::ListBooks => get(books::list_books),
            Endpoint::CategorizedBooks => get(books::categorized_books),
            Endpoint::GetBook => get(books::get_book),
            Endpoint::AddBook => post(books::add_book),
            Endpoint::UpdateBook => put(books::update_book),
            Endpoint::UpdateQuantity => patch(books::update_quantity),
            Endpoint::BorrowBook => post(borrows::borrow_book),
            Endpoint::ListBorrowed => get(borrows::list_borrowed),
            Endpoint::ReturnBorrowedBook => delete(borrows::delete_borrowed_book),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

/// A route with its effective guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub endpoint: Endpoint,
    pub guard: Guard,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::with_overrides(&HashMap::new())
    }
}

impl RouteTable {
    /// Built-in guards with per-endpoint overrides applied
    pub fn with_overrides(overrides: &HashMap<Endpoint, Guard>) -> Self {
        let routes = Endpoint::ALL
            .iter()
            .map(|&endpoint| Route {
                endpoint,
                guard: overrides
                    .get(&endpoint)
                    .copied()
                    .unwrap_or_else(|| endpoint.default_guard()),
            })
            .collect();
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn guard(&self, endpoint: Endpoint) -> Guard {
        self.routes
            .iter()
            .find(|route| route.endpoint == endpoint)
            .map(|route| route.guard)
            .unwrap_or(Guard::Open)
    }

    /// Mutating routes reachable without any authentication
    pub fn unguarded_writes(&self) -> Vec<Endpoint> {
        self.routes
            .iter()
            .filter(|route| route.guard == Guard::Open && route.endpoint.is_write())
            .filter(|route| !matches!(route.endpoint, Endpoint::IssueToken | Endpoint::Logout))
            .map(|route| route.endpoint)
            .collect()
    }

    /// Build the router, wrapping each route in the layers its guard demands
    pub fn into_router(self, state: &AppState) -> Router<AppState> {
        self.routes.iter().fold(Router::new(), |router, route| {
            let handler = guarded(route.endpoint.handler(), route.guard, state);
            router.route(route.endpoint.path(), handler)
        })
    }
}

fn guarded(handler: MethodRouter<AppState>, guard: Guard, state: &AppState) -> MethodRouter<AppState> {
    // The last route_layer runs first: the gate always precedes the ownership check.
    match guard {
        Guard::Open => handler,
        Guard::Session => handler.route_layer(middleware::from_fn_with_state(
            state.clone(),
            gate::require_session,
        )),
        Guard::Owner => handler
            .route_layer(middleware::from_fn(gate::require_owner))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                gate::require_session,
            )),
    }
}
