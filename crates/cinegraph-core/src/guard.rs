//! # Existence Guard
//!
//! Fetch-or-fail helpers over the store.
//!
//! Every like and friendship mutation runs these as a precondition, so a
//! NotFound error always carries the offending id instead of surfacing as
//! a silent no-op deeper in the store.

use crate::store::CatalogStore;
use crate::types::{CatalogError, Film, FilmId, User, UserId};

/// Fetch a user or fail with `UserNotFound`.
pub fn require_user(store: &dyn CatalogStore, id: UserId) -> Result<User, CatalogError> {
    store.user(id)?.ok_or(CatalogError::UserNotFound(id))
}

/// Fetch a film or fail with `FilmNotFound`.
pub fn require_film(store: &dyn CatalogStore, id: FilmId) -> Result<Film, CatalogError> {
    store.film(id)?.ok_or(CatalogError::FilmNotFound(id))
}
