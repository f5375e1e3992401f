//! # Catalog Store Trait
//!
//! The persistence seam of the catalogue engine.
//!
//! This module defines the `CatalogStore` trait implemented by both the
//! in-memory and the redb-backed stores. All listings come back in
//! ascending id order so the two backends are observably identical.
//!
//! Stores are mechanical: they assign ids, keep records, and maintain edge
//! sets. Business rules (existence guards, validation, name defaulting,
//! genre normalization) live in `Catalog`.

use crate::types::{CatalogError, Film, FilmId, FriendStatus, NewFilm, NewUser, User, UserId};
use std::collections::BTreeMap;

/// The CatalogStore trait defines entity and edge persistence.
///
/// All fallible operations return `Result<T, CatalogError>` to support both
/// in-memory and persistent storage backends uniformly.
pub trait CatalogStore {
    // =========================================================================
    // USERS
    // =========================================================================

    /// Create a user from a draft, assigning the next user id.
    /// A missing display name falls back to the login.
    fn create_user(&mut self, draft: NewUser) -> Result<User, CatalogError>;

    /// Replace a stored user record. Fails with `UserNotFound` if the id is
    /// absent; never changes the id.
    fn update_user(&mut self, user: &User) -> Result<User, CatalogError>;

    /// Lookup a user by id.
    fn user(&self, id: UserId) -> Result<Option<User>, CatalogError>;

    /// All users in ascending id order.
    fn users(&self) -> Result<Vec<User>, CatalogError>;

    /// Total number of users.
    fn user_count(&self) -> Result<usize, CatalogError>;

    // =========================================================================
    // FILMS
    // =========================================================================

    /// Create a film from a draft, assigning the next film id.
    fn create_film(&mut self, draft: NewFilm) -> Result<Film, CatalogError>;

    /// Replace a stored film record. Fails with `FilmNotFound` if the id is
    /// absent; never changes the id.
    fn update_film(&mut self, film: &Film) -> Result<Film, CatalogError>;

    /// Lookup a film by id.
    fn film(&self, id: FilmId) -> Result<Option<Film>, CatalogError>;

    /// All films in ascending id order.
    fn films(&self) -> Result<Vec<Film>, CatalogError>;

    /// Total number of films.
    fn film_count(&self) -> Result<usize, CatalogError>;

    // =========================================================================
    // LIKES
    // =========================================================================

    /// Add a like edge. Idempotent; returns whether the like was newly added.
    fn add_like(&mut self, film: FilmId, user: UserId) -> Result<bool, CatalogError>;

    /// Remove a like edge. Returns whether a like was actually removed;
    /// removing an absent like is not an error.
    fn remove_like(&mut self, film: FilmId, user: UserId) -> Result<bool, CatalogError>;

    /// Cardinality of a film's like set. 0 when the film has no likes.
    fn like_count(&self, film: FilmId) -> Result<usize, CatalogError>;

    /// Like cardinality per film, for films with at least one like.
    fn like_counts(&self) -> Result<BTreeMap<FilmId, usize>, CatalogError>;

    // =========================================================================
    // FRIENDSHIPS
    // =========================================================================

    /// Create a PENDING edge if the directed pair has no edge yet.
    /// Existing edges are left untouched whatever their status.
    fn upsert_friend_request(&mut self, from: UserId, to: UserId) -> Result<(), CatalogError>;

    /// Promote a PENDING edge to CONFIRMED. Returns whether a promotion
    /// happened; false when the edge is absent or already CONFIRMED.
    fn confirm_friend(&mut self, from: UserId, to: UserId) -> Result<bool, CatalogError>;

    /// Delete the directed edge whatever its status. Absent edges are a no-op.
    fn remove_friend(&mut self, from: UserId, to: UserId) -> Result<(), CatalogError>;

    /// Status of the directed edge, or None when absent.
    fn friend_status(&self, from: UserId, to: UserId)
    -> Result<Option<FriendStatus>, CatalogError>;

    /// Targets of all edges originating at `of`, any status, ascending id.
    fn friend_ids(&self, of: UserId) -> Result<Vec<UserId>, CatalogError>;
}
