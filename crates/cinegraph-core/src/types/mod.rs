//! # Core Type Definitions
//!
//! This module contains all core types for the Cinegraph catalogue engine:
//! - Entity identifiers (`UserId`, `FilmId`) and reference-data identifiers
//!   (`GenreId`, `MpaId`)
//! - Entity records (`User`, `Film`) and their creation drafts
//!   (`NewUser`, `NewFilm`)
//! - Friendship edge status (`FriendStatus`)
//! - Error types (`CatalogError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer identifiers only; ids are store-assigned and monotonic
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ENTITY IDENTIFIERS
// =============================================================================

/// Unique identifier for a user. Assigned by the store on creation,
/// monotonically increasing, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a film. Assigned by the store on creation,
/// monotonically increasing, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FilmId(pub u64);

impl std::fmt::Display for FilmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier into the fixed genre enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GenreId(pub u32);

impl std::fmt::Display for GenreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier into the fixed MPA rating enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MpaId(pub u32);

impl std::fmt::Display for MpaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// USER
// =============================================================================

/// A registered user of the catalogue.
///
/// The display name is never blank after creation: `Catalog::create_user`
/// substitutes the login when the caller leaves it empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    pub email: String,
    pub login: String,
    /// Display name; defaults to `login` at creation time.
    pub name: String,
    pub birthday: NaiveDate,
}

/// Draft for creating a user. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub login: String,
    /// Optional display name; blank or absent falls back to `login`.
    pub name: Option<String>,
    pub birthday: NaiveDate,
}

// =============================================================================
// FILM
// =============================================================================

/// A catalogued film.
///
/// Genre ids are de-duplicated and stored in ascending order; the MPA id
/// and every genre id reference the fixed enumerations in `reference`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    /// Store-assigned identifier.
    pub id: FilmId,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    /// Duration in minutes; always positive.
    pub duration: u32,
    pub mpa: MpaId,
    /// Ascending, de-duplicated genre ids.
    pub genres: Vec<GenreId>,
}

/// Draft for creating a film. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFilm {
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: u32,
    pub mpa: MpaId,
    pub genres: Vec<GenreId>,
}

// =============================================================================
// FRIENDSHIP STATUS
// =============================================================================

/// Status of a directed friendship edge.
///
/// Lifecycle: ABSENT -> PENDING -> CONFIRMED, with removal back to ABSENT
/// from either state. Absence is represented by the edge not existing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FriendStatus {
    /// Request issued, not yet accepted by the target.
    Pending,
    /// Request accepted.
    Confirmed,
}

impl FriendStatus {
    /// Stable wire encoding for the redb store.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Confirmed => 1,
        }
    }

    /// Decode the wire encoding; unknown bytes are rejected.
    #[must_use]
    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Pending),
            1 => Some(Self::Confirmed),
            _ => None,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the catalogue engine.
///
/// The NotFound variants always carry the offending id. `Validation` covers
/// structurally invalid input reaching the engine boundary (self-friending,
/// release dates before the cinema epoch). `Serialization` and `Io` wrap
/// store failures and are unexpected rather than recoverable.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The referenced user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The referenced film does not exist.
    #[error("film not found: {0}")]
    FilmNotFound(FilmId),

    /// The referenced genre id is not in the fixed enumeration.
    #[error("genre not found: {0}")]
    GenreNotFound(GenreId),

    /// The referenced MPA rating id is not in the fixed enumeration.
    #[error("MPA rating not found: {0}")]
    MpaNotFound(MpaId),

    /// No pending friend request exists for this directed pair.
    #[error("friend request not found or already confirmed: {0} -> {1}")]
    FriendRequestNotFound(UserId, UserId),

    /// Structurally invalid input reaching the engine boundary.
    #[error("validation error: {0}")]
    Validation(String),

    /// A serialization or deserialization error occurred in the store.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred in the store.
    #[error("I/O error: {0}")]
    Io(String),
}

impl CatalogError {
    /// Whether this error is one of the NotFound kinds.
    ///
    /// Adapters use this to map errors onto their own status codes.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::FilmNotFound(_)
                | Self::GenreNotFound(_)
                | Self::MpaNotFound(_)
                | Self::FriendRequestNotFound(..)
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
