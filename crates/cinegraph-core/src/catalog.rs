//! # Catalog Facade
//!
//! The service surface of the catalogue engine.
//!
//! `Catalog` combines a storage backend with the fixed reference data and
//! enforces every business rule: existence guards, payload validation,
//! display-name defaulting, genre normalization, and the friendship
//! lifecycle. Transports (HTTP, CLI) stay thin adapters over this type.
//!
//! ## Storage Backends
//!
//! Catalog supports two storage backends:
//! - `InMemory`: volatile `MemoryStore` (tests, the `memory` CLI backend)
//! - `Persistent`: `RedbStore` for disk-backed ACID storage

use crate::guard::{require_film, require_user};
use crate::limits::{DEFAULT_POPULAR_COUNT, MAX_DESCRIPTION_LEN, min_release_date};
use crate::ranking;
use crate::reference::{Genre, MpaRating, ReferenceData};
use crate::storage::{MemoryStore, RedbStore};
use crate::store::CatalogStore;
use crate::types::{
    CatalogError, Film, FilmId, FriendStatus, GenreId, MpaId, NewFilm, NewUser, User, UserId,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::Path;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Storage backend for a Catalog.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory store (fast, volatile).
    InMemory(MemoryStore),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

// NOTE: StorageBackend does NOT implement Clone.
// RedbStore (database handle) cannot be safely cloned.

impl StorageBackend {
    fn as_store(&self) -> &dyn CatalogStore {
        match self {
            Self::InMemory(store) => store,
            Self::Persistent(store) => store,
        }
    }

    fn as_store_mut(&mut self) -> &mut dyn CatalogStore {
        match self {
            Self::InMemory(store) => store,
            Self::Persistent(store) => store,
        }
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// The catalogue engine facade.
#[derive(Debug, Default)]
pub struct Catalog {
    /// The storage backend (in-memory or persistent).
    backend: StorageBackend,
    /// The fixed genre and MPA enumerations.
    reference: ReferenceData,
}

impl Catalog {
    /// Create a new empty catalogue with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalogue with persistent redb storage.
    ///
    /// Opens or creates a redb database at the given path.
    /// All changes are automatically persisted to disk.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let store = RedbStore::open(path)?;
        Ok(Self {
            backend: StorageBackend::Persistent(store),
            reference: ReferenceData::new(),
        })
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent(_))
    }

    // =========================================================================
    // USERS
    // =========================================================================

    /// Register a user. A blank display name defaults to the login.
    pub fn create_user(&mut self, mut draft: NewUser) -> Result<User, CatalogError> {
        draft.name = draft.name.filter(|name| !name.trim().is_empty());
        self.backend.as_store_mut().create_user(draft)
    }

    /// Update a user record. Fails with `UserNotFound` when the id is
    /// absent; the id itself never changes. A blank display name defaults
    /// to the login, same as at creation.
    pub fn update_user(&mut self, user: &User) -> Result<User, CatalogError> {
        let mut resolved = user.clone();
        if resolved.name.trim().is_empty() {
            resolved.name = resolved.login.clone();
        }
        self.backend.as_store_mut().update_user(&resolved)
    }

    /// Fetch a user or fail with `UserNotFound`.
    pub fn user(&self, id: UserId) -> Result<User, CatalogError> {
        require_user(self.backend.as_store(), id)
    }

    /// All users in ascending id order.
    pub fn users(&self) -> Result<Vec<User>, CatalogError> {
        self.backend.as_store().users()
    }

    /// Total number of users.
    pub fn user_count(&self) -> Result<usize, CatalogError> {
        self.backend.as_store().user_count()
    }

    // =========================================================================
    // FILMS
    // =========================================================================

    /// Catalogue a film after validating its payload against the engine
    /// limits and the reference enumerations. Genres are de-duplicated and
    /// sorted ascending before storage.
    pub fn create_film(&mut self, mut draft: NewFilm) -> Result<Film, CatalogError> {
        draft.genres = self.validate_film_payload(
            &draft.description,
            draft.release_date,
            draft.duration,
            draft.mpa,
            &draft.genres,
        )?;
        self.backend.as_store_mut().create_film(draft)
    }

    /// Update a film record under the same validation as creation.
    /// Fails with `FilmNotFound` when the id is absent.
    pub fn update_film(&mut self, film: &Film) -> Result<Film, CatalogError> {
        let mut resolved = film.clone();
        resolved.genres = self.validate_film_payload(
            &resolved.description,
            resolved.release_date,
            resolved.duration,
            resolved.mpa,
            &resolved.genres,
        )?;
        self.backend.as_store_mut().update_film(&resolved)
    }

    /// Fetch a film or fail with `FilmNotFound`.
    pub fn film(&self, id: FilmId) -> Result<Film, CatalogError> {
        require_film(self.backend.as_store(), id)
    }

    /// All films in ascending id order.
    pub fn films(&self) -> Result<Vec<Film>, CatalogError> {
        self.backend.as_store().films()
    }

    /// Total number of films.
    pub fn film_count(&self) -> Result<usize, CatalogError> {
        self.backend.as_store().film_count()
    }

    fn validate_film_payload(
        &self,
        description: &str,
        release_date: NaiveDate,
        duration: u32,
        mpa: MpaId,
        genres: &[GenreId],
    ) -> Result<Vec<GenreId>, CatalogError> {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(CatalogError::Validation(format!(
                "description exceeds {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        if release_date < min_release_date() {
            return Err(CatalogError::Validation(format!(
                "release date {release_date} precedes the first film screening"
            )));
        }
        if duration == 0 {
            return Err(CatalogError::Validation(
                "duration must be positive".to_string(),
            ));
        }
        self.reference.require_mpa(mpa)?;

        let unique: BTreeSet<GenreId> = genres.iter().copied().collect();
        for &genre in &unique {
            self.reference.require_genre(genre)?;
        }
        Ok(unique.into_iter().collect())
    }

    // =========================================================================
    // LIKES
    // =========================================================================

    /// Record a like. Idempotent; returns whether the like was newly added
    /// so callers can log repeats non-fatally.
    pub fn add_like(&mut self, film: FilmId, user: UserId) -> Result<bool, CatalogError> {
        require_film(self.backend.as_store(), film)?;
        require_user(self.backend.as_store(), user)?;
        self.backend.as_store_mut().add_like(film, user)
    }

    /// Withdraw a like. Absence is not an error; returns whether a like was
    /// actually removed.
    pub fn remove_like(&mut self, film: FilmId, user: UserId) -> Result<bool, CatalogError> {
        require_film(self.backend.as_store(), film)?;
        require_user(self.backend.as_store(), user)?;
        self.backend.as_store_mut().remove_like(film, user)
    }

    /// Cardinality of a film's like set.
    pub fn like_count(&self, film: FilmId) -> Result<usize, CatalogError> {
        require_film(self.backend.as_store(), film)?;
        self.backend.as_store().like_count(film)
    }

    // =========================================================================
    // FRIENDSHIPS
    // =========================================================================

    /// Issue a friend request from `id` to `friend`.
    ///
    /// Creates a PENDING edge when none exists; existing PENDING or
    /// CONFIRMED edges are left untouched, so a repeated request never
    /// regresses a confirmed friendship.
    pub fn add_friend(&mut self, id: UserId, friend: UserId) -> Result<(), CatalogError> {
        if id == friend {
            return Err(CatalogError::Validation(
                "a user cannot befriend themselves".to_string(),
            ));
        }
        require_user(self.backend.as_store(), id)?;
        require_user(self.backend.as_store(), friend)?;
        self.backend.as_store_mut().upsert_friend_request(id, friend)
    }

    /// Accept a pending friend request, promoting the edge to CONFIRMED.
    ///
    /// Fails with `FriendRequestNotFound` when no PENDING edge exists for
    /// the directed pair; confirming twice fails the second time.
    pub fn confirm_friend(&mut self, id: UserId, friend: UserId) -> Result<(), CatalogError> {
        require_user(self.backend.as_store(), id)?;
        require_user(self.backend.as_store(), friend)?;
        if self.backend.as_store_mut().confirm_friend(id, friend)? {
            Ok(())
        } else {
            Err(CatalogError::FriendRequestNotFound(id, friend))
        }
    }

    /// Sever a friendship edge whatever its status. Removing an absent edge
    /// is a no-op.
    pub fn remove_friend(&mut self, id: UserId, friend: UserId) -> Result<(), CatalogError> {
        if id == friend {
            return Err(CatalogError::Validation(
                "a user cannot unfriend themselves".to_string(),
            ));
        }
        require_user(self.backend.as_store(), id)?;
        require_user(self.backend.as_store(), friend)?;
        self.backend.as_store_mut().remove_friend(id, friend)
    }

    /// Friends of a user: targets of all outgoing edges, any status,
    /// materialized as user records ascending by id.
    pub fn friends(&self, id: UserId) -> Result<Vec<User>, CatalogError> {
        let store = self.backend.as_store();
        require_user(store, id)?;

        let mut friends = Vec::new();
        for friend_id in store.friend_ids(id)? {
            if let Some(user) = store.user(friend_id)? {
                friends.push(user);
            }
        }
        Ok(friends)
    }

    /// Users befriended by both `a` and `b`, ascending by id. Symmetric.
    pub fn common_friends(&self, a: UserId, b: UserId) -> Result<Vec<User>, CatalogError> {
        let store = self.backend.as_store();
        require_user(store, a)?;
        require_user(store, b)?;

        let of_a: BTreeSet<UserId> = store.friend_ids(a)?.into_iter().collect();
        let of_b: BTreeSet<UserId> = store.friend_ids(b)?.into_iter().collect();

        let mut common = Vec::new();
        for &friend_id in of_a.intersection(&of_b) {
            if let Some(user) = store.user(friend_id)? {
                common.push(user);
            }
        }
        Ok(common)
    }

    /// Status of the directed friendship edge, or None when absent.
    pub fn friend_status(
        &self,
        from: UserId,
        to: UserId,
    ) -> Result<Option<FriendStatus>, CatalogError> {
        self.backend.as_store().friend_status(from, to)
    }

    // =========================================================================
    // RANKING
    // =========================================================================

    /// The most-liked films, descending by like count with ties ascending
    /// by film id. A non-positive `count` substitutes the default of 10;
    /// a count beyond the catalogue size returns everything.
    pub fn popular(&self, count: i64) -> Result<Vec<Film>, CatalogError> {
        let count = if count <= 0 {
            DEFAULT_POPULAR_COUNT
        } else {
            count as usize
        };
        let store = self.backend.as_store();
        let films = store.films()?;
        let counts = store.like_counts()?;
        Ok(ranking::top_by_likes(films, &counts, count))
    }

    // =========================================================================
    // REFERENCE DATA
    // =========================================================================

    /// All genres in ascending id order.
    #[must_use]
    pub fn genres(&self) -> Vec<Genre> {
        self.reference.genres()
    }

    /// Fetch a genre or fail with `GenreNotFound`.
    pub fn genre(&self, id: GenreId) -> Result<Genre, CatalogError> {
        self.reference.require_genre(id)
    }

    /// All MPA ratings in ascending id order.
    #[must_use]
    pub fn mpa_ratings(&self) -> Vec<MpaRating> {
        self.reference.mpa_ratings()
    }

    /// Fetch an MPA rating or fail with `MpaNotFound`.
    pub fn mpa(&self, id: MpaId) -> Result<MpaRating, CatalogError> {
        self.reference.require_mpa(id)
    }

    /// The reference enumerations.
    #[must_use]
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }
}

// =============================================================================
// TESTS
// =============================================================================
