//! # Reference Data
//!
//! The fixed genre and MPA rating enumerations.
//!
//! Both sets are loaded once at catalogue construction and never mutated.
//! Lookups are by id; full listings come back in ascending id order via
//! `BTreeMap` iteration.

use crate::types::{CatalogError, GenreId, MpaId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// RECORDS
// =============================================================================

/// A film genre from the fixed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// An MPA rating from the fixed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MpaRating {
    pub id: MpaId,
    pub name: String,
}

// =============================================================================
// REFERENCE DATA
// =============================================================================

/// The read-only reference enumerations backing film metadata.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    genres: BTreeMap<GenreId, Genre>,
    mpa_ratings: BTreeMap<MpaId, MpaRating>,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceData {
    /// Load the fixed enumerations.
    #[must_use]
    pub fn new() -> Self {
        let genre_names = [
            (1, "Comedy"),
            (2, "Drama"),
            (3, "Cartoon"),
            (4, "Thriller"),
            (5, "Documentary"),
            (6, "Action"),
        ];
        let mpa_names = [(1, "G"), (2, "PG"), (3, "PG-13"), (4, "R"), (5, "NC-17")];

        let genres = genre_names
            .into_iter()
            .map(|(id, name)| {
                let id = GenreId(id);
                (
                    id,
                    Genre {
                        id,
                        name: name.to_string(),
                    },
                )
            })
            .collect();

        let mpa_ratings = mpa_names
            .into_iter()
            .map(|(id, name)| {
                let id = MpaId(id);
                (
                    id,
                    MpaRating {
                        id,
                        name: name.to_string(),
                    },
                )
            })
            .collect();

        Self {
            genres,
            mpa_ratings,
        }
    }

    /// All genres in ascending id order.
    #[must_use]
    pub fn genres(&self) -> Vec<Genre> {
        self.genres.values().cloned().collect()
    }

    /// Lookup a genre by id.
    #[must_use]
    pub fn genre(&self, id: GenreId) -> Option<Genre> {
        self.genres.get(&id).cloned()
    }

    /// Fetch a genre or fail with `GenreNotFound`.
    pub fn require_genre(&self, id: GenreId) -> Result<Genre, CatalogError> {
        self.genre(id).ok_or(CatalogError::GenreNotFound(id))
    }

    /// All MPA ratings in ascending id order.
    #[must_use]
    pub fn mpa_ratings(&self) -> Vec<MpaRating> {
        self.mpa_ratings.values().cloned().collect()
    }

    /// Lookup an MPA rating by id.
    #[must_use]
    pub fn mpa(&self, id: MpaId) -> Option<MpaRating> {
        self.mpa_ratings.get(&id).cloned()
    }

    /// Fetch an MPA rating or fail with `MpaNotFound`.
    pub fn require_mpa(&self, id: MpaId) -> Result<MpaRating, CatalogError> {
        self.mpa(id).ok_or(CatalogError::MpaNotFound(id))
    }
}

// =============================================================================
// TESTS
// =============================================================================
