//! # API Types Module
//!
//! Request and response types for the Cinegraph HTTP API.
//!
//! Payload types carry the boundary validation that does not belong in the
//! engine: shape checks on email/login and date sanity. Semantic rules
//! (reference integrity, friendship and like semantics) stay in
//! `cinegraph-core`.

use cinegraph_core::{
    CatalogError, Film, FilmId, GenreId, MpaId, NewFilm, NewUser, ReferenceData, User, UserId,
    MAX_DESCRIPTION_LEN,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// USER TYPES
// =============================================================================

/// Incoming user payload for `POST /users` and `PUT /users`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    /// Present on update, absent on create.
    pub id: Option<u64>,
    pub email: String,
    pub login: String,
    /// Display name; blank or missing falls back to the login.
    pub name: Option<String>,
    pub birthday: NaiveDate,
}

impl UserPayload {
    /// Shape-check the payload against today's date.
    pub fn validate(&self, today: NaiveDate) -> Result<(), CatalogError> {
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(CatalogError::Validation(
                "email must be non-blank and contain '@'".to_string(),
            ));
        }
        if self.login.trim().is_empty() || self.login.contains(char::is_whitespace) {
            return Err(CatalogError::Validation(
                "login must be non-blank and contain no whitespace".to_string(),
            ));
        }
        if self.birthday > today {
            return Err(CatalogError::Validation(
                "birthday cannot be in the future".to_string(),
            ));
        }
        Ok(())
    }

    /// Convert into a registration draft (create path).
    #[must_use]
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            email: self.email,
            login: self.login,
            name: self.name,
            birthday: self.birthday,
        }
    }

    /// Convert into a full user record (update path).
    ///
    /// Returns a validation error when the payload carries no id.
    pub fn into_user(self) -> Result<User, CatalogError> {
        let id = self
            .id
            .ok_or_else(|| CatalogError::Validation("update requires an id".to_string()))?;
        Ok(User {
            id: UserId(id),
            email: self.email,
            login: self.login,
            name: self.name.unwrap_or_default(),
            birthday: self.birthday,
        })
    }
}

/// Outgoing user representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: u64,
    pub email: String,
    pub login: String,
    pub name: String,
    pub birthday: NaiveDate,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.0,
            email: user.email,
            login: user.login,
            name: user.name,
            birthday: user.birthday,
        }
    }
}

// =============================================================================
// FILM TYPES
// =============================================================================

/// An id-only reference to a genre or MPA rating in an incoming payload.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct IdRef {
    pub id: u32,
}

/// Incoming film payload for `POST /films` and `PUT /films`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmPayload {
    /// Present on update, absent on create.
    pub id: Option<u64>,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i64,
    pub mpa: IdRef,
    pub genres: Option<Vec<IdRef>>,
}

impl FilmPayload {
    /// Shape-check the payload. Reference integrity and the release-date
    /// floor are enforced by the engine.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::Validation(
                "film name must be non-blank".to_string(),
            ));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(CatalogError::Validation(format!(
                "description exceeds {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        if self.duration <= 0 {
            return Err(CatalogError::Validation(
                "duration must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn duration_minutes(&self) -> Result<u32, CatalogError> {
        u32::try_from(self.duration)
            .map_err(|_| CatalogError::Validation("duration out of range".to_string()))
    }

    fn genre_ids(&self) -> Vec<GenreId> {
        self.genres
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|g| GenreId(g.id))
            .collect()
    }

    /// Convert into a catalogue draft (create path).
    pub fn into_new_film(self) -> Result<NewFilm, CatalogError> {
        let duration = self.duration_minutes()?;
        let genres = self.genre_ids();
        Ok(NewFilm {
            name: self.name,
            description: self.description,
            release_date: self.release_date,
            duration,
            mpa: MpaId(self.mpa.id),
            genres,
        })
    }

    /// Convert into a full film record (update path).
    pub fn into_film(self) -> Result<Film, CatalogError> {
        let id = self
            .id
            .ok_or_else(|| CatalogError::Validation("update requires an id".to_string()))?;
        let duration = self.duration_minutes()?;
        let genres = self.genre_ids();
        Ok(Film {
            id: FilmId(id),
            name: self.name,
            description: self.description,
            release_date: self.release_date,
            duration,
            mpa: MpaId(self.mpa.id),
            genres,
        })
    }
}

/// Genre reference entry, also used by `GET /genres`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreDto {
    pub id: u32,
    pub name: String,
}

/// MPA rating reference entry, also used by `GET /mpa`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MpaDto {
    pub id: u32,
    pub name: String,
}

/// Outgoing film representation with resolved genre and MPA names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmResponse {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: u32,
    pub mpa: MpaDto,
    pub genres: Vec<GenreDto>,
}

impl FilmResponse {
    /// Build the response by resolving reference ids to names.
    ///
    /// Films in the catalogue only ever carry validated ids, so a missing
    /// name resolves to an empty string rather than an error.
    #[must_use]
    pub fn from_film(film: Film, reference: &ReferenceData) -> Self {
        let mpa = MpaDto {
            id: film.mpa.0,
            name: reference.mpa(film.mpa).map(|m| m.name).unwrap_or_default(),
        };
        let genres = film
            .genres
            .iter()
            .map(|&id| GenreDto {
                id: id.0,
                name: reference.genre(id).map(|g| g.name).unwrap_or_default(),
            })
            .collect();
        Self {
            id: film.id.0,
            name: film.name,
            description: film.description,
            release_date: film.release_date,
            duration: film.duration,
            mpa,
            genres,
        }
    }
}

/// Query parameters for `GET /films/popular`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PopularParams {
    /// Number of films to return; missing or non-positive means the default.
    pub count: Option<i64>,
}

// =============================================================================
// DIAGNOSTIC TYPES
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Catalogue status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub user_count: usize,
    pub film_count: usize,
    pub persistent: bool,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
