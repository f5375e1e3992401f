//! # API Handlers Module
//!
//! HTTP request handlers for the Cinegraph REST API.
//!
//! Handlers stay thin: payload shape-checks live in [`super::types`], all
//! catalogue semantics live in `cinegraph-core`. Every handler maps
//! [`CatalogError`] to a status code the same way:
//! not-found errors become 404, validation errors become 400, and anything
//! else becomes an opaque 500 (the detail goes to the log, not the client).

use super::AppState;
use super::types::{
    ErrorResponse, FilmPayload, FilmResponse, GenreDto, HealthResponse, MpaDto, PopularParams,
    StatusResponse, UserPayload, UserResponse,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use cinegraph_core::{CatalogError, FilmId, GenreId, MpaId, UserId};

/// The uniform error shape returned by every handler.
type ApiError = (StatusCode, Json<ErrorResponse>);

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// Map a catalogue error to an HTTP response.
fn map_error(e: CatalogError) -> ApiError {
    if e.is_not_found() {
        return (StatusCode::NOT_FOUND, Json(ErrorResponse::new(e.to_string())));
    }
    match e {
        CatalogError::Validation(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(e.to_string())),
        ),
        _ => {
            tracing::error!("Internal error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal error")),
            )
        }
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

// =============================================================================
// DIAGNOSTIC HANDLERS
// =============================================================================

/// `GET /health` - liveness probe.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// `GET /status` - catalogue counters and backend info.
pub async fn status_handler(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let catalog = state.catalog.read().await;
    let user_count = catalog.user_count().map_err(map_error)?;
    let film_count = catalog.film_count().map_err(map_error)?;
    Ok(Json(StatusResponse {
        user_count,
        film_count,
        persistent: catalog.is_persistent(),
    }))
}

// =============================================================================
// USER HANDLERS
// =============================================================================

/// `POST /users` - register a new user.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<UserResponse>, ApiError> {
    payload.validate(today()).map_err(map_error)?;
    let mut catalog = state.catalog.write().await;
    let user = catalog
        .create_user(payload.into_new_user())
        .map_err(map_error)?;
    tracing::info!(user_id = user.id.0, "User registered");
    Ok(Json(user.into()))
}

/// `PUT /users` - update an existing user.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<UserResponse>, ApiError> {
    payload.validate(today()).map_err(map_error)?;
    let user = payload.into_user().map_err(map_error)?;
    let mut catalog = state.catalog.write().await;
    let updated = catalog.update_user(&user).map_err(map_error)?;
    Ok(Json(updated.into()))
}

/// `GET /users` - list all users.
pub async fn users_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let catalog = state.catalog.read().await;
    let users = catalog.users().map_err(map_error)?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// `GET /users/{id}` - fetch a single user.
pub async fn user_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<UserResponse>, ApiError> {
    let catalog = state.catalog.read().await;
    let user = catalog.user(UserId(id)).map_err(map_error)?;
    Ok(Json(user.into()))
}

// =============================================================================
// FRIENDSHIP HANDLERS
// =============================================================================

/// `PUT /users/{id}/friends/{friend_id}` - send a friend request.
///
/// Creates a pending edge from `id` to `friend_id`. Repeating the request
/// never downgrades an already-confirmed friendship.
pub async fn add_friend_handler(
    State(state): State<AppState>,
    Path((id, friend_id)): Path<(u64, u64)>,
) -> Result<StatusCode, ApiError> {
    let mut catalog = state.catalog.write().await;
    catalog
        .add_friend(UserId(id), UserId(friend_id))
        .map_err(map_error)?;
    Ok(StatusCode::OK)
}

/// `PUT /users/{id}/friends/{friend_id}/confirm` - confirm a pending request.
pub async fn confirm_friend_handler(
    State(state): State<AppState>,
    Path((id, friend_id)): Path<(u64, u64)>,
) -> Result<StatusCode, ApiError> {
    let mut catalog = state.catalog.write().await;
    catalog
        .confirm_friend(UserId(id), UserId(friend_id))
        .map_err(map_error)?;
    Ok(StatusCode::OK)
}

/// `DELETE /users/{id}/friends/{friend_id}` - remove a friendship.
///
/// Removing an absent friendship is a no-op.
pub async fn remove_friend_handler(
    State(state): State<AppState>,
    Path((id, friend_id)): Path<(u64, u64)>,
) -> Result<StatusCode, ApiError> {
    let mut catalog = state.catalog.write().await;
    catalog
        .remove_friend(UserId(id), UserId(friend_id))
        .map_err(map_error)?;
    Ok(StatusCode::OK)
}

/// `GET /users/{id}/friends` - list a user's friends (any status).
pub async fn friends_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let catalog = state.catalog.read().await;
    let friends = catalog.friends(UserId(id)).map_err(map_error)?;
    Ok(Json(friends.into_iter().map(UserResponse::from).collect()))
}

/// `GET /users/{id}/friends/common/{other_id}` - friends in common.
pub async fn common_friends_handler(
    State(state): State<AppState>,
    Path((id, other_id)): Path<(u64, u64)>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let catalog = state.catalog.read().await;
    let common = catalog
        .common_friends(UserId(id), UserId(other_id))
        .map_err(map_error)?;
    Ok(Json(common.into_iter().map(UserResponse::from).collect()))
}

// =============================================================================
// FILM HANDLERS
// =============================================================================

/// `POST /films` - catalogue a new film.
pub async fn create_film_handler(
    State(state): State<AppState>,
    Json(payload): Json<FilmPayload>,
) -> Result<Json<FilmResponse>, ApiError> {
    payload.validate().map_err(map_error)?;
    let draft = payload.into_new_film().map_err(map_error)?;
    let mut catalog = state.catalog.write().await;
    let film = catalog.create_film(draft).map_err(map_error)?;
    tracing::info!(film_id = film.id.0, "Film catalogued");
    let response = FilmResponse::from_film(film, catalog.reference());
    Ok(Json(response))
}

/// `PUT /films` - update an existing film.
pub async fn update_film_handler(
    State(state): State<AppState>,
    Json(payload): Json<FilmPayload>,
) -> Result<Json<FilmResponse>, ApiError> {
    payload.validate().map_err(map_error)?;
    let film = payload.into_film().map_err(map_error)?;
    let mut catalog = state.catalog.write().await;
    let updated = catalog.update_film(&film).map_err(map_error)?;
    let response = FilmResponse::from_film(updated, catalog.reference());
    Ok(Json(response))
}

/// `GET /films` - list all films.
pub async fn films_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<FilmResponse>>, ApiError> {
    let catalog = state.catalog.read().await;
    let films = catalog.films().map_err(map_error)?;
    let responses = films
        .into_iter()
        .map(|f| FilmResponse::from_film(f, catalog.reference()))
        .collect();
    Ok(Json(responses))
}

/// `GET /films/{id}` - fetch a single film.
pub async fn film_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<FilmResponse>, ApiError> {
    let catalog = state.catalog.read().await;
    let film = catalog.film(FilmId(id)).map_err(map_error)?;
    let response = FilmResponse::from_film(film, catalog.reference());
    Ok(Json(response))
}

// =============================================================================
// LIKE HANDLERS
// =============================================================================

/// `PUT /films/{id}/like/{user_id}` - like a film.
///
/// Liking a film twice is not an error; the like counts once.
pub async fn add_like_handler(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(u64, u64)>,
) -> Result<StatusCode, ApiError> {
    let mut catalog = state.catalog.write().await;
    let newly = catalog
        .add_like(FilmId(id), UserId(user_id))
        .map_err(map_error)?;
    if !newly {
        tracing::debug!(film_id = id, user_id = user_id, "Like already recorded");
    }
    Ok(StatusCode::OK)
}

/// `DELETE /films/{id}/like/{user_id}` - remove a like.
///
/// Removing an absent like is a silent no-op.
pub async fn remove_like_handler(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(u64, u64)>,
) -> Result<StatusCode, ApiError> {
    let mut catalog = state.catalog.write().await;
    catalog
        .remove_like(FilmId(id), UserId(user_id))
        .map_err(map_error)?;
    Ok(StatusCode::OK)
}

/// `GET /films/popular?count=N` - most-liked films.
///
/// Missing or non-positive `count` falls back to the catalogue default.
pub async fn popular_handler(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> Result<Json<Vec<FilmResponse>>, ApiError> {
    let catalog = state.catalog.read().await;
    let films = catalog.popular(params.count.unwrap_or(0)).map_err(map_error)?;
    let responses = films
        .into_iter()
        .map(|f| FilmResponse::from_film(f, catalog.reference()))
        .collect();
    Ok(Json(responses))
}

// =============================================================================
// REFERENCE DATA HANDLERS
// =============================================================================

/// `GET /genres` - all genres in ascending id order.
pub async fn genres_handler(State(state): State<AppState>) -> Json<Vec<GenreDto>> {
    let catalog = state.catalog.read().await;
    let genres = catalog
        .genres()
        .into_iter()
        .map(|g| GenreDto {
            id: g.id.0,
            name: g.name,
        })
        .collect();
    Json(genres)
}

/// `GET /genres/{id}` - a single genre.
pub async fn genre_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<GenreDto>, ApiError> {
    let catalog = state.catalog.read().await;
    let genre = catalog.genre(GenreId(id)).map_err(map_error)?;
    Ok(Json(GenreDto {
        id: genre.id.0,
        name: genre.name,
    }))
}

/// `GET /mpa` - all MPA ratings in ascending id order.
pub async fn mpa_list_handler(State(state): State<AppState>) -> Json<Vec<MpaDto>> {
    let catalog = state.catalog.read().await;
    let ratings = catalog
        .mpa_ratings()
        .into_iter()
        .map(|m| MpaDto {
            id: m.id.0,
            name: m.name,
        })
        .collect();
    Json(ratings)
}

/// `GET /mpa/{id}` - a single MPA rating.
pub async fn mpa_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<MpaDto>, ApiError> {
    let catalog = state.catalog.read().await;
    let rating = catalog.mpa(MpaId(id)).map_err(map_error)?;
    Ok(Json(MpaDto {
        id: rating.id.0,
        name: rating.name,
    }))
}
