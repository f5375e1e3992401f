//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use cinegraph::api::{
    ErrorResponse, FilmPayload, FilmResponse, HealthResponse, PopularParams, StatusResponse,
    UserPayload, UserResponse,
};
use cinegraph_core::{Film, FilmId, GenreId, MpaId, ReferenceData, User, UserId};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_serialization() {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: "0.4.2".to_string(),
    };

    let json = serde_json::to_string(&health).unwrap();
    assert!(json.contains("\"status\":\"ok\""));
    assert!(json.contains("\"version\":\"0.4.2\""));
}

// =============================================================================
// STATUS RESPONSE TESTS
// =============================================================================

#[test]
fn test_status_response_uses_camel_case() {
    let status = StatusResponse {
        user_count: 12,
        film_count: 34,
        persistent: true,
    };

    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"userCount\":12"));
    assert!(json.contains("\"filmCount\":34"));
    assert!(json.contains("\"persistent\":true"));
}

// =============================================================================
// USER PAYLOAD TESTS
// =============================================================================

#[test]
fn test_user_payload_deserialization() {
    let json = r#"{"email":"a@example.com","login":"alice","name":"Alice","birthday":"1990-05-01"}"#;
    let payload: UserPayload = serde_json::from_str(json).unwrap();

    assert_eq!(payload.id, None);
    assert_eq!(payload.email, "a@example.com");
    assert_eq!(payload.name.as_deref(), Some("Alice"));
    assert_eq!(payload.birthday, date(1990, 5, 1));
}

#[test]
fn test_user_payload_missing_name_is_none() {
    let json = r#"{"email":"a@example.com","login":"alice","birthday":"1990-05-01"}"#;
    let payload: UserPayload = serde_json::from_str(json).unwrap();
    assert!(payload.name.is_none());
}

#[test]
fn test_user_payload_into_user_requires_id() {
    let json = r#"{"email":"a@example.com","login":"alice","birthday":"1990-05-01"}"#;
    let payload: UserPayload = serde_json::from_str(json).unwrap();
    assert!(payload.into_user().is_err());
}

#[test]
fn test_user_response_from_user() {
    let user = User {
        id: UserId(7),
        email: "a@example.com".to_string(),
        login: "alice".to_string(),
        name: "Alice".to_string(),
        birthday: date(1990, 5, 1),
    };

    let response = UserResponse::from(user);
    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"id\":7"));
    assert!(json.contains("\"birthday\":\"1990-05-01\""));
}

// =============================================================================
// FILM PAYLOAD TESTS
// =============================================================================

#[test]
fn test_film_payload_release_date_is_camel_case() {
    let json = r#"{
        "name":"Arrival",
        "description":"First contact",
        "releaseDate":"2016-11-11",
        "duration":116,
        "mpa":{"id":3},
        "genres":[{"id":2}]
    }"#;
    let payload: FilmPayload = serde_json::from_str(json).unwrap();

    assert_eq!(payload.release_date, date(2016, 11, 11));
    assert_eq!(payload.mpa.id, 3);
}

#[test]
fn test_film_payload_genres_optional() {
    let json = r#"{
        "name":"Arrival",
        "description":"First contact",
        "releaseDate":"2016-11-11",
        "duration":116,
        "mpa":{"id":3}
    }"#;
    let payload: FilmPayload = serde_json::from_str(json).unwrap();
    assert!(payload.genres.is_none());

    let draft = payload.into_new_film().unwrap();
    assert!(draft.genres.is_empty());
}

#[test]
fn test_film_response_resolves_reference_names() {
    let reference = ReferenceData::new();
    let film = Film {
        id: FilmId(1),
        name: "Arrival".to_string(),
        description: "First contact".to_string(),
        release_date: date(2016, 11, 11),
        duration: 116,
        mpa: MpaId(3),
        genres: vec![GenreId(2), GenreId(4)],
    };

    let response = FilmResponse::from_film(film, &reference);
    assert_eq!(response.mpa.name, "PG-13");
    assert_eq!(response.genres[0].name, "Drama");
    assert_eq!(response.genres[1].name, "Thriller");

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"releaseDate\":\"2016-11-11\""));
}

// =============================================================================
// QUERY PARAMETER TESTS
// =============================================================================

#[test]
fn test_popular_params_count_optional() {
    let params: PopularParams = serde_json::from_str("{}").unwrap();
    assert!(params.count.is_none());

    let params: PopularParams = serde_json::from_str(r#"{"count":5}"#).unwrap();
    assert_eq!(params.count, Some(5));
}

// =============================================================================
// ERROR RESPONSE TESTS
// =============================================================================

#[test]
fn test_error_response_serialization() {
    let response = ErrorResponse::new("user not found: 7");
    let json = serde_json::to_string(&response).unwrap();
    assert_eq!(json, r#"{"error":"user not found: 7"}"#);
}
