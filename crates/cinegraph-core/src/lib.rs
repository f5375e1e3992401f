//! # cinegraph-core
//!
//! The deterministic catalogue engine for Cinegraph - THE LOGIC.
//!
//! This crate implements the social-graph and ranking subsystem: users,
//! films, like sets, the pending/confirmed friendship graph, common-friend
//! intersection, and popularity ranking over likes.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is the ONLY place where business rules live; transports stay in apps/
//! - Is deterministic: `BTreeMap` everywhere, integer counts, no floats
//! - Has NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod guard;
pub mod limits;
pub mod ranking;
pub mod reference;
pub mod storage;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    CatalogError, Film, FilmId, FriendStatus, GenreId, MpaId, NewFilm, NewUser, User, UserId,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use catalog::{Catalog, StorageBackend};
pub use guard::{require_film, require_user};
pub use limits::{DEFAULT_POPULAR_COUNT, MAX_DESCRIPTION_LEN, min_release_date};
pub use ranking::top_by_likes;
pub use reference::{Genre, MpaRating, ReferenceData};
pub use storage::{MemoryStore, RedbStore};
pub use store::CatalogStore;
