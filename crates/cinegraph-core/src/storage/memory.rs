//! # In-Memory Catalog Storage
//!
//! The volatile catalogue store.
//!
//! Uses `BTreeMap` exclusively for deterministic ordering; listings and
//! neighbor queries come back sorted by id with no extra work.

use crate::store::CatalogStore;
use crate::types::{CatalogError, Film, FilmId, FriendStatus, NewFilm, NewUser, User, UserId};
use std::collections::{BTreeMap, BTreeSet};

/// The in-memory catalogue store.
///
/// Fast and volatile; used by tests and the `memory` CLI backend.
/// No `HashMap` allowed.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    /// User records: UserId -> User
    users: BTreeMap<UserId, User>,

    /// Film records: FilmId -> Film
    films: BTreeMap<FilmId, Film>,

    /// Like sets: FilmId -> set of users who liked it
    likes: BTreeMap<FilmId, BTreeSet<UserId>>,

    /// Friendship adjacency: requester -> (target -> status)
    friendships: BTreeMap<UserId, BTreeMap<UserId, FriendStatus>>,

    /// Next available user id (ids start at 1).
    next_user_id: u64,

    /// Next available film id (ids start at 1).
    next_film_id: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            films: BTreeMap::new(),
            likes: BTreeMap::new(),
            friendships: BTreeMap::new(),
            next_user_id: 1,
            next_film_id: 1,
        }
    }
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatalogStore for MemoryStore {
    fn create_user(&mut self, draft: NewUser) -> Result<User, CatalogError> {
        let id = UserId(self.next_user_id);
        self.next_user_id = self.next_user_id.saturating_add(1);

        let name = draft.name.unwrap_or_else(|| draft.login.clone());
        let user = User {
            id,
            email: draft.email,
            login: draft.login,
            name,
            birthday: draft.birthday,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    fn update_user(&mut self, user: &User) -> Result<User, CatalogError> {
        if !self.users.contains_key(&user.id) {
            return Err(CatalogError::UserNotFound(user.id));
        }
        self.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    fn user(&self, id: UserId) -> Result<Option<User>, CatalogError> {
        Ok(self.users.get(&id).cloned())
    }

    fn users(&self) -> Result<Vec<User>, CatalogError> {
        Ok(self.users.values().cloned().collect())
    }

    fn user_count(&self) -> Result<usize, CatalogError> {
        Ok(self.users.len())
    }

    fn create_film(&mut self, draft: NewFilm) -> Result<Film, CatalogError> {
        let id = FilmId(self.next_film_id);
        self.next_film_id = self.next_film_id.saturating_add(1);

        let film = Film {
            id,
            name: draft.name,
            description: draft.description,
            release_date: draft.release_date,
            duration: draft.duration,
            mpa: draft.mpa,
            genres: draft.genres,
        };
        self.films.insert(id, film.clone());
        Ok(film)
    }

    fn update_film(&mut self, film: &Film) -> Result<Film, CatalogError> {
        if !self.films.contains_key(&film.id) {
            return Err(CatalogError::FilmNotFound(film.id));
        }
        self.films.insert(film.id, film.clone());
        Ok(film.clone())
    }

    fn film(&self, id: FilmId) -> Result<Option<Film>, CatalogError> {
        Ok(self.films.get(&id).cloned())
    }

    fn films(&self) -> Result<Vec<Film>, CatalogError> {
        Ok(self.films.values().cloned().collect())
    }

    fn film_count(&self) -> Result<usize, CatalogError> {
        Ok(self.films.len())
    }

    fn add_like(&mut self, film: FilmId, user: UserId) -> Result<bool, CatalogError> {
        Ok(self.likes.entry(film).or_default().insert(user))
    }

    fn remove_like(&mut self, film: FilmId, user: UserId) -> Result<bool, CatalogError> {
        Ok(self
            .likes
            .get_mut(&film)
            .is_some_and(|set| set.remove(&user)))
    }

    fn like_count(&self, film: FilmId) -> Result<usize, CatalogError> {
        Ok(self.likes.get(&film).map_or(0, BTreeSet::len))
    }

    fn like_counts(&self) -> Result<BTreeMap<FilmId, usize>, CatalogError> {
        Ok(self
            .likes
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(film, set)| (*film, set.len()))
            .collect())
    }

    fn upsert_friend_request(&mut self, from: UserId, to: UserId) -> Result<(), CatalogError> {
        self.friendships
            .entry(from)
            .or_default()
            .entry(to)
            .or_insert(FriendStatus::Pending);
        Ok(())
    }

    fn confirm_friend(&mut self, from: UserId, to: UserId) -> Result<bool, CatalogError> {
        let Some(targets) = self.friendships.get_mut(&from) else {
            return Ok(false);
        };
        match targets.get_mut(&to) {
            Some(status @ FriendStatus::Pending) => {
                *status = FriendStatus::Confirmed;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn remove_friend(&mut self, from: UserId, to: UserId) -> Result<(), CatalogError> {
        if let Some(targets) = self.friendships.get_mut(&from) {
            targets.remove(&to);
        }
        Ok(())
    }

    fn friend_status(
        &self,
        from: UserId,
        to: UserId,
    ) -> Result<Option<FriendStatus>, CatalogError> {
        Ok(self
            .friendships
            .get(&from)
            .and_then(|targets| targets.get(&to).copied()))
    }

    fn friend_ids(&self, of: UserId) -> Result<Vec<UserId>, CatalogError> {
        Ok(self
            .friendships
            .get(&of)
            .into_iter()
            .flat_map(|targets| targets.keys().copied())
            .collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft_user(login: &str) -> NewUser {
        NewUser {
            email: format!("{login}@example.com"),
            login: login.to_string(),
            name: Some(login.to_string()),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 1).expect("date"),
        }
    }

    #[test]
    fn create_user_assigns_monotonic_ids() {
        let mut store = MemoryStore::new();
        let a = store.create_user(draft_user("alice")).expect("create");
        let b = store.create_user(draft_user("bob")).expect("create");

        assert_eq!(a.id, UserId(1));
        assert_eq!(b.id, UserId(2));
        assert_eq!(store.user_count().expect("count"), 2);
    }

    #[test]
    fn create_user_defaults_name_to_login() {
        let mut store = MemoryStore::new();
        let mut draft = draft_user("carol");
        draft.name = None;

        let user = store.create_user(draft).expect("create");
        assert_eq!(user.name, "carol");
    }

    #[test]
    fn update_missing_user_fails() {
        let mut store = MemoryStore::new();
        let ghost = User {
            id: UserId(99),
            email: "ghost@example.com".to_string(),
            login: "ghost".to_string(),
            name: "ghost".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 1).expect("date"),
        };
        let result = store.update_user(&ghost);
        assert!(matches!(result, Err(CatalogError::UserNotFound(_))));
    }

    #[test]
    fn add_like_is_idempotent() {
        let mut store = MemoryStore::new();
        let film = FilmId(1);
        let user = UserId(1);

        assert!(store.add_like(film, user).expect("add"));
        assert!(!store.add_like(film, user).expect("add again"));
        assert_eq!(store.like_count(film).expect("count"), 1);
    }

    #[test]
    fn remove_absent_like_is_noop() {
        let mut store = MemoryStore::new();
        assert!(!store.remove_like(FilmId(1), UserId(1)).expect("remove"));
    }

    #[test]
    fn upsert_never_downgrades_confirmed() {
        let mut store = MemoryStore::new();
        let (a, b) = (UserId(1), UserId(2));

        store.upsert_friend_request(a, b).expect("upsert");
        assert!(store.confirm_friend(a, b).expect("confirm"));

        // A second request must not regress the edge
        store.upsert_friend_request(a, b).expect("upsert again");
        assert_eq!(
            store.friend_status(a, b).expect("status"),
            Some(FriendStatus::Confirmed)
        );
    }

    #[test]
    fn confirm_without_request_reports_false() {
        let mut store = MemoryStore::new();
        assert!(!store.confirm_friend(UserId(1), UserId(2)).expect("confirm"));
    }

    #[test]
    fn confirm_twice_fails_second_time() {
        let mut store = MemoryStore::new();
        let (a, b) = (UserId(1), UserId(2));

        store.upsert_friend_request(a, b).expect("upsert");
        assert!(store.confirm_friend(a, b).expect("first"));
        assert!(!store.confirm_friend(a, b).expect("second"));
    }

    #[test]
    fn friend_ids_ascending() {
        let mut store = MemoryStore::new();
        let a = UserId(1);

        store.upsert_friend_request(a, UserId(5)).expect("upsert");
        store.upsert_friend_request(a, UserId(3)).expect("upsert");
        store.upsert_friend_request(a, UserId(4)).expect("upsert");

        let ids = store.friend_ids(a).expect("ids");
        assert_eq!(ids, vec![UserId(3), UserId(4), UserId(5)]);
    }

    #[test]
    fn remove_friend_deletes_any_status() {
        let mut store = MemoryStore::new();
        let (a, b) = (UserId(1), UserId(2));

        store.upsert_friend_request(a, b).expect("upsert");
        store.confirm_friend(a, b).expect("confirm");
        store.remove_friend(a, b).expect("remove");

        assert_eq!(store.friend_status(a, b).expect("status"), None);

        // Removing again is a no-op
        store.remove_friend(a, b).expect("remove again");
    }
}
