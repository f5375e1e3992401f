//! # redb-backed Catalog Storage
//!
//! A disk-backed catalogue store using redb embedded database.
//!
//! Provides:
//! - ACID transactions (every mutation is a single write transaction)
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//! - Zero configuration
//!
//! Records are serialized with postcard. Edge tables use `(u64, u64)`
//! composite keys so neighbor queries are single range scans.

use crate::store::CatalogStore;
use crate::types::{CatalogError, Film, FilmId, FriendStatus, NewFilm, NewUser, User, UserId};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::collections::BTreeMap;
use std::path::Path;

/// Table for users: UserId(u64) -> serialized User bytes
const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Table for films: FilmId(u64) -> serialized Film bytes
const FILMS: TableDefinition<u64, &[u8]> = TableDefinition::new("films");

/// Table for likes: (film_id, user_id) -> presence marker
const LIKES: TableDefinition<(u64, u64), u8> = TableDefinition::new("likes");

/// Table for friendships: (requester_id, target_id) -> status byte
const FRIENDSHIPS: TableDefinition<(u64, u64), u8> = TableDefinition::new("friendships");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

const NEXT_USER_ID: &str = "next_user_id";
const NEXT_FILM_ID: &str = "next_film_id";

/// A disk-backed catalogue store using redb.
pub struct RedbStore {
    /// The redb database handle.
    db: Database,
    /// Next available user id.
    next_user_id: u64,
    /// Next available film id.
    next_film_id: u64,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("next_user_id", &self.next_user_id)
            .field("next_film_id", &self.next_film_id)
            .finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a catalogue database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let db = Database::create(path.as_ref()).map_err(|e| CatalogError::Io(e.to_string()))?;

        // Initialize tables if they don't exist
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            let _ = write_txn
                .open_table(USERS)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            let _ = write_txn
                .open_table(FILMS)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            let _ = write_txn
                .open_table(LIKES)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            let _ = write_txn
                .open_table(FRIENDSHIPS)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            let _ = write_txn
                .open_table(METADATA)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            write_txn
                .commit()
                .map_err(|e| CatalogError::Io(e.to_string()))?;
        }

        // Load id counters (ids start at 1)
        let read_txn = db
            .begin_read()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let table = read_txn
            .open_table(METADATA)
            .map_err(|e| CatalogError::Io(e.to_string()))?;

        let next_user_id = table
            .get(NEXT_USER_ID)
            .map_err(|e| CatalogError::Io(e.to_string()))?
            .map(|v| v.value())
            .unwrap_or(1);
        let next_film_id = table
            .get(NEXT_FILM_ID)
            .map_err(|e| CatalogError::Io(e.to_string()))?
            .map(|v| v.value())
            .unwrap_or(1);

        Ok(Self {
            db,
            next_user_id,
            next_film_id,
        })
    }

    /// Compact the database (optional optimization).
    pub fn compact(&mut self) -> Result<(), CatalogError> {
        self.db
            .compact()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        Ok(())
    }

    fn decode_status(raw: u8) -> Result<FriendStatus, CatalogError> {
        FriendStatus::from_u8(raw).ok_or_else(|| {
            CatalogError::Serialization(format!("unknown friendship status byte: {raw}"))
        })
    }
}

impl CatalogStore for RedbStore {
    fn create_user(&mut self, draft: NewUser) -> Result<User, CatalogError> {
        let id = UserId(self.next_user_id);
        let next = self.next_user_id.saturating_add(1);

        let name = draft.name.unwrap_or_else(|| draft.login.clone());
        let user = User {
            id,
            email: draft.email,
            login: draft.login,
            name,
            birthday: draft.birthday,
        };
        let user_bytes = postcard::to_allocvec(&user)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        {
            let mut users_table = write_txn
                .open_table(USERS)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            users_table
                .insert(id.0, user_bytes.as_slice())
                .map_err(|e| CatalogError::Io(e.to_string()))?;

            let mut meta_table = write_txn
                .open_table(METADATA)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            meta_table
                .insert(NEXT_USER_ID, next)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| CatalogError::Io(e.to_string()))?;

        // Update in-memory state only after successful commit.
        self.next_user_id = next;
        Ok(user)
    }

    fn update_user(&mut self, user: &User) -> Result<User, CatalogError> {
        if self.user(user.id)?.is_none() {
            return Err(CatalogError::UserNotFound(user.id));
        }

        let user_bytes =
            postcard::to_allocvec(user).map_err(|e| CatalogError::Serialization(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        {
            let mut users_table = write_txn
                .open_table(USERS)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            users_table
                .insert(user.id.0, user_bytes.as_slice())
                .map_err(|e| CatalogError::Io(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        Ok(user.clone())
    }

    fn user(&self, id: UserId) -> Result<Option<User>, CatalogError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let users_table = read_txn
            .open_table(USERS)
            .map_err(|e| CatalogError::Io(e.to_string()))?;

        match users_table
            .get(id.0)
            .map_err(|e| CatalogError::Io(e.to_string()))?
        {
            Some(data) => {
                let user: User = postcard::from_bytes(data.value())
                    .map_err(|e| CatalogError::Serialization(e.to_string()))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    fn users(&self) -> Result<Vec<User>, CatalogError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let users_table = read_txn
            .open_table(USERS)
            .map_err(|e| CatalogError::Io(e.to_string()))?;

        let mut users = Vec::new();
        for entry in users_table
            .iter()
            .map_err(|e| CatalogError::Io(e.to_string()))?
        {
            let (_, value) = entry.map_err(|e| CatalogError::Io(e.to_string()))?;
            let user: User = postcard::from_bytes(value.value())
                .map_err(|e| CatalogError::Serialization(e.to_string()))?;
            users.push(user);
        }
        Ok(users)
    }

    fn user_count(&self) -> Result<usize, CatalogError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let users_table = read_txn
            .open_table(USERS)
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let count = users_table
            .len()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        Ok(count as usize)
    }

    fn create_film(&mut self, draft: NewFilm) -> Result<Film, CatalogError> {
        let id = FilmId(self.next_film_id);
        let next = self.next_film_id.saturating_add(1);

        let film = Film {
            id,
            name: draft.name,
            description: draft.description,
            release_date: draft.release_date,
            duration: draft.duration,
            mpa: draft.mpa,
            genres: draft.genres,
        };
        let film_bytes = postcard::to_allocvec(&film)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        {
            let mut films_table = write_txn
                .open_table(FILMS)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            films_table
                .insert(id.0, film_bytes.as_slice())
                .map_err(|e| CatalogError::Io(e.to_string()))?;

            let mut meta_table = write_txn
                .open_table(METADATA)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            meta_table
                .insert(NEXT_FILM_ID, next)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| CatalogError::Io(e.to_string()))?;

        self.next_film_id = next;
        Ok(film)
    }

    fn update_film(&mut self, film: &Film) -> Result<Film, CatalogError> {
        if self.film(film.id)?.is_none() {
            return Err(CatalogError::FilmNotFound(film.id));
        }

        let film_bytes =
            postcard::to_allocvec(film).map_err(|e| CatalogError::Serialization(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        {
            let mut films_table = write_txn
                .open_table(FILMS)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            films_table
                .insert(film.id.0, film_bytes.as_slice())
                .map_err(|e| CatalogError::Io(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        Ok(film.clone())
    }

    fn film(&self, id: FilmId) -> Result<Option<Film>, CatalogError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let films_table = read_txn
            .open_table(FILMS)
            .map_err(|e| CatalogError::Io(e.to_string()))?;

        match films_table
            .get(id.0)
            .map_err(|e| CatalogError::Io(e.to_string()))?
        {
            Some(data) => {
                let film: Film = postcard::from_bytes(data.value())
                    .map_err(|e| CatalogError::Serialization(e.to_string()))?;
                Ok(Some(film))
            }
            None => Ok(None),
        }
    }

    fn films(&self) -> Result<Vec<Film>, CatalogError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let films_table = read_txn
            .open_table(FILMS)
            .map_err(|e| CatalogError::Io(e.to_string()))?;

        let mut films = Vec::new();
        for entry in films_table
            .iter()
            .map_err(|e| CatalogError::Io(e.to_string()))?
        {
            let (_, value) = entry.map_err(|e| CatalogError::Io(e.to_string()))?;
            let film: Film = postcard::from_bytes(value.value())
                .map_err(|e| CatalogError::Serialization(e.to_string()))?;
            films.push(film);
        }
        Ok(films)
    }

    fn film_count(&self) -> Result<usize, CatalogError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let films_table = read_txn
            .open_table(FILMS)
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let count = films_table
            .len()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        Ok(count as usize)
    }

    fn add_like(&mut self, film: FilmId, user: UserId) -> Result<bool, CatalogError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let newly_added;
        {
            let mut likes_table = write_txn
                .open_table(LIKES)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            let previous = likes_table
                .insert((film.0, user.0), 1u8)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            newly_added = previous.is_none();
        }
        write_txn
            .commit()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        Ok(newly_added)
    }

    fn remove_like(&mut self, film: FilmId, user: UserId) -> Result<bool, CatalogError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let removed;
        {
            let mut likes_table = write_txn
                .open_table(LIKES)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            let previous = likes_table
                .remove((film.0, user.0))
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            removed = previous.is_some();
        }
        write_txn
            .commit()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        Ok(removed)
    }

    fn like_count(&self, film: FilmId) -> Result<usize, CatalogError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let likes_table = read_txn
            .open_table(LIKES)
            .map_err(|e| CatalogError::Io(e.to_string()))?;

        let mut count = 0usize;
        for entry in likes_table
            .range((film.0, 0u64)..=(film.0, u64::MAX))
            .map_err(|e| CatalogError::Io(e.to_string()))?
        {
            entry.map_err(|e| CatalogError::Io(e.to_string()))?;
            count = count.saturating_add(1);
        }
        Ok(count)
    }

    fn like_counts(&self) -> Result<BTreeMap<FilmId, usize>, CatalogError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let likes_table = read_txn
            .open_table(LIKES)
            .map_err(|e| CatalogError::Io(e.to_string()))?;

        let mut counts: BTreeMap<FilmId, usize> = BTreeMap::new();
        for entry in likes_table
            .iter()
            .map_err(|e| CatalogError::Io(e.to_string()))?
        {
            let (key, _) = entry.map_err(|e| CatalogError::Io(e.to_string()))?;
            let (film_id, _user_id) = key.value();
            let slot = counts.entry(FilmId(film_id)).or_insert(0);
            *slot = slot.saturating_add(1);
        }
        Ok(counts)
    }

    fn upsert_friend_request(&mut self, from: UserId, to: UserId) -> Result<(), CatalogError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        {
            let mut friends_table = write_txn
                .open_table(FRIENDSHIPS)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            let existing = friends_table
                .get((from.0, to.0))
                .map_err(|e| CatalogError::Io(e.to_string()))?
                .map(|v| v.value());

            // Existing edges keep their status; CONFIRMED never regresses.
            if existing.is_none() {
                friends_table
                    .insert((from.0, to.0), FriendStatus::Pending.as_u8())
                    .map_err(|e| CatalogError::Io(e.to_string()))?;
            }
        }
        write_txn
            .commit()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        Ok(())
    }

    fn confirm_friend(&mut self, from: UserId, to: UserId) -> Result<bool, CatalogError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let promoted;
        {
            let mut friends_table = write_txn
                .open_table(FRIENDSHIPS)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            let existing = friends_table
                .get((from.0, to.0))
                .map_err(|e| CatalogError::Io(e.to_string()))?
                .map(|v| v.value());

            promoted = existing == Some(FriendStatus::Pending.as_u8());
            if promoted {
                friends_table
                    .insert((from.0, to.0), FriendStatus::Confirmed.as_u8())
                    .map_err(|e| CatalogError::Io(e.to_string()))?;
            }
        }
        write_txn
            .commit()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        Ok(promoted)
    }

    fn remove_friend(&mut self, from: UserId, to: UserId) -> Result<(), CatalogError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        {
            let mut friends_table = write_txn
                .open_table(FRIENDSHIPS)
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            friends_table
                .remove((from.0, to.0))
                .map_err(|e| CatalogError::Io(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        Ok(())
    }

    fn friend_status(
        &self,
        from: UserId,
        to: UserId,
    ) -> Result<Option<FriendStatus>, CatalogError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let friends_table = read_txn
            .open_table(FRIENDSHIPS)
            .map_err(|e| CatalogError::Io(e.to_string()))?;

        match friends_table
            .get((from.0, to.0))
            .map_err(|e| CatalogError::Io(e.to_string()))?
        {
            Some(raw) => Ok(Some(Self::decode_status(raw.value())?)),
            None => Ok(None),
        }
    }

    fn friend_ids(&self, of: UserId) -> Result<Vec<UserId>, CatalogError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let friends_table = read_txn
            .open_table(FRIENDSHIPS)
            .map_err(|e| CatalogError::Io(e.to_string()))?;

        let mut ids = Vec::new();
        for entry in friends_table
            .range((of.0, 0u64)..=(of.0, u64::MAX))
            .map_err(|e| CatalogError::Io(e.to_string()))?
        {
            let (key, _) = entry.map_err(|e| CatalogError::Io(e.to_string()))?;
            let (_from_id, to_id) = key.value();
            ids.push(UserId(to_id));
        }
        Ok(ids)
    }
}
