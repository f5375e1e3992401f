//! End-to-end catalogue flows exercised against both storage backends.

use chrono::NaiveDate;
use cinegraph_core::{
    Catalog, CatalogError, FilmId, FriendStatus, GenreId, MpaId, NewFilm, NewUser, UserId,
};
use tempfile::tempdir;

fn draft_user(login: &str) -> NewUser {
    NewUser {
        email: format!("{login}@example.com"),
        login: login.to_string(),
        name: Some(login.to_string()),
        birthday: NaiveDate::from_ymd_opt(1988, 11, 2).expect("date"),
    }
}

fn draft_film(name: &str) -> NewFilm {
    NewFilm {
        name: name.to_string(),
        description: "a film".to_string(),
        release_date: NaiveDate::from_ymd_opt(1995, 9, 22).expect("date"),
        duration: 105,
        mpa: MpaId(3),
        genres: vec![GenreId(4), GenreId(6)],
    }
}

/// Run a scenario against both backends so semantics never diverge.
fn on_both_backends(scenario: impl Fn(&mut Catalog)) {
    let mut in_memory = Catalog::new();
    scenario(&mut in_memory);

    let temp = tempdir().expect("temp dir");
    let mut persistent = Catalog::with_redb(temp.path().join("flows.redb")).expect("open db");
    scenario(&mut persistent);
}

#[test]
fn like_unlike_relike_counts_once() {
    on_both_backends(|catalog| {
        let user = catalog.create_user(draft_user("alice")).expect("create");
        let film = catalog.create_film(draft_film("Heat")).expect("create");

        assert!(catalog.add_like(film.id, user.id).expect("like"));
        assert!(catalog.remove_like(film.id, user.id).expect("unlike"));
        assert!(catalog.add_like(film.id, user.id).expect("relike"));
        assert_eq!(catalog.like_count(film.id).expect("count"), 1);
    });
}

#[test]
fn unlike_without_like_is_silent() {
    on_both_backends(|catalog| {
        let user = catalog.create_user(draft_user("alice")).expect("create");
        let film = catalog.create_film(draft_film("Heat")).expect("create");

        assert!(!catalog.remove_like(film.id, user.id).expect("unlike"));
        assert_eq!(catalog.like_count(film.id).expect("count"), 0);
    });
}

#[test]
fn friendship_request_confirm_remove() {
    on_both_backends(|catalog| {
        let alice = catalog.create_user(draft_user("alice")).expect("create");
        let bob = catalog.create_user(draft_user("bob")).expect("create");

        catalog.add_friend(alice.id, bob.id).expect("request");
        assert_eq!(
            catalog.friend_status(alice.id, bob.id).expect("status"),
            Some(FriendStatus::Pending)
        );

        catalog.confirm_friend(alice.id, bob.id).expect("confirm");
        assert_eq!(
            catalog.friend_status(alice.id, bob.id).expect("status"),
            Some(FriendStatus::Confirmed)
        );

        catalog.remove_friend(alice.id, bob.id).expect("remove");
        assert_eq!(catalog.friend_status(alice.id, bob.id).expect("status"), None);

        // Removing an absent edge stays a no-op
        catalog.remove_friend(alice.id, bob.id).expect("remove again");
    });
}

#[test]
fn confirm_without_request_fails() {
    on_both_backends(|catalog| {
        let alice = catalog.create_user(draft_user("alice")).expect("create");
        let bob = catalog.create_user(draft_user("bob")).expect("create");

        let result = catalog.confirm_friend(alice.id, bob.id);
        assert!(matches!(
            result,
            Err(CatalogError::FriendRequestNotFound(..))
        ));
    });
}

#[test]
fn friendship_with_missing_user_fails() {
    on_both_backends(|catalog| {
        let alice = catalog.create_user(draft_user("alice")).expect("create");
        let ghost = UserId(999);

        assert!(matches!(
            catalog.add_friend(alice.id, ghost),
            Err(CatalogError::UserNotFound(_))
        ));
        assert!(matches!(
            catalog.add_friend(ghost, alice.id),
            Err(CatalogError::UserNotFound(_))
        ));
        assert!(matches!(
            catalog.remove_friend(alice.id, ghost),
            Err(CatalogError::UserNotFound(_))
        ));
    });
}

#[test]
fn common_friends_intersection_ascending() {
    on_both_backends(|catalog| {
        let alice = catalog.create_user(draft_user("alice")).expect("create");
        let bob = catalog.create_user(draft_user("bob")).expect("create");
        let carol = catalog.create_user(draft_user("carol")).expect("create");
        let dave = catalog.create_user(draft_user("dave")).expect("create");

        catalog.add_friend(alice.id, carol.id).expect("request");
        catalog.add_friend(alice.id, dave.id).expect("request");
        catalog.add_friend(bob.id, dave.id).expect("request");
        catalog.add_friend(bob.id, carol.id).expect("request");

        let common = catalog.common_friends(alice.id, bob.id).expect("common");
        let ids: Vec<_> = common.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![carol.id, dave.id]);
    });
}

#[test]
fn common_friends_empty_without_overlap() {
    on_both_backends(|catalog| {
        let alice = catalog.create_user(draft_user("alice")).expect("create");
        let bob = catalog.create_user(draft_user("bob")).expect("create");

        let common = catalog.common_friends(alice.id, bob.id).expect("common");
        assert!(common.is_empty());
    });
}

#[test]
fn popular_ranks_identically_on_both_backends() {
    let scenario = |catalog: &mut Catalog| -> Vec<FilmId> {
        let alice = catalog.create_user(draft_user("alice")).expect("create");
        let bob = catalog.create_user(draft_user("bob")).expect("create");
        let carol = catalog.create_user(draft_user("carol")).expect("create");

        let quiet = catalog.create_film(draft_film("quiet")).expect("create");
        let hit = catalog.create_film(draft_film("hit")).expect("create");
        let mid = catalog.create_film(draft_film("mid")).expect("create");

        catalog.add_like(hit.id, alice.id).expect("like");
        catalog.add_like(hit.id, bob.id).expect("like");
        catalog.add_like(hit.id, carol.id).expect("like");
        catalog.add_like(mid.id, alice.id).expect("like");

        let _ = quiet;
        catalog
            .popular(10)
            .expect("popular")
            .iter()
            .map(|f| f.id)
            .collect()
    };

    let mut in_memory = Catalog::new();
    let memory_order = scenario(&mut in_memory);

    let temp = tempdir().expect("temp dir");
    let mut persistent = Catalog::with_redb(temp.path().join("rank.redb")).expect("open db");
    let redb_order = scenario(&mut persistent);

    assert_eq!(memory_order, redb_order);
    assert_eq!(memory_order, vec![FilmId(2), FilmId(3), FilmId(1)]);
}

#[test]
fn reopen_preserves_catalogue_state() {
    let temp = tempdir().expect("temp dir");
    let db_path = temp.path().join("catalog.redb");

    {
        let mut catalog = Catalog::with_redb(&db_path).expect("open db");
        let alice = catalog.create_user(draft_user("alice")).expect("create");
        let bob = catalog.create_user(draft_user("bob")).expect("create");
        let film = catalog.create_film(draft_film("Heat")).expect("create");

        catalog.add_like(film.id, alice.id).expect("like");
        catalog.add_friend(alice.id, bob.id).expect("request");
        catalog.confirm_friend(alice.id, bob.id).expect("confirm");
    }

    {
        let mut catalog = Catalog::with_redb(&db_path).expect("reopen db");
        assert!(catalog.is_persistent());
        assert_eq!(catalog.user_count().expect("count"), 2);
        assert_eq!(catalog.film_count().expect("count"), 1);
        assert_eq!(catalog.like_count(FilmId(1)).expect("count"), 1);
        assert_eq!(
            catalog.friend_status(UserId(1), UserId(2)).expect("status"),
            Some(FriendStatus::Confirmed)
        );

        // New ids continue after the persisted counters
        let carol = catalog.create_user(draft_user("carol")).expect("create");
        assert_eq!(carol.id, UserId(3));
        let film = catalog.create_film(draft_film("Ronin")).expect("create");
        assert_eq!(film.id, FilmId(2));
    }
}

#[test]
fn update_preserves_edges() {
    on_both_backends(|catalog| {
        let alice = catalog.create_user(draft_user("alice")).expect("create");
        let mut film = catalog.create_film(draft_film("Heat")).expect("create");
        catalog.add_like(film.id, alice.id).expect("like");

        film.name = "Heat (Director's Cut)".to_string();
        let updated = catalog.update_film(&film).expect("update");

        assert_eq!(updated.id, film.id);
        assert_eq!(catalog.like_count(film.id).expect("count"), 1);
    });
}

#[test]
fn listings_come_back_ascending() {
    on_both_backends(|catalog| {
        for login in ["alice", "bob", "carol"] {
            catalog.create_user(draft_user(login)).expect("create");
        }
        for name in ["one", "two"] {
            catalog.create_film(draft_film(name)).expect("create");
        }

        let user_ids: Vec<_> = catalog.users().expect("users").iter().map(|u| u.id).collect();
        assert_eq!(user_ids, vec![UserId(1), UserId(2), UserId(3)]);

        let film_ids: Vec<_> = catalog.films().expect("films").iter().map(|f| f.id).collect();
        assert_eq!(film_ids, vec![FilmId(1), FilmId(2)]);
    });
}
