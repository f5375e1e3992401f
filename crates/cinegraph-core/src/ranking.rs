//! # Popularity Ranking
//!
//! The canonical like-count ordering over the film catalogue.
//!
//! Both storage backends feed the same sort, so the ranking is observably
//! identical regardless of where the data lives. Ordering is descending by
//! like count with ties broken ascending by film id; the sort is total, so
//! the result is fully deterministic. Integer counts only, no scores.

use crate::types::{Film, FilmId};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Rank films by like count and keep the top `count`.
///
/// Films absent from `counts` rank with zero likes. A `count` beyond the
/// catalogue size returns everything. O(F log F) over the film total.
#[must_use]
pub fn top_by_likes(
    mut films: Vec<Film>,
    counts: &BTreeMap<FilmId, usize>,
    count: usize,
) -> Vec<Film> {
    films.sort_by_key(|film| (Reverse(counts.get(&film.id).copied().unwrap_or(0)), film.id));
    films.truncate(count);
    films
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GenreId, MpaId};
    use chrono::NaiveDate;

    fn film(id: u64) -> Film {
        Film {
            id: FilmId(id),
            name: format!("film-{id}"),
            description: String::new(),
            release_date: NaiveDate::from_ymd_opt(2000, 1, 1).expect("date"),
            duration: 100,
            mpa: MpaId(1),
            genres: vec![GenreId(1)],
        }
    }

    fn ids(films: &[Film]) -> Vec<u64> {
        films.iter().map(|f| f.id.0).collect()
    }

    #[test]
    fn orders_by_descending_like_count() {
        let films = vec![film(1), film(2), film(3)];
        let counts = BTreeMap::from([(FilmId(1), 1), (FilmId(2), 5), (FilmId(3), 3)]);

        let ranked = top_by_likes(films, &counts, 10);
        assert_eq!(ids(&ranked), vec![2, 3, 1]);
    }

    #[test]
    fn ties_break_ascending_by_id() {
        let films = vec![film(3), film(1), film(2)];
        let counts = BTreeMap::from([(FilmId(1), 2), (FilmId(2), 2), (FilmId(3), 2)]);

        let ranked = top_by_likes(films, &counts, 10);
        assert_eq!(ids(&ranked), vec![1, 2, 3]);
    }

    #[test]
    fn zero_like_films_rank_last() {
        let films = vec![film(1), film(2)];
        let counts = BTreeMap::from([(FilmId(2), 1)]);

        let ranked = top_by_likes(films, &counts, 10);
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn truncates_to_count() {
        let films = vec![film(1), film(2), film(3)];
        let counts = BTreeMap::from([(FilmId(1), 3), (FilmId(2), 2), (FilmId(3), 1)]);

        let ranked = top_by_likes(films, &counts, 2);
        assert_eq!(ids(&ranked), vec![1, 2]);
    }

    #[test]
    fn count_beyond_total_returns_all() {
        let films = vec![film(1), film(2)];
        let ranked = top_by_likes(films, &BTreeMap::new(), 100);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn empty_catalogue_ranks_empty() {
        let ranked = top_by_likes(Vec::new(), &BTreeMap::new(), 10);
        assert!(ranked.is_empty());
    }
}
