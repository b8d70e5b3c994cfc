use super::*;
use time::macros::{date, datetime};

fn entry(game_id: i64, name: &str, status: GameStatus, rank: Option<i32>) -> UserGame {
    UserGame {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        game_id,
        game_name: name.into(),
        game_image: None,
        status,
        rank,
        released: None,
        created_at: datetime!(2025-01-01 12:00 UTC),
    }
}

fn sample() -> Vec<UserGame> {
    vec![
        entry(1, "The Legend of Zelda: Breath of the Wild", GameStatus::Played, Some(1)),
        entry(2, "Zelda II: The Adventure of Link", GameStatus::Watching, None),
        entry(3, "Hades", GameStatus::Playing, Some(2)),
        entry(4, "Hollow Knight: Silksong", GameStatus::Watching, None),
    ]
}

// =============================================================================
// GameStatus
// =============================================================================

#[test]
fn status_round_trips_through_str() {
    for status in [GameStatus::Played, GameStatus::Playing, GameStatus::Watching] {
        assert_eq!(status.as_str().parse::<GameStatus>(), Ok(status));
    }
}

#[test]
fn status_from_str_is_case_insensitive() {
    assert_eq!("watching".parse::<GameStatus>(), Ok(GameStatus::Watching));
    assert_eq!(" PLAYING ".parse::<GameStatus>(), Ok(GameStatus::Playing));
    assert_eq!("wishlist".parse::<GameStatus>(), Err(UnknownStatus("wishlist".into())));
}

#[test]
fn status_serializes_capitalized() {
    assert_eq!(serde_json::to_value(GameStatus::Watching).unwrap(), "Watching");
}

// =============================================================================
// filter_collection
// =============================================================================

#[test]
fn filter_without_criteria_keeps_everything() {
    assert_eq!(filter_collection(sample(), None, "").len(), 4);
}

#[test]
fn filter_by_status() {
    let watching = filter_collection(sample(), Some(GameStatus::Watching), "");
    assert_eq!(watching.iter().map(|g| g.game_id).collect::<Vec<_>>(), vec![2, 4]);
}

#[test]
fn filter_by_substring_is_case_insensitive() {
    let zelda = filter_collection(sample(), None, "  ZELDA ");
    assert_eq!(zelda.iter().map(|g| g.game_id).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn filter_combines_status_and_text() {
    let hits = filter_collection(sample(), Some(GameStatus::Watching), "zelda");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].game_id, 2);
}

#[test]
fn filter_with_no_match_is_empty() {
    assert!(filter_collection(sample(), Some(GameStatus::Playing), "zelda").is_empty());
}

// =============================================================================
// status_map / ranks
// =============================================================================

#[test]
fn status_map_indexes_by_game_id() {
    let map = status_map(&sample());
    assert_eq!(map.get(&3), Some(&GameStatus::Playing));
    assert_eq!(map.get(&99), None);
}

#[test]
fn validate_rank_bounds() {
    assert!(matches!(validate_rank(0), Ok(None)));
    assert!(matches!(validate_rank(1), Ok(Some(1))));
    assert!(matches!(validate_rank(30), Ok(Some(30))));
    assert!(matches!(validate_rank(31), Err(CollectionError::InvalidRank(31))));
    assert!(matches!(validate_rank(-1), Err(CollectionError::InvalidRank(-1))));
}

#[test]
fn board_rank_ignores_zero_and_out_of_range() {
    assert_eq!(entry(1, "a", GameStatus::Played, Some(0)).board_rank(), None);
    assert_eq!(entry(1, "a", GameStatus::Played, Some(31)).board_rank(), None);
    assert_eq!(entry(1, "a", GameStatus::Played, Some(7)).board_rank(), Some(7));
}

// =============================================================================
// serde
// =============================================================================

#[test]
fn user_game_serializes_dates_as_strings() {
    let mut game = entry(5, "Celeste", GameStatus::Played, None);
    game.released = Some(date!(2018 - 01 - 25));
    let json = serde_json::to_value(&game).unwrap();
    assert_eq!(json["released"], "2018-01-25");
    assert_eq!(json["created_at"], "2025-01-01T12:00:00Z");
    assert_eq!(json["status"], "Played");
    assert!(json["rank"].is_null());
}

#[test]
fn game_summary_from_catalog_game() {
    let game: Game = serde_json::from_str(
        r#"{"id": 7, "name": "Outer Wilds", "released": "2019-05-28", "background_image": "https://img", "rating": 4.4}"#,
    )
    .unwrap();
    let summary = GameSummary::from(&game);
    assert_eq!(summary.id, 7);
    assert_eq!(summary.released.as_deref(), Some("2019-05-28"));
    assert_eq!(summary.background_image.as_deref(), Some("https://img"));
}

#[test]
fn collection_error_display() {
    assert!(CollectionError::InvalidRank(42).to_string().contains("42"));
}

// =============================================================================
// persistence against a live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use crate::state::test_helpers::{live_pool, seed_user};

    fn summary(id: i64, name: &str) -> GameSummary {
        GameSummary { id, name: name.into(), background_image: None, released: None }
    }

    async fn ranked_at(pool: &PgPool, user_id: Uuid, rank: i32) -> Vec<UserGame> {
        list_user_games(pool, user_id)
            .await
            .unwrap()
            .into_iter()
            .filter(|g| g.rank == Some(rank))
            .collect()
    }

    #[tokio::test]
    async fn re_adding_a_game_updates_status_in_place() {
        let pool = live_pool().await;
        let user = seed_user(&pool).await;

        let first = add_game(&pool, user, &summary(10, "Celeste"), GameStatus::Watching).await.unwrap();
        let second = add_game(&pool, user, &summary(10, "Renamed Upstream"), GameStatus::Played).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.game_name, "Celeste");
        assert_eq!(second.status, GameStatus::Played);
        assert_eq!(list_user_games(&pool, user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn game_status_reflects_collection() {
        let pool = live_pool().await;
        let user = seed_user(&pool).await;
        add_game(&pool, user, &summary(11, "Hades"), GameStatus::Playing).await.unwrap();

        assert_eq!(game_status(&pool, user, 11).await, Some(GameStatus::Playing));
        assert_eq!(game_status(&pool, user, 12).await, None);
    }

    #[tokio::test]
    async fn remove_is_scoped_to_owner() {
        let pool = live_pool().await;
        let user = seed_user(&pool).await;
        let stranger = seed_user(&pool).await;
        let entry = add_game(&pool, user, &summary(20, "Outer Wilds"), GameStatus::Played).await.unwrap();

        assert!(matches!(remove_game(&pool, stranger, entry.id).await, Err(CollectionError::NotFound(_))));
        assert_eq!(list_user_games(&pool, user).await.unwrap().len(), 1);

        remove_game(&pool, user, entry.id).await.unwrap();
        assert!(list_user_games(&pool, user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn assigning_a_taken_rank_evicts_the_holder() {
        let pool = live_pool().await;
        let user = seed_user(&pool).await;
        let a = add_game(&pool, user, &summary(30, "A"), GameStatus::Played).await.unwrap();
        let b = add_game(&pool, user, &summary(31, "B"), GameStatus::Played).await.unwrap();

        update_rank(&pool, user, a.id, 3).await.unwrap();
        let moved = update_rank(&pool, user, b.id, 3).await.unwrap();
        assert_eq!(moved.rank, Some(3));

        let holders = ranked_at(&pool, user, 3).await;
        assert_eq!(holders.len(), 1);
        assert_eq!(holders[0].id, b.id);
    }

    #[tokio::test]
    async fn rank_zero_clears_the_rank() {
        let pool = live_pool().await;
        let user = seed_user(&pool).await;
        let a = add_game(&pool, user, &summary(40, "A"), GameStatus::Played).await.unwrap();

        update_rank(&pool, user, a.id, 7).await.unwrap();
        let cleared = update_rank(&pool, user, a.id, 0).await.unwrap();
        assert_eq!(cleared.rank, None);
        assert!(list_ranked_games(&pool, user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ranking_someone_elses_entry_is_not_found() {
        let pool = live_pool().await;
        let user = seed_user(&pool).await;
        let stranger = seed_user(&pool).await;
        let a = add_game(&pool, user, &summary(50, "A"), GameStatus::Played).await.unwrap();

        assert!(matches!(update_rank(&pool, stranger, a.id, 1).await, Err(CollectionError::NotFound(_))));
        assert!(matches!(update_rank(&pool, user, a.id, 31).await, Err(CollectionError::InvalidRank(31))));
        assert_eq!(list_user_games(&pool, user).await.unwrap()[0].rank, None);
    }

    #[tokio::test]
    async fn concurrent_rank_updates_leave_one_holder() {
        let pool = live_pool().await;

        for round in 0..20 {
            let user = seed_user(&pool).await;
            let a = add_game(&pool, user, &summary(60, "A"), GameStatus::Played).await.unwrap();
            let b = add_game(&pool, user, &summary(61, "B"), GameStatus::Played).await.unwrap();

            let first = tokio::spawn({
                let pool = pool.clone();
                async move { update_rank(&pool, user, a.id, 5).await }
            });
            let second = tokio::spawn({
                let pool = pool.clone();
                async move { update_rank(&pool, user, b.id, 5).await }
            });
            first.await.unwrap().unwrap();
            second.await.unwrap().unwrap();

            assert_eq!(ranked_at(&pool, user, 5).await.len(), 1, "round {round}");
        }
    }
}
