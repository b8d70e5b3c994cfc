//! Top-30 board layout.

use serde::Serialize;

use super::collection::UserGame;

/// Number of rank slots on a board.
pub const TOP_SLOTS: i32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankSlot {
    pub rank: i32,
    pub game: Option<UserGame>,
}

/// Lay games out on 30 slots ordered by rank.
///
/// Games without a board rank are skipped. If two games claim the same rank
/// (rows written before ranks were unique), the most recently added one wins
/// whatever order `games` arrives in, so every view of a board agrees.
#[must_use]
pub fn build_slots(games: &[UserGame]) -> Vec<RankSlot> {
    let mut slots: Vec<RankSlot> = (1..=TOP_SLOTS).map(|rank| RankSlot { rank, game: None }).collect();

    for game in games {
        let Some(rank) = game.board_rank() else {
            continue;
        };
        // EDGE: board_rank guarantees 1..=TOP_SLOTS.
        let Some(slot) = usize::try_from(rank - 1).ok().and_then(|i| slots.get_mut(i)) else {
            continue;
        };
        let newer = slot.game.as_ref().is_none_or(|held| game.created_at >= held.created_at);
        if newer {
            slot.game = Some(game.clone());
        }
    }

    slots
}

/// Games offered as candidates for empty slots.
#[must_use]
pub fn unranked(games: &[UserGame]) -> Vec<UserGame> {
    games
        .iter()
        .filter(|g| g.rank.is_none_or(|r| r == 0))
        .cloned()
        .collect()
}

/// Board plus candidate list, as rendered by the top-games page.
#[derive(Debug, Clone, Serialize)]
pub struct TopGamesBoard {
    pub slots: Vec<RankSlot>,
    pub unranked: Vec<UserGame>,
}

#[must_use]
pub fn top_games_board(games: &[UserGame]) -> TopGamesBoard {
    TopGamesBoard { slots: build_slots(games), unranked: unranked(games) }
}

#[cfg(test)]
#[path = "ranking_test.rs"]
mod tests;
