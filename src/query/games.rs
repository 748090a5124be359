//! Allowed game types.
//!
//! Only game identifiers in this list are forwarded to the query library.
//! A few entries are the short names players know (`tf2`, `gmod`, `7d2d`);
//! the querier maps those onto the query library's identifiers.

use std::collections::HashSet;
use std::sync::Arc;

/// Game identifiers accepted by the API.
pub const DEFAULT_GAME_TYPES: &[&str] = &[
    "7d2d",
    "aoc",
    "arma2",
    "ase",
    "asrd",
    "avorion",
    "ballisticoverkill",
    "barotrauma",
    "battalion1944",
    "blackmesa",
    "brainbread2",
    "codenamecure",
    "colonysurvival",
    "counterstrike15",
    "counterstrike16",
    "creativerse",
    "crysiswars",
    "cs",
    "cscz",
    "csgo",
    "css",
    "dab",
    "dod",
    "dods",
    "doi",
    "dst",
    "garrysmod",
    "gmod",
    "hl2dm",
    "hll",
    "hlds",
    "imic",
    "insurgency",
    "insurgencysandstorm",
    "jc2m",
    "l4d",
    "l4d2",
    "minecraft",
    "mordhau",
    "ohd",
    "onset",
    "pixark",
    "projectzomboid",
    "quake2",
    "ror2",
    "rust",
    "savage2",
    "sco",
    "sof2",
    "teamfortress2",
    "tf2",
    "tfc",
    "theforest",
    "theship",
    "unturned",
    "ut",
    "valheim",
    "vrising",
    "warsow",
];

/// Immutable set of game types the validator accepts.
///
/// Cloning is cheap; the set is shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AllowedGameTypes {
    games: Arc<HashSet<String>>,
}

impl AllowedGameTypes {
    /// Build an allowlist from any list of identifiers.
    pub fn new<I, S>(games: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            games: Arc::new(games.into_iter().map(Into::into).collect()),
        }
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, game: &str) -> bool {
        self.games.contains(game)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl Default for AllowedGameTypes {
    fn default() -> Self {
        Self::new(DEFAULT_GAME_TYPES.iter().copied())
    }
}
