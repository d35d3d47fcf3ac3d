//! Built-in symbol pools.
//!
//! Card-set asset storage lives outside this server; the wire carries an
//! opaque `cardSetId` and clients resolve artwork themselves. The server
//! only needs *some* display token per symbol so every client agrees on
//! what symbol N is. Unknown ids fall back to the classic set.

use super::{deck_size, Symbol, DECK_ORDER};

/// Card set used when the room config names no other.
pub const DEFAULT_CARD_SET_ID: &str = "classic";

/// The classic pool: 57 emoji, one per symbol index of an order-7 deck.
const CLASSIC_POOL: [&str; 57] = [
    "🍎", "🚀", "🐙", "🎩", "🔑", "🌵", "🦊", "⚽", "🎈", "🐝", "🧲", "🍕", "🌙", "🔨", "🐬",
    "🎲", "🌻", "🚲", "🦉", "🍩", "⚓", "🎸", "🐘", "🧊", "🔔", "🌈", "🚂", "🦀", "🍄", "⏰",
    "🎯", "🐢", "💎", "🔦", "🌊", "🛸", "🦋", "🍇", "⭐", "🎺", "🐊", "🧩", "🔮", "🌴", "🚁",
    "🦜", "🍒", "☂️", "🎨", "🐑", "💡", "🔱", "🌶️", "🛶", "🦄", "🍯", "⚡",
];

/// Resolve a card-set id to its symbol pool. Falls back to the classic set
/// for unknown ids so a stale client config never blocks a game.
pub fn resolve_pool(card_set_id: &str) -> Vec<Symbol> {
    let displays: &[&str] = match card_set_id {
        DEFAULT_CARD_SET_ID => &CLASSIC_POOL,
        other => {
            tracing::debug!(card_set_id = other, "Unknown card set, using default pool");
            &CLASSIC_POOL
        }
    };

    displays
        .iter()
        .enumerate()
        .map(|(id, display)| Symbol {
            id: id as u32,
            display: (*display).to_string(),
        })
        .collect()
}
