//! Deck construction for the symbol-matching game.
//!
//! A deck is built from a projective plane of prime order `n` over ℤ/nℤ:
//! n²+n+1 cards of n+1 symbols each, where any two cards share exactly one
//! symbol. Construction is pure and deterministic; shuffling is the
//! caller's job with the room-owned RNG.

pub mod card_sets;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Deck order used by the shipped game: 57 cards of 8 symbols.
pub const DECK_ORDER: usize = 7;

/// A renderable symbol. Identity is `id`; `display` is an opaque token the
/// client uses to draw it, never interpreted by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Symbol {
    pub id: u32,
    pub display: String,
}

/// An immutable card of `n + 1` distinct symbols.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub id: u32,
    pub symbols: SmallVec<[Symbol; DECK_ORDER + 1]>,
}

impl Card {
    pub fn has_symbol(&self, symbol_id: u32) -> bool {
        self.symbols.iter().any(|s| s.id == symbol_id)
    }

    /// Number of symbols shared with another card.
    fn intersection_count(&self, other: &Card) -> usize {
        self.symbols
            .iter()
            .filter(|s| other.has_symbol(s.id))
            .count()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("symbol pool of {available} entries cannot cover order {order}: need {required}")]
    InsufficientSymbols {
        order: usize,
        required: usize,
        available: usize,
    },
    #[error("deck order {0} is not a prime number")]
    NonPrimeOrder(usize),
    #[error("cards {a} and {b} share {count} symbols, expected exactly one")]
    InvalidIntersection { a: u32, b: u32, count: usize },
}

/// Number of cards (and minimum pool size) for a deck of the given order.
pub fn deck_size(order: usize) -> usize {
    order * order + order + 1
}

/// Build the full deck for a prime `order` from the given symbol pool.
///
/// The pairwise-intersection validator runs as a post-condition on every
/// generated deck; a deck that fails it is never dealt.
pub fn generate(order: usize, pool: &[Symbol]) -> Result<Vec<Card>, DeckError> {
    if !is_prime(order) {
        return Err(DeckError::NonPrimeOrder(order));
    }
    let required = deck_size(order);
    if pool.len() < required {
        return Err(DeckError::InsufficientSymbols {
            order,
            required,
            available: pool.len(),
        });
    }

    let n = order;
    let mut cards = Vec::with_capacity(required);

    // Horizon cards: card i holds symbol 0 plus the i-th slice of n symbols.
    for i in 0..=n {
        let mut symbols: SmallVec<[Symbol; DECK_ORDER + 1]> = SmallVec::new();
        symbols.push(pool[0].clone());
        for j in 0..n {
            symbols.push(pool[1 + j + i * n].clone());
        }
        cards.push(Card {
            id: cards.len() as u32,
            symbols,
        });
    }

    // Body cards: card (i, j) holds symbol i+1 plus one symbol from each of
    // the remaining n slices, offset by the line y = i·x + j over ℤ/nℤ.
    for i in 0..n {
        for j in 0..n {
            let mut symbols: SmallVec<[Symbol; DECK_ORDER + 1]> = SmallVec::new();
            symbols.push(pool[i + 1].clone());
            for k in 0..n {
                symbols.push(pool[n + 1 + n * k + ((i * k + j) % n)].clone());
            }
            cards.push(Card {
                id: cards.len() as u32,
                symbols,
            });
        }
    }

    validate(&cards)?;
    Ok(cards)
}

/// Uniform Fisher–Yates shuffle with the room-owned RNG.
pub fn shuffle(deck: &mut [Card], rng: &mut StdRng) {
    deck.shuffle(rng);
}

/// Check the defining deck property: every pair of cards shares exactly
/// one symbol.
pub fn validate(cards: &[Card]) -> Result<(), DeckError> {
    for (i, a) in cards.iter().enumerate() {
        for b in cards.iter().skip(i + 1) {
            let count = a.intersection_count(b);
            if count != 1 {
                return Err(DeckError::InvalidIntersection {
                    a: a.id,
                    b: b.id,
                    count,
                });
            }
        }
    }
    Ok(())
}

/// The single symbol two cards share. Present on every valid deck pair.
pub fn common_symbol<'a>(a: &'a Card, b: &Card) -> Option<&'a Symbol> {
    a.symbols.iter().find(|s| b.has_symbol(s.id))
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}
