//! Per-image reaction state.
//!
//! A user holds at most one reaction per image. "like" is privileged: it has
//! its own iconography client-side, so it never appears in the digest, and
//! re-tapping it always clears whatever the user had.

use crate::database::album::Reaction;

/// The privileged reaction symbol.
pub const LIKE: &str = "like";

/// How many distinct symbols the digest shows. Display-width cap, not a data
/// limit; the underlying list can hold more.
const DIGEST_SYMBOLS: usize = 4;

#[derive(Debug, PartialEq, Eq)]
pub struct ReactionUpdate {
    pub reactions: Vec<Reaction>,
    /// Digest of up to four distinct non-like symbols, in list order.
    pub digest: String,
    /// `"<digest> <count>"`, as displayed under the image.
    pub display_string: String,
}

/// Toggle, replace, or add a user's reaction, then rebuild the digest.
#[must_use]
pub fn apply_reaction(existing: &[Reaction], user_id: &str, symbol: &str) -> ReactionUpdate {
    let mut reactions = existing.to_vec();

    match reactions.iter().position(|r| r.user_id == user_id) {
        Some(index) => {
            if reactions[index].reaction == symbol || symbol == LIKE {
                reactions.remove(index);
            } else {
                reactions[index].reaction = symbol.to_owned();
            }
        }
        None => reactions.push(Reaction {
            user_id: user_id.to_owned(),
            reaction: symbol.to_owned(),
        }),
    }

    let digest = digest(&reactions);
    let display_string = format!("{digest} {}", reactions.len());
    ReactionUpdate {
        reactions,
        digest,
        display_string,
    }
}

/// Up to four distinct non-like symbols, concatenated in list order.
#[must_use]
pub fn digest(reactions: &[Reaction]) -> String {
    let mut symbols: Vec<&str> = Vec::with_capacity(DIGEST_SYMBOLS);
    for reaction in reactions {
        if symbols.len() >= DIGEST_SYMBOLS {
            break;
        }
        let symbol = reaction.reaction.as_str();
        if symbol != LIKE && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols.concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reaction(user_id: &str, symbol: &str) -> Reaction {
        Reaction {
            user_id: user_id.to_owned(),
            reaction: symbol.to_owned(),
        }
    }

    #[test]
    fn adds_a_new_reaction() {
        let update = apply_reaction(&[], "u1", "😂");
        assert_eq!(update.reactions, vec![reaction("u1", "😂")]);
        assert_eq!(update.digest, "😂");
        assert_eq!(update.display_string, "😂 1");
    }

    #[test]
    fn same_symbol_twice_toggles_off() {
        let first = apply_reaction(&[], "u1", "😂");
        let second = apply_reaction(&first.reactions, "u1", "😂");
        assert!(second.reactions.is_empty());
        assert_eq!(second.display_string, " 0");
    }

    #[test]
    fn different_symbol_replaces() {
        let first = apply_reaction(&[], "u1", "😂");
        let second = apply_reaction(&first.reactions, "u1", "🔥");
        assert_eq!(second.reactions, vec![reaction("u1", "🔥")]);
    }

    #[test]
    fn like_clears_any_held_reaction() {
        let held = vec![reaction("u1", "😂")];
        let update = apply_reaction(&held, "u1", LIKE);
        assert!(update.reactions.is_empty());

        // And a double like from scratch also ends empty.
        let first = apply_reaction(&[], "u2", LIKE);
        assert_eq!(first.reactions, vec![reaction("u2", LIKE)]);
        let second = apply_reaction(&first.reactions, "u2", LIKE);
        assert!(second.reactions.is_empty());
    }

    #[test]
    fn one_entry_per_user() {
        let mut reactions = Vec::new();
        for symbol in ["😂", "🔥", "👀", "😂"] {
            reactions = apply_reaction(&reactions, "u1", symbol).reactions;
        }
        assert!(reactions.len() <= 1);
    }

    #[test]
    fn digest_skips_like_and_duplicates() {
        let reactions = vec![
            reaction("u1", "😂"),
            reaction("u2", LIKE),
            reaction("u3", "😂"),
            reaction("u4", "🔥"),
        ];
        assert_eq!(digest(&reactions), "😂🔥");
    }

    #[test]
    fn digest_caps_at_four_distinct_symbols() {
        let reactions: Vec<Reaction> = ["😂", "🔥", "👀", "🎉", "💯", "😢"]
            .iter()
            .enumerate()
            .map(|(i, s)| reaction(&format!("u{i}"), s))
            .collect();
        let digest = digest(&reactions);
        assert_eq!(digest, "😂🔥👀🎉");
        assert_eq!(digest.chars().count(), 4);
    }

    #[test]
    fn removing_same_symbol_keeps_other_users_entry() {
        // u1 reacted 😂, u2 holds a like. u1 re-taps 😂.
        let reactions = vec![reaction("u1", "😂"), reaction("u2", LIKE)];
        let update = apply_reaction(&reactions, "u1", "😂");
        assert_eq!(update.reactions, vec![reaction("u2", LIKE)]);
        assert_eq!(update.digest, "");
        assert_eq!(update.display_string, " 1");
    }
}
