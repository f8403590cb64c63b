//! Card moves: optimistic relocation plus per-card commit diffing.

#[cfg(test)]
#[path = "cards_test.rs"]
mod tests;

use tracing::{debug, warn};

use super::{Plan, Reconciler};
use crate::api::types::position_to_wire;
use crate::api::{Card, CardId, ListId};

/// Where a card sits: its list and its position in that list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub list_id: ListId,
    pub position: i64,
}

impl Placement {
    #[must_use]
    pub fn of(card: &Card) -> Self {
        Self { list_id: card.list_id.clone(), position: card.position }
    }
}

/// One card's placement to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCommit {
    pub card_id: CardId,
    pub list_id: ListId,
    pub position: usize,
}

impl CardCommit {
    #[must_use]
    pub fn placement(&self) -> Placement {
        Placement { list_id: self.list_id.clone(), position: position_to_wire(self.position) }
    }
}

impl Reconciler {
    /// Move `card_id` out of `from_list` and into `to_list` at `to_index`
    /// (clamped to the destination length), renumbering every list whose
    /// order changed.
    pub(super) fn move_card(&mut self, card_id: &str, from_list: &str, to_list: &str, to_index: usize) -> Plan {
        let Some(source) = self.lists.get_mut(from_list) else {
            warn!(card_id, from_list, "drag source list is not loaded; ignoring");
            return Plan::Noop;
        };
        let Some(from) = source.iter().position(|c| c.id == card_id) else {
            warn!(card_id, from_list, "dragged card is not in its source list; ignoring");
            return Plan::Noop;
        };

        let mut card = source.remove(from);
        let touched = if from_list == to_list {
            let to = to_index.min(source.len());
            if to == from {
                source.insert(from, card);
                return Plan::Noop;
            }
            source.insert(to, card);
            renumber(source);
            vec![from_list.to_string()]
        } else {
            renumber(source);
            card.list_id = to_list.to_string();
            let destination = self.lists.entry(to_list.to_string()).or_default();
            let to = to_index.min(destination.len());
            destination.insert(to, card);
            renumber(destination);
            vec![from_list.to_string(), to_list.to_string()]
        };

        debug!(card_id, from_list, to_list, to_index, "card moved optimistically");
        Plan::MoveCards { card_id: card_id.to_string(), touched }
    }

    /// Cards in `lists` whose local placement differs from the last confirmed
    /// one, in list order.
    #[must_use]
    pub fn diff(&self, lists: &[ListId]) -> Vec<CardCommit> {
        let mut commits = Vec::new();
        for list_id in lists {
            for (position, card) in self.cards(list_id).iter().enumerate() {
                let local = Placement { list_id: list_id.clone(), position: position_to_wire(position) };
                if self.confirmed.get(&card.id) != Some(&local) {
                    commits.push(CardCommit { card_id: card.id.clone(), list_id: list_id.clone(), position });
                }
            }
        }
        commits
    }

    /// The server accepted `commit`; it is now the confirmed placement.
    pub fn card_commit_succeeded(&mut self, commit: &CardCommit) {
        self.confirmed.insert(commit.card_id.clone(), commit.placement());
    }
}

fn renumber(cards: &mut [Card]) {
    for (i, card) in cards.iter_mut().enumerate() {
        card.position = position_to_wire(i);
    }
}
