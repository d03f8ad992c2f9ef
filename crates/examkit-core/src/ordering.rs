//! Sentence ordering state machine for reordering parts.
//!
//! Each ordering part gets one engine instance. The engine initializes its
//! display order from a previously saved order when one exists, otherwise
//! from a uniform shuffle of the movable items. Example items are pinned:
//! they keep their authored slot through shuffle, moves, and reset, and a
//! move addressing an example slot is rejected outright.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::Part;

/// A movable (or pinned) item of an ordering part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderableItem {
    pub id: String,
    pub text: String,
    pub is_example: bool,
    /// Current display slot; reassigned on every successful move.
    pub position: usize,
}

/// Outcome of a move command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was applied; carries the full display order (example slots
    /// included) to persist as the new saved order.
    Moved(Vec<String>),
    /// The move was rejected: no state change, nothing emitted.
    Rejected(MoveRejection),
}

/// Why a move command was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// Source or destination addresses a pinned example item.
    ExampleSlot,
    /// Source or destination is outside the item list.
    OutOfBounds,
    /// Source equals destination.
    SamePosition,
    /// The part was submitted; the engine is read-only.
    Locked,
}

/// Per-part ordering engine.
#[derive(Debug, Clone)]
pub struct OrderingEngine {
    items: Vec<OrderableItem>,
    natural: Vec<OrderableItem>,
    locked: bool,
}

impl OrderingEngine {
    /// Build the item list from a part's questions.
    ///
    /// A non-empty saved order wins over shuffling: saved ids are mapped
    /// back to items in saved sequence (unknown ids dropped, example items
    /// pinned at their authored slot regardless of where the saved order
    /// put them). Without a saved order the movable items are shuffled
    /// uniformly with the injected generator.
    pub fn from_part<R: Rng + ?Sized>(part: &Part, saved: Option<&[String]>, rng: &mut R) -> Self {
        let natural = natural_items(part);
        let items = match saved {
            Some(order) if !order.is_empty() => reconstruct(&natural, order),
            _ => shuffled(&natural, rng),
        };
        Self {
            items,
            natural,
            locked: false,
        }
    }

    /// Items in current display order.
    pub fn items(&self) -> &[OrderableItem] {
        &self.items
    }

    /// Ids in current display order, example slots included.
    pub fn current_order(&self) -> Vec<String> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Permanently disable moves and reset. Driven by the session
    /// controller on the submit transition.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Apply a move command from a drag interaction.
    ///
    /// Only movable items shift: the moving item travels along the movable
    /// slots while example slots stay put.
    pub fn move_item(&mut self, source: usize, dest: usize) -> MoveOutcome {
        if self.locked {
            return MoveOutcome::Rejected(MoveRejection::Locked);
        }
        if source >= self.items.len() || dest >= self.items.len() {
            return MoveOutcome::Rejected(MoveRejection::OutOfBounds);
        }
        if source == dest {
            return MoveOutcome::Rejected(MoveRejection::SamePosition);
        }
        if self.items[source].is_example || self.items[dest].is_example {
            return MoveOutcome::Rejected(MoveRejection::ExampleSlot);
        }

        let slots = self.movable_slots();
        let source_rank = slots
            .iter()
            .position(|&slot| slot == source)
            .unwrap_or_default();
        let dest_rank = slots
            .iter()
            .position(|&slot| slot == dest)
            .unwrap_or_default();

        let mut movable: Vec<OrderableItem> =
            slots.iter().map(|&slot| self.items[slot].clone()).collect();
        let item = movable.remove(source_rank);
        movable.insert(dest_rank, item);
        for (&slot, item) in slots.iter().zip(movable) {
            self.items[slot] = item;
        }
        self.reposition();

        MoveOutcome::Moved(self.current_order())
    }

    /// Restore the authored order, discarding shuffle and moves. Returns
    /// the restored order, or `None` once the part is read-only.
    pub fn reset(&mut self) -> Option<Vec<String>> {
        if self.locked {
            return None;
        }
        self.items = self.natural.clone();
        Some(self.current_order())
    }

    fn movable_slots(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_example)
            .map(|(slot, _)| slot)
            .collect()
    }

    fn reposition(&mut self) {
        for (slot, item) in self.items.iter_mut().enumerate() {
            item.position = slot;
        }
    }
}

fn natural_items(part: &Part) -> Vec<OrderableItem> {
    part.questions
        .iter()
        .enumerate()
        .map(|(slot, q)| OrderableItem {
            id: q.id.clone(),
            text: q.prompt.clone(),
            is_example: q.is_example,
            position: slot,
        })
        .collect()
}

fn shuffled<R: Rng + ?Sized>(natural: &[OrderableItem], rng: &mut R) -> Vec<OrderableItem> {
    let mut items = natural.to_vec();
    let slots: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.is_example)
        .map(|(slot, _)| slot)
        .collect();
    let mut movable: Vec<OrderableItem> = slots.iter().map(|&slot| items[slot].clone()).collect();
    movable.shuffle(rng);
    for (&slot, item) in slots.iter().zip(movable) {
        items[slot] = item;
    }
    for (slot, item) in items.iter_mut().enumerate() {
        item.position = slot;
    }
    items
}

fn reconstruct(natural: &[OrderableItem], saved: &[String]) -> Vec<OrderableItem> {
    let mut items = natural.to_vec();
    let slots: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.is_example)
        .map(|(slot, _)| slot)
        .collect();

    // Saved ids map back to movable items in saved sequence; unknown ids,
    // duplicates, and example ids are dropped. Items the saved order never
    // mentioned keep their relative authored order at the end.
    let mut remaining: HashMap<&str, &OrderableItem> = natural
        .iter()
        .filter(|item| !item.is_example)
        .map(|item| (item.id.as_str(), item))
        .collect();
    let mut sequence: Vec<OrderableItem> = Vec::with_capacity(slots.len());
    for id in saved {
        if let Some(item) = remaining.remove(id.as_str()) {
            sequence.push(item.clone());
        }
    }
    for item in natural.iter().filter(|item| !item.is_example) {
        if remaining.remove(item.id.as_str()).is_some() {
            sequence.push(item.clone());
        }
    }

    for (&slot, item) in slots.iter().zip(sequence) {
        items[slot] = item;
    }
    for (slot, item) in items.iter_mut().enumerate() {
        item.position = slot;
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PartKind, Question};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn part(ids: &[&str], example: &[&str]) -> Part {
        Part {
            id: "order-part".into(),
            kind: PartKind::Ordering,
            passage: String::new(),
            questions: ids
                .iter()
                .map(|id| Question {
                    id: (*id).into(),
                    prompt: format!("sentence {id}"),
                    options: vec![],
                    answer: None,
                    is_example: example.contains(id),
                })
                .collect(),
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn example_slot(engine: &OrderingEngine) -> usize {
        engine
            .items()
            .iter()
            .position(|item| item.is_example)
            .unwrap()
    }

    #[test]
    fn shuffle_keeps_example_pinned() {
        let p = part(&["e", "a", "b", "c", "d"], &["e"]);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let engine = OrderingEngine::from_part(&p, None, &mut rng);
            assert_eq!(example_slot(&engine), 0, "seed {seed}");
            assert_eq!(engine.items().len(), 5);
        }
    }

    #[test]
    fn reconstruct_round_trips_saved_order() {
        let p = part(&["e", "a", "b", "c", "d"], &["e"]);
        let saved: Vec<String> = vec!["e", "c", "a", "d", "b"]
            .into_iter()
            .map(String::from)
            .collect();
        let engine = OrderingEngine::from_part(&p, Some(&saved), &mut rng());
        assert_eq!(engine.current_order(), saved);

        // Re-saving without moves is idempotent.
        let again = OrderingEngine::from_part(&p, Some(&engine.current_order()), &mut rng());
        assert_eq!(again.current_order(), saved);
    }

    #[test]
    fn reconstruct_drops_unknown_ids() {
        let p = part(&["e", "a", "b"], &["e"]);
        let saved: Vec<String> = vec!["ghost", "b", "a"]
            .into_iter()
            .map(String::from)
            .collect();
        let engine = OrderingEngine::from_part(&p, Some(&saved), &mut rng());
        assert_eq!(engine.current_order(), vec!["e", "b", "a"]);
    }

    #[test]
    fn reconstruct_pins_example_despite_saved_order() {
        let p = part(&["a", "e", "b"], &["e"]);
        // Saved order claims the example moved; it did not.
        let saved: Vec<String> = vec!["e", "b", "a"].into_iter().map(String::from).collect();
        let engine = OrderingEngine::from_part(&p, Some(&saved), &mut rng());
        assert_eq!(example_slot(&engine), 1);
        assert_eq!(engine.current_order(), vec!["b", "e", "a"]);
    }

    #[test]
    fn reconstruct_appends_unmentioned_items() {
        let p = part(&["e", "a", "b", "c"], &["e"]);
        let saved: Vec<String> = vec!["c".to_string()];
        let engine = OrderingEngine::from_part(&p, Some(&saved), &mut rng());
        assert_eq!(engine.current_order(), vec!["e", "c", "a", "b"]);
    }

    #[test]
    fn empty_saved_order_falls_back_to_shuffle() {
        let p = part(&["e", "a", "b", "c", "d"], &["e"]);
        let engine = OrderingEngine::from_part(&p, Some(&[]), &mut rng());
        assert_eq!(example_slot(&engine), 0);
    }

    #[test]
    fn move_reorders_and_emits_full_order() {
        let p = part(&["a", "b", "c"], &[]);
        let saved: Vec<String> = vec!["a", "b", "c"].into_iter().map(String::from).collect();
        let mut engine = OrderingEngine::from_part(&p, Some(&saved), &mut rng());

        match engine.move_item(0, 2) {
            MoveOutcome::Moved(order) => assert_eq!(order, vec!["b", "c", "a"]),
            other => panic!("expected move, got {other:?}"),
        }
        let positions: Vec<usize> = engine.items().iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn move_to_same_slot_is_rejected() {
        let p = part(&["a", "b", "c"], &[]);
        let saved: Vec<String> = vec!["a", "b", "c"].into_iter().map(String::from).collect();
        let mut engine = OrderingEngine::from_part(&p, Some(&saved), &mut rng());
        assert_eq!(
            engine.move_item(1, 1),
            MoveOutcome::Rejected(MoveRejection::SamePosition)
        );
        assert_eq!(engine.current_order(), saved);
    }

    #[test]
    fn move_addressing_example_is_rejected() {
        let p = part(&["e", "a", "b"], &["e"]);
        let saved: Vec<String> = vec!["e", "a", "b"].into_iter().map(String::from).collect();
        let mut engine = OrderingEngine::from_part(&p, Some(&saved), &mut rng());
        assert_eq!(
            engine.move_item(0, 2),
            MoveOutcome::Rejected(MoveRejection::ExampleSlot)
        );
        assert_eq!(
            engine.move_item(1, 0),
            MoveOutcome::Rejected(MoveRejection::ExampleSlot)
        );
        assert_eq!(engine.current_order(), saved);
    }

    #[test]
    fn move_out_of_bounds_is_rejected() {
        let p = part(&["a", "b"], &[]);
        let saved: Vec<String> = vec!["a", "b"].into_iter().map(String::from).collect();
        let mut engine = OrderingEngine::from_part(&p, Some(&saved), &mut rng());
        assert_eq!(
            engine.move_item(0, 5),
            MoveOutcome::Rejected(MoveRejection::OutOfBounds)
        );
    }

    #[test]
    fn moving_past_example_keeps_its_slot() {
        let p = part(&["a", "e", "b", "c"], &["e"]);
        let saved: Vec<String> = vec!["a", "e", "b", "c"]
            .into_iter()
            .map(String::from)
            .collect();
        let mut engine = OrderingEngine::from_part(&p, Some(&saved), &mut rng());

        // "a" travels from slot 0 to slot 3, across the example at slot 1.
        match engine.move_item(0, 3) {
            MoveOutcome::Moved(order) => assert_eq!(order, vec!["b", "e", "c", "a"]),
            other => panic!("expected move, got {other:?}"),
        }
        assert_eq!(example_slot(&engine), 1);
    }

    #[test]
    fn reset_restores_authored_order() {
        let p = part(&["e", "a", "b", "c"], &["e"]);
        let mut engine = OrderingEngine::from_part(&p, None, &mut rng());
        engine.move_item(1, 3);
        let restored = engine.reset().unwrap();
        assert_eq!(restored, vec!["e", "a", "b", "c"]);
        assert_eq!(example_slot(&engine), 0);
    }

    #[test]
    fn locked_engine_rejects_move_and_reset() {
        let p = part(&["a", "b", "c"], &[]);
        let saved: Vec<String> = vec!["c", "b", "a"].into_iter().map(String::from).collect();
        let mut engine = OrderingEngine::from_part(&p, Some(&saved), &mut rng());
        engine.lock();
        assert_eq!(
            engine.move_item(0, 1),
            MoveOutcome::Rejected(MoveRejection::Locked)
        );
        assert!(engine.reset().is_none());
        assert_eq!(engine.current_order(), saved);
    }

    #[test]
    fn example_pinned_through_move_sequences() {
        let p = part(&["a", "e", "b", "c", "d"], &["e"]);
        let mut engine = OrderingEngine::from_part(&p, None, &mut rng());
        let moves = [(0, 4), (2, 0), (3, 2), (4, 0)];
        for (source, dest) in moves {
            engine.move_item(source, dest);
            assert_eq!(example_slot(&engine), 1);
        }
    }
}
