//! Reorder Controller
//!
//! Drag-and-drop reordering of a lecture's word list:
//! - reordering requires edit rights and an empty text filter
//! - a drag keeps a preview permutation for display only
//! - a drop moves the item within the authoritative order, compacts positions
//!   to `0..N-1` and yields the full id list to persist
//! - changes are staged against a snapshot; what happens to the local order
//!   when persistence fails is decided by [`PersistFailurePolicy`]

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sanitize::matches_filter;
use crate::types::{Word, WordId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("reordering requires edit rights on the course")]
    Forbidden,
    #[error("clear the search filter before reordering")]
    FilterActive,
    #[error("word {0} is not in this lecture")]
    UnknownWord(WordId),
    #[error("source and target are the same word")]
    SameTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Thứ tự phải là số không âm")]
    InvalidOrder(String),
}

/// Permission check shared by drag start and drop
#[derive(Clone, Copy, Debug)]
pub struct ReorderGate<'a> {
    pub can_edit: bool,
    pub filter_query: &'a str,
}

impl<'a> ReorderGate<'a> {
    pub fn new(can_edit: bool, filter_query: &'a str) -> Self {
        Self {
            can_edit,
            filter_query,
        }
    }

    pub fn check(&self) -> Result<(), ReorderError> {
        if !self.can_edit {
            return Err(ReorderError::Forbidden);
        }
        if !self.filter_query.trim().is_empty() {
            return Err(ReorderError::FilterActive);
        }
        Ok(())
    }
}

/// What to do with the local order when persisting it fails
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersistFailurePolicy {
    /// Keep showing the new order and report the error
    #[default]
    KeepOptimistic,
    /// Restore the order from before the change
    RollBack,
}

// ==================== Ordering helpers ====================

/// Copy of `words` sorted by `order_in_lecture` (stable)
pub fn sorted_by_order(words: &[Word]) -> Vec<Word> {
    let mut sorted = words.to_vec();
    sorted.sort_by_key(|w| w.order_in_lecture);
    sorted
}

/// Reassigns positions to the array index
pub fn compact(words: &mut [Word]) {
    for (i, word) in words.iter_mut().enumerate() {
        word.order_in_lecture = i as u32;
    }
}

pub fn ordered_ids(words: &[Word]) -> Vec<WordId> {
    words.iter().map(|w| w.id.clone()).collect()
}

/// Moves `from_id` to the position currently held by `to_id` and compacts.
pub fn move_item(words: &[Word], from_id: &str, to_id: &str) -> Result<Vec<Word>, ReorderError> {
    if from_id == to_id {
        return Err(ReorderError::SameTarget);
    }
    let mut current = sorted_by_order(words);
    let from = position(&current, from_id)?;
    let to = position(&current, to_id)?;
    let item = current.remove(from);
    current.insert(to, item);
    compact(&mut current);
    Ok(current)
}

/// Removes a word, keeps the others in their existing order and compacts.
pub fn remove_and_compact(words: &[Word], word_id: &str) -> Result<Vec<Word>, ReorderError> {
    let mut remaining = sorted_by_order(words);
    let idx = position(&remaining, word_id)?;
    remaining.remove(idx);
    compact(&mut remaining);
    Ok(remaining)
}

/// Position for a newly appended word: max + 1, or 0 for an empty lecture
pub fn next_order(words: &[Word]) -> u32 {
    words
        .iter()
        .map(|w| w.order_in_lecture)
        .max()
        .map_or(0, |max| max + 1)
}

/// Parses the order field of the word form. Blank input falls back to `next`.
pub fn parse_order_index(input: &str, next: u32) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(next);
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidOrder(trimmed.to_string()))
}

/// Words matching the search box, in display order
pub fn filter_words<'a>(words: &'a [Word], query: &str) -> Vec<&'a Word> {
    let mut matched: Vec<&Word> = words
        .iter()
        .filter(|w| matches_filter(query, &w.text, w.ipa.as_deref()))
        .collect();
    matched.sort_by_key(|w| w.order_in_lecture);
    matched
}

fn position(words: &[Word], id: &str) -> Result<usize, ReorderError> {
    words
        .iter()
        .position(|w| w.id == id)
        .ok_or_else(|| ReorderError::UnknownWord(id.to_string()))
}

// ==================== Drag preview ====================

/// Transient state of one drag gesture
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DragPreview {
    dragging: Option<WordId>,
    over: Option<WordId>,
}

impl DragPreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, gate: &ReorderGate<'_>, word_id: &str) -> Result<(), ReorderError> {
        gate.check()?;
        self.dragging = Some(word_id.to_string());
        self.over = None;
        Ok(())
    }

    /// Pointer moved over `word_id`. Hovering the dragged card itself keeps
    /// the previous target.
    pub fn hover(&mut self, word_id: &str) {
        match &self.dragging {
            Some(dragging) if dragging != word_id => self.over = Some(word_id.to_string()),
            _ => {}
        }
    }

    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.over.as_deref()
    }

    /// Display order while dragging; positions are left untouched
    pub fn preview(&self, ordered: &[Word]) -> Vec<Word> {
        let (Some(dragging), Some(over)) = (&self.dragging, &self.over) else {
            return ordered.to_vec();
        };
        let from = ordered.iter().position(|w| &w.id == dragging);
        let to = ordered.iter().position(|w| &w.id == over);
        match (from, to) {
            (Some(from), Some(to)) => {
                let mut arr = ordered.to_vec();
                let item = arr.remove(from);
                arr.insert(to, item);
                arr
            }
            _ => ordered.to_vec(),
        }
    }

    /// Resolves the drop target: the card dropped on, unless that is the
    /// dragged card, in which case the last hovered card.
    pub fn drop_target(&self, dropped_on: &str) -> Option<(WordId, WordId)> {
        let dragging = self.dragging.as_ref()?;
        let target = if dropped_on != dragging {
            dropped_on.to_string()
        } else {
            self.over.clone().filter(|o| o != dragging)?
        };
        Some((dragging.clone(), target))
    }

    pub fn end(&mut self) {
        self.dragging = None;
        self.over = None;
    }
}

// ==================== Staged persistence ====================

/// A reorder or delete applied to a shadow copy, pending persistence
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedOrder {
    snapshot: Vec<Word>,
    staged: Vec<Word>,
}

impl StagedOrder {
    pub fn new(snapshot: Vec<Word>, staged: Vec<Word>) -> Self {
        Self { snapshot, staged }
    }

    /// Stages a drop of `from_id` onto `to_id`
    pub fn stage_move(
        gate: &ReorderGate<'_>,
        words: &[Word],
        from_id: &str,
        to_id: &str,
    ) -> Result<Self, ReorderError> {
        gate.check()?;
        let staged = move_item(words, from_id, to_id)?;
        Ok(Self::new(words.to_vec(), staged))
    }

    /// Stages the deletion of `word_id`
    pub fn stage_delete(words: &[Word], word_id: &str) -> Result<Self, ReorderError> {
        let staged = remove_and_compact(words, word_id)?;
        Ok(Self::new(words.to_vec(), staged))
    }

    pub fn staged(&self) -> &[Word] {
        &self.staged
    }

    pub fn snapshot(&self) -> &[Word] {
        &self.snapshot
    }

    /// Ids to hand to the persist call, in new order
    pub fn ids(&self) -> Vec<WordId> {
        ordered_ids(&self.staged)
    }

    pub fn commit(self) -> Vec<Word> {
        self.staged
    }

    pub fn rollback(self) -> Vec<Word> {
        self.snapshot
    }

    /// The authoritative order after the persist call returned
    pub fn settle(self, persisted: bool, policy: PersistFailurePolicy) -> Vec<Word> {
        if persisted || policy == PersistFailurePolicy::KeepOptimistic {
            self.commit()
        } else {
            self.rollback()
        }
    }
}
