//! Word/Meaning repository view
//!
//! Read-only projection combining a lecture's words with their meaning lists,
//! keyed by word id. Meanings keep insertion order (by `meaning_added_at`,
//! ties in arrival order) so the first one is the primary meaning.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{Meaning, MissCount, Word, WordId};

/// Meaning lists grouped by word id
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MeaningBook {
    by_word: HashMap<WordId, Vec<String>>,
}

impl MeaningBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups meaning rows by word, stably sorted by `added_at`. Rows without a
    /// timestamp sort first and keep their arrival order.
    pub fn from_rows(mut rows: Vec<Meaning>) -> Self {
        rows.sort_by_key(|m| m.added_at);
        let mut by_word: HashMap<WordId, Vec<String>> = HashMap::new();
        for row in rows {
            by_word.entry(row.word_id).or_default().push(row.meaning);
        }
        Self { by_word }
    }

    pub fn insert(&mut self, word_id: impl Into<WordId>, meanings: Vec<String>) {
        self.by_word.insert(word_id.into(), meanings);
    }

    pub fn remove(&mut self, word_id: &str) {
        self.by_word.remove(word_id);
    }

    /// All meanings for a word, empty when none were recorded
    pub fn meanings(&self, word_id: &str) -> &[String] {
        self.by_word.get(word_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first meaning, used for display and hints
    pub fn primary(&self, word_id: &str) -> Option<&str> {
        self.meanings(word_id).first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_word.is_empty()
    }
}

/// One row of a lecture listing
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry<'a> {
    pub word: &'a Word,
    pub meanings: &'a [String],
}

/// A lecture's words in display order together with their meanings
#[derive(Clone, Debug, Default)]
pub struct LectureView {
    words: Vec<Word>,
    meanings: MeaningBook,
}

impl LectureView {
    pub fn new(mut words: Vec<Word>, meanings: MeaningBook) -> Self {
        words.sort_by_key(|w| w.order_in_lecture);
        Self { words, meanings }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn meanings(&self) -> &MeaningBook {
        &self.meanings
    }

    pub fn get(&self, word_id: &str) -> Option<WordEntry<'_>> {
        self.words.iter().find(|w| w.id == word_id).map(|word| WordEntry {
            word,
            meanings: self.meanings.meanings(&word.id),
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = WordEntry<'_>> {
        self.words.iter().map(move |word| WordEntry {
            word,
            meanings: self.meanings.meanings(&word.id),
        })
    }

    pub fn into_parts(self) -> (Vec<Word>, MeaningBook) {
        (self.words, self.meanings)
    }
}

/// Counts miss notes per word and returns the `limit` most missed words.
///
/// Ties are broken by word id so the listing is stable. Notes for words not in
/// `words` are ignored.
pub fn top_missed(note_word_ids: &[WordId], words: &[Word], limit: usize) -> Vec<MissCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for id in note_word_ids {
        *counts.entry(id.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<MissCount> = counts
        .into_iter()
        .filter_map(|(id, count)| {
            words.iter().find(|w| w.id == id).map(|w| MissCount {
                word_id: w.id.clone(),
                text: w.text.clone(),
                count,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word_id.cmp(&b.word_id)));
    ranked.truncate(limit);
    ranked
}
