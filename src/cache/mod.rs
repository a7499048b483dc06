use crate::models::{Note, NoteId};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum QueryKey {
    /// The single shared entry holding the full note list.
    Notes,
    Note(NoteId),
}

/// Proof that a fetch for `key` was started at `generation`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FetchTicket {
    key: QueryKey,
    generation: u64,
}

/// Client-side request cache for note queries.
///
/// Each key has a generation counter. Invalidating a key bumps the generation, so
/// any response for a fetch started before the invalidation is discarded on
/// arrival. The list keeps its stale data until the refetch lands; a single note
/// is dropped. At most one fetch per key is in flight at a time.
#[derive(Clone, Debug, Default)]
pub(crate) struct QueryCache {
    notes: Option<Vec<Note>>,
    note: HashMap<NoteId, Note>,
    generations: HashMap<QueryKey, u64>,
    in_flight: HashMap<QueryKey, u64>,
}

impl QueryCache {
    pub fn notes(&self) -> Option<&Vec<Note>> {
        self.notes.as_ref()
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.note.get(&id)
    }

    pub fn has_data(&self, key: QueryKey) -> bool {
        match key {
            QueryKey::Notes => self.notes.is_some(),
            QueryKey::Note(id) => self.note.contains_key(&id),
        }
    }

    pub fn generation(&self, key: QueryKey) -> u64 {
        self.generations.get(&key).copied().unwrap_or(0)
    }

    pub fn is_fetching(&self, key: QueryKey) -> bool {
        self.in_flight.get(&key) == Some(&self.generation(key))
    }

    /// Starts a fetch unless one for the same key and generation is already running.
    pub fn begin_fetch(&mut self, key: QueryKey) -> Option<FetchTicket> {
        let generation = *self.generations.entry(key).or_insert(0);
        if self.in_flight.get(&key) == Some(&generation) {
            return None;
        }
        self.in_flight.insert(key, generation);
        Some(FetchTicket { key, generation })
    }

    fn settle(&mut self, ticket: FetchTicket) -> bool {
        let current = self.generation(ticket.key) == ticket.generation;
        if self.in_flight.get(&ticket.key) == Some(&ticket.generation) {
            self.in_flight.remove(&ticket.key);
        }
        current
    }

    /// Stores the list unless the ticket went stale. Returns whether it was stored.
    pub fn finish_notes(&mut self, ticket: FetchTicket, notes: Vec<Note>) -> bool {
        debug_assert_eq!(ticket.key, QueryKey::Notes);
        if !self.settle(ticket) {
            return false;
        }
        self.notes = Some(notes);
        true
    }

    pub fn finish_note(&mut self, ticket: FetchTicket, note: Note) -> bool {
        debug_assert_eq!(ticket.key, QueryKey::Note(note.id));
        if !self.settle(ticket) {
            return false;
        }
        self.note.insert(note.id, note);
        true
    }

    /// Releases a ticket whose fetch failed. Nothing is stored.
    pub fn abandon(&mut self, ticket: FetchTicket) {
        self.settle(ticket);
    }

    pub fn invalidate(&mut self, key: QueryKey) {
        if let QueryKey::Note(id) = key {
            self.note.remove(&id);
        }
        *self.generations.entry(key).or_insert(0) += 1;
        tracing::debug!(?key, "cache entry invalidated");
    }

    /// Drops every entry, e.g. when the user logs out.
    pub fn clear(&mut self) {
        self.notes = None;
        self.note.clear();
        self.in_flight.clear();
        for g in self.generations.values_mut() {
            *g += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: NoteId, title: &str) -> Note {
        Note {
            id,
            title: title.to_string(),
            content: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_fetch_then_finish_stores_data() {
        let mut c = QueryCache::default();
        assert!(!c.has_data(QueryKey::Notes));

        let t = c.begin_fetch(QueryKey::Notes).expect("first fetch gets a ticket");
        assert!(c.is_fetching(QueryKey::Notes));
        assert!(c.finish_notes(t, vec![note(1, "a")]));

        assert!(!c.is_fetching(QueryKey::Notes));
        assert_eq!(c.notes().map(|n| n.len()), Some(1));
    }

    #[test]
    fn test_concurrent_fetch_is_deduplicated() {
        let mut c = QueryCache::default();
        let _t = c.begin_fetch(QueryKey::Notes).unwrap();
        assert!(c.begin_fetch(QueryKey::Notes).is_none());
        // Other keys are independent.
        assert!(c.begin_fetch(QueryKey::Note(1)).is_some());
    }

    #[test]
    fn test_response_after_invalidation_is_dropped() {
        let mut c = QueryCache::default();
        let stale = c.begin_fetch(QueryKey::Notes).unwrap();
        c.invalidate(QueryKey::Notes);

        // Invalidation allows a fresh fetch right away.
        let fresh = c.begin_fetch(QueryKey::Notes).expect("new generation gets a ticket");

        assert!(!c.finish_notes(stale, vec![note(1, "old")]));
        assert!(c.notes().is_none());
        assert!(c.is_fetching(QueryKey::Notes));

        assert!(c.finish_notes(fresh, vec![note(1, "new")]));
        assert_eq!(c.notes().unwrap()[0].title, "new");
    }

    #[test]
    fn test_invalidated_list_stays_visible_until_refetch() {
        let mut c = QueryCache::default();
        let t = c.begin_fetch(QueryKey::Notes).unwrap();
        c.finish_notes(t, vec![note(1, "a"), note(2, "b")]);

        c.invalidate(QueryKey::Notes);
        assert_eq!(c.generation(QueryKey::Notes), 1);
        assert_eq!(c.notes().map(|n| n.len()), Some(2));

        let t = c.begin_fetch(QueryKey::Notes).unwrap();
        assert!(c.finish_notes(t, vec![note(1, "a")]));
        assert_eq!(c.notes().map(|n| n.len()), Some(1));
    }

    #[test]
    fn test_invalidate_drops_single_note_only() {
        let mut c = QueryCache::default();
        let t = c.begin_fetch(QueryKey::Notes).unwrap();
        c.finish_notes(t, vec![note(1, "a")]);
        let t = c.begin_fetch(QueryKey::Note(1)).unwrap();
        c.finish_note(t, note(1, "a"));

        c.invalidate(QueryKey::Note(1));
        assert!(c.note(1).is_none());
        assert!(c.notes().is_some());
        assert_eq!(c.generation(QueryKey::Note(1)), 1);
        assert_eq!(c.generation(QueryKey::Notes), 0);
    }

    #[test]
    fn test_abandon_allows_retry() {
        let mut c = QueryCache::default();
        let t = c.begin_fetch(QueryKey::Note(3)).unwrap();
        c.abandon(t);
        assert!(!c.has_data(QueryKey::Note(3)));
        assert!(c.begin_fetch(QueryKey::Note(3)).is_some());
    }

    #[test]
    fn test_clear_drops_everything_and_stales_in_flight() {
        let mut c = QueryCache::default();
        let t = c.begin_fetch(QueryKey::Notes).unwrap();
        c.finish_notes(t, vec![note(1, "a")]);
        let in_flight = c.begin_fetch(QueryKey::Note(1)).unwrap();

        c.clear();
        assert!(c.notes().is_none());
        assert!(!c.finish_note(in_flight, note(1, "a")));
        assert!(c.note(1).is_none());
    }
}
