use crate::api::{ApiClient, ReqwestTransport, Transport};
use crate::auth::AuthContext;
use crate::cache::{QueryCache, QueryKey};
use crate::models::{Note, NoteId};
use crate::state::Toaster;
use leptos::prelude::*;

/// Case-insensitive substring match over title or content, in list order.
///
/// An empty query keeps every note. The query is used as typed (not trimmed).
pub(crate) fn filter_notes(notes: &[Note], query: &str) -> Vec<Note> {
    let q = query.to_lowercase();
    if q.is_empty() {
        return notes.to_vec();
    }
    notes
        .iter()
        .filter(|n| n.title.to_lowercase().contains(&q) || n.content.to_lowercase().contains(&q))
        .cloned()
        .collect()
}

/// What the dashboard shows when no card matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EmptyNotes {
    pub title: &'static str,
    pub hint: &'static str,
    pub offer_create: bool,
}

const NO_MATCHES: EmptyNotes = EmptyNotes {
    title: "No notes found",
    hint: "Try a different search term",
    offer_create: false,
};

const NO_NOTES: EmptyNotes = EmptyNotes {
    title: "No notes yet",
    hint: "Create your first note to get started",
    offer_create: true,
};

/// Dashboard state: the shared notes list, the search box and the delete confirmation.
#[derive(Clone)]
pub(crate) struct DashboardController<T: Transport = ReqwestTransport> {
    client: ApiClient<T>,
    cache: RwSignal<QueryCache>,
    toaster: Toaster,

    pub search_query: RwSignal<String>,

    /// Note awaiting delete confirmation. `Some` keeps the dialog open.
    pub pending_delete: RwSignal<Option<NoteId>>,
    pub deleting: RwSignal<bool>,

    pub load_error: RwSignal<Option<String>>,
}

impl<T: Transport> DashboardController<T> {
    pub fn new(client: ApiClient<T>, cache: RwSignal<QueryCache>, toaster: Toaster) -> Self {
        Self {
            client,
            cache,
            toaster,
            search_query: RwSignal::new(String::new()),
            pending_delete: RwSignal::new(None),
            deleting: RwSignal::new(false),
            load_error: RwSignal::new(None),
        }
    }

    /// Changes whenever the notes entry is invalidated. Views refetch on change.
    pub fn notes_generation(&self) -> u64 {
        self.cache.with(|c| c.generation(QueryKey::Notes))
    }

    pub fn notes(&self) -> Vec<Note> {
        self.cache.with(|c| c.notes().cloned().unwrap_or_default())
    }

    pub fn filtered_notes(&self) -> Vec<Note> {
        let query = self.search_query.get();
        self.cache
            .with(|c| filter_notes(c.notes().map(|v| v.as_slice()).unwrap_or_default(), &query))
    }

    /// `None` while any card is visible. Otherwise the copy depends only on
    /// whether a search query is entered.
    pub fn empty_state(&self) -> Option<EmptyNotes> {
        if !self.filtered_notes().is_empty() {
            return None;
        }
        if self.search_query.with(|q| q.is_empty()) {
            Some(NO_NOTES)
        } else {
            Some(NO_MATCHES)
        }
    }

    /// True until the first list arrives (or fails).
    pub fn is_loading(&self) -> bool {
        let has_data = self.cache.with(|c| c.has_data(QueryKey::Notes));
        !has_data && self.load_error.with(|e| e.is_none())
    }

    /// Fetches the list into the shared entry. Cached data stays visible meanwhile.
    pub async fn load_notes(&self) {
        let Some(ticket) = self
            .cache
            .try_update(|c| c.begin_fetch(QueryKey::Notes))
            .flatten()
        else {
            return;
        };

        self.load_error.set(None);
        match self.client.get_notes().await {
            Ok(notes) => {
                tracing::debug!(count = notes.len(), "notes loaded");
                self.cache.update(|c| {
                    c.finish_notes(ticket, notes);
                });
            }
            Err(e) => {
                self.cache.update(|c| c.abandon(ticket));
                self.load_error.set(Some(e.message));
            }
        }
    }

    pub fn request_delete(&self, id: NoteId) {
        self.pending_delete.set(Some(id));
    }

    pub fn cancel_delete(&self) {
        if self.deleting.get_untracked() {
            return;
        }
        self.pending_delete.set(None);
    }

    /// Deletes the pending note. The pending id is cleared only on success, so a
    /// failed delete leaves the confirmation open for retry or cancel.
    pub async fn confirm_delete(&self) -> bool {
        if self.deleting.get_untracked() {
            return false;
        }
        let Some(id) = self.pending_delete.get_untracked() else {
            return false;
        };

        self.deleting.set(true);
        let result = self.client.delete_note(id).await;
        self.deleting.set(false);

        match result {
            Ok(()) => {
                self.cache.update(|c| {
                    c.invalidate(QueryKey::Notes);
                    c.invalidate(QueryKey::Note(id));
                });
                self.toaster
                    .success("Note deleted", "Your note has been deleted successfully");
                self.pending_delete.set(None);
                true
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "delete failed");
                self.toaster.error("Error", "Failed to delete note");
                false
            }
        }
    }

    /// Ends the session and forgets every cached note.
    pub fn logout(&self, auth: &AuthContext<T>) {
        auth.logout();
        self.cache.update(|c| c.clear());
        self.toaster
            .success("Logged out", "You have been logged out successfully");
    }
}
