use crate::api::{ApiClient, ApiError, ReqwestTransport, Transport};
use crate::cache::{QueryCache, QueryKey};
use crate::models::{Note, NoteId};
use crate::state::Toaster;
use leptos::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EditorMode {
    New,
    Existing(NoteId),
}

impl EditorMode {
    /// `"new"` or a numeric id. Anything else is not a note route.
    pub fn from_route(param: &str) -> Option<Self> {
        if param == "new" {
            return Some(Self::New);
        }
        param.parse::<NoteId>().ok().map(Self::Existing)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum EditorPhase {
    Loading,
    Ready,
    Saving,
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ValidationError {
    #[error("Please enter a title for your note")]
    TitleRequired,
}

pub(crate) fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        Err(ValidationError::TitleRequired)
    } else {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SaveOutcome {
    /// The page should leave the editor.
    Created(Note),
    Updated(Note),
    Invalid(ValidationError),
    Failed(ApiError),
    /// A save was already running; nothing was sent.
    Busy,
}

/// One editing session of a single note.
///
/// `Loading -> Ready` for an existing note, `Ready` straight away for a new one.
/// Saving goes through `Saving` and back to `Ready`; a successful create ends the
/// session (the page navigates away).
#[derive(Clone)]
pub(crate) struct EditorController<T: Transport = ReqwestTransport> {
    client: ApiClient<T>,
    cache: RwSignal<QueryCache>,
    toaster: Toaster,
    mode: EditorMode,

    pub title: RwSignal<String>,
    pub content: RwSignal<String>,
    pub phase: RwSignal<EditorPhase>,
}

impl<T: Transport> EditorController<T> {
    pub fn new(
        client: ApiClient<T>,
        cache: RwSignal<QueryCache>,
        toaster: Toaster,
        mode: EditorMode,
    ) -> Self {
        let phase = match mode {
            EditorMode::New => EditorPhase::Ready,
            EditorMode::Existing(_) => EditorPhase::Loading,
        };
        Self {
            client,
            cache,
            toaster,
            mode,
            title: RwSignal::new(String::new()),
            content: RwSignal::new(String::new()),
            phase: RwSignal::new(phase),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_saving(&self) -> bool {
        self.phase.with(|p| *p == EditorPhase::Saving)
    }

    fn seed(&self, note: &Note) {
        self.title.set(note.title.clone());
        self.content.set(note.content.clone());
    }

    /// Seeds the buffers from a cached copy while still loading. Returns whether it did.
    pub fn seed_from_cache(&self) -> bool {
        let EditorMode::Existing(id) = self.mode else {
            return false;
        };
        if self.phase.get_untracked() != EditorPhase::Loading {
            return false;
        }
        let Some(note) = self.cache.with_untracked(|c| c.note(id).cloned()) else {
            return false;
        };
        self.seed(&note);
        self.phase.set(EditorPhase::Ready);
        true
    }

    pub async fn load(&self) {
        let EditorMode::Existing(id) = self.mode else {
            return;
        };
        if self.seed_from_cache() {
            return;
        }
        self.fetch_note(id).await;
    }

    async fn fetch_note(&self, id: NoteId) {
        let Some(ticket) = self
            .cache
            .try_update(|c| c.begin_fetch(QueryKey::Note(id)))
            .flatten()
        else {
            // Another fetch for this note is running; `seed_from_cache` picks up its result.
            return;
        };

        match self.client.get_note(id).await {
            Ok(note) => {
                let stored = self
                    .cache
                    .try_update(|c| c.finish_note(ticket, note.clone()))
                    .unwrap_or(false);
                if stored {
                    self.seed(&note);
                    if self.phase.get_untracked() == EditorPhase::Loading {
                        self.phase.set(EditorPhase::Ready);
                    }
                }
            }
            Err(e) => {
                self.cache.update(|c| c.abandon(ticket));
                if self.phase.get_untracked() == EditorPhase::Loading {
                    self.phase.set(EditorPhase::Failed(e.message));
                }
            }
        }
    }

    pub async fn save(&self) -> SaveOutcome {
        if self.phase.get_untracked() == EditorPhase::Saving {
            return SaveOutcome::Busy;
        }

        let title = self.title.get_untracked();
        let content = self.content.get_untracked();
        if let Err(e) = validate_title(&title) {
            self.toaster.error("Title required", &e.to_string());
            return SaveOutcome::Invalid(e);
        }

        self.phase.set(EditorPhase::Saving);
        match self.mode {
            EditorMode::New => {
                let result = self.client.create_note(&title, &content).await;
                self.phase.set(EditorPhase::Ready);
                match result {
                    Ok(note) => {
                        self.cache.update(|c| c.invalidate(QueryKey::Notes));
                        self.toaster
                            .success("Note created", "Your note has been created successfully");
                        SaveOutcome::Created(note)
                    }
                    Err(e) => {
                        self.toaster.error("Error", "Failed to create note");
                        SaveOutcome::Failed(e)
                    }
                }
            }
            EditorMode::Existing(id) => {
                let result = self.client.update_note(id, &title, &content).await;
                self.phase.set(EditorPhase::Ready);
                match result {
                    Ok(note) => {
                        self.cache.update(|c| {
                            c.invalidate(QueryKey::Notes);
                            c.invalidate(QueryKey::Note(id));
                        });
                        self.toaster.success("Note saved", "Your changes have been saved");
                        self.fetch_note(id).await;
                        SaveOutcome::Updated(note)
                    }
                    Err(e) => {
                        self.toaster.error("Error", "Failed to save note");
                        SaveOutcome::Failed(e)
                    }
                }
            }
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::api::FakeTransport;
    use crate::session::SessionStore;
    use crate::storage::MemoryStorage;
    use reqwest::Method;
    use std::sync::Arc;

    fn note_json(id: NoteId, title: &str, content: &str) -> String {
        serde_json::json!({
            "id": id,
            "title": title,
            "content": content,
            "created_at": "2024-01-01 00:00:00",
            "updated_at": "2024-01-02 00:00:00",
        })
        .to_string()
    }

    fn controller(mode: EditorMode) -> (EditorController<FakeTransport>, FakeTransport) {
        let transport = FakeTransport::default();
        let session = SessionStore::new(Arc::new(MemoryStorage::default()));
        session.set_session("abc123", "alice");
        let client = ApiClient::with_transport("http://localhost:3000/api", session, transport.clone());
        let ctrl = EditorController::new(
            client,
            RwSignal::new(QueryCache::default()),
            Toaster::new(),
            mode,
        );
        (ctrl, transport)
    }

    #[test]
    fn test_mode_from_route() {
        assert_eq!(EditorMode::from_route("new"), Some(EditorMode::New));
        assert_eq!(EditorMode::from_route("42"), Some(EditorMode::Existing(42)));
        assert_eq!(EditorMode::from_route("abc"), None);
        assert_eq!(EditorMode::from_route(""), None);
    }

    #[test]
    fn test_initial_phase_depends_on_mode() {
        let (c, _) = controller(EditorMode::New);
        assert_eq!(c.phase.get_untracked(), EditorPhase::Ready);
        let (c, _) = controller(EditorMode::Existing(1));
        assert_eq!(c.phase.get_untracked(), EditorPhase::Loading);
    }

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title(""), Err(ValidationError::TitleRequired));
        assert_eq!(validate_title("  \t\n"), Err(ValidationError::TitleRequired));
        assert_eq!(validate_title(" x "), Ok(()));
    }

    #[tokio::test]
    async fn test_blank_title_never_hits_the_network() {
        for mode in [EditorMode::New, EditorMode::Existing(1)] {
            let (c, t) = controller(mode);
            c.phase.set(EditorPhase::Ready);
            c.title.set("   ".to_string());
            c.content.set("body".to_string());

            let outcome = c.save().await;
            assert_eq!(outcome, SaveOutcome::Invalid(ValidationError::TitleRequired));
            assert!(t.requests().is_empty());

            let toast = c.toaster.snapshot().pop().unwrap();
            assert_eq!(toast.title, "Title required");
            assert_eq!(toast.description, "Please enter a title for your note");
        }
    }

    #[tokio::test]
    async fn test_load_seeds_buffers() {
        let (c, t) = controller(EditorMode::Existing(7));
        t.respond(200, &note_json(7, "Title", "Body"));

        c.load().await;
        assert_eq!(c.phase.get_untracked(), EditorPhase::Ready);
        assert_eq!(c.title.get_untracked(), "Title");
        assert_eq!(c.content.get_untracked(), "Body");
        assert_eq!(t.last_request().url, "http://localhost:3000/api/notes/7");
    }

    #[tokio::test]
    async fn test_load_uses_cached_note() {
        let (c, t) = controller(EditorMode::Existing(7));
        c.cache.update(|cache| {
            let ticket = cache.begin_fetch(QueryKey::Note(7)).unwrap();
            cache.finish_note(ticket, serde_json::from_str(&note_json(7, "Cached", "")).unwrap());
        });

        c.load().await;
        assert_eq!(c.title.get_untracked(), "Cached");
        assert!(t.requests().is_empty());
    }

    #[tokio::test]
    async fn test_load_failure_moves_to_failed() {
        let (c, t) = controller(EditorMode::Existing(7));
        t.respond(404, r#"{"error": "Note not found"}"#);

        c.load().await;
        assert_eq!(
            c.phase.get_untracked(),
            EditorPhase::Failed("Failed to fetch note".to_string())
        );
    }

    #[tokio::test]
    async fn test_create_invalidates_list_and_asks_to_leave() {
        let (c, t) = controller(EditorMode::New);
        t.respond(201, &note_json(9, "Fresh", "thoughts"));
        c.title.set("Fresh".to_string());
        c.content.set("thoughts".to_string());

        let outcome = c.save().await;
        let SaveOutcome::Created(note) = &outcome else {
            panic!("expected Created, got {outcome:?}");
        };
        assert_eq!(note.id, 9);
        assert_eq!(c.cache.with_untracked(|x| x.generation(QueryKey::Notes)), 1);
        assert_eq!(c.phase.get_untracked(), EditorPhase::Ready);
        assert_eq!(c.toaster.snapshot().pop().unwrap().title, "Note created");

        let req = t.last_request();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.header("Authorization"), Some("Bearer abc123"));
    }

    #[tokio::test]
    async fn test_create_failure_stays_on_page() {
        let (c, t) = controller(EditorMode::New);
        t.respond(500, "");
        c.title.set("Fresh".to_string());

        assert!(matches!(c.save().await, SaveOutcome::Failed(_)));
        assert_eq!(c.phase.get_untracked(), EditorPhase::Ready);
        assert_eq!(c.toaster.snapshot().pop().unwrap().description, "Failed to create note");
    }

    #[tokio::test]
    async fn test_update_invalidates_both_entries_and_reseeds() {
        let (c, t) = controller(EditorMode::Existing(7));
        t.respond(200, &note_json(7, "Old", "old body"))
            .respond(200, &note_json(7, "New", "new body"))
            .respond(200, &note_json(7, "New", "new body"));
        c.load().await;

        c.title.set("New".to_string());
        c.content.set("new body".to_string());
        let outcome = c.save().await;
        assert!(matches!(outcome, SaveOutcome::Updated(ref n) if n.title == "New"));

        let cache = c.cache.get_untracked();
        assert_eq!(cache.generation(QueryKey::Notes), 1);
        assert_eq!(cache.generation(QueryKey::Note(7)), 1);
        assert_eq!(cache.note(7).map(|n| n.title.as_str()), Some("New"));

        let methods: Vec<_> = t.requests().into_iter().map(|r| r.method).collect();
        assert_eq!(methods, vec![Method::GET, Method::PUT, Method::GET]);
        assert_eq!(c.title.get_untracked(), "New");
        assert_eq!(c.toaster.snapshot().pop().unwrap().title, "Note saved");
    }

    #[tokio::test]
    async fn test_update_failure_keeps_buffers() {
        let (c, t) = controller(EditorMode::Existing(7));
        t.respond(200, &note_json(7, "Old", "")).respond(500, "");
        c.load().await;
        c.title.set("Edited".to_string());

        assert!(matches!(c.save().await, SaveOutcome::Failed(_)));
        assert_eq!(c.title.get_untracked(), "Edited");
        assert_eq!(c.toaster.snapshot().pop().unwrap().description, "Failed to save note");
    }

    #[tokio::test]
    async fn test_save_while_saving_is_busy() {
        let (c, t) = controller(EditorMode::New);
        c.title.set("x".to_string());
        c.phase.set(EditorPhase::Saving);

        assert_eq!(c.save().await, SaveOutcome::Busy);
        assert!(t.requests().is_empty());
    }
}
