use leptos::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Toast {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

/// Transient user notifications, newest last.
#[derive(Clone, Copy)]
pub(crate) struct Toaster {
    toasts: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u64>,
}

impl Toaster {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(vec![]),
            next_id: RwSignal::new(1),
        }
    }

    pub fn push(&self, title: &str, description: &str, variant: ToastVariant) -> u64 {
        let id = self.next_id.get_untracked();
        self.next_id.set(id.saturating_add(1));
        self.toasts.update(|ts| {
            ts.push(Toast {
                id,
                title: title.to_string(),
                description: description.to_string(),
                variant,
            })
        });
        id
    }

    pub fn success(&self, title: &str, description: &str) -> u64 {
        self.push(title, description, ToastVariant::Default)
    }

    pub fn error(&self, title: &str, description: &str) -> u64 {
        self.push(title, description, ToastVariant::Destructive)
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|ts| ts.retain(|t| t.id != id));
    }

    /// Tracked read for views.
    pub fn list(&self) -> Vec<Toast> {
        self.toasts.get()
    }

    pub fn snapshot(&self) -> Vec<Toast> {
        self.toasts.get_untracked()
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}
