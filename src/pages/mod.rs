mod dashboard;
mod login;
mod note_editor;
mod register;

pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use note_editor::NoteEditorPage;
pub use register::RegisterPage;

use crate::auth::use_auth;
use leptos::prelude::*;
use leptos_router::components::Redirect;

/// Shows the login page in place of `children` while logged out.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let is_authenticated = move || auth.is_authenticated();

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=is_authenticated fallback=move || view! { <LoginPage /> }>
            {move || children.with_value(|c| c())}
        </Show>
    }
}

#[component]
pub fn RootRedirect() -> impl IntoView {
    let auth = use_auth();

    move || {
        if auth.is_authenticated() {
            view! { <Redirect path="/dashboard" /> }.into_any()
        } else {
            view! { <Redirect path="/login" /> }.into_any()
        }
    }
}
