use crate::auth::AuthProvider;
use crate::components::toasts::Toasts;
use crate::config::EnvConfig;
use crate::pages::{
    DashboardPage, LoginPage, NoteEditorPage, RegisterPage, RequireAuth, RootRedirect,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub(crate) fn App(config: EnvConfig) -> impl IntoView {
    provide_context(AppContext(AppState::new(&config)));

    // Router hooks need the <Router> context; auth needs AppContext above it.
    view! {
        <AuthProvider>
            <Router>
                <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                    <Route path=path!("login") view=LoginPage />
                    <Route path=path!("register") view=RegisterPage />
                    <Route path=path!("dashboard") view=move || view! {
                        <RequireAuth>
                            <DashboardPage />
                        </RequireAuth>
                    } />
                    <Route path=path!("notes/:id") view=move || view! {
                        <RequireAuth>
                            <NoteEditorPage />
                        </RequireAuth>
                    } />
                    <Route path=path!("") view=RootRedirect />
                </Routes>
            </Router>
            <Toasts />
        </AuthProvider>
    }
}
