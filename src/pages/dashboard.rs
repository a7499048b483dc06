use crate::auth::use_auth;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardGrid, CardHeader,
    CardTitle, ErrorAlert, Input, PageSpinner, Spinner,
};
use crate::models::{Note, NoteId};
use crate::api::Transport;
use crate::state::dashboard::{DashboardController, EmptyNotes};
use crate::state::AppContext;
use crate::util::format_date;
use icons::{FileText, LogOut, Pencil, Plus, Search, Trash2};
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use leptos_router::hooks::use_navigate;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let auth = use_auth();
    let navigate = StoredValue::new(use_navigate());

    let ctrl = StoredValue::new(DashboardController::new(
        app.api_client.clone(),
        app.cache,
        app.toaster,
    ));

    // Refetch whenever the list is invalidated (and once on mount). Watching the
    // generation rather than the data keeps a failed load from retrying forever.
    let generation = Memo::new(move |_| ctrl.with_value(|c| c.notes_generation()));
    let session_auth = auth.clone();
    Effect::new(move |_| {
        generation.track();
        // Logging out bumps the generation too; don't refetch without a session.
        if !session_auth.state_untracked().is_authenticated {
            return;
        }
        let c = ctrl.get_value();
        spawn_local(async move { c.load_notes().await });
    });

    let key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        close_on_escape(ctrl, &ev.key());
    });
    on_cleanup(move || key_handle.remove());

    let username = {
        let auth = auth.clone();
        move || auth.username().unwrap_or_default()
    };

    let on_logout = move |_| {
        ctrl.with_value(|c| c.logout(&auth));
        navigate.with_value(|nav| nav("/login", Default::default()));
    };

    let on_new_note = move |_| {
        navigate.with_value(|nav| nav("/notes/new", Default::default()));
    };

    let on_confirm_delete = move |_| {
        let c = ctrl.get_value();
        spawn_local(async move {
            c.confirm_delete().await;
        });
    };

    let search_query = ctrl.with_value(|c| c.search_query);
    let pending_delete = ctrl.with_value(|c| c.pending_delete);
    let deleting = ctrl.with_value(|c| c.deleting);
    let load_error = ctrl.with_value(|c| c.load_error);

    view! {
        <div class="min-h-screen bg-background">
            <header class="border-b border-border">
                <div class="mx-auto flex w-full max-w-5xl items-center justify-between px-4 py-3">
                    <div class="flex flex-col">
                        <h1 class="text-lg font-semibold">"My Notes"</h1>
                        <span class="text-xs text-muted-foreground">
                            "Welcome, " {username}
                        </span>
                    </div>
                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=on_logout>
                        <LogOut />
                        "Logout"
                    </Button>
                </div>
            </header>

            <main class="mx-auto w-full max-w-5xl px-4 py-6">
                <div class="mb-6 flex items-center gap-3">
                    <div class="relative flex-1">
                        <span class="pointer-events-none absolute left-2.5 top-1/2 -translate-y-1/2 text-muted-foreground [&_svg]:size-4">
                            <Search />
                        </span>
                        <Input
                            placeholder="Search notes..."
                            bind_value=search_query
                            class="h-9 pl-8 text-sm"
                        />
                    </div>
                    <Button size=ButtonSize::Sm on:click=on_new_note>
                        <Plus />
                        "New Note"
                    </Button>
                </div>

                <ErrorAlert message=load_error />

                <Show
                    when=move || !ctrl.with_value(|c| c.is_loading())
                    fallback=|| view! { <PageSpinner /> }
                >
                    {move || {
                        if let Some(empty) = ctrl.with_value(|c| c.empty_state()) {
                            return view! {
                                <EmptyState
                                    empty=empty
                                    on_create=Callback::new(move |_: ()| {
                                        navigate.with_value(|nav| nav("/notes/new", Default::default()))
                                    })
                                />
                            }
                            .into_any();
                        }

                        let notes = ctrl.with_value(|c| c.filtered_notes());
                        view! {
                            <CardGrid>
                                {notes
                                    .into_iter()
                                    .map(|note| {
                                        view! {
                                            <NoteCard
                                                note=note
                                                on_delete=Callback::new(move |id| {
                                                    ctrl.with_value(|c| c.request_delete(id))
                                                })
                                            />
                                        }
                                    })
                                    .collect_view()}
                            </CardGrid>
                        }
                        .into_any()
                    }}
                </Show>
            </main>

            <Show when=move || pending_delete.get().is_some() fallback=|| ().into_view()>
                <div
                    class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4"
                    on:click=move |_| ctrl.with_value(|c| c.cancel_delete())
                >
                    <div
                        class="w-full max-w-sm rounded-md border border-border bg-background p-4 shadow-lg"
                        on:click=|ev| ev.stop_propagation()
                    >
                        <div class="mb-3 space-y-1">
                            <div class="text-sm font-medium">"Delete note?"</div>
                            <div class="text-xs text-muted-foreground">
                                "This action cannot be undone. The note will be permanently deleted."
                            </div>
                        </div>

                        <div class="flex items-center justify-end gap-2 pt-2">
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                attr:disabled=move || deleting.get()
                                on:click=move |_| ctrl.with_value(|c| c.cancel_delete())
                            >
                                "Cancel"
                            </Button>
                            <Button
                                variant=ButtonVariant::Destructive
                                size=ButtonSize::Sm
                                attr:disabled=move || deleting.get()
                                on:click=on_confirm_delete
                            >
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || deleting.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if deleting.get() { "Deleting..." } else { "Delete" }}
                                </span>
                            </Button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}

/// Esc closes the delete confirmation. Ignored once the page has been disposed.
fn close_on_escape<T: Transport + Send + Sync + 'static>(
    ctrl: StoredValue<DashboardController<T>>,
    key: &str,
) {
    if key == "Escape" {
        let _ = ctrl.try_with_value(|c| c.cancel_delete());
    }
}

#[component]
fn EmptyState(empty: EmptyNotes, on_create: Callback<()>) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center gap-2 py-16 text-center">
            <span class="text-muted-foreground [&_svg]:size-10">
                <FileText />
            </span>
            <div class="text-sm font-medium">{empty.title}</div>
            <div class="text-xs text-muted-foreground">{empty.hint}</div>
            <Show when=move || empty.offer_create fallback=|| ().into_view()>
                <Button size=ButtonSize::Sm class="mt-2" on:click=move |_| on_create.run(())>
                    <Plus />
                    "Create Note"
                </Button>
            </Show>
        </div>
    }
}

#[component]
fn NoteCard(note: Note, on_delete: Callback<NoteId>) -> impl IntoView {
    let navigate = use_navigate();
    let id = note.id;
    let href = format!("/notes/{id}");
    let preview = if note.content.is_empty() {
        "No content".to_string()
    } else {
        note.content.clone()
    };

    view! {
        <Card class="gap-3 py-4">
            <CardHeader class="px-4">
                <CardTitle class="text-base line-clamp-1">{note.title.clone()}</CardTitle>
                <CardDescription class="text-xs">{format_date(&note.updated_at)}</CardDescription>
            </CardHeader>
            <CardContent class="px-4">
                <p class="line-clamp-3 whitespace-pre-wrap text-sm text-muted-foreground">{preview}</p>
                <div class="mt-4 flex items-center gap-2">
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        on:click=move |_| navigate(&href, Default::default())
                    >
                        <Pencil />
                        "Edit"
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        class="text-destructive"
                        on:click=move |_| on_delete.run(id)
                    >
                        <Trash2 />
                        "Delete"
                    </Button>
                </div>
            </CardContent>
        </Card>
    }
}
