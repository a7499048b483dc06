use crate::components::ui::{
    Alert, AlertDescription, AlertTitle, Button, ButtonSize, ButtonVariant, Card, CardContent,
    Input, Label, PageSpinner, Spinner, Textarea,
};
use crate::state::editor::{EditorController, EditorMode, EditorPhase, SaveOutcome};
use crate::state::AppContext;
use icons::{ArrowLeft, Save};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params_map};

/// `/notes/:id` where `id` is `new` or a numeric note id.
#[component]
pub fn NoteEditorPage() -> impl IntoView {
    let params = use_params_map();

    // Rebuild the editor when the route param changes.
    move || {
        let raw = params.with(|p| p.get("id").unwrap_or_default());
        match EditorMode::from_route(&raw) {
            Some(mode) => view! { <NoteEditor mode=mode /> }.into_any(),
            None => view! { <InvalidNoteRoute raw=raw /> }.into_any(),
        }
    }
}

#[component]
fn BackButton() -> impl IntoView {
    let navigate = use_navigate();

    view! {
        <Button
            variant=ButtonVariant::Ghost
            size=ButtonSize::Sm
            on:click=move |_| navigate("/dashboard", Default::default())
        >
            <ArrowLeft />
            "Back"
        </Button>
    }
}

#[component]
fn InvalidNoteRoute(raw: String) -> impl IntoView {
    tracing::warn!(param = %raw, "not a note route");

    view! {
        <div class="mx-auto w-full max-w-3xl px-4 py-6">
            <BackButton />
            <Alert class="mt-4 border-destructive/30">
                <AlertTitle class="text-destructive">"Note not found"</AlertTitle>
                <AlertDescription class="text-destructive text-xs">
                    {format!("\"{raw}\" is not a valid note id.")}
                </AlertDescription>
            </Alert>
        </div>
    }
}

#[component]
fn NoteEditor(mode: EditorMode) -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let cache = app.cache;
    let navigate = StoredValue::new(use_navigate());

    let ctrl = StoredValue::new(EditorController::new(
        app.api_client.clone(),
        app.cache,
        app.toaster,
        mode,
    ));

    {
        let c = ctrl.get_value();
        spawn_local(async move { c.load().await });
    }

    // A fetch started elsewhere (e.g. a refetch after save) may fill the entry later.
    Effect::new(move |_| {
        cache.track();
        ctrl.with_value(|c| c.seed_from_cache());
    });

    let title = ctrl.with_value(|c| c.title);
    let content = ctrl.with_value(|c| c.content);
    let phase = ctrl.with_value(|c| c.phase);
    let is_saving = move || phase.with(|p| *p == EditorPhase::Saving);

    let on_save = move |_| {
        let c = ctrl.get_value();
        spawn_local(async move {
            if let SaveOutcome::Created(note) = c.save().await {
                tracing::info!(id = note.id, "note created");
                navigate.with_value(|nav| nav("/dashboard", Default::default()));
            }
        });
    };

    let heading = match mode {
        EditorMode::New => "New Note",
        EditorMode::Existing(_) => "Edit Note",
    };

    view! {
        <div class="min-h-screen bg-background">
            <header class="border-b border-border">
                <div class="mx-auto flex w-full max-w-3xl items-center justify-between px-4 py-3">
                    <div class="flex items-center gap-2">
                        <BackButton />
                        <h1 class="text-sm font-medium">{heading}</h1>
                    </div>
                    <Button
                        size=ButtonSize::Sm
                        attr:disabled=move || phase.with(|p| *p != EditorPhase::Ready)
                        on:click=on_save
                    >
                        <span class="inline-flex items-center gap-2">
                            <Show when=is_saving fallback=|| view! { <Save /> }>
                                <Spinner />
                            </Show>
                            {move || if is_saving() { "Saving..." } else { "Save Note" }}
                        </span>
                    </Button>
                </div>
            </header>

            <main class="mx-auto w-full max-w-3xl px-4 py-6">
                {move || match phase.get() {
                    EditorPhase::Loading => view! { <PageSpinner /> }.into_any(),
                    EditorPhase::Failed(message) => view! {
                        <Alert class="border-destructive/30">
                            <AlertTitle class="text-destructive">"Could not load note"</AlertTitle>
                            <AlertDescription class="text-destructive text-xs">{message}</AlertDescription>
                        </Alert>
                    }
                    .into_any(),
                    EditorPhase::Ready | EditorPhase::Saving => view! {
                        <Card>
                            <CardContent class="flex flex-col gap-4">
                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="note-title">"Title"</Label>
                                    <Input
                                        id="note-title"
                                        placeholder="Note title"
                                        bind_value=title
                                        autofocus=true
                                        class="text-base font-medium"
                                    />
                                </div>
                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="note-content">"Content"</Label>
                                    <Textarea
                                        id="note-content"
                                        placeholder="Start writing..."
                                        bind_value=content
                                        class="min-h-[320px]"
                                    />
                                </div>
                            </CardContent>
                        </Card>
                    }
                    .into_any(),
                }}
            </main>
        </div>
    }
}
