use crate::state::{AppContext, Toast, ToastVariant};
use icons::X;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

const AUTO_DISMISS_MS: i32 = 4000;

/// Renders the app's toasts in the bottom-right corner.
#[component]
pub fn Toasts() -> impl IntoView {
    let toaster = expect_context::<AppContext>().0.toaster;

    view! {
        <div class="pointer-events-none fixed bottom-4 right-4 z-[100] flex w-full max-w-sm flex-col gap-2">
            {move || {
                toaster
                    .list()
                    .into_iter()
                    .map(|t| view! { <ToastItem toast=t /> })
                    .collect_view()
            }}
        </div>
    }
}

#[component]
fn ToastItem(toast: Toast) -> impl IntoView {
    let toaster = expect_context::<AppContext>().0.toaster;
    let id = toast.id;

    // Dismissing an already-dismissed toast is a no-op, so a late timer is harmless.
    let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(
        wasm_bindgen::closure::Closure::once_into_js(move || toaster.dismiss(id))
            .as_ref()
            .unchecked_ref(),
        AUTO_DISMISS_MS,
    );

    let class = match toast.variant {
        ToastVariant::Default => "border-border bg-background text-foreground",
        ToastVariant::Destructive => "border-destructive bg-destructive text-white",
    };

    view! {
        <div
            data-name="Toast"
            data-variant=toast.variant.as_ref().to_string()
            class=format!("pointer-events-auto relative rounded-md border p-4 pr-8 shadow-lg {class}")
        >
            <div class="text-sm font-semibold">{toast.title}</div>
            <div class="text-xs opacity-90">{toast.description}</div>
            <button
                type="button"
                class="absolute right-2 top-2 rounded-sm p-1 opacity-70 hover:opacity-100 [&_svg]:size-3"
                aria-label="Dismiss"
                on:click=move |_| toaster.dismiss(id)
            >
                <X />
            </button>
        </div>
    }
}
