use icons::Loader;
use leptos::prelude::*;
use tw_merge::tw_merge;

#[component]
pub fn Spinner(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("size-4 animate-spin", class);

    view! { <Loader class=merged_class attr:role="status" attr:aria-label="Loading" /> }
}

/// Centered spinner for whole-page loading states.
#[component]
pub fn PageSpinner() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12">
            <Spinner class="size-8 text-primary" />
        </div>
    }
}
