use leptos::prelude::*;

#[component]
pub fn Spinner(#[prop(into, default = "h-6 w-6".to_string())] size: String) -> impl IntoView {
    view! {
        <svg
            class=format!("animate-spin text-neutral-400 {size}")
            xmlns="http://www.w3.org/2000/svg"
            fill="none"
            viewBox="0 0 24 24"
        >
            <circle
                class="opacity-25"
                cx="12"
                cy="12"
                r="10"
                stroke="currentColor"
                stroke-width="4"
            ></circle>
            <path
                class="opacity-75"
                fill="currentColor"
                d="M4 12a8 8 0 0 1 8-8v4a4 4 0 0 0-4 4H4z"
            ></path>
        </svg>
    }
}
