use super::Spinner;
use leptos::{html::Dialog, prelude::*};

#[component]
pub fn LoadingModal(
    #[prop(into)] when: Signal<bool>,
    #[prop(into)] message: String,
) -> impl IntoView {
    let dialog_ref = NodeRef::<Dialog>::new();

    Effect::new(move |_| match dialog_ref.get() {
        Some(dialog) => match when.get() {
            true => {
                let _ = dialog.show_modal();
            }
            false => dialog.close(),
        },
        None => (),
    });

    view! {
        <dialog node_ref=dialog_ref class="block inset-0">
            <div class="inline-flex items-center gap-3">
                <Spinner size="h-8 w-8" />
                <div class="font-bold">{message}</div>
            </div>
        </dialog>
    }
}
