mod loading_modal;
mod spinner;

pub use loading_modal::LoadingModal;
pub use spinner::Spinner;
