use tamago_swap_leptos::App;
use tracing_subscriber::fmt;
use tracing_subscriber_wasm::MakeConsoleWriter;

fn main() {
    console_error_panic_hook::set_once();

    fmt()
        .with_writer(MakeConsoleWriter::default().map_trace_level_to(tracing::Level::DEBUG))
        // the browser console provides its own timestamps
        .without_time()
        .init();

    leptos::mount::mount_to_body(App)
}
