use std::time::Duration;

use codee::string::FromToStringCodec;
use eip1193::Ethereum;
use leptos::{ev::MouseEvent, html::Dialog, prelude::*};
use leptos_meta::*;
use leptos_use::storage::use_local_storage;
use lucide_leptos::{Settings2, X};
use tracing::{debug, error, info};

mod components;
mod constants;
mod error;
mod flows;
mod state;
mod utils;

use components::{LoadingModal, Spinner};
use constants::{DEFAULT_CONFIRMATION_TIMEOUT_MINUTES, SWAP_CONTRACT};
use error::Error;
use state::{Approvals, SummarySignals, TxFlow, WalletSignals};
use utils::shorten_address;

#[component]
pub fn App() -> impl IntoView {
    info!("rendering <App/>");

    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    // Global Contexts

    provide_context(WalletSignals::new());
    provide_context(Approvals::new());
    provide_context(SummarySignals::new());

    let wallet = use_context::<WalletSignals>().expect("wallet signals context missing!");
    let approvals = use_context::<Approvals>().expect("approvals context missing!");
    let summary = use_context::<SummarySignals>().expect("summary context missing!");

    // Confirmation timeout is a user setting, persisted across sessions.
    let (timeout_minutes, set_timeout_minutes, _) =
        use_local_storage::<u64, FromToStringCodec>("confirmation_timeout");
    if timeout_minutes.get_untracked() == 0 {
        set_timeout_minutes.set(DEFAULT_CONFIRMATION_TIMEOUT_MINUTES);
    }

    let connect_error: RwSignal<Option<Error>> = RwSignal::new(None);

    // Actions

    // `silent` suppresses the missing-wallet message for the automatic
    // attempt on mount; the button press always surfaces it.
    let connect_action: Action<bool, bool, SyncStorage> =
        Action::new_unsync_with_value(Some(false), move |silent: &bool| {
            let silent = *silent;
            async move {
                if !Ethereum::is_available() {
                    info!("no injected provider found");
                    if !silent {
                        connect_error.set(Some(Error::CapabilityUnavailable));
                    }
                    return false;
                }

                let result = async {
                    let provider = Ethereum::provider()?;
                    flows::connect_wallet(&provider).await
                }
                .await;

                // a failed connect leaves the previous session untouched
                match result {
                    Ok(session) => {
                        debug!("connected: {:?}", session.accounts);
                        // approvals belong to the account that made them
                        if wallet.apply_session(session.accounts, session.balance) {
                            approvals.clear();
                        }
                        connect_error.set(None);
                        true
                    }
                    Err(err) => {
                        error!("{err}");
                        connect_error.set(Some(err));
                        false
                    }
                }
            }
        });

    let fetch_summary_action = Action::new_local(move |_: &()| async move {
        let Ok(provider) = Ethereum::provider() else {
            info!("skipping summary fetch: no injected provider");
            return;
        };
        let update = flows::fetch_summary(&provider, SWAP_CONTRACT).await;
        summary.apply(update);
    });

    let approve_flow = TxFlow::new();
    let propose_flow = TxFlow::new();
    let accept_flow = TxFlow::new();

    let timeout = move || Duration::from_secs(timeout_minutes.get_untracked() * 60);

    let approve_action =
        Action::new_local(move |(nft_address, nft_id): &(String, String)| {
            let nft_address = nft_address.clone();
            let nft_id = nft_id.clone();
            async move {
                let result = async {
                    let provider = Ethereum::provider()?;
                    let owner = wallet
                        .active_account()
                        .ok_or(Error::validation("connect your wallet first"))?;
                    let record = flows::approve_nft(
                        &provider,
                        owner,
                        SWAP_CONTRACT,
                        &nft_address,
                        &nft_id,
                        timeout(),
                    )
                    .await?;
                    approvals.push(record);
                    Ok(())
                }
                .await;
                approve_flow.finish(result);
            }
        });

    let propose_action =
        Action::new_local(move |counterparty: &String| {
            let counterparty = counterparty.clone();
            async move {
                let result = async {
                    let provider = Ethereum::provider()?;
                    let owner = wallet
                        .active_account()
                        .ok_or(Error::validation("connect your wallet first"))?;
                    let records = approvals.0.get_untracked();
                    flows::propose_swap(
                        &provider,
                        owner,
                        SWAP_CONTRACT,
                        &counterparty,
                        &records,
                        timeout(),
                    )
                    .await
                }
                .await;
                propose_flow.finish(result);
            }
        });

    let accept_action = Action::new_local(
        move |(counterparty, nft_addresses, nft_ids): &(String, String, String)| {
            let counterparty = counterparty.clone();
            let nft_addresses = nft_addresses.clone();
            let nft_ids = nft_ids.clone();
            async move {
                let result = async {
                    let provider = Ethereum::provider()?;
                    let owner = wallet
                        .active_account()
                        .ok_or(Error::validation("connect your wallet first"))?;
                    flows::accept_swap(
                        &provider,
                        owner,
                        SWAP_CONTRACT,
                        &counterparty,
                        &nft_addresses,
                        &nft_ids,
                        timeout(),
                    )
                    .await
                }
                .await;
                accept_flow.finish(result);
            }
        },
    );

    // Event Listeners

    // The wallet can switch accounts or chains underneath us; both invalidate
    // the session, so refresh it.
    Ethereum::on("accountsChanged", move || {
        info!("accountsChanged: refreshing session");
        connect_action.dispatch(true);
    });
    Ethereum::on("chainChanged", move || {
        info!("chainChanged: refreshing session");
        connect_action.dispatch(true);
    });

    // One-time mount behavior, matching the page's original load sequence.
    Effect::new(move |_| {
        connect_action.dispatch(true);
        fetch_summary_action.dispatch(());
    });

    // Draft fields (controlled inputs)

    let (counterparty, set_counterparty) = signal(String::default());
    let (nft_address, set_nft_address) = signal(String::default());
    let (nft_id, set_nft_id) = signal(String::default());

    // on:click handlers

    let connect_wallet = move |_: MouseEvent| {
        connect_action.dispatch(false);
    };

    let disconnect_wallet = move |_: MouseEvent| {
        wallet.clear();
        approvals.clear();
        connect_error.set(None);
    };

    let handle_approve = move |_: MouseEvent| {
        if !approve_flow.begin() {
            return;
        }
        approve_action.dispatch((nft_address.get(), nft_id.get()));
    };

    let handle_propose = move |_: MouseEvent| {
        if !propose_flow.begin() {
            return;
        }
        propose_action.dispatch(counterparty.get());
    };

    let handle_accept = move |_: MouseEvent| {
        if !accept_flow.begin() {
            return;
        }
        accept_action.dispatch((counterparty.get(), nft_address.get(), nft_id.get()));
    };

    let refresh_summary = move |_: MouseEvent| {
        fetch_summary_action.dispatch(());
    };

    // Node references

    let settings_dialog_ref = NodeRef::<Dialog>::new();

    let toggle_settings_menu = move |_| match settings_dialog_ref.get() {
        Some(dialog) => match dialog.open() {
            false => {
                let _ = dialog.show_modal();
            }
            true => dialog.close(),
        },
        None => {
            utils::alert("Something is wrong!");
        }
    };

    let active_account = move || wallet.active_account().map(|account| account.to_string());

    let any_tx_pending = Signal::derive(move || {
        approve_flow.pending().get() || propose_flow.pending().get() || accept_flow.pending().get()
    });

    let approved_tokens = move || {
        approvals.0.get().into_iter().map(|record| {
            view! {
                <li class="text-sm text-neutral-300">
                    {shorten_address(record.nft_address.to_string())}" · #"{record.nft_id.to_string()}
                </li>
            }
        }).collect_view()
    };

    view! {
        <Title text="TamagoSwap" />
        <header class="flex justify-between items-center p-4">
            <div id="mainTitle" class="my-2 font-bold text-3xl line-clamp-1">
                "TamagoSwap"
            </div>
            <div class="flex items-center gap-2">
                <Show when=move || wallet.is_connected()>
                    <p class="hidden sm:block text-sm">
                        "Connected as "
                        <strong>{move || active_account().map(shorten_address)}</strong>
                        {move || wallet.balance.get().map(|balance| format!(" · {balance} ETH"))}
                    </p>
                </Show>
                <Show
                    when=move || wallet.is_connected()
                    fallback=move || {
                        view! {
                            <button
                                on:click=connect_wallet
                                disabled=connect_action.pending()
                                class="min-w-24 text-sm font-semibold leading-none py-[5px] px-[12px] inline-flex justify-center items-center align-middle"
                            >
                                "Connect Wallet"
                            </button>
                        }
                    }
                >
                    <button
                        on:click=disconnect_wallet
                        class="min-w-24 text-sm font-semibold leading-none py-[5px] px-[12px] inline-flex justify-center items-center align-middle"
                    >
                        "Disconnect"
                    </button>
                </Show>
                <button
                    on:click=toggle_settings_menu
                    class="inline-flex items-center justify-center w-8 h-8 rounded-md border border-solid border-neutral-600"
                >
                    <Settings2 size=16 />
                </button>
            </div>
        </header>
        <hr />
        <main class="p-4 max-w-xl mx-auto space-y-6">
            <Show when=move || connect_error.get().is_some()>
                <div class="rounded border border-solid border-red-700 bg-red-950 text-red-200 text-sm px-3 py-2">
                    {move || connect_error.get().map(|err| err.to_string())}
                </div>
            </Show>

            // Contract summary (read-only)
            <section class="rounded-lg border border-solid border-neutral-700 p-4">
                <div class="flex justify-between items-center mb-2">
                    <h2 class="m-0 text-lg">"Collection"</h2>
                    <button
                        on:click=refresh_summary
                        disabled=fetch_summary_action.pending()
                        class="text-sm py-1 px-3"
                    >
                        "Refresh"
                    </button>
                </div>
                <SummaryField label="Total supply" value=summary.total_supply />
                <SummaryField label="WL sale price" value=summary.wl_sale_price />
                <SummaryField label="WL sale price 2" value=summary.wl_sale_price_2 />
                <SummaryField label="Public sale price" value=summary.public_sale_price />
            </section>

            // Swap form
            <section class="rounded-lg border border-solid border-neutral-700 p-4 space-y-3">
                <h2 class="m-0 text-lg">"Swap"</h2>
                <input
                    type="text"
                    placeholder="Counterparty address (0x…)"
                    autocomplete="off"
                    class="w-full box-border px-3 py-2 text-sm rounded-md"
                    prop:value=move || counterparty.get()
                    on:input=move |ev| set_counterparty.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="NFT contract address (0x…)"
                    autocomplete="off"
                    class="w-full box-border px-3 py-2 text-sm rounded-md"
                    prop:value=move || nft_address.get()
                    on:input=move |ev| set_nft_address.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="NFT token id"
                    inputmode="numeric"
                    autocomplete="off"
                    class="w-full box-border px-3 py-2 text-sm rounded-md"
                    prop:value=move || nft_id.get()
                    on:input=move |ev| set_nft_id.set(event_target_value(&ev))
                />

                <div class="flex flex-row items-center gap-2">
                    <button
                        on:click=handle_approve
                        disabled=move || approve_flow.pending().get()
                        class="py-1.5 px-6 text-sm font-medium rounded-md"
                    >
                        "Approve NFT"
                    </button>
                    <button
                        on:click=handle_propose
                        disabled=move || propose_flow.pending().get()
                        class="py-1.5 px-6 text-sm font-medium rounded-md"
                    >
                        "Propose Swap"
                    </button>
                    <button
                        on:click=handle_accept
                        disabled=move || accept_flow.pending().get()
                        class="py-1.5 px-6 text-sm font-medium rounded-md"
                    >
                        "Accept Swap"
                    </button>
                </div>

                <FlowStatus flow=approve_flow label="Approval" />
                <FlowStatus flow=propose_flow label="Proposal" />
                <FlowStatus flow=accept_flow label="Accept" />

                <Show when=move || !approvals.0.get().is_empty()>
                    <div>
                        <div class="text-sm font-semibold mt-2">"Approved for swap:"</div>
                        <ul class="m-0 pl-5">{approved_tokens}</ul>
                    </div>
                </Show>
            </section>
        </main>
        <LoadingModal when=any_tx_pending message="Processing Transaction..." />
        <SettingsMenu
            dialog_ref=settings_dialog_ref
            toggle_menu=toggle_settings_menu
            timeout_minutes=(timeout_minutes, set_timeout_minutes)
        />
    }
}

/// One line of the contract summary. A field that has never been read, or
/// whose last read failed before any success, renders as an em dash.
#[component]
fn SummaryField(
    #[prop(into)] label: String,
    value: RwSignal<Option<String>>,
) -> impl IntoView {
    view! {
        <div class="flex justify-between text-sm py-0.5">
            <span class="text-neutral-400">{label}</span>
            <span class="font-semibold">{move || value.get().unwrap_or("—".to_string())}</span>
        </div>
    }
}

/// Surfaces the result of one transaction flow and lets the user dismiss it,
/// returning the flow to idle.
#[component]
fn FlowStatus(flow: TxFlow, #[prop(into)] label: String) -> impl IntoView {
    let pending_label = label.clone();
    let confirmed_label = label.clone();
    let failed_label = label;

    view! {
        <Show when=move || flow.pending().get()>
            <div class="flex items-center gap-2 text-sm text-neutral-300">
                <Spinner size="h-4 w-4" />
                {format!("{pending_label} pending…")}
            </div>
        </Show>
        <Show when=move || flow.confirmed().get()>
            <div class="flex items-center gap-2 text-sm text-green-400">
                {format!("{confirmed_label} confirmed")}
                <button class="text-xs py-0.5 px-2" on:click=move |_| flow.acknowledge()>
                    "OK"
                </button>
            </div>
        </Show>
        <Show when=move || flow.error().get().is_some()>
            <div class="flex items-center gap-2 text-sm text-red-400">
                {
                    let failed_label = failed_label.clone();
                    move || {
                        flow.error()
                            .get()
                            .map(|err| format!("{failed_label} failed: {err}"))
                    }
                }
                <button class="text-xs py-0.5 px-2" on:click=move |_| flow.acknowledge()>
                    "Dismiss"
                </button>
            </div>
        </Show>
    }
}

#[component]
pub fn SettingsMenu(
    dialog_ref: NodeRef<Dialog>,
    toggle_menu: impl Fn(MouseEvent) + 'static,
    timeout_minutes: (Signal<u64>, WriteSignal<u64>),
) -> impl IntoView {
    info!("rendering <SettingsMenu/>");

    view! {
        <dialog node_ref=dialog_ref class="inset-0 rounded border-neutral-200 w-80 p-0">
            <div class="flex justify-between items-center p-2 pl-3 border-0 border-b border-solid border-neutral-700">
                <p class="m-0">"Settings"</p>
                <button
                    autofocus
                    on:click=toggle_menu
                    class="appearance-none border-0 flex shrink-0 items-center justify-center w-6 h-6 p-1 box-border rounded-md bg-transparent"
                >
                    <X size=16 />
                </button>
            </div>
            <div class="px-3 py-4 box-border">
                <div class="flex flex-col items-start gap-2">
                    <p class="text-sm m-0 text-neutral-400">"Confirmation timeout"</p>
                    <div class="w-full relative flex items-center isolate box-border">
                        <input
                            class="w-full box-border px-3 h-8 text-sm font-semibold bg-transparent rounded-md"
                            inputmode="decimal"
                            type="text"
                            pattern="^[0-9]*$"
                            prop:value=move || timeout_minutes.0.get()
                            on:change=move |ev| {
                                let value = event_target_value(&ev)
                                    .parse::<u64>()
                                    .unwrap_or(DEFAULT_CONFIRMATION_TIMEOUT_MINUTES)
                                    .max(1);
                                timeout_minutes.1.set(value)
                            }
                        />
                        <div class="absolute right-0 top-0 min-w-fit h-8 mr-4 z-[2] flex items-center justify-center text-sm">
                            "minutes"
                        </div>
                    </div>
                </div>
            </div>
        </dialog>
    }
}
