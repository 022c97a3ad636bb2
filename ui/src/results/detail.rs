use api::SessionDetail;
use dioxus::prelude::*;

use crate::{analysis::DrillDownStore, core::format};

#[component]
pub fn SessionDetailsPanel(
    store: DrillDownStore,
    on_load_all: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    let Some(context) = store.context() else {
        return rsx! {};
    };

    let header = format::sessions_header(&store);
    let load_label = format::load_all_label(&store);
    let group_label = context
        .selected_group_id
        .as_deref()
        .map(format::abbreviate_group_id);
    let sessions = store.displayed_sessions().to_vec();

    rsx! {
        section { class: "results-card session-details",
            div { class: "results-card__header session-details__header",
                h2 {
                    "Session Details for {context.date_key}"
                    if let Some(group) = group_label {
                        span { class: "session-details__group", "(Community ID: {group})" }
                    }
                }
                div { class: "session-details__controls",
                    span { class: "session-details__count", "{header}" }
                    if let Some(label) = load_label {
                        button {
                            r#type: "button",
                            class: "session-details__load-all",
                            disabled: store.is_loading(),
                            onclick: move |_| on_load_all.call(()),
                            "{label}"
                        }
                    }
                    button {
                        r#type: "button",
                        class: "session-details__close",
                        aria_label: "Close session details",
                        onclick: move |_| on_close.call(()),
                        "×"
                    }
                }
            }

            if let Some(err) = store.error() {
                div { class: "session-details__error", "{err}" }
            }

            if sessions.is_empty() {
                p { class: "results-card__placeholder", "No session details available for this day." }
            } else {
                div { class: "session-details__table-wrap",
                    table { class: "session-details__table",
                        thead {
                            tr {
                                th { "Timestamp" }
                                th { "Index" }
                                th { "Community ID" }
                                th { "SID" }
                                th { "Source" }
                                th { "Destination" }
                                th { "Message" }
                            }
                        }
                        tbody {
                            for (index, session) in sessions.iter().enumerate() {
                                {render_row(index, session)}
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_row(index: usize, session: &SessionDetail) -> Element {
    let key = session
        .document_id
        .clone()
        .unwrap_or_else(|| index.to_string());

    rsx! {
        tr { key: "{key}",
            td { "{format::or_na(&session.timestamp)}" }
            td { class: "session-details__index", "{format::or_na(&session.index_name)}" }
            td { class: "session-details__group-id", "{format::or_na(&session.group_id)}" }
            td { "{format::join_or_na(&session.sid)}" }
            td { class: "session-details__endpoint", "{format::source_endpoint(session)}" }
            td { class: "session-details__endpoint", "{format::dest_endpoint(session)}" }
            td { class: "session-details__message", "{format::join_or_na(&session.snort_message)}" }
        }
    }
}
