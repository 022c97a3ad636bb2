use std::rc::Rc;

use api::SessionBackend;
use dioxus::prelude::*;
use futures::StreamExt;

use crate::analysis::{AnalyzerState, PointerEvent, QueryStatus};
use crate::core::config::ChartConfig;
use crate::results::{ResultsSummary, SessionDetailsPanel, TimeseriesChart};

/// Backend shared through context by the platform shell.
#[derive(Clone)]
pub struct BackendHandle(pub Rc<dyn SessionBackend>);

impl BackendHandle {
    pub fn new(backend: impl SessionBackend + 'static) -> Self {
        Self(Rc::new(backend))
    }
}

#[derive(Debug, Clone)]
enum AnalyzerEvent {
    Submit,
    Pointer(PointerEvent),
    LoadAll,
    CloseDetails,
}

#[component]
pub fn Analyzer() -> Element {
    let backend = use_context::<BackendHandle>();
    let config = try_use_context::<ChartConfig>().unwrap_or_default();

    let state = use_signal(AnalyzerState::default);
    let mut start_date = use_signal(String::new);
    let mut end_date = use_signal(String::new);

    let coroutine = use_coroutine(move |mut rx: UnboundedReceiver<AnalyzerEvent>| {
        let backend = backend.clone();
        let mut state = state;

        async move {
            while let Some(event) = rx.next().await {
                match event {
                    AnalyzerEvent::Submit => {
                        let (start, end) = (start_date.peek().clone(), end_date.peek().clone());
                        let ticket = state.with_mut(|analyzer| analyzer.submit(&start, &end));
                        if let Ok(ticket) = ticket {
                            let backend = backend.clone();
                            spawn(async move {
                                let response = ticket.fetch(backend.0.as_ref()).await;
                                state.with_mut(|analyzer| analyzer.apply_range(response));
                            });
                        }
                    }
                    AnalyzerEvent::Pointer(event) => {
                        if state.peek().is_redundant_pointer(&event) {
                            continue;
                        }
                        state.with_mut(|analyzer| analyzer.pointer(event));
                    }
                    AnalyzerEvent::LoadAll => {
                        match state.with_mut(|analyzer| analyzer.begin_load_all()) {
                            Ok(request) => {
                                let backend = backend.clone();
                                spawn(async move {
                                    let response = request.fetch(backend.0.as_ref()).await;
                                    state.with_mut(|analyzer| analyzer.complete_load(response));
                                });
                            }
                            Err(err) => tracing::debug!(%err, "full session load refused"),
                        }
                    }
                    AnalyzerEvent::CloseDetails => {
                        state.with_mut(AnalyzerState::close_details);
                    }
                }
            }
        }
    });

    let send_event = move |event: AnalyzerEvent| coroutine.send(event);

    let snapshot = state();
    let querying = snapshot.is_querying();
    let error_message = match snapshot.status() {
        QueryStatus::Failed(message) => Some(message.clone()),
        _ => None,
    };
    let show_chart = *snapshot.status() == QueryStatus::Ready;
    let range_label = snapshot.range().map(|range| range.to_string()).unwrap_or_default();

    rsx! {
        section { class: "page page-analyzer",
            h1 { "Session Analyzer" }
            p { "Pick a date range to chart Snort hits per Community ID. Click a point to inspect that day's sessions." }

            form {
                class: "analyzer-form",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    send_event(AnalyzerEvent::Submit);
                },
                div { class: "analyzer-form__group",
                    label { r#for: "analyzer-start", "Start Date:" }
                    input {
                        id: "analyzer-start",
                        r#type: "date",
                        required: true,
                        value: "{start_date}",
                        oninput: move |evt| start_date.set(evt.value()),
                    }
                }
                div { class: "analyzer-form__group",
                    label { r#for: "analyzer-end", "End Date:" }
                    input {
                        id: "analyzer-end",
                        r#type: "date",
                        required: true,
                        value: "{end_date}",
                        oninput: move |evt| end_date.set(evt.value()),
                    }
                }
                button {
                    r#type: "submit",
                    class: "button button--primary",
                    disabled: querying,
                    if querying { "Loading..." } else { "Submit" }
                }
            }

            if let Some(err) = error_message {
                div { class: "analyzer__error", "{err}" }
            }

            if let Some(totals) = snapshot.totals() {
                ResultsSummary { totals, range_label }
            }

            if show_chart {
                TimeseriesChart {
                    series: snapshot.series().to_vec(),
                    hover: snapshot.hover().clone(),
                    config,
                    on_pointer: move |event| send_event(AnalyzerEvent::Pointer(event)),
                }
            }

            SessionDetailsPanel {
                store: snapshot.drilldown().clone(),
                on_load_all: move |_| send_event(AnalyzerEvent::LoadAll),
                on_close: move |_| send_event(AnalyzerEvent::CloseDetails),
            }
        }
    }
}
