use dioxus::prelude::*;

use crate::analysis::RangeTotals;

#[component]
pub fn ResultsSummary(totals: RangeTotals, range_label: String) -> Element {
    rsx! {
        section { class: "results-card results-summary",
            div { class: "results-card__header",
                h2 { "Results Summary" }
                span { class: "results-card__meta", "{range_label}" }
            }
            div { class: "results-highlights",
                div { class: "results-highlight",
                    span { class: "results-highlight__label", "Total Number of Unique Sessions" }
                    strong { class: "results-highlight__value", "{totals.unique_sessions}" }
                }
                div { class: "results-highlight",
                    span { class: "results-highlight__label", "Snort SID Hits" }
                    strong { class: "results-highlight__value", "{totals.snort_hits}" }
                }
            }
        }
    }
}
