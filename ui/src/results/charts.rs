use std::fmt::Write as _;

use dioxus::prelude::*;

use crate::{
    analysis::{ChartGeometry, CommunitySeries, DataPoint, HoverState, PlotGeometry, PointerEvent},
    core::{config::ChartConfig, format},
};

const TOOLTIP_WIDTH: f64 = 190.0;
const TOOLTIP_LINE: f64 = 16.0;

#[component]
pub fn TimeseriesChart(
    series: Vec<CommunitySeries>,
    hover: HoverState,
    config: ChartConfig,
    on_pointer: EventHandler<PointerEvent>,
) -> Element {
    let geometry = ChartGeometry::compute(&series, config.plot_width(), config.plot_height());

    let plot = match geometry {
        ChartGeometry::Empty => {
            return rsx! {
                section { class: "results-card chart chart--empty",
                    p { class: "results-card__placeholder", "No data available for the selected date range." }
                }
            };
        }
        ChartGeometry::Plot(plot) => plot,
    };

    let view_box = format!("0 0 {} {}", config.width, config.height);
    let origin = format!(
        "translate({},{})",
        config.margin.left, config.margin.top
    );

    rsx! {
        section { class: "results-card chart",
            div { class: "results-card__header",
                h2 { "Snort Hits per Community ID" }
                span { class: "results-card__meta", "{series.len()} community IDs over {plot.date_count} days" }
            }

            svg {
                class: "chart__surface",
                width: "100%",
                "viewBox": "{view_box}",
                "preserveAspectRatio": "xMidYMid meet",

                g { transform: "{origin}",
                    {render_axes(&plot)}

                    for community in series.iter() {
                        path {
                            key: "{community.group_id}-line",
                            class: "chart__line",
                            d: "{line_path(&plot, &community.points)}",
                            fill: "none",
                            stroke: "{community.color}",
                            stroke_width: "{config.stroke_width}",
                        }
                    }

                    for community in series.iter() {
                        for point in community.points.iter().filter(|point| point.hit_count > 0) {
                            {render_point(&plot, &config, &hover, community, point, on_pointer)}
                        }
                    }

                    {render_legend(&plot, &config, &series)}
                    {render_tooltip(&plot, &series, &hover)}
                }
            }
        }
    }
}

fn render_axes(plot: &PlotGeometry) -> Element {
    let axis_y = plot.height;
    let date_label_x = plot.width / 2.0;
    let date_label_y = plot.height + 55.0;
    let hits_label_x = -plot.height / 2.0;

    rsx! {
        g { class: "chart__axis chart__axis--x",
            line { x1: "0", y1: "{axis_y}", x2: "{plot.width}", y2: "{axis_y}", stroke: "currentColor" }
            for tick in plot.date_ticks.iter() {
                g {
                    key: "{tick.label}",
                    transform: "translate({tick.x},{axis_y})",
                    line { y2: "6", stroke: "currentColor" }
                    text {
                        class: "chart__tick-label",
                        transform: "rotate(-45)",
                        text_anchor: "end",
                        dx: "-0.6em",
                        dy: "0.9em",
                        "{tick.label}"
                    }
                }
            }
            text {
                class: "chart__axis-label",
                x: "{date_label_x}",
                y: "{date_label_y}",
                text_anchor: "middle",
                "Date"
            }
        }

        g { class: "chart__axis chart__axis--y",
            line { x1: "0", y1: "0", x2: "0", y2: "{axis_y}", stroke: "currentColor" }
            for tick in plot.value_ticks.iter() {
                g {
                    key: "{tick.value}",
                    transform: "translate(0,{tick.y})",
                    line { x2: "-6", stroke: "currentColor" }
                    line { class: "chart__grid", x2: "{plot.width}" }
                    text {
                        class: "chart__tick-label",
                        x: "-9",
                        dy: "0.32em",
                        text_anchor: "end",
                        "{tick.label}"
                    }
                }
            }
            text {
                class: "chart__axis-label",
                transform: "rotate(-90)",
                x: "{hits_label_x}",
                y: "-55",
                text_anchor: "middle",
                "Snort Hits"
            }
        }
    }
}

fn render_point(
    plot: &PlotGeometry,
    config: &ChartConfig,
    hover: &HoverState,
    community: &CommunitySeries,
    point: &DataPoint,
    on_pointer: EventHandler<PointerEvent>,
) -> Element {
    let (cx, cy) = plot.project(point);
    let emphasized = hover.is_emphasized(&community.group_id, &point.date_key);
    let radius = if emphasized {
        config.hover_radius
    } else {
        config.point_radius
    };
    let class = if emphasized {
        "chart__point chart__point--active"
    } else {
        "chart__point"
    };

    let hover_event = PointerEvent::Hover {
        group_id: community.group_id.clone(),
        point: point.clone(),
    };
    let move_event = PointerEvent::Move {
        group_id: community.group_id.clone(),
        point: point.clone(),
    };
    let click_event = PointerEvent::Click {
        group_id: community.group_id.clone(),
        point: point.clone(),
    };

    rsx! {
        circle {
            key: "{community.group_id}-{point.date_key}",
            class: "{class}",
            cx: "{cx}",
            cy: "{cy}",
            r: "{radius}",
            fill: "{community.color}",
            onmouseenter: move |_| on_pointer.call(hover_event.clone()),
            onmousemove: move |_| on_pointer.call(move_event.clone()),
            onmouseleave: move |_| on_pointer.call(PointerEvent::Leave),
            onclick: move |_| on_pointer.call(click_event.clone()),
        }
    }
}

fn render_legend(plot: &PlotGeometry, config: &ChartConfig, series: &[CommunitySeries]) -> Element {
    let legend_x = plot.width + 20.0;
    let rows: Vec<LegendRow> = series
        .iter()
        .enumerate()
        .map(|(row, community)| LegendRow {
            group_id: community.group_id.clone(),
            label: format::abbreviate_group_id(&community.group_id),
            color: community.color.hex(),
            offset: row as f64 * config.legend_row,
        })
        .collect();

    rsx! {
        g { class: "chart__legend", transform: "translate({legend_x},0)",
            for row in rows.into_iter() {
                g {
                    key: "{row.group_id}-legend",
                    transform: "translate(0,{row.offset})",
                    rect { width: "12", height: "12", fill: "{row.color}" }
                    text { x: "18", y: "10", class: "chart__legend-label",
                        title { "{row.group_id}" }
                        "{row.label}"
                    }
                }
            }
        }
    }
}

struct LegendRow {
    group_id: String,
    label: String,
    color: &'static str,
    offset: f64,
}

fn render_tooltip(plot: &PlotGeometry, series: &[CommunitySeries], hover: &HoverState) -> Element {
    let Some(tooltip) = hover.tooltip.as_ref().filter(|_| hover.emphasized) else {
        return rsx! {};
    };
    let Some(point) = series
        .iter()
        .filter(|community| community.group_id == tooltip.group_id)
        .flat_map(|community| community.points.iter())
        .find(|point| point.date_key == tooltip.date_key)
    else {
        return rsx! {};
    };

    let (anchor_x, anchor_y) = plot.project(point);
    let lines: Vec<(String, f64)> = format::tooltip_lines(tooltip)
        .into_iter()
        .enumerate()
        .map(|(index, text)| (text, TOOLTIP_LINE * (index as f64 + 1.0)))
        .collect();

    // Flip to the left of the point near the right edge.
    let x = if anchor_x + 10.0 + TOOLTIP_WIDTH > plot.width {
        anchor_x - 10.0 - TOOLTIP_WIDTH
    } else {
        anchor_x + 10.0
    };
    let y = (anchor_y - 28.0).max(0.0);
    let height = TOOLTIP_LINE * lines.len() as f64 + 8.0;

    rsx! {
        g { class: "chart__tooltip", transform: "translate({x},{y})", pointer_events: "none",
            rect { width: "{TOOLTIP_WIDTH}", height: "{height}", rx: "4" }
            for (text_line, baseline) in lines.into_iter() {
                text {
                    key: "{baseline}",
                    x: "8",
                    y: "{baseline}",
                    "{text_line}"
                }
            }
        }
    }
}

fn line_path(plot: &PlotGeometry, points: &[DataPoint]) -> String {
    let mut d = String::new();
    for (index, point) in points.iter().enumerate() {
        let (x, y) = plot.project(point);
        let command = if index == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{command}{x:.2},{y:.2}");
    }
    d
}
