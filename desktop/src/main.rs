#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use api::{ApiConfig, HttpBackend};
#[cfg(feature = "desktop")]
use dioxus::desktop::{
    tao::{dpi::LogicalSize, window::WindowBuilder},
    Config,
};
use dioxus::prelude::*;

use ui::core::config::ChartConfig;
use ui::views::{Analyzer, BackendHandle};

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
)); // Shared theme is embedded; desktop ships no separate assets.

#[cfg(feature = "desktop")]
fn main() {
    init_logging();

    LaunchBuilder::desktop()
        .with_cfg(
            Config::new().with_window(
                WindowBuilder::new()
                    .with_title(format!("Sessionscope v{}", env!("CARGO_PKG_VERSION")))
                    .with_inner_size(LogicalSize::new(1400.0, 960.0)),
            ),
        )
        .launch(App);
}

#[cfg(all(feature = "server", not(feature = "desktop")))]
fn main() {
    init_logging();
    LaunchBuilder::server().launch(App);
}

fn init_logging() {
    if let Err(err) = dioxus::logger::init(tracing::Level::INFO) {
        eprintln!("logger already initialized: {err}");
    }
}

#[component]
fn App() -> Element {
    use_context_provider(|| {
        let config = ApiConfig::from_env();
        tracing::info!(base_url = %config.base_url, "using session backend");
        BackendHandle::new(HttpBackend::new(config))
    });
    use_context_provider(ChartConfig::default);

    rsx! {
        // Always inline the embedded theme.
        document::Style { "{MAIN_CSS_INLINE}" }

        main { class: "app-shell",
            Analyzer {}
        }
    }
}
