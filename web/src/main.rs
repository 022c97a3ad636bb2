use api::{ApiConfig, HttpBackend};
use dioxus::prelude::*;

use ui::core::config::ChartConfig;
use ui::views::{Analyzer, BackendHandle};

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn main() {
    if let Err(err) = dioxus::logger::init(tracing::Level::INFO) {
        eprintln!("logger already initialized: {err}");
    }
    dioxus::launch(App);
}

/// The backend is served next to the app, so the page origin decides the base URL.
fn api_config() -> ApiConfig {
    #[cfg(target_arch = "wasm32")]
    {
        match web_sys::window().and_then(|window| window.location().origin().ok()) {
            Some(origin) => ApiConfig::for_origin(&origin),
            None => ApiConfig::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        ApiConfig::from_env()
    }
}

#[component]
fn App() -> Element {
    use_context_provider(|| {
        let config = api_config();
        tracing::info!(base_url = %config.base_url, "using session backend");
        BackendHandle::new(HttpBackend::new(config))
    });
    use_context_provider(ChartConfig::default);

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }

        main { class: "app-shell",
            Analyzer {}
        }
    }
}
