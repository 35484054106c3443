pub mod index;
pub mod results;
pub mod season;
pub mod style_css;

use std::sync::Arc;

use axum::{routing::get, Router};
use chrono::Datelike;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::Config,
    model::{Gemini, TextModel},
};

pub const TITLE: &str = "The Creator Gear Guide";

pub struct AppState<M> {
    pub config: Config,
    pub model: M,
}

pub fn router<M: TextModel + 'static>(state: Arc<AppState<M>>) -> Router {
    Router::new()
        .route("/", get(index::get::<M>).post(index::post::<M>))
        .route("/style.css", get(style_css::route))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> eyre::Result<()> {
    let bind = config.bind;
    let model = Gemini::from_config(&config.model);
    let state = Arc::new(AppState { config, model });

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on http://{bind}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// What goes back into the form when a page is rendered after a submission.
#[derive(Debug, Default)]
pub struct FormValues<'a> {
    pub description: &'a str,
    pub api_key: &'a str,
}

pub fn head_html() -> Markup {
    html! {
        head {
            meta charset="UTF-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            title { (TITLE) }
            link rel="stylesheet" href="/style.css";
        }
    }
}

fn sidebar_html(config: &Config, form: &FormValues) -> Markup {
    html! {
        aside.sidebar {
            h2 { "⚙️ Settings" }
            @if config.model.api_key.is_some() {
                p.notice.success { "✅ API Key Loaded" }
            } @else {
                label for="api-key" { "Enter Google API Key" }
                input #api-key type="password" name="api-key" form="gift-form" autocomplete="off" value=(form.api_key);
                p.caption { "Get your key from Google AI Studio" }
            }
            hr;
            h3 { "💡 How it works" }
            p.notice.info {
                "Describe the person in detail. The AI will browse its knowledge base to find unique, physical gifts tailored to them."
            }
        }
    }
}

fn gift_form_html(form: &FormValues) -> Markup {
    html! {
        form id="gift-form" class="gift-form" method="post" action="/" {
            label for="description" { "Who are we buying for?" }
            textarea #description name="description" rows="4"
                placeholder="Describe the content creator you're buying for: Podcaster, Twitch Gamer, Vlogger, etc." {
                (form.description)
            }
            button.primary type="submit" { "✨ Generate Gift Ideas" }
        }
    }
}

fn footer_html(config: &Config) -> Markup {
    let year = chrono::Local::now().year();
    html! {
        footer {
            hr;
            p.caption {
                "© " (year) " " (config.ui.site_name)
                ". As an Amazon Associate, I earn from qualifying purchases."
            }
            @if config.ui.show_version_info {
                p.caption.version {
                    "Version " (env!("CARGO_PKG_VERSION")) " ("
                    span title=(env!("GIT_HASH")) { (env!("GIT_HASH_SHORT")) }
                    ")"
                }
            }
        }
    }
}

/// Everything up to where the submission's outcome goes. The `<main>` element
/// is left open so the rest of the page can be streamed after it.
pub fn render_beginning_of_html(config: &Config, form: &FormValues) -> String {
    let current = season::current_season();
    let rain = current
        .rain
        .as_ref()
        .filter(|_| config.ui.seasonal_decorations);

    html! {
        (DOCTYPE)
        (PreEscaped("<html lang=\"en\">"))
        (head_html())
        (PreEscaped("<body>"))
        @if let Some(rain) = rain {
            (season::render_rain(rain))
        }
        (PreEscaped("<div class=\"page\">"))
        (sidebar_html(config, form))
        (PreEscaped("<main>"))
        h1 { "📹 " (TITLE) }
        p.seasonal-subheader { (current.subheader) }
        h2.tagline { "Essential Gear for Streamers, Podcasters, & Vloggers." }
        (gift_form_html(form))
    }
    .into_string()
}

pub fn render_end_of_html(config: &Config) -> String {
    html! {
        (footer_html(config))
        (PreEscaped("</main></div></body></html>"))
    }
    .into_string()
}

pub fn render_page(config: &Config, form: &FormValues, content: Markup) -> String {
    let mut html = render_beginning_of_html(config, form);
    html.push_str(&content.into_string());
    html.push_str(&render_end_of_html(config));
    html
}
