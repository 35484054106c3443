use std::{convert::Infallible, sync::Arc};

use async_stream::stream;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use bytes::Bytes;
use maud::html;
use serde::Deserialize;

use super::{
    render_beginning_of_html, render_end_of_html, render_page, results, AppState, FormValues,
};
use crate::{
    model::TextModel,
    parse::parse_reply,
    recommend::{self, Outcome, Submission},
};

const PROGRESS_STEPS: &[&str] = &[
    "🔍 Analyzing interests...",
    "🧠 Brainstorming unique angles...",
    "🎁 Selecting the best 5 items...",
];

fn html_response(html: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
        .into_response()
}

pub async fn get<M: TextModel>(State(state): State<Arc<AppState<M>>>) -> Response {
    html_response(render_page(
        &state.config,
        &FormValues::default(),
        html! {},
    ))
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct GiftForm {
    #[serde(default)]
    description: String,
    #[serde(default)]
    api_key: Option<String>,
}

pub async fn post<M: TextModel + 'static>(
    State(state): State<Arc<AppState<M>>>,
    Form(form): Form<GiftForm>,
) -> Response {
    let submission = Submission {
        api_key: form.api_key,
        description: form.description,
    };

    let request = match recommend::prepare(&state.config, &submission) {
        Ok(request) => request,
        Err(outcome) => {
            let form_values = FormValues {
                description: &submission.description,
                api_key: submission.api_key.as_deref().unwrap_or_default(),
            };
            let content = match outcome {
                Outcome::MissingApiKey => {
                    results::render_error("Please enter an API Key in the sidebar to continue.")
                }
                Outcome::MissingDescription => {
                    results::render_warning("Please describe the person first!")
                }
                // prepare never makes the call, so it can't produce these
                Outcome::Failed(_) | Outcome::Reply(_) => html! {},
            };
            return html_response(render_page(&state.config, &form_values, content));
        }
    };

    let s = stream! {
        type R = Result<Bytes, Infallible>;

        let beginning = render_beginning_of_html(
            &state.config,
            &FormValues {
                description: &submission.description,
                api_key: submission.api_key.as_deref().unwrap_or_default(),
            },
        );
        yield R::Ok(Bytes::from(beginning));

        yield R::Ok(Bytes::from(r#"<div class="progress-updates">"#));
        for step in PROGRESS_STEPS {
            let progress_html = html! { p.progress-update { (step) } }.into_string();
            yield R::Ok(Bytes::from(progress_html));
        }

        let outcome = recommend::fetch(&state.model, &request).await;

        let mut second_half = String::new();
        second_half.push_str("</div>"); // close progress-updates
        second_half.push_str("<style>.progress-updates{display:none}</style>");
        match outcome {
            Outcome::Reply(text) => {
                second_half.push_str(&html! { p.status.done { "✅ Ideas Found!" } }.into_string());
                second_half.push_str(
                    &results::render_recommendations(parse_reply(&text), &state.config.affiliate)
                        .into_string(),
                );
            }
            Outcome::Failed(error) => {
                second_half.push_str(&html! { p.status.failed { "❌ Error" } }.into_string());
                second_half.push_str(&results::render_failure(&error).into_string());
            }
            Outcome::MissingApiKey | Outcome::MissingDescription => {}
        }
        second_half.push_str(&render_end_of_html(&state.config));

        yield R::Ok(Bytes::from(second_half));
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(s),
    )
        .into_response()
}
