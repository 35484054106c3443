//! Rendering the outcome of a submission.

use maud::{html, Markup};

use crate::{
    config::AffiliateConfig,
    parse::{Recommendation, Recommendations},
    prompt::REQUESTED_ITEMS,
};

pub fn render_error(message: &str) -> Markup {
    html! {
        div.notice.error { "⚠ " (message) }
    }
}

pub fn render_warning(message: &str) -> Markup {
    html! {
        div.notice.warning { (message) }
    }
}

pub fn render_failure(error: &str) -> Markup {
    html! {
        div.notice.error { "Oops! Something went wrong: " (error) }
    }
}

/// Consumes the parsed reply, one card per recommendation.
pub fn render_recommendations(
    recommendations: Recommendations,
    affiliate: &AffiliateConfig,
) -> Markup {
    let mut cards = String::new();
    let mut count = 0usize;
    for recommendation in recommendations {
        cards.push_str(&render_card(&recommendation, affiliate).into_string());
        count += 1;
    }
    tracing::info!(count, "rendered recommendations");

    html! {
        hr;
        section.recommendations {
            h3 { "🎯 Top " (REQUESTED_ITEMS) " Recommendations (Expert Analysis)" }
            @if count == 0 {
                p.no-results {
                    "No usable suggestions came back. Try describing them a little differently."
                }
            } @else {
                (maud::PreEscaped(cards))
            }
        }
    }
}

fn render_card(recommendation: &Recommendation, affiliate: &AffiliateConfig) -> Markup {
    html! {
        div.card {
            div.card-text {
                strong.card-name { (recommendation.name) }
                p.caption.card-description { (recommendation.description) }
            }
            a.card-link href=(recommendation.search_link(affiliate)) target="_blank" rel="noopener noreferrer sponsored" {
                "👉 View Item"
            }
        }
    }
}
