//! Seasonal subheader and the falling-emoji decoration that goes with it.

use chrono::Datelike;
use maud::{html, Markup};
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Season {
    pub subheader: &'static str,
    pub rain: Option<Rain>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rain {
    pub emoji: &'static str,
    pub font_size_px: u32,
    /// Seconds for one drop to cross the screen.
    pub fall_secs: u32,
    /// How many times each drop falls before the animation stops.
    pub passes: u32,
}

const DROPS: usize = 24;

pub fn season_for_month(month: u32) -> Season {
    match month {
        11 => Season {
            subheader: "🦃 Gobble gobble! Find the perfect Thanksgiving host gift.",
            rain: Some(Rain {
                emoji: "🍂",
                font_size_px: 30,
                fall_secs: 5,
                passes: 3,
            }),
        },
        12 => Season {
            subheader: "🎄 Season's Greetings! Let's find a magical gift.",
            rain: Some(Rain {
                emoji: "❄️",
                font_size_px: 20,
                fall_secs: 3,
                passes: 3,
            }),
        },
        _ => Season {
            subheader: "🎁 Find the perfect gift for the person who has everything.",
            rain: None,
        },
    }
}

pub fn current_season() -> Season {
    season_for_month(chrono::Local::now().month())
}

pub fn render_rain(rain: &Rain) -> Markup {
    let mut rng = rand::thread_rng();
    let drops = (0..DROPS)
        .map(|_| {
            format!(
                "left:{left:.1}%;font-size:{size}px;animation-duration:{duration}s;animation-delay:{delay:.2}s;animation-iteration-count:{passes}",
                left = rng.gen_range(0.0..100.0),
                size = rain.font_size_px,
                duration = rain.fall_secs,
                delay = rng.gen_range(0.0..rain.fall_secs as f64),
                passes = rain.passes,
            )
        })
        .collect::<Vec<_>>();

    html! {
        div.rain aria-hidden="true" {
            @for style in &drops {
                span.raindrop style=(style) { (rain.emoji) }
            }
        }
    }
}
