//! Turning the model's flat-text reply into recommendations.
//!
//! The reply is expected to look like
//! `Name || Description | Name || Description | ...`. Models don't always
//! listen, so anything that doesn't fit is skipped instead of failing the
//! whole reply.

use tracing::debug;

use crate::{config::AffiliateConfig, urls::search_link};

/// Things models like to wrap their answers in even when told not to.
const FORMATTING_ARTIFACTS: &[&str] = &["```", "json"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub name: String,
    pub description: String,
}

impl Recommendation {
    pub fn search_link(&self, affiliate: &AffiliateConfig) -> String {
        search_link(&affiliate.search_url, &self.name, &affiliate.tag)
    }
}

pub fn clean_reply(raw: &str) -> String {
    let mut text = raw.to_string();
    for artifact in FORMATTING_ARTIFACTS {
        text = text.replace(artifact, "");
    }
    text.trim().to_string()
}

/// Parse a raw reply. The returned iterator is lazy and yields recommendations
/// in the order they appear in the reply.
pub fn parse_reply(raw: &str) -> Recommendations {
    Recommendations {
        text: clean_reply(raw),
        pos: 0,
    }
}

/// Parse one `Name || Description` item. Anything that doesn't split into
/// exactly two parts is rejected.
pub fn parse_item(item: &str) -> Option<Recommendation> {
    let mut parts = item.split("||");
    let (Some(name), Some(description), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    Some(Recommendation {
        name: name.trim().to_string(),
        description: description.trim().to_string(),
    })
}

pub struct Recommendations {
    text: String,
    pos: usize,
}

impl Recommendations {
    /// The next non-empty item, trimmed.
    fn next_item(&mut self) -> Option<(usize, usize)> {
        while self.pos <= self.text.len() {
            let (start, end) = next_segment(&self.text, self.pos);
            self.pos = end + 1;

            let segment = &self.text[start..end];
            let leading = segment.len() - segment.trim_start().len();
            let trimmed = segment.trim();
            if !trimmed.is_empty() {
                return Some((start + leading, start + leading + trimmed.len()));
            }
        }
        None
    }
}

impl Iterator for Recommendations {
    type Item = Recommendation;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((start, end)) = self.next_item() {
            let item = &self.text[start..end];
            match parse_item(item) {
                Some(recommendation) => return Some(recommendation),
                None => debug!("dropping malformed item {item:?}"),
            }
        }
        None
    }
}

/// Find the segment starting at `from` that runs up to the next lone `|`.
/// Runs of two or more pipes belong to the item itself, since `||` is the
/// separator between a name and its description.
fn next_segment(text: &str, from: usize) -> (usize, usize) {
    let bytes = text.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'|' {
            let run_start = i;
            while i < bytes.len() && bytes[i] == b'|' {
                i += 1;
            }
            if i - run_start == 1 {
                return (from, run_start);
            }
        } else {
            i += 1;
        }
    }
    (from, bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, description: &str) -> Recommendation {
        Recommendation {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_two_items() {
        let recs: Vec<_> =
            parse_reply("Studio Microphone || Clear audio | Boom Arm || Reduces vibration")
                .collect();
        assert_eq!(
            recs,
            vec![
                rec("Studio Microphone", "Clear audio"),
                rec("Boom Arm", "Reduces vibration"),
            ]
        );
    }

    #[test]
    fn test_malformed_item_is_dropped() {
        let recs: Vec<_> = parse_reply(
            "Ring Light || Even lighting | BadItem | Webcam || Sharp 1080p video | Too || Many || Parts",
        )
        .collect();
        assert_eq!(
            recs,
            vec![
                rec("Ring Light", "Even lighting"),
                rec("Webcam", "Sharp 1080p video"),
            ]
        );
    }

    #[test]
    fn test_strips_code_fences() {
        let recs: Vec<_> = parse_reply("```json\nPop Filter || Softens plosives\n```").collect();
        assert_eq!(recs, vec![rec("Pop Filter", "Softens plosives")]);
    }

    #[test]
    fn test_empty_and_garbage_replies() {
        assert_eq!(parse_reply("").count(), 0);
        assert_eq!(parse_reply("   ").count(), 0);
        assert_eq!(parse_reply("| | |").count(), 0);
        assert_eq!(
            parse_reply("Sure! Here are some ideas you might like.").count(),
            0
        );
    }

    #[test]
    fn test_does_not_cap_item_count() {
        let reply = (1..=7)
            .map(|i| format!("Item {i} || Thing number {i}"))
            .collect::<Vec<_>>()
            .join(" | ");
        assert_eq!(parse_reply(&reply).count(), 7);
    }

    #[test]
    fn test_trailing_separator_and_whitespace() {
        let recs: Vec<_> = parse_reply("  Tripod ||  Stable shots  |  ").collect();
        assert_eq!(recs, vec![rec("Tripod", "Stable shots")]);
    }

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let recs: Vec<_> = parse_reply("A || one | A || two").collect();
        assert_eq!(recs, vec![rec("A", "one"), rec("A", "two")]);
    }

    #[test]
    fn test_blank_halves_still_split() {
        let mut recs = parse_reply("|| | x || | || y | ||");
        // a bare "||" is two empty halves, which is still two parts
        assert_eq!(recs.next(), Some(rec("", "")));
        assert_eq!(recs.next(), Some(rec("x", "")));
        assert_eq!(recs.next(), Some(rec("", "y")));
        assert_eq!(recs.next(), Some(rec("", "")));
        assert_eq!(recs.next(), None);
    }

    #[test]
    fn test_parse_item_counts_separators() {
        assert_eq!(parse_item("Name || Desc"), Some(rec("Name", "Desc")));
        assert_eq!(parse_item("Name"), None);
        assert_eq!(parse_item("a || b || c"), None);
    }

    #[test]
    fn test_parsing_is_repeatable() {
        let reply = "Capture Card || Streams console games | nope | Stream Deck || One-tap scene switching";
        let first: Vec<_> = parse_reply(reply).collect();
        let second: Vec<_> = parse_reply(reply).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_search_link() {
        let affiliate = AffiliateConfig {
            tag: "mytag-20".to_string(),
            search_url: "https://www.amazon.com/s".to_string(),
        };
        assert_eq!(
            rec("Studio Microphone", "Clear audio").search_link(&affiliate),
            "https://www.amazon.com/s?k=Studio+Microphone&tag=mytag-20"
        );
    }
}
