/// Build an outbound store search link for a product name, carrying the
/// affiliate tag. Spaces in the name become `+`, everything else is
/// percent-encoded.
pub fn search_link(search_url: &str, name: &str, tag: &str) -> String {
    let query = name
        .split(' ')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("+");
    let separator = if search_url.contains('?') { '&' } else { '?' };
    format!(
        "{search_url}{separator}k={query}&tag={tag}",
        tag = urlencoding::encode(tag)
    )
}
