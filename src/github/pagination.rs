use reqwest::header::{HeaderMap, LINK};

/// Extracts the `rel="next"` target from a `Link` header value
///
/// `<https://api.github.com/user/repos?page=2>; rel="next", <...>; rel="last"`
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|param| match param.split_once('=') {
            Some((key, value)) if key.trim().eq_ignore_ascii_case("rel") => value
                .trim()
                .trim_matches('"')
                .split_whitespace()
                .any(|rel| rel.eq_ignore_ascii_case("next")),
            _ => false,
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

/// Next page URL advertised by a response, if any
pub fn next_page(headers: &HeaderMap) -> Option<String> {
    headers
        .get(LINK)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_next_link)
}
