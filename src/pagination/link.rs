//! Link header parsing (RFC 5988)
//!
//! Format: `<https://api.github.com/...?page=2>; rel="next", <...>; rel="last"`

/// One entry of a Link header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Target URL, as written between the angle brackets
    pub url: String,
    /// Relation types (a single `rel` may list several, space separated)
    pub rels: Vec<String>,
}

impl Link {
    /// Check if this link carries the given relation (case-insensitive)
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

/// Parse a Link header into its entries
///
/// Entries are delimited by their `<url>` part rather than by commas, so URLs
/// whose query strings contain commas survive intact. `<`, `;` and `,` inside
/// quoted parameter values are not delimiters. Malformed trailing input is
/// ignored.
pub fn parse_link_header(header: &str) -> Vec<Link> {
    let mut links = Vec::new();
    let mut rest = header;

    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            break;
        };

        let url = after[..end].trim().to_string();
        let tail = &after[end + 1..];
        let params_end = next_entry(tail);

        let mut rels = Vec::new();
        for param in split_params(&tail[..params_end]) {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            if key.trim().eq_ignore_ascii_case("rel") {
                let value = value
                    .trim()
                    .trim_end_matches(',')
                    .trim()
                    .trim_matches('"')
                    .trim_matches('\'');
                rels.extend(value.split_whitespace().map(str::to_string));
            }
        }

        links.push(Link { url, rels });
        rest = &tail[params_end..];
    }

    links
}

/// Offset of the next unquoted `<`, or the end of the input
fn next_entry(params: &str) -> usize {
    let mut quoted = false;
    let mut escaped = false;

    for (i, c) in params.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            '<' if !quoted => return i,
            _ => {}
        }
    }

    params.len()
}

/// Split link parameters on unquoted `;`
fn split_params(params: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quoted = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in params.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                parts.push(&params[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&params[start..]);

    parts
}

/// Find the URL for the given relation in a Link header
pub fn find_rel(header: &str, rel: &str) -> Option<String> {
    parse_link_header(header)
        .into_iter()
        .find(|link| link.has_rel(rel))
        .map(|link| link.url)
}

/// Read the `page` query parameter of a URL
///
/// Works for absolute and relative URLs. Returns `None` when the parameter
/// is missing or not a non-negative integer.
pub fn page_number(url: &str) -> Option<u64> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let (_, query) = without_fragment.split_once('?')?;

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.trim().parse().ok())
}
