//! URL resolution utilities.
//!
//! [§ 4.2.3 The base element](https://html.spec.whatwg.org/multipage/semantics.html#the-base-element)
//! [URL Standard](https://url.spec.whatwg.org/)
//!
//! Only reference resolution is needed here: attribute values such as
//! `href` and `src` are resolved against the document's base URI.

/// Resolve a potentially relative URL against a base URL.
///
/// Returns an empty string when `href` is relative and there is no usable
/// absolute base to resolve it against.
///
/// # Algorithm
///
/// [RFC 3986 § 5.2.2 Transform References](https://www.rfc-editor.org/rfc/rfc3986#section-5.2.2)
///
/// STEP 1: "If url is an absolute URL, return url."
///
/// STEP 2: "Otherwise, resolve url relative to base."
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    let href = href.trim();

    // STEP 1: Check if href is already absolute.
    //
    // [URL Standard § 4.3](https://url.spec.whatwg.org/#url-parsing)
    // "An absolute-URL string is a URL-scheme string, followed by U+003A (:),
    // followed by a scheme-specific part."
    if scheme_of(href).is_some() {
        return href.to_string();
    }

    let Some(base) = base_url.map(str::trim).filter(|b| scheme_of(b).is_some()) else {
        return String::new();
    };

    // STEP 2: Resolve relative URL against base.
    let parts = split_base(base);

    if href.is_empty() {
        return strip_fragment(base).to_string();
    }

    if let Some(rest) = href.strip_prefix("//") {
        // Protocol-relative URL - keep only the scheme of the base
        let (authority, path) = split_authority(rest);
        return format!(
            "{}://{authority}{}",
            parts.scheme,
            remove_dot_segments(path)
        );
    }

    if href.starts_with('#') {
        return format!("{}{href}", strip_fragment(base));
    }

    if href.starts_with('?') {
        return format!("{}{}{href}", parts.origin(), parts.path);
    }

    let (href_path, suffix) = split_suffix(href);
    let merged = if href_path.starts_with('/') {
        href_path.to_string()
    } else {
        // Relative path - join with base directory
        let base_dir = parts.path.rsplit_once('/').map_or("", |(dir, _)| dir);
        if parts.authority.is_some() && parts.path.is_empty() {
            format!("/{href_path}")
        } else {
            format!("{base_dir}/{href_path}")
        }
    };
    format!("{}{}{suffix}", parts.origin(), remove_dot_segments(&merged))
}

/// The pieces of an absolute base URL that resolution needs.
struct BaseParts<'a> {
    scheme: &'a str,
    authority: Option<&'a str>,
    path: &'a str,
}

impl BaseParts<'_> {
    fn origin(&self) -> String {
        self.authority.map_or_else(
            || format!("{}:", self.scheme),
            |authority| format!("{}://{authority}", self.scheme),
        )
    }
}

/// Returns the scheme of `url` if it starts with `scheme ":"`.
fn scheme_of(url: &str) -> Option<&str> {
    let colon = url.find(':')?;
    let scheme = &url[..colon];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        Some(scheme)
    } else {
        None
    }
}

fn split_base(base: &str) -> BaseParts<'_> {
    let scheme = scheme_of(base).unwrap_or_default();
    let rest = &base[scheme.len() + 1..];
    let rest = strip_suffix_parts(rest);
    if let Some(after) = rest.strip_prefix("//") {
        let (authority, path) = split_authority(after);
        BaseParts {
            scheme,
            authority: Some(authority),
            path,
        }
    } else {
        BaseParts {
            scheme,
            authority: None,
            path: rest,
        }
    }
}

fn split_authority(rest: &str) -> (&str, &str) {
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    rest.split_at(end)
}

/// Split a reference into its path and its `?query#fragment` suffix.
fn split_suffix(href: &str) -> (&str, &str) {
    let end = href.find(['?', '#']).unwrap_or(href.len());
    href.split_at(end)
}

fn strip_suffix_parts(url: &str) -> &str {
    split_suffix(url).0
}

fn strip_fragment(url: &str) -> &str {
    url.split_once('#').map_or(url, |(before, _)| before)
}

/// [RFC 3986 § 5.2.4 Remove Dot Segments](https://www.rfc-editor.org/rfc/rfc3986#section-5.2.4)
fn remove_dot_segments(path: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    let ends_with_slash = path.ends_with("/.") || path.ends_with("/..") || path.ends_with('/');
    for segment in path.split('/') {
        match segment {
            "." | "" => {}
            ".." => {
                let _ = output.pop();
            }
            other => output.push(other),
        }
    }
    let mut result = String::with_capacity(path.len());
    for segment in &output {
        result.push('/');
        result.push_str(segment);
    }
    if ends_with_slash || result.is_empty() {
        result.push('/');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://example.com/docs/guide/index.html?q=1#top";

    #[test]
    fn test_absolute_href_is_returned() {
        assert_eq!(
            resolve_url("https://other.org/x", Some(BASE)),
            "https://other.org/x"
        );
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            resolve_url("page.html", Some(BASE)),
            "http://example.com/docs/guide/page.html"
        );
    }

    #[test]
    fn test_dot_segments() {
        assert_eq!(
            resolve_url("../img/a.png", Some(BASE)),
            "http://example.com/docs/img/a.png"
        );
        assert_eq!(
            resolve_url("./a/./b/../c", Some(BASE)),
            "http://example.com/docs/guide/a/c"
        );
    }

    #[test]
    fn test_absolute_path() {
        assert_eq!(
            resolve_url("/root.css?v=2", Some(BASE)),
            "http://example.com/root.css?v=2"
        );
    }

    #[test]
    fn test_protocol_relative() {
        assert_eq!(
            resolve_url("//cdn.example.net/lib.js", Some(BASE)),
            "http://cdn.example.net/lib.js"
        );
    }

    #[test]
    fn test_query_and_fragment_only() {
        assert_eq!(
            resolve_url("?page=2", Some(BASE)),
            "http://example.com/docs/guide/index.html?page=2"
        );
        assert_eq!(
            resolve_url("#intro", Some(BASE)),
            "http://example.com/docs/guide/index.html?q=1#intro"
        );
    }

    #[test]
    fn test_host_without_path() {
        assert_eq!(
            resolve_url("a.html", Some("http://example.com")),
            "http://example.com/a.html"
        );
    }

    #[test]
    fn test_no_base_gives_empty() {
        assert_eq!(resolve_url("a.html", None), "");
        assert_eq!(resolve_url("a.html", Some("not a url")), "");
    }
}
