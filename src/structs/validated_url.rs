use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

// IPv4 octets are only checked for 1-3 digits, "999.999.999.999" passes.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:http|ftp)s?://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)|",
        r"localhost|",
        r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
        r"(?::\d+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .expect("url regex")
});

/// Everything except unreserved characters and the `/`, `:`, `.` separators.
const QUERY_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'~')
    .remove(b'.')
    .remove(b'/')
    .remove(b':');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    pub original: String,
    pub encoded: Option<String>,
}

impl ValidatedUrl {
    pub fn new(input: &str) -> Self {
        let encoded = URL_PATTERN
            .is_match(input)
            .then(|| utf8_percent_encode(input, QUERY_SAFE).to_string());

        ValidatedUrl {
            original: input.to_string(),
            encoded,
        }
    }

    #[cfg(test)]
    pub fn is_valid(&self) -> bool {
        self.encoded.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_with_path_and_query() {
        let url = ValidatedUrl::new("https://example.com/path?q=1");
        assert_eq!(url.original, "https://example.com/path?q=1");
        assert_eq!(
            url.encoded.as_deref(),
            Some("https://example.com/path%3Fq%3D1")
        );
    }

    #[test]
    fn plain_text_is_rejected() {
        let url = ValidatedUrl::new("not a url");
        assert!(!url.is_valid());
        assert_eq!(url.encoded, None);
        assert_eq!(url.original, "not a url");
    }

    #[test]
    fn dotted_quad_with_port() {
        let url = ValidatedUrl::new("ftp://192.168.1.1:21/");
        assert_eq!(url.encoded.as_deref(), Some("ftp://192.168.1.1:21/"));
    }

    #[test]
    fn octets_are_not_range_checked() {
        assert!(ValidatedUrl::new("http://999.999.999.999").is_valid());
    }

    #[test]
    fn accepted_shapes() {
        for input in [
            "http://localhost",
            "HTTPS://EXAMPLE.COM",
            "ftps://files.example.org:990/pub",
            "https://sub-domain.example.co.uk/a/b",
            "http://example.com.",
            "https://example.com/",
            "https://example.com?x=y",
        ] {
            assert!(ValidatedUrl::new(input).is_valid(), "{input}");
        }
    }

    #[test]
    fn rejected_shapes() {
        for input in [
            "",
            "example.com",
            "gopher://example.com",
            "https://-bad.example.com",
            "https://bad-.example.com",
            "https://example",
            "https://example.com/with space",
            "https://example.com:port",
        ] {
            assert!(!ValidatedUrl::new(input).is_valid(), "{input}");
        }
    }

    #[test]
    fn reserved_characters_are_encoded() {
        let url = ValidatedUrl::new("https://example.com/a?b=c&d=%20#frag");
        assert_eq!(
            url.encoded.as_deref(),
            Some("https://example.com/a%3Fb%3Dc%26d%3D%2520%23frag")
        );
    }
}
