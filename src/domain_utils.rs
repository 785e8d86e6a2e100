/// Minimal domain string utilities shared by the extractor and scorers.
pub struct DomainUtils;

/// Punctuation commonly stuck to the end of a link pasted into prose.
const TRAILING_PUNCT: [char; 6] = ['.', ',', ';', ':', '!', ')'];

impl DomainUtils {
    /// Strip trailing `.,;:!)` characters from a raw link match.
    pub fn strip_trailing_punct(s: &str) -> &str {
        s.trim_end_matches(|c| TRAILING_PUNCT.contains(&c))
    }

    /// Reduce a URL or bare domain to its canonical host token.
    ///
    /// Strips trailing punctuation, a leading `http://`/`https://`, a leading
    /// `www.`, and anything from the first `/` on, then lowercases. Malformed
    /// input is not rejected; it simply yields a token that will never match
    /// a real domain list. Empty input yields an empty string.
    pub fn normalize_domain(url: &str) -> String {
        let mut rest = Self::strip_trailing_punct(url);
        for scheme in ["http://", "https://"] {
            if let Some(stripped) = strip_prefix_ignore_case(rest, scheme) {
                rest = stripped;
                break;
            }
        }
        if let Some(stripped) = strip_prefix_ignore_case(rest, "www.") {
            rest = stripped;
        }
        let host = rest.split('/').next().unwrap_or("");
        host.to_lowercase()
    }

    /// Extract the domain portion of an email address (everything after the
    /// last `@`), lowercased. An address without `@` degrades to the whole
    /// string rather than an error.
    pub fn sender_domain(email: &str) -> String {
        email.rsplit('@').next().unwrap_or(email).to_lowercase()
    }

    /// Split a domain into its sub-tokens on `.` and `-`.
    pub fn domain_tokens(domain: &str) -> Vec<&str> {
        domain.split(['.', '-']).collect()
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
    {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_domain() {
        assert_eq!(
            DomainUtils::normalize_domain("https://WWW.Example.com/login?x=1"),
            "example.com"
        );
        assert_eq!(
            DomainUtils::normalize_domain("http://example.com"),
            "example.com"
        );
        assert_eq!(
            DomainUtils::normalize_domain("www.example.com"),
            "example.com"
        );
        assert_eq!(DomainUtils::normalize_domain("example.com."), "example.com");
        assert_eq!(
            DomainUtils::normalize_domain("example.com),"),
            "example.com"
        );
        assert_eq!(DomainUtils::normalize_domain(""), "");
    }

    #[test]
    fn test_normalize_domain_is_idempotent() {
        for input in [
            "https://www.paypal.com/signin",
            "bare-domain.co.uk",
            "weird//input",
        ] {
            let once = DomainUtils::normalize_domain(input);
            assert_eq!(DomainUtils::normalize_domain(&once), once);
        }
    }

    #[test]
    fn test_normalize_malformed_input_passes_through() {
        // Not a hostname, but normalization must not reject it.
        assert_eq!(DomainUtils::normalize_domain("not a url"), "not a url");
    }

    #[test]
    fn test_sender_domain() {
        assert_eq!(
            DomainUtils::sender_domain("user@Example.COM"),
            "example.com"
        );
        assert_eq!(DomainUtils::sender_domain("a@b@evil.net"), "evil.net");
        // No '@' degrades to the whole string.
        assert_eq!(DomainUtils::sender_domain("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn test_domain_tokens() {
        assert_eq!(
            DomainUtils::domain_tokens("secure-paypal-login.com"),
            vec!["secure", "paypal", "login", "com"]
        );
        assert_eq!(
            DomainUtils::domain_tokens("gmail.com"),
            vec!["gmail", "com"]
        );
    }
}
