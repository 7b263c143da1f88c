use url::Url;

/// Link targets always leave the widget.
pub const LINK_TARGET: &str = "_blank";
pub const LINK_REL: &str = "noopener noreferrer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// First-party storefront link, drawn as a button.
    CallToAction,
    Plain,
}

/// Decides which links point at the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPolicy {
    storefront_domain: String,
}

impl LinkPolicy {
    pub fn new(storefront_domain: &str) -> Self {
        Self {
            storefront_domain: storefront_domain.trim().trim_start_matches("www.").to_lowercase(),
        }
    }

    /// The host must be the storefront domain or one of its subdomains; a
    /// domain that merely appears in the path or query does not count.
    pub fn classify(&self, href: &str) -> LinkStyle {
        let Ok(url) = Url::parse(href.trim()) else {
            return LinkStyle::Plain;
        };
        if !matches!(url.scheme(), "http" | "https") {
            return LinkStyle::Plain;
        }
        match url.host_str() {
            Some(host) if self.is_storefront_host(host) => LinkStyle::CallToAction,
            _ => LinkStyle::Plain,
        }
    }

    fn is_storefront_host(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        host == self.storefront_domain
            || host
                .strip_suffix(&self.storefront_domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}
