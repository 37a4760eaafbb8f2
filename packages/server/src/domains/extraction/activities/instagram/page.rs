//! Fetching an Instagram post page and deriving its title and author.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use crate::common::Platform;
use crate::domains::extraction::activities::meta_tags::{handle_from, OpenGraph};
use crate::domains::extraction::error::{ExtractError, Result};
use crate::domains::extraction::headers::page_headers;
use crate::kernel::{BaseHttpClient, HttpRequest};

static RE_TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());
static RE_OWNER_USERNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""owner"\s*:\s*\{[^{}]*?"username"\s*:\s*"([^"]+)""#).unwrap()
});

/// A fetched post page.
#[derive(Debug, Clone)]
pub struct InstagramPage {
    /// URL the HTML was served from, after at most one redirect
    pub url: String,
    pub html: String,
}

impl InstagramPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    pub fn open_graph(&self) -> OpenGraph {
        OpenGraph::parse(&self.html)
    }

    /// `og:title`, else `<title>`, else `default`.
    pub fn title(&self, default: &str) -> String {
        self.open_graph()
            .title
            .or_else(|| {
                RE_TITLE_TAG
                    .captures(&self.html)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().trim().to_string())
            })
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// `@handle` from the title text, else the embedded owner username.
    pub fn author(&self) -> String {
        handle_from(&self.title(""))
            .or_else(|| {
                RE_OWNER_USERNAME
                    .captures(&self.html)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string())
            })
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// Turn a Location header into an absolute URL on the Instagram origin.
pub fn resolve_location(location: &str) -> Result<String> {
    let base = Url::parse(Platform::Instagram.origin())
        .map_err(|e| ExtractError::Parse(e.to_string()))?;
    base.join(location)
        .map(String::from)
        .map_err(|e| ExtractError::Parse(format!("bad redirect location {}: {}", location, e)))
}

fn page_request(url: &str, user_agent: &str) -> HttpRequest {
    HttpRequest::get(url)
        .headers(page_headers(Platform::Instagram, user_agent))
        .no_redirects()
}

/// Fetch the post page, following a single 301/302 by hand.
pub async fn fetch_post_page(
    http: &dyn BaseHttpClient,
    url: &str,
    user_agent: &str,
) -> Result<InstagramPage> {
    let mut final_url = url.to_string();
    let mut response = http.send(page_request(url, user_agent)).await?;

    if response.is_redirect() {
        let location = response
            .header("location")
            .ok_or(ExtractError::Parse("redirect without Location header".into()))?;
        final_url = resolve_location(location)?;
        debug!(from = %url, to = %final_url, "Following post redirect");
        response = http.send(page_request(&final_url, user_agent)).await?;
    }

    if !response.is_success() {
        return Err(ExtractError::UpstreamStatus {
            status: response.status,
        });
    }

    Ok(InstagramPage::new(final_url, response.text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_location() {
        assert_eq!(
            resolve_location("/p/Cxyz/").unwrap(),
            "https://www.instagram.com/p/Cxyz/"
        );
        assert_eq!(
            resolve_location("https://www.instagram.com/accounts/login/").unwrap(),
            "https://www.instagram.com/accounts/login/"
        );
    }

    #[test]
    fn test_title_and_author_fallbacks() {
        let page = InstagramPage::new(
            "https://www.instagram.com/p/x/",
            r#"<title>
                Sunset dump &#x2022; Instagram</title>
               <script>{"owner":{"id":"1","username":"travel.kim"}}</script>"#,
        );
        assert_eq!(page.title("Instagram Carousel"), "Sunset dump &#x2022; Instagram");
        assert_eq!(page.author(), "travel.kim");

        let tagged = InstagramPage::new(
            "https://www.instagram.com/p/y/",
            r#"<meta property="og:title" content="@chef on Instagram">"#,
        );
        assert_eq!(tagged.author(), "chef");

        let empty = InstagramPage::new("https://www.instagram.com/p/z/", "<html></html>");
        assert_eq!(empty.title("Instagram Reel"), "Instagram Reel");
        assert_eq!(empty.author(), "Unknown");
    }
}
