//! HTTP feed source with RSS and Atom parsing

use async_trait::async_trait;
use tracing::debug;

use super::{EpisodeInfo, FeedSource, ShowInfo, UNTITLED_SHOW};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::utils::build_http_client;

/// Show metadata and episodes parsed from one feed document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedFeed {
    /// Show-level metadata
    pub show: ShowInfo,
    /// Episodes in document order
    pub episodes: Vec<EpisodeInfo>,
}

/// Feed source fetching documents over HTTP
pub struct RssFeedSource {
    http_client: reqwest::Client,
}

impl RssFeedSource {
    /// Create a feed source using the download settings from `config`
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http_client: build_http_client(&config.download)?,
        })
    }

    /// Fetch and parse a feed
    pub async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        debug!(url, "fetching feed");

        let response = self.http_client.get(url).send().await?;

        // Check HTTP status before trying to parse the response body
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Feed(format!(
                "feed returned HTTP {}: {}",
                status.as_u16(),
                url
            )));
        }

        let content = response.text().await?;
        parse_feed(&content)
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    async fn resolve_show(&self, url: &str) -> Result<ShowInfo> {
        Ok(self.fetch(url).await?.show)
    }

    async fn list_episodes(&self, url: &str) -> Result<Vec<EpisodeInfo>> {
        Ok(self.fetch(url).await?.episodes)
    }
}

/// Parse a feed document, trying RSS first and then Atom
pub fn parse_feed(content: &str) -> Result<ParsedFeed> {
    match parse_as_rss(content) {
        Ok(feed) => {
            debug!(
                episodes = feed.episodes.len(),
                "parsed feed as RSS"
            );
            Ok(feed)
        }
        Err(rss_err) => {
            debug!(error = %rss_err, "failed to parse as RSS, trying Atom");
            match parse_as_atom(content) {
                Ok(feed) => {
                    debug!(
                        episodes = feed.episodes.len(),
                        "parsed feed as Atom"
                    );
                    Ok(feed)
                }
                Err(atom_err) => Err(Error::Feed(format!(
                    "failed to parse feed as RSS or Atom. RSS error: {}. Atom error: {}",
                    rss_err, atom_err
                ))),
            }
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_as_rss(content: &str) -> std::result::Result<ParsedFeed, rss::Error> {
    let channel = content.parse::<rss::Channel>()?;

    let image = channel
        .itunes_ext()
        .and_then(|ext| ext.image())
        .and_then(non_empty)
        .or_else(|| channel.image().and_then(|img| non_empty(img.url())));

    let show = ShowInfo {
        title: non_empty(channel.title()).unwrap_or_else(|| UNTITLED_SHOW.to_string()),
        description: non_empty(channel.description()),
        image,
    };

    let episodes = channel
        .items()
        .iter()
        .filter_map(|item| {
            // Titles identify episodes; an untitled item cannot be selected
            let title = item.title().and_then(non_empty)?;
            Some(EpisodeInfo {
                title,
                audio_url: item.enclosure().and_then(|enc| non_empty(enc.url())),
                image: item
                    .itunes_ext()
                    .and_then(|ext| ext.image())
                    .and_then(non_empty),
                description: item.description().and_then(non_empty),
            })
        })
        .collect();

    Ok(ParsedFeed { show, episodes })
}

fn parse_as_atom(content: &str) -> std::result::Result<ParsedFeed, atom_syndication::Error> {
    let feed = atom_syndication::Feed::read_from(content.as_bytes())?;

    let show = ShowInfo {
        title: non_empty(feed.title().as_str()).unwrap_or_else(|| UNTITLED_SHOW.to_string()),
        description: feed.subtitle().and_then(|s| non_empty(s.as_str())),
        image: feed.logo().or(feed.icon()).and_then(non_empty),
    };

    let episodes = feed
        .entries()
        .iter()
        .filter_map(|entry| {
            let title = non_empty(entry.title().as_str())?;
            let audio_url = entry
                .links()
                .iter()
                .find(|link| link.rel() == "enclosure")
                .and_then(|link| non_empty(link.href()));
            Some(EpisodeInfo {
                title,
                audio_url,
                image: None,
                description: entry.summary().and_then(|s| non_empty(s.as_str())),
            })
        })
        .collect();

    Ok(ParsedFeed { show, episodes })
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RSS_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
  <channel>
    <title>Night Show</title>
    <link>https://example.com</link>
    <description>Stories after dark</description>
    <itunes:image href="https://example.com/show.jpg"/>
    <item>
      <title>Ep3</title>
      <description>Third</description>
      <enclosure url="https://example.com/ep3.mp3" length="10" type="audio/mpeg"/>
      <itunes:image href="https://example.com/ep3.jpg"/>
    </item>
    <item>
      <title>Ep2</title>
      <enclosure url="https://example.com/ep2.mp3" length="10" type="audio/mpeg"/>
    </item>
    <item>
      <title>Trailer</title>
    </item>
    <item>
      <description>no title here</description>
    </item>
  </channel>
</rss>"#;

    const ATOM_FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Show</title>
  <subtitle>Atom description</subtitle>
  <id>urn:uuid:1</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <logo>https://example.com/logo.png</logo>
  <entry>
    <title>Atom Ep1</title>
    <id>urn:uuid:2</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <summary>First atom episode</summary>
    <link rel="enclosure" href="https://example.com/a1.mp3" type="audio/mpeg"/>
  </entry>
</feed>"#;

    #[test]
    fn rss_feed_keeps_document_order_and_metadata() {
        let feed = parse_feed(RSS_FEED).unwrap();

        assert_eq!(feed.show.title, "Night Show");
        assert_eq!(feed.show.description.as_deref(), Some("Stories after dark"));
        assert_eq!(feed.show.image.as_deref(), Some("https://example.com/show.jpg"));

        let titles: Vec<_> = feed.episodes.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Ep3", "Ep2", "Trailer"]);

        let ep3 = &feed.episodes[0];
        assert_eq!(ep3.audio_url.as_deref(), Some("https://example.com/ep3.mp3"));
        assert_eq!(ep3.image.as_deref(), Some("https://example.com/ep3.jpg"));
        assert_eq!(ep3.description.as_deref(), Some("Third"));

        assert!(feed.episodes[2].audio_url.is_none(), "trailer has no enclosure");
    }

    #[test]
    fn rss_feed_without_title_is_untitled() {
        let xml = r#"<rss version="2.0"><channel><title></title><link>x</link><description></description></channel></rss>"#;
        let feed = parse_feed(xml).unwrap();
        assert_eq!(feed.show.title, UNTITLED_SHOW);
        assert!(feed.show.description.is_none());
        assert!(feed.episodes.is_empty());
    }

    #[test]
    fn atom_feed_is_parsed_as_fallback() {
        let feed = parse_feed(ATOM_FEED).unwrap();
        assert_eq!(feed.show.title, "Atom Show");
        assert_eq!(feed.show.description.as_deref(), Some("Atom description"));
        assert_eq!(feed.show.image.as_deref(), Some("https://example.com/logo.png"));
        assert_eq!(feed.episodes.len(), 1);
        assert_eq!(
            feed.episodes[0].audio_url.as_deref(),
            Some("https://example.com/a1.mp3")
        );
    }

    #[test]
    fn garbage_is_a_feed_error() {
        let err = parse_feed("this is not xml").unwrap_err();
        assert!(matches!(err, Error::Feed(_)));
    }

    #[tokio::test]
    async fn source_fetches_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RSS_FEED))
            .mount(&server)
            .await;

        let source = RssFeedSource::new(&Config::default()).unwrap();
        let url = format!("{}/feed.xml", server.uri());

        let show = source.resolve_show(&url).await.unwrap();
        assert_eq!(show.title, "Night Show");

        let episodes = source.list_episodes(&url).await.unwrap();
        assert_eq!(episodes.len(), 3);
    }

    #[tokio::test]
    async fn http_error_status_is_a_feed_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = RssFeedSource::new(&Config::default()).unwrap();
        let err = source
            .list_episodes(&format!("{}/feed.xml", server.uri()))
            .await
            .unwrap_err();

        match err {
            Error::Feed(msg) => assert!(msg.contains("503"), "unexpected message: {msg}"),
            other => panic!("expected feed error, got {other:?}"),
        }
    }
}
