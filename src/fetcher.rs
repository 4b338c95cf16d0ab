use std::collections::HashMap;
use std::time::Duration;

use feed_rs::model::{Link, Text};
use feed_rs::parser;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::entry::RawEntry;
use crate::published::{PARSERS, RFC822_FORMAT};

const USER_AGENT: &str = "KanpoFeed/1.0 (Gazette Archiver)";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to parse feed: {0}")]
    Parse(#[from] parser::ParseFeedError),
}

pub struct Fetcher {
    client: Client,
    url: String,
}

impl Fetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Downloads and parses the feed. Nothing is filtered here.
    pub async fn fetch(&self) -> Result<Vec<RawEntry>, FetchError> {
        info!("Fetching feed: {}", self.url);

        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        let entries = Self::parse(&bytes)?;
        debug!("Parsed {} raw entries", entries.len());
        Ok(entries)
    }

    /// Parses an RSS/Atom document into raw entries.
    pub fn parse(xml_bytes: &[u8]) -> Result<Vec<RawEntry>, FetchError> {
        // feed_rs normalizes dates to UTC, keep the publisher's own text
        let pub_dates = Self::extract_pub_dates_from_xml(xml_bytes);

        let parsed = parser::Builder::new()
            .id_generator(link_as_id)
            .build()
            .parse(xml_bytes)?;

        let entries = parsed
            .entries
            .into_iter()
            .map(|entry| {
                let link = entry.links.first().map(|l| l.href.trim().to_string());

                // Raw text only when it still parses as a date
                let published = link
                    .as_ref()
                    .and_then(|l| pub_dates.get(l).cloned())
                    .filter(|raw| PARSERS.iter().any(|parse| parse(raw).is_some()))
                    .or_else(|| {
                        entry
                            .published
                            .map(|dt| dt.format(RFC822_FORMAT).to_string())
                    });

                RawEntry {
                    id: Some(entry.id),
                    title: entry.title.map(|t| t.content),
                    link,
                    published,
                }
            })
            .collect();

        Ok(entries)
    }

    /// Maps each RSS item's `<link>` to its raw `<pubDate>` text.
    pub fn extract_pub_dates_from_xml(xml_bytes: &[u8]) -> HashMap<String, String> {
        let mut pub_dates = HashMap::new();
        let xml_str = match std::str::from_utf8(xml_bytes) {
            Ok(s) => s,
            Err(_) => return pub_dates,
        };

        for item in Self::item_blocks(xml_str) {
            let link = Self::extract_xml_element(item, "link");
            let pub_date = Self::extract_xml_element(item, "pubDate");

            if let (Some(link), Some(pub_date)) = (link, pub_date) {
                if !pub_date.is_empty() {
                    pub_dates.insert(link, pub_date);
                }
            }
        }

        pub_dates
    }

    /// Bodies of every `<item>` element, attributes allowed on the open tag.
    pub fn item_blocks(xml: &str) -> Vec<&str> {
        let mut blocks = Vec::new();
        let mut rest = xml;

        while let Some(pos) = rest.find("<item") {
            let after = &rest[pos + "<item".len()..];
            let is_item_tag = after
                .chars()
                .next()
                .is_some_and(|c| c == '>' || c.is_whitespace());
            if !is_item_tag {
                rest = after;
                continue;
            }

            let Some(open_end) = after.find('>') else {
                break;
            };
            let body = &after[open_end + 1..];
            let body_end = body.find("</item>").unwrap_or(body.len());
            blocks.push(&body[..body_end]);
            rest = &body[body_end..];
        }

        blocks
    }

    pub fn extract_xml_element(xml: &str, tag: &str) -> Option<String> {
        let start_tag = format!("<{}>", tag);
        let end_tag = format!("</{}>", tag);

        let start = xml.find(&start_tag)? + start_tag.len();
        let end = xml[start..].find(&end_tag)? + start;

        let text = xml[start..end].trim();
        let text = text
            .strip_prefix("<![CDATA[")
            .and_then(|t| t.strip_suffix("]]>"))
            .unwrap_or(text);

        Some(text.trim().to_string())
    }
}

/// Entries without a feed id are keyed by their link.
fn link_as_id(links: &[Link], _title: &Option<Text>, _uri: Option<&str>) -> String {
    links
        .first()
        .map(|l| l.href.trim().to_string())
        .unwrap_or_default()
}
