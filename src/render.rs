use askama::Template;

use crate::entry::Entry;
use crate::published::parse_rfc822;

pub const NO_ENTRIES_MESSAGE: &str = "記事が見つかりませんでした。";
pub const UNKNOWN_DATE: &str = "日付不明";
pub const PUBLISHED_LABEL: &str = "公開日";

#[derive(Template)]
#[template(path = "article_list.html")]
pub struct ArticleListTemplate<'a> {
    pub items: Vec<ListItem<'a>>,
    pub no_entries: &'static str,
    pub published_label: &'static str,
}

/// Viewer and link for the newest issue, which the feed links as a PDF.
#[derive(Template)]
#[template(path = "latest_issue.html")]
pub struct LatestIssueTemplate<'a> {
    pub latest: Option<ListItem<'a>>,
}

pub struct ListItem<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub date: String,
}

/// `YYYY/MM/DD` in the entry's own offset, or the unknown-date placeholder.
pub fn display_date(published: &str) -> String {
    parse_rfc822(published)
        .map(|dt| dt.format("%Y/%m/%d").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

impl<'a> From<&'a Entry> for ListItem<'a> {
    fn from(e: &'a Entry) -> Self {
        Self {
            title: &e.title,
            link: &e.link,
            date: display_date(&e.published),
        }
    }
}

/// Renders the article list fragment, preserving input order.
pub fn render_entries(entries: &[Entry]) -> askama::Result<String> {
    let items = entries.iter().map(ListItem::from).collect();

    ArticleListTemplate {
        items,
        no_entries: NO_ENTRIES_MESSAGE,
        published_label: PUBLISHED_LABEL,
    }
    .render()
}

/// Renders the viewer for the first (newest) entry; empty when there is none.
pub fn render_latest(entries: &[Entry]) -> askama::Result<String> {
    LatestIssueTemplate {
        latest: entries.first().map(ListItem::from),
    }
    .render()
}
