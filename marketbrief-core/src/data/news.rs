//! Google News RSS search feeds.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{FetchError, HttpClient};
use crate::domain::NewsItem;

fn search_url(query: &str) -> String {
    format!(
        "https://news.google.com/rss/search?q={}&hl=en-US&gl=US&ceid=US:en",
        urlencoding::encode(query)
    )
}

/// Which child of `<item>` is currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemField {
    Title,
    Link,
    PubDate,
}

/// Pull items out of the first `limit` `<item>` elements of an RSS document.
///
/// The cap applies to raw items: entries missing a title or link are
/// dropped *after* counting, so the result can hold fewer than `limit`
/// entries. Titles arriving as CDATA or entity-escaped text are
/// normalized. Only `<item>` children are read, so the channel-level
/// `<title>` never leaks into the results.
pub fn parse_rss_items(xml: &str, limit: usize) -> Result<Vec<NewsItem>, FetchError> {
    let mut reader = Reader::from_str(xml);
    let mut items = Vec::new();
    if limit == 0 {
        return Ok(items);
    }
    let mut seen = 0usize;

    let mut in_item = false;
    let mut field: Option<ItemField> = None;
    let mut title = String::new();
    let mut link = String::new();
    let mut pub_date = String::new();

    loop {
        match reader.read_event() {
            Err(e) => return Err(FetchError::MalformedPayload(e.to_string())),
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"item" => {
                    in_item = true;
                    title.clear();
                    link.clear();
                    pub_date.clear();
                }
                b"title" if in_item => field = Some(ItemField::Title),
                b"link" if in_item => field = Some(ItemField::Link),
                b"pubDate" if in_item => field = Some(ItemField::PubDate),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"item" => {
                    in_item = false;
                    seen += 1;
                    let (t, l) = (title.trim(), link.trim());
                    if !t.is_empty() && !l.is_empty() {
                        items.push(NewsItem {
                            title: t.to_string(),
                            link: l.to_string(),
                            pub_date: pub_date.trim().to_string(),
                        });
                    }
                    if seen >= limit {
                        break;
                    }
                }
                b"title" | b"link" | b"pubDate" => field = None,
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if in_item {
                    if let Some(f) = field {
                        let text = t
                            .unescape()
                            .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;
                        push_field(f, &text, &mut title, &mut link, &mut pub_date);
                    }
                }
            }
            Ok(Event::CData(t)) => {
                if in_item {
                    if let Some(f) = field {
                        let bytes = t.into_inner();
                        let text = String::from_utf8_lossy(&bytes);
                        push_field(f, &text, &mut title, &mut link, &mut pub_date);
                    }
                }
            }
            Ok(_) => {}
        }
    }

    Ok(items)
}

fn push_field(
    field: ItemField,
    text: &str,
    title: &mut String,
    link: &mut String,
    pub_date: &mut String,
) {
    match field {
        ItemField::Title => title.push_str(text),
        ItemField::Link => link.push_str(text),
        ItemField::PubDate => pub_date.push_str(text),
    }
}

/// Fetch a topic search feed. Degrades to an empty list on any failure.
pub fn search_feed(client: &HttpClient, query: &str, limit: usize) -> Vec<NewsItem> {
    let fetched = client
        .get_text(&search_url(query))
        .and_then(|xml| parse_rss_items(&xml, limit));

    match fetched {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(query, error = %e, "news feed fetch failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Channel title must not leak</title>
  <item>
    <title>Fed holds rates steady</title>
    <link>https://example.com/fed</link>
    <pubDate>Tue, 17 Jun 2025 13:00:00 GMT</pubDate>
  </item>
  <item>
    <title><![CDATA[Treasury yields &amp; the dollar]]></title>
    <link>https://example.com/yields</link>
    <pubDate>Tue, 17 Jun 2025 12:00:00 GMT</pubDate>
  </item>
  <item>
    <title></title>
    <link>https://example.com/untitled</link>
    <pubDate>Tue, 17 Jun 2025 11:00:00 GMT</pubDate>
  </item>
  <item>
    <title>No link on this one</title>
    <link></link>
  </item>
  <item>
    <title>Third usable item</title>
    <link>https://example.com/third</link>
    <pubDate>Tue, 17 Jun 2025 10:00:00 GMT</pubDate>
  </item>
</channel></rss>"#;

    #[test]
    fn items_are_extracted_in_document_order() {
        let items = parse_rss_items(FEED, 10).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "Fed holds rates steady");
        assert_eq!(items[0].link, "https://example.com/fed");
        assert_eq!(items[0].pub_date, "Tue, 17 Jun 2025 13:00:00 GMT");
        assert_eq!(items[2].title, "Third usable item");
    }

    #[test]
    fn cdata_titles_are_kept_verbatim() {
        let items = parse_rss_items(FEED, 10).unwrap();
        assert_eq!(items[1].title, "Treasury yields &amp; the dollar");
    }

    #[test]
    fn empty_title_or_link_is_filtered_out() {
        let items = parse_rss_items(FEED, 10).unwrap();
        assert!(items.iter().all(|i| !i.title.is_empty()));
        assert!(items.iter().all(|i| !i.link.is_empty()));
        assert!(!items.iter().any(|i| i.link.contains("untitled")));
    }

    #[test]
    fn limit_caps_the_item_count() {
        let items = parse_rss_items(FEED, 2).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn limit_counts_raw_items_not_surviving_ones() {
        // The window is the first `limit` raw items; dropped empties are
        // not replaced from beyond it, so the result can come up short.
        let items = parse_rss_items(FEED, 4).unwrap();
        assert_eq!(items.len(), 2);
        assert!(!items.iter().any(|i| i.title == "Third usable item"));
    }

    #[test]
    fn mismatched_tags_are_malformed_payload() {
        let broken = "<rss><channel><item><title>half</link></item></channel></rss>";
        assert!(matches!(
            parse_rss_items(broken, 5),
            Err(FetchError::MalformedPayload(_))
        ));
    }

    #[test]
    fn query_is_url_encoded() {
        let url = search_url("US stocks OR treasury yields when:1d");
        assert!(url.contains("q=US%20stocks%20OR%20treasury%20yields%20when%3A1d"));
    }
}
