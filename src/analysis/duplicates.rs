use crate::state::PageRecord;
use std::collections::BTreeMap;

/// A group of pages with identical visible text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCluster {
    pub body_hash: String,
    /// Final URLs in crawl order
    pub urls: Vec<String>,
}

/// Maps every body hash to the final URLs that produced it
///
/// Pages without a body hash (failed fetches, non-HTML responses) are left
/// out. URLs keep crawl order inside each bucket.
pub fn content_hash_index<'a, I>(pages: I) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = &'a PageRecord>,
{
    let mut index: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for page in pages {
        if page.body_hash.is_empty() {
            continue;
        }
        index
            .entry(page.body_hash.clone())
            .or_default()
            .push(page.final_url.clone());
    }
    index
}

/// Buckets of [`content_hash_index`] holding two or more URLs, ordered by hash
pub fn duplicate_clusters<'a, I>(pages: I) -> Vec<DuplicateCluster>
where
    I: IntoIterator<Item = &'a PageRecord>,
{
    content_hash_index(pages)
        .into_iter()
        .filter(|(_, urls)| urls.len() > 1)
        .map(|(body_hash, urls)| DuplicateCluster { body_hash, urls })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::parse_page;
    use url::Url;

    fn page(url: &str, html: &str) -> PageRecord {
        let parsed = parse_page(html, &Url::parse(url).unwrap());
        PageRecord {
            url: url.to_string(),
            final_url: url.to_string(),
            status: Some(200),
            body_hash: parsed.body_hash,
            ..PageRecord::default()
        }
    }

    #[test]
    fn test_whitespace_insensitive_grouping() {
        let pages = vec![
            page("https://e.com/a", "<body><p>Linen   shirt</p></body>"),
            page("https://e.com/b", "<body><div>Linen\nshirt</div></body>"),
            page("https://e.com/c", "<body><p>Cotton shirt</p></body>"),
        ];

        let clusters = duplicate_clusters(&pages);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].urls, vec!["https://e.com/a", "https://e.com/b"]);
    }

    #[test]
    fn test_index_keeps_singletons() {
        let pages = vec![
            page("https://e.com/a", "<p>one</p>"),
            page("https://e.com/b", "<p>two</p>"),
        ];
        let index = content_hash_index(&pages);
        assert_eq!(index.len(), 2);
        assert!(duplicate_clusters(&pages).is_empty());
    }

    #[test]
    fn test_failed_pages_are_not_duplicates() {
        let pages = vec![
            PageRecord::minimal("https://e.com/x"),
            PageRecord::minimal("https://e.com/y"),
        ];
        assert!(content_hash_index(&pages).is_empty());
    }
}
