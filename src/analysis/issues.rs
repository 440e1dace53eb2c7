//! Rule-based issue scoring
//!
//! Every page is checked against title and meta description rules. Each
//! finding carries a severity and the page's top severity is the maximum.

use crate::config::LimitsConfig;
use crate::state::PageRecord;
use std::collections::HashMap;
use std::fmt;

/// Characters that should not end a title
const TITLE_SEPARATORS: &[char] = &['-', '–', '—', '|', ':'];

/// Issue severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Minor,
    Moderate,
    Major,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Self::Info,
        Self::Minor,
        Self::Moderate,
        Self::Major,
        Self::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Minor => "Minor",
            Self::Moderate => "Moderate",
            Self::Major => "Major",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rule an issue was raised by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    TitleTooShort,
    TitleTooLong,
    TitleEndsWithSeparator,
    DescriptionTooShort,
    DescriptionTooLong,
    DuplicateTitle,
    DuplicateDescription,
}

impl IssueKind {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::TitleTooShort => "Title too short",
            Self::TitleTooLong => "Title too long",
            Self::TitleEndsWithSeparator => "Title ends with separator",
            Self::DescriptionTooShort => "Meta description too short",
            Self::DescriptionTooLong => "Meta description too long",
            Self::DuplicateTitle => "Duplicate title",
            Self::DuplicateDescription => "Duplicate meta description",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::DuplicateTitle => Severity::Moderate,
            _ => Severity::Minor,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// One finding on one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: IssueKind,
    pub details: String,
    pub severity: Severity,
}

impl Issue {
    fn new(kind: IssueKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            details: details.into(),
            severity: kind.severity(),
        }
    }
}

/// All findings for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageIssues {
    /// Final URL of the page
    pub url: String,
    pub top_severity: Severity,
    pub issues: Vec<Issue>,
}

/// Values appearing (case-insensitively, trimmed) on two or more pages
pub(crate) fn shared_values<'a, I>(values: I) -> HashMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        let key = value.trim().to_lowercase();
        if !key.is_empty() {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    counts.retain(|_, count| *count > 1);
    counts
}

/// Returns true if the trimmed title ends with a separator character
pub fn ends_with_separator(title: &str) -> bool {
    title.trim_end().ends_with(TITLE_SEPARATORS)
}

/// Last `n` characters of a string
fn tail(text: &str, n: usize) -> String {
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(n)).collect()
}

/// Length findings for a trimmed value; empty values raise nothing
fn length_issue(
    len: usize,
    min: usize,
    max: usize,
    too_short: IssueKind,
    too_long: IssueKind,
) -> Option<Issue> {
    if len > 0 && len < min {
        Some(Issue::new(too_short, format!("{} chars (<{})", len, min)))
    } else if len > max {
        Some(Issue::new(too_long, format!("{} chars (>{})", len, max)))
    } else {
        None
    }
}

/// Scores every page and returns those with at least one finding
///
/// # Rules
///
/// | Rule | Reason | Severity |
/// |------|--------|----------|
/// | `0 < title chars < title-min` | Title too short | Minor |
/// | `title chars > title-max` | Title too long | Minor |
/// | trimmed title ends with `- – — \| :` | Title ends with separator | Minor |
/// | `0 < description chars < meta-min` | Meta description too short | Minor |
/// | `description chars > meta-max` | Meta description too long | Minor |
/// | title shared by 2+ pages | Duplicate title | Moderate |
/// | description shared by 2+ pages | Duplicate meta description | Minor |
///
/// Duplicates compare trimmed, lowercased values across the given pages.
/// Results keep crawl order.
pub fn build_issues<'a, I>(pages: I, limits: &LimitsConfig) -> Vec<PageIssues>
where
    I: IntoIterator<Item = &'a PageRecord>,
{
    let pages: Vec<&PageRecord> = pages.into_iter().collect();
    let shared_titles = shared_values(pages.iter().map(|p| p.title.as_str()));
    let shared_descriptions = shared_values(pages.iter().map(|p| p.meta_description.as_str()));

    let mut results = Vec::new();

    for page in pages {
        let title = page.title.trim();
        let description = page.meta_description.trim();
        let mut issues = Vec::new();

        issues.extend(length_issue(
            title.chars().count(),
            limits.title_min,
            limits.title_max,
            IssueKind::TitleTooShort,
            IssueKind::TitleTooLong,
        ));

        if ends_with_separator(title) {
            issues.push(Issue::new(IssueKind::TitleEndsWithSeparator, tail(title, 6)));
        }

        issues.extend(length_issue(
            description.chars().count(),
            limits.meta_min,
            limits.meta_max,
            IssueKind::DescriptionTooShort,
            IssueKind::DescriptionTooLong,
        ));

        if !title.is_empty() && shared_titles.contains_key(&title.to_lowercase()) {
            issues.push(Issue::new(IssueKind::DuplicateTitle, "Appears on multiple URLs"));
        }
        if !description.is_empty() && shared_descriptions.contains_key(&description.to_lowercase()) {
            issues.push(Issue::new(
                IssueKind::DuplicateDescription,
                "Appears on multiple URLs",
            ));
        }

        if let Some(top_severity) = issues.iter().map(|issue| issue.severity).max() {
            results.push(PageIssues {
                url: page.final_url.clone(),
                top_severity,
                issues,
            });
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, title: &str, description: &str) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            final_url: url.to_string(),
            status: Some(200),
            title: title.to_string(),
            meta_description: description.to_string(),
            ..PageRecord::default()
        }
    }

    fn ok_description() -> String {
        "d".repeat(150)
    }

    fn kinds(issues: &PageIssues) -> Vec<IssueKind> {
        issues.issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Info < Severity::Minor);
        assert!(Severity::Minor < Severity::Moderate);
        assert!(Severity::Major < Severity::Critical);
        assert_eq!(Severity::ALL.iter().max(), Some(&Severity::Critical));
    }

    #[test]
    fn test_title_length_boundaries() {
        let limits = LimitsConfig::default();
        let pages = vec![
            page("https://e.com/50", &"a".repeat(50), &ok_description()),
            page("https://e.com/60", &"b".repeat(60), &format!("{}x", ok_description())),
            page("https://e.com/49", &"c".repeat(49), &format!("{}y", ok_description())),
            page("https://e.com/61", &"d".repeat(61), &format!("{}z", ok_description())),
        ];

        let results = build_issues(&pages, &limits);
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].url, "https://e.com/49");
        assert_eq!(kinds(&results[0]), vec![IssueKind::TitleTooShort]);
        assert_eq!(results[0].issues[0].details, "49 chars (<50)");

        assert_eq!(results[1].url, "https://e.com/61");
        assert_eq!(kinds(&results[1]), vec![IssueKind::TitleTooLong]);
        assert_eq!(results[1].issues[0].details, "61 chars (>60)");
    }

    #[test]
    fn test_title_counts_characters_not_bytes() {
        let limits = LimitsConfig::default();
        let pages = vec![page("https://e.com/", &"é".repeat(55), &ok_description())];
        assert!(build_issues(&pages, &limits).is_empty());
    }

    #[test]
    fn test_empty_title_and_description_raise_nothing() {
        let limits = LimitsConfig::default();
        let pages = vec![page("https://e.com/a", "", ""), page("https://e.com/b", "  ", "")];
        assert!(build_issues(&pages, &limits).is_empty());
    }

    #[test]
    fn test_trailing_separator() {
        let limits = LimitsConfig::default();
        let title = format!("{} |", "t".repeat(52));
        let pages = vec![page("https://e.com/", &title, &ok_description())];

        let results = build_issues(&pages, &limits);
        assert_eq!(kinds(&results[0]), vec![IssueKind::TitleEndsWithSeparator]);
        assert_eq!(results[0].issues[0].details, "tttt |");
        assert!(ends_with_separator("Shop — "));
        assert!(!ends_with_separator("Shop"));
    }

    #[test]
    fn test_description_length_uses_min_in_details() {
        let limits = LimitsConfig::default();
        let pages = vec![
            page("https://e.com/a", &"a".repeat(55), &"s".repeat(20)),
            page("https://e.com/b", &"b".repeat(55), &"l".repeat(160)),
        ];

        let results = build_issues(&pages, &limits);
        assert_eq!(kinds(&results[0]), vec![IssueKind::DescriptionTooShort]);
        assert_eq!(results[0].issues[0].details, "20 chars (<140)");
        assert_eq!(kinds(&results[1]), vec![IssueKind::DescriptionTooLong]);
        assert_eq!(results[1].issues[0].details, "160 chars (>155)");
    }

    #[test]
    fn test_duplicates_case_insensitive() {
        let limits = LimitsConfig::default();
        let title = "Linen Shirts for Summer Days | Example Clothing Store";
        let pages = vec![
            page("https://e.com/a", title, &ok_description()),
            page("https://e.com/b", &format!("  {}  ", title.to_uppercase()), &ok_description()),
            page("https://e.com/c", "Something Else Entirely For This Page Of The Store", "other"),
        ];

        let results = build_issues(&pages, &limits);
        let a = &results[0];
        assert_eq!(
            kinds(a),
            vec![IssueKind::DuplicateTitle, IssueKind::DuplicateDescription]
        );
        assert_eq!(a.top_severity, Severity::Moderate);
        assert_eq!(results[1].url, "https://e.com/b");
        assert_eq!(results[1].top_severity, Severity::Moderate);
        assert_eq!(results[2].url, "https://e.com/c");
        assert_eq!(kinds(&results[2]), vec![IssueKind::DescriptionTooShort]);
    }
}
