use crate::analysis::issues::{ends_with_separator, shared_values};
use crate::config::LimitsConfig;
use crate::state::{ImageInfo, PageRecord};

/// Image file extensions considered web-friendly
const GOOD_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "avif"];

/// Title, description and image hygiene metrics for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityRecord {
    pub url: String,

    pub title: String,
    pub title_length: usize,
    pub title_too_short: bool,
    pub title_too_long: bool,
    pub title_trailing_separator: bool,
    pub title_duplicate: bool,

    pub description: String,
    pub description_length: usize,
    pub description_too_short: bool,
    pub description_too_long: bool,
    pub description_duplicate: bool,

    pub image_count: usize,
    pub images_missing_alt: usize,
    /// Non-empty alts shorter than alt-min
    pub alts_too_short: usize,
    /// Alts longer than alt-max
    pub alts_too_long: usize,
    pub filenames_with_spaces: usize,
    pub filenames_with_uppercase: usize,
    pub filenames_with_underscores: usize,
    pub filenames_bad_extension: usize,
}

/// Hygiene flags for one image on one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDetail {
    /// Final URL of the page the image appears on
    pub page_url: String,
    pub src: String,
    pub alt: String,
    pub alt_length: usize,
    pub filename: String,
    pub has_spaces: bool,
    pub has_uppercase: bool,
    pub has_underscore: bool,
    pub bad_extension: bool,
    pub alt_too_short: bool,
    pub alt_too_long: bool,
}

impl ImageDetail {
    fn new(page_url: &str, image: &ImageInfo, limits: &LimitsConfig) -> Self {
        let alt_length = image.alt.chars().count();
        let filename = image.filename.as_str();

        Self {
            page_url: page_url.to_string(),
            src: image.src.clone(),
            alt: image.alt.clone(),
            alt_length,
            filename: filename.to_string(),
            has_spaces: filename.contains(' '),
            has_uppercase: filename.chars().any(char::is_uppercase),
            has_underscore: filename.contains('_'),
            bad_extension: !has_good_extension(filename),
            alt_too_short: alt_length > 0 && alt_length < limits.alt_min,
            alt_too_long: alt_length > limits.alt_max,
        }
    }
}

/// Returns true if the filename ends in a web image extension, ignoring case
pub fn has_good_extension(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => GOOD_IMAGE_EXTENSIONS
            .iter()
            .any(|good| ext.eq_ignore_ascii_case(good)),
        None => false,
    }
}

/// Builds quality records and per-image details
///
/// Duplicate flags compare trimmed, lowercased values across the given
/// pages. Image hygiene is reported here only; it never raises issues.
pub fn build_quality<'a, I>(pages: I, limits: &LimitsConfig) -> (Vec<QualityRecord>, Vec<ImageDetail>)
where
    I: IntoIterator<Item = &'a PageRecord>,
{
    let pages: Vec<&PageRecord> = pages.into_iter().collect();
    let shared_titles = shared_values(pages.iter().map(|p| p.title.as_str()));
    let shared_descriptions = shared_values(pages.iter().map(|p| p.meta_description.as_str()));

    let mut records = Vec::with_capacity(pages.len());
    let mut details = Vec::new();

    for page in pages {
        let title = page.title.trim();
        let description = page.meta_description.trim();
        let title_length = title.chars().count();
        let description_length = description.chars().count();

        let page_details: Vec<ImageDetail> = page
            .images
            .iter()
            .map(|image| ImageDetail::new(&page.final_url, image, limits))
            .collect();
        let count = |flag: fn(&ImageDetail) -> bool| page_details.iter().filter(|d| flag(d)).count();

        records.push(QualityRecord {
            url: page.final_url.clone(),
            title: title.to_string(),
            title_length,
            title_too_short: title_length > 0 && title_length < limits.title_min,
            title_too_long: title_length > limits.title_max,
            title_trailing_separator: ends_with_separator(title),
            title_duplicate: !title.is_empty() && shared_titles.contains_key(&title.to_lowercase()),
            description: description.to_string(),
            description_length,
            description_too_short: description_length > 0 && description_length < limits.meta_min,
            description_too_long: description_length > limits.meta_max,
            description_duplicate: !description.is_empty()
                && shared_descriptions.contains_key(&description.to_lowercase()),
            image_count: page.image_count,
            images_missing_alt: page.images_missing_alt,
            alts_too_short: count(|d| d.alt_too_short),
            alts_too_long: count(|d| d.alt_too_long),
            filenames_with_spaces: count(|d| d.has_spaces),
            filenames_with_uppercase: count(|d| d.has_uppercase),
            filenames_with_underscores: count(|d| d.has_underscore),
            filenames_bad_extension: count(|d| d.bad_extension),
        });

        details.extend(page_details);
    }

    (records, details)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(filename: &str, alt: &str) -> ImageInfo {
        ImageInfo {
            src: format!("https://cdn.e.com/files/{}", filename),
            alt: alt.to_string(),
            filename: filename.to_string(),
        }
    }

    #[test]
    fn test_has_good_extension() {
        assert!(has_good_extension("hero.jpg"));
        assert!(has_good_extension("hero.JPEG"));
        assert!(has_good_extension("a.b.avif"));
        assert!(!has_good_extension("hero.svg"));
        assert!(!has_good_extension("hero"));
        assert!(!has_good_extension(""));
    }

    #[test]
    fn test_image_hygiene_counts() {
        let limits = LimitsConfig::default();
        let page = PageRecord {
            url: "https://e.com/".to_string(),
            final_url: "https://e.com/".to_string(),
            image_count: 4,
            images_missing_alt: 1,
            images: vec![
                image("Hero Shot.JPG", "short alt"),
                image("team_photo.png", &"a".repeat(130)),
                image("logo.svg", ""),
                image("banner.webp", &"b".repeat(110)),
            ],
            ..PageRecord::default()
        };

        let (records, details) = build_quality(std::iter::once(&page), &limits);
        let record = &records[0];

        assert_eq!(record.alts_too_short, 1);
        assert_eq!(record.alts_too_long, 1);
        assert_eq!(record.filenames_with_spaces, 1);
        assert_eq!(record.filenames_with_uppercase, 1);
        assert_eq!(record.filenames_with_underscores, 1);
        assert_eq!(record.filenames_bad_extension, 1);

        assert_eq!(details.len(), 4);
        assert!(details[0].has_spaces && details[0].has_uppercase && details[0].alt_too_short);
        assert!(!details[0].bad_extension);
        assert!(details[2].bad_extension);
        assert!(!details[2].alt_too_short);
        assert_eq!(details[3].alt_length, 110);
    }

    #[test]
    fn test_title_and_description_flags() {
        let limits = LimitsConfig::default();
        let pages = vec![
            PageRecord {
                final_url: "https://e.com/a".to_string(),
                title: "Short -".to_string(),
                meta_description: "Same".to_string(),
                ..PageRecord::default()
            },
            PageRecord {
                final_url: "https://e.com/b".to_string(),
                title: String::new(),
                meta_description: " same ".to_string(),
                ..PageRecord::default()
            },
        ];

        let (records, details) = build_quality(&pages, &limits);
        assert!(details.is_empty());

        assert_eq!(records[0].title_length, 7);
        assert!(records[0].title_too_short);
        assert!(records[0].title_trailing_separator);
        assert!(!records[0].title_duplicate);
        assert!(records[0].description_duplicate);
        assert!(records[0].description_too_short);

        assert_eq!(records[1].title_length, 0);
        assert!(!records[1].title_too_short);
        assert!(records[1].description_duplicate);
    }
}
