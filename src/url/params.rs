use std::fmt;
use url::Url;

/// Query keys that only carry campaign or click tracking
const NOISY_PARAM_PREFIXES: &[&str] = &["utm_", "fbclid", "gclid", "mc_", "mkevt", "mkcid", "mkrid"];

/// How risky a URL's query string is for duplicate indexing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamRisk {
    /// No query parameters
    None,
    /// At least one tracking parameter
    Noisy,
    /// Ordinary parameters (distinct key count)
    Params(usize),
}

impl fmt::Display for ParamRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Noisy => write!(f, "Noisy params"),
            Self::Params(count) => write!(f, "Params: {}", count),
        }
    }
}

/// Classifies the query string of a URL
///
/// # Examples
///
/// ```
/// use site_auditor::url::{param_risk, ParamRisk};
/// use url::Url;
///
/// let url = Url::parse("https://example.com/p?utm_source=mail").unwrap();
/// assert_eq!(param_risk(&url), ParamRisk::Noisy);
/// ```
pub fn param_risk(url: &Url) -> ParamRisk {
    let mut keys: Vec<String> = url
        .query_pairs()
        .map(|(key, _)| key.into_owned())
        .filter(|key| !key.is_empty())
        .collect();
    keys.sort();
    keys.dedup();

    if keys.is_empty() {
        return ParamRisk::None;
    }

    let noisy = keys.iter().any(|key| {
        let key = key.to_lowercase();
        NOISY_PARAM_PREFIXES
            .iter()
            .any(|prefix| key.starts_with(prefix))
    });

    if noisy {
        ParamRisk::Noisy
    } else {
        ParamRisk::Params(keys.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risk(url: &str) -> ParamRisk {
        param_risk(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_no_params() {
        assert_eq!(risk("https://example.com/p"), ParamRisk::None);
        assert_eq!(risk("https://example.com/p?"), ParamRisk::None);
    }

    #[test]
    fn test_tracking_params() {
        assert_eq!(risk("https://example.com/p?utm_medium=x"), ParamRisk::Noisy);
        assert_eq!(risk("https://example.com/p?page=2&FBCLID=1"), ParamRisk::Noisy);
        assert_eq!(risk("https://example.com/p?mc_eid=abc"), ParamRisk::Noisy);
    }

    #[test]
    fn test_ordinary_params_counted_once_per_key() {
        assert_eq!(
            risk("https://example.com/p?variant=1&page=2&variant=3"),
            ParamRisk::Params(2)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ParamRisk::None.to_string(), "None");
        assert_eq!(ParamRisk::Noisy.to_string(), "Noisy params");
        assert_eq!(ParamRisk::Params(3).to_string(), "Params: 3");
    }
}
