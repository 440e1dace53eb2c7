//! PageSpeed Insights v5 response model
//!
//! Only the fields the auditor reads are modelled. Everything is optional so
//! partial responses still deserialize.

use serde::Deserialize;
use std::collections::HashMap;

/// Field-data metric carrying the real-user INP percentile
pub const FIELD_INP_METRIC: &str = "INTERACTION_TO_NEXT_PAINT";

const LCP_AUDIT: &str = "largest-contentful-paint";
const CLS_AUDIT: &str = "cumulative-layout-shift";

#[derive(Debug, Default, Deserialize)]
pub struct PsiResponse {
    #[serde(rename = "lighthouseResult", default)]
    pub lighthouse_result: Option<LighthouseResult>,

    #[serde(rename = "loadingExperience", default)]
    pub loading_experience: Option<LoadingExperience>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LighthouseResult {
    #[serde(default)]
    pub categories: Categories,

    #[serde(default)]
    pub audits: HashMap<String, Audit>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Categories {
    #[serde(default)]
    pub performance: Option<Category>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Audit {
    #[serde(rename = "numericValue", default)]
    pub numeric_value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoadingExperience {
    #[serde(default)]
    pub metrics: HashMap<String, FieldMetric>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FieldMetric {
    #[serde(default)]
    pub percentile: Option<f64>,
}

/// Values extracted from one API response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurement {
    /// Performance category score, 0-100
    pub score: Option<u8>,
    pub lcp_ms: Option<u64>,
    pub inp_ms: Option<u64>,
    pub cls: Option<f64>,
}

impl PsiResponse {
    /// Extracts the score and vitals
    ///
    /// INP comes from the field-data percentile when reported, otherwise
    /// from the `inp_proxy_audit` lab audit. An empty proxy name disables
    /// the fallback. Zero LCP and INP values count as absent.
    pub fn measurement(&self, inp_proxy_audit: &str) -> Measurement {
        let lighthouse = self.lighthouse_result.as_ref();

        let score = lighthouse
            .and_then(|lh| lh.categories.performance.as_ref())
            .and_then(|category| category.score)
            .map(|score| (score * 100.0).round().clamp(0.0, 100.0) as u8);

        let audit = |name: &str| {
            lighthouse
                .and_then(|lh| lh.audits.get(name))
                .and_then(|audit| audit.numeric_value)
        };

        let field_inp = self
            .loading_experience
            .as_ref()
            .and_then(|le| le.metrics.get(FIELD_INP_METRIC))
            .and_then(|metric| metric.percentile);

        let inp = match field_inp {
            Some(value) => Some(value),
            None if !inp_proxy_audit.is_empty() => audit(inp_proxy_audit),
            None => None,
        };

        Measurement {
            score,
            lcp_ms: positive_ms(audit(LCP_AUDIT)),
            inp_ms: positive_ms(inp),
            cls: audit(CLS_AUDIT),
        }
    }
}

fn positive_ms(value: Option<f64>) -> Option<u64> {
    value.filter(|v| *v > 0.0).map(|v| v as u64)
}
