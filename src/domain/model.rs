use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One domain's metric bundle as stored in `seo-data.json`.
///
/// Every field is optional; an absent field resolves to the documented
/// default through [`Metric::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    pub domain_rating: Option<f64>,
    pub trust_bar: Option<f64>,
    pub referring_domains: Option<f64>,
    pub backlinks: Option<f64>,
    pub site_health: Option<f64>,
    pub core_web_vitals: Option<CoreWebVitals>,
    pub page_speed: Option<PageSpeed>,
    pub organic_traffic: Option<OrganicTraffic>,
    pub organic_keywords: Option<OrganicKeywords>,
    pub leads: Option<Leads>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreWebVitals {
    #[serde(rename = "LCP")]
    pub lcp: Option<f64>,
    #[serde(rename = "INP")]
    pub inp: Option<f64>,
    #[serde(rename = "CLS")]
    pub cls: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSpeed {
    pub desktop: Option<f64>,
    pub mobile: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganicTraffic {
    pub monthly: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganicKeywords {
    pub total: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leads {
    pub monthly: Option<f64>,
    pub cf: Option<f64>,
    pub newsletter: Option<f64>,
}

/// Canonical domain key → record. Built once per session and never mutated.
pub type DataMap = HashMap<String, DomainRecord>;

/// 欄位缺漏時使用的預設值
pub mod defaults {
    pub const DOMAIN_RATING: f64 = 53.6;
    pub const TRUST_BAR: f64 = 72.0;
    pub const REFERRING_DOMAINS: f64 = 63_400.0;
    pub const BACKLINKS: f64 = 26.1 * 1_000_000_000.0;
    pub const SITE_HEALTH: f64 = 100.0;
    pub const LCP_SECONDS: f64 = 2.1;
    pub const INP_MS: f64 = 180.0;
    pub const CLS: f64 = 0.08;
    pub const PAGE_SPEED_DESKTOP: f64 = 95.0;
    pub const PAGE_SPEED_MOBILE: f64 = 87.0;
    pub const ORGANIC_TRAFFIC_MONTHLY: f64 = 38_600.0;
    pub const ORGANIC_KEYWORDS_TOTAL: f64 = 90_600.0;
    pub const LEADS_MONTHLY: f64 = 887.0;
    pub const LEADS_GOAL: f64 = 1_500.0;
    pub const LEADS_CF: f64 = 642.0;
    pub const LEADS_NEWSLETTER: f64 = 245.0;
}

/// A numeric path inside [`DomainRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    DomainRating,
    TrustBar,
    ReferringDomains,
    Backlinks,
    SiteHealth,
    Lcp,
    Inp,
    Cls,
    PageSpeedDesktop,
    PageSpeedMobile,
    OrganicTrafficMonthly,
    OrganicKeywordsTotal,
    LeadsMonthly,
    LeadsCf,
    LeadsNewsletter,
}

impl Metric {
    pub const ALL: [Metric; 15] = [
        Metric::DomainRating,
        Metric::TrustBar,
        Metric::ReferringDomains,
        Metric::Backlinks,
        Metric::SiteHealth,
        Metric::Lcp,
        Metric::Inp,
        Metric::Cls,
        Metric::PageSpeedDesktop,
        Metric::PageSpeedMobile,
        Metric::OrganicTrafficMonthly,
        Metric::OrganicKeywordsTotal,
        Metric::LeadsMonthly,
        Metric::LeadsCf,
        Metric::LeadsNewsletter,
    ];

    /// JSON path of the field, as written in the dataset.
    pub fn path(self) -> &'static str {
        match self {
            Metric::DomainRating => "domainRating",
            Metric::TrustBar => "trustBar",
            Metric::ReferringDomains => "referringDomains",
            Metric::Backlinks => "backlinks",
            Metric::SiteHealth => "siteHealth",
            Metric::Lcp => "coreWebVitals.LCP",
            Metric::Inp => "coreWebVitals.INP",
            Metric::Cls => "coreWebVitals.CLS",
            Metric::PageSpeedDesktop => "pageSpeed.desktop",
            Metric::PageSpeedMobile => "pageSpeed.mobile",
            Metric::OrganicTrafficMonthly => "organicTraffic.monthly",
            Metric::OrganicKeywordsTotal => "organicKeywords.total",
            Metric::LeadsMonthly => "leads.monthly",
            Metric::LeadsCf => "leads.cf",
            Metric::LeadsNewsletter => "leads.newsletter",
        }
    }

    pub fn default_value(self) -> f64 {
        match self {
            Metric::DomainRating => defaults::DOMAIN_RATING,
            Metric::TrustBar => defaults::TRUST_BAR,
            Metric::ReferringDomains => defaults::REFERRING_DOMAINS,
            Metric::Backlinks => defaults::BACKLINKS,
            Metric::SiteHealth => defaults::SITE_HEALTH,
            Metric::Lcp => defaults::LCP_SECONDS,
            Metric::Inp => defaults::INP_MS,
            Metric::Cls => defaults::CLS,
            Metric::PageSpeedDesktop => defaults::PAGE_SPEED_DESKTOP,
            Metric::PageSpeedMobile => defaults::PAGE_SPEED_MOBILE,
            Metric::OrganicTrafficMonthly => defaults::ORGANIC_TRAFFIC_MONTHLY,
            Metric::OrganicKeywordsTotal => defaults::ORGANIC_KEYWORDS_TOTAL,
            Metric::LeadsMonthly => defaults::LEADS_MONTHLY,
            Metric::LeadsCf => defaults::LEADS_CF,
            Metric::LeadsNewsletter => defaults::LEADS_NEWSLETTER,
        }
    }

    pub fn read(self, record: &DomainRecord) -> Option<f64> {
        match self {
            Metric::DomainRating => record.domain_rating,
            Metric::TrustBar => record.trust_bar,
            Metric::ReferringDomains => record.referring_domains,
            Metric::Backlinks => record.backlinks,
            Metric::SiteHealth => record.site_health,
            Metric::Lcp => record.core_web_vitals.as_ref()?.lcp,
            Metric::Inp => record.core_web_vitals.as_ref()?.inp,
            Metric::Cls => record.core_web_vitals.as_ref()?.cls,
            Metric::PageSpeedDesktop => record.page_speed.as_ref()?.desktop,
            Metric::PageSpeedMobile => record.page_speed.as_ref()?.mobile,
            Metric::OrganicTrafficMonthly => record.organic_traffic.as_ref()?.monthly,
            Metric::OrganicKeywordsTotal => record.organic_keywords.as_ref()?.total,
            Metric::LeadsMonthly => record.leads.as_ref()?.monthly,
            Metric::LeadsCf => record.leads.as_ref()?.cf,
            Metric::LeadsNewsletter => record.leads.as_ref()?.newsletter,
        }
    }

    /// `record?.<path> ?? default`
    pub fn resolve(self, record: Option<&DomainRecord>) -> f64 {
        record
            .and_then(|r| self.read(r))
            .unwrap_or_else(|| self.default_value())
    }
}

/// One displayed number on a card at a given frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub target: f64,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSnapshot {
    pub id: String,
    pub title: String,
    pub fraction: f64,
    pub settled: bool,
    pub readings: Vec<Reading>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub domain: String,
    pub record_found: bool,
    pub data_error: Option<String>,
    pub settled: bool,
    pub cards: Vec<CardSnapshot>,
}

impl DashboardSnapshot {
    pub fn card(&self, id: &str) -> Option<&CardSnapshot> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn reading(&self, card_id: &str, key: &str) -> Option<&Reading> {
        self.card(card_id)?.readings.iter().find(|r| r.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_partial_fields() {
        let record: DomainRecord = serde_json::from_value(serde_json::json!({
            "domainRating": 80,
            "coreWebVitals": { "LCP": 1.4 },
            "leads": null,
            "somethingElse": "ignored"
        }))
        .unwrap();

        assert_eq!(record.domain_rating, Some(80.0));
        assert_eq!(Metric::Lcp.resolve(Some(&record)), 1.4);
        assert_eq!(Metric::Inp.resolve(Some(&record)), defaults::INP_MS);
        assert_eq!(Metric::LeadsCf.resolve(Some(&record)), defaults::LEADS_CF);
    }

    #[test]
    fn test_resolve_without_record_uses_defaults() {
        for metric in Metric::ALL {
            assert_eq!(metric.resolve(None), metric.default_value(), "{}", metric.path());
        }
        assert_eq!(Metric::DomainRating.resolve(None), 53.6);
        assert_eq!(Metric::Backlinks.resolve(None) / 1_000_000_000.0, 26.1);
    }
}
