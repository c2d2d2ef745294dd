use crate::core::binder::{CompositeBinder, MetricBinder, OutputSpec, TargetSource};
use crate::core::format::ValueFormat;
use crate::core::scheduler::Animator;
use crate::domain::model::{defaults, CardSnapshot, DomainRecord, Metric, Reading};
use std::time::Duration;

pub const REFERRING_SEGMENTS: [(&str, f64); 3] = [("high", 45.0), ("medium", 35.0), ("low", 20.0)];
pub const SITE_HEALTH_PAGES: f64 = 2100.0;
pub const SITE_HEALTH_REDIRECTS: f64 = 89.0;
pub const SITE_HEALTH_BROKEN: f64 = 15.0;
pub const LEADS_CF_LIMIT: f64 = 800.0;
pub const LEADS_NEWSLETTER_LIMIT: f64 = 400.0;
pub const KEYWORD_BANDS: [(&str, f64); 3] = [("top3", 12_300.0), ("top10", 24_800.0), ("top100", 53_600.0)];
pub const KEYWORD_BANDS_TOTAL: f64 = 90_600.0;
pub const SERP_FEATURES: [(&str, &str, f64); 5] = [
    ("featured", "Featured Snippets", 23.0),
    ("paa", "People Also Ask", 156.0),
    ("image_pack", "Image Pack", 89.0),
    ("video", "Video Results", 34.0),
    ("knowledge", "Knowledge Panel", 12.0),
];
pub const SERP_COVERAGE: f64 = 45.0;
pub const AI_MATRIX_NUMERATOR: f64 = 2.0;
pub const ON_PAGE_OPPORTUNITIES: [(&str, &str, f64); 4] = [
    ("critical", "Critical Issues", 274.0),
    ("warnings", "Warnings", 883.0),
    ("recommendations", "Recommendations", 77.0),
    ("content", "Content Opportunities", 5.0),
];
/// (title, score, word count, keywords)
pub const OPPORTUNITY_CARDS: [(&str, f64, f64, f64); 4] = [
    ("How to Improve Site Speed", 45.0, 1250.0, 50.0),
    ("Complete Local SEO Guide", 72.0, 2400.0, 3.0),
    ("How to Improve Site Speed", 25.0, 1250.0, 50.0),
    ("Complete Local SEO Guide", 72.0, 2400.0, 3.0),
];
pub const SEO_TABLE_DIFFICULTY: [f64; 7] = [98.0, 88.0, 98.0, 28.0, 28.0, 68.0, 48.0];

#[derive(Debug, Clone)]
pub struct CardSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub duration: Duration,
    pub outputs: Vec<OutputSpec>,
}

impl CardSpec {
    fn new(id: &'static str, title: &'static str, duration_ms: u64, outputs: Vec<OutputSpec>) -> Self {
        Self {
            id,
            title,
            duration: Duration::from_millis(duration_ms),
            outputs,
        }
    }
}

fn field(key: &'static str, label: &'static str, metric: Metric) -> OutputSpec {
    OutputSpec::new(key, label, TargetSource::Field(metric))
}

fn constant(key: &'static str, label: &'static str, value: f64) -> OutputSpec {
    OutputSpec::new(key, label, TargetSource::Constant(value))
}

fn band_percent(value: f64, total: f64) -> f64 {
    (value / total * 100.0).round()
}

/// The full dashboard, in display order.
pub fn catalog() -> Vec<CardSpec> {
    let mut cards = vec![
        CardSpec::new(
            "domain-rating",
            "Domain Rating",
            800,
            vec![
                field("rating", "Domain Rating", Metric::DomainRating),
                field("trust_bar", "Trust", Metric::TrustBar).format(ValueFormat::Percent),
            ],
        ),
        CardSpec::new("referring-domains", "Referring Domains", 900, {
            let mut outputs = vec![field("count", "Referring Domains", Metric::ReferringDomains)
                .format(ValueFormat::Compact)];
            outputs.extend(REFERRING_SEGMENTS.iter().map(|&(key, width)| {
                constant(key, key, width).format(ValueFormat::Percent)
            }));
            outputs
        }),
        CardSpec::new(
            "total-backlinks",
            "Total Backlinks",
            800,
            vec![OutputSpec::new(
                "backlinks",
                "Total Backlinks",
                TargetSource::Scaled {
                    metric: Metric::Backlinks,
                    divisor: 1_000_000_000.0,
                },
            )
            .format(ValueFormat::Fixed {
                decimals: 1,
                suffix: "B",
            })],
        ),
        CardSpec::new(
            "site-health",
            "Site Health Score",
            900,
            vec![
                field("score", "Site Health", Metric::SiteHealth),
                constant("pages", "Pages Scanned", SITE_HEALTH_PAGES)
                    .rounded()
                    .format(ValueFormat::integer()),
                constant("redirects", "Redirects", SITE_HEALTH_REDIRECTS)
                    .rounded()
                    .format(ValueFormat::integer()),
                constant("broken", "Broken Links", SITE_HEALTH_BROKEN)
                    .rounded()
                    .format(ValueFormat::integer()),
            ],
        ),
        CardSpec::new(
            "core-web-vitals",
            "Core Web Vitals",
            900,
            vec![
                field("lcp", "LCP", Metric::Lcp).format(ValueFormat::Fixed {
                    decimals: 1,
                    suffix: "s",
                }),
                field("inp", "INP", Metric::Inp).format(ValueFormat::Integer { suffix: "ms" }),
                field("cls", "CLS", Metric::Cls).format(ValueFormat::fixed(2)),
            ],
        ),
        // 兩個儀表共用一個進度，且不因目標改變而重播
        CardSpec::new(
            "page-speed",
            "Page Speed Scores",
            900,
            vec![
                field("desktop", "Desktop", Metric::PageSpeedDesktop)
                    .clamped()
                    .rounded()
                    .live()
                    .format(ValueFormat::integer()),
                field("mobile", "Mobile", Metric::PageSpeedMobile)
                    .clamped()
                    .rounded()
                    .live()
                    .format(ValueFormat::integer()),
            ],
        ),
        CardSpec::new(
            "organic-traffic",
            "Organic Traffic",
            1100,
            vec![
                field("monthly", "Monthly Traffic", Metric::OrganicTrafficMonthly)
                    .format(ValueFormat::Compact),
                constant("reveal", "Graph", 100.0).format(ValueFormat::Percent),
            ],
        ),
        CardSpec::new("organic-keywords", "Organic Keywords", 1100, {
            let mut outputs = vec![field("total", "Organic Keywords", Metric::OrganicKeywordsTotal)
                .format(ValueFormat::Compact)];
            outputs.extend(KEYWORD_BANDS.iter().map(|&(key, value)| {
                constant(key, key, band_percent(value, KEYWORD_BANDS_TOTAL)).format(ValueFormat::Percent)
            }));
            outputs
        }),
        CardSpec::new(
            "leads",
            "Leads",
            1100,
            vec![
                field("monthly", "Monthly Leads", Metric::LeadsMonthly)
                    .format(ValueFormat::integer()),
                OutputSpec::new(
                    "goal_bar",
                    "Goal",
                    TargetSource::Share {
                        metric: Metric::LeadsMonthly,
                        limit: defaults::LEADS_GOAL,
                    },
                )
                .format(ValueFormat::Percent),
                OutputSpec::new(
                    "cf_bar",
                    "Contact Form",
                    TargetSource::Share {
                        metric: Metric::LeadsCf,
                        limit: LEADS_CF_LIMIT,
                    },
                )
                .live()
                .format(ValueFormat::Percent),
                OutputSpec::new(
                    "newsletter_bar",
                    "Newsletter",
                    TargetSource::Share {
                        metric: Metric::LeadsNewsletter,
                        limit: LEADS_NEWSLETTER_LIMIT,
                    },
                )
                .live()
                .format(ValueFormat::Percent),
            ],
        ),
        CardSpec::new(
            "serp-features",
            "SERP Features",
            900,
            SERP_FEATURES
                .iter()
                .map(|&(key, label, value)| constant(key, label, value).rounded().format(ValueFormat::integer()))
                .collect(),
        ),
        CardSpec::new(
            "serp-coverage",
            "SERP Coverage",
            900,
            vec![constant("coverage", "Coverage", SERP_COVERAGE).format(ValueFormat::Percent)],
        ),
        CardSpec::new(
            "ai-seo-matrix",
            "AI SEO Matrix",
            700,
            vec![constant("numerator", "Engines Covered", AI_MATRIX_NUMERATOR)
                .rounded()
                .format(ValueFormat::integer())],
        ),
        CardSpec::new(
            "on-page-opportunities",
            "On-Page SEO Opportunities",
            900,
            ON_PAGE_OPPORTUNITIES
                .iter()
                .map(|&(key, label, value)| constant(key, label, value).rounded().format(ValueFormat::integer()))
                .collect(),
        ),
    ];

    let opportunity_keys: [[&'static str; 3]; 4] = [
        ["card1_score", "card1_words", "card1_keywords"],
        ["card2_score", "card2_words", "card2_keywords"],
        ["card3_score", "card3_words", "card3_keywords"],
        ["card4_score", "card4_words", "card4_keywords"],
    ];
    let mut opportunity_outputs = Vec::new();
    for (&(title, score, words, keywords), keys) in OPPORTUNITY_CARDS.iter().zip(opportunity_keys) {
        for (key, value) in keys.into_iter().zip([score, words, keywords]) {
            opportunity_outputs.push(constant(key, title, value).rounded().format(ValueFormat::integer()));
        }
    }
    cards.push(CardSpec::new(
        "opportunity-cards",
        "Top On-Page Content Opportunities",
        800,
        opportunity_outputs,
    ));

    const TABLE_KEYS: [&str; 7] = ["row1", "row2", "row3", "row4", "row5", "row6", "row7"];
    cards.push(CardSpec::new(
        "seo-table",
        "New On-Page SEO Opportunity",
        900,
        TABLE_KEYS
            .iter()
            .zip(SEO_TABLE_DIFFICULTY)
            .map(|(&key, difficulty)| constant(key, "Difficulty", difficulty).clamped().format(ValueFormat::Percent))
            .collect(),
    ));

    cards
}

#[derive(Debug)]
enum Binding {
    Single(MetricBinder),
    Shared(CompositeBinder),
}

/// A card spec bound to live animation state.
#[derive(Debug)]
pub struct Card {
    id: &'static str,
    title: &'static str,
    binding: Binding,
}

impl Card {
    /// 單一輸出綁定自己的 Timeline，多輸出共用一個進度
    pub fn bind(animator: &Animator, spec: CardSpec, record: Option<&DomainRecord>) -> Self {
        let CardSpec {
            id,
            title,
            duration,
            mut outputs,
        } = spec;
        let binding = if outputs.len() == 1 {
            let output = outputs.remove(0);
            Binding::Single(MetricBinder::bind(animator, output, duration, record))
        } else {
            Binding::Shared(CompositeBinder::bind(animator, outputs, duration, record))
        };
        Self { id, title, binding }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.binding, Binding::Shared(_))
    }

    pub fn rebind(&mut self, record: Option<&DomainRecord>) -> bool {
        let restarted = match &mut self.binding {
            Binding::Single(binder) => binder.rebind(record),
            Binding::Shared(binder) => binder.rebind(record),
        };
        if restarted {
            tracing::debug!("🔁 Card '{}' restarted from zero", self.id);
        }
        restarted
    }

    pub fn fraction(&self) -> f64 {
        match &self.binding {
            Binding::Single(binder) => binder.fraction(),
            Binding::Shared(binder) => binder.fraction(),
        }
    }

    pub fn is_settled(&self) -> bool {
        match &self.binding {
            Binding::Single(binder) => binder.is_settled(),
            Binding::Shared(binder) => binder.is_settled(),
        }
    }

    pub fn readings(&self) -> Vec<Reading> {
        match &self.binding {
            Binding::Single(binder) => vec![binder.reading()],
            Binding::Shared(binder) => binder.readings(),
        }
    }

    pub fn reading(&self, key: &str) -> Option<Reading> {
        self.readings().into_iter().find(|r| r.key == key)
    }

    pub fn snapshot(&self) -> CardSnapshot {
        CardSnapshot {
            id: self.id.to_string(),
            title: self.title.to_string(),
            fraction: self.fraction(),
            settled: self.is_settled(),
            readings: self.readings(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_unique_and_durations_in_range() {
        let cards = catalog();
        let ids: HashSet<_> = cards.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), cards.len());

        for card in &cards {
            let ms = card.duration.as_millis();
            assert!((700..=1100).contains(&ms), "{} has {}ms", card.id, ms);
            let keys: HashSet<_> = card.outputs.iter().map(|o| o.key).collect();
            assert_eq!(keys.len(), card.outputs.len(), "duplicate key in {}", card.id);
        }
    }

    #[test]
    fn test_keyword_bands_match_dashboard_widths() {
        let widths: Vec<f64> = KEYWORD_BANDS
            .iter()
            .map(|&(_, v)| band_percent(v, KEYWORD_BANDS_TOTAL))
            .collect();
        assert_eq!(widths, vec![14.0, 27.0, 59.0]);
    }

    #[test]
    fn test_page_speed_has_no_restart_dependencies() {
        let cards = catalog();
        let page_speed = cards.iter().find(|c| c.id == "page-speed").unwrap();
        assert!(page_speed.outputs.iter().all(|o| !o.restarts));

        let leads = cards.iter().find(|c| c.id == "leads").unwrap();
        let restarting: Vec<_> = leads.outputs.iter().filter(|o| o.restarts).map(|o| o.key).collect();
        assert_eq!(restarting, vec!["monthly", "goal_bar"]);
    }
}
