use crate::core::cards::{self, Card};
use crate::core::resolver::{normalize, site_param};
use crate::core::scheduler::Animator;
use crate::core::store::{lookup, DATA_LOAD_ADVISORY};
use crate::domain::model::{DashboardSnapshot, DataMap, DomainRecord};
use crate::utils::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const DEFAULT_DOMAIN: &str = "example.com";

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Pending,
    Ready(DataMap),
    Failed { advisory: String },
}

/// Shares the dashboard's "alive" flag with an in-flight dataset fetch.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    alive: Arc<AtomicBool>,
}

impl LoadTicket {
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

/// One mounted dashboard: active domain, loaded data and every animated card.
#[derive(Debug)]
pub struct Dashboard {
    domain: String,
    data: LoadState,
    cards: Vec<Card>,
    alive: Arc<AtomicBool>,
}

impl Dashboard {
    /// 掛載時資料尚未載入，所有卡片先以預設值開始動畫
    pub fn mount(animator: &Animator, domain: &str) -> Self {
        let cards = cards::catalog()
            .into_iter()
            .map(|spec| Card::bind(animator, spec, None))
            .collect();
        Self {
            domain: domain.to_string(),
            data: LoadState::Pending,
            cards,
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn load_ticket(&self) -> LoadTicket {
        LoadTicket {
            alive: Arc::clone(&self.alive),
        }
    }

    /// Applies the one-shot fetch result. Failures keep every default.
    pub fn apply_load(&mut self, outcome: Result<DataMap>) {
        if matches!(self.data, LoadState::Ready(_)) {
            tracing::warn!("Dataset already loaded; ignoring a second load");
            return;
        }
        match outcome {
            Ok(map) => {
                tracing::info!("✅ Dataset loaded with {} domains", map.len());
                self.data = LoadState::Ready(map);
            }
            Err(e) => {
                debug_assert!(e.is_data_load(), "not a dataset load error: {e}");
                tracing::error!("❌ Dataset load failed ({:?}): {}", e.category(), e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                self.data = LoadState::Failed {
                    advisory: DATA_LOAD_ADVISORY.to_string(),
                };
            }
        }
        self.rebind_all();
    }

    /// Sets the active domain from free-form input.
    pub fn set_domain(&mut self, input: &str) -> bool {
        let domain = normalize(input);
        if domain == self.domain {
            return false;
        }
        tracing::info!("🌐 Active domain: {}", domain);
        self.domain = domain;
        self.rebind_all();
        true
    }

    /// Re-evaluates the `site` query parameter of `location`.
    pub fn navigate(&mut self, location: &str) -> bool {
        match site_param(location) {
            Some(site) => self.set_domain(&site),
            None => false,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn load_state(&self) -> &LoadState {
        &self.data
    }

    pub fn data_error(&self) -> Option<&str> {
        match &self.data {
            LoadState::Failed { advisory } => Some(advisory),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<&DomainRecord> {
        select(&self.data, &self.domain)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id() == id)
    }

    pub fn is_settled(&self) -> bool {
        self.cards.iter().all(Card::is_settled)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            domain: self.domain.clone(),
            record_found: self.selected().is_some(),
            data_error: self.data_error().map(str::to_owned),
            settled: self.is_settled(),
            cards: self.cards.iter().map(Card::snapshot).collect(),
        }
    }

    fn rebind_all(&mut self) {
        let record = select(&self.data, &self.domain);
        if record.is_none() && matches!(self.data, LoadState::Ready(_)) {
            tracing::debug!("No record for '{}', using defaults", self.domain);
        }
        for card in &mut self.cards {
            card.rebind(record);
        }
    }
}

fn select<'a>(data: &'a LoadState, domain: &str) -> Option<&'a DomainRecord> {
    match data {
        LoadState::Ready(map) => lookup(map, &normalize(domain)),
        _ => None,
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheduler::{FrameLoop, ManualClock};
    use crate::domain::ports::Clock;
    use crate::utils::error::DashError;
    use std::rc::Rc;
    use std::time::Duration;

    struct Rig {
        clock: Rc<ManualClock>,
        frames: Rc<FrameLoop>,
        animator: Animator,
    }

    impl Rig {
        fn new() -> Self {
            let clock = Rc::new(ManualClock::new());
            let frames = Rc::new(FrameLoop::new());
            let animator = Animator::new(clock.clone(), frames.clone());
            Self {
                clock,
                frames,
                animator,
            }
        }

        fn run_until_settled(&self, dashboard: &Dashboard) {
            self.frames.run_frame(self.clock.now());
            for _ in 0..200 {
                if dashboard.is_settled() {
                    return;
                }
                self.frames.run_frame(self.clock.advance(Duration::from_millis(16)));
            }
            panic!("dashboard did not settle");
        }
    }

    fn dataset(json: serde_json::Value) -> DataMap {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_record_drives_domain_rating() {
        let rig = Rig::new();
        let mut dashboard = Dashboard::mount(&rig.animator, DEFAULT_DOMAIN);
        dashboard.set_domain("www.example.com");
        assert_eq!(dashboard.domain(), "example.com");

        dashboard.apply_load(Ok(dataset(serde_json::json!({
            "example.com": { "domainRating": 80 }
        }))));
        assert!(dashboard.selected().is_some());

        rig.run_until_settled(&dashboard);
        let snapshot = dashboard.snapshot();
        let rating = snapshot.reading("domain-rating", "rating").unwrap();
        assert_eq!(rating.value, 80.0);
        assert_eq!(rating.display, "80.0");
        // 其餘欄位沿用預設值
        assert_eq!(snapshot.reading("domain-rating", "trust_bar").unwrap().value, 72.0);
        assert!(snapshot.record_found);
        assert!(snapshot.data_error.is_none());
    }

    #[test]
    fn test_load_failure_renders_defaults_and_sets_error() {
        let rig = Rig::new();
        let mut dashboard = Dashboard::mount(&rig.animator, DEFAULT_DOMAIN);
        dashboard.apply_load(Err(DashError::HttpStatusError {
            url: "http://localhost/data/seo-data.json".to_string(),
            status: 404,
        }));

        rig.run_until_settled(&dashboard);
        let snapshot = dashboard.snapshot();
        assert_eq!(snapshot.reading("domain-rating", "rating").unwrap().display, "53.6");
        assert_eq!(snapshot.data_error.as_deref(), Some(DATA_LOAD_ADVISORY));
        assert!(!snapshot.record_found);
    }

    #[test]
    fn test_www_key_fallback_and_miss() {
        let rig = Rig::new();
        let mut dashboard = Dashboard::mount(&rig.animator, "shop.io");
        dashboard.apply_load(Ok(dataset(serde_json::json!({
            "www.shop.io": { "backlinks": 1.5e9 }
        }))));
        assert_eq!(dashboard.selected().and_then(|r| r.backlinks), Some(1.5e9));

        dashboard.set_domain("https://unknown.dev/about");
        assert!(dashboard.selected().is_none());
        rig.run_until_settled(&dashboard);
        assert_eq!(
            dashboard.snapshot().reading("total-backlinks", "backlinks").unwrap().display,
            "26.1B"
        );
    }

    #[test]
    fn test_data_arrival_restarts_changed_cards_from_zero() {
        let rig = Rig::new();
        let mut dashboard = Dashboard::mount(&rig.animator, DEFAULT_DOMAIN);
        rig.frames.run_frame(rig.clock.now());
        rig.frames.run_frame(rig.clock.advance(Duration::from_millis(400)));

        let before = dashboard.card("domain-rating").unwrap().fraction();
        assert!(before > 0.0);
        let coverage_before = dashboard.card("serp-coverage").unwrap().fraction();

        dashboard.apply_load(Ok(dataset(serde_json::json!({
            "example.com": { "domainRating": 80 }
        }))));

        // 目標改變的卡片跳回 0，其餘卡片不受影響
        assert_eq!(dashboard.card("domain-rating").unwrap().fraction(), 0.0);
        assert_eq!(dashboard.card("serp-coverage").unwrap().fraction(), coverage_before);
        assert_eq!(
            dashboard.card("page-speed").unwrap().fraction(),
            dashboard.card("site-health").unwrap().fraction()
        );
    }

    #[test]
    fn test_navigate_reacts_to_site_param() {
        let rig = Rig::new();
        let mut dashboard = Dashboard::mount(&rig.animator, DEFAULT_DOMAIN);
        dashboard.apply_load(Ok(dataset(serde_json::json!({
            "example.com": { "siteHealth": 91.2 },
            "other.org": { "siteHealth": 64.0 }
        }))));

        assert!(!dashboard.navigate("https://app.local/?tab=overview"));
        assert_eq!(dashboard.domain(), "example.com");

        assert!(dashboard.navigate("https://app.local/?site=https%3A%2F%2Fwww.Other.org%2Fblog"));
        assert_eq!(dashboard.domain(), "other.org");
        assert!(!dashboard.navigate("https://app.local/?site=other.org"));

        rig.run_until_settled(&dashboard);
        assert_eq!(dashboard.snapshot().reading("site-health", "score").unwrap().value, 64.0);
    }

    #[test]
    fn test_second_load_is_ignored() {
        let rig = Rig::new();
        let mut dashboard = Dashboard::mount(&rig.animator, DEFAULT_DOMAIN);
        dashboard.apply_load(Ok(dataset(serde_json::json!({ "example.com": { "domainRating": 80 } }))));
        dashboard.apply_load(Ok(dataset(serde_json::json!({ "example.com": { "domainRating": 10 } }))));
        assert_eq!(dashboard.selected().and_then(|r| r.domain_rating), Some(80.0));
    }

    #[test]
    fn test_ticket_dies_with_dashboard() {
        let rig = Rig::new();
        let dashboard = Dashboard::mount(&rig.animator, DEFAULT_DOMAIN);
        let ticket = dashboard.load_ticket();
        assert!(ticket.is_alive());
        assert!(rig.frames.pending_count() > 0);

        drop(dashboard);
        assert!(!ticket.is_alive());
        // 卸載後不應殘留任何影格登記
        assert!(rig.frames.is_idle());
    }

    #[test]
    fn test_composite_cards_settle_in_lockstep() {
        let rig = Rig::new();
        let dashboard = Dashboard::mount(&rig.animator, DEFAULT_DOMAIN);
        rig.run_until_settled(&dashboard);

        for card in dashboard.cards().iter().filter(|c| c.is_composite()) {
            assert_eq!(card.fraction(), 1.0);
            for reading in card.readings() {
                assert_eq!(reading.value, reading.target, "{}.{}", card.id(), reading.key);
            }
        }
    }
}
