use crate::config::cli::LocalStorage;
use crate::core::format::group_thousands;
use crate::domain::model::{defaults, DashboardSnapshot};
use crate::domain::ports::{Presenter, Storage};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub snapshot: &'a DashboardSnapshot,
}

pub fn render_json(snapshot: &DashboardSnapshot) -> Result<String> {
    let report = JsonReport {
        generated_at: Utc::now(),
        snapshot,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Plain-text board, one block per card in display order.
pub fn render_board(snapshot: &DashboardSnapshot) -> String {
    let mut board = String::new();
    let _ = writeln!(board, "SEO Dashboard: {}", snapshot.domain);
    if let Some(advisory) = &snapshot.data_error {
        let _ = writeln!(board, "⚠️  {}", advisory);
    } else if !snapshot.record_found {
        let _ = writeln!(board, "(no data for {}, showing defaults)", snapshot.domain);
    }

    for card in &snapshot.cards {
        let _ = writeln!(board);
        let _ = writeln!(board, "[{}]", card.title);
        for reading in &card.readings {
            let _ = writeln!(board, "  {:<32} {:>10}", reading.label, reading.display);
        }
        if card.id == "leads" {
            if let Some(monthly) = card.readings.iter().find(|r| r.key == "monthly") {
                let _ = writeln!(
                    board,
                    "  Goals {} / {}",
                    monthly.value.round(),
                    group_thousands(defaults::LEADS_GOAL)
                );
            }
        }
    }
    board
}

/// Writes the final board to `out`; with `live` set, also a status line
/// whenever another card settles.
pub struct ConsolePresenter<W: Write> {
    out: W,
    live: bool,
    settled_cards: Option<usize>,
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W, live: bool) -> Self {
        Self {
            out,
            live,
            settled_cards: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn present(&mut self, snapshot: &DashboardSnapshot) -> Result<()> {
        if !self.live {
            return Ok(());
        }
        let settled = snapshot.cards.iter().filter(|c| c.settled).count();
        if self.settled_cards == Some(settled) {
            return Ok(());
        }
        self.settled_cards = Some(settled);
        writeln!(
            self.out,
            "⏳ {}: {}/{} cards settled",
            snapshot.domain,
            settled,
            snapshot.cards.len()
        )?;
        Ok(())
    }

    fn finish(&mut self, snapshot: &DashboardSnapshot) -> Result<()> {
        self.out.write_all(render_board(snapshot).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

pub struct JsonPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn present(&mut self, _snapshot: &DashboardSnapshot) -> Result<()> {
        Ok(())
    }

    fn finish(&mut self, snapshot: &DashboardSnapshot) -> Result<()> {
        writeln!(self.out, "{}", render_json(snapshot)?)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Saves a rendered report, creating parent directories. Returns the written path.
pub async fn save_report(path: &str, body: &str) -> Result<String> {
    let target = Path::new(path);
    let base = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| ".".to_string(), |p| p.to_string_lossy().into_owned());
    let file_name = target
        .file_name()
        .map_or_else(|| "report.txt".to_string(), |f| f.to_string_lossy().into_owned());

    let storage = LocalStorage::new(base);
    storage.write_file(&file_name, body.as_bytes()).await?;
    let written = storage.resolve(&file_name).display().to_string();
    tracing::info!("📁 Report saved to: {}", written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CardSnapshot, Reading};
    use tempfile::TempDir;

    fn reading(key: &str, label: &str, value: f64, display: &str) -> Reading {
        Reading {
            key: key.to_string(),
            label: label.to_string(),
            value,
            target: value,
            display: display.to_string(),
        }
    }

    fn snapshot(data_error: Option<&str>) -> DashboardSnapshot {
        DashboardSnapshot {
            domain: "example.com".to_string(),
            record_found: false,
            data_error: data_error.map(str::to_owned),
            settled: true,
            cards: vec![
                CardSnapshot {
                    id: "domain-rating".to_string(),
                    title: "Domain Rating".to_string(),
                    fraction: 1.0,
                    settled: true,
                    readings: vec![reading("rating", "Domain Rating", 53.6, "53.6")],
                },
                CardSnapshot {
                    id: "leads".to_string(),
                    title: "Leads".to_string(),
                    fraction: 0.5,
                    settled: false,
                    readings: vec![reading("monthly", "Monthly Leads", 887.0, "887")],
                },
            ],
        }
    }

    #[test]
    fn test_board_shows_advisory_and_goal() {
        let board = render_board(&snapshot(Some("Couldn't load the dataset")));
        assert!(board.starts_with("SEO Dashboard: example.com\n"));
        assert!(board.contains("⚠️  Couldn't load the dataset"));
        assert!(board.contains("[Domain Rating]"));
        assert!(board.contains("53.6"));
        assert!(board.contains("Goals 887 / 1,500"));
    }

    #[test]
    fn test_board_notes_missing_record() {
        let board = render_board(&snapshot(None));
        assert!(board.contains("(no data for example.com, showing defaults)"));
    }

    #[test]
    fn test_live_console_reports_only_changes() {
        let mut presenter = ConsolePresenter::new(Vec::new(), true);
        let frame = snapshot(None);
        presenter.present(&frame).unwrap();
        presenter.present(&frame).unwrap();
        presenter.finish(&frame).unwrap();

        let output = String::from_utf8(presenter.into_inner()).unwrap();
        assert_eq!(output.matches("⏳").count(), 1);
        assert!(output.contains("1/2 cards settled"));
        assert!(output.contains("[Leads]"));
    }

    #[test]
    fn test_json_report_is_flat_with_timestamp() {
        let mut presenter = JsonPresenter::new(Vec::new());
        presenter.finish(&snapshot(None)).unwrap();

        let output = String::from_utf8(presenter.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["domain"], "example.com");
        assert!(value["generated_at"].is_string());
        assert_eq!(value["cards"][0]["readings"][0]["display"], "53.6");
    }

    #[tokio::test]
    async fn test_save_report_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out/board.txt");

        let written = save_report(path.to_str().unwrap(), "hello").await.unwrap();
        assert_eq!(std::fs::read_to_string(&written).unwrap(), "hello");
    }
}
