#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RunStats {
    pub frames: u64,
    pub longest_frame_gap: Duration,
    pub memory_usage_mb: Option<u64>,
    pub peak_memory_mb: Option<u64>,
    pub elapsed_time: Duration,
}

/// 統計動畫執行期間的影格數、最長影格間隔與記憶體用量
pub struct RunMonitor {
    enabled: bool,
    start_time: Instant,
    last_frame: Option<Instant>,
    frames: u64,
    longest_frame_gap: Duration,
    #[cfg(feature = "cli")]
    system: Option<(System, Pid)>,
    peak_memory_mb: Option<u64>,
}

impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            start_time: Instant::now(),
            last_frame: None,
            frames: 0,
            longest_frame_gap: Duration::ZERO,
            #[cfg(feature = "cli")]
            system: if enabled { Self::probe() } else { None },
            peak_memory_mb: None,
        }
    }

    #[cfg(feature = "cli")]
    fn probe() -> Option<(System, Pid)> {
        let pid = sysinfo::get_current_pid().ok()?;
        let mut system = System::new_with_specifics(RefreshKind::everything());
        system.refresh_all();
        Some((system, pid))
    }

    pub fn record_frame(&mut self) {
        if !self.enabled {
            return;
        }
        let now = Instant::now();
        if let Some(previous) = self.last_frame {
            self.longest_frame_gap = self.longest_frame_gap.max(now - previous);
        }
        self.last_frame = Some(now);
        self.frames += 1;
    }

    fn memory_mb(&mut self) -> Option<u64> {
        #[cfg(feature = "cli")]
        {
            let (system, pid) = self.system.as_mut()?;
            system.refresh_all();
            let memory_mb = system.process(*pid)?.memory() / 1024 / 1024;
            let peak = self.peak_memory_mb.map_or(memory_mb, |p| p.max(memory_mb));
            self.peak_memory_mb = Some(peak);
            Some(memory_mb)
        }
        #[cfg(not(feature = "cli"))]
        {
            None
        }
    }

    pub fn get_stats(&mut self) -> Option<RunStats> {
        if !self.enabled {
            return None;
        }
        let memory_usage_mb = self.memory_mb();
        Some(RunStats {
            frames: self.frames,
            longest_frame_gap: self.longest_frame_gap,
            memory_usage_mb,
            peak_memory_mb: self.peak_memory_mb,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    pub fn log_stats(&mut self, phase: &str) {
        if let Some(stats) = self.get_stats() {
            tracing::info!(
                "📊 {} - Frames: {}, Longest gap: {:?}, Memory: {}MB, Time: {:?}",
                phase,
                stats.frames,
                stats.longest_frame_gap,
                stats.memory_usage_mb.map_or_else(|| "n/a".to_string(), |m| m.to_string()),
                stats.elapsed_time
            );
        }
    }

    pub fn log_final_stats(&mut self) {
        if let Some(stats) = self.get_stats() {
            tracing::info!(
                "📊 Final Stats - Frames: {}, Total Time: {:?}, Peak Memory: {}MB",
                stats.frames,
                stats.elapsed_time,
                stats.peak_memory_mb.map_or_else(|| "n/a".to_string(), |m| m.to_string())
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
