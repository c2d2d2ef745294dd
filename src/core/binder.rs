use crate::core::easing::Easing;
use crate::core::format::ValueFormat;
use crate::core::scheduler::Animator;
use crate::core::timeline::Timeline;
use crate::domain::model::{DomainRecord, Metric, Reading};
use std::time::Duration;

/// Where an output's target comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetSource {
    Field(Metric),
    /// field / divisor, e.g. backlinks in billions
    Scaled { metric: Metric, divisor: f64 },
    /// field as a percentage of `limit`
    Share { metric: Metric, limit: f64 },
    Constant(f64),
}

impl TargetSource {
    pub fn resolve(self, record: Option<&DomainRecord>) -> f64 {
        match self {
            TargetSource::Field(metric) => metric.resolve(record),
            TargetSource::Scaled { metric, divisor } => metric.resolve(record) / divisor,
            TargetSource::Share { metric, limit } => metric.resolve(record) / limit * 100.0,
            TargetSource::Constant(value) => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Exact,
    Nearest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub source: TargetSource,
    pub rounding: Rounding,
    /// gauges stay within 0..=100
    pub clamp_percent: bool,
    /// a change of this output's target restarts the card's timeline
    pub restarts: bool,
    pub format: ValueFormat,
}

impl OutputSpec {
    pub fn new(key: &'static str, label: &'static str, source: TargetSource) -> Self {
        Self {
            key,
            label,
            source,
            rounding: Rounding::Exact,
            clamp_percent: false,
            restarts: true,
            format: ValueFormat::fixed(1),
        }
    }

    pub fn rounded(mut self) -> Self {
        self.rounding = Rounding::Nearest;
        self
    }

    pub fn clamped(mut self) -> Self {
        self.clamp_percent = true;
        self
    }

    pub fn live(mut self) -> Self {
        self.restarts = false;
        self
    }

    pub fn format(mut self, format: ValueFormat) -> Self {
        self.format = format;
        self
    }

    fn shape(&self, raw: f64) -> f64 {
        let value = if self.clamp_percent {
            raw.clamp(0.0, 100.0)
        } else {
            raw
        };
        match self.rounding {
            Rounding::Exact => value,
            Rounding::Nearest => value.round(),
        }
    }

    fn reading(&self, raw: f64, target: f64) -> Reading {
        let value = self.shape(raw);
        Reading {
            key: self.key.to_string(),
            label: self.label.to_string(),
            value,
            target: self.shape(target),
            display: self.format.render(value),
        }
    }
}

/// Binds one dataset field (or its default) to its own [`Timeline`].
#[derive(Debug)]
pub struct MetricBinder {
    output: OutputSpec,
    duration: Duration,
    timeline: Timeline,
}

impl MetricBinder {
    pub fn bind(
        animator: &Animator,
        output: OutputSpec,
        duration: Duration,
        record: Option<&DomainRecord>,
    ) -> Self {
        let target = output.source.resolve(record);
        let timeline = animator.start(target, duration, Easing::CubicOut);
        Self {
            output,
            duration,
            timeline,
        }
    }

    /// Re-resolves the target; a different target restarts from 0.
    pub fn rebind(&mut self, record: Option<&DomainRecord>) -> bool {
        let target = self.output.source.resolve(record);
        self.timeline.retarget(target, self.duration)
    }

    pub fn target(&self) -> f64 {
        self.timeline.target()
    }

    pub fn value(&self) -> f64 {
        self.output.shape(self.timeline.value())
    }

    pub fn fraction(&self) -> f64 {
        self.timeline.eased()
    }

    pub fn reading(&self) -> Reading {
        self.output
            .reading(self.timeline.value(), self.timeline.target())
    }

    pub fn is_settled(&self) -> bool {
        self.timeline.is_settled()
    }
}

/// Several outputs derived from one shared fraction: `output_i = max_i × fraction`.
///
/// All outputs hit their maxima on the same frame, the one where the
/// fraction reaches exactly 1.
#[derive(Debug)]
pub struct CompositeBinder {
    outputs: Vec<(OutputSpec, f64)>,
    duration: Duration,
    progress: Timeline,
}

impl CompositeBinder {
    pub fn bind(
        animator: &Animator,
        outputs: Vec<OutputSpec>,
        duration: Duration,
        record: Option<&DomainRecord>,
    ) -> Self {
        let outputs = outputs
            .into_iter()
            .map(|spec| {
                let max = spec.source.resolve(record);
                (spec, max)
            })
            .collect();
        Self {
            outputs,
            duration,
            progress: animator.progress(duration),
        }
    }

    /// 重新讀取所有最大值；只有標記為相依的輸出改變時才重播動畫
    pub fn rebind(&mut self, record: Option<&DomainRecord>) -> bool {
        let mut dependency_changed = false;
        for (spec, max) in &mut self.outputs {
            let resolved = spec.source.resolve(record);
            if spec.restarts && resolved.to_bits() != max.to_bits() {
                dependency_changed = true;
            }
            *max = resolved;
        }
        if dependency_changed {
            self.progress.restart(1.0, self.duration);
        }
        dependency_changed
    }

    pub fn fraction(&self) -> f64 {
        self.progress.value()
    }

    pub fn maxima(&self) -> Vec<f64> {
        self.outputs.iter().map(|(_, max)| *max).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        let fraction = self.fraction();
        self.outputs
            .iter()
            .map(|(spec, max)| spec.shape(max * fraction))
            .collect()
    }

    pub fn readings(&self) -> Vec<Reading> {
        let fraction = self.fraction();
        self.outputs
            .iter()
            .map(|(spec, max)| spec.reading(max * fraction, *max))
            .collect()
    }

    pub fn is_settled(&self) -> bool {
        self.progress.is_settled()
    }
}
