//! Chart widget contract and per-canvas registry.
//!
//! A chart handle owns resources on the presentation side. Every renderer
//! goes through [`ChartRegistry::replace`], which destroys the chart already
//! on a canvas before creating its successor, so repeated page activations
//! never accumulate handles.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

/// Chart type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Ring chart.
    Doughnut,
    /// Line chart.
    Line,
    /// Vertical bar chart.
    Bar,
    /// Radar (spider) chart.
    Radar,
    /// Pie chart.
    Pie,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doughnut => write!(f, "doughnut"),
            Self::Line => write!(f, "line"),
            Self::Bar => write!(f, "bar"),
            Self::Radar => write!(f, "radar"),
            Self::Pie => write!(f, "pie"),
        }
    }
}

/// One data series.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Series label.
    pub label: String,
    /// One value per chart label.
    pub values: Vec<f64>,
}

/// Labels and series for a chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartConfig {
    /// Category labels.
    pub labels: Vec<String>,
    /// Data series.
    pub datasets: Vec<Dataset>,
}

impl ChartConfig {
    /// A chart with a single series.
    #[must_use]
    pub fn single(label: impl Into<String>, points: Vec<(String, f64)>) -> Self {
        let (labels, values) = points.into_iter().unzip();
        Self {
            labels,
            datasets: vec![Dataset {
                label: label.into(),
                values,
            }],
        }
    }

    /// Value of `label` in the first series.
    #[must_use]
    pub fn value_of(&self, label: &str) -> Option<f64> {
        let index = self.labels.iter().position(|l| l == label)?;
        self.datasets.first()?.values.get(index).copied()
    }
}

/// A live chart widget.
pub trait ChartHandle: Send + fmt::Debug {
    /// Release the widget.
    fn destroy(&mut self);

    /// Re-layout the widget for its container's current size.
    fn resize(&mut self);
}

/// Creates chart widgets on named canvases.
pub trait ChartFactory: Send + Sync + fmt::Debug {
    /// Create a chart on `canvas_id`.
    fn create(&self, canvas_id: &str, kind: ChartKind, config: ChartConfig)
        -> Box<dyn ChartHandle>;
}

/// Live chart handles keyed by canvas id.
#[derive(Debug)]
pub struct ChartRegistry {
    factory: Arc<dyn ChartFactory>,
    handles: HashMap<String, Box<dyn ChartHandle>>,
}

impl ChartRegistry {
    /// Create an empty registry over a factory.
    #[must_use]
    pub fn new(factory: Arc<dyn ChartFactory>) -> Self {
        Self {
            factory,
            handles: HashMap::new(),
        }
    }

    /// Destroy whatever is on `canvas_id`, then create a new chart there.
    pub fn replace(&mut self, canvas_id: &str, kind: ChartKind, config: ChartConfig) {
        if let Some(mut previous) = self.handles.remove(canvas_id) {
            previous.destroy();
        }
        let handle = self.factory.create(canvas_id, kind, config);
        debug!(canvas = canvas_id, %kind, "chart created");
        self.handles.insert(canvas_id.to_string(), handle);
    }

    /// Resize every live chart.
    pub fn resize_all(&mut self) {
        for handle in self.handles.values_mut() {
            handle.resize();
        }
    }

    /// Destroy every live chart. Returns how many were destroyed.
    pub fn destroy_all(&mut self) -> usize {
        let count = self.handles.len();
        for (_, mut handle) in self.handles.drain() {
            handle.destroy();
        }
        if count > 0 {
            debug!(count, "charts destroyed");
        }
        count
    }

    /// Number of live charts.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.handles.len()
    }
}

/// Counters and last configuration kept by [`RecordingCharts`].
#[derive(Debug, Default, Clone)]
pub struct ChartLedger {
    /// Charts created.
    pub created: usize,
    /// Charts destroyed.
    pub destroyed: usize,
    /// Resize calls.
    pub resized: usize,
    /// Last chart created per canvas.
    pub last: BTreeMap<String, (ChartKind, ChartConfig)>,
}

impl ChartLedger {
    /// Charts created and not yet destroyed.
    #[must_use]
    pub fn live(&self) -> usize {
        self.created.saturating_sub(self.destroyed)
    }
}

/// A [`ChartFactory`] that draws nothing and records everything.
///
/// Clones share one ledger.
#[derive(Debug, Default, Clone)]
pub struct RecordingCharts {
    ledger: Arc<Mutex<ChartLedger>>,
}

impl RecordingCharts {
    /// Create a factory with an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ChartLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the ledger.
    #[must_use]
    pub fn ledger(&self) -> ChartLedger {
        self.lock().clone()
    }

    /// Last configuration created on `canvas_id`.
    #[must_use]
    pub fn last(&self, canvas_id: &str) -> Option<(ChartKind, ChartConfig)> {
        self.lock().last.get(canvas_id).cloned()
    }

    /// Plain-text summary of the live charts.
    #[must_use]
    pub fn summary(&self) -> String {
        let ledger = self.lock();
        let mut out = format!(
            "charts: {} live ({} created, {} destroyed)\n",
            ledger.live(),
            ledger.created,
            ledger.destroyed
        );
        for (canvas, (kind, config)) in &ledger.last {
            out.push_str(&format!("  {canvas} ({kind}): {}\n", config.labels.join(", ")));
        }
        out
    }
}

impl ChartFactory for RecordingCharts {
    fn create(
        &self,
        canvas_id: &str,
        kind: ChartKind,
        config: ChartConfig,
    ) -> Box<dyn ChartHandle> {
        let mut ledger = self.lock();
        ledger.created += 1;
        ledger.last.insert(canvas_id.to_string(), (kind, config));
        Box::new(RecordedChart {
            ledger: Arc::clone(&self.ledger),
            destroyed: false,
        })
    }
}

#[derive(Debug)]
struct RecordedChart {
    ledger: Arc<Mutex<ChartLedger>>,
    destroyed: bool,
}

impl ChartHandle for RecordedChart {
    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.ledger
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .destroyed += 1;
        }
    }

    fn resize(&mut self) {
        self.ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .resized += 1;
    }
}
