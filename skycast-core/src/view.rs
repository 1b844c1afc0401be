//! Turning a [`ForecastView`] into slot text, and the targets that display it.

use std::sync::{Mutex, PoisonError};

use serde_json::Number;

use crate::model::{ConditionCell, ForecastView};

/// Text for one row of the daily table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForecastRow {
    pub day: String,
    pub condition: String,
    pub max_temp: String,
    pub min_temp: String,
}

/// Text for every output slot of the widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedView {
    pub temperature: String,
    pub condition_label: String,
    pub condition_glyph: String,
    pub rainfall: String,
    pub humidity: String,
    pub wind_speed: String,
    pub rows: Vec<ForecastRow>,
}

pub fn render(view: &ForecastView) -> RenderedView {
    let current = &view.current;
    let (condition_glyph, condition_label) = match &current.condition {
        ConditionCell::Known(c) => (c.glyph.to_string(), c.label.to_string()),
        ConditionCell::Unknown => (String::new(), String::new()),
        ConditionCell::Placeholder => ("-".to_string(), "-".to_string()),
    };

    RenderedView {
        temperature: current.temperature.clone(),
        condition_label,
        condition_glyph,
        rainfall: current.rainfall.clone(),
        humidity: current.humidity.clone(),
        wind_speed: current.wind_speed.clone(),
        rows: view
            .daily
            .iter()
            .map(|day| ForecastRow {
                day: day.day_label.clone(),
                condition: condition_text(&day.condition),
                max_temp: degrees(day.max_temp.as_ref()),
                min_temp: degrees(day.min_temp.as_ref()),
            })
            .collect(),
    }
}

fn condition_text(cell: &ConditionCell) -> String {
    match cell {
        ConditionCell::Known(c) => format!("{} {}", c.glyph, c.label),
        ConditionCell::Unknown => String::new(),
        ConditionCell::Placeholder => "-".to_string(),
    }
}

fn degrees(temp: Option<&Number>) -> String {
    temp.map_or_else(|| "-".to_string(), |t| format!("{t} °"))
}

/// Output slots the view controller writes to.
pub trait RenderTarget: Send {
    fn set_query(&mut self, query: &str);
    fn set_busy(&mut self, busy: bool);
    fn paint(&mut self, view: &RenderedView);
    fn set_clock(&mut self, time: &str);
}

/// Run `f` with the target locked, recovering a poisoned lock.
pub fn with_target<T: RenderTarget, R>(
    target: &Mutex<T>,
    f: impl FnOnce(&mut T) -> R,
) -> R {
    let mut guard = target.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Render target that keeps slot contents in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTarget {
    pub query: String,
    pub busy: bool,
    pub view: RenderedView,
    pub clock: String,
    /// Number of times `paint` was called.
    pub paints: usize,
}

impl RenderTarget for MemoryTarget {
    fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn paint(&mut self, view: &RenderedView) {
        self.view = view.clone();
        self.paints += 1;
    }

    fn set_clock(&mut self, time: &str) {
        self.clock = time.to_string();
    }
}
