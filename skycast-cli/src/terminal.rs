use std::io::{self, Write};

use skycast_core::{RenderTarget, RenderedView};

/// Render target that prints the widget to a terminal.
///
/// The clock and the search text are only shown as part of the next paint.
#[derive(Debug)]
pub struct TerminalTarget<W: Write + Send> {
    out: W,
    query: String,
    clock: String,
}

impl TerminalTarget<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalTarget<W> {
    pub fn new(out: W) -> Self {
        Self { out, query: String::new(), clock: String::new() }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_view(&mut self, view: &RenderedView) -> io::Result<()> {
        let out = &mut self.out;

        writeln!(out)?;
        match (self.query.is_empty(), self.clock.is_empty()) {
            (false, false) => writeln!(out, "  {}  ·  {}", self.query, self.clock)?,
            (false, true) => writeln!(out, "  {}", self.query)?,
            (true, false) => writeln!(out, "  {}", self.clock)?,
            (true, true) => {}
        }
        writeln!(out, "  {} {}   {}", view.condition_glyph, view.condition_label, view.temperature)?;
        writeln!(
            out,
            "  Rain {}   Humidity {}   Wind {}",
            view.rainfall, view.humidity, view.wind_speed
        )?;
        writeln!(out)?;
        writeln!(out, "  {:<5} {:<32} {:>8} {:>8}", "Day", "Condition", "Max", "Min")?;
        for row in &view.rows {
            writeln!(
                out,
                "  {:<5} {:<32} {:>8} {:>8}",
                row.day, row.condition, row.max_temp, row.min_temp
            )?;
        }
        out.flush()
    }
}

impl<W: Write + Send> RenderTarget for TerminalTarget<W> {
    fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    fn set_busy(&mut self, busy: bool) {
        if busy {
            eprintln!("Loading...");
        }
    }

    fn paint(&mut self, view: &RenderedView) {
        if let Err(e) = self.write_view(view) {
            tracing::warn!("Failed to write forecast to terminal: {}", e);
        }
    }

    fn set_clock(&mut self, time: &str) {
        self.clock = time.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_core::{ForecastView, render};

    #[test]
    fn paints_slots_and_rows() {
        let mut target = TerminalTarget::new(Vec::new());
        target.set_query("Sydney");
        target.set_clock("9 : 5");
        target.paint(&render(&ForecastView::placeholder()));

        let text = String::from_utf8(target.into_inner()).unwrap();
        assert!(text.contains("Sydney  ·  9 : 5"));
        assert!(text.contains("☀️ Clear   - -"));
        assert!(text.contains("Rain - -   Humidity - -   Wind - -"));
        assert!(text.contains("Condition"));
    }
}
