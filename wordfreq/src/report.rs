use anyhow::Result;
use common::FrequencyTable;
use owo_colors::OwoColorize;
use std::io::{self, Write};
use tracing::debug;

pub const X_LABEL: &str = "Count";
pub const Y_LABEL: &str = "Word";

/// Cells taken by the longest bar.
const BAR_WIDTH: usize = 50;
const BAR_CELL: char = '█';

/// A horizontal bar chart, first bar on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarChart {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub bars: Vec<(String, u64)>,
}

impl BarChart {
    /// The `n` most frequent words, highest count first.
    pub fn top_words(table: &FrequencyTable, n: usize) -> Self {
        Self {
            title: format!("Top {n} most frequent words"),
            x_label: X_LABEL,
            y_label: Y_LABEL,
            bars: table
                .top_n(n)
                .into_iter()
                .map(|(word, count)| (word.to_string(), count))
                .collect(),
        }
    }
}

pub trait Render {
    fn render(&mut self, chart: &BarChart) -> Result<()>;
}

/// Draws charts as text.
#[derive(Debug)]
pub struct TerminalChart<W> {
    out: W,
    color: bool,
}

impl TerminalChart<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), true)
    }
}

impl<W: Write> TerminalChart<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Bar length in cells; any non-zero count gets at least one.
fn bar_len(count: u64, max: u64) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    let width = BAR_WIDTH as u64;
    ((count * width + max - 1) / max).min(width) as usize
}

impl<W: Write> Render for TerminalChart<W> {
    fn render(&mut self, chart: &BarChart) -> Result<()> {
        let max = chart.bars.iter().map(|(_, c)| *c).max().unwrap_or(0);
        let label_width = chart
            .bars
            .iter()
            .map(|(w, _)| w.chars().count())
            .chain([chart.y_label.len()])
            .max()
            .unwrap_or(0);

        writeln!(self.out, "{}", chart.title)?;
        writeln!(self.out)?;
        writeln!(self.out, "{:>label_width$}", chart.y_label)?;
        for (word, count) in &chart.bars {
            let bar: String = std::iter::repeat(BAR_CELL).take(bar_len(*count, max)).collect();
            if self.color {
                writeln!(self.out, "{word:>label_width$} | {} {count}", bar.green())?;
            } else {
                writeln!(self.out, "{word:>label_width$} | {bar} {count}")?;
            }
        }
        writeln!(
            self.out,
            "{:>label_width$} +{}",
            "",
            "-".repeat(BAR_WIDTH + 1)
        )?;
        writeln!(
            self.out,
            "{:>width$}",
            chart.x_label,
            width = label_width + 3 + BAR_WIDTH
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// Renders the `n` most frequent words of `table`.
pub fn report<R: Render + ?Sized>(table: &FrequencyTable, n: usize, renderer: &mut R) -> Result<()> {
    let chart = BarChart::top_words(table, n);
    debug!("rendering {} bars", chart.bars.len());
    renderer.render(&chart)
}
