//! Turning a finished sweep into per-metric series and report artifacts.
//!
//! Each reported metric yields one CSV log and one SVG figure inside the
//! experiment's output folder. File names depend only on the metric, so a
//! rerun of the same experiment overwrites the previous artifacts.

use crate::error::{Error, Result};
use crate::results::Metric;
use crate::sweep::SweepOutcome;
use plotters::backend::SVGBackend;
use plotters::prelude::*;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// One algorithm's line in a metric figure.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesLine {
    pub algorithm: String,
    /// `"<algorithm> - (<mean>)"`, mean to two decimals.
    pub label: String,
    pub values: Vec<f64>,
}

/// All algorithms' values of one metric over the shared dimension axis.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricSeries {
    pub metric: Metric,
    pub dimensions: Vec<usize>,
    pub lines: Vec<SeriesLine>,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Project the result matrix onto each requested metric, keeping the
/// algorithm order of the sweep.
pub fn aggregate(metrics: &[Metric], outcome: &SweepOutcome) -> Result<Vec<MetricSeries>> {
    let expected = outcome.dimensions.len();

    metrics
        .iter()
        .map(|&metric| {
            let lines = outcome
                .results
                .iter()
                .map(|results| {
                    let values = results.series(metric);
                    if values.len() != expected {
                        return Err(Error::IncompleteResults {
                            algorithm: results.algorithm.clone(),
                            metric: metric.to_string(),
                            expected,
                            found: values.len(),
                        });
                    }
                    Ok(SeriesLine {
                        algorithm: results.algorithm.clone(),
                        label: format!("{} - ({:.2})", results.algorithm, mean(values)),
                        values: values.to_vec(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(MetricSeries {
                metric,
                dimensions: outcome.dimensions.clone(),
                lines,
            })
        })
        .collect()
}

/// The per-experiment output folder and the artifact names inside it.
#[derive(Clone, Debug)]
pub struct OutputLayout {
    dir: PathBuf,
}

impl OutputLayout {
    /// Creates `<root>/<experiment>/` if it does not exist yet.
    pub fn prepare<P: AsRef<Path>>(root: P, experiment: &str) -> Result<Self> {
        let dir = root.as_ref().join(experiment);
        fs::create_dir_all(&dir)?;
        info!("experiment output is: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn csv_path(&self, metric: Metric) -> PathBuf {
        self.dir.join(format!("log_dimension_vs_{}.csv", metric))
    }

    pub fn plot_path(&self, metric: Metric) -> PathBuf {
        self.dir.join(format!("dimension_vs_{}.svg", metric))
    }
}

/// Writes one artifact per metric series.
pub trait ReportEmitter {
    fn emit(&self, layout: &OutputLayout, series: &MetricSeries) -> Result<PathBuf>;
}

/// Comma-separated log: a `dimensions` header row, then one row per
/// algorithm with its identifier first.
#[derive(Clone, Debug, Default)]
pub struct CsvEmitter;

impl CsvEmitter {
    const DELIMITER: &str = ",";
    const QUOTE: &str = "|";

    fn field(raw: &str) -> String {
        let needs_quotes = raw.contains(Self::DELIMITER)
            || raw.contains(Self::QUOTE)
            || raw.contains('\n')
            || raw.contains('\r');
        if !needs_quotes {
            return raw.to_string();
        }
        let doubled = raw.replace(Self::QUOTE, "||");
        format!("{}{}{}", Self::QUOTE, doubled, Self::QUOTE)
    }

    fn row<I, T>(first: &str, rest: I) -> String
    where
        I: IntoIterator<Item = T>,
        T: std::fmt::Debug,
    {
        let mut fields = vec![Self::field(first)];
        fields.extend(rest.into_iter().map(|v| format!("{:?}", v)));
        let mut line = fields.join(Self::DELIMITER);
        line.push_str("\r\n");
        line
    }

    pub fn render(series: &MetricSeries) -> String {
        let mut out = Self::row("dimensions", series.dimensions.iter());
        for line in &series.lines {
            out.push_str(&Self::row(&line.algorithm, line.values.iter()));
        }
        out
    }
}

impl ReportEmitter for CsvEmitter {
    fn emit(&self, layout: &OutputLayout, series: &MetricSeries) -> Result<PathBuf> {
        let path = layout.csv_path(series.metric);
        fs::write(&path, Self::render(series))?;
        info!("  wrote {}", path.display());
        Ok(path)
    }
}

fn plot_err<E: Display>(err: E) -> Error {
    Error::Plot(err.to_string())
}

/// Line chart of metric against dimensions, one line per algorithm.
#[derive(Clone, Debug)]
pub struct PlotEmitter {
    size: (u32, u32),
}

impl PlotEmitter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
        }
    }

    fn bounds<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
        let (lo, hi) = values
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if !lo.is_finite() {
            return (0.0, 1.0);
        }
        if (hi - lo).abs() < f64::EPSILON {
            let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
            return (lo - pad, hi + pad);
        }
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }
}

impl Default for PlotEmitter {
    fn default() -> Self {
        Self::new(1024, 768)
    }
}

impl ReportEmitter for PlotEmitter {
    fn emit(&self, layout: &OutputLayout, series: &MetricSeries) -> Result<PathBuf> {
        let path = layout.plot_path(series.metric);
        let metric = series.metric.as_str();

        let (x_lo, x_hi) = Self::bounds(series.dimensions.iter().map(|&d| d as f64));
        let (y_lo, y_hi) =
            Self::bounds(series.lines.iter().flat_map(|line| line.values.iter().copied()));

        {
            let root = SVGBackend::new(&path, self.size).into_drawing_area();
            root.fill(&WHITE).map_err(plot_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(format!("dimensions vs {}", metric), ("sans-serif", 20))
                .margin(20)
                .x_label_area_size(40)
                .y_label_area_size(60)
                .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
                .map_err(plot_err)?;

            chart
                .configure_mesh()
                .x_desc("dimensions")
                .y_desc(metric)
                .draw()
                .map_err(plot_err)?;

            for (idx, line) in series.lines.iter().enumerate() {
                let color = Palette99::pick(idx).to_rgba();
                let points: Vec<(f64, f64)> = series
                    .dimensions
                    .iter()
                    .zip(line.values.iter())
                    .map(|(&d, &v)| (d as f64, v))
                    .collect();

                chart
                    .draw_series(LineSeries::new(points, &color))
                    .map_err(plot_err)?
                    .label(line.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
            }

            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(plot_err)?;

            root.present().map_err(plot_err)?;
        }
        info!("  wrote {}", path.display());
        Ok(path)
    }
}
