//! Figures of network responses and batch export
//!
//! A [`Figure`] is plain data (titled line traces). It is rendered to SVG with
//! plotters or dumped as CSV; [`save_all_figs`] writes a whole [`FigureSet`].

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::debug;

use crate::namespace::{ExportList, LoadError, ModuleDecl};
use crate::network::Network;

/// Namespace declaration of this module
pub const MODULE: ModuleDecl = ModuleDecl::new("plotting", exports);

/// Signature of [`save_all_figs`] as bound in the namespace
pub type SaveAllFigsFn = fn(&FigureSet, &Path, &[FigureFormat]) -> io::Result<Vec<PathBuf>>;

fn exports() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("plotting", module_path!())
        .ty::<Figure>("Figure")
        .ty::<Trace>("Trace")
        .ty::<FigureSet>("FigureSet")
        .ty::<FigureFormat>("FigureFormat")
        .function("save_all_figs", save_all_figs as SaveAllFigsFn))
}

const SVG_SIZE: (u32, u32) = (800, 600);

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Trace {
    pub fn new(label: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            x,
            y,
        }
    }

    fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .copied()
            .zip(self.y.iter().copied())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub traces: Vec<Trace>,
}

impl Figure {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    /// Magnitude in dB of every S-parameter against frequency
    pub fn s_db(ntwk: &Network) -> Self {
        let unit = ntwk.frequency.unit();
        let f = ntwk.frequency.f_scaled();
        let title = if ntwk.name().is_empty() { "s_db" } else { ntwk.name() };

        let mut fig = Self::new(title).with_labels(format!("Frequency ({})", unit), "Magnitude (dB)");
        for m in 0..ntwk.nports() {
            for n in 0..ntwk.nports() {
                fig.traces.push(Trace::new(
                    format!("S{}{}", m + 1, n + 1),
                    f.clone(),
                    ntwk.s_db_at(m, n),
                ));
            }
        }
        fig
    }

    /// Axis ranges covering all finite points, widened when degenerate
    fn bounds(&self) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);
        for (px, py) in self.traces.iter().flat_map(Trace::points) {
            x = (x.0.min(px), x.1.max(px));
            y = (y.0.min(py), y.1.max(py));
        }
        (widen(x), widen(y))
    }

    /// Render to an SVG file
    pub fn save_svg(&self, path: &Path) -> io::Result<()> {
        let root = SVGBackend::new(path, SVG_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let (x_range, y_range) = self.bounds();
        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()
            .map_err(draw_err)?;

        for (i, trace) in self.traces.iter().enumerate() {
            let color = Palette99::pick(i).to_rgba();
            chart
                .draw_series(LineSeries::new(trace.points(), color))
                .map_err(draw_err)?
                .label(trace.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        if !self.traces.is_empty() {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)
    }

    /// Write `trace,x,y` rows
    pub fn save_csv(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(fs::File::create(path)?);
        writeln!(out, "trace,x,y")?;
        for trace in &self.traces {
            let label = trace.label.replace('"', "\"\"");
            for (x, y) in trace.x.iter().zip(&trace.y) {
                writeln!(out, "\"{}\",{},{}", label, x, y)?;
            }
        }
        out.flush()
    }
}

fn widen((lo, hi): (f64, f64)) -> std::ops::Range<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if hi - lo <= f64::EPSILON * lo.abs().max(1.0) {
        return lo - 1.0..hi + 1.0;
    }
    lo..hi
}

fn draw_err<E: std::fmt::Display>(err: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

/// Ordered collection of figures
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FigureSet {
    figures: Vec<Figure>,
}

impl FigureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, figure: Figure) {
        self.figures.push(figure);
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Figure> {
        self.figures.iter()
    }
}

impl FromIterator<Figure> for FigureSet {
    fn from_iter<I: IntoIterator<Item = Figure>>(iter: I) -> Self {
        Self {
            figures: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureFormat {
    Svg,
    Csv,
}

impl FigureFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FigureFormat::Svg => "svg",
            FigureFormat::Csv => "csv",
        }
    }
}

/// File stem for a figure title; unique within one `save_all_figs` call
fn file_stem(title: &str, index: usize, used: &mut BTreeSet<String>) -> String {
    let slug: String = title
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let base = if slug.is_empty() {
        format!("figure_{}", index)
    } else {
        slug
    };

    let mut stem = base.clone();
    let mut n = 1;
    while !used.insert(stem.clone()) {
        stem = format!("{}_{}", base, n);
        n += 1;
    }
    stem
}

/// Save every figure in every format into `dir`, named after the figure titles
///
/// Creates `dir` if needed and returns the written paths in figure order.
pub fn save_all_figs(
    figures: &FigureSet,
    dir: &Path,
    formats: &[FigureFormat],
) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut used = BTreeSet::new();
    let mut written = Vec::with_capacity(figures.len() * formats.len());

    for (i, fig) in figures.iter().enumerate() {
        let stem = file_stem(&fig.title, i, &mut used);
        for format in formats {
            let path = dir.join(format!("{}.{}", stem, format.extension()));
            match format {
                FigureFormat::Svg => fig.save_svg(&path)?,
                FigureFormat::Csv => fig.save_csv(&path)?,
            }
            debug!(file = %path.display(), "saved figure");
            written.push(path);
        }
    }
    Ok(written)
}
