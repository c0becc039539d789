//! Chart rendering
//!
//! Every chart is a single line series over "streaming time" in seconds,
//! drawn with `plotters` into a PNG (bitmap backend) or SVG file.

use crate::{
    error::{AppError, Result},
    models::{Config, TimeSeries},
    types::{ChartKind, ImageFormat},
};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::PathBuf;

/// X axis description shared by every chart
pub const X_AXIS_LABEL: &str = "Streaming Time (s)";

/// Everything needed to draw one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    /// Legend entry for the series, if any
    pub legend: Option<String>,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    /// Destination file
    pub path: PathBuf,
}

impl ChartSpec {
    /// Spec for a chart under the given configuration
    pub fn for_chart(kind: ChartKind, config: &Config) -> Self {
        let legend = match kind {
            ChartKind::Throughput => Some(config.series_label.clone()),
            _ => None,
        };

        Self {
            kind,
            title: kind.title().map(str::to_string),
            x_label: X_AXIS_LABEL.to_string(),
            y_label: kind.y_label().to_string(),
            legend,
            width: config.chart_width,
            height: config.chart_height,
            format: config.image_format,
            path: config.chart_path(kind),
        }
    }
}

/// Draws a series according to a spec
pub trait ChartRenderer {
    /// Render the chart and return the written file
    fn render(&self, series: &TimeSeries, spec: &ChartSpec) -> Result<PathBuf>;

    /// Renderer name for logs
    fn name(&self) -> &'static str;
}

/// Visual parameters of the plotters renderer
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub line_color: RGBColor,
    pub stroke_width: u32,
    pub grid_color: RGBColor,
    pub font_family: String,
    pub caption_size: u32,
    pub desc_size: u32,
    pub label_size: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            // matplotlib's 'c-'
            line_color: RGBColor(0, 191, 191),
            stroke_width: 2,
            grid_color: RGBColor(235, 235, 235),
            font_family: "sans-serif".to_string(),
            caption_size: 22,
            desc_size: 16,
            label_size: 13,
        }
    }
}

/// `plotters`-backed renderer
#[derive(Debug, Clone, Default)]
pub struct PlottersRenderer {
    style: ChartStyle,
}

impl PlottersRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: DrawingArea<DB, Shift>,
        series: &TimeSeries,
        spec: &ChartSpec,
    ) -> Result<()> {
        let (x_range, y_range) = axis_ranges(series)?;
        let font = self.style.font_family.as_str();

        root.fill(&WHITE).map_err(render_error)?;

        let mut builder = ChartBuilder::on(&root);
        builder
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(60);
        if let Some(title) = &spec.title {
            builder.caption(title, (font, self.style.caption_size));
        }
        let mut chart = builder
            .build_cartesian_2d(x_range, y_range)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .light_line_style(self.style.grid_color)
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .axis_desc_style((font, self.style.desc_size))
            .label_style((font, self.style.label_size))
            .x_label_formatter(&|x| format!("{:.0}", x))
            .draw()
            .map_err(render_error)?;

        let color = self.style.line_color;
        let stroke = self.style.stroke_width;
        let drawn = chart
            .draw_series(LineSeries::new(series.xy(), color.stroke_width(stroke)))
            .map_err(render_error)?;

        if let Some(legend) = &spec.legend {
            drawn
                .label(legend.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(stroke)));

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font((font, self.style.label_size))
                .position(SeriesLabelPosition::UpperRight)
                .draw()
                .map_err(render_error)?;
        }

        root.present().map_err(render_error)?;
        Ok(())
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, series: &TimeSeries, spec: &ChartSpec) -> Result<PathBuf> {
        if series.is_empty() {
            return Err(AppError::statistics(format!(
                "Chart '{}' has no data points to draw",
                spec.kind
            )));
        }

        let size = (spec.width, spec.height);
        match spec.format {
            ImageFormat::Png => {
                let root = BitMapBackend::new(&spec.path, size).into_drawing_area();
                self.draw(root, series, spec)?;
            }
            ImageFormat::Svg => {
                let root = SVGBackend::new(&spec.path, size).into_drawing_area();
                self.draw(root, series, spec)?;
            }
        }

        Ok(spec.path.clone())
    }

    fn name(&self) -> &'static str {
        "plotters"
    }
}

/// Factory for renderers
pub struct ChartRendererFactory;

impl ChartRendererFactory {
    /// Default renderer with the standard style
    pub fn create_renderer() -> Box<dyn ChartRenderer> {
        Box::new(PlottersRenderer::new(ChartStyle::default()))
    }
}

/// X from zero to the last window (at least one second); Y from `min(0, lo)` to 10% above the peak
pub fn axis_ranges(series: &TimeSeries) -> Result<(Range<f64>, Range<f64>)> {
    let (lo, hi) = series
        .value_range()
        .ok_or_else(|| AppError::statistics("Cannot compute axis ranges of an empty series"))?;

    let x_end = series.last_time().unwrap_or(0.0).max(1.0);

    let y_start = lo.min(0.0);
    let mut y_end = if hi > 0.0 { hi * 1.1 } else { hi };
    if y_end <= y_start {
        y_end = y_start + 1.0;
    }

    Ok((0.0..x_end, y_start..y_end))
}

fn render_error<E: std::fmt::Display>(error: E) -> AppError {
    AppError::render(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn series(values: &[f64]) -> TimeSeries {
        let mut series = TimeSeries::new("test");
        for (i, v) in values.iter().enumerate() {
            series.push(i as f64, *v, 24);
        }
        series
    }

    #[test]
    fn test_axis_ranges() {
        let (x, y) = axis_ranges(&series(&[2.0, 10.0, 4.0])).unwrap();
        assert_eq!(x, 0.0..2.0);
        assert_eq!(y.start, 0.0);
        assert!((y.end - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_ranges_single_flat_point() {
        let (x, y) = axis_ranges(&series(&[0.0])).unwrap();
        assert_eq!(x, 0.0..1.0);
        assert_eq!(y, 0.0..1.0);
    }

    #[test]
    fn test_axis_ranges_empty_series() {
        assert!(axis_ranges(&TimeSeries::new("empty")).is_err());
    }

    #[test]
    fn test_spec_for_latency_chart() {
        let config = Config {
            output_dir: PathBuf::from("plots"),
            ..Config::default()
        };
        let spec = ChartSpec::for_chart(ChartKind::EncodingLatency, &config);

        assert_eq!(spec.title.as_deref(), Some("Encoding Latency"));
        assert_eq!(spec.x_label, "Streaming Time (s)");
        assert_eq!(spec.y_label, "Latency (ms)");
        assert!(spec.legend.is_none());
        assert_eq!((spec.width, spec.height), (640, 480));
        assert_eq!(spec.path, Path::new("plots/encoding_time.png"));
    }

    #[test]
    fn test_spec_for_throughput_chart() {
        let config = Config {
            series_label: "WebRTC".to_string(),
            image_format: ImageFormat::Svg,
            ..Config::default()
        };
        let spec = ChartSpec::for_chart(ChartKind::Throughput, &config);

        assert!(spec.title.is_none());
        assert_eq!(spec.legend.as_deref(), Some("WebRTC"));
        assert_eq!(spec.y_label, "Network Throughput (Mbps)");
        assert!(spec.path.ends_with("throughput.svg"));
    }

    #[test]
    fn test_empty_series_is_not_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let spec = ChartSpec::for_chart(ChartKind::RoundTripTime, &config);

        let err = PlottersRenderer::default()
            .render(&TimeSeries::new("empty"), &spec)
            .unwrap_err();
        assert_eq!(err.category(), "STATS");
        assert!(!spec.path.exists());
    }

    #[test]
    fn test_default_style_is_cyan() {
        let renderer = ChartRendererFactory::create_renderer();
        assert_eq!(renderer.name(), "plotters");
        assert_eq!(ChartStyle::default().line_color, RGBColor(0, 191, 191));
    }
}
