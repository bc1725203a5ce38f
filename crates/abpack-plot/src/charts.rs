//! SVG charts for prediction runs.
//!
//! Two views of an evaluation: measured against predicted angles with the
//! identity line, and a histogram of the signed errors. Everything is
//! plain SVG elements so the output opens anywhere.

use anyhow::Context;
use std::path::Path;
use svg::node::element::{Circle, Line, Rectangle, Text};
use svg::Document;

const WIDTH: f64 = 520.0;
const HEIGHT: f64 = 520.0;
const MARGIN: f64 = 60.0;
const TICKS: usize = 5;

fn plot_span() -> f64 {
    WIDTH - 2.0 * MARGIN
}

/// Data bounds with a little padding, falling back to a fixed window for
/// empty or constant input.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (-60.0, -30.0);
    }
    if lo == hi {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn x_pixel(v: f64, lo: f64, hi: f64) -> f64 {
    MARGIN + (v - lo) / (hi - lo) * plot_span()
}

fn y_pixel(v: f64, lo: f64, hi: f64) -> f64 {
    MARGIN + (1.0 - (v - lo) / (hi - lo)) * plot_span()
}

fn axis_line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
    Line::new()
        .set("x1", x1)
        .set("y1", y1)
        .set("x2", x2)
        .set("y2", y2)
        .set("stroke", "black")
        .set("stroke-width", 1.0)
}

fn label(text: &str, x: f64, y: f64) -> Text {
    Text::new(text)
        .set("x", x)
        .set("y", y)
        .set("text-anchor", "middle")
        .set("font-family", "sans-serif")
        .set("font-size", 12)
}

fn base_document(title: &str) -> Document {
    let document = Document::new()
        .set("width", WIDTH)
        .set("height", HEIGHT)
        .set("viewBox", (0.0, 0.0, WIDTH, HEIGHT));
    document.add(
        label(title, WIDTH / 2.0, MARGIN / 2.0)
            .set("font-size", 15)
            .set("font-weight", "bold"),
    )
}

fn frame(mut document: Document, x_title: &str, y_title: &str) -> Document {
    let bottom = HEIGHT - MARGIN;
    document = document
        .add(axis_line(MARGIN, bottom, WIDTH - MARGIN, bottom))
        .add(axis_line(MARGIN, MARGIN, MARGIN, bottom));
    document = document.add(label(x_title, WIDTH / 2.0, HEIGHT - MARGIN / 3.0));
    document.add(
        label(y_title, MARGIN / 3.0, HEIGHT / 2.0).set(
            "transform",
            format!("rotate(-90 {} {})", MARGIN / 3.0, HEIGHT / 2.0),
        ),
    )
}

fn x_ticks(mut document: Document, lo: f64, hi: f64, format: impl Fn(f64) -> String) -> Document {
    let bottom = HEIGHT - MARGIN;
    for i in 0..=TICKS {
        let v = lo + (hi - lo) * i as f64 / TICKS as f64;
        let x = x_pixel(v, lo, hi);
        document = document
            .add(axis_line(x, bottom, x, bottom + 5.0))
            .add(label(&format(v), x, bottom + 18.0));
    }
    document
}

fn y_ticks(mut document: Document, lo: f64, hi: f64, format: impl Fn(f64) -> String) -> Document {
    for i in 0..=TICKS {
        let v = lo + (hi - lo) * i as f64 / TICKS as f64;
        let y = y_pixel(v, lo, hi);
        document = document
            .add(axis_line(MARGIN - 5.0, y, MARGIN, y))
            .add(label(&format(v), MARGIN - 22.0, y + 4.0));
    }
    document
}

/// Measured against predicted angles on a shared scale, with the identity
/// line for reference. `pairs` holds `(measured, predicted)`.
pub fn scatter_actual_predicted(pairs: &[(f64, f64)], title: &str) -> Document {
    let (lo, hi) = bounds(pairs.iter().flat_map(|&(a, p)| [a, p].into_iter()));

    let mut document = frame(
        base_document(title),
        "measured angle (deg)",
        "predicted angle (deg)",
    );
    document = x_ticks(document, lo, hi, |v| format!("{v:.0}"));
    document = y_ticks(document, lo, hi, |v| format!("{v:.0}"));

    document = document.add(
        Line::new()
            .set("x1", x_pixel(lo, lo, hi))
            .set("y1", y_pixel(lo, lo, hi))
            .set("x2", x_pixel(hi, lo, hi))
            .set("y2", y_pixel(hi, lo, hi))
            .set("stroke", "gray")
            .set("stroke-width", 1.0)
            .set("stroke-dasharray", "4 3"),
    );

    for &(actual, predicted) in pairs {
        document = document.add(
            Circle::new()
                .set("cx", x_pixel(actual, lo, hi))
                .set("cy", y_pixel(predicted, lo, hi))
                .set("r", 4.0)
                .set("fill", "steelblue")
                .set("fill-opacity", 0.7)
                .set("stroke", "black")
                .set("stroke-width", 0.5),
        );
    }
    document
}

/// Histogram of signed prediction errors.
pub fn error_histogram(errors: &[f64], bins: usize, title: &str) -> Document {
    let bins = bins.max(1);
    let (lo, hi) = bounds(errors.iter().copied());
    let bin_width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &e in errors {
        let i = (((e - lo) / bin_width) as usize).min(bins - 1);
        counts[i] += 1;
    }
    let top = counts.iter().copied().max().unwrap_or(0).max(1) as f64;

    let mut document = frame(base_document(title), "prediction error (deg)", "count");
    document = x_ticks(document, lo, hi, |v| format!("{v:.1}"));
    document = y_ticks(document, 0.0, top, |v| format!("{v:.0}"));

    let bottom = HEIGHT - MARGIN;
    for (i, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let x0 = x_pixel(lo + bin_width * i as f64, lo, hi);
        let x1 = x_pixel(lo + bin_width * (i + 1) as f64, lo, hi);
        let y = y_pixel(count as f64, 0.0, top);
        document = document.add(
            Rectangle::new()
                .set("x", x0)
                .set("y", y)
                .set("width", (x1 - x0).max(0.0))
                .set("height", bottom - y)
                .set("fill", "steelblue")
                .set("fill-opacity", 0.8)
                .set("stroke", "black")
                .set("stroke-width", 0.5),
        );
    }
    document
}

pub fn save(document: &Document, path: &Path) -> anyhow::Result<()> {
    svg::save(path, document).with_context(|| format!("writing chart {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn scatter_draws_one_circle_per_pair() {
        let pairs = vec![(-44.7, -45.2), (-46.3, -46.0), (-49.2, -48.1)];
        let rendered = scatter_actual_predicted(&pairs, "run 1").to_string();
        assert_eq!(count(&rendered, "<circle"), 3);
        assert!(rendered.contains("stroke-dasharray"));
        assert!(rendered.contains("run 1"));
        assert!(rendered.contains("measured angle"));
    }

    #[test]
    fn histogram_draws_occupied_bins() {
        let errors = vec![-1.0, -0.5, 0.0, 0.5, 1.0];
        let rendered = error_histogram(&errors, 5, "errors").to_string();
        assert_eq!(count(&rendered, "<rect"), 5);

        let sparse = error_histogram(&[0.0, 0.1], 10, "errors").to_string();
        assert!(count(&sparse, "<rect") < 10);
    }

    #[test]
    fn empty_input_still_renders() {
        let scatter = scatter_actual_predicted(&[], "empty").to_string();
        assert_eq!(count(&scatter, "<circle"), 0);
        assert!(scatter.contains("<svg"));

        let hist = error_histogram(&[], 8, "empty").to_string();
        assert_eq!(count(&hist, "<rect"), 0);
    }

    #[test]
    fn save_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scatter.svg");
        save(&scatter_actual_predicted(&[(-44.0, -44.5)], "t"), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("<svg"));
        assert!(text.contains("<circle"));
    }
}
