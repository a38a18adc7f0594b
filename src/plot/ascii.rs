//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output
//!
//! Plot elements:
//! - observed history: `o`
//! - central forecast (bridged from the last observation): `*` line
//! - interval bounds: `-` lines

use crate::app::pipeline::ForecastView;
use crate::report::format_value;

/// Render one category's history and forecast interval.
pub fn render_forecast_plot(view: &ForecastView, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let history: Vec<(f64, f64)> = view.history.iter().map(|p| (p.year as f64, p.value)).collect();
    let mut central = vec![(view.bridge.year0 as f64, view.bridge.value0)];
    central.extend(view.points.iter().map(|p| (p.year as f64, p.central)));
    let lower: Vec<(f64, f64)> = view.points.iter().map(|p| (p.year as f64, p.lower)).collect();
    let upper: Vec<(f64, f64)> = view.points.iter().map(|p| (p.year as f64, p.upper)).collect();

    let all = || history.iter().chain(&central).chain(&lower).chain(&upper);
    let (x_min, x_max) = range(all().map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = range(all().map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let frame = Frame {
        x_min,
        x_max,
        y_min,
        y_max,
        width,
        height,
    };

    // Central first so the bounds never hide it; history overlays everything.
    draw_series(&mut grid, &frame, &central, '*');
    draw_series(&mut grid, &frame, &upper, '-');
    draw_series(&mut grid, &frame, &lower, '-');
    for &(x, y) in &history {
        grid[frame.row(y)][frame.col(x)] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} years=[{:.0}, {:.0}] | y=[{}, {}]\n",
        view.category.display_name(),
        x_min,
        x_max,
        format_value(y_min),
        format_value(y_max)
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    width: usize,
    height: usize,
}

impl Frame {
    fn col(&self, x: f64) -> usize {
        let u = ((x - self.x_min) / (self.x_max - self.x_min)).clamp(0.0, 1.0);
        (u * (self.width as f64 - 1.0)).round() as usize
    }

    fn row(&self, y: f64) -> usize {
        let u = ((y - self.y_min) / (self.y_max - self.y_min)).clamp(0.0, 1.0);
        // y=top is max -> row 0
        (self.height as f64 - 1.0 - (u * (self.height as f64 - 1.0))).round() as usize
    }
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn draw_series(grid: &mut [Vec<char>], frame: &Frame, points: &[(f64, f64)], ch: char) {
    let mut prev = None;
    for &(x, y) in points {
        let (c, r) = (frame.col(x), frame.row(y));
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, c, r, ch),
            None => {
                if grid[r][c] == ' ' {
                    grid[r][c] = ch;
                }
            }
        }
        prev = Some((c, r));
    }
}

/// Integer line drawing (Bresenham-ish). Only fills empty cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::forecast_view;
    use crate::dataset::Dataset;
    use crate::domain::Category;

    #[test]
    fn plot_has_fixed_shape_and_all_markers() {
        let ds = Dataset::embedded().unwrap();
        let view = forecast_view(&ds, Category::Digital);
        let txt = render_forecast_plot(&view, 60, 12);

        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 13);
        assert!(lines[0].starts_with("Plot: Digital years=[2008, 2031]"));
        for ch in ['o', '*', '-'] {
            assert!(txt.contains(ch), "missing {ch}");
        }
        assert!(lines.iter().all(|l| l.chars().count() <= 60));
    }

    #[test]
    fn upper_bound_reaches_top_row() {
        let ds = Dataset::embedded().unwrap();
        let view = forecast_view(&ds, Category::Total);
        let txt = render_forecast_plot(&view, 40, 10);
        // The last upper bound is the maximum, so the top grid row ends with it.
        let top = txt.lines().nth(1).unwrap();
        assert!(top.ends_with('-'), "{top:?}");
    }
}
