//! Ratatui-based terminal dashboard.
//!
//! Six tabs over one immutable [`Dataset`]. All UI selections live in
//! [`ViewState`]; any change that affects derived values rebuilds the
//! [`Dashboard`] through the shared pipeline.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs},
};
use tracing::{debug, info, warn};

use crate::app::pipeline::{Dashboard, Tab, TrendMode, ViewState, build_dashboard};
use crate::dataset::Dataset;
use crate::domain::{Category, Covariate};
use crate::error::AppError;
use crate::report::{format_percent, format_value};

mod plotters_chart;

use plotters_chart::{Series, SeriesChart, bounds};

/// One colour per tracked category, in declared order.
const PALETTE: [(u8, u8, u8); 7] = [
    (0, 200, 255),
    (80, 120, 255),
    (200, 200, 200),
    (255, 200, 0),
    (255, 0, 200),
    (255, 100, 60),
    (0, 220, 120),
];

const CYAN: RGBColor = RGBColor(0, 255, 255);
const GRAY: RGBColor = RGBColor(140, 140, 140);
const WHITE: RGBColor = RGBColor(255, 255, 255);
const YELLOW: RGBColor = RGBColor(255, 220, 0);
const GREEN: RGBColor = RGBColor(0, 255, 0);
const MAGENTA: RGBColor = RGBColor(255, 0, 200);

/// Start the TUI on an already-validated dataset.
pub fn run(dataset: Dataset) -> Result<(), AppError> {
    // Everything that can fail on the data happens before the terminal is touched.
    let mut app = App::new(dataset)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    info!("tui started");
    let result = app.event_loop(&mut terminal);
    info!("tui stopped");
    result
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    dataset: Dataset,
    view: ViewState,
    dashboard: Dashboard,
    status: String,
}

impl App {
    fn new(dataset: Dataset) -> Result<Self, AppError> {
        let view = ViewState::for_dataset(&dataset);
        let dashboard = build_dashboard(&dataset, &view)?;
        Ok(Self {
            dataset,
            view,
            dashboard,
            status: "Ready.".to_string(),
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one key press. Returns `true` to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.view.tab = self.view.tab.next(),
            KeyCode::Char(c @ '1'..='6') => {
                self.view.tab = Tab::ALL[(c as u8 - b'1') as usize];
            }
            KeyCode::Left | KeyCode::Right => {
                self.view.category = if code == KeyCode::Right {
                    self.view.category.next()
                } else {
                    self.view.category.prev()
                };
                self.status = format!("category: {}", self.view.category.display_name());
                self.rebuild();
            }
            KeyCode::Up | KeyCode::Down => {
                self.view.cycle_snapshot(&self.dataset, code == KeyCode::Up);
                self.status = format!("snapshot: {}", self.view.snapshot_year);
                self.rebuild();
            }
            KeyCode::Char('m') => {
                self.view.trend_mode = self.view.trend_mode.toggle();
                self.status = match self.view.trend_mode {
                    TrendMode::Line => "trend: total".to_string(),
                    TrendMode::StackedShare => "trend: stacked share".to_string(),
                };
            }
            KeyCode::Char('d') => {
                let dir = Path::new(crate::diagnostics::DEFAULT_DIR);
                self.status = match crate::diagnostics::write_diagnostics_report(dir, &self.dataset) {
                    Ok(path) => format!("Wrote diagnostics: {}", path.display()),
                    Err(err) => {
                        warn!(%err, "diagnostics write failed");
                        format!("Diagnostics write failed: {err}")
                    }
                };
            }
            _ => {}
        }
        debug!(view = ?self.view, "view updated");
        false
    }

    fn rebuild(&mut self) {
        match build_dashboard(&self.dataset, &self.view) {
            Ok(d) => self.dashboard = d,
            Err(err) => {
                warn!(%err, "dashboard rebuild failed");
                self.status = format!("{err}");
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_tabs(frame, chunks[1]);
        match self.view.tab {
            Tab::Trends => self.draw_trends(frame, chunks[2]),
            Tab::Forecast => self.draw_forecast(frame, chunks[2]),
            Tab::Media => self.draw_media(frame, chunks[2]),
            Tab::Digital => self.draw_digital(frame, chunks[2]),
            Tab::Correlations => self.draw_correlations(frame, chunks[2]),
            Tab::Models => self.draw_models(frame, chunks[2]),
        }
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let h = &self.dashboard.headline;
        let gray = Style::default().fg(Color::Gray);
        let lines = vec![
            Line::from(vec![
                Span::styled("adspend", Style::default().fg(Color::Cyan)),
                Span::raw(format!(
                    " - advertising investment {}-{}",
                    self.dataset.first_year(),
                    h.last_year
                )),
            ]),
            Line::from(Span::styled(
                format!(
                    "total {}: {} ({}) | digital share: {:.1}% | CAGR total {:+.2}% | CAGR digital {:+.2}% | forecast {}: {}",
                    h.last_year,
                    format_value(h.total_last),
                    format_percent(h.total_yoy),
                    h.digital_share,
                    h.cagr_total,
                    h.cagr_digital,
                    h.forecast_year,
                    format_value(h.forecast_total)
                ),
                gray,
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{} {}", i + 1, t.title()));
        let tabs = Tabs::new(titles)
            .select(self.view.tab.index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(tabs, area);
    }

    fn draw_trends(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let trends = &self.dashboard.trends;
        match self.view.trend_mode {
            TrendMode::Line => {
                let total: Vec<(f64, f64)> = trends.total.iter().map(|p| (p.year as f64, p.value)).collect();
                let breaks: Vec<(f64, f64)> = trends
                    .breaks
                    .iter()
                    .filter_map(|b| {
                        self.dataset
                            .value_at(Category::Total, b.year)
                            .map(|v| (b.year as f64, v))
                    })
                    .collect();
                let series = [Series::line(total, CYAN), Series::dots(breaks, YELLOW)];
                draw_chart(
                    frame,
                    chunks[0],
                    "Total spend (dots: structural breaks)",
                    &series,
                    Axes::new("year", "spend", fmt_year, fmt_money),
                );
            }
            TrendMode::StackedShare => {
                // Cumulative share per year, one outline per tracked category.
                let mut series: Vec<Series> = Category::TRACKED
                    .iter()
                    .map(|&c| Series::line(Vec::new(), category_rgb(c)))
                    .collect();
                for (&year, shares) in &trends.shares {
                    let mut acc = 0.0;
                    for (i, (_, share)) in shares.iter().enumerate() {
                        acc += share;
                        series[i].points.push((year as f64, acc));
                    }
                }
                draw_chart(
                    frame,
                    chunks[0],
                    "Stacked share of total (%)",
                    &series,
                    Axes::new("year", "share", fmt_year, fmt_pct),
                );
            }
        }

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        let yoy: Vec<(f64, f64)> = trends
            .yoy
            .iter()
            .filter_map(|p| p.percent.map(|v| (p.year as f64, v)))
            .collect();
        let ipc = trends.ipc.iter().map(|p| (p.year as f64, p.value)).collect();
        let series = [Series::line(ipc, GRAY), Series::line(yoy, GREEN)];
        draw_chart(
            frame,
            bottom[0],
            "Total YoY growth (green) vs IPC (gray), %",
            &series,
            Axes::new("year", "%", fmt_year, fmt_pct),
        );

        let trm = trends.trm.iter().map(|p| (p.year as f64, p.value)).collect();
        draw_chart(
            frame,
            bottom[1],
            "TRM (COP/USD)",
            &[Series::line(trm, YELLOW)],
            Axes::new("year", "COP", fmt_year, fmt_money),
        );
    }

    fn draw_forecast(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(10)])
            .split(area);

        let view = &self.dashboard.forecast;
        let history: Vec<(f64, f64)> = view.history.iter().map(|p| (p.year as f64, p.value)).collect();
        let mut central = vec![(view.bridge.year0 as f64, view.bridge.value0)];
        central.extend(view.points.iter().map(|p| (p.year as f64, p.central)));
        let lower = view.points.iter().map(|p| (p.year as f64, p.lower)).collect();
        let upper = view.points.iter().map(|p| (p.year as f64, p.upper)).collect();

        let series = [
            Series::line(lower, GRAY),
            Series::line(upper, GRAY),
            Series::line(history, WHITE),
            Series::line(central, CYAN),
        ];
        let title = format!(
            "Forecast: {} | history {}-{} | CAGR {:+.2}% | 95% interval (gray)",
            view.category.display_name(),
            view.span.0,
            view.span.1,
            view.cagr
        );
        draw_chart(
            frame,
            chunks[0],
            &title,
            &series,
            Axes::new("year", "spend", fmt_year, fmt_money),
        );

        let rows = &self.dashboard.forecast_table;
        let mut header = vec![Cell::from("year")];
        let mut widths = vec![Constraint::Length(6)];
        if let Some(first) = rows.first() {
            for (c, _) in &first.cells {
                let style = if *c == view.category {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                header.push(Cell::from(c.display_name()).style(style));
                widths.push(Constraint::Min(20));
            }
        }
        let body = rows.iter().map(|r| {
            let mut cells = vec![Cell::from(r.year.to_string())];
            cells.extend(r.cells.iter().map(|(_, p)| {
                Cell::from(format!(
                    "{} [{}-{}]",
                    format_value(p.central),
                    format_value(p.lower),
                    format_value(p.upper)
                ))
            }));
            Row::new(cells)
        });
        let table = Table::new(body, widths)
            .header(Row::new(header))
            .block(Block::default().title("Forecast table").borders(Borders::ALL));
        frame.render_widget(table, chunks[1]);
    }

    fn draw_media(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(11)])
            .split(area);

        let years = self.dataset.years();
        let series: Vec<Series> = Category::TRACKED
            .iter()
            .map(|&c| {
                let points = years
                    .iter()
                    .zip(self.dataset.series(c))
                    .map(|(&y, &v)| (y as f64, v))
                    .collect();
                Series::line(points, category_rgb(c))
            })
            .collect();
        draw_chart(
            frame,
            chunks[0],
            "Spend by medium",
            &series,
            Axes::new("year", "spend", fmt_year, fmt_money),
        );

        let ranking = &self.dashboard.ranking;
        let max = ranking.ranked.first().map(|(_, v)| *v).unwrap_or(0.0);
        let rows = ranking
            .ranked
            .iter()
            .zip(&ranking.shares)
            .enumerate()
            .map(|(i, ((c, v), share))| {
                let width = if max > 0.0 { (v / max * 30.0).round() as usize } else { 0 };
                Row::new(vec![
                    Cell::from(format!("{}", i + 1)),
                    Cell::from(c.display_name()).style(Style::default().fg(category_color(*c))),
                    Cell::from(format_value(*v)),
                    Cell::from(format!("{share:.1}%")),
                    Cell::from("█".repeat(width)).style(Style::default().fg(category_color(*c))),
                ])
            });
        let table = Table::new(
            rows,
            [
                Constraint::Length(3),
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Min(10),
            ],
        )
        .header(Row::new(vec!["#", "medium", "spend", "share", ""]).style(Style::default().add_modifier(Modifier::BOLD)))
        .block(
            Block::default()
                .title(format!("Ranking {} (↑/↓ to change year)", ranking.year))
                .borders(Borders::ALL),
        );
        frame.render_widget(table, chunks[1]);
    }

    fn draw_digital(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        let digital = &self.dashboard.digital;
        let spend: Vec<(f64, f64)> = digital.spend.iter().map(|p| (p.year as f64, p.value)).collect();
        draw_chart(
            frame,
            cols[0],
            "Digital spend",
            &[Series::line(spend, MAGENTA)],
            Axes::new("year", "spend", fmt_year, fmt_money),
        );

        let reg = &digital.regression;
        let scatter = reg.x_scatter.iter().copied().zip(reg.y_scatter.iter().copied()).collect();
        let fit = reg.x_line.iter().copied().zip(reg.y_line.iter().copied()).collect();
        draw_chart(
            frame,
            cols[1],
            "Internet penetration vs digital spend",
            &[Series::line(fit, CYAN), Series::dots(scatter, WHITE)],
            Axes::new("internet", "spend", fmt_frac, fmt_money),
        );

        let share = digital.share.last().map(|p| p.value).unwrap_or_default();
        let internet = digital.internet.last().map(|p| p.value).unwrap_or_default();
        let text = format!(
            "R² {:.3} | slope {} per unit | intercept {} | p {:.2e} | digital share {:.1}% | internet {:.1}%",
            reg.r2,
            format_value(reg.slope),
            format_value(reg.intercept),
            reg.p_value,
            share,
            internet
        );
        let p = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, rows[1]);
    }

    fn draw_correlations(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(0)])
            .split(area);

        let ranked = self.dashboard.correlations.iter().map(|(label, r)| {
            let n = (r.abs() * 20.0).round() as usize;
            Row::new(vec![
                Cell::from(label.clone()),
                Cell::from(format!("{r:+.3}")),
                Cell::from("█".repeat(n)).style(Style::default().fg(corr_color(*r))),
            ])
        });
        let table = Table::new(
            ranked,
            [Constraint::Length(10), Constraint::Length(7), Constraint::Min(10)],
        )
        .header(Row::new(vec!["label", "r", ""]).style(Style::default().add_modifier(Modifier::BOLD)))
        .block(Block::default().title("Correlation with Total").borders(Borders::ALL));
        frame.render_widget(table, cols[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(14), Constraint::Min(0)])
            .split(cols[1]);
        let scatter_cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(right[1]);
        for (scatter, &rect) in self.dashboard.scatters.iter().zip(scatter_cols.iter()) {
            let (title, axes, color) = match scatter.covariate {
                Covariate::Trm => (
                    "TRM vs total spend",
                    Axes::new("TRM", "spend", fmt_money, fmt_money),
                    YELLOW,
                ),
                Covariate::Ipc | Covariate::Internet => (
                    "IPC vs total spend",
                    Axes::new("IPC %", "spend", fmt_pct, fmt_money),
                    CYAN,
                ),
            };
            draw_chart(frame, rect, title, &[Series::dots(scatter.points.clone(), color)], axes);
        }

        let matrix = self.dataset.correlation();
        let labels = matrix.labels();
        let mut header = vec![Cell::from("")];
        header.extend(labels.iter().map(|l| Cell::from(short_label(l))));
        let rows = (0..matrix.dim()).map(|i| {
            let mut cells = vec![Cell::from(short_label(&labels[i])).style(Style::default().add_modifier(Modifier::BOLD))];
            cells.extend((0..matrix.dim()).map(|j| {
                let r = matrix.get(i, j);
                Cell::from(format!("{r:+.2}")).style(Style::default().fg(corr_color(r)))
            }));
            Row::new(cells)
        });
        let widths = std::iter::repeat_n(Constraint::Length(6), matrix.dim() + 1);
        let table = Table::new(rows, widths)
            .header(Row::new(header).style(Style::default().add_modifier(Modifier::BOLD)))
            .block(Block::default().title("Correlation matrix").borders(Borders::ALL));
        frame.render_widget(table, right[0]);
    }

    fn draw_models(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(12), Constraint::Min(0)])
            .split(area);

        let rows = self.dashboard.models.iter().map(|r| {
            Row::new(vec![
                Cell::from(r.category.display_name()),
                Cell::from(format!("{}-{}", r.span.0, r.span.1)),
                Cell::from(format!("{:.1}", r.aic)),
                Cell::from(format!("{:.1}", r.bic)),
                Cell::from(format_value(r.rmse)),
                Cell::from(format!("{:+.2}%", r.cagr)),
                Cell::from(r.trend.label()),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(10),
                Constraint::Length(9),
                Constraint::Min(16),
            ],
        )
        .header(
            Row::new(vec!["category", "span", "AIC", "BIC", "RMSE", "CAGR", "trend"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().title("Model metrics").borders(Borders::ALL));
        frame.render_widget(table, chunks[0]);

        let note = Paragraph::new(
            "Metrics and forecasts are precomputed. Trend: growing > 5%, rising slightly > 0%, falling slightly > -3%, otherwise declining.",
        )
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(note, chunks[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab/1-6 tab  ←/→ category  ↑/↓ year  m trend mode  d diagnostics  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Axis labels and tick formatting for one chart.
#[derive(Clone, Copy)]
struct Axes {
    x_label: &'static str,
    y_label: &'static str,
    fmt_x: fn(f64) -> String,
    fmt_y: fn(f64) -> String,
}

impl Axes {
    fn new(x_label: &'static str, y_label: &'static str, fmt_x: fn(f64) -> String, fmt_y: fn(f64) -> String) -> Self {
        Self {
            x_label,
            y_label,
            fmt_x,
            fmt_y,
        }
    }
}

fn draw_chart(frame: &mut ratatui::Frame<'_>, area: Rect, title: &str, series: &[Series], axes: Axes) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let (x_bounds, y_bounds) = bounds(series);
    let (chart_rect, insets) = chart_layout(inner);
    let widget = SeriesChart {
        series,
        x_bounds,
        y_bounds,
        x_label: axes.x_label,
        y_label: axes.y_label,
        fmt_x: axes.fmt_x,
        fmt_y: axes.fmt_y,
    };
    frame.render_widget(widget, chart_rect);
    if let Some(insets) = insets {
        draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds, axes);
    }
}

fn category_rgb(c: Category) -> RGBColor {
    let (r, g, b) = PALETTE[c.ordinal() % PALETTE.len()];
    RGBColor(r, g, b)
}

fn category_color(c: Category) -> Color {
    let (r, g, b) = PALETTE[c.ordinal() % PALETTE.len()];
    Color::Rgb(r, g, b)
}

fn corr_color(r: f64) -> Color {
    match r {
        r if r >= 0.7 => Color::Green,
        r if r >= 0.3 => Color::LightGreen,
        r if r > -0.3 => Color::Gray,
        r if r > -0.7 => Color::LightRed,
        _ => Color::Red,
    }
}

fn short_label(label: &str) -> String {
    label.chars().take(5).collect()
}

fn fmt_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_money(v: f64) -> String {
    format_value(v)
}

fn fmt_pct(v: f64) -> String {
    format!("{v:.0}%")
}

fn fmt_frac(v: f64) -> String {
    format!("{:.0}%", v * 100.0)
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    axes: Axes,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = (axes.fmt_x)(x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = (axes.fmt_y)(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(axes.x_label)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(axes.y_label).style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(Dataset::embedded().unwrap()).unwrap()
    }

    #[test]
    fn number_keys_select_tabs() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('4')));
        assert_eq!(app.view.tab, Tab::Digital);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.view.tab, Tab::Correlations);
    }

    #[test]
    fn category_keys_rebuild_forecast() {
        let mut app = app();
        assert_eq!(app.dashboard.forecast.category, Category::Total);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.dashboard.forecast.category, Category::TvNacional);
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.dashboard.forecast.category, Category::Exterior);
    }

    #[test]
    fn snapshot_keys_rebuild_ranking() {
        let mut app = app();
        assert_eq!(app.dashboard.ranking.year, 2025);
        app.handle_key(KeyCode::Up);
        assert_eq!(app.dashboard.ranking.year, 2008);
        assert_eq!(app.status, "snapshot: 2008");
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Esc));
    }

    fn rendered_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn macro_covariates_are_drawn() {
        let mut app = app();
        assert!(rendered_text(&app).contains("TRM (COP/USD)"));

        app.handle_key(KeyCode::Char('5'));
        let text = rendered_text(&app);
        assert!(text.contains("TRM vs total spend"));
        assert!(text.contains("IPC vs total spend"));
        assert!(text.contains("Correlation matrix"));
    }

    #[test]
    fn every_tab_renders() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
        for tab in Tab::ALL {
            app.view.tab = tab;
            for mode in [TrendMode::Line, TrendMode::StackedShare] {
                app.view.trend_mode = mode;
                terminal.draw(|f| app.draw(f)).unwrap();
            }
        }
    }
}
