//! Kuramoto TUI Dashboard Module
//! ==============================
//!
//! Live terminal view of a running session with keyboard control of the
//! coupling strength. Uses Ratatui for rendering and Crossbeam channels
//! between the UI and the simulation thread.
//!
//! Enable with the `dashboard` feature flag.
//!
//! Features:
//! - Order parameter gauge and coupling readout
//! - r(t) chart over the scrolling display window
//! - Per-node phase table
//! - `+`/`-` (or arrows) nudge K, `r` resets phases, `q` quits

use std::io::{self, Write};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use kuramoto_core::mean_phase;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph, Row, Table},
    Frame, Terminal,
};
use tracing::{debug, warn};

use crate::history::SyncSample;
use crate::session::{SimSession, COUPLING_STEP};
use crate::visualizer::{phase_color, RerunLogger};

/// Rows shown in the phase table.
const PHASE_TABLE_ROWS: usize = 16;

// =============================================================================
// CHANNEL MESSAGES
// =============================================================================

/// Snapshot sent from the simulation thread to the TUI after every change.
#[derive(Debug, Clone, Default)]
pub struct MetricPacket {
    /// Integrator tick (0 right after a reset)
    pub tick: u64,
    /// Simulated time
    pub time: f64,
    /// Coupling strength in effect
    pub coupling: f64,
    /// Order parameter r
    pub order_parameter: f64,
    /// Mean phase ψ, if defined
    pub mean_phase: Option<f64>,
    /// Node phases in index order
    pub phases: Vec<f64>,
    /// Visible x range of the r(t) chart
    pub window: (u64, u64),
    /// Session history samples inside `window`, oldest first
    pub samples: Vec<SyncSample>,
}

impl MetricPacket {
    pub fn from_session(session: &SimSession) -> Self {
        let history = session.history();
        let window = history.display_window();
        Self {
            window,
            samples: history.iter().filter(|s| s.tick >= window.0).copied().collect(),
            tick: session.tick_count(),
            time: session.time(),
            coupling: session.coupling(),
            order_parameter: session.order_parameter(),
            mean_phase: mean_phase(session.phase()),
            phases: session.phase().to_vec(),
        }
    }
}

/// Commands sent from the TUI to the simulation thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    IncreaseCoupling,
    DecreaseCoupling,
    Reset,
    Quit,
}

impl ControlCommand {
    /// Key binding lookup.
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => Some(Self::IncreaseCoupling),
            KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Down => Some(Self::DecreaseCoupling),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Self::Reset),
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Applies a command to the session. Returns `false` once the loop should stop.
pub fn apply_command(session: &mut SimSession, command: ControlCommand, logger: &RerunLogger) -> bool {
    match command {
        ControlCommand::IncreaseCoupling | ControlCommand::DecreaseCoupling => {
            let delta = if command == ControlCommand::IncreaseCoupling {
                COUPLING_STEP
            } else {
                -COUPLING_STEP
            };
            let k = session.adjust_coupling(delta);
            debug!("Coupling -> {:.1}", k);
            logger.log_event(&format!("coupling K={:.1}", k));
        }
        ControlCommand::Reset => match session.reset() {
            Ok(()) => {
                logger.set_tick(0);
                logger.log_event(&format!("reset (r={:.3})", session.order_parameter()));
            }
            Err(e) => warn!("Reset failed: {}", e),
        },
        ControlCommand::Quit => return false,
    }
    true
}

// =============================================================================
// SIMULATION THREAD
// =============================================================================

/// Handle to a session running on its own thread.
pub struct SimulationHandle {
    /// Metric stream for the UI
    pub metrics: Receiver<MetricPacket>,
    /// Control channel into the simulation
    pub control: Sender<ControlCommand>,
    thread: JoinHandle<SimSession>,
}

impl SimulationHandle {
    /// Stops the simulation and hands the session back.
    pub fn stop(self) -> io::Result<SimSession> {
        let _ = self.control.send(ControlCommand::Quit);
        self.thread
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "simulation thread panicked"))
    }
}

/// Spawns `session` on a thread that ticks every `interval` and obeys commands.
///
/// Every tick is also streamed to `logger`.
pub fn spawn_simulation(session: SimSession, interval: Duration, logger: RerunLogger) -> SimulationHandle {
    let (metric_tx, metric_rx) = channel::unbounded();
    let (control_tx, control_rx) = channel::unbounded();

    let thread = thread::spawn(move || {
        simulation_loop(session, interval, &logger, metric_tx, control_rx)
    });

    SimulationHandle {
        metrics: metric_rx,
        control: control_tx,
        thread,
    }
}

fn simulation_loop(
    mut session: SimSession,
    interval: Duration,
    logger: &RerunLogger,
    metrics: Sender<MetricPacket>,
    control: Receiver<ControlCommand>,
) -> SimSession {
    let ticker = channel::tick(interval);
    let edges: Vec<(usize, usize)> = session.topology().edges().collect();
    logger.log_topology(session.topology().size(), &edges);
    let _ = metrics.send(MetricPacket::from_session(&session));

    loop {
        crossbeam::select! {
            recv(ticker) -> _ => {
                let report = session.tick();
                logger.set_tick(report.tick);
                logger.log_phases(session.phase());
                logger.log_order_parameter(report.order_parameter, mean_phase(session.phase()));
            }
            recv(control) -> command => match command {
                Ok(command) => {
                    if !apply_command(&mut session, command, logger) {
                        break;
                    }
                }
                Err(_) => break,
            },
        }

        if metrics.send(MetricPacket::from_session(&session)).is_err() {
            break;
        }
    }

    debug!("Simulation thread stopped at tick {}", session.tick_count());
    session
}

// =============================================================================
// SYNC DASHBOARD
// =============================================================================

/// TUI Dashboard for a live Kuramoto session.
pub struct SyncDashboard {
    rx: Receiver<MetricPacket>,
    tx: Sender<ControlCommand>,
    label: String,
    latest: MetricPacket,
    frame_count: usize,
}

impl SyncDashboard {
    pub fn new(label: &str, rx: Receiver<MetricPacket>, tx: Sender<ControlCommand>) -> Self {
        Self {
            rx,
            tx,
            label: label.to_string(),
            latest: MetricPacket::default(),
            frame_count: 0,
        }
    }

    /// Keeps the newest packet; older ones still queued are superseded.
    pub fn drain(&mut self) {
        while let Ok(packet) = self.rx.try_recv() {
            self.latest = packet;
        }
    }

    pub fn latest(&self) -> &MetricPacket {
        &self.latest
    }

    /// Run the TUI main loop (blocks until 'q' pressed)
    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let _guard = TerminalGuard;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        loop {
            self.drain();

            terminal.draw(|f| self.ui(f))?;
            self.frame_count += 1;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if let Some(command) = ControlCommand::from_key(key.code) {
                        // Simulation thread already gone means there's nothing left to show
                        if self.tx.send(command).is_err() || command == ControlCommand::Quit {
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn ui(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),  // Header
                Constraint::Length(3),  // Gauges
                Constraint::Min(8),     // r(t) chart
                Constraint::Length(PHASE_TABLE_ROWS as u16 + 3), // Phase table
                Constraint::Length(1),  // Footer
            ])
            .split(f.area());

        // === HEADER ===
        let header = Paragraph::new(Line::from(vec![
            Span::styled("Kuramoto Sync Dashboard", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  |  "),
            Span::raw(self.label.clone()),
            Span::raw("  |  "),
            Span::styled(
                format!("tick={} t={:.1}", self.latest.tick, self.latest.time),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("  |  "),
            Span::raw(format!("Frame: {}", self.frame_count)),
        ]))
        .block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(header, chunks[0]);

        // === GAUGES ===
        let gauge_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(50),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(chunks[1]);

        let r = self.latest.order_parameter.clamp(0.0, 1.0);
        let r_color = if r >= 0.9 {
            Color::Green
        } else if r >= 0.5 {
            Color::Yellow
        } else {
            Color::Red
        };
        let r_gauge = Gauge::default()
            .block(Block::default().title("Order Parameter r").borders(Borders::ALL))
            .gauge_style(Style::default().fg(r_color))
            .percent((r * 100.0) as u16)
            .label(format!("{:.3}", r));
        f.render_widget(r_gauge, gauge_chunks[0]);

        let coupling = Paragraph::new(format!("K = {:.1}", self.latest.coupling))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .block(Block::default().title("Coupling").borders(Borders::ALL));
        f.render_widget(coupling, gauge_chunks[1]);

        let psi = match self.latest.mean_phase {
            Some(psi) => format!("ψ = {:.2}", psi),
            None => "ψ = -".to_string(),
        };
        let mean = Paragraph::new(psi)
            .style(Style::default().fg(Color::Cyan))
            .block(Block::default().title("Mean Phase").borders(Borders::ALL));
        f.render_widget(mean, gauge_chunks[2]);

        // === r(t) CHART ===
        let (lo, hi) = self.latest.window;
        let points: Vec<(f64, f64)> = self
            .latest
            .samples
            .iter()
            .map(|s| (s.tick as f64, s.order_parameter))
            .collect();
        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points);
        let chart = Chart::new(vec![dataset])
            .block(Block::default().title("Synchrony r(t)").borders(Borders::ALL))
            .x_axis(
                Axis::default()
                    .title("tick")
                    .bounds([lo as f64, hi as f64])
                    .labels([lo.to_string(), hi.to_string()]),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, 1.0])
                    .labels(["0.0", "0.5", "1.0"]),
            );
        f.render_widget(chart, chunks[2]);

        // === PHASE TABLE ===
        let header_cells = ["Node", "θ (rad)", "θ - ψ"]
            .iter()
            .map(|h| Span::styled(*h, Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells).height(1);

        let psi = self.latest.mean_phase.unwrap_or(0.0);
        let rows: Vec<Row> = self
            .latest
            .phases
            .iter()
            .take(PHASE_TABLE_ROWS)
            .enumerate()
            .map(|(i, &theta)| {
                let [red, green, blue] = phase_color(theta);
                let offset = (theta - psi + std::f64::consts::PI)
                    .rem_euclid(std::f64::consts::TAU)
                    - std::f64::consts::PI;
                Row::new(vec![
                    Span::raw(format!("{}", i)),
                    Span::styled(format!("{:.3}", theta), Style::default().fg(Color::Rgb(red, green, blue))),
                    Span::raw(format!("{:+.3}", offset)),
                ])
            })
            .collect();

        let title = format!(
            "Phases ({} of {})",
            self.latest.phases.len().min(PHASE_TABLE_ROWS),
            self.latest.phases.len()
        );
        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(table, chunks[3]);

        // === FOOTER ===
        let footer = Paragraph::new("+/- adjust K  |  r reset  |  q quit")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(footer, chunks[4]);
    }
}

/// Leaves raw mode and the alternate screen when dropped, including on error paths.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = restore_screen(&mut io::stdout());
    }
}

/// Writes the sequences that leave the alternate screen and show the cursor.
fn restore_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen, Show)
}

/// Runs `session` behind the dashboard until the user quits.
pub fn run_live(session: SimSession, label: &str, logger: RerunLogger) -> io::Result<SimSession> {
    let interval = session.config().tick_interval;
    let handle = spawn_simulation(session, interval, logger);

    let mut dashboard = SyncDashboard::new(label, handle.metrics.clone(), handle.control.clone());
    let ui = dashboard.run();
    let session = handle.stop()?;
    ui.map(|_| session)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::GraphKind;
    use crate::session::SimConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn session() -> SimSession {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let graph = GraphKind::Ring.build(6, &mut rng).unwrap();
        SimSession::new(&graph, SimConfig::default()).unwrap()
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(ControlCommand::from_key(KeyCode::Char('+')), Some(ControlCommand::IncreaseCoupling));
        assert_eq!(ControlCommand::from_key(KeyCode::Up), Some(ControlCommand::IncreaseCoupling));
        assert_eq!(ControlCommand::from_key(KeyCode::Down), Some(ControlCommand::DecreaseCoupling));
        assert_eq!(ControlCommand::from_key(KeyCode::Char('r')), Some(ControlCommand::Reset));
        assert_eq!(ControlCommand::from_key(KeyCode::Esc), Some(ControlCommand::Quit));
        assert_eq!(ControlCommand::from_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_apply_command() {
        let mut session = session();
        for _ in 0..3 {
            session.tick();
        }

        let logger = RerunLogger::disabled();

        assert!(apply_command(&mut session, ControlCommand::IncreaseCoupling, &logger));
        assert!((session.coupling() - 0.6).abs() < 1e-12);
        assert!(apply_command(&mut session, ControlCommand::DecreaseCoupling, &logger));
        assert!(apply_command(&mut session, ControlCommand::DecreaseCoupling, &logger));
        assert!((session.coupling() - 0.4).abs() < 1e-12);

        assert!(apply_command(&mut session, ControlCommand::Reset, &logger));
        assert_eq!(session.tick_count(), 0);

        assert!(!apply_command(&mut session, ControlCommand::Quit, &logger));
    }

    #[test]
    fn test_packet_carries_session_history() {
        let mut session = session();
        for _ in 0..150 {
            session.tick();
        }

        let packet = MetricPacket::from_session(&session);
        assert_eq!(packet.window, (50, 150));
        assert_eq!(packet.samples.first().map(|s| s.tick), Some(50));
        assert_eq!(packet.samples.last().map(|s| s.tick), Some(150));
        assert_eq!(packet.samples.len(), 101);

        // Reset clears the session history, so the chart starts over
        apply_command(&mut session, ControlCommand::Reset, &RerunLogger::disabled());
        let packet = MetricPacket::from_session(&session);
        assert_eq!(packet.window, (0, 100));
        assert!(packet.samples.is_empty());
    }

    #[test]
    fn test_drain_keeps_newest_packet() {
        let (mtx, mrx) = channel::unbounded();
        let (ctx, _crx) = channel::unbounded();
        let mut dashboard = SyncDashboard::new("ring", mrx, ctx);

        let mut session = session();
        mtx.send(MetricPacket::from_session(&session)).unwrap();
        session.tick();
        session.tick();
        mtx.send(MetricPacket::from_session(&session)).unwrap();

        dashboard.drain();
        assert_eq!(dashboard.latest().tick, 2);
        assert_eq!(dashboard.latest().samples.len(), 2);
    }

    #[test]
    fn test_restore_screen_sequences() {
        let mut out: Vec<u8> = Vec::new();
        restore_screen(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("\x1b[?1049l"), "{:?}", text);
        assert!(text.contains("\x1b[?25h"), "{:?}", text);

        // Dropping the guard without a terminal must not panic
        drop(TerminalGuard);
    }

    #[test]
    fn test_simulation_thread() {
        let handle = spawn_simulation(session(), Duration::from_millis(1), RerunLogger::disabled());

        let first = handle.metrics.recv().unwrap();
        assert_eq!(first.tick, 0);
        assert_eq!(first.phases.len(), 6);

        let mut last = first;
        while last.tick < 3 {
            last = handle.metrics.recv().unwrap();
        }

        handle.control.send(ControlCommand::IncreaseCoupling).unwrap();
        let session = handle.stop().unwrap();

        assert!(session.tick_count() >= 3);
        assert!((session.coupling() - 0.6).abs() < 1e-12);
    }
}
