use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::api::SnapshotSource;
use crate::config::Config;
use crate::inspector::{project, AdvanceBus, FlowObserver};
use crate::ui::InspectorPanel;

/// TUI application hosting the inspector panel for one flow.
///
/// The panel refreshes only in response to advance signals on the bus.
/// The `r` and space keys broadcast one, standing in for the hosting
/// login page's advance events; any other holder of the bus handle can
/// broadcast too.
pub struct App {
    config: Config,
    bus: AdvanceBus,
    observer: FlowObserver,
    panel: InspectorPanel,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, flow_slug: String, source: Arc<dyn SnapshotSource>) -> Self {
        let bus = AdvanceBus::default();
        let observer = FlowObserver::new(flow_slug.clone(), source, &bus);
        let panel = InspectorPanel::new(format!("Flow inspector: {}", flow_slug));

        Self {
            config,
            bus,
            observer,
            panel,
            should_quit: false,
        }
    }

    /// Handle to the advance bus, for external triggers.
    pub fn advance_bus(&self) -> AdvanceBus {
        self.bus.clone()
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Initial advance so the panel is populated without a keypress
        self.bus.notify();

        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms);

        while !self.should_quit {
            let model = project(self.observer.view());
            terminal.draw(|f| {
                self.panel.render(f, f.area(), &model);
            })?;

            // Handle events
            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            // A burst of signals coalesces into one refresh
            if self.observer.signal_pending() {
                self.observer.refresh().await;
            }
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') | KeyCode::Char(' ') => {
                self.bus.notify();
            }
            _ => {}
        }
    }
}
