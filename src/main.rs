use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use glimpse::{
    app::App,
    app_dirs::AppDirs,
    image::{BrowserOpener, PicsumSource},
    logging,
    preferences::{FilePreferenceStore, PreferencesManager, Theme},
    runtime::{AppEvent, AppEventSource, Clock, CrosstermEventSource, FixedTicker, Runner, Ticker},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use tracing::{info, warn};

/// visual memory trainer: look, close your eyes, rebuild, review
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Look at a random image, close your eyes and rebuild it in your mind, then open them and notice what you missed. Two rounds per exercise, or repeat endlessly in focus mode."
)]
pub struct Cli {
    /// seconds to look at each image (saved as the new default)
    #[clap(short = 'v', long, value_parser = clap::value_parser!(u32).range(1..))]
    view_secs: Option<u32>,

    /// seconds to rebuild the image with eyes closed (saved as the new default)
    #[clap(short = 'r', long, value_parser = clap::value_parser!(u32).range(1..))]
    rebuild_secs: Option<u32>,

    /// color theme (saved as the new default)
    #[clap(short = 't', long, value_enum)]
    theme: Option<Theme>,

    /// also open every new image in the web browser
    #[clap(short = 'b', long)]
    open_browser: bool,

    /// preferences file to use instead of the platform config dir
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// log debug output to the log file
    #[clap(long)]
    verbose: bool,
}

impl Cli {
    fn build_app(&self) -> App {
        let store = match &self.config {
            Some(path) => FilePreferenceStore::with_path(path),
            None => FilePreferenceStore::new(),
        };
        let preferences = PreferencesManager::load(Box::new(store));
        let mut app = App::new(
            preferences,
            Box::new(PicsumSource),
            Box::new(BrowserOpener),
        );

        if self.view_secs.is_some() || self.rebuild_secs.is_some() {
            let current = app.controller.durations();
            let view = self.view_secs.unwrap_or(current.view_secs());
            let rebuild = self.rebuild_secs.unwrap_or(current.rebuild_secs());
            if let Err(err) = app.set_durations(i64::from(view), i64::from(rebuild)) {
                warn!(error = %err, "ignoring duration flags");
            }
        }
        if let Some(theme) = self.theme {
            app.set_theme(theme);
        }
        app.open_in_browser = self.open_browser;
        app
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        // logging is best effort; the exercise runs without it
        if let Err(err) = logging::init(&path, cli.verbose) {
            eprintln!("glimpse: logging disabled: {err}");
        }
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting glimpse");

    let mut app = cli.build_app();

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let result = start_tui(&mut terminal, &mut app, &mut runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exiting");
    result
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E, T, C>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit {
        match runner.step() {
            AppEvent::Tick(elapsed) => app.on_elapsed(elapsed),
            AppEvent::Key(key) => app.on_key(key),
            AppEvent::Resize => {}
        }

        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimpse::runtime::{ManualClock, TestEventSource};
    use ratatui::backend::TestBackend;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["glimpse"]);

        assert_eq!(cli.view_secs, None);
        assert_eq!(cli.rebuild_secs, None);
        assert_eq!(cli.theme, None);
        assert!(!cli.open_browser);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_durations() {
        let cli = Cli::parse_from(["glimpse", "-v", "10", "--rebuild-secs", "5"]);
        assert_eq!(cli.view_secs, Some(10));
        assert_eq!(cli.rebuild_secs, Some(5));
    }

    #[test]
    fn test_cli_rejects_zero_duration() {
        assert!(Cli::try_parse_from(["glimpse", "--view-secs", "0"]).is_err());
        assert!(Cli::try_parse_from(["glimpse", "-r", "abc"]).is_err());
    }

    #[test]
    fn test_cli_theme() {
        let cli = Cli::parse_from(["glimpse", "--theme", "dark"]);
        assert_eq!(cli.theme, Some(Theme::Dark));
        assert!(Cli::try_parse_from(["glimpse", "--theme", "sepia"]).is_err());
    }

    #[test]
    fn test_build_app_applies_and_persists_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cli = Cli::parse_from([
            "glimpse",
            "-v",
            "12",
            "-t",
            "dark",
            "-b",
            "-c",
            path.to_str().unwrap(),
        ]);

        let app = cli.build_app();
        assert_eq!(app.controller.durations().view_secs(), 12);
        assert_eq!(app.controller.durations().rebuild_secs(), 20);
        assert_eq!(app.theme(), Theme::Dark);
        assert!(app.open_in_browser);

        let reloaded = PreferencesManager::load(Box::new(FilePreferenceStore::with_path(&path)));
        assert_eq!(reloaded.durations().view_secs(), 12);
        assert_eq!(reloaded.theme(), Theme::Dark);
    }

    #[test]
    fn test_start_tui_quits_on_q() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cli = Cli::parse_from(["glimpse", "-c", path.to_str().unwrap()]);
        let mut app = cli.build_app();

        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('s'),
            crossterm::event::KeyModifiers::NONE,
        )))
        .unwrap();
        tx.send(AppEvent::Key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('q'),
            crossterm::event::KeyModifiers::NONE,
        )))
        .unwrap();
        let mut runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        start_tui(&mut terminal, &mut app, &mut runner).unwrap();

        assert!(app.should_quit);
        assert_eq!(app.controller.round(), 1);
    }

    #[test]
    fn test_start_tui_feeds_clock_time_before_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cli = Cli::parse_from(["glimpse", "-v", "2", "-r", "1", "-c", path.to_str().unwrap()]);
        let mut app = cli.build_app();
        app.on_key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('s'),
            crossterm::event::KeyModifiers::NONE,
        ));

        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('q'),
            crossterm::event::KeyModifiers::NONE,
        )))
        .unwrap();
        let clock = ManualClock::new();
        let mut runner = Runner::with_clock(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
            clock.clone(),
        );
        clock.advance(Duration::from_millis(2_100));

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        start_tui(&mut terminal, &mut app, &mut runner).unwrap();

        // the two seconds before the quit key ended the viewing phase
        assert!(app.should_quit);
        assert_eq!(app.controller.phase(), glimpse::session::Phase::Rebuilding);
    }
}
