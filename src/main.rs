use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use gymclock::{
    app::App,
    config::{Config, ConfigStore, CustomPresetConfig, FileConfigStore},
    cues::{CueSink, SilentSink, TerminalBell},
    logging,
    runtime::{CrosstermEventSource, Runner, TickSchedule, TimerEventSource},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};

/// round and rest interval timer for the gym floor
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A round/rest interval timer for martial arts training: pick a discipline preset or dial in your own rounds, then let the bell, gong and countdown beeps run the session."
)]
pub struct Cli {
    /// preset to select on launch
    #[clap(short = 'p', long, value_enum)]
    preset: Option<PresetArg>,

    /// number of rounds for the custom preset (implies --preset custom)
    #[clap(short = 'r', long)]
    rounds: Option<u32>,

    /// round length in seconds for the custom preset (implies --preset custom)
    #[clap(long)]
    round_secs: Option<u32>,

    /// rest length in seconds for the custom preset, 0 for no rest (implies --preset custom)
    #[clap(long)]
    rest_secs: Option<u32>,

    /// no bells or beeps
    #[clap(short = 'm', long)]
    mute: bool,

    /// start the selected preset immediately
    #[clap(short = 'a', long)]
    autostart: bool,

    /// read and write configuration at this path instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum PresetArg {
    Mma,
    Boxing,
    Bjj,
    Muaythai,
    Grappling,
    Custom,
}

impl PresetArg {
    fn id(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl Cli {
    /// Layer command line flags over the stored configuration
    fn apply(&self, mut cfg: Config) -> Config {
        let custom_override =
            self.rounds.is_some() || self.round_secs.is_some() || self.rest_secs.is_some();

        if let Some(rounds) = self.rounds {
            cfg.custom.rounds = rounds;
        }
        if let Some(secs) = self.round_secs {
            cfg.custom.round_duration_secs = secs;
        }
        if let Some(secs) = self.rest_secs {
            cfg.custom.rest_duration_secs = secs;
        }

        match self.preset {
            Some(p) => cfg.default_preset = Some(p.id()),
            None if custom_override => cfg.default_preset = Some(PresetArg::Custom.id()),
            None => {}
        }

        if self.mute {
            cfg.sound = false;
        }
        cfg
    }

    fn store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn build_app(cli: &Cli, cfg: &Config) -> (App, TickSchedule) {
    let schedule = TickSchedule::new(cfg.tick_interval());
    let sink: Box<dyn CueSink> = if cfg.sound {
        Box::new(TerminalBell::stdout())
    } else {
        Box::new(SilentSink)
    };

    let mut app = App::new(cfg.custom.to_preset(), sink, schedule.clone());
    if let Some(id) = &cfg.default_preset {
        if !app.select_by_id(id) {
            tracing::warn!("unknown default preset '{}' in config", id);
        }
    }
    if cli.autostart {
        app.toggle();
    }
    (app, schedule)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // keep the guard alive until exit so buffered log lines get flushed
    let _log_guard = match logging::init() {
        Ok((guard, dir)) => {
            tracing::info!("gymclock {} starting, logs in {}", env!("CARGO_PKG_VERSION"), dir.display());
            Some(guard)
        }
        Err(e) => {
            eprintln!("logging disabled: {}", e);
            None
        }
    };

    let store = cli.store();
    let cfg = cli.apply(store.load());
    let (mut app, schedule) = build_app(&cli, &cfg);
    let runner = Runner::new(CrosstermEventSource::new(), schedule);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let custom = CustomPresetConfig::from(app.custom_preset());
    if custom != cfg.custom {
        let mut stored = store.load();
        stored.custom = custom;
        if let Err(e) = store.save(&stored) {
            tracing::warn!("could not save custom preset: {}", e);
        }
    }

    tracing::info!("gymclock exiting");
    result
}

fn start_tui<B: Backend, E: TimerEventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    while !app.should_quit {
        let Some(event) = runner.step() else {
            break;
        };
        app.handle(event);
        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use gymclock::engine::TimerStatus;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["gymclock"]);

        assert!(cli.preset.is_none());
        assert_eq!(cli.rounds, None);
        assert_eq!(cli.round_secs, None);
        assert_eq!(cli.rest_secs, None);
        assert!(!cli.mute);
        assert!(!cli.autostart);
    }

    #[test]
    fn test_cli_preset() {
        let cli = Cli::parse_from(["gymclock", "-p", "muaythai"]);
        assert!(matches!(cli.preset, Some(PresetArg::Muaythai)));

        let cli = Cli::parse_from(["gymclock", "--preset", "bjj"]);
        assert!(matches!(cli.preset, Some(PresetArg::Bjj)));
    }

    #[test]
    fn test_cli_rejects_unknown_preset() {
        assert!(Cli::try_parse_from(["gymclock", "-p", "karate"]).is_err());
    }

    #[test]
    fn test_preset_arg_ids_match_catalog() {
        for arg in PresetArg::value_variants() {
            assert!(gymclock::preset::find_preset(&arg.id()).is_ok(), "{}", arg);
        }
    }

    #[test]
    fn test_custom_flags_imply_custom_preset() {
        let cli = Cli::parse_from(["gymclock", "--rounds", "4", "--rest-secs", "0"]);
        let cfg = cli.apply(Config::default());
        assert_eq!(cfg.default_preset.as_deref(), Some("custom"));
        assert_eq!(cfg.custom.rounds, 4);
        assert_eq!(cfg.custom.round_duration_secs, 180);
        assert_eq!(cfg.custom.rest_duration_secs, 0);
    }

    #[test]
    fn test_explicit_preset_wins_over_custom_flags() {
        let cli = Cli::parse_from(["gymclock", "-p", "boxing", "--rounds", "4"]);
        let cfg = cli.apply(Config::default());
        assert_eq!(cfg.default_preset.as_deref(), Some("boxing"));
    }

    #[test]
    fn test_mute_disables_sound() {
        let cli = Cli::parse_from(["gymclock", "--mute"]);
        assert!(!cli.apply(Config::default()).sound);
    }

    #[test]
    fn test_build_app_autostart() {
        let cli = Cli::parse_from(["gymclock", "-p", "mma", "--autostart", "--mute"]);
        let cfg = cli.apply(Config::default());
        let (app, schedule) = build_app(&cli, &cfg);
        assert_eq!(app.timer.status(), TimerStatus::Running);
        assert_eq!(app.timer.session().time_remaining_secs, 300);
        assert!(schedule.is_armed());
    }

    #[test]
    fn test_build_app_invalid_custom_reports_error() {
        let cli = Cli::parse_from(["gymclock", "--rounds", "0", "--autostart", "--mute"]);
        let cfg = cli.apply(Config::default());
        let (app, schedule) = build_app(&cli, &cfg);
        assert_eq!(app.timer.status(), TimerStatus::Idle);
        assert!(app.last_error.is_some());
        assert!(!schedule.is_armed());
    }
}
