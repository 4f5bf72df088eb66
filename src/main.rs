mod shared;
mod tui;
mod audio_api;
mod audio;
mod cli;
mod config;
mod middle;
mod recipe;

use std::fs::File;
use std::time::Instant;
use clap::Parser;
use crossterm::terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use audio_api::AudioCommand;
use cli::Cli;
use config::Config;
use middle::Middle;
use shared::InputEvent;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    use simplelog::{LevelFilter, WriteLogger};

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    let log_path = dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("panseared")
        .join("panseared.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    // the terminal belongs to the TUI, so logs only ever go to a file
    let log_file = match File::create(&log_path)
        .or_else(|_| File::create(std::env::temp_dir().join("panseared.log")))
    {
        Ok(file) => file,
        Err(_) => return,
    };

    if WriteLogger::init(log_level, simplelog::Config::default(), log_file).is_ok() {
        log::info!("panseared starting (log level: {:?})", log_level);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load(cli.config.as_deref()).with_overrides(cli.volume, cli.time_scale);

    if let Some(path) = &cli.export {
        let summary = audio::render::export_wav(path, config.volume(), config.time_scale())?;
        println!(
            "wrote {} ({} steps, {} frames, {:.1}s)",
            path.display(),
            summary.steps,
            summary.frames,
            summary.seconds
        );
        return Ok(());
    }

    let mut audio = audio::start_audio(config.volume())?;
    let mut middle = Middle::new(config.volume(), config.time_scale())
        .with_volume_step(config.volume_step());

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope
    crossterm::execute!(std::io::stdout(), terminal::EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = config.tick_rate();
    let mut last_tick = Instant::now();
    let blink_start = Instant::now();

    loop {
        // pulse for the auto-play indicator
        let blink_on = (blink_start.elapsed().as_millis() / 500) % 2 == 0;
        // Sync live node count from engine → middle → display
        middle.set_active_nodes(audio.active_nodes());
        let ds = middle.display_state();

        term.draw(|frame| {
            tui::view::render(frame, frame.area(), &ds, blink_on);
        })?;

        let events = tui::input::poll_input(tick_rate)?;
        for event in events {
            if event == InputEvent::Quit {
                let cmds: Vec<AudioCommand> = middle.reset();
                for cmd in cmds {
                    audio.send(cmd);
                }
                drop(term);
                drop(audio);
                return Ok(());
            }
            let cmds = middle.handle_input(event);
            for cmd in cmds {
                audio.send(cmd);
            }
        }

        let elapsed = last_tick.elapsed().as_secs_f64();
        last_tick = Instant::now();
        let cmds = middle.tick(elapsed);
        for cmd in cmds {
            audio.send(cmd);
        }
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
