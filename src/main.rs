use std::io;
use std::io::Write;
use std::thread;
use std::time;

use anyhow::Context;
use clap::ArgAction;
use clap::ArgMatches;
use clap::arg;
use clap::command;
use clap::value_parser;
use crossterm::cursor;
use crossterm::event;
use crossterm::execute;
use crossterm::style;
use crossterm::terminal;
use tracing::debug;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use quadgrid::anim::Animator;
use quadgrid::camera::Camera;
use quadgrid::events::AppEvent;
use quadgrid::events::Event;
use quadgrid::io::convert_event;
use quadgrid::render;
use quadgrid::sketch::Settings;
use quadgrid::sketch::Sketch;

const FRAMERATE: u32 = 60;
const FRAMETIME: time::Duration =
    time::Duration::from_millis(((1f64 / FRAMERATE as f64) * 1_000f64) as u64);

/// Seconds a cell takes to fade in or out
const FADE: f32 = 0.3;

fn cli() -> clap::Command {
    command!()
        .about("Scatter points into a quadtree and draw its leaves as a noisy grid")
        .arg(
            arg!(-n --points <N> "Number of points")
                .value_parser(value_parser!(usize))
                .default_value("200"),
        )
        .arg(
            arg!(-c --capacity <N> "Points per node before it splits")
                .value_parser(value_parser!(usize))
                .default_value("4"),
        )
        .arg(
            arg!(--"max-depth" <N> "Depth past which nodes stop splitting")
                .value_parser(value_parser!(u32))
                .default_value("20"),
        )
        .arg(
            arg!(-b --bias <BIAS> "Pull toward the center, from 0 to 1")
                .value_parser(value_parser!(f32))
                .default_value("0"),
        )
        .arg(
            arg!(-s --seed <SEED> "Random seed")
                .value_parser(value_parser!(u64))
                .default_value("0"),
        )
        .arg(
            arg!(--cols <COLS> "Width in terminal columns, defaults to the terminal size")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            arg!(--rows <ROWS> "Height in terminal rows, defaults to the terminal size")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            arg!(-i --interactive "Redraw on key presses until 'q' is pressed")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"log-level" <LEVEL> "Used when RUST_LOG is not set")
                .value_parser(["trace", "debug", "info", "warn", "error", "off"])
                .default_value("warn"),
        )
}

fn init_tracing(matches: &ArgMatches) {
    let level = matches
        .get_one::<String>("log-level")
        .map_or("warn", String::as_str);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn settings_from(matches: &ArgMatches) -> Settings {
    let defaults = Settings::default();

    Settings {
        points: matches.get_one::<usize>("points").copied().unwrap_or(defaults.points),
        capacity: matches.get_one::<usize>("capacity").copied().unwrap_or(defaults.capacity),
        max_depth: matches.get_one::<u32>("max-depth").copied().unwrap_or(defaults.max_depth),
        bias: matches.get_one::<f32>("bias").copied().unwrap_or(defaults.bias),
        seed: matches.get_one::<u64>("seed").copied().unwrap_or(defaults.seed),
        ..defaults
    }
}

fn status(sketch: &Sketch) -> String {
    let tree = sketch.tree();
    let settings = sketch.settings();

    format!(
        "points: {}  leaves: {}  max depth: {}  capacity: {}  bias: {:.1}  seed: {}",
        tree.count(),
        tree.leaves().count(),
        tree.max_depth(),
        settings.capacity,
        settings.bias,
        settings.seed,
    )
}

fn print_once(sketch: &Sketch, cols: u16, rows: u16) -> anyhow::Result<()> {
    let mut cam = Camera::for_terminal(cols, rows);
    render::draw_sketch(&mut cam, sketch);

    let mut stdout = io::stdout().lock();
    stdout.write_all(cam.render().as_bytes())?;
    writeln!(stdout, "{}", status(sketch))?;

    Ok(())
}

/// Leaves raw mode when dropped, so the terminal is usable again even if drawing fails.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;

        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Failed to leave raw mode: {e}");
        }
    }
}

fn run_interactive(mut sketch: Sketch, cols: u16, rows: u16) -> anyhow::Result<()> {
    let _raw = RawMode::enable().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();

    // leave the last row for the status line
    let mut cam = Camera::for_terminal(cols, rows.saturating_sub(1));
    let mut anim = Animator::new(FADE);
    anim.sync(sketch.tree());

    loop {
        let t = time::Instant::now();

        // Poll event for as long as FRAMETIME
        let event = if event::poll(FRAMETIME)? {
            convert_event(event::read()?)
        } else {
            None
        };

        match event {
            None => {}
            Some(Event::AppEvent(AppEvent::Exit)) => break,
            Some(Event::AppEvent(AppEvent::Resize { cols, rows })) => {
                cam = Camera::for_terminal(cols, rows.saturating_sub(1));
            }
            Some(Event::SketchEvent(change)) => {
                debug!(?change, "Settings changed");

                match sketch.update(|settings| change.apply(settings)) {
                    Ok(()) => {
                        anim.sync(sketch.tree());
                    }
                    Err(e) => warn!("Ignoring settings change: {e}"),
                }
            }
        }

        anim.tick(t.elapsed().max(FRAMETIME).as_secs_f32());

        cam.reset();
        render::draw_animated(&mut cam, &sketch, &anim);
        let s = cam.render();

        execute!(
            stdout,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
        )?;

        for line in s.lines() {
            execute!(stdout, style::Print(line), cursor::MoveToNextLine(1))?;
        }

        execute!(stdout, style::Print(status(&sketch)))?;

        let time_left = FRAMETIME.saturating_sub(t.elapsed());
        thread::sleep(time_left);
    }

    execute!(stdout, cursor::MoveToNextLine(1))?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(&matches);

    let settings = settings_from(&matches);
    info!(?settings, "Building sketch");

    let sketch = Sketch::new(settings).context("Invalid sketch settings")?;

    let (term_cols, term_rows) = terminal::size().unwrap_or((80, 24));
    let cols = matches.get_one::<u16>("cols").copied().unwrap_or(term_cols);
    let rows = matches.get_one::<u16>("rows").copied().unwrap_or(term_rows);

    if matches.get_flag("interactive") {
        run_interactive(sketch, cols, rows)
    } else {
        // keep room for the status line and the shell prompt
        print_once(&sketch, cols, rows.saturating_sub(2))
    }
}
