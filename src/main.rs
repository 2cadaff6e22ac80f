//! Contortris terminal runner (default binary).
//!
//! Uses crossterm for keyboard and mouse input and the framebuffer-based
//! renderer from `contortris-term`.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use tracing::{debug, info, Level};

use contortris::core::{parse_config, GameState, ShapeRegistry};
use contortris::input::{
    handle_key_event, hit_test, is_debug_toggle, is_held_key, should_quit, InputHandler,
};
use contortris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use contortris::types::{GameConfig, InputEvent, Intent};

const FRAME_MS: u64 = 16;

/// contortris - falling blocks with contorted shapes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON game config (missing fields keep their defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON shape list replacing the bundled set
    #[arg(short, long)]
    shapes: Option<PathBuf>,

    /// Seed for piece selection (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Show the debug panel from the start
    #[arg(short, long)]
    debug: bool,

    /// Load and validate shapes, print a summary and exit
    #[arg(long)]
    check_shapes: bool,

    /// Write logs to this file while playing
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let config = load_config(args.config.as_deref())?;
    let shapes = load_shapes(args.shapes.as_deref(), &config)?;

    if args.check_shapes {
        print_shapes(&shapes);
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(clock_seed);
    let game = GameState::with_seed(shapes, config, seed)?;
    info!(seed, "starting game");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, game, GameView::default().with_debug(args.debug));

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// The terminal is in raw alternate-screen mode while playing, so logs only
/// go to a file; `--check-shapes` logs to stderr.
fn init_tracing(args: &Args) -> Result<()> {
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if args.check_shapes {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    parse_config(&text).with_context(|| format!("loading config {}", path.display()))
}

fn load_shapes(path: Option<&Path>, config: &GameConfig) -> Result<ShapeRegistry> {
    let cols = config.board.cols as usize;
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading shapes {}", path.display()))?;
            ShapeRegistry::from_json_str(&text, cols)
                .with_context(|| format!("loading shapes {}", path.display()))
        }
        None => ShapeRegistry::builtin(cols).context("loading bundled shapes"),
    }
}

fn print_shapes(shapes: &ShapeRegistry) {
    println!("{} shapes OK", shapes.len());
    for shape in shapes.iter() {
        println!(
            "  {:<12} {:<14} difficulty {:<4} frequency {:<5} rotations {} pixels/block {}",
            shape.id,
            shape.name,
            shape.difficulty,
            shape.frequency,
            shape.rotations.len(),
            shape.paint.scale(),
        );
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn run(term: &mut TerminalRenderer, mut game: GameState, mut view: GameView) -> Result<()> {
    let mut input = InputHandler::from_config(&game.config().repeat);
    let max_dt = game.config().timing.max_frame_dt_ms;
    let frame = Duration::from_millis(FRAME_MS);
    let mut fb = FrameBuffer::new(0, 0);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        view.render_into(&game, viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next frame.
        let timeout = frame.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if is_debug_toggle(key) {
                            view.toggle_debug();
                        } else if is_held_key(key.code) {
                            if let Some(ev) = input.handle_key_press(key.code) {
                                dispatch(&mut game, &input, ev);
                            }
                        } else if let Some(intent) = handle_key_event(key) {
                            if intent == Intent::Reset {
                                // New game: start right away with nothing held.
                                input.reset();
                                game.apply(InputEvent::keyboard(Intent::Reset));
                                game.apply(InputEvent::keyboard(Intent::Start));
                            } else {
                                dispatch(&mut game, &input, InputEvent::keyboard(intent));
                            }
                        }
                    }
                    KeyEventKind::Release => {
                        if let Some(ev) = input.handle_key_release(key.code) {
                            dispatch(&mut game, &input, ev);
                        }
                    }
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        let area = view.board_rect(game.board(), viewport);
                        let zone = hit_test(area, mouse.column, mouse.row);
                        for ev in input.handle_pointer_press(zone) {
                            dispatch(&mut game, &input, ev);
                        }
                    }
                    MouseEventKind::Up(MouseButton::Left) => {
                        if let Some(ev) = input.handle_pointer_release() {
                            dispatch(&mut game, &input, ev);
                        }
                    }
                    _ => {}
                },
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= frame {
            last_tick = Instant::now();
            // Clamp so a stalled frame cannot drop a piece through the stack.
            let dt = (elapsed.as_millis().min(u32::MAX as u128) as u32).min(max_dt);

            for ev in input.update(dt) {
                dispatch(&mut game, &input, ev);
            }
            game.tick(dt);

            if let Some(event) = game.take_last_event() {
                if event.game_over {
                    info!(score = game.score(), lines = game.lines(), "game finished");
                } else if event.lines_cleared > 0 {
                    debug!(
                        lines = event.lines_cleared,
                        points = event.points,
                        level_up = event.level_up,
                        "lines cleared"
                    );
                }
            }
        }
    }
}

fn is_live(game: &GameState) -> bool {
    game.running() && !game.paused() && !game.game_over()
}

/// Apply one input event. When it brings the game to life, a soft drop that
/// was held while the game ignored it is applied too.
fn dispatch(game: &mut GameState, input: &InputHandler, event: InputEvent) {
    let was_live = is_live(game);
    game.apply(event);
    if !was_live && is_live(game) {
        if let Some(held) = input.held_soft_drop() {
            game.apply(held);
        }
    }
}
