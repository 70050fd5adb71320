use crate::config::AppConfig;
use crate::game::Game;
use crate::growth::now_ms;
use crate::help::render_help_overlay;
use crate::input::{action_for_key, Action, Pointer, Tool};
use crate::render::{draw_hud, draw_scene, TermCanvas, Viewport};
use crate::store::SaveStore;
use crate::terminal::Terminal;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use crossterm::terminal::size;
use std::io;
use std::time::Instant;

const HELP: &str = "\
TREE CARE
─────────────────────────
Mouse  Use selected tool
1      Watering can
2      Shears (drag to trim)
3      Wind shield (hold)
s      Skip one day
w      Warp two years
r      Reset garden
p      Plant a new seed
?      Close help
q/Esc  Quit";

/// Terminal size used when stdout is not a usable terminal
const FALLBACK_SIZE: (u16, u16) = (64, 40);
const MIN_PRINT_SIZE: (u16, u16) = (40, 12);

/// Run the interactive garden until the user quits
pub fn run(config: AppConfig, store: Box<dyn SaveStore>) -> io::Result<()> {
    let start = now_ms();
    let mut game = Game::new(config.game.clone(), store, start);
    game.load(start);

    let mut term = Terminal::new(true)?;
    term.clear_screen()?;

    let mut pointer = Pointer::new();
    let mut show_help = false;
    let mut last_frame = Instant::now();

    'frames: loop {
        if let Ok((w, h)) = size() {
            if (w, h) != term.size() {
                term.resize(w, h);
                term.clear_screen()?;
            }
        }
        let (w, h) = term.size();
        let viewport = Viewport::for_terminal(w, h);

        while let Some(event) = next_event(term.poll_event()) {
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if show_help {
                        match key.code {
                            KeyCode::Char('?') => show_help = false,
                            KeyCode::Char('q') | KeyCode::Esc => break 'frames,
                            _ => {}
                        }
                        continue;
                    }
                    let Some(action) = action_for_key(key.code) else {
                        continue;
                    };
                    let now = now_ms();
                    match action {
                        Action::Quit => break 'frames,
                        Action::Help => show_help = true,
                        Action::SelectTool(tool) => pointer.tool = tool,
                        Action::SkipDay => game.skip_day(now),
                        Action::WarpTwoYears => game.warp_two_years(now),
                        Action::HardReset => game.hard_reset(now),
                        Action::PlantSeed => game.plant_seed(now),
                    }
                }
                Event::Mouse(mouse) if !show_help => {
                    if let Some(input) = pointer.translate(mouse, &viewport) {
                        game.handle(input, now_ms());
                    }
                }
                _ => {}
            }
        }

        let dt_ms = last_frame.elapsed().as_secs_f64() * 1000.0;
        last_frame = Instant::now();
        game.update(dt_ms, now_ms());

        term.clear();
        draw_frame(&mut term, &viewport, &game, pointer.tool);
        if show_help {
            render_help_overlay(&mut term, HELP);
        }
        // A failed frame is dropped; the next one redraws everything
        if let Err(e) = term.present() {
            tracing::warn!(error = %e, "frame not drawn");
        }

        term.sleep(config.frame_seconds());
    }

    tracing::info!(
        water = game.growth().water_level,
        age = game.growth().tree_age,
        "leaving garden"
    );
    Ok(())
}

/// Catch up on elapsed time and print one frame to stdout
pub fn print(config: AppConfig, store: Box<dyn SaveStore>) -> io::Result<()> {
    let now = now_ms();
    let mut game = Game::new(config.game, store, now);
    game.load(now);
    game.update(0.0, now);

    let mut term = match Terminal::new(false) {
        Ok(term) if term.size().0 >= MIN_PRINT_SIZE.0 && term.size().1 >= MIN_PRINT_SIZE.1 => term,
        _ => Terminal::offscreen(FALLBACK_SIZE.0, FALLBACK_SIZE.1),
    };
    let (w, h) = term.size();
    let viewport = Viewport::for_terminal(w, h);
    draw_frame(&mut term, &viewport, &game, Tool::default());
    term.print_to_stdout();
    Ok(())
}

/// One-line summary of the saved garden
pub fn status(config: AppConfig, store: Box<dyn SaveStore>) -> io::Result<()> {
    let now = now_ms();
    let mut game = Game::new(config.game, store, now);
    game.load(now);
    println!("{}", describe(&game));
    Ok(())
}

/// A failed poll ends this frame's input; the loop keeps running
fn next_event(polled: io::Result<Option<Event>>) -> Option<Event> {
    match polled {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "input poll failed");
            None
        }
    }
}

fn describe(game: &Game) -> String {
    let growth = game.growth();
    let stage = match growth.tree_age {
        0 => "seed",
        1..=119 => "sapling",
        120..=599 => "growing",
        _ => "mature",
    };
    format!(
        "water {}/100, age {} days ({}), {}",
        growth.water_level.floor() as i64,
        growth.tree_age,
        stage,
        if growth.water_level > 0.0 { "growing" } else { "dry, not growing" },
    )
}

fn draw_frame(term: &mut Terminal, viewport: &Viewport, game: &Game, tool: Tool) {
    let scene = game.scene();
    draw_scene(&mut TermCanvas::new(term, *viewport), &scene);
    draw_hud(term, viewport, &scene, tool);
}
