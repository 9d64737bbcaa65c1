//! Terminal runner (default binary).
//!
//! Drives the engine at a fixed 60 frames per second, feeding it the command held on the
//! keyboard and drawing each frame through the diffing framebuffer renderer.
//!
//! Environment:
//! - `TGM_CONFIG`: path to a JSON engine config (otherwise `TGM_*` overrides are read)
//! - `TGM_LOG_PATH`: append every engine event as one JSON line

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};

use tgm_tetris::core::{Engine, EngineConfig, Snapshot};
use tgm_tetris::input::{should_quit, CommandBuffer};
use tgm_tetris::journal::EventJournal;
use tgm_tetris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tgm_tetris::types::FRAME_RATE;

const CONFIG_PATH_ENV: &str = "TGM_CONFIG";

fn load_config() -> Result<EngineConfig> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => {
            let text = std::fs::read_to_string(path.trim())
                .with_context(|| format!("reading engine config {}", path.trim()))?;
            EngineConfig::from_json(&text).with_context(|| format!("parsing {}", path.trim()))
        }
        _ => Ok(EngineConfig::from_env()),
    }
}

fn main() -> Result<()> {
    let config = load_config()?;
    let engine = Engine::new(config).context("building engine")?;
    let journal = EventJournal::from_env()?;

    println!(
        "[tgm] starting: das={} lock={} are={} clear={} seed={}",
        engine.config().das_delay,
        engine.config().lock_delay,
        engine.config().are_delay,
        engine.config().clear_delay,
        engine
            .config()
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "clock".to_string()),
    );

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, engine, journal);

    // Always try to restore terminal state.
    let _ = term.exit();

    match &result {
        Ok(frames) => println!("[tgm] exited after {frames} frames"),
        Err(e) => eprintln!("[tgm] error: {e:#}"),
    }
    result.map(|_| ())
}

/// Run until the player quits; returns the number of frames processed.
fn run(
    term: &mut TerminalRenderer,
    mut engine: Engine,
    mut journal: Option<EventJournal<std::io::BufWriter<std::fs::File>>>,
) -> Result<u64> {
    let mut buffer = if term.release_events() {
        CommandBuffer::with_release_events()
    } else {
        CommandBuffer::new()
    };

    let view = GameView::default();
    let mut snap = Snapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let frame_duration = Duration::from_secs(1) / FRAME_RATE;
    let mut next_frame = Instant::now() + frame_duration;
    let mut frame: u64 = 0;

    loop {
        // Input until the next frame is due.
        let timeout = next_frame.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        if let Some(j) = journal.as_mut() {
                            j.flush()?;
                        }
                        return Ok(frame);
                    }
                    buffer.handle_key(key);
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if Instant::now() < next_frame {
            continue;
        }
        next_frame += frame_duration;
        // Fell far behind (suspended terminal, debugger): resync instead of bursting.
        if next_frame < Instant::now() {
            next_frame = Instant::now() + frame_duration;
        }

        engine.buffer_command(buffer.tick());
        engine.process_frame();
        frame += 1;

        for ev in engine.take_events() {
            if let Some(j) = journal.as_mut() {
                j.record(frame, &ev)?;
            }
        }

        engine.snapshot_into(&mut snap);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;
    }
}
