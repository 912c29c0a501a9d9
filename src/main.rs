//! Overhead level viewer.
//!
//! ```bash
//! cargo run --release -- --rooms 4 --scale 0.5
//! ```
//!
//! W/S walk, A/D strafe, Q/E turn.  The wall straight ahead is
//! highlighted; Space toggles its selection, F the floor in front of the
//! player, G the whole sector.  PageUp/PageDown or the mouse wheel raise
//! and lower the selected floors and ceilings.  Tab clears every tag, Esc
//! quits.

use clap::Parser;
use glam::vec2;
use log::{LevelFilter, Log, Metadata, Record, info};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use deeper_rs::{
    defs::{self, PLAYER},
    renderer::{TagOverlay, software, software::Overhead, walk_level},
    sim::{InputCmd, TicRunner, entity_place},
    world::{Camera, Entity, Level, LevelBuilder, TraceResult},
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Rooms in the generated corridor
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=64))]
    rooms: u32,

    /// Pixels per map unit
    #[arg(long, default_value_t = 0.5)]
    scale: f32,

    #[arg(long, default_value_t = 1024)]
    width: usize,

    #[arg(long, default_value_t = 768)]
    height: usize,

    /// Vertical field of view used for picking (degrees)
    #[arg(long, default_value_t = 65.0)]
    fovy: f32,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Prints `log` records to stderr.
struct StderrLog;

impl Log for StderrLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:5}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLog = StderrLog;

/// A corridor of `rooms` 512×512 rooms joined by portals.  Floors climb
/// in 16-unit steps; every third room has a ceiling too low to enter,
/// and the first one has a pillar.
fn corridor(rooms: u32) -> anyhow::Result<(Level, u32)> {
    const SIZE: f32 = 512.0;
    let square = |x0: f32, y0: f32, s: f32| {
        vec![vec2(x0, y0), vec2(x0 + s, y0), vec2(x0 + s, y0 + s), vec2(x0, y0 + s)]
    };

    let mut b = LevelBuilder::new();
    for i in 0..rooms {
        let x0 = i as f32 * SIZE;
        let floor = (i % 4) as f32 * 16.0;
        let ceil = if i % 3 == 2 { floor + 48.0 } else { floor + 128.0 };
        let outline = square(x0, 0.0, SIZE);
        if i == 0 {
            let pillar = square(192.0, 320.0, 96.0);
            b.add_sector_with_holes(&outline, &[pillar.as_slice()], floor, ceil);
        } else {
            b.add_sector(&outline, floor, ceil);
        }
        let light = 1.0 - 0.1 * (i % 5) as f32;
        let s = b.level_mut().sector_count() - 1;
        b.level_mut().sector_mut(s).light_level = light;
    }

    let barrel = defs::by_id("BARREL").map_or(PLAYER.type_id, |i| i.type_id);
    b.add_entity(barrel, vec2(400.0, 400.0), 0.0);
    let player = b.add_entity(PLAYER.type_id, vec2(128.0, 128.0), 90.0);
    Ok((b.finish()?, player))
}

fn sample_input(win: &Window) -> InputCmd {
    let mut cmd = InputCmd::default();
    if win.is_key_down(Key::W) || win.is_key_down(Key::Up) {
        cmd.forward += 1.0;
    }
    if win.is_key_down(Key::S) || win.is_key_down(Key::Down) {
        cmd.forward -= 1.0;
    }
    if win.is_key_down(Key::A) {
        cmd.strafe -= 1.0;
    }
    if win.is_key_down(Key::D) {
        cmd.strafe += 1.0;
    }
    if win.is_key_down(Key::Q) || win.is_key_down(Key::Left) {
        cmd.turn -= 1.0;
    }
    if win.is_key_down(Key::E) || win.is_key_down(Key::Right) {
        cmd.turn += 1.0;
    }
    cmd.use_act = win.is_key_pressed(Key::Space, KeyRepeat::No); // edge-trigger
    cmd
}

/// Trace from the player's eye through screen pixel `(mx, my)`.
fn pick(level: &Level, player: u32, opts: &Opts, mx: i32, my: i32) -> Option<TraceResult> {
    let ent = level.entity(player);
    let sector = ent.sector?;
    let cam = Camera::from_entity(ent);
    let ray = cam.mouse_ray(opts.fovy, mx, my, opts.width as i32, opts.height as i32);
    level.trace(sector, cam.pos, ray)
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    log::set_logger(&LOGGER).map_err(|e| anyhow::anyhow!("logger: {e}"))?;
    log::set_max_level(match opts.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });

    let (mut level, player) = corridor(opts.rooms)?;
    info!(
        "corridor of {} rooms: {} sectors, {} linedefs, {} contour entries",
        opts.rooms,
        level.sector_count(),
        level.linedef_count(),
        level.contour_count()
    );

    let mut sim = TicRunner::new(player);
    let mut overlay = TagOverlay::new();
    let mut view = Overhead::default();

    let (w, h) = (opts.width, opts.height);
    let mut win = Window::new("deeper_rs overhead", w, h, WindowOptions::default())?;
    win.set_target_fps(60);

    let (cx, cy) = ((w / 2) as i32, (h / 2) as i32);
    while win.is_open() && !win.is_key_down(Key::Escape) {
        /* --------------- input + fixed-rate sim ------------------------- */
        let cmd = sample_input(&win);
        sim.pump(&mut level, cmd);

        /* --------------- picking ---------------------------------------- */
        if win.is_key_pressed(Key::Tab, KeyRepeat::No) {
            level.tag_clear_all();
            info!("cleared all tags");
        }

        let ahead = pick(&level, player, &opts, cx, cy);
        level.tag_sidedefs(ahead.as_ref(), cmd.use_act);
        if cmd.use_act {
            info!("toggled wall {:?}", ahead.and_then(|h| h.linedef));
        }

        let below = pick(&level, player, &opts, cx, h as i32 - 1);
        let flat_click = win.is_key_pressed(Key::F, KeyRepeat::No);
        level.tag_flats(below.as_ref(), flat_click);
        if win.is_key_pressed(Key::G, KeyRepeat::No) {
            level.tag_sectors(below.as_ref(), true);
            info!("toggled sector {:?}", below.map(|h| h.sector));
        }

        /* --------------- height edits on selected flats ----------------- */
        let mut nudge = 0;
        if win.is_key_pressed(Key::PageUp, KeyRepeat::Yes) {
            nudge += 1;
        }
        if win.is_key_pressed(Key::PageDown, KeyRepeat::Yes) {
            nudge -= 1;
        }
        if let Some((_, dy)) = win.get_scroll_wheel().filter(|&(_, dy)| dy != 0.0) {
            nudge += dy.signum() as i32;
        }
        if nudge != 0 {
            level.nudge_selected_flats(nudge);
            entity_place(&mut level, player);
            info!("nudged selected flats by {nudge}");
        }

        /* --------------- draw ------------------------------------------- */
        overlay.clear();
        walk_level(&level, &mut overlay)?;

        let eye = *level.entity(player);
        view.begin_frame(w, h, &eye, opts.scale);
        view.draw_overlay(&overlay);
        view.draw_level(&level);
        for (id, e) in level.entities().iter().enumerate() {
            let colour = if id as u32 == player { software::PLAYER } else { software::PORTAL };
            view.draw_entity(e, defs::by_type(e.type_id).radius, colour);
        }
        if let Some(hit) = ahead {
            let p = view.to_screen(hit.position.truncate());
            view.line(view.to_screen(eye.position), p, software::HIGHLIGHT | 0x00_80_80_80);
            view.draw_entity(
                &Entity {
                    position: hit.position.truncate(),
                    ..eye
                },
                4.0,
                software::SOLID_WALL,
            );
        }

        let mut shown = Ok(());
        view.end_frame(|fb, w, h| shown = win.update_with_buffer(fb, w, h));
        shown?;
    }

    info!("{} tics simulated", sim.tics());
    Ok(())
}
