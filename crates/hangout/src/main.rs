//! Headless demo: builds the park room (or loads a JSON scene setup given as
//! the first argument), walks the local player across it on a fixed
//! timestep, and logs frame statistics along the way.

mod loader;
mod rooms;
mod session;
mod sprites;

use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;
use std::time::Duration;

use engine::{ActorId, FrameScheduler, SceneSetup, TileCoord};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::loader::parse_scene_setup;
use crate::rooms::{room_setup, RoomKind, LOCAL_PLAYER_ID};
use crate::session::HangoutSession;
use crate::sprites::sprite_library;

const FRAME_DT: f32 = 1.0 / 60.0;
const DEMO_FRAMES: u64 = 900;
const STATS_EVERY_FRAMES: u64 = 60;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn load_setup() -> Result<SceneSetup, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!(path = %path, "loading_scene_setup");
            let json = std::fs::read_to_string(&path)?;
            Ok(parse_scene_setup(&json)?)
        }
        None => Ok(room_setup(RoomKind::Park)),
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let setup = load_setup()?;
    let session = Rc::new(RefCell::new(HangoutSession::new(setup, sprite_library())?));

    session.borrow_mut().tap_tile(TileCoord::new(20, 14));

    let mut scheduler = FrameScheduler::new();

    let sim = Rc::clone(&session);
    scheduler.register(move |tick| {
        sim.borrow_mut().advance(tick.now, tick.dt);
    });

    let draw = Rc::clone(&session);
    let frame_counter = Rc::new(RefCell::new(0u64));
    let counter = Rc::clone(&frame_counter);
    scheduler.register(move |tick| {
        let mut draw = draw.borrow_mut();
        let frame = draw.render_frame(tick.now);
        let mut count = counter.borrow_mut();
        *count += 1;
        if *count % STATS_EVERY_FRAMES == 0 {
            let player = draw.state().actor(ActorId(LOCAL_PLAYER_ID));
            info!(
                frame = *count,
                tiles = frame.tiles.len(),
                actors = frame.actors.len(),
                x = player.map(|p| p.pos().x),
                y = player.map(|p| p.pos().y),
                "frame_stats"
            );
        }
    });

    for frame in 0..DEMO_FRAMES {
        let now = Duration::from_secs_f64(frame as f64 * FRAME_DT as f64);
        scheduler.run_frame(now, FRAME_DT);
    }
    scheduler.clear();

    let session = session.borrow();
    let player = session
        .state()
        .actor(ActorId(LOCAL_PLAYER_ID))
        .map(|p| (p.tile(), p.pos()));
    info!(
        moving = session.is_actor_moving(ActorId(LOCAL_PLAYER_ID)),
        ?player,
        effect_ticks = session.state().effect_tick(),
        "demo_finished"
    );
    Ok(())
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        error!(%err, "demo_failed");
        std::process::exit(1);
    }
}
