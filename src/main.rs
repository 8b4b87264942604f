//! Ballfling headless runner
//!
//! Builds a small level, drops a few balls and flings them with scripted
//! drags, logging what happens. Useful for tuning without a window.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use ballfling::sim::{BoxHazard, EventLog, GameEvent, GridTerrain, InputEvent, Material, Session};
use ballfling::{AssetCache, BallSprites, Settings, rnd};

/// Demo level, 32px cells
const LEVEL: &str = "
#........................#
#........................#
#........................#
#....BBB.................#
#..................D.....#
#..................D.....#
#.........SSS......D.....#
#..................D.....#
#....GG............D.....#
#~~~~~~~###############..#
##########################
";
const CELL_SIZE: f32 = 32.0;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the ball simulation headless", long_about = None)]
struct Cli {
    /// Settings JSON; defaults are used when the file is missing
    #[arg(long, default_value = "ballfling.json")]
    config: PathBuf,
    /// Directory holding ball.png and point.png
    #[arg(long)]
    assets: Option<PathBuf>,
    #[arg(long, default_value_t = 900)]
    frames: u64,
    #[arg(long, default_value_t = 1)]
    seed: u64,
    #[arg(long, default_value_t = 3)]
    balls: u32,
    /// Fling the balls every N frames
    #[arg(long, default_value_t = 150)]
    fling_every: u64,
    /// Write the effective settings here and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = Settings::load_or_default(&cli.config)
        .with_context(|| format!("reading settings from {}", cli.config.display()))?;

    if let Some(path) = &cli.write_config {
        settings
            .save(path)
            .with_context(|| format!("writing settings to {}", path.display()))?;
        return Ok(());
    }

    let sprites = match &cli.assets {
        Some(root) => {
            let mut cache = AssetCache::new(root);
            BallSprites::load(&mut cache)
                .with_context(|| format!("loading ball sprites from {}", root.display()))?
        }
        None => BallSprites::placeholder(&mut AssetCache::default()),
    };

    let mut session = Session::new(settings, sprites);
    let events = EventLog::attach(session.bus());

    let terrain = GridTerrain::from_ascii(LEVEL, CELL_SIZE).with_bus(session.bus().clone());
    let doors = terrain.count(Material::Thin);
    session.add_terrain(terrain);
    session.add_hazard(BoxHazard::new(Vec2::new(720.0, 200.0), Vec2::splat(12.0)));

    let mut rng = Pcg32::seed_from_u64(cli.seed);
    for _ in 0..cli.balls {
        let x = rnd(&mut rng, 64.0, 560.0);
        let y = rnd(&mut rng, 48.0, 96.0);
        session.spawn_ball(Vec2::new(x, y), Vec2::ZERO);
    }

    log::info!(
        "running {} frames with {} balls (seed {})",
        cli.frames,
        cli.balls,
        cli.seed
    );

    let dt = session.settings().frame_dt();
    let fling_every = cli.fling_every.max(1);
    for frame in 1..=cli.frames {
        if frame % fling_every == 0 {
            // Reset to the last rest position, then pull back and let go
            let start = Vec2::new(400.0, 300.0);
            let pull = Vec2::new(rnd(&mut rng, -200.0, 200.0), rnd(&mut rng, 0.0, 180.0));
            session.handle_input(&InputEvent::space());
            session.handle_input(&InputEvent::left_press(start.x, start.y));
            session.handle_input(&InputEvent::left_release(start.x + pull.x, start.y + pull.y));
            log::debug!("frame {}: fling with pull {:?}", frame, pull);
        }
        session.tick(dt);
    }

    let events = events.borrow();
    println!("frames:          {}", session.frame());
    println!("flings:          {}", events.count(&GameEvent::DragEnded));
    println!("doors smashed:   {}", events.count(&GameEvent::SmashedDoor));
    println!("door bounces:    {}", events.count(&GameEvent::BouncedOffDoor));
    println!("water hits:      {}", events.count(&GameEvent::HitWater));
    println!("terrain changes: {}", events.count(&GameEvent::TerrainChanged));
    println!("door cells:      {}", doors);
    for ball in session.balls() {
        let ball = ball.borrow();
        println!(
            "ball {}: pos ({:.1}, {:.1}) speed {:.2} {}",
            ball.id,
            ball.position.x,
            ball.position.y,
            ball.velocity.length(),
            if ball.is_at_rest() { "resting" } else { "moving" }
        );
    }
    println!(
        "camera ({:.1}, {:.1})",
        session.world.camera.x, session.world.camera.y
    );

    Ok(())
}
