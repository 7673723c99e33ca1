//! Daily Racer entry point
//!
//! Native: headless demo. Generates today's track, lets the autopilot drive
//! a full run, and prints the result JSON the score service would receive.
//! The browser build is driven from JS through `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}

/// `daily-racer [identifier] [tuning.json]`
#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    use std::rc::Rc;

    use daily_racer::Tuning;
    use daily_racer::sim::{RaceSession, TrackOptions, generate_daily_track};

    let mut args = std::env::args().skip(1);
    let identifier = args.next().unwrap_or_else(|| "racing".to_string());
    let tuning = match args.next() {
        Some(path) => Tuning::from_json_str(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    log::info!("Daily Racer (native) starting for {identifier}");
    let track = Rc::new(generate_daily_track(&identifier, &TrackOptions::default())?);

    let mut session = RaceSession::new(Rc::clone(&track), tuning)?;
    session.set_autopilot(true);

    // 60 Hz display refresh
    let mut now_ms = 0.0;
    let result = loop {
        if let Some(result) = session.advance_frame(now_ms) {
            break result;
        }
        now_ms += 1000.0 / 60.0;
    };
    session.stop();

    log::info!(
        "{} laps on {} ({} points, length {:.0})",
        session.state().laps,
        track.seed(),
        track.len(),
        track.length()
    );
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
