//! Sweep Catch entry point
//!
//! Headless native demo: a ticker thread advances the simulation in real time
//! while the main thread plays an autopilot that drags the target under the
//! ball. Events are logged; the run ends when the countdown does.
//!
//! Usage: `sweep-catch [easy|normal|hard] [seed]`
//! Set `SWEEP_CATCH_TUNING` to a JSON file to override timing knobs.

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use sweep_catch::sim::{GameDriver, GameEvent, SharedDriver};
use sweep_catch::{Difficulty, Tuning};

/// How often the ticker feeds elapsed time into the driver
const TICK_POLL: Duration = Duration::from_millis(10);
/// How often the autopilot moves the target
const INPUT_POLL: Duration = Duration::from_millis(30);

fn lock(driver: &SharedDriver) -> MutexGuard<'_, GameDriver> {
    driver.lock().unwrap_or_else(PoisonError::into_inner)
}

fn load_tuning() -> Result<Tuning, String> {
    match std::env::var("SWEEP_CATCH_TUNING") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path, e))?;
            Tuning::from_json(&json).map_err(|e| format!("{}: {}", path, e))
        }
        Err(_) => Ok(Tuning::default()),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let difficulty = match args.next() {
        Some(name) => match Difficulty::from_str(&name) {
            Some(d) => d,
            None => {
                log::error!("Unknown difficulty '{}', expected easy, normal or hard", name);
                return ExitCode::FAILURE;
            }
        },
        None => Difficulty::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });

    let tuning = match load_tuning() {
        Ok(tuning) => tuning,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut driver = match GameDriver::new(difficulty, tuning, seed) {
        Ok(driver) => driver,
        Err(e) => {
            log::error!("Invalid settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!("Sweep Catch starting ({}, seed {})", difficulty.as_str(), seed);

    let finished = Arc::new(AtomicBool::new(false));
    {
        let finished = Arc::clone(&finished);
        driver.subscribe(move |event| match event {
            GameEvent::Collision { sound } => log::info!("Catch! (sound {})", sound.0),
            GameEvent::GameOver { sound, final_score } => {
                log::info!("Time's up - final score {} (sound {})", final_score, sound.0);
                finished.store(true, Ordering::SeqCst);
            }
            GameEvent::DisableControl { duration } => {
                log::debug!("Control disabled for {:?}", duration)
            }
        });
    }

    let driver = driver.into_shared();
    lock(&driver).press_control();

    let ticker = {
        let driver = Arc::clone(&driver);
        let finished = Arc::clone(&finished);
        thread::spawn(move || {
            let mut last = Instant::now();
            while !finished.load(Ordering::SeqCst) {
                thread::sleep(TICK_POLL);
                let now = Instant::now();
                lock(&driver).advance(now - last);
                last = now;
            }
        })
    };

    let mut last_report = Instant::now();
    while !finished.load(Ordering::SeqCst) {
        {
            let mut driver = lock(&driver);
            let snapshot = driver.snapshot();
            let initial_x = driver.engine().settings().target_initial_x;

            // Chase the ball with a slow wobble so the target doesn't sit still
            let wobble = (driver.now().as_secs_f32() * 2.0).sin() * 10.0;
            driver.drag(initial_x + snapshot.ball_offset.x + wobble);

            if last_report.elapsed() >= Duration::from_secs(5) {
                log::info!(
                    "score={} time_left={}s target=({:.0}, {:.0})",
                    snapshot.score,
                    snapshot.time_remaining,
                    snapshot.target_x,
                    snapshot.target_y
                );
                last_report = Instant::now();
            }
        }
        thread::sleep(INPUT_POLL);
    }

    if ticker.join().is_err() {
        log::error!("Ticker thread panicked");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
