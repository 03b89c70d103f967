//! Sky Leap entry point
//!
//! Native builds run a headless session steered by the autopilot and log the
//! outcome. The browser build is driven from JS through `WebSession`.
//!
//! Usage: sky-leap [--tuning <file.json>] [--seed <n>] [--frames <n>] [--best <file.json>]

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use sky_leap::audio::LogSound;
    use sky_leap::persistence::{BestScoreStore, FileStore, MemoryStore};
    use sky_leap::platform::{clock_seed, init_logging};
    use sky_leap::sim::{GamePhase, autopilot_target};
    use sky_leap::{Result, Session, Tuning};

    /// Stop after this many frames if the autopilot never falls (~10 minutes)
    const DEFAULT_FRAME_CAP: u64 = 36_000;

    #[derive(Debug, Default)]
    struct Args {
        tuning: Option<PathBuf>,
        seed: Option<u64>,
        frames: Option<u64>,
        best: Option<PathBuf>,
    }

    fn parse_args() -> std::result::Result<Args, String> {
        let mut args = Args::default();
        let mut iter = std::env::args().skip(1);
        while let Some(flag) = iter.next() {
            let mut value = || iter.next().ok_or_else(|| format!("{flag} needs a value"));
            match flag.as_str() {
                "--tuning" => args.tuning = Some(value()?.into()),
                "--best" => args.best = Some(value()?.into()),
                "--seed" => {
                    let v = value()?;
                    args.seed = Some(v.parse().map_err(|_| format!("bad seed {v:?}"))?);
                }
                "--frames" => {
                    let v = value()?;
                    args.frames = Some(v.parse().map_err(|_| format!("bad frame count {v:?}"))?);
                }
                other => return Err(format!("unknown argument {other:?}")),
            }
        }
        Ok(args)
    }

    fn play<B: BestScoreStore>(tuning: Tuning, seed: u64, cap: u64, store: B) {
        let mut session = Session::new(tuning, seed, LogSound, store);
        // First tap leaves the title screen
        session.pointer_down(0.0);

        let mut frames = 0;
        while frames < cap {
            match autopilot_target(session.engine().world()) {
                Some(x) => session.pointer_move(x),
                None => session.pointer_up(),
            }
            frames += 1;
            if session.frame().phase == GamePhase::GameOver {
                break;
            }
        }

        let world = session.snapshot();
        if world.phase == GamePhase::GameOver {
            log::info!(
                "Game over after {frames} frames: score {} altitude {:.0} best {}",
                world.score,
                world.altitude,
                world.best_score
            );
        } else {
            log::info!(
                "Still airborne after {frames} frames: score {} altitude {:.0}",
                world.score,
                world.altitude
            );
        }
    }

    pub fn run() -> Result<()> {
        init_logging();
        let args = match parse_args() {
            Ok(args) => args,
            Err(msg) => {
                log::error!("{msg}");
                log::error!(
                    "usage: sky-leap [--tuning <file.json>] [--seed <n>] [--frames <n>] [--best <file.json>]"
                );
                std::process::exit(2);
            }
        };

        let tuning = match &args.tuning {
            Some(path) => {
                log::info!("Loading tuning from {}", path.display());
                Tuning::load(path)?
            }
            None => Tuning::default(),
        };
        let seed = args.seed.unwrap_or_else(clock_seed);
        let cap = args.frames.unwrap_or(DEFAULT_FRAME_CAP);
        log::info!("Sky Leap (headless) seed {seed}, frame cap {cap}");

        match args.best {
            Some(path) => play(tuning, seed, cap, FileStore::new(path)),
            None => play(tuning, seed, cap, MemoryStore::default()),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = headless::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is WebSession, this is just to satisfy the compiler
}
