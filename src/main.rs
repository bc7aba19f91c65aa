//! Pixel Rusher native demo
//!
//! Plays a few sessions with a scripted pilot against the configured
//! leaderboard backend and prints the board afterwards.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::error::Error;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use tokio::time::{Instant, MissedTickBehavior};

    use pixel_rusher::persistence::{
        AnyLeaderboard, LocalLeaderboard, MemoryLeaderboard, RemoteLeaderboard,
    };
    use pixel_rusher::platform::FileStorage;
    use pixel_rusher::session::Phase;
    use pixel_rusher::settings::env;
    use pixel_rusher::sim::SessionState;
    use pixel_rusher::{App, Backend, Settings, SimConfig};

    const FRAME_INTERVAL: Duration = Duration::from_millis(16);
    const DEMO_PLAYER: &str = "demo";
    /// How far above the player the pilot looks for falling blocks
    const LOOKAHEAD: f32 = 220.0;
    const CANDIDATE_STEP: f32 = 4.0;

    /// Dodges falling blocks for a while, then stops paying attention
    struct Autopilot {
        frames_left: u32,
        target_x: f32,
    }

    impl Autopilot {
        fn new(config: &SimConfig, attention_frames: u32) -> Self {
            Self {
                frames_left: attention_frames,
                target_x: config.player_start_x(),
            }
        }

        /// Pointer x to report this frame, or `None` once distracted
        fn steer(&mut self, session: &SessionState) -> Option<f32> {
            if self.frames_left == 0 {
                return None;
            }
            self.frames_left -= 1;

            let config = &session.config;
            let half = config.player_width / 2.0;
            let threats: Vec<f32> = session
                .obstacles
                .iter()
                .filter(|o| o.rect.bottom() > config.player_y - LOOKAHEAD)
                .map(|o| o.rect.center_x())
                .collect();
            if threats.is_empty() {
                return Some(self.target_x + half);
            }

            let clearance = |x: f32| {
                threats
                    .iter()
                    .map(|c| (x + half - c).abs())
                    .fold(f32::INFINITY, f32::min)
            };

            let mut best = self.target_x;
            let mut best_clearance = clearance(best);
            let mut x = 0.0;
            while x <= config.max_player_x() {
                let c = clearance(x);
                let closer = (x - self.target_x).abs() < (best - self.target_x).abs();
                if c > best_clearance || (c == best_clearance && closer) {
                    best = x;
                    best_clearance = c;
                }
                x += CANDIDATE_STEP;
            }
            self.target_x = best;
            Some(best + half)
        }
    }

    fn open_leaderboard(settings: &Settings) -> Result<AnyLeaderboard, Box<dyn Error>> {
        let backend = match (settings.backend, settings.remote_config()) {
            (Backend::Remote, Some(config)) => {
                log::info!("Using remote leaderboard at {}", config.base_url);
                return Ok(AnyLeaderboard::Remote(RemoteLeaderboard::new(config)?));
            }
            (Backend::Remote, None) => {
                log::warn!(
                    "Remote backend needs {} and {}; falling back to local scores",
                    env::REMOTE_URL,
                    env::REMOTE_KEY
                );
                Backend::Local
            }
            (backend, _) => backend,
        };

        Ok(match backend {
            Backend::Memory => {
                log::info!("Using in-memory leaderboard");
                AnyLeaderboard::Memory(MemoryLeaderboard::new())
            }
            _ => {
                log::info!("Using local leaderboard in {}", settings.data_dir.display());
                AnyLeaderboard::Local(LocalLeaderboard::new(FileStorage::open(
                    &settings.data_dir,
                )?))
            }
        })
    }

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    }

    async fn play(
        app: &mut App<AnyLeaderboard>,
        rounds: u32,
        seed: u64,
    ) -> Result<(), Box<dyn Error>> {
        let mut rng = Pcg32::seed_from_u64(seed);

        for round in 1..=rounds {
            app.start_game()?;
            let attention = rng.random_range(300..1500);
            let mut pilot = Autopilot::new(app.controller().config(), attention);
            let started = Instant::now();
            let mut ticker = tokio::time::interval(FRAME_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            while app.phase() == Phase::Playing {
                ticker.tick().await;
                let steer = app.controller().session().and_then(|s| pilot.steer(s));
                if let Some(x) = steer {
                    app.pointer_moved(x, 0.0);
                }
                app.frame(started.elapsed().as_secs_f64() * 1000.0);
            }

            log::info!("Saving score...");
            app.wait_for_submission().await;
            let controller = app.controller();
            log::info!("Round {round}: score {}", controller.final_score());
            if controller.is_new_high_score() {
                log::info!("New high score!");
            }
            if let Some(error) = controller.error() {
                log::warn!("{error}");
            }
            app.back_to_menu()?;
        }
        Ok(())
    }

    async fn run() -> Result<(), Box<dyn Error>> {
        let lookup = |name: &str| std::env::var(name).ok();
        let data_dir = lookup(env::DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| Settings::default().data_dir);
        let prefs = FileStorage::open(&data_dir)?;
        let mut settings = Settings::load(&prefs);
        settings.apply_env(lookup);

        let config = SimConfig::default();
        config.validate()?;

        let gateway = open_leaderboard(&settings)?;
        let seed = clock_seed();
        log::info!("Seed: {seed}");
        let rounds = settings.demo_rounds;
        let mut app =
            App::new(gateway, config, seed).with_preferences(settings, Box::new(prefs));

        app.load().await;
        if let Some(error) = app.controller().error() {
            log::warn!("{error}");
        }
        log::info!("Known players: {:?}", app.controller().known_players());
        if app.controller().player_name().is_none() {
            app.select_player(DEMO_PLAYER)?;
        }

        play(&mut app, rounds, seed).await?;

        let board = app.controller().high_scores();
        println!("\nHIGH SCORES");
        if board.is_empty() {
            println!("  no scores yet");
        }
        for (rank, entry) in board.entries.iter().enumerate() {
            println!("  {}. {:<10} {:>8}", rank + 1, entry.display_name(), entry.score);
        }
        Ok(())
    }

    pub fn main() {
        env_logger::init();
        log::info!("Pixel Rusher (native demo) starting...");

        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                log::error!("Could not start runtime: {e}");
                std::process::exit(1);
            }
        };

        if let Err(e) = runtime.block_on(run()) {
            log::error!("{e}");
            std::process::exit(1);
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_autopilot_moves_away_from_threat() {
            let config = SimConfig::default();
            let mut session = SessionState::new(config.clone(), 1);
            // Block falling onto the centred player
            session.push_obstacle(167.0, 500.0);
            let mut pilot = Autopilot::new(&config, 10);

            let pointer = pilot.steer(&session).unwrap();
            let x = pointer - config.player_width / 2.0;
            assert!(x + config.player_width < 167.0 || x > 217.0);
        }

        #[test]
        fn test_autopilot_loses_attention() {
            let config = SimConfig::default();
            let session = SessionState::new(config.clone(), 1);
            let mut pilot = Autopilot::new(&config, 2);
            assert!(pilot.steer(&session).is_some());
            assert!(pilot.steer(&session).is_some());
            assert!(pilot.steer(&session).is_none());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser frontend; the library is driven by an embedding host
}
