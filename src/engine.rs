//! Frame loop orchestration
//!
//! The engine owns the screen state machine, the simulation world and the
//! input tracker. Hosts drive it with `frame()` whenever the scheduler
//! fires and forward pointer events; the engine answers with snapshots.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_FRAME_DT};
use crate::persistence::{Identity, Leaderboard, LeaderboardEntry, ScoreStore, StoreError};
use crate::platform::{FrameScheduler, InputBinding};
use crate::renderer::{DrawSurface, RenderOptions, Renderer, Scene};
use crate::settings::Settings;
use crate::sim::state::{RunState, Screen};
use crate::sim::tick::{FrameInput, World, tick};
use crate::sim::trail::InputTracker;

/// Construction parameters
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub width: f32,
    pub height: f32,
    /// Base seed; run `n` is seeded with `seed + n`
    pub seed: u64,
    pub settings: Settings,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: 0x5EED,
            settings: Settings::default(),
        }
    }
}

/// What the host UI sees after every state-affecting event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub run: RunState,
    pub screen: Screen,
    pub best_score: u64,
}

pub type Observer = Box<dyn FnMut(&Snapshot)>;

pub struct Engine<S: FrameScheduler> {
    scheduler: S,
    world: World,
    input: InputTracker,
    renderer: Renderer,
    screen: Screen,
    options: EngineOptions,
    run_index: u64,
    run_started_ms: f64,
    last_frame_ms: Option<f64>,
    best_score: u64,
    observer: Option<Observer>,
    score_store: Option<Box<dyn ScoreStore>>,
    leaderboard: Option<Box<dyn Leaderboard>>,
    identity: Option<Identity>,
    bindings: Vec<Box<dyn InputBinding>>,
    torn_down: bool,
}

impl<S: FrameScheduler> Engine<S> {
    pub fn new(scheduler: S, options: EngineOptions) -> Self {
        let settings = &options.settings;
        let world = World::new(options.width, options.height, settings.max_particles(), options.seed);
        let renderer = Renderer::new(options.width, options.height, RenderOptions::from(settings));
        Self {
            scheduler,
            world,
            input: InputTracker::new(),
            renderer,
            screen: Screen::Menu,
            options,
            run_index: 0,
            run_started_ms: 0.0,
            last_frame_ms: None,
            best_score: 0,
            observer: None,
            score_store: None,
            leaderboard: None,
            identity: None,
            bindings: Vec::new(),
            torn_down: false,
        }
    }

    /// Attach the host callback. It immediately receives the current snapshot.
    pub fn with_observer(mut self, observer: impl FnMut(&Snapshot) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self.emit();
        self
    }

    /// Attach best-score persistence and load the stored best
    pub fn with_score_store(mut self, store: impl ScoreStore + 'static) -> Self {
        self.best_score = store.read_best_score();
        log::info!("Best score on record: {}", self.best_score);
        self.score_store = Some(Box::new(store));
        self
    }

    pub fn with_leaderboard(mut self, board: impl Leaderboard + 'static) -> Self {
        self.leaderboard = Some(Box::new(board));
        self
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Identity may arrive after construction (sign-in)
    pub fn set_identity(&mut self, identity: Option<Identity>) {
        self.identity = identity;
    }

    /// Keep an input listener set alive until teardown
    pub fn bind_input(&mut self, mut binding: impl InputBinding + 'static) {
        if self.torn_down {
            binding.unbind();
            return;
        }
        self.bindings.push(Box::new(binding));
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn run(&self) -> &RunState {
        &self.world.run
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for scripted setups
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    pub fn settings(&self) -> &Settings {
        &self.options.settings
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            run: self.world.run,
            screen: self.screen,
            best_score: self.best_score,
        }
    }

    fn emit(&mut self) {
        if self.torn_down {
            return;
        }
        let snapshot = self.snapshot();
        if let Some(observer) = self.observer.as_mut() {
            observer(&snapshot);
        }
    }

    fn transition(&mut self, next: Screen) -> bool {
        if self.torn_down || !self.screen.can_transition_to(next) {
            log::debug!("Ignoring screen transition {:?} -> {:?}", self.screen, next);
            return false;
        }
        self.screen = next;
        true
    }

    /// Menu -> Playing. Returns false (and does nothing) from any other screen.
    pub fn start(&mut self) -> bool {
        if self.screen != Screen::Menu || !self.transition(Screen::Playing) {
            return false;
        }
        self.begin_run();
        true
    }

    /// GameOver -> Playing. Returns false (and does nothing) from any other screen.
    pub fn play_again(&mut self) -> bool {
        if self.screen != Screen::GameOver || !self.transition(Screen::Playing) {
            return false;
        }
        self.begin_run();
        true
    }

    fn begin_run(&mut self) {
        let seed = self.options.seed.wrapping_add(self.run_index);
        self.run_index += 1;

        self.world.reset(seed);
        self.input.release();
        self.run_started_ms = self.scheduler.now_ms();
        self.last_frame_ms = None;

        log::info!("Run {} started (seed {seed})", self.run_index);
        self.emit();

        self.scheduler.cancel();
        self.scheduler.schedule_next();
    }

    /// One animation frame: simulate, render, and reschedule while playing
    pub fn frame<D: DrawSurface + ?Sized>(&mut self, surface: &mut D) {
        if self.torn_down || self.screen != Screen::Playing || !self.world.run.running {
            return;
        }

        let now = self.scheduler.now_ms();
        let dt = self
            .last_frame_ms
            .map_or(0.0, |last| ((now - last) / 1000.0) as f32)
            .clamp(0.0, MAX_FRAME_DT);
        self.last_frame_ms = Some(now);
        let elapsed_secs = ((now - self.run_started_ms) / 1000.0).max(0.0);

        let segments = self.input.live_segments(now);
        let report = tick(
            &mut self.world,
            &FrameInput {
                dt,
                now_ms: now,
                elapsed_secs,
                segments: &segments,
            },
        );

        if report.game_over {
            self.game_over();
        } else if report.state_changed {
            self.emit();
        }

        let scene = Scene {
            objects: self.world.spawner.objects(),
            trail: self.input.live_trail(now),
            effects: &self.world.effects,
            combo_count: self.world.run.combo_count,
            combo_multiplier: self.world.run.combo_multiplier,
            last_cut_pos: self.world.last_cut_pos,
        };
        self.renderer.render(surface, &scene);

        if self.screen == Screen::Playing && self.world.run.running {
            self.scheduler.schedule_next();
        }
    }

    fn game_over(&mut self) {
        if !self.transition(Screen::GameOver) {
            return;
        }
        self.world.run.finish();
        self.scheduler.cancel();

        let score = self.world.run.score;
        log::info!(
            "Game over: score {score} after {:.1}s",
            self.world.run.elapsed_secs
        );

        if score > self.best_score {
            self.best_score = score;
            log::info!("New best score: {score}");
            if let Some(store) = self.score_store.as_mut() {
                if let Err(e) = store.write_best_score(score) {
                    log::warn!("Failed to persist best score: {e}");
                }
            }
        }

        self.emit();

        if let (Some(board), Some(identity)) = (self.leaderboard.as_mut(), self.identity.as_ref()) {
            match board.submit_score(identity, score) {
                Ok(true) => log::info!("Leaderboard accepted {score} for {}", identity.label()),
                Ok(false) => log::debug!("Leaderboard kept previous best for {}", identity.label()),
                Err(e) => log::warn!("Leaderboard submit failed: {e}"),
            }
        }
    }

    /// Top entries from the attached leaderboard (empty without one)
    pub fn fetch_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        match &self.leaderboard {
            Some(board) => board.fetch_leaderboard(limit),
            None => Ok(Vec::new()),
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if self.torn_down {
            return;
        }
        let now = self.scheduler.now_ms();
        self.input.press(x, y, now);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.torn_down {
            return;
        }
        let now = self.scheduler.now_ms();
        self.input.move_to(x, y, now);
    }

    pub fn pointer_up(&mut self) {
        self.end_gesture();
    }

    pub fn pointer_cancel(&mut self) {
        self.end_gesture();
    }

    fn end_gesture(&mut self) {
        if self.torn_down {
            return;
        }
        self.input.release();
        if let Some(bonus) = self.world.end_gesture() {
            log::debug!("Swipe bonus +{bonus}");
            self.emit();
        }
    }

    /// Rescale bounds for future spawns. Live objects keep their positions.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            log::debug!("Ignoring resize to {width}x{height}");
            return;
        }
        self.options.width = width;
        self.options.height = height;
        self.world.spawner.resize(width, height);
        self.renderer.resize(width, height);
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.world.effects.set_max_particles(settings.max_particles());
        self.renderer.set_options(RenderOptions::from(&settings));
        self.options.settings = settings;
    }

    /// Stop the loop, release input listeners and go silent for good
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.scheduler.cancel();
        for mut binding in self.bindings.drain(..) {
            binding.unbind();
        }
        self.observer = None;
        self.input.release();
        log::info!("Engine torn down");
    }
}

impl<S: FrameScheduler> Drop for Engine<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualScheduler;
    use crate::renderer::MeshSurface;
    use crate::settings::QualityPreset;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine() -> (Engine<ManualScheduler>, Rc<RefCell<Vec<Snapshot>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let engine = Engine::new(ManualScheduler::starting_at(1000.0), EngineOptions::default())
            .with_observer(move |s| sink.borrow_mut().push(*s));
        (engine, seen)
    }

    #[test]
    fn test_observer_gets_initial_menu_snapshot() {
        let (engine, seen) = engine();
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].screen, Screen::Menu);
        assert!(!engine.run().running);
    }

    #[test]
    fn test_start_resets_and_schedules() {
        let (mut engine, seen) = engine();
        assert!(engine.start());
        assert_eq!(engine.screen(), Screen::Playing);
        assert!(engine.run().running);
        assert!(engine.scheduler().is_pending());
        let last = *seen.borrow().last().unwrap();
        assert_eq!(last.screen, Screen::Playing);
        assert_eq!(last.run.score, 0);
    }

    #[test]
    fn test_invalid_commands_ignored() {
        let (mut engine, seen) = engine();
        assert!(!engine.play_again(), "play-again from menu");
        assert!(engine.start());
        assert!(!engine.start(), "start while playing");
        assert!(!engine.play_again(), "play-again while playing");
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_frame_reschedules_only_while_playing() {
        let (mut engine, _) = engine();
        let mut mesh = MeshSurface::new(QualityPreset::Low);

        engine.frame(&mut mesh);
        assert!(!engine.scheduler().is_pending());
        assert_eq!(mesh.triangle_count(), 0, "menu frames draw nothing");

        engine.start();
        assert!(engine.scheduler_mut().take_pending());
        engine.scheduler_mut().advance_ms(16.0);
        engine.frame(&mut mesh);
        assert!(engine.scheduler().is_pending());
        assert!(mesh.triangle_count() >= 2);
    }

    #[test]
    fn test_dt_is_clamped_after_stall() {
        let (mut engine, _) = engine();
        let mut mesh = MeshSurface::new(QualityPreset::Low);
        engine.start();
        let id = engine.world_mut().spawner.insert(
            &crate::sim::state::FRUIT_KINDS[0],
            glam::Vec2::new(400.0, 100.0),
            glam::Vec2::new(0.0, 100.0),
        );
        engine.frame(&mut mesh);
        engine.scheduler_mut().advance_ms(5000.0);
        engine.frame(&mut mesh);

        let obj = engine.world().spawner.objects().iter().find(|o| o.id == id).unwrap();
        assert!((obj.pos.y - (100.0 + 100.0 * MAX_FRAME_DT)).abs() < 1e-3);
    }

    #[test]
    fn test_resize_keeps_live_objects() {
        let (mut engine, _) = engine();
        engine.start();
        engine.world_mut().spawner.insert(
            &crate::sim::state::FRUIT_KINDS[0],
            glam::Vec2::new(700.0, 100.0),
            glam::Vec2::ZERO,
        );
        engine.resize(320.0, 480.0);
        assert_eq!(engine.world().spawner.size(), (320.0, 480.0));
        assert_eq!(engine.world().spawner.objects()[0].pos.x, 700.0);

        engine.resize(0.0, f32::NAN);
        assert_eq!(engine.world().spawner.size(), (320.0, 480.0));
    }

    #[test]
    fn test_apply_settings_caps_particles() {
        let (mut engine, _) = engine();
        let mut settings = Settings::default();
        settings.particles = false;
        engine.apply_settings(settings);
        engine.start();
        let obj = crate::sim::state::FallingObject::new(
            0,
            &crate::sim::state::FRUIT_KINDS[0],
            glam::Vec2::ZERO,
            glam::Vec2::ZERO,
        );
        engine.world_mut().effects.spawn_slice(&obj);
        assert!(engine.world().effects.particles.is_empty());
        assert_eq!(engine.world().effects.halves.len(), 2);
    }

    #[test]
    fn test_apply_settings_switches_preset_mid_run() {
        let (mut engine, _) = engine();
        engine.start();
        let mut settings = engine.settings().clone();
        settings.apply_preset(QualityPreset::Low);
        engine.apply_settings(settings);
        assert_eq!(engine.settings().quality, QualityPreset::Low);

        let obj = crate::sim::state::FallingObject::new(
            0,
            &crate::sim::state::FRUIT_KINDS[0],
            glam::Vec2::ZERO,
            glam::Vec2::ZERO,
        );
        for _ in 0..10 {
            engine.world_mut().effects.spawn_slice(&obj);
        }
        assert_eq!(engine.world().effects.particles.len(), QualityPreset::Low.max_particles());
        assert!(engine.run().running);
    }

    #[test]
    fn test_runs_reseed_per_run_index() {
        let opts = EngineOptions {
            seed: 7,
            ..EngineOptions::default()
        };
        let mut a = Engine::new(ManualScheduler::new(), opts.clone());
        let mut b = Engine::new(ManualScheduler::new(), opts);
        let mut mesh = MeshSurface::new(QualityPreset::Low);
        a.start();
        b.start();
        a.scheduler_mut().advance_ms(2000.0);
        b.scheduler_mut().advance_ms(2000.0);
        a.frame(&mut mesh);
        b.frame(&mut mesh);

        let xs = |e: &Engine<ManualScheduler>| -> Vec<f32> {
            e.world().spawner.objects().iter().map(|o| o.pos.x).collect()
        };
        // First wave fires once the opening interval has passed
        assert!(!xs(&a).is_empty());
        assert_eq!(xs(&a), xs(&b));
    }
}
