//! Frame loop orchestration
//!
//! [`Game`] owns the session and drives one simulation tick, the music
//! lookahead, and one scene build per display refresh. The platform supplies
//! the refresh callback through a [`Ticker`]; headless runs use
//! [`ManualTicker`].

use glam::Vec2;

use crate::assets::AssetSnapshot;
use crate::audio::{AudioOut, NullAudio, Sequencer};
use crate::highscores::{HighScores, ScoreSink};
use crate::input::{Command, InputMapper};
use crate::renderer::{Frame, SceneRenderer, SceneView};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, tick};
use crate::theme::TimeOfDay;
use crate::tuning::MAX_LIVES;

/// Source of frame callbacks.
///
/// The game asks for exactly one callback after every frame it runs while
/// playing, and cancels the outstanding one when the run ends.
pub trait Ticker {
    fn request(&mut self);
    fn cancel(&mut self);
    fn pending(&self) -> bool;
}

/// Ticker driven by hand, for tests and the native runner
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualTicker {
    pending: bool,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the outstanding request, if any
    pub fn fire(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl Ticker for ManualTicker {
    fn request(&mut self) {
        self.pending = true;
    }

    fn cancel(&mut self) {
        self.pending = false;
    }

    fn pending(&self) -> bool {
        self.pending
    }
}

/// Receiver for HUD values, written as soon as they change
pub trait HudSink {
    fn score(&mut self, score: u64);
    fn lives(&mut self, lives: u8);
    fn multiplier(&mut self, multiplier: u32);
    fn game_over(&mut self, _final_score: u64) {}
}

/// Last values written to the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudState {
    pub score: u64,
    pub lives: u8,
    pub multiplier: u32,
}

impl Default for HudState {
    fn default() -> Self {
        Self {
            score: 0,
            lives: MAX_LIVES,
            multiplier: 1,
        }
    }
}

impl HudSink for HudState {
    fn score(&mut self, score: u64) {
        self.score = score;
    }

    fn lives(&mut self, lives: u8) {
        self.lives = lives;
    }

    fn multiplier(&mut self, multiplier: u32) {
        self.multiplier = multiplier;
    }
}

pub struct Game<T: Ticker = ManualTicker> {
    state: GameState,
    ticker: T,
    input: InputMapper,
    sequencer: Sequencer,
    scene: SceneRenderer,
    settings: Settings,
    time_of_day: TimeOfDay,
    /// Pinned theme; `None` follows the wall clock at each start
    fixed_time_of_day: Option<TimeOfDay>,
    assets: AssetSnapshot,
    audio: Box<dyn AudioOut>,
    scores: Box<dyn ScoreSink>,
    hud: HudState,
    hud_sink: Option<Box<dyn HudSink>>,
    /// Set once the score sink has seen this run
    reported: bool,
}

impl<T: Ticker> Game<T> {
    /// Idle game in the menu. Audio is silent and scores stay in memory
    /// until the `with_*` builders replace them.
    pub fn new(ticker: T, settings: Settings) -> Self {
        Self {
            state: GameState::new(0),
            ticker,
            input: InputMapper::new(),
            sequencer: Sequencer::new(),
            scene: SceneRenderer::new(0),
            settings,
            time_of_day: TimeOfDay::from_hour(crate::local_hour()),
            fixed_time_of_day: None,
            assets: AssetSnapshot::empty(),
            audio: Box::new(NullAudio),
            scores: Box::new(HighScores::new()),
            hud: HudState::default(),
            hud_sink: None,
            reported: false,
        }
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioOut>) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_score_sink(mut self, scores: Box<dyn ScoreSink>) -> Self {
        self.scores = scores;
        self
    }

    pub fn with_hud(mut self, hud: Box<dyn HudSink>) -> Self {
        self.hud_sink = Some(hud);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct world access for tools and staged tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn hud(&self) -> HudState {
        self.hud
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Volumes and toggles are read every frame, so edits apply mid-run
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        self.time_of_day
    }

    /// Pin the theme instead of reading the wall clock
    pub fn set_time_of_day(&mut self, time_of_day: TimeOfDay) {
        self.fixed_time_of_day = Some(time_of_day);
        self.time_of_day = time_of_day;
    }

    /// Sprites resolved so far; anything missing draws its fallback
    pub fn set_assets(&mut self, assets: AssetSnapshot) {
        self.assets = assets;
    }

    pub fn best_score(&self) -> Option<u64> {
        self.scores.best()
    }

    /// Reset everything and begin a run. Valid from any phase.
    pub fn start(&mut self, seed: u64) {
        self.state.phase = GamePhase::Playing;
        self.state.max_particles = self.settings.max_particles();
        self.state.reset(seed);
        self.input.clear();
        self.sequencer.reset();
        self.scene = SceneRenderer::new(seed);
        self.time_of_day = self
            .fixed_time_of_day
            .unwrap_or_else(|| TimeOfDay::from_hour(crate::local_hour()));
        self.reported = false;
        self.audio.resume();
        self.dispatch_events();
        self.ticker.request();
        log::info!("Run started (seed {}, {:?})", seed, self.time_of_day);
    }

    /// Leave the run for the menu. No further frames tick.
    pub fn stop(&mut self) {
        if self.state.phase == GamePhase::Playing {
            log::info!("Run stopped at score {}", self.state.score);
        }
        self.state.phase = GamePhase::Menu;
        self.ticker.cancel();
        self.input.clear();
    }

    pub fn command(&mut self, cmd: Command) {
        self.input.apply(cmd, &self.state);
    }

    /// Returns true when the key maps to a command
    pub fn key_down(&mut self, code: &str) -> bool {
        self.input.key_down(code, &self.state)
    }

    pub fn touch_start(&mut self, pos: Vec2) {
        self.input.touch_start(pos, &self.state);
    }

    pub fn touch_end(&mut self, pos: Vec2) {
        self.input.touch_end(pos, &self.state);
    }

    /// One display refresh: tick, events, music, scene.
    ///
    /// Returns `None` outside a run. The frame on which the run ends is still
    /// returned, but no further callback is requested.
    pub fn frame(&mut self, time_ms: f64) -> Option<Frame> {
        if !self.state.is_playing() {
            self.ticker.cancel();
            return None;
        }

        self.state.max_particles = self.settings.max_particles();
        let input = self.input.take();
        tick(&mut self.state, &input);
        self.dispatch_events();
        self.schedule_music();

        let view = SceneView {
            time_of_day: self.time_of_day,
            assets: &self.assets,
            time_ms,
            shake: self.settings.effective_screen_shake(),
            starfield: self.settings.quality.starfield_enabled(),
            twinkle: !self.settings.reduced_motion,
        };
        let frame = self.scene.build(&self.state, &view);

        if self.state.is_playing() {
            self.ticker.request();
        } else {
            self.ticker.cancel();
        }
        Some(frame)
    }

    fn dispatch_events(&mut self) {
        let events: Vec<GameEvent> = self.state.drain_events().collect();
        for event in events {
            match event {
                GameEvent::ScoreChanged(score) => {
                    self.hud.score(score);
                    if let Some(sink) = self.hud_sink.as_mut() {
                        sink.score(score);
                    }
                }
                GameEvent::LivesChanged(lives) => {
                    self.hud.lives(lives);
                    if let Some(sink) = self.hud_sink.as_mut() {
                        sink.lives(lives);
                    }
                }
                GameEvent::MultiplierChanged(multiplier) => {
                    self.hud.multiplier(multiplier);
                    if let Some(sink) = self.hud_sink.as_mut() {
                        sink.multiplier(multiplier);
                    }
                }
                GameEvent::Sound(effect) => {
                    let Some(now) = self.audio.now() else {
                        continue;
                    };
                    if let Some(voice) = effect.voice_at(self.settings.sfx_volume) {
                        self.audio.play(&voice, now);
                    }
                }
                GameEvent::GameOver { final_score } => {
                    if self.reported {
                        continue;
                    }
                    self.reported = true;
                    log::info!("Game over, final score {}", final_score);
                    self.scores.on_game_over(final_score);
                    if let Some(sink) = self.hud_sink.as_mut() {
                        sink.game_over(final_score);
                    }
                }
            }
        }
    }

    fn schedule_music(&mut self) {
        let Some(now) = self.audio.now() else {
            return;
        };
        let notes = self
            .sequencer
            .schedule(now, self.state.speed, self.settings.music_volume);
        for note in notes {
            self.audio.play(&note.voice, note.time);
        }
    }
}

impl Game<ManualTicker> {
    /// Run up to `frames` frames `frame_ms` apart, stopping early when the
    /// run ends. Returns how many frames ran.
    pub fn run_frames(&mut self, frames: usize, frame_ms: f64) -> usize {
        let mut ran = 0;
        while ran < frames && self.ticker.fire() {
            let time_ms = self.state.time_ticks as f64 * frame_ms;
            self.frame(time_ms);
            ran += 1;
        }
        ran
    }
}
