//! Game session controller
//!
//! Owns the simulation state and drives the menu → loading → playing →
//! paused/dying → game-over/victory state machine around it. Hosts feed it
//! input and frame time, read the state to draw, and drain the event queue
//! into an audio sink.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{BOSS_LEVEL, DEFAULT_PADDLE_SPEED, DYING_DURATION};
use crate::sim::{self, GameEvent, GamePhase, GameState, TickInput, TickOutcome};

/// A phase change scheduled for later, dropped if the phase moves on first
#[derive(Debug, Clone, Copy, PartialEq)]
struct DeferredTransition {
    from: GamePhase,
    to: GamePhase,
    /// Seconds left
    remaining: f32,
}

/// One run of the game, from the title screen onward
#[derive(Debug)]
pub struct Session<R: Rng = Pcg32> {
    state: GameState,
    rng: R,
    events: Vec<GameEvent>,
    /// Intro for the level being loaded, once it has arrived
    intro: Option<String>,
    /// Level whose intro the host still has to fetch
    intro_request: Option<u32>,
    deferred: Option<DeferredTransition>,
}

impl Session<Pcg32> {
    /// Session with an entropy-seeded generator
    pub fn new() -> Self {
        Self::with_rng(Pcg32::from_rng(&mut rand::rng()))
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed))
    }
}

impl Default for Session<Pcg32> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            state: GameState::new(),
            rng,
            events: Vec::new(),
            intro: None,
            intro_request: None,
            deferred: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for hosts and test harnesses that stage scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Intro text for the current level, if it has arrived
    pub fn intro(&self) -> Option<&str> {
        self.intro.as_deref()
    }

    /// Whether a game-over transition is counting down
    pub fn game_over_pending(&self) -> bool {
        self.deferred.is_some()
    }

    /// Take all events queued since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// MENU → LOADING_LEVEL with a fresh run
    pub fn start(&mut self) {
        if self.state.phase != GamePhase::Menu {
            return;
        }

        self.deferred = None;
        self.state = GameState::new();
        log::info!("New game");
        self.events.push(GameEvent::MusicStart);
        self.enter_loading();
    }

    /// The level the host should fetch an intro for. Returns each request once.
    pub fn take_intro_request(&mut self) -> Option<u32> {
        self.intro_request.take()
    }

    /// Deliver the intro for `level`. Ignored unless that level is loading.
    pub fn provide_intro(&mut self, level: u32, text: String) -> bool {
        if self.state.phase != GamePhase::LoadingLevel || self.state.level != level {
            log::debug!("Dropping stale intro for level {}", level);
            return false;
        }
        self.intro = Some(text);
        true
    }

    /// LOADING_LEVEL → PLAYING, once the intro is in
    pub fn confirm(&mut self) -> bool {
        if self.state.phase != GamePhase::LoadingLevel || self.intro.is_none() {
            return false;
        }
        self.state.phase = GamePhase::Playing;
        true
    }

    /// PLAYING ↔ PAUSED; no-op elsewhere
    pub fn toggle_pause(&mut self) {
        self.state.phase = match self.state.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    /// Leave to the menu from PAUSED or DYING, cancelling any pending game over
    pub fn exit(&mut self) {
        if !matches!(self.state.phase, GamePhase::Paused | GamePhase::Dying) {
            return;
        }
        if self.deferred.take().is_some() {
            log::debug!("Cancelled pending game over");
        }
        self.state.phase = GamePhase::Menu;
        self.events.push(GameEvent::MusicStop);
        log::info!("Exited to menu");
    }

    /// GAME_OVER / VICTORY → MENU
    pub fn acknowledge(&mut self) {
        if matches!(self.state.phase, GamePhase::GameOver | GamePhase::Victory) {
            self.state.phase = GamePhase::Menu;
        }
    }

    /// Launch docked balls. Only works while playing.
    pub fn launch(&mut self) -> bool {
        let launched = sim::launch(&mut self.state, &mut self.rng);
        if launched {
            self.events.push(GameEvent::BallLaunched);
        }
        launched
    }

    /// One tick: apply one-shot actions, run the deferred timer, then simulate
    pub fn update(&mut self, input: &TickInput, dt: f32) -> TickOutcome {
        if input.pause {
            self.toggle_pause();
        }
        if input.launch {
            self.launch();
        }
        self.advance_deferred(dt);

        if !self.state.phase.is_simulated() {
            return TickOutcome::Continue;
        }

        let report = sim::tick(&mut self.state, input, &mut self.rng);
        self.events.extend(report.events);

        match report.outcome {
            TickOutcome::Continue => {}
            TickOutcome::LevelCleared => self.level_cleared(),
            TickOutcome::LifeLost => log::debug!("Life lost, {} left", self.state.lives),
            TickOutcome::PlayerDied => {
                log::info!("Out of lives at level {}", self.state.level);
                self.events.push(GameEvent::MusicStop);
                self.deferred = Some(DeferredTransition {
                    from: GamePhase::Dying,
                    to: GamePhase::GameOver,
                    remaining: DYING_DURATION,
                });
            }
        }

        report.outcome
    }

    fn advance_deferred(&mut self, dt: f32) {
        let Some(pending) = self.deferred.as_mut() else {
            return;
        };

        if self.state.phase != pending.from {
            self.deferred = None;
            return;
        }

        pending.remaining -= dt;
        if pending.remaining <= 0.0 {
            self.state.phase = pending.to;
            self.deferred = None;
            if self.state.phase == GamePhase::GameOver {
                log::info!("Game over with score {}", self.state.score);
            }
        }
    }

    fn level_cleared(&mut self) {
        if self.state.level >= BOSS_LEVEL {
            self.state.phase = GamePhase::Victory;
            self.events.push(GameEvent::MusicStop);
            log::info!("Victory with score {}", self.state.score);
            return;
        }

        self.state.level += 1;
        self.enter_loading();
    }

    fn enter_loading(&mut self) {
        let state = &mut self.state;

        if state.level == 1 {
            state.reset_ball();
        } else {
            state.balls.retain(|b| b.active);
            if state.balls.is_empty() {
                state.reset_ball();
            }
            for ball in state.balls.iter_mut() {
                ball.dock(&state.paddle);
            }
        }

        state.power_ups.clear();
        state.particles.clear();
        state.paddle.set_speed(DEFAULT_PADDLE_SPEED);
        state.bricks = sim::generate(state.level, &mut self.rng);
        state.phase = GamePhase::LoadingLevel;

        self.events.push(GameEvent::MusicIntensity(state.level));
        self.intro = None;
        self.intro_request = Some(state.level);

        log::info!(
            "Loading level {} ({} bricks, {} balls)",
            state.level,
            state.bricks.len(),
            state.balls.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn session() -> Session {
        Session::from_seed(7)
    }

    fn playing() -> Session {
        let mut s = session();
        s.start();
        let level = s.take_intro_request().unwrap();
        s.provide_intro(level, "Go!".into());
        assert!(s.confirm());
        s
    }

    #[test]
    fn test_start_resets_run() {
        let mut s = session();
        s.start();
        let state = s.state();
        assert_eq!(state.phase, GamePhase::LoadingLevel);
        assert_eq!((state.level, state.lives, state.score), (1, 3, 0));
        assert_eq!(state.paddle.width, PADDLE_START_WIDTH);
        assert_eq!(state.bricks.len(), 36);
        assert_eq!(state.balls.len(), 1);
        assert!(state.balls[0].is_docked());
        assert_eq!(
            s.drain_events(),
            vec![GameEvent::MusicStart, GameEvent::MusicIntensity(1)]
        );
    }

    #[test]
    fn test_start_ignored_outside_menu() {
        let mut s = playing();
        s.state_mut().score = 500;
        s.start();
        assert_eq!(s.state().score, 500);
        assert_eq!(s.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_confirm_waits_for_intro() {
        let mut s = session();
        s.start();
        assert!(!s.confirm());
        assert_eq!(s.take_intro_request(), Some(1));
        assert_eq!(s.take_intro_request(), None);

        // Stale level is dropped
        assert!(!s.provide_intro(2, "late".into()));
        assert!(!s.confirm());

        assert!(s.provide_intro(1, "Oink!".into()));
        assert_eq!(s.intro(), Some("Oink!"));
        assert!(s.confirm());
        assert_eq!(s.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_pause_only_from_playing() {
        let mut s = session();
        s.toggle_pause();
        assert_eq!(s.phase(), GamePhase::Menu);

        let mut s = playing();
        s.toggle_pause();
        assert_eq!(s.phase(), GamePhase::Paused);
        s.update(&TickInput::default(), SIM_DT);
        s.toggle_pause();
        assert_eq!(s.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_paused_session_does_not_simulate() {
        let mut s = playing();
        s.launch();
        s.toggle_pause();
        let before = s.state().balls[0].pos;
        for _ in 0..10 {
            s.update(&TickInput::default(), SIM_DT);
        }
        assert_eq!(s.state().balls[0].pos, before);
    }

    #[test]
    fn test_exit_from_paused() {
        let mut s = playing();
        s.drain_events();
        s.toggle_pause();
        s.exit();
        assert_eq!(s.phase(), GamePhase::Menu);
        assert_eq!(s.drain_events(), vec![GameEvent::MusicStop]);
    }

    #[test]
    fn test_exit_ignored_while_playing() {
        let mut s = playing();
        s.exit();
        assert_eq!(s.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_deferred_transition_dropped_when_phase_moves() {
        let mut s = playing();
        s.deferred = Some(DeferredTransition {
            from: GamePhase::Dying,
            to: GamePhase::GameOver,
            remaining: 0.1,
        });
        s.update(&TickInput::default(), 1.0);
        assert!(!s.game_over_pending());
        assert_eq!(s.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_launch_queues_event() {
        let mut s = playing();
        s.drain_events();
        s.update(&TickInput { launch: true, ..Default::default() }, SIM_DT);
        assert_eq!(s.drain_events().first(), Some(&GameEvent::BallLaunched));
        assert!(!s.state().balls[0].is_docked());
    }

    #[test]
    fn test_acknowledge_returns_to_menu() {
        let mut s = playing();
        s.state_mut().phase = GamePhase::Victory;
        s.acknowledge();
        assert_eq!(s.phase(), GamePhase::Menu);
        s.acknowledge();
        assert_eq!(s.phase(), GamePhase::Menu);
    }

    fn drop_ball_out(s: &mut Session) {
        let ball = &mut s.state_mut().balls[0];
        ball.pos = glam::Vec2::new(400.0, PLAYFIELD_HEIGHT + 50.0);
        ball.vel = glam::Vec2::new(0.0, 5.0);
    }

    #[test]
    fn test_clearing_last_brick_loads_next_level() {
        let mut s = playing();
        s.drain_events();

        // Leave only the bottom-right brick standing and aim straight up at it
        let state = s.state_mut();
        let last = state.bricks.len() - 1;
        for brick in &mut state.bricks[..last] {
            brick.health = 0;
        }
        let target = state.bricks[last].clone();
        let ball = &mut state.balls[0];
        ball.pos = glam::Vec2::new(target.center().x, target.pos.y + target.size.y + 13.0);
        ball.vel = glam::Vec2::new(0.0, -5.0);

        let outcome = s.update(&TickInput::default(), SIM_DT);
        assert_eq!(outcome, TickOutcome::LevelCleared);

        let state = s.state();
        assert_eq!(state.level, 2);
        assert_eq!(state.score, target.value);
        assert_eq!(state.phase, GamePhase::LoadingLevel);
        assert!(state.balls.iter().all(|b| b.is_docked()));
        assert!(state.power_ups.is_empty());
        assert_eq!(state.paddle.speed, DEFAULT_PADDLE_SPEED);
        assert!(s.drain_events().contains(&GameEvent::MusicIntensity(2)));
        assert_eq!(s.take_intro_request(), Some(2));
        assert_eq!(s.intro(), None);
    }

    #[test]
    fn test_losing_ball_costs_a_life() {
        let mut s = playing();
        drop_ball_out(&mut s);
        assert_eq!(s.update(&TickInput::default(), SIM_DT), TickOutcome::LifeLost);
        assert_eq!(s.state().lives, 2);
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.state().balls.len(), 1);
        assert!(s.state().balls[0].is_docked());
        assert!(s.drain_events().contains(&GameEvent::LifeLost));
    }

    #[test]
    fn test_last_life_dies_then_game_over() {
        let mut s = playing();
        s.state_mut().lives = 1;
        s.state_mut().score = 1234;
        s.drain_events();
        drop_ball_out(&mut s);

        assert_eq!(s.update(&TickInput::default(), SIM_DT), TickOutcome::PlayerDied);
        assert_eq!(s.phase(), GamePhase::Dying);
        assert_eq!(s.state().lives, 0);
        assert!(s.game_over_pending());
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::GameOverTriggered));
        assert!(events.contains(&GameEvent::MusicStop));

        s.update(&TickInput::default(), 1.0);
        s.update(&TickInput::default(), 1.0);
        assert_eq!(s.phase(), GamePhase::Dying);
        s.update(&TickInput::default(), 1.0);
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert_eq!(s.state().score, 1234);

        s.acknowledge();
        s.start();
        assert_eq!(s.state().score, 0);
        assert_eq!(s.state().lives, STARTING_LIVES);
    }

    #[test]
    fn test_exit_while_dying_cancels_game_over() {
        let mut s = playing();
        s.state_mut().lives = 1;
        drop_ball_out(&mut s);
        s.update(&TickInput::default(), SIM_DT);
        assert_eq!(s.phase(), GamePhase::Dying);

        s.exit();
        assert_eq!(s.phase(), GamePhase::Menu);
        assert!(!s.game_over_pending());
        for _ in 0..5 {
            s.update(&TickInput::default(), 1.0);
        }
        assert_eq!(s.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_clearing_boss_level_wins() {
        let mut s = playing();
        let state = s.state_mut();
        state.level = BOSS_LEVEL;
        for brick in &mut state.bricks {
            brick.health = 0;
        }
        s.drain_events();

        assert_eq!(s.update(&TickInput::default(), SIM_DT), TickOutcome::LevelCleared);
        assert_eq!(s.phase(), GamePhase::Victory);
        assert_eq!(s.state().level, BOSS_LEVEL);
        assert_eq!(s.drain_events(), vec![GameEvent::MusicStop]);
        assert_eq!(s.take_intro_request(), None);
    }

    #[test]
    fn test_intro_for_previous_level_is_ignored() {
        let mut s = playing();
        for brick in &mut s.state_mut().bricks {
            brick.health = 0;
        }
        s.update(&TickInput::default(), SIM_DT);
        assert_eq!(s.state().level, 2);

        // A slow response for level 1 lands after level 2 started loading
        assert!(!s.provide_intro(1, "old news".into()));
        assert!(!s.confirm());
        assert!(s.provide_intro(2, "Wolf clones!".into()));
        assert!(s.confirm());
    }

    #[test]
    fn test_level_transition_keeps_width_and_balls() {
        let mut s = playing();
        s.update(&TickInput { launch: true, ..Default::default() }, SIM_DT);

        let state = s.state_mut();
        sim::apply_power_up(state, sim::PowerUpKind::Expand);
        sim::apply_power_up(state, sim::PowerUpKind::SpeedUp);
        sim::apply_power_up(state, sim::PowerUpKind::MultiBall);
        assert_eq!(state.active_ball_count(), 3);
        for brick in &mut state.bricks {
            brick.health = 0;
        }

        assert_eq!(s.update(&TickInput::default(), SIM_DT), TickOutcome::LevelCleared);
        let state = s.state();
        assert_eq!(state.level, 2);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.paddle.width, PADDLE_START_WIDTH + EXPAND_AMOUNT);
        assert_eq!(state.paddle.speed, DEFAULT_PADDLE_SPEED);
        assert_eq!(state.balls.len(), 3);
        assert!(state.balls.iter().all(|b| b.active && b.is_docked()));
    }
}
