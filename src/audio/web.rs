//! Audio backend using the Web Audio API
//!
//! Procedurally generated sound effects and bassline, no sample files.

use web_sys::{
    AudioContext, AudioContextState, BiquadFilterNode, BiquadFilterType, GainNode, OscillatorNode,
    OscillatorType,
};

use super::AudioSink;
use super::music::{Note, Sequencer, Waveform};
use crate::settings::Settings;
use crate::sim::HitKind;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits a brick
    BrickHit,
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits wall
    WallHit,
    /// Power-up collected
    PowerUp,
    /// Ball launched
    Bark,
    /// Last ball fell out
    LoseLife,
    /// Out of lives
    GameOver,
}

impl From<HitKind> for SoundEffect {
    fn from(kind: HitKind) -> Self {
        match kind {
            HitKind::Wall => SoundEffect::WallHit,
            HitKind::Paddle => SoundEffect::PaddleHit,
            HitKind::Brick => SoundEffect::BrickHit,
        }
    }
}

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_gain: f32,
    music_gain: f32,
    /// Muted by focus loss, independent of the user's mute setting
    suspended: bool,
    sequencer: Sequencer,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let mut manager = Self {
            ctx,
            sfx_gain: 0.0,
            music_gain: 0.0,
            suspended: false,
            sequencer: Sequencer::new(),
        };
        manager.apply_settings(settings);
        manager
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_gain = settings.sfx_gain();
        self.music_gain = settings.music_gain();
    }

    /// Silence output while the page is hidden or unfocused
    pub fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    /// Schedule any bass notes inside the look-ahead window. Call once per frame.
    pub fn pump(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        let notes = self.sequencer.due_notes(ctx.current_time());
        let vol = if self.suspended { 0.0 } else { self.music_gain };
        if vol <= 0.0 {
            return;
        }
        for note in notes {
            self.schedule_note(ctx, note, vol);
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = if self.suspended { 0.0 } else { self.sfx_gain };
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::BrickHit => self.play_brick_hit(ctx, vol),
            SoundEffect::PaddleHit => self.play_paddle_hit(ctx, vol),
            SoundEffect::WallHit => self.play_wall_hit(ctx, vol),
            SoundEffect::PowerUp => self.play_power_up(ctx, vol),
            SoundEffect::Bark => self.play_bark(ctx, vol),
            SoundEffect::LoseLife => self.play_lose_life(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Oscillator routed through a low-pass filter into a gain envelope
    fn create_filtered_osc(
        &self,
        ctx: &AudioContext,
    ) -> Option<(OscillatorNode, BiquadFilterNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let filter = ctx.create_biquad_filter().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.connect_with_audio_node(&filter).ok()?;
        filter.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, filter, gain))
    }

    /// One bass step: oscillator through a swept low-pass, plus the sub layer
    fn schedule_note(&self, ctx: &AudioContext, note: Note, vol: f32) {
        let params = self.sequencer.params();
        let t = note.time;

        if let Some((osc, filter, gain)) = self.create_filtered_osc(ctx) {
            osc.set_type(oscillator_type(params.waveform));
            osc.frequency().set_value(note.frequency);

            // Slap envelope
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();

            // Wah
            filter.set_type(BiquadFilterType::Lowpass);
            filter.q().set_value(params.filter_q);
            filter.frequency().set_value_at_time(params.filter_base, t).ok();
            filter
                .frequency()
                .exponential_ramp_to_value_at_time(params.filter_peak, t + 0.05)
                .ok();
            filter
                .frequency()
                .exponential_ramp_to_value_at_time(params.filter_base, t + 0.15)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        if params.sub_bass {
            if let Some((osc, gain)) =
                self.create_osc(ctx, note.frequency / 2.0, OscillatorType::Sine)
            {
                gain.gain().set_value_at_time(vol * 0.12, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Brick hit - funky pop
    fn play_brick_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(800.0, t + 0.1)
            .ok();
        gain.gain().set_value_at_time(vol * 0.1, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Paddle hit - spring
    fn play_paddle_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency().linear_ramp_to_value_at_time(300.0, t + 0.1).ok();
        osc.frequency().linear_ramp_to_value_at_time(150.0, t + 0.2).ok();
        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.2).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Wall hit - clave
    fn play_wall_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.05, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.05).ok();
    }

    /// Power-up - A major arpeggio
    fn play_power_up(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [440.0, 554.37, 659.25, 880.0].iter().enumerate() {
            let delay = i as f64 * 0.05;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.05, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + 0.1)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.1).ok();
            }
        }
    }

    /// Launch - a bark: falling sawtooth with a gritty top layer
    fn play_bark(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 350.0, OscillatorType::Sawtooth) {
            osc.frequency().set_value_at_time(350.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(150.0, t + 0.15)
                .ok();
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        // Grit
        if let Some((osc, gain)) = self.create_osc(ctx, 2200.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.12, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(2200.0, t).ok();
            osc.frequency().set_value_at_time(900.0, t + 0.02).ok();
            osc.frequency().set_value_at_time(3100.0, t + 0.04).ok();
            osc.frequency().set_value_at_time(700.0, t + 0.06).ok();
            osc.frequency().set_value_at_time(2600.0, t + 0.08).ok();
            osc.frequency().set_value_at_time(500.0, t + 0.1).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }

    /// Life lost - sliding groan
    fn play_lose_life(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency().linear_ramp_to_value_at_time(50.0, t + 0.5).ok();
        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.5).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.5).ok();
    }

    /// Game over - descending G, F#, F, E then a low boom
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [392.0, 369.99, 349.23, 329.63].iter().enumerate() {
            let delay = i as f64 * 0.4;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.4).ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Square) {
            let t = ctx.current_time() + 1.6;
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.9)
                .ok();
            gain.gain().set_value_at_time(0.0, ctx.current_time()).ok();
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.9)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.9).ok();
        }
    }
}

impl AudioSink for AudioManager {
    fn hit(&mut self, kind: HitKind) {
        self.play(kind.into());
    }

    fn power_up_collected(&mut self) {
        self.play(SoundEffect::PowerUp);
    }

    fn ball_launched(&mut self) {
        self.play(SoundEffect::Bark);
    }

    fn life_lost(&mut self) {
        self.play(SoundEffect::LoseLife);
    }

    fn game_over_triggered(&mut self) {
        self.sequencer.stop();
        self.play(SoundEffect::GameOver);
    }

    fn start_music(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        self.sequencer.start(ctx.current_time());
    }

    fn stop_music(&mut self) {
        self.sequencer.stop();
    }

    fn set_intensity(&mut self, level: u32) {
        self.sequencer.set_level(level);
    }
}
