//! Audio notifier
//!
//! The simulation never plays sounds itself. Hosts drain the session's event
//! queue and hand it to an [`AudioSink`]: the Web Audio backend in the browser,
//! or [`LogSink`] natively.

pub mod music;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::{GameEvent, HitKind};

pub use music::{MusicParams, Note, Sequencer, Waveform};
#[cfg(target_arch = "wasm32")]
pub use web::{AudioManager, SoundEffect};

/// Receiver for discrete sound cues and background music control
pub trait AudioSink {
    fn hit(&mut self, kind: HitKind);
    fn power_up_collected(&mut self);
    fn ball_launched(&mut self);
    fn life_lost(&mut self);
    fn game_over_triggered(&mut self);

    fn start_music(&mut self);
    fn stop_music(&mut self);
    /// Match tempo and tone to a level; higher levels are faster and denser
    fn set_intensity(&mut self, level: u32);
}

/// Forward events to a sink, in order
pub fn dispatch<S: AudioSink + ?Sized>(events: &[GameEvent], sink: &mut S) {
    for event in events {
        match *event {
            GameEvent::Hit(kind) => sink.hit(kind),
            GameEvent::PowerUpCollected(_) => sink.power_up_collected(),
            GameEvent::BallLaunched => sink.ball_launched(),
            GameEvent::LifeLost => sink.life_lost(),
            GameEvent::GameOverTriggered => sink.game_over_triggered(),
            GameEvent::MusicStart => sink.start_music(),
            GameEvent::MusicStop => sink.stop_music(),
            GameEvent::MusicIntensity(level) => sink.set_intensity(level),
        }
    }
}

/// Sink that only logs; used by the native host
#[derive(Debug, Default)]
pub struct LogSink {
    music: Option<MusicParams>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current music settings, `None` while stopped
    pub fn music(&self) -> Option<&MusicParams> {
        self.music.as_ref()
    }
}

impl AudioSink for LogSink {
    fn hit(&mut self, kind: HitKind) {
        log::trace!("sfx: {:?} hit", kind);
    }

    fn power_up_collected(&mut self) {
        log::debug!("sfx: power-up");
    }

    fn ball_launched(&mut self) {
        log::debug!("sfx: bark");
    }

    fn life_lost(&mut self) {
        log::debug!("sfx: life lost");
    }

    fn game_over_triggered(&mut self) {
        log::debug!("sfx: game over stinger");
    }

    fn start_music(&mut self) {
        let params = self.music.take().unwrap_or_else(|| MusicParams::for_level(1));
        log::debug!("music: start at {} bpm", params.tempo);
        self.music = Some(params);
    }

    fn stop_music(&mut self) {
        if self.music.take().is_some() {
            log::debug!("music: stop");
        }
    }

    fn set_intensity(&mut self, level: u32) {
        let params = MusicParams::for_level(level);
        log::debug!(
            "music: level {} -> {} bpm, {:?}, sub-bass {}",
            level,
            params.tempo,
            params.waveform,
            params.sub_bass
        );
        if let Some(music) = self.music.as_mut() {
            *music = params;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PowerUpKind;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl AudioSink for Recorder {
        fn hit(&mut self, kind: HitKind) {
            self.0.push(format!("hit:{:?}", kind));
        }
        fn power_up_collected(&mut self) {
            self.0.push("power-up".into());
        }
        fn ball_launched(&mut self) {
            self.0.push("launch".into());
        }
        fn life_lost(&mut self) {
            self.0.push("life-lost".into());
        }
        fn game_over_triggered(&mut self) {
            self.0.push("game-over".into());
        }
        fn start_music(&mut self) {
            self.0.push("start".into());
        }
        fn stop_music(&mut self) {
            self.0.push("stop".into());
        }
        fn set_intensity(&mut self, level: u32) {
            self.0.push(format!("intensity:{}", level));
        }
    }

    #[test]
    fn test_dispatch_preserves_order() {
        let events = [
            GameEvent::MusicStart,
            GameEvent::MusicIntensity(3),
            GameEvent::BallLaunched,
            GameEvent::Hit(HitKind::Wall),
            GameEvent::Hit(HitKind::Brick),
            GameEvent::PowerUpCollected(PowerUpKind::Expand),
            GameEvent::LifeLost,
            GameEvent::GameOverTriggered,
            GameEvent::MusicStop,
        ];
        let mut sink = Recorder::default();
        dispatch(&events, &mut sink);
        assert_eq!(
            sink.0,
            [
                "start",
                "intensity:3",
                "launch",
                "hit:Wall",
                "hit:Brick",
                "power-up",
                "life-lost",
                "game-over",
                "stop"
            ]
        );
    }

    #[test]
    fn test_log_sink_tracks_music() {
        let mut sink = LogSink::new();
        sink.set_intensity(8);
        assert!(sink.music().is_none());

        sink.start_music();
        sink.set_intensity(8);
        assert_eq!(sink.music().map(|m| m.level), Some(8));

        sink.stop_music();
        assert!(sink.music().is_none());
    }
}
