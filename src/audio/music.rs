//! Background music
//!
//! A looping funk bassline whose tempo, key, pattern and timbre follow the
//! level. The sequencer is pure: it hands out the notes that fall inside the
//! look-ahead window and leaves the synthesis to the backend.

/// Seconds of audio scheduled ahead of the playback clock
pub const LOOKAHEAD: f64 = 0.1;

/// Notes per beat (eighth notes)
const STEP_BEATS: f64 = 0.5;

/// Bassline in A, 0.0 is a rest
pub const SPARSE_PATTERN: [f32; 24] = [
    110.0, 0.0, 110.0, 130.81, 146.83, 0.0, 146.83, 130.81, //
    110.0, 0.0, 98.0, 0.0, 87.31, 0.0, 98.0, 103.83, //
    220.0, 0.0, 196.0, 0.0, 110.0, 110.0, 130.81, 146.83,
];

/// Same line with the rests filled, for the late levels
pub const DENSE_PATTERN: [f32; 24] = [
    110.0, 110.0, 110.0, 130.81, 146.83, 146.83, 146.83, 130.81, //
    110.0, 110.0, 98.0, 98.0, 87.31, 87.31, 98.0, 103.83, //
    220.0, 220.0, 196.0, 196.0, 110.0, 110.0, 130.81, 146.83,
];

/// Oscillator shape for the bass voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Sawtooth,
}

/// Music settings derived from the level number
#[derive(Debug, Clone, PartialEq)]
pub struct MusicParams {
    pub level: u32,
    /// Beats per minute
    pub tempo: f32,
    /// Key shift above A
    pub semitones: u32,
    pub dense: bool,
    pub waveform: Waveform,
    /// Low-pass resonance
    pub filter_q: f32,
    /// Filter sweep start/end (Hz)
    pub filter_base: f32,
    pub filter_peak: f32,
    /// Sine layer an octave below
    pub sub_bass: bool,
}

impl MusicParams {
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        let semitones = match level {
            1..=3 => 0,
            4..=6 => 3,
            7..=9 => 7,
            _ => 9,
        };
        let l = level as f32;

        Self {
            level,
            tempo: 110.0 + (l - 1.0) * 7.0,
            semitones,
            dense: level >= 7,
            waveform: if level < 4 {
                Waveform::Square
            } else {
                Waveform::Sawtooth
            },
            filter_q: (1.0 + l * 0.8).min(15.0),
            filter_base: 200.0 + l * 30.0,
            filter_peak: 2000.0 + l * 200.0,
            sub_bass: level >= 7,
        }
    }

    pub fn pitch_multiplier(&self) -> f32 {
        2f32.powf(self.semitones as f32 / 12.0)
    }

    /// Frequency of step `index` in the loop (0.0 for a rest)
    pub fn note(&self, index: usize) -> f32 {
        let pattern = if self.dense {
            &DENSE_PATTERN
        } else {
            &SPARSE_PATTERN
        };
        pattern[index % pattern.len()] * self.pitch_multiplier()
    }

    /// Seconds per step
    pub fn step_duration(&self) -> f64 {
        STEP_BEATS * 60.0 / self.tempo as f64
    }
}

/// A note to schedule at an absolute time on the audio clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub time: f64,
    pub frequency: f32,
}

/// Look-ahead step sequencer
#[derive(Debug, Clone)]
pub struct Sequencer {
    params: MusicParams,
    playing: bool,
    next_time: f64,
    index: usize,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    pub fn new() -> Self {
        Self {
            params: MusicParams::for_level(1),
            playing: false,
            next_time: 0.0,
            index: 0,
        }
    }

    pub fn params(&self) -> &MusicParams {
        &self.params
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start from the top of the loop. No-op if already playing.
    pub fn start(&mut self, now: f64) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.index = 0;
        self.next_time = now + LOOKAHEAD;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Takes effect from the next scheduled step
    pub fn set_level(&mut self, level: u32) {
        self.params = MusicParams::for_level(level);
    }

    /// Notes starting before `now + LOOKAHEAD` that haven't been handed out yet
    pub fn due_notes(&mut self, now: f64) -> Vec<Note> {
        let mut notes = Vec::new();
        if !self.playing {
            return notes;
        }

        // After a stall (hidden tab), resume from now instead of bursting
        if self.next_time < now {
            self.next_time = now;
        }

        while self.next_time < now + LOOKAHEAD {
            let frequency = self.params.note(self.index);
            if frequency > 0.0 {
                notes.push(Note {
                    time: self.next_time,
                    frequency,
                });
            }
            self.next_time += self.params.step_duration();
            self.index = (self.index + 1) % SPARSE_PATTERN.len();
        }
        notes
    }
}
