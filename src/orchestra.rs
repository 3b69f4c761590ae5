use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::generators::INSTRUMENT;

/// Release-style envelope shaping every note: rise to full level, fall to
/// the sustain level, and fade out after the note ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Seconds
    pub attack: f64,
    /// Seconds
    pub decay: f64,
    /// 0.0 -> 1.0
    pub sustain: f64,
    /// Seconds
    pub release: f64,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            attack: 0.05,
            decay: 0.05,
            sustain: 0.7,
            release: 0.4,
        }
    }
}

/// Header values and the single instrument of the orchestra: an enveloped
/// band-limited sawtooth through a resonant low-pass filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestraConfig {
    pub sample_rate: u32,
    /// Samples per control block
    pub block_size: u32,
    pub channels: u32,
    /// Amplitude that maps to 0 dBFS
    pub full_scale: f64,
    pub cutoff_hz: f64,
    /// 0.0 -> 1.0
    pub resonance: f64,
    pub envelope: EnvelopeConfig,
}

impl Default for OrchestraConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            block_size: 32,
            channels: 2,
            full_scale: 1.0,
            cutoff_hz: 2000.0,
            resonance: 0.25,
            envelope: EnvelopeConfig::default(),
        }
    }
}

impl OrchestraConfig {
    /// Reasons the settings cannot produce a usable orchestra.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.sample_rate == 0 {
            problems.push("sample_rate must be positive".to_string());
        }
        if self.block_size == 0 {
            problems.push("block_size must be positive".to_string());
        }
        if self.channels == 0 {
            problems.push("channels must be positive".to_string());
        }
        if self.full_scale <= 0.0 {
            problems.push("full_scale must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.resonance) {
            problems.push("resonance must be within 0..=1".to_string());
        }
        if !(0.0..=1.0).contains(&self.envelope.sustain) {
            problems.push("envelope.sustain must be within 0..=1".to_string());
        }
        problems
    }

    /// Instrument-definition text for the engine's compiler. p4 is the note
    /// amplitude and p5 its octave.semitone pitch.
    pub fn render(&self) -> String {
        let env = &self.envelope;
        let mut orc = String::new();
        let _ = writeln!(orc, "sr={}", self.sample_rate);
        let _ = writeln!(orc, "ksmps={}", self.block_size);
        let _ = writeln!(orc, "nchnls={}", self.channels);
        let _ = writeln!(orc, "0dbfs={}", self.full_scale);
        orc.push('\n');
        let _ = writeln!(orc, "instr {}", INSTRUMENT);
        orc.push_str("ipch = cps2pch(p5, 12)\n");
        let _ = writeln!(
            orc,
            "kenv linsegr 0, {}, 1, {}, {}, {}, 0",
            env.attack, env.decay, env.sustain, env.release
        );
        orc.push_str("aout vco2 p4 * kenv, ipch\n");
        let _ = writeln!(
            orc,
            "aout moogladder aout, {}, {}",
            self.cutoff_hz, self.resonance
        );
        if self.channels == 1 {
            orc.push_str("out aout\n");
        } else {
            orc.push_str("outs aout, aout\n");
        }
        orc.push_str("endin\n");
        orc
    }
}
