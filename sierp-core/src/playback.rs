//! Animation clock driving the morph timeline
use std::time::Duration;

use crate::generator::{ConfigError, GeneratorConfig, DEFAULT_MAX_TIME};

pub const DEFAULT_MAX_SPEED: f64 = 2.0;

/// Limits and starting point of a playback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackConfig {
    pub max_time: f64,
    pub max_speed: f64,
    pub time: f64,
    pub speed: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_time: DEFAULT_MAX_TIME,
            max_speed: DEFAULT_MAX_SPEED,
            time: 1.5,
            speed: 0.5,
        }
    }
}

/// Timeline position advanced by wall-clock time while playing
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    config: PlaybackConfig,
    time: f64,
    speed: f64,
    playing: bool,
    looping: bool,
}

impl Playback {
    /// Start a clock for `config`.
    ///
    /// `max_time` must describe a valid generator timeline and `max_speed`
    /// must be finite and non-negative. The starting time and speed are
    /// clamped into range.
    pub fn new(config: PlaybackConfig) -> Result<Self, ConfigError> {
        GeneratorConfig::new(config.max_time)?;
        if !(config.max_speed.is_finite() && config.max_speed >= 0.0) {
            return Err(ConfigError::InvalidSpeed(config.max_speed));
        }
        Ok(Self::from_config(config))
    }

    fn from_config(config: PlaybackConfig) -> Self {
        let mut playback = Self {
            config,
            time: 0.0,
            speed: 0.0,
            playing: false,
            looping: false,
        };
        playback.set_time(config.time);
        playback.set_speed(config.speed);
        playback
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Fraction of the timeline already played, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        self.time / self.config.max_time
    }

    /// Jump to `time`. Non-finite input rewinds to the start.
    pub fn set_time(&mut self, time: f64) {
        self.time = clamp_or_zero(time, self.config.max_time);
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = clamp_or_zero(speed, self.config.max_speed);
    }

    /// Start or stop. Starting at the very end rewinds first.
    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
        if self.playing && self.time == self.config.max_time {
            self.time = 0.0;
        }
    }

    pub fn toggle_loop(&mut self) {
        self.looping = !self.looping;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Move the clock forward by `elapsed` of wall time.
    ///
    /// Past the end the clock wraps around when looping, otherwise it stops
    /// at the end and pauses. Returns whether the time changed.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if !self.playing {
            return false;
        }

        let max_time = self.config.max_time;
        let mut time = self.time + self.speed * elapsed.as_secs_f64();
        if time > max_time {
            if self.looping {
                // A whole number of laps ends on `max_time`, not 0
                time %= max_time;
                if time == 0.0 {
                    time = max_time;
                }
            } else {
                time = max_time;
                self.pause();
            }
        }

        let changed = time != self.time;
        self.time = time;
        changed
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::from_config(PlaybackConfig::default())
    }
}

fn clamp_or_zero(value: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let playback = Playback::default();
        assert_eq!(playback.time(), 1.5);
        assert_eq!(playback.speed(), 0.5);
        assert!(!playback.is_playing());
        assert!(!playback.is_looping());
    }

    #[test]
    fn test_setters_clamp() {
        let mut playback = Playback::default();
        playback.set_time(12.0);
        assert_eq!(playback.time(), 8.0);
        assert_eq!(playback.progress(), 1.0);
        playback.set_time(f64::NAN);
        assert_eq!(playback.time(), 0.0);
        playback.set_speed(-3.0);
        assert_eq!(playback.speed(), 0.0);
        playback.set_speed(5.0);
        assert_eq!(playback.speed(), 2.0);
    }

    #[test]
    fn test_paused_clock_does_not_move() {
        let mut playback = Playback::default();
        assert!(!playback.advance(Duration::from_secs(1)));
        assert_eq!(playback.time(), 1.5);
    }

    #[test]
    fn test_advance() {
        let mut playback = Playback::default();
        playback.toggle_play();
        assert!(playback.advance(Duration::from_millis(500)));
        assert_relative_eq!(playback.time(), 1.75);
    }

    #[test]
    fn test_stops_at_end() {
        let mut playback = Playback::default();
        playback.set_time(7.9);
        playback.set_speed(2.0);
        playback.toggle_play();
        playback.advance(Duration::from_secs(1));
        assert_eq!(playback.time(), 8.0);
        assert!(!playback.is_playing());

        // Playing again from the end starts over.
        playback.toggle_play();
        assert_eq!(playback.time(), 0.0);
    }

    #[test]
    fn test_loops_around() {
        let mut playback = Playback::default();
        playback.set_time(7.5);
        playback.set_speed(1.0);
        playback.toggle_loop();
        playback.toggle_play();
        playback.advance(Duration::from_secs(1));
        assert_relative_eq!(playback.time(), 0.5);
        assert!(playback.is_playing());
    }

    #[test]
    fn test_lap_boundary_ends_on_max_time() {
        let mut playback = Playback::default();
        playback.set_time(7.0);
        playback.set_speed(1.0);
        playback.toggle_loop();
        playback.toggle_play();
        playback.advance(Duration::from_secs(1));
        assert_eq!(playback.time(), 8.0);
        playback.advance(Duration::from_secs(8));
        assert_eq!(playback.time(), 8.0);
        assert!(playback.is_playing());
    }

    #[test]
    fn test_new_rejects_bad_limits() {
        let config = PlaybackConfig::default();
        assert!(matches!(
            Playback::new(PlaybackConfig {
                max_time: f64::NAN,
                ..config
            }),
            Err(ConfigError::NonFinite(_))
        ));
        assert_eq!(
            Playback::new(PlaybackConfig {
                max_time: -1.0,
                ..config
            }),
            Err(ConfigError::TooShort(-1.0))
        );
        assert_eq!(
            Playback::new(PlaybackConfig {
                max_speed: -0.5,
                ..config
            }),
            Err(ConfigError::InvalidSpeed(-0.5))
        );
        assert!(matches!(
            Playback::new(PlaybackConfig {
                max_speed: f64::INFINITY,
                ..config
            }),
            Err(ConfigError::InvalidSpeed(_))
        ));
    }

    #[test]
    fn test_new_clamps_start() {
        let playback = Playback::new(PlaybackConfig {
            max_time: 3.0,
            time: 5.0,
            speed: f64::NAN,
            ..PlaybackConfig::default()
        })
        .unwrap();
        assert_eq!(playback.time(), 3.0);
        assert_eq!(playback.speed(), 0.0);
    }
}
