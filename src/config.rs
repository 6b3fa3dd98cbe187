//! Codec configuration.
//!
//! All knobs carry compiled defaults; an optional INI file can override
//! them for field tuning (receiver modules differ in how much glitch
//! they pass through). Unknown or malformed keys fall back to their
//! defaults rather than failing the caller.

use anyhow::{Context, Result};
use configparser::ini::Ini;
use std::path::{Path, PathBuf};

/// Tunable parameters of the decode pipeline.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Durations below this are glitch noise to be merged away (µs).
    pub noise_floor_us: u32,
    /// A mark or space at or above this is inter-frame idle (µs).
    pub max_idle_gap_us: u32,
    /// Window in which an NEC repeat frame resolves to the previous code (ms).
    pub repeat_window_ms: u64,
    /// Window in which learning-mode frames are compared (ms).
    pub verify_window_ms: u64,
    /// Matching frames required before a learned code is accepted (2 or 3).
    pub min_verify_frames: u8,
    /// Smallest capture worth keeping as a Raw code (symbols).
    pub raw_min_symbols: usize,
    /// Largest capture worth keeping as a Raw code (symbols).
    pub raw_max_symbols: usize,
    /// Duration tolerance for Raw frame comparison during learning (%).
    pub raw_match_tolerance_pct: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            noise_floor_us: 100,
            max_idle_gap_us: 50_000,
            repeat_window_ms: 200,
            verify_window_ms: 500,
            min_verify_frames: 3,
            raw_min_symbols: 10,
            raw_max_symbols: 256,
            raw_match_tolerance_pct: 10,
        }
    }
}

impl CodecConfig {
    /// Load configuration from an INI file, falling back to defaults for
    /// missing keys.
    ///
    /// ```ini
    /// [pipeline]
    /// noise_floor_us = 100
    /// max_idle_gap_us = 50000
    /// raw_min_symbols = 10
    /// raw_max_symbols = 256
    ///
    /// [learning]
    /// repeat_window_ms = 200
    /// verify_window_ms = 500
    /// min_verify_frames = 3
    /// raw_match_tolerance_pct = 10
    /// ```
    pub fn load_from_ini(path: &Path) -> Result<Self> {
        let mut ini = Ini::new();
        ini.load(path)
            .map_err(|e| anyhow::anyhow!("Failed to load codec config: {}", e))
            .with_context(|| format!("reading {:?}", path))?;

        let defaults = CodecConfig::default();

        let get_u32 = |section: &str, key: &str, default: u32| {
            ini.getuint(section, key).ok().flatten().map(|v| v as u32).unwrap_or(default)
        };
        let get_usize = |section: &str, key: &str, default: usize| {
            ini.getuint(section, key).ok().flatten().map(|v| v as usize).unwrap_or(default)
        };

        let min_verify_frames = ini
            .getuint("learning", "min_verify_frames")
            .ok()
            .flatten()
            .map(|v| (v as u8).clamp(2, 3))
            .unwrap_or(defaults.min_verify_frames);

        Ok(Self {
            noise_floor_us: get_u32("pipeline", "noise_floor_us", defaults.noise_floor_us),
            max_idle_gap_us: get_u32("pipeline", "max_idle_gap_us", defaults.max_idle_gap_us),
            repeat_window_ms: ini
                .getuint("learning", "repeat_window_ms")
                .ok()
                .flatten()
                .unwrap_or(defaults.repeat_window_ms),
            verify_window_ms: ini
                .getuint("learning", "verify_window_ms")
                .ok()
                .flatten()
                .unwrap_or(defaults.verify_window_ms),
            min_verify_frames,
            raw_min_symbols: get_usize("pipeline", "raw_min_symbols", defaults.raw_min_symbols),
            raw_max_symbols: get_usize("pipeline", "raw_max_symbols", defaults.raw_max_symbols),
            raw_match_tolerance_pct: get_u32(
                "learning",
                "raw_match_tolerance_pct",
                defaults.raw_match_tolerance_pct,
            ),
        })
    }

    /// Conventional config location: `~/.config/ircodec/codec.ini`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("ircodec").join("codec.ini"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_values() {
        let config = CodecConfig::default();
        assert_eq!(config.noise_floor_us, 100);
        assert_eq!(config.max_idle_gap_us, 50_000);
        assert_eq!(config.repeat_window_ms, 200);
        assert_eq!(config.verify_window_ms, 500);
        assert_eq!(config.min_verify_frames, 3);
    }

    #[test]
    fn ini_overrides_and_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codec.ini");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[pipeline]").unwrap();
        writeln!(file, "noise_floor_us = 150").unwrap();
        writeln!(file, "[learning]").unwrap();
        writeln!(file, "min_verify_frames = 2").unwrap();
        drop(file);

        let config = CodecConfig::load_from_ini(&path).unwrap();
        assert_eq!(config.noise_floor_us, 150);
        assert_eq!(config.min_verify_frames, 2);
        // untouched keys keep their defaults
        assert_eq!(config.max_idle_gap_us, 50_000);
        assert_eq!(config.verify_window_ms, 500);
    }

    #[test]
    fn verify_frames_clamped_to_supported_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codec.ini");
        std::fs::write(&path, "[learning]\nmin_verify_frames = 9\n").unwrap();
        let config = CodecConfig::load_from_ini(&path).unwrap();
        assert_eq!(config.min_verify_frames, 3);
    }
}
