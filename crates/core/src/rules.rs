//! Rules module - gravity curve, scoring, level policy and grading
//!
//! All values follow the arcade: gravity is expressed in 1/256 cells per frame, score depends
//! on level, lines, manual-drop frames, combo and bravo, and the level counter advances by one
//! per spawned piece except at section stops, where only line clears move it on.

use crate::types::FRAME_RATE;

/// Gravity step function: (level threshold, 1/256 cells per frame)
pub const GRAVITY_TABLE: [(u32, u32); 30] = [
    (0, 4),
    (30, 6),
    (35, 8),
    (40, 10),
    (50, 12),
    (60, 16),
    (70, 32),
    (80, 48),
    (90, 64),
    (100, 80),
    (120, 96),
    (140, 112),
    (160, 128),
    (170, 144),
    (200, 4),
    (220, 32),
    (230, 64),
    (233, 96),
    (236, 128),
    (239, 160),
    (243, 192),
    (247, 224),
    (251, 256), // 1G
    (300, 512),
    (330, 768),
    (360, 1024),
    (400, 1280),
    (420, 1024),
    (450, 768),
    (500, 5120), // 20G
];

/// Denominator of gravity values (one full cell)
pub const GRAVITY_UNIT: u32 = 256;

/// Score thresholds for each grade, lowest first
pub const GRADE_TABLE: [(&str, u64); 18] = [
    ("9", 0),
    ("8", 400),
    ("7", 800),
    ("6", 1400),
    ("5", 2000),
    ("4", 3500),
    ("3", 5500),
    ("2", 8000),
    ("1", 12000),
    ("S1", 16000),
    ("S2", 22000),
    ("S3", 30000),
    ("S4", 40000),
    ("S5", 52000),
    ("S6", 66000),
    ("S7", 82000),
    ("S8", 100000),
    ("S9", 120000),
];

/// Level at which the gameplay music switches to the hard track
pub const HARD_TRACK_LEVEL: u32 = 500;

/// Format a frame count as `mm:ss:cc` at [`FRAME_RATE`].
pub fn format_run_time(frames: u64) -> String {
    let centis = frames * 100 / FRAME_RATE as u64;
    format!(
        "{:02}:{:02}:{:02}",
        centis / 6000,
        (centis / 100) % 60,
        centis % 100
    )
}

/// Gravity in effect at `level`: the entry with the highest threshold not above it.
pub fn gravity_for_level(level: u32) -> u32 {
    GRAVITY_TABLE
        .iter()
        .take_while(|&&(threshold, _)| threshold <= level)
        .last()
        .map(|&(_, gravity)| gravity)
        .unwrap_or(GRAVITY_TABLE[0].1)
}

/// Integer division rounding up
pub fn ceil_div(a: u32, b: u32) -> u32 {
    if b == 0 {
        return 0;
    }
    a.div_ceil(b)
}

/// Combo after a clearing action. Any lock without a clear resets it to 1.
pub fn next_combo(combo: u32, cleared: u32) -> u32 {
    if cleared == 0 {
        1
    } else {
        combo + 2 * cleared - 2
    }
}

/// Bravo multiplier: 4 when the clear emptied the grid
pub fn bravo_for(grid_empty: bool) -> u32 {
    if grid_empty {
        4
    } else {
        1
    }
}

/// Points for a clear.
///
/// `combo` and `bravo` are the values already updated for this clear.
pub fn clear_score(level: u32, cleared: u32, soft_frames: u32, combo: u32, bravo: u32) -> u64 {
    if cleared == 0 {
        return 0;
    }
    let base = (ceil_div(level + cleared, 4) + soft_frames) as u64;
    base * cleared as u64 * (2 * cleared as u64 - 1) * combo as u64 * bravo as u64
}

/// Whether a spawn at `level` must not advance it (section stops at x99 and 998).
pub fn level_requires_clear(level: u32) -> bool {
    (level + 1) % 100 == 0 || level == 998
}

/// Grade earned by a score
pub fn grade_for(score: u64) -> &'static str {
    GRADE_TABLE
        .iter()
        .take_while(|&&(_, threshold)| threshold <= score)
        .last()
        .map(|&(grade, _)| grade)
        .unwrap_or(GRADE_TABLE[0].0)
}
