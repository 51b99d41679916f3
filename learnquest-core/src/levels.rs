use serde::{Deserialize, Serialize};

/// Cumulative XP required to reach each level (index 0 = level 1).
pub const LEVEL_THRESHOLDS: [u32; 25] = [
    0, 50, 120, 200, 300, 420, 560, 720, 900, 1100, 1350, 1650, 2000, 2400, 2850, 3350, 3900,
    4500, 5150, 5850, 6600, 7400, 8250, 9150, 10100,
];

/// Past the tabulated thresholds, each extra block of this much XP is one level.
pub const XP_PER_EXTRA_LEVEL: u32 = 1000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct XpProgress {
    pub current: u32,
    pub needed: u32,
    pub percentage: u32,
}

/// Level is derived from total XP only; callers must never store it as an
/// independent fact.
pub fn level_for_xp(total_xp: u32) -> u32 {
    let last = LEVEL_THRESHOLDS[LEVEL_THRESHOLDS.len() - 1];
    if total_xp >= last {
        return LEVEL_THRESHOLDS.len() as u32 + (total_xp - last) / XP_PER_EXTRA_LEVEL;
    }
    let mut level = 1;
    for (i, threshold) in LEVEL_THRESHOLDS.iter().enumerate() {
        if total_xp >= *threshold {
            level = i as u32 + 1;
        } else {
            break;
        }
    }
    level
}

/// Total XP at which `level` begins.
pub fn xp_threshold_for_level(level: u32) -> u32 {
    let level = level.max(1);
    let n = LEVEL_THRESHOLDS.len() as u32;
    if level <= n {
        LEVEL_THRESHOLDS[(level - 1) as usize]
    } else {
        LEVEL_THRESHOLDS[(n - 1) as usize] + (level - n) * XP_PER_EXTRA_LEVEL
    }
}

/// Total XP required to advance past `level`.
pub fn xp_required_for_next_level(level: u32) -> u32 {
    xp_threshold_for_level(level.max(1) + 1)
}

/// Progress inside the band of the given level.
pub fn xp_progress(total_xp: u32, level: u32) -> XpProgress {
    let band_start = xp_threshold_for_level(level);
    let band_end = xp_required_for_next_level(level);
    let current = total_xp.saturating_sub(band_start);
    let needed = band_end - band_start;
    let percentage = (((current as f64 / needed as f64) * 100.0).round() as u32).min(100);
    XpProgress {
        current,
        needed,
        percentage,
    }
}
