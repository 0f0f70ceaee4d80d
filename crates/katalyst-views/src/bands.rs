//! Score bands and the tone each one renders in.

use katalyst_protocol::HealthStatus;

/// Palette-independent colour intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Green,
    Blue,
    Yellow,
    Orange,
    Red,
    Purple,
    Neutral,
}

/// Release readiness band for a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessBand {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl ReadinessBand {
    pub fn for_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Self::Excellent,
            s if s >= 75.0 => Self::Good,
            s if s >= 60.0 => Self::Fair,
            s if s >= 40.0 => Self::Poor,
            _ => Self::Critical,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Excellent => Tone::Green,
            Self::Good => Tone::Blue,
            Self::Fair => Tone::Yellow,
            Self::Poor => Tone::Orange,
            Self::Critical => Tone::Red,
        }
    }
}

impl std::fmt::Display for ReadinessBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// Health grade: any A variant, B, C, D, otherwise F.
pub fn grade_tone(grade: &str) -> Tone {
    match grade.trim() {
        g if g.contains('A') => Tone::Green,
        "B" => Tone::Blue,
        "C" => Tone::Yellow,
        "D" => Tone::Orange,
        _ => Tone::Red,
    }
}

pub fn status_tone(status: &HealthStatus) -> Tone {
    match status {
        HealthStatus::Green => Tone::Green,
        HealthStatus::Yellow => Tone::Yellow,
        HealthStatus::Red => Tone::Red,
        HealthStatus::Unknown => Tone::Neutral,
    }
}

/// Leaderboard level tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelTier {
    Expert,
    Advanced,
    Rising,
}

impl LevelTier {
    pub fn for_level(level: u32) -> Self {
        match level {
            10.. => Self::Expert,
            5..=9 => Self::Advanced,
            _ => Self::Rising,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Expert => Tone::Purple,
            Self::Advanced => Tone::Blue,
            Self::Rising => Tone::Green,
        }
    }
}

/// 1-based rank: medals for the podium, `#n` after.
pub fn rank_label(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("#{n}"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurnoutLevel {
    High,
    Medium,
    Low,
}

impl BurnoutLevel {
    /// Anything but "high" or "medium" reads as low.
    pub fn parse(level: &str) -> Self {
        match level.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::High => Tone::Red,
            Self::Medium => Tone::Yellow,
            Self::Low => Tone::Green,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::High => "⚠️",
            Self::Medium => "⚡",
            Self::Low => "✅",
        }
    }
}

/// Size class of a commit by lines touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitSize {
    Huge,
    Large,
    Medium,
    Small,
}

impl CommitSize {
    pub fn for_changes(additions: u64, deletions: u64) -> Self {
        match additions.saturating_add(deletions) {
            t if t > 500 => Self::Huge,
            t if t > 200 => Self::Large,
            t if t > 50 => Self::Medium,
            _ => Self::Small,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Huge => Tone::Purple,
            Self::Large => Tone::Blue,
            Self::Medium => Tone::Green,
            Self::Small => Tone::Neutral,
        }
    }
}

/// Contributor-summary commit colouring: under 50 lines, under 200, larger.
pub fn summary_commit_tone(additions: u64, deletions: u64) -> Tone {
    match additions.saturating_add(deletions) {
        t if t < 50 => Tone::Green,
        t if t < 200 => Tone::Yellow,
        _ => Tone::Orange,
    }
}

/// Triage and next-step priority.
pub fn priority_tone(priority: &str) -> Tone {
    match priority {
        "critical" => Tone::Red,
        "high" => Tone::Orange,
        "medium" => Tone::Blue,
        "low" => Tone::Green,
        _ => Tone::Neutral,
    }
}

/// Team recommendation priority: "high", "warning" or "info".
pub fn recommendation_tone(priority: &str) -> Tone {
    match priority {
        "high" => Tone::Red,
        "warning" => Tone::Yellow,
        "info" => Tone::Blue,
        _ => Tone::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_band_edges() {
        assert_eq!(ReadinessBand::for_score(90.0), ReadinessBand::Excellent);
        assert_eq!(ReadinessBand::for_score(89.9), ReadinessBand::Good);
        assert_eq!(ReadinessBand::for_score(75.0), ReadinessBand::Good);
        assert_eq!(ReadinessBand::for_score(60.0), ReadinessBand::Fair);
        assert_eq!(ReadinessBand::for_score(40.0), ReadinessBand::Poor);
        assert_eq!(ReadinessBand::for_score(39.99), ReadinessBand::Critical);
        assert_eq!(ReadinessBand::Critical.to_string(), "critical");
    }

    #[test]
    fn test_grade_tone() {
        assert_eq!(grade_tone("A+"), Tone::Green);
        assert_eq!(grade_tone("A"), Tone::Green);
        assert_eq!(grade_tone("B"), Tone::Blue);
        assert_eq!(grade_tone("D"), Tone::Orange);
        assert_eq!(grade_tone("F"), Tone::Red);
    }

    #[test]
    fn test_level_and_rank() {
        assert_eq!(LevelTier::for_level(10), LevelTier::Expert);
        assert_eq!(LevelTier::for_level(9), LevelTier::Advanced);
        assert_eq!(LevelTier::for_level(5), LevelTier::Advanced);
        assert_eq!(LevelTier::for_level(4), LevelTier::Rising);
        assert_eq!(rank_label(1), "🥇");
        assert_eq!(rank_label(3), "🥉");
        assert_eq!(rank_label(4), "#4");
    }

    #[test]
    fn test_commit_size_thresholds() {
        assert_eq!(CommitSize::for_changes(400, 101), CommitSize::Huge);
        assert_eq!(CommitSize::for_changes(250, 250), CommitSize::Large);
        assert_eq!(CommitSize::for_changes(200, 0), CommitSize::Medium);
        assert_eq!(CommitSize::for_changes(50, 0), CommitSize::Small);
        assert_eq!(summary_commit_tone(49, 0), Tone::Green);
        assert_eq!(summary_commit_tone(150, 49), Tone::Yellow);
        assert_eq!(summary_commit_tone(150, 50), Tone::Orange);
    }

    #[test]
    fn test_commit_size_saturates() {
        assert_eq!(CommitSize::for_changes(u64::MAX, u64::MAX), CommitSize::Huge);
        assert_eq!(summary_commit_tone(u64::MAX, 1), Tone::Orange);
    }

    #[test]
    fn test_burnout_and_priority() {
        assert_eq!(BurnoutLevel::parse("HIGH"), BurnoutLevel::High);
        assert_eq!(BurnoutLevel::parse(""), BurnoutLevel::Low);
        assert_eq!(priority_tone("critical"), Tone::Red);
        assert_eq!(priority_tone("urgent"), Tone::Neutral);
        assert_eq!(status_tone(&HealthStatus::Unknown), Tone::Neutral);
    }
}
