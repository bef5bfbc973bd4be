use serde::{Deserialize, Serialize};

/// Highest readiness score; inputs are clamped to `0..=MAX_SCORE`.
pub const MAX_SCORE: u32 = 100;

/// Readiness tier shown next to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessDiagnosis {
    Fatigued,
    Stable,
    Charged,
    Peak,
}

impl ReadinessDiagnosis {
    pub fn label(&self) -> &'static str {
        match self {
            ReadinessDiagnosis::Peak => "Peak",
            ReadinessDiagnosis::Charged => "Charged",
            ReadinessDiagnosis::Stable => "Stable",
            ReadinessDiagnosis::Fatigued => "Fatigued",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetMood {
    Energetic,
    #[default]
    Normal,
    Tired,
}

impl PetMood {
    /// Parse a server-side mood string.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "energetic" => Some(PetMood::Energetic),
            "normal" => Some(PetMood::Normal),
            "tired" => Some(PetMood::Tired),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HappinessState {
    Happy,
    #[default]
    Content,
    Low,
}

impl HappinessState {
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "happy" => Some(HappinessState::Happy),
            "content" => Some(HappinessState::Content),
            "low" => Some(HappinessState::Low),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            HappinessState::Happy => "Happy",
            HappinessState::Content => "Calm",
            HappinessState::Low => "Down",
        }
    }
}

pub fn diagnosis(score: u32) -> ReadinessDiagnosis {
    match score {
        90.. => ReadinessDiagnosis::Peak,
        75..=89 => ReadinessDiagnosis::Charged,
        60..=74 => ReadinessDiagnosis::Stable,
        _ => ReadinessDiagnosis::Fatigued,
    }
}

pub fn mood(score: u32) -> PetMood {
    if score >= 88 {
        PetMood::Energetic
    } else if score <= 55 {
        PetMood::Tired
    } else {
        PetMood::Normal
    }
}

/// Short explanation of the current state.
pub fn reason(score: u32) -> &'static str {
    if score >= 90 {
        "Excellent sleep quality last night"
    } else if score <= 55 {
        "Recovery is lagging, take it easy today"
    } else if score >= 75 {
        "Heart-rate variability is holding steady"
    } else {
        "Condition is improving steadily"
    }
}

/// Happiness follows the score inside 40..=95, boosted to at least 90 on level-up.
pub fn happiness(score: u32, leveled_up: bool) -> u32 {
    let mut base = score.clamp(40, 95);
    if leveled_up {
        base = base.max(90);
    }
    base.min(100)
}

pub fn happiness_state(happiness: u32) -> HappinessState {
    match happiness {
        0..=54 => HappinessState::Low,
        55..=79 => HappinessState::Content,
        _ => HappinessState::Happy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnosis_tier_edges() {
        assert_eq!(diagnosis(100), ReadinessDiagnosis::Peak);
        assert_eq!(diagnosis(90), ReadinessDiagnosis::Peak);
        assert_eq!(diagnosis(89), ReadinessDiagnosis::Charged);
        assert_eq!(diagnosis(75), ReadinessDiagnosis::Charged);
        assert_eq!(diagnosis(74), ReadinessDiagnosis::Stable);
        assert_eq!(diagnosis(60), ReadinessDiagnosis::Stable);
        assert_eq!(diagnosis(59), ReadinessDiagnosis::Fatigued);
        assert_eq!(diagnosis(0), ReadinessDiagnosis::Fatigued);
    }

    #[test]
    fn mood_edges() {
        assert_eq!(mood(88), PetMood::Energetic);
        assert_eq!(mood(87), PetMood::Normal);
        assert_eq!(mood(56), PetMood::Normal);
        assert_eq!(mood(55), PetMood::Tired);
    }

    #[test]
    fn happiness_clamps_and_boosts() {
        assert_eq!(happiness(10, false), 40);
        assert_eq!(happiness(99, false), 95);
        assert_eq!(happiness(70, true), 90);
        assert_eq!(happiness(95, true), 95);
    }

    #[test]
    fn happiness_state_edges() {
        assert_eq!(happiness_state(54), HappinessState::Low);
        assert_eq!(happiness_state(55), HappinessState::Content);
        assert_eq!(happiness_state(79), HappinessState::Content);
        assert_eq!(happiness_state(80), HappinessState::Happy);
    }

    #[test]
    fn wire_strings_parse() {
        assert_eq!(PetMood::from_wire("tired"), Some(PetMood::Tired));
        assert_eq!(PetMood::from_wire("grumpy"), None);
        assert_eq!(HappinessState::from_wire("low"), Some(HappinessState::Low));
    }

    #[test]
    fn reason_buckets() {
        assert_eq!(reason(95), "Excellent sleep quality last night");
        assert_eq!(reason(50), "Recovery is lagging, take it easy today");
        assert_eq!(reason(80), "Heart-rate variability is holding steady");
        assert_eq!(reason(65), "Condition is improving steadily");
    }
}
