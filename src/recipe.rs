// The fixed walkthrough: six steps in cooking order. Each one carries the text
// the screen shows, the sound the engine layers over the drone, and how long
// the step lasts when auto-playing.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundLabel {
    Ambient,
    Sprinkle,
    Sizzle,
    Crisp,
    Butter,
    Complete,
}

impl SoundLabel {
    pub fn name(self) -> &'static str {
        match self {
            SoundLabel::Ambient => "ambient",
            SoundLabel::Sprinkle => "sprinkle",
            SoundLabel::Sizzle => "sizzle",
            SoundLabel::Crisp => "crisp",
            SoundLabel::Butter => "butter",
            SoundLabel::Complete => "complete",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub sound: SoundLabel,
    pub duration_ms: u64,
}

impl Step {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

pub const STEPS: [Step; 6] = [
    Step {
        title: "Select Fresh Fish",
        description: "Choose premium salmon or sea bass, firm flesh, clear eyes",
        icon: "🐟",
        sound: SoundLabel::Ambient,
        duration_ms: 8000,
    },
    Step {
        title: "Season & Marinate",
        description: "Brush with olive oil, sprinkle sea salt, cracked pepper, fresh herbs",
        icon: "🧂",
        sound: SoundLabel::Sprinkle,
        duration_ms: 10000,
    },
    Step {
        title: "Prepare the Pan",
        description: "Heat cast iron skillet, medium-high flame, watch for shimmer",
        icon: "🔥",
        sound: SoundLabel::Sizzle,
        duration_ms: 7000,
    },
    Step {
        title: "Sear the Fish",
        description: "Lay fish skin-side down, crispy golden perfection, 4 minutes",
        icon: "🍳",
        sound: SoundLabel::Crisp,
        duration_ms: 12000,
    },
    Step {
        title: "Flip & Finish",
        description: "Gentle turn, baste with butter, lemon zest, aromatic thyme",
        icon: "🧈",
        sound: SoundLabel::Butter,
        duration_ms: 10000,
    },
    Step {
        title: "Plate & Serve",
        description: "Rest on warm plate, drizzle reduction, garnish with microgreens",
        icon: "✨",
        sound: SoundLabel::Complete,
        duration_ms: 8000,
    },
];

pub const NUM_STEPS: usize = STEPS.len();
pub const LAST_STEP: usize = NUM_STEPS - 1;

/// Total running time of the walkthrough at its written pace.
pub fn total_duration() -> Duration {
    STEPS.iter().map(Step::duration).sum()
}
