use std::fmt;

use serde::{Deserialize, Serialize};

/// School tracks the orientation quiz can recommend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Economico,
    Turismo,
    Costruzioni,
    Agraria,
    Elettronica,
    Professionale,
}

impl Category {
    pub const COUNT: usize = 6;

    /// Fixed iteration order. Ties are broken in favour of the earlier entry.
    pub const ALL: [Category; Category::COUNT] = [
        Category::Economico,
        Category::Turismo,
        Category::Costruzioni,
        Category::Agraria,
        Category::Elettronica,
        Category::Professionale,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Economico => "ECONOMICO",
            Category::Turismo => "TURISMO",
            Category::Costruzioni => "COSTRUZIONI",
            Category::Agraria => "AGRARIA",
            Category::Elettronica => "ELETTRONICA",
            Category::Professionale => "PROFESSIONALE",
        }
    }

    /// Recommended path shown to the student
    pub fn label(self) -> &'static str {
        match self {
            Category::Economico => "AFM (The Lester Crest Path)",
            Category::Turismo => "Turismo (Michael's Lifestyle)",
            Category::Costruzioni => "Costruzioni (Franklin's Architect)",
            Category::Agraria => "Agraria (Trevor's Wilderness)",
            Category::Elettronica => "Elettronica (The Hacker)",
            Category::Professionale => "Professionale (The Specialist)",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accumulated score for every category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreState {
    scores: [u32; Category::COUNT],
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> u32 {
        self.scores[category.index()]
    }

    pub fn add(&mut self, category: Category, weight: u32) {
        let slot = &mut self.scores[category.index()];
        *slot = slot.saturating_add(weight);
    }

    pub fn total(&self) -> u32 {
        self.scores.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::ALL.iter().map(|&c| (c, self.get(c)))
    }
}
