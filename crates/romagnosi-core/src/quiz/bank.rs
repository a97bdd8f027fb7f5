use crate::quiz::Category::{self, *};

/// One selectable answer and the points it awards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOption {
    pub text: &'static str,
    pub weights: &'static [(Category, u32)],
}

impl QuizOption {
    pub fn weight(&self, category: Category) -> u32 {
        self.weights
            .iter()
            .filter(|(c, _)| *c == category)
            .map(|(_, w)| *w)
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    pub options: &'static [QuizOption],
}

/// Step labels shown on the planning board, one per question
pub const STEP_LABELS: [&str; 3] = ["Skill Assessment", "Role Selection", "Downtime"];

pub static QUESTIONS: &[Question] = &[
    Question {
        id: 1,
        text: "CHOOSE YOUR SKILLSET",
        options: &[
            QuizOption {
                text: "Money Laundering & Business (Math)",
                weights: &[(Economico, 3), (Elettronica, 2)],
            },
            QuizOption {
                text: "Negotiation & Languages",
                weights: &[(Turismo, 3), (Economico, 1)],
            },
            QuizOption {
                text: "Engineering & Blueprints",
                weights: &[(Costruzioni, 3), (Elettronica, 1)],
            },
            QuizOption {
                text: "Wilderness Survival (Nature)",
                weights: &[(Agraria, 3), (Professionale, 1)],
            },
            QuizOption {
                text: "Hands-on Mechanics",
                weights: &[(Professionale, 3), (Agraria, 1)],
            },
        ],
    },
    Question {
        id: 2,
        text: "PREFERRED ROLE IN THE CREW",
        options: &[
            QuizOption {
                text: "Mastermind / Hacker",
                weights: &[(Economico, 3), (Elettronica, 3)],
            },
            QuizOption {
                text: "The Face / Hotel Owner",
                weights: &[(Turismo, 3), (Economico, 1)],
            },
            QuizOption {
                text: "Architect / Builder",
                weights: &[(Costruzioni, 3)],
            },
            QuizOption {
                text: "Tech Specialist / Electrician",
                weights: &[(Elettronica, 3)],
            },
            QuizOption {
                text: "Medic / Chef",
                weights: &[(Professionale, 3)],
            },
        ],
    },
    Question {
        id: 3,
        text: "DOWNTIME ACTIVITY",
        options: &[
            QuizOption {
                text: "Gaming / Coding",
                weights: &[(Economico, 2), (Elettronica, 2)],
            },
            QuizOption {
                text: "Traveling / Planning Trips",
                weights: &[(Turismo, 3)],
            },
            QuizOption {
                text: "Hiking Mt. Chiliad",
                weights: &[(Agraria, 3)],
            },
            QuizOption {
                text: "Modding Cars",
                weights: &[(Elettronica, 3), (Costruzioni, 2)],
            },
            QuizOption {
                text: "Cooking for the gang",
                weights: &[(Professionale, 3)],
            },
        ],
    },
];
