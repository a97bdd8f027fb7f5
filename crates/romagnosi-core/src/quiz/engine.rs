use serde::Serialize;
use tracing::debug;

use crate::quiz::{Category, QUESTIONS, QuizOption, Question, ScoreState};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("Option {index} does not exist for question {step} ({available} options)")]
    InvalidOption {
        step: usize,
        index: usize,
        available: usize,
    },

    #[error("The quiz is already resolved")]
    AlreadyResolved,

    #[error("The question bank is empty")]
    EmptyBank,
}

/// Add the option's weights to `state`. Categories the option does not
/// mention keep their score.
pub fn apply_answer(mut state: ScoreState, option: &QuizOption) -> ScoreState {
    for &(category, weight) in option.weights {
        state.add(category, weight);
    }
    state
}

/// True once the answer for the last question has been applied
pub fn is_complete(answered_step: usize, total_questions: usize) -> bool {
    total_questions > 0 && answered_step + 1 >= total_questions
}

/// Strictly-greatest scan over `category_order`. An equal score never
/// replaces an earlier category, so all-zero resolves to the first entry.
pub fn resolve_result(state: &ScoreState, category_order: &[Category]) -> Category {
    let Some((&first, rest)) = category_order.split_first() else {
        return Category::ALL[0];
    };

    let mut winner = first;
    let mut best = state.get(first);
    for &category in rest {
        let score = state.get(category);
        if score > best {
            best = score;
            winner = category;
        }
    }
    winner
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub category: Category,
    pub scores: ScoreState,
}

impl QuizResult {
    pub fn label(&self) -> &'static str {
        self.category.label()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    AwaitingAnswer { step: usize },
    Resolved(QuizResult),
}

/// One student's pass through a question bank.
#[derive(Debug, Clone)]
pub struct QuizSession<'a> {
    bank: &'a [Question],
    scores: ScoreState,
    phase: QuizPhase,
}

impl QuizSession<'static> {
    /// Session over the built-in question bank
    pub fn standard() -> Self {
        Self {
            bank: QUESTIONS,
            scores: ScoreState::new(),
            phase: QuizPhase::AwaitingAnswer { step: 0 },
        }
    }
}

impl<'a> QuizSession<'a> {
    pub fn new(bank: &'a [Question]) -> Result<Self, QuizError> {
        if bank.is_empty() {
            return Err(QuizError::EmptyBank);
        }

        Ok(Self {
            bank,
            scores: ScoreState::new(),
            phase: QuizPhase::AwaitingAnswer { step: 0 },
        })
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn scores(&self) -> &ScoreState {
        &self.scores
    }

    pub fn total_questions(&self) -> usize {
        self.bank.len()
    }

    pub fn step(&self) -> Option<usize> {
        match self.phase {
            QuizPhase::AwaitingAnswer { step } => Some(step),
            QuizPhase::Resolved(_) => None,
        }
    }

    pub fn current_question(&self) -> Option<&'a Question> {
        self.step().map(|step| &self.bank[step])
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.phase, QuizPhase::Resolved(_))
    }

    pub fn result(&self) -> Option<&QuizResult> {
        match &self.phase {
            QuizPhase::Resolved(result) => Some(result),
            QuizPhase::AwaitingAnswer { .. } => None,
        }
    }

    /// Answer the current question with the option at `option_index`.
    ///
    /// An out-of-range index leaves the session untouched.
    pub fn answer(&mut self, option_index: usize) -> Result<QuizPhase, QuizError> {
        let QuizPhase::AwaitingAnswer { step } = self.phase else {
            return Err(QuizError::AlreadyResolved);
        };

        let question = &self.bank[step];
        let option = question
            .options
            .get(option_index)
            .ok_or(QuizError::InvalidOption {
                step,
                index: option_index,
                available: question.options.len(),
            })?;

        self.scores = apply_answer(self.scores, option);
        debug!(step, option = option.text, "quiz answer applied");

        self.phase = if is_complete(step, self.bank.len()) {
            let category = resolve_result(&self.scores, &Category::ALL);
            QuizPhase::Resolved(QuizResult {
                category,
                scores: self.scores,
            })
        } else {
            QuizPhase::AwaitingAnswer { step: step + 1 }
        };

        Ok(self.phase)
    }
}
