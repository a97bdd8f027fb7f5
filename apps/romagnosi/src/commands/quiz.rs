use anyhow::{Result, bail};
use clap::Args;
use console::style;
use romagnosi_core::{
    ChatConfig, QuizError, QuizPhase, QuizResult, QuizSession, SchoolChat, format_quiz_result,
    quiz::{Question, STEP_LABELS},
    quiz_followup_message,
};

use crate::{
    ApiArgs, commands::chat, connect,
    ui::{Prompt, rule},
};

#[derive(Args)]
pub struct QuizArgs {
    /// Answer every question up front, e.g. `1,2,1`
    #[arg(long, value_delimiter = ',')]
    answers: Option<Vec<usize>>,

    /// Forward the result to the school assistant and keep chatting
    #[arg(long)]
    chat: bool,
}

fn print_question(step: usize, total: usize, question: &Question) {
    let label = STEP_LABELS.get(step).copied().unwrap_or("Question");
    println!(
        "{} {}",
        style(format!("[{}/{}]", step + 1, total)).dim(),
        style(label).yellow().bold()
    );
    println!("{}", style(question.text).bold());
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {}", style(i + 1).cyan(), option.text);
    }
}

/// Options are numbered from 1 on screen
fn answer(session: &mut QuizSession<'_>, choice: usize) -> Result<QuizPhase, QuizError> {
    match choice.checked_sub(1) {
        Some(index) => session.answer(index),
        None => Err(QuizError::InvalidOption {
            step: session.step().unwrap_or(0),
            index: choice,
            available: session
                .current_question()
                .map(|q| q.options.len())
                .unwrap_or(0),
        }),
    }
}

async fn run_interactive(session: &mut QuizSession<'_>, prompt: &mut Prompt) -> Result<QuizResult> {
    let total = session.total_questions();

    while let (Some(step), Some(question)) = (session.step(), session.current_question()) {
        print_question(step, total, question);

        loop {
            let Some(line) = prompt.ask(">").await? else {
                bail!("Quiz interrupted");
            };
            let outcome = match line.parse::<usize>() {
                Ok(choice) => answer(session, choice),
                Err(_) => Err(QuizError::InvalidOption {
                    step,
                    index: 0,
                    available: question.options.len(),
                }),
            };

            match outcome {
                Ok(_) => break,
                Err(QuizError::InvalidOption { available, .. }) => {
                    println!(
                        "{}",
                        style(format!("Pick a number between 1 and {}", available)).red()
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        println!();
    }

    session
        .result()
        .copied()
        .ok_or_else(|| anyhow::anyhow!("Quiz ended without a result"))
}

fn run_scripted(session: &mut QuizSession<'_>, answers: &[usize]) -> Result<QuizResult> {
    for &choice in answers {
        if let QuizPhase::Resolved(result) = answer(session, choice)? {
            return Ok(result);
        }
    }
    bail!(
        "{} answers given, the quiz has {} questions",
        answers.len(),
        session.total_questions()
    )
}

pub async fn run(args: QuizArgs, api: &ApiArgs) -> Result<()> {
    let mut session = QuizSession::standard();
    let mut prompt = Prompt::new();

    let result = match &args.answers {
        Some(answers) => run_scripted(&mut session, answers)?,
        None => run_interactive(&mut session, &mut prompt).await?,
    };

    rule();
    println!("{}", format_quiz_result(&result));
    rule();

    if args.chat {
        let mut school_chat = SchoolChat::new(connect(api), ChatConfig::default());
        chat::send(&mut school_chat, &quiz_followup_message(&result)).await;
        chat::repl(&mut school_chat, &mut prompt).await?;
    }

    Ok(())
}
