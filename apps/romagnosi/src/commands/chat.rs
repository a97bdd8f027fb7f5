use anyhow::Result;
use console::style;
use romagnosi_core::{
    CONNECTION_LOST_MESSAGE, ChatConfig, ChatError, FAQ_ITEMS, GeminiClient, SchoolChat,
};

use crate::ui::{Prompt, create_spinner};

enum Input<'a> {
    Quit,
    Help,
    Message(&'a str),
    Unknown,
}

fn parse_input(line: &str) -> Input<'_> {
    match line.split_once(' ').unwrap_or((line, "")) {
        ("/quit" | "/exit", _) => Input::Quit,
        ("/help" | "/faq", "") => Input::Help,
        ("/faq", n) => n
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| FAQ_ITEMS.get(i).copied())
            .map_or(Input::Unknown, Input::Message),
        (cmd, _) if cmd.starts_with('/') => Input::Unknown,
        _ => Input::Message(line),
    }
}

fn print_help() {
    println!("{}", style("Quick questions:").dim());
    for (i, item) in FAQ_ITEMS.iter().enumerate() {
        println!("  {} {}", style(format!("/faq {}", i + 1)).cyan(), item);
    }
    println!("  {} leave the chat\n", style("/quit").cyan());
}

/// Send one message and print the reply or the short failure notice
pub async fn send(chat: &mut SchoolChat, text: &str) {
    let spinner = create_spinner("Romagnosi Bot is typing...");
    let reply = chat.send_message(text).await;
    spinner.finish_and_clear();

    match reply {
        Ok(reply) => println!("{} {}\n", style("Bot:").magenta().bold(), reply),
        Err(ChatError::EmptyMessage) => {}
        Err(_) => println!("{}\n", style(CONNECTION_LOST_MESSAGE).red()),
    }
}

pub async fn repl(chat: &mut SchoolChat, prompt: &mut Prompt) -> Result<()> {
    print_help();

    while let Some(line) = prompt.ask("You:").await? {
        match parse_input(&line) {
            Input::Quit => break,
            Input::Help => print_help(),
            Input::Unknown => println!("{}", style("Unknown command, try /help").yellow()),
            Input::Message(text) => send(chat, text).await,
        }
    }
    Ok(())
}

pub async fn run(client: GeminiClient) -> Result<()> {
    let mut chat = SchoolChat::new(client, ChatConfig::default());
    let mut prompt = Prompt::new();
    repl(&mut chat, &mut prompt).await
}
