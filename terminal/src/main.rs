//! Chat terminal binary: a line-oriented Sparky chat window.
//!
//! Type to chat; lines starting with `/` are commands (see `/help`).

use async_channel::Sender;
use chat_terminal::chatbot::{
    Chatbot, DisplayMessage, TrainingBook, Turn, LIVE_REPLY_TIMEOUT, LOCAL_REPLY_DELAY, PROMPT_DELAY,
};
use chat_terminal::config::ClientConfig;
use chat_terminal::core::{ClientError, ContactService};
use chat_terminal::debug;
use chat_terminal::services::api::ApiClient;
use chat_terminal::services::{ChatSocket, SocketEvent};
use chrono::Local;
use shared::{ContactRequest, ContactResponse, Sender as Author};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug as trace_debug, info, warn};

const HELP: &str = "\
Commands:
  /live            toggle live chat with the SmartScale team
  /train           toggle training mode
  /patterns        list trained patterns
  /forget N        delete trained pattern N
  /clear-training  delete all trained patterns
  /contact         send a message through the contact form
  /help            show this help
  /quit            exit";

/// Work finished in the background, delivered back to the prompt loop.
enum UiEvent {
    ShowBot(String),
    LiveTimeout(String),
    ContactResult(Result<ContactResponse, ClientError>),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    debug::init_logger(&config.log_dir);
    info!(site = %config.site_url, "Chat terminal starting");

    let mut bot = Chatbot::new(TrainingBook::load(&config.training_file));
    let mut socket = ChatSocket::new(config.socket_options());
    let socket_events = socket.events();
    let contacts: Arc<dyn ContactService> = Arc::new(ApiClient::new(config.site_url.clone()));
    let (ui_tx, ui_rx) = async_channel::unbounded::<UiEvent>();

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut form: Option<ContactForm> = None;

    println!("SmartScale AI chat. Type /help for commands.");
    for message in bot.messages() {
        print_message(message);
    }

    loop {
        tokio::select! {
            line = stdin.next_line() => {
                let Some(line) = line? else { break };

                if let Some(active) = form.as_mut() {
                    match active.answer(&line) {
                        Some(request) => {
                            form = None;
                            println!("Sending...");
                            let contacts = Arc::clone(&contacts);
                            let ui_tx = ui_tx.clone();
                            tokio::spawn(async move {
                                let result = contacts.submit_contact(&request).await;
                                let _ = ui_tx.send(UiEvent::ContactResult(result)).await;
                            });
                        }
                        None => println!("{}", active.question()),
                    }
                    continue;
                }

                let line = line.trim();
                if let Some(command) = line.strip_prefix('/') {
                    match handle_command(command, &mut bot, &mut socket) {
                        Command::Quit => break,
                        Command::StartContact => {
                            let started = ContactForm::default();
                            println!("{}", started.question());
                            form = Some(started);
                        }
                        Command::Done => {}
                    }
                    continue;
                }

                match bot.submit(line) {
                    Ok(turn) => handle_turn(turn, &bot, &socket, &ui_tx, line),
                    Err(e) => println!("! {e}"),
                }
            }
            event = socket_events.recv() => {
                let Ok(event) = event else { continue };
                handle_socket_event(event, &mut bot);
            }
            event = ui_rx.recv() => {
                let Ok(event) = event else { continue };
                match event {
                    UiEvent::ShowBot(text) => print_message(bot.show_bot(text)),
                    UiEvent::LiveTimeout(text) => {
                        if let Some(message) = bot.live_timeout(&text) {
                            print_message(message);
                        }
                    }
                    UiEvent::ContactResult(Ok(response)) => {
                        println!("{} (reference #{})", response.message, response.id);
                    }
                    UiEvent::ContactResult(Err(ClientError::Validation(errors))) => {
                        println!("Please fix the following and try /contact again:");
                        for error in errors {
                            println!("  - {}: {}", error.field().unwrap_or("form"), error.message);
                        }
                    }
                    UiEvent::ContactResult(Err(e)) => println!("! Could not send your message: {e}"),
                }
            }
        }
    }

    socket.disconnect();
    info!("Chat terminal exiting");
    Ok(())
}

// region: --- Commands

enum Command {
    Done,
    StartContact,
    Quit,
}

fn handle_command(command: &str, bot: &mut Chatbot, socket: &mut ChatSocket) -> Command {
    let mut parts = command.split_whitespace();
    match parts.next().unwrap_or_default() {
        "quit" | "exit" => return Command::Quit,
        "contact" => return Command::StartContact,
        "help" => println!("{HELP}"),
        "live" => toggle_live(bot, socket),
        "train" => match bot.toggle_training() {
            Some(message) => print_message(message),
            None => println!("Training mode off."),
        },
        "patterns" => {
            if bot.patterns().is_empty() {
                println!("No trained patterns yet.");
            }
            for (i, entry) in bot.patterns().iter().enumerate() {
                println!("  {}. \"{}\" -> \"{}\"", i + 1, entry.pattern, entry.response);
            }
        }
        "forget" => match parts.next().and_then(|n| n.parse::<usize>().ok()).filter(|n| *n > 0) {
            Some(n) => match bot.forget(n - 1) {
                Ok(Some(entry)) => println!("Forgot \"{}\".", entry.pattern),
                Ok(None) => println!("No pattern number {n}."),
                Err(e) => println!("! {e}"),
            },
            None => println!("Usage: /forget N"),
        },
        "clear-training" => match bot.clear_training() {
            Ok(removed) => println!("Deleted {removed} trained pattern(s)."),
            Err(e) => println!("! {e}"),
        },
        other => println!("Unknown command /{other}. Type /help."),
    }
    Command::Done
}

fn toggle_live(bot: &mut Chatbot, socket: &mut ChatSocket) {
    let live = bot.mode() != chat_terminal::chatbot::Mode::Live;
    bot.set_live(live);
    if !live {
        socket.disconnect();
        println!("Live chat off.");
        return;
    }

    if socket.is_connected() {
        if let Some(message) = bot.on_connected() {
            print_message(message);
        }
    } else {
        println!("Connecting to live chat...");
        socket.connect();
    }
}

// endregion: --- Commands

fn handle_turn(turn: Turn, bot: &Chatbot, socket: &ChatSocket, ui_tx: &Sender<UiEvent>, line: &str) {
    match turn {
        Turn::Ignored => {}
        Turn::Prompt(prompt) => deliver_later(ui_tx, PROMPT_DELAY, UiEvent::ShowBot(prompt)),
        Turn::Learned(_) => {
            if let Some(message) = bot.messages().last() {
                print_message(message);
            }
        }
        Turn::Live(frame) => {
            if !socket.send_message(&frame) {
                warn!("Live message not sent, waiting for local timeout");
            }
            deliver_later(ui_tx, LIVE_REPLY_TIMEOUT, UiEvent::LiveTimeout(line.to_string()));
        }
        Turn::Local(reply) => deliver_later(ui_tx, LOCAL_REPLY_DELAY, UiEvent::ShowBot(reply)),
    }
}

fn handle_socket_event(event: SocketEvent, bot: &mut Chatbot) {
    let shown = match event {
        SocketEvent::Connected => bot.on_connected(),
        SocketEvent::Disconnected => bot.on_disconnected(),
        SocketEvent::Message(message) => bot.receive(&message),
        SocketEvent::Error(e) => {
            trace_debug!(error = %e, "Socket error");
            None
        }
        SocketEvent::FallbackEngaged => {
            println!("(Live chat server unreachable, using offline replies.)");
            None
        }
    };
    if let Some(message) = shown {
        print_message(message);
    }
}

fn deliver_later(ui_tx: &Sender<UiEvent>, delay: Duration, event: UiEvent) {
    let ui_tx = ui_tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = ui_tx.send(event).await;
    });
}

fn print_message(message: &DisplayMessage) {
    let who = match message.sender {
        Author::Bot => "Sparky",
        Author::User => "You",
    };
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    println!("[{time}] {who}: {}", message.text);
}

// region: --- Contact Form

/// Walks through the contact form one field at a time.
#[derive(Default)]
struct ContactForm {
    step: usize,
    request: ContactRequest,
}

impl ContactForm {
    const QUESTIONS: [&'static str; 5] = [
        "Your name:",
        "Your email:",
        "Company (optional, press Enter to skip):",
        "Phone (optional, press Enter to skip):",
        "Your message:",
    ];

    fn question(&self) -> &'static str {
        Self::QUESTIONS[self.step.min(Self::QUESTIONS.len() - 1)]
    }

    /// Record one answer; returns the finished request after the last field.
    fn answer(&mut self, line: &str) -> Option<ContactRequest> {
        let value = Some(line.trim().to_string()).filter(|v| !v.is_empty());
        match self.step {
            0 => self.request.name = value,
            1 => self.request.email = value,
            2 => self.request.company = value,
            3 => self.request.phone = value,
            _ => self.request.message = value,
        }
        self.step += 1;
        (self.step >= Self::QUESTIONS.len()).then(|| std::mem::take(&mut self.request))
    }
}

// endregion: --- Contact Form
