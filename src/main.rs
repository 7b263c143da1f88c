use std::fmt::Write as _;
use std::io::Write as _;

use caviaar_chat::config::WidgetConfig;
use caviaar_chat::presentation::{self, BlockKind, Inline, LinkPolicy, LinkStyle};
use caviaar_chat::service::{ChatWidget, InFlight, Settlement};
use caviaar_chat::transport::HttpTransport;
use caviaar_chat::{Message, MessageRole};
use futures_util::future::OptionFuture;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Send(String),
    Health,
    Tokens,
    Help,
    Quit,
}

impl Command {
    /// A bare number picks a quick reply; `/…` are client commands; anything
    /// else goes to the assistant as typed.
    fn parse(line: &str, quick_replies: &[&str]) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "/quit" | "/exit" => Command::Quit,
            "/help" => Command::Help,
            "/health" => Command::Health,
            "/tokens" => Command::Tokens,
            _ => match trimmed.parse::<usize>() {
                Ok(n) if (1..=quick_replies.len()).contains(&n) => {
                    Command::Send(quick_replies[n - 1].to_string())
                }
                _ => Command::Send(line.to_string()),
            },
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the transcript
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caviaar_chat=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Wiring ────────────────────────────────────────────────────────────────
    let config = WidgetConfig::from_env()?;
    let policy = config.link_policy();
    let transport = HttpTransport::new(&config)?;

    match transport.health().await {
        Ok(health) => info!("Assistant backend at {} is {}", transport.base_url(), health.status),
        Err(e) => warn!("Assistant backend at {} is not answering: {e}", transport.base_url()),
    }

    let widget = ChatWidget::new(transport.clone());
    for message in widget.snapshot().iter() {
        print_message(message, &policy);
    }
    print_help(widget.quick_replies());

    // ── Event loop ────────────────────────────────────────────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: Option<InFlight> = None;
    prompt();

    loop {
        tokio::select! {
            Some(settlement) = OptionFuture::from(in_flight.as_mut()), if in_flight.is_some() => {
                in_flight = None;
                if settlement != Settlement::Detached {
                    if let Some(message) = widget.last_message() {
                        println!();
                        print_message(&message, &policy);
                    }
                }
                prompt();
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line, widget.quick_replies()) {
                    Command::Quit => break,
                    Command::Help => print_help(widget.quick_replies()),
                    Command::Health => match transport.health().await {
                        Ok(health) => println!("backend: {}", health.status),
                        Err(e) => println!("backend unreachable: {e}"),
                    },
                    Command::Tokens => match transport.token_usage(&widget.session_token()).await {
                        Ok(usage) => println!(
                            "tokens used today: {} (remaining {}, {})",
                            usage.tokens_used, usage.tokens_remaining, usage.date
                        ),
                        Err(e) => println!("token usage unavailable: {e}"),
                    },
                    Command::Send(text) => match widget.send(&text) {
                        Some(reply) => {
                            println!("assistant is typing...");
                            in_flight = Some(reply);
                        }
                        None if widget.is_pending() => {
                            println!("(still waiting for the previous reply)");
                        }
                        None => {}
                    },
                }
                prompt();
            }
        }
    }

    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn print_help(quick_replies: &[&str]) {
    println!("Quick replies (type the number):");
    for (i, reply) in quick_replies.iter().enumerate() {
        println!("  {}. {reply}", i + 1);
    }
    println!("Commands: /tokens /health /help /quit");
    println!();
}

fn print_message(message: &Message, policy: &LinkPolicy) {
    let rendered = presentation::render(message, policy);
    let who = match rendered.role {
        MessageRole::User => "you",
        MessageRole::Assistant => "assistant",
    };
    println!("[{}] {who}:", rendered.local_time());

    for block in &rendered.blocks {
        let prefix = match block.kind {
            BlockKind::Paragraph => "  ",
            BlockKind::ListItem => "  • ",
            BlockKind::Heading => "  # ",
        };
        println!("{prefix}{}", inline_text(&block.inlines));
    }
    for product in rendered.products {
        println!(
            "  🛍 {} [{}] {:.2} {}  {}",
            product.name, product.category, product.price, product.currency, product.url
        );
    }
}

fn inline_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(text),
            Inline::LineBreak => out.push_str("\n    "),
            Inline::Link { label, href, style: LinkStyle::CallToAction } => {
                let _ = write!(out, "[ {label} ↗ ] <{href}>");
            }
            Inline::Link { label, href, style: LinkStyle::Plain } => {
                let _ = write!(out, "{label} <{href}>");
            }
        }
    }
    out
}
