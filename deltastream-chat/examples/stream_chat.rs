//! Streaming example: ask the chat function one question and print the answer
//! as it grows.
//!
//! Set DELTASTREAM_BASE_URL and DELTASTREAM_API_KEY in your environment and run:
//!   RUST_LOG=deltastream_sse=trace cargo run --example stream_chat -p deltastream-chat -- "What is a pulsar?"

use std::io::Write;

use deltastream_chat::{ChatClient, ChatConfig, ChatMessage, StreamUpdate};
use futures::StreamExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let prompt = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let prompt = if prompt.trim().is_empty() {
        "Tell me something surprising about neutron stars.".to_string()
    } else {
        prompt
    };

    let config = ChatConfig::from_env()?;
    let client = ChatClient::from_config(&config);

    let handle = client.complete_stream(&[ChatMessage::user(prompt)]).await?;
    let mut receiver = handle.receiver;

    // Each update carries the whole answer so far; print only the new tail.
    let mut printed = 0;
    while let Some(update) = receiver.next().await {
        match update? {
            StreamUpdate::Content(snapshot) => {
                print!("{}", &snapshot[printed..]);
                std::io::stdout().flush()?;
                printed = snapshot.len();
            }
            StreamUpdate::Complete(completion) => {
                println!();
                println!(
                    "Stream complete ({:?}, {} deltas).",
                    completion.reason, completion.deltas
                );
            }
        }
    }

    Ok(())
}
