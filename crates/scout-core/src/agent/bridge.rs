//! Bridges a finished answer onto the event channel as word chunks.
//!
//! The model gateway returns whole responses; consumers want progressive
//! text. This chunker fakes a stream by emitting a few words at a time
//! with a short delay between chunks. A failed send means the consumer
//! hung up, so emission stops early without treating it as an error.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use crate::agent::loop_events::LoopEvent;

#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    pub words_per_chunk: usize,
    pub chunk_delay: Duration,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            words_per_chunk: 5,
            chunk_delay: Duration::from_millis(50),
        }
    }
}

/// Splits `text` into whitespace-delimited chunks of at most
/// `words_per_chunk` words, preserving single spaces between words.
pub fn word_chunks(text: &str, words_per_chunk: usize) -> Vec<String> {
    let per_chunk = words_per_chunk.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(per_chunk)
        .map(|chunk| chunk.join(" "))
        .collect()
}

/// Emits `text` as a sequence of `Content` events. Every chunk but the
/// last carries `partial: true`. Returns false if the consumer
/// disconnected before the stream finished.
pub async fn stream_content(
    event_tx: &UnboundedSender<LoopEvent>,
    text: &str,
    config: &ChunkerConfig,
) -> bool {
    let chunks = word_chunks(text, config.words_per_chunk);
    if chunks.is_empty() {
        return event_tx
            .send(LoopEvent::Content {
                message: String::new(),
                partial: false,
            })
            .is_ok();
    }
    let last = chunks.len() - 1;
    for (idx, chunk) in chunks.into_iter().enumerate() {
        let partial = idx != last;
        if event_tx
            .send(LoopEvent::Content {
                message: chunk,
                partial,
            })
            .is_err()
        {
            return false;
        }
        if partial {
            tokio::time::sleep(config.chunk_delay).await;
        }
    }
    true
}
