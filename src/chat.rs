use chrono::{DateTime, Local};

use crate::view::ChatAnswerView;

pub const PROCESSING: &str = "Processing your question...";
pub const ANSWER_FAILED: &str = "Error: Failed to get an answer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
  Pending,
  Answered(ChatAnswerView),
  Failed,
}

#[derive(Debug, Clone)]
pub struct ChatExchange {
  pub question: String,
  pub asked_at: DateTime<Local>,
  pub reply: ChatReply,
}

/// Append-only list of exchanges for the current session.
#[derive(Debug, Default)]
pub struct Transcript {
  exchanges: Vec<ChatExchange>,
  /// Bumped on `clear` so replies from a previous conversation are ignored.
  generation: u64,
}

/// Identifies an exchange slot that is waiting for its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeSlot {
  generation: u64,
  index: usize,
}

impl Transcript {
  /// Append a question with a pending reply and return its slot.
  pub fn push_question(&mut self, question: String) -> ExchangeSlot {
    self.exchanges.push(ChatExchange { question, asked_at: Local::now(), reply: ChatReply::Pending });
    ExchangeSlot { generation: self.generation, index: self.exchanges.len() - 1 }
  }

  /// Fill in the reply for a slot. Returns false when the slot belongs to a cleared conversation.
  pub fn resolve(&mut self, slot: ExchangeSlot, reply: ChatReply) -> bool {
    if slot.generation != self.generation {
      return false;
    }
    match self.exchanges.get_mut(slot.index) {
      Some(exchange) => {
        exchange.reply = reply;
        true
      }
      None => false,
    }
  }

  pub fn clear(&mut self) {
    self.exchanges.clear();
    self.generation += 1;
  }

  pub fn exchanges(&self) -> &[ChatExchange] {
    &self.exchanges
  }

  pub fn is_empty(&self) -> bool {
    self.exchanges.is_empty()
  }
}
