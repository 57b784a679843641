#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use laponia::chat::Chatbot;
use laponia::completion::{ChatMessage, CompletionError, CompletionProvider};
use laponia::db;
use laponia::store::Store;

/// Open a fresh in-memory store with schema and migrations applied.
pub fn test_store() -> Arc<Store> {
    Arc::new(Store::new(db::open_memory_database().unwrap()))
}

/// Completion provider that replays queued replies and records every request.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    pub fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// The message lists this provider has been called with, in order.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        Ok(self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "ok".to_string()))
    }
}

/// Completion provider that always fails.
pub struct FailingProvider;

#[async_trait]
impl CompletionProvider for FailingProvider {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, CompletionError> {
        Err(CompletionError::EmptyChoices)
    }
}

/// Chatbot wired to an in-memory store and a scripted provider.
pub fn test_chatbot(replies: &[&str]) -> (Chatbot, Arc<Store>, Arc<ScriptedProvider>) {
    let store = test_store();
    let provider = ScriptedProvider::new(replies);
    let chatbot = Chatbot::new(store.clone(), provider.clone());
    (chatbot, store, provider)
}
