//! The conversation orchestrator.
//!
//! [`Chatbot::handle_message`] is the single entry point for an inbound user
//! message. Knowledge commands are dispatched straight to the store; plain
//! messages run the completion pipeline: load the recent history window,
//! flatten it into a context string, call the provider, persist the
//! exchange. The chat never hard-fails — any error in the pipeline comes
//! back as an apologetic text response.

use std::sync::Arc;

use crate::command::Command;
use crate::completion::{ChatMessage, CompletionError, CompletionProvider};
use crate::store::Store;

/// Fixed persona instruction, always the first message of a request.
const SYSTEM_PERSONA: &str = "Você é um assistente de IA. Seu nome é Laponia. \
    Responda às perguntas do usuário da melhor forma possível.";

/// How many recent turns are fed back as context. Fixed by design.
const CONTEXT_WINDOW: u32 = 2;

pub struct Chatbot {
    store: Arc<Store>,
    provider: Arc<dyn CompletionProvider>,
}

impl Chatbot {
    pub fn new(store: Arc<Store>, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { store, provider }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Turn one inbound message into one response string.
    pub async fn handle_message(&self, raw: &str) -> String {
        match Command::parse(raw) {
            Command::SaveKnowledge {
                category,
                key,
                value,
            } => {
                if self.store.save_knowledge(&category, &key, &value) {
                    format!("Conhecimento salvo: {category}:{key}")
                } else {
                    "Erro ao salvar conhecimento".to_string()
                }
            }
            Command::RetrieveKnowledge { category, key } => {
                match self.store.get_knowledge(&category, &key) {
                    Some(value) => format!("Valor recuperado: {value}"),
                    None => "Conhecimento não encontrado".to_string(),
                }
            }
            Command::Plain(message) => self.process_message(&message).await,
        }
    }

    /// The normal completion path: history → context → provider → persist.
    async fn process_message(&self, user_message: &str) -> String {
        let history = self.store.get_conversation_history(CONTEXT_WINDOW);
        let context = history
            .iter()
            .map(|t| format!("{} -> {}", t.user_message, t.ai_response))
            .collect::<Vec<_>>()
            .join(" ");

        match self.generate_response(user_message, &context).await {
            Ok(response) => {
                // Persistence failure is logged inside the store; the user
                // still gets their response.
                self.store.save_conversation(user_message, &response);
                response
            }
            Err(e) => {
                tracing::error!(error = %e, "message processing failed");
                format!("Desculpe, ocorreu um erro: {e}")
            }
        }
    }

    async fn generate_response(
        &self,
        user_message: &str,
        context: &str,
    ) -> Result<String, CompletionError> {
        let mut messages = vec![ChatMessage::system(SYSTEM_PERSONA)];
        if !context.is_empty() {
            messages.push(ChatMessage::system(format!("Contexto adicional: {context}")));
        }
        messages.push(ChatMessage::user(user_message));

        self.provider.complete(&messages).await
    }
}
