//! Tests for the general chat mode.

use async_trait::async_trait;
use std::sync::Mutex;
use strictly_vault::{
    CHAT_FALLBACK_REPLY, CHAT_SYSTEM_PROMPT, ChatCompletion, ChatError, ChatRole, ChatSession,
    ChatTurn, LlmError,
};

/// Backend that records each request and can be told to fail.
#[derive(Debug, Default)]
struct ScriptedBackend {
    requests: Mutex<Vec<(String, Vec<ChatTurn>)>>,
    fail_next: Mutex<bool>,
}

impl ScriptedBackend {
    fn requests(&self) -> Vec<(String, Vec<ChatTurn>)> {
        self.requests.lock().unwrap().clone()
    }

    fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }
}

#[async_trait]
impl ChatCompletion for ScriptedBackend {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
    ) -> Result<String, LlmError> {
        self.requests
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), history.to_vec()));

        let mut fail = self.fail_next.lock().unwrap();
        if *fail {
            *fail = false;
            return Err(LlmError::new("upstream timeout".to_string()));
        }

        Ok(format!("reply {}", history.len()))
    }
}

#[tokio::test]
async fn test_chat_replays_full_history() {
    let mut chat = ChatSession::new(ScriptedBackend::default());

    assert_eq!(chat.send("hello").await, Ok("reply 1".to_string()));
    assert_eq!(chat.send("how are you").await, Ok("reply 3".to_string()));

    let requests = chat_requests(&chat);
    assert_eq!(requests.len(), 2);

    let (prompt, history) = &requests[1];
    assert_eq!(prompt, CHAT_SYSTEM_PROMPT);
    assert_eq!(
        history,
        &vec![
            ChatTurn::user("hello"),
            ChatTurn::assistant("reply 1"),
            ChatTurn::user("how are you"),
        ]
    );
}

#[tokio::test]
async fn test_chat_failure_appends_fallback_not_replayed() {
    let backend = ScriptedBackend::default();
    backend.fail_next();
    let mut chat = ChatSession::new(backend);

    let result = chat.send("are you there").await;
    assert!(matches!(result, Err(ChatError::Backend(_))));

    let last = chat.messages().last().unwrap();
    assert_eq!(last.role(), ChatRole::Assistant);
    assert!(last.is_fallback());
    assert_eq!(last.content(), CHAT_FALLBACK_REPLY);
    assert_eq!(chat.messages().len(), 2);

    chat.send("hello again").await.expect("Second send");
    let requests = chat_requests(&chat);
    let (_, history) = requests.last().unwrap();
    assert_eq!(history, &vec![ChatTurn::user("hello again")]);
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let mut chat = ChatSession::new(ScriptedBackend::default());
    assert_eq!(chat.send("   ").await, Err(ChatError::EmptyMessage));
    assert!(chat.messages().is_empty());
    assert!(chat_requests(&chat).is_empty());
}

#[tokio::test]
async fn test_chat_clear_forgets_history() {
    let mut chat = ChatSession::with_system_prompt(ScriptedBackend::default(), "Be brief.");
    chat.send("one").await.expect("Send");
    chat.clear();
    assert!(chat.messages().is_empty());

    chat.send("two").await.expect("Send");
    let requests = chat_requests(&chat);
    let (prompt, history) = requests.last().unwrap();
    assert_eq!(prompt, "Be brief.");
    assert_eq!(history, &vec![ChatTurn::user("two")]);
}

fn chat_requests(chat: &ChatSession<ScriptedBackend>) -> Vec<(String, Vec<ChatTurn>)> {
    chat.backend().requests()
}
