//! Tests for agent turns, history, streaming and sessions.

mod common;

use std::time::Duration;

use futures::stream::FusedStream;
use futures::StreamExt;
use pretty_assertions::assert_eq;

use common::{agent_with, Script, ScriptedTransport, TEST_MODEL};
use conferenti_agent::agent::{AgentSessions, TurnOutcome, TurnStreamState};
use conferenti_agent::types::{ChatMessage, TurnResult, TurnStatus};
use conferenti_agent::util::{turn_stream_with_timeout, turn_with_timeout};

#[test]
fn new_agent_history_is_only_the_system_message() {
    let agent = agent_with(ScriptedTransport::new(), "Be helpful.");
    assert_eq!(agent.history(), vec![ChatMessage::system("Be helpful.")]);
    assert_eq!(agent.model(), TEST_MODEL);
    assert!(agent.id().starts_with("agent_"));
}

#[test]
fn agent_ids_are_unique() {
    let transport = ScriptedTransport::new();
    let a = agent_with(transport.clone(), "s");
    let b = agent_with(transport, "s");
    assert_ne!(a.id(), b.id());
}

#[tokio::test]
async fn sync_turn_appends_user_and_assistant() {
    let transport = ScriptedTransport::new();
    transport.queue_reply("42");
    let mut agent = agent_with(transport.clone(), "You are a calculator.");

    let result = agent.run("What is 6*7?").await;

    assert_eq!(result, TurnResult::completed("42", TEST_MODEL));
    assert_eq!(result.message, Some(ChatMessage::assistant("42")));
    assert_eq!(
        agent.history(),
        vec![
            ChatMessage::system("You are a calculator."),
            ChatMessage::user("What is 6*7?"),
            ChatMessage::assistant("42"),
        ]
    );
    // The transport saw the full history including the new user message.
    assert_eq!(
        transport.requests(),
        vec![vec![
            ChatMessage::system("You are a calculator."),
            ChatMessage::user("What is 6*7?"),
        ]]
    );
}

#[tokio::test]
async fn sync_failure_leaves_dangling_user_turn() {
    let transport = ScriptedTransport::new();
    transport.queue_failure("connection refused");
    let mut agent = agent_with(transport, "s");

    let result = agent.run("hello").await;

    assert_eq!(result.status, TurnStatus::Failed);
    assert_eq!(
        result.error.as_deref(),
        Some("Provider error: scripted: connection refused")
    );
    assert!(result.content.is_none());
    assert_eq!(agent.history().len(), 2);
    assert!(agent.conversation().has_unanswered_user_message());
}

#[tokio::test]
async fn retry_after_failure_duplicates_user_turn() {
    let transport = ScriptedTransport::new();
    transport.queue_failure("503");
    transport.queue_reply("hi");
    let mut agent = agent_with(transport, "s");

    assert!(agent.run("hello").await.is_failed());
    assert!(agent.run("hello").await.is_completed());

    assert_eq!(
        agent.history(),
        vec![
            ChatMessage::system("s"),
            ChatMessage::user("hello"),
            ChatMessage::user("hello"),
            ChatMessage::assistant("hi"),
        ]
    );
}

#[tokio::test]
async fn blank_message_is_rejected_without_touching_history() {
    let transport = ScriptedTransport::new();
    let mut agent = agent_with(transport.clone(), "s");

    let result = agent.run("   ").await;
    assert_eq!(result.status, TurnStatus::Failed);
    assert_eq!(result.error.as_deref(), Some("message must not be empty"));

    let chunks: Vec<_> = agent.run_streaming("").collect().await;
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].status, TurnStatus::Failed);

    assert_eq!(agent.history().len(), 1);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn streaming_turn_reconstructs_reply() {
    let transport = ScriptedTransport::new();
    transport.queue_fragments(&["Hel", "lo"]);
    let mut agent = agent_with(transport, "s");

    let chunks: Vec<TurnResult> = agent.run_streaming("Say hello").collect().await;

    assert_eq!(
        chunks,
        vec![TurnResult::in_progress("Hel"), TurnResult::in_progress("lo")]
    );
    assert_eq!(chunks[0].delta.as_deref(), Some("Hel"));
    assert_eq!(
        agent.history(),
        vec![
            ChatMessage::system("s"),
            ChatMessage::user("Say hello"),
            ChatMessage::assistant("Hello"),
        ]
    );
}

#[tokio::test]
async fn streaming_turn_with_no_fragments_records_empty_reply() {
    let transport = ScriptedTransport::new();
    transport.queue_fragments(&[]);
    let mut agent = agent_with(transport, "s");

    let chunks: Vec<_> = agent.run_streaming("ping").collect().await;
    assert!(chunks.is_empty());
    assert_eq!(agent.conversation().last(), &ChatMessage::assistant(""));
}

#[tokio::test]
async fn stream_finalizes_once_and_stays_terminated() {
    let transport = ScriptedTransport::new();
    transport.queue_fragments(&["a", "b"]);
    let mut agent = agent_with(transport, "s");

    {
        let mut stream = agent.run_streaming("go");
        assert_eq!(stream.state(), TurnStreamState::Opening);
        assert_eq!(stream.next().await, Some(TurnResult::in_progress("a")));
        assert_eq!(stream.state(), TurnStreamState::Emitting);
        assert_eq!(stream.accumulated(), "a");
        assert_eq!(stream.next().await, Some(TurnResult::in_progress("b")));
        assert_eq!(stream.next().await, None);
        assert_eq!(stream.state(), TurnStreamState::Terminal);
        assert!(stream.is_terminated());
        assert_eq!(stream.next().await, None);
    }

    let assistants = agent
        .history()
        .into_iter()
        .filter(|m| m == &ChatMessage::assistant("ab"))
        .count();
    assert_eq!(assistants, 1);
}

#[tokio::test]
async fn mid_stream_failure_discards_partial_text() {
    let transport = ScriptedTransport::new();
    transport.queue_broken_stream(&["par", "tial"], "connection reset");
    let mut agent = agent_with(transport, "s");

    let chunks: Vec<_> = {
        let mut stream = agent.run_streaming("go");
        let mut chunks = Vec::new();
        while let Some(chunk) = stream.next().await {
            chunks.push(chunk);
        }
        assert_eq!(stream.state(), TurnStreamState::Aborted);
        assert_eq!(stream.accumulated(), "");
        chunks
    };

    let statuses: Vec<_> = chunks.iter().map(|c| c.status).collect();
    assert_eq!(
        statuses,
        vec![
            TurnStatus::InProgress,
            TurnStatus::InProgress,
            TurnStatus::Failed
        ]
    );
    assert!(chunks[2]
        .error
        .as_deref()
        .is_some_and(|e| e.contains("connection reset")));
    assert_eq!(
        agent.history(),
        vec![ChatMessage::system("s"), ChatMessage::user("go")]
    );
}

#[tokio::test]
async fn failure_opening_stream_yields_single_failed_result() {
    let transport = ScriptedTransport::new();
    transport.queue_failure("model not found");
    let mut agent = agent_with(transport, "s");

    let chunks: Vec<_> = agent.run_streaming("go").collect().await;
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].is_failed());
    assert_eq!(agent.history().len(), 2);
}

#[tokio::test]
async fn dropping_stream_early_skips_finalization() {
    let transport = ScriptedTransport::new();
    transport.queue_fragments(&["one", "two", "three"]);
    let mut agent = agent_with(transport, "s");

    {
        let mut stream = agent.run_streaming("count");
        assert_eq!(stream.next().await, Some(TurnResult::in_progress("one")));
    }

    assert_eq!(
        agent.history(),
        vec![ChatMessage::system("s"), ChatMessage::user("count")]
    );
}

#[tokio::test]
async fn run_with_dispatches_on_mode() {
    let transport = ScriptedTransport::new();
    transport.queue_reply("sync");
    transport.queue_fragments(&["str", "eam"]);
    let mut agent = agent_with(transport, "s");

    match agent.run_with("first", false).await {
        TurnOutcome::Completed(result) => assert_eq!(result.content.as_deref(), Some("sync")),
        TurnOutcome::Streaming(_) => panic!("expected a completed turn"),
    }
    match agent.run_with("second", true).await {
        TurnOutcome::Streaming(stream) => {
            let deltas: Vec<_> = stream.filter_map(|c| async move { c.delta }).collect().await;
            assert_eq!(deltas, vec!["str", "eam"]);
        }
        TurnOutcome::Completed(_) => panic!("expected a streaming turn"),
    }
    assert_eq!(agent.conversation().last(), &ChatMessage::assistant("stream"));
}

#[tokio::test]
async fn clear_history_keeps_original_system_message() {
    let transport = ScriptedTransport::new();
    let mut agent = agent_with(transport, "You are a planner.");
    agent.run("one").await;
    agent.run("two").await;
    assert_eq!(agent.history().len(), 5);

    agent.clear_history();
    assert_eq!(agent.history(), vec![ChatMessage::system("You are a planner.")]);
}

#[tokio::test]
async fn history_copy_is_isolated() {
    let transport = ScriptedTransport::new();
    let mut agent = agent_with(transport, "s");
    agent.run("hi").await;

    let mut copy = agent.history();
    copy.clear();
    copy.push(ChatMessage::user("injected"));

    assert_eq!(agent.history().len(), 3);
    assert_eq!(agent.history()[0], ChatMessage::system("s"));
}

#[tokio::test(start_paused = true)]
async fn timed_out_turn_is_failed_and_records_no_reply() {
    let transport = ScriptedTransport::new();
    transport.push(Script::Hang);
    let mut agent = agent_with(transport, "s");

    let result = turn_with_timeout(Duration::from_secs(2), agent.run("slow")).await;
    assert_eq!(result.status, TurnStatus::Failed);
    assert_eq!(agent.history().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn timed_out_streaming_turn_fails_once_and_records_no_reply() {
    let transport = ScriptedTransport::new();
    transport.push(Script::Hang);
    let mut agent = agent_with(transport, "s");

    let results: Vec<_> =
        turn_stream_with_timeout(Duration::from_secs(2), agent.run_streaming("slow"))
            .collect()
            .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, TurnStatus::Failed);
    assert_eq!(results[0].error.as_deref(), Some("Timeout after 2000ms"));
    assert_eq!(
        agent.history(),
        vec![ChatMessage::system("s"), ChatMessage::user("slow")]
    );
}

#[tokio::test]
async fn sessions_reuse_one_agent_per_conversation() {
    let transport = ScriptedTransport::new();
    let mut sessions = AgentSessions::new();

    let first = sessions.get_or_insert_with("conv-1", || agent_with(transport.clone(), "s"));
    first.lock().await.run("remember me").await;

    let again = sessions.get_or_insert_with("conv-1", || agent_with(transport.clone(), "other"));
    assert_eq!(again.lock().await.history().len(), 3);

    sessions.get_or_insert_with("conv-2", || agent_with(transport.clone(), "s"));
    assert_eq!(sessions.len(), 2);
    assert!(sessions.remove("conv-1").is_some());
    assert!(sessions.get("conv-1").is_none());
    assert_eq!(sessions.session_ids(), vec!["conv-2"]);
}
