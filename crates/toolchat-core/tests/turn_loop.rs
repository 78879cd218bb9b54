//! End-to-end turn-processing scenarios against scripted mocks

use std::sync::Arc;

use serde_json::json;
use toolchat_core::{
    unresolved_tool_message, Agent, AgentError, GatewayState, Message, MockGateway, MockTransport,
    NoOpLogger, Role, ToolArguments, ToolGateway, ToolRegistry, ToolSpec,
};

const MODEL: &str = "mistral:latest";
const SYSTEM_PROMPT: &str = "You are an agent that uses the tools available in the conversation";

fn build_agent(
    transport: Arc<MockTransport>,
    gateway: Arc<MockGateway>,
) -> Agent {
    let logger = Arc::new(NoOpLogger::new());
    let registry = Arc::new(ToolRegistry::with_builtins(logger.clone()));
    Agent::new(transport, gateway, registry, logger, SYSTEM_PROMPT)
}

/// Every tool-role message must answer an invocation id emitted by the
/// immediately preceding assistant message, one result per invocation.
fn assert_pairing(history: &[Message]) {
    for (i, msg) in history.iter().enumerate() {
        if msg.role != Role::Tool {
            continue;
        }
        let call_id = msg.tool_call_id.as_deref().expect("tool message without id");
        let prev = &history[i - 1];
        assert_eq!(prev.role, Role::Assistant);
        let calls = prev.tool_calls.as_deref().expect("no invocation before result");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id.as_deref(), Some(call_id));
    }
}

#[tokio::test]
async fn lcm_turn_grows_history_to_five_messages() {
    let transport = Arc::new(MockTransport::new());
    transport.push_tool_call(None, "lcm", ToolArguments::Raw("{\"numbers\":[4,6]}".to_string()));
    transport.push_text("The least common multiple of 4 and 6 is 12.");

    let gateway = Arc::new(MockGateway::new());
    let mut agent = build_agent(transport.clone(), gateway);
    agent.setup().await.unwrap();

    let answer = agent
        .run_turn(MODEL, "compute lcm of 4 and 6")
        .await
        .unwrap();
    assert_eq!(answer, "The least common multiple of 4 and 6 is 12.");

    // system + user + invocation + result + final answer
    let history = agent.history();
    assert_eq!(history.len(), 5);
    assert_eq!(history[0].role, Role::System);
    assert_eq!(history[1].role, Role::User);

    // Correlation id derives from the history length at invocation time
    let invocation = &history[2].tool_calls.as_deref().unwrap()[0];
    assert_eq!(invocation.id.as_deref(), Some("call_2"));
    assert_eq!(invocation.function.name, "lcm");

    assert_eq!(history[3].role, Role::Tool);
    assert_eq!(history[3].text(), Some("12"));
    assert_eq!(history[3].name.as_deref(), Some("lcm"));

    assert_eq!(history[4].text(), Some("The least common multiple of 4 and 6 is 12."));
    assert_pairing(history);

    // The catalog advertised the built-ins on both exchanges
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].tool_names.contains(&"lcm".to_string()));
    assert_eq!(requests[0].tool_names, requests[1].tool_names);
}

#[tokio::test]
async fn unresolved_tool_becomes_result_text_and_session_continues() {
    let transport = Arc::new(MockTransport::new());
    transport.push_tool_call(Some("abc"), "ghost", ToolArguments::default());
    transport.push_text("understood");

    let mut agent = build_agent(transport, Arc::new(MockGateway::new()));
    agent.setup().await.unwrap();

    let answer = agent.run_turn(MODEL, "use the ghost tool").await.unwrap();
    assert_eq!(answer, "understood");

    let history = agent.history();
    assert_eq!(history[3].text(), Some(unresolved_tool_message("ghost").as_str()));
    // A model-supplied id is kept as-is
    assert_eq!(history[3].tool_call_id.as_deref(), Some("abc"));
    assert_pairing(history);
}

#[tokio::test]
async fn remote_prefix_round_trips_through_the_gateway() {
    let transport = Arc::new(MockTransport::new());
    let args = json!({"message": "hi"}).as_object().cloned().unwrap();
    transport.push_tool_call(None, "remote_echo", ToolArguments::Structured(args));
    transport.push_text("done");

    let gateway = Arc::new(
        MockGateway::new().with_tool(ToolSpec::new("echo", "Echo a message"), "echoed back"),
    );
    let mut agent = build_agent(transport.clone(), gateway.clone());
    agent.setup().await.unwrap();

    let answer = agent.run_turn(MODEL, "echo hi").await.unwrap();
    assert_eq!(answer, "done");

    // Advertised under the namespaced name...
    assert!(transport.requests()[0]
        .tool_names
        .contains(&"remote_echo".to_string()));

    // ...but invoked against the provider under its original name
    let invocations = gateway.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].0, "echo");
    assert_eq!(invocations[0].1, json!({"message": "hi"}));

    let history = agent.history();
    assert_eq!(history[3].text(), Some("echoed back"));
    assert_eq!(history[3].name.as_deref(), Some("remote_echo"));
    assert_pairing(history);
}

#[tokio::test]
async fn failing_provider_degrades_to_local_tools() {
    let transport = Arc::new(MockTransport::new());
    transport.push_text("hello");

    let mut agent = build_agent(transport.clone(), Arc::new(MockGateway::failing()));
    agent.setup().await.unwrap();

    let catalog = agent.catalog();
    assert_eq!(catalog.len(), 3);

    let answer = agent.run_turn(MODEL, "hi").await.unwrap();
    assert_eq!(answer, "hello");
}

#[tokio::test]
async fn unreachable_backend_fails_setup() {
    let transport = Arc::new(MockTransport::unreachable());
    let mut agent = build_agent(transport, Arc::new(MockGateway::new()));
    assert!(matches!(
        agent.setup().await,
        Err(AgentError::BackendUnreachable(_))
    ));
}

#[tokio::test]
async fn turn_limit_fails_distinctly_instead_of_looping() {
    let transport = Arc::new(MockTransport::new());
    for _ in 0..3 {
        transport.push_tool_call(
            None,
            "lcm",
            ToolArguments::Raw("{\"numbers\":[4,6]}".to_string()),
        );
    }

    let mut agent =
        build_agent(transport, Arc::new(MockGateway::new())).with_max_tool_turns(2);
    agent.setup().await.unwrap();

    match agent.run_turn(MODEL, "loop forever").await {
        Err(AgentError::TurnLimitExceeded { limit }) => assert_eq!(limit, 2),
        other => panic!("expected turn limit error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_arguments_fall_back_to_empty_and_continue() {
    let transport = Arc::new(MockTransport::new());
    transport.push_tool_call(None, "lcm", ToolArguments::Raw("not json".to_string()));
    transport.push_text("recovered");

    let mut agent = build_agent(transport, Arc::new(MockGateway::new()));
    agent.setup().await.unwrap();

    let answer = agent.run_turn(MODEL, "lcm please").await.unwrap();
    assert_eq!(answer, "recovered");

    // The handler rejected the empty arguments; the error is result
    // text, not a failed turn
    let history = agent.history();
    assert!(history[3]
        .text()
        .unwrap()
        .starts_with("Error executing tool lcm:"));
    assert_pairing(history);
}

#[tokio::test]
async fn exhausted_transport_surfaces_as_no_response() {
    let transport = Arc::new(MockTransport::new());
    let mut agent = build_agent(transport, Arc::new(MockGateway::new()));
    agent.setup().await.unwrap();

    assert!(matches!(
        agent.run_turn(MODEL, "anyone there?").await,
        Err(AgentError::NoResponse)
    ));
}

#[tokio::test]
async fn empty_text_means_no_answer() {
    let transport = Arc::new(MockTransport::new());
    transport.push_text("");

    let mut agent = build_agent(transport, Arc::new(MockGateway::new()));
    agent.setup().await.unwrap();

    assert!(matches!(
        agent.run_turn(MODEL, "hi").await,
        Err(AgentError::NoResponse)
    ));
}

#[tokio::test]
async fn cleanup_always_disconnects() {
    let gateway = Arc::new(MockGateway::new());
    let mut agent = build_agent(Arc::new(MockTransport::new()), gateway.clone());
    agent.setup().await.unwrap();
    assert_eq!(gateway.state(), GatewayState::Connected);

    agent.cleanup().await;
    agent.cleanup().await;
    assert_eq!(gateway.state(), GatewayState::Disconnected);
}
