//! # Hello World Starter
//!
//! Starts a greeting workflow execution, polls its status with exponential
//! backoff until it closes, then fetches the completion result from history
//! and prints it.
//!
//! The orchestration service is the scripted in-memory one from
//! millrace-testsuite: the execution reports OPEN twice before closing
//! COMPLETED, which exercises the whole backoff loop end to end.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run -p hello-starter
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use millrace_client::{
    ClientOptions, ExecutionPoller, ResultFetcher, StartExecutionOptions, StarterConfig,
    WorkflowClient,
};
use millrace_core::encode;
use millrace_testsuite::TestOrchestrationService;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
struct GreetingResult {
    user: String,
    result: String,
}

fn compose_greeting(name: &str) -> String {
    format!("Hello {}!", name)
}

/// Initialize tracing with a standard format
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    println!("\n=== Millrace Hello World Starter ===\n");

    let config = StarterConfig::from_env()?;

    let user = "World".to_string();
    let greeting = GreetingResult {
        user: user.clone(),
        result: compose_greeting(&user),
    };

    // Scripted service: OPEN twice, then CLOSED COMPLETED with the greeting
    // as the completion payload
    let service = Arc::new(TestOrchestrationService::completes_after(
        2,
        encode(&greeting)?,
    ));

    let client = Arc::new(WorkflowClient::new(
        service,
        config.client.domain.clone(),
        ClientOptions::default(),
    ));

    let options = StartExecutionOptions {
        id: format!("hello-{}", Uuid::new_v4()),
        task_list: config.client.task_list.clone(),
        execution_start_to_close_timeout: Some(Duration::from_secs(3600)),
        task_start_to_close_timeout: Some(Duration::from_secs(30)),
        ..Default::default()
    };
    let input = encode(&user)?;
    let execution = client
        .start_execution(options, "GreetingWorkflow::greet", Some(&input))
        .await?;

    info!(
        workflow_id = %execution.workflow_id,
        run_id = %execution.run_id,
        "workflow execution started"
    );
    println!(
        "Started execution: workflow_id={} run_id={}",
        execution.workflow_id, execution.run_id
    );
    println!(
        "Polling execution status (up to {} attempts)...",
        config.poller.maximum_attempts
    );

    let poller = ExecutionPoller::new(client.clone(), config.poller.backoff_policy());
    match poller.poll_until_complete(&execution).await {
        Ok(outcome) if outcome.succeeded() => {
            println!("Execution closed: COMPLETED");

            match ResultFetcher::new(client).fetch_result(&execution).await {
                Ok(value) => {
                    let result: GreetingResult = value.decode()?;
                    println!("Result: {}", result.result);
                }
                Err(e) => println!("Could not fetch result: {}", e),
            }
        }
        Ok(outcome) => match outcome.close_status() {
            Some(status) => println!("Execution closed without success: {:?}", status),
            None => println!(
                "Execution still open after {} attempts, giving up",
                config.poller.maximum_attempts
            ),
        },
        Err(e) => println!("Polling stopped: {}", e),
    }

    println!("\nStarter finished.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_greeting() {
        assert_eq!(compose_greeting("World"), "Hello World!");
    }

    #[test]
    fn test_greeting_result_round_trips_through_json() {
        let greeting = GreetingResult {
            user: "World".to_string(),
            result: compose_greeting("World"),
        };

        let bytes = encode(&greeting).unwrap();
        let decoded: GreetingResult = millrace_core::decode(&bytes).unwrap();

        assert_eq!(decoded, greeting);
    }
}
