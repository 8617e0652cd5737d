use cucumber::{given, then, when, World};
use tokio::net::TcpListener;
use tokio::process::Command;

#[derive(Debug, World)]
#[world(init = Self::new)]
struct CliWorld {
    base_url: Option<String>,
    exit_success: Option<bool>,
    stdout: String,
    stderr: String,
}

impl CliWorld {
    fn new() -> Self {
        Self {
            base_url: None,
            exit_success: None,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    async fn run(&mut self, args: Vec<String>) {
        let output = Command::new(env!("CARGO_BIN_EXE_probe"))
            .args(&args)
            .env_remove("PROBE_BASE_URL")
            .env_remove("PROBE_STATUS_ID")
            .env_remove("PROBE_TIMEOUT_SECS")
            .env_remove("RUST_LOG")
            .output()
            .await
            .expect("Failed to launch probe binary");

        self.exit_success = Some(output.status.success());
        self.stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        self.stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    }
}

fn split_args(args: &str) -> Vec<String> {
    args.split_whitespace().map(str::to_string).collect()
}

#[given("no server is listening")]
async fn given_no_server(world: &mut CliWorld) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    world.base_url = Some(format!("http://{}", addr));
}

#[given("a running stub server")]
async fn given_running_stub_server(world: &mut CliWorld) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    world.base_url = Some(format!("http://{}", listener.local_addr().unwrap()));
    tokio::spawn(async move {
        let _ = axum::serve(listener, probe_stub_server::app()).await;
    });
}

#[when(expr = "I run probe with {string}")]
async fn when_run_probe(world: &mut CliWorld, args: String) {
    world.run(split_args(&args)).await;
}

#[when(expr = "I run probe against the server with {string}")]
async fn when_run_probe_against_server(world: &mut CliWorld, args: String) {
    let base_url = world.base_url.clone().expect("No server address");
    let mut full = vec![
        "--base-url".to_string(),
        base_url,
        "--timeout".to_string(),
        "2".to_string(),
    ];
    full.extend(split_args(&args));
    world.run(full).await;
}

#[then("the command should succeed")]
async fn then_command_succeeds(world: &mut CliWorld) {
    assert_eq!(
        world.exit_success,
        Some(true),
        "stdout:\n{}\nstderr:\n{}",
        world.stdout,
        world.stderr
    );
}

#[then("the command should fail")]
async fn then_command_fails(world: &mut CliWorld) {
    assert_eq!(world.exit_success, Some(false), "stdout:\n{}", world.stdout);
}

#[then(expr = "the output should contain {string}")]
async fn then_output_contains(world: &mut CliWorld, text: String) {
    assert!(
        world.stdout.contains(&text),
        "Expected stdout containing '{}', got:\n{}",
        text,
        world.stdout
    );
}

#[then(expr = "the error output should contain {string}")]
async fn then_error_output_contains(world: &mut CliWorld, text: String) {
    assert!(
        world.stderr.contains(&text),
        "Expected stderr containing '{}', got:\n{}",
        text,
        world.stderr
    );
}

#[then(expr = "the JSON report should hold {int} passing result for {string}")]
async fn then_json_report(world: &mut CliWorld, count: usize, name: String) {
    let report: serde_json::Value =
        serde_json::from_str(&world.stdout).expect("stdout should be a JSON report");
    let results = report["results"].as_array().expect("results array");
    assert_eq!(results.len(), count);
    for result in results {
        assert_eq!(result["endpoint"]["name"], name.as_str());
        assert_eq!(result["passed"], true);
    }
}

#[tokio::main]
async fn main() {
    CliWorld::cucumber()
        .run_and_exit("tests/features")
        .await;
}
