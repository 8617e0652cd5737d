use cucumber::{given, then, when, World};
use probe_core::{default_endpoints, EndpointProber, ProbeConfig, ProbeReport};
use reqwest::Method;
use tokio::net::TcpListener;

#[derive(Debug, World)]
#[world(init = Self::new)]
struct StubWorld {
    base_url: Option<String>,
    http_client: reqwest::Client,
    last_report: Option<ProbeReport>,
    last_response: Option<reqwest::Response>,
}

impl StubWorld {
    fn new() -> Self {
        Self {
            base_url: None,
            http_client: reqwest::Client::new(),
            last_report: None,
            last_response: None,
        }
    }

    fn base_url(&self) -> &str {
        self.base_url.as_deref().expect("Stub server not started")
    }

    async fn send(&mut self, method: Method, path: &str) {
        let response = self
            .http_client
            .request(method, format!("{}{}", self.base_url(), path))
            .send()
            .await
            .expect("Stub server should answer");
        self.last_response = Some(response);
    }

    fn response(&self) -> &reqwest::Response {
        self.last_response.as_ref().expect("No response available")
    }
}

#[given("a running stub server")]
async fn given_running_stub_server(world: &mut StubWorld) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    world.base_url = Some(format!("http://{}", listener.local_addr().unwrap()));
    tokio::spawn(async move {
        let _ = axum::serve(listener, probe_stub_server::app()).await;
    });
}

#[when("I probe every endpoint")]
async fn when_probe_every_endpoint(world: &mut StubWorld) {
    let config = ProbeConfig::default().with_base_url(world.base_url());
    let prober = EndpointProber::from_config(&config).expect("valid config");
    let report = prober
        .probe_all(&default_endpoints())
        .await
        .expect("probe URLs should build");
    world.last_report = Some(report);
}

#[when(expr = "I send {word} to {string}")]
async fn when_send(world: &mut StubWorld, method: String, path: String) {
    let method: Method = method.parse().expect("valid HTTP method");
    world.send(method, &path).await;
}

#[then("all probes should pass")]
async fn then_all_probes_pass(world: &mut StubWorld) {
    let report = world.last_report.as_ref().expect("No report available");
    let failures: Vec<_> = report.failures().map(|r| r.diagnostic.clone()).collect();
    assert!(report.all_passed(), "Failed probes: {:?}", failures);
    assert_eq!(report.passed(), 3);
}

#[then(expr = "the response status should be {int}")]
async fn then_response_status(world: &mut StubWorld, expected: u16) {
    assert_eq!(world.response().status().as_u16(), expected);
}

#[then(expr = "the Allow header should be {string}")]
async fn then_allow_header(world: &mut StubWorld, expected: String) {
    let allow = world
        .response()
        .headers()
        .get(reqwest::header::ALLOW)
        .expect("Allow header missing")
        .to_str()
        .unwrap();
    assert_eq!(allow, expected);
}

#[tokio::main]
async fn main() {
    StubWorld::cucumber()
        .run_and_exit("tests/features")
        .await;
}
