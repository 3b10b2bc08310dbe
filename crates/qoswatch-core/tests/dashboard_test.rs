#![allow(clippy::unwrap_used)]
// End-to-end tests for `DashboardController` against a wiremock backend.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use qoswatch_core::{
    CoreError, DashboardConfig, DashboardController, FetchError, MetricKind, RefreshOutcome,
    ViewKind,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(switch: &str, port: &str) -> (MockServer, DashboardController) {
    let server = MockServer::start().await;
    let controller = controller_for(&server, switch, port, |_| {});
    (server, controller)
}

fn controller_for(
    server: &MockServer,
    switch: &str,
    port: &str,
    tweak: impl FnOnce(&mut DashboardConfig),
) -> DashboardController {
    let mut config = DashboardConfig::new(Url::parse(&server.uri()).unwrap());
    config.switch_id = Some(switch.into());
    config.port_id = Some(port.into());
    tweak(&mut config);
    DashboardController::new(config).unwrap()
}

fn webgui_path(suffix: &str) -> String {
    format!("/wm/qosoverlldp/webgui/{suffix}/json")
}

fn percentage_list(bandwidth: &[f64]) -> Value {
    let n = bandwidth.len();
    json!({
        "bandwidth": bandwidth,
        "delay": (1..=n).collect::<Vec<_>>(),
        "jitter": vec![0; n],
        "loss": vec![0; n],
        "latency": vec![3; n],
    })
}

fn proportions() -> Value {
    json!({ "bandwidth": 4, "delay": 3, "jitter": 2, "loss": 1, "latency": 0 })
}

fn history() -> Value {
    json!({
        "visualtime": ["12:00:00", "12:00:01", "12:00:02"],
        "visualbandwidth": [1, 2, 3],
        "visualdelay": [4, 5, 6],
        "visualjitter": [0, 0, 0],
        "loss": [0, 0, 1],
        "visuallatency": [7, 8, 9],
    })
}

async fn mount_json(server: &MockServer, suffix: &str, body: Value, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(webgui_path(suffix)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

async fn mount_device(server: &MockServer, device: &str, bandwidth: &[f64]) {
    mount_json(
        server,
        &format!("statistics/percentagelist/{device}"),
        percentage_list(bandwidth),
        Duration::ZERO,
    )
    .await;
    mount_json(
        server,
        &format!("statistics/varietyproportion/{device}"),
        proportions(),
        Duration::ZERO,
    )
    .await;
    mount_json(
        server,
        &format!("deviceqoshistorylist/{device}"),
        history(),
        Duration::ZERO,
    )
    .await;
}

fn trend_bandwidth(controller: &DashboardController) -> Option<Vec<(f64, f64)>> {
    let surface = controller.trend().borrow().clone();
    surface
        .frame
        .and_then(|f| f.line(MetricKind::Bandwidth).map(|l| l.points.clone()))
}

/// Poll the mock until it has seen at least `count` requests.
async fn wait_for_requests(server: &MockServer, count: usize) -> Vec<Request> {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let requests = server.received_requests().await.unwrap();
            if requests.len() >= count {
                return requests;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap()
}

// ── End-to-end ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_renders_all_three_views() {
    let (server, controller) = setup("1", "2").await;
    mount_device(&server, "s1-eth2", &[5.0, 6.0]).await;

    let outcomes = controller.refresh_all().await.unwrap();
    assert_eq!(
        outcomes,
        [
            RefreshOutcome::Applied,
            RefreshOutcome::Applied,
            RefreshOutcome::Applied
        ]
    );

    let trend = controller.trend().borrow().clone();
    let frame = trend.frame.unwrap();
    assert_eq!(
        frame.line(MetricKind::Bandwidth).unwrap().points,
        vec![(0.0, 15.0), (1.0, 16.0)]
    );
    assert_eq!(
        frame.line(MetricKind::Delay).unwrap().points,
        vec![(0.0, 21.0), (1.0, 22.0)]
    );
    assert!(frame.caption.contains("s1-eth2"));

    let proportion = controller.proportion().borrow().clone();
    let slices = &proportion.frame.unwrap().slices;
    assert_eq!(slices.len(), 5);
    assert!((slices[0].percent - 40.0).abs() < f64::EPSILON);

    let history = controller.history().borrow().clone();
    let frame = history.frame.unwrap();
    assert_eq!(frame.header[0], "s1-eth2");
    let times: Vec<_> = frame.rows.iter().map(|r| r.time.as_str()).collect();
    assert_eq!(times, ["12:00:02", "12:00:01", "12:00:00"]);
}

#[tokio::test]
async fn test_start_paints_immediately() {
    let (server, controller) = setup("1", "2").await;
    mount_device(&server, "s1-eth2", &[5.0, 6.0]).await;

    controller.start().await.unwrap();

    let mut rx = controller.history();
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| s.frame.is_some()))
        .await
        .unwrap()
        .unwrap();

    controller.shutdown().await;
}

#[tokio::test]
async fn test_repeated_refresh_is_idempotent() {
    let (server, controller) = setup("1", "2").await;
    mount_device(&server, "s1-eth2", &[5.0, 6.0]).await;

    controller.refresh_all().await.unwrap();
    let first_trend = controller.trend().borrow().frame.clone().unwrap();
    let first_history = controller.history().borrow().frame.clone().unwrap();

    controller.refresh_all().await.unwrap();
    let second_trend = controller.trend().borrow().frame.clone().unwrap();
    let second_history = controller.history().borrow().frame.clone().unwrap();

    assert_eq!(*first_trend, *second_trend);
    assert_eq!(*first_history, *second_history);
}

#[tokio::test]
async fn test_selection_change_triggers_refresh() {
    let (server, controller) = setup("1", "2").await;
    mount_device(&server, "s1-eth2", &[5.0, 6.0]).await;
    mount_device(&server, "s1-eth3", &[50.0]).await;

    controller.start().await.unwrap();
    let mut rx = controller.trend();
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| s.frame.is_some()))
        .await
        .unwrap()
        .unwrap();

    controller.selection().set_port("3");
    tokio::time::timeout(
        Duration::from_secs(2),
        rx.wait_for(|s| {
            s.frame
                .as_ref()
                .is_some_and(|f| f.device.to_string() == "s1-eth3")
        }),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(trend_bandwidth(&controller), Some(vec![(0.0, 60.0)]));
    controller.shutdown().await;
}

#[tokio::test]
async fn test_hover_refreshes_every_endpoint() {
    let server = MockServer::start().await;
    // Long enough that only the first tick and the hover issue fetches.
    let controller = controller_for(&server, "1", "2", |config| {
        config.poll_interval = Duration::from_secs(60);
    });
    mount_device(&server, "s1-eth2", &[5.0, 6.0]).await;

    controller.start().await.unwrap();
    let (mut trend, mut proportion, mut history) =
        (controller.trend(), controller.proportion(), controller.history());
    tokio::time::timeout(Duration::from_secs(2), async {
        trend.wait_for(|s| s.frame.is_some()).await.unwrap();
        proportion.wait_for(|s| s.frame.is_some()).await.unwrap();
        history.wait_for(|s| s.frame.is_some()).await.unwrap();
    })
    .await
    .unwrap();
    // Let the initial refreshes settle so the hover cannot join them.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(server.received_requests().await.unwrap().len(), 3);

    controller.hover(ViewKind::Trend).unwrap();
    let requests = wait_for_requests(&server, 6).await;

    for suffix in [
        "statistics/percentagelist/s1-eth2",
        "statistics/varietyproportion/s1-eth2",
        "deviceqoshistorylist/s1-eth2",
    ] {
        let expected = webgui_path(suffix);
        let hits = requests
            .iter()
            .filter(|r| r.url.path() == expected)
            .count();
        assert_eq!(hits, 2, "{expected}");
    }

    controller.shutdown().await;
}

// ── Concurrency ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_stale_result_is_discarded() {
    let (server, controller) = setup("1", "1").await;
    mount_json(
        &server,
        "statistics/percentagelist/s1-eth1",
        percentage_list(&[100.0]),
        Duration::from_millis(500),
    )
    .await;

    let slow = tokio::spawn({
        let controller = controller.clone();
        async move { controller.refresh(ViewKind::Trend).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Selection moves on before the slow response lands.
    controller.selection().set_port("2");

    assert_eq!(slow.await.unwrap().unwrap(), RefreshOutcome::Discarded);
    assert_eq!(trend_bandwidth(&controller), None);
}

#[tokio::test]
async fn test_device_change_cancels_in_flight_refresh() {
    let (server, controller) = setup("1", "1").await;
    mount_json(
        &server,
        "statistics/percentagelist/s1-eth1",
        percentage_list(&[100.0]),
        Duration::from_millis(500),
    )
    .await;
    mount_device(&server, "s1-eth2", &[5.0, 6.0]).await;

    let slow = tokio::spawn({
        let controller = controller.clone();
        async move { controller.refresh(ViewKind::Trend).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    controller.selection().set_port("2");
    let fresh = controller.refresh(ViewKind::Trend).await.unwrap();

    assert_eq!(fresh, RefreshOutcome::Applied);
    assert_eq!(slow.await.unwrap().unwrap(), RefreshOutcome::Cancelled);

    // Outlive the slow response; the newer frame must survive it.
    tokio::time::sleep(Duration::from_millis(600)).await;
    let surface = controller.trend().borrow().clone();
    assert_eq!(surface.device.unwrap().to_string(), "s1-eth2");
    assert_eq!(trend_bandwidth(&controller), Some(vec![(0.0, 15.0), (1.0, 16.0)]));
}

#[tokio::test]
async fn test_same_device_triggers_join_one_fetch() {
    let (server, controller) = setup("1", "2").await;
    Mock::given(method("GET"))
        .and(path(webgui_path("statistics/percentagelist/s1-eth2")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(percentage_list(&[5.0]))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (a, b) = tokio::join!(
        controller.refresh(ViewKind::Trend),
        controller.refresh(ViewKind::Trend)
    );

    assert_eq!(a.unwrap(), RefreshOutcome::Applied);
    assert_eq!(b.unwrap(), RefreshOutcome::Applied);
    server.verify().await;
}

// ── Failure handling ────────────────────────────────────────────────

#[tokio::test]
async fn test_failed_endpoint_keeps_last_good_frame() {
    let (server, controller) = setup("1", "2").await;
    mount_device(&server, "s1-eth2", &[5.0, 6.0]).await;
    controller.refresh_all().await.unwrap();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path(webgui_path("statistics/percentagelist/s1-eth2")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    mount_json(
        &server,
        "statistics/varietyproportion/s1-eth2",
        proportions(),
        Duration::ZERO,
    )
    .await;
    mount_json(&server, "deviceqoshistorylist/s1-eth2", history(), Duration::ZERO).await;

    let [trend, proportion, history] = controller.refresh_all().await.unwrap();
    assert!(matches!(
        trend,
        RefreshOutcome::Failed(FetchError::Status { status: 500, .. })
    ));
    assert_eq!(proportion, RefreshOutcome::Applied);
    assert_eq!(history, RefreshOutcome::Applied);

    let surface = controller.trend().borrow().clone();
    assert!(surface.error.is_some());
    assert_eq!(trend_bandwidth(&controller), Some(vec![(0.0, 15.0), (1.0, 16.0)]));
}

#[tokio::test]
async fn test_new_device_never_shows_old_frame() {
    let (server, controller) = setup("1", "2").await;
    mount_device(&server, "s1-eth2", &[5.0, 6.0]).await;
    controller.refresh(ViewKind::Trend).await.unwrap();

    controller.selection().set_port("9");
    let outcome = controller.refresh(ViewKind::Trend).await.unwrap();

    assert!(matches!(
        outcome,
        RefreshOutcome::Failed(FetchError::Status { status: 404, .. })
    ));
    let surface = controller.trend().borrow().clone();
    assert_eq!(surface.device.unwrap().to_string(), "s1-eth9");
    assert!(surface.frame.is_none());
}

#[tokio::test]
async fn test_ragged_series_are_malformed() {
    let (server, controller) = setup("1", "2").await;
    mount_json(
        &server,
        "statistics/percentagelist/s1-eth2",
        json!({ "bandwidth": [1, 2], "delay": [1], "jitter": [1, 2], "loss": [1, 2], "latency": [1, 2] }),
        Duration::ZERO,
    )
    .await;

    let outcome = controller.refresh(ViewKind::Trend).await.unwrap();
    assert!(matches!(
        outcome,
        RefreshOutcome::Failed(FetchError::Malformed { .. })
    ));
}

#[tokio::test]
async fn test_fetch_times_out() {
    let server = MockServer::start().await;
    let controller = controller_for(&server, "1", "2", |config| {
        config.fetch_timeout = Some(Duration::from_millis(100));
    });
    mount_json(
        &server,
        "deviceqoshistorylist/s1-eth2",
        history(),
        Duration::from_millis(600),
    )
    .await;

    let outcome = controller.refresh(ViewKind::History).await.unwrap();
    assert_eq!(
        outcome,
        RefreshOutcome::Failed(FetchError::Timeout { timeout_ms: 100 })
    );
}

#[tokio::test]
async fn test_incomplete_selection_skips_refresh() {
    let (server, controller) = setup("1", "").await;

    let outcome = controller.refresh(ViewKind::Trend).await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Skipped);
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_no_fetch_after_shutdown() {
    let server = MockServer::start().await;
    let controller = controller_for(&server, "1", "2", |config| {
        config.poll_interval = Duration::from_millis(100);
    });
    mount_device(&server, "s1-eth2", &[5.0, 6.0]).await;

    controller.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;
    controller.shutdown().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let issued = server.received_requests().await.unwrap().len();
    assert!(issued >= 3, "expected at least one full refresh, saw {issued}");

    controller.selection().set_port("3");
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(server.received_requests().await.unwrap().len(), issued);

    assert_eq!(
        controller.refresh(ViewKind::Trend).await,
        Err(CoreError::ShutDown)
    );
    assert_eq!(controller.hover(ViewKind::Trend), Err(CoreError::ShutDown));
    assert_eq!(controller.start().await, Err(CoreError::ShutDown));
}

#[tokio::test]
async fn test_port_ids_are_sorted() {
    let (server, controller) = setup("1", "2").await;
    Mock::given(method("GET"))
        .and(path(webgui_path("getportidlistbyswicthid/1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([10, 2, 1])))
        .mount(&server)
        .await;

    let ports = controller.port_ids("1").await.unwrap();
    assert_eq!(ports, ["1", "2", "10"]);
}
