use std::sync::Arc;
use std::time::Duration;

use content::{ContentKind, TopicPicker};
use scheduler::{
    RetryPolicy, SchedulerConfig, SchedulerError, SessionNotice, SessionScheduler, StartOutcome,
    StopOutcome,
};
use session::{SessionKey, SessionTiming};
use tokio::time::{Instant, sleep};

use mock::{RecordingSink, ScriptedSupplier};

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

fn key(k: &str) -> SessionKey {
    SessionKey::from(k)
}

fn cfg() -> SchedulerConfig {
    SchedulerConfig {
        flashcard: SessionTiming::from_secs(30, 600),
        interview: SessionTiming::from_secs(20, 900),
        retry: RetryPolicy::new(3, secs(2)),
    }
}

fn topics() -> TopicPicker {
    TopicPicker::new(["networking", "Linux administration", "printers"]).unwrap()
}

fn make_scheduler(
    supplier: Arc<ScriptedSupplier>,
    sink: Arc<RecordingSink>,
) -> SessionScheduler {
    SessionScheduler::new(cfg(), supplier, sink, topics()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn ten_minute_session_delivers_twenty_units() {
    let sink = RecordingSink::new();
    let sched = make_scheduler(ScriptedSupplier::ok(), sink.clone());

    let outcome = sched.start(key("u1"), ContentKind::Flashcard);
    assert!(outcome.is_started());

    sleep(secs(700)).await;

    assert_eq!(sink.count_for(&key("u1")).await, 20);
    assert_eq!(
        sink.notices().await,
        vec![(
            key("u1"),
            SessionNotice::DeadlineReached {
                kind: ContentKind::Flashcard,
                delivered: 20,
            }
        )]
    );
    assert!(!sched.is_running(&key("u1")));
}

#[tokio::test(start_paused = true)]
async fn deadline_notice_arrives_on_time() {
    let sink = RecordingSink::new();
    let sched = make_scheduler(ScriptedSupplier::ok(), sink.clone());

    sched.start(key("u1"), ContentKind::Flashcard);

    sleep(secs(599)).await;
    assert!(sched.is_running(&key("u1")));
    assert!(sink.notices().await.is_empty());

    sleep(secs(2)).await;
    assert!(!sched.is_running(&key("u1")));
    assert_eq!(sink.notices().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn deliveries_are_ordered_and_spaced_by_interval() {
    let sink = RecordingSink::new();
    let sched = make_scheduler(ScriptedSupplier::ok(), sink.clone());

    sched.start(key("u1"), ContentKind::Flashcard);
    sleep(secs(200)).await;

    let got = sink.delivered().await;
    assert_eq!(got.len(), 7); // 0, 30, ..., 180

    for pair in got.windows(2) {
        assert_eq!(pair[1].at - pair[0].at, secs(30));
    }

    // Tick n is fully delivered before tick n+1 generates.
    let numbers: Vec<String> = got.iter().map(|d| d.unit.question.clone()).collect();
    for (i, q) in numbers.iter().enumerate() {
        assert!(q.starts_with(&format!("flashcard question #{} ", i + 1)), "{q}");
    }
}

#[tokio::test(start_paused = true)]
async fn second_start_is_rejected_while_running() {
    let sink = RecordingSink::new();
    let sched = make_scheduler(ScriptedSupplier::ok(), sink.clone());

    let first = sched.start(key("u1"), ContentKind::Flashcard);
    let second = sched.start(key("u1"), ContentKind::Interview);

    assert!(first.is_started());
    assert_eq!(
        second,
        StartOutcome::AlreadyActive {
            kind: ContentKind::Flashcard
        }
    );

    sleep(secs(65)).await;

    // One loop only: ticks at 0, 30, 60.
    assert_eq!(sink.count_for(&key("u1")).await, 3);
    assert_eq!(sched.registry().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_then_start_creates_a_new_session() {
    let sched = make_scheduler(ScriptedSupplier::ok(), RecordingSink::new());

    let StartOutcome::Started { session_id: first, .. } =
        sched.start(key("u1"), ContentKind::Flashcard)
    else {
        panic!("first start must succeed");
    };

    assert!(!sched.start(key("u1"), ContentKind::Flashcard).is_started());
    assert_eq!(
        sched.stop(&key("u1")),
        StopOutcome::Stopped {
            kind: ContentKind::Flashcard
        }
    );

    let StartOutcome::Started { session_id: second, .. } =
        sched.start(key("u1"), ContentKind::Flashcard)
    else {
        panic!("restart must succeed");
    };

    assert_ne!(first, second);
}

#[tokio::test(start_paused = true)]
async fn stop_halts_further_deliveries() {
    let sink = RecordingSink::new();
    let sched = make_scheduler(ScriptedSupplier::ok(), sink.clone());

    sched.start(key("u1"), ContentKind::Flashcard);
    sleep(secs(65)).await;
    assert_eq!(sink.count_for(&key("u1")).await, 3);

    sched.stop(&key("u1"));
    sleep(secs(600)).await;

    assert_eq!(sink.count_for(&key("u1")).await, 3);
    assert!(sink.notices().await.is_empty());
    assert!(!sched.is_running(&key("u1")));
}

#[tokio::test(start_paused = true)]
async fn stop_during_retry_backoff_lets_the_tick_finish() {
    let supplier = ScriptedSupplier::failing_first(2);
    let sink = RecordingSink::new();
    let sched = make_scheduler(supplier.clone(), sink.clone());
    let t0 = Instant::now();

    sched.start(key("u1"), ContentKind::Flashcard);
    sleep(secs(1)).await; // first attempt failed, backing off until t=2

    assert!(matches!(sched.stop(&key("u1")), StopOutcome::Stopped { .. }));
    assert!(!sched.is_running(&key("u1")));
    sleep(secs(600)).await;

    let got = sink.delivered().await;
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].at.duration_since(t0), secs(4));
    assert!(!got[0].unit.is_placeholder());
    assert_eq!(supplier.calls(), 3);
    assert!(sink.notices().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancelling_a_snapshot_token_does_not_orphan_the_session() {
    let sink = RecordingSink::new();
    let sched = make_scheduler(ScriptedSupplier::ok(), sink.clone());

    sched.start(key("u1"), ContentKind::Flashcard);
    sched.session(&key("u1")).unwrap().cancellation().cancel();

    sleep(secs(700)).await;

    assert_eq!(sink.count_for(&key("u1")).await, 20);
    assert_eq!(sink.notices().await.len(), 1);
    assert!(!sched.is_running(&key("u1")));
    assert!(sched.start(key("u1"), ContentKind::Flashcard).is_started());
}

#[tokio::test(start_paused = true)]
async fn stopping_an_idle_key_is_a_no_op() {
    let sched = make_scheduler(ScriptedSupplier::ok(), RecordingSink::new());

    assert_eq!(sched.stop(&key("nobody")), StopOutcome::NotActive);

    sched.start(key("u1"), ContentKind::Flashcard);
    assert!(matches!(sched.stop(&key("u1")), StopOutcome::Stopped { .. }));
    assert_eq!(sched.stop(&key("u1")), StopOutcome::NotActive);
}

#[tokio::test(start_paused = true)]
async fn quick_restart_never_runs_two_loops() {
    let sink = RecordingSink::new();
    let sched = make_scheduler(ScriptedSupplier::ok(), sink.clone());
    let t0 = Instant::now();

    sched.start(key("u1"), ContentKind::Flashcard);
    sleep(secs(10)).await; // old loop delivered at t=0 and sleeps until t=30

    sched.stop(&key("u1"));
    sched.start(key("u1"), ContentKind::Flashcard);
    sleep(secs(35)).await; // new loop delivers at t=10 and t=40

    let times: Vec<u64> = sink
        .delivered()
        .await
        .iter()
        .map(|d| d.at.duration_since(t0).as_secs())
        .collect();

    assert_eq!(times, vec![0, 10, 40]);
}

#[tokio::test(start_paused = true)]
async fn delivery_failures_do_not_end_the_session() {
    let sink = RecordingSink::failing();
    let sched = make_scheduler(ScriptedSupplier::ok(), sink.clone());

    sched.start(key("u1"), ContentKind::Flashcard);
    sleep(secs(700)).await;

    // Every tick was attempted even though none got through.
    assert_eq!(sink.count_for(&key("u1")).await, 20);
    assert_eq!(
        sink.notices().await,
        vec![(
            key("u1"),
            SessionNotice::DeadlineReached {
                kind: ContentKind::Flashcard,
                delivered: 0,
            }
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn failing_supplier_degrades_to_placeholders() {
    let supplier = ScriptedSupplier::always_failing();
    let sink = RecordingSink::new();
    let sched = make_scheduler(supplier.clone(), sink.clone());

    let outcome = sched
        .start_with(
            key("u1"),
            ContentKind::Flashcard,
            SessionTiming::from_secs(30, 120),
        )
        .unwrap();
    assert!(outcome.is_started());

    sleep(secs(200)).await;

    // Each tick burns 4s on retries: ticks start at 0, 34, 68, 102.
    let got = sink.delivered().await;
    assert_eq!(got.len(), 4);
    assert!(got.iter().all(|d| d.unit.is_placeholder()));
    assert_eq!(supplier.calls(), 12);
    assert_eq!(sink.notices().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn topics_come_from_the_configured_set() {
    let supplier = ScriptedSupplier::ok();
    let sched = make_scheduler(supplier.clone(), RecordingSink::new());

    sched.start(key("u1"), ContentKind::Interview);
    sleep(secs(290)).await;

    let picked = supplier.topics.lock().await.clone();
    assert_eq!(picked.len(), 15); // every 20s: 0, 20, ..., 280
    let allowed = topics();
    assert!(picked.iter().all(|t| allowed.topics().contains(t)));
}

#[tokio::test(start_paused = true)]
async fn sessions_for_different_keys_are_independent() {
    let sink = RecordingSink::new();
    let sched = make_scheduler(ScriptedSupplier::ok(), sink.clone());

    sched.start(key("a"), ContentKind::Flashcard);
    sleep(secs(15)).await;
    sched.start(key("b"), ContentKind::Interview);
    sleep(secs(50)).await; // t = 65

    assert_eq!(sink.count_for(&key("a")).await, 3); // 0, 30, 60
    assert_eq!(sink.count_for(&key("b")).await, 3); // 15, 35, 55

    sched.stop(&key("a"));
    sleep(secs(20)).await; // t = 85

    assert_eq!(sink.count_for(&key("a")).await, 3);
    assert_eq!(sink.count_for(&key("b")).await, 4); // + 75
    assert!(sched.is_running(&key("b")));
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_everything() {
    let sink = RecordingSink::new();
    let sched = make_scheduler(ScriptedSupplier::ok(), sink.clone());

    sched.start(key("a"), ContentKind::Flashcard);
    sched.start(key("b"), ContentKind::Interview);
    sleep(secs(5)).await;

    assert_eq!(sched.shutdown(), 2);
    sleep(secs(600)).await;

    assert_eq!(sink.delivered().await.len(), 2);
    assert!(sink.notices().await.is_empty());
    assert!(sched.registry().is_empty());
}

#[tokio::test(start_paused = true)]
async fn session_snapshot_exposes_timing() {
    let sched = make_scheduler(ScriptedSupplier::ok(), RecordingSink::new());

    sched.start(key("u1"), ContentKind::Interview);
    let s = sched.session(&key("u1")).unwrap();

    assert_eq!(s.kind, ContentKind::Interview);
    assert_eq!(s.timing, SessionTiming::from_secs(20, 900));
}

#[test]
fn invalid_timing_is_rejected() {
    let mut bad = cfg();
    bad.flashcard.interval = Duration::ZERO;

    let err = SessionScheduler::new(
        bad,
        ScriptedSupplier::ok(),
        RecordingSink::new(),
        topics(),
    )
    .err();

    assert_eq!(
        err,
        Some(SchedulerError::ZeroInterval {
            kind: ContentKind::Flashcard
        })
    );
}

#[tokio::test(start_paused = true)]
async fn start_with_rejects_zero_deadline() {
    let sched = make_scheduler(ScriptedSupplier::ok(), RecordingSink::new());

    let err = sched
        .start_with(
            key("u1"),
            ContentKind::Interview,
            SessionTiming::new(secs(10), Duration::ZERO),
        )
        .unwrap_err();

    assert_eq!(
        err,
        SchedulerError::ZeroDeadline {
            kind: ContentKind::Interview
        }
    );
    assert!(!sched.is_running(&key("u1")));
}
