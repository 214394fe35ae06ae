//! End-to-end simulation runs.
//!
//! Replays scripted price sequences through a live worker loop and checks
//! the resulting status and log against the buy/hold/sell rules.

use std::sync::Arc;
use std::time::Duration;

use tradebot::engine::worker::WorkerSettings;

use crate::mock_feed::{controller, failure, fast_settings, wait_until, within, ScriptedFeed, WhenExhausted};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn btcusdt_buy_hold_sell() {
    let feed = Arc::new(ScriptedFeed::prices(&[100.0, 100.5, 101.2]));
    let ctl = controller(Arc::clone(&feed), fast_settings());

    ctl.start(1.0).unwrap();
    let sold = wait_until(Duration::from_secs(2), || {
        ctl.status().buy_price.is_none() && ctl.logs().iter().any(|l| l.contains("Simulated sell"))
    })
    .await;
    assert!(sold);

    // Script is exhausted: the worker is retrying and the state is frozen.
    let status = ctl.status();
    assert!(status.running);
    assert_eq!(status.buy_price, None);
    assert_eq!(status.last_price, Some(101.2));

    within(ctl.shutdown()).await;

    let logs = ctl.logs();
    let decisions: Vec<&String> = logs
        .iter()
        .filter(|l| l.contains("Simulated") || l.contains("Monitoring"))
        .collect();
    assert_eq!(decisions.len(), 3);
    assert!(decisions[0].contains("Simulated buy: bought BTCUSDT at $100.00"));
    assert!(decisions[1].contains("current price: $100.50"));
    assert!(decisions[1].contains("target sell price: $101.00"));
    assert!(decisions[2].contains("Simulated sell: sold BTCUSDT at $101.20, profit $1.20"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn resumes_after_fetch_failures() {
    let feed = Arc::new(ScriptedFeed::new(
        vec![
            Ok(200.0),
            failure("BTCUSDT"),
            failure("BTCUSDT"),
            failure("BTCUSDT"),
            Ok(203.0),
        ],
        WhenExhausted::Fail,
    ));
    let ctl = controller(Arc::clone(&feed), fast_settings());

    ctl.start(1.0).unwrap();

    let sold = wait_until(Duration::from_secs(2), || {
        ctl.logs().iter().any(|l| l.contains("Simulated sell"))
    })
    .await;
    assert!(sold);
    assert_eq!(ctl.status().last_price, Some(203.0));

    within(ctl.shutdown()).await;

    let logs = ctl.logs();
    let buy = logs.iter().position(|l| l.contains("Simulated buy")).unwrap();
    let sell = logs.iter().position(|l| l.contains("Simulated sell")).unwrap();
    let outages = logs[buy..sell]
        .iter()
        .filter(|l| l.contains("Error: failed to fetch BTCUSDT price: simulated outage"))
        .count();
    assert_eq!(outages, 3);
    assert!(logs[sell].contains("profit $3.00"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn outage_from_the_start_leaves_status_untouched() {
    let feed = Arc::new(ScriptedFeed::new(Vec::new(), WhenExhausted::Fail));
    let ctl = controller(Arc::clone(&feed), fast_settings());

    ctl.start(1.0).unwrap();
    assert!(wait_until(Duration::from_secs(2), || feed.calls() >= 5).await);

    let status = ctl.status();
    assert!(status.running);
    assert_eq!(status.buy_price, None);
    assert_eq!(status.last_price, None);

    within(ctl.shutdown()).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn non_positive_target_trades_every_other_tick() {
    let feed = Arc::new(ScriptedFeed::prices(&[100.0, 95.0, 96.0, 90.0]));
    let ctl = controller(
        Arc::clone(&feed),
        WorkerSettings {
            poll_interval: Duration::from_millis(5),
            retry_interval: Duration::from_millis(5),
        },
    );

    ctl.start(-10.0).unwrap();
    let done = wait_until(Duration::from_secs(2), || {
        ctl.logs().iter().filter(|l| l.contains("Simulated sell")).count() == 2
    })
    .await;
    assert!(done);
    within(ctl.shutdown()).await;

    let logs = ctl.logs();
    let sells: Vec<&String> = logs.iter().filter(|l| l.contains("Simulated sell")).collect();
    assert!(sells[0].contains("profit $-5.00"));
    assert!(sells[1].contains("profit $-6.00"));
    assert_eq!(ctl.status().buy_price, None);
}
