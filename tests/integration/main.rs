//! Integration tests: the controller and worker running for real on a
//! tokio runtime, driven by a scripted in-memory price feed.

mod mock_feed;
mod simulation;
