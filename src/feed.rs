//! Points Feed
//!
//! Generates random points awards and forwards them to the backend's ingest
//! endpoint, so a leaderboard has something to show during development.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use uuid::Uuid;

use crate::api::{IngestRequest, TotalsClient};
use crate::config::FeedConfig;
use crate::teams::TEAMS;

/// Feed pacing and length
#[derive(Debug, Clone)]
pub struct FeedOptions {
    /// Stop after this many attempts; run forever when `None`
    pub count: Option<u64>,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub retry_delay: Duration,
    pub request_timeout: Duration,
}

impl FeedOptions {
    pub fn from_config(config: &FeedConfig, count: Option<u64>) -> Self {
        Self {
            count,
            min_delay: Duration::from_millis(config.min_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

/// Outcome counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub sent: u64,
    pub failed: u64,
}

/// One random award: random team, 1..=100 points, stamped now
pub fn generate_record<R: Rng>(rng: &mut R) -> IngestRequest {
    let team = TEAMS.choose(rng).unwrap_or(&TEAMS[0]);

    IngestRequest {
        id: Uuid::new_v4().to_string(),
        category: team.name.to_string(),
        points: rng.gen_range(1..=100),
        timestamp: Utc::now().to_rfc3339(),
    }
}

/// Uniform delay in `[min, max]`
pub fn next_delay<R: Rng>(rng: &mut R, min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Send records until `count` attempts have been made (or forever).
/// A count of zero sends nothing.
pub async fn run(client: &TotalsClient, options: &FeedOptions) -> FeedStats {
    let mut rng = StdRng::from_entropy();
    let mut stats = FeedStats::default();
    let mut attempts = 0u64;

    while options.count.map_or(true, |count| attempts < count) {
        let record = generate_record(&mut rng);

        match client.ingest(&record, options.request_timeout).await {
            Ok(status) => {
                tracing::info!("sent {} {} -> {}", record.category, record.points, status);
                stats.sent += 1;
            }
            Err(e) => {
                tracing::warn!("failed to send: {}", e);
                stats.failed += 1;
                tokio::time::sleep(options.retry_delay).await;
            }
        }

        attempts += 1;
        if options.count.is_some_and(|count| attempts >= count) {
            break;
        }

        tokio::time::sleep(next_delay(&mut rng, options.min_delay, options.max_delay)).await;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use std::sync::{Arc, Mutex};

    fn quick(count: u64) -> FeedOptions {
        FeedOptions {
            count: Some(count),
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            retry_delay: Duration::ZERO,
            request_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_generate_record() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let record = generate_record(&mut rng);
            assert!(TEAMS.iter().any(|t| t.name == record.category));
            assert!((1..=100).contains(&record.points));
            assert!(chrono::DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
            assert!(Uuid::parse_str(&record.id).is_ok());
        }
    }

    #[test]
    fn test_next_delay_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let min = Duration::from_millis(500);
        let max = Duration::from_millis(2000);
        for _ in 0..100 {
            let delay = next_delay(&mut rng, min, max);
            assert!(delay >= min && delay <= max);
        }
        assert_eq!(next_delay(&mut rng, max, min), max);
    }

    #[test]
    fn test_options_from_config() {
        let options = FeedOptions::from_config(&FeedConfig::default(), Some(3));
        assert_eq!(options.min_delay, Duration::from_millis(500));
        assert_eq!(options.max_delay, Duration::from_secs(2));
        assert_eq!(options.request_timeout, Duration::from_secs(5));
        assert_eq!(options.count, Some(3));
    }

    #[tokio::test]
    async fn test_run_posts_records() {
        let received = Arc::new(Mutex::new(Vec::<IngestRequest>::new()));
        let sink = Arc::clone(&received);
        let router = Router::new().route(
            "/api/ingest",
            post(move |Json(body): Json<IngestRequest>| {
                let sink = Arc::clone(&sink);
                async move {
                    sink.lock().unwrap().push(body);
                    StatusCode::CREATED
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = TotalsClient::new(format!("http://{}", addr));
        let stats = run(&client, &quick(3)).await;

        assert_eq!(stats, FeedStats { sent: 3, failed: 0 });
        let received = received.lock().unwrap();
        assert_eq!(received.len(), 3);
        assert_ne!(received[0].id, received[1].id);
    }

    #[tokio::test]
    async fn test_run_zero_count_sends_nothing() {
        let received = Arc::new(Mutex::new(0usize));
        let hits = Arc::clone(&received);
        let router = Router::new().route(
            "/api/ingest",
            post(move || {
                let hits = Arc::clone(&hits);
                async move {
                    *hits.lock().unwrap() += 1;
                    StatusCode::CREATED
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = TotalsClient::new(format!("http://{}", addr));
        let stats = run(&client, &quick(0)).await;

        assert_eq!(stats, FeedStats::default());
        assert_eq!(*received.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_run_counts_failures() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = TotalsClient::new(format!("http://{}", addr));
        let stats = run(&client, &quick(2)).await;
        assert_eq!(stats, FeedStats { sent: 0, failed: 2 });
    }
}
