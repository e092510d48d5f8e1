use std::time::Duration;

use redis::AsyncCommands;
use tinylink_cache::{LinkCache, RedisLinkCache};
use tinylink_core::Alias;
use tinylink_test_infra::redis::RedisServer;

/// Test fixture that manages a Redis container using test-infra.
struct Fixture {
    redis: RedisServer,
}

impl Fixture {
    async fn start() -> Self {
        let redis = RedisServer::new().await.expect("start redis");
        // Give the server a moment after the readiness line.
        tokio::time::sleep(Duration::from_millis(500)).await;
        Self { redis }
    }

    async fn connection(&self) -> redis::aio::MultiplexedConnection {
        self.redis.connection().await.expect("redis connection")
    }
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn get_set_round_trip() {
    let fixture = Fixture::start().await;
    let cache = RedisLinkCache::new(fixture.connection().await);
    let alias = Alias::new_unchecked("abcdefghij");

    assert!(cache.get_url(&alias).await.unwrap().is_none());

    cache.set_url(&alias, "https://example.com").await.unwrap();

    let cached = cache.get_url(&alias).await.unwrap();
    assert_eq!(cached.as_deref(), Some("https://example.com"));
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn entries_carry_the_configured_ttl() {
    let fixture = Fixture::start().await;
    let cache = RedisLinkCache::new(fixture.connection().await)
        .with_prefix("test:")
        .with_ttl(Some(Duration::from_secs(120)));
    let alias = Alias::new_unchecked("ttl0000000");

    cache.set_url(&alias, "https://example.com").await.unwrap();

    let mut conn = fixture.connection().await;
    let ttl: i64 = conn.ttl("test:ttl0000000").await.unwrap();
    assert!(ttl > 0 && ttl <= 120, "unexpected ttl {ttl}");
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn without_ttl_entries_persist() {
    let fixture = Fixture::start().await;
    let cache = RedisLinkCache::new(fixture.connection().await).with_ttl(None);
    let alias = Alias::new_unchecked("persist000");

    cache.set_url(&alias, "https://example.com").await.unwrap();

    let mut conn = fixture.connection().await;
    let ttl: i64 = conn.ttl("tl:link:persist000").await.unwrap();
    assert_eq!(ttl, -1);
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn short_ttl_expires() {
    let fixture = Fixture::start().await;
    let cache = RedisLinkCache::new(fixture.connection().await)
        .with_ttl(Some(Duration::from_secs(1)));
    let alias = Alias::new_unchecked("expire0000");

    cache.set_url(&alias, "https://example.com").await.unwrap();
    tokio::time::sleep(Duration::from_millis(2100)).await;

    assert!(cache.get_url(&alias).await.unwrap().is_none());
}
