//! End-to-end claim flow: challenges, signatures, windows and queries.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use star_registry::core::{CoreError, Ed25519Verifier, SignatureVerifier};
use star_registry::{Registry, RegistryConfig, RegistryError};
use star_registry_testkit::{
    garbage_payload, manual_ledger, multi_party_fixtures, ManualClock, TestFixture,
};

const T0: i64 = 1_700_000_000;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn registry_at(now: i64) -> (Registry, Arc<ManualClock>) {
    init_tracing();
    let clock = Arc::new(ManualClock::new(now));
    let ledger = manual_ledger(clock.clone());
    let registry = Registry::with_parts(ledger, Ed25519Verifier, RegistryConfig::default());
    (registry, clock)
}

#[tokio::test]
async fn fresh_registry_holds_only_genesis() -> anyhow::Result<()> {
    let (registry, _clock) = registry_at(T0);

    assert_eq!(registry.height().await, 0);
    let genesis = registry.find_by_position(0).await?;
    assert!(genesis.previous_digest.is_none());
    assert_eq!(genesis.created_at, T0);
    assert_eq!(genesis.payload.as_ref(), b"Genesis Block");
    Ok(())
}

#[tokio::test]
async fn challenge_format() {
    let (registry, _clock) = registry_at(T0);
    assert_eq!(
        registry.issue_challenge("addr1").await,
        "addr1:1700000000:starRegistry"
    );
}

#[tokio::test]
async fn accepted_claim_is_recorded() -> anyhow::Result<()> {
    let (registry, clock) = registry_at(T0);
    let fixture = TestFixture::new();
    let address = fixture.address();

    let message = registry.issue_challenge(&address).await;
    let signature = fixture.sign(&message);
    clock.advance(10);

    let star = json!({"name": "Vega", "ra": "18h 36m", "dec": "+38d"});
    let block = registry
        .accept_claim(&address, &message, &signature, star.clone())
        .await?;

    assert_eq!(registry.height().await, 1);
    assert_eq!(block.position, 1);
    assert_eq!(block.created_at, T0 + 10);

    let genesis = registry.find_by_position(0).await?;
    assert_eq!(block.previous_digest, Some(genesis.digest));

    let claim = registry.decode_claim(1).await?;
    assert_eq!(claim.address, address);
    assert_eq!(claim.message, message);
    assert_eq!(claim.signature, signature);
    assert_eq!(claim.star, star);
    Ok(())
}

#[tokio::test]
async fn window_boundary() -> anyhow::Result<()> {
    let (registry, clock) = registry_at(T0);
    let fixture = TestFixture::new();
    let address = fixture.address();
    let (message, signature) = fixture.signed_challenge_at(T0);

    clock.set(T0 + 300);
    let late = registry
        .accept_claim(&address, &message, &signature, json!({}))
        .await;
    assert!(matches!(
        late,
        Err(RegistryError::ChallengeExpired { elapsed: 300, window: 300 })
    ));
    assert_eq!(registry.height().await, 0);

    clock.set(T0 + 299);
    registry
        .accept_claim(&address, &message, &signature, json!({}))
        .await?;
    assert_eq!(registry.height().await, 1);
    Ok(())
}

#[tokio::test]
async fn configured_window_is_honoured() {
    init_tracing();
    let clock = Arc::new(ManualClock::new(T0));
    let registry = Registry::with_parts(
        manual_ledger(clock.clone()),
        Ed25519Verifier,
        RegistryConfig::default().with_challenge_window(Duration::from_secs(30)),
    );
    let fixture = TestFixture::new();
    let (message, signature) = fixture.signed_challenge_at(T0);

    clock.advance(30);
    let result = registry
        .accept_claim(&fixture.address(), &message, &signature, json!({}))
        .await;
    assert!(matches!(result, Err(RegistryError::ChallengeExpired { .. })));
}

#[tokio::test]
async fn future_challenge_is_malformed() {
    let (registry, _clock) = registry_at(T0);
    let fixture = TestFixture::new();
    let (message, signature) = fixture.signed_challenge_at(T0 + 60);

    let result = registry
        .accept_claim(&fixture.address(), &message, &signature, json!({}))
        .await;
    assert!(matches!(result, Err(RegistryError::MalformedChallenge(_))));
}

#[tokio::test]
async fn out_of_range_timestamp_is_malformed() {
    let (registry, _clock) = registry_at(T0);
    let fixture = TestFixture::new();

    for issued_at in [i64::MIN, i64::MIN + 1, -i64::MAX] {
        let (message, signature) = fixture.signed_challenge_at(issued_at);
        let result = registry
            .accept_claim(&fixture.address(), &message, &signature, json!({}))
            .await;
        assert!(
            matches!(result, Err(RegistryError::MalformedChallenge(_))),
            "{issued_at}: {result:?}"
        );
    }
    assert_eq!(registry.height().await, 0);
}

#[tokio::test]
async fn tag_containing_colon_round_trips() -> anyhow::Result<()> {
    init_tracing();
    let clock = Arc::new(ManualClock::new(T0));
    let registry = Registry::with_parts(
        manual_ledger(clock.clone()),
        Ed25519Verifier,
        RegistryConfig::default().with_protocol_tag("star:Registry"),
    );
    let fixture = TestFixture::new();
    let address = fixture.address();

    let message = registry.issue_challenge(&address).await;
    assert_eq!(message, format!("{address}:{T0}:star:Registry"));
    let signature = fixture.sign(&message);
    registry
        .accept_claim(&address, &message, &signature, json!({}))
        .await?;
    assert_eq!(registry.height().await, 1);
    Ok(())
}

#[tokio::test]
async fn sub_second_window_admits_same_second_claim() -> anyhow::Result<()> {
    init_tracing();
    let clock = Arc::new(ManualClock::new(T0));
    let registry = Registry::with_parts(
        manual_ledger(clock.clone()),
        Ed25519Verifier,
        RegistryConfig::default().with_challenge_window(Duration::from_millis(500)),
    );
    let fixture = TestFixture::new();
    let (message, signature) = fixture.signed_challenge_at(T0);

    registry
        .accept_claim(&fixture.address(), &message, &signature, json!({}))
        .await?;

    clock.advance(1);
    let (message, signature) = fixture.signed_challenge_at(T0);
    let late = registry
        .accept_claim(&fixture.address(), &message, &signature, json!({}))
        .await;
    assert!(matches!(late, Err(RegistryError::ChallengeExpired { .. })));
    Ok(())
}

/// A verifier whose answer never arrives.
struct StalledVerifier;

#[async_trait]
impl SignatureVerifier for StalledVerifier {
    async fn verify(
        &self,
        _message: &str,
        _address: &str,
        _signature: &str,
    ) -> Result<bool, CoreError> {
        std::future::pending::<Result<bool, CoreError>>().await
    }
}

#[tokio::test]
async fn cancelled_claim_publishes_nothing() -> anyhow::Result<()> {
    init_tracing();
    let clock = Arc::new(ManualClock::new(T0));
    let ledger = manual_ledger(clock.clone());
    let registry =
        Registry::with_parts(Arc::clone(&ledger), StalledVerifier, RegistryConfig::default());
    let fixture = TestFixture::new();
    let (message, signature) = fixture.signed_challenge_at(T0);

    let before: Vec<_> = ledger.snapshot().await.iter().map(|b| b.digest).collect();

    let address = fixture.address();
    let claim = registry.accept_claim(&address, &message, &signature, json!({}));
    let outcome = tokio::time::timeout(Duration::from_millis(50), claim).await;
    assert!(outcome.is_err());

    assert_eq!(registry.height().await, 0);
    let after: Vec<_> = ledger.snapshot().await.iter().map(|b| b.digest).collect();
    assert_eq!(after, before);

    let next = ledger.append(b"after".to_vec()).await?;
    assert_eq!(next.position, 1);
    assert_eq!(next.previous_digest, Some(before[0]));
    Ok(())
}

#[tokio::test]
async fn bad_signatures_append_nothing() {
    let (registry, _clock) = registry_at(T0);
    let alice = TestFixture::with_seed([0xa1; 32]);
    let mallory = TestFixture::with_seed([0x66; 32]);
    let address = alice.address();
    let message = registry.issue_challenge(&address).await;

    let cases = [
        ("signed by another key", mallory.sign(&message)),
        ("signed over another message", alice.sign("something else")),
        ("not hex", "zz".repeat(64)),
        ("wrong length", "ab".repeat(10)),
        ("empty", String::new()),
    ];
    for (label, signature) in cases {
        let result = registry
            .accept_claim(&address, &message, &signature, json!({}))
            .await;
        assert!(
            matches!(result, Err(RegistryError::InvalidSignature)),
            "{label}: {result:?}"
        );
    }
    assert_eq!(registry.height().await, 0);
}

#[tokio::test]
async fn unparseable_address_is_invalid_signature() {
    let (registry, _clock) = registry_at(T0);
    let fixture = TestFixture::new();
    let message = registry.issue_challenge("not-a-key").await;
    let signature = fixture.sign(&message);

    let result = registry
        .accept_claim("not-a-key", &message, &signature, json!({}))
        .await;
    assert!(matches!(result, Err(RegistryError::InvalidSignature)));
}

#[tokio::test]
async fn find_by_address_in_position_order() -> anyhow::Result<()> {
    let (registry, clock) = registry_at(T0);
    let parties = multi_party_fixtures(2);
    let (alice, bob) = (&parties[0], &parties[1]);

    for (fixture, name) in [(alice, "Sirius"), (bob, "Rigel"), (alice, "Deneb")] {
        let (message, signature) = fixture.signed_challenge_at(clock.now());
        registry
            .accept_claim(&fixture.address(), &message, &signature, json!({ "name": name }))
            .await?;
        clock.advance(1);
    }

    let stars = registry.find_by_address(&alice.address()).await?;
    let names: Vec<_> = stars.iter().map(|r| r.star["name"].clone()).collect();
    assert_eq!(names, vec![json!("Sirius"), json!("Deneb")]);
    assert!(stars.iter().all(|r| r.address == alice.address()));

    assert_eq!(registry.find_by_address(&bob.address()).await?.len(), 1);
    assert!(registry.find_by_address("nobody").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn undecodable_payload_is_skipped() -> anyhow::Result<()> {
    let (registry, clock) = registry_at(T0);
    let fixture = TestFixture::new();

    let (message, signature) = fixture.signed_challenge_at(clock.now());
    registry
        .accept_claim(&fixture.address(), &message, &signature, json!({"n": 1}))
        .await?;
    registry.ledger().append(garbage_payload()).await?;
    let (message, signature) = fixture.signed_challenge_at(clock.now());
    registry
        .accept_claim(&fixture.address(), &message, &signature, json!({"n": 3}))
        .await?;

    let scan = registry.scan_address(&fixture.address()).await?;
    assert_eq!(scan.records.len(), 2);
    assert_eq!(scan.skipped.len(), 1);
    assert_eq!(scan.skipped[0].position, 2);

    assert!(matches!(
        registry.decode_claim(2).await,
        Err(RegistryError::MalformedPayload { position: 2, .. })
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_claims_form_one_chain() -> anyhow::Result<()> {
    let (registry, clock) = registry_at(T0);
    let registry = Arc::new(registry);
    let parties = multi_party_fixtures(16);

    let mut handles = Vec::new();
    for fixture in parties {
        let registry = Arc::clone(&registry);
        let (message, signature) = fixture.signed_challenge_at(clock.now());
        handles.push(tokio::spawn(async move {
            registry
                .accept_claim(&fixture.address(), &message, &signature, json!({}))
                .await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    assert_eq!(registry.height().await, 16);
    let blocks = registry.blocks(0, 16).await;
    for pair in blocks.windows(2) {
        assert_eq!(pair[1].previous_digest, Some(pair[0].digest));
        assert_eq!(pair[1].position, pair[0].position + 1);
    }
    assert!(registry.audit().await?.is_consistent());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn scan_during_appends_sees_a_prefix() -> anyhow::Result<()> {
    let (registry, clock) = registry_at(T0);
    let registry = Arc::new(registry);
    let fixture = Arc::new(TestFixture::with_seed([0x33; 32]));

    let writer = {
        let registry = Arc::clone(&registry);
        let fixture = Arc::clone(&fixture);
        let now = clock.now();
        tokio::spawn(async move {
            for i in 0..20 {
                let (message, signature) = fixture.signed_challenge_at(now);
                registry
                    .accept_claim(&fixture.address(), &message, &signature, json!({ "i": i }))
                    .await?;
            }
            Ok::<_, RegistryError>(())
        })
    };

    for _ in 0..10 {
        let scan = registry.scan_address(&fixture.address()).await?;
        assert!(scan.skipped.is_empty());
        for (i, record) in scan.records.iter().enumerate() {
            assert_eq!(record.star["i"], json!(i));
        }
        tokio::task::yield_now().await;
    }

    writer.await??;
    assert_eq!(registry.find_by_address(&fixture.address()).await?.len(), 20);
    Ok(())
}
