//! End-to-end tests: ingest diagrams, persist counts, rebuild the chain,
//! and simulate sequences - including the close-and-reopen durability path
//! that in-memory stores cannot cover.

use skyline_lib::{
    FrequencyStore, Sampler, ServiceCatalog, TransitionChain, observe_diagram, report,
};
use tempfile::TempDir;

const DIAGRAM: &str = "graph TD\n    ec2:Amazon EC2 --> s3:Amazon S3\n    ec2:Amazon EC2 --> lambda:AWS Lambda\n    lambda:AWS Lambda --> dynamodb:Amazon DynamoDB\n";

#[tokio::test]
async fn counts_survive_store_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("usage.db");
    let catalog = ServiceCatalog::builtin();

    {
        let store = FrequencyStore::connect(&db_path).await.unwrap();
        observe_diagram(&store, &catalog, DIAGRAM).await.unwrap();
        store.increment("lambda").await.unwrap();
        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.get("ec2"), Some(&2));
        assert_eq!(snapshot.get("lambda"), Some(&3));
    }

    // Reopen from the same path: every committed increment is still there.
    let store = FrequencyStore::connect(&db_path).await.unwrap();
    let snapshot = store.snapshot().await.unwrap();
    assert_eq!(snapshot.get("ec2"), Some(&2));
    assert_eq!(snapshot.get("s3"), Some(&1));
    assert_eq!(snapshot.get("lambda"), Some(&3));
    assert_eq!(snapshot.get("dynamodb"), Some(&1));
}

#[tokio::test]
async fn counts_accumulate_across_reopens() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("usage.db");

    for _ in 0..3 {
        let store = FrequencyStore::connect(&db_path).await.unwrap();
        store.increment("sqs").await.unwrap();
    }

    let store = FrequencyStore::connect(&db_path).await.unwrap();
    assert_eq!(store.count("sqs").await.unwrap(), Some(3));
}

#[tokio::test]
async fn ingest_to_simulation_pipeline() {
    let store = FrequencyStore::in_memory().await.unwrap();
    let catalog = ServiceCatalog::builtin();

    observe_diagram(&store, &catalog, DIAGRAM).await.unwrap();
    observe_diagram(&store, &catalog, "sns: sqs: lambda:").await.unwrap();

    let snapshot = store.snapshot().await.unwrap();
    let chain = TransitionChain::from_frequencies(&snapshot).unwrap();
    assert_eq!(chain.len(), snapshot.len());

    let mut sampler = Sampler::seeded(2024);
    let start = sampler.random_start(&chain).unwrap();
    let sequence = sampler.generate(&chain, &start, 6).unwrap();

    assert_eq!(sequence.len(), 6);
    assert_eq!(sequence[0], start);
    for service in &sequence {
        assert!(snapshot.contains_key(service), "{service} not in history");
    }

    let rendered = report::render_sequence(&sequence);
    assert_eq!(rendered.matches(" -> ").count(), 5);
}

#[tokio::test]
async fn seeded_simulation_is_reproducible() {
    let store = FrequencyStore::in_memory().await.unwrap();
    let catalog = ServiceCatalog::builtin();

    observe_diagram(&store, &catalog, "ec2: ec2: s3: lambda: rds:").await.unwrap();

    let snapshot = store.snapshot().await.unwrap();
    let chain = TransitionChain::from_frequencies(&snapshot).unwrap();

    let first = Sampler::seeded(7).generate(&chain, "ec2", 10).unwrap();
    let second = Sampler::seeded(7).generate(&chain, "ec2", 10).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn fresh_store_has_no_history_to_simulate() {
    let store = FrequencyStore::in_memory().await.unwrap();
    let snapshot = store.snapshot().await.unwrap();

    assert!(TransitionChain::from_frequencies(&snapshot).is_err());
}

#[tokio::test]
async fn per_run_tally_matches_store_delta() {
    let store = FrequencyStore::in_memory().await.unwrap();
    let catalog = ServiceCatalog::builtin();

    observe_diagram(&store, &catalog, "ec2: s3:").await.unwrap();
    let before = store.snapshot().await.unwrap();

    let tally = observe_diagram(&store, &catalog, "ec2: ec2: kinesis:").await.unwrap();
    let after = store.snapshot().await.unwrap();

    for (service, added) in &tally {
        let previous = before.get(service).copied().unwrap_or(0);
        assert_eq!(after.get(service), Some(&(previous + added)));
    }
}
