use atelier_sync::domain::types::{ActorKind, MAX_RELAY_ATTEMPTS};
use atelier_sync::usecase::outbox_admin::{ListOutboxRecordsUseCase, OutboxStatusFilter};
use atelier_sync::usecase::projector::GraphProjector;
use atelier_sync::usecase::register_user::{RegisterUserInput, RegisterUserUseCase};
use atelier_sync::usecase::relay::OutboxRelay;

use crate::helpers::{InMemoryGraph, InMemoryOutbox, InMemoryUsers};

async fn register(outbox: &InMemoryOutbox, email: &str) {
    let register = RegisterUserUseCase {
        users: InMemoryUsers::default(),
        outbox: outbox.clone(),
    };
    register
        .execute(RegisterUserInput {
            display_name: "Ada".into(),
            email: email.into(),
            role: ActorKind::Viewer,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn should_quarantine_record_after_sustained_graph_outage() {
    let outbox = InMemoryOutbox::default();
    let graph = InMemoryGraph::default();
    graph.set_outage(true);

    register(&outbox, "ada@example.com").await;

    let relay = OutboxRelay {
        outbox: outbox.clone(),
        projector: GraphProjector {
            graph: graph.clone(),
        },
    };
    for _ in 0..MAX_RELAY_ATTEMPTS {
        relay.run_cycle().await.unwrap();
    }

    let admin = ListOutboxRecordsUseCase {
        outbox: outbox.clone(),
    };
    let quarantined = admin
        .execute(OutboxStatusFilter::Quarantined, None)
        .await
        .unwrap();
    assert_eq!(quarantined.len(), 1);
    assert_eq!(quarantined[0].retry_count, MAX_RELAY_ATTEMPTS);
    assert!(quarantined[0].last_error.is_some());

    // The record stays quarantined even after the graph recovers; operators
    // replay it manually from the admin listing.
    graph.set_outage(false);
    let stats = relay.run_cycle().await.unwrap();
    assert!(stats.is_empty());
    assert!(graph.actors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_recover_new_records_after_outage_ends() {
    let outbox = InMemoryOutbox::default();
    let graph = InMemoryGraph::default();
    graph.set_outage(true);

    register(&outbox, "ada@example.com").await;

    let relay = OutboxRelay {
        outbox: outbox.clone(),
        projector: GraphProjector {
            graph: graph.clone(),
        },
    };
    // One failed cycle, then the outage ends before the budget is spent.
    let stats = relay.run_cycle().await.unwrap();
    assert_eq!(stats.retried, 1);

    graph.set_outage(false);
    register(&outbox, "grace@example.com").await;

    let stats = relay.run_cycle().await.unwrap();
    assert_eq!(stats.succeeded, 2);
    assert_eq!(graph.actors.lock().unwrap().len(), 2);

    let admin = ListOutboxRecordsUseCase { outbox };
    let pending = admin
        .execute(OutboxStatusFilter::Pending, None)
        .await
        .unwrap();
    assert!(pending.is_empty());
}
