use atelier_sync::domain::types::ActorKind;
use atelier_sync::usecase::content::{
    CreateContentInput, CreateContentUseCase, DeleteContentUseCase,
};
use atelier_sync::usecase::projector::GraphProjector;
use atelier_sync::usecase::register_user::{RegisterUserInput, RegisterUserUseCase};
use atelier_sync::usecase::relay::OutboxRelay;

use crate::helpers::{InMemoryContents, InMemoryGraph, InMemoryOutbox, InMemoryUsers};

fn relay(outbox: InMemoryOutbox, graph: InMemoryGraph) -> OutboxRelay<InMemoryOutbox, InMemoryGraph> {
    OutboxRelay {
        outbox,
        projector: GraphProjector { graph },
    }
}

#[tokio::test]
async fn should_project_registered_user_into_graph_on_next_cycle() {
    let outbox = InMemoryOutbox::default();
    let graph = InMemoryGraph::default();

    let register = RegisterUserUseCase {
        users: InMemoryUsers::default(),
        outbox: outbox.clone(),
    };
    let user = register
        .execute(RegisterUserInput {
            display_name: "Ada".into(),
            email: "ada@example.com".into(),
            role: ActorKind::Creator,
        })
        .await
        .unwrap();

    // Nothing in the graph until the relay runs.
    assert!(graph.actors.lock().unwrap().is_empty());

    let relay = relay(outbox.clone(), graph.clone());
    let stats = relay.run_cycle().await.unwrap();

    assert_eq!(stats.succeeded, 1);
    assert_eq!(
        graph.actors.lock().unwrap().get(&user.id.to_string()),
        Some(&"Ada".to_owned())
    );
    let record = &outbox.records.lock().unwrap()[0];
    assert!(record.processed);
    assert!(record.last_error.is_none());
}

#[tokio::test]
async fn should_create_and_delete_content_node_through_relay() {
    let outbox = InMemoryOutbox::default();
    let graph = InMemoryGraph::default();
    let contents = InMemoryContents::default();

    let create = CreateContentUseCase {
        contents: contents.clone(),
        outbox: outbox.clone(),
    };
    let content = create
        .execute(CreateContentInput {
            title: "Ballet".into(),
            creator_id: uuid::Uuid::now_v7(),
        })
        .await
        .unwrap();

    let relay = relay(outbox.clone(), graph.clone());
    relay.run_cycle().await.unwrap();
    assert_eq!(
        graph.contents.lock().unwrap().get(&content.id.to_string()),
        Some(&"Ballet".to_owned())
    );

    let delete = DeleteContentUseCase {
        contents,
        outbox: outbox.clone(),
    };
    delete.execute(content.id).await.unwrap();

    let stats = relay.run_cycle().await.unwrap();
    assert_eq!(stats.succeeded, 1);
    assert!(graph.contents.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_converge_after_replaying_a_lost_outcome() {
    let outbox = InMemoryOutbox::default();
    let graph = InMemoryGraph::default();

    let create = CreateContentUseCase {
        contents: InMemoryContents::default(),
        outbox: outbox.clone(),
    };
    let content = create
        .execute(CreateContentInput {
            title: "Mural".into(),
            creator_id: uuid::Uuid::now_v7(),
        })
        .await
        .unwrap();

    let relay = relay(outbox.clone(), graph.clone());
    relay.run_cycle().await.unwrap();

    // Simulate a lost state save: force the record back to unprocessed and
    // replay. The MERGE-style upsert must not create a second node.
    {
        let mut records = outbox.records.lock().unwrap();
        records[0].processed = false;
        records[0].processed_at = None;
    }
    relay.run_cycle().await.unwrap();

    let contents = graph.contents.lock().unwrap();
    assert_eq!(contents.len(), 1);
    assert_eq!(
        contents.get(&content.id.to_string()),
        Some(&"Mural".to_owned())
    );
}
