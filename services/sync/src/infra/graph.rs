use anyhow::Context as _;
use neo4rs::{Graph, query};

use crate::domain::repository::{GraphReader, GraphStore};
use crate::domain::types::{ActorSuggestion, Recommendation};
use crate::error::SyncServiceError;

/// Neo4j-backed graph adapter. Every node write is a MERGE keyed on the
/// document-store id, so replayed events collapse onto the existing node.
#[derive(Clone)]
pub struct Neo4jGraphStore {
    pub graph: Graph,
}

impl GraphStore for Neo4jGraphStore {
    async fn upsert_actor(
        &self,
        actor_id: &str,
        display_name: &str,
        kind: &str,
    ) -> Result<u64, SyncServiceError> {
        let q = query(
            "MERGE (a:Actor {actorId: $actorId}) \
             SET a.displayName = $displayName, a.kind = $kind \
             RETURN count(a) AS affected",
        )
        .param("actorId", actor_id)
        .param("displayName", display_name)
        .param("kind", kind);
        affected_count(&self.graph, q, "upsert actor node").await
    }

    async fn upsert_content(
        &self,
        content_id: &str,
        title: &str,
    ) -> Result<u64, SyncServiceError> {
        let q = query(
            "MERGE (c:Content {contentId: $contentId}) \
             SET c.title = $title \
             RETURN count(c) AS affected",
        )
        .param("contentId", content_id)
        .param("title", title);
        affected_count(&self.graph, q, "upsert content node").await
    }

    async fn delete_content(&self, content_id: &str) -> Result<(), SyncServiceError> {
        let q = query("MATCH (c:Content {contentId: $contentId}) DETACH DELETE c")
            .param("contentId", content_id);
        self.graph
            .run(q)
            .await
            .context("delete content node")
            .map_err(SyncServiceError::Storage)
    }

    async fn merge_like_edge(
        &self,
        actor_id: &str,
        content_id: &str,
    ) -> Result<(), SyncServiceError> {
        let q = query(
            "MERGE (a:Actor {actorId: $actorId}) \
             MERGE (c:Content {contentId: $contentId}) \
             MERGE (a)-[r:LIKES]->(c) \
             ON CREATE SET r.since = datetime()",
        )
        .param("actorId", actor_id)
        .param("contentId", content_id);
        self.graph
            .run(q)
            .await
            .context("merge like edge")
            .map_err(SyncServiceError::Storage)
    }

    async fn delete_like_edge(
        &self,
        actor_id: &str,
        content_id: &str,
    ) -> Result<(), SyncServiceError> {
        let q = query(
            "MATCH (:Actor {actorId: $actorId})-[r:LIKES]->(:Content {contentId: $contentId}) \
             DELETE r",
        )
        .param("actorId", actor_id)
        .param("contentId", content_id);
        self.graph
            .run(q)
            .await
            .context("delete like edge")
            .map_err(SyncServiceError::Storage)
    }

    async fn merge_follow_edge(
        &self,
        follower_id: &str,
        creator_id: &str,
    ) -> Result<(), SyncServiceError> {
        let q = query(
            "MERGE (f:Actor {actorId: $followerId}) \
             MERGE (c:Actor {actorId: $creatorId}) \
             MERGE (f)-[r:FOLLOWS]->(c) \
             ON CREATE SET r.since = datetime()",
        )
        .param("followerId", follower_id)
        .param("creatorId", creator_id);
        self.graph
            .run(q)
            .await
            .context("merge follow edge")
            .map_err(SyncServiceError::Storage)
    }

    async fn delete_follow_edge(
        &self,
        follower_id: &str,
        creator_id: &str,
    ) -> Result<(), SyncServiceError> {
        let q = query(
            "MATCH (:Actor {actorId: $followerId})-[r:FOLLOWS]->(:Actor {actorId: $creatorId}) \
             DELETE r",
        )
        .param("followerId", follower_id)
        .param("creatorId", creator_id);
        self.graph
            .run(q)
            .await
            .context("delete follow edge")
            .map_err(SyncServiceError::Storage)
    }
}

impl GraphReader for Neo4jGraphStore {
    async fn followers(&self, actor_id: &str) -> Result<Vec<String>, SyncServiceError> {
        let q = query(
            "MATCH (f:Actor)-[:FOLLOWS]->(:Actor {actorId: $actorId}) \
             RETURN f.actorId AS actorId",
        )
        .param("actorId", actor_id);
        actor_ids(&self.graph, q, "list followers").await
    }

    async fn following(&self, actor_id: &str) -> Result<Vec<String>, SyncServiceError> {
        let q = query(
            "MATCH (:Actor {actorId: $actorId})-[:FOLLOWS]->(t:Actor) \
             RETURN t.actorId AS actorId",
        )
        .param("actorId", actor_id);
        actor_ids(&self.graph, q, "list following").await
    }

    async fn content_recommendations(
        &self,
        actor_id: &str,
        limit: i64,
    ) -> Result<Vec<Recommendation>, SyncServiceError> {
        // Contents liked by followed actors, minus what the asker already
        // likes, ranked by how many followed actors liked each.
        let q = query(
            "MATCH (me:Actor {actorId: $actorId})-[:FOLLOWS]->(f:Actor)-[:LIKES]->(c:Content) \
             WHERE NOT (me)-[:LIKES]->(c) \
             RETURN c.contentId AS contentId, c.title AS title, count(DISTINCT f) AS popularity \
             ORDER BY popularity DESC \
             LIMIT $limit",
        )
        .param("actorId", actor_id)
        .param("limit", limit);

        let mut rows = self
            .graph
            .execute(q)
            .await
            .context("run recommendation traversal")
            .map_err(SyncServiceError::Storage)?;
        let mut out = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .context("read recommendation row")
            .map_err(SyncServiceError::Storage)?
        {
            out.push(Recommendation {
                content_id: row
                    .get::<String>("contentId")
                    .context("decode contentId column")
                    .map_err(SyncServiceError::Storage)?,
                title: row.get::<String>("title").ok(),
                popularity: row
                    .get::<i64>("popularity")
                    .context("decode popularity column")
                    .map_err(SyncServiceError::Storage)?,
            });
        }
        Ok(out)
    }

    async fn actor_recommendations(
        &self,
        actor_id: &str,
        limit: i64,
    ) -> Result<Vec<ActorSuggestion>, SyncServiceError> {
        // Actors two FOLLOWS hops out, minus direct follows and self, ranked
        // by how many followed actors lead there.
        let q = query(
            "MATCH (me:Actor {actorId: $actorId})-[:FOLLOWS]->(f:Actor)-[:FOLLOWS]->(s:Actor) \
             WHERE s.actorId <> $actorId AND NOT (me)-[:FOLLOWS]->(s) \
             RETURN s.actorId AS actorId, s.displayName AS displayName, \
                    count(DISTINCT f) AS mutuals \
             ORDER BY mutuals DESC \
             LIMIT $limit",
        )
        .param("actorId", actor_id)
        .param("limit", limit);

        let mut rows = self
            .graph
            .execute(q)
            .await
            .context("run actor suggestion traversal")
            .map_err(SyncServiceError::Storage)?;
        let mut out = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .context("read actor suggestion row")
            .map_err(SyncServiceError::Storage)?
        {
            out.push(ActorSuggestion {
                actor_id: row
                    .get::<String>("actorId")
                    .context("decode actorId column")
                    .map_err(SyncServiceError::Storage)?,
                display_name: row.get::<String>("displayName").ok(),
                mutuals: row
                    .get::<i64>("mutuals")
                    .context("decode mutuals column")
                    .map_err(SyncServiceError::Storage)?,
            });
        }
        Ok(out)
    }
}

async fn affected_count(
    graph: &Graph,
    q: neo4rs::Query,
    what: &'static str,
) -> Result<u64, SyncServiceError> {
    let mut rows = graph
        .execute(q)
        .await
        .context(what)
        .map_err(SyncServiceError::Storage)?;
    let Some(row) = rows
        .next()
        .await
        .context(what)
        .map_err(SyncServiceError::Storage)?
    else {
        return Ok(0);
    };
    let affected = row
        .get::<i64>("affected")
        .context("decode affected column")
        .map_err(SyncServiceError::Storage)?;
    Ok(affected.max(0) as u64)
}

async fn actor_ids(
    graph: &Graph,
    q: neo4rs::Query,
    what: &'static str,
) -> Result<Vec<String>, SyncServiceError> {
    let mut rows = graph
        .execute(q)
        .await
        .context(what)
        .map_err(SyncServiceError::Storage)?;
    let mut out = Vec::new();
    while let Some(row) = rows
        .next()
        .await
        .context(what)
        .map_err(SyncServiceError::Storage)?
    {
        out.push(
            row.get::<String>("actorId")
                .context("decode actorId column")
                .map_err(SyncServiceError::Storage)?,
        );
    }
    Ok(out)
}
