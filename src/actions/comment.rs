//! Item comment orchestration. Comments are append-only.

use chrono::{Duration, Utc};
use tracing::debug;

use crate::actions::capture;
use crate::client::{self, Scope, comments_collection};
use crate::error::Result;
use crate::events::CommentEvent;
use crate::model::records::CommentRecord;
use crate::session::Session;
use crate::store::ErrorKey;
use crate::util::id::child_id;

/// Load an item's comments unless already cached or in flight.
pub fn initialize_comments(session: &mut Session, item_id: &str) {
    if item_id.trim().is_empty() || session.comments.is_loading(item_id) {
        return;
    }
    if session.comments.is_loaded(item_id) {
        session.comments.apply(&CommentEvent::Unchanged);
        return;
    }
    refresh_comments(session, item_id);
}

/// Force-reload an item's comments.
pub fn refresh_comments(session: &mut Session, item_id: &str) {
    if item_id.trim().is_empty() || session.comments.is_loading(item_id) {
        return;
    }
    session.comments.set_loading(item_id, true);
    match load_comments(session, item_id) {
        Ok(comments) => {
            debug!(item_id, count = comments.len(), "loaded comments");
            session.comments.apply(&CommentEvent::Loaded {
                item_id: item_id.to_string(),
                comments,
            });
        }
        Err(e) => {
            session.comments.set_loading(item_id, false);
            capture(session, ErrorKey::Comment, &e);
        }
    }
}

/// Append a comment to an item. Blank content is a disabled affordance,
/// not an error.
pub fn create_comment(session: &mut Session, item_id: &str, content: &str) {
    if item_id.trim().is_empty() || content.trim().is_empty() {
        return;
    }

    let now = Utc::now();
    let record = CommentRecord {
        id: free_comment_id(session, item_id, now),
        etag: 0,
        created_by: session.config.identity.as_identity_string(),
        created_date: Some(now),
        content: content.to_string(),
    };

    match persist_create(session, item_id, &record) {
        Ok(saved) => {
            debug!(item_id, id = %saved.id, "created comment");
            session.comments.apply(&CommentEvent::Created {
                item_id: item_id.to_string(),
                comment: saved,
            });
        }
        // Surfaced on the comment channel like every other failure.
        Err(e) => capture(session, ErrorKey::Comment, &e),
    }
}

fn free_comment_id(session: &Session, item_id: &str, now: chrono::DateTime<Utc>) -> String {
    let mut at = now;
    loop {
        let id = child_id(item_id, at);
        if !session
            .comments
            .comments_for(item_id)
            .iter()
            .any(|c| c.id == id)
        {
            return id;
        }
        at += Duration::milliseconds(1);
    }
}

fn load_comments(session: &Session, item_id: &str) -> Result<Vec<CommentRecord>> {
    let collection = comments_collection(item_id);
    let documents = session.client.read_documents(&collection, Scope::Shared)?;
    client::decode_all(&collection, documents)
}

fn persist_create(
    session: &mut Session,
    item_id: &str,
    record: &CommentRecord,
) -> Result<CommentRecord> {
    let collection = comments_collection(item_id);
    let document = client::encode(record)?;
    let saved = session
        .client
        .create_document(&collection, document, Scope::Shared)?;
    client::decode(&collection, saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::test_session;

    #[test]
    fn comments_append_in_order() {
        let (mut session, _) = test_session();

        create_comment(&mut session, "item1", "first impression");
        create_comment(&mut session, "item1", "second thought");

        let comments = session.comments.comments_for("item1");
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "first impression");
        assert_eq!(comments[1].content, "second thought");
        assert_eq!(comments[0].created_by, "Ada Lovelace <ada@example.com>");
        assert_ne!(comments[0].id, comments[1].id);
    }

    #[test]
    fn blank_content_is_ignored() {
        let (mut session, _) = test_session();
        create_comment(&mut session, "item1", "   ");
        assert!(session.comments.comments_for("item1").is_empty());
        assert_eq!(session.errors.get(ErrorKey::Comment), None);
    }

    #[test]
    fn overlapping_initializes_fetch_once() {
        let (mut session, reads) = test_session();

        initialize_comments(&mut session, "item1");
        initialize_comments(&mut session, "item1");
        assert_eq!(reads.get(), 1);
    }

    #[test]
    fn comments_round_trip_through_the_client() {
        let (mut session, _) = test_session();
        create_comment(&mut session, "item1", "persisted");

        // Reload from the document store rather than the cache.
        session.comments.apply(&CommentEvent::Loaded {
            item_id: "item1".to_string(),
            comments: Vec::new(),
        });
        assert!(session.comments.comments_for("item1").is_empty());

        refresh_comments(&mut session, "item1");
        let comments = session.comments.comments_for("item1");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, "persisted");
    }
}
