//! Page Event Tests
//!
//! Verifies the events a `PageState` publishes: one `page:changed` per
//! committed mutation in call order, and a single `page:persisted` once the
//! debounce window has passed.

#[cfg(test)]
mod page_event_tests {
    use anyhow::Result;
    use pageblocks_core::db::{InMemoryPageStore, PageRepository, StaticIdentity};
    use pageblocks_core::models::{Node, NodeType};
    use pageblocks_core::services::{PageEvent, PageState};
    use pageblocks_core::EditorConfig;
    use std::sync::Arc;
    use tokio::sync::broadcast::error::TryRecvError;
    use tokio::time::Duration;

    async fn create_state(debounce_ms: u64) -> Result<(PageState, Arc<InMemoryPageStore>)> {
        let config = EditorConfig {
            persist_debounce_ms: debounce_ms,
            ..EditorConfig::default()
        };
        let store = Arc::new(InMemoryPageStore::new(
            Arc::new(StaticIdentity::user("u1")),
            config.clone(),
        ));
        let page = store.create_page().await?;
        Ok((PageState::new(page, store.clone(), &config), store))
    }

    #[tokio::test(start_paused = true)]
    async fn test_changed_events_follow_call_order() -> Result<()> {
        let (mut state, _store) = create_state(500).await?;
        let mut rx = state.subscribe();

        state.add_node(Node::new(NodeType::Text, "Hello"), 0)?;
        state.change_node_value(0, "Hello!")?;
        state.set_title("Greetings")?;

        let mut kinds = Vec::new();
        for _ in 0..3 {
            match rx.recv().await? {
                PageEvent::Changed { mutation, .. } => kinds.push(mutation),
                other => anyhow::bail!("unexpected event {}", other.event_type()),
            }
        }
        assert_eq!(kinds, vec!["add_node", "change_node_value", "set_title"]);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_persisted_event_after_quiet_window() -> Result<()> {
        let (mut state, store) = create_state(500).await?;
        state.add_node(Node::new(NodeType::Text, ""), 0)?;
        let mut rx = state.subscribe();

        for value in ["H", "He", "Hel", "Hell", "Hello"] {
            state.change_node_value(0, value)?;
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tokio::time::sleep(Duration::from_millis(600)).await;

        let mut persisted = 0;
        while let Ok(event) = rx.try_recv() {
            if let PageEvent::Persisted { page_id, .. } = &event {
                assert_eq!(page_id, &state.page().id);
                persisted += 1;
            }
        }
        assert_eq!(persisted, 1);
        assert_eq!(store.persisted_count(), 1);

        let stored = store
            .page_by_id(&state.page().id)
            .await
            .ok_or_else(|| anyhow::anyhow!("page missing"))?;
        assert_eq!(stored.nodes[0].value, "Hello");
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_separated_by_quiet_windows_persist_each_time() -> Result<()> {
        let (mut state, store) = create_state(100).await?;

        state.set_title("One")?;
        tokio::time::sleep(Duration::from_millis(150)).await;
        state.set_title("Two")?;
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(store.persisted_count(), 2);
        let stats = state.shutdown().await;
        assert_eq!(stats.persisted, 2);
        assert_eq!(stats.superseded, 0);
        Ok(())
    }
}
