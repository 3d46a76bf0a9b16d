use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Denylist of token strings no longer honored despite a valid signature.
///
/// Revocation is overlaid on the otherwise-stateless signature scheme: the
/// validator consults this store before trusting any token. Entries are the
/// exact token strings; they become irrelevant once the token expires on its
/// own, so no sweeping is required.
///
/// `revoke` followed by `is_revoked` on the same token must observe `true`
/// from any task. No ordering guarantee across different tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RevocationStore: Send + Sync {
    async fn revoke(&self, token: &str);

    async fn is_revoked(&self, token: &str) -> bool;

    /// Administrative escape hatch; not part of any request flow.
    async fn unrevoke(&self, token: &str);
}

/// Authoritative in-memory implementation. Not durable: a restart clears the
/// denylist, which the deployment accepts for this store.
#[derive(Default)]
pub struct InMemoryRevocationStore {
    revoked: RwLock<HashSet<String>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, token: &str) {
        self.revoked.write().await.insert(token.to_string());
    }

    async fn is_revoked(&self, token: &str) -> bool {
        self.revoked.read().await.contains(token)
    }

    async fn unrevoke(&self, token: &str) {
        self.revoked.write().await.remove(token);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_revoke_then_is_revoked() {
        let store = InMemoryRevocationStore::new();

        assert!(!store.is_revoked("token-a").await);
        store.revoke("token-a").await;
        assert!(store.is_revoked("token-a").await);
        assert!(!store.is_revoked("token-b").await);
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let store = InMemoryRevocationStore::new();

        store.revoke("token-a").await;
        store.revoke("token-a").await;
        assert!(store.is_revoked("token-a").await);
    }

    #[tokio::test]
    async fn test_unrevoke_restores_token() {
        let store = InMemoryRevocationStore::new();

        store.revoke("token-a").await;
        store.unrevoke("token-a").await;
        assert!(!store.is_revoked("token-a").await);

        // Unrevoking an unknown token is a no-op
        store.unrevoke("never-seen").await;
    }

    #[tokio::test]
    async fn test_revocation_visible_across_tasks() {
        let store = Arc::new(InMemoryRevocationStore::new());

        let writer = Arc::clone(&store);
        tokio::spawn(async move {
            writer.revoke("shared-token").await;
        })
        .await
        .unwrap();

        assert!(store.is_revoked("shared-token").await);
    }

    #[tokio::test]
    async fn test_concurrent_writers() {
        let store = Arc::new(InMemoryRevocationStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.revoke(&format!("token-{}", i)).await;
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..16 {
            assert!(store.is_revoked(&format!("token-{}", i)).await);
        }
    }
}
