use crate::models::Member;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors surfaced by a member directory backend
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("team not found: {0}")]
    TeamNotFound(String),

    #[error("directory backend error: {0}")]
    Backend(String),
}

/// Source of team rosters
///
/// Owned by the surrounding system (user/team directory service); the
/// engine only ever reads a snapshot per run.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Active members of a team, inactive accounts already filtered out
    async fn active_members(&self, team_id: &str) -> Result<Vec<Member>, DirectoryError>;
}

#[async_trait]
impl<T: MemberDirectory + ?Sized> MemberDirectory for std::sync::Arc<T> {
    async fn active_members(&self, team_id: &str) -> Result<Vec<Member>, DirectoryError> {
        (**self).active_members(team_id).await
    }
}

/// In-memory directory backed by a team -> members map
///
/// Reference implementation used by tests and benchmarks.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    teams: RwLock<HashMap<String, Vec<Member>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_team(&self, team_id: &str, members: Vec<Member>) {
        self.teams
            .write()
            .await
            .insert(team_id.to_string(), members);
    }
}

#[async_trait]
impl MemberDirectory for InMemoryDirectory {
    async fn active_members(&self, team_id: &str) -> Result<Vec<Member>, DirectoryError> {
        let teams = self.teams.read().await;
        let members = teams
            .get(team_id)
            .ok_or_else(|| DirectoryError::TeamNotFound(team_id.to_string()))?;
        Ok(members.iter().filter(|m| m.active).cloned().collect())
    }
}
