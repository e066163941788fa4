//! Scripted IAM clients for E2E tests.
//!
//! [`ScriptedClient`] forwards every call to an [`InMemoryIamClient`] and
//! distorts selected responses, so tests can exercise assertion failures
//! the in-memory service never produces by itself.

use iam_lifecycle_core::{Group, IamClient, IamError, InMemoryIamClient, User};

/// Response distortions applied on top of the in-memory service.
#[derive(Debug, Default, Clone, Copy)]
pub struct Distortions {
    /// `get_user` answers `Ok(None)`.
    pub empty_get_user: bool,
    /// `get_group` answers `Ok(None)`.
    pub empty_get_group: bool,
    /// `get_user` drops the ARN.
    pub user_without_arn: bool,
    /// `update_user` reports success without changing anything.
    pub ignore_user_update: bool,
    /// Filtered `list_users` answers an empty list.
    pub hide_users_by_path: bool,
    /// `list_groups` keeps answering deleted groups.
    pub stale_group_listing: bool,
    /// `list_users` upper-cases every name.
    pub uppercase_user_listing: bool,
}

/// In-memory service with distorted responses.
pub struct ScriptedClient {
    inner: InMemoryIamClient,
    distortions: Distortions,
    deleted_groups: tokio::sync::Mutex<Vec<Group>>,
}

impl ScriptedClient {
    pub fn new(distortions: Distortions) -> Self {
        Self::wrap(InMemoryIamClient::new(), distortions)
    }

    pub fn wrap(inner: InMemoryIamClient, distortions: Distortions) -> Self {
        Self {
            inner,
            distortions,
            deleted_groups: tokio::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &InMemoryIamClient {
        &self.inner
    }
}

impl IamClient for ScriptedClient {
    async fn create_user(&self, user_name: &str, path: &str) -> Result<(), IamError> {
        self.inner.create_user(user_name, path).await
    }

    async fn get_user(&self, user_name: &str) -> Result<Option<User>, IamError> {
        let user = self.inner.get_user(user_name).await?;
        if self.distortions.empty_get_user {
            return Ok(None);
        }
        Ok(user.map(|mut u| {
            if self.distortions.user_without_arn {
                u.arn = None;
            }
            u
        }))
    }

    async fn update_user(&self, user_name: &str, new_path: &str) -> Result<(), IamError> {
        if self.distortions.ignore_user_update {
            return Ok(());
        }
        self.inner.update_user(user_name, new_path).await
    }

    async fn delete_user(&self, user_name: &str) -> Result<(), IamError> {
        self.inner.delete_user(user_name).await
    }

    async fn list_users(&self, path_prefix: Option<&str>) -> Result<Vec<User>, IamError> {
        let mut users = self.inner.list_users(path_prefix).await?;
        if self.distortions.hide_users_by_path && path_prefix.is_some() {
            users.clear();
        }
        if self.distortions.uppercase_user_listing {
            for user in &mut users {
                user.user_name = user.user_name.to_uppercase();
            }
        }
        Ok(users)
    }

    async fn create_group(&self, group_name: &str, path: &str) -> Result<(), IamError> {
        self.inner.create_group(group_name, path).await
    }

    async fn get_group(&self, group_name: &str) -> Result<Option<Group>, IamError> {
        let group = self.inner.get_group(group_name).await?;
        if self.distortions.empty_get_group {
            return Ok(None);
        }
        Ok(group)
    }

    async fn update_group(&self, group_name: &str, new_path: &str) -> Result<(), IamError> {
        self.inner.update_group(group_name, new_path).await
    }

    async fn delete_group(&self, group_name: &str) -> Result<(), IamError> {
        if self.distortions.stale_group_listing {
            if let Some(group) = self.inner.get_group(group_name).await? {
                self.deleted_groups.lock().await.push(group);
            }
        }
        self.inner.delete_group(group_name).await
    }

    async fn list_groups(&self, path_prefix: Option<&str>) -> Result<Vec<Group>, IamError> {
        let mut groups = self.inner.list_groups(path_prefix).await?;
        if self.distortions.stale_group_listing {
            groups.extend(self.deleted_groups.lock().await.iter().cloned());
        }
        Ok(groups)
    }

    async fn add_user_to_group(&self, user_name: &str, group_name: &str) -> Result<(), IamError> {
        self.inner.add_user_to_group(user_name, group_name).await
    }

    async fn remove_user_from_group(
        &self,
        user_name: &str,
        group_name: &str,
    ) -> Result<(), IamError> {
        self.inner.remove_user_from_group(user_name, group_name).await
    }
}
