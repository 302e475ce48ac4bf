//! Directory restricted to a set of visible names.
//!
//! Models partial connectivity: an office sees only the offices it is
//! linked to when listing, while lookups by explicit name still resolve.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::DirectoryError;
use crate::ports::{Directory, MembershipFilter, MembershipSubscription, OfficeRef};

pub struct DirectoryView {
    inner: Arc<dyn Directory>,
    owner: String,
    visible: BTreeSet<String>,
}

impl DirectoryView {
    /// View of `inner` for `owner`, listing only `visible` names and the owner.
    pub fn new<I, S>(inner: Arc<dyn Directory>, owner: impl Into<String>, visible: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner,
            owner: owner.into(),
            visible: visible.into_iter().map(Into::into).collect(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn is_visible(&self, name: &str) -> bool {
        name == self.owner || self.visible.contains(name)
    }
}

#[async_trait]
impl Directory for DirectoryView {
    async fn bind(&self, name: &str, office: Arc<dyn OfficeRef>) -> Result<(), DirectoryError> {
        self.inner.bind(name, office).await
    }

    async fn unbind(&self, name: &str) -> Result<(), DirectoryError> {
        self.inner.unbind(name).await
    }

    async fn lookup(&self, name: &str) -> Result<Arc<dyn OfficeRef>, DirectoryError> {
        self.inner.lookup(name).await
    }

    async fn list(&self) -> Result<Vec<String>, DirectoryError> {
        let mut names = self.inner.list().await?;
        names.retain(|name| self.is_visible(name));
        Ok(names)
    }

    fn subscribe_membership(&self, filter: MembershipFilter) -> MembershipSubscription {
        self.inner.subscribe_membership(filter)
    }
}
