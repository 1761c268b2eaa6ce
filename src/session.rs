use crate::constants::DEFAULT_TRANSFER_TYPE;
use crate::core_auth::{User, UserStore};
use crate::core_groups::{EntryKind, GroupPermission};
use crate::core_path;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Per-connection state, owned by the control loop.
pub struct Session {
    pub id: usize,
    pub current_dir: PathBuf,
    pub username: Option<String>,     // Authenticated user
    pub pending_user: Option<String>, // Named by USER, awaiting PASS
    pub transfer_type: String,
    pub keep_alive: bool,
    users: Arc<dyn UserStore>,
}

impl Session {
    pub fn new(id: usize, users: Arc<dyn UserStore>) -> Self {
        Self {
            id,
            current_dir: PathBuf::from("/"),
            username: None,
            pending_user: None,
            transfer_type: DEFAULT_TRANSFER_TYPE.to_string(),
            keep_alive: true,
            users,
        }
    }

    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    /// The authenticated user, if it is still known to the store.
    pub fn user(&self) -> Option<&User> {
        self.username
            .as_deref()
            .and_then(|name| self.users.find_user(name))
    }

    /// Marks `name` as logged in and moves to its home directory.
    pub fn login(&mut self, name: String, home: &Path) {
        self.current_dir = core_path::normalize(home);
        self.username = Some(name);
        self.pending_user = None;
    }

    pub fn logout(&mut self) {
        self.username = None;
    }

    /// Resolves a client path inside the authenticated user's home directory.
    pub async fn resolve_path(&self, arg: &str) -> Option<PathBuf> {
        let home = self.user()?.home_dir().to_path_buf();
        core_path::resolve(&self.current_dir, arg, &home).await
    }

    pub fn permits(&self, permission: GroupPermission, kind: EntryKind) -> bool {
        match self.username.as_deref() {
            Some(name) => self.users.permits(name, permission, kind),
            None => false,
        }
    }

    /// Log prefix of this session.
    pub fn tag(&self) -> String {
        format!("[#{}]", self.id)
    }
}
