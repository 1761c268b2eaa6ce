use crate::core_auth::helper::verify_password;
use crate::core_groups::{EntryKind, Group, GroupPermission};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    name: String,
    home: PathBuf,
    hashed_password: String,
    group: String,
}

impl User {
    pub fn new(name: &str, home: impl Into<PathBuf>, hashed_password: &str, group: &str) -> Self {
        Self {
            name: name.to_string(),
            home: home.into(),
            hashed_password: hashed_password.to_string(),
            group: group.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn home_dir(&self) -> &Path {
        &self.home
    }

    pub fn group_name(&self) -> &str {
        &self.group
    }

    /// Checks `password` against the stored hash. A user without a hash
    /// needs no password at all.
    pub fn auth(&self, password: &str) -> bool {
        if self.hashed_password.is_empty() {
            return true;
        }
        verify_password(password, &self.hashed_password)
    }
}

/// Read-only lookup of users and groups, shared by every session.
pub trait UserStore: Send + Sync {
    fn find_user(&self, name: &str) -> Option<&User>;

    fn find_group(&self, name: &str) -> Option<&Group>;

    fn group_of(&self, user: &User) -> Option<&Group> {
        self.find_group(user.group_name())
    }

    /// Missing users and missing groups are denied.
    fn permits(&self, user: &str, permission: GroupPermission, kind: EntryKind) -> bool {
        self.find_user(user)
            .and_then(|user| self.group_of(user))
            .map_or(false, |group| group.may(permission, kind))
    }
}

/// Zero-configuration store: every name maps to one password-less user
/// with an unrestricted group rooted at a fixed home directory.
#[derive(Debug, Clone)]
pub struct DefaultUserStore {
    user: User,
    group: Group,
}

impl DefaultUserStore {
    pub const GROUP_NAME: &'static str = "default";

    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            user: User::new("", home, "", Self::GROUP_NAME),
            group: Group::unrestricted(),
        }
    }
}

impl UserStore for DefaultUserStore {
    fn find_user(&self, _name: &str) -> Option<&User> {
        Some(&self.user)
    }

    fn find_group(&self, _name: &str) -> Option<&Group> {
        Some(&self.group)
    }
}
