// Group permissions for easyftpd

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The kind of filesystem entry an action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// The action classes a group can be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupPermission {
    Create,
    /// Listing a directory or editing a file.
    Handle,
    Delete,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub create: BTreeSet<EntryKind>,

    #[serde(default)]
    pub handle: BTreeSet<EntryKind>,

    #[serde(default)]
    pub delete: BTreeSet<EntryKind>,
}

impl Group {
    /// A group that may do everything.
    pub fn unrestricted() -> Self {
        let all: BTreeSet<EntryKind> = [EntryKind::File, EntryKind::Dir].into_iter().collect();
        Self {
            create: all.clone(),
            handle: all.clone(),
            delete: all,
        }
    }

    pub fn grant(mut self, permission: GroupPermission, kind: EntryKind) -> Self {
        self.set_mut(permission).insert(kind);
        self
    }

    pub fn may(&self, permission: GroupPermission, kind: EntryKind) -> bool {
        match permission {
            GroupPermission::Create => self.create.contains(&kind),
            GroupPermission::Handle => self.handle.contains(&kind),
            GroupPermission::Delete => self.delete.contains(&kind),
        }
    }

    pub fn can_create_file(&self) -> bool {
        self.may(GroupPermission::Create, EntryKind::File)
    }

    pub fn can_create_dir(&self) -> bool {
        self.may(GroupPermission::Create, EntryKind::Dir)
    }

    pub fn can_edit_file(&self) -> bool {
        self.may(GroupPermission::Handle, EntryKind::File)
    }

    pub fn can_list_dir(&self) -> bool {
        self.may(GroupPermission::Handle, EntryKind::Dir)
    }

    pub fn can_delete_file(&self) -> bool {
        self.may(GroupPermission::Delete, EntryKind::File)
    }

    pub fn can_delete_dir(&self) -> bool {
        self.may(GroupPermission::Delete, EntryKind::Dir)
    }

    fn set_mut(&mut self, permission: GroupPermission) -> &mut BTreeSet<EntryKind> {
        match permission {
            GroupPermission::Create => &mut self.create,
            GroupPermission::Handle => &mut self.handle,
            GroupPermission::Delete => &mut self.delete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_group_denies_everything() {
        let group = Group::default();
        assert!(!group.can_create_file());
        assert!(!group.can_create_dir());
        assert!(!group.can_edit_file());
        assert!(!group.can_list_dir());
        assert!(!group.can_delete_file());
        assert!(!group.can_delete_dir());
    }

    #[test]
    fn test_grants_are_per_kind() {
        let group = Group::default()
            .grant(GroupPermission::Handle, EntryKind::Dir)
            .grant(GroupPermission::Create, EntryKind::File);
        assert!(group.can_list_dir());
        assert!(!group.can_edit_file());
        assert!(group.can_create_file());
        assert!(!group.can_create_dir());
        assert!(!group.can_delete_file());
    }

    #[test]
    fn test_unrestricted_group() {
        let group = Group::unrestricted();
        assert!(group.can_create_dir());
        assert!(group.can_delete_file());
        assert!(group.can_edit_file());
    }

    #[test]
    fn test_group_from_toml() {
        let group: Group = toml::from_str("create = [\"file\"]\nhandle = [\"file\", \"dir\"]\n").unwrap();
        assert!(group.can_create_file());
        assert!(group.can_list_dir());
        assert!(group.delete.is_empty());
    }
}
