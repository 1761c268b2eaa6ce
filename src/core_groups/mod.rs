// Group permission model for easyftpd

pub mod group;

pub use group::{EntryKind, Group, GroupPermission};
