pub mod lister;

pub use lister::{DirectoryLister, EplfLister, LsLister};
