use log::debug;
use std::path::{Component, Path, PathBuf};

/// Lexically normalizes an absolute path: `.` is dropped, `..` pops one
/// component and never climbs above the root.
pub fn normalize(path: &Path) -> PathBuf {
    path.components()
        .fold(PathBuf::from("/"), |mut acc, comp| {
            match comp {
                Component::ParentDir => {
                    acc.pop();
                }
                Component::Normal(part) => acc.push(part),
                Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            }
            acc
        })
}

/// Resolves a client supplied `arg` against `current_dir` and checks that the
/// result stays inside `home`.
///
/// An absolute `arg` replaces the current directory, a relative one is joined
/// to it. Returns `None` when the normalized path, or the canonical form of
/// its deepest existing ancestor, lies outside the home directory.
pub async fn resolve(current_dir: &Path, arg: &str, home: &Path) -> Option<PathBuf> {
    let joined = if Path::new(arg).is_absolute() {
        PathBuf::from(arg)
    } else {
        current_dir.join(arg)
    };
    let path = normalize(&joined);
    let home = normalize(home);

    if path.strip_prefix(&home).is_err() {
        debug!("Path {:?} escapes home directory {:?}", path, home);
        return None;
    }
    if escapes_through_links(&path, &home).await {
        debug!("Path {:?} leaves home directory {:?} through a link", path, home);
        return None;
    }
    Some(path)
}

async fn escapes_through_links(path: &Path, home: &Path) -> bool {
    let real_home = match tokio::fs::canonicalize(home).await {
        Ok(real_home) => real_home,
        Err(_) => return false,
    };

    // symlink_metadata, unlike exists(), also finds dangling links.
    for ancestor in path.ancestors() {
        let metadata = match tokio::fs::symlink_metadata(ancestor).await {
            Ok(metadata) => metadata,
            Err(_) => continue,
        };
        return match tokio::fs::canonicalize(ancestor).await {
            Ok(real) => !real.starts_with(&real_home),
            // A dangling link may point anywhere once its target is created.
            Err(_) => metadata.file_type().is_symlink(),
        };
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../../etc")), PathBuf::from("/etc"));
        assert_eq!(normalize(Path::new("/a/b/")), PathBuf::from("/a/b"));
        assert_eq!(normalize(Path::new("/")), PathBuf::from("/"));
    }

    #[tokio::test]
    async fn test_relative_and_absolute_arguments() {
        let home = Path::new("/nonexistent/home/anon");
        let cwd = Path::new("/nonexistent/home/anon/pub");
        assert_eq!(
            resolve(cwd, "file.txt", home).await,
            Some(PathBuf::from("/nonexistent/home/anon/pub/file.txt"))
        );
        assert_eq!(
            resolve(cwd, "/nonexistent/home/anon/other", home).await,
            Some(PathBuf::from("/nonexistent/home/anon/other"))
        );
        assert_eq!(resolve(cwd, "..", home).await, Some(PathBuf::from(home)));
        assert_eq!(resolve(cwd, "", home).await, Some(PathBuf::from(cwd)));
    }

    #[tokio::test]
    async fn test_never_escapes_home() {
        let home = Path::new("/nonexistent/home/anon");
        let cwd = Path::new("/nonexistent/home/anon/pub");
        for arg in [
            "../..",
            "../../bob",
            "/etc/passwd",
            "/nonexistent/home/anonymous",
            "pub/../../../../etc",
            "/",
        ] {
            assert_eq!(resolve(cwd, arg, home).await, None, "argument {:?}", arg);
        }
    }

    #[tokio::test]
    async fn test_root_home_contains_everything() {
        let home = Path::new("/");
        assert_eq!(
            resolve(Path::new("/"), "../../tmp", home).await,
            Some(PathBuf::from("/tmp"))
        );
    }

    #[tokio::test]
    async fn test_dots_inside_names_are_allowed() {
        let home = Path::new("/nonexistent/home");
        assert_eq!(
            resolve(home, "release..tar", home).await,
            Some(PathBuf::from("/nonexistent/home/release..tar"))
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_out_of_home_is_rejected() {
        let outside = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), home.path().join("escape")).unwrap();
        std::fs::create_dir(home.path().join("inside")).unwrap();

        assert_eq!(resolve(home.path(), "escape", home.path()).await, None);
        assert_eq!(resolve(home.path(), "escape/new-file", home.path()).await, None);
        assert!(resolve(home.path(), "inside/new-file", home.path()).await.is_some());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_symlink_is_rejected() {
        let outside = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let planted = outside.path().join("planted.txt");
        std::os::unix::fs::symlink(&planted, home.path().join("dangle")).unwrap();
        std::os::unix::fs::symlink(
            home.path().join("missing"),
            home.path().join("dangle-inside"),
        )
        .unwrap();

        assert_eq!(resolve(home.path(), "dangle", home.path()).await, None);
        assert_eq!(resolve(home.path(), "dangle/child", home.path()).await, None);
        assert_eq!(resolve(home.path(), "dangle-inside", home.path()).await, None);
        assert!(!planted.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_inside_home_is_allowed() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir(home.path().join("data")).unwrap();
        std::os::unix::fs::symlink(home.path().join("data"), home.path().join("alias")).unwrap();

        assert_eq!(
            resolve(home.path(), "alias/file", home.path()).await,
            Some(home.path().join("alias/file"))
        );
    }
}
