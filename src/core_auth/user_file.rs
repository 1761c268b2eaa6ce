use crate::constants::USERNAME_REGEX;
use crate::core_auth::core_auth::{User, UserStore};
use crate::core_auth::error::AuthError;
use crate::core_auth::helper::{hash_password, hash_password_with_cost};
use crate::core_groups::Group;
use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserEntry {
    home: PathBuf,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    hash: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    password: String,
    #[serde(default)]
    group: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct UserFile {
    #[serde(default)]
    users: BTreeMap<String, UserEntry>,
    #[serde(default)]
    groups: BTreeMap<String, Group>,
}

/// Users and groups loaded from a TOML user file:
///
/// ```toml
/// [users.alice]
/// home = "/srv/ftp/alice"
/// password = "secret"   # hashed on load
/// group = "users"
///
/// [groups.users]
/// create = ["file"]
/// handle = ["file", "dir"]
/// delete = []
/// ```
#[derive(Debug, Default)]
pub struct FileUserStore {
    users: HashMap<String, User>,
    groups: HashMap<String, Group>,
}

impl FileUserStore {
    /// Loads the user file. Plain passwords are hashed in memory; with
    /// `rewrite` the file is written back with the hashes in their place.
    pub fn load(path: &Path, rewrite: bool) -> Result<Self, AuthError> {
        let content = std::fs::read_to_string(path).map_err(|source| AuthError::UserFileRead {
            path: path.display().to_string(),
            source,
        })?;
        let mut file: UserFile = toml::from_str(&content)?;

        let rehashed = hash_plain_passwords(&mut file, hash_password)?;
        if rewrite && rehashed > 0 {
            let serialized = toml::to_string(&file)?;
            std::fs::write(path, serialized).map_err(|source| AuthError::UserFileWrite {
                path: path.display().to_string(),
                source,
            })?;
            info!("Rewrote {} password(s) as hashes in {:?}", rehashed, path);
        } else if rehashed > 0 {
            warn!(
                "{} plain password(s) in {:?}; enable rewriting to store them hashed",
                rehashed, path
            );
        }

        Self::from_file(file)
    }

    /// Parses a user file held in memory, hashing plain passwords with `cost`.
    pub fn from_toml(content: &str, cost: u32) -> Result<Self, AuthError> {
        let mut file: UserFile = toml::from_str(content)?;
        hash_plain_passwords(&mut file, |password| hash_password_with_cost(password, cost))?;
        Self::from_file(file)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn from_file(file: UserFile) -> Result<Self, AuthError> {
        let username_regex = Regex::new(USERNAME_REGEX)?;

        let mut users = HashMap::with_capacity(file.users.len());
        for (name, entry) in file.users {
            if !username_regex.is_match(&name) {
                return Err(AuthError::InvalidUsername(name));
            }
            if !entry.home.is_absolute() {
                return Err(AuthError::RelativeHome(name));
            }
            if !file.groups.contains_key(&entry.group) {
                warn!("User {} belongs to unknown group {:?}", name, entry.group);
            }
            let user = User::new(&name, entry.home, &entry.hash, &entry.group);
            users.insert(name, user);
        }

        Ok(Self {
            users,
            groups: file.groups.into_iter().collect(),
        })
    }
}

impl UserStore for FileUserStore {
    fn find_user(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }

    fn find_group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }
}

fn hash_plain_passwords<F>(file: &mut UserFile, hasher: F) -> Result<usize, AuthError>
where
    F: Fn(&str) -> Result<String, bcrypt::BcryptError>,
{
    let mut count = 0;
    for (name, entry) in file.users.iter_mut() {
        if entry.password.is_empty() {
            continue;
        }
        entry.hash = hasher(&entry.password).map_err(|source| AuthError::Hash {
            user: name.clone(),
            source,
        })?;
        entry.password.clear();
        count += 1;
    }
    Ok(count)
}
