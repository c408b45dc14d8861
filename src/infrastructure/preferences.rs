use crate::domain::ports::RolePreferences;
use crate::error::Result;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const ROLE_KEY: &str = "userRole";

/// Key/value preferences persisted as a single JSON object file.
///
/// A missing file reads as an empty object. Keys other than `userRole` are preserved on write.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Map::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl RolePreferences for FilePreferences {
    fn load_role(&self) -> Result<Option<String>> {
        let prefs = self.read_all()?;
        Ok(prefs
            .get(ROLE_KEY)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn save_role(&self, role: &str) -> Result<()> {
        let mut prefs = self.read_all()?;
        prefs.insert(ROLE_KEY.to_string(), Value::String(role.to_string()));
        fs::write(&self.path, serde_json::to_string_pretty(&prefs)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::{AccessPolicy, Role};

    #[test]
    fn test_missing_file_has_no_role() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePreferences::new(dir.path().join("prefs.json"));
        assert_eq!(prefs.load_role().unwrap(), None);
    }

    #[test]
    fn test_save_role_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let prefs = FilePreferences::new(&path);
        prefs.save_role("autorizador").unwrap();

        assert_eq!(prefs.load_role().unwrap().as_deref(), Some("autorizador"));
        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
    }

    #[test]
    fn test_policy_reads_file_on_each_query() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let policy = AccessPolicy::new(FilePreferences::new(&path));
        assert_eq!(policy.role().unwrap(), Role::Solicitante);

        fs::write(&path, r#"{"userRole":"admin"}"#).unwrap();
        assert!(policy.permissions().unwrap().can_pay);
    }
}
