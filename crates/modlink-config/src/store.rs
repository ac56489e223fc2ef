//! Reading and writing a [`Configuration`] to its module-scoped store
//! file (`spec.md` §6: "module-scoped file named `config`").

use crate::atomic::write_atomically;
use crate::codec::{read_configuration, write_configuration};
use crate::error::{ConfigError, Result};
use crate::types::Configuration;
use std::path::Path;

/// Persist `cfg` to `path`, atomically.
pub fn save(path: &Path, cfg: &Configuration) -> Result<()> {
    let mut buf = Vec::new();
    write_configuration(&mut buf, cfg)?;
    write_atomically(path, &buf)
}

/// Load a [`Configuration`] previously written by [`save`].
pub fn load(path: &Path) -> Result<Configuration> {
    let file = std::fs::File::open(path).map_err(|e| ConfigError::io(path, e))?;
    let mut reader = std::io::BufReader::new(file);
    read_configuration(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContextRecord, ModuleEntry};
    use modlink_core::ModuleId;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_round_trips() {
        let cfg = Configuration::new(
            vec![ModuleId::new("app")],
            vec![ContextRecord::new(
                "+app",
                vec![ModuleEntry {
                    id: ModuleId::new("app"),
                    library_path: None,
                }],
                vec![],
                vec![],
            )],
        );

        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        save(&path, &cfg).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(cfg, loaded);
    }
}
