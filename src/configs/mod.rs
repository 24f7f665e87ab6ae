//! Shell configuration writer.
//!
//! Writes the embedded `.zshrc` and `.tmux.conf` templates into the home
//! directory, unconditionally overwriting whatever is there. Bootstrap,
//! not merge: running twice is byte-identical, and prior manual edits are
//! not preserved (machine-local additions belong in `~/.zshrc.local`,
//! which the template sources).

use std::fs;
use std::path::{Path, PathBuf};

use include_dir::{include_dir, Dir};

use crate::error::Result;

static TEMPLATES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Template file name → target file name in the home directory.
const CONFIGS: &[(&str, &str)] = &[("zshrc", ".zshrc"), ("tmux.conf", ".tmux.conf")];

/// Write all shell configuration files into `home`.
///
/// Returns the paths written. The only failure mode is filesystem write
/// failure, which is fatal.
pub fn write_configs(home: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for (template, target) in CONFIGS {
        let contents = TEMPLATES_DIR
            .get_file(template)
            .map(|f| f.contents())
            .unwrap_or_default();
        let path = home.join(target);
        fs::write(&path, contents)?;
        tracing::debug!(path = %path.display(), "wrote config");
        written.push(path);
    }

    Ok(written)
}
