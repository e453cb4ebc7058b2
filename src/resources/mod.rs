use std::path::{Path, PathBuf};

/**
 * This module contains all logic for turning external files and built-in
 * descriptions into data the renderer can upload: decoded texture images and
 * the procedural primitive meshes.
 */
pub mod mesh;
pub mod texture;

/// Environment variable that overrides the asset directory.
pub const ASSET_DIR_ENV: &str = "DESK_SCENE_ASSETS";

/// Copy of `assets/` made by the build script, if there was one to copy.
const BUNDLED_ASSETS: Option<&str> = option_env!("DESK_SCENE_BUNDLED_ASSETS");

/// Directory the scene's texture files are read from.
///
/// `DESK_SCENE_ASSETS` wins when set. Otherwise `./assets` relative to the
/// working directory is used, falling back to the build output's copy when
/// the working directory has none.
pub fn asset_dir() -> PathBuf {
    let env_dir = std::env::var_os(ASSET_DIR_ENV).map(PathBuf::from);
    resolve_asset_dir(env_dir, Path::new("./").join("assets"), BUNDLED_ASSETS.map(PathBuf::from))
}

fn resolve_asset_dir(env_dir: Option<PathBuf>, local: PathBuf, bundled: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = env_dir.filter(|dir| !dir.as_os_str().is_empty()) {
        return dir;
    }
    if local.is_dir() {
        return local;
    }
    match bundled {
        Some(dir) if dir.is_dir() => dir,
        _ => local,
    }
}

/// Full path of `file_name` inside `dir`.
pub fn asset_path(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins() {
        let dir = resolve_asset_dir(
            Some(PathBuf::from("/opt/desk")),
            PathBuf::from("./assets"),
            Some(PathBuf::from("/tmp")),
        );
        assert_eq!(dir, PathBuf::from("/opt/desk"));
    }

    #[test]
    fn empty_override_is_ignored() {
        let local = tempfile::tempdir().unwrap();
        let dir = resolve_asset_dir(Some(PathBuf::new()), local.path().to_path_buf(), None);
        assert_eq!(dir, local.path());
    }

    #[test]
    fn bundled_copy_is_used_without_a_local_dir() {
        let bundled = tempfile::tempdir().unwrap();
        let missing = bundled.path().join("not-here");
        let dir = resolve_asset_dir(None, missing.clone(), Some(bundled.path().to_path_buf()));
        assert_eq!(dir, bundled.path());

        // nothing exists: report the local path so load errors name it
        let dir = resolve_asset_dir(None, missing.clone(), Some(missing.join("also-not-here")));
        assert_eq!(dir, missing);
    }
}
