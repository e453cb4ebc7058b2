use anyhow::*;
use fs_extra::dir::{CopyOptions, copy};
use std::env;
use std::path::PathBuf;

/// Bundles the scene textures with the build so the binary finds them when it
/// is started outside the crate directory.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let textures = manifest_dir.join("assets");
    if !textures.is_dir() {
        return Ok(());
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let options = CopyOptions {
        overwrite: true,
        ..CopyOptions::new()
    };
    copy(&textures, &out_dir, &options)
        .with_context(|| format!("bundling {}", textures.display()))?;
    println!(
        "cargo:rustc-env=DESK_SCENE_BUNDLED_ASSETS={}",
        out_dir.join("assets").display()
    );

    Ok(())
}
