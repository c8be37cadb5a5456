use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

/// Builds `samples/native_lib` once per test binary and returns the path of the
/// resulting shared library.
pub fn native_lib_path() -> &'static Path {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(build_native_lib)
}

pub fn native_lib_signatures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("samples/native_lib/native_lib.signatures.json")
}

fn build_native_lib() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR")).join("samples/native_lib/Cargo.toml");
    let target_dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join("native_lib");

    let status = Command::new(env!("CARGO"))
        .arg("build")
        .arg("--quiet")
        .arg("--manifest-path")
        .arg(&manifest)
        .arg("--target-dir")
        .arg(&target_dir)
        .status()
        .expect("failed to run cargo");
    assert!(status.success(), "building native_lib failed: {}", status);

    let path = target_dir
        .join("debug")
        .join(libloading::library_filename("native_lib"));
    assert!(path.is_file(), "{} was not built", path.display());

    path
}
