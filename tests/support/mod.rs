//! Fake PlantUML renderers for integration tests.
//!
//! Each fake copies its input into the SVG body so tests can tell which
//! back end ran and what it was given.

#![allow(dead_code)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

pub const DIAGRAM: &str = "@startuml\nAlice -> Bob: hello\n@enduml\n";

pub fn write_script(path: &Path, body: &str) {
    fs::write(path, body).expect("write script");
    let mut perms = fs::metadata(path).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("set perms");
}

/// Stand-in for `plantweb --format auto FILES...`; writes into its working directory.
pub fn fake_plantweb(dir: &Path) -> PathBuf {
    let path = dir.join("fake-plantweb");
    write_script(
        &path,
        r#"#!/bin/sh
set -eu
for arg in "$@"; do
  case "$arg" in
    --format|auto) ;;
    *)
      name=$(basename "$arg")
      { echo "<svg><!-- backend=web -->"; cat "$arg"; echo "</svg>"; } > "${name%.*}.svg"
      ;;
  esac
done
"#,
    );
    path
}

/// Stand-in for `java -splash:no -jar JAR -tsvg -o DIR FILES...`.
///
/// The jar path is embedded in the SVG.
pub fn fake_java(dir: &Path) -> PathBuf {
    let path = dir.join("fake-java");
    write_script(
        &path,
        r#"#!/bin/sh
set -eu
out=""
jar=""
while [ "$#" -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    -jar) jar="$2"; shift 2 ;;
    -*) shift ;;
    *)
      name=$(basename "$1")
      { echo "<svg><!-- backend=jar jar=$jar -->"; cat "$1"; echo "</svg>"; } > "$out/${name%.*}.svg"
      shift
      ;;
  esac
done
"#,
    );
    path
}

/// A renderer that leaves a partial SVG behind and then fails.
pub fn failing_renderer(dir: &Path) -> PathBuf {
    let path = dir.join("failing-plantweb");
    write_script(
        &path,
        r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --format|auto) ;;
    *)
      name=$(basename "$arg")
      echo "<svg" > "${name%.*}.svg"
      ;;
  esac
done
echo "Syntax Error? (line 2)" >&2
exit 1
"#,
    );
    path
}

/// A renderer that exits 0 without writing anything.
pub fn silent_renderer(dir: &Path) -> PathBuf {
    let path = dir.join("silent-plantweb");
    write_script(&path, "#!/bin/sh\nexit 0\n");
    path
}

/// File names currently present in `dir`, sorted.
pub fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| {
            entry
                .expect("dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}
