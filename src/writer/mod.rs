//! Persisting the extracted image index as pretty-printed JSON.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{error, info};

use crate::cloud::ImageCatalog;
use crate::os_error;

const INDENT: &[u8] = b"    ";

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("Permission denied when trying to save metadata to {}", path.display())]
    PermissionDenied { path: PathBuf },
    #[error("Failed to save metadata to {} - {code}: {message}", path.display())]
    Io {
        path: PathBuf,
        code: String,
        message: String,
    },
    #[error("Failed to serialize metadata to JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Destination of the extracted index.
pub trait MetadataSink {
    fn save(&self, images: &ImageCatalog, path: &Path) -> Result<(), WriteError>;
}

/// Writes the index to the local filesystem with [`save`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileSink;

impl MetadataSink for JsonFileSink {
    fn save(&self, images: &ImageCatalog, path: &Path) -> Result<(), WriteError> {
        save(images, path)
    }
}

/// Render `value` as JSON indented with four spaces.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Replace the file at `path` with `value` as indented JSON. The document is
/// fully serialized before the file is touched, so a serialization failure
/// leaves any previous file in place. Failures are logged before being
/// returned.
pub fn save<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<(), WriteError> {
    let path = path.as_ref();
    let result = write_json(value, path);
    match &result {
        Ok(()) => info!("✅ Saved metadata to {}", path.display()),
        Err(err) => error!("❌ {err}"),
    }
    result
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), WriteError> {
    let bytes = to_pretty_json(value)?;

    fs::write(path, bytes).map_err(|err| match err.kind() {
        ErrorKind::PermissionDenied => WriteError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => {
            let (code, message) = os_error::describe(&err);
            WriteError::Io {
                path: path.to_path_buf(),
                code,
                message,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::Image;
    use crate::logging;
    use serde::ser::Error as _;
    use serde_json::{Value, json};
    use tempfile::tempdir;

    struct Unrepresentable;

    impl Serialize for Unrepresentable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("value has no JSON form"))
        }
    }

    fn sample() -> ImageCatalog {
        let mut images = ImageCatalog::new();
        images.insert(
            "com.ubuntu.cloud:server:24.04:amd64",
            Image::new(
                "noble",
                "24.04",
                "20240423",
                "https://cloud-images.ubuntu.com/releases/server/noble.img",
                "ab12",
            ),
        );
        images
    }

    #[test]
    fn saved_file_reads_back_equal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("images.json");
        let images = sample();

        JsonFileSink.save(&images, &path).unwrap();

        let read_back: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(read_back, serde_json::to_value(&images).unwrap());
    }

    #[test]
    fn output_uses_four_space_indent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");

        save(&json!({"key": "value"}), &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\n    \"key\": \"value\"\n}\n");
    }

    #[test]
    fn existing_file_is_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "{\"stale\": true, \"padding\": \"xxxxxxxxxxxxxxxxxxxx\"}").unwrap();

        save(&json!({}), &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[test]
    fn serialization_failure_is_reported_and_nothing_is_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");

        let (result, logs) = logging::capture(|| save(&Unrepresentable, &path));

        assert!(matches!(result, Err(WriteError::Serialization(_))));
        assert!(!path.exists());
        assert!(logs.contains("Failed to serialize metadata to JSON: value has no JSON form"));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.json");

        let err = save(&sample(), &path).unwrap_err();
        match err {
            WriteError::Io { code, .. } => assert_eq!(code, "2"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn read_only_directory_is_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o555)).unwrap();
        let path = dir.path().join("out.json");
        if fs::write(&path, b"").is_ok() {
            // running as root; permissions are not enforced
            return;
        }

        let err = save(&sample(), &path).unwrap_err();
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();
        assert!(matches!(err, WriteError::PermissionDenied { .. }));
    }

    #[test]
    fn success_is_logged_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dummy_output.json");

        let (result, logs) = logging::capture(|| save(&json!({"key": "value"}), &path));

        assert!(result.is_ok());
        assert!(logs.contains(&format!("Saved metadata to {}", path.display())));
    }
}
