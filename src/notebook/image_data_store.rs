// Reads and writes the JSON sidecar files that hold per-image annotation data.
//
// Writes overwrite the whole file in place. There is no temp-file rename or
// fsync, and two concurrent writes to the same sidecar are last-write-wins.

use super::error::{NotebookError, NotebookResult};
use super::path_resolver::resolve;
use crate::models::ImageData;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Raw bytes of an image together with the content type to serve them with.
#[derive(Debug)]
pub struct ImageFile {
    pub bytes: Vec<u8>,
    pub content_type: mime::Mime,
}

/// Loads and parses a sidecar file.
pub async fn read_image_data(data_path: &Path) -> NotebookResult<ImageData> {
    let contents = match fs::read(data_path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(NotebookError::ImageDataNotFound(
                data_path.display().to_string(),
            ));
        }
        Err(err) => return Err(NotebookError::storage(data_path, err)),
    };

    serde_json::from_slice(&contents).map_err(|source| NotebookError::MalformedData {
        path: data_path.to_path_buf(),
        source,
    })
}

/// Serializes `data` and replaces the sidecar file. The parent directory must exist.
pub async fn write_image_data(data_path: &Path, data: &ImageData) -> NotebookResult<()> {
    let contents = serde_json::to_vec(data)
        .map_err(|e| NotebookError::Validation(format!("Unserializable image data: {}", e)))?;

    fs::write(data_path, contents)
        .await
        .map_err(|err| NotebookError::storage(data_path, err))?;

    debug!("Wrote image data to {:?}", data_path);
    Ok(())
}

/// Returns the sidecar data of the image at `key`.
///
/// Fails with `ImageNotFound` when the image itself is missing, even if a
/// stray sidecar file exists.
pub async fn get_image_data(root_dir: &Path, key: &str) -> NotebookResult<ImageData> {
    let resolved = resolve(root_dir, key)?;

    if !is_file(&resolved.absolute_path).await {
        return Err(NotebookError::ImageNotFound(key.to_string()));
    }

    match read_image_data(&resolved.data_path).await {
        Err(NotebookError::ImageDataNotFound(_)) => {
            Err(NotebookError::ImageDataNotFound(key.to_string()))
        }
        other => other,
    }
}

/// Stores `data` as the sidecar of `key` and echoes it back.
///
/// The image does not need to exist, so orphan sidecars can be created.
pub async fn put_image_data(
    root_dir: &Path,
    key: &str,
    data: ImageData,
) -> NotebookResult<ImageData> {
    let resolved = resolve(root_dir, key)?;
    write_image_data(&resolved.data_path, &data).await?;
    Ok(data)
}

/// Reads the raw bytes of the image at `key`.
pub async fn get_image(root_dir: &Path, key: &str) -> NotebookResult<ImageFile> {
    let resolved = resolve(root_dir, key)?;

    if !is_file(&resolved.absolute_path).await {
        return Err(NotebookError::ImageNotFound(key.to_string()));
    }

    let bytes = fs::read(&resolved.absolute_path)
        .await
        .map_err(|err| NotebookError::storage(&resolved.absolute_path, err))?;

    Ok(ImageFile {
        bytes,
        content_type: content_type_for(&resolved.absolute_path),
    })
}

pub fn content_type_for(path: &Path) -> mime::Mime {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
        Some("png") => mime::IMAGE_PNG,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

pub(crate) async fn is_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}
