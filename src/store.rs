use crate::error::RepairError;
use std::path::{Path, PathBuf};

pub async fn read_text(path: &Path) -> Result<String, RepairError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| RepairError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| RepairError::InvalidUtf8 {
        path: path.to_path_buf(),
    })
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "buffer".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace the file's content without ever truncating it in place: the new
/// text goes to a sibling temp file which is then renamed over the target.
/// On any failure the original content is untouched.
pub async fn write_atomic(path: &Path, text: &str) -> Result<(), RepairError> {
    let tmp = sibling_tmp_path(path);
    if let Err(source) = tokio::fs::write(&tmp, text.as_bytes()).await {
        return Err(RepairError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    if let Err(source) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(RepairError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
