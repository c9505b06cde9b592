use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::api::ApiClient;

pub fn pdf_path(dir: &Path, trip_id: i64) -> PathBuf {
    dir.join(format!("trip-{}.pdf", trip_id))
}

/// Download the backend's PDF for a trip into `dir` as `trip-<id>.pdf`.
pub async fn export_trip(client: &ApiClient, trip_id: i64, dir: &Path) -> Result<PathBuf> {
    let bytes = client
        .export_trip_pdf(trip_id)
        .await
        .with_context(|| format!("Failed to export trip {}", trip_id))?;
    write_pdf(dir, trip_id, &bytes)
}

fn write_pdf(dir: &Path, trip_id: i64, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = pdf_path(dir, trip_id);
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(trip_id, path = %path.display(), "exported trip");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_is_named_after_trip() {
        assert_eq!(
            pdf_path(Path::new("/tmp/out"), 12),
            PathBuf::from("/tmp/out/trip-12.pdf")
        );
    }

    #[tokio::test]
    async fn export_writes_backend_bytes() {
        let mut client = ApiClient::dev().unwrap();
        let token = client.login("demo", "demo").await.unwrap();
        client.set_token(Some(token));
        let trip_id = client.list_trips().await.unwrap()[0].id;

        let dir = tempfile::tempdir().unwrap();
        let path = export_trip(&client, trip_id, &dir.path().join("exports"))
            .await
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(path.file_name().unwrap(), format!("trip-{trip_id}.pdf").as_str());
    }

    #[tokio::test]
    async fn export_without_session_fails() {
        let client = ApiClient::dev().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = export_trip(&client, 1, dir.path()).await.unwrap_err();
        assert!(crate::api::is_unauthorized(&err));
    }
}
