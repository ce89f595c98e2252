use crate::models::LedgerData;
use std::path::Path;
use tokio::fs;
use tracing::{debug, error};

pub async fn load_data(path: &Path) -> LedgerData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse ledger file: {err}");
                LedgerData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => LedgerData::default(),
        Err(err) => {
            error!("failed to read ledger file: {err}");
            LedgerData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &LedgerData) -> Result<(), std::io::Error> {
    let payload = serde_json::to_vec_pretty(data)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, payload).await?;
    debug!(path = %path.display(), "ledger persisted");
    Ok(())
}
