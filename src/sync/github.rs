use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{BackupConfig, SyncError, SyncResult};
use crate::model::Deal;

/// Relative path of the backup document inside the configured repository.
pub const BACKUP_FILE_PATH: &str = "deals.json";

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

fn contents_url(repo: &str) -> String {
    format!(
        "https://api.github.com/repos/{}/contents/{}",
        repo, BACKUP_FILE_PATH
    )
}

fn authorized(request: reqwest::RequestBuilder, config: &BackupConfig) -> reqwest::RequestBuilder {
    request
        .header("Authorization", format!("token {}", config.token))
        .header("Accept", "application/vnd.github.v3+json")
        .header("User-Agent", "hungers-crm")
}

async fn remote_message(response: reqwest::Response, fallback: String) -> String {
    match response.json::<ApiErrorBody>().await {
        Ok(body) => body.message.unwrap_or(fallback),
        Err(_) => fallback,
    }
}

/// Reads the remote backup document. A missing document is `Ok(None)`,
/// never an error.
async fn fetch_remote(
    client: &Client,
    config: &BackupConfig,
    repo: &str,
) -> Result<Option<ContentsResponse>, SyncError> {
    let response = authorized(client.get(contents_url(repo)), config)
        .send()
        .await
        .map_err(|e| SyncError::Remote(format!("GitHub request failed: {}", e)))?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }
    let status = response.status();
    if !status.is_success() {
        let fallback = format!("GitHub error ({})", status);
        return Err(SyncError::Remote(remote_message(response, fallback).await));
    }

    response
        .json::<ContentsResponse>()
        .await
        .map(Some)
        .map_err(|e| SyncError::Remote(format!("Failed to parse GitHub response: {}", e)))
}

/// Serializes the full collection into the transport form the contents
/// API expects: pretty-printed JSON, base64-encoded.
pub fn encode_content(deals: &[Deal]) -> Result<String, SyncError> {
    let json = serde_json::to_string_pretty(deals)
        .map_err(|e| SyncError::Decode(format!("Failed to serialize deals: {}", e)))?;
    Ok(BASE64.encode(json.as_bytes()))
}

/// Decodes a remote document back into a deal collection. The contents
/// API wraps base64 with newlines, so whitespace is stripped first. A
/// payload that is not a JSON array of deals is a decode error.
pub fn decode_content(content: &str) -> Result<Vec<Deal>, SyncError> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| SyncError::Decode(format!("El contenido remoto no es base64 válido: {}", e)))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| SyncError::Decode(format!("El contenido remoto no es UTF-8 válido: {}", e)))?;
    serde_json::from_str::<Vec<Deal>>(&text).map_err(|_| {
        SyncError::Decode("El respaldo remoto no es una lista de tratos válida.".to_string())
    })
}

/// Full-replacement push of the deal collection to the configured
/// repository. Read-modify-write: the current content hash is captured
/// first and sent back with the write so a concurrent update surfaces as
/// a conflict instead of being overwritten silently.
pub async fn push_backup(config: &BackupConfig, deals: &[Deal]) -> Result<SyncResult, SyncError> {
    let repo = config.validate()?;
    let client = Client::new();

    // A failed read only means we cannot prove the document exists;
    // first-write semantics (no sha) apply in that case.
    let sha = match fetch_remote(&client, config, &repo).await {
        Ok(Some(remote)) => Some(remote.sha),
        Ok(None) => None,
        Err(err) => {
            log::debug!("Backup document lookup failed, treating as first write: {}", err);
            None
        }
    };

    let request = PutContentsRequest {
        message: format!("🔄 Hungers Sync: {}", chrono::Utc::now().to_rfc3339()),
        content: encode_content(deals)?,
        sha: sha.as_deref(),
    };

    let response = authorized(client.put(contents_url(&repo)), config)
        .json(&request)
        .send()
        .await
        .map_err(|e| SyncError::Remote(format!("GitHub request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let fallback = format!("Error al subir a GitHub ({})", status);
        return Err(SyncError::Remote(remote_message(response, fallback).await));
    }

    Ok(SyncResult {
        success: true,
        message: "Sincronización exitosa con GitHub.".to_string(),
    })
}

/// Fetches and decodes the remote backup. The caller decides whether to
/// apply it; this function never touches local state.
pub async fn pull_backup(config: &BackupConfig) -> Result<Vec<Deal>, SyncError> {
    let repo = config.validate()?;
    let client = Client::new();

    let remote = fetch_remote(&client, config, &repo).await?.ok_or_else(|| {
        SyncError::Remote("No se encontró el archivo de respaldo en el repositorio.".to_string())
    })?;

    decode_content(&remote.content)
}
