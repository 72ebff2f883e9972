//! Command handlers.

use super::Commands;
use curio::{ApiResponse, AssetMetadata, AssetRegistry, CurioResult, FilePayload};
use curio_error::{CurioError, StorageError, StorageErrorKind, ValidationError};
use serde::Serialize;
use serde_json::{Value, json};
use std::path::Path;
use uuid::Uuid;

/// Run a command and render its JSON envelope.
///
/// Returns the rendered envelope and whether the command succeeded.
pub async fn run_command(registry: &AssetRegistry, command: Commands) -> (String, bool) {
    let diagnostics = registry.config().diagnostics;

    let result: CurioResult<(String, Value)> = match command {
        Commands::List { collection } => list(registry, &collection).await,
        Commands::Add {
            collection,
            file,
            meta,
        } => add(registry, &collection, &file, meta).await,
        Commands::Remove {
            collection,
            identifier,
        } => remove(registry, &collection, &identifier).await,
        Commands::UploadDocument { file } => upload_document(registry, &file).await,
    };

    match result {
        Ok((message, data)) => (render(&ApiResponse::ok(message, data)), true),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            (render(&ApiResponse::<Value>::failure(&e, diagnostics)), false)
        }
    }
}

fn render<T: Serialize>(response: &ApiResponse<T>) -> String {
    serde_json::to_string_pretty(response).unwrap_or_else(|e| {
        format!(
            "{{\"success\":false,\"code\":\"json_error\",\"message\":\"{}\"}}",
            e
        )
    })
}

fn to_value<T: Serialize>(value: &T) -> CurioResult<Value> {
    serde_json::to_value(value).map_err(|e| CurioError::from(curio_error::JsonError::from(e)))
}

async fn list(registry: &AssetRegistry, collection: &str) -> CurioResult<(String, Value)> {
    let view = registry.read_collection(collection).await?;
    Ok((
        format!("{} assets retrieved successfully", collection),
        json!({ "records": to_value(&*view)? }),
    ))
}

async fn add(
    registry: &AssetRegistry,
    collection: &str,
    file: &Path,
    meta: Vec<(String, String)>,
) -> CurioResult<(String, Value)> {
    let payload = stage(registry, file).await?;
    let metadata: AssetMetadata = meta
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    let record = registry
        .create_asset(collection, Some(payload), metadata)
        .await?;
    Ok((
        format!("{} asset uploaded successfully", collection),
        json!({ "record": to_value(&record)? }),
    ))
}

async fn remove(
    registry: &AssetRegistry,
    collection: &str,
    identifier: &str,
) -> CurioResult<(String, Value)> {
    let outcome = registry.delete_asset(collection, identifier).await?;
    Ok((
        format!("{} asset deleted successfully", collection),
        to_value(&outcome)?,
    ))
}

async fn upload_document(registry: &AssetRegistry, file: &Path) -> CurioResult<(String, Value)> {
    let payload = stage(registry, file).await?;
    let uploaded = registry.upload_document(Some(payload)).await?;
    Ok((
        "Document uploaded successfully".to_string(),
        json!({ "fileUrl": uploaded.url, "id": uploaded.id }),
    ))
}

/// Copy `file` into `<data_dir>/uploads/` so the upload consumes the copy.
async fn stage(registry: &AssetRegistry, file: &Path) -> CurioResult<FilePayload> {
    if !tokio::fs::try_exists(file).await.unwrap_or(false) {
        return Err(ValidationError::new(format!("No such file: {}", file.display())).into());
    }

    let uploads = registry.config().data_dir.join("uploads");
    tokio::fs::create_dir_all(&uploads).await.map_err(|e| {
        StorageError::new(StorageErrorKind::DirectoryCreation(format!(
            "{}: {}",
            uploads.display(),
            e
        )))
    })?;

    let staged_name = match file.extension() {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext.to_string_lossy()),
        None => Uuid::new_v4().to_string(),
    };
    let staged = uploads.join(staged_name);
    tokio::fs::copy(file, &staged).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "stage {} as {}: {}",
            file.display(),
            staged.display(),
            e
        )))
    })?;

    let mut payload = FilePayload::new(staged);
    if let Some(name) = file.file_name() {
        payload = payload.with_original_name(name.to_string_lossy());
    }
    Ok(payload)
}
