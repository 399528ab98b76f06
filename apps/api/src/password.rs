use anyhow::anyhow;

use crate::errors::AppError;

/// bcrypt ignores everything past this many bytes of input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hashes a plaintext password with bcrypt.
/// bcrypt is deliberately slow, so the work runs on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| anyhow!("password hashing task failed: {e}"))?
        .map_err(|e| AppError::Internal(anyhow!("password hashing failed: {e}")))
}
