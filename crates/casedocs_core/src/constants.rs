//! Shared constants used across casedocs crates.

/// Default API port.
pub const DEFAULT_PORT: u16 = 4603;

/// Default maximum multipart upload size accepted by the API layer.
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 100 * 1024 * 1024;

/// Field name that inbound bindings may never populate.
pub const IS_ADMIN: &str = "isAdmin";

/// Header carrying the authenticated end-user identity.
pub const USER_ID_HEADER: &str = "user-id";

/// Header carrying the calling service's token.
pub const SERVICE_AUTHORIZATION_HEADER: &str = "ServiceAuthorization";

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "casedocs.redb";
