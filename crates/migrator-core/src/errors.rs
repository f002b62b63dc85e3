use migrator_core_types::RunId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using MigratorError
pub type Result<T> = std::result::Result<T, MigratorError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure of a migration run is classified into exactly one kind.
/// Each kind maps to a stable error code that callers and tests can match on
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Source discovery
    PathNotFound,
    InvalidMigrationName,
    FileReadError,

    // Database reachability
    ConnectionError,

    // Ledger
    SchemaInitError,
    LedgerReadError,
    LedgerWriteError,

    // Apply
    MigrationExecError,
    CommitError,

    // Configuration
    InvalidInput,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::PathNotFound => "ERR_PATH_NOT_FOUND",
            ExErrorKind::InvalidMigrationName => "ERR_INVALID_MIGRATION_NAME",
            ExErrorKind::FileReadError => "ERR_FILE_READ",
            ExErrorKind::ConnectionError => "ERR_CONNECTION",
            ExErrorKind::SchemaInitError => "ERR_SCHEMA_INIT",
            ExErrorKind::LedgerReadError => "ERR_LEDGER_READ",
            ExErrorKind::LedgerWriteError => "ERR_LEDGER_WRITE",
            ExErrorKind::MigrationExecError => "ERR_MIGRATION_EXEC",
            ExErrorKind::CommitError => "ERR_COMMIT",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus enough context (operation, migration
/// version and name, path) to diagnose a failed run without re-running it.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    migration_version: Option<i64>,
    migration_name: Option<String>,
    path: Option<PathBuf>,
    run_id: Option<RunId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            migration_version: None,
            migration_name: None,
            path: None,
            run_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add migration version context
    pub fn with_version(mut self, version: i64) -> Self {
        self.migration_version = Some(version);
        self
    }

    /// Add migration name context
    pub fn with_migration_name(mut self, name: impl Into<String>) -> Self {
        self.migration_name = Some(name.into());
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add run ID context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the migration version context, if any
    pub fn migration_version(&self) -> Option<i64> {
        self.migration_version
    }

    /// Get the migration name context, if any
    pub fn migration_name(&self) -> Option<&str> {
        self.migration_name.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// Get the run ID context, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(version) = self.migration_version {
            write!(f, " (version: {})", version)?;
        }
        if let Some(name) = &self.migration_name {
            write!(f, " (migration: {})", name)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Errors raised while discovering migrations on disk
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigratorError {
    /// Migrations directory is missing or not a directory
    #[error("Migrations path does not exist: {}", path.display())]
    PathNotFound { path: PathBuf },

    /// Version prefix of a migration filename could not be parsed
    #[error("Invalid migration filename {file_name}: {reason}")]
    InvalidMigrationName { file_name: String, reason: String },

    /// A migration file (or the directory listing) could not be read
    #[error("Failed to read migration {}: {reason}", path.display())]
    FileReadError { path: PathBuf, reason: String },
}

impl From<MigratorError> for ExError {
    fn from(err: MigratorError) -> Self {
        match err {
            MigratorError::PathNotFound { path } => ExError::new(ExErrorKind::PathNotFound)
                .with_op("read_migrations")
                .with_message("Migrations path does not exist")
                .with_path(path),

            MigratorError::InvalidMigrationName { file_name, reason } => {
                ExError::new(ExErrorKind::InvalidMigrationName)
                    .with_op("read_migrations")
                    .with_message(format!("Invalid migration filename: {}", reason))
                    .with_migration_name(file_name)
            }

            MigratorError::FileReadError { path, reason } => {
                ExError::new(ExErrorKind::FileReadError)
                    .with_op("read_migrations")
                    .with_message(format!("Failed to read migration: {}", reason))
                    .with_path(path)
            }
        }
    }
}
