//! CLI Exit Code Registry
//!
//! Single source of truth for `funnelaudit` exit codes. Scripts and CI jobs
//! rely on these values.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success (report written)                             |
//! | 2    | Usage error (bad arguments, invalid config)          |
//! | 3    | Input source not found                               |
//! | 4    | Input source is not parseable CSV                    |
//! | 5    | Report could not be serialized or written            |
//! | 6    | Findings present and `--fail-on-findings` was given  |

use funnelaudit_engine::AuditError;

/// Success - report produced.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments or an invalid config file.
/// Matches the code clap uses for argument errors.
pub const EXIT_USAGE: u8 = 2;

/// An input CSV path does not exist.
pub const EXIT_SOURCE_NOT_FOUND: u8 = 3;

/// An input CSV exists but cannot be read as UTF-8 delimited text.
pub const EXIT_SOURCE_FORMAT: u8 = 4;

/// Report serialization or `--output` write failed.
pub const EXIT_OUTPUT: u8 = 5;

/// Integrity or duplicate findings present (only with `--fail-on-findings`).
pub const EXIT_FINDINGS: u8 = 6;

/// Map an engine error to its exit code.
pub fn audit_exit_code(err: &AuditError) -> u8 {
    match err {
        AuditError::SourceNotFound { .. } => EXIT_SOURCE_NOT_FOUND,
        AuditError::SourceFormat { .. } => EXIT_SOURCE_FORMAT,
        AuditError::Serialization(_) => EXIT_OUTPUT,
        AuditError::ConfigParse(_) | AuditError::ConfigValidation(_) => EXIT_USAGE,
    }
}
