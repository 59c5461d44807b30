//! Process exit codes, taken from BSD sysexits.h

/// Bad flags or a malformed `--data` payload
pub const USAGE: i32 = 64;

/// Records fail validation, or the requested edit is not allowed
pub const DATAERR: i32 = 65;

/// Record file does not exist
pub const NOINPUT: i32 = 66;

/// Record file could not be read or written
pub const IOERR: i32 = 74;

/// Settings file or environment override is unusable
pub const CONFIG: i32 = 78;
