//! Built-in field tokens

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A built-in field that can be named in a format string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Name of the logger
    Name,
    /// Per-logger sequence number
    Seqid,
    /// Level number
    Levelno,
    /// Level name
    Levelname,
    /// Logger start time, nanoseconds since the Unix epoch
    Created,
    /// Nanosecond-of-second of the logger start time
    Nsecs,
    /// Record time rendered with the logger's timestamp format
    Time,
    /// Record time, nanoseconds since the Unix epoch
    Timestamp,
    /// Nanoseconds between logger start and record time
    Rtime,
    /// Base name of the caller's source file
    Filename,
    /// Caller's source path as recorded by the compiler
    Pathname,
    /// Base name of the running executable
    Module,
    /// Caller's source line
    Lineno,
    /// Caller's function name, without its path
    Funcname,
    /// Name (or id) of the emitting thread
    Thread,
    /// Process id
    Process,
    /// The log message
    Message,
}

impl Field {
    pub const ALL: [Field; 17] = [
        Field::Name,
        Field::Seqid,
        Field::Levelno,
        Field::Levelname,
        Field::Created,
        Field::Nsecs,
        Field::Time,
        Field::Timestamp,
        Field::Rtime,
        Field::Filename,
        Field::Pathname,
        Field::Module,
        Field::Lineno,
        Field::Funcname,
        Field::Thread,
        Field::Process,
        Field::Message,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Seqid => "seqid",
            Field::Levelno => "levelno",
            Field::Levelname => "levelname",
            Field::Created => "created",
            Field::Nsecs => "nsecs",
            Field::Time => "time",
            Field::Timestamp => "timestamp",
            Field::Rtime => "rtime",
            Field::Filename => "filename",
            Field::Pathname => "pathname",
            Field::Module => "module",
            Field::Lineno => "lineno",
            Field::Funcname => "funcname",
            Field::Thread => "thread",
            Field::Process => "process",
            Field::Message => "message",
        }
    }

    /// Whether resolving this field needs the caller's location
    pub fn requires_runtime(&self) -> bool {
        matches!(
            self,
            Field::Filename | Field::Pathname | Field::Lineno | Field::Funcname | Field::Thread
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Field {
    type Err = String;

    /// Token names are case-sensitive, as they appear in format strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Field::Name),
            "seqid" => Ok(Field::Seqid),
            "levelno" => Ok(Field::Levelno),
            "levelname" => Ok(Field::Levelname),
            "created" => Ok(Field::Created),
            "nsecs" => Ok(Field::Nsecs),
            "time" => Ok(Field::Time),
            "timestamp" => Ok(Field::Timestamp),
            "rtime" => Ok(Field::Rtime),
            "filename" => Ok(Field::Filename),
            "pathname" => Ok(Field::Pathname),
            "module" => Ok(Field::Module),
            "lineno" => Ok(Field::Lineno),
            "funcname" => Ok(Field::Funcname),
            "thread" => Ok(Field::Thread),
            "process" => Ok(Field::Process),
            "message" => Ok(Field::Message),
            _ => Err(format!("Unknown field: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_classification() {
        let runtime: Vec<&str> = Field::ALL
            .iter()
            .filter(|f| f.requires_runtime())
            .map(Field::to_str)
            .collect();
        assert_eq!(
            runtime,
            vec!["filename", "pathname", "lineno", "funcname", "thread"]
        );
    }

    #[test]
    fn test_names_are_unique_and_parse_back() {
        let mut names: Vec<&str> = Field::ALL.iter().map(Field::to_str).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Field::ALL.len());

        for field in Field::ALL {
            assert_eq!(field.to_str().parse::<Field>(), Ok(field));
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Message".parse::<Field>().is_err());
        assert!("".parse::<Field>().is_err());
    }

    #[test]
    fn test_serde_uses_token_names() {
        assert_eq!(serde_json::to_string(&Field::Levelname).unwrap(), "\"levelname\"");
        let field: Field = serde_json::from_str("\"rtime\"").unwrap();
        assert_eq!(field, Field::Rtime);
    }
}
