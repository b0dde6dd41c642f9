use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Hand-off written to `communicate.json` before the task starts.
/// The task reads it at startup to learn the address and where to log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub email: String,
    pub log_directory: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Chosen(String),
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_field_names() {
        let d = SessionDescriptor {
            email: "alice@example.com".into(),
            log_directory: PathBuf::from("/data/output/x"),
        };
        assert_eq!(
            serde_json::to_string(&d).unwrap(),
            r#"{"email":"alice@example.com","log_directory":"/data/output/x"}"#
        );
    }
}
