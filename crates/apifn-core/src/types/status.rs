use serde::Serialize;

/// Outcome severity of a validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Ok,
    Error,
}

/// Result of validating a value against a [`Type`](super::Type).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Status {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

impl Status {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            messages: vec![message.into()],
        }
    }

    pub fn is_ok(&self) -> bool {
        self.severity == Severity::Ok
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Record a failure.
    pub fn add(&mut self, message: impl Into<String>) {
        self.severity = Severity::Error;
        self.messages.push(message.into());
    }

    /// Fold a nested status in, prefixing its messages with `path`.
    pub fn absorb(&mut self, path: &str, child: Status) {
        if child.is_ok() {
            return;
        }
        self.severity = Severity::Error;
        self.messages
            .extend(child.messages.into_iter().map(|m| format!("{path}: {m}")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_prefixes_nested_messages() {
        let mut status = Status::ok();
        status.absorb("title", Status::ok());
        assert!(status.is_ok());

        status.absorb("num", Status::error("expected integer but got string"));
        assert!(status.is_error());
        assert_eq!(
            status.messages,
            vec!["num: expected integer but got string".to_string()]
        );
    }
}
