#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// Category a widget failure falls into, derived from its description text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum ErrorCategory {
    Authentication,
    Connectivity,
    NotFound,
    Unexpected,
}

/// Maps failure descriptions to user-facing categories.
///
/// The widget SDK exposes no structured error codes, so this is a substring
/// heuristic. Matching is case-sensitive and the first matching category in
/// the order token, network/fetch, dashboard wins.
#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, description: &str) -> ErrorCategory {
        if description.contains("token") {
            ErrorCategory::Authentication
        } else if description.contains("network") || description.contains("fetch") {
            ErrorCategory::Connectivity
        } else if description.contains("dashboard") {
            ErrorCategory::NotFound
        } else {
            ErrorCategory::Unexpected
        }
    }

    /// Localized message shown in the error panel for a failure description.
    pub fn user_message(&self, description: &str) -> String {
        match self.classify(description) {
            ErrorCategory::Authentication => {
                "Erro de autenticação. Verifique as credenciais.".to_string()
            }
            ErrorCategory::Connectivity => {
                "Erro de conexão. Verifique sua conexão com a internet.".to_string()
            }
            ErrorCategory::NotFound => {
                "Dashboard não encontrado. Verifique o ID do dashboard.".to_string()
            }
            ErrorCategory::Unexpected => format!("Erro inesperado: {}", description),
        }
    }

    pub fn log_level(&self, category: ErrorCategory) -> LogLevel {
        match category {
            // Critical: credentials or configuration need fixing
            ErrorCategory::Authentication => LogLevel::Error,
            ErrorCategory::NotFound => LogLevel::Error,

            // Usually temporary
            ErrorCategory::Connectivity => LogLevel::Warn,
            ErrorCategory::Unexpected => LogLevel::Warn,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_keyword() {
        let classifier = ErrorClassifier::new();
        assert_eq!(
            classifier.classify("invalid token (HTTP 401)"),
            ErrorCategory::Authentication
        );
        assert_eq!(
            classifier.classify("network timeout"),
            ErrorCategory::Connectivity
        );
        assert_eq!(
            classifier.classify("Failed to fetch"),
            ErrorCategory::Connectivity
        );
        assert_eq!(
            classifier.classify("dashboard not found"),
            ErrorCategory::NotFound
        );
        assert_eq!(
            classifier.classify("something broke"),
            ErrorCategory::Unexpected
        );
    }

    #[test]
    // When several keywords are present the earliest category in the list wins.
    fn first_matching_category_wins() {
        let classifier = ErrorClassifier::new();
        assert_eq!(
            classifier.classify("dashboard fetch failed: token expired"),
            ErrorCategory::Authentication
        );
        assert_eq!(
            classifier.classify("dashboard unreachable over network"),
            ErrorCategory::Connectivity
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        let classifier = ErrorClassifier::new();
        assert_eq!(classifier.classify("Token rejected"), ErrorCategory::Unexpected);
        assert_eq!(classifier.classify("NETWORK down"), ErrorCategory::Unexpected);
    }

    #[test]
    fn messages_are_distinct_and_unexpected_echoes_text() {
        let classifier = ErrorClassifier::new();
        let auth = classifier.user_message("token");
        let conn = classifier.user_message("network");
        let missing = classifier.user_message("dashboard");
        let other = classifier.user_message("disk on fire");

        assert_eq!(auth, "Erro de autenticação. Verifique as credenciais.");
        assert_eq!(conn, "Erro de conexão. Verifique sua conexão com a internet.");
        assert_eq!(missing, "Dashboard não encontrado. Verifique o ID do dashboard.");
        assert_eq!(other, "Erro inesperado: disk on fire");
    }

    #[test]
    fn credential_failures_log_as_errors() {
        let classifier = ErrorClassifier::new();
        assert_eq!(
            classifier.log_level(ErrorCategory::Authentication),
            LogLevel::Error
        );
        assert_eq!(
            classifier.log_level(ErrorCategory::Connectivity),
            LogLevel::Warn
        );
    }
}
