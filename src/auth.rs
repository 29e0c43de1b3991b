use std::fmt;

/// Jenkins API token.
///
/// Wrapped in a newtype so the secret never leaks through `Debug` output
/// or log lines.
#[derive(Clone)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(****)")
    }
}

/// HTTP basic-auth credentials: Jenkins username plus API token.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub token: Token,
}

impl Credentials {
    pub fn new(username: String, token: Token) -> Self {
        Self { username, token }
    }

    /// Attaches the credentials to an outgoing request.
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.username, Some(self.token.as_str()))
    }
}
