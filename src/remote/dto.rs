use serde::Deserialize;

/// Error body returned by PostgREST on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct PostgrestError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl PostgrestError {
    pub fn describe(&self) -> String {
        let mut text = self.message.clone();
        if let Some(details) = self.details.as_deref().filter(|d| !d.is_empty()) {
            text.push_str(" (");
            text.push_str(details);
            text.push(')');
        }
        if let Some(hint) = self.hint.as_deref().filter(|h| !h.is_empty()) {
            text.push_str("; hint: ");
            text.push_str(hint);
        }
        text
    }
}
