use ulid::Ulid;

/// Request context threaded through every command and query.
///
/// Carries the acting user explicitly; nothing in the workspace reads the
/// user from ambient state.
#[derive(Clone, Debug)]
pub struct Metadata {
    pub id: String,
    pub trigger_by: Option<String>,
}

impl Metadata {
    pub fn new(trigger_by: impl Into<Option<String>>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            trigger_by: trigger_by.into(),
        }
    }

    pub fn by(trigger_by: impl Into<String>) -> Self {
        Self::new(Some(trigger_by.into()))
    }

    pub fn trigger_by(&self) -> crate::Result<String> {
        match self.trigger_by.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id.to_owned()),
            _ => crate::bail!("User not found in metadata"),
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new(None)
    }
}
