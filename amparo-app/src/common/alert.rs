/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Success,
    Error,
}

/// A modal notification with a single acknowledgment button.
///
/// `on_acknowledge` is the follow-up the owning screen applies once the user
/// dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert<A> {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub on_acknowledge: A,
}

impl<A> Alert<A> {
    pub fn new(
        kind: AlertKind,
        title: impl Into<String>,
        message: impl Into<String>,
        on_acknowledge: A,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            on_acknowledge,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == AlertKind::Error
    }
}

impl<A: Default> Alert<A> {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AlertKind::Error, title, message, A::default())
    }
}

impl<A> std::fmt::Display for Alert<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Identity of one mounted screen instance.
///
/// Every mount gets a fresh id, so a completion tagged with an old id can be
/// recognized and dropped after the screen was replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub u64);

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "screen#{}", self.0)
    }
}
