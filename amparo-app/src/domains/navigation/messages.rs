use super::router::Route;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationMessage {
    /// Tap on a tab bar item.
    SelectTab(Route),
    Push(Route),
    Back,
    /// Non-stacking redirect.
    Replace(Route),
}

impl NavigationMessage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectTab(_) => "Navigation::SelectTab",
            Self::Push(_) => "Navigation::Push",
            Self::Back => "Navigation::Back",
            Self::Replace(_) => "Navigation::Replace",
        }
    }
}
