//! Profile rows stored alongside each identity in the `profiles` table.

use chrono::{DateTime, Utc};

use crate::ids::UserId;

/// A user's profile as read back from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    pub id: UserId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub phone_number: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn empty(id: UserId) -> Self {
        Self {
            id,
            name: None,
            last_name: None,
            phone_number: None,
            updated_at: None,
        }
    }

    /// First name, if set and not blank.
    pub fn first_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn full_name(&self) -> Option<String> {
        let first = self.first_name()?;
        match self
            .last_name
            .as_deref()
            .map(str::trim)
            .filter(|last| !last.is_empty())
        {
            Some(last) => Some(format!("{first} {last}")),
            None => Some(first.to_string()),
        }
    }

    /// Home screen greeting.
    pub fn greeting(profile: Option<&Profile>) -> String {
        match profile.and_then(Profile::first_name) {
            Some(name) => format!("Bem-vindo, {name}!"),
            None => "Bem-vindo!".to_string(),
        }
    }
}

/// Row written right after an identity is created.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileUpsert {
    pub id: UserId,
    pub name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update issued from account settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileUpdate {
    pub name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn profile(name: Option<&str>, last_name: Option<&str>) -> Profile {
        Profile {
            name: name.map(str::to_string),
            last_name: last_name.map(str::to_string),
            ..Profile::empty(UserId(Uuid::nil()))
        }
    }

    #[test]
    fn greeting_uses_first_name_when_present() {
        let ana = profile(Some("Ana"), Some("Silva"));
        assert_eq!(Profile::greeting(Some(&ana)), "Bem-vindo, Ana!");
    }

    #[test]
    fn greeting_falls_back_for_missing_or_blank_name() {
        assert_eq!(Profile::greeting(None), "Bem-vindo!");
        let blank = profile(Some("   "), None);
        assert_eq!(Profile::greeting(Some(&blank)), "Bem-vindo!");
    }

    #[test]
    fn full_name_skips_blank_last_name() {
        assert_eq!(
            profile(Some("Ana"), Some(" ")).full_name().as_deref(),
            Some("Ana")
        );
        assert_eq!(
            profile(Some("Ana"), Some("Silva")).full_name().as_deref(),
            Some("Ana Silva")
        );
        assert_eq!(profile(None, Some("Silva")).full_name(), None);
    }
}
