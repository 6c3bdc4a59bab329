use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Password held by the auth form.
///
/// The buffer is zeroed when the value is dropped or cleared, so a password
/// typed into the sign-in screen does not linger after the screen unmounts.
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct SecureCredential {
    data: String,
}

impl SecureCredential {
    pub fn new(data: String) -> Self {
        Self { data }
    }

    /// Borrow the secret. Do not keep the reference beyond the value's life.
    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whitespace-only counts as blank.
    pub fn is_blank(&self) -> bool {
        self.data.trim().is_empty()
    }

    /// Replace the contents, zeroing the previous buffer first.
    pub fn replace(&mut self, data: String) {
        self.data.zeroize();
        self.data = data;
    }

    pub fn clear(&mut self) {
        self.data.zeroize();
    }
}

impl Clone for SecureCredential {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
        }
    }
}

impl From<String> for SecureCredential {
    fn from(data: String) -> Self {
        Self::new(data)
    }
}

impl From<&str> for SecureCredential {
    fn from(data: &str) -> Self {
        Self::new(data.to_string())
    }
}

impl fmt::Debug for SecureCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureCredential")
            .field("len", &self.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[SecureCredential: {} bytes]", self.len())
    }
}

impl PartialEq for SecureCredential {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        // Compare every byte so timing does not depend on the first mismatch.
        self.data
            .as_bytes()
            .iter()
            .zip(other.data.as_bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl Eq for SecureCredential {}
