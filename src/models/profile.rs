use serde::Serialize;

/// Placeholder returned when the account has no visible phone number.
pub const PHONE_NOT_AVAILABLE: &str = "Not available";
/// Placeholder returned for any other absent profile field.
pub const FIELD_NOT_AVAILABLE: &str = "N/A";

/// The authenticated account's own profile, as reported by the account client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// The numeric account identifier.
    pub id: i64,
    /// The phone number, digits only, if visible.
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl Profile {
    /// Builds a profile, treating empty strings as absent.
    pub fn new(
        id: i64,
        phone: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
        username: Option<&str>,
    ) -> Self {
        fn present(value: Option<&str>) -> Option<String> {
            value.filter(|v| !v.is_empty()).map(str::to_string)
        }

        Self {
            id,
            phone: present(phone),
            first_name: present(first_name),
            last_name: present(last_name),
            username: present(username),
        }
    }
}

/// The response payload for a successful lookup.
#[derive(Serialize, Debug)]
pub struct ProfileResponse {
    pub success: bool,
    pub phone_number: String,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

/// Formats a phone number for display.
///
/// Only a real number gets the `+` prefix; the placeholder is returned as is.
pub fn format_phone(phone: Option<&str>) -> String {
    match phone.map(|p| p.trim_start_matches('+')).filter(|p| !p.is_empty()) {
        Some(digits) => format!("+{}", digits),
        None => PHONE_NOT_AVAILABLE.to_string(),
    }
}

fn or_not_available(value: Option<String>) -> String {
    value.unwrap_or_else(|| FIELD_NOT_AVAILABLE.to_string())
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            success: true,
            phone_number: format_phone(profile.phone.as_deref()),
            user_id: profile.id,
            first_name: or_not_available(profile.first_name),
            last_name: or_not_available(profile.last_name),
            username: or_not_available(profile.username),
        }
    }
}
