//! User identity model.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth::Role;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
    EmptyUsername,
    UsernameInvalidCharacters,
    UsernameTooLong { max: usize },
    EmptyDisplayName,
    DisplayNameTooShort { min: usize },
    DisplayNameTooLong { max: usize },
    DisplayNameInvalidCharacters,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, dots, hyphens, or underscores",
            ),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooShort { min } => {
                write!(f, "display name must be at least {min} characters")
            }
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::DisplayNameInvalidCharacters => write!(
                f,
                "display name may only contain letters, numbers, spaces, or underscores",
            ),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let parsed =
            Uuid::parse_str(id.as_ref().trim()).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct a [`UserId`] from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 64;

/// Login name used to authenticate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        let allowed =
            |c: char| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' || c == '@';
        if !username.chars().all(allowed) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Minimum allowed length for a display name.
pub const DISPLAY_NAME_MIN: usize = 3;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 64;

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }

        let length = display_name.chars().count();
        if length < DISPLAY_NAME_MIN {
            return Err(UserValidationError::DisplayNameTooShort {
                min: DISPLAY_NAME_MIN,
            });
        }
        if length > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }

        let allowed = |c: char| c.is_alphanumeric() || c == ' ' || c == '_';
        if !display_name.chars().all(allowed) {
            return Err(UserValidationError::DisplayNameInvalidCharacters);
        }

        Ok(Self(display_name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user.
///
/// ## Invariants
/// - `username` satisfies [`Username`] validation.
/// - `display_name` satisfies [`DisplayName`] validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct User {
    id: UserId,
    username: Username,
    #[serde(alias = "display_name")]
    display_name: DisplayName,
    role: Role,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, username: Username, display_name: DisplayName, role: Role) -> Self {
        Self {
            id,
            username,
            display_name,
            role,
        }
    }

    /// Fallible constructor enforcing username and display name invariants.
    pub fn try_from_strings(
        id: UserId,
        username: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
    ) -> Result<Self, UserValidationError> {
        let username = Username::new(username)?;
        let display_name = DisplayName::new(display_name)?;
        Ok(Self::new(id, username, display_name, role))
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login name used to authenticate.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Display name shown to other users.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Role granted to this user across the application.
    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn user_id_rejects_non_uuid_input() {
        assert_eq!(
            UserId::new("not-a-uuid"),
            Err(UserValidationError::InvalidId)
        );
    }

    #[rstest]
    fn user_id_round_trips_through_string() {
        let id = UserId::random();
        let raw: String = id.into();
        assert_eq!(UserId::new(&raw), Ok(id));
    }

    #[rstest]
    #[case("", Err(UserValidationError::EmptyUsername))]
    #[case("    ", Err(UserValidationError::EmptyUsername))]
    #[case("erik.b", Ok(()))]
    #[case("erik b", Err(UserValidationError::UsernameInvalidCharacters))]
    #[case("erik@crewdeck.test", Ok(()))]
    fn username_validation(#[case] input: &str, #[case] expected: Result<(), UserValidationError>) {
        let result = Username::new(input).map(|_| ());
        assert_eq!(result, expected);
    }

    #[rstest]
    #[case("Jo", Err(UserValidationError::DisplayNameTooShort { min: DISPLAY_NAME_MIN }))]
    #[case("Erik Bergmann", Ok(()))]
    #[case("Erik <script>", Err(UserValidationError::DisplayNameInvalidCharacters))]
    fn display_name_validation(
        #[case] input: &str,
        #[case] expected: Result<(), UserValidationError>,
    ) {
        let result = DisplayName::new(input).map(|_| ());
        assert_eq!(result, expected);
    }

    #[rstest]
    fn user_exposes_components() {
        let id = UserId::random();
        let user = User::try_from_strings(id, "erik.b", "Erik Bergmann", Role::Editor)
            .expect("valid user inputs");

        assert_eq!(user.id(), &id);
        assert_eq!(user.username().as_ref(), "erik.b");
        assert_eq!(user.display_name().as_ref(), "Erik Bergmann");
        assert_eq!(user.role(), Role::Editor);
    }
}
