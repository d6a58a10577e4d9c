//! Behavioural tests for session settings resolution.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;
use uuid::Uuid;

/// Temporary signing-key file removed on drop.
struct KeyFile {
    path: PathBuf,
}

impl KeyFile {
    fn containing(bytes: usize) -> Self {
        let path = std::env::temp_dir().join(format!("crewdeck-session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'k'; bytes]).expect("temp key file is writable");
        Self { path }
    }

    fn location(&self) -> String {
        self.path
            .to_str()
            .expect("temp paths are valid UTF-8")
            .to_string()
    }
}

impl Drop for KeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Chainable set of `CREWDECK_SESSION_*` variables backing a [`MockEnv`].
#[derive(Default)]
struct Toggles(HashMap<&'static str, String>);

impl Toggles {
    /// A fully spelled-out configuration a release build accepts.
    fn production(key_file: &KeyFile) -> Self {
        Self::default()
            .with(KEY_FILE_ENV, &key_file.location())
            .with(COOKIE_SECURE_ENV, "yes")
            .with(SAMESITE_ENV, "strict")
            .with(ALLOW_EPHEMERAL_ENV, "no")
    }

    fn with(mut self, name: &'static str, value: &str) -> Self {
        self.0.insert(name, value.to_string());
        self
    }

    fn without(mut self, name: &'static str) -> Self {
        self.0.remove(name);
        self
    }

    fn into_env(self) -> MockEnv {
        let vars = self.0;
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |name| vars.get(name).cloned());
        env
    }
}

fn resolve(toggles: Toggles, mode: BuildMode) -> Result<SessionSettings, SessionConfigError> {
    session_settings_from_env(&toggles.into_env(), mode)
}

#[rstest]
#[case::cookie_secure(COOKIE_SECURE_ENV)]
#[case::same_site(SAMESITE_ENV)]
#[case::allow_ephemeral(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(#[case] name: &'static str) {
    let key_file = KeyFile::containing(SESSION_KEY_MIN_LEN);
    let toggles = Toggles::production(&key_file).without(name);

    let result = resolve(toggles, BuildMode::Release);
    assert!(matches!(
        result,
        Err(SessionConfigError::MissingEnv { name: missing }) if missing == name
    ));
}

#[rstest]
#[case::cookie_secure(COOKIE_SECURE_ENV, "maybe")]
#[case::cookie_secure_blank(COOKIE_SECURE_ENV, "")]
#[case::same_site(SAMESITE_ENV, "sideways")]
#[case::allow_ephemeral(ALLOW_EPHEMERAL_ENV, "perhaps")]
fn release_rejects_unparseable_toggles(#[case] name: &'static str, #[case] value: &str) {
    let key_file = KeyFile::containing(SESSION_KEY_MIN_LEN);
    let toggles = Toggles::production(&key_file).with(name, value);

    let result = resolve(toggles, BuildMode::Release);
    assert!(matches!(
        result,
        Err(SessionConfigError::InvalidEnv { name: invalid, .. }) if invalid == name
    ));
}

#[rstest]
fn release_rejects_ephemeral_keys() {
    let key_file = KeyFile::containing(SESSION_KEY_MIN_LEN);
    let toggles = Toggles::production(&key_file).with(ALLOW_EPHEMERAL_ENV, "true");

    let result = resolve(toggles, BuildMode::Release);
    assert!(matches!(
        result,
        Err(SessionConfigError::EphemeralNotAllowed)
    ));
}

#[rstest]
fn release_rejects_an_unreadable_key_file() {
    let key_file = KeyFile::containing(SESSION_KEY_MIN_LEN);
    let toggles =
        Toggles::production(&key_file).with(KEY_FILE_ENV, "/nonexistent/crewdeck/session_key");

    let result = resolve(toggles, BuildMode::Release);
    assert!(matches!(result, Err(SessionConfigError::KeyRead { .. })));
}

#[rstest]
fn release_rejects_a_short_key() {
    let key_file = KeyFile::containing(SESSION_KEY_MIN_LEN - 1);
    let toggles = Toggles::production(&key_file);

    let result = resolve(toggles, BuildMode::Release);
    assert!(matches!(
        result,
        Err(SessionConfigError::KeyTooShort { length, min_len, .. })
            if length == SESSION_KEY_MIN_LEN - 1 && min_len == SESSION_KEY_MIN_LEN
    ));
}

#[rstest]
fn release_rejects_same_site_none_without_secure_cookies() {
    let key_file = KeyFile::containing(SESSION_KEY_MIN_LEN);
    let toggles = Toggles::production(&key_file)
        .with(COOKIE_SECURE_ENV, "false")
        .with(SAMESITE_ENV, "none");

    let result = resolve(toggles, BuildMode::Release);
    assert!(matches!(
        result,
        Err(SessionConfigError::InsecureSameSiteNone)
    ));
}

#[rstest]
fn release_accepts_explicit_toggles() {
    let key_file = KeyFile::containing(SESSION_KEY_MIN_LEN);

    let settings = resolve(Toggles::production(&key_file), BuildMode::Release)
        .expect("explicit release configuration resolves");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn release_accepts_same_site_none_with_secure_cookies() {
    let key_file = KeyFile::containing(SESSION_KEY_MIN_LEN);
    let toggles = Toggles::production(&key_file).with(SAMESITE_ENV, "None");

    let settings = resolve(toggles, BuildMode::Release).expect("secure SameSite=None resolves");
    assert_eq!(settings.same_site, SameSite::None);
}

#[rstest]
fn debug_runs_with_an_empty_environment() {
    let settings =
        resolve(Toggles::default(), BuildMode::Debug).expect("debug builds substitute defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_replaces_an_unparseable_same_site_with_lax() {
    let key_file = KeyFile::containing(SESSION_KEY_MIN_LEN);
    let toggles = Toggles::production(&key_file).with(SAMESITE_ENV, "sideways");

    let settings =
        resolve(toggles, BuildMode::Debug).expect("debug builds fall back to the default");
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_accepts_a_short_key_file() {
    let key_file = KeyFile::containing(16);
    let toggles = Toggles::production(&key_file);

    assert!(resolve(toggles, BuildMode::Debug).is_ok());
}

#[rstest]
fn debug_keeps_same_site_none_without_secure_cookies() {
    let key_file = KeyFile::containing(SESSION_KEY_MIN_LEN);
    let toggles = Toggles::production(&key_file)
        .with(COOKIE_SECURE_ENV, "0")
        .with(SAMESITE_ENV, "none");

    let settings = resolve(toggles, BuildMode::Debug).expect("debug tolerates insecure None");
    assert_eq!(settings.same_site, SameSite::None);
    assert!(!settings.cookie_secure);
}
