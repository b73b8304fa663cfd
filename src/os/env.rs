use std::collections::HashMap;
use std::ffi::{OsStr, OsString};

/// Snapshot of environmental variables.
///
/// [`SystemInfo`](crate::system_info::SystemInfo) reads the live process environment by default;
/// an [`Env`] lets callers (and tests) pin the variables it sees without touching the process
/// environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env {
    keys: HashMap<OsString, OsString>,
}

impl Env {
    /// Create new [`Env`] from [`std::env::vars_os`].
    pub fn new() -> Self {
        Self::new_from(std::env::vars_os().collect())
    }

    /// Create new [`Env`] using `env` as existing environmental variables.
    pub fn new_from(env: HashMap<OsString, OsString>) -> Self {
        Self { keys: env }
    }

    /// Reload environmental variables from `env`.
    pub fn reload_from(&mut self, env: HashMap<OsString, OsString>) {
        self.keys = env;
    }

    /// Reload environmental variables from [`std::env::vars_os`].
    pub fn reload(&mut self) {
        self.reload_from(std::env::vars_os().collect())
    }

    /// Value of `key` in the snapshot, or `None` if it isn't there. Empty values are returned
    /// as they are.
    ///
    /// # Examples
    /// ```rust
    /// use hostenv::os::env::Env;
    ///
    /// let env = Env::from_iter([("FOO", "bar")]);
    /// assert_eq!(env.get_os("FOO"), Some("bar".as_ref()));
    /// assert_eq!(env.get_os("BAZ"), None);
    /// ```
    pub fn get_os(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.keys.get(key.as_ref()).map(OsString::as_os_str)
    }

    /// Like [`Env::get_os`], but a variable set to the empty string counts as missing.
    pub fn get_non_empty_os(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.get_os(key).filter(|value| !value.is_empty())
    }

    /// Probe `keys` in order and return the first one set to a non-empty value.
    ///
    /// # Examples
    /// ```rust
    /// use hostenv::os::env::Env;
    ///
    /// let env = Env::from_iter([("USER", "bob"), ("LOGNAME", "")]);
    /// assert_eq!(env.first_non_empty_os(["LOGNAME", "USER"]), Some("bob".as_ref()));
    /// ```
    pub fn first_non_empty_os<K: AsRef<OsStr>>(
        &self,
        keys: impl IntoIterator<Item = K>,
    ) -> Option<&OsStr> {
        keys.into_iter().find_map(|key| self.get_non_empty_os(key))
    }
}

impl<K, V> FromIterator<(K, V)> for Env
where
    K: Into<OsString>,
    V: Into<OsString>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new_from(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Read `key` from the live process environment, treating an empty value as missing.
pub(crate) fn process_non_empty_os(key: impl AsRef<OsStr>) -> Option<OsString> {
    std::env::var_os(key).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_none, assert_some_eq};

    #[test]
    fn missing_and_empty_are_not_found() {
        let env = Env::from_iter([("EMPTY", "")]);
        assert_none!(env.get_non_empty_os("MISSING"));
        assert_none!(env.get_non_empty_os("EMPTY"));
        assert_some_eq!(env.get_os("EMPTY"), OsStr::new(""));
    }

    #[test]
    fn first_non_empty_respects_order() {
        let env = Env::from_iter([("LOGNAME", "alice"), ("USER", "bob")]);
        assert_some_eq!(
            env.first_non_empty_os(["LOGNAME", "USER"]),
            OsStr::new("alice")
        );
        assert_some_eq!(
            env.first_non_empty_os(["USER", "LOGNAME"]),
            OsStr::new("bob")
        );
        assert_none!(env.first_non_empty_os(["LNAME", "USERNAME"]));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let env = Env::from_iter([("home", "/lower")]);
        assert_none!(env.get_os("HOME"));
    }

    #[test]
    fn reload_from_replaces_snapshot() {
        let mut env = Env::from_iter([("HOME", "/old")]);
        env.reload_from(HashMap::from([(
            OsString::from("USER"),
            OsString::from("carol"),
        )]));
        assert_none!(env.get_os("HOME"));
        assert_some_eq!(env.get_os("USER"), OsStr::new("carol"));
    }

    #[test]
    fn reload_picks_up_process_environment() {
        let mut env = Env::from_iter([("HOSTENV_NOT_IN_PROCESS_ENV", "stale")]);
        env.reload();
        assert_none!(env.get_os("HOSTENV_NOT_IN_PROCESS_ENV"));
        assert_eq!(env, Env::new());
    }

    #[test]
    fn snapshot_matches_process_environment() {
        let env = Env::new();
        for (key, value) in std::env::vars_os() {
            assert_some_eq!(env.get_os(&key), value.as_os_str());
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_values_are_preserved() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"caf\xe9");
        let env = Env::from_iter([(OsStr::new("USER"), raw)]);
        assert_some_eq!(env.get_non_empty_os("USER"), raw);
    }
}
