// Environment-driven configuration, read once at startup.

use crate::constants::variables;
use std::path::PathBuf;

/// Settings the harness picks up from its environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarnessSettings {
    /// Process whose exit should terminate this process.
    pub parent_process_id: Option<u32>,

    /// Where event marker files are written (Unix).
    pub event_directory: Option<PathBuf>,
}

impl HarnessSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    ///
    /// Missing or malformed values leave the corresponding feature disabled;
    /// nothing here is an error.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parent_process_id = lookup(variables::PARENT_PROCESS_ID).and_then(|raw| {
            let parsed = parse_process_id(&raw);
            if parsed.is_none() {
                tracing::debug!(
                    "Ignoring {}='{}': not a process id.",
                    variables::PARENT_PROCESS_ID,
                    raw
                );
            }
            parsed
        });

        let event_directory = lookup(variables::EVENT_DIRECTORY)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        Self {
            parent_process_id,
            event_directory,
        }
    }

    /// The effective event directory, falling back to the OS temp directory.
    pub fn event_directory(&self) -> PathBuf {
        self.event_directory
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// Parse a process id. Zero and values outside the platform pid range are
/// rejected: on Unix they address process groups rather than a process.
fn parse_process_id(raw: &str) -> Option<u32> {
    let pid: u32 = raw.trim().parse().ok()?;
    if pid == 0 || i32::try_from(pid).is_err() {
        return None;
    }
    Some(pid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> HarnessSettings {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        HarnessSettings::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn empty_environment_disables_everything() {
        assert_eq!(settings(&[]), HarnessSettings::default());
    }

    #[test]
    fn parses_parent_pid() {
        let s = settings(&[(variables::PARENT_PROCESS_ID, "4242")]);
        assert_eq!(s.parent_process_id, Some(4242));
    }

    #[test]
    fn parent_pid_tolerates_surrounding_whitespace() {
        let s = settings(&[(variables::PARENT_PROCESS_ID, " 17\n")]);
        assert_eq!(s.parent_process_id, Some(17));
    }

    #[test]
    fn malformed_parent_pid_is_ignored() {
        for raw in ["", "abc", "-5", "12x", "0", "4294967295"] {
            let s = settings(&[(variables::PARENT_PROCESS_ID, raw)]);
            assert_eq!(s.parent_process_id, None, "value {raw:?}");
        }
    }

    #[test]
    fn event_directory_falls_back_to_temp() {
        let s = settings(&[(variables::EVENT_DIRECTORY, "  ")]);
        assert_eq!(s.event_directory, None);
        assert_eq!(s.event_directory(), std::env::temp_dir());
    }

    #[test]
    fn event_directory_from_environment() {
        let s = settings(&[(variables::EVENT_DIRECTORY, "/tmp/events")]);
        assert_eq!(s.event_directory(), PathBuf::from("/tmp/events"));
    }
}
