//! Calling-process identity resolution.
//!
//! A couple of rewrites are suppressed for specific applications, so the
//! wrapper needs to know which process is driving the camera. The lookup is
//! best-effort: any failure resolves to "unknown" and the affected rewrite
//! degrades gracefully. The wrapper module resolves the name at most once
//! per process and caches the outcome.

use cfg_if::cfg_if;

pub trait CallerIdentity: Send + Sync {
    fn process_name(&self) -> Option<String>;
}

/// Identity source that never resolves; used on platforms without a
/// process-metadata backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnknownCaller;

impl CallerIdentity for UnknownCaller {
    fn process_name(&self) -> Option<String> {
        None
    }
}

cfg_if! {
    if #[cfg(target_os = "linux")] {
        /// Resolves a process name from procfs command line metadata.
        #[derive(Clone, Copy, Debug)]
        pub struct ProcCaller {
            pid: u32,
        }

        impl ProcCaller {
            /// Identity of the current process. The HAL is loaded into the
            /// caller's process, so this names whoever opened the camera.
            pub fn current() -> Self {
                Self { pid: std::process::id() }
            }

            pub fn for_pid(pid: u32) -> Self {
                Self { pid }
            }
        }

        impl CallerIdentity for ProcCaller {
            fn process_name(&self) -> Option<String> {
                let raw = std::fs::read(format!("/proc/{}/cmdline", self.pid)).ok()?;
                // argv entries are NUL separated; argv[0] is the name.
                let name = raw.split(|b| *b == 0).next()?;
                if name.is_empty() {
                    return None;
                }
                String::from_utf8(name.to_vec()).ok()
            }
        }
    }
}

pub fn default_caller_identity() -> Box<dyn CallerIdentity> {
    #[cfg(target_os = "linux")]
    {
        Box::new(ProcCaller::current())
    }
    #[cfg(not(target_os = "linux"))]
    {
        Box::new(UnknownCaller)
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    #[test]
    fn current_process_resolves() {
        let name = ProcCaller::current().process_name();
        assert!(name.is_some_and(|n| !n.is_empty()));
    }

    #[test]
    fn bogus_pid_resolves_to_none() {
        assert_eq!(ProcCaller::for_pid(u32::MAX).process_name(), None);
    }
}
