//! Runtime handle behaviour against a host that models the module dependency.

use lpjguess_loader::{
    EngineModule, FailurePolicy, HostError, HostPlatform, LoadError, ModuleHost, ModuleSet,
    RuntimeHandle, RuntimeIdentifier, RuntimeStatus,
};
use lpjguess_test_helpers::{asset_tree, install_modules, linux_x64_config, HostCall, RecordingHost};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use tracing_test::traced_test;

fn linux_tree() -> tempfile::TempDir {
    asset_tree(&[RuntimeIdentifier::LinuxX64]).unwrap()
}

#[test]
fn test_first_acquire_loads_dependency_first() {
    let root = linux_tree();
    let handle = RuntimeHandle::new(linux_x64_config(root.path()), RecordingHost::engine_modules());

    let loaded = handle.acquire().unwrap();

    let rid_dir = root.path().join("rids").join("linux-x64");
    assert_eq!(loaded.rid, RuntimeIdentifier::LinuxX64);
    assert_eq!(loaded.directory, rid_dir);
    assert_eq!(loaded.modules, vec!["LpjGuess.Core", "LpjGuess.Runner"]);
    assert!(handle.is_loaded());

    handle.with_host(|host| {
        assert_eq!(
            host.calls(),
            &[
                HostCall::AddProbePath(rid_dir.clone()),
                HostCall::LoadModule("LpjGuess.Core".to_string()),
                HostCall::LoadModule("LpjGuess.Runner".to_string()),
                HostCall::RegisterNamespace("LpjGuess.Core".to_string()),
                HostCall::RegisterNamespace("LpjGuess.Runner".to_string()),
            ]
        );
        assert_eq!(host.namespaces(), &["LpjGuess.Core", "LpjGuess.Runner"]);
    });
}

#[test]
fn test_repeated_acquire_has_no_further_side_effects() {
    let root = linux_tree();
    let handle = RuntimeHandle::new(linux_x64_config(root.path()), RecordingHost::engine_modules());

    let first = handle.acquire().unwrap();
    for _ in 0..5 {
        assert_eq!(handle.acquire().unwrap(), first);
        handle.ensure_loaded().unwrap();
    }

    assert_eq!(handle.attempts(), 1);
    handle.with_host(|host| {
        assert_eq!(host.load_calls(), 2);
        assert_eq!(host.calls().len(), 5);
        assert_eq!(host.probe_paths().len(), 1);
    });
}

#[test]
fn test_host_rejects_primary_before_dependency() {
    let mut host = RecordingHost::engine_modules();
    let modules = ModuleSet::default();

    let err = host
        .load_module(&modules.primary, Path::new("LpjGuess.Runner.dll"))
        .unwrap_err();
    assert!(matches!(err, HostError::UnresolvedDependency { .. }));

    host.load_module(&modules.dependency, Path::new("LpjGuess.Core.dll"))
        .unwrap();
    host.load_module(&modules.primary, Path::new("LpjGuess.Runner.dll"))
        .unwrap();
    assert_eq!(host.loaded(), &["LpjGuess.Core", "LpjGuess.Runner"]);
}

#[test]
fn test_reversed_module_set_fails_with_assembly_load() {
    let root = linux_tree();
    let reversed = ModuleSet {
        dependency: EngineModule::named("LpjGuess.Runner"),
        primary: EngineModule::named("LpjGuess.Core"),
    };
    let config = linux_x64_config(root.path()).with_modules(reversed);
    let handle = RuntimeHandle::new(config, RecordingHost::engine_modules());

    let err = handle.acquire().unwrap_err();

    match err {
        LoadError::AssemblyLoad { module, source } => {
            assert_eq!(module, "LpjGuess.Runner");
            assert!(matches!(source, HostError::UnresolvedDependency { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(handle.status(), RuntimeStatus::Failed(_)));
    handle.with_host(|host| assert!(host.loaded().is_empty()));
}

#[test]
fn test_unsupported_platform_touches_nothing() {
    let root = linux_tree();
    let config = linux_x64_config(root.path()).with_platform(HostPlatform::new("Linux", "riscv64"));
    let handle = RuntimeHandle::new(config, RecordingHost::engine_modules());

    let err = handle.acquire().unwrap_err();

    match err {
        LoadError::UnsupportedPlatform { system, machine } => {
            assert_eq!((system.as_str(), machine.as_str()), ("linux", "riscv64"));
        }
        other => panic!("unexpected error: {other}"),
    }
    handle.with_host(|host| assert!(host.calls().is_empty()));
}

#[test]
fn test_missing_assets_for_detected_platform() {
    let root = asset_tree(&[RuntimeIdentifier::OsxArm64]).unwrap();
    let handle = RuntimeHandle::new(linux_x64_config(root.path()), RecordingHost::engine_modules());

    let err = handle.acquire().unwrap_err();

    assert!(matches!(err, LoadError::MissingRuntimeAssets { .. }));
    assert!(!handle.is_loaded());
    handle.with_host(|host| assert!(host.calls().is_empty()));
}

#[test]
fn test_retry_policy_recovers_once_assets_appear() {
    let root = tempfile::tempdir().unwrap();
    let handle = RuntimeHandle::new(linux_x64_config(root.path()), RecordingHost::engine_modules());

    assert!(matches!(
        handle.acquire(),
        Err(LoadError::MissingRuntimeAssets { .. })
    ));

    install_modules(root.path(), RuntimeIdentifier::LinuxX64).unwrap();

    assert!(handle.acquire().is_ok());
    assert_eq!(handle.attempts(), 2);
}

#[test]
fn test_retry_policy_repeats_hard_failure() {
    let root = linux_tree();
    let host = RecordingHost::engine_modules().failing("LpjGuess.Core", u32::MAX);
    let handle = RuntimeHandle::new(linux_x64_config(root.path()), host);

    for _ in 0..3 {
        match handle.acquire() {
            Err(LoadError::AssemblyLoad { module, source }) => {
                assert_eq!(module, "LpjGuess.Core");
                assert!(matches!(source, HostError::BadImage { .. }));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    assert_eq!(handle.attempts(), 3);
    handle.with_host(|host| assert_eq!(host.load_calls(), 3));
}

#[test]
fn test_retry_adds_probe_path_once() {
    let root = linux_tree();
    let host = RecordingHost::engine_modules().failing("LpjGuess.Runner", 1);
    let handle = RuntimeHandle::new(linux_x64_config(root.path()), host);

    assert!(handle.acquire().is_err());
    assert!(handle.acquire().is_ok());

    handle.with_host(|host| {
        let probes = host
            .calls()
            .iter()
            .filter(|c| matches!(c, HostCall::AddProbePath(_)))
            .count();
        assert_eq!(probes, 1);
    });
}

#[test]
fn test_cache_policy_does_not_retry() {
    let root = linux_tree();
    let host = RecordingHost::engine_modules().failing("LpjGuess.Core", 1);
    let config = linux_x64_config(root.path()).with_failure_policy(FailurePolicy::Cache);
    let handle = RuntimeHandle::new(config, host);

    assert!(matches!(
        handle.acquire(),
        Err(LoadError::AssemblyLoad { .. })
    ));
    // The host would succeed now, but the failure is cached.
    match handle.acquire() {
        Err(LoadError::AssemblyLoad { module, source }) => {
            assert_eq!(module, "LpjGuess.Core");
            assert!(matches!(source, HostError::BadImage { .. }));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    assert_eq!(handle.attempts(), 1);
    handle.with_host(|host| assert_eq!(host.load_calls(), 1));
}

#[test]
fn test_cache_policy_keeps_error_kind() {
    let root = linux_tree();
    let config = linux_x64_config(root.path())
        .with_failure_policy(FailurePolicy::Cache)
        .with_platform(HostPlatform::new("Linux", "riscv64"));
    let handle = RuntimeHandle::new(config, RecordingHost::engine_modules());

    for _ in 0..3 {
        match handle.acquire() {
            Err(LoadError::UnsupportedPlatform { system, machine }) => {
                assert_eq!((system.as_str(), machine.as_str()), ("linux", "riscv64"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    assert_eq!(handle.attempts(), 1);
    assert!(matches!(
        handle.status(),
        RuntimeStatus::Failed(LoadError::UnsupportedPlatform { .. })
    ));
}

#[test]
fn test_concurrent_first_calls_load_once() {
    let root = linux_tree();
    let host = RecordingHost::engine_modules().with_load_delay(Duration::from_millis(50));
    let handle = Arc::new(RuntimeHandle::new(linux_x64_config(root.path()), host));
    let barrier = Arc::new(Barrier::new(8));

    let threads: Vec<_> = (0..8)
        .map(|_| {
            let handle = Arc::clone(&handle);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                handle.acquire()
            })
        })
        .collect();

    for t in threads {
        let loaded = t.join().unwrap().unwrap();
        assert_eq!(loaded.rid, RuntimeIdentifier::LinuxX64);
    }

    assert_eq!(handle.attempts(), 1);
    handle.with_host(|host| assert_eq!(host.load_calls(), 2));
}

#[test]
fn test_host_panic_does_not_leave_handle_loading() {
    let root = linux_tree();
    let host = RecordingHost::engine_modules().panicking_on("LpjGuess.Core");
    let handle = RuntimeHandle::new(linux_x64_config(root.path()), host);

    let result = panic::catch_unwind(AssertUnwindSafe(|| handle.acquire()));

    assert!(result.is_err());
    assert!(matches!(
        handle.status(),
        RuntimeStatus::Failed(LoadError::HostPanicked)
    ));
}

#[test]
fn test_cached_host_panic_reported_to_later_callers() {
    let root = linux_tree();
    let host = RecordingHost::engine_modules().panicking_on("LpjGuess.Core");
    let config = linux_x64_config(root.path()).with_failure_policy(FailurePolicy::Cache);
    let handle = RuntimeHandle::new(config, host);

    let first = panic::catch_unwind(AssertUnwindSafe(|| handle.acquire()));

    assert!(first.is_err());
    assert!(matches!(handle.acquire(), Err(LoadError::HostPanicked)));
}

#[test]
fn test_boxed_host_is_accepted() {
    let root = linux_tree();
    let host: Box<dyn ModuleHost> = Box::new(RecordingHost::engine_modules());
    let handle = RuntimeHandle::new(linux_x64_config(root.path()), host);

    let loaded = handle.acquire().unwrap();

    assert_eq!(loaded.modules, vec!["LpjGuess.Core", "LpjGuess.Runner"]);
    handle.with_host(|host| assert_eq!(host.probe_paths().len(), 1));
}

#[test]
#[traced_test]
fn test_load_is_logged() {
    let root = linux_tree();
    let handle = RuntimeHandle::new(linux_x64_config(root.path()), RecordingHost::engine_modules());

    handle.acquire().unwrap();
    handle.acquire().unwrap();

    assert!(logs_contain("Engine runtime loaded"));
    assert!(logs_contain("Runtime already loaded"));
}

#[test]
#[traced_test]
fn test_failure_is_logged() {
    let root = tempfile::tempdir().unwrap();
    let handle = RuntimeHandle::new(linux_x64_config(root.path()), RecordingHost::engine_modules());

    assert!(handle.acquire().is_err());
    assert!(logs_contain("Failed to load engine runtime"));
}
