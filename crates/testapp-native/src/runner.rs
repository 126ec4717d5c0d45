// Runner: drives one test case from validated arguments to exit.
//
//   runtime init -> (parent watcher)? -> activate -> worker signals -> join
//
// Any failing step ends the run with that step's error. Nothing is retried.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::thread;
use testapp_common::constants::threads;
use testapp_common::{
    logging, Activator, ComponentRuntime, HarnessError, HarnessSettings, ParentWatcher,
};
use testapp_sdk::Component;

/// Test scenario selected by the first command-line argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum TestType {
    /// Signal the event from a worker thread, then exit.
    Com = 1,
    /// Signal the event, then keep the worker thread parked so the debugger
    /// can inspect it. Only the parent watcher or a kill ends the process.
    ComHold = 2,
}

impl TestType {
    /// Every value other than `2` selects the plain `Com` test.
    pub fn from_i32(value: i32) -> Self {
        match value {
            2 => TestType::ComHold,
            _ => TestType::Com,
        }
    }

    pub fn holds_after_signal(self) -> bool {
        matches!(self, TestType::ComHold)
    }
}

impl FromStr for TestType {
    type Err = Infallible;

    /// Never fails: the argument is read the way C's `atoi` reads it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TestType::from_i32(parse_leading_int(s)))
    }
}

/// Optional leading whitespace and sign, then as many digits as follow.
/// No digits yields 0; out-of-range values saturate.
fn parse_leading_int(raw: &str) -> i32 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            (acc * 10 + i64::from(d - b'0')).min(i64::from(i32::MAX) + 1)
        });
    let value = if negative { -magnitude } else { magnitude };

    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestType::Com => write!(f, "Com"),
            TestType::ComHold => write!(f, "ComHold"),
        }
    }
}

/// One validated invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub test_type: TestType,
    pub event_name: String,
}

pub struct Runner {
    activator: Activator,
    settings: HarnessSettings,
}

impl Runner {
    pub fn new(activator: Activator, settings: HarnessSettings) -> Self {
        Self {
            activator,
            settings,
        }
    }

    /// Run one test case to completion.
    ///
    /// Returns once the worker thread has been joined. The parent watcher, if
    /// started, outlives this call and may end the process at any time.
    pub fn run(&self, request: &RunRequest) -> Result<(), HarnessError> {
        tracing::info!(
            "Dispatching test {} for event '{}'.",
            request.test_type,
            request.event_name
        );
        tracing::info!("main thread: {}", logging::current_thread_id());

        ComponentRuntime::ensure_initialized()?;

        // Detached: the watcher lives until the parent or this process exits.
        let _watcher = ParentWatcher::start(&self.settings);

        let component = self.activator.activate()?;
        signal_on_worker(component.as_ref(), request)
    }
}

/// Call `signal` on a dedicated worker thread and wait for it.
fn signal_on_worker(component: &dyn Component, request: &RunRequest) -> Result<(), HarnessError> {
    let event_name = request.event_name.as_str();
    let hold = request.test_type.holds_after_signal();

    thread::scope(|scope| {
        let worker = thread::Builder::new()
            .name(threads::WORKER.to_string())
            .spawn_scoped(scope, move || {
                tracing::info!("remote thread: {}", logging::current_thread_id());
                let result = component.signal(event_name);
                if hold && result.is_ok() {
                    hold_forever();
                }
                result
            })
            .map_err(HarnessError::WorkerSpawn)?;

        match worker.join() {
            Ok(result) => result.map_err(HarnessError::from),
            Err(_) => Err(HarnessError::WorkerPanicked),
        }
    })
}

fn hold_forever() -> ! {
    tracing::info!("Holding worker thread until the process is terminated.");
    loop {
        thread::park();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use testapp_common::constants::components;
    use testapp_common::ExitStatus;
    use testapp_sdk::testing::{RecordingFactory, SignalLog};
    use testapp_sdk::{ActivationError, ComponentFactory, ComponentId, OperationError};

    fn request(event_name: &str) -> RunRequest {
        RunRequest {
            test_type: TestType::Com,
            event_name: event_name.to_string(),
        }
    }

    fn runner_with(factory: Arc<dyn ComponentFactory>) -> Runner {
        Runner::new(
            Activator::new(factory, components::EXAMPLE),
            HarnessSettings::default(),
        )
    }

    struct PanickingComponent;

    impl Component for PanickingComponent {
        fn name(&self) -> &str {
            "Panicking"
        }

        fn signal(&self, _event_name: &str) -> Result<(), OperationError> {
            panic!("component blew up");
        }
    }

    struct PanickingFactory;

    impl ComponentFactory for PanickingFactory {
        fn create(&self, _id: &ComponentId) -> Result<Box<dyn Component>, ActivationError> {
            Ok(Box::new(PanickingComponent))
        }
    }

    #[test]
    fn test_type_from_str() {
        assert_eq!("1".parse::<TestType>(), Ok(TestType::Com));
        assert_eq!(" 2 ".parse::<TestType>(), Ok(TestType::ComHold));
        assert_eq!("7".parse::<TestType>(), Ok(TestType::Com));
        assert_eq!("x".parse::<TestType>(), Ok(TestType::Com));
        assert_eq!("".parse::<TestType>(), Ok(TestType::Com));
    }

    #[test]
    fn leading_int_reads_like_atoi() {
        assert_eq!(parse_leading_int("42"), 42);
        assert_eq!(parse_leading_int("  -17"), -17);
        assert_eq!(parse_leading_int("+3"), 3);
        assert_eq!(parse_leading_int("1abc"), 1);
        assert_eq!(parse_leading_int("abc"), 0);
        assert_eq!(parse_leading_int("-"), 0);
        assert_eq!(parse_leading_int(""), 0);
        assert_eq!(parse_leading_int("99999999999999999999"), i32::MAX);
        assert_eq!(parse_leading_int("-99999999999999999999"), i32::MIN);
    }

    #[test]
    fn only_hold_variant_holds() {
        assert!(!TestType::Com.holds_after_signal());
        assert!(TestType::ComHold.holds_after_signal());
    }

    #[test]
    fn signals_once_from_a_worker_thread() {
        let log = SignalLog::new();
        let factory = Arc::new(RecordingFactory::new(components::EXAMPLE, log.clone()));
        let runner = runner_with(factory.clone());

        runner.run(&request("TestApp_Ready")).unwrap();

        let records = log.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event_name, "TestApp_Ready");
        assert_ne!(records[0].thread_id, thread::current().id());
        assert_eq!(factory.activations(), 1);
    }

    #[test]
    fn activation_failure_skips_worker() {
        let log = SignalLog::new();
        let factory = Arc::new(
            RecordingFactory::new(components::EXAMPLE, log.clone()).fail_activation("no class"),
        );

        let err = runner_with(factory).run(&request("evt")).unwrap_err();

        assert_eq!(err.exit_status(), ExitStatus::ActivationError);
        assert!(log.records().is_empty());
    }

    #[test]
    fn unregistered_component_is_an_activation_error() {
        let factory = Arc::new(RecordingFactory::new(
            ComponentId::from_u128(99),
            SignalLog::new(),
        ));
        let err = runner_with(factory).run(&request("evt")).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::Activation(ActivationError::NotRegistered(_))
        ));
    }

    #[test]
    fn signal_failure_is_an_operation_error() {
        let log = SignalLog::new();
        let factory = Arc::new(
            RecordingFactory::new(components::EXAMPLE, log.clone()).fail_signal("denied"),
        );

        let err = runner_with(factory).run(&request("evt")).unwrap_err();

        assert_eq!(err.exit_status(), ExitStatus::OperationError);
        assert_eq!(log.event_names(), vec!["evt"]);
    }

    #[test]
    fn worker_panic_is_reported() {
        let err = runner_with(Arc::new(PanickingFactory))
            .run(&request("evt"))
            .unwrap_err();
        assert!(matches!(err, HarnessError::WorkerPanicked));
        assert_eq!(err.exit_status(), ExitStatus::WorkerPanicked);
    }

    #[test]
    fn separate_runs_do_not_share_components() {
        let log = SignalLog::new();
        let factory = Arc::new(RecordingFactory::new(components::EXAMPLE, log.clone()));

        runner_with(factory.clone()).run(&request("first")).unwrap();
        runner_with(factory.clone()).run(&request("second")).unwrap();

        let records = log.records();
        assert_eq!(log.event_names(), vec!["first", "second"]);
        assert_ne!(records[0].thread_id, records[1].thread_id);
        assert_eq!(factory.activations(), 2);
    }
}
