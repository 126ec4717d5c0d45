// Entry point for the native test app.
//
// Usage:
//   testapp-native <testType> <eventName>
//
// The debugger tests launch this binary, wait for `eventName` to be signalled
// and then inspect the worker thread that signalled it. If the runner exports
// its pid in CHAOSDBG_TEST_PARENT_PID, this process exits when the runner does.

use clap::Parser;
use std::process::ExitCode;
use testapp_common::{logging, Activator, ExitStatus, HarnessError, HarnessSettings};
use testapp_native::{Args, Runner};

fn main() -> ExitCode {
    if let Err(e) = logging::init() {
        eprintln!("{e:#}");
    }

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return fail(HarnessError::Argument(e.kind().to_string()));
        }
    };

    let settings = HarnessSettings::from_env();
    let runner = Runner::new(Activator::builtin(&settings), settings);
    let request = args.into_request();

    match runner.run(&request) {
        Ok(()) => {
            tracing::info!("Test {} completed.", request.test_type);
            ExitStatus::Success.into()
        }
        Err(e) => fail(e),
    }
}

fn fail(error: HarnessError) -> ExitCode {
    let status = error.exit_status();
    let error = anyhow::Error::from(error);
    tracing::error!("{:#} (exit status {} [{}])", error, status.code(), status);
    status.into()
}
