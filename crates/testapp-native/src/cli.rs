// Command-line surface: `testapp-native <testType> <eventName>`.
//
// Both positionals are taken verbatim, including values that look like flags:
// the runner owns the event names and there are no options to collide with.

use crate::runner::{RunRequest, TestType};
use clap::Parser;
use std::convert::Infallible;

/// Command-line arguments for the native test app.
#[derive(Parser, Debug)]
#[command(
    name = "testapp-native",
    about = "Signals a named event from a worker thread for debugger tests",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Args {
    /// Numeric test type (2 = ComHold, anything else = Com).
    #[arg(value_parser = parse_test_type, allow_hyphen_values = true)]
    pub test_type: TestType,

    /// Name of the event the component signals.
    #[arg(allow_hyphen_values = true)]
    pub event_name: String,

    /// Extra arguments from the runner; ignored.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,
}

impl Args {
    pub fn into_request(self) -> RunRequest {
        RunRequest {
            test_type: self.test_type,
            event_name: self.event_name,
        }
    }
}

fn parse_test_type(raw: &str) -> Result<TestType, Infallible> {
    raw.parse()
}
