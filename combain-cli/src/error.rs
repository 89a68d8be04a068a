//! CLI error handling with user-friendly messages.

use std::fmt;
use std::io;
use std::process;
use std::time::Duration;

use combain::config::{config_file_path, ConfigFileError};
use combain::registry::RegistryError;
use combain::service::ServiceError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(io::Error),
    /// Config file could not be read or contained invalid values
    ConfigFile(ConfigFileError),
    /// Neither --wifi nor --cell was given
    NoScanItems,
    /// Failed to start the location service
    Service(ServiceError),
    /// The registry rejected the request
    Request(RegistryError),
    /// Failed to build the async runtime
    Runtime(io::Error),
    /// No result arrived before the deadline
    DeadlineExpired(Duration),
    /// Interrupted by Ctrl-C
    Interrupted,
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Service(ServiceError::MissingApiKey) => {
                eprintln!();
                eprintln!("Provide an API key with --api-key, or set it in");
                eprintln!("  {}", config_file_path().display());
                eprintln!("under:");
                eprintln!("  [service]");
                eprintln!("  api_key = <your key>");
            }
            CliError::NoScanItems => {
                eprintln!();
                eprintln!("Examples:");
                eprintln!("  combain-locate --wifi 00:11:22:33:44:55,home,-67");
                eprintln!("  combain-locate --cell lte,240,1,1234,56789,-80");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::ConfigFile(e) => write!(f, "Configuration error: {}", e),
            CliError::NoScanItems => {
                write!(f, "At least one --wifi or --cell scan item is required")
            }
            CliError::Service(e) => write!(f, "{}", e),
            CliError::Request(e) => write!(f, "Failed to submit location request: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::DeadlineExpired(deadline) => write!(
                f,
                "No result from Combain server within {} seconds",
                deadline.as_secs()
            ),
            CliError::Interrupted => write!(f, "Interrupted"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::ConfigFile(e) => Some(e),
            CliError::Service(e) => Some(e),
            CliError::Request(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Service(e)
    }
}

impl From<RegistryError> for CliError {
    fn from(e: RegistryError) -> Self {
        CliError::Request(e)
    }
}
