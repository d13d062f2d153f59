//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `estate_review_core` linkage and print its version.
//! - When `ESTATE_API_BASE_URL` is set, list the current duplicate groups.
//!
//! Exit code is non-zero only when a configured backend cannot be queried.

use estate_review_core::{
    core_version, default_log_level, init_logging, ApiConfig, ConfigError,
    DuplicateReviewService, GroupQuery, HttpAdminApi,
};
use std::process::ExitCode;

const ENV_LOG_DIR: &str = "ESTATE_LOG_DIR";

fn main() -> ExitCode {
    println!("estate_review_core version={}", core_version());

    if let Ok(log_dir) = std::env::var(ENV_LOG_DIR) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(ConfigError::MissingVar(_)) => {
            println!("backend=unconfigured");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    let api = match HttpAdminApi::new(config) {
        Ok(api) => api,
        Err(err) => {
            eprintln!("failed to build client: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut service = DuplicateReviewService::new(api);
    match service.load_groups(&GroupQuery::default()) {
        Ok(groups) => {
            for group in groups {
                println!(
                    "group={} building={} members={}",
                    group.id,
                    group.building_name.as_deref().unwrap_or("-"),
                    group
                        .member_ids()
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(",")
                );
            }
            println!("total={} has_more={}", service.total(), service.has_more());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err.to_notice("Loading duplicate groups").message);
            ExitCode::FAILURE
        }
    }
}
