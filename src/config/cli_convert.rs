//! CLI to domain type conversion utilities

use crate::config::cli;
use crate::coordinator::RunMode;
use crate::stats::StatKind;
use crate::tree::BranchId;

/// Convert CLI StatArg to StatKind
pub fn convert_stat(arg: cli::StatArg) -> StatKind {
    match arg {
        cli::StatArg::Mean => StatKind::Mean,
        cli::StatArg::Median => StatKind::Median,
        cli::StatArg::StdDev => StatKind::StdDev,
    }
}

/// Convert CLI BranchArg to BranchId
pub fn convert_branch(arg: cli::BranchArg) -> BranchId {
    match arg {
        cli::BranchArg::F1 => BranchId::F1,
        cli::BranchArg::F2 => BranchId::F2,
    }
}

/// Statistics variant for an execution mode, if it is one
pub fn convert_run_mode(mode: cli::ExecutionMode) -> Option<RunMode> {
    match mode {
        cli::ExecutionMode::Single => Some(RunMode::Single),
        cli::ExecutionMode::Processes => Some(RunMode::Processes),
        cli::ExecutionMode::Threads => Some(RunMode::Threads),
        cli::ExecutionMode::Tree | cli::ExecutionMode::Reducer | cli::ExecutionMode::Branch => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ValueEnum;

    #[test]
    fn test_stat_names_match_cli_values() {
        for arg in cli::StatArg::value_variants() {
            let name = arg.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(convert_stat(*arg).as_str(), name);
        }
    }

    #[test]
    fn test_branch_names_match_cli_values() {
        for arg in cli::BranchArg::value_variants() {
            let name = arg.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(convert_branch(*arg).as_str(), name);
        }
    }

    #[test]
    fn test_convert_run_mode() {
        assert_eq!(convert_run_mode(cli::ExecutionMode::Threads), Some(RunMode::Threads));
        assert_eq!(convert_run_mode(cli::ExecutionMode::Tree), None);
        assert_eq!(convert_run_mode(cli::ExecutionMode::Reducer), None);
    }
}
