//! Manual argument parsing for `prog [-n<N>] [-<limit>] [<goalfile>]`,
//! mirroring the original's own hand-rolled `argv` scan in `main()` (first
//! `-`-prefixed argument sets the depth limit, a trailing non-`-` argument
//! names the goal file) rather than reaching for a CLI-parsing crate, the
//! same manual-tokenizing style `cesso-uci::command::parse_command` uses
//! for UCI lines.

use crate::error::CliError;

/// Parsed command-line arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    /// Matrix dimension, from `-n<N>` (defaults applied by the caller).
    pub dimension: Option<u8>,
    /// Maximum BFS depth, from `-<limit>`.
    pub limit: Option<u8>,
    /// Path to a goal-matrix file, from a trailing non-flag argument.
    pub goal_path: Option<String>,
}

impl Args {
    /// Parse `argv[1..]` (the program name already stripped).
    pub fn parse(argv: &[String]) -> Result<Args, CliError> {
        let mut args = Args::default();
        let mut rest = argv;

        while let Some((head, tail)) = rest.split_first() {
            if let Some(n) = head.strip_prefix("-n") {
                args.dimension = Some(n.parse().map_err(|source| CliError::InvalidDimension {
                    value: head.clone(),
                    source,
                })?);
                rest = tail;
            } else if let Some(limit) = head.strip_prefix('-') {
                args.limit = Some(limit.parse().map_err(|source| CliError::InvalidLimit {
                    value: head.clone(),
                    source,
                })?);
                rest = tail;
            } else {
                break;
            }
        }

        if let Some((last, rest)) = rest.split_last() {
            if !last.starts_with('-') && rest.is_empty() {
                args.goal_path = Some(last.clone());
            }
        }

        Ok(args)
    }
}
