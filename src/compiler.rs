//! External ruleset compiler invocation.
//!
//! The binary artifact format is produced by an external program (mihomo by
//! default). Process execution sits behind a trait so the invocation logic
//! can be tested without the real binary installed.

use anyhow::{Context, Result};
#[cfg(test)]
use mockall::automock;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::config::CompilerConfig;
use crate::error::RangepressError;

/// Behavior label for IP-CIDR rulesets, the only kind this tool emits
const RULESET_BEHAVIOR: &str = "ipcidr";

/// Output from a command execution
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

/// Trait for executing external commands
#[cfg_attr(test, automock)]
pub trait CommandExecutor: Send + Sync {
    /// Execute a command and return its output
    fn execute(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Production executor that runs actual commands
pub struct RealCommandExecutor;

impl CommandExecutor for RealCommandExecutor {
    fn execute(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("Failed to execute {}", program))?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Compiles plaintext artifacts into binary rulesets
pub struct RulesetCompiler<E: CommandExecutor = RealCommandExecutor> {
    executor: E,
    program: String,
    format: String,
}

impl RulesetCompiler<RealCommandExecutor> {
    pub fn new(config: &CompilerConfig) -> Self {
        Self::with_executor(RealCommandExecutor, config)
    }
}

impl<E: CommandExecutor> RulesetCompiler<E> {
    pub fn with_executor(executor: E, config: &CompilerConfig) -> Self {
        Self {
            executor,
            program: config.program.clone(),
            format: config.format.clone(),
        }
    }

    /// Convert a plaintext artifact into a binary ruleset.
    ///
    /// A non-zero exit is fatal; stderr is captured into the error so the
    /// caller can surface the compiler's own diagnostics.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let args = vec![
            "convert-ruleset".to_string(),
            RULESET_BEHAVIOR.to_string(),
            self.format.clone(),
            input.display().to_string(),
            output.display().to_string(),
        ];

        debug!("Running {} {}", self.program, args.join(" "));

        let result = self.executor.execute(&self.program, &args)?;
        if !result.success {
            return Err(RangepressError::Compiler {
                code: result.code.unwrap_or(-1),
                stderr: result.stderr.trim().to_string(),
            }
            .into());
        }

        Ok(())
    }
}
