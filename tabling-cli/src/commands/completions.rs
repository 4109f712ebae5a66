//! Shell completion generation command.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

/// Name of the installed binary.
const BIN_NAME: &str = "tabling";

/// Generate shell completion scripts
#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Where each shell expects the generated script.
fn install_hint(shell: Shell) -> Option<&'static str> {
    match shell {
        Shell::Bash => Some(
            "tabling completions bash > ~/.local/share/bash-completion/completions/tabling",
        ),
        Shell::Zsh => Some("tabling completions zsh > ~/.zsh/completions/_tabling"),
        Shell::Fish => Some("tabling completions fish > ~/.config/fish/completions/tabling.fish"),
        Shell::PowerShell => {
            Some("tabling completions powershell | Out-String | Invoke-Expression")
        }
        _ => None,
    }
}

impl CompletionsCommand {
    /// Write the completion script to stdout; install hints go to stderr.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        if !global.quiet {
            if let Some(hint) = install_hint(self.shell) {
                eprintln!("# Install with:");
                eprintln!("#   {hint}");
            }
        }

        let mut cmd = Cli::command();
        generate(self.shell, &mut cmd, BIN_NAME, &mut io::stdout());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_hints_name_the_binary() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            assert!(install_hint(shell).unwrap().starts_with(BIN_NAME));
        }
        assert!(install_hint(Shell::Elvish).is_none());
    }
}
