//! # Shell Completion Module
//!
//! Completion script generation for the `cadence` binary via clap's
//! completion system.
//!
//! ## Usage
//!
//! ```bash
//! # Generate bash completions
//! cadence completion bash > ~/.local/share/bash-completion/completions/cadence
//!
//! # Generate zsh completions
//! cadence completion zsh > ~/.config/zsh/completions/_cadence
//! ```

use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use std::io;

/// Generate shell completions for the given shell
pub fn generate_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// Convert our Shell enum to clap_complete's Shell enum
#[must_use]
pub fn shell_to_completion_shell(shell: &crate::cli::Shell) -> CompletionShell {
    match shell {
        crate::cli::Shell::Bash => CompletionShell::Bash,
        crate::cli::Shell::Zsh => CompletionShell::Zsh,
        crate::cli::Shell::Fish => CompletionShell::Fish,
        crate::cli::Shell::PowerShell => CompletionShell::PowerShell,
        crate::cli::Shell::Elvish => CompletionShell::Elvish,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_conversion() {
        assert_eq!(
            shell_to_completion_shell(&crate::cli::Shell::Bash),
            CompletionShell::Bash
        );
        assert_eq!(
            shell_to_completion_shell(&crate::cli::Shell::Zsh),
            CompletionShell::Zsh
        );
    }
}
