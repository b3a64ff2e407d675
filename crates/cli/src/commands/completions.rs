//! Shell completion generation

use clap::CommandFactory;
use clap_complete::Shell;

use super::Cli;
use crate::exit_code::ExitCode;

/// Arguments for the completions command
#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Print the completion script for `shell` to stdout
pub fn execute(args: CompletionsArgs) -> ExitCode {
    write_completions(args.shell, &mut std::io::stdout());
    ExitCode::Success
}

fn write_completions(shell: Shell, out: &mut dyn std::io::Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_completions_bash() {
        let output = script(Shell::Bash);
        assert!(output.contains("ilm"));
        assert!(output.contains("complete"));
    }

    #[test]
    fn test_completions_zsh() {
        assert!(script(Shell::Zsh).contains("compdef"));
    }

    #[test]
    fn test_completions_cover_rule_flags() {
        let output = script(Shell::Bash);
        assert!(output.contains("--expiry-days"));
        assert!(output.contains("--noncurrentversion-transition-storage-class"));
    }
}
