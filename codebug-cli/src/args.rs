//! CLI argument definitions using clap
//!
//! - codebug FILE              # analyze a file
//! - cat x.py | codebug        # analyze stdin
//! - codebug FILE --json       # print the JSON envelope

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codebug")]
#[command(about = "Score Python code against a reference corpus and report syntax issues")]
#[command(version)]
pub struct Cli {
    /// Python file to analyze (reads stdin if omitted)
    pub file: Option<PathBuf>,

    /// Corpus file of `# ---- SAMPLE SEP ----` separated snippets
    #[arg(long, env = "BICS_CORPUS_PATH")]
    pub corpus: Option<PathBuf>,

    /// Print the JSON envelope instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Accepted for compatibility; automatic fixing is disabled
    #[arg(long)]
    pub apply_fix: bool,

    /// Enable debug logging on stderr
    #[arg(long, short)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from(["codebug", "snippet.py", "--json", "--corpus", "c.txt"]);
        assert_eq!(cli.file, Some(PathBuf::from("snippet.py")));
        assert_eq!(cli.corpus, Some(PathBuf::from("c.txt")));
        assert!(cli.json);
        assert!(!cli.apply_fix);
    }
}
