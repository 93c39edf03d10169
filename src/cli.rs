use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "airform")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(
    about = "Generate an importable Terraform configuration for a data product's Airbyte resources",
    long_about = "Clones the data product repository, matches every source and connection it \
                  declares against the live Airbyte environments, and writes one Terraform file \
                  that imports the existing resources in whichever environment it is applied to.\n\n\
                  Settings come from the environment: DP_NAME, GIT_ORGANIZATION, TOKEN_GITHUB, \
                  AIRFORM_ENVIRONMENTS, AIRFORM_REFERENCE_ENV and, per environment, \
                  <ENV>_AIRBYTE_URL, <ENV>_AIRBYTE_CLIENT_ID, <ENV>_AIRBYTE_CLIENT_SECRET."
)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// File to write
    #[arg(short, long, default_value = "main.tf")]
    pub output: PathBuf,

    /// Folder the product repository is cloned into. An existing folder is
    /// replaced only if it is a git checkout
    #[arg(short, long, default_value = "data_product")]
    pub workdir: PathBuf,

    /// Skip `terraform fmt` on the written file
    #[arg(long)]
    pub no_fmt: bool,

    /// Use the existing checkout in the work folder instead of cloning
    #[arg(long)]
    pub no_clone: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["airform"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, PathBuf::from("main.tf"));
        assert_eq!(cli.workdir, PathBuf::from("data_product"));
        assert!(!cli.no_fmt);
        assert!(!cli.no_clone);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "airform",
            "-vv",
            "--output",
            "out/import.tf",
            "--workdir",
            "/tmp/checkout",
            "--no-fmt",
            "--no-clone",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, PathBuf::from("out/import.tf"));
        assert_eq!(cli.workdir, PathBuf::from("/tmp/checkout"));
        assert!(cli.no_fmt);
        assert!(cli.no_clone);
    }
}
