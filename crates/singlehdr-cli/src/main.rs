//! singlehdr CLI
//!
//! Command-line interface for amalgamating a library into a single header.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use singlehdr_core::Config;
use singlehdr_gen::{load_library, FsSourceProvider, SourceProvider};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "singlehdr")]
#[command(
    author,
    version,
    about = "Amalgamate a C/C++ library into a single header",
    long_about = None
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the single header
    Generate {
        #[command(flatten)]
        library: LibraryArgs,

        /// Output file
        #[arg(
            short,
            long,
            value_name = "FILE",
            required_unless_present = "stdout",
            conflicts_with = "stdout"
        )]
        output: Option<PathBuf>,

        /// Print the header to stdout instead of writing a file
        #[arg(long, conflicts_with = "check")]
        stdout: bool,

        /// Fail if the output file is not up to date instead of writing it
        #[arg(long, requires = "output")]
        check: bool,
    },

    /// Show the order in which sources are emitted
    Plan {
        #[command(flatten)]
        library: LibraryArgs,
    },

    /// List the discovered sources and their visibility
    List {
        #[command(flatten)]
        library: LibraryArgs,
    },
}

#[derive(Args)]
struct LibraryArgs {
    /// Library root (containing the public and private source trees)
    #[arg(value_name = "ROOT")]
    root: PathBuf,

    /// Configuration file (.yaml, .yml or .json)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Outer inclusion guard macro
    #[arg(long, value_name = "MACRO")]
    guard: Option<String>,

    /// Macro enabling the implementation region
    #[arg(long, value_name = "MACRO")]
    impl_define: Option<String>,

    /// Strip angle-bracket includes whose path starts with this pattern (repeatable)
    #[arg(long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// File injected verbatim after the outer guard
    #[arg(long, value_name = "FILE")]
    header_file: Option<PathBuf>,
}

impl LibraryArgs {
    /// Configuration file values with command-line overrides applied
    fn config(&self) -> Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::default(),
        };

        merge_overrides(self, config)
    }
}

/// Apply command-line flags on top of `config`
fn merge_overrides(args: &LibraryArgs, mut config: Config) -> Result<Config> {
    if let Some(guard) = &args.guard {
        config.include_guard = guard.clone();
    }
    if let Some(define) = &args.impl_define {
        config.impl_define = define.clone();
    }
    if !args.ignore.is_empty() {
        config.ignored_includes.extend(args.ignore.iter().cloned());
    }
    if let Some(header_file) = &args.header_file {
        config.additional_header = None;
        config.additional_header_file = Some(header_file.clone());
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            library,
            output,
            stdout,
            check,
        } => {
            cmd_generate(&library, output.as_deref(), stdout, check)?;
        }
        Commands::Plan { library } => {
            cmd_plan(&library)?;
        }
        Commands::List { library } => {
            cmd_list(&library)?;
        }
    }

    Ok(())
}

fn cmd_generate(
    library: &LibraryArgs,
    output: Option<&Path>,
    stdout: bool,
    check: bool,
) -> Result<()> {
    let config = library.config()?;
    let header = load_library(&library.root, &config)
        .and_then(|generator| generator.generate())
        .with_context(|| format!("Failed to amalgamate {}", library.root.display()))?;

    if stdout {
        print!("{}", header);
        return Ok(());
    }

    let Some(out_path) = output else {
        bail!("no output file given");
    };

    if check {
        if !write_or_check(out_path, &header, true)? {
            bail!("{} is out of date", out_path.display());
        }
        println!("{} is up to date", out_path.display());
        return Ok(());
    }

    println!("Writing to {}...", out_path.display());
    write_or_check(out_path, &header, false)?;
    info!("Wrote {} bytes to {}", header.len(), out_path.display());

    Ok(())
}

/// Write `header` to `path`, or with `check` only compare it byte for byte
///
/// Returns whether `path` holds `header` afterwards. A missing file fails
/// the check.
fn write_or_check(path: &Path, header: &str, check: bool) -> Result<bool> {
    if check {
        return match std::fs::read(path) {
            Ok(existing) => Ok(existing == header.as_bytes()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
        };
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, header).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(true)
}

fn cmd_plan(library: &LibraryArgs) -> Result<()> {
    let config = library.config()?;
    let plan = load_library(&library.root, &config)
        .and_then(|generator| generator.plan())
        .with_context(|| format!("Failed to order sources of {}", library.root.display()))?;

    print!("{}", plan);
    Ok(())
}

fn cmd_list(library: &LibraryArgs) -> Result<()> {
    let config = library.config()?;
    let provider = FsSourceProvider::with_layout(&library.root, config.layout)?;

    for entry in provider.list_files()? {
        println!("{:<8} {}", entry.visibility.to_string(), entry.id());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "#ifndef LIB_HPP\n#define LIB_HPP\n\n#endif // LIB_HPP\n";

    fn library_args(args: &[&str]) -> LibraryArgs {
        let mut argv = vec!["singlehdr", "list", "lib"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Commands::List { library } => library,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_check_leaves_stale_file_untouched() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Lib.hpp");
        std::fs::write(&path, "// stale\n").unwrap();

        assert!(!write_or_check(&path, HEADER, true).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "// stale\n");
    }

    #[test]
    fn test_check_accepts_identical_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Lib.hpp");
        std::fs::write(&path, HEADER).unwrap();

        assert!(write_or_check(&path, HEADER, true).unwrap());
    }

    #[test]
    fn test_check_is_byte_exact() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Lib.hpp");
        std::fs::write(&path, HEADER.replace('\n', "\r\n")).unwrap();

        assert!(!write_or_check(&path, HEADER, true).unwrap());
        assert!(!write_or_check(&temp.path().join("Missing.hpp"), HEADER, true).unwrap());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dist/single/Lib.hpp");

        assert!(write_or_check(&path, HEADER, false).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), HEADER);
    }

    #[test]
    fn test_flags_override_loaded_config() {
        let loaded = Config {
            include_guard: "FILE_HPP".into(),
            impl_define: "FILE_IMPL".into(),
            ignored_includes: vec!["Lib/".into()],
            ..Config::default()
        };
        let args = library_args(&[
            "--guard",
            "CLI_HPP",
            "--impl-define",
            "CLI_IMPL",
            "--ignore",
            "Extra/",
        ]);

        let config = merge_overrides(&args, loaded).unwrap();

        assert_eq!(config.include_guard, "CLI_HPP");
        assert_eq!(config.impl_define, "CLI_IMPL");
        assert_eq!(config.ignored_includes, vec!["Lib/", "Extra/"]);
    }

    #[test]
    fn test_header_file_replaces_inline_header() {
        let loaded = Config {
            additional_header: Some("// inline".into()),
            ..Config::default()
        };
        let args = library_args(&["--header-file", "LICENSE.txt"]);

        let config = merge_overrides(&args, loaded).unwrap();

        assert_eq!(config.additional_header, None);
        assert_eq!(config.additional_header_file, Some(PathBuf::from("LICENSE.txt")));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = library_args(&["--guard", "NOT A MACRO"]);

        assert!(merge_overrides(&args, Config::default()).is_err());
    }

    #[test]
    fn test_stdout_conflicts_with_output() {
        let argv = ["singlehdr", "generate", "lib", "--stdout", "-o", "x.hpp"];

        let result = Cli::try_parse_from(argv);

        assert!(result.is_err());
    }
}
