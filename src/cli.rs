use std::path::PathBuf;

use clap::Parser;

/// Command-line surface, mirroring the build-system action's argument list.
/// Every path is taken as given (absolute or cwd-relative); relativization to
/// the source root happens inside the runner.
#[derive(Parser, Debug)]
#[command(
    name = "lintwrap",
    version,
    about = "Run the Android lint tool incrementally and post-process its report for build integration."
)]
pub struct Cli {
    /// Path to the lint executable
    #[arg(long)]
    pub lint_path: PathBuf,

    /// Path to the product/output directory
    #[arg(long)]
    pub product_dir: PathBuf,

    /// Path to the XML lint result file
    #[arg(long)]
    pub result_path: PathBuf,

    /// Directory under which the tool's internal cache tree should live
    #[arg(long)]
    pub cache_dir: PathBuf,

    /// Path to the platform definitions XML (input only, used for staleness)
    #[arg(long)]
    pub platform_xml_path: PathBuf,

    /// Exit nonzero when issues are present or the tool malfunctions
    #[arg(long)]
    pub can_fail_build: bool,

    /// Path to the lint suppressions file
    #[arg(long, requires = "processed_config_path")]
    pub config_path: Option<PathBuf>,

    /// Path where the processed suppressions file is written
    #[arg(long, requires = "config_path")]
    pub processed_config_path: Option<PathBuf>,

    /// Run lint instead of just touching the stamp
    #[arg(long)]
    pub enable: bool,

    /// Jar file containing class files
    #[arg(long)]
    pub jar_path: Option<PathBuf>,

    /// Java source files (repeatable)
    #[arg(long = "java-files")]
    pub java_files: Vec<PathBuf>,

    /// Path to AndroidManifest.xml
    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    /// Path to the resource directory
    #[arg(long)]
    pub resource_dir: Option<PathBuf>,

    /// Log nothing except fatal errors
    #[arg(long)]
    pub silent: bool,

    /// Directories containing java files (repeatable; takes precedence over --java-files)
    #[arg(long = "src-dirs")]
    pub src_dirs: Vec<PathBuf>,

    /// Path to touch on success
    #[arg(long)]
    pub stamp: Option<PathBuf>,

    /// Path to the depfile to write
    #[arg(long)]
    pub depfile: Option<PathBuf>,

    /// Top-level source root; defaults to three levels above the wrapper binary
    #[arg(long = "src-root")]
    pub src_root: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "lintwrap",
            "--lint-path",
            "tools/lint",
            "--product-dir",
            "out/Debug",
            "--result-path",
            "out/Debug/lint-result.xml",
            "--cache-dir",
            "out/Debug/lint-cache",
            "--platform-xml-path",
            "tools/api-platforms.xml",
        ]
    }

    #[test]
    fn minimal_invocation_parses() {
        let cli = Cli::try_parse_from(base_args()).expect("parse");
        assert!(!cli.enable);
        assert!(!cli.can_fail_build);
        assert!(cli.java_files.is_empty());
    }

    #[test]
    fn config_requires_processed_config() {
        let mut args = base_args();
        args.extend(["--config-path", "lint/suppressions.xml"]);
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn processed_config_requires_config() {
        let mut args = base_args();
        args.extend(["--processed-config-path", "out/s.xml"]);
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn repeated_java_files_accumulate() {
        let mut args = base_args();
        args.extend([
            "--java-files",
            "a/Foo.java",
            "--java-files",
            "b/Bar.java",
        ]);
        let cli = Cli::try_parse_from(args).expect("parse");
        assert_eq!(cli.java_files.len(), 2);
    }
}
