pub mod diff;
pub mod edit;
pub mod export;
pub mod import;
pub mod repair;
pub mod show;

use miette::{Context, IntoDiagnostic, Result};
use shadow_fnt::{decode_with, DecodeOptions, FntTable};
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

#[derive(clap::Subcommand)]
pub enum FntCommands {
    /// Print the entries of a FNT file
    Show(show::ShowArgs),
    /// Rebuild the subtitle addresses of FNT files
    Repair(repair::RepairArgs),
    /// Compare two FNT files
    Diff(diff::DiffArgs),
    /// Export a FNT file to JSON
    Export(export::ExportArgs),
    /// Create a FNT file from JSON
    Import(import::ImportArgs),
    /// Change a FNT file
    Edit(edit::EditArgs),
}

impl FntCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            FntCommands::Show(show) => show.handle(),
            FntCommands::Repair(repair) => repair.handle(),
            FntCommands::Diff(diff) => diff.handle(),
            FntCommands::Export(export) => export.handle(),
            FntCommands::Import(import) => import.handle(),
            FntCommands::Edit(edit) => edit.handle(),
        }
    }
}

/// Read and decode a FNT file, keeping its path as the table's source name
pub(crate) fn load(path: &Path, display_filter: &str, preserve_unknown: bool) -> Result<FntTable> {
    let bytes = std::fs::read(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))?;

    let options = DecodeOptions::builder()
        .source_name(path.to_string_lossy())
        .display_filter(display_filter)
        .preserve_unknown_entry_types(preserve_unknown)
        .build();

    decode_with(&bytes, options).context(format!("decoding {}", path.display()))
}

/// Write `bytes` to `path`, refusing to replace an existing file unless `overwrite` is set
pub(crate) fn save(path: &Path, bytes: &[u8], overwrite: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .into_diagnostic()
            .context(format!("creating {}", parent.display()))?;
    }

    let mut out = if !overwrite {
        File::create_new(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))?
    } else {
        File::create(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))?
    };

    out.write_all(bytes)
        .into_diagnostic()
        .context(format!("writing {}", path.display()))
}

/// Write the bytes of an edited `input` to `output`, or replace `input` itself when no output is given.
///
/// Only a separate output is protected by `overwrite`.
pub(crate) fn write_back(
    input: &Path,
    output: Option<&Path>,
    bytes: &[u8],
    overwrite: bool,
) -> Result<PathBuf> {
    match output {
        Some(output) => {
            save(output, bytes, overwrite)?;
            Ok(output.to_path_buf())
        }
        None => {
            save(input, bytes, true)?;
            Ok(input.to_path_buf())
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use miette::{IntoDiagnostic, Result};
    use shadow_fnt::{Entry, FntTable};
    use std::path::PathBuf;

    /// A fresh scratch directory for a test
    pub(crate) fn scratch(name: &str) -> Result<PathBuf> {
        let dir = std::env::temp_dir().join(format!("shadow-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).into_diagnostic()?;
        Ok(dir)
    }

    pub(crate) fn sample() -> FntTable {
        FntTable::from_entries(
            "sample.fnt",
            "",
            vec![
                Entry::builder()
                    .message_id_branch_sequence(10)
                    .subtitle("Hi")
                    .build(),
                Entry::builder()
                    .message_id_branch_sequence(20)
                    .subtitle("Bye")
                    .build(),
            ],
        )
    }

    #[test]
    fn write_back_replaces_input() -> Result<()> {
        let dir = scratch("write-back-input")?;
        let input = dir.join("stg0100_EN.fnt");
        std::fs::write(&input, b"old").into_diagnostic()?;

        let written = super::write_back(&input, None, b"new", false)?;

        assert_eq!(written, input);
        assert_eq!(std::fs::read(&input).into_diagnostic()?, b"new");

        Ok(())
    }

    #[test]
    fn write_back_guards_separate_output() -> Result<()> {
        let dir = scratch("write-back-output")?;
        let input = dir.join("stg0100_EN.fnt");
        let output = dir.join("out").join("stg0100_EN.fnt");
        std::fs::write(&input, b"old").into_diagnostic()?;

        super::write_back(&input, Some(&output), b"new", false)?;
        assert_eq!(std::fs::read(&output).into_diagnostic()?, b"new");
        assert_eq!(std::fs::read(&input).into_diagnostic()?, b"old");

        assert!(super::write_back(&input, Some(&output), b"newer", false).is_err());
        super::write_back(&input, Some(&output), b"newer", true)?;
        assert_eq!(std::fs::read(&output).into_diagnostic()?, b"newer");

        Ok(())
    }
}
