use clap::{Args, ValueEnum};
use itertools::Itertools;
use miette::Result;
use owo_colors::OwoColorize;
use shadow_fnt::{Entry, FntTable};
use similar::{ChangeTag, TextDiff};
use std::{collections::BTreeMap, fmt::Display, path::PathBuf};
use tracing::{info, warn};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Mode {
    /// Compare what the game shows, ignoring where subtitles are stored
    #[default]
    Semantic,
    /// Also compare subtitle addresses and table layout
    Full,
}

#[derive(Debug, Eq, PartialEq)]
enum Change {
    Added(i32, String),
    Removed(i32, String),
    Comparison(String, String, String),
    Context(Vec<String>),
    Modified(i32, Vec<Change>),
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added(key, text) => {
                writeln!(f, "✅ {}: {}", key, format!("{:?}", text).green())
            }
            Change::Removed(key, text) => {
                writeln!(f, "❌ {}: {}", key, format!("{:?}", text).red())
            }
            Change::Comparison(field, old, new) => {
                writeln!(f, "* {}: {} vs {}", field, old.red(), new.green())
            }
            Change::Context(lines) => {
                writeln!(f, "{}", lines.iter().map(|l| format!(" {}", l)).join("\n"))
            }
            Change::Modified(key, related) => {
                writeln!(f, "🔃 {}", key.blue())?;
                writeln!(
                    f,
                    "{}",
                    related
                        .iter()
                        .map(|c| c.to_string())
                        .join("")
                        .split('\n')
                        .filter(|l| !l.trim().is_empty())
                        .map(|l| "  ".to_string() + l)
                        .join("\n")
                )
            }
        }
    }
}

#[derive(Args)]
pub struct DiffArgs {
    /// An input FNT file
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// An input FNT file
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,

    /// Comparison mode
    #[arg(short, long, value_enum, default_value_t = Mode::Semantic)]
    mode: Mode,

    /// Keep entry types the game does not define instead of failing
    #[arg(long, default_value_t = false)]
    preserve_unknown: bool,
}

fn by_key(fnt: &FntTable) -> BTreeMap<i32, &Entry> {
    let mut keyed = BTreeMap::new();
    for entry in fnt {
        if keyed
            .insert(entry.message_id_branch_sequence, entry)
            .is_some()
        {
            warn!(
                "{} has more than one entry with key {}",
                fnt, entry.message_id_branch_sequence
            );
        }
    }
    keyed
}

fn inline_diff(old: &str, new: &str) -> Vec<String> {
    let diff = TextDiff::from_lines(old, new);

    let mut lines = Vec::new();
    for op in diff.ops().iter() {
        for change in diff.iter_inline_changes(op) {
            let mut context = String::new();
            for (emphasized, value) in change.iter_strings_lossy() {
                let value = value.trim_end_matches('\n');
                if emphasized {
                    if change.tag() == ChangeTag::Insert {
                        context.push_str(&format!("{}", value.green().underline()));
                    } else {
                        context.push_str(&format!("{}", value.red().underline()));
                    }
                } else {
                    context.push_str(&format!("{}", value.dimmed()));
                }
            }
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            lines.push(format!("{} {}", sign, context));
        }
    }
    lines
}

impl DiffArgs {
    fn compare(&self, old: &Entry, new: &Entry) -> Option<Change> {
        let mut related = Vec::new();

        if self.mode == Mode::Full && old.subtitle_address != new.subtitle_address {
            related.push(Change::Comparison(
                "address".into(),
                old.subtitle_address.to_string(),
                new.subtitle_address.to_string(),
            ));
        }

        if old.entry_type != new.entry_type {
            related.push(Change::Comparison(
                "type".into(),
                old.entry_type.to_string(),
                new.entry_type.to_string(),
            ));
        }

        if old.subtitle_active_time != new.subtitle_active_time {
            related.push(Change::Comparison(
                "active time".into(),
                old.subtitle_active_time.to_string(),
                new.subtitle_active_time.to_string(),
            ));
        }

        if old.audio_id != new.audio_id {
            related.push(Change::Comparison(
                "audio".into(),
                old.audio_id.to_string(),
                new.audio_id.to_string(),
            ));
        }

        if old.subtitle() != new.subtitle() {
            related.push(Change::Context(inline_diff(old.text(), new.text())));
        }

        if related.is_empty() {
            None
        } else {
            Some(Change::Modified(old.message_id_branch_sequence, related))
        }
    }

    fn handle_fnt(&self, left: &FntTable, right: &FntTable) -> Vec<Change> {
        let mut result = Vec::new();

        if self.mode == Mode::Full {
            if left.entry_count() != right.entry_count() {
                result.push(Change::Comparison(
                    "entries".into(),
                    left.entry_count().to_string(),
                    right.entry_count().to_string(),
                ));
            }

            if left.is_consistent() != right.is_consistent() {
                result.push(Change::Comparison(
                    "consistent".into(),
                    left.is_consistent().to_string(),
                    right.is_consistent().to_string(),
                ));
            }
        }

        let left_keys = by_key(left);
        let right_keys = by_key(right);

        for key in left_keys.keys().chain(right_keys.keys()).sorted().dedup() {
            match (left_keys.get(key), right_keys.get(key)) {
                (None, Some(new)) => result.push(Change::Added(*key, new.text().into())),
                (Some(old), None) => result.push(Change::Removed(*key, old.text().into())),
                (Some(old), Some(new)) => result.extend(self.compare(old, new)),
                (None, None) => {}
            }
        }

        result
    }

    pub fn handle(&self) -> Result<()> {
        let left = super::load(&self.left, "", self.preserve_unknown)?;
        let right = super::load(&self.right, "", self.preserve_unknown)?;

        let changes = self.handle_fnt(&left, &right);
        if changes.is_empty() {
            info!("{} and {} are equivalent", left, right);
            return Ok(());
        }

        println!("{} vs {}", left.bold(), right.bold());
        for change in changes {
            print!("{}", change);
        }

        Ok(())
    }
}
