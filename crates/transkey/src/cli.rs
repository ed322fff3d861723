//! `transkey` command-line tool.
//!
//! Loads a resource file (a JSON5 object of `namespace -> tree`) and optional
//! layered option files, then lists valid keys, resolves keys, or checks a
//! list of keys against the schema.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use transkey_config::{NamespaceList, ResolverOptions};
use transkey_core::{KeyEngine, KeySet, LookupOptions, LookupScope, PluralCategory, ResourceSchema};

/// Command-line options for the key tool.
#[derive(Debug, Parser)]
#[command(name = "transkey", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every valid key, one per line (`*` when unconstrained)
    Keys {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Resolve keys and print the detailed result as JSON
    Resolve {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        scope: ScopeArgs,
        /// Keys to try in order; the first that resolves wins
        #[arg(required = true)]
        keys: Vec<String>,
        /// Explicit plural category (zero, one, two, few, many, other)
        #[arg(long)]
        plural: Option<PluralCategory>,
        /// Count reported in the result
        #[arg(long)]
        count: Option<i64>,
    },
    /// Report keys from a newline-separated file that are not valid
    Check {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        scope: ScopeArgs,
        /// File with one key per line
        #[arg(long)]
        keys: PathBuf,
    },
}

/// Where resources and options come from.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// JSON5 resource file; without it every namespace is unconstrained
    #[arg(long)]
    pub resources: Option<PathBuf>,
    /// JSON5 option files, merged in order
    #[arg(long = "options")]
    pub options: Vec<PathBuf>,
    /// Language reported in resolution results
    #[arg(long)]
    pub language: Option<String>,
}

/// Namespace, prefix and context selection.
#[derive(Debug, Args)]
pub struct ScopeArgs {
    /// Namespaces to search (defaults to the configured default namespace)
    #[arg(long = "ns")]
    pub namespaces: Vec<String>,
    /// Key prefix prepended to every plain key
    #[arg(long)]
    pub prefix: Option<String>,
    /// Context token
    #[arg(long)]
    pub context: Option<String>,
    /// Accept keys naming objects and arrays
    #[arg(long)]
    pub return_objects: bool,
}

impl ScopeArgs {
    fn lookup_scope(&self) -> LookupScope {
        let mut scope = LookupScope::new();
        if !self.namespaces.is_empty() {
            scope = scope.with_namespaces(NamespaceList::new(self.namespaces.iter()));
        }
        if let Some(prefix) = &self.prefix {
            scope = scope.with_key_prefix(prefix.as_str());
        }
        scope
    }

    /// Reject a prefix that names no object of the first namespace.
    fn check_prefix(&self, engine: &KeyEngine) -> anyhow::Result<()> {
        let Some(prefix) = self.prefix.as_deref() else {
            return Ok(());
        };
        if !engine.is_valid_key_prefix(&self.lookup_scope(), prefix, &self.lookup_options()) {
            bail!("unknown key prefix `{prefix}`");
        }
        Ok(())
    }

    fn lookup_options(&self) -> LookupOptions {
        let mut options = LookupOptions::new().return_objects(self.return_objects);
        if let Some(context) = &self.context {
            options = options.context(context.as_str());
        }
        options
    }
}

/// Exit status of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// `check` found invalid keys.
    Failed,
}

/// Run `cli`, writing results to `out`.
///
/// Lookup failures in `resolve` are returned as errors wrapping the
/// underlying `ResolveError`.
pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<Status> {
    match &cli.command {
        Command::Keys { source, scope } => {
            let engine = load_engine(source)?;
            scope.check_prefix(&engine)?;
            let keys = engine.valid_keys(&scope.lookup_scope(), &scope.lookup_options());
            write_keys(&keys, out)?;
            Ok(Status::Success)
        }
        Command::Resolve {
            source,
            scope,
            keys,
            plural,
            count,
        } => {
            let engine = load_engine(source)?;
            scope.check_prefix(&engine)?;
            let mut options = scope.lookup_options().return_details(true);
            if let Some(category) = plural {
                options = options.plural(*category);
            }
            if let Some(count) = count {
                options = options.count(*count);
            }
            let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
            let resolution = engine
                .lookup(&scope.lookup_scope(), &keys, &options)
                .with_context(|| format!("failed to resolve {}", keys.join(", ")))?;
            let rendered = serde_json::to_string_pretty(&resolution.into_details())
                .context("failed to render result")?;
            writeln!(out, "{rendered}")?;
            Ok(Status::Success)
        }
        Command::Check {
            source,
            scope,
            keys,
        } => {
            let engine = load_engine(source)?;
            scope.check_prefix(&engine)?;
            let contents = fs::read_to_string(keys)
                .with_context(|| format!("failed to read key list {}", keys.display()))?;
            let valid = engine.valid_keys(&scope.lookup_scope(), &scope.lookup_options());
            let mut invalid = 0usize;
            let mut checked = 0usize;
            for key in contents.lines().map(str::trim).filter(|key| !key.is_empty()) {
                checked += 1;
                if !valid.contains(key) {
                    invalid += 1;
                    writeln!(out, "invalid key: {key}")?;
                }
            }
            info!("checked keys (checked={checked}, invalid={invalid})");
            if invalid == 0 {
                Ok(Status::Success)
            } else {
                writeln!(out, "{invalid} of {checked} keys are invalid")?;
                Ok(Status::Failed)
            }
        }
    }
}

/// Build an engine from option layers and an optional resource file.
pub fn load_engine(source: &SourceArgs) -> anyhow::Result<KeyEngine> {
    let options = if source.options.is_empty() {
        ResolverOptions::default()
    } else {
        ResolverOptions::load_layered(&source.options).context("failed to load options")?
    };

    let schema = match &source.resources {
        Some(path) => {
            info!("loading resources from path: {}", path.display());
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read resources {}", path.display()))?;
            let schema = ResourceSchema::from_json5_str(&contents)
                .with_context(|| format!("invalid resources {}", path.display()))?;
            debug!("resources loaded (namespaces={})", schema.namespaces().count());
            Some(match &source.language {
                Some(language) => schema.with_language(language.as_str()),
                None => schema,
            })
        }
        None => None,
    };

    KeyEngine::new(options, schema).context("invalid options")
}

fn write_keys(keys: &KeySet, out: &mut impl Write) -> std::io::Result<()> {
    match keys.keys() {
        None => writeln!(out, "*"),
        Some(keys) => keys.iter().try_for_each(|key| writeln!(out, "{key}")),
    }
}
