//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <file>`: Config file to read and write (also `ATOMIX_CONFIG`)
//! - `--debug`: Enable debug logging
//! - `--controller`, `--namespace`, `--app`, `--group` / `-g`: Client overrides
//! - `--timeout <duration>`: Deadline for each remote call

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::client::Protocol;
use crate::core::config::ConfigKey;
use crate::core::naming::Overrides;
use crate::core::timeout::parse_duration;
use crate::core::types::PrimitiveKind;

/// Atomix - Manage partition groups and distributed primitives
#[derive(Parser, Debug)]
#[command(name = "atomix")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to read and write
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(flatten)]
    pub client: ClientArgs,

    /// Deadline for each remote call (e.g. 500ms, 2s, 1m30s)
    #[arg(
        long,
        global = true,
        value_name = "DURATION",
        default_value = "15s",
        value_parser = parse_duration
    )]
    pub timeout: Duration,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for the persisted client configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ClientArgs {
    /// Controller endpoint (host:port)
    #[arg(long, global = true, value_name = "HOST:PORT")]
    pub controller: Option<String>,

    /// Namespace of the partition group
    #[arg(long, global = true)]
    pub namespace: Option<String>,

    /// Application scope for primitive names
    #[arg(long, global = true)]
    pub app: Option<String>,

    /// Partition group
    #[arg(short = 'g', long, global = true)]
    pub group: Option<String>,
}

impl From<ClientArgs> for Overrides {
    fn from(args: ClientArgs) -> Self {
        Overrides {
            controller: args.controller,
            namespace: args.namespace,
            app: args.app,
            group: args.group,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read and write the client configuration
    #[command(
        name = "config",
        long_about = "Read and write the client configuration.\n\n\
            Values set here are used whenever the matching flag is not given. \
            The file is written back to where it was loaded from, or to \
            ~/.atomix/config.toml when no file exists yet.",
        after_help = "\
EXAMPLES:
    # Point the client at a controller
    atomix config set controller atomix-controller:5679

    # Show the configured default group
    atomix config get group

    # Fall back to the built-in default namespace
    atomix config delete namespace"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage partition groups
    #[command(
        name = "group",
        long_about = "Manage partition groups.\n\n\
            Without a subcommand, shows the default group.",
        after_help = "\
EXAMPLES:
    # Create a raft group with three partitions
    atomix group create raft --protocol raft --partitions 3 --partitionSize 1

    # Make it the default group
    atomix group set raft

    # Show it
    atomix group"
    )]
    Group {
        #[command(subcommand)]
        action: Option<GroupAction>,
    },

    /// List partition groups in the namespace
    Groups {
        /// Omit the table header
        #[arg(long)]
        no_headers: bool,
    },

    /// List primitives in the partition group
    Primitives {
        /// Only list primitives of this type
        #[arg(long = "type", value_enum, value_name = "TYPE")]
        kind: Option<PrimitiveKind>,

        /// Omit the table header
        #[arg(long)]
        no_headers: bool,
    },

    /// Manage the state of a distributed lock
    Lock {
        #[command(subcommand)]
        action: LockAction,
    },

    /// Manage the state of a distributed set
    Set {
        #[command(subcommand)]
        action: SetAction,
    },

    /// Manage the state of a distributed map
    Map {
        #[command(subcommand)]
        action: MapAction,
    },

    /// Manage the state of a distributed counter
    Counter {
        #[command(subcommand)]
        action: CounterAction,
    },

    /// Manage the state of a distributed list
    List {
        #[command(subcommand)]
        action: ListAction,
    },

    /// Manage the state of a distributed leader election
    Election {
        #[command(subcommand)]
        action: ElectionAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for bash or zsh. Primitive and group \
            names are completed by querying the controller.",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    source <(atomix completion bash)

    # Zsh (add to ~/.zshrc)
    source <(atomix completion zsh)"
    )]
    Completion {
        /// Shell to generate completions for (bash or zsh)
        shell: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Value to set
        value: String,
    },
    /// Delete a configuration value
    Delete {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
    },
}

/// Group subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum GroupAction {
    /// Show a partition group
    Get {
        /// Group name (defaults to the configured group)
        name: Option<String>,
    },
    /// Set the default partition group
    Set {
        /// Group name
        name: String,
    },
    /// Create a partition group
    Create {
        /// Group name
        name: String,

        /// Replication protocol
        #[arg(long, value_enum, default_value_t = ProtocolArg::Raft)]
        protocol: ProtocolArg,

        /// Number of partitions
        #[arg(
            short = 'p',
            long,
            default_value_t = 1,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        partitions: u32,

        /// Number of members per partition
        #[arg(
            short = 's',
            long = "partitionSize",
            default_value_t = 1,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        partition_size: u32,
    },
    /// Delete a partition group
    Delete {
        /// Group name
        name: String,
    },
}

/// Replication protocols selectable on the command line
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolArg {
    /// Raft consensus
    Raft,
    /// Primary-backup log
    Log,
}

impl From<ProtocolArg> for Protocol {
    fn from(arg: ProtocolArg) -> Self {
        match arg {
            ProtocolArg::Raft => Protocol::raft(),
            ProtocolArg::Log => Protocol::log(),
        }
    }
}

/// The primitive a command targets.
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Primitive name: name, group.name or namespace.group.name
    #[arg(short, long)]
    pub name: String,
}

/// Lock subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum LockAction {
    /// Create the lock
    Create(Target),
    /// Acquire the lock, waiting while it is held; prints the lock version
    Lock(Target),
    /// Print whether the lock is held
    Get {
        #[command(flatten)]
        target: Target,
        /// Only report true if the lock is held at this version
        #[arg(short = 'v', long)]
        version: Option<u64>,
    },
    /// Release the lock
    Unlock {
        #[command(flatten)]
        target: Target,
        /// Only release the lock if it is held at this version
        #[arg(short = 'v', long)]
        version: Option<u64>,
    },
    /// Delete the lock
    Delete(Target),
}

/// Set subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SetAction {
    /// Create the set
    Create(Target),
    /// Add a value
    Add {
        #[command(flatten)]
        target: Target,
        value: String,
    },
    /// Print whether the set contains a value
    Contains {
        #[command(flatten)]
        target: Target,
        value: String,
    },
    /// Remove a value
    Remove {
        #[command(flatten)]
        target: Target,
        value: String,
    },
    /// Print the number of values
    Size(Target),
    /// Remove every value
    Clear(Target),
    /// Delete the set
    Delete(Target),
}

/// Map subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum MapAction {
    /// Create the map
    Create(Target),
    /// Put a value; prints the new version
    Put {
        #[command(flatten)]
        target: Target,
        key: String,
        value: String,
        /// Only write if the entry is at this version
        #[arg(short = 'v', long)]
        version: Option<u64>,
    },
    /// Print the value for a key
    Get {
        #[command(flatten)]
        target: Target,
        key: String,
    },
    /// Remove a key; prints the removed value
    Remove {
        #[command(flatten)]
        target: Target,
        key: String,
        /// Only remove if the entry is at this version
        #[arg(short = 'v', long)]
        version: Option<u64>,
    },
    /// List the keys
    Keys(Target),
    /// Print the number of entries
    Size(Target),
    /// Remove every entry
    Clear(Target),
    /// Delete the map
    Delete(Target),
}

/// Counter subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CounterAction {
    /// Create the counter
    Create(Target),
    /// Print the current value
    Get(Target),
    /// Set the value
    Set {
        #[command(flatten)]
        target: Target,
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Increment the counter; prints the new value
    Increment {
        #[command(flatten)]
        target: Target,
        /// Amount to add
        #[arg(long, default_value_t = 1)]
        delta: i64,
    },
    /// Decrement the counter; prints the new value
    Decrement {
        #[command(flatten)]
        target: Target,
        /// Amount to subtract
        #[arg(long, default_value_t = 1)]
        delta: i64,
    },
    /// Delete the counter
    Delete(Target),
}

/// List subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ListAction {
    /// Create the list
    Create(Target),
    /// Append a value
    Append {
        #[command(flatten)]
        target: Target,
        value: String,
    },
    /// Insert a value at an index
    Insert {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        index: usize,
        value: String,
    },
    /// Print the value at an index
    Get {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        index: usize,
    },
    /// Remove the value at an index; prints the removed value
    Remove {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        index: usize,
    },
    /// Print every value in order
    Items(Target),
    /// Print the number of values
    Size(Target),
    /// Remove every value
    Clear(Target),
    /// Delete the list
    Delete(Target),
}

/// Election subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ElectionAction {
    /// Create the election
    Create(Target),
    /// Enter the election as a candidate
    Enter(Target),
    /// Leave the election
    Leave(Target),
    /// Print the current term
    Get(Target),
    /// Move a candidate to the front of the queue
    Promote {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        candidate: String,
    },
    /// Remove a candidate from the election
    Evict {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        candidate: String,
    },
    /// Delete the election
    Delete(Target),
}
