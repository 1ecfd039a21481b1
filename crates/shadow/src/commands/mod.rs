pub mod fnt;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle FNT subtitle tables
    Fnt {
        #[command(subcommand)]
        command: fnt::FntCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Fnt { command } => command.handle(),
        }
    }
}
