use ledgerchat_client::commands;
use ledgerchat_client::commands::common::InterpretOptions;
use ledgerchat_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, InterpretArgs};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Record(args) => commands::record::run_with_options(&args.text, options(args)),
        Commands::Query(args) => commands::query::run_with_options(&args.text, options(args)),
        Commands::Chat(args) => commands::chat::run_with_options(&args.text, options(args)),
        Commands::Intent { text, .. } => commands::intent::run(text),
        Commands::Keywords { keywords, .. } => {
            commands::keywords::run_with_options(InterpretOptions {
                keywords_path: keywords.as_deref(),
                ..InterpretOptions::default()
            })
        }
    }
}

fn options(args: &InterpretArgs) -> InterpretOptions<'_> {
    InterpretOptions {
        today: args.today.as_ref().map(|value| value.as_str()),
        keywords_path: args.keywords.as_deref(),
        home_override: None,
    }
}
