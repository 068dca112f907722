use clap::{
    Parser,
    Subcommand,
};
use lpcore::{
    ac::Agent,
    catalog::CatalogKind,
    update::{
        LanguagePairRateItem,
        ProfileUpdate,
    },
};
use lpctrl::platform::{
    Config,
    Platform,
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::{
    fs,
    io::{
        stdin,
        BufReader,
    },
    path::Path,
};

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[clap(flatten)]
    config: Config,
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(arg_required_else_help = true)]
    User {
        #[command(subcommand)]
        cmd: UserCmd,
    },
    #[command(arg_required_else_help = true)]
    Catalog {
        #[command(subcommand)]
        cmd: CatalogCmd,
    },
    #[command(arg_required_else_help = true)]
    Profile {
        #[command(subcommand)]
        cmd: ProfileCmd,
    },
    #[command(arg_required_else_help = true)]
    Avatar {
        #[command(subcommand)]
        cmd: AvatarCmd,
    },
    #[command(arg_required_else_help = true)]
    Rate {
        #[command(subcommand)]
        cmd: RateCmd,
    },
}

#[derive(Debug, Subcommand)]
enum UserCmd {
    #[command(arg_required_else_help = true)]
    Create {
        name: String,
    },
    #[command(arg_required_else_help = true)]
    Show {
        name: String,
    },
}

#[derive(Debug, Subcommand)]
enum CatalogCmd {
    #[command(arg_required_else_help = true)]
    Add {
        kind: CatalogKind,
        name: String,
        #[clap(long)]
        code: Option<String>,
    },
    #[command(arg_required_else_help = true)]
    List {
        kind: CatalogKind,
    },
}

#[derive(Debug, Subcommand)]
enum ProfileCmd {
    #[command(arg_required_else_help = true)]
    Show {
        user: String,
    },
    /// Apply an update read from the JSON file, or standard input.
    #[command(arg_required_else_help = true)]
    Update {
        user: String,
        input: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum AvatarCmd {
    #[command(arg_required_else_help = true)]
    Set {
        user: String,
        path: String,
    },
    #[command(arg_required_else_help = true)]
    Clear {
        user: String,
    },
}

#[derive(Debug, Subcommand)]
enum RateCmd {
    /// Propose a rate read from the JSON file, or standard input.
    #[command(arg_required_else_help = true)]
    Propose {
        user: String,
        input: Option<String>,
    },
    #[command(arg_required_else_help = true)]
    Approve {
        /// The approving user.
        user: String,
        id: i64,
        rate: Decimal,
        #[clap(long)]
        reference: Option<String>,
    },
    #[command(arg_required_else_help = true)]
    Retract {
        user: String,
        id: i64,
    },
    #[command(arg_required_else_help = true)]
    History {
        id: i64,
    },
    Pending,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    stderrlog::new()
        .module(module_path!())
        .module("lpdb_sqlite")
        .verbosity((args.verbose as usize) + 1)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let platform = args.config.build().await
        .map_err(anyhow::Error::from_boxed)?;

    match args.command {
        Commands::User { cmd } => {
            parse_user(&platform, cmd).await?;
        },
        Commands::Catalog { cmd } => {
            parse_catalog(&platform, cmd).await?;
        },
        Commands::Profile { cmd } => {
            parse_profile(&platform, cmd).await?;
        },
        Commands::Avatar { cmd } => {
            parse_avatar(&platform, cmd).await?;
        },
        Commands::Rate { cmd } => {
            parse_rate(&platform, cmd).await?;
        },
    }

    Ok(())
}

fn read_input<T: DeserializeOwned>(input: Option<String>) -> anyhow::Result<T> {
    Ok(match input {
        Some(path) => serde_json::from_reader(BufReader::new(fs::File::open(path)?))?,
        None => serde_json::from_reader(BufReader::new(stdin()))?,
    })
}

async fn agent(platform: &Platform, name: &str) -> anyhow::Result<Agent> {
    Ok(platform.get_user_by_name(name).await?.into())
}

async fn parse_user(
    platform: &Platform,
    arg: UserCmd,
) -> anyhow::Result<()> {
    match arg {
        UserCmd::Create { name } => {
            let user = platform.create_user(&name).await?;
            println!("created user {} with id {}", user.name, user.id);
        }
        UserCmd::Show { name } => {
            let user = platform.get_user_by_name(&name).await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
    }
    Ok(())
}

async fn parse_catalog(
    platform: &Platform,
    arg: CatalogCmd,
) -> anyhow::Result<()> {
    match arg {
        CatalogCmd::Add { kind, name, code } => {
            let id = platform.add_catalog_entry(kind, &name, code.as_deref()).await?;
            println!("added {kind} {name:?} with id {id}");
        }
        CatalogCmd::List { kind } => {
            for entry in platform.list_catalog_entries(kind).await?.iter() {
                match &entry.code {
                    Some(code) => println!("{}\t{}\t{code}", entry.id, entry.name),
                    None => println!("{}\t{}", entry.id, entry.name),
                }
            }
        }
    }
    Ok(())
}

async fn parse_profile(
    platform: &Platform,
    arg: ProfileCmd,
) -> anyhow::Result<()> {
    match arg {
        ProfileCmd::Show { user } => {
            let user = platform.get_user_by_name(&user).await?;
            let aggregate = platform.get_profile(user.id).await?;
            println!("{}", serde_json::to_string_pretty(&aggregate)?);
        }
        ProfileCmd::Update { user, input } => {
            let agent = agent(platform, &user).await?;
            let update: ProfileUpdate = read_input(input)?;
            match platform.update_profile(&agent, &update).await {
                Ok(aggregate) => {
                    println!("{}", serde_json::to_string_pretty(&aggregate)?);
                    if !aggregate.is_complete() {
                        log::warn!("the profile of {user} is not yet complete");
                    }
                }
                Err(lpctrl::error::Error::Validation(errors)) => {
                    println!("{}", serde_json::to_string_pretty(&errors)?);
                    anyhow::bail!("the profile update was rejected");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}

async fn parse_avatar(
    platform: &Platform,
    arg: AvatarCmd,
) -> anyhow::Result<()> {
    match arg {
        AvatarCmd::Set { user, path } => {
            let agent = agent(platform, &user).await?;
            let contents = fs::read(&path)?;
            let filename = Path::new(&path)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default();
            let profile = platform.update_avatar(&agent, filename, &contents).await?;
            println!("avatar of {user} stored at {}", profile.avatar.unwrap_or_default());
        }
        AvatarCmd::Clear { user } => {
            let agent = agent(platform, &user).await?;
            platform.destroy_avatar(&agent).await?;
            println!("avatar of {user} removed");
        }
    }
    Ok(())
}

async fn parse_rate(
    platform: &Platform,
    arg: RateCmd,
) -> anyhow::Result<()> {
    match arg {
        RateCmd::Propose { user, input } => {
            let agent = agent(platform, &user).await?;
            let item: LanguagePairRateItem = read_input(input)?;
            let rate = platform.propose_rate(&agent, &item).await?;
            println!("{}", serde_json::to_string_pretty(&rate)?);
        }
        RateCmd::Approve { user, id, rate, reference } => {
            let agent = agent(platform, &user).await?;
            let rate = platform.approve_rate(&agent, id, rate, reference.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&rate)?);
        }
        RateCmd::Retract { user, id } => {
            let agent = agent(platform, &user).await?;
            platform.retract_rate(&agent, id).await?;
            println!("approval of language pair rate {id} retracted");
        }
        RateCmd::History { id } => {
            for entry in platform.rate_history(id).await?.iter() {
                println!(
                    "{}\t{}\t{} -> {}\t{}",
                    entry.created_ts,
                    entry.change_type,
                    entry.old_rate.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string()),
                    entry.new_rate,
                    entry.notes.as_deref().unwrap_or_default(),
                );
            }
        }
        RateCmd::Pending => {
            println!("{}", serde_json::to_string_pretty(&platform.pending_rates().await?)?);
        }
    }
    Ok(())
}
